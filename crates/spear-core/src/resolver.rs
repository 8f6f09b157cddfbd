// ── Alias resolution ──
//
// Finds which entity in a group owns an alias. Three phases, each finished
// before the next starts:
//
// 1. Fan-out: list auto attendants, hunt groups and call centers, then fetch
//    every entity's detail concurrently (the dispatcher's rate limiter is
//    the only throttle). Results are taken in completion order.
// 2. Drain: entities whose fetch failed are retried one at a time from a
//    FIFO queue, at most `MAX_RETRIES` times each, then dropped.
// 3. Match: the first fetched entity carrying the alias wins; failing that,
//    the extended user listing is scanned in order.
//
// A failed listing call aborts the search; a failed detail fetch only
// removes that entity from matching.

use std::collections::VecDeque;
use std::future::Future;

use futures_util::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use spear_api::{Dispatcher, ServiceInstanceDetail, ServiceInstanceSummary};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::alias;
use crate::error::{CoreError, TransientFetchFailure};

/// Re-attempts allowed per entity after its first failed fetch.
pub const MAX_RETRIES: u32 = 2;

// ── Types ────────────────────────────────────────────────────────────

/// Entity collections searched before falling back to users.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    AutoAttendant,
    HuntGroup,
    CallCenter,
}

/// An entity whose detail fetch succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntity {
    pub kind: EntityKind,
    /// Service user ID.
    pub key: String,
    pub display_name: String,
    pub aliases: Vec<String>,
}

impl ResolvedEntity {
    fn from_detail(kind: EntityKind, key: &str, detail: ServiceInstanceDetail) -> Self {
        let profile = detail.service_instance_profile;
        Self {
            kind,
            key: key.to_owned(),
            display_name: profile.name,
            aliases: profile.aliases,
        }
    }
}

/// A detail fetch waiting in the retry queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOperation {
    pub kind: EntityKind,
    pub key: String,
    /// Re-attempts made so far.
    pub retry_count: u32,
}

impl PendingOperation {
    fn new(kind: EntityKind, key: String) -> Self {
        Self {
            kind,
            key,
            retry_count: 0,
        }
    }
}

/// Where an alias was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AliasMatch {
    Entity(ResolvedEntity),
    User { user_id: String, alias: String },
}

impl AliasMatch {
    /// Service user ID or user ID of the owner.
    pub fn owner_id(&self) -> &str {
        match self {
            Self::Entity(entity) => &entity.key,
            Self::User { user_id, .. } => user_id,
        }
    }
}

/// First entity, in accumulation order, that carries `candidate`.
pub fn first_match<'a>(
    candidate: &str,
    records: &'a [ResolvedEntity],
) -> Option<&'a ResolvedEntity> {
    records.iter().find(|record| {
        debug!(kind = %record.kind, name = %record.display_name, "checking entity");
        alias::matches(candidate, &record.aliases)
    })
}

// ── Resolver ─────────────────────────────────────────────────────────

/// Locates the owner of an alias within a group.
#[derive(Debug, Clone)]
pub struct AliasResolver {
    dispatcher: Dispatcher,
}

impl AliasResolver {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Search auto attendants, hunt groups and call centers of a group for
    /// `alias`, then its users.
    ///
    /// Returns [`CoreError::AliasNotFound`] only after both the entity
    /// search and the full user scan came up empty, and
    /// [`CoreError::Cancelled`] as soon as `cancel` fires; calls already
    /// sent are not recalled.
    pub async fn find_alias(
        &self,
        service_provider_id: &str,
        group_id: &str,
        alias: &str,
        cancel: &CancellationToken,
    ) -> Result<AliasMatch, CoreError> {
        if !alias::is_valid_alias(alias) {
            warn!(
                alias,
                "alias contains characters outside A-Z a-z 0-9 -_.!~*()' and cannot match"
            );
        }

        let targets =
            until_cancelled(cancel, self.list_targets(service_provider_id, group_id)).await??;

        info!(count = targets.len(), "running entity detail fetches");
        let (mut records, mut retry_queue) = self.fan_out(targets, cancel).await?;
        self.drain_retries(&mut retry_queue, &mut records, cancel).await?;

        info!(
            entities = records.len(),
            "searching auto attendants, hunt groups and call centers"
        );
        if let Some(entity) = first_match(alias, &records) {
            info!(kind = %entity.kind, key = %entity.key, alias, "alias found");
            let entity = entity.clone();
            return Ok(AliasMatch::Entity(entity));
        }
        info!(alias, "alias not found in auto attendants, hunt groups or call centers");

        if let Some(found) = self
            .search_users(service_provider_id, group_id, alias, cancel)
            .await?
        {
            return Ok(found);
        }

        info!(alias, "alias not found");
        Err(CoreError::AliasNotFound {
            alias: alias.to_owned(),
        })
    }

    /// The three group listings. Any failure here is fatal to the search.
    async fn list_targets(
        &self,
        service_provider_id: &str,
        group_id: &str,
    ) -> Result<Vec<(EntityKind, String)>, CoreError> {
        let (auto_attendants, hunt_groups, call_centers) = tokio::try_join!(
            self.dispatcher
                .get_auto_attendants(service_provider_id, group_id),
            self.dispatcher
                .get_group_hunt_groups(service_provider_id, group_id),
            self.dispatcher
                .get_group_call_centers(service_provider_id, group_id),
        )?;

        let tagged =
            |kind: EntityKind| move |s: ServiceInstanceSummary| (kind, s.service_user_id);
        Ok(auto_attendants
            .into_iter()
            .map(tagged(EntityKind::AutoAttendant))
            .chain(hunt_groups.into_iter().map(tagged(EntityKind::HuntGroup)))
            .chain(call_centers.into_iter().map(tagged(EntityKind::CallCenter)))
            .collect())
    }

    /// Fetch all details concurrently. Failures are queued, not returned.
    async fn fan_out(
        &self,
        targets: Vec<(EntityKind, String)>,
        cancel: &CancellationToken,
    ) -> Result<(Vec<ResolvedEntity>, VecDeque<PendingOperation>), CoreError> {
        let mut records = Vec::with_capacity(targets.len());
        let mut retry_queue = VecDeque::new();

        let mut in_flight: FuturesUnordered<_> = targets
            .into_iter()
            .map(|(kind, key)| self.fetch_detail(kind, key))
            .collect();

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(CoreError::Cancelled),
                next = in_flight.next() => next,
            };
            let Some(outcome) = next else { break };

            match outcome {
                Ok(entity) => {
                    debug!(kind = %entity.kind, key = %entity.key, "entity fetched");
                    records.push(entity);
                }
                Err(failure) => {
                    error!(
                        kind = %failure.kind,
                        key = %failure.key,
                        error = %failure.source,
                        "failed to fetch entity, queued for retry"
                    );
                    retry_queue.push_back(PendingOperation::new(failure.kind, failure.key));
                }
            }
        }

        Ok((records, retry_queue))
    }

    /// Sequential FIFO retry of failed fetches.
    async fn drain_retries(
        &self,
        queue: &mut VecDeque<PendingOperation>,
        records: &mut Vec<ResolvedEntity>,
        cancel: &CancellationToken,
    ) -> Result<(), CoreError> {
        if !queue.is_empty() {
            info!(pending = queue.len(), "retrying failed entity fetches");
        }

        while let Some(mut pending) = queue.pop_front() {
            pending.retry_count += 1;
            let outcome = until_cancelled(
                cancel,
                self.fetch_detail(pending.kind, pending.key.clone()),
            )
            .await?;

            match outcome {
                Ok(entity) => {
                    info!(
                        kind = %entity.kind,
                        key = %entity.key,
                        attempt = pending.retry_count,
                        "entity fetched on retry"
                    );
                    records.push(entity);
                }
                Err(failure) if pending.retry_count < MAX_RETRIES => {
                    warn!(
                        kind = %failure.kind,
                        key = %failure.key,
                        attempt = pending.retry_count,
                        error = %failure.source,
                        "retry failed, re-queued"
                    );
                    queue.push_back(pending);
                }
                Err(failure) => {
                    error!(
                        kind = %failure.kind,
                        key = %failure.key,
                        error = %failure.source,
                        "failed to fetch entity after {MAX_RETRIES} retries - skipping"
                    );
                }
            }
        }
        Ok(())
    }

    async fn search_users(
        &self,
        service_provider_id: &str,
        group_id: &str,
        alias: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<AliasMatch>, CoreError> {
        info!("fetching users");
        let users = until_cancelled(
            cancel,
            self.dispatcher.get_users(service_provider_id, group_id, true),
        )
        .await??;
        info!(count = users.len(), "searching users");

        Ok(users.into_iter().find_map(|user| {
            debug!(user_id = %user.user_id, "checking user");
            alias::matches(alias, &user.aliases).then(|| {
                info!(user_id = %user.user_id, alias, "alias found on user");
                AliasMatch::User {
                    user_id: user.user_id,
                    alias: alias.to_owned(),
                }
            })
        }))
    }

    async fn fetch_detail(
        &self,
        kind: EntityKind,
        key: String,
    ) -> Result<ResolvedEntity, TransientFetchFailure> {
        let detail = match kind {
            EntityKind::AutoAttendant => self.dispatcher.get_auto_attendant(&key).await,
            EntityKind::HuntGroup => self.dispatcher.get_group_hunt_group(&key).await,
            EntityKind::CallCenter => self.dispatcher.get_group_call_center(&key).await,
        };
        match detail {
            Ok(detail) => Ok(ResolvedEntity::from_detail(kind, &key, detail)),
            Err(source) => Err(TransientFetchFailure { kind, key, source }),
        }
    }
}

/// Run `fut` unless `cancel` fires first.
async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, CoreError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(CoreError::Cancelled),
        output = fut => Ok(output),
    }
}
