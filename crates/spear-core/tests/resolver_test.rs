#![allow(clippy::unwrap_used)]
// End-to-end alias resolution against a mocked Odin API.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spear_core::{
    AliasMatch, AliasResolver, ApiConfig, CoreError, Dispatcher, EntityKind, RateLimitPolicy,
};

const AA: &str = "/api/v2/groups/auto-attendants";
const HG: &str = "/api/v2/groups/hunt-groups";
const CC: &str = "/api/v2/groups/call-centers";
const USERS: &str = "/api/v2/users";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AliasResolver) {
    let server = MockServer::start().await;
    let mut config =
        ApiConfig::new(Url::parse(&format!("{}/api/v2", server.uri())).unwrap());
    config.rate_limit = RateLimitPolicy::disabled();
    let dispatcher = Dispatcher::new(&config).unwrap();
    (server, AliasResolver::new(dispatcher))
}

async fn mount_listing(server: &MockServer, listing: &str, ids: &[&str]) {
    let body: Vec<Value> = ids.iter().map(|id| json!({ "serviceUserId": id })).collect();
    Mock::given(method("GET"))
        .and(path(listing))
        .and(query_param("serviceProviderId", "sp1"))
        .and(query_param("groupId", "g1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, listing: &str, id: &str, aliases: &[&str]) {
    Mock::given(method("GET"))
        .and(path(listing))
        .and(query_param("serviceUserId", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "serviceInstanceProfile": { "name": id.to_uppercase(), "aliases": aliases }
        })))
        .mount(server)
        .await;
}

async fn mount_users(server: &MockServer, users: Value) {
    Mock::given(method("GET"))
        .and(path(USERS))
        .and(query_param("extended", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(users))
        .mount(server)
        .await;
}

async fn find(resolver: &AliasResolver, alias: &str) -> Result<AliasMatch, CoreError> {
    resolver
        .find_alias("sp1", "g1", alias, &CancellationToken::new())
        .await
}

// ── Matching ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_entity_match_beats_user_with_same_alias() {
    let (server, resolver) = setup().await;
    mount_listing(&server, AA, &["aa1"]).await;
    mount_listing(&server, HG, &[]).await;
    mount_listing(&server, CC, &[]).await;
    mount_detail(&server, AA, "aa1", &["reception@example.com"]).await;
    mount_users(
        &server,
        json!([{ "userId": "u1", "aliases": ["reception@example.com"] }]),
    )
    .await;

    let found = find(&resolver, "reception").await.unwrap();
    match found {
        AliasMatch::Entity(entity) => {
            assert_eq!(entity.kind, EntityKind::AutoAttendant);
            assert_eq!(entity.key, "aa1");
            assert_eq!(entity.display_name, "AA1");
        }
        other @ AliasMatch::User { .. } => panic!("expected entity match, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_each_entity_kind_is_searched() {
    let (server, resolver) = setup().await;
    mount_listing(&server, AA, &["aa1"]).await;
    mount_listing(&server, HG, &["hg1"]).await;
    mount_listing(&server, CC, &["cc1"]).await;
    mount_detail(&server, AA, "aa1", &["menu@example.com"]).await;
    mount_detail(&server, HG, "hg1", &["sales@example.com"]).await;
    mount_detail(&server, CC, "cc1", &["support@example.com"]).await;

    let found = find(&resolver, "support").await.unwrap();
    assert_eq!(found.owner_id(), "cc1");
    let found = find(&resolver, "sales").await.unwrap();
    assert_eq!(found.owner_id(), "hg1");
}

#[tokio::test]
async fn test_falls_back_to_first_matching_user() {
    let (server, resolver) = setup().await;
    mount_listing(&server, AA, &["aa1"]).await;
    mount_listing(&server, HG, &[]).await;
    mount_listing(&server, CC, &[]).await;
    mount_detail(&server, AA, "aa1", &["menu@example.com"]).await;
    mount_users(
        &server,
        json!([
            { "userId": "u0", "aliases": [] },
            { "userId": "u1", "aliases": ["jdoe@example.com"] },
            { "userId": "u2", "aliases": ["jdoe@other.com"] }
        ]),
    )
    .await;

    let found = find(&resolver, "jdoe").await.unwrap();
    assert_eq!(
        found,
        AliasMatch::User {
            user_id: "u1".into(),
            alias: "jdoe".into(),
        }
    );
}

#[tokio::test]
async fn test_not_found_after_full_search() {
    let (server, resolver) = setup().await;
    mount_listing(&server, AA, &["aa1"]).await;
    mount_listing(&server, HG, &[]).await;
    mount_listing(&server, CC, &[]).await;
    mount_detail(&server, AA, "aa1", &["menu@example.com"]).await;
    mount_users(&server, json!([{ "userId": "u1", "aliases": ["jdoe@example.com"] }])).await;

    let err = find(&resolver, "ghost").await.unwrap_err();
    assert!(
        matches!(err, CoreError::AliasNotFound { ref alias } if alias == "ghost"),
        "got: {err:?}"
    );
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_invalid_alias_is_never_found() {
    let (server, resolver) = setup().await;
    mount_listing(&server, AA, &["aa1"]).await;
    mount_listing(&server, HG, &[]).await;
    mount_listing(&server, CC, &[]).await;
    mount_detail(&server, AA, "aa1", &["jdoe@example.com"]).await;
    mount_users(&server, json!([{ "userId": "u1", "aliases": ["jdoe@example.com"] }])).await;

    let err = find(&resolver, "jdoe@example.com").await.unwrap_err();
    assert!(matches!(err, CoreError::AliasNotFound { .. }), "got: {err:?}");
}

// ── Failure handling ────────────────────────────────────────────────

#[tokio::test]
async fn test_persistently_failing_entity_gets_three_attempts_then_is_skipped() {
    let (server, resolver) = setup().await;
    mount_listing(&server, AA, &["aa1"]).await;
    mount_listing(&server, HG, &["hg1"]).await;
    mount_listing(&server, CC, &[]).await;
    mount_detail(&server, AA, "aa1", &["menu@example.com"]).await;
    Mock::given(method("GET"))
        .and(path(HG))
        .and(query_param("serviceUserId", "hg1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;
    mount_users(&server, json!([{ "userId": "u1", "aliases": ["sales@example.com"] }])).await;

    // hg1 might have owned "sales", but it never loaded, so the user wins.
    let found = find(&resolver, "sales").await.unwrap();
    assert_eq!(found.owner_id(), "u1");
}

#[tokio::test]
async fn test_entity_recovered_on_retry_is_matched() {
    let (server, resolver) = setup().await;
    mount_listing(&server, AA, &[]).await;
    mount_listing(&server, HG, &[]).await;
    mount_listing(&server, CC, &["cc1"]).await;
    // First attempt fails, the retry falls through to the healthy mock.
    Mock::given(method("GET"))
        .and(path(CC))
        .and(query_param("serviceUserId", "cc1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_detail(&server, CC, "cc1", &["support@example.com"]).await;
    Mock::given(method("GET"))
        .and(path(USERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let found = find(&resolver, "support").await.unwrap();
    match found {
        AliasMatch::Entity(entity) => {
            assert_eq!(entity.kind, EntityKind::CallCenter);
            assert_eq!(entity.key, "cc1");
        }
        other @ AliasMatch::User { .. } => panic!("expected entity match, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_listing_failure_aborts_search() {
    let (server, resolver) = setup().await;
    mount_listing(&server, AA, &["aa1"]).await;
    mount_listing(&server, CC, &[]).await;
    Mock::given(method("GET"))
        .and(path(HG))
        .and(query_param("groupId", "g1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(USERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = find(&resolver, "menu").await.unwrap_err();
    assert_eq!(err.api_error().and_then(spear_core::ApiError::status), Some(403));
}

#[tokio::test]
async fn test_user_listing_failure_is_fatal() {
    let (server, resolver) = setup().await;
    mount_listing(&server, AA, &[]).await;
    mount_listing(&server, HG, &[]).await;
    mount_listing(&server, CC, &[]).await;
    Mock::given(method("GET"))
        .and(path(USERS))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = find(&resolver, "jdoe").await.unwrap_err();
    assert!(matches!(err, CoreError::Api(_)), "got: {err:?}");
}

#[tokio::test]
async fn test_empty_group_checks_users() {
    let (server, resolver) = setup().await;
    mount_listing(&server, AA, &[]).await;
    mount_listing(&server, HG, &[]).await;
    mount_listing(&server, CC, &[]).await;
    mount_users(&server, json!([{ "userId": "u7", "aliases": ["jdoe"] }])).await;

    let found = find(&resolver, "jdoe").await.unwrap();
    assert_eq!(found.owner_id(), "u7");
}

// ── Cancellation ────────────────────────────────────────────────────

#[tokio::test]
async fn test_cancelled_search_returns_promptly() {
    let (server, resolver) = setup().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        resolver.find_alias("sp1", "g1", "jdoe", &cancel),
    )
    .await
    .expect("search ignored cancellation");
    assert!(matches!(result, Err(CoreError::Cancelled)), "got: {result:?}");
}

// ── Concurrency ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_detail_fetches_run_concurrently() {
    let (server, resolver) = setup().await;
    let ids: Vec<String> = (1..=8).map(|n| format!("aa{n}")).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    mount_listing(&server, AA, &id_refs).await;
    mount_listing(&server, HG, &[]).await;
    mount_listing(&server, CC, &[]).await;
    for id in &ids {
        Mock::given(method("GET"))
            .and(path(AA))
            .and(query_param("serviceUserId", id.as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "serviceInstanceProfile": {
                            "name": id,
                            "aliases": [format!("{id}@example.com")]
                        }
                    }))
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let started = std::time::Instant::now();
    let found = find(&resolver, "aa8").await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(found.owner_id(), "aa8");
    // Eight sequential fetches would take at least 4s.
    assert!(
        elapsed < Duration::from_secs(2),
        "detail fetches did not overlap: {elapsed:?}"
    );
}

#[tokio::test]
async fn test_cancellation_stops_retry_drain() {
    let (server, resolver) = setup().await;
    mount_listing(&server, AA, &["aa1"]).await;
    mount_listing(&server, HG, &[]).await;
    mount_listing(&server, CC, &[]).await;
    Mock::given(method("GET"))
        .and(path(AA))
        .and(query_param("serviceUserId", "aa1"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string("busy")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_users(&server, json!([{ "userId": "u1", "aliases": ["aa1"] }])).await;

    // The first attempt fails at ~300ms and the first retry is in flight
    // until ~600ms, so this lands inside the drain.
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(450)).await;
        trigger.cancel();
    });

    let result = resolver.find_alias("sp1", "g1", "aa1", &cancel).await;
    assert!(matches!(result, Err(CoreError::Cancelled)), "got: {result:?}");

    // Give a third attempt the chance to show up if the drain kept going.
    tokio::time::sleep(Duration::from_millis(400)).await;
    let requests = server.received_requests().await.unwrap();
    let detail_requests = requests
        .iter()
        .filter(|r| r.url.query().is_some_and(|q| q.contains("serviceUserId")))
        .count();
    let user_requests = requests.iter().filter(|r| r.url.path() == USERS).count();
    assert_eq!(detail_requests, 2);
    assert_eq!(user_requests, 0);
}
