//! `find-alias` handler.

use std::fmt::Write as _;

use spear_core::{AliasMatch, Api};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cli::{FindAliasArgs, GlobalOpts};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    api: &Api,
    conn: &Connection,
    args: FindAliasArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (service_provider, group) = conn.group_scope(&args.scope)?;

    // Ctrl-C abandons the search instead of killing the process mid-call.
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, abandoning alias search");
                cancel.cancel();
            }
        })
    };

    debug!(alias = %args.alias, %service_provider, %group, "searching for alias");
    let result = api
        .find_alias(&service_provider, &group, &args.alias, &cancel)
        .await;
    watcher.abort();

    let found = result.map_err(|e| CliError::from_core(e, &conn.profile_name))?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &found,
        |m| detail(m, color),
        |m| m.owner_id().to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(found: &AliasMatch, color: bool) -> String {
    let rows: Vec<(&str, String)> = match found {
        AliasMatch::Entity(entity) => vec![
            ("Type", output::accent(entity.kind.as_ref(), color)),
            ("ID", entity.key.clone()),
            ("Name", entity.display_name.clone()),
            ("Aliases", entity.aliases.join(", ")),
        ],
        AliasMatch::User { user_id, alias } => vec![
            ("Type", output::accent("user", color)),
            ("ID", user_id.clone()),
            ("Alias", alias.clone()),
        ],
    };

    let mut out = String::new();
    for (name, value) in rows {
        let _ = writeln!(out, "{}  {value}", output::label(&format!("{name:<8}"), color));
    }
    out.trim_end().to_owned()
}
