//! `session` handler.

use std::fmt::Write as _;

use spear_core::{Api, SessionInfo};

use crate::cli::GlobalOpts;
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

pub async fn handle(api: &Api, conn: &Connection, global: &GlobalOpts) -> Result<(), CliError> {
    let session = api
        .session_details()
        .await
        .map_err(|e| CliError::from_core(e, &conn.profile_name))?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &session,
        |s| detail(api, s, color),
        |s| s.user_id.clone().unwrap_or_default(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(api: &Api, session: &SessionInfo, color: bool) -> String {
    let dash = || "-".to_owned();
    let mut rows = vec![
        ("API", api.dispatcher().base_url().to_string()),
        ("User", session.user_id.clone().unwrap_or_else(dash)),
        ("Login", session.login_type.clone().unwrap_or_else(dash)),
        ("Locale", session.locale.clone().unwrap_or_else(dash)),
    ];
    rows.extend(
        session
            .extra
            .iter()
            .filter(|(_, v)| v.is_string() || v.is_number() || v.is_boolean())
            .map(|(k, v)| (k.as_str(), v.as_str().map_or_else(|| v.to_string(), str::to_owned))),
    );

    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, value) in rows {
        let _ = writeln!(out, "{}  {value}", output::label(&format!("{name:<width$}"), color));
    }
    out.trim_end().to_owned()
}
