//! Shared helpers for command handlers.

use crate::error::CliError;

/// Ask for confirmation unless `--yes` was given.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse a `--data` argument into a JSON object.
pub fn parse_json_object(
    raw: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, CliError> {
    match serde_json::from_str(raw)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(CliError::Validation {
            field: "data".into(),
            reason: format!("expected a JSON object, got: {other}"),
        }),
    }
}
