//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod config_cmd;
pub mod find_alias;
pub mod groups;
pub mod session;
pub mod util;

use spear_core::Api;

use crate::cli::{Command, GlobalOpts};
use crate::config::Connection;
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    api: &Api,
    conn: &Connection,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::FindAlias(args) => find_alias::handle(api, conn, args, global).await,
        Command::Session => session::handle(api, conn, global).await,
        Command::Groups(args) => groups::handle(api, conn, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
