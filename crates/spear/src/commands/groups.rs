//! Group command handlers.

use std::fmt::Write as _;

use spear_core::{Api, ApiError, Group, GroupCreate};
use tabled::Tabled;

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Users")]
    users: String,
    #[tabled(rename = "Domain")]
    domain: String,
}

fn to_row(group: &Group) -> GroupRow {
    let count = group.user_count.map_or_else(|| "-".into(), |c| c.to_string());
    let users = match group.user_limit {
        Some(limit) => format!("{count}/{limit}"),
        None => count,
    };
    GroupRow {
        id: group.group_id.clone(),
        name: group.group_name.clone().unwrap_or_default(),
        users,
        domain: group.default_domain.clone().unwrap_or_default(),
    }
}

fn detail(group: &Group) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:        {}", group.group_id);
    let _ = writeln!(out, "Name:      {}", group.group_name.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Users:     {}", to_row(group).users);
    let _ = writeln!(out, "Domain:    {}", group.default_domain.as_deref().unwrap_or("-"));
    let _ = write!(out, "Time zone: {}", group.time_zone.as_deref().unwrap_or("-"));
    out
}

pub async fn handle(
    api: &Api,
    conn: &Connection,
    args: GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let dispatcher = api.dispatcher();
    let api_err = |e: ApiError| CliError::from_api(e, &conn.profile_name);

    let group = match args.command {
        GroupsCommand::List { service_provider } => {
            let service_provider = conn.service_provider(service_provider.as_deref())?;
            let groups = dispatcher.get_groups(&service_provider).await.map_err(api_err)?;
            let out = output::render_list(&global.output, &groups, to_row, |g| g.group_id.clone());
            output::print_output(&out, global.quiet);
            return Ok(());
        }

        GroupsCommand::Get { scope } => {
            let (sp, group) = conn.group_scope(&scope)?;
            dispatcher.get_group(&sp, &group).await.map_err(api_err)?
        }

        GroupsCommand::Create {
            scope,
            name,
            user_limit,
            domain,
        } => {
            let (sp, group) = conn.group_scope(&scope)?;
            let body = GroupCreate {
                service_provider_id: sp,
                group_id: group,
                group_name: name,
                user_limit,
                default_domain: domain,
            };
            dispatcher.post_group(&body).await.map_err(api_err)?
        }

        GroupsCommand::Update { scope, data } => {
            let (sp, group) = conn.group_scope(&scope)?;
            let updates = util::parse_json_object(&data)?;
            dispatcher
                .put_group(&sp, &group, &updates)
                .await
                .map_err(api_err)?
        }

        GroupsCommand::Delete { scope } => {
            let (sp, group) = conn.group_scope(&scope)?;
            let prompt = format!("Delete group '{group}' with all its users and services?");
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            dispatcher.delete_group(&sp, &group).await.map_err(api_err)?
        }
    };

    let out = output::render_single(&global.output, &group, detail, |g| g.group_id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
