//! Group command handlers.

use tabled::Tabled;

use oc_core::{Group, Session};

use crate::cli::{GlobalOpts, GroupArgs, GroupCommand};
use crate::error::{CliError, failed};
use crate::output;

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&Group> for GroupRow {
    fn from(g: &Group) -> Self {
        Self {
            name: g.name.clone(),
            id: g.id.clone(),
        }
    }
}

pub async fn handle(session: &Session, args: GroupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        GroupCommand::Ls => {
            let groups = session.list_groups().await.map_err(failed("list groups"))?;
            let out = output::render_list(
                global.output,
                &groups,
                |g| GroupRow::from(g),
                |g| g.id.clone(),
            )?;
            output::print_output(&out)
        }
        GroupCommand::Create { name } => session
            .create_group(&name)
            .await
            .map_err(failed("create group")),
    }
}
