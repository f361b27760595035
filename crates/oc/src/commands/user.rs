//! User command handlers.

use tabled::Tabled;

use oc_config::Settings;
use oc_core::{Session, User};

use crate::cli::{GlobalOpts, UserArgs, UserCommand};
use crate::error::{CliError, failed};
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "USERID")]
    user_id: String,
    #[tabled(rename = "EMAIL")]
    email: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            name: u.name.clone(),
            user_id: u.user_id.clone(),
            email: u.email.clone(),
            id: u.id.clone(),
        }
    }
}

fn detail(u: &User) -> String {
    [
        format!("Name: {}", u.name),
        format!("Email: {}", u.email),
        format!("UserID: {}", u.user_id),
        format!("Groups: {}", u.group_labels()),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    settings: &Settings,
    args: UserArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UserCommand::Info => {
            let user = session.user_info().await.map_err(failed("get user info"))?;
            let out = output::render_single(global.output, &user, detail, |u| u.id.clone())?;
            output::print_output(&out)
        }

        UserCommand::Ls => {
            let users = session.list_users().await.map_err(failed("list users"))?;
            let out = output::render_list(
                global.output,
                &users,
                |u| UserRow::from(u),
                |u| u.id.clone(),
            )?;
            output::print_output(&out)
        }

        UserCommand::Create {
            email,
            password,
            name,
            occonfig,
        } => {
            session
                .create_user(&email, &password, name.as_deref())
                .await
                .map_err(failed("create user"))?;

            if occonfig {
                let snippet = oc_config::new_user_snippet(settings, &email).to_toml()?;
                output::print_output(snippet.trim_end())?;
            }
            Ok(())
        }
    }
}
