//! Service and service token command handlers.

use tabled::Tabled;

use oc_core::{Service, ServiceToken, Session, service_env_lines};

use crate::cli::{GlobalOpts, ServiceArgs, ServiceCommand, TokenArgs, TokenCommand};
use crate::error::{CliError, failed};
use crate::output;

use super::monitor;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "OWNER NAME")]
    owner_name: String,
    #[tabled(rename = "OWNER EMAIL")]
    owner_email: String,
}

impl From<&Service> for ServiceRow {
    fn from(s: &Service) -> Self {
        Self {
            name: s.name.clone(),
            description: s.description.clone(),
            id: s.id.clone(),
            owner_name: s.owner.name.clone(),
            owner_email: s.owner.email.clone(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: ServiceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ServiceCommand::Ls => {
            let services = session
                .list_services()
                .await
                .map_err(failed("list services"))?;
            let out = output::render_list(
                global.output,
                &services,
                |s| ServiceRow::from(s),
                |s| s.id.clone(),
            )?;
            output::print_output(&out)
        }

        ServiceCommand::Create { name, description } => {
            let id = session
                .create_service(&name, &description)
                .await
                .map_err(failed("create service"))?;
            output::print_output(&id)
        }

        ServiceCommand::Rm { id } => session
            .delete_service(&id)
            .await
            .map_err(failed("delete service")),

        ServiceCommand::Token(args) => handle_token(session, args).await,

        ServiceCommand::Monitor { id } => {
            let service = session.get_service(&id).await.map_err(failed("get service"))?;
            monitor::stream(session, vec![service.subtree_topic()]).await
        }
    }
}

async fn handle_token(session: &Session, args: TokenArgs) -> Result<(), CliError> {
    match args.command {
        TokenCommand::Generate { id, env } => {
            let token = session
                .generate_token(&id)
                .await
                .map_err(failed("generate token"))?;
            print_token(session, &token, env)
        }
        TokenCommand::Regenerate { id, env } => {
            let token = session
                .regenerate_token(&id)
                .await
                .map_err(failed("regenerate token"))?;
            print_token(session, &token, env)
        }
        TokenCommand::Rm { id } => session
            .delete_token(&id)
            .await
            .map_err(failed("delete token")),
    }
}

/// The bare token, or the service's environment lines with `--env`.
fn print_token(session: &Session, token: &ServiceToken, env: bool) -> Result<(), CliError> {
    if env {
        let lines = service_env_lines(session.config(), token);
        output::print_output(&lines.join("\n"))
    } else {
        output::print_output(&token.token)
    }
}
