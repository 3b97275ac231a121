use std::sync::Arc;

use clap::{Args, Subcommand};
use edubridge::{
    auth::{HttpAuthClient, Principal, TicketManager},
    http::RepositoryHttp,
};

#[derive(Debug, Args)]
pub(crate) struct TicketCommand {
    #[command(subcommand)]
    command: TicketSubcommand,
}

#[derive(Debug, Subcommand)]
enum TicketSubcommand {
    Get(GetTicketArgs),
}

#[derive(Debug, Args)]
struct GetTicketArgs {
    #[command(flatten)]
    repository: super::RepositoryArgs,

    /// Principal identifier to authenticate as
    #[arg(long)]
    user_id: String,

    /// Principal first name forwarded on issuance
    #[arg(long, default_value = "")]
    first_name: String,

    /// Principal last name forwarded on issuance
    #[arg(long, default_value = "")]
    last_name: String,

    /// Principal email forwarded on issuance
    #[arg(long, default_value = "")]
    email: String,
}

pub(crate) async fn run(command: TicketCommand) -> Result<(), String> {
    match command.command {
        TicketSubcommand::Get(args) => get(args).await,
    }
}

async fn get(args: GetTicketArgs) -> Result<(), String> {
    let config = args.repository.into_config();
    let window = config.ticket_window;

    let http = RepositoryHttp::new(config)
        .map_err(|error| format!("failed to build http client: {error}"))?;
    let manager = TicketManager::new(Arc::new(HttpAuthClient::new(http)), window);

    let principal = Principal::new(args.user_id, args.first_name, args.last_name, args.email);

    let ticket = manager
        .get_ticket(&principal)
        .await
        .map_err(|error| format!("failed to obtain ticket: {error}"))?;

    println!("ticket: {ticket}");

    Ok(())
}
