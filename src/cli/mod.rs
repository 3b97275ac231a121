use clap::{Args, Parser, Subcommand};
use edubridge::config::RepositoryConfig;

mod instance;
mod ticket;

#[derive(Debug, Parser)]
#[command(name = "edubridge", about = "EduBridge repository embedding CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Ticket(ticket::TicketCommand),
    Instance(instance::InstanceCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Ticket(command) => ticket::run(command).await,
            Commands::Instance(command) => instance::run(command).await,
        }
    }
}

/// Connection parameters for the repository service, shared by all
/// subcommands.
#[derive(Debug, Args)]
pub(crate) struct RepositoryArgs {
    /// Repository service base URL
    #[arg(long, env = "REPOSITORY_BASE_URL")]
    repository_url: String,

    /// Application id registered with the repository
    #[arg(long, env = "REPOSITORY_APP_ID")]
    app_id: String,

    /// Application secret for administrative calls
    #[arg(long, env = "REPOSITORY_APP_SECRET", hide_env_values = true)]
    app_secret: String,

    /// Skip TLS certificate verification (development instances only)
    #[arg(long, default_value_t = false)]
    insecure: bool,
}

impl RepositoryArgs {
    pub(crate) fn into_config(self) -> RepositoryConfig {
        let mut config = RepositoryConfig::new(self.repository_url, self.app_id, self.app_secret);
        config.verify_tls = !self.insecure;
        config
    }
}
