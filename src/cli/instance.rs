use clap::{Args, Subcommand};
use edubridge::{
    auth::Principal,
    context::AppContext,
    ids::{CourseId, InstanceUuid},
    instances::{InstancesService as _, RequestContext},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct InstanceCommand {
    #[command(subcommand)]
    command: InstanceSubcommand,
}

#[derive(Debug, Subcommand)]
enum InstanceSubcommand {
    Delete(DeleteInstanceArgs),
}

#[derive(Debug, Args)]
struct DeleteInstanceArgs {
    #[command(flatten)]
    repository: super::RepositoryArgs,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Resource instance UUID
    #[arg(long)]
    id: Uuid,

    /// Course the embedding belongs to
    #[arg(long)]
    course_id: i64,

    /// Principal to act as
    #[arg(long)]
    user_id: String,
}

pub(crate) async fn run(command: InstanceCommand) -> Result<(), String> {
    match command.command {
        InstanceSubcommand::Delete(args) => delete(args).await,
    }
}

async fn delete(args: DeleteInstanceArgs) -> Result<(), String> {
    let context = AppContext::connect(&args.database_url, args.repository.into_config())
        .await
        .map_err(|error| format!("failed to initialize: {error}"))?;

    let ctx = RequestContext {
        principal: Principal::new(args.user_id, "", "", ""),
        course_id: CourseId::new(args.course_id),
    };

    context
        .instances
        .delete_instance(&ctx, InstanceUuid::from_uuid(args.id))
        .await
        .map_err(|error| format!("failed to delete instance: {error}"))?;

    println!("instance deleted: {}", args.id);

    Ok(())
}
