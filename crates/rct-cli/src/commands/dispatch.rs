use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::AddWearableData(args) => commands::generate::handle(&args, ctx, flags).await,
        Commands::Study { action } => commands::study::handle(&action, ctx, flags).await,
        Commands::Participant { action } => {
            commands::participant::handle(&action, ctx, flags).await
        }
        Commands::Visit { action } => commands::visit::handle(&action, ctx, flags).await,
        Commands::Template { action } => commands::template::handle(&action, ctx, flags).await,
        Commands::Wearables { action } => commands::wearables::handle(&action, ctx, flags).await,
        Commands::Serve(_) | Commands::Schema(_) => {
            anyhow::bail!("serve and schema are handled before dispatch")
        }
    }
}
