use crate::cli::GlobalFlags;
use crate::cli::subcommands::WearableCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `rct wearables`.
pub async fn handle(
    action: &WearableCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        WearableCommands::Summary { participant_pk } => {
            let dashboard = ctx.service.wearable_dashboard(*participant_pk).await?;
            output(&dashboard, flags.format)
        }
    }
}
