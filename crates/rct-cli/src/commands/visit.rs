use rct_core::enums::VisitType;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::VisitCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `rct visit`.
pub async fn handle(action: &VisitCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        VisitCommands::Create {
            participant_pk,
            visit_type,
        } => {
            let visit_type = parse_enum::<VisitType>(visit_type, "visit type")?;
            let visit = ctx.service.create_visit(*participant_pk, visit_type).await?;
            output(&visit, flags.format)
        }
    }
}
