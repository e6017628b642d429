use rct_core::entities::NewStudy;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StudyCommands;
use crate::commands::shared::parse::parse_date;
use crate::context::AppContext;
use crate::output::output;

/// Handle `rct study`.
pub async fn handle(action: &StudyCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        StudyCommands::Create {
            name,
            description,
            start,
            end,
        } => {
            let new = NewStudy {
                name: name.clone(),
                description: description.clone(),
                start_date: parse_date(start, "start")?,
                end_date: end.as_deref().map(|e| parse_date(e, "end")).transpose()?,
            };
            let study = ctx.service.create_study(&new).await?;
            output(&study, flags.format)
        }
        StudyCommands::List => output(&ctx.service.list_studies().await?, flags.format),
    }
}
