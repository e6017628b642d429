use rct_core::entities::NewParticipant;
use rct_core::enums::{Gender, ParticipantStatus};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ParticipantCommands;
use crate::commands::shared::parse::{parse_date, parse_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `rct participant`.
pub async fn handle(
    action: &ParticipantCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ParticipantCommands::Add {
            study,
            dob,
            gender,
            group,
            code,
        } => {
            let new = NewParticipant {
                study_id: *study,
                date_of_birth: parse_date(dob, "dob")?,
                gender: parse_enum::<Gender>(gender, "gender")?,
                assigned_group_name: group.clone(),
                participant_id: code.clone(),
            };
            let created = ctx.service.create_participant(new).await?;
            output(&created, flags.format)
        }
        ParticipantCommands::List { limit } => {
            let limit = limit.unwrap_or(ctx.config.general.default_limit);
            output(&ctx.service.list_participants(limit).await?, flags.format)
        }
        ParticipantCommands::Get { id } => {
            output(&ctx.service.participant_detail(*id).await?, flags.format)
        }
        ParticipantCommands::Status { id, status } => {
            let status = parse_enum::<ParticipantStatus>(status, "status")?;
            let participant = ctx.service.update_participant_status(*id, status).await?;
            output(&participant, flags.format)
        }
    }
}
