use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum WearableCommands {
    /// 24-hour summary for a participant.
    Summary { participant_pk: i64 },
}
