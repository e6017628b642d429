use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum ParticipantCommands {
    /// Register a participant; a Baseline visit is created with it.
    Add {
        /// Study primary key
        #[arg(long)]
        study: i64,
        /// Date of birth, YYYY-MM-DD
        #[arg(long)]
        dob: String,
        /// male, female, or other
        #[arg(long)]
        gender: String,
        #[arg(long)]
        group: Option<String>,
        /// Explicit participant code instead of the generated one
        #[arg(long)]
        code: Option<String>,
    },
    /// List participants, newest first.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show a participant with visits and creatable visit types.
    Get { id: i64 },
    /// Change a participant's status.
    Status { id: i64, status: String },
}
