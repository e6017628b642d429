use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum StudyCommands {
    /// Create a study.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,
    },
    /// List studies by name.
    List,
}
