use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum VisitCommands {
    /// Create a visit of the given type (baseline, visit1, visit2, exit).
    Create {
        participant_pk: i64,
        visit_type: String,
    },
}
