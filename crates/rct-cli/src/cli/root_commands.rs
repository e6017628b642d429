use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    ParticipantCommands, StudyCommands, TemplateCommands, VisitCommands, WearableCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Insert synthetic wearable samples spread over the last 24 hours.
    AddWearableData(AddWearableDataArgs),
    /// Studies.
    Study {
        #[command(subcommand)]
        action: StudyCommands,
    },
    /// Participants.
    Participant {
        #[command(subcommand)]
        action: ParticipantCommands,
    },
    /// Visits.
    Visit {
        #[command(subcommand)]
        action: VisitCommands,
    },
    /// Questionnaire templates.
    Template {
        #[command(subcommand)]
        action: TemplateCommands,
    },
    /// Wearable data.
    Wearables {
        #[command(subcommand)]
        action: WearableCommands,
    },
    /// Print the JSON Schema of an input or response type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Address to bind, overriding `server.bind`
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AddWearableDataArgs {
    /// Participant primary key
    pub participant_pk: i64,
    /// Number of samples to insert
    #[arg(long, default_value_t = 100)]
    pub count: usize,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name, e.g. `new-participant` or `wearable-summary`
    pub type_name: String,
}
