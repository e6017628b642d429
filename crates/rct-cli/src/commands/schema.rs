use rct_core::{entities, responses, scoring, wearable};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Type names accepted by `rct schema`.
pub const SCHEMA_NAMES: [&str; 12] = [
    "new-study",
    "study",
    "new-participant",
    "participant",
    "participant-detail",
    "visit",
    "visit-dashboard",
    "new-template",
    "template-detail",
    "answer-submission",
    "new-wearable-sample",
    "wearable-summary",
];

fn schema_value(name: &str) -> anyhow::Result<serde_json::Value> {
    let schema = match name {
        "new-study" => schema_for!(entities::NewStudy),
        "study" => schema_for!(entities::Study),
        "new-participant" => schema_for!(entities::NewParticipant),
        "participant" => schema_for!(entities::Participant),
        "participant-detail" => schema_for!(responses::ParticipantDetail),
        "visit" => schema_for!(entities::Visit),
        "visit-dashboard" => schema_for!(responses::VisitDashboard),
        "new-template" => schema_for!(entities::NewTemplate),
        "template-detail" => schema_for!(responses::TemplateDetail),
        "answer-submission" => schema_for!(scoring::AnswerSubmission),
        "new-wearable-sample" => schema_for!(entities::NewWearableSample),
        "wearable-summary" => schema_for!(wearable::WearableSummary),
        other => anyhow::bail!(
            "unknown schema type '{other}'; expected one of: {}",
            SCHEMA_NAMES.join(", ")
        ),
    };
    Ok(serde_json::to_value(schema)?)
}

/// Handle `rct schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_value(&args.type_name)?, flags.format)
}
