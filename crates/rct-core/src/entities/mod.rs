//! Entity structs for every table in the data-capture schema.
//!
//! Each entity maps to one table in `rct-db/migrations/001_initial.sql`.
//! `New*` structs are the inputs accepted by the create operations; they are
//! also the JSON bodies of the corresponding HTTP routes.

mod participant;
mod questionnaire;
mod records;
mod study;
mod visit;
mod wearable;

pub use participant::{NewParticipant, Participant};
pub use questionnaire::{
    Answer, Choice, NewChoice, NewQuestion, NewTemplate, Question, QuestionnaireTemplate,
    VisitAssessment,
};
pub use records::{BiologicalSample, ClinicalAssessment, Neuroimaging};
pub use study::{NewStudy, Study};
pub use visit::Visit;
pub use wearable::{NewWearableSample, WearableDataPoint};
