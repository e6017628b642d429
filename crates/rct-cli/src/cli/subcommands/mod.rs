mod participant;
mod study;
mod template;
mod visit;
mod wearable;

pub use participant::ParticipantCommands;
pub use study::StudyCommands;
pub use template::TemplateCommands;
pub use visit::VisitCommands;
pub use wearable::WearableCommands;
