pub mod dispatch;
pub mod generate;
pub mod participant;
pub mod schema;
pub mod shared;
pub mod study;
pub mod template;
pub mod visit;
pub mod wearables;
