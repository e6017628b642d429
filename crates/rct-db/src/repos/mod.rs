//! Repository modules implementing operations for all RCT entities.
//!
//! Each module adds methods to `RctService` via `impl RctService` blocks.
//! Row readers that other modules reuse are `pub(crate)` free functions over
//! a borrowed connection, so a method that already holds the connection
//! guard never locks it twice.

pub mod participant;
pub mod questionnaire;
pub mod record;
pub mod study;
pub mod visit;
pub mod wearable;
