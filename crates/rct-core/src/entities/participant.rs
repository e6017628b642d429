use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Gender, ParticipantStatus};

/// One participant's journey through a study.
///
/// `participant_id` is the human-readable code (`DG-<study>-<seq>`); `id` is
/// the integer primary key used in routes and foreign keys.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Participant {
    pub id: i64,
    pub participant_id: String,
    pub study_id: i64,
    pub status: ParticipantStatus,
    pub enrollment_date: Option<NaiveDate>,
    pub assigned_group_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
}

/// Input for participant creation. Status always starts at `SCREENING`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewParticipant {
    pub study_id: i64,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub assigned_group_name: Option<String>,
    /// Explicit code; when absent the next `DG-<study>-<seq>` code is assigned.
    #[serde(default)]
    pub participant_id: Option<String>,
}
