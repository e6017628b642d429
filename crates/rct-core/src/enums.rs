//! Status, demographic, and visit enums.
//!
//! All enums serialize as their upper-case stored form
//! (`#[serde(rename_all = "SCREAMING_SNAKE_CASE")]`), which is also the value
//! written to the database. `label()` gives the human-readable name.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ParticipantStatus
// ---------------------------------------------------------------------------

/// Where a participant is in their journey through the study.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantStatus {
    #[default]
    Screening,
    Eligible,
    Enrolled,
    Withdrawn,
    Completed,
}

impl ParticipantStatus {
    pub const ALL: [Self; 5] = [
        Self::Screening,
        Self::Eligible,
        Self::Enrolled,
        Self::Withdrawn,
        Self::Completed,
    ];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Screening => "SCREENING",
            Self::Eligible => "ELIGIBLE",
            Self::Enrolled => "ENROLLED",
            Self::Withdrawn => "WITHDRAWN",
            Self::Completed => "COMPLETED",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Screening => "Screening",
            Self::Eligible => "Eligible",
            Self::Enrolled => "Enrolled",
            Self::Withdrawn => "Withdrawn",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// VisitType
// ---------------------------------------------------------------------------

/// A scheduled data-collection timepoint.
///
/// Declaration order is the schedule order and is preserved by
/// [`VisitType::creatable`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitType {
    Baseline,
    Visit1,
    Visit2,
    Exit,
}

impl VisitType {
    pub const ALL: [Self; 4] = [Self::Baseline, Self::Visit1, Self::Visit2, Self::Exit];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "BASELINE",
            Self::Visit1 => "VISIT1",
            Self::Visit2 => "VISIT2",
            Self::Exit => "EXIT",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Baseline => "Baseline Visit",
            Self::Visit1 => "Visit 1 (6-Month)",
            Self::Visit2 => "Visit 2 (12-Month)",
            Self::Exit => "Exit Visit",
        }
    }

    /// Visit types not yet present, in declaration order.
    #[must_use]
    pub fn creatable(existing: &[Self]) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|vt| !existing.contains(vt))
            .collect()
    }
}

impl fmt::Display for VisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
