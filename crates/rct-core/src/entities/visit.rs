use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::VisitType;

/// A scheduled data-collection timepoint for one participant.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Visit {
    pub id: i64,
    pub participant_id: i64,
    pub visit_type: VisitType,
    pub visit_date: NaiveDate,
    pub is_complete: bool,
}

impl Visit {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.visit_type.label()
    }
}
