//! Participant update builder.

use chrono::NaiveDate;
use rct_core::enums::ParticipantStatus;
use serde::Serialize;

/// Changed participant fields. The identifier itself is immutable and has
/// no setter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParticipantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ParticipantStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_group_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<Option<NaiveDate>>,
}

impl ParticipantUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.assigned_group_name.is_none() && self.enrollment_date.is_none()
    }
}

pub struct ParticipantUpdateBuilder(ParticipantUpdate);

impl ParticipantUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ParticipantUpdate::default())
    }

    #[must_use]
    pub const fn status(mut self, status: ParticipantStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn assigned_group_name(mut self, group: Option<String>) -> Self {
        self.0.assigned_group_name = Some(group);
        self
    }

    #[must_use]
    pub const fn enrollment_date(mut self, date: Option<NaiveDate>) -> Self {
        self.0.enrollment_date = Some(date);
        self
    }

    #[must_use]
    pub fn build(self) -> ParticipantUpdate {
        self.0
    }
}

impl Default for ParticipantUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
