//! Composite response types returned by service operations.
//!
//! These are the JSON shapes of the HTTP routes and of `rct` command output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::category::{CategoryRecord, DataCategory};
use crate::entities::{
    BiologicalSample, Choice, ClinicalAssessment, Neuroimaging, Participant, Question,
    QuestionnaireTemplate, Visit, VisitAssessment,
};
use crate::enums::VisitType;
use crate::scoring::QuestionWithChoices;
use crate::wearable::WearableSummary;

/// A visit type that can still be created, with its display label.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VisitTypeOption {
    pub code: VisitType,
    pub label: String,
}

impl From<VisitType> for VisitTypeOption {
    fn from(vt: VisitType) -> Self {
        Self {
            code: vt,
            label: vt.label().to_string(),
        }
    }
}

/// Result of participant creation: the participant and its Baseline visit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ParticipantCreated {
    pub participant: Participant,
    pub baseline_visit: Visit,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ParticipantDetail {
    pub participant: Participant,
    pub visits: Vec<Visit>,
    pub creatable_visits: Vec<VisitTypeOption>,
}

/// Per-visit overview: which data-entry records exist and the latest
/// completed questionnaire. Reading it never creates records.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct VisitDashboard {
    pub participant: Participant,
    pub visit: Visit,
    pub clinical_assessment: Option<ClinicalAssessment>,
    pub biological_sample: Option<BiologicalSample>,
    pub neuroimaging: Option<Neuroimaging>,
    pub latest_completed_assessment: Option<VisitAssessment>,
}

/// A record opened for data entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DataEntryView {
    pub title: String,
    pub visit: Visit,
    pub record: CategoryRecord,
}

impl DataEntryView {
    #[must_use]
    pub const fn category(&self) -> DataCategory {
        self.record.category()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AssessmentSummary {
    pub assessment: VisitAssessment,
    pub template_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VisitQuestionnaires {
    pub visit: Visit,
    pub assessments: Vec<AssessmentSummary>,
    pub assignable_templates: Vec<QuestionnaireTemplate>,
}

/// One single-select field of a questionnaire form.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionField {
    /// Form field name, `question_<id>`.
    pub name: String,
    pub question: Question,
    pub choices: Vec<Choice>,
    /// Previously stored selection; only set once the assessment is completed.
    pub selected_choice_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionnaireForm {
    pub assessment: VisitAssessment,
    pub template: QuestionnaireTemplate,
    pub fields: Vec<QuestionField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TemplateDetail {
    pub template: QuestionnaireTemplate,
    pub questions: Vec<QuestionWithChoices>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct WearableDashboard {
    pub participant: Participant,
    pub summary: WearableSummary,
}
