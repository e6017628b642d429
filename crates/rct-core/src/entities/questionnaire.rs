use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A reusable questionnaire definition, e.g. HADS.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionnaireTemplate {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// A single question within a template. Presented in ascending `order`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub template_id: i64,
    pub text: String,
    pub order: i64,
}

/// A scored option for a question.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub value: i64,
}

/// A template assigned to, and optionally completed for, one visit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VisitAssessment {
    pub id: i64,
    pub visit_id: i64,
    pub template_id: i64,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_score: Option<i64>,
}

impl VisitAssessment {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// The choice selected for one question of a visit assessment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Answer {
    pub id: i64,
    pub visit_assessment_id: i64,
    pub question_id: i64,
    pub selected_choice_id: i64,
}

/// Template definition with nested questions and choices, inserted in one
/// transaction. This is also the `rct template import` file format.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<NewQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewQuestion {
    pub text: String,
    pub order: i64,
    pub choices: Vec<NewChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewChoice {
    pub text: String,
    pub value: i64,
}
