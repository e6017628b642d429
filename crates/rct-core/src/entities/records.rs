use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Clinical and functional assessment results for one visit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClinicalAssessment {
    pub id: i64,
    pub visit_id: i64,
    /// Montreal Cognitive Assessment score.
    pub moca_score: Option<i64>,
    /// Neuropsychological test battery summary.
    pub ntb_results_summary: Option<String>,
    /// NYHA functional classification.
    pub nyha_class: Option<String>,
    pub six_minute_walk_test_meters: Option<f64>,
    /// Timed up-and-go.
    pub tug_test_seconds: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

/// Biological sample results for one visit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BiologicalSample {
    pub id: i64,
    pub visit_id: i64,
    /// B12, folate, thyroid, liver, kidney function.
    pub initial_blood_screening_summary: Option<String>,
    pub gfap: Option<f64>,
    pub nfl: Option<f64>,
    pub abeta40_42_ratio: Option<f64>,
    pub ptau217: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

/// Neuroimaging confirmation for one visit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Neuroimaging {
    pub id: i64,
    pub visit_id: i64,
    pub mri_completed: bool,
    /// Path of the uploaded report, relative to the media root.
    pub mri_report: Option<String>,
    pub mri_key_findings: Option<String>,
    pub updated_at: DateTime<Utc>,
}
