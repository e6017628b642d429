//! Editable fields of the per-visit data-entry records.
//!
//! A form carries every user-editable column of its record (the visit link
//! and `updated_at` are managed by the store). Saving replaces all columns,
//! so an omitted optional field clears the stored value.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::category::DataCategory;
use crate::errors::CoreError;
use crate::validation::{ValidationErrors, check_decimal, check_max_len};

/// Highest possible MoCA score.
pub const MOCA_MAX: i64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClinicalAssessmentForm {
    #[serde(default)]
    pub moca_score: Option<i64>,
    #[serde(default)]
    pub ntb_results_summary: Option<String>,
    #[serde(default)]
    pub nyha_class: Option<String>,
    #[serde(default)]
    pub six_minute_walk_test_meters: Option<f64>,
    #[serde(default)]
    pub tug_test_seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BiologicalSampleForm {
    #[serde(default)]
    pub initial_blood_screening_summary: Option<String>,
    #[serde(default)]
    pub gfap: Option<f64>,
    #[serde(default)]
    pub nfl: Option<f64>,
    #[serde(default)]
    pub abeta40_42_ratio: Option<f64>,
    #[serde(default)]
    pub ptau217: Option<f64>,
}

/// The MRI report file is attached separately and is not part of the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NeuroimagingForm {
    #[serde(default)]
    pub mri_completed: bool,
    #[serde(default)]
    pub mri_key_findings: Option<String>,
}

/// Blank text is stored as NULL.
fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

impl ClinicalAssessmentForm {
    /// Normalize text fields and check every column constraint.
    ///
    /// # Errors
    ///
    /// Returns all field errors found.
    pub fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(score) = self.moca_score
            && !(0..=MOCA_MAX).contains(&score)
        {
            errors.push("moca_score", format!("must be between 0 and {MOCA_MAX}"));
        }

        // Free text: mixed classes such as "II-III" or "N/A" are recorded as entered.
        let nyha_class = blank_to_none(self.nyha_class);
        check_max_len(&mut errors, "nyha_class", nyha_class.as_deref(), 10);

        check_decimal(
            &mut errors,
            "six_minute_walk_test_meters",
            self.six_minute_walk_test_meters,
            6,
            2,
        );
        check_decimal(&mut errors, "tug_test_seconds", self.tug_test_seconds, 5, 2);

        errors.into_result(Self {
            moca_score: self.moca_score,
            ntb_results_summary: blank_to_none(self.ntb_results_summary),
            nyha_class,
            six_minute_walk_test_meters: self.six_minute_walk_test_meters,
            tug_test_seconds: self.tug_test_seconds,
        })
    }
}

impl BiologicalSampleForm {
    /// # Errors
    ///
    /// Returns all field errors found.
    pub fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_decimal(&mut errors, "gfap", self.gfap, 10, 4);
        check_decimal(&mut errors, "nfl", self.nfl, 10, 4);
        check_decimal(&mut errors, "abeta40_42_ratio", self.abeta40_42_ratio, 10, 4);
        check_decimal(&mut errors, "ptau217", self.ptau217, 10, 4);

        errors.into_result(Self {
            initial_blood_screening_summary: blank_to_none(self.initial_blood_screening_summary),
            ..self
        })
    }
}

impl NeuroimagingForm {
    /// # Errors
    ///
    /// Never fails today; kept fallible so every form has the same shape.
    pub fn validate(self) -> Result<Self, ValidationErrors> {
        Ok(Self {
            mri_completed: self.mri_completed,
            mri_key_findings: blank_to_none(self.mri_key_findings),
        })
    }
}

/// A submitted form for any category.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "category", content = "form", rename_all = "kebab-case")]
pub enum RecordForm {
    ClinicalFunctional(ClinicalAssessmentForm),
    BiologicalSamples(BiologicalSampleForm),
    Neuroimaging(NeuroimagingForm),
}

impl RecordForm {
    /// Decode a JSON body as the form of `category`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` with a `body` error when the JSON does
    /// not match the form shape.
    pub fn from_json(category: DataCategory, body: serde_json::Value) -> Result<Self, CoreError> {
        let decoded = match category {
            DataCategory::ClinicalFunctional => {
                serde_json::from_value(body).map(Self::ClinicalFunctional)
            }
            DataCategory::BiologicalSamples => {
                serde_json::from_value(body).map(Self::BiologicalSamples)
            }
            DataCategory::Neuroimaging => serde_json::from_value(body).map(Self::Neuroimaging),
        };
        decoded.map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.push("body", e.to_string());
            CoreError::Validation(errors)
        })
    }

    #[must_use]
    pub const fn category(&self) -> DataCategory {
        match self {
            Self::ClinicalFunctional(_) => DataCategory::ClinicalFunctional,
            Self::BiologicalSamples(_) => DataCategory::BiologicalSamples,
            Self::Neuroimaging(_) => DataCategory::Neuroimaging,
        }
    }

    /// Validate the inner form.
    ///
    /// # Errors
    ///
    /// Returns the inner form's field errors.
    pub fn validate(self) -> Result<Self, ValidationErrors> {
        Ok(match self {
            Self::ClinicalFunctional(f) => Self::ClinicalFunctional(f.validate()?),
            Self::BiologicalSamples(f) => Self::BiologicalSamples(f.validate()?),
            Self::Neuroimaging(f) => Self::Neuroimaging(f.validate()?),
        })
    }
}
