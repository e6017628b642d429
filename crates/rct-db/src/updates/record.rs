//! Column assignments for saving a validated data-entry form.
//!
//! Every form field is written on save (absent values become NULL), so a
//! save is a full replacement of the editable columns.

use rct_core::forms::{
    BiologicalSampleForm, ClinicalAssessmentForm, NeuroimagingForm, RecordForm,
};

pub struct RecordAssignments {
    pub columns: Vec<&'static str>,
    pub values: Vec<libsql::Value>,
}

impl RecordAssignments {
    fn push(&mut self, column: &'static str, value: impl Into<libsql::Value>) {
        self.columns.push(column);
        self.values.push(value.into());
    }
}

fn opt<T: Into<libsql::Value>>(value: Option<T>) -> libsql::Value {
    value.map_or(libsql::Value::Null, Into::into)
}

#[must_use]
pub fn record_assignments(form: &RecordForm) -> RecordAssignments {
    let mut a = RecordAssignments {
        columns: Vec::new(),
        values: Vec::new(),
    };
    match form {
        RecordForm::ClinicalFunctional(ClinicalAssessmentForm {
            moca_score,
            ntb_results_summary,
            nyha_class,
            six_minute_walk_test_meters,
            tug_test_seconds,
        }) => {
            a.push("moca_score", opt(*moca_score));
            a.push("ntb_results_summary", opt(ntb_results_summary.clone()));
            a.push("nyha_class", opt(nyha_class.clone()));
            a.push("six_minute_walk_test_meters", opt(*six_minute_walk_test_meters));
            a.push("tug_test_seconds", opt(*tug_test_seconds));
        }
        RecordForm::BiologicalSamples(BiologicalSampleForm {
            initial_blood_screening_summary,
            gfap,
            nfl,
            abeta40_42_ratio,
            ptau217,
        }) => {
            a.push(
                "initial_blood_screening_summary",
                opt(initial_blood_screening_summary.clone()),
            );
            a.push("gfap", opt(*gfap));
            a.push("nfl", opt(*nfl));
            a.push("abeta40_42_ratio", opt(*abeta40_42_ratio));
            a.push("ptau217", opt(*ptau217));
        }
        RecordForm::Neuroimaging(NeuroimagingForm {
            mri_completed,
            mri_key_findings,
        }) => {
            a.push("mri_completed", i64::from(*mri_completed));
            a.push("mri_key_findings", opt(mri_key_findings.clone()));
        }
    }
    a
}
