use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One timestamped, passively collected physiological reading.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct WearableDataPoint {
    pub id: i64,
    pub participant_id: i64,
    pub timestamp: DateTime<Utc>,
    pub heart_rate: Option<i64>,
    /// Heart rate variability.
    pub hrv: Option<i64>,
    pub blood_pressure_systolic: Option<i64>,
    pub blood_pressure_diastolic: Option<i64>,
    pub spo2: Option<f64>,
    pub respiratory_rate: Option<i64>,
    pub steps_count: Option<i64>,
}

/// A sample to be inserted; the owning participant is given separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewWearableSample {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub heart_rate: Option<i64>,
    #[serde(default)]
    pub hrv: Option<i64>,
    #[serde(default)]
    pub blood_pressure_systolic: Option<i64>,
    #[serde(default)]
    pub blood_pressure_diastolic: Option<i64>,
    #[serde(default)]
    pub spo2: Option<f64>,
    #[serde(default)]
    pub respiratory_rate: Option<i64>,
    #[serde(default)]
    pub steps_count: Option<i64>,
}
