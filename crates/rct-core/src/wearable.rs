//! Wearable summary computation.
//!
//! The summary is computed from a slice of samples and the current time `now`
//! in the viewer's time zone. "Today" starts at local midnight of `now`; the
//! 24-hour window starts at `now - 24h`. The slice may contain samples outside
//! the window (the latest blood-pressure reading is taken from all of them).

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::entities::WearableDataPoint;

/// Length of the summary window.
pub const WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BloodPressureReading {
    pub timestamp: DateTime<Utc>,
    pub systolic: i64,
    pub diastolic: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Spo2Reading {
    pub timestamp: DateTime<Utc>,
    pub spo2: f64,
}

/// Parallel label/value sequences for a chart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ChartSeries<T> {
    /// `HH:MM` in the viewer's time zone.
    pub labels: Vec<String>,
    pub values: Vec<T>,
}

impl<T> ChartSeries<T> {
    fn push(&mut self, label: String, value: T) {
        self.labels.push(label);
        self.values.push(value);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct WearableSummary {
    pub window_start: DateTime<Utc>,
    pub today_start: DateTime<Utc>,
    pub samples_in_window: usize,
    pub latest_blood_pressure: Option<BloodPressureReading>,
    pub latest_spo2: Option<Spo2Reading>,
    pub avg_heart_rate_24h: Option<f64>,
    pub steps_today: Option<i64>,
    pub heart_rate_series: ChartSeries<i64>,
    pub spo2_series: ChartSeries<f64>,
}

/// Local midnight of `now`'s calendar day, in UTC.
#[must_use]
pub fn start_of_day<Tz>(now: &DateTime<Tz>) -> DateTime<Utc>
where
    Tz: TimeZone,
{
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map_or_else(
            // Midnight skipped by a DST change: fall back to wall-clock arithmetic.
            || now.with_timezone(&Utc) - (now.time() - NaiveTime::MIN),
            |dt| dt.with_timezone(&Utc),
        )
}

/// Compute the wearable summary for the samples of one participant.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize<Tz>(samples: &[WearableDataPoint], now: &DateTime<Tz>) -> WearableSummary
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let now_utc = now.with_timezone(&Utc);
    let window_start = now_utc - Duration::hours(WINDOW_HOURS);
    let today_start = start_of_day(now);
    let tz = now.timezone();

    let mut window: Vec<&WearableDataPoint> = samples
        .iter()
        .filter(|s| s.timestamp >= window_start)
        .collect();
    window.sort_by_key(|s| s.timestamp);

    let latest_blood_pressure = samples
        .iter()
        .filter(|s| s.blood_pressure_systolic.is_some())
        .max_by_key(|s| s.timestamp)
        .and_then(|s| {
            s.blood_pressure_systolic.map(|systolic| BloodPressureReading {
                timestamp: s.timestamp,
                systolic,
                diastolic: s.blood_pressure_diastolic,
            })
        });

    let latest_spo2 = window.iter().rev().find_map(|s| {
        s.spo2.map(|spo2| Spo2Reading {
            timestamp: s.timestamp,
            spo2,
        })
    });

    let heart_rates: Vec<i64> = window.iter().filter_map(|s| s.heart_rate).collect();
    let avg_heart_rate_24h = if heart_rates.is_empty() {
        None
    } else {
        Some(heart_rates.iter().sum::<i64>() as f64 / heart_rates.len() as f64)
    };

    let steps: Vec<i64> = samples
        .iter()
        .filter(|s| s.timestamp >= today_start)
        .filter_map(|s| s.steps_count)
        .collect();
    let steps_today = if steps.is_empty() {
        None
    } else {
        Some(steps.iter().sum())
    };

    let mut heart_rate_series = ChartSeries::default();
    let mut spo2_series = ChartSeries::default();
    for s in &window {
        let label = s.timestamp.with_timezone(&tz).format("%H:%M").to_string();
        if let Some(hr) = s.heart_rate {
            heart_rate_series.push(label.clone(), hr);
        }
        if let Some(spo2) = s.spo2 {
            spo2_series.push(label, spo2);
        }
    }

    WearableSummary {
        window_start,
        today_start,
        samples_in_window: window.len(),
        latest_blood_pressure,
        latest_spo2,
        avg_heart_rate_24h,
        steps_today,
        heart_rate_series,
        spo2_series,
    }
}
