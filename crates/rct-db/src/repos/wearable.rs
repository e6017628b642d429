//! Wearable samples: batch insert, listing, and the 24-hour summary.

use std::fmt::Display;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use libsql::Connection;
use rct_core::entities::{NewWearableSample, WearableDataPoint};
use rct_core::responses::WearableDashboard;
use rct_core::validation::{ValidationErrors, check_decimal};
use rct_core::wearable::{WINDOW_HOURS, start_of_day, summarize};

use crate::error::DatabaseError;
use crate::helpers::{finish_transaction, format_datetime, parse_datetime};
use crate::repos::participant::fetch_participant;
use crate::service::RctService;

const SAMPLE_COLS: &str = "id, participant_id, timestamp, heart_rate, hrv, blood_pressure_systolic, blood_pressure_diastolic, spo2, respiratory_rate, steps_count";

fn row_to_sample(row: &libsql::Row) -> Result<WearableDataPoint, DatabaseError> {
    Ok(WearableDataPoint {
        id: row.get(0)?,
        participant_id: row.get(1)?,
        timestamp: parse_datetime(&row.get::<String>(2)?)?,
        heart_rate: row.get(3)?,
        hrv: row.get(4)?,
        blood_pressure_systolic: row.get(5)?,
        blood_pressure_diastolic: row.get(6)?,
        spo2: row.get(7)?,
        respiratory_rate: row.get(8)?,
        steps_count: row.get(9)?,
    })
}

async fn collect_samples(mut rows: libsql::Rows) -> Result<Vec<WearableDataPoint>, DatabaseError> {
    let mut samples = Vec::new();
    while let Some(row) = rows.next().await? {
        samples.push(row_to_sample(&row)?);
    }
    Ok(samples)
}

fn validate_samples(samples: &[NewWearableSample]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for (i, sample) in samples.iter().enumerate() {
        check_decimal(&mut errors, &format!("samples[{i}].spo2"), sample.spo2, 5, 2);
    }
    errors.into_result(())
}

async fn insert_samples(
    conn: &Connection,
    participant_pk: i64,
    samples: &[NewWearableSample],
) -> Result<usize, DatabaseError> {
    for s in samples {
        conn.execute(
            "INSERT INTO wearable_data_points (participant_id, timestamp, heart_rate, hrv,
                 blood_pressure_systolic, blood_pressure_diastolic, spo2, respiratory_rate, steps_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            libsql::params![
                participant_pk,
                format_datetime(&s.timestamp),
                s.heart_rate,
                s.hrv,
                s.blood_pressure_systolic,
                s.blood_pressure_diastolic,
                s.spo2,
                s.respiratory_rate,
                s.steps_count
            ],
        )
        .await?;
    }
    Ok(samples.len())
}

impl RctService {
    /// Insert a batch of samples for one participant in a single transaction.
    pub async fn add_wearable_samples(
        &self,
        participant_pk: i64,
        samples: &[NewWearableSample],
    ) -> Result<usize, DatabaseError> {
        validate_samples(samples)?;
        let conn = self.db().conn().await;
        fetch_participant(&conn, participant_pk).await?;

        let tx = conn.transaction().await?;
        let result = insert_samples(&tx, participant_pk, samples).await;
        let inserted = finish_transaction(tx, result).await?;
        tracing::debug!(participant_pk, inserted, "wearable samples stored");
        Ok(inserted)
    }

    /// Most recent samples first.
    pub async fn list_wearable_samples(
        &self,
        participant_pk: i64,
        limit: u32,
    ) -> Result<Vec<WearableDataPoint>, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_participant(&conn, participant_pk).await?;
        let rows = conn
            .query(
                &format!(
                    "SELECT {SAMPLE_COLS} FROM wearable_data_points
                     WHERE participant_id = ?1 ORDER BY timestamp DESC, id DESC LIMIT ?2"
                ),
                [participant_pk, i64::from(limit)],
            )
            .await?;
        collect_samples(rows).await
    }

    /// Summary of the participant's samples as seen at `now`.
    pub async fn wearable_summary<Tz>(
        &self,
        participant_pk: i64,
        now: &DateTime<Tz>,
    ) -> Result<WearableDashboard, DatabaseError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let conn = self.db().conn().await;
        let participant = fetch_participant(&conn, participant_pk).await?;

        let window_start = now.with_timezone(&Utc) - Duration::hours(WINDOW_HOURS);
        let since = window_start.min(start_of_day(now));
        let rows = conn
            .query(
                &format!(
                    "SELECT {SAMPLE_COLS} FROM wearable_data_points
                     WHERE participant_id = ?1 AND timestamp >= ?2 ORDER BY timestamp"
                ),
                libsql::params![participant_pk, format_datetime(&since)],
            )
            .await?;
        let mut samples = collect_samples(rows).await?;

        // The latest blood pressure may be older than the window.
        let rows = conn
            .query(
                &format!(
                    "SELECT {SAMPLE_COLS} FROM wearable_data_points
                     WHERE participant_id = ?1 AND blood_pressure_systolic IS NOT NULL
                     ORDER BY timestamp DESC LIMIT 1"
                ),
                [participant_pk],
            )
            .await?;
        for sample in collect_samples(rows).await? {
            if sample.timestamp < since {
                samples.push(sample);
            }
        }

        Ok(WearableDashboard {
            participant,
            summary: summarize(&samples, now),
        })
    }

    /// Summary as of the service clock.
    ///
    /// Without a fixed offset the system zone is passed through, so local
    /// midnight follows its DST rules.
    pub async fn wearable_dashboard(
        &self,
        participant_pk: i64,
    ) -> Result<WearableDashboard, DatabaseError> {
        match self.fixed_offset() {
            Some(offset) => {
                let now = Utc::now().with_timezone(&offset);
                self.wearable_summary(participant_pk, &now).await
            }
            None => self.wearable_summary(participant_pk, &Local::now()).await,
        }
    }
}
