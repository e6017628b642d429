//! `rct add-wearable-data`: synthetic samples for demos and manual testing.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rct_core::entities::NewWearableSample;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AddWearableDataArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct GenerateReport {
    participant_id: String,
    inserted: usize,
}

/// Handle `rct add-wearable-data`.
pub async fn handle(
    args: &AddWearableDataArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let participant = ctx.service.get_participant(args.participant_pk).await?;
    let now = ctx.service.now().with_timezone(&Utc);
    let samples = synthetic_samples(&mut rand::thread_rng(), now, args.count);

    let inserted = ctx
        .service
        .add_wearable_samples(participant.id, &samples)
        .await?;
    tracing::info!(participant_pk = participant.id, inserted, "synthetic wearable data added");

    output(
        &GenerateReport {
            participant_id: participant.participant_id,
            inserted,
        },
        flags.format,
    )
}

/// `count` samples at random minutes within the 24 hours before `now`.
pub fn synthetic_samples<R: Rng>(rng: &mut R, now: DateTime<Utc>, count: usize) -> Vec<NewWearableSample> {
    (0..count)
        .map(|_| {
            let minutes_ago = rng.gen_range(1..=1440);
            let spo2: f64 = rng.gen_range(95.0..=99.5);
            NewWearableSample {
                timestamp: now - Duration::minutes(minutes_ago),
                heart_rate: Some(rng.gen_range(60..=100)),
                hrv: Some(rng.gen_range(20..=70)),
                blood_pressure_systolic: Some(rng.gen_range(110..=130)),
                blood_pressure_diastolic: Some(rng.gen_range(70..=85)),
                spo2: Some((spo2 * 100.0).round() / 100.0),
                respiratory_rate: Some(rng.gen_range(12..=20)),
                steps_count: Some(rng.gen_range(50..=200)),
            }
        })
        .collect()
}
