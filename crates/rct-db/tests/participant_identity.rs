//! Identifier assignment across connections sharing one database file.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rct_core::entities::{NewParticipant, NewStudy};
use rct_core::enums::Gender;
use rct_core::identity::parse_sequence_suffix;
use rct_db::service::RctService;

fn participant(study_id: i64) -> NewParticipant {
    NewParticipant {
        study_id,
        date_of_birth: NaiveDate::from_ymd_opt(1948, 11, 2).unwrap(),
        gender: Gender::Male,
        assigned_group_name: None,
        participant_id: None,
    }
}

async fn study(svc: &RctService) -> i64 {
    svc.create_study(&NewStudy {
        name: "DIGI-HEART".to_string(),
        description: None,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        end_date: None,
    })
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn suffixes_strictly_increase_in_creation_order() {
    let svc = RctService::new_local(":memory:").await.unwrap();
    let study_id = study(&svc).await;

    let mut last = 0;
    for _ in 0..25 {
        let created = svc.create_participant(participant(study_id)).await.unwrap();
        let seq = parse_sequence_suffix(&created.participant.participant_id);
        assert!(seq > last, "{seq} should follow {last}");
        last = seq;
    }
    assert_eq!(last, 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_on_one_file_get_distinct_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rct.db");
    let path = path.to_str().unwrap();

    let first = Arc::new(RctService::new_local(path).await.unwrap());
    let second = Arc::new(RctService::new_local(path).await.unwrap());
    let study_id = study(&first).await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let svc = if i % 2 == 0 { Arc::clone(&first) } else { Arc::clone(&second) };
        handles.push(tokio::spawn(async move {
            svc.create_participant(participant(study_id)).await.unwrap()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        let created = handle.await.unwrap();
        assert!(ids.insert(created.participant.participant_id.clone()));
        assert_eq!(created.baseline_visit.participant_id, created.participant.id);
    }
    assert_eq!(ids.len(), 20);

    let all = first.list_participants(100).await.unwrap();
    let mut seqs: Vec<u32> = all.iter().map(|p| parse_sequence_suffix(&p.participant_id)).collect();
    seqs.sort_unstable();
    assert_eq!(seqs, (1..=20).collect::<Vec<u32>>());
}

#[tokio::test]
async fn reopening_a_file_keeps_the_counter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rct.db");
    let path = path.to_str().unwrap();

    let study_id = {
        let svc = RctService::new_local(path).await.unwrap();
        let study_id = study(&svc).await;
        svc.create_participant(participant(study_id)).await.unwrap();
        study_id
    };

    let svc = RctService::new_local(path).await.unwrap();
    let created = svc.create_participant(participant(study_id)).await.unwrap();
    assert_eq!(created.participant.participant_id, format!("DG-{study_id}-0002"));
}
