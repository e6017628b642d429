//! Participant repository: creation with identifier assignment, lookups,
//! status changes.
//!
//! Generated identifiers come from the `participant_sequences` counter,
//! advanced inside the same `IMMEDIATE` transaction that inserts the
//! participant and its Baseline visit.

use chrono::NaiveDate;
use libsql::{Connection, TransactionBehavior};
use rct_core::entities::{NewParticipant, Participant, Visit};
use rct_core::enums::{ParticipantStatus, VisitType};
use rct_core::identity::{
    PARTICIPANT_PREFIX, format_participant_id, normalize_explicit_id, parse_sequence_suffix,
};
use rct_core::responses::{ParticipantCreated, ParticipantDetail, VisitTypeOption};
use rct_core::validation::{ValidationErrors, check_max_len};
use tracing::debug;

use crate::error::DatabaseError;
use crate::helpers::{
    finish_transaction, format_date, get_opt_string, insert_returning_id, is_unique_violation,
    parse_date, parse_enum, parse_optional_date,
};
use crate::repos::study::fetch_study;
use crate::repos::visit::{fetch_visits, insert_visit};
use crate::retry::is_busy_error;
use crate::service::RctService;
use crate::updates::participant::{ParticipantUpdate, ParticipantUpdateBuilder};
use crate::updates::set_clause;

const PARTICIPANT_COLS: &str = "id, participant_id, study_id, status, enrollment_date, assigned_group_name, date_of_birth, gender";
const MAX_GROUP_LEN: usize = 100;
const RECENT_LIMIT: u32 = 10;

fn row_to_participant(row: &libsql::Row) -> Result<Participant, DatabaseError> {
    Ok(Participant {
        id: row.get(0)?,
        participant_id: row.get(1)?,
        study_id: row.get(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        enrollment_date: parse_optional_date(get_opt_string(row, 4)?.as_deref())?,
        assigned_group_name: get_opt_string(row, 5)?,
        date_of_birth: parse_date(&row.get::<String>(6)?)?,
        gender: parse_enum(&row.get::<String>(7)?)?,
    })
}

pub(crate) async fn fetch_participant(
    conn: &Connection,
    id: i64,
) -> Result<Participant, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {PARTICIPANT_COLS} FROM participants WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(DatabaseError::not_found("participant", id))?;
    row_to_participant(&row)
}

/// Highest parsed suffix among the study's existing generated-style
/// identifiers (`DG-<study_id>-...`).
///
/// Used only when the study has no counter row yet. Suffixes that do not
/// parse count as 0; explicit identifiers in other formats are ignored.
async fn seed_sequence(conn: &Connection, study_id: i64) -> Result<u32, DatabaseError> {
    let prefix = format!("{PARTICIPANT_PREFIX}-{study_id}-");
    let mut rows = conn
        .query(
            "SELECT participant_id FROM participants WHERE study_id = ?1",
            [study_id],
        )
        .await?;
    let mut max = 0;
    while let Some(row) = rows.next().await? {
        let pid: String = row.get(0)?;
        if !pid.starts_with(&prefix) {
            continue;
        }
        let seq = parse_sequence_suffix(&pid);
        if seq == 0 {
            debug!(participant_id = %pid, "identifier suffix is not numeric, counted as 0");
        }
        max = max.max(seq);
    }
    Ok(max)
}

/// Advance the study's counter and return the new sequence number.
async fn next_sequence(conn: &Connection, study_id: i64) -> Result<u32, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT last_seq FROM participant_sequences WHERE study_id = ?1",
            [study_id],
        )
        .await?;
    let has_counter = rows.next().await?.is_some();
    drop(rows);

    let seed = if has_counter {
        0
    } else {
        seed_sequence(conn, study_id).await?
    };

    let mut rows = conn
        .query(
            "INSERT INTO participant_sequences (study_id, last_seq) VALUES (?1, ?2 + 1)
             ON CONFLICT(study_id) DO UPDATE SET last_seq = last_seq + 1
             RETURNING last_seq",
            libsql::params![study_id, i64::from(seed)],
        )
        .await?;
    let last: i64 = rows.next().await?.ok_or(DatabaseError::NoResult)?.get(0)?;
    u32::try_from(last).map_err(|_| {
        DatabaseError::InvalidState(format!("participant sequence {last} out of range for study {study_id}"))
    })
}

/// Lift the study's counter to at least the highest generated-style suffix in
/// use, so the next [`next_sequence`] skips every identifier taken out of band.
async fn raise_sequence(conn: &Connection, study_id: i64) -> Result<(), DatabaseError> {
    let floor = seed_sequence(conn, study_id).await?;
    conn.execute(
        "UPDATE participant_sequences SET last_seq = MAX(last_seq, ?2) WHERE study_id = ?1",
        libsql::params![study_id, i64::from(floor)],
    )
    .await?;
    Ok(())
}

fn validate_new_participant(new: &NewParticipant) -> Result<Option<String>, DatabaseError> {
    let mut errors = ValidationErrors::new();
    check_max_len(
        &mut errors,
        "assigned_group_name",
        new.assigned_group_name.as_deref(),
        MAX_GROUP_LEN,
    );
    errors.into_result(())?;
    new.participant_id
        .as_deref()
        .map(normalize_explicit_id)
        .transpose()
        .map_err(DatabaseError::from)
}

struct InsertedParticipant {
    id: i64,
    participant_id: String,
    baseline_visit: Visit,
}

impl RctService {
    /// Create a participant and its Baseline visit in one transaction.
    ///
    /// Without an explicit identifier, the next `DG-<study>-<seq>` identifier
    /// is assigned. An explicit identifier is stored as given (trimmed) and
    /// does not consume a sequence number.
    pub async fn create_participant(
        &self,
        new: NewParticipant,
    ) -> Result<ParticipantCreated, DatabaseError> {
        let explicit_id = validate_new_participant(&new)?;
        let group = new
            .assigned_group_name
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from);
        let today = self.today();
        let conn = self.db().conn().await;
        fetch_study(&conn, new.study_id).await?;

        let mut attempt = 1;
        let inserted = loop {
            match self
                .insert_participant_tx(&conn, &new, explicit_id.as_deref(), group.as_deref(), today)
                .await
            {
                Err(DatabaseError::LibSql(e))
                    if is_busy_error(&e) && attempt < self.retry().max_attempts =>
                {
                    let delay = self.retry().backoff(attempt);
                    debug!(attempt, ?delay, "database busy, retrying participant insert");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => break other?,
            }
        };

        debug!(
            participant_pk = inserted.id,
            participant_id = %inserted.participant_id,
            study_id = new.study_id,
            "participant created"
        );

        Ok(ParticipantCreated {
            participant: Participant {
                id: inserted.id,
                participant_id: inserted.participant_id,
                study_id: new.study_id,
                status: ParticipantStatus::default(),
                enrollment_date: None,
                assigned_group_name: group,
                date_of_birth: new.date_of_birth,
                gender: new.gender,
            },
            baseline_visit: inserted.baseline_visit,
        })
    }

    async fn insert_participant_tx(
        &self,
        conn: &Connection,
        new: &NewParticipant,
        explicit_id: Option<&str>,
        group: Option<&str>,
        today: NaiveDate,
    ) -> Result<InsertedParticipant, DatabaseError> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        let result = self
            .insert_participant_rows(&tx, new, explicit_id, group, today)
            .await;
        finish_transaction(tx, result).await
    }

    async fn insert_participant_rows(
        &self,
        conn: &Connection,
        new: &NewParticipant,
        explicit_id: Option<&str>,
        group: Option<&str>,
        today: NaiveDate,
    ) -> Result<InsertedParticipant, DatabaseError> {
        let max_attempts = self.retry().max_attempts;
        let mut attempt = 1;
        let (id, participant_id) = loop {
            let participant_id = match explicit_id {
                Some(explicit) => explicit.to_string(),
                None => format_participant_id(new.study_id, next_sequence(conn, new.study_id).await?),
            };

            let result = insert_returning_id(
                conn,
                "INSERT INTO participants (participant_id, study_id, status, assigned_group_name, date_of_birth, gender)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
                libsql::params![
                    participant_id.as_str(),
                    new.study_id,
                    ParticipantStatus::default().as_str(),
                    group,
                    format_date(new.date_of_birth),
                    new.gender.as_str()
                ],
            )
            .await;

            match result {
                Ok(id) => break (id.ok_or(DatabaseError::NoResult)?, participant_id),
                Err(e) if is_unique_violation(&e, "participants.participant_id") => {
                    if explicit_id.is_some() {
                        return Err(DatabaseError::Duplicate(format!(
                            "Participant ID '{participant_id}' is already in use."
                        )));
                    }
                    if attempt >= max_attempts {
                        return Err(DatabaseError::InvalidState(format!(
                            "could not assign a free participant ID for study {} after {attempt} attempts",
                            new.study_id
                        )));
                    }
                    debug!(participant_id = %participant_id, attempt, "participant ID collision, raising sequence");
                    raise_sequence(conn, new.study_id).await?;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        let baseline_visit = insert_visit(conn, id, VisitType::Baseline, today).await?;
        Ok(InsertedParticipant {
            id,
            participant_id,
            baseline_visit,
        })
    }

    pub async fn get_participant(&self, id: i64) -> Result<Participant, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_participant(&conn, id).await
    }

    /// Participants, newest first.
    pub async fn list_participants(&self, limit: u32) -> Result<Vec<Participant>, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query(
                &format!("SELECT {PARTICIPANT_COLS} FROM participants ORDER BY id DESC LIMIT ?1"),
                [i64::from(limit)],
            )
            .await?;
        let mut participants = Vec::new();
        while let Some(row) = rows.next().await? {
            participants.push(row_to_participant(&row)?);
        }
        Ok(participants)
    }

    /// The ten most recently created participants, for the dashboard.
    pub async fn recent_participants(&self) -> Result<Vec<Participant>, DatabaseError> {
        self.list_participants(RECENT_LIMIT).await
    }

    /// Participant with its visits and the visit types still available.
    pub async fn participant_detail(&self, id: i64) -> Result<ParticipantDetail, DatabaseError> {
        let conn = self.db().conn().await;
        let participant = fetch_participant(&conn, id).await?;
        let visits = fetch_visits(&conn, id).await?;
        let existing: Vec<VisitType> = visits.iter().map(|v| v.visit_type).collect();
        let creatable_visits = VisitType::creatable(&existing)
            .into_iter()
            .map(VisitTypeOption::from)
            .collect();
        Ok(ParticipantDetail {
            participant,
            visits,
            creatable_visits,
        })
    }

    pub async fn update_participant(
        &self,
        id: i64,
        update: ParticipantUpdate,
    ) -> Result<Participant, DatabaseError> {
        let mut errors = ValidationErrors::new();
        if let Some(Some(group)) = &update.assigned_group_name {
            check_max_len(&mut errors, "assigned_group_name", Some(group), MAX_GROUP_LEN);
        }
        errors.into_result(())?;

        let conn = self.db().conn().await;
        if update.is_empty() {
            return fetch_participant(&conn, id).await;
        }

        let mut columns = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(status) = update.status {
            columns.push("status");
            params.push(status.as_str().into());
        }
        if let Some(group) = &update.assigned_group_name {
            columns.push("assigned_group_name");
            params.push(group.as_deref().into());
        }
        if let Some(date) = update.enrollment_date {
            columns.push("enrollment_date");
            params.push(date.map(format_date).into());
        }
        let (sets, idx) = set_clause(&columns);
        params.push(id.into());

        let changed = conn
            .execute(
                &format!("UPDATE participants SET {sets} WHERE id = ?{idx}"),
                libsql::params_from_iter(params),
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::not_found("participant", id));
        }
        debug!(participant_pk = id, ?update, "participant updated");
        fetch_participant(&conn, id).await
    }

    /// Change a participant's status. Moving to `ENROLLED` also stamps the
    /// enrollment date with today, unless one is already recorded.
    pub async fn update_participant_status(
        &self,
        id: i64,
        status: ParticipantStatus,
    ) -> Result<Participant, DatabaseError> {
        let current = self.get_participant(id).await?;
        let mut builder = ParticipantUpdateBuilder::new().status(status);
        if status == ParticipantStatus::Enrolled && current.enrollment_date.is_none() {
            builder = builder.enrollment_date(Some(self.today()));
        }
        self.update_participant(id, builder.build()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{
        create_test_study, enrolled_participant, new_participant, test_service,
    };
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn first_participant_gets_sequence_one() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "S").await;

        let created = svc.create_participant(new_participant(study.id)).await.unwrap();
        assert_eq!(created.participant.participant_id, format!("DG-{}-0001", study.id));
        assert_eq!(created.participant.status, ParticipantStatus::Screening);
        assert_eq!(created.baseline_visit.visit_type, VisitType::Baseline);
        assert_eq!(created.baseline_visit.visit_date, svc.today());
        assert!(!created.baseline_visit.is_complete);

        let fetched = svc.get_participant(created.participant.id).await.unwrap();
        assert_eq!(fetched, created.participant);
    }

    #[tokio::test]
    async fn sequences_are_per_study() {
        let svc = test_service().await;
        let a = create_test_study(&svc, "A").await;
        let b = create_test_study(&svc, "B").await;

        let a1 = svc.create_participant(new_participant(a.id)).await.unwrap();
        let b1 = svc.create_participant(new_participant(b.id)).await.unwrap();
        let a2 = svc.create_participant(new_participant(a.id)).await.unwrap();

        assert_eq!(a1.participant.participant_id, format!("DG-{}-0001", a.id));
        assert_eq!(b1.participant.participant_id, format!("DG-{}-0001", b.id));
        assert_eq!(a2.participant.participant_id, format!("DG-{}-0002", a.id));
    }

    #[tokio::test]
    async fn explicit_id_is_kept_and_consumes_no_sequence() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "S").await;

        let mut explicit = new_participant(study.id);
        explicit.participant_id = Some("  LEGACY-17 ".to_string());
        let legacy = svc.create_participant(explicit).await.unwrap();
        assert_eq!(legacy.participant.participant_id, "LEGACY-17");

        let generated = svc.create_participant(new_participant(study.id)).await.unwrap();
        assert_eq!(generated.participant.participant_id, format!("DG-{}-0001", study.id));
    }

    #[tokio::test]
    async fn duplicate_explicit_id_is_rejected() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "S").await;
        let mut first = new_participant(study.id);
        first.participant_id = Some("P-1".to_string());
        svc.create_participant(first.clone()).await.unwrap();

        let err = svc.create_participant(first).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(_)), "got {err:?}");
        assert_eq!(svc.list_participants(50).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn counter_is_seeded_from_existing_identifiers() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "S").await;
        {
            let conn = svc.db().conn().await;
            for pid in [format!("DG-{}-0007", study.id), format!("DG-{}-00x2", study.id)] {
                conn.execute(
                    "INSERT INTO participants (participant_id, study_id, date_of_birth, gender)
                     VALUES (?1, ?2, '1950-01-01', 'MALE')",
                    libsql::params![pid, study.id],
                )
                .await
                .unwrap();
            }
        }

        let created = svc.create_participant(new_participant(study.id)).await.unwrap();
        assert_eq!(created.participant.participant_id, format!("DG-{}-0008", study.id));
    }

    #[tokio::test]
    async fn collision_advances_the_counter() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "S").await;
        svc.create_participant(new_participant(study.id)).await.unwrap();

        // An identifier the counter will produce next, inserted out of band.
        let mut squatter = new_participant(study.id);
        squatter.participant_id = Some(format!("DG-{}-0002", study.id));
        svc.create_participant(squatter).await.unwrap();

        let created = svc.create_participant(new_participant(study.id)).await.unwrap();
        assert_eq!(created.participant.participant_id, format!("DG-{}-0003", study.id));
    }

    #[tokio::test]
    async fn run_of_taken_identifiers_is_skipped_in_one_step() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "S").await;
        svc.create_participant(new_participant(study.id)).await.unwrap();

        // More consecutive identifiers taken than there are retry attempts.
        let taken = svc.retry().max_attempts + 3;
        for seq in 2..2 + taken {
            let mut explicit = new_participant(study.id);
            explicit.participant_id = Some(format_participant_id(study.id, seq));
            svc.create_participant(explicit).await.unwrap();
        }

        let created = svc.create_participant(new_participant(study.id)).await.unwrap();
        assert_eq!(
            created.participant.participant_id,
            format_participant_id(study.id, 2 + taken)
        );

        let next = svc.create_participant(new_participant(study.id)).await.unwrap();
        assert_eq!(
            next.participant.participant_id,
            format_participant_id(study.id, 3 + taken)
        );
    }

    #[tokio::test]
    async fn unknown_study_creates_nothing() {
        let svc = test_service().await;
        let err = svc.create_participant(new_participant(99)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { entity: "study", .. }));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_recent_is_capped() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "S").await;
        for _ in 0..12 {
            svc.create_participant(new_participant(study.id)).await.unwrap();
        }
        let recent = svc.recent_participants().await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].participant_id, format!("DG-{}-0012", study.id));
        assert!(recent.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test]
    async fn detail_lists_creatable_visits() {
        let svc = test_service().await;
        let created = enrolled_participant(&svc).await;
        let detail = svc.participant_detail(created.participant.id).await.unwrap();
        assert_eq!(detail.visits, vec![created.baseline_visit]);
        let codes: Vec<VisitType> = detail.creatable_visits.iter().map(|o| o.code).collect();
        assert_eq!(codes, vec![VisitType::Visit1, VisitType::Visit2, VisitType::Exit]);
    }

    #[tokio::test]
    async fn enrolling_stamps_enrollment_date_once() {
        let svc = test_service().await;
        let created = enrolled_participant(&svc).await;
        let pk = created.participant.id;

        let enrolled = svc
            .update_participant_status(pk, ParticipantStatus::Enrolled)
            .await
            .unwrap();
        assert_eq!(enrolled.status, ParticipantStatus::Enrolled);
        assert_eq!(enrolled.enrollment_date, Some(svc.today()));

        let earlier = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        svc.update_participant(
            pk,
            ParticipantUpdateBuilder::new()
                .enrollment_date(Some(earlier))
                .build(),
        )
        .await
        .unwrap();
        let again = svc
            .update_participant_status(pk, ParticipantStatus::Enrolled)
            .await
            .unwrap();
        assert_eq!(again.enrollment_date, Some(earlier));

        let withdrawn = svc
            .update_participant_status(pk, ParticipantStatus::Withdrawn)
            .await
            .unwrap();
        assert_eq!(withdrawn.status, ParticipantStatus::Withdrawn);
        assert_eq!(withdrawn.enrollment_date, Some(earlier));
    }

    #[tokio::test]
    async fn group_name_is_trimmed_and_length_checked() {
        let svc = test_service().await;
        let study = create_test_study(&svc, "S").await;
        let mut new = new_participant(study.id);
        new.assigned_group_name = Some(" Intervention ".to_string());
        let created = svc.create_participant(new).await.unwrap();
        assert_eq!(created.participant.assigned_group_name.as_deref(), Some("Intervention"));

        let mut too_long = new_participant(study.id);
        too_long.assigned_group_name = Some("x".repeat(101));
        let err = svc.create_participant(too_long).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }
}
