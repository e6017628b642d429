//! Visit repository: one visit per type per participant.

use chrono::NaiveDate;
use libsql::Connection;
use rct_core::entities::Visit;
use rct_core::enums::VisitType;

use crate::error::DatabaseError;
use crate::helpers::{format_date, get_bool, insert_returning_id, is_unique_violation, parse_date, parse_enum};
use crate::repos::participant::fetch_participant;
use crate::service::RctService;

const VISIT_COLS: &str = "id, participant_id, visit_type, visit_date, is_complete";

fn row_to_visit(row: &libsql::Row) -> Result<Visit, DatabaseError> {
    Ok(Visit {
        id: row.get(0)?,
        participant_id: row.get(1)?,
        visit_type: parse_enum(&row.get::<String>(2)?)?,
        visit_date: parse_date(&row.get::<String>(3)?)?,
        is_complete: get_bool(row, 4)?,
    })
}

fn duplicate_visit(visit_type: VisitType) -> DatabaseError {
    DatabaseError::Duplicate(format!(
        "A '{}' already exists for this participant.",
        visit_type.label()
    ))
}

/// Load a visit, scoped to its participant.
pub(crate) async fn fetch_visit(
    conn: &Connection,
    participant_pk: i64,
    visit_id: i64,
) -> Result<Visit, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {VISIT_COLS} FROM visits WHERE id = ?1 AND participant_id = ?2"),
            [visit_id, participant_pk],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(DatabaseError::not_found("visit", visit_id))?;
    row_to_visit(&row)
}

/// A participant's visits ordered by date, then id.
pub(crate) async fn fetch_visits(
    conn: &Connection,
    participant_pk: i64,
) -> Result<Vec<Visit>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {VISIT_COLS} FROM visits WHERE participant_id = ?1 ORDER BY visit_date, id"
            ),
            [participant_pk],
        )
        .await?;
    let mut visits = Vec::new();
    while let Some(row) = rows.next().await? {
        visits.push(row_to_visit(&row)?);
    }
    Ok(visits)
}

/// Insert a visit row. A second visit of the same type maps to
/// `DatabaseError::Duplicate`.
pub(crate) async fn insert_visit(
    conn: &Connection,
    participant_pk: i64,
    visit_type: VisitType,
    visit_date: NaiveDate,
) -> Result<Visit, DatabaseError> {
    let result = insert_returning_id(
        conn,
        "INSERT INTO visits (participant_id, visit_type, visit_date, is_complete)
         VALUES (?1, ?2, ?3, 0) RETURNING id",
        libsql::params![participant_pk, visit_type.as_str(), format_date(visit_date)],
    )
    .await;
    let id = match result {
        Ok(id) => id.ok_or(DatabaseError::NoResult)?,
        Err(e) if is_unique_violation(&e, "visits.participant_id") => {
            return Err(duplicate_visit(visit_type));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(visit_id = id, participant_pk, visit_type = %visit_type, "visit created");
    Ok(Visit {
        id,
        participant_id: participant_pk,
        visit_type,
        visit_date,
        is_complete: false,
    })
}

impl RctService {
    /// Create a visit of the given type dated today.
    ///
    /// Fails with `DatabaseError::Duplicate` when the participant already has
    /// a visit of that type.
    pub async fn create_visit(
        &self,
        participant_pk: i64,
        visit_type: VisitType,
    ) -> Result<Visit, DatabaseError> {
        let today = self.today();
        let conn = self.db().conn().await;
        fetch_participant(&conn, participant_pk).await?;

        let mut rows = conn
            .query(
                "SELECT 1 FROM visits WHERE participant_id = ?1 AND visit_type = ?2",
                libsql::params![participant_pk, visit_type.as_str()],
            )
            .await?;
        if rows.next().await?.is_some() {
            return Err(duplicate_visit(visit_type));
        }
        drop(rows);

        insert_visit(&conn, participant_pk, visit_type, today).await
    }

    pub async fn get_visit(&self, participant_pk: i64, visit_id: i64) -> Result<Visit, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_visit(&conn, participant_pk, visit_id).await
    }

    pub async fn list_visits(&self, participant_pk: i64) -> Result<Vec<Visit>, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_participant(&conn, participant_pk).await?;
        fetch_visits(&conn, participant_pk).await
    }

    /// Visit types the participant does not have yet, in schedule order.
    pub async fn creatable_visit_types(
        &self,
        participant_pk: i64,
    ) -> Result<Vec<VisitType>, DatabaseError> {
        let existing: Vec<VisitType> = self
            .list_visits(participant_pk)
            .await?
            .into_iter()
            .map(|v| v.visit_type)
            .collect();
        Ok(VisitType::creatable(&existing))
    }

    pub async fn set_visit_complete(
        &self,
        participant_pk: i64,
        visit_id: i64,
        complete: bool,
    ) -> Result<Visit, DatabaseError> {
        let conn = self.db().conn().await;
        let mut visit = fetch_visit(&conn, participant_pk, visit_id).await?;
        conn.execute(
            "UPDATE visits SET is_complete = ?1 WHERE id = ?2",
            libsql::params![i64::from(complete), visit_id],
        )
        .await?;
        visit.is_complete = complete;
        tracing::debug!(visit_id, complete, "visit completion changed");
        Ok(visit)
    }
}
