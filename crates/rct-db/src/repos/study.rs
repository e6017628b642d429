//! Study repository: create, get, list.

use libsql::Connection;
use rct_core::entities::{NewStudy, Study};
use rct_core::validation::{ValidationErrors, check_max_len};

use crate::error::DatabaseError;
use crate::helpers::{
    format_date, get_opt_string, insert_returning_id, is_unique_violation, parse_date,
    parse_optional_date,
};
use crate::service::RctService;

const STUDY_COLS: &str = "id, name, description, start_date, end_date";
const MAX_NAME_LEN: usize = 200;

fn row_to_study(row: &libsql::Row) -> Result<Study, DatabaseError> {
    Ok(Study {
        id: row.get(0)?,
        name: row.get(1)?,
        description: get_opt_string(row, 2)?,
        start_date: parse_date(&row.get::<String>(3)?)?,
        end_date: parse_optional_date(get_opt_string(row, 4)?.as_deref())?,
    })
}

pub(crate) async fn fetch_study(conn: &Connection, id: i64) -> Result<Study, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {STUDY_COLS} FROM studies WHERE id = ?1"), [id])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(DatabaseError::not_found("study", id))?;
    row_to_study(&row)
}

fn validate_new_study(new: &NewStudy) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = new.name.trim();
    if name.is_empty() {
        errors.push("name", "This field is required.");
    }
    check_max_len(&mut errors, "name", Some(name), MAX_NAME_LEN);
    if let Some(end) = new.end_date
        && end < new.start_date
    {
        errors.push("end_date", "must not be before start_date");
    }
    errors.into_result(name.to_string())
}

impl RctService {
    pub async fn create_study(&self, new: &NewStudy) -> Result<Study, DatabaseError> {
        let name = validate_new_study(new)?;
        let conn = self.db().conn().await;

        let result = insert_returning_id(
            &conn,
            "INSERT INTO studies (name, description, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4) RETURNING id",
            libsql::params![
                name.as_str(),
                new.description.as_deref(),
                format_date(new.start_date),
                new.end_date.map(format_date)
            ],
        )
        .await;
        let id = match result {
            Ok(id) => id.ok_or(DatabaseError::NoResult)?,
            Err(e) if is_unique_violation(&e, "studies.name") => {
                return Err(DatabaseError::Duplicate(format!(
                    "A study named '{name}' already exists."
                )));
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(study_id = id, name = %name, "study created");

        Ok(Study {
            id,
            name,
            description: new.description.clone(),
            start_date: new.start_date,
            end_date: new.end_date,
        })
    }

    pub async fn get_study(&self, id: i64) -> Result<Study, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_study(&conn, id).await
    }

    /// All studies, by name.
    pub async fn list_studies(&self) -> Result<Vec<Study>, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query(&format!("SELECT {STUDY_COLS} FROM studies ORDER BY name"), ())
            .await?;
        let mut studies = Vec::new();
        while let Some(row) = rows.next().await? {
            studies.push(row_to_study(&row)?);
        }
        Ok(studies)
    }
}
