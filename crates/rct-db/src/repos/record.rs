//! Per-visit data-entry records, routed by category.
//!
//! Each visit has at most one record per category (`UNIQUE(visit_id)` in
//! each record table). Opening a category for data entry creates the record
//! with empty fields on first access; the visit dashboard only reads.

use chrono::Utc;
use libsql::Connection;
use rct_core::category::{CategoryRecord, DataCategory};
use rct_core::entities::{BiologicalSample, ClinicalAssessment, Neuroimaging};
use rct_core::forms::RecordForm;
use rct_core::responses::{DataEntryView, VisitDashboard};

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_bool, get_opt_string, parse_datetime};
use crate::media::MediaStore;
use crate::repos::participant::fetch_participant;
use crate::repos::questionnaire::fetch_latest_completed_assessment;
use crate::repos::visit::fetch_visit;
use crate::service::RctService;
use crate::updates::record::record_assignments;
use crate::updates::set_clause;

const fn record_cols(category: DataCategory) -> &'static str {
    match category {
        DataCategory::ClinicalFunctional => {
            "id, visit_id, moca_score, ntb_results_summary, nyha_class, six_minute_walk_test_meters, tug_test_seconds, updated_at"
        }
        DataCategory::BiologicalSamples => {
            "id, visit_id, initial_blood_screening_summary, gfap, nfl, abeta40_42_ratio, ptau217, updated_at"
        }
        DataCategory::Neuroimaging => {
            "id, visit_id, mri_completed, mri_report, mri_key_findings, updated_at"
        }
    }
}

fn row_to_record(category: DataCategory, row: &libsql::Row) -> Result<CategoryRecord, DatabaseError> {
    Ok(match category {
        DataCategory::ClinicalFunctional => CategoryRecord::ClinicalFunctional(ClinicalAssessment {
            id: row.get(0)?,
            visit_id: row.get(1)?,
            moca_score: row.get(2)?,
            ntb_results_summary: get_opt_string(row, 3)?,
            nyha_class: get_opt_string(row, 4)?,
            six_minute_walk_test_meters: row.get(5)?,
            tug_test_seconds: row.get(6)?,
            updated_at: parse_datetime(&row.get::<String>(7)?)?,
        }),
        DataCategory::BiologicalSamples => CategoryRecord::BiologicalSamples(BiologicalSample {
            id: row.get(0)?,
            visit_id: row.get(1)?,
            initial_blood_screening_summary: get_opt_string(row, 2)?,
            gfap: row.get(3)?,
            nfl: row.get(4)?,
            abeta40_42_ratio: row.get(5)?,
            ptau217: row.get(6)?,
            updated_at: parse_datetime(&row.get::<String>(7)?)?,
        }),
        DataCategory::Neuroimaging => CategoryRecord::Neuroimaging(Neuroimaging {
            id: row.get(0)?,
            visit_id: row.get(1)?,
            mri_completed: get_bool(row, 2)?,
            mri_report: get_opt_string(row, 3)?,
            mri_key_findings: get_opt_string(row, 4)?,
            updated_at: parse_datetime(&row.get::<String>(5)?)?,
        }),
    })
}

/// Read a visit's record for a category without creating it.
pub(crate) async fn fetch_record(
    conn: &Connection,
    visit_id: i64,
    category: DataCategory,
) -> Result<Option<CategoryRecord>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {} FROM {} WHERE visit_id = ?1",
                record_cols(category),
                category.table()
            ),
            [visit_id],
        )
        .await?;
    rows.next()
        .await?
        .map(|row| row_to_record(category, &row))
        .transpose()
}

/// Fetch the record, inserting an empty one first if none exists.
async fn ensure_record(
    conn: &Connection,
    visit_id: i64,
    category: DataCategory,
) -> Result<CategoryRecord, DatabaseError> {
    let inserted = conn
        .execute(
            &format!(
                "INSERT INTO {} (visit_id, updated_at) VALUES (?1, ?2) ON CONFLICT(visit_id) DO NOTHING",
                category.table()
            ),
            libsql::params![visit_id, format_datetime(&Utc::now())],
        )
        .await?;
    if inserted > 0 {
        tracing::debug!(visit_id, category = %category, "data-entry record created");
    }
    fetch_record(conn, visit_id, category)
        .await?
        .ok_or(DatabaseError::NoResult)
}

fn data_entry_view(visit: rct_core::entities::Visit, record: CategoryRecord) -> DataEntryView {
    DataEntryView {
        title: record.category().title().to_string(),
        visit,
        record,
    }
}

impl RctService {
    /// Open a category's record for a visit, creating it on first access.
    pub async fn get_or_create_record(
        &self,
        participant_pk: i64,
        visit_id: i64,
        category: DataCategory,
    ) -> Result<DataEntryView, DatabaseError> {
        let conn = self.db().conn().await;
        let visit = fetch_visit(&conn, participant_pk, visit_id).await?;
        let record = ensure_record(&conn, visit_id, category).await?;
        Ok(data_entry_view(visit, record))
    }

    /// Validate a form and write all of its fields to the visit's record.
    ///
    /// Nothing is written when validation fails.
    pub async fn save_record(
        &self,
        participant_pk: i64,
        visit_id: i64,
        form: RecordForm,
    ) -> Result<DataEntryView, DatabaseError> {
        let form = form.validate()?;
        let category = form.category();

        let conn = self.db().conn().await;
        let visit = fetch_visit(&conn, participant_pk, visit_id).await?;
        ensure_record(&conn, visit_id, category).await?;

        let assignments = record_assignments(&form);
        let mut columns = assignments.columns;
        let mut params = assignments.values;
        columns.push("updated_at");
        params.push(format_datetime(&Utc::now()).into());
        let (sets, idx) = set_clause(&columns);
        params.push(visit_id.into());

        conn.execute(
            &format!("UPDATE {} SET {sets} WHERE visit_id = ?{idx}", category.table()),
            libsql::params_from_iter(params),
        )
        .await?;
        tracing::debug!(visit_id, category = %category, "data-entry record saved");

        let record = fetch_record(&conn, visit_id, category)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        Ok(data_entry_view(visit, record))
    }

    /// Visit overview. Records that were never opened are reported as absent.
    pub async fn visit_dashboard(
        &self,
        participant_pk: i64,
        visit_id: i64,
    ) -> Result<VisitDashboard, DatabaseError> {
        let conn = self.db().conn().await;
        let participant = fetch_participant(&conn, participant_pk).await?;
        let visit = fetch_visit(&conn, participant_pk, visit_id).await?;

        let mut clinical_assessment = None;
        let mut biological_sample = None;
        let mut neuroimaging = None;
        for category in DataCategory::ALL {
            match fetch_record(&conn, visit_id, category).await? {
                Some(CategoryRecord::ClinicalFunctional(r)) => clinical_assessment = Some(r),
                Some(CategoryRecord::BiologicalSamples(r)) => biological_sample = Some(r),
                Some(CategoryRecord::Neuroimaging(r)) => neuroimaging = Some(r),
                None => {}
            }
        }

        Ok(VisitDashboard {
            participant,
            visit,
            clinical_assessment,
            biological_sample,
            neuroimaging,
            latest_completed_assessment: fetch_latest_completed_assessment(&conn, visit_id).await?,
        })
    }

    /// Store an MRI report file and point the visit's neuroimaging record at it.
    pub async fn attach_mri_report(
        &self,
        media: &MediaStore,
        participant_pk: i64,
        visit_id: i64,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Neuroimaging, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_visit(&conn, participant_pk, visit_id).await?;
        ensure_record(&conn, visit_id, DataCategory::Neuroimaging).await?;

        let relative = media.save_mri_report(visit_id, file_name, bytes).await?;
        conn.execute(
            "UPDATE neuroimaging SET mri_report = ?1, updated_at = ?2 WHERE visit_id = ?3",
            libsql::params![relative.as_str(), format_datetime(&Utc::now()), visit_id],
        )
        .await?;

        match fetch_record(&conn, visit_id, DataCategory::Neuroimaging).await? {
            Some(CategoryRecord::Neuroimaging(record)) => Ok(record),
            _ => Err(DatabaseError::NoResult),
        }
    }
}
