//! Questionnaire templates, per-visit assignments, and scored submissions.

use chrono::Utc;
use libsql::Connection;
use rct_core::entities::{Choice, NewTemplate, Question, QuestionnaireTemplate, VisitAssessment};
use rct_core::responses::{
    AssessmentSummary, QuestionField, QuestionnaireForm, TemplateDetail, VisitQuestionnaires,
};
use rct_core::scoring::{AnswerSubmission, QuestionWithChoices, field_name, total_score, validate_selection};
use rct_core::validation::{ValidationErrors, check_max_len};

use crate::error::DatabaseError;
use crate::helpers::{
    finish_transaction, format_datetime, get_opt_string, insert_returning_id, is_unique_violation,
    parse_optional_datetime,
};
use crate::repos::visit::fetch_visit;
use crate::service::RctService;

const TEMPLATE_COLS: &str = "id, name, description";
const ASSESSMENT_COLS: &str = "id, visit_id, template_id, completed_at, total_score";

const MAX_TEMPLATE_NAME_LEN: usize = 100;
const MAX_QUESTION_LEN: usize = 500;
const MAX_CHOICE_LEN: usize = 200;

fn row_to_template(row: &libsql::Row) -> Result<QuestionnaireTemplate, DatabaseError> {
    Ok(QuestionnaireTemplate {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

fn row_to_assessment(row: &libsql::Row) -> Result<VisitAssessment, DatabaseError> {
    Ok(VisitAssessment {
        id: row.get(0)?,
        visit_id: row.get(1)?,
        template_id: row.get(2)?,
        completed_at: parse_optional_datetime(get_opt_string(row, 3)?.as_deref())?,
        total_score: row.get(4)?,
    })
}

async fn fetch_template(conn: &Connection, id: i64) -> Result<QuestionnaireTemplate, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {TEMPLATE_COLS} FROM questionnaire_templates WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(DatabaseError::not_found("questionnaire template", id))?;
    row_to_template(&row)
}

/// Questions ordered by `order` (ties by id), each with choices by id.
async fn fetch_questions(
    conn: &Connection,
    template_id: i64,
) -> Result<Vec<QuestionWithChoices>, DatabaseError> {
    let mut rows = conn
        .query(
            r#"SELECT id, template_id, text, "order" FROM questions
               WHERE template_id = ?1 ORDER BY "order", id"#,
            [template_id],
        )
        .await?;
    let mut questions = Vec::new();
    while let Some(row) = rows.next().await? {
        questions.push(QuestionWithChoices {
            question: Question {
                id: row.get(0)?,
                template_id: row.get(1)?,
                text: row.get(2)?,
                order: row.get(3)?,
            },
            choices: Vec::new(),
        });
    }
    drop(rows);

    let mut rows = conn
        .query(
            "SELECT c.id, c.question_id, c.text, c.value FROM choices c
             JOIN questions q ON q.id = c.question_id
             WHERE q.template_id = ?1 ORDER BY c.id",
            [template_id],
        )
        .await?;
    while let Some(row) = rows.next().await? {
        let choice = Choice {
            id: row.get(0)?,
            question_id: row.get(1)?,
            text: row.get(2)?,
            value: row.get(3)?,
        };
        if let Some(qc) = questions
            .iter_mut()
            .find(|qc| qc.question.id == choice.question_id)
        {
            qc.choices.push(choice);
        }
    }
    Ok(questions)
}

/// Load an assessment, scoped to its visit.
async fn fetch_assessment(
    conn: &Connection,
    visit_id: i64,
    assessment_id: i64,
) -> Result<VisitAssessment, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {ASSESSMENT_COLS} FROM visit_assessments WHERE id = ?1 AND visit_id = ?2"
            ),
            [assessment_id, visit_id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or(DatabaseError::not_found("assessment", assessment_id))?;
    row_to_assessment(&row)
}

/// The visit's most recently completed assessment, if any.
pub(crate) async fn fetch_latest_completed_assessment(
    conn: &Connection,
    visit_id: i64,
) -> Result<Option<VisitAssessment>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {ASSESSMENT_COLS} FROM visit_assessments
                 WHERE visit_id = ?1 AND completed_at IS NOT NULL
                 ORDER BY completed_at DESC, id DESC LIMIT 1"
            ),
            [visit_id],
        )
        .await?;
    rows.next()
        .await?
        .map(|row| row_to_assessment(&row))
        .transpose()
}

/// Selected choice per question for an assessment.
async fn fetch_answers(
    conn: &Connection,
    assessment_id: i64,
) -> Result<Vec<(i64, i64)>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT question_id, selected_choice_id FROM answers WHERE visit_assessment_id = ?1",
            [assessment_id],
        )
        .await?;
    let mut answers = Vec::new();
    while let Some(row) = rows.next().await? {
        answers.push((row.get(0)?, row.get(1)?));
    }
    Ok(answers)
}

fn validate_new_template(new: &NewTemplate) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = new.name.trim();
    if name.is_empty() {
        errors.push("name", "This field is required.");
    }
    check_max_len(&mut errors, "name", Some(name), MAX_TEMPLATE_NAME_LEN);
    for (qi, question) in new.questions.iter().enumerate() {
        let field = format!("questions[{qi}]");
        if question.text.trim().is_empty() {
            errors.push(format!("{field}.text"), "This field is required.");
        }
        check_max_len(&mut errors, &format!("{field}.text"), Some(&question.text), MAX_QUESTION_LEN);
        if question.order < 0 {
            errors.push(format!("{field}.order"), "must be zero or greater");
        }
        if question.choices.is_empty() {
            errors.push(format!("{field}.choices"), "at least one choice is required");
        }
        for (ci, choice) in question.choices.iter().enumerate() {
            check_max_len(
                &mut errors,
                &format!("{field}.choices[{ci}].text"),
                Some(&choice.text),
                MAX_CHOICE_LEN,
            );
        }
    }
    errors.into_result(name.to_string())
}

async fn insert_template_rows(
    conn: &Connection,
    name: &str,
    new: &NewTemplate,
) -> Result<i64, DatabaseError> {
    let result = insert_returning_id(
        conn,
        "INSERT INTO questionnaire_templates (name, description) VALUES (?1, ?2) RETURNING id",
        libsql::params![name, new.description.as_str()],
    )
    .await;
    let template_id = match result {
        Ok(id) => id.ok_or(DatabaseError::NoResult)?,
        Err(e) if is_unique_violation(&e, "questionnaire_templates.name") => {
            return Err(DatabaseError::Duplicate(format!(
                "A questionnaire named '{name}' already exists."
            )));
        }
        Err(e) => return Err(e.into()),
    };

    for question in &new.questions {
        let question_id = insert_returning_id(
            conn,
            r#"INSERT INTO questions (template_id, text, "order") VALUES (?1, ?2, ?3) RETURNING id"#,
            libsql::params![template_id, question.text.trim(), question.order],
        )
        .await?
        .ok_or(DatabaseError::NoResult)?;
        for choice in &question.choices {
            conn.execute(
                "INSERT INTO choices (question_id, text, value) VALUES (?1, ?2, ?3)",
                libsql::params![question_id, choice.text.as_str(), choice.value],
            )
            .await?;
        }
    }
    Ok(template_id)
}

impl RctService {
    /// Create a template with its questions and choices in one transaction.
    pub async fn create_template(&self, new: &NewTemplate) -> Result<TemplateDetail, DatabaseError> {
        let name = validate_new_template(new)?;
        let conn = self.db().conn().await;

        let tx = conn.transaction().await?;
        let result = insert_template_rows(&tx, &name, new).await;
        let template_id = finish_transaction(tx, result).await?;
        tracing::debug!(template_id, name = %name, questions = new.questions.len(), "questionnaire template created");

        Ok(TemplateDetail {
            template: fetch_template(&conn, template_id).await?,
            questions: fetch_questions(&conn, template_id).await?,
        })
    }

    /// All templates, by name.
    pub async fn list_templates(&self) -> Result<Vec<QuestionnaireTemplate>, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query(
                &format!("SELECT {TEMPLATE_COLS} FROM questionnaire_templates ORDER BY name"),
                (),
            )
            .await?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next().await? {
            templates.push(row_to_template(&row)?);
        }
        Ok(templates)
    }

    pub async fn get_template_detail(&self, id: i64) -> Result<TemplateDetail, DatabaseError> {
        let conn = self.db().conn().await;
        Ok(TemplateDetail {
            template: fetch_template(&conn, id).await?,
            questions: fetch_questions(&conn, id).await?,
        })
    }

    /// Assign a template to a visit. Assigning it again returns the existing
    /// assessment unchanged.
    pub async fn assign_template(
        &self,
        participant_pk: i64,
        visit_id: i64,
        template_id: i64,
    ) -> Result<VisitAssessment, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_visit(&conn, participant_pk, visit_id).await?;
        fetch_template(&conn, template_id).await?;

        let inserted = conn
            .execute(
                "INSERT INTO visit_assessments (visit_id, template_id) VALUES (?1, ?2)
                 ON CONFLICT(visit_id, template_id) DO NOTHING",
                [visit_id, template_id],
            )
            .await?;
        if inserted > 0 {
            tracing::debug!(visit_id, template_id, "questionnaire assigned");
        }

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {ASSESSMENT_COLS} FROM visit_assessments WHERE visit_id = ?1 AND template_id = ?2"
                ),
                [visit_id, template_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_assessment(&row)
    }

    /// A visit's assessments (with template names) and the templates not yet
    /// assigned, both by template name.
    pub async fn visit_questionnaires(
        &self,
        participant_pk: i64,
        visit_id: i64,
    ) -> Result<VisitQuestionnaires, DatabaseError> {
        let conn = self.db().conn().await;
        let visit = fetch_visit(&conn, participant_pk, visit_id).await?;

        let mut rows = conn
            .query(
                "SELECT a.id, a.visit_id, a.template_id, a.completed_at, a.total_score, t.name
                 FROM visit_assessments a
                 JOIN questionnaire_templates t ON t.id = a.template_id
                 WHERE a.visit_id = ?1 ORDER BY t.name",
                [visit_id],
            )
            .await?;
        let mut assessments = Vec::new();
        while let Some(row) = rows.next().await? {
            assessments.push(AssessmentSummary {
                assessment: row_to_assessment(&row)?,
                template_name: row.get(5)?,
            });
        }
        drop(rows);

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {TEMPLATE_COLS} FROM questionnaire_templates
                     WHERE id NOT IN (SELECT template_id FROM visit_assessments WHERE visit_id = ?1)
                     ORDER BY name"
                ),
                [visit_id],
            )
            .await?;
        let mut assignable_templates = Vec::new();
        while let Some(row) = rows.next().await? {
            assignable_templates.push(row_to_template(&row)?);
        }

        Ok(VisitQuestionnaires {
            visit,
            assessments,
            assignable_templates,
        })
    }

    /// The questionnaire as a form. Stored selections are pre-filled only
    /// once the assessment has been completed.
    pub async fn questionnaire_form(
        &self,
        participant_pk: i64,
        visit_id: i64,
        assessment_id: i64,
    ) -> Result<QuestionnaireForm, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_visit(&conn, participant_pk, visit_id).await?;
        let assessment = fetch_assessment(&conn, visit_id, assessment_id).await?;
        let template = fetch_template(&conn, assessment.template_id).await?;
        let questions = fetch_questions(&conn, assessment.template_id).await?;

        let answers = if assessment.is_completed() {
            fetch_answers(&conn, assessment_id).await?
        } else {
            Vec::new()
        };

        let fields = questions
            .into_iter()
            .map(|qc| QuestionField {
                name: field_name(qc.question.id),
                selected_choice_id: answers
                    .iter()
                    .find(|(qid, _)| *qid == qc.question.id)
                    .map(|(_, cid)| *cid),
                question: qc.question,
                choices: qc.choices,
            })
            .collect();

        Ok(QuestionnaireForm {
            assessment,
            template,
            fields,
        })
    }

    /// Validate and store a full set of answers.
    ///
    /// Validation runs before any write. On success all previous answers are
    /// replaced, and the total score and completion time are set, in one
    /// transaction.
    pub async fn submit_answers(
        &self,
        participant_pk: i64,
        visit_id: i64,
        assessment_id: i64,
        submission: &AnswerSubmission,
    ) -> Result<VisitAssessment, DatabaseError> {
        let conn = self.db().conn().await;
        fetch_visit(&conn, participant_pk, visit_id).await?;
        let assessment = fetch_assessment(&conn, visit_id, assessment_id).await?;
        let questions = fetch_questions(&conn, assessment.template_id).await?;

        let selections = validate_selection(&questions, submission)?;
        let score = total_score(&selections);
        let completed_at = Utc::now();

        let tx = conn.transaction().await?;
        let result = async {
            tx.execute(
                "DELETE FROM answers WHERE visit_assessment_id = ?1",
                [assessment_id],
            )
            .await?;
            for selection in &selections {
                tx.execute(
                    "INSERT INTO answers (visit_assessment_id, question_id, selected_choice_id)
                     VALUES (?1, ?2, ?3)",
                    [assessment_id, selection.question_id, selection.choice_id],
                )
                .await?;
            }
            tx.execute(
                "UPDATE visit_assessments SET total_score = ?1, completed_at = ?2 WHERE id = ?3",
                libsql::params![score, format_datetime(&completed_at), assessment_id],
            )
            .await?;
            Ok::<_, DatabaseError>(())
        }
        .await;
        finish_transaction(tx, result).await?;
        tracing::debug!(assessment_id, score, answers = selections.len(), "questionnaire submitted");

        fetch_assessment(&conn, visit_id, assessment_id).await
    }
}
