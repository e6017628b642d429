//! Questionnaire selection validation and scoring.
//!
//! A submission maps question ids to selected choice ids. It is accepted only
//! when every question of the template has exactly one selection and each
//! selected choice belongs to its question. The score is the sum of the
//! selected choices' values.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Choice, Question};
use crate::validation::ValidationErrors;

/// A question with its selectable choices, as presented on a form.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionWithChoices {
    pub question: Question,
    pub choices: Vec<Choice>,
}

/// Submitted answers keyed by question id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnswerSubmission {
    pub answers: BTreeMap<i64, i64>,
}

/// One validated selection with the value it contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredSelection {
    pub question_id: i64,
    pub choice_id: i64,
    pub value: i64,
}

/// Form field name for a question, e.g. `question_12`.
#[must_use]
pub fn field_name(question_id: i64) -> String {
    format!("question_{question_id}")
}

/// Check a submission against the template's questions.
///
/// Selections are returned in question presentation order.
///
/// # Errors
///
/// Returns one field error per missing answer, invalid choice, or answer to a
/// question that is not part of the template.
pub fn validate_selection(
    questions: &[QuestionWithChoices],
    submission: &AnswerSubmission,
) -> Result<Vec<ScoredSelection>, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut selections = Vec::with_capacity(questions.len());

    for qc in questions {
        let qid = qc.question.id;
        let Some(&choice_id) = submission.answers.get(&qid) else {
            errors.push(field_name(qid), "This field is required.");
            continue;
        };
        match qc.choices.iter().find(|c| c.id == choice_id) {
            Some(choice) => selections.push(ScoredSelection {
                question_id: qid,
                choice_id,
                value: choice.value,
            }),
            None => errors.push(
                field_name(qid),
                format!("Select a valid choice. {choice_id} is not one of the available choices."),
            ),
        }
    }

    for qid in submission.answers.keys() {
        if !questions.iter().any(|qc| qc.question.id == *qid) {
            errors.push(field_name(*qid), "is not part of this questionnaire");
        }
    }

    errors.into_result(selections)
}

/// Sum of the selected choice values.
#[must_use]
pub fn total_score(selections: &[ScoredSelection]) -> i64 {
    selections.iter().map(|s| s.value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Two questions with choices valued 0..=3; choice ids are `q * 10 + value`.
    fn hads() -> Vec<QuestionWithChoices> {
        (1..=2)
            .map(|q| QuestionWithChoices {
                question: Question {
                    id: q,
                    template_id: 1,
                    text: format!("Question {q}"),
                    order: q,
                },
                choices: (0..=3)
                    .map(|v| Choice {
                        id: q * 10 + v,
                        question_id: q,
                        text: format!("Option {v}"),
                        value: v,
                    })
                    .collect(),
            })
            .collect()
    }

    fn submit(pairs: &[(i64, i64)]) -> AnswerSubmission {
        AnswerSubmission {
            answers: pairs.iter().copied().collect(),
        }
    }

    #[test]
    fn scores_selected_values() {
        let selections = validate_selection(&hads(), &submit(&[(1, 12), (2, 23)])).unwrap();
        assert_eq!(total_score(&selections), 5);
        assert_eq!(
            selections.iter().map(|s| s.question_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn missing_answer_is_required_error() {
        let errors = validate_selection(&hads(), &submit(&[(1, 12)])).unwrap_err();
        assert!(errors.has("question_2"));
        assert!(!errors.has("question_1"));
    }

    #[test]
    fn choice_from_other_question_is_rejected() {
        let errors = validate_selection(&hads(), &submit(&[(1, 23), (2, 21)])).unwrap_err();
        assert!(errors.has("question_1"));
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn foreign_question_is_rejected() {
        let errors =
            validate_selection(&hads(), &submit(&[(1, 10), (2, 20), (99, 990)])).unwrap_err();
        assert!(errors.has("question_99"));
    }

    #[test]
    fn submission_accepts_string_keys() {
        let sub: AnswerSubmission =
            serde_json::from_str(r#"{"answers": {"1": 12, "2": 23}}"#).unwrap();
        assert_eq!(sub, submit(&[(1, 12), (2, 23)]));
    }
}
