//! Shared test utilities for rct-db unit tests.

pub(crate) mod helpers {
    use chrono::NaiveDate;
    use rct_core::entities::{
        NewChoice, NewParticipant, NewQuestion, NewStudy, NewTemplate, Study,
    };
    use rct_core::enums::Gender;
    use rct_core::responses::{ParticipantCreated, TemplateDetail};

    use crate::service::RctService;

    /// Create an in-memory `RctService`.
    pub async fn test_service() -> RctService {
        RctService::new_local(":memory:").await.unwrap()
    }

    pub async fn create_test_study(svc: &RctService, name: &str) -> Study {
        svc.create_study(&NewStudy {
            name: name.to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: None,
        })
        .await
        .unwrap()
    }

    pub fn new_participant(study_id: i64) -> NewParticipant {
        NewParticipant {
            study_id,
            date_of_birth: NaiveDate::from_ymd_opt(1952, 5, 17).unwrap(),
            gender: Gender::Female,
            assigned_group_name: None,
            participant_id: None,
        }
    }

    /// A study with one participant (and its Baseline visit).
    pub async fn enrolled_participant(svc: &RctService) -> ParticipantCreated {
        let study = create_test_study(svc, "DIGI-HEART").await;
        svc.create_participant(new_participant(study.id))
            .await
            .unwrap()
    }

    /// Two questions with four choices each, valued 0..=3.
    pub fn hads_template() -> NewTemplate {
        let choices = || {
            ["Not at all", "Occasionally", "Often", "Most of the time"]
                .iter()
                .zip(0..)
                .map(|(text, value)| NewChoice {
                    text: (*text).to_string(),
                    value,
                })
                .collect()
        };
        NewTemplate {
            name: "HADS".to_string(),
            description: "Hospital Anxiety and Depression Scale".to_string(),
            questions: vec![
                NewQuestion {
                    text: "I feel tense or wound up".to_string(),
                    order: 1,
                    choices: choices(),
                },
                NewQuestion {
                    text: "I still enjoy the things I used to enjoy".to_string(),
                    order: 2,
                    choices: choices(),
                },
            ],
        }
    }

    pub async fn create_hads(svc: &RctService) -> TemplateDetail {
        svc.create_template(&hads_template()).await.unwrap()
    }
}
