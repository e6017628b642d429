//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use rct_db::media::MediaStore;
use rct_db::service::RctService;
use rct_server::{AppState, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

const TOKEN: &str = "test-token";

struct TestApp {
    router: Router,
    _media: tempfile::TempDir,
}

async fn app() -> TestApp {
    let media = tempfile::tempdir().unwrap();
    let service = RctService::new_local(":memory:").await.unwrap();
    let state = AppState {
        service: Arc::new(service),
        media: MediaStore::new(media.path()),
        api_tokens: Arc::new(vec![TOKEN.to_string()]),
        default_limit: 20,
    };
    TestApp {
        router: build_router(state),
        _media: media,
    }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value, Option<String>) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let resp = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value, location)
    }

    /// A study and one participant; returns (participant pk, baseline visit id).
    async fn participant(&self) -> (i64, i64) {
        let (status, study, _) = self
            .send(
                "POST",
                "/studies",
                Some(json!({ "name": "DIGI-HEART", "start_date": "2026-01-01" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, created, _) = self
            .send(
                "POST",
                "/participants",
                Some(json!({
                    "study_id": study["id"],
                    "date_of_birth": "1950-03-14",
                    "gender": "FEMALE"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        (
            created["participant"]["id"].as_i64().unwrap(),
            created["baseline_visit"]["id"].as_i64().unwrap(),
        )
    }
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = app().await;
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_or_wrong_token_is_401() {
    let app = app().await;
    let req = Request::builder().uri("/studies").body(Body::empty()).unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/studies")
        .header(header::AUTHORIZATION, "Bearer nope")
        .body(Body::empty())
        .unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn participant_creation_assigns_identifier_and_baseline() {
    let app = app().await;
    let (pid, _) = app.participant().await;

    let (status, detail, _) = app.send("GET", &format!("/participants/{pid}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let participant_id = detail["participant"]["participant_id"].as_str().unwrap();
    assert!(participant_id.starts_with("DG-"), "{participant_id}");
    assert!(participant_id.ends_with("-0001"), "{participant_id}");
    assert_eq!(detail["visits"][0]["visit_type"], "BASELINE");
    assert_eq!(detail["creatable_visits"].as_array().unwrap().len(), 3);

    let (_, recent, _) = app.send("GET", "/dashboard", None).await;
    assert_eq!(recent.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_visit_is_a_warning_notice() {
    let app = app().await;
    let (pid, _) = app.participant().await;

    let (status, body, location) = app
        .send(
            "POST",
            &format!("/participants/{pid}/visits"),
            Some(json!({ "visit_type": "BASELINE" })),
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some(format!("/participants/{pid}").as_str()));
    assert_eq!(body["level"], "warning");

    let (status, body, _) = app
        .send("POST", &format!("/participants/{pid}/visits"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(body["level"], "error");

    let (status, visit, _) = app
        .send(
            "POST",
            &format!("/participants/{pid}/visits"),
            Some(json!({ "visit_type": "VISIT1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(visit["visit_type"], "VISIT1");
}

#[tokio::test]
async fn unknown_category_redirects_to_visit_dashboard() {
    let app = app().await;
    let (pid, vid) = app.participant().await;

    let (status, body, location) = app
        .send("GET", &format!("/participants/{pid}/visits/{vid}/genomics"), None)
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        location.as_deref(),
        Some(format!("/participants/{pid}/visits/{vid}").as_str())
    );
    assert_eq!(body["level"], "error");
    assert!(body["message"].as_str().unwrap().contains("genomics"));
}

#[tokio::test]
async fn unknown_category_on_missing_visit_is_404() {
    let app = app().await;
    let (pid, _) = app.participant().await;

    let (status, _, location) = app
        .send("GET", &format!("/participants/{pid}/visits/999/genomics"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(location, None);

    let (status, _, _) = app
        .send("POST", "/participants/999/visits/1/genomics", Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn record_is_opened_then_saved() {
    let app = app().await;
    let (pid, vid) = app.participant().await;
    let uri = format!("/participants/{pid}/visits/{vid}/clinical-functional");

    let (status, view, _) = app.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["title"], "Clinical Functional");
    assert_eq!(view["record"]["category"], "clinical-functional");

    let (status, view, _) = app
        .send("POST", &uri, Some(json!({ "moca_score": 24, "nyha_class": "II-III", "tug_test_seconds": -1.5 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["record"]["record"]["moca_score"], 24);
    assert_eq!(view["record"]["record"]["nyha_class"], "II-III");
    assert_eq!(view["record"]["record"]["tug_test_seconds"], -1.5);

    let (status, body, _) = app
        .send("POST", &uri, Some(json!({ "moca_score": 31 })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "moca_score");

    let (_, dashboard, _) = app
        .send("GET", &format!("/participants/{pid}/visits/{vid}"), None)
        .await;
    assert_eq!(dashboard["clinical_assessment"]["moca_score"], 24);
    assert_eq!(dashboard["biological_sample"], Value::Null);
}

#[tokio::test]
async fn questionnaire_flow_scores_submission() {
    let app = app().await;
    let (pid, vid) = app.participant().await;
    let choices = json!([
        { "text": "Not at all", "value": 0 },
        { "text": "Sometimes", "value": 1 },
        { "text": "Often", "value": 2 },
        { "text": "Always", "value": 3 }
    ]);
    let (status, template, _) = app
        .send(
            "POST",
            "/templates",
            Some(json!({
                "name": "HADS",
                "questions": [
                    { "text": "I feel tense", "order": 1, "choices": choices },
                    { "text": "I feel slowed down", "order": 2, "choices": choices }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let base = format!("/participants/{pid}/visits/{vid}");
    let (status, notice, location) = app
        .send("POST", &format!("{base}/questionnaires"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some(format!("{base}/questionnaires").as_str()));
    assert_eq!(notice["level"], "warning");

    let (status, assessment, _) = app
        .send(
            "POST",
            &format!("{base}/questionnaires"),
            Some(json!({ "template_id": template["template"]["id"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let aid = assessment["id"].as_i64().unwrap();

    // Choose value 2 for the first question and 3 for the second.
    let questions = template["questions"].as_array().unwrap();
    let mut answers = serde_json::Map::new();
    for (qc, value) in questions.iter().zip([2, 3]) {
        let choice = qc["choices"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["value"] == value)
            .unwrap();
        answers.insert(qc["question"]["id"].to_string(), choice["id"].clone());
    }
    let (status, done, _) = app
        .send(
            "POST",
            &format!("{base}/assessments/{aid}"),
            Some(json!({ "answers": answers })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["total_score"], 5);
    assert!(done["completed_at"].is_string());

    let (_, form, _) = app.send("GET", &format!("{base}/assessments/{aid}"), None).await;
    assert!(form["fields"].as_array().unwrap().iter().all(|f| f["selected_choice_id"].is_i64()));

    let (status, body, _) = app
        .send(
            "POST",
            &format!("{base}/assessments/{aid}"),
            Some(json!({ "answers": {} })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn missing_entities_are_404() {
    let app = app().await;
    let (status, _, _) = app.send("GET", "/participants/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (pid, _) = app.participant().await;
    let (status, _, _) = app
        .send("GET", &format!("/participants/{pid}/visits/999"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mri_report_upload_stores_path() {
    let app = app().await;
    let (pid, vid) = app.participant().await;
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/participants/{pid}/visits/{vid}/neuroimaging/report?filename=scan.pdf"))
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::from("%PDF-1.7"))
        .unwrap();
    let resp = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let record: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(record["mri_report"], format!("mri_reports/{vid}-scan.pdf"));
}

#[tokio::test]
async fn wearable_summary_for_new_participant_is_empty() {
    let app = app().await;
    let (pid, _) = app.participant().await;
    let (status, dashboard, _) = app
        .send("GET", &format!("/participants/{pid}/wearables"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["summary"]["samples_in_window"], 0);
    assert_eq!(dashboard["summary"]["avg_heart_rate_24h"], Value::Null);
}

#[tokio::test]
async fn enrolling_sets_enrollment_date() {
    let app = app().await;
    let (pid, _) = app.participant().await;
    let (status, participant, _) = app
        .send(
            "PUT",
            &format!("/participants/{pid}/status"),
            Some(json!({ "status": "ENROLLED" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(participant["status"], "ENROLLED");
    assert!(participant["enrollment_date"].is_string());
    let _ = chrono::NaiveDate::parse_from_str(
        participant["enrollment_date"].as_str().unwrap(),
        "%Y-%m-%d",
    )
    .unwrap();
}
