use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use app::{router, AppState};
use calm_core::model::{QuestionDraft, Summary};
use calm_core::session::{AnsweredQuestion, QuestionContext, SummaryContext};
use calm_core::time::fixed_clock;
use services::ai::{ModelClient, ModelConfig};
use services::export::{ExportDocument, ExportEntry};
use services::{
    EndpointClient, GenerationError, ModelQuestionGenerator, ModelSummaryGenerator,
    QuestionGenerator, SummaryGenerator,
};

//
// ─── FAKES ─────────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct RecordingQuestions {
    seen: Mutex<Vec<QuestionContext>>,
}

#[async_trait::async_trait]
impl QuestionGenerator for RecordingQuestions {
    async fn generate_question(
        &self,
        context: &QuestionContext,
    ) -> Result<QuestionDraft, GenerationError> {
        self.seen.lock().unwrap().push(context.clone());
        Ok(QuestionDraft::new(
            "What brought you peace today?",
            ["Music", "Nature", "People", "Not sure"].map(String::from),
        )?)
    }
}

#[derive(Default)]
struct RecordingSummaries {
    seen: Mutex<Vec<SummaryContext>>,
}

#[async_trait::async_trait]
impl SummaryGenerator for RecordingSummaries {
    async fn generate_summary(&self, context: &SummaryContext) -> Result<Summary, GenerationError> {
        self.seen.lock().unwrap().push(context.clone());
        Ok(Summary::new(
            "You are feeling upbeat today.",
            vec!["Share that energy with a friend".to_string()],
        )?)
    }
}

struct Broken;

#[async_trait::async_trait]
impl QuestionGenerator for Broken {
    async fn generate_question(
        &self,
        _context: &QuestionContext,
    ) -> Result<QuestionDraft, GenerationError> {
        Err(GenerationError::EmptyResponse)
    }
}

#[async_trait::async_trait]
impl SummaryGenerator for Broken {
    async fn generate_summary(&self, _context: &SummaryContext) -> Result<Summary, GenerationError> {
        Err(GenerationError::EmptyResponse)
    }
}

fn working_state() -> (AppState, Arc<RecordingQuestions>, Arc<RecordingSummaries>) {
    let questions = Arc::new(RecordingQuestions::default());
    let summaries = Arc::new(RecordingSummaries::default());
    let state = AppState::new(questions.clone(), summaries.clone(), fixed_clock());
    (state, questions, summaries)
}

fn broken_state() -> AppState {
    AppState::new(Arc::new(Broken), Arc::new(Broken), fixed_clock())
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, _, bytes) = post_raw(app, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_raw(
    app: Router,
    uri: &str,
    body: Value,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

//
// ─── ROUTES ────────────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn first_question_has_text_and_bounded_options() {
    let (state, questions, _) = working_state();
    let (status, body) = post_json(
        router(state),
        "/api/generate-question",
        json!({"previousQuestions": [], "previousAnswers": {}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let question = &body["question"];
    assert!(!question["question"].as_str().unwrap().is_empty());
    let options = question["options"].as_array().unwrap();
    assert!((3..=8).contains(&options.len()));
    assert!(questions.seen.lock().unwrap()[0].history.is_empty());
}

#[tokio::test]
async fn question_request_pairs_answers_by_position() {
    let (state, questions, _) = working_state();
    let (status, _) = post_json(
        router(state),
        "/api/generate-question",
        json!({
            "previousQuestions": ["How are you feeling today?", {"text": "Did you sleep well?"}],
            "previousAnswers": {"2": ["Yes"]}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let seen = questions.seen.lock().unwrap();
    assert_eq!(
        seen[0].history,
        vec![
            AnsweredQuestion::new("How are you feeling today?", Vec::new()),
            AnsweredQuestion::new("Did you sleep well?", vec!["Yes".into()]),
        ]
    );
}

#[tokio::test]
async fn summary_returns_text_and_tasks() {
    let (state, _, summaries) = working_state();
    let (status, body) = post_json(
        router(state),
        "/api/generate-summary",
        json!({"questions": [{"text": "How do you feel?"}], "answers": {"1": ["Happy"]}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["summary"].as_str().unwrap().is_empty());
    let tasks = body["tasks"].as_array().unwrap();
    assert!((1..=5).contains(&tasks.len()));

    let seen = summaries.seen.lock().unwrap();
    assert_eq!(seen[0].answered[0].answers, vec!["Happy"]);
}

#[tokio::test]
async fn generator_failures_map_to_500() {
    let (status, body) = post_json(
        router(broken_state()),
        "/api/generate-question",
        json!({"previousQuestions": []}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to generate question"}));

    let (status, body) =
        post_json(router(broken_state()), "/api/generate-summary", json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to generate summary"}));
}

#[tokio::test]
async fn export_returns_pdf_attachment() {
    let (state, _, _) = working_state();
    let entries: Vec<Value> = (1..=45)
        .map(|n| json!({"question": format!("Question {n}?"), "answer": "Happy"}))
        .collect();
    let (status, headers, bytes) = post_raw(
        router(state),
        "/api/export",
        json!({
            "summary": {"summary": "A calm day.", "tasks": ["Stretch"]},
            "entries": entries
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"mindfulness_journey.pdf\""
    );
    assert!(bytes.starts_with(b"%PDF-"));

    let summary = Summary::new("A calm day.", vec!["Stretch".to_string()]).unwrap();
    let entries: Vec<ExportEntry> = (1..=45)
        .map(|n| ExportEntry::new(format!("Question {n}?"), "Happy"))
        .collect();
    let expected = ExportDocument::render(&summary, &entries, fixed_clock());
    assert!(expected.pages().len() > 1);
    let pdf = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(pdf.get_pages().len(), expected.pages().len());
}

#[tokio::test]
async fn export_rejects_summary_without_tasks() {
    let (state, _, _) = working_state();
    let (status, body) = post_json(
        router(state),
        "/api/export",
        json!({"summary": {"summary": "A calm day.", "tasks": []}, "entries": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid summary"}));
}

//
// ─── MODEL PROVIDER ────────────────────────────────────────────────────────────
//

#[derive(Clone)]
struct Provider {
    content: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn completions(State(provider): State<Provider>, Json(body): Json<Value>) -> Json<Value> {
    provider.requests.lock().unwrap().push(body);
    Json(json!({
        "choices": [{"message": {"role": "assistant", "content": provider.content}}]
    }))
}

async fn spawn_provider(content: Value) -> (ModelClient, Arc<Mutex<Vec<Value>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let provider = Provider {
        content: content.to_string(),
        requests: requests.clone(),
    };
    let addr = spawn(
        Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(provider),
    )
    .await;
    let client = ModelClient::new(Some(ModelConfig {
        base_url: format!("http://{addr}/v1/"),
        api_key: "test-key".into(),
        model: "test-model".into(),
    }));
    (client, requests)
}

#[tokio::test]
async fn model_generator_requests_schema_constrained_output() {
    let (client, requests) = spawn_provider(json!({
        "question": "What calmed you today?",
        "options": ["Music", "A walk", "Not sure"]
    }))
    .await;
    let generator = ModelQuestionGenerator::new(client);

    let draft = generator
        .generate_question(&QuestionContext::default())
        .await
        .unwrap();
    assert_eq!(draft.text(), "What calmed you today?");

    let requests = requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request["model"], "test-model");
    assert_eq!(request["response_format"]["type"], "json_schema");
    assert_eq!(request["response_format"]["json_schema"]["name"], "question");
    let prompt = request["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("# EXAMPLE QUESTIONS AND OPTIONS"));
    assert_eq!(prompt.matches("\nOptions: ").count(), 10);
}

#[tokio::test]
async fn out_of_range_model_output_fails_the_route() {
    let (client, _) = spawn_provider(json!({"question": "Too short?", "options": ["Yes"]})).await;
    let state = AppState::new(
        Arc::new(ModelQuestionGenerator::new(client.clone())),
        Arc::new(ModelSummaryGenerator::new(client)),
        fixed_clock(),
    );

    let (status, body) =
        post_json(router(state), "/api/generate-question", json!({"previousQuestions": []})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate question");
}

#[tokio::test]
async fn model_summary_parses_provider_output() {
    let (client, requests) = spawn_provider(json!({
        "summary": "You rested well.",
        "tasks": ["Keep a bedtime routine", "Take a mindful walk"]
    }))
    .await;
    let generator = ModelSummaryGenerator::new(client);
    let context = SummaryContext {
        answered: vec![AnsweredQuestion::new("How well did you sleep?", vec!["Very well".into()])],
    };

    let summary = generator.generate_summary(&context).await.unwrap();
    assert_eq!(summary.tasks().len(), 2);

    let requests = requests.lock().unwrap();
    let prompt = requests[0]["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("1. Q: How well did you sleep?"));
    assert!(prompt.contains("A: Very well"));
}

//
// ─── ENDPOINT CLIENT ───────────────────────────────────────────────────────────
//

#[tokio::test]
async fn endpoint_client_round_trips_through_the_server() {
    let (state, _, summaries) = working_state();
    let addr = spawn(router(state)).await;
    let client = EndpointClient::new(format!("http://{addr}"));

    let draft = client
        .generate_question(&QuestionContext::default())
        .await
        .unwrap();
    assert_eq!(draft.text(), "What brought you peace today?");

    let context = SummaryContext {
        answered: vec![AnsweredQuestion::new("How do you feel?", vec!["Happy".into()])],
    };
    let summary = client.generate_summary(&context).await.unwrap();
    assert_eq!(summary.tasks(), ["Share that energy with a friend"]);
    assert_eq!(summaries.seen.lock().unwrap()[0], context);
}

#[tokio::test]
async fn endpoint_client_reports_server_errors() {
    let addr = spawn(router(broken_state())).await;
    let client = EndpointClient::new(format!("http://{addr}"));

    let err = client
        .generate_question(&QuestionContext::default())
        .await
        .unwrap_err();
    match err {
        GenerationError::Endpoint { status, message } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "Failed to generate question");
        }
        other => panic!("unexpected error: {other}"),
    }
}
