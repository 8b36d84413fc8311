//! HTTP surface: the two generation endpoints plus document export.
//!
//! ```text
//! POST /api/generate-question  { previousQuestions, previousAnswers } -> { question }
//! POST /api/generate-summary   { questions, answers }                 -> { summary, tasks }
//! POST /api/export             { summary, entries }                   -> PDF attachment
//! ```
//!
//! Handlers are stateless; they share the generators and the clock.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use services::export::{CONTENT_TYPE, ExportDocument, FILE_NAME};
use services::wire::{
    ErrorBody, ExportRequest, GenerateQuestionRequest, GenerateQuestionResponse,
    GenerateSummaryRequest, QuestionBody, SummaryBody,
};
use services::{
    Clock, ModelClient, ModelQuestionGenerator, ModelSummaryGenerator, QuestionGenerator,
    SummaryGenerator,
};

pub const QUESTION_FAILED: &str = "Failed to generate question";
pub const SUMMARY_FAILED: &str = "Failed to generate summary";
pub const INVALID_SUMMARY: &str = "Invalid summary";
pub const EXPORT_FAILED: &str = "Failed to export";

/// Shared state passed to all request handlers.
#[derive(Clone)]
pub struct AppState {
    questions: Arc<dyn QuestionGenerator>,
    summaries: Arc<dyn SummaryGenerator>,
    clock: Clock,
}

impl AppState {
    #[must_use]
    pub fn new(
        questions: Arc<dyn QuestionGenerator>,
        summaries: Arc<dyn SummaryGenerator>,
        clock: Clock,
    ) -> Self {
        Self {
            questions,
            summaries,
            clock,
        }
    }

    /// Both endpoints backed by one model client.
    #[must_use]
    pub fn from_model(client: ModelClient) -> Self {
        Self::new(
            Arc::new(ModelQuestionGenerator::new(client.clone())),
            Arc::new(ModelSummaryGenerator::new(client)),
            Clock::default_clock(),
        )
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate-question", post(generate_question))
        .route("/api/generate-summary", post(generate_summary))
        .route("/api/export", post(export))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until ctrl-c.
///
/// # Errors
///
/// Returns the I/O error when the address cannot be bound or the server fails.
pub async fn serve(bind: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
}

fn failure(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(message)),
    )
        .into_response()
}

async fn generate_question(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuestionRequest>,
) -> Response {
    let context = request.into_context();
    match state.questions.generate_question(&context).await {
        Ok(draft) => Json(GenerateQuestionResponse {
            question: QuestionBody::from(&draft),
        })
        .into_response(),
        Err(err) => {
            warn!(error = %err, previous = context.history.len(), "error generating question");
            failure(QUESTION_FAILED)
        }
    }
}

async fn generate_summary(
    State(state): State<AppState>,
    Json(request): Json<GenerateSummaryRequest>,
) -> Response {
    let context = request.into_context();
    match state.summaries.generate_summary(&context).await {
        Ok(summary) => Json(SummaryBody::from(&summary)).into_response(),
        Err(err) => {
            warn!(error = %err, answered = context.answered.len(), "error generating summary");
            failure(SUMMARY_FAILED)
        }
    }
}

async fn export(State(state): State<AppState>, Json(request): Json<ExportRequest>) -> Response {
    let summary = match request.summary.into_summary() {
        Ok(summary) => summary,
        Err(err) => {
            warn!(error = %err, "rejecting export with invalid summary");
            return (StatusCode::BAD_REQUEST, Json(ErrorBody::new(INVALID_SUMMARY)))
                .into_response();
        }
    };

    let document = ExportDocument::render(&summary, &request.entries, state.clock);
    let bytes = match document.to_pdf() {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(error = %err, "export failed");
            return failure(EXPORT_FAILED);
        }
    };
    info!(pages = document.pages().len(), bytes = bytes.len(), "exported journey");
    (
        [
            (header::CONTENT_TYPE, CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
