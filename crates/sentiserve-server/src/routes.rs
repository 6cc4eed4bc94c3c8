//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection, rejection::BytesRejection, DefaultBodyLimit, Multipart,
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sentiserve_classifiers::service::classify_input;
use sentiserve_core::{Error, InputText, LabelScore};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics))
        .route("/classify", post(classify_text))
        .route("/classify-file", post(classify_file))
        .fallback(fallback)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Text classifier server is running",
    }))
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => AppError::NotFound("Metrics exporter is not installed".to_string()).into_response(),
    }
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    result: Vec<LabelScore>,
}

#[derive(Debug, Serialize)]
struct ClassifyFileResponse {
    result: Vec<LabelScore>,
    filename: String,
}

/// Classify the `text` field of a JSON body
async fn classify_text(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ClassifyResponse>, AppError> {
    metrics::counter!("sentiserve_requests_total", "endpoint" => "classify").increment(1);

    let body = body.map_err(|rejection| AppError::Rejected(rejection.status(), rejection.body_text()))?;

    let request: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;
    let input = InputText::new(text_field(&request)?)?;

    let result = run_classifier(&state, input)
        .await
        .map_err(|e| AppError::from_classification("Classification failed", e))?;

    Ok(Json(ClassifyResponse { result }))
}

/// The `text` member of a JSON object body. Anything other than an object,
/// including `null`, has no `text` field.
fn text_field(request: &Value) -> Result<&str, AppError> {
    match request.as_object().and_then(|body| body.get("text")) {
        None | Some(Value::Null) => Err(AppError::BadRequest(
            "Missing 'text' field in request body".to_string(),
        )),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(AppError::BadRequest(
            "Invalid JSON body: 'text' must be a string".to_string(),
        )),
    }
}

/// Classify the UTF-8 contents of the multipart field `file`
async fn classify_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ClassifyFileResponse>, AppError> {
    metrics::counter!("sentiserve_requests_total", "endpoint" => "classify_file").increment(1);

    let mut multipart =
        multipart.map_err(|rejection| AppError::Rejected(rejection.status(), rejection.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::Rejected(e.status(), format!("Invalid multipart body: {}", e.body_text()))
    })? {
        // Only a field carrying a filename counts as an uploaded file.
        let filename = match (field.name(), field.file_name()) {
            (Some("file"), Some(filename)) => filename.to_string(),
            _ => continue,
        };
        let data = field.bytes().await.map_err(|e| {
            AppError::Rejected(e.status(), format!("Failed to read upload: {}", e.body_text()))
        })?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    if filename.is_empty() {
        return Err(AppError::BadRequest("No file selected".to_string()));
    }
    debug!("Received upload '{}' ({} bytes)", filename, data.len());

    let text = String::from_utf8(data.to_vec())
        .map_err(|_| AppError::BadRequest("File is not valid UTF-8".to_string()))?;
    let input = InputText::with_message(text, "File is empty")?;

    let result = run_classifier(&state, input)
        .await
        .map_err(|e| AppError::from_classification("File classification failed", e))?;

    Ok(Json(ClassifyFileResponse { result, filename }))
}

async fn run_classifier(state: &AppState, input: InputText) -> Result<Vec<LabelScore>, Error> {
    let start = Instant::now();
    let result = classify_input(&state.classifier, input).await;

    let elapsed_us = start.elapsed().as_micros() as f64;
    metrics::histogram!("sentiserve_inference_latency_us").record(elapsed_us);
    if let Ok(records) = &result {
        if let Some(top) = records.first() {
            info!("Classified as {} in {:.0}µs", top, elapsed_us);
        }
    }
    result
}

async fn fallback() -> AppError {
    AppError::NotFound("Not found".to_string())
}

async fn method_not_allowed() -> AppError {
    AppError::Rejected(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Rejected(StatusCode, String),
    Internal(String),
}

impl AppError {
    /// 400 for problems with the input, 500 with `context` for everything else
    fn from_classification(context: &str, err: Error) -> Self {
        if err.is_user_error() {
            Self::BadRequest(err.to_string())
        } else {
            metrics::counter!("sentiserve_errors_total", "kind" => err.kind().as_str()).increment(1);
            Self::Internal(format!("{context}: {err}"))
        }
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self::from_classification("Request failed", err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Rejected(status, msg) => (status, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            error!("{}", message);
        } else {
            warn!("Rejected request ({}): {}", status.as_u16(), message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
