//! Request handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use folio_core::PortfolioSnapshot;
use folio_extract::{answer_question, recommendations, what_if, ExtractionReport, Pipeline};
use folio_traits::{DocumentParser, IngestionError};

/// Default request body limit in bytes.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application state.
pub struct AppState {
    /// Turns uploaded documents into fragments
    pub parser: Arc<dyn DocumentParser>,
    /// Extraction and aggregation
    pub pipeline: Pipeline,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create state with the default upload limit.
    pub fn new(parser: Arc<dyn DocumentParser>, pipeline: Pipeline) -> Self {
        Self {
            parser,
            pipeline,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Override the upload limit.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    parser: String,
}

/// Health check handler.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        parser: state.parser.name().to_string(),
    })
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ErrorResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Fallback for wrong methods on POST-only endpoints.
pub async fn method_not_allowed() -> Response {
    ErrorResponse::new("Method not allowed").into_response_with(StatusCode::METHOD_NOT_ALLOWED)
}

// =============================================================================
// PARSE PORTFOLIO
// =============================================================================

/// Parse response: the extraction report plus recommendations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsePortfolioResponse {
    /// Snapshot, failures and ignored fragments.
    #[serde(flatten)]
    pub report: ExtractionReport,
    /// Rule-based suggestions for the snapshot.
    pub recommendations: Vec<String>,
}

const PROCESSING_FAILED: &str = "Failed to process portfolio";

/// Read the `file` field of a multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<Bytes>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            return field.bytes().await.map(Some);
        }
    }
    Ok(None)
}

/// Upload a statement and return the extracted snapshot.
pub async fn parse_portfolio(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            return ErrorResponse::new("Expected a multipart/form-data body")
                .with_details(e.body_text())
                .into_response_with(StatusCode::BAD_REQUEST);
        }
    };

    let document = match read_file_field(&mut multipart).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            return ErrorResponse::new("No file uploaded")
                .into_response_with(StatusCode::BAD_REQUEST);
        }
        Err(e) => {
            // Oversized uploads surface here as 413.
            let status = e.status();
            return ErrorResponse::new("Unreadable multipart body")
                .with_details(e.body_text())
                .into_response_with(status);
        }
    };

    info!(
        "Parsing {} byte document with {}",
        document.len(),
        state.parser.name()
    );

    let fragments = match state.parser.parse(document).await {
        Ok(fragments) => fragments,
        Err(IngestionError::EmptyDocument) => {
            return ErrorResponse::new("Uploaded file is empty")
                .into_response_with(StatusCode::BAD_REQUEST);
        }
        Err(e) => {
            error!("Document ingestion failed: {}", e);
            return ErrorResponse::new(PROCESSING_FAILED)
                .with_details(e.to_string())
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let report = match state.pipeline.run(&fragments) {
        Ok(report) => report,
        Err(e) => {
            error!("Extraction failed: {}", e);
            return ErrorResponse::new(PROCESSING_FAILED)
                .with_details(e.to_string())
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if !report.is_complete() {
        warn!(
            "Partial snapshot: {} field failures",
            report.extraction_failures.len()
        );
    }

    let recommendations = recommendations(&report.snapshot);
    (
        StatusCode::OK,
        Json(ParsePortfolioResponse {
            report,
            recommendations,
        }),
    )
        .into_response()
}

// =============================================================================
// QUESTIONS
// =============================================================================

/// Question request.
#[derive(Debug, Deserialize)]
pub struct AskQuestionRequest {
    /// Free-text question.
    pub question: String,
    /// Snapshot to answer against.
    #[serde(default)]
    pub portfolio: Option<PortfolioSnapshot>,
}

/// Question response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AskQuestionResponse {
    /// Generated answer.
    pub answer: String,
}

/// Answer a question about a portfolio.
pub async fn ask_question(request: Result<Json<AskQuestionRequest>, JsonRejection>) -> Response {
    let Json(request) = match request {
        Ok(r) => r,
        Err(e) => {
            return ErrorResponse::new("Invalid request body")
                .with_details(e.body_text())
                .into_response_with(StatusCode::BAD_REQUEST);
        }
    };

    if request.question.trim().is_empty() {
        return ErrorResponse::new("Question is required")
            .into_response_with(StatusCode::BAD_REQUEST);
    }

    debug!("Question: {}", request.question);
    let answer = answer_question(&request.question, request.portfolio.as_ref());

    (StatusCode::OK, Json(AskQuestionResponse { answer })).into_response()
}

// =============================================================================
// WHAT-IF
// =============================================================================

/// What-if request.
#[derive(Debug, Deserialize)]
pub struct WhatIfRequest {
    /// Snapshot to reweight.
    pub portfolio: PortfolioSnapshot,
    /// New weights (fractions) keyed by symbol.
    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

/// Reweight holdings and return the new exposures.
pub async fn what_if_analysis(request: Result<Json<WhatIfRequest>, JsonRejection>) -> Response {
    let Json(request) = match request {
        Ok(r) => r,
        Err(e) => {
            return ErrorResponse::new("Invalid request body")
                .with_details(e.body_text())
                .into_response_with(StatusCode::BAD_REQUEST);
        }
    };

    match what_if(&request.portfolio, &request.weights) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => ErrorResponse::new("Invalid what-if request")
            .with_details(e.to_string())
            .into_response_with(StatusCode::BAD_REQUEST),
    }
}
