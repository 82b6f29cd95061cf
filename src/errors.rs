use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
///
/// The first four variants form the scoring pipeline's failure taxonomy; each one
/// reaches the caller as a distinct response and none of them is retried.
#[derive(Debug)]
pub enum AppError {
    /// A required raw applicant field was absent from the payload.
    SchemaError(String),
    /// A required numeric feature was missing or unusable after engineering.
    EncodingError(String),
    /// The model could not produce a usable probability.
    ScoringError(String),
    /// The prediction store rejected a read or write.
    PersistenceError(sqlx::Error),
    /// Bad request error (malformed payload or query).
    BadRequest(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl AppError {
    /// Stable machine-readable name of the error class, returned in response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::SchemaError(_) => "schema_error",
            AppError::EncodingError(_) => "encoding_error",
            AppError::ScoringError(_) => "scoring_error",
            AppError::PersistenceError(_) => "persistence_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::InternalError(_) => "internal_error",
            AppError::WithContext { source, .. } => source.kind(),
        }
    }

    /// HTTP status the error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::SchemaError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::EncodingError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ScoringError(_)
            | AppError::PersistenceError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::WithContext { source, .. } => source.status(),
        }
    }
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::SchemaError(msg) => write!(f, "Schema error: {}", msg),
            AppError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            AppError::ScoringError(msg) => write!(f, "Scoring error: {}", msg),
            AppError::PersistenceError(e) => write!(f, "Persistence error: {}", e),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::PersistenceError(e) => Some(e),
            AppError::WithContext { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Client-caused errors echo their message back; server-side failures are
    /// logged in full and answered with a generic message.
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let error_message = match self {
            AppError::SchemaError(msg) => {
                tracing::warn!("Schema error: {}", msg);
                msg
            }
            AppError::EncodingError(msg) => {
                tracing::warn!("Encoding error: {}", msg);
                msg
            }
            AppError::BadRequest(msg) => msg,
            AppError::ScoringError(msg) => {
                tracing::error!("Scoring error: {}", msg);
                "Scoring failed".to_string()
            }
            AppError::PersistenceError(e) => {
                tracing::error!("Persistence error: {:?}", e);
                "Prediction store unavailable".to_string()
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::WithContext { source, context } => {
                // Log full context chain, then answer as the underlying error
                tracing::error!("Error with context: {} -> {}", context, source);
                return source.into_response();
            }
        };

        let body = Json(json!({
            "error": error_message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    /// Converts a `sqlx::Error` into an `AppError`.
    fn from(err: sqlx::Error) -> Self {
        AppError::PersistenceError(err)
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Arguments
    ///
    /// * `context` - The context message to add.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }
}

/// Extension for sqlx::Error to add context
impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::PersistenceError(e)),
            context: context.into(),
        })
    }
}
