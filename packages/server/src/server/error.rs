//! Mapping pipeline failures onto HTTP responses.

use apidoc_extraction::PipelineError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (missing `swaggerUrl`, unknown style, ...)
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

impl ApiError {
    /// Failure category reported to the caller.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "request",
            Self::Pipeline(PipelineError::Fetch(_)) => "fetch",
            Self::Pipeline(PipelineError::Extraction(_)) => "extraction",
            Self::Pipeline(PipelineError::Synthesis(_)) => "synthesis",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Pipeline(PipelineError::Fetch(_)) => StatusCode::BAD_GATEWAY,
            Self::Pipeline(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = std::error::Error::source(&self).map(ToString::to_string);
        tracing::warn!(
            status = status.as_u16(),
            kind = self.kind(),
            error = %self,
            detail = ?detail,
            "Request failed"
        );

        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}
