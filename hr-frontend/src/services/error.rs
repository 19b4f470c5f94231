use reqwest::StatusCode;
use service_core::error::AppError;
use thiserror::Error;

use crate::utils::form_data::FormDataError;

/// Failures talking to the REST backend.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid request parameters: {0}")]
    InvalidQuery(#[from] FormDataError),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(what) => AppError::NotFound(anyhow::anyhow!(what)),
            ClientError::Status { status, body } => match status {
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    AppError::BadRequest(anyhow::anyhow!(body))
                }
                StatusCode::UNAUTHORIZED => AppError::Unauthorized(anyhow::anyhow!(body)),
                StatusCode::FORBIDDEN => AppError::Forbidden(anyhow::anyhow!(body)),
                StatusCode::CONFLICT => AppError::Conflict(anyhow::anyhow!(body)),
                _ => AppError::BadGateway(format!("backend returned {}", status)),
            },
            ClientError::Http(e) => AppError::BadGateway(e.to_string()),
            ClientError::Decode(e) => AppError::BadGateway(e),
            ClientError::InvalidQuery(e) => AppError::BadRequest(anyhow::anyhow!(e)),
        }
    }
}
