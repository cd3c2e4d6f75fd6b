use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use thiserror::Error;

use crate::metrics::MetricsError;
use crate::render::RenderError;
use crate::types::ResponseEnvelope;

/// Terminal failure of one publish request. `Display` is the message that
/// reaches the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Body data (JWT) error: access forbidden {0}")]
    BodyRead(#[source] axum::Error),
    #[error("could not unmarshal input data to schema {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not render publish template {0}")]
    Render(#[from] RenderError),
    #[error("publish request {0}")]
    Publish(anyhow::Error),
}

impl PipelineError {
    // 403 for a body read failure is kept from the old token check.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::BodyRead(_) => StatusCode::FORBIDDEN,
            PipelineError::Decode(_) | PipelineError::Render(_) | PipelineError::Publish(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::BodyRead(_) => "body_read",
            PipelineError::Decode(_) => "decode",
            PipelineError::Render(_) => "render",
            PipelineError::Publish(_) => "publish",
        }
    }
}

/// Failure of an auxiliary endpoint. Answered with a plain 500 envelope,
/// since these endpoints carry no service name.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Auxiliary endpoint failed: {}", self);
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let envelope = ResponseEnvelope::error("", status.as_u16(), self.to_string());
        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let read = PipelineError::BodyRead(axum::Error::new(std::io::Error::other("reset")));
        assert_eq!(read.status_code(), StatusCode::FORBIDDEN);

        let publish = PipelineError::Publish(anyhow::anyhow!("down"));
        assert_eq!(publish.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(publish.kind(), "publish");
    }

    #[test]
    fn messages_carry_underlying_error() {
        let read = PipelineError::BodyRead(axum::Error::new(std::io::Error::other("reset")));
        assert_eq!(read.to_string(), "Body data (JWT) error: access forbidden reset");

        let publish = PipelineError::Publish(anyhow::anyhow!("connection refused"));
        assert_eq!(publish.to_string(), "publish request connection refused");
    }

    #[tokio::test]
    async fn app_error_renders_error_envelope() {
        let utf8 = String::from_utf8(vec![0xff]).unwrap_err();
        let response = AppError::from(MetricsError::from(utf8)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ERROR");
        assert_eq!(json["statuscode"], "500");
        assert!(json["message"]
            .as_str()
            .unwrap()
            .starts_with("metrics output is not utf-8"));
    }
}
