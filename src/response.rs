use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use log::error;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::PipelineError;
use crate::types::ResponseEnvelope;

pub const SUCCESS_MESSAGE: &str = "published successfully";

/// A status code paired with the envelope written after it.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub envelope: ResponseEnvelope,
}

impl Reply {
    pub fn success(name: &str) -> Self {
        Self {
            status: StatusCode::OK,
            envelope: ResponseEnvelope::success(name, SUCCESS_MESSAGE),
        }
    }

    pub fn failure(name: &str, err: &PipelineError) -> Self {
        let status = err.status_code();
        Self {
            status,
            envelope: ResponseEnvelope::error(name, status.as_u16(), err.to_string()),
        }
    }
}

/// Tab-indented JSON, the layout existing callers already parse.
pub fn to_indented_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    Ok(buf)
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match to_indented_json(&self.envelope) {
            Ok(body) => (
                self.status,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => {
                error!("Could not serialize response envelope: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope() {
        let reply = Reply::success("svc");
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.envelope.status, "OK");
        assert_eq!(reply.envelope.status_code, "200");
        assert_eq!(reply.envelope.message, SUCCESS_MESSAGE);
    }

    #[test]
    fn failure_envelope_uses_error_status() {
        let err = PipelineError::Publish(anyhow::anyhow!("down"));
        let reply = Reply::failure("svc", &err);
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.envelope.status, "ERROR");
        assert_eq!(reply.envelope.status_code, "500");
        assert_eq!(reply.envelope.message, "publish request down");
    }

    #[test]
    fn indented_with_tabs() {
        let body = to_indented_json(&ResponseEnvelope::success("svc", "ok")).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert_eq!(
            text,
            "{\n\t\"name\": \"svc\",\n\t\"statuscode\": \"200\",\n\t\"status\": \"OK\",\n\t\"message\": \"ok\"\n}"
        );
    }

    #[tokio::test]
    async fn into_response_writes_status_then_body() {
        let response = Reply::success("svc").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("\"status\": \"OK\""));
    }
}
