use std::sync::Arc;

use axum::body::{Body, Bytes};
use log::{debug, error, trace};
use serde::de::Error as _;

use crate::config::Config;
use crate::error::PipelineError;
use crate::metrics;
use crate::publisher::Publisher;
use crate::render::Renderer;
use crate::response::Reply;
use crate::types::GenericSchema;

/// Decode, render and publish one request body, then describe the outcome.
///
/// Each stage short-circuits on failure. Nothing is retried and nothing is
/// kept between requests.
pub struct Pipeline {
    name: String,
    topic: String,
    renderer: Renderer,
    publisher: Arc<dyn Publisher>,
}

impl Pipeline {
    pub fn new(config: &Config, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            name: config.name.clone(),
            topic: config.topic.clone(),
            renderer: Renderer::default(),
            publisher,
        }
    }

    pub async fn handle(&self, body: Option<Body>) -> Reply {
        match self.run(body).await {
            Ok(()) => {
                metrics::PUBLISHED.inc();
                Reply::success(&self.name)
            }
            Err(err) => {
                error!("send_payload {} failed: {:?}", err.kind(), err);
                metrics::FAILURES.with_label_values(&[err.kind()]).inc();
                Reply::failure(&self.name, &err)
            }
        }
    }

    async fn run(&self, body: Option<Body>) -> Result<(), PipelineError> {
        // An absent body is read as empty; decode then rejects it.
        let body = body.unwrap_or_else(Body::empty);
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(PipelineError::BodyRead)?;

        let schema = decode(&bytes)?;
        trace!("send_payload new schema {:?}", schema.request);

        let message = self.renderer.render(schema.request.as_ref())?;
        trace!("send_payload payload {}", message);

        self.publisher
            .publish(&self.topic, &message)
            .await
            .map_err(PipelineError::Publish)?;

        debug!(
            "send_payload published successfully {}",
            String::from_utf8_lossy(&bytes)
        );
        Ok(())
    }
}

fn decode(bytes: &Bytes) -> Result<GenericSchema, PipelineError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if value.is_null() {
        return Ok(GenericSchema::default());
    }
    if !value.is_object() {
        return Err(serde_json::Error::custom("expected a JSON object").into());
    }
    Ok(GenericSchema::from_value(value)?)
}
