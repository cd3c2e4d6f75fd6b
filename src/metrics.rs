use std::string::FromUtf8Error;

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("could not encode metrics: {0}")]
    Encode(#[from] prometheus::Error),
    #[error("metrics output is not utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

lazy_static! {
    pub static ref HTTP_DURATION: HistogramVec = register_histogram_vec!(
        "redis_publisher_http_duration_seconds",
        "Duration of HTTP requests.",
        &["path"]
    )
    .unwrap();
    pub static ref PUBLISHED: IntCounter = register_int_counter!(
        "redis_publisher_published_total",
        "Messages published to the topic."
    )
    .unwrap();
    pub static ref FAILURES: IntCounterVec = register_int_counter_vec!(
        "redis_publisher_failures_total",
        "Publish requests that failed, by stage.",
        &["kind"]
    )
    .unwrap();
}

/// Prometheus text exposition of the default registry.
pub fn render() -> Result<String, MetricsError> {
    let mut buf = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
