mod config;
mod error;
mod handlers;
mod metrics;
mod pipeline;
mod publisher;
mod render;
mod response;
mod types;

use std::sync::Arc;

use log::{error, info};

use config::Config;
use handlers::AppState;
use pipeline::Pipeline;
use publisher::RedisPublisher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&config::log_level_from_env())
        .init();

    let config = Config::from_env().inspect_err(|e| error!("Invalid configuration: {}", e))?;
    let config = Arc::new(config);
    info!(
        "Starting {} {} (log level {})",
        config.name, config.version, config.log_level
    );

    let publisher = Arc::new(RedisPublisher::open(&config.redis_url)?);
    info!("Publishing to topic {} via {}", config.topic, config.redis_url);

    let pipeline = Pipeline::new(&config, publisher);
    let state = Arc::new(AppState {
        config: config.clone(),
        pipeline,
    });
    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
