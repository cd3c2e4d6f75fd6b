use async_trait::async_trait;
use log::debug;
use redis::AsyncCommands;

/// Hands a rendered message to the pub/sub transport.
///
/// One call, one attempt: implementations must not retry or batch.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, message: &str) -> anyhow::Result<()>;
}

pub struct RedisPublisher {
    client: redis::Client,
}

impl RedisPublisher {
    /// Validates the URL only; the connection is made on first publish.
    pub fn open(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Publisher for RedisPublisher {
    async fn publish(&self, topic: &str, message: &str) -> anyhow::Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let receivers: i64 = conn.publish(topic, message).await?;
        debug!("Published to {} ({} receivers)", topic, receivers);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_accepts_redis_url() {
        assert!(RedisPublisher::open("redis://127.0.0.1:6379").is_ok());
    }

    #[test]
    fn open_rejects_bad_scheme() {
        assert!(RedisPublisher::open("http://127.0.0.1:6379").is_err());
    }
}
