use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use common::config::Config;
use common::errors::Error;

mod redis;

/// presence tracking for the realtime layer
#[async_trait]
pub trait Cache: Sync + Send + Debug {
    /// mark user online; called when a websocket registers
    async fn user_online(&self, user_id: &str) -> Result<(), Error>;

    /// mark user offline; called when the last connection drops
    async fn user_offline(&self, user_id: &str) -> Result<(), Error>;

    async fn is_online(&self, user_id: &str) -> Result<bool, Error>;

    async fn online_count(&self) -> Result<i64, Error>;
}

pub fn cache(config: &Config) -> Arc<dyn Cache> {
    Arc::new(redis::RedisCache::from_config(config))
}
