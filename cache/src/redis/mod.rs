use async_trait::async_trait;
use redis::AsyncCommands;

use common::config::Config;
use common::errors::Error;

use crate::Cache;

const USER_ONLINE_SET: &str = "user_online_set";

#[derive(Debug)]
pub struct RedisCache {
    client: redis::Client,
}

impl RedisCache {
    #[allow(dead_code)]
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = redis::Client::open(config.redis.url()).expect("redis url invalid");
        RedisCache { client }
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn user_online(&self, user_id: &str) -> Result<(), Error> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.sadd::<_, _, ()>(USER_ONLINE_SET, user_id).await?;
        Ok(())
    }

    async fn user_offline(&self, user_id: &str) -> Result<(), Error> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.srem::<_, _, ()>(USER_ONLINE_SET, user_id).await?;
        Ok(())
    }

    async fn is_online(&self, user_id: &str) -> Result<bool, Error> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let result: bool = conn.sismember(USER_ONLINE_SET, user_id).await?;
        Ok(result)
    }

    async fn online_count(&self) -> Result<i64, Error> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let result: i64 = conn.scard(USER_ONLINE_SET).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Deref;
    use std::thread;

    use tokio::runtime::Runtime;

    use super::*;

    struct TestRedis {
        client: redis::Client,
        cache: RedisCache,
    }

    impl Deref for TestRedis {
        type Target = RedisCache;
        fn deref(&self) -> &Self::Target {
            &self.cache
        }
    }

    impl Drop for TestRedis {
        fn drop(&mut self) {
            let client = self.client.clone();
            thread::spawn(move || {
                Runtime::new().unwrap().block_on(async {
                    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
                    let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await.unwrap();
                })
            })
            .join()
            .unwrap();
        }
    }

    impl TestRedis {
        // tests run in parallel, so each one gets its own database number
        // to keep the flush in drop from clobbering a neighbour
        fn from_db(db: u8) -> Self {
            let config = Config::load("../common/fixtures/devconnect.yml").unwrap();
            let url = format!("{}/{}", config.redis.url(), db);
            let client = redis::Client::open(url).unwrap();
            let cache = RedisCache::new(client.clone());
            TestRedis { client, cache }
        }
    }

    #[tokio::test]
    #[ignore = "requires a running redis"]
    async fn online_round_trip() {
        let cache = TestRedis::from_db(9);
        cache.user_online("u1").await.unwrap();
        assert!(cache.is_online("u1").await.unwrap());
        assert_eq!(cache.online_count().await.unwrap(), 1);
        cache.user_offline("u1").await.unwrap();
        assert!(!cache.is_online("u1").await.unwrap());
    }
}
