use std::sync::Arc;
use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client as RedisClient};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 分布式缓存的通用键值抽象
///
/// 所有操作返回 RedisError，由调用方决定降级策略：
/// 读路径降级为直接查询数据源，写路径记录日志后忽略。
#[derive(Clone)]
pub struct CacheStore {
    redis: Arc<RedisClient>,
}

impl CacheStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    async fn conn(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        self.redis.get_multiplexed_async_connection().await
    }

    /// 按键读取并反序列化
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.conn().await?;
        let result: Option<String> = conn.get(key).await?;

        match result {
            Some(json) => {
                let value = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "Deserialization error",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// 序列化后写入，带过期时间
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), redis::RedisError> {
        let mut conn = self.conn().await?;

        let json = serde_json::to_string(value).map_err(|e| {
            redis::RedisError::from((
                redis::ErrorKind::IoError,
                "Serialization error",
                e.to_string(),
            ))
        })?;

        let _: () = conn.set_ex(key, json, ttl.as_secs()).await?;

        Ok(())
    }

    /// 删除单个键
    pub async fn delete(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.conn().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    /// 按前缀枚举并删除所有匹配的键，用于批量失效
    /// 返回删除的键数量
    pub async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, redis::RedisError> {
        let mut conn = self.conn().await?;
        let pattern = format!("{}*", prefix);

        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter: redis::AsyncIter<'_, String> = conn.scan_match(pattern).await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        if keys.is_empty() {
            return Ok(0);
        }

        let count = keys.len() as u64;
        let mut conn = self.conn().await?;
        let _: () = conn.del(keys).await?;

        Ok(count)
    }

    /// 检查键是否存在
    pub async fn exists(&self, key: &str) -> Result<bool, redis::RedisError> {
        let mut conn = self.conn().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }
}
