use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub cache_ttl_minutes: u64,
    pub partition_size: i32,
    pub tenant_cache_minutes: u64,
    pub warmup_category_count: i64,
    pub rate_feed_url: String,
    pub rate_refresh_secs: u64,
    pub rate_retry_attempts: u32,
    pub rate_retry_base_secs: u64,
    pub rate_failure_cooldown_secs: u64,
    pub rate_freshness_secs: u64,
    pub admin_paths: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            server_host: env::var("SERVER_HOST")?,
            server_port: env::var("SERVER_PORT")?.parse().unwrap_or(3000),
            cache_ttl_minutes: env_parse("CACHE_TTL_MINUTES", 60),
            partition_size: env_parse("PARTITION_SIZE", 1000),
            tenant_cache_minutes: env_parse("TENANT_CACHE_MINUTES", 30),
            warmup_category_count: env_parse("WARMUP_CATEGORY_COUNT", 5),
            rate_feed_url: env::var("RATE_FEED_URL")
                .unwrap_or_else(|_| "https://api.exchangerate-api.com/v4/latest/USD".into()),
            rate_refresh_secs: env_parse("RATE_REFRESH_SECONDS", 10),
            rate_retry_attempts: env_parse("RATE_RETRY_ATTEMPTS", 3),
            rate_retry_base_secs: env_parse("RATE_RETRY_BASE_SECONDS", 1),
            rate_failure_cooldown_secs: env_parse("RATE_FAILURE_COOLDOWN_SECONDS", 5),
            rate_freshness_secs: env_parse("RATE_FRESHNESS_SECONDS", 3600),
            admin_paths: parse_admin_paths(env::var("ADMIN_PATHS").ok().as_deref()),
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes * 60)
    }

    pub fn tenant_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.tenant_cache_minutes * 60)
    }

    pub fn rate_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.rate_refresh_secs)
    }

    pub fn rate_retry_base(&self) -> Duration {
        Duration::from_secs(self.rate_retry_base_secs)
    }

    pub fn rate_failure_cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_failure_cooldown_secs)
    }

    pub fn rate_freshness(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.rate_freshness_secs as i64)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 解析管理路径白名单，逗号分隔，统一转为小写
fn parse_admin_paths(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.trim().is_empty() => s
            .split(',')
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect(),
        _ => vec!["/admin".into(), "/account".into(), "/api/admin".into()],
    }
}

#[cfg(test)]
mod tests {
    use super::parse_admin_paths;

    #[test]
    fn admin_paths_default_when_unset() {
        let paths = parse_admin_paths(None);
        assert_eq!(paths, vec!["/admin", "/account", "/api/admin"]);
    }

    #[test]
    fn admin_paths_parsed_and_lowercased() {
        let paths = parse_admin_paths(Some("/Admin, /Ops ,"));
        assert_eq!(paths, vec!["/admin", "/ops"]);
    }
}
