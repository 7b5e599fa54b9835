use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_days: i64,
}

/// Where user records live.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub enum DirectoryConfig {
    Postgres { url: String, max_connections: u32 },
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub directory: DirectoryConfig,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend = std::env::var("DIRECTORY_BACKEND").unwrap_or_else(|_| "postgres".into());
        let directory = match backend.as_str() {
            "postgres" => DirectoryConfig::Postgres {
                url: std::env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(10),
            },
            "memory" => DirectoryConfig::Memory,
            other => anyhow::bail!("unknown DIRECTORY_BACKEND {other:?}"),
        };

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            ttl_days: std::env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(90),
        };

        let port = match std::env::var("APP_PORT") {
            Ok(v) => v.parse::<u16>().with_context(|| format!("invalid APP_PORT {v:?}"))?,
            Err(_) => 3000,
        };

        Ok(Self {
            directory,
            jwt,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
        })
    }
}
