use crate::config::{AppConfig, DirectoryConfig};
use crate::users::{MemoryDirectory, PgUserDirectory, UserDirectory};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserDirectory>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let users = match &config.directory {
            DirectoryConfig::Postgres {
                url,
                max_connections,
            } => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(*max_connections)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }

                Arc::new(PgUserDirectory::new(db)) as Arc<dyn UserDirectory>
            }
            DirectoryConfig::Memory => {
                tracing::warn!("using in-memory user directory; data is lost on restart");
                Arc::new(MemoryDirectory::new()) as Arc<dyn UserDirectory>
            }
        };

        Ok(Self::from_parts(config, users))
    }

    pub fn from_parts(config: Arc<AppConfig>, users: Arc<dyn UserDirectory>) -> Self {
        Self { config, users }
    }

    #[cfg(test)]
    /// State backed by an empty in-memory directory and a fixed test secret.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            directory: DirectoryConfig::Memory,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                ttl_days: 90,
            },
            host: "127.0.0.1".into(),
            port: 0,
        });

        Self::from_parts(config, Arc::new(MemoryDirectory::new()))
    }
}
