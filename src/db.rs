//! Database connection management
//!
//! Builds the connection pool and bootstraps the schema.

pub mod queries;
pub mod service;

pub use service::PgStore;

use crate::config::DatabaseConfig;
use crate::error::AppError;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tracing::{debug, info};

/// Database manager owning the connection pool
pub struct DatabaseManager {
    pool: Pool,
}

impl DatabaseManager {
    /// Create the pool and verify it with a round trip
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = Self::create_pool(config)?;

        // Test connection
        let client = pool.get().await?;
        client.query_one("SELECT 1", &[]).await?;
        drop(client);

        info!(
            "Database pool established ({}:{}/{}, TLS: {})",
            config.host, config.port, config.database, config.use_tls
        );

        Ok(Self { pool })
    }

    /// Create a connection pool with given configuration
    fn create_pool(config: &DatabaseConfig) -> Result<Pool, AppError> {
        let mut cfg = Config::new();
        cfg.host = Some(config.host.clone());
        cfg.port = Some(config.port);
        cfg.user = Some(config.user.clone());
        cfg.password = Some(config.password.clone());
        cfg.dbname = Some(config.database.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(config.max_pool_size));

        if config.use_tls {
            let certs = rustls_native_certs::load_native_certs();
            let mut root_store = rustls::RootCertStore::empty();
            for cert in certs.certs {
                root_store.add(cert).ok();
            }

            let tls_config = rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth();

            let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
            cfg.create_pool(Some(Runtime::Tokio1), tls)
                .map_err(|e| AppError::Config(format!("Failed to create TLS pool: {}", e)))
        } else {
            cfg.create_pool(Some(Runtime::Tokio1), NoTls)
                .map_err(|e| AppError::Config(format!("Failed to create pool: {}", e)))
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Create tables and indexes if they don't exist
    pub async fn bootstrap_schema(&self) -> Result<(), AppError> {
        let client = self.pool.get().await?;
        for statement in queries::SCHEMA {
            client.batch_execute(statement).await?;
        }
        debug!("Applied {} schema statements", queries::SCHEMA.len());
        info!("✅ Database tables initialized");
        Ok(())
    }

    /// Record store over this pool
    pub fn store(&self) -> PgStore {
        PgStore::new(self.pool.clone())
    }
}
