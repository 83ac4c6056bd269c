//! Postgres in a container, started once per test binary.

use anyhow::{Context, Result};
use blogicum_server::infrastructure::database::run_migrations;
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

struct SharedDb {
    url: String,
    // Dropping the handle stops the container.
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_DB: OnceCell<SharedDb> = OnceCell::const_new();

impl SharedDb {
    async fn init() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16-alpine")
            .start()
            .await
            .context("failed to start Postgres container")?;

        let host = postgres.get_host().await?;
        let port = postgres.get_host_port_ipv4(5432).await?;
        let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

        let pool = PgPool::connect(&url)
            .await
            .context("failed to connect for migrations")?;
        run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
        pool.close().await;

        Ok(Self {
            url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_DB
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("failed to start the shared test database")
            })
            .await
    }
}

/// A fresh pool on the shared, migrated database.
///
/// Tests share rows, so each one creates its own users and categories
/// and only asserts on what it created.
pub struct TestDb {
    pub pool: PgPool,
}

impl TestDb {
    pub async fn new() -> Self {
        let shared = SharedDb::get().await;
        let pool = PgPool::connect(&shared.url)
            .await
            .expect("failed to connect to the test database");
        Self { pool }
    }
}
