//! Server: reads config from env, picks the Postgres or in-memory store, serves the students API.

use std::sync::Arc;
use student_api::{
    app, ensure_database_exists, ensure_schema, AppConfig, AppState, InMemoryStudentStore,
    PgStudentStore, StudentStore,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("student_api=info,tower_http=info")),
        )
        .init();

    let store: Arc<dyn StudentStore> = match &config.database_url {
        Some(database_url) => {
            ensure_database_exists(database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;
            if config.auto_migrate {
                ensure_schema(&pool).await?;
            }
            Arc::new(PgStudentStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store");
            Arc::new(InMemoryStudentStore::new())
        }
    };

    let state = AppState::new(store, config.list.clone());
    let router = app(state, config.body_limit_bytes);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
