use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::DatabaseConfig;

/// Connect the pool and bring the schema in line with the entity registry.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("catchboard::entity::*")
        .sync(&db)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "Database connected and schema synced"
    );

    Ok(db)
}
