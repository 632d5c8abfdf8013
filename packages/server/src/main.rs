use std::net::SocketAddr;

use anyhow::Context;
use tracing::{Level, info};

use catchboard::config::AppConfig;
use catchboard::state::AppState;
use catchboard::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database).await?;
    seed::seed_role_permissions(&db).await?;
    seed::ensure_indexes(&db).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    if config.scoring.auto_enroll {
        info!("Scoring enrolls anglers on their first verified fish");
    }

    let app = build_router(AppState { db, config });

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
