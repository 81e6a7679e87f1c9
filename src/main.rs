//! Visage storefront server

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visage_storefront::config::Config;
use visage_storefront::domain::events::EventPublisher;
use visage_storefront::services::{auth, catalog};
use visage_storefront::{build_app, db, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "NATS unavailable, domain events disabled");
                None
            }
        },
        None => None,
    };
    let events = EventPublisher::new(nats);

    auth::ensure_admin(&pool, &config.admin_username, config.admin_password.as_deref()).await?;
    if config.seed_catalog {
        catalog::seed(&pool, &events, config.seed_stock).await?;
    }

    let port = config.port;
    let state = AppState { db: pool, events, config: Arc::new(config) };
    let app = build_app(state);

    tracing::info!("Visage storefront listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
