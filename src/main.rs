use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;

use moex_news_bot::agent::NewsAgent;
use moex_news_bot::deployment::{detect_deployment_mode, run_polling_mode, DeploymentMode};
use moex_news_bot::market::{Catalog, NewsStore};
use moex_news_bot::storage::SnapshotStorage;

#[cfg(feature = "axum-server")]
use moex_news_bot::deployment::run_webhook_mode;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();
    info!("Starting MOEX news bot...");

    let storage = SnapshotStorage::from_env();
    let securities = match storage.load_securities() {
        Ok(records) => records,
        Err(e) => {
            panic!("Catalog snapshot is required to start: {e}. Run the ingest binary first.");
        }
    };
    let news = storage.load_news().unwrap_or_else(|e| {
        warn!("⚠️ News snapshot unavailable ({e}) - starting with an empty store");
        Vec::new()
    });

    let catalog = Arc::new(Catalog::new(securities));
    let store = Arc::new(NewsStore::new(news));
    info!(
        "📦 Snapshots loaded: {} securities, {} news items",
        catalog.len(),
        store.len()
    );

    let agent = Arc::new(NewsAgent::new(catalog, store));

    let bot = Bot::from_env();
    let deployment_mode = detect_deployment_mode();

    info!("🚀 Bot deployment detection: {deployment_mode}");

    let result = match deployment_mode {
        DeploymentMode::Webhook => {
            #[cfg(feature = "axum-server")]
            {
                run_webhook_mode(bot, agent).await
            }
            #[cfg(not(feature = "axum-server"))]
            {
                panic!("Production environment detected but axum-server feature not enabled. Compile with --features axum-server");
            }
        }
        DeploymentMode::Polling => {
            run_polling_mode(bot, agent).await;
            Ok(())
        }
    };

    if let Err(e) = result {
        panic!("Bot failed to start: {e}");
    }
}
