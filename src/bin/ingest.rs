use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use moex_news_bot::ingestion::{collect_news, default_sources, sample_news, MoexClient};
use moex_news_bot::market::{Catalog, NewsTagger};
use moex_news_bot::storage::SnapshotStorage;

/// Top traded shares to keep in the catalog snapshot
const CATALOG_LIMIT: usize = 60;
/// Feed entries considered per source on each run
const MAX_PER_SOURCE: usize = 30;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();
    info!("Starting data ingestion...");

    let storage = SnapshotStorage::from_env();

    info!("1️⃣ Fetching securities from MOEX...");
    let moex = MoexClient::new();
    let securities = match moex.fetch_securities(CATALOG_LIMIT).await {
        Ok(records) if !records.is_empty() => records,
        Ok(_) => panic!("MOEX returned an empty catalog"),
        Err(e) => panic!("Failed to fetch the catalog: {e}"),
    };
    if let Err(e) = storage.save_securities(&securities) {
        panic!("Failed to save catalog snapshot: {e}");
    }

    info!("2️⃣ Collecting news from RSS feeds...");
    let catalog = Arc::new(Catalog::new(securities));
    let tagger = Arc::new(NewsTagger::new(catalog.clone()));
    let sources = default_sources(tagger);
    let mut news = collect_news(&sources, MAX_PER_SOURCE).await;

    let tagged = news.iter().filter(|item| !item.tickers.is_empty()).count();
    if tagged == 0 {
        warn!("⚠️ No tagged news collected - adding built-in sample entries");
        news.extend(sample_news());
    }

    if let Err(e) = storage.save_news(&news) {
        panic!("Failed to save news snapshot: {e}");
    }

    let tagged = news.iter().filter(|item| !item.tickers.is_empty()).count();
    info!(
        "✅ Done: {} securities, {} news items ({} with tickers)",
        catalog.len(),
        news.len(),
        tagged
    );

    let mut mentions: HashMap<&str, usize> = HashMap::new();
    for item in &news {
        for ticker in &item.tickers {
            *mentions.entry(ticker.as_str()).or_default() += 1;
        }
    }
    let mut ranked: Vec<_> = mentions.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    if !ranked.is_empty() {
        info!("🏆 Most mentioned:");
        for (ticker, count) in ranked.into_iter().take(5) {
            info!("   {ticker}: {count} news");
        }
    }
}
