/// Data ingestion: MOEX catalog fetch and RSS news collection
pub mod moex;
pub mod rss;
pub mod source;

// Re-export commonly used types
pub use moex::MoexClient;
pub use rss::{collect_news, default_sources, sample_news, RssFeedSource, FEED_URLS};
pub use source::{IngestError, NewsSource};
