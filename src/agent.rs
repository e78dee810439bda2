use crate::market::{Catalog, NewsItem, NewsStore, Security, TickerResolver, DEFAULT_LIMIT};
use log::info;
use std::sync::Arc;

/// News items rendered in a digest; the rest are fetched but not shown
const RENDERED_LIMIT: usize = 5;

/// Shown when no company can be identified in the query
pub const GUIDANCE: &str =
    "❌ Не удалось определить компанию. Попробуйте: 'Покажи новости про Газпром'";

/// Per-query scratch state threaded through the pipeline stages
pub struct QueryState {
    pub query: String,
    pub ticker: Option<String>,
    pub stock: Option<Security>,
    pub news: Vec<NewsItem>,
    pub response: String,
}

impl QueryState {
    fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ticker: None,
            stock: None,
            news: Vec::new(),
            response: String::new(),
        }
    }
}

/// The query pipeline: extract ticker -> fetch news -> format response.
///
/// Stages run strictly in order, each mutating the query-scoped state; the
/// catalog and store are shared read-only snapshots, so any number of
/// queries can run concurrently. A re-ingestion takes effect by swapping
/// the whole agent, never by mutating a live one.
pub struct NewsAgent {
    catalog: Arc<Catalog>,
    store: Arc<NewsStore>,
    resolver: TickerResolver,
}

impl NewsAgent {
    pub fn new(catalog: Arc<Catalog>, store: Arc<NewsStore>) -> Self {
        let resolver = TickerResolver::new(catalog.clone());
        Self {
            catalog,
            store,
            resolver,
        }
    }

    /// Answer a free-text query with a formatted digest.
    ///
    /// Never fails: malformed or empty input degrades to the guidance
    /// message.
    pub fn run(&self, query: &str) -> String {
        let mut state = QueryState::new(query);
        self.extract_ticker(&mut state);
        self.fetch_news(&mut state);
        self.format_response(&mut state);
        state.response
    }

    /// Catalog access for the quote and listing commands
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve free text to a ticker without running the pipeline
    pub fn resolve_ticker(&self, query: &str) -> Option<String> {
        self.resolver.resolve(query)
    }

    /// Stage 1: resolve the query to a ticker, diagnostics only otherwise
    fn extract_ticker(&self, state: &mut QueryState) {
        state.ticker = self.resolver.resolve(&state.query);
        match &state.ticker {
            Some(ticker) => info!("1/3 extracted ticker {ticker} from '{}'", state.query),
            None => info!("1/3 no ticker found in '{}'", state.query),
        }
    }

    /// Stage 2: look up stock info and tagged news; skipped without a ticker
    fn fetch_news(&self, state: &mut QueryState) {
        let Some(ticker) = state.ticker.as_deref() else {
            state.news = Vec::new();
            info!("2/3 skipping news lookup (no ticker)");
            return;
        };

        state.stock = self.catalog.by_ticker(ticker).cloned();
        if state.stock.is_none() {
            // Tagging never invents tickers, so this only happens on a
            // catalog/news snapshot mismatch; degrade to news-only output
            log::warn!("2/3 ticker {ticker} resolved but absent from catalog");
        }
        state.news = self.store.filter_by_ticker(ticker, DEFAULT_LIMIT);
        info!("2/3 found {} news items for {ticker}", state.news.len());
    }

    /// Stage 3: render the terminal response
    fn format_response(&self, state: &mut QueryState) {
        let Some(ticker) = state.ticker.as_deref() else {
            state.response = GUIDANCE.to_string();
            return;
        };

        state.response = if state.news.is_empty() {
            format_no_news(ticker, state.stock.as_ref())
        } else {
            format_digest(ticker, state.stock.as_ref(), &state.news)
        };
        info!("3/3 response formatted ({} chars)", state.response.len());
    }
}

/// "No news found" terminal message
pub fn format_no_news(ticker: &str, stock: Option<&Security>) -> String {
    match stock {
        Some(security) => format!("📭 Новостей по {ticker} ({}) не найдено", security.name),
        None => format!("📭 Новостей по {ticker} не найдено"),
    }
}

/// Digest: header, price, count, then the first few items with links
pub fn format_digest(ticker: &str, stock: Option<&Security>, news: &[NewsItem]) -> String {
    let mut lines = Vec::new();
    match stock {
        Some(security) => {
            lines.push(format!("📊 Новости по {ticker} ({})", security.name));
            lines.push(format!("💰 Цена: {:.2} ₽", security.price));
        }
        None => lines.push(format!("📊 Новости по {ticker}")),
    }
    lines.push(format!("📰 Найдено новостей: {}\n", news.len()));

    for (position, item) in news.iter().take(RENDERED_LIMIT).enumerate() {
        lines.push(format!("{}. [{}] {}", position + 1, item.source, item.title));
        lines.push(format!("   🔗 {}", item.link));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Single-security quote, used by the /price command
pub fn format_price(security: &Security) -> String {
    format!(
        "💹 {} ({})\n💰 Цена: {:.2} ₽",
        security.ticker, security.name, security.price
    )
}
