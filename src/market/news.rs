use serde::{Deserialize, Deserializer, Serialize};

/// Items returned per ticker query unless the caller asks otherwise
pub const DEFAULT_LIMIT: usize = 10;

/// Ingestion-time caps on stored text
pub const TITLE_LIMIT: usize = 200;
pub const SUMMARY_LIMIT: usize = 500;

/// A collected news entry, immutable once ingested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub link: String,
    /// ISO-8601 publication time; feeds do not always provide one
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub source: String,
    /// Tickers the tagger found in the entry text, sorted
    #[serde(default, deserialize_with = "tickers_or_empty")]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

/// A missing, null, or non-list `tickers` field in a snapshot record is an
/// empty list, never a parse failure.
fn tickers_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    })
}

/// Character-based truncation, safe for Cyrillic text
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Read-only collection of ingested news, shared across queries.
pub struct NewsStore {
    items: Vec<NewsItem>,
}

impl NewsStore {
    pub fn new(items: Vec<NewsItem>) -> Self {
        Self { items }
    }

    /// Items tagged with the ticker, newest first, at most `limit`.
    ///
    /// Publication times are compared as ISO-8601 strings (a total
    /// lexicographic order); items without one sort last, and ties keep
    /// ingestion order. If no item carries a publication time the result
    /// degrades to ingestion order.
    pub fn filter_by_ticker(&self, ticker: &str, limit: usize) -> Vec<NewsItem> {
        let mut matched: Vec<&NewsItem> = self
            .items
            .iter()
            .filter(|item| item.tickers.iter().any(|tagged| tagged == ticker))
            .collect();
        matched.sort_by(|a, b| b.published.cmp(&a.published));
        matched.into_iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, published: Option<&str>, tickers: &[&str]) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            link: format!("https://example.com/{title}"),
            published: published.map(str::to_string),
            source: "test".to_string(),
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
            summary: String::new(),
        }
    }

    #[test]
    fn test_filter_returns_only_tagged_items_newest_first() {
        let store = NewsStore::new(vec![
            item("old", Some("2026-01-28T10:00:00"), &["GAZP"]),
            item("other", Some("2026-01-30T10:00:00"), &["SBER"]),
            item("new", Some("2026-01-30T09:00:00"), &["GAZP", "ROSN"]),
        ]);

        let found = store.filter_by_ticker("GAZP", DEFAULT_LIMIT);
        let titles: Vec<&str> = found.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old"]);
        for entry in &found {
            assert!(entry.tickers.contains(&"GAZP".to_string()));
        }
    }

    #[test]
    fn test_limit_truncates_after_sorting() {
        let items: Vec<NewsItem> = (0..7)
            .map(|n| {
                let published = format!("2026-01-{:02}T10:00:00", n + 1);
                item(&format!("n{n}"), Some(published.as_str()), &["GAZP"])
            })
            .collect();
        let store = NewsStore::new(items);

        let found = store.filter_by_ticker("GAZP", 5);
        assert_eq!(found.len(), 5);
        assert_eq!(found[0].title, "n6");
        assert_eq!(found[4].title, "n2");
    }

    #[test]
    fn test_missing_published_sorts_last_and_ties_keep_ingestion_order() {
        let store = NewsStore::new(vec![
            item("undated-a", None, &["GAZP"]),
            item("tied-a", Some("2026-01-30T10:00:00"), &["GAZP"]),
            item("tied-b", Some("2026-01-30T10:00:00"), &["GAZP"]),
            item("undated-b", None, &["GAZP"]),
        ]);

        let titles: Vec<String> = store
            .filter_by_ticker("GAZP", DEFAULT_LIMIT)
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["tied-a", "tied-b", "undated-a", "undated-b"]);
    }

    #[test]
    fn test_no_published_anywhere_degrades_to_ingestion_order() {
        let store = NewsStore::new(vec![
            item("first", None, &["GAZP"]),
            item("second", None, &["GAZP"]),
        ]);
        let titles: Vec<String> = store
            .filter_by_ticker("GAZP", DEFAULT_LIMIT)
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_malformed_tickers_field_deserializes_to_empty() {
        let null: NewsItem =
            serde_json::from_str(r#"{"title": "a", "tickers": null}"#).unwrap();
        assert!(null.tickers.is_empty());

        let scalar: NewsItem =
            serde_json::from_str(r#"{"title": "b", "tickers": "GAZP"}"#).unwrap();
        assert!(scalar.tickers.is_empty());

        let missing: NewsItem = serde_json::from_str(r#"{"title": "c"}"#).unwrap();
        assert!(missing.tickers.is_empty());
        assert!(missing.published.is_none());
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        let cyrillic = "Газпром увеличил добычу";
        assert_eq!(truncate_chars(cyrillic, 7), "Газпром");
        assert_eq!(truncate_chars("short", 200), "short");
    }
}
