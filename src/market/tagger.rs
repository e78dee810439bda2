use super::catalog::Catalog;
use super::resolver::ticker_runs;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip markup tags, collapse whitespace runs, trim.
///
/// Feed entries arrive with embedded HTML and ragged spacing; everything
/// stored or tagged goes through this first.
pub fn clean_text(text: &str) -> String {
    let stripped = MARKUP.replace_all(text, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Tags free text with every catalog ticker it mentions.
///
/// Unlike the resolver this is a multi-match: the union of direct ticker
/// codes and case-insensitive variant substrings, deduplicated. There is
/// deliberately no partial-name fallback here - at feed volume it tags far
/// too much noise.
pub struct NewsTagger {
    catalog: Arc<Catalog>,
}

impl NewsTagger {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// All tickers mentioned in the text, sorted
    pub fn tag(&self, text: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();

        for candidate in ticker_runs(text) {
            if self.catalog.tickers().contains(candidate) {
                found.insert(candidate.to_string());
            }
        }

        let lowered = text.to_lowercase();
        for (variant, ticker) in self.catalog.variants() {
            if lowered.contains(&variant.to_lowercase()) {
                found.insert(ticker.to_string());
            }
        }

        found
    }
}
