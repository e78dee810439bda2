use super::catalog::Catalog;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Maximal runs of 3-5 uppercase Latin letters on word boundaries, the
/// shape of an exchange ticker appearing verbatim in text. A longer run
/// ("ABCDEF") has no inner boundary and is not a candidate.
static TICKER_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Z]{3,5})\b").unwrap());

/// Ticker-shaped uppercase runs in order of appearance
pub(crate) fn ticker_runs(text: &str) -> impl Iterator<Item = &str> {
    TICKER_RUN.find_iter(text).map(|found| found.as_str())
}

/// Resolves free text to at most one ticker.
///
/// Pure function of the query and the catalog: no hidden state, no I/O.
/// Matching runs three tiers in a fixed order and stops at the first hit:
///
/// 1. direct ticker codes in the text ("SBER падает" -> SBER),
/// 2. any variant key as a substring of the lowered query
///    ("что с газпромом" -> GAZP),
/// 3. partial name match: the first 4 characters of a catalog name, or the
///    full name, as a substring ("новости по лукойл" -> LKOH).
///
/// Known ambiguity: in tiers 2 and 3 a query mentioning several companies
/// resolves to whichever entry comes first in catalog order. This is the
/// documented behavior, not a ranking.
pub struct TickerResolver {
    catalog: Arc<Catalog>,
}

impl TickerResolver {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Find the ticker mentioned in a query, if any
    pub fn resolve(&self, query: &str) -> Option<String> {
        for candidate in ticker_runs(query) {
            if self.catalog.tickers().contains(candidate) {
                log::debug!("resolved '{candidate}' as a direct ticker code");
                return Some(candidate.to_string());
            }
        }

        let lowered = query.to_lowercase();

        for (variant, ticker) in self.catalog.variants() {
            if lowered.contains(variant) {
                log::debug!("resolved variant '{variant}' -> {ticker}");
                return Some(ticker.to_string());
            }
        }

        for (name, ticker) in self.catalog.names() {
            if name.chars().count() < 4 {
                continue;
            }
            let prefix: String = name.chars().take(4).collect();
            if lowered.contains(&prefix) || lowered.contains(name) {
                log::debug!("resolved partial name '{name}' -> {ticker}");
                return Some(ticker.to_string());
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::catalog::Security;

    fn security(ticker: &str, name: &str) -> Security {
        Security {
            ticker: ticker.to_string(),
            name: name.to_string(),
            price: 100.0,
        }
    }

    fn resolver() -> TickerResolver {
        TickerResolver::new(Arc::new(Catalog::new(vec![
            security("GAZP", "Газпром"),
            security("SBER", "Сбербанк"),
            security("LKOH", "Лукойл"),
            security("ROSN", "Роснефть"),
        ])))
    }

    #[test]
    fn test_resolves_name_in_query() {
        assert_eq!(
            resolver().resolve("Покажи новости про Газпром"),
            Some("GAZP".to_string())
        );
    }

    #[test]
    fn test_resolves_bare_ticker_code() {
        assert_eq!(resolver().resolve("SBER"), Some("SBER".to_string()));
        assert_eq!(resolver().resolve("SBER падает"), Some("SBER".to_string()));
    }

    #[test]
    fn test_resolves_inflected_name_as_variant_substring() {
        // "газпромом" and "роснефтью" still contain the full catalog name,
        // so the variant tier fires
        assert_eq!(
            resolver().resolve("что там с газпромом"),
            Some("GAZP".to_string())
        );
        assert_eq!(
            resolver().resolve("что с роснефтью"),
            Some("ROSN".to_string())
        );
    }

    #[test]
    fn test_resolves_clipped_name_via_prefix_tier() {
        // "сбером" contains no full variant; the first 4 characters of the
        // catalog name ("сбер") still match the lowered query
        assert_eq!(
            resolver().resolve("что там со сбером"),
            Some("SBER".to_string())
        );
    }

    #[test]
    fn test_unknown_company_resolves_to_none() {
        assert_eq!(resolver().resolve("биткоин"), None);
        assert_eq!(resolver().resolve(""), None);
        assert_eq!(resolver().resolve("🚀🚀🚀"), None);
    }

    #[test]
    fn test_direct_code_tier_wins_over_name_tier() {
        // Both a ticker code and another company's name are present; the
        // direct-code tier runs first
        assert_eq!(
            resolver().resolve("LKOH или Газпром?"),
            Some("LKOH".to_string())
        );
    }

    #[test]
    fn test_catalog_order_decides_between_two_names() {
        // Two company names in one query: first in catalog order wins
        assert_eq!(
            resolver().resolve("сбербанк против лукойла"),
            Some("SBER".to_string())
        );
    }

    #[test]
    fn test_long_uppercase_run_is_not_a_ticker_candidate() {
        assert_eq!(resolver().resolve("ABCDEF"), None);
    }

    #[test]
    fn test_unknown_uppercase_run_falls_through() {
        // "НОВОСТИ" is Cyrillic and "XYZQ" unknown; the name tier still fires
        assert_eq!(
            resolver().resolve("XYZQ НОВОСТИ лукойл"),
            Some("LKOH".to_string())
        );
    }

    #[test]
    fn test_resolved_ticker_is_always_in_catalog() {
        let resolver = resolver();
        for query in ["SBER", "про Газпром", "лукойл", "роснефть прогноз"] {
            let ticker = resolver.resolve(query).unwrap();
            assert!(resolver.catalog.tickers().contains(&ticker));
        }
    }
}
