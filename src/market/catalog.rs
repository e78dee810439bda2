use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A listed security from the catalog snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    /// Exchange ticker (e.g., "GAZP")
    pub ticker: String,
    /// Display name (e.g., "Газпром")
    pub name: String,
    /// Last known price in rubles
    #[serde(default)]
    pub price: f64,
}

/// Lookup index built once from the catalog snapshot.
///
/// Holds the direct-ticker set, the variant map (every cased form of a name
/// or ticker mapped to its canonical ticker), and the name list used by the
/// resolver's partial-name fallback. Iteration order everywhere is the
/// insertion order of the source snapshot; when two securities collide on a
/// variant key the later one overwrites the mapped ticker while the key
/// keeps its original position. This makes substring scans deterministic
/// for a fixed snapshot, which the resolver relies on.
pub struct Catalog {
    securities: Vec<Security>,
    by_ticker: HashMap<String, usize>,
    tickers: HashSet<String>,
    variants: Vec<(String, String)>,
    variant_index: HashMap<String, usize>,
    names: Vec<(String, String)>,
}

impl Catalog {
    /// Build the index from an ordered snapshot of securities
    pub fn new(securities: Vec<Security>) -> Self {
        let mut by_ticker = HashMap::new();
        let mut tickers = HashSet::new();
        let mut variants: Vec<(String, String)> = Vec::new();
        let mut variant_index: HashMap<String, usize> = HashMap::new();
        let mut names: Vec<(String, String)> = Vec::new();
        let mut name_index: HashMap<String, usize> = HashMap::new();

        for (position, security) in securities.iter().enumerate() {
            // First occurrence wins for the ticker -> record lookup
            by_ticker
                .entry(security.ticker.clone())
                .or_insert(position);
            tickers.insert(security.ticker.clone());

            let keys = [
                security.name.to_lowercase(),
                security.name.to_uppercase(),
                security.ticker.to_lowercase(),
                security.ticker.to_uppercase(),
            ];
            for key in keys {
                match variant_index.get(&key) {
                    Some(&at) => variants[at].1 = security.ticker.clone(),
                    None => {
                        variant_index.insert(key.clone(), variants.len());
                        variants.push((key, security.ticker.clone()));
                    }
                }
            }

            let lowered = security.name.to_lowercase();
            match name_index.get(&lowered) {
                Some(&at) => names[at].1 = security.ticker.clone(),
                None => {
                    name_index.insert(lowered.clone(), names.len());
                    names.push((lowered, security.ticker.clone()));
                }
            }
        }

        Self {
            securities,
            by_ticker,
            tickers,
            variants,
            variant_index,
            names,
        }
    }

    /// All known ticker codes
    pub fn tickers(&self) -> &HashSet<String> {
        &self.tickers
    }

    /// Exact-match lookup against the variant map
    pub fn resolve_variant(&self, text: &str) -> Option<&str> {
        self.variant_index
            .get(text)
            .map(|&at| self.variants[at].1.as_str())
    }

    /// Security record for a ticker
    pub fn by_ticker(&self, ticker: &str) -> Option<&Security> {
        self.by_ticker
            .get(ticker)
            .map(|&position| &self.securities[position])
    }

    /// (variant key, ticker) pairs in construction order
    pub fn variants(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variants
            .iter()
            .map(|(variant, ticker)| (variant.as_str(), ticker.as_str()))
    }

    /// (lower-cased name, ticker) pairs in construction order
    pub fn names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(|(name, ticker)| (name.as_str(), ticker.as_str()))
    }

    /// Number of securities in the snapshot
    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }

    /// Securities in snapshot order
    pub fn securities(&self) -> &[Security] {
        &self.securities
    }
}
