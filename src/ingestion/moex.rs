use super::source::IngestError;
use crate::market::Security;
use log::info;
use serde_json::Value;
use std::time::Duration;

const ISS_BASE_URL: &str = "https://iss.moex.com/iss";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the MOEX ISS API, the source of the catalog snapshot
pub struct MoexClient {
    client: reqwest::Client,
    base_url: String,
}

impl MoexClient {
    pub fn new() -> Self {
        Self::with_base_url(ISS_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Top traded shares of the TQBR board as catalog records
    pub async fn fetch_securities(&self, limit: usize) -> Result<Vec<Security>, IngestError> {
        let url = format!(
            "{}/engines/stock/markets/shares/boards/TQBR/securities.json",
            self.base_url
        );
        let payload: Value = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let securities = parse_securities(&payload)?;
        info!("✅ Fetched {} securities from MOEX", securities.len());
        Ok(securities)
    }
}

impl Default for MoexClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Map the ISS column/row payload to catalog records.
///
/// ISS returns a table as a column-name array plus row arrays; rows without
/// a name or previous price are board artifacts and are skipped.
pub fn parse_securities(payload: &Value) -> Result<Vec<Security>, IngestError> {
    let table = &payload["securities"];
    let columns = table["columns"]
        .as_array()
        .ok_or_else(|| IngestError::Payload("missing securities.columns".to_string()))?;
    let position_of = |name: &str| {
        columns
            .iter()
            .position(|column| column.as_str() == Some(name))
            .ok_or_else(|| IngestError::Payload(format!("missing column {name}")))
    };
    let secid = position_of("SECID")?;
    let shortname = position_of("SHORTNAME")?;
    let prevprice = position_of("PREVPRICE")?;

    let rows = table["data"]
        .as_array()
        .ok_or_else(|| IngestError::Payload("missing securities.data".to_string()))?;

    let mut securities = Vec::new();
    for row in rows {
        let Some(row) = row.as_array() else { continue };
        let ticker = row.get(secid).and_then(Value::as_str);
        let name = row.get(shortname).and_then(Value::as_str);
        let price = row.get(prevprice).and_then(Value::as_f64);
        if let (Some(ticker), Some(name), Some(price)) = (ticker, name, price) {
            securities.push(Security {
                ticker: ticker.to_string(),
                name: name.to_string(),
                price,
            });
        }
    }
    Ok(securities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_securities_maps_columns_by_name() {
        let payload = json!({
            "securities": {
                "columns": ["SECID", "BOARDID", "SHORTNAME", "PREVPRICE"],
                "data": [
                    ["GAZP", "TQBR", "Газпром", 150.0],
                    ["SBER", "TQBR", "Сбербанк", 250.5],
                ]
            }
        });

        let securities = parse_securities(&payload).unwrap();
        assert_eq!(securities.len(), 2);
        assert_eq!(securities[0].ticker, "GAZP");
        assert_eq!(securities[0].name, "Газпром");
        assert_eq!(securities[1].price, 250.5);
    }

    #[test]
    fn test_parse_securities_skips_rows_without_name_or_price() {
        let payload = json!({
            "securities": {
                "columns": ["SECID", "SHORTNAME", "PREVPRICE"],
                "data": [
                    ["GAZP", "Газпром", 150.0],
                    ["XXXX", null, 1.0],
                    ["YYYY", "Без цены", null],
                ]
            }
        });

        let securities = parse_securities(&payload).unwrap();
        assert_eq!(securities.len(), 1);
        assert_eq!(securities[0].ticker, "GAZP");
    }

    #[test]
    fn test_parse_securities_rejects_payload_without_table() {
        let payload = json!({"securities": {"columns": ["SECID"]}});
        assert!(matches!(
            parse_securities(&payload),
            Err(IngestError::Payload(_))
        ));
    }
}
