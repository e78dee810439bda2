use super::source::{IngestError, NewsSource};
use crate::market::news::{truncate_chars, SUMMARY_LIMIT, TITLE_LIMIT};
use crate::market::{clean_text, NewsItem, NewsTagger};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use rss::Channel;
use std::sync::Arc;
use std::time::Duration;

/// Feeds that regularly cover listed companies
pub const FEED_URLS: [(&str, &str); 3] = [
    ("cbr", "http://www.cbr.ru/rss/RssNews"),
    ("investfunds", "https://www.investfunds.ru/news/rss/"),
    ("smart_lab", "https://smart-lab.ru/rss/"),
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One RSS feed as a news source: fetches the channel, cleanses each
/// entry, tags it against the catalog, and caps stored text lengths.
pub struct RssFeedSource {
    name: String,
    url: String,
    client: reqwest::Client,
    tagger: Arc<NewsTagger>,
}

impl RssFeedSource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        client: reqwest::Client,
        tagger: Arc<NewsTagger>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client,
            tagger,
        }
    }

    /// Cleanse, tag, and truncate one feed entry; entries without a title
    /// are dropped
    fn entry_to_item(&self, entry: &rss::Item) -> Option<NewsItem> {
        let title = clean_text(entry.title().unwrap_or(""));
        if title.is_empty() {
            return None;
        }
        let summary = clean_text(entry.description().unwrap_or(""));

        let full_text = format!("{title} {summary}");
        let tickers: Vec<String> = self.tagger.tag(&full_text).into_iter().collect();

        let published = entry
            .pub_date()
            .map(normalize_published)
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        Some(NewsItem {
            title: truncate_chars(&title, TITLE_LIMIT),
            link: entry.link().unwrap_or("").to_string(),
            published: Some(published),
            source: self.name.clone(),
            tickers,
            summary: truncate_chars(&summary, SUMMARY_LIMIT),
        })
    }
}

#[async_trait]
impl NewsSource for RssFeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, max_items: usize) -> Result<Vec<NewsItem>, IngestError> {
        let body = self
            .client
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let channel =
            Channel::read_from(&body[..]).map_err(|e| IngestError::Parse(e.to_string()))?;

        Ok(channel
            .items()
            .iter()
            .take(max_items)
            .filter_map(|entry| self.entry_to_item(entry))
            .collect())
    }
}

/// RSS pubDate is RFC 2822; snapshots store ISO-8601 so the store can sort
/// lexicographically. An unparseable date is kept verbatim.
fn normalize_published(raw: &str) -> String {
    DateTime::parse_from_rfc2822(raw)
        .map(|parsed| parsed.to_rfc3339())
        .unwrap_or_else(|_| raw.to_string())
}

/// The default feed set, sharing one HTTP client
pub fn default_sources(tagger: Arc<NewsTagger>) -> Vec<RssFeedSource> {
    let client = reqwest::Client::new();
    FEED_URLS
        .iter()
        .map(|(name, url)| RssFeedSource::new(*name, *url, client.clone(), tagger.clone()))
        .collect()
}

/// Pull every source in order; a failing feed is logged and skipped so one
/// dead feed never sinks the whole run.
pub async fn collect_news(sources: &[RssFeedSource], max_per_source: usize) -> Vec<NewsItem> {
    let mut collected = Vec::new();
    for source in sources {
        match source.fetch(max_per_source).await {
            Ok(items) => {
                let tagged = items.iter().filter(|item| !item.tickers.is_empty()).count();
                info!(
                    "📡 {}: {} entries collected, {} with tickers",
                    source.name(),
                    items.len(),
                    tagged
                );
                collected.extend(items);
            }
            Err(e) => warn!("❌ {}: {e}", source.name()),
        }
    }
    collected
}

/// Built-in demo entries, used when live feeds yield nothing tagged so the
/// bot still has something to answer with.
pub fn sample_news() -> Vec<NewsItem> {
    let entries = [
        (
            "Газпром увеличил добычу газа на 15% в январе",
            "https://example.com/mock/1",
            "2026-01-30T10:00:00",
            vec!["GAZP"],
            "ПАО Газпром сообщило об увеличении добычи природного газа на 15% по сравнению с аналогичным периодом прошлого года",
        ),
        (
            "Сбербанк показал рекордную прибыль за 2025 год",
            "https://example.com/mock/2",
            "2026-01-30T11:00:00",
            vec!["SBER"],
            "Крупнейший банк России Сбербанк опубликовал финансовые результаты, показав рекордную прибыль",
        ),
        (
            "Лукойл планирует увеличить инвестиции в разведку",
            "https://example.com/mock/3",
            "2026-01-30T12:00:00",
            vec!["LKOH"],
            "Нефтяная компания Лукойл объявила о планах по увеличению капитальных вложений в геологоразведку",
        ),
        (
            "Роснефть и Газпром подписали новое соглашение",
            "https://example.com/mock/4",
            "2026-01-30T13:00:00",
            vec!["ROSN", "GAZP"],
            "Роснефть и Газпром договорились о совместной разработке месторождения",
        ),
        (
            "Татнефть начала новый проект в Западной Сибири",
            "https://example.com/mock/5",
            "2026-01-30T14:00:00",
            vec!["TATN"],
            "Татнефть приступила к реализации крупного проекта по добыче нефти",
        ),
        (
            "Аналитики повысили прогноз по акциям Новатэк",
            "https://example.com/mock/6",
            "2026-01-30T15:00:00",
            vec!["NVTK"],
            "Ведущие аналитические агентства улучшили рекомендации по акциям Новатэк",
        ),
        (
            "ЦБ РФ сохранил ключевую ставку на уровне 21%",
            "https://example.com/mock/7",
            "2026-01-30T16:00:00",
            vec![],
            "Совет директоров Банка России принял решение сохранить ключевую ставку без изменений",
        ),
    ];

    entries
        .into_iter()
        .map(|(title, link, published, tickers, summary)| NewsItem {
            title: title.to_string(),
            link: link.to_string(),
            published: Some(published.to_string()),
            source: "mock_data".to_string(),
            tickers: tickers.into_iter().map(str::to_string).collect(),
            summary: summary.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{Catalog, Security};

    fn tagger() -> Arc<NewsTagger> {
        let catalog = Arc::new(Catalog::new(vec![
            Security {
                ticker: "GAZP".to_string(),
                name: "Газпром".to_string(),
                price: 150.0,
            },
            Security {
                ticker: "SBER".to_string(),
                name: "Сбербанк".to_string(),
                price: 250.0,
            },
        ]));
        Arc::new(NewsTagger::new(catalog))
    }

    fn source() -> RssFeedSource {
        RssFeedSource::new("test_feed", "http://unused", reqwest::Client::new(), tagger())
    }

    fn channel_from(xml: &str) -> Channel {
        Channel::read_from(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_entry_mapping_cleanses_tags_and_records_source() {
        let channel = channel_from(
            r#"<?xml version="1.0"?>
            <rss version="2.0"><channel><title>t</title><link>l</link><description>d</description>
            <item>
              <title>  Газпром   увеличил добычу </title>
              <link>https://example.com/1</link>
              <description>&lt;p&gt;Подробности о добыче &lt;b&gt;газа&lt;/b&gt;&lt;/p&gt;</description>
              <pubDate>Fri, 30 Jan 2026 10:00:00 +0300</pubDate>
            </item>
            </channel></rss>"#,
        );

        let item = source().entry_to_item(&channel.items()[0]).unwrap();
        assert_eq!(item.title, "Газпром увеличил добычу");
        assert_eq!(item.summary, "Подробности о добыче газа");
        assert_eq!(item.source, "test_feed");
        assert_eq!(item.tickers, vec!["GAZP".to_string()]);
        assert_eq!(item.published.as_deref(), Some("2026-01-30T10:00:00+03:00"));
    }

    #[test]
    fn test_entry_without_title_is_dropped() {
        let channel = channel_from(
            r#"<?xml version="1.0"?>
            <rss version="2.0"><channel><title>t</title><link>l</link><description>d</description>
            <item><description>без заголовка</description></item>
            </channel></rss>"#,
        );
        assert!(source().entry_to_item(&channel.items()[0]).is_none());
    }

    #[test]
    fn test_long_titles_are_truncated_at_ingestion() {
        let long_title = "Сбербанк ".repeat(60);
        let xml = format!(
            r#"<?xml version="1.0"?>
            <rss version="2.0"><channel><title>t</title><link>l</link><description>d</description>
            <item><title>{long_title}</title></item>
            </channel></rss>"#
        );
        let channel = channel_from(&xml);

        let item = source().entry_to_item(&channel.items()[0]).unwrap();
        assert_eq!(item.title.chars().count(), TITLE_LIMIT);
        assert_eq!(item.tickers, vec!["SBER".to_string()]);
    }

    #[test]
    fn test_unparseable_pub_date_is_kept_verbatim() {
        assert_eq!(normalize_published("не дата"), "не дата");
        assert_eq!(
            normalize_published("Fri, 30 Jan 2026 10:00:00 GMT"),
            "2026-01-30T10:00:00+00:00"
        );
    }

    #[test]
    fn test_sample_news_is_tagged_demo_data() {
        let samples = sample_news();
        assert_eq!(samples.len(), 7);
        assert!(samples.iter().any(|item| item.tickers.len() > 1));
        assert!(samples.iter().any(|item| item.tickers.is_empty()));
        for item in &samples {
            assert_eq!(item.source, "mock_data");
            assert!(item.published.is_some());
        }
    }
}
