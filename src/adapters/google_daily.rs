use crate::adapters::{non_empty, parse_each, strip_xssi_prefix, FeedClient};
use crate::config::toml_config::DEFAULT_HL;
use crate::config::TrendConfig;
use crate::domain::model::{DailyTrendRecord, TrendSource};
use crate::domain::ports::TrendAdapter;
use crate::utils::error::{TrendError, Result};
use async_trait::async_trait;
use serde::Deserialize;

const FEED: TrendSource = TrendSource::GoogleDaily;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyPayload {
    default: Option<DailyContainer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyContainer {
    trending_searches_days: Option<Vec<TrendingDay>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrendingDay {
    #[serde(default)]
    trending_searches: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrendingSearch {
    title: Option<SearchTitle>,
    formatted_traffic: Option<String>,
    #[serde(default)]
    articles: Vec<DailyArticle>,
}

#[derive(Debug, Deserialize)]
struct SearchTitle {
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyArticle {
    snippet: Option<String>,
    url: Option<String>,
}

impl TrendingSearch {
    fn into_record(self) -> Option<DailyTrendRecord> {
        let keyword = non_empty(self.title.and_then(|t| t.query))?;

        // snippet 與 url 取自同一篇文章
        let (snippet, article_url) = self
            .articles
            .into_iter()
            .map(|a| (non_empty(a.snippet), non_empty(a.url)))
            .find(|(snippet, url)| snippet.is_some() || url.is_some())
            .unwrap_or((None, None));

        Some(DailyTrendRecord {
            keyword,
            traffic_label: non_empty(self.formatted_traffic),
            snippet,
            article_url,
        })
    }
}

/// 解析每日趨勢 JSON（保留上游排序）
pub fn parse_daily_trends(body: &str, limit: usize) -> Result<Vec<DailyTrendRecord>> {
    let payload: DailyPayload = serde_json::from_str(strip_xssi_prefix(body))
        .map_err(|e| TrendError::schema(FEED, format!("invalid JSON: {}", e)))?;

    let days = payload
        .default
        .and_then(|d| d.trending_searches_days)
        .ok_or_else(|| TrendError::schema(FEED, "missing default.trendingSearchesDays"))?;

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for day in days {
        let (searches, malformed) = parse_each::<TrendingSearch>(day.trending_searches);
        dropped += malformed;
        for search in searches {
            match search.into_record() {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
        }
    }

    tracing::debug!(
        "{} parsed {} records ({} dropped)",
        FEED,
        records.len(),
        dropped
    );

    records.truncate(limit);
    Ok(records)
}

pub struct GoogleDailyAdapter {
    client: FeedClient,
    endpoint: String,
    hl: String,
    tz: i32,
}

impl GoogleDailyAdapter {
    pub fn new(client: FeedClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            hl: DEFAULT_HL.to_string(),
            tz: 0,
        }
    }

    pub fn from_config(client: FeedClient, config: &TrendConfig) -> Self {
        Self {
            client,
            endpoint: config.daily_endpoint().to_string(),
            hl: config.hl().to_string(),
            tz: config.tz(),
        }
    }
}

#[async_trait]
impl TrendAdapter for GoogleDailyAdapter {
    type Record = DailyTrendRecord;

    fn source(&self) -> TrendSource {
        FEED
    }

    async fn fetch(&self, geo: &str, limit: usize) -> Result<Vec<DailyTrendRecord>> {
        let tz = self.tz.to_string();
        let query = [
            ("hl", self.hl.as_str()),
            ("tz", tz.as_str()),
            ("geo", geo),
            ("ns", "15"),
        ];

        let body = self.client.get_text(FEED, &self.endpoint, &query).await?;
        parse_daily_trends(&body, limit)
    }
}
