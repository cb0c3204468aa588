use crate::adapters::{non_empty, parse_each, strip_xssi_prefix, FeedClient};
use crate::config::toml_config::{DEFAULT_HL, DEFAULT_REALTIME_CATEGORY};
use crate::config::TrendConfig;
use crate::domain::model::{RealtimeTrendRecord, TrendSource};
use crate::domain::ports::TrendAdapter;
use crate::utils::error::{TrendError, Result};
use async_trait::async_trait;
use serde::Deserialize;

const FEED: TrendSource = TrendSource::GoogleRealtime;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RealtimePayload {
    story_summaries: Option<StorySummaries>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorySummaries {
    trending_stories: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrendingStory {
    title: Option<String>,
    share_url: Option<String>,
    #[serde(default)]
    entity_names: Vec<String>,
    #[serde(default)]
    articles: Vec<StoryArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoryArticle {
    article_title: Option<String>,
    source: Option<String>,
    url: Option<String>,
}

impl TrendingStory {
    fn into_record(self) -> Option<RealtimeTrendRecord> {
        let title = non_empty(self.title);
        // 主實體名稱比逗號串接的 title 更適合當關鍵字
        let keyword = self
            .entity_names
            .into_iter()
            .find_map(|name| non_empty(Some(name)))
            .or_else(|| title.clone())?;

        let lead = self.articles.into_iter().next();
        let (article_title, source, url) = match lead {
            Some(a) => (
                non_empty(a.article_title),
                non_empty(a.source),
                non_empty(a.url),
            ),
            None => (None, None, None),
        };

        let headline = article_title.or_else(|| title.filter(|t| *t != keyword));

        Some(RealtimeTrendRecord {
            keyword,
            headline,
            source,
            article_url: url.or_else(|| non_empty(self.share_url)),
        })
    }
}

/// 解析即時趨勢 JSON（保留上游排序）
pub fn parse_realtime_trends(body: &str, limit: usize) -> Result<Vec<RealtimeTrendRecord>> {
    let payload: RealtimePayload = serde_json::from_str(strip_xssi_prefix(body))
        .map_err(|e| TrendError::schema(FEED, format!("invalid JSON: {}", e)))?;

    let stories = payload
        .story_summaries
        .and_then(|s| s.trending_stories)
        .ok_or_else(|| TrendError::schema(FEED, "missing storySummaries.trendingStories"))?;

    let (stories, mut dropped) = parse_each::<TrendingStory>(stories);
    let mut records = Vec::with_capacity(stories.len());
    for story in stories {
        match story.into_record() {
            Some(record) => records.push(record),
            None => dropped += 1,
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

pub struct GoogleRealtimeAdapter {
    client: FeedClient,
    endpoint: String,
    category: String,
    hl: String,
    tz: i32,
}

impl GoogleRealtimeAdapter {
    pub fn new(client: FeedClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            category: DEFAULT_REALTIME_CATEGORY.to_string(),
            hl: DEFAULT_HL.to_string(),
            tz: 0,
        }
    }

    pub fn from_config(client: FeedClient, config: &TrendConfig) -> Self {
        Self {
            client,
            endpoint: config.realtime_endpoint().to_string(),
            category: config.realtime_category().to_string(),
            hl: config.hl().to_string(),
            tz: config.tz(),
        }
    }
}

#[async_trait]
impl TrendAdapter for GoogleRealtimeAdapter {
    type Record = RealtimeTrendRecord;

    fn source(&self) -> TrendSource {
        FEED
    }

    async fn fetch(&self, geo: &str, limit: usize) -> Result<Vec<RealtimeTrendRecord>> {
        let tz = self.tz.to_string();
        let query = [
            ("hl", self.hl.as_str()),
            ("tz", tz.as_str()),
            ("geo", geo),
            ("cat", self.category.as_str()),
            ("fi", "0"),
            ("fs", "0"),
            ("ri", "300"),
            ("rs", "20"),
            ("sort", "0"),
        ];

        let body = self.client.get_text(FEED, &self.endpoint, &query).await?;
        parse_realtime_trends(&body, limit)
    }
}
