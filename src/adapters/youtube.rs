use crate::adapters::{non_empty, parse_each, FeedClient};
use crate::config::toml_config::DEFAULT_HL;
use crate::config::TrendConfig;
use crate::domain::model::{TrendSource, VideoTrendRecord};
use crate::domain::ports::TrendAdapter;
use crate::utils::error::{TrendError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;

const FEED: TrendSource = TrendSource::Youtube;
const YOUTUBE_ORIGIN: &str = "https://www.youtube.com";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoRenderer {
    video_id: Option<String>,
    title: Option<FormattedText>,
    owner_text: Option<FormattedText>,
    long_byline_text: Option<FormattedText>,
    view_count_text: Option<FormattedText>,
    short_view_count_text: Option<FormattedText>,
    navigation_endpoint: Option<NavigationEndpoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormattedText {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NavigationEndpoint {
    command_metadata: Option<CommandMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommandMetadata {
    web_command_metadata: Option<WebCommandMetadata>,
}

#[derive(Debug, Deserialize)]
struct WebCommandMetadata {
    url: Option<String>,
}

impl FormattedText {
    fn into_text(self) -> Option<String> {
        non_empty(self.simple_text).or_else(|| {
            let joined: String = self.runs.into_iter().map(|r| r.text).collect();
            non_empty(Some(joined))
        })
    }
}

impl VideoRenderer {
    fn watch_url(&mut self) -> Option<String> {
        if let Some(id) = non_empty(self.video_id.take()) {
            return Some(format!("{}/watch?v={}", YOUTUBE_ORIGIN, id));
        }

        let path = self
            .navigation_endpoint
            .take()
            .and_then(|n| n.command_metadata)
            .and_then(|c| c.web_command_metadata)
            .and_then(|w| non_empty(w.url))?;

        if path.starts_with("https://") || path.starts_with("http://") {
            Some(path)
        } else if path.starts_with('/') {
            Some(format!("{}{}", YOUTUBE_ORIGIN, path))
        } else {
            None
        }
    }

    fn into_record(mut self) -> Option<VideoTrendRecord> {
        let video_url = self.watch_url()?;
        let keyword = self.title.and_then(FormattedText::into_text)?;

        let channel = self
            .owner_text
            .and_then(FormattedText::into_text)
            .or_else(|| self.long_byline_text.and_then(FormattedText::into_text));
        let views_label = self
            .view_count_text
            .and_then(FormattedText::into_text)
            .or_else(|| self.short_view_count_text.and_then(FormattedText::into_text));

        Some(VideoTrendRecord {
            keyword,
            channel,
            views_label,
            video_url,
        })
    }
}

fn initial_data_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?s)(?:var\s+ytInitialData|window\[["']ytInitialData["']\])\s*=\s*(\{.+?\})\s*;\s*</script>"#,
        )
        .expect("ytInitialData pattern is valid")
    })
}

/// 取出頁面資料：HTML 內嵌的 ytInitialData，或本身就是 JSON 的 body
fn extract_initial_data(body: &str) -> Result<Value> {
    let trimmed = body.trim_start();
    let json = if trimmed.starts_with('{') {
        trimmed
    } else {
        initial_data_pattern()
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| TrendError::schema(FEED, "ytInitialData not found in page"))?
    };

    serde_json::from_str(json)
        .map_err(|e| TrendError::schema(FEED, format!("invalid ytInitialData: {}", e)))
}

// 依文件順序收集所有 videoRenderer
fn collect_renderers(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == "videoRenderer" && child.is_object() {
                    out.push(child);
                } else {
                    collect_renderers(child, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_renderers(item, out);
            }
        }
        _ => {}
    }
}

/// 解析 YouTube 發燒影片頁面；沒有觀看網址的影片直接丟棄
pub fn parse_trending_videos(body: &str, limit: usize) -> Result<Vec<VideoTrendRecord>> {
    let data = extract_initial_data(body)?;

    let mut renderers = Vec::new();
    collect_renderers(data, &mut renderers);

    let (renderers, mut dropped) = parse_each::<VideoRenderer>(renderers);
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(renderers.len());

    for renderer in renderers {
        match renderer.into_record() {
            Some(record) if seen.insert(record.video_url.clone()) => records.push(record),
            Some(_) => {} // 同一支影片出現在多個 shelf
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

pub struct YoutubeTrendingAdapter {
    client: FeedClient,
    endpoint: String,
    hl: String,
}

impl YoutubeTrendingAdapter {
    pub fn new(client: FeedClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            hl: DEFAULT_HL.to_string(),
        }
    }

    pub fn from_config(client: FeedClient, config: &TrendConfig) -> Self {
        Self {
            client,
            endpoint: config.youtube_endpoint().to_string(),
            hl: config.hl().to_string(),
        }
    }
}

#[async_trait]
impl TrendAdapter for YoutubeTrendingAdapter {
    type Record = VideoTrendRecord;

    fn source(&self) -> TrendSource {
        FEED
    }

    async fn fetch(&self, geo: &str, limit: usize) -> Result<Vec<VideoTrendRecord>> {
        let query = [("gl", geo), ("hl", self.hl.as_str())];

        let body = self.client.get_text(FEED, &self.endpoint, &query).await?;
        parse_trending_videos(&body, limit)
    }
}
