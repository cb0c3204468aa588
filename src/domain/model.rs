use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// 趨勢來源標籤，序列化後即為對外的 `source` 字串
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendSource {
    #[serde(rename = "google-daily")]
    GoogleDaily,
    #[serde(rename = "google-realtime")]
    GoogleRealtime,
    #[serde(rename = "youtube")]
    Youtube,
    #[serde(rename = "multi")]
    Multi,
}

impl TrendSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleDaily => "google-daily",
            Self::GoogleRealtime => "google-realtime",
            Self::Youtube => "youtube",
            Self::Multi => "multi",
        }
    }
}

impl fmt::Display for TrendSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrendRecord {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeTrendRecord {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoTrendRecord {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views_label: Option<String>,
    pub video_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedKeyword {
    pub keyword: String,
    pub source: TrendSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// 單次收集的結果；回傳後即不可變
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSnapshot {
    #[serde(serialize_with = "serialize_iso_millis")]
    pub generated_at: DateTime<Utc>,
    pub keywords: Vec<UnifiedKeyword>,
    pub google_daily: Vec<DailyTrendRecord>,
    pub google_realtime: Vec<RealtimeTrendRecord>,
    pub youtube: Vec<VideoTrendRecord>,
}

impl TrendSnapshot {
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            keywords: Vec::new(),
            google_daily: Vec::new(),
            google_realtime: Vec::new(),
            youtube: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.google_daily.is_empty()
            && self.google_realtime.is_empty()
            && self.youtube.is_empty()
    }
}

// 與瀏覽器 `toISOString()` 相同的格式：毫秒 + Z
fn serialize_iso_millis<S: Serializer>(
    ts: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// 呼叫端的請求參數，欄位缺省時套用 `AggregatorConfig` 的預設值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectOptions {
    #[serde(default)]
    pub geo: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl CollectOptions {
    pub fn new(geo: impl Into<String>, limit: usize) -> Self {
        Self {
            geo: Some(geo.into()),
            limit: Some(limit),
        }
    }
}
