use crate::domain::model::{
    DailyTrendRecord, RealtimeTrendRecord, TrendSource, VideoTrendRecord,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 單一上游趨勢來源
///
/// 實作必須無狀態，可同時以不同的 geo/limit 被呼叫。失敗一律以 `Err` 回傳，
/// 由 assembler 逐一來源吸收。
#[async_trait]
pub trait TrendAdapter: Send + Sync {
    type Record: Send + 'static;

    fn source(&self) -> TrendSource;

    async fn fetch(&self, geo: &str, limit: usize) -> Result<Vec<Self::Record>>;
}

/// normalizer 看到的統一候選欄位
pub trait KeywordCandidate {
    const SOURCE: TrendSource;

    fn keyword(&self) -> &str;
    fn details(&self) -> Option<&str>;
    fn url(&self) -> Option<&str>;
}

impl KeywordCandidate for RealtimeTrendRecord {
    const SOURCE: TrendSource = TrendSource::GoogleRealtime;

    fn keyword(&self) -> &str {
        &self.keyword
    }

    fn details(&self) -> Option<&str> {
        self.headline.as_deref()
    }

    fn url(&self) -> Option<&str> {
        self.article_url.as_deref()
    }
}

impl KeywordCandidate for DailyTrendRecord {
    const SOURCE: TrendSource = TrendSource::GoogleDaily;

    fn keyword(&self) -> &str {
        &self.keyword
    }

    fn details(&self) -> Option<&str> {
        self.snippet.as_deref().or(self.traffic_label.as_deref())
    }

    fn url(&self) -> Option<&str> {
        self.article_url.as_deref()
    }
}

impl KeywordCandidate for VideoTrendRecord {
    const SOURCE: TrendSource = TrendSource::Youtube;

    fn keyword(&self) -> &str {
        &self.keyword
    }

    fn details(&self) -> Option<&str> {
        self.views_label.as_deref().or(self.channel.as_deref())
    }

    fn url(&self) -> Option<&str> {
        Some(&self.video_url)
    }
}
