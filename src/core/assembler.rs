use crate::adapters::{FeedClient, GoogleDailyAdapter, GoogleRealtimeAdapter, YoutubeTrendingAdapter};
use crate::config::{AggregatorConfig, TrendConfig};
use crate::core::normalizer::normalize;
use crate::domain::model::{
    CollectOptions, DailyTrendRecord, RealtimeTrendRecord, TrendSnapshot, TrendSource,
    VideoTrendRecord,
};
use crate::domain::ports::TrendAdapter;
use crate::utils::error::{TrendError, Result};
use crate::utils::validation::Validate;
use chrono::Utc;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tokio::task::{JoinError, JoinHandle};

/// 正式環境使用的組合：三個 HTTP adapter
pub type TrendAggregator =
    SnapshotAssembler<GoogleDailyAdapter, GoogleRealtimeAdapter, YoutubeTrendingAdapter>;

pub struct SnapshotAssembler<D, R, Y> {
    daily: Arc<D>,
    realtime: Arc<R>,
    youtube: Arc<Y>,
    config: AggregatorConfig,
}

impl TrendAggregator {
    pub fn from_config(config: &TrendConfig) -> Result<Self> {
        config.validate()?;
        let client = FeedClient::from_config(config)?;

        Ok(Self::new(
            GoogleDailyAdapter::from_config(client.clone(), config),
            GoogleRealtimeAdapter::from_config(client.clone(), config),
            YoutubeTrendingAdapter::from_config(client, config),
            config.aggregator(),
        ))
    }
}

impl<D, R, Y> SnapshotAssembler<D, R, Y>
where
    D: TrendAdapter<Record = DailyTrendRecord> + 'static,
    R: TrendAdapter<Record = RealtimeTrendRecord> + 'static,
    Y: TrendAdapter<Record = VideoTrendRecord> + 'static,
{
    pub fn new(daily: D, realtime: R, youtube: Y, config: AggregatorConfig) -> Self {
        Self {
            daily: Arc::new(daily),
            realtime: Arc::new(realtime),
            youtube: Arc::new(youtube),
            config,
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// 收集一次快照
    ///
    /// 個別來源失敗只會讓該來源變成空清單；只有 assembler 自身的錯誤
    /// （例如 adapter task panic）才會回傳 `Err`。
    pub async fn collect(&self, options: CollectOptions) -> Result<TrendSnapshot> {
        let geo = self.config.resolve_geo(options.geo.as_deref());
        let limit = self.config.resolve_limit(options.limit);

        if limit == 0 {
            tracing::debug!("limit is 0, skipping upstream fetches");
            return Ok(TrendSnapshot::empty(Utc::now()));
        }

        let started = Instant::now();

        // 三個來源各自一個 task，互不阻塞
        let (daily, realtime, youtube) = tokio::join!(
            spawn_fetch(Arc::clone(&self.daily), geo.clone(), limit),
            spawn_fetch(Arc::clone(&self.realtime), geo.clone(), limit),
            spawn_fetch(Arc::clone(&self.youtube), geo.clone(), limit),
        );

        let mut failed: Vec<TrendSource> = Vec::new();
        let google_daily = settle(TrendSource::GoogleDaily, daily, limit, &mut failed)?;
        let google_realtime = settle(TrendSource::GoogleRealtime, realtime, limit, &mut failed)?;
        let youtube = settle(TrendSource::Youtube, youtube, limit, &mut failed)?;

        let keywords = normalize(&google_daily, &google_realtime, &youtube, limit);

        tracing::info!(
            geo = %geo,
            limit,
            daily = google_daily.len(),
            realtime = google_realtime.len(),
            youtube = youtube.len(),
            keywords = keywords.len(),
            failed = ?failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "trend snapshot assembled"
        );

        Ok(TrendSnapshot {
            generated_at: Utc::now(),
            keywords,
            google_daily,
            google_realtime,
            youtube,
        })
    }
}

/// 被丟棄時中止底下的 task；`collect` 被取消時不留下背景請求
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Future for AbortOnDrop<T> {
    type Output = std::result::Result<T, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn spawn_fetch<A>(
    adapter: Arc<A>,
    geo: String,
    limit: usize,
) -> AbortOnDrop<Result<Vec<A::Record>>>
where
    A: TrendAdapter + 'static,
{
    AbortOnDrop(tokio::spawn(async move { adapter.fetch(&geo, limit).await }))
}

/// 來源錯誤降級為空清單；task 本身失敗屬於 assembler 的錯誤
fn settle<T>(
    feed: TrendSource,
    joined: std::result::Result<Result<Vec<T>>, JoinError>,
    limit: usize,
    failed: &mut Vec<TrendSource>,
) -> Result<Vec<T>> {
    match joined {
        Ok(Ok(mut records)) => {
            records.truncate(limit);
            Ok(records)
        }
        Ok(Err(e)) => {
            tracing::warn!(
                feed = %feed,
                category = ?e.category(),
                error = %e,
                "trend source failed, continuing without it"
            );
            failed.push(feed);
            Ok(Vec::new())
        }
        Err(e) => Err(TrendError::Orchestration {
            message: format!("{} task did not complete: {}", feed, e),
        }),
    }
}
