use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;
use trend_snapshot::{
    AggregatorConfig, CollectOptions, DailyTrendRecord, RealtimeTrendRecord, Result,
    SnapshotAssembler, TrendAdapter, TrendError, TrendSource, VideoTrendRecord,
};

#[derive(Clone)]
enum Behavior {
    Succeed,
    Fail,
    Panic,
    WaitFor(Arc<Barrier>),
    Sleep(Duration),
}

/// 回傳固定資料的測試 adapter，並記錄收到的 geo/limit
struct FixedAdapter<T> {
    source: TrendSource,
    records: Vec<T>,
    behavior: Behavior,
    calls: Arc<Mutex<Vec<(String, usize)>>>,
}

impl<T> FixedAdapter<T> {
    fn new(source: TrendSource, records: Vec<T>) -> Self {
        Self {
            source,
            records,
            behavior: Behavior::Succeed,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> TrendAdapter for FixedAdapter<T> {
    type Record = T;

    fn source(&self) -> TrendSource {
        self.source
    }

    async fn fetch(&self, geo: &str, limit: usize) -> Result<Vec<T>> {
        self.calls.lock().unwrap().push((geo.to_string(), limit));

        match &self.behavior {
            Behavior::Succeed => {}
            Behavior::Fail => {
                return Err(TrendError::UpstreamStatus {
                    feed: self.source,
                    status: 503,
                })
            }
            Behavior::Panic => panic!("adapter defect"),
            Behavior::WaitFor(barrier) => {
                barrier.wait().await;
            }
            Behavior::Sleep(duration) => tokio::time::sleep(*duration).await,
        }

        Ok(self.records.iter().take(limit).cloned().collect())
    }
}

fn daily(keyword: &str) -> DailyTrendRecord {
    DailyTrendRecord {
        keyword: keyword.to_string(),
        traffic_label: Some("50K+".to_string()),
        snippet: Some(format!("{} snippet", keyword)),
        article_url: Some(format!("https://daily.example/{}", keyword)),
    }
}

fn realtime(keyword: &str) -> RealtimeTrendRecord {
    RealtimeTrendRecord {
        keyword: keyword.to_string(),
        headline: Some(format!("{} headline", keyword)),
        source: Some("Wire".to_string()),
        article_url: Some(format!("https://realtime.example/{}", keyword)),
    }
}

fn video(keyword: &str) -> VideoTrendRecord {
    VideoTrendRecord {
        keyword: keyword.to_string(),
        channel: Some("Channel".to_string()),
        views_label: Some("2M views".to_string()),
        video_url: format!("https://www.youtube.com/watch?v={}", keyword.replace(' ', "")),
    }
}

type TestAssembler = SnapshotAssembler<
    FixedAdapter<DailyTrendRecord>,
    FixedAdapter<RealtimeTrendRecord>,
    FixedAdapter<VideoTrendRecord>,
>;

fn daily_adapter() -> FixedAdapter<DailyTrendRecord> {
    FixedAdapter::new(
        TrendSource::GoogleDaily,
        ["Aurora", "Eclipse", "Comet", "Meteor", "Tide"]
            .iter()
            .map(|k| daily(k))
            .collect(),
    )
}

fn realtime_adapter() -> FixedAdapter<RealtimeTrendRecord> {
    FixedAdapter::new(
        TrendSource::GoogleRealtime,
        ["eclipse", "Harbor Strike", "Rate Cut"]
            .iter()
            .map(|k| realtime(k))
            .collect(),
    )
}

fn youtube_adapter() -> FixedAdapter<VideoTrendRecord> {
    FixedAdapter::new(
        TrendSource::Youtube,
        ["Late Show", "Music Video", "Game Trailer", "Vlog", "Recap"]
            .iter()
            .map(|k| video(k))
            .collect(),
    )
}

fn assembler(
    daily: FixedAdapter<DailyTrendRecord>,
    realtime: FixedAdapter<RealtimeTrendRecord>,
    youtube: FixedAdapter<VideoTrendRecord>,
) -> TestAssembler {
    SnapshotAssembler::new(daily, realtime, youtube, AggregatorConfig::default())
}

#[tokio::test]
async fn test_end_to_end_priority_order() {
    let assembler = assembler(daily_adapter(), realtime_adapter(), youtube_adapter());

    let snapshot = assembler
        .collect(CollectOptions::new("US", 5))
        .await
        .unwrap();

    assert_eq!(snapshot.google_daily.len(), 5);
    assert_eq!(snapshot.google_realtime.len(), 3);
    assert_eq!(snapshot.youtube.len(), 5);

    let keywords: Vec<&str> = snapshot.keywords.iter().map(|k| k.keyword.as_str()).collect();
    assert_eq!(
        keywords,
        vec!["eclipse", "Harbor Strike", "Rate Cut", "Aurora", "Comet"]
    );

    let multi: Vec<_> = snapshot
        .keywords
        .iter()
        .filter(|k| k.source == TrendSource::Multi)
        .collect();
    assert_eq!(multi.len(), 1);
    assert_eq!(multi[0].details.as_deref(), Some("eclipse headline"));
    assert_eq!(
        multi[0].url.as_deref(),
        Some("https://realtime.example/eclipse")
    );
    assert_eq!(snapshot.keywords[1].source, TrendSource::GoogleRealtime);
    assert_eq!(snapshot.keywords[3].source, TrendSource::GoogleDaily);
}

#[tokio::test]
async fn test_lists_respect_limit_for_every_depth() {
    let assembler = assembler(daily_adapter(), realtime_adapter(), youtube_adapter());

    for limit in 0..=7 {
        let snapshot = assembler
            .collect(CollectOptions::new("US", limit))
            .await
            .unwrap();

        assert!(snapshot.keywords.len() <= limit);
        assert!(snapshot.google_daily.len() <= limit);
        assert!(snapshot.google_realtime.len() <= limit);
        assert!(snapshot.youtube.len() <= limit);
    }
}

#[tokio::test]
async fn test_adapter_overshooting_limit_is_truncated() {
    // adapter 不守 limit 時 assembler 仍會截斷
    struct Greedy;

    #[async_trait]
    impl TrendAdapter for Greedy {
        type Record = VideoTrendRecord;

        fn source(&self) -> TrendSource {
            TrendSource::Youtube
        }

        async fn fetch(&self, _geo: &str, _limit: usize) -> Result<Vec<VideoTrendRecord>> {
            Ok((0..20).map(|i| video(&format!("clip {}", i))).collect())
        }
    }

    let assembler = SnapshotAssembler::new(
        daily_adapter(),
        realtime_adapter(),
        Greedy,
        AggregatorConfig::default(),
    );
    let snapshot = assembler
        .collect(CollectOptions::new("US", 4))
        .await
        .unwrap();

    assert_eq!(snapshot.youtube.len(), 4);
}

#[tokio::test]
async fn test_cancelled_collect_aborts_pending_fetches() {
    struct Slow {
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl TrendAdapter for Slow {
        type Record = VideoTrendRecord;

        fn source(&self) -> TrendSource {
            TrendSource::Youtube
        }

        async fn fetch(&self, _geo: &str, _limit: usize) -> Result<Vec<VideoTrendRecord>> {
            tokio::time::sleep(Duration::from_millis(300)).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    let finished = Arc::new(AtomicBool::new(false));
    let assembler = SnapshotAssembler::new(
        daily_adapter(),
        realtime_adapter(),
        Slow {
            finished: Arc::clone(&finished),
        },
        AggregatorConfig::default(),
    );

    let result = tokio::time::timeout(
        Duration::from_millis(50),
        assembler.collect(CollectOptions::default()),
    )
    .await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(!finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_repeated_collect_has_same_shape() {
    let assembler = assembler(daily_adapter(), realtime_adapter(), youtube_adapter());

    let first = assembler.collect(CollectOptions::new("US", 8)).await.unwrap();
    let second = assembler.collect(CollectOptions::new("US", 8)).await.unwrap();

    assert_eq!(first.keywords, second.keywords);
    assert_eq!(first.google_daily, second.google_daily);
    assert_eq!(first.google_realtime, second.google_realtime);
    assert_eq!(first.youtube, second.youtube);
}

#[tokio::test]
async fn test_single_source_failure_keeps_others() {
    let assembler = assembler(
        daily_adapter(),
        realtime_adapter(),
        youtube_adapter().with(Behavior::Fail),
    );

    let snapshot = assembler.collect(CollectOptions::default()).await.unwrap();

    assert!(snapshot.youtube.is_empty());
    assert!(!snapshot.google_daily.is_empty());
    assert!(!snapshot.google_realtime.is_empty());
    assert!(snapshot
        .keywords
        .iter()
        .all(|k| k.source != TrendSource::Youtube));
}

#[tokio::test]
async fn test_total_failure_yields_empty_snapshot() {
    let assembler = assembler(
        daily_adapter().with(Behavior::Fail),
        realtime_adapter().with(Behavior::Fail),
        youtube_adapter().with(Behavior::Fail),
    );

    let snapshot = assembler.collect(CollectOptions::default()).await.unwrap();

    assert!(snapshot.is_empty());
    assert!(snapshot.keywords.is_empty());
}

#[tokio::test]
async fn test_adapter_panic_is_orchestration_error() {
    let assembler = assembler(
        daily_adapter(),
        realtime_adapter().with(Behavior::Panic),
        youtube_adapter(),
    );

    let err = assembler
        .collect(CollectOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, TrendError::Orchestration { .. }));
    assert!(!err.is_source_failure());
}

#[tokio::test]
async fn test_adapters_run_concurrently() {
    // 三個 adapter 必須同時在 barrier 等待才能完成；依序執行會卡住
    let barrier = Arc::new(Barrier::new(3));
    let assembler = assembler(
        daily_adapter().with(Behavior::WaitFor(Arc::clone(&barrier))),
        realtime_adapter().with(Behavior::WaitFor(Arc::clone(&barrier))),
        youtube_adapter().with(Behavior::WaitFor(Arc::clone(&barrier))),
    );

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        assembler.collect(CollectOptions::new("US", 3)),
    )
    .await;

    let snapshot = result.expect("adapters were not run concurrently").unwrap();
    assert_eq!(snapshot.google_daily.len(), 3);
}

#[tokio::test]
async fn test_defaults_and_cap_reach_adapters() {
    let daily = daily_adapter();
    let calls = Arc::clone(&daily.calls);
    let assembler = assembler(daily, realtime_adapter(), youtube_adapter());

    assembler.collect(CollectOptions::default()).await.unwrap();
    assembler
        .collect(CollectOptions {
            geo: Some("JP".to_string()),
            limit: Some(500),
        })
        .await
        .unwrap();

    let calls = calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![("US".to_string(), 10), ("JP".to_string(), 30)]
    );
}

#[tokio::test]
async fn test_geo_reaches_adapters_unmodified() {
    let realtime = realtime_adapter();
    let calls = Arc::clone(&realtime.calls);
    let assembler = assembler(daily_adapter(), realtime, youtube_adapter());

    assembler
        .collect(CollectOptions::new(" de-AT ", 2))
        .await
        .unwrap();
    assembler.collect(CollectOptions::new("\t ", 2)).await.unwrap();

    let calls = calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![(" de-AT ".to_string(), 2), ("US".to_string(), 2)]
    );
}

#[tokio::test]
async fn test_zero_limit_skips_upstream_calls() {
    let daily = daily_adapter();
    let calls = Arc::clone(&daily.calls);
    let assembler = assembler(daily, realtime_adapter(), youtube_adapter());

    let snapshot = assembler
        .collect(CollectOptions::new("US", 0))
        .await
        .unwrap();

    assert!(snapshot.is_empty());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_generated_at_is_stamped_after_sources_settle() {
    let assembler = assembler(
        daily_adapter().with(Behavior::Sleep(Duration::from_millis(100))),
        realtime_adapter(),
        youtube_adapter(),
    );

    let before = chrono::Utc::now();
    let snapshot = assembler.collect(CollectOptions::default()).await.unwrap();

    assert!(snapshot.generated_at - before >= chrono::Duration::milliseconds(100));
}
