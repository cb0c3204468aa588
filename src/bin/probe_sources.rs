use clap::Parser;
use std::time::Instant;
use trend_snapshot::adapters::{
    FeedClient, GoogleDailyAdapter, GoogleRealtimeAdapter, YoutubeTrendingAdapter,
};
use trend_snapshot::utils::logger;
use trend_snapshot::utils::validation::Validate;
use trend_snapshot::{TrendAdapter, TrendConfig};

#[derive(Parser)]
#[command(name = "probe-sources")]
#[command(about = "Call every trend source on its own and report what came back")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Region code passed to each source
    #[arg(long, default_value = "US")]
    geo: String,

    /// Records requested per source
    #[arg(long, default_value = "5")]
    limit: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

async fn probe<A: TrendAdapter>(adapter: &A, geo: &str, limit: usize) -> bool
where
    A::Record: std::fmt::Debug,
{
    let started = Instant::now();
    match adapter.fetch(geo, limit).await {
        Ok(records) => {
            println!(
                "  ✅ {}: {} 筆, 耗時 {:?}",
                adapter.source(),
                records.len(),
                started.elapsed()
            );
            for record in &records {
                println!("     - {:?}", record);
            }
            true
        }
        Err(e) => {
            println!(
                "  ❌ {}: {:?} - {} (耗時 {:?})",
                adapter.source(),
                e.category(),
                e,
                started.elapsed()
            );
            false
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => TrendConfig::from_file(path)?,
        None => TrendConfig::default(),
    };
    config.validate()?;

    let client = FeedClient::from_config(&config)?;
    println!(
        "🚀 Probing trend sources (geo={}, limit={}, timeout={:?})",
        args.geo,
        args.limit,
        client.timeout()
    );

    let realtime = GoogleRealtimeAdapter::from_config(client.clone(), &config);
    let daily = GoogleDailyAdapter::from_config(client.clone(), &config);
    let youtube = YoutubeTrendingAdapter::from_config(client, &config);

    // 依序呼叫，方便對照每個來源的輸出
    let results = [
        probe(&realtime, &args.geo, args.limit).await,
        probe(&daily, &args.geo, args.limit).await,
        probe(&youtube, &args.geo, args.limit).await,
    ];
    let healthy = results.iter().filter(|ok| **ok).count();

    println!("📊 {}/{} sources healthy", healthy, results.len());
    Ok(())
}
