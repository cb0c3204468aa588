use clap::Parser;
use trend_snapshot::utils::error::ErrorSeverity;
use trend_snapshot::utils::{logger, validation::Validate};
use trend_snapshot::{CliConfig, TrendAggregator, TrendConfig, TrendError};

fn exit_with(e: &TrendError) -> ! {
    tracing::error!(
        "❌ Trend snapshot failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 依錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn display_config_summary(config: &TrendConfig, cli: &CliConfig) {
    let aggregator = config.aggregator();
    let options = cli.options();

    println!("📋 Effective configuration");
    println!(
        "  Geo: {} (default {})",
        aggregator.resolve_geo(options.geo.as_deref()),
        aggregator.geo
    );
    println!(
        "  Limit: {} (default {}, max {})",
        aggregator.resolve_limit(options.limit),
        aggregator.limit,
        aggregator.max_limit
    );
    println!("  Timeout: {:?}", config.timeout());
    println!("  google-daily:    {}", config.daily_endpoint());
    println!(
        "  google-realtime: {} (cat={})",
        config.realtime_endpoint(),
        config.realtime_category()
    );
    println!("  youtube:         {}", config.youtube_endpoint());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting trend-snapshot CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no upstream requests will be made");
        display_config_summary(&config, &cli);
        return Ok(());
    }

    let aggregator = match TrendAggregator::from_config(&config) {
        Ok(aggregator) => aggregator,
        Err(e) => exit_with(&e),
    };

    let snapshot = match aggregator.collect(cli.options()).await {
        Ok(snapshot) => snapshot,
        Err(e) => exit_with(&e),
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&snapshot)
    } else {
        serde_json::to_string(&snapshot)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with(&TrendError::SerializationError(e)),
    }

    tracing::info!(
        "✅ Snapshot with {} keywords generated at {}",
        snapshot.keywords.len(),
        snapshot.generated_at
    );

    Ok(())
}
