pub mod toml_config;

pub use toml_config::TrendConfig;

#[cfg(feature = "cli")]
use crate::domain::model::CollectOptions;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_GEO: &str = "US";
pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_MAX_LIMIT: usize = 30;
/// max_limit 本身的上限
pub const LIMIT_CEILING: usize = 100;

/// Assembler 的預設值：請求未帶 geo/limit 時使用，limit 一律被 max_limit 截斷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    pub geo: String,
    pub limit: usize,
    pub max_limit: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            geo: DEFAULT_GEO.to_string(),
            limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }
}

impl AggregatorConfig {
    /// 空白的 geo 視同未提供；其餘原樣傳給 adapter
    pub fn resolve_geo(&self, geo: Option<&str>) -> String {
        match geo {
            Some(g) if !g.trim().is_empty() => g.to_string(),
            _ => self.geo.clone(),
        }
    }

    pub fn resolve_limit(&self, limit: Option<usize>) -> usize {
        limit.unwrap_or(self.limit).min(self.max_limit)
    }
}

impl Validate for AggregatorConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("defaults.geo", &self.geo)?;
        validation::validate_range("defaults.max_limit", self.max_limit, 1, LIMIT_CEILING)?;
        validation::validate_range("defaults.limit", self.limit, 0, self.max_limit)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "trend-snapshot")]
#[command(about = "Collect one merged trending-keyword snapshot from Google Trends and YouTube")]
pub struct CliConfig {
    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Two-letter region code (defaults to the configured geo)
    #[arg(long)]
    pub geo: Option<String>,

    /// Snapshot depth (capped by defaults.max_limit)
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, help = "Pretty-print the snapshot JSON")]
    pub pretty: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Show the effective configuration without fetching")]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn load_config(&self) -> Result<TrendConfig> {
        match &self.config {
            Some(path) => TrendConfig::from_file(path),
            None => Ok(TrendConfig::default()),
        }
    }

    pub fn options(&self) -> CollectOptions {
        CollectOptions {
            geo: self.geo.clone(),
            limit: self.limit,
        }
    }
}
