use crate::config::{AggregatorConfig, DEFAULT_GEO, DEFAULT_LIMIT, DEFAULT_MAX_LIMIT};
use crate::utils::error::{TrendError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_DAILY_ENDPOINT: &str = "https://trends.google.com/trends/api/dailytrends";
pub const DEFAULT_REALTIME_ENDPOINT: &str = "https://trends.google.com/trends/api/realtimetrends";
pub const DEFAULT_YOUTUBE_ENDPOINT: &str = "https://www.youtube.com/feed/trending";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; trend-snapshot/0.1)";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_HL: &str = "en-US";
pub const DEFAULT_REALTIME_CATEGORY: &str = "all";

/// 所有區段皆可省略，缺省時使用內建預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub geo: Option<String>,
    pub limit: Option<usize>,
    pub max_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    pub hl: Option<String>,
    pub tz: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub google_daily: Option<SourceConfig>,
    pub google_realtime: Option<SourceConfig>,
    pub youtube: Option<SourceConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub category: Option<String>,
}

impl TrendConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrendError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrendError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TRENDS_ENDPOINT})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrendError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn geo(&self) -> &str {
        self.defaults.geo.as_deref().unwrap_or(DEFAULT_GEO)
    }

    pub fn limit(&self) -> usize {
        self.defaults.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn max_limit(&self) -> usize {
        self.defaults.max_limit.unwrap_or(DEFAULT_MAX_LIMIT)
    }

    /// 取得 assembler 的預設值設定
    pub fn aggregator(&self) -> AggregatorConfig {
        AggregatorConfig {
            geo: self.geo().to_string(),
            limit: self.limit(),
            max_limit: self.max_limit(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn user_agent(&self) -> &str {
        self.http.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn hl(&self) -> &str {
        self.http.hl.as_deref().unwrap_or(DEFAULT_HL)
    }

    pub fn tz(&self) -> i32 {
        self.http.tz.unwrap_or(0)
    }

    pub fn daily_endpoint(&self) -> &str {
        endpoint_or(&self.sources.google_daily, DEFAULT_DAILY_ENDPOINT)
    }

    pub fn realtime_endpoint(&self) -> &str {
        endpoint_or(&self.sources.google_realtime, DEFAULT_REALTIME_ENDPOINT)
    }

    pub fn realtime_category(&self) -> &str {
        self.sources
            .google_realtime
            .as_ref()
            .and_then(|s| s.category.as_deref())
            .unwrap_or(DEFAULT_REALTIME_CATEGORY)
    }

    pub fn youtube_endpoint(&self) -> &str {
        endpoint_or(&self.sources.youtube, DEFAULT_YOUTUBE_ENDPOINT)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("sources.google_daily.endpoint", self.daily_endpoint())?;
        validation::validate_url("sources.google_realtime.endpoint", self.realtime_endpoint())?;
        validation::validate_url("sources.youtube.endpoint", self.youtube_endpoint())?;
        validation::validate_non_empty_string(
            "sources.google_realtime.category",
            self.realtime_category(),
        )?;
        validation::validate_non_empty_string("http.user_agent", self.user_agent())?;
        validation::validate_non_empty_string("http.hl", self.hl())?;

        let timeout = self.http.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        validation::validate_range("http.timeout_seconds", timeout, 1, 120)?;

        self.aggregator().validate()
    }
}

fn endpoint_or<'a>(source: &'a Option<SourceConfig>, fallback: &'a str) -> &'a str {
    source
        .as_ref()
        .and_then(|s| s.endpoint.as_deref())
        .unwrap_or(fallback)
}

impl Validate for TrendConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
