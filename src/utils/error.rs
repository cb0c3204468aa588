use crate::domain::model::TrendSource;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendError {
    #[error("{feed} request failed: {source}")]
    Transport {
        feed: TrendSource,
        #[source]
        source: reqwest::Error,
    },

    #[error("{feed} responded with HTTP {status}")]
    UpstreamStatus { feed: TrendSource, status: u16 },

    #[error("{feed} payload rejected: {message}")]
    Schema { feed: TrendSource, message: String },

    #[error("Snapshot assembly failed: {message}")]
    Orchestration { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, TrendError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Upstream,
    Schema,
    Orchestration,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TrendError {
    pub fn schema(feed: TrendSource, message: impl Into<String>) -> Self {
        Self::Schema {
            feed,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::UpstreamStatus { .. } => ErrorCategory::Upstream,
            Self::Schema { .. } => ErrorCategory::Schema,
            Self::Orchestration { .. } => ErrorCategory::Orchestration,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一來源失敗只會讓快照降級
            ErrorCategory::Transport | ErrorCategory::Upstream | ErrorCategory::Schema => {
                ErrorSeverity::Medium
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Orchestration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 是否屬於可被吸收成「空來源」的上游錯誤
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Transport | ErrorCategory::Upstream | ErrorCategory::Schema
        )
    }

    /// 失敗的來源（若有）
    pub fn feed(&self) -> Option<TrendSource> {
        match self {
            Self::Transport { feed, .. }
            | Self::UpstreamStatus { feed, .. }
            | Self::Schema { feed, .. } => Some(*feed),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Transport => {
                "Check network connectivity or raise http.timeout_seconds"
            }
            ErrorCategory::Upstream => {
                "The upstream feed refused the request; retry later or verify the endpoint"
            }
            ErrorCategory::Schema => {
                "The upstream payload format changed; the adapter parser needs an update"
            }
            ErrorCategory::Orchestration => "This is an internal defect; please report it",
            ErrorCategory::Configuration => "Fix the configuration file or CLI arguments",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Transport { feed, .. } if self.is_timeout() => {
                format!("Timed out while contacting {}", feed)
            }
            Self::Transport { feed, .. } => format!("Could not reach {}", feed),
            Self::UpstreamStatus { feed, status } => {
                format!("{} is unavailable right now (HTTP {})", feed, status)
            }
            Self::Schema { feed, .. } => format!("{} returned data we could not read", feed),
            Self::Orchestration { .. } => "Trend snapshot could not be assembled".to_string(),
            Self::ConfigError { message } => format!("Invalid configuration: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Invalid configuration for {}: {}", field, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            Self::IoError(e) => format!("File system error: {}", e),
            Self::SerializationError(e) => format!("Could not encode snapshot: {}", e),
        }
    }
}
