pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{AggregatorConfig, TrendConfig};

pub use crate::core::{
    assembler::{SnapshotAssembler, TrendAggregator},
    normalizer::{canonical_key, normalize},
};
pub use crate::domain::model::{
    CollectOptions, DailyTrendRecord, RealtimeTrendRecord, TrendSnapshot, TrendSource,
    UnifiedKeyword, VideoTrendRecord,
};
pub use crate::domain::ports::TrendAdapter;
pub use crate::utils::error::{Result, TrendError};
