pub mod assembler;
pub mod normalizer;

pub use crate::domain::model::{CollectOptions, TrendSnapshot, UnifiedKeyword};
pub use crate::domain::ports::{KeywordCandidate, TrendAdapter};
pub use crate::utils::error::Result;
