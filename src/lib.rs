pub mod config;
pub mod errors;
pub mod insight;
pub mod logging;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;

pub use config::Config;
pub use errors::{InsightError, StoreError};
pub use insight::{GeminiClient, Insight, TextGenerator};
pub use models::{DailyRecord, DailyRecordPatch, DayMetric, DEFAULT_HABITS};
pub use state::{today_key, AppState};
pub use store::LogStore;
