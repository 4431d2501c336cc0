use crate::config::Config;
use crate::errors::{InsightError, StoreError};
use crate::insight::{generate_insight, request_insight, Insight, TextGenerator};
use crate::models::{DailyRecord, DailyRecordPatch, DayMetric, WindowSummary, DEFAULT_HABITS};
use crate::stats::{derive_window, summarize};
use crate::store::{date_key_for, LogStore};
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cloneable handle the front end holds instead of the store itself.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<Mutex<LogStore>>,
}

impl AppState {
    pub fn new(config: Config, store: LogStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Opens the store at `config.data_path` and wraps it.
    pub async fn open(config: Config) -> Result<Self, StoreError> {
        let store = LogStore::open(&config.data_path).await?;
        Ok(Self::new(config, store))
    }

    pub async fn record(&self, date_key: &str) -> Option<DailyRecord> {
        self.store.lock().await.get(date_key).cloned()
    }

    /// The stored record for `date_key`, or what a fresh day looks like.
    pub async fn record_or_default(&self, date_key: &str) -> DailyRecord {
        self.record(date_key)
            .await
            .unwrap_or_else(|| DailyRecord::with_defaults(date_key))
    }

    pub async fn update(
        &self,
        date_key: &str,
        patch: DailyRecordPatch,
    ) -> Result<DailyRecord, StoreError> {
        self.store.lock().await.update(date_key, patch).await
    }

    pub async fn toggle_habit(&self, date_key: &str, habit_id: &str) -> Result<DailyRecord, StoreError> {
        self.store.lock().await.toggle_habit(date_key, habit_id).await
    }

    pub async fn save_insight(&self, date_key: &str, insight: &str) -> Result<DailyRecord, StoreError> {
        self.store.lock().await.save_insight(date_key, insight).await
    }

    pub async fn analytics(&self, anchor: NaiveDate) -> Vec<DayMetric> {
        let store = self.store.lock().await;
        derive_window(&store, self.config.analytics_days, anchor, DEFAULT_HABITS)
    }

    pub async fn analytics_summary(&self, anchor: NaiveDate) -> WindowSummary {
        summarize(&self.analytics(anchor).await)
    }

    /// Typed insight over the configured number of recent records. The store
    /// lock is released before the generator is awaited.
    pub async fn generate_insight<G>(&self, generator: &G) -> Result<Insight, InsightError>
    where
        G: TextGenerator,
    {
        let recent = self.recent_records().await;
        generate_insight(generator, &recent).await
    }

    pub async fn request_insight<G>(&self, generator: &G) -> String
    where
        G: TextGenerator,
    {
        let recent = self.recent_records().await;
        request_insight(generator, &recent).await
    }

    async fn recent_records(&self) -> Vec<DailyRecord> {
        self.store.lock().await.recent(self.config.insight_records)
    }
}

pub fn today_key() -> String {
    date_key_for(Local::now().date_naive())
}
