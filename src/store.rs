use crate::errors::StoreError;
use crate::models::{DailyRecord, DailyRecordPatch};
use crate::storage::{ensure_parent_dir, load_logs, persist_logs, Logs};
use chrono::{NaiveDate, NaiveTime};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Owns every daily record and the durable slot they are written to.
///
/// Records only change through [`LogStore::update`] (or helpers built on it),
/// and each successful update writes the full set back to disk once the slot
/// has been loaded.
#[derive(Debug)]
pub struct LogStore {
    path: PathBuf,
    logs: Logs,
    loaded: bool,
}

impl LogStore {
    /// Empty store bound to `path`. Nothing is written until [`load`] runs.
    ///
    /// [`load`]: LogStore::load
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logs: Logs::new(),
            loaded: false,
        }
    }

    /// Creates the slot directory if needed and rehydrates the store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let mut store = Self::new(path);
        ensure_parent_dir(&store.path).await?;
        store.load().await;
        Ok(store)
    }

    /// Replaces the in-memory set with the slot's content (or nothing) and
    /// enables persistence.
    pub async fn load(&mut self) {
        self.logs = load_logs(&self.path).await;
        self.loaded = true;
        info!(
            "loaded {} daily records from {}",
            self.logs.len(),
            self.path.display()
        );
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn get(&self, date_key: &str) -> Option<&DailyRecord> {
        self.logs.get(date_key)
    }

    pub fn records(&self) -> &Logs {
        &self.logs
    }

    /// The `limit` latest records by date, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<DailyRecord> {
        let mut recent: Vec<DailyRecord> = self.logs.values().rev().take(limit).cloned().collect();
        recent.reverse();
        recent
    }

    /// Merges `patch` over the existing record (or a default one) without
    /// touching the slot. Rejected patches leave the store unchanged.
    pub fn apply(
        &mut self,
        date_key: &str,
        patch: DailyRecordPatch,
    ) -> Result<&DailyRecord, StoreError> {
        validate_date_key(date_key)?;
        validate_patch(&patch)?;

        let record = self
            .logs
            .entry(date_key.to_string())
            .or_insert_with(|| DailyRecord::with_defaults(date_key));
        record.apply(patch);
        Ok(record)
    }

    /// [`apply`](LogStore::apply) followed by a full write of the slot.
    ///
    /// A failed write keeps the in-memory change and reports the error.
    pub async fn update(
        &mut self,
        date_key: &str,
        patch: DailyRecordPatch,
    ) -> Result<DailyRecord, StoreError> {
        let updated = self.apply(date_key, patch)?.clone();
        if self.loaded {
            self.persist().await?;
        } else {
            debug!("slot not loaded yet, keeping {date_key} in memory only");
        }
        Ok(updated)
    }

    /// Flips one habit, keeping the rest of that day's habits intact.
    pub async fn toggle_habit(
        &mut self,
        date_key: &str,
        habit_id: &str,
    ) -> Result<DailyRecord, StoreError> {
        let mut habits = self
            .get(date_key)
            .map(|record| record.habits.clone())
            .unwrap_or_default();
        let done = habits.get(habit_id).copied().unwrap_or(false);
        habits.insert(habit_id.to_string(), !done);

        self.update(
            date_key,
            DailyRecordPatch {
                habits: Some(habits),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn save_insight(
        &mut self,
        date_key: &str,
        insight: impl Into<String>,
    ) -> Result<DailyRecord, StoreError> {
        self.update(
            date_key,
            DailyRecordPatch {
                ai_mentor_insight: Some(insight.into()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        persist_logs(&self.path, &self.logs).await?;
        debug!("persisted {} daily records", self.logs.len());
        Ok(())
    }
}

/// Parses a canonical `YYYY-MM-DD` key.
pub fn parse_date_key(date_key: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(date_key, "%Y-%m-%d")
        .ok()
        .filter(|date| date_key_for(*date) == date_key)
        .ok_or_else(|| StoreError::InvalidDateKey(date_key.to_string()))
}

pub fn date_key_for(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn validate_date_key(date_key: &str) -> Result<(), StoreError> {
    parse_date_key(date_key).map(|_| ())
}

fn validate_patch(patch: &DailyRecordPatch) -> Result<(), StoreError> {
    for (field, value) in [
        ("mood", patch.mood),
        ("energy", patch.energy),
        ("sleepQuality", patch.sleep_quality),
    ] {
        if let Some(value) = value {
            if !(1..=5).contains(&value) {
                return Err(StoreError::InvalidRating { field, value });
            }
        }
    }

    for (field, value) in [("bedTime", &patch.bed_time), ("wakeTime", &patch.wake_time)] {
        if let Some(value) = value {
            let canonical = NaiveTime::parse_from_str(value, "%H:%M")
                .map(|time| time.format("%H:%M").to_string() == *value)
                .unwrap_or(false);
            if !canonical {
                return Err(StoreError::InvalidTime {
                    field,
                    value: value.clone(),
                });
            }
        }
    }

    Ok(())
}
