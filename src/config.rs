use std::{env, path::PathBuf};

pub const DEFAULT_DATA_PATH: &str = "data/lifesync_logs.json";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_ANALYTICS_DAYS: usize = 14;
pub const DEFAULT_INSIGHT_RECORDS: usize = 7;
pub const MAX_ANALYTICS_DAYS: usize = 366;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    pub analytics_days: usize,
    pub insight_records: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            analytics_days: DEFAULT_ANALYTICS_DAYS,
            insight_records: DEFAULT_INSIGHT_RECORDS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Unparseable numbers fall back to
    /// their defaults, blank strings count as unset. The analytics window is
    /// capped at [`MAX_ANALYTICS_DAYS`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            data_path: get("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            api_key: get("API_KEY").or_else(|| get("GEMINI_API_KEY")),
            model: get("LIFESYNC_MODEL").unwrap_or(defaults.model),
            api_base: get("LIFESYNC_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            temperature: get("LIFESYNC_TEMPERATURE")
                .and_then(|value| value.parse::<f32>().ok())
                .unwrap_or(defaults.temperature),
            analytics_days: get("LIFESYNC_ANALYTICS_DAYS")
                .and_then(|value| value.parse::<usize>().ok())
                .map(|days| days.min(MAX_ANALYTICS_DAYS))
                .unwrap_or(defaults.analytics_days),
            insight_records: get("LIFESYNC_INSIGHT_RECORDS")
                .and_then(|value| value.parse::<usize>().ok())
                .unwrap_or(defaults.insight_records),
        }
    }
}
