use std::path::PathBuf;
use thiserror::Error;

pub const INSUFFICIENT_DATA_MESSAGE: &str =
    "I don't have enough data yet! Please track your habits for a day or two first.";
pub const EMPTY_INSIGHT_MESSAGE: &str = "I couldn't generate an insight right now. Keep tracking!";
pub const INSIGHT_FAILURE_MESSAGE: &str =
    "Start tracking your habits to unlock AI insights! (Or check if your API key is valid).";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid date key '{0}', expected YYYY-MM-DD")]
    InvalidDateKey(String),

    #[error("{field} must be between 1 and 5, got {value}")]
    InvalidRating { field: &'static str, value: u8 },

    #[error("{field} must be HH:mm, got '{value}'")]
    InvalidTime { field: &'static str, value: String },

    #[error("failed to serialize logs: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write logs to {path}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a generation call produced no usable insight.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("no API key configured for the generation service")]
    MissingApiKey,

    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON exchanged with generation service: {0}")]
    Json(#[from] serde_json::Error),

    #[error("generation service returned no text")]
    EmptyResponse,
}

impl InsightError {
    /// Text shown in place of an insight when generation fails.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::EmptyResponse => EMPTY_INSIGHT_MESSAGE,
            _ => INSIGHT_FAILURE_MESSAGE,
        }
    }

    /// An empty answer still renders like a normal insight; everything else
    /// is an outright call failure.
    pub fn is_call_failure(&self) -> bool {
        !matches!(self, Self::EmptyResponse)
    }
}
