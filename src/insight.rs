use crate::config::Config;
use crate::errors::{InsightError, INSUFFICIENT_DATA_MESSAGE};
use crate::models::DailyRecord;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, warn};

/// Anything that can turn a prompt into free text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, InsightError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insight {
    Generated(String),
    InsufficientData,
}

impl Insight {
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) => text,
            Self::InsufficientData => INSUFFICIENT_DATA_MESSAGE,
        }
    }
}

/// Asks `generator` for a mentor insight over `records` (any order).
///
/// No records means no outbound call.
pub async fn generate_insight<G>(generator: &G, records: &[DailyRecord]) -> Result<Insight, InsightError>
where
    G: TextGenerator,
{
    if records.is_empty() {
        return Ok(Insight::InsufficientData);
    }

    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));
    let prompt = build_prompt(&sorted)?;

    let text = generator.generate(&prompt).await?;
    if text.trim().is_empty() {
        return Err(InsightError::EmptyResponse);
    }
    Ok(Insight::Generated(text))
}

/// Same as [`generate_insight`], with failures replaced by their fallback text.
pub async fn request_insight<G>(generator: &G, records: &[DailyRecord]) -> String
where
    G: TextGenerator,
{
    match generate_insight(generator, records).await {
        Ok(insight) => insight.text().to_string(),
        Err(err) => {
            warn!("mentor insight unavailable: {err}");
            err.fallback_message().to_string()
        }
    }
}

pub fn build_prompt(records: &[DailyRecord]) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string_pretty(records)?;
    Ok(format!(
        r#"You are a strict but encouraging lifestyle mentor and accountability partner.
Your job is to push the user to stop procrastinating, cut down on Instagram and study with focus.

Below is JSON describing the user's most recent tracked days.

Data:
{data}

Answer in at most 200 words, using exactly these sections:

### 🔎 Reality Check
(Compare study minutes against Instagram minutes. Call it out if Instagram wins, praise real study effort.)

### 💡 Pattern Spotted
(Link sleep quality or mood to productivity, e.g. "Late nights are wrecking your focus.")

### ⚔️ Tomorrow's Mission
(One specific, demanding challenge for tomorrow, e.g. "No Instagram before 6 PM.")

Be direct, concise and motivating. Use Markdown."#
    ))
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let api_key = self.api_key.as_deref().ok_or(InsightError::MissingApiKey)?;

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };

        debug!("requesting insight from {}", self.model);
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(InsightError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        Ok(parsed.text())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
