//! Google Generative Language API client.

use actscan_core::{AnalyzerConfig, GenerationParams};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AiError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response contained no text (finish reason: {})", .finish_reason.as_deref().unwrap_or("unknown"))]
    EmptyResponse { finish_reason: Option<String> },
}

/// A single-prompt text generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`. Failures are returned, never
    /// converted into an empty completion.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, AiError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

// ── Wire types ──

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn request_body<'a>(
    prompt: &'a str,
    temperature: f32,
    params: &GenerationParams,
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: [Content {
            parts: [RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature,
            max_output_tokens: params.max_output_tokens,
            top_p: params.top_p,
            top_k: params.top_k,
        },
    }
}

/// Concatenated text parts of the first candidate.
fn response_text(body: &str) -> Result<String, AiError> {
    let resp: GenerateContentResponse = serde_json::from_str(body)?;
    let Some(candidate) = resp.candidates.into_iter().next() else {
        return Err(AiError::EmptyResponse {
            finish_reason: None,
        });
    };
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(AiError::EmptyResponse {
            finish_reason: candidate.finish_reason,
        });
    }
    Ok(text)
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    params: GenerationParams,
}

impl GeminiClient {
    /// Create a client from the run configuration.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            model: config.model.clone(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            params: config.generation,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;
        let url = self.endpoint();
        let body = request_body(prompt, temperature, &self.params);

        debug!(model = %self.model, prompt_bytes = prompt.len(), temperature, "calling generateContent");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(AiError::Server {
                status: status.as_u16(),
                body: text,
            });
        }

        let completion = response_text(&text)?;
        info!(model = %self.model, bytes = completion.len(), "generation complete");
        Ok(completion)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
