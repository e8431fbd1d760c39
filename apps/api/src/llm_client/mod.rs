//! Thin client for the Anthropic Messages API, used by resume tailoring.
//!
//! One user turn per request. Throttling (429, 529) and server errors are
//! retried with doubling backoff; any other non-success status fails fast.
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// Fixed model id for every call.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_OUTPUT_TOKENS: u32 = 2048;
const MAX_ATTEMPTS: u32 = 3;
const FIRST_BACKOFF: Duration = Duration::from_millis(1000);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// Error bodies are clipped to this many chars before they reach logs.
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model output is not the expected JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("model returned no text")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'static str,
    max_tokens: u32,
    system: &'a str,
    messages: [Turn<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

fn build_request<'a>(prompt: &'a str, system: &'a str) -> MessagesRequest<'a> {
    MessagesRequest {
        model: MODEL,
        max_tokens: MAX_OUTPUT_TOKENS,
        system,
        messages: [Turn {
            role: "user",
            content: prompt,
        }],
    }
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// First `text` block; thinking and tool blocks are skipped.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .filter(|block| block.kind == "text")
            .find_map(|block| block.text.as_deref())
    }
}

/// What one HTTP round trip amounted to.
enum Attempt {
    Done(LlmResponse),
    Retry(LlmError),
    Fail(LlmError),
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

/// Delay before retry number `retry` (1-based): 1s, 2s, 4s, ...
fn backoff_delay(retry: u32) -> Duration {
    FIRST_BACKOFF * 2u32.saturating_pow(retry.saturating_sub(1))
}

/// Pulls `error.message` out of an API error body, else the clipped raw body.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Detail,
    }
    #[derive(Deserialize)]
    struct Detail {
        message: String,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}

#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, api_key })
    }

    async fn attempt(&self, request: &MessagesRequest<'_>) -> Attempt {
        let response = match self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() || e.is_connect() => return Attempt::Retry(e.into()),
            Err(e) => return Attempt::Fail(e.into()),
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<LlmResponse>().await {
                Ok(parsed) => Attempt::Done(parsed),
                Err(e) => Attempt::Fail(e.into()),
            };
        }

        let body = response.text().await.unwrap_or_default();
        let error = LlmError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        };
        if is_retryable(status) {
            Attempt::Retry(error)
        } else {
            Attempt::Fail(error)
        }
    }

    /// Sends one user turn and returns the raw response.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request = build_request(prompt, system);
        let mut last_error = None;

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                tokio::time::sleep(backoff_delay(attempt - 1)).await;
            }
            match self.attempt(&request).await {
                Attempt::Done(response) => {
                    debug!(
                        "Model call ok on attempt {attempt} ({} in / {} out tokens)",
                        response.usage.input_tokens, response.usage.output_tokens
                    );
                    return Ok(response);
                }
                Attempt::Fail(e) => return Err(e),
                Attempt::Retry(e) => {
                    warn!("Model call attempt {attempt}/{MAX_ATTEMPTS} failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            attempts: MAX_ATTEMPTS,
        }))
    }

    /// Calls the model and decodes its text as `T`. The prompt must ask for
    /// JSON only; a fenced block or stray prose around the value is tolerated.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        Ok(serde_json::from_str(extract_json(text))?)
    }
}

/// Narrows model output to the JSON value it carries: drops a surrounding
/// markdown fence, then anything outside the outermost braces or brackets.
fn extract_json(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        // Skip the info string (`json`, `JSON`, ...) up to the first newline.
        let rest = rest.split_once('\n').map_or(rest, |(_, after)| after);
        body = rest.trim_end().trim_end_matches("```").trim();
    }

    let start = body.find(&['{', '['][..]);
    let end = body.rfind(&['}', ']'][..]);
    match (start, end) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => body,
    }
}
