use std::env;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};

use crate::error::{Error, Result};
use crate::types::{ChatCompletion, ChatRequest, ErrorEnvelope};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A completion backend.
///
/// The interaction loop only depends on this trait, so tests can substitute
/// a scripted client for the real endpoint. Implementations perform exactly
/// one network round trip per call; there is no retry and no backoff.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submit one request and return the parsed response.
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion>;
}

/// Client for an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAi {
    api_key: String,
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl OpenAi {
    /// Create a new client.
    ///
    /// The API key can be provided directly or read from the OPENAI_API_KEY
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var("OPENAI_API_KEY").map_err(|_| {
                Error::authentication(
                    "API key not provided and OPENAI_API_KEY environment variable not set",
                )
            })?,
        };

        let base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        url::Url::parse(&base_url).map_err(|e| {
            Error::bad_request(format!("invalid base URL: {e}"), Some("base_url".to_string()))
        })?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
        })
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .expect("API key should be valid header material"),
        );
        headers
    }

    /// Process API response errors and convert to our Error type.
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let parsed = serde_json::from_str::<ErrorEnvelope>(&error_body).ok();
        let error_type = parsed
            .as_ref()
            .and_then(|envelope| envelope.error.error_type.clone());
        let error_message = parsed
            .as_ref()
            .and_then(|envelope| envelope.error.message.clone())
            .unwrap_or_else(|| error_body.clone());
        let error_param = parsed
            .as_ref()
            .and_then(|envelope| envelope.error.param.clone());

        match status_code {
            400 => Error::bad_request(error_message, error_param),
            401 => Error::authentication(error_message),
            408 => Error::timeout(error_message, None),
            429 => Error::rate_limit(error_message, retry_after),
            500..=599 => Error::internal_server(error_message),
            _ => Error::api(status_code, error_type, error_message),
        }
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenAi {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion> {
        let url = format!("{}chat/completions", self.base_url);

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            let err = Self::process_error_response(response).await;
            tracing::debug!(error = %err, "completion request failed");
            return Err(err);
        }

        let body = response.text().await.map_err(|e| {
            Error::http_client(format!("Failed to read response: {}", e), Some(Box::new(e)))
        })?;

        // Some failures come back with a 200 status and an error envelope.
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
            let message = envelope
                .error
                .message
                .unwrap_or_else(|| "unspecified API error".to_string());
            tracing::debug!(error = %message, "completion response carried an error body");
            return Err(Error::api(200, envelope.error.error_type, message));
        }

        let completion = serde_json::from_str::<ChatCompletion>(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })?;

        if let Some(usage) = completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion request succeeded"
            );
        }

        Ok(completion)
    }
}
