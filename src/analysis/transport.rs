use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use super::types::{ChatCompletionRequest, ChatTransport};
use super::AnalysisError;
use crate::config::{AnalysisConfig, APP_NAME, APP_VERSION};

/// Blocking HTTP transport for OpenRouter (or any OpenAI-compatible
/// chat-completions endpoint).
pub struct OpenRouterTransport {
    endpoint: String,
    client: reqwest::blocking::Client,
    timeout_secs: Option<u64>,
}

impl OpenRouterTransport {
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, "user-agent", &format!("{APP_NAME}/{APP_VERSION}"));
        if let Some(referer) = &config.referer {
            insert_header(&mut headers, "http-referer", referer);
        }
        if let Some(title) = &config.app_title {
            insert_header(&mut headers, "x-title", title);
        }

        let mut builder = reqwest::blocking::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AnalysisError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn insert_header(headers: &mut HeaderMap, name: &'static str, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name, v);
        }
        Err(_) => tracing::warn!(header = name, "Skipping header with invalid value"),
    }
}

impl ChatTransport for OpenRouterTransport {
    fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<String, AnalysisError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    AnalysisError::HttpClient(format!("Cannot reach {}", self.endpoint))
                } else if e.is_timeout() {
                    AnalysisError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs.unwrap_or_default()
                    ))
                } else {
                    AnalysisError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .map_err(|e| AnalysisError::HttpClient(e.to_string()))
    }
}

/// Mock transport for testing: returns a fixed reply and records calls.
pub struct MockTransport {
    reply: Result<String, AnalysisError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, ChatCompletionRequest)>>,
}

impl MockTransport {
    /// Reply with a raw response body.
    pub fn new(body: &str) -> Self {
        Self::with_reply(Ok(body.to_string()))
    }

    /// Reply with a well-formed envelope whose first choice carries `content`.
    pub fn with_content(content: &str) -> Self {
        let body = serde_json::json!({
            "id": "gen-mock",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        });
        Self::new(&body.to_string())
    }

    pub fn failing(error: AnalysisError) -> Self {
        Self::with_reply(Err(error))
    }

    fn with_reply(reply: Result<String, AnalysisError>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// API key and request body of the most recent call.
    pub fn last_request(&self) -> Option<(String, ChatCompletionRequest)> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

impl ChatTransport for MockTransport {
    fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some((api_key.to_string(), request.clone()));
        }
        self.reply.clone()
    }
}
