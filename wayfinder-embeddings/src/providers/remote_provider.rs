//! Remote embedding provider for `embedContent`-style HTTP APIs.
//!
//! Single texts go to `{endpoint}/{model}:embedContent`, batches to
//! `{endpoint}/{model}:batchEmbedContents`. Transient failures (network
//! errors, 429, 5xx) are retried with exponential backoff; anything else
//! fails immediately. After retries are exhausted the provider reports
//! itself unavailable for a cooldown so the degradation chain skips it.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wayfinder_core::config::EmbeddingConfig;
use wayfinder_core::errors::{EmbeddingError, WayfinderResult};
use wayfinder_core::models::EmbeddingMode;
use wayfinder_core::traits::IEmbeddingProvider;

const UNAVAILABLE_COOLDOWN: Duration = Duration::from_secs(60);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    content: Content<'a>,
    task_type: &'static str,
    output_dimensionality: usize,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: Values,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<Values>,
}

#[derive(Deserialize)]
struct Values {
    values: Vec<f32>,
}

/// Whether a failed attempt is worth retrying.
enum Attempt<T> {
    Done(T),
    Transient(String),
    Fatal(String),
}

pub struct RemoteEmbeddingProvider {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    endpoint: String,
    model: String,
    api_key: String,
    dimensions: usize,
    max_retries: u32,
    unavailable_until: Mutex<Option<Instant>>,
}

impl RemoteEmbeddingProvider {
    /// Build from configuration, reading the API key from `api_key_env`.
    pub fn from_config(config: &EmbeddingConfig) -> WayfinderResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| EmbeddingError::ProviderUnavailable {
                provider: format!("remote ({} not set)", config.api_key_env),
            })?;
        Self::new(config, api_key)
    }

    pub fn new(config: &EmbeddingConfig, api_key: String) -> WayfinderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| EmbeddingError::ProviderUnavailable {
                provider: format!("remote (client: {e})"),
            })?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| EmbeddingError::ProviderUnavailable {
                provider: format!("remote (runtime: {e})"),
            })?;

        Ok(Self {
            client,
            runtime,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            dimensions: config.dimensions,
            max_retries: config.max_retries,
            unavailable_until: Mutex::new(None),
        })
    }

    /// Clear the cooldown, e.g. after a successful health check.
    pub fn reset_availability(&self) {
        if let Ok(mut guard) = self.unavailable_until.lock() {
            *guard = None;
        }
    }

    fn mark_unavailable(&self) {
        if let Ok(mut guard) = self.unavailable_until.lock() {
            *guard = Some(Instant::now() + UNAVAILABLE_COOLDOWN);
        }
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}:{method}", self.endpoint, self.model)
    }

    fn request<'a>(
        &'a self,
        text: &'a str,
        mode: EmbeddingMode,
        with_model: bool,
    ) -> EmbedContentRequest<'a> {
        EmbedContentRequest {
            model: with_model.then_some(self.model.as_str()),
            content: Content {
                parts: [Part { text }],
            },
            task_type: mode.task_type(),
            output_dimensionality: self.dimensions,
        }
    }

    /// Run `send` with retry and backoff, tracking availability.
    fn with_retries<T>(&self, send: impl Fn() -> Attempt<T>) -> WayfinderResult<T> {
        if !self.is_available() {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.name().to_string(),
            }
            .into());
        }

        let mut last_reason = String::from("no attempt made");
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                std::thread::sleep(delay);
                debug!(attempt, "retrying remote embedding request");
            }
            match send() {
                Attempt::Done(value) => return Ok(value),
                Attempt::Fatal(reason) => {
                    return Err(EmbeddingError::InferenceFailed { reason }.into());
                }
                Attempt::Transient(reason) => {
                    warn!(attempt, error = %reason, "remote embedding request failed");
                    last_reason = reason;
                }
            }
        }

        self.mark_unavailable();
        Err(EmbeddingError::InferenceFailed {
            reason: format!("retries exhausted: {last_reason}"),
        }
        .into())
    }

    fn post<B, R>(&self, url: &str, body: &B) -> Attempt<R>
    where
        B: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        self.runtime.block_on(async {
            let response = match self
                .client
                .post(url)
                .header("x-goog-api-key", &self.api_key)
                .json(body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => return Attempt::Transient(format!("HTTP error: {e}")),
            };

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let reason = format!("API returned {status}: {text}");
                return if status.as_u16() == 429 || status.is_server_error() {
                    Attempt::Transient(reason)
                } else {
                    Attempt::Fatal(reason)
                };
            }

            match response.json::<R>().await {
                Ok(parsed) => Attempt::Done(parsed),
                Err(e) => Attempt::Fatal(format!("JSON parse error: {e}")),
            }
        })
    }
}

impl IEmbeddingProvider for RemoteEmbeddingProvider {
    fn embed(&self, text: &str, mode: EmbeddingMode) -> WayfinderResult<Vec<f32>> {
        let url = self.url("embedContent");
        let body = self.request(text, mode, false);
        let response: EmbedContentResponse = self.with_retries(|| self.post(&url, &body))?;
        Ok(response.embedding.values)
    }

    fn embed_batch(&self, texts: &[String], mode: EmbeddingMode) -> WayfinderResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.url("batchEmbedContents");
        let body = BatchEmbedRequest {
            requests: texts.iter().map(|t| self.request(t, mode, true)).collect(),
        };
        let response: BatchEmbedResponse = self.with_retries(|| self.post(&url, &body))?;
        if response.embeddings.len() != texts.len() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!(
                    "batch returned {} embeddings for {} texts",
                    response.embeddings.len(),
                    texts.len()
                ),
            }
            .into());
        }
        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        match self.unavailable_until.lock() {
            Ok(guard) => guard.map_or(true, |until| Instant::now() >= until),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> RemoteEmbeddingProvider {
        let config = EmbeddingConfig {
            endpoint: "http://127.0.0.1:9/v1beta/".to_string(),
            dimensions: 8,
            max_retries: 0,
            request_timeout_ms: 200,
            ..Default::default()
        };
        RemoteEmbeddingProvider::new(&config, "test-key".to_string()).unwrap()
    }

    #[test]
    fn urls_join_endpoint_and_model() {
        let p = provider();
        assert_eq!(
            p.url("embedContent"),
            "http://127.0.0.1:9/v1beta/models/text-embedding-004:embedContent"
        );
    }

    #[test]
    fn request_body_carries_task_type_and_dimensions() {
        let p = provider();
        let json = serde_json::to_value(p.request("hello", EmbeddingMode::Query, false)).unwrap();
        assert_eq!(json["taskType"], "RETRIEVAL_QUERY");
        assert_eq!(json["outputDimensionality"], 8);
        assert_eq!(json["content"]["parts"][0]["text"], "hello");
        assert!(json.get("model").is_none());
    }

    #[test]
    fn unreachable_endpoint_marks_unavailable() {
        let p = provider();
        assert!(p.is_available());
        assert!(p.embed("x", EmbeddingMode::Document).is_err());
        assert!(!p.is_available());
        p.reset_availability();
        assert!(p.is_available());
    }

    #[test]
    fn empty_batch_makes_no_request() {
        let p = provider();
        assert!(p.embed_batch(&[], EmbeddingMode::Document).unwrap().is_empty());
        assert!(p.is_available());
    }
}
