use std::time::Duration;

use substrate_core::errors::SubstrateError;
use substrate_core::scope::RequestContext;
use substrate_core::SubstrateResult;

/// External summarization backend the Abstractive compressor delegates to.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, ctx: &RequestContext, scrubbed_text: &str, target_percent: u32) -> SubstrateResult<String>;
}

#[derive(serde::Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    target_percent: u32,
    model_hint: &'a str,
}

#[derive(serde::Deserialize)]
struct SummarizeResponse {
    summary: String,
}

/// Calls a remote summarization endpoint over HTTP, the only non-trivial
/// blocking I/O a compressor performs. Bounded by its own request timeout,
/// independent of the caller's overall deadline.
pub struct HttpSummarizer {
    endpoint: String,
    api_key: String,
    model_hint: String,
    client: reqwest::blocking::Client,
}

impl HttpSummarizer {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, model_hint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self { endpoint: endpoint.into(), api_key: api_key.into(), model_hint: model_hint.into(), client }
    }
}

impl Summarizer for HttpSummarizer {
    fn summarize(&self, ctx: &RequestContext, scrubbed_text: &str, target_percent: u32) -> SubstrateResult<String> {
        ctx.check_cancelled()?;
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&SummarizeRequest { text: scrubbed_text, target_percent, model_hint: &self.model_hint })
            .send()
            .map_err(|e| SubstrateError::backend("compressor.abstractive", e.to_string()))?;

        if !response.status().is_success() {
            return Err(SubstrateError::backend(
                "compressor.abstractive",
                format!("summarizer returned status {}", response.status()),
            ));
        }

        let parsed: SummarizeResponse =
            response.json().map_err(|e| SubstrateError::backend("compressor.abstractive", e.to_string()))?;
        Ok(parsed.summary)
    }
}
