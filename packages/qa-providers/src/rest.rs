use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{BoxFuture, Error, GenerationResponse, GenerationTransport, Result};

const NAME: &str = "rest";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Raw HTTP transport against a `generateContent` endpoint.
pub struct RestTransport {
	client: Client,
	api_base: String,
	api_key: String,
	model: String,
}
impl RestTransport {
	pub fn new(cfg: &qa_config::Generation) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.build()
			.map_err(|err| Error::InvalidConfig {
				message: format!("Failed to build HTTP client: {err}"),
			})?;

		Ok(Self {
			client,
			api_base: cfg.api_base.clone(),
			api_key: cfg.api_key.clone(),
			model: cfg.model.clone(),
		})
	}

	pub fn endpoint(&self) -> String {
		format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
	}

	async fn call(&self, prompt: &str) -> Result<GenerationResponse> {
		if self.api_key.trim().is_empty() {
			return Err(Error::transport(NAME, "API key is not configured."));
		}

		let res = self
			.client
			.post(self.endpoint())
			.header(API_KEY_HEADER, self.api_key.as_str())
			.json(&request_envelope(prompt))
			.send()
			.await
			.map_err(|err| Error::transport(NAME, err.to_string()))?;
		let status = res.status();

		if !status.is_success() {
			let body = res.text().await.unwrap_or_default();

			return Err(Error::transport(NAME, format!("status={status}, body={body}")));
		}

		let json: Value = res.json().await.map_err(|err| Error::transport(NAME, err.to_string()))?;

		Ok(GenerationResponse::from_json(json))
	}
}
impl GenerationTransport for RestTransport {
	fn name(&self) -> &'static str {
		NAME
	}

	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<GenerationResponse>> {
		Box::pin(self.call(prompt))
	}
}

pub fn request_envelope(prompt: &str) -> Value {
	serde_json::json!({
		"contents": [
			{ "parts": [{ "text": prompt }] }
		]
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn generation_config(api_base: &str) -> qa_config::Generation {
		qa_config::Generation {
			transport: qa_config::TransportKind::Rest,
			api_base: api_base.to_string(),
			api_key: "key".to_string(),
			model: "gemini-1.5-flash".to_string(),
			timeout_ms: 1_000,
			retries: 3,
			backoff_base: 2,
			backoff_unit_ms: 1_000,
		}
	}

	#[test]
	fn builds_generate_content_endpoint() {
		let transport = RestTransport::new(&generation_config("https://example.test"))
			.expect("Failed to build transport.");

		assert_eq!(
			transport.endpoint(),
			"https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
		);
	}

	#[test]
	fn wraps_prompt_in_contents_envelope() {
		let envelope = request_envelope("What is 2+2?");

		assert_eq!(envelope["contents"][0]["parts"][0]["text"], "What is 2+2?");
	}
}
