use std::time::Duration;

use genai::{
	Client, ModelIden,
	chat::{ChatMessage, ChatRequest},
	resolver::{AuthData, AuthResolver},
};
use serde_json::Value;
use tokio::time;

use crate::{BoxFuture, Error, GenerationResponse, GenerationTransport, Result};

const NAME: &str = "native";

/// Primary transport through the `genai` client library.
pub struct NativeTransport {
	client: Client,
	model: String,
	timeout: Duration,
}
impl NativeTransport {
	pub fn new(cfg: &qa_config::Generation) -> Self {
		let api_key = cfg.api_key.clone();
		let auth = AuthResolver::from_resolver_fn(move |_model: ModelIden| {
			Ok::<_, genai::resolver::Error>(Some(AuthData::from_single(api_key.clone())))
		});
		let client = Client::builder().with_auth_resolver(auth).build();

		Self { client, model: cfg.model.clone(), timeout: Duration::from_millis(cfg.timeout_ms) }
	}

	async fn call(&self, prompt: &str) -> Result<GenerationResponse> {
		let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);
		let response = time::timeout(self.timeout, self.client.exec_chat(&self.model, request, None))
			.await
			.map_err(|_| Error::transport(NAME, "Request timed out."))?
			.map_err(|err| Error::transport(NAME, err.to_string()))?;

		Ok(match response.first_text() {
			Some(text) => GenerationResponse::Text(text.to_string()),
			None => GenerationResponse::Unknown(Value::Null),
		})
	}
}
impl GenerationTransport for NativeTransport {
	fn name(&self) -> &'static str {
		NAME
	}

	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<GenerationResponse>> {
		Box::pin(self.call(prompt))
	}
}
