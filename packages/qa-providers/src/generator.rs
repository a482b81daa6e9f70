use std::{sync::Arc, time::Duration};

use tokio::time;

use crate::{Error, GenerationTransport, NativeTransport, RestTransport, Result};
use qa_config::TransportKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	pub retries: u32,
	pub backoff_base: u32,
	pub unit: Duration,
}
impl RetryPolicy {
	pub fn from_config(cfg: &qa_config::Generation) -> Self {
		Self {
			retries: cfg.retries.max(1),
			backoff_base: cfg.backoff_base,
			unit: Duration::from_millis(cfg.backoff_unit_ms),
		}
	}

	/// Wait after failed attempt `attempt` (1-based): `backoff_base^(attempt - 1)` units.
	pub fn wait_after(&self, attempt: u32) -> Duration {
		let factor = self.backoff_base.saturating_pow(attempt.saturating_sub(1));

		self.unit.saturating_mul(factor)
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self { retries: 3, backoff_base: 2, unit: Duration::from_secs(1) }
	}
}

/// Produces answer text with primary-then-fallback transports inside each attempt and
/// exponential backoff between attempts.
pub struct AnswerGenerator {
	primary: Option<Arc<dyn GenerationTransport>>,
	fallback: Arc<dyn GenerationTransport>,
	retry: RetryPolicy,
}
impl AnswerGenerator {
	pub fn new(
		primary: Option<Arc<dyn GenerationTransport>>,
		fallback: Arc<dyn GenerationTransport>,
		retry: RetryPolicy,
	) -> Self {
		Self { primary, fallback, retry }
	}

	pub fn from_config(cfg: &qa_config::Generation) -> Result<Self> {
		let primary: Option<Arc<dyn GenerationTransport>> = match cfg.transport {
			TransportKind::Native => Some(Arc::new(NativeTransport::new(cfg))),
			TransportKind::Rest => None,
		};
		let fallback = Arc::new(RestTransport::new(cfg)?);

		Ok(Self::new(primary, fallback, RetryPolicy::from_config(cfg)))
	}

	pub fn retry_policy(&self) -> RetryPolicy {
		self.retry
	}

	pub async fn generate(&self, prompt: &str) -> Result<String> {
		let mut last = None;

		for attempt in 1..=self.retry.retries {
			match self.attempt(prompt).await {
				Ok(text) => return Ok(text),
				Err(err) => {
					if attempt < self.retry.retries {
						let wait = self.retry.wait_after(attempt);

						tracing::warn!(
							error = %err,
							attempt,
							transport = self.fallback.name(),
							wait_ms = wait.as_millis() as u64,
							"Generation attempt failed. Retrying."
						);
						time::sleep(wait).await;
					} else {
						tracing::warn!(
							error = %err,
							attempt,
							transport = self.fallback.name(),
							"Generation attempt failed."
						);
					}

					last = Some(err);
				},
			}
		}

		let last = last.unwrap_or_else(|| Error::InvalidConfig {
			message: "Retry policy allows no attempts.".to_string(),
		});

		tracing::error!(attempts = self.retry.retries, error = %last, "Generation exhausted.");

		Err(Error::GenerationExhausted { attempts: self.retry.retries, last: Box::new(last) })
	}

	async fn attempt(&self, prompt: &str) -> Result<String> {
		if let Some(primary) = self.primary.as_deref() {
			match run_transport(primary, prompt).await {
				Ok(text) => return Ok(text),
				Err(err) => {
					tracing::warn!(
						error = %err,
						transport = primary.name(),
						"Primary transport failed. Falling back."
					);
				},
			}
		}

		run_transport(self.fallback.as_ref(), prompt).await
	}
}

async fn run_transport(transport: &dyn GenerationTransport, prompt: &str) -> Result<String> {
	let text = transport.generate(prompt).await?.into_text();

	if text.trim().is_empty() {
		return Err(Error::transport(transport.name(), "Response contained no text."));
	}

	Ok(text)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn waits_grow_exponentially() {
		let policy = RetryPolicy { retries: 5, backoff_base: 2, unit: Duration::from_secs(1) };
		let waits = (1..=4).map(|attempt| policy.wait_after(attempt)).collect::<Vec<_>>();

		assert_eq!(
			waits,
			vec![
				Duration::from_secs(1),
				Duration::from_secs(2),
				Duration::from_secs(4),
				Duration::from_secs(8)
			]
		);
	}

	#[test]
	fn base_one_gives_constant_waits() {
		let policy = RetryPolicy { retries: 3, backoff_base: 1, unit: Duration::from_millis(250) };

		assert_eq!(policy.wait_after(1), Duration::from_millis(250));
		assert_eq!(policy.wait_after(3), Duration::from_millis(250));
	}

	#[test]
	fn huge_exponents_saturate() {
		let policy = RetryPolicy { retries: 100, backoff_base: 10, unit: Duration::from_secs(1) };

		assert_eq!(policy.wait_after(64), Duration::from_secs(u32::MAX as u64));
	}
}
