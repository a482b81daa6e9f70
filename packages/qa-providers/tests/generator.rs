use std::{
	collections::VecDeque,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use serde_json::json;
use tokio::time::Instant;

use qa_providers::{
	AnswerGenerator, BoxFuture, Error, GenerationResponse, GenerationTransport, Result,
	RetryPolicy,
};

/// Replays a fixed script of outcomes, then keeps failing.
struct ScriptedTransport {
	name: &'static str,
	script: Mutex<VecDeque<Result<GenerationResponse>>>,
	calls: AtomicUsize,
}
impl ScriptedTransport {
	fn new(name: &'static str, script: Vec<Result<GenerationResponse>>) -> Arc<Self> {
		Arc::new(Self { name, script: Mutex::new(script.into()), calls: AtomicUsize::new(0) })
	}

	fn failing(name: &'static str) -> Arc<Self> {
		Self::new(name, Vec::new())
	}

	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl GenerationTransport for ScriptedTransport {
	fn name(&self) -> &'static str {
		self.name
	}

	fn generate<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<GenerationResponse>> {
		let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
		let next = self
			.script
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.pop_front()
			.unwrap_or_else(|| Err(Error::transport(self.name, format!("call {call} failed"))));

		Box::pin(async move { next })
	}
}

fn fail(name: &'static str, message: &str) -> Result<GenerationResponse> {
	Err(Error::transport(name, message))
}

fn text(value: &str) -> Result<GenerationResponse> {
	Ok(GenerationResponse::Text(value.to_string()))
}

fn policy(retries: u32) -> RetryPolicy {
	RetryPolicy { retries, backoff_base: 2, unit: Duration::from_secs(1) }
}

#[tokio::test(start_paused = true)]
async fn succeeds_on_final_attempt_after_backoff() {
	let fallback = ScriptedTransport::new(
		"rest",
		vec![fail("rest", "one"), fail("rest", "two"), text("4")],
	);
	let generator = AnswerGenerator::new(None, fallback.clone(), policy(3));
	let started = Instant::now();
	let answer = generator.generate("What is 2+2?").await.expect("Third attempt must succeed.");

	assert_eq!(answer, "4");
	assert_eq!(fallback.calls(), 3);
	// 2^0 + 2^1 units between the three attempts.
	assert_eq!(started.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn exhaustion_carries_last_failure_and_skips_trailing_wait() {
	let fallback = ScriptedTransport::new(
		"rest",
		vec![fail("rest", "first"), fail("rest", "second"), fail("rest", "status=503")],
	);
	let generator = AnswerGenerator::new(None, fallback.clone(), policy(3));
	let started = Instant::now();
	let err = generator.generate("What is 2+2?").await.expect_err("All attempts must fail.");

	assert_eq!(fallback.calls(), 3);
	assert_eq!(started.elapsed(), Duration::from_secs(3));

	match err {
		Error::GenerationExhausted { attempts, last } => {
			assert_eq!(attempts, 3);
			assert!(last.to_string().contains("status=503"), "Unexpected last error: {last}");
		},
		other => panic!("Unexpected error: {other:?}"),
	}
}

#[tokio::test(start_paused = true)]
async fn primary_success_skips_fallback() {
	let primary = ScriptedTransport::new("native", vec![text("four")]);
	let fallback = ScriptedTransport::failing("rest");
	let generator = AnswerGenerator::new(Some(primary.clone()), fallback.clone(), policy(3));
	let answer = generator.generate("What is 2+2?").await.expect("Primary must succeed.");

	assert_eq!(answer, "four");
	assert_eq!(primary.calls(), 1);
	assert_eq!(fallback.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn primary_failure_falls_back_within_the_same_attempt() {
	let primary = ScriptedTransport::failing("native");
	let fallback = ScriptedTransport::new("rest", vec![text("4")]);
	let generator = AnswerGenerator::new(Some(primary.clone()), fallback.clone(), policy(3));
	let started = Instant::now();
	let answer = generator.generate("What is 2+2?").await.expect("Fallback must succeed.");

	assert_eq!(answer, "4");
	assert_eq!(primary.calls(), 1);
	assert_eq!(fallback.calls(), 1);
	assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn every_attempt_runs_both_transports() {
	let primary = ScriptedTransport::failing("native");
	let fallback = ScriptedTransport::failing("rest");
	let generator = AnswerGenerator::new(Some(primary.clone()), fallback.clone(), policy(3));

	generator.generate("What is 2+2?").await.expect_err("All attempts must fail.");

	assert_eq!(primary.calls(), 3);
	assert_eq!(fallback.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn blank_answers_count_as_failures() {
	let fallback = ScriptedTransport::new(
		"rest",
		vec![Ok(GenerationResponse::Unknown(serde_json::Value::Null)), text("   "), text("4")],
	);
	let generator = AnswerGenerator::new(None, fallback.clone(), policy(3));
	let answer = generator.generate("What is 2+2?").await.expect("Third attempt must succeed.");

	assert_eq!(answer, "4");
	assert_eq!(fallback.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn structured_responses_are_normalized() {
	let fallback = ScriptedTransport::new(
		"rest",
		vec![Ok(GenerationResponse::from_json(json!({
			"candidates": [{ "content": { "parts": [{ "text": "4" }] } }]
		})))],
	);
	let generator = AnswerGenerator::new(None, fallback, policy(1));

	assert_eq!(generator.generate("What is 2+2?").await.expect("Must succeed."), "4");
}
