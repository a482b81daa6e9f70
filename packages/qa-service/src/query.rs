use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

use crate::{Error, QaService, Result};
use qa_domain::{ServedFrom, combined_score};
use qa_storage::models::{QaRecordUpsert, RequestLogAppend, RequestMetadata};

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
	pub question_id: String,
	#[serde(default)]
	pub title: Option<String>,
	pub question: String,
	#[serde(default)]
	pub best_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
	pub qa_id: Uuid,
	pub served_from: ServedFrom,
	pub latency_ms: u64,
	pub score: f64,
}

impl QaService {
	/// Serves one query cache-aside and records it.
	///
	/// The work runs on its own task, so a caller that goes away does not cancel an in-flight
	/// generation; its answer is still cached and persisted.
	pub async fn handle_query(&self, req: QueryRequest) -> Result<QueryResponse> {
		validate(&req)?;

		let service = self.clone();

		tokio::spawn(async move { service.serve(req).await }).await?
	}

	async fn serve(&self, req: QueryRequest) -> Result<QueryResponse> {
		let started = Instant::now();
		// A blank cached value is a miss.
		let (answer, served_from) = match self.cache.get(&req.question_id).await {
			Some(answer) if !answer.trim().is_empty() => (answer, ServedFrom::Cache),
			_ => {
				let answer = self.generator.generate(&req.question).await?;

				self.cache.set(&req.question_id, &answer).await;

				(answer, ServedFrom::Llm)
			},
		};
		let latency_ms = started.elapsed().as_millis() as u64;
		let best_answer = req.best_answer.as_deref().unwrap_or_default();
		let score = combined_score(&answer, best_answer, self.alpha);
		let record = QaRecordUpsert {
			question_id: &req.question_id,
			title: req.title.as_deref().unwrap_or_default(),
			question: &req.question,
			best_answer,
			llm_answer: &answer,
			score: score.combined,
		};
		let log = RequestLogAppend {
			question_id: &req.question_id,
			served_from,
			latency_ms: i64::try_from(latency_ms).unwrap_or(i64::MAX),
			response_length: i32::try_from(answer.chars().count()).unwrap_or(i32::MAX),
			metadata: RequestMetadata { semantic: score.semantic, rouge: score.rouge },
		};
		let (qa_id, _) = self.store.record_served_answer(&record, &log).await?;

		tracing::info!(
			question_id = %req.question_id,
			%served_from,
			latency_ms,
			score = score.combined,
			"Query served."
		);

		Ok(QueryResponse { qa_id, served_from, latency_ms, score: score.combined })
	}
}

fn validate(req: &QueryRequest) -> Result<()> {
	if req.question_id.trim().is_empty() {
		return Err(Error::invalid_field("question_id", "question_id must be non-empty."));
	}

	if req.question.trim().is_empty() {
		return Err(Error::invalid_field("question", "question must be non-empty."));
	}

	Ok(())
}
