use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use qa_domain::ServedFrom;

#[derive(Debug, sqlx::FromRow)]
pub struct QaRecord {
	pub id: Uuid,
	pub question_id: String,
	pub title: String,
	pub question: String,
	pub best_answer: String,
	pub llm_answer: String,
	pub score: f32,
	pub times_seen: i32,
	pub first_seen: OffsetDateTime,
	pub last_seen: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct RequestLogEntry {
	pub log_id: Uuid,
	pub qa_id: Uuid,
	pub question_id: String,
	pub served_from: String,
	pub latency_ms: i64,
	pub response_length: i32,
	pub metadata: Value,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RequestMetric {
	pub served_from: String,
	pub latency_ms: i64,
}

/// Sub-scores stored with every log entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestMetadata {
	pub semantic: f64,
	pub rouge: f64,
}

#[derive(Debug)]
pub struct QaRecordUpsert<'a> {
	pub question_id: &'a str,
	pub title: &'a str,
	pub question: &'a str,
	pub best_answer: &'a str,
	pub llm_answer: &'a str,
	pub score: f64,
}

#[derive(Debug)]
pub struct RequestLogAppend<'a> {
	pub question_id: &'a str,
	pub served_from: ServedFrom,
	pub latency_ms: i64,
	pub response_length: i32,
	pub metadata: RequestMetadata,
}
