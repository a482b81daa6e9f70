use sqlx::{Executor, Postgres, Transaction};
use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{QaRecord, QaRecordUpsert, RequestLogAppend, RequestLogEntry, RequestMetric},
};

/// Upserts the canonical record and appends its log entry in one transaction, so a log entry is
/// never visible without the record it references. Returns `(qa_id, log_id)`.
pub async fn record_served_answer(
	db: &Db,
	record: &QaRecordUpsert<'_>,
	log: &RequestLogAppend<'_>,
) -> Result<(Uuid, Uuid)> {
	let mut tx = db.pool.begin().await?;
	let qa_id = upsert_qa_record_tx(&mut tx, record).await?;
	let log_id = append_request_log_tx(&mut tx, qa_id, log).await?;

	tx.commit().await?;

	Ok((qa_id, log_id))
}

pub async fn upsert_qa_record(db: &Db, record: &QaRecordUpsert<'_>) -> Result<Uuid> {
	upsert_qa_record_exec(&db.pool, record).await
}

pub async fn upsert_qa_record_tx(
	tx: &mut Transaction<'_, Postgres>,
	record: &QaRecordUpsert<'_>,
) -> Result<Uuid> {
	upsert_qa_record_exec(&mut **tx, record).await
}

/// Append-only: nothing in this crate updates or deletes log entries.
pub async fn append_request_log(
	db: &Db,
	qa_id: Uuid,
	log: &RequestLogAppend<'_>,
) -> Result<Uuid> {
	append_request_log_exec(&db.pool, qa_id, log).await
}

pub async fn append_request_log_tx(
	tx: &mut Transaction<'_, Postgres>,
	qa_id: Uuid,
	log: &RequestLogAppend<'_>,
) -> Result<Uuid> {
	append_request_log_exec(&mut **tx, qa_id, log).await
}

pub async fn get_qa_record(db: &Db, question_id: &str) -> Result<Option<QaRecord>> {
	let record = sqlx::query_as::<_, QaRecord>(
		"\
SELECT
	id,
	question_id,
	title,
	question,
	best_answer,
	llm_answer,
	score,
	times_seen,
	first_seen,
	last_seen
FROM qa_records
WHERE question_id = $1",
	)
	.bind(question_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(record)
}

pub async fn list_request_logs(db: &Db, qa_id: Uuid) -> Result<Vec<RequestLogEntry>> {
	let entries = sqlx::query_as::<_, RequestLogEntry>(
		"\
SELECT
	log_id,
	qa_id,
	question_id,
	served_from,
	latency_ms,
	response_length,
	metadata,
	created_at
FROM request_logs
WHERE qa_id = $1
ORDER BY created_at ASC, log_id ASC",
	)
	.bind(qa_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(entries)
}

/// The `(served_from, latency_ms)` extract consumed by offline analysis.
pub async fn request_metrics(db: &Db) -> Result<Vec<RequestMetric>> {
	let rows = sqlx::query_as::<_, RequestMetric>(
		"SELECT served_from, latency_ms FROM request_logs ORDER BY created_at ASC, log_id ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

async fn upsert_qa_record_exec<'e, E>(executor: E, record: &QaRecordUpsert<'_>) -> Result<Uuid>
where
	E: Executor<'e, Database = Postgres>,
{
	if record.llm_answer.trim().is_empty() {
		return Err(Error::InvalidArgument("llm_answer must be non-empty.".to_string()));
	}

	let qa_id: Uuid = sqlx::query_scalar(
		"\
INSERT INTO qa_records (
	id,
	question_id,
	title,
	question,
	best_answer,
	llm_answer,
	score,
	times_seen,
	first_seen,
	last_seen
)
VALUES ($1, $2, $3, $4, $5, $6, $7, 1, now(), now())
ON CONFLICT (question_id) DO UPDATE
SET
	llm_answer = EXCLUDED.llm_answer,
	score = EXCLUDED.score,
	times_seen = qa_records.times_seen + 1,
	last_seen = GREATEST(qa_records.last_seen, now())
RETURNING id",
	)
	.bind(Uuid::new_v4())
	.bind(record.question_id)
	.bind(record.title)
	.bind(record.question)
	.bind(record.best_answer)
	.bind(record.llm_answer)
	.bind(record.score as f32)
	.fetch_one(executor)
	.await?;

	Ok(qa_id)
}

async fn append_request_log_exec<'e, E>(
	executor: E,
	qa_id: Uuid,
	log: &RequestLogAppend<'_>,
) -> Result<Uuid>
where
	E: Executor<'e, Database = Postgres>,
{
	let log_id = Uuid::new_v4();
	let metadata = serde_json::to_value(log.metadata)?;

	sqlx::query(
		"\
INSERT INTO request_logs (
	log_id,
	qa_id,
	question_id,
	served_from,
	latency_ms,
	response_length,
	metadata
)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(log_id)
	.bind(qa_id)
	.bind(log.question_id)
	.bind(log.served_from.as_str())
	.bind(log.latency_ms)
	.bind(log.response_length)
	.bind(metadata)
	.execute(executor)
	.await?;

	Ok(log_id)
}
