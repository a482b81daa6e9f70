//! Cache-aside request orchestration over the cache, generator, scorer and persistence layers.

pub mod metrics;
pub mod query;

mod error;

pub use error::{Error, Result};
pub use metrics::{MetricsSummary, RequestMetricsResponse};
pub use query::{QueryRequest, QueryResponse};

use std::sync::Arc;

use uuid::Uuid;

use qa_cache::AnswerCache;
use qa_providers::AnswerGenerator;
use qa_storage::{
	db::Db,
	models::{QaRecordUpsert, RequestLogAppend, RequestMetric},
	queries,
};

pub use qa_providers::BoxFuture;

/// Produces answer text for a prompt, retries included.
pub trait AnswerSource
where
	Self: Send + Sync,
{
	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, qa_providers::Result<String>>;
}

/// Durable side of a served query.
pub trait QaStore
where
	Self: Send + Sync,
{
	/// Upserts the QA record and appends its log entry atomically. Returns `(qa_id, log_id)`.
	fn record_served_answer<'a>(
		&'a self,
		record: &'a QaRecordUpsert<'a>,
		log: &'a RequestLogAppend<'a>,
	) -> BoxFuture<'a, qa_storage::Result<(Uuid, Uuid)>>;

	fn request_metrics<'a>(&'a self) -> BoxFuture<'a, qa_storage::Result<Vec<RequestMetric>>>;
}

#[derive(Clone)]
pub struct QaService {
	pub alpha: f64,
	pub cache: AnswerCache,
	pub generator: Arc<dyn AnswerSource>,
	pub store: Arc<dyn QaStore>,
}
impl QaService {
	pub fn new(
		scoring: &qa_config::Scoring,
		cache: AnswerCache,
		generator: Arc<dyn AnswerSource>,
		store: Arc<dyn QaStore>,
	) -> Self {
		Self { alpha: scoring.alpha, cache, generator, store }
	}

	/// Wires the production cache, generator and database from configuration.
	pub fn from_config(cfg: &qa_config::Config, db: Db) -> Result<Self> {
		let cache = AnswerCache::from_config(&cfg.cache)
			.map_err(|err| Error::Internal { message: err.to_string() })?;
		let generator = AnswerGenerator::from_config(&cfg.generation)?;

		Ok(Self::new(&cfg.scoring, cache, Arc::new(generator), Arc::new(db)))
	}
}

impl AnswerSource for AnswerGenerator {
	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, qa_providers::Result<String>> {
		Box::pin(AnswerGenerator::generate(self, prompt))
	}
}

impl QaStore for Db {
	fn record_served_answer<'a>(
		&'a self,
		record: &'a QaRecordUpsert<'a>,
		log: &'a RequestLogAppend<'a>,
	) -> BoxFuture<'a, qa_storage::Result<(Uuid, Uuid)>> {
		Box::pin(queries::record_served_answer(self, record, log))
	}

	fn request_metrics<'a>(&'a self) -> BoxFuture<'a, qa_storage::Result<Vec<RequestMetric>>> {
		Box::pin(queries::request_metrics(self))
	}
}
