use serde::Serialize;

use crate::{QaService, Result};
use qa_domain::ServedFrom;
use qa_storage::models::RequestMetric;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSummary {
	pub total: u64,
	pub hits: u64,
	pub misses: u64,
	/// `hits / total`, or `0.0` with no requests.
	pub hit_rate: f64,
}
impl MetricsSummary {
	pub fn from_rows(rows: &[RequestMetric]) -> Self {
		let hits = rows
			.iter()
			.filter(|row| ServedFrom::parse(&row.served_from) == Some(ServedFrom::Cache))
			.count() as u64;
		let total = rows.len() as u64;
		let hit_rate = if total == 0 { 0.0 } else { hits as f64 / total as f64 };

		Self { total, hits, misses: total - hits, hit_rate }
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestMetricsResponse {
	pub rows: Vec<RequestMetric>,
	pub summary: MetricsSummary,
}

impl QaService {
	/// The `(served_from, latency_ms)` extract with a hit/miss summary.
	pub async fn request_metrics(&self) -> Result<RequestMetricsResponse> {
		let rows = self.store.request_metrics().await?;
		let summary = MetricsSummary::from_rows(&rows);

		Ok(RequestMetricsResponse { rows, summary })
	}
}
