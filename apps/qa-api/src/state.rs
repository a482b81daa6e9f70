use std::sync::Arc;

use qa_service::QaService;
use qa_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<QaService>,
}
impl AppState {
	pub async fn new(config: qa_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = QaService::from_config(&config, db)?;

		tracing::info!(
			cache_backend = ?config.cache.backend,
			transport = ?config.generation.transport,
			model = %config.generation.model,
			"Query service ready."
		);

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: QaService) -> Self {
		Self { service: Arc::new(service) }
	}
}
