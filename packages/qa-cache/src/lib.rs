pub mod memory;
pub mod redis_store;

mod error;

pub use error::{Error, Result};
pub use memory::{Clock, ManualClock, MemoryStore, SystemClock};
pub use redis_store::RedisStore;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use qa_config::CacheBackend;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Raw key/value store with per-entry expiry.
pub trait CacheStore
where
	Self: Send + Sync,
{
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>>;

	/// Overwrites any existing value for `key`.
	fn set<'a>(
		&'a self,
		key: &'a str,
		value: &'a str,
		ttl: Duration,
	) -> BoxFuture<'a, Result<()>>;
}

/// Cache-aside view over a [`CacheStore`], keyed by question id.
///
/// Store failures never escape: reads degrade to a miss and writes are dropped, both with a
/// warning.
#[derive(Clone)]
pub struct AnswerCache {
	store: Arc<dyn CacheStore>,
	key_prefix: String,
	ttl: Duration,
}
impl AnswerCache {
	pub fn new(store: Arc<dyn CacheStore>, key_prefix: impl Into<String>, ttl: Duration) -> Self {
		Self { store, key_prefix: key_prefix.into(), ttl }
	}

	pub fn from_config(cfg: &qa_config::Cache) -> Result<Self> {
		let store: Arc<dyn CacheStore> = match (cfg.backend, cfg.redis_url.as_deref()) {
			(CacheBackend::Memory, _) => Arc::new(MemoryStore::new(cfg.max_entries)),
			(CacheBackend::Redis, Some(url)) => Arc::new(RedisStore::new(url)?),
			(CacheBackend::Redis, None) => {
				return Err(Error::Unavailable {
					message: "Redis URL is not configured.".to_string(),
				});
			},
		};

		Ok(Self::new(store, cfg.key_prefix.as_str(), Duration::from_secs(cfg.ttl_seconds)))
	}

	pub fn key(&self, question_id: &str) -> String {
		format!("{}{question_id}", self.key_prefix)
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	pub async fn get(&self, question_id: &str) -> Option<String> {
		let key = self.key(question_id);

		match self.store.get(&key).await {
			Ok(value) => value,
			Err(err) => {
				tracing::warn!(error = %err, %key, "Cache read failed. Treating as a miss.");

				None
			},
		}
	}

	pub async fn set(&self, question_id: &str, answer: &str) {
		self.set_with_ttl(question_id, answer, self.ttl).await;
	}

	pub async fn set_with_ttl(&self, question_id: &str, answer: &str, ttl: Duration) {
		let key = self.key(question_id);

		if let Err(err) = self.store.set(&key, answer, ttl).await {
			tracing::warn!(error = %err, %key, "Cache write failed. Continuing without cache.");
		}
	}
}
