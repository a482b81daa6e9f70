use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use qa_cache::{AnswerCache, BoxFuture, CacheStore, Error, ManualClock, MemoryStore, Result};

struct UnreachableStore {
	calls: AtomicUsize,
}
impl CacheStore for UnreachableStore {
	fn get<'a>(&'a self, _key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			Err(Error::Unavailable { message: "connection refused".to_string() })
		})
	}

	fn set<'a>(
		&'a self,
		_key: &'a str,
		_value: &'a str,
		_ttl: Duration,
	) -> BoxFuture<'a, Result<()>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			Err(Error::Unavailable { message: "connection refused".to_string() })
		})
	}
}

#[tokio::test]
async fn get_after_set_returns_value_until_ttl_elapses() {
	let store = Arc::new(MemoryStore::with_clock(128, ManualClock::new()));
	let cache = AnswerCache::new(store.clone(), "q:", Duration::from_secs(3_600));

	cache.set("Q1", "4").await;

	assert_eq!(cache.get("Q1").await.as_deref(), Some("4"));

	store.clock().advance(Duration::from_secs(3_599));

	assert_eq!(cache.get("Q1").await.as_deref(), Some("4"));

	store.clock().advance(Duration::from_secs(1));

	assert_eq!(cache.get("Q1").await, None);
}

#[tokio::test]
async fn set_overwrites_unconditionally() {
	let store = Arc::new(MemoryStore::with_clock(128, ManualClock::new()));
	let cache = AnswerCache::new(store, "q:", Duration::from_secs(60));

	cache.set("Q1", "first").await;
	cache.set("Q1", "second").await;

	assert_eq!(cache.get("Q1").await.as_deref(), Some("second"));
}

#[tokio::test]
async fn keys_are_prefixed_question_ids() {
	let store = Arc::new(MemoryStore::with_clock(128, ManualClock::new()));
	let cache = AnswerCache::new(store.clone(), "q:", Duration::from_secs(60));

	assert_eq!(cache.key("Q1"), "q:Q1");

	cache.set("Q1", "4").await;

	let raw = store.get("q:Q1").await.expect("Memory store never fails.");

	assert_eq!(raw.as_deref(), Some("4"));
}

#[tokio::test]
async fn unreachable_store_degrades_to_miss() {
	let store = Arc::new(UnreachableStore { calls: AtomicUsize::new(0) });
	let cache = AnswerCache::new(store.clone(), "q:", Duration::from_secs(60));

	cache.set("Q1", "4").await;

	assert_eq!(cache.get("Q1").await, None);
	assert_eq!(store.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn redis_backend_without_url_is_rejected() {
	let cfg = qa_config::Cache {
		backend: qa_config::CacheBackend::Redis,
		redis_url: None,
		..Default::default()
	};

	assert!(AnswerCache::from_config(&cfg).is_err());
}

#[test]
fn memory_backend_builds_from_config() {
	let cache = AnswerCache::from_config(&qa_config::Cache::default())
		.expect("Memory cache must build.");

	assert_eq!(cache.ttl(), Duration::from_secs(3_600));
	assert_eq!(cache.key("abc"), "q:abc");
}
