//! In-process store backed by a bounded moka cache.
//!
//! Expiry is tracked twice: moka evicts entries on its own timer, and every read also checks the
//! entry deadline against an injectable [`Clock`] so tests can move time forward.

use std::{
	sync::Mutex,
	time::{Duration, Instant},
};

use moka::{Expiry, sync::Cache};

use crate::{BoxFuture, CacheStore, Result};

pub trait Clock
where
	Self: Send + Sync,
{
	/// Time elapsed since an arbitrary fixed origin.
	fn now(&self) -> Duration;
}

pub struct SystemClock {
	origin: Instant,
}
impl SystemClock {
	pub fn new() -> Self {
		Self { origin: Instant::now() }
	}
}
impl Default for SystemClock {
	fn default() -> Self {
		Self::new()
	}
}
impl Clock for SystemClock {
	fn now(&self) -> Duration {
		self.origin.elapsed()
	}
}

#[derive(Default)]
pub struct ManualClock {
	now: Mutex<Duration>,
}
impl ManualClock {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn advance(&self, by: Duration) {
		let mut now = self.now.lock().unwrap_or_else(|err| err.into_inner());

		*now += by;
	}
}
impl Clock for ManualClock {
	fn now(&self) -> Duration {
		*self.now.lock().unwrap_or_else(|err| err.into_inner())
	}
}

#[derive(Clone)]
struct Entry {
	value: String,
	ttl: Duration,
	expires_at: Duration,
}

struct EntryExpiry;
impl Expiry<String, Entry> for EntryExpiry {
	fn expire_after_create(
		&self,
		_key: &String,
		value: &Entry,
		_created_at: Instant,
	) -> Option<Duration> {
		Some(value.ttl)
	}

	fn expire_after_update(
		&self,
		_key: &String,
		value: &Entry,
		_updated_at: Instant,
		_duration_until_expiry: Option<Duration>,
	) -> Option<Duration> {
		Some(value.ttl)
	}
}

pub struct MemoryStore<C = SystemClock> {
	entries: Cache<String, Entry>,
	clock: C,
}
impl MemoryStore<SystemClock> {
	pub fn new(max_entries: u64) -> Self {
		Self::with_clock(max_entries, SystemClock::new())
	}
}
impl<C> MemoryStore<C>
where
	C: Clock,
{
	pub fn with_clock(max_entries: u64, clock: C) -> Self {
		let entries = Cache::builder().max_capacity(max_entries).expire_after(EntryExpiry).build();

		Self { entries, clock }
	}

	pub fn clock(&self) -> &C {
		&self.clock
	}

	fn lookup(&self, key: &str) -> Option<String> {
		let entry = self.entries.get(key)?;

		if self.clock.now() >= entry.expires_at {
			self.entries.invalidate(key);

			return None;
		}

		Some(entry.value)
	}

	fn store(&self, key: &str, value: &str, ttl: Duration) {
		let entry =
			Entry { value: value.to_string(), ttl, expires_at: self.clock.now().saturating_add(ttl) };

		self.entries.insert(key.to_string(), entry);
	}
}
impl<C> CacheStore for MemoryStore<C>
where
	C: Clock,
{
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
		let value = self.lookup(key);

		Box::pin(async move { Ok(value) })
	}

	fn set<'a>(
		&'a self,
		key: &'a str,
		value: &'a str,
		ttl: Duration,
	) -> BoxFuture<'a, Result<()>> {
		self.store(key, value, ttl);

		Box::pin(async move { Ok(()) })
	}
}
