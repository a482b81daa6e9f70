use std::{future::Future, time::Duration};

use redis::{AsyncCommands, Client, RedisResult, aio::ConnectionManager};
use tokio::{sync::Mutex, time};

use crate::{BoxFuture, CacheStore, Error, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis-backed store. The connection is opened lazily and re-attempted on the next call after a
/// failed connect, so an unreachable server only degrades individual operations.
///
/// Every command runs under a deadline; a server that stops replying surfaces as
/// [`Error::Unavailable`] and the connection is reopened on the next call.
pub struct RedisStore {
	client: Client,
	conn: Mutex<Option<ConnectionManager>>,
	connect_timeout: Duration,
	command_timeout: Duration,
}
impl RedisStore {
	pub fn new(url: &str) -> Result<Self> {
		Self::with_timeouts(url, CONNECT_TIMEOUT, COMMAND_TIMEOUT)
	}

	pub fn with_timeouts(
		url: &str,
		connect_timeout: Duration,
		command_timeout: Duration,
	) -> Result<Self> {
		let client = Client::open(url)?;

		Ok(Self { client, conn: Mutex::new(None), connect_timeout, command_timeout })
	}

	async fn connection(&self) -> Result<ConnectionManager> {
		let mut slot = self.conn.lock().await;

		if let Some(conn) = slot.as_ref() {
			return Ok(conn.clone());
		}

		let conn = time::timeout(self.connect_timeout, self.client.get_connection_manager())
			.await
			.map_err(|_| Error::Unavailable { message: "Redis connect timed out.".to_string() })??;

		*slot = Some(conn.clone());

		Ok(conn)
	}

	async fn within_deadline<T, F>(&self, command: F) -> Result<T>
	where
		F: Future<Output = RedisResult<T>>,
	{
		match time::timeout(self.command_timeout, command).await {
			Ok(result) => Ok(result?),
			Err(_) => {
				self.conn.lock().await.take();

				Err(Error::Unavailable { message: "Redis command timed out.".to_string() })
			},
		}
	}
}
impl CacheStore for RedisStore {
	fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
		Box::pin(async move {
			let mut conn = self.connection().await?;
			let value: Option<String> = self.within_deadline(conn.get(key)).await?;

			Ok(value)
		})
	}

	fn set<'a>(
		&'a self,
		key: &'a str,
		value: &'a str,
		ttl: Duration,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut conn = self.connection().await?;
			let _: () =
				self.within_deadline(conn.set_ex(key, value, ttl.as_secs().max(1))).await?;

			Ok(())
		})
	}
}
