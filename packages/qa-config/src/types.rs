use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub cache: Cache,
	pub generation: Generation,
	#[serde(default)]
	pub scoring: Scoring,
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
	Memory,
	Redis,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Cache {
	pub backend: CacheBackend,
	/// Required when `backend = "redis"`.
	pub redis_url: Option<String>,
	pub key_prefix: String,
	pub ttl_seconds: u64,
	/// Capacity of the in-process store. Ignored by Redis.
	pub max_entries: u64,
}
impl Default for Cache {
	fn default() -> Self {
		Self {
			backend: CacheBackend::Memory,
			redis_url: None,
			key_prefix: "q:".to_string(),
			ttl_seconds: 3_600,
			max_entries: 10_000,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
	/// Native client first, raw REST as fallback.
	Native,
	/// Raw REST only.
	Rest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Generation {
	pub transport: TransportKind,
	#[serde(default = "default_api_base")]
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	#[serde(default = "default_model")]
	pub model: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default = "default_retries")]
	pub retries: u32,
	#[serde(default = "default_backoff_base")]
	pub backoff_base: u32,
	#[serde(default = "default_backoff_unit_ms")]
	pub backoff_unit_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scoring {
	/// Weight of the semantic ratio in the combined score; the rest goes to ROUGE-L.
	pub alpha: f64,
}
impl Default for Scoring {
	fn default() -> Self {
		Self { alpha: 0.7 }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}

fn default_api_base() -> String {
	"https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
	"gemini-1.5-flash".to_string()
}

fn default_timeout_ms() -> u64 {
	30_000
}

fn default_retries() -> u32 {
	3
}

fn default_backoff_base() -> u32 {
	2
}

fn default_backoff_unit_ms() -> u64 {
	1_000
}
