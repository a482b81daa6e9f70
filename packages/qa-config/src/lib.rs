mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Cache, CacheBackend, Config, Generation, Postgres, Scoring, Security, Service, Storage,
	TransportKind,
};

use std::{env, fs, path::Path};

const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.admin_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.ttl_seconds == 0 {
		return Err(Error::Validation {
			message: "cache.ttl_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.key_prefix.is_empty() {
		return Err(Error::Validation {
			message: "cache.key_prefix must be non-empty.".to_string(),
		});
	}

	match cfg.cache.backend {
		CacheBackend::Memory =>
			if cfg.cache.max_entries == 0 {
				return Err(Error::Validation {
					message: "cache.max_entries must be greater than zero.".to_string(),
				});
			},
		CacheBackend::Redis =>
			if cfg.cache.redis_url.is_none() {
				return Err(Error::Validation {
					message: "cache.redis_url is required when cache.backend is redis.".to_string(),
				});
			},
	}

	if cfg.generation.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "generation.model must be non-empty.".to_string(),
		});
	}
	if cfg.generation.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "generation.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.generation.retries == 0 {
		return Err(Error::Validation {
			message: "generation.retries must be greater than zero.".to_string(),
		});
	}
	if cfg.generation.backoff_base == 0 {
		return Err(Error::Validation {
			message: "generation.backoff_base must be greater than zero.".to_string(),
		});
	}
	if cfg.generation.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "generation.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.scoring.alpha.is_finite() {
		return Err(Error::Validation {
			message: "scoring.alpha must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.scoring.alpha) {
		return Err(Error::Validation {
			message: "scoring.alpha must be in the range 0.0-1.0.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.cache.redis_url.as_deref().map(|url| url.trim().is_empty()).unwrap_or(false) {
		cfg.cache.redis_url = None;
	}
	if cfg.generation.api_key.trim().is_empty() {
		cfg.generation.api_key = API_KEY_ENV_VARS
			.iter()
			.find_map(|name| env::var(name).ok().filter(|key| !key.trim().is_empty()))
			.unwrap_or_default();
	}

	cfg.generation.api_base = cfg.generation.api_base.trim_end_matches('/').to_string();
}
