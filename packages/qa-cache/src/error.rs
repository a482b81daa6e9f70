pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cache unavailable: {message}")]
	Unavailable { message: String },
}
impl From<redis::RedisError> for Error {
	fn from(err: redis::RedisError) -> Self {
		Self::Unavailable { message: err.to_string() }
	}
}
