pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String, fields: Vec<String> },
	#[error("Generation unavailable: {message}")]
	GenerationUnavailable { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}
impl Error {
	pub(crate) fn invalid_field(field: &str, message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into(), fields: vec![field.to_string()] }
	}
}

impl From<qa_providers::Error> for Error {
	fn from(err: qa_providers::Error) -> Self {
		match err {
			qa_providers::Error::InvalidConfig { message } => Self::Internal { message },
			err => Self::GenerationUnavailable { message: err.to_string() },
		}
	}
}

impl From<qa_storage::Error> for Error {
	fn from(err: qa_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<tokio::task::JoinError> for Error {
	fn from(err: tokio::task::JoinError) -> Self {
		Self::Internal { message: format!("Query task failed: {err}") }
	}
}
