pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{transport} transport failed: {message}")]
	Transport { transport: &'static str, message: String },
	#[error("Generation failed after {attempts} attempts. Last error: {last}")]
	GenerationExhausted { attempts: u32, last: Box<Error> },
	#[error("{message}")]
	InvalidConfig { message: String },
}
impl Error {
	pub fn transport(transport: &'static str, message: impl Into<String>) -> Self {
		Self::Transport { transport, message: message.into() }
	}
}
