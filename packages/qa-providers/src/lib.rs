pub mod generator;
pub mod native;
pub mod response;
pub mod rest;

mod error;

pub use error::{Error, Result};
pub use generator::{AnswerGenerator, RetryPolicy};
pub use native::NativeTransport;
pub use response::GenerationResponse;
pub use rest::RestTransport;

use std::{future::Future, pin::Pin};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One way of reaching the generation service. A call is a single attempt with no retry.
pub trait GenerationTransport
where
	Self: Send + Sync,
{
	fn name(&self) -> &'static str;

	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<GenerationResponse>>;
}
