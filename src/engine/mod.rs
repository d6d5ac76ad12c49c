mod engine;
mod error;

pub use engine::{LinkEngine, LinkEngineBuilder};
pub use error::{ErrorKind, LinkError, LinkResult};
