// Application layer - use cases and orchestration
// Request payloads are validated here before anything reaches storage.

pub mod error;
pub mod service;
pub mod validation;

pub use error::*;
pub use service::*;
pub use validation::*;
