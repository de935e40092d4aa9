//! Tower middleware for the default transport.
//!
//! Layers wrap the [`HyperClient`](crate::HyperClient) service stack through
//! [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer):
//!
//! - [`LoggingLayer`] - Logs requests and responses using `tracing`
//!
//! Any other `tower` layer over [`Request`](crate::Request) and
//! [`Response`](crate::Response) composes the same way.

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
