//! Unified error type.

use crate::validate::ValidationError;

/// The error type returned by sieve's fallible operations.
///
/// Application-level failures (404, 400, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// startup and infrastructure failures: reading configuration, building the
/// route table or a schema, binding a port.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: missing required key `{0}`")]
    Config(&'static str),

    #[error("cannot listen on `{addr}`: {source}")]
    Address {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid route pattern `{pattern}`: {source}")]
    RoutePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("schema: {0}")]
    Schema(#[from] ValidationError),
}
