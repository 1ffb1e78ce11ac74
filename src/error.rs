//! Infrastructure error type.

use thiserror::Error;

/// Errors surfaced by the server itself.
///
/// Application-level outcomes (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type covers
/// binding to a port and the listener failing underneath the accept loop.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
