//! Domain errors and their HTTP mapping.

use thiserror::Error;
use tracing::error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;
use crate::store::StoreError;

/// Everything a student endpoint can fail with.
///
/// The `Display` text is the `detail` sent to the client.
#[derive(Debug, Error)]
pub enum StudentError {
    #[error("Invalid ID format")]
    InvalidIdentifier,

    #[error("Student not found")]
    NotFound,

    #[error("No fields to update")]
    NoFieldsProvided,

    /// Body or query string that does not decode into the expected shape.
    #[error("{0}")]
    InvalidBody(String),

    /// Driver text is logged, never sent to the client.
    #[error("Internal Server Error")]
    StoreUnavailable(#[from] StoreError),
}

impl StudentError {
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidIdentifier | Self::NoFieldsProvided => Status::BadRequest,
            Self::NotFound => Status::NotFound,
            Self::InvalidBody(_) => Status::UnprocessableContent,
            Self::StoreUnavailable(_) => Status::InternalServerError,
        }
    }
}

impl From<serde_json::Error> for StudentError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidBody(e.to_string())
    }
}

impl IntoResponse for StudentError {
    fn into_response(self) -> Response {
        if let Self::StoreUnavailable(source) = &self {
            error!(error = %source, "store call failed");
        }
        Response::detail(self.status(), self.to_string())
    }
}
