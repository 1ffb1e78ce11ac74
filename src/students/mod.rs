//! Student records: data model, identifiers, errors, and HTTP handlers.

mod error;
mod handlers;
mod id;
mod model;

pub use error::StudentError;
pub use handlers::{LIST_LIMIT, create, delete, get, list, update};
pub use id::StudentId;
pub use model::{
    Address, Created, Message, Student, StudentFilter, StudentList, StudentPatch, StudentSummary,
};
