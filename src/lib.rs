//! # student-directory
//!
//! A small HTTP service for create/read/update/delete over student records
//! kept in a document store.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | `POST` | `/students` | `201 {"id"}` |
//! | `GET` | `/students?country=&age=` | `200 {"data": [{name, age}]}` (at most 100, `age` is a lower bound) |
//! | `GET` | `/students/{id}` | `200 {name, age, address}` |
//! | `PATCH` | `/students/{id}` | `204` |
//! | `DELETE` | `/students/{id}` | `200 {"message"}` |
//!
//! Every failure answers `{"detail": "<message>"}`: `400` for a malformed id
//! or an empty patch, `404` for an unknown id, `422` for an undecodable body,
//! `500` when the store fails.
//!
//! ## Layout
//!
//! The HTTP layer ([`Router`], [`Server`], [`Request`], [`Response`]) is a thin
//! wrapper over hyper and matchit. [`students`] holds the model and
//! handlers, [`store`] the persistence trait and its MongoDB and in-memory
//! implementations, and [`app::router`] wires them together.
//!
//! ```rust,no_run
//! use student_directory::{Server, app, store::MemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = app::router(MemoryStore::new());
//!     Server::bind("127.0.0.1:8000".parse().unwrap())
//!         .serve(router)
//!         .await
//!         .unwrap();
//! }
//! ```

mod error;
mod handler;
mod method;
mod middleware;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod config;
pub mod health;
pub mod store;
pub mod students;
pub mod telemetry;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::{Server, serve_with_shutdown};
pub use status::Status;
