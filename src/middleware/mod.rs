//! Middleware layer.
//!
//! Cross-cutting concerns that wrap every dispatched request. Currently one:
//! [`trace`], a per-request span with method, path, status, and latency.

pub(crate) mod trace;
