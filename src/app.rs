//! Router wiring and the state every handler receives.

use std::sync::Arc;

use crate::health;
use crate::router::Router;
use crate::store::StudentStore;
use crate::students;

/// Shared per-process state: the store client, created once at startup.
pub struct AppState<S> {
    pub store: Arc<S>,
}

impl<S> AppState<S> {
    pub fn new(store: S) -> Self {
        Self { store: Arc::new(store) }
    }
}

// Manual impl: cloning the `Arc` must not require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

/// Builds the full route table over `store`.
///
/// ```rust
/// use student_directory::{app, store::MemoryStore};
///
/// let router = app::router(MemoryStore::new());
/// ```
pub fn router<S: StudentStore>(store: S) -> Router<AppState<S>> {
    Router::with_state(AppState::new(store))
        .post("/students",          students::create::<S>)
        .get("/students",           students::list::<S>)
        .get("/students/{id}",      students::get::<S>)
        .patch("/students/{id}",    students::update::<S>)
        .delete("/students/{id}",   students::delete::<S>)
        .get("/healthz",            health::liveness::<S>)
        .get("/readyz",             health::readiness::<S>)
}
