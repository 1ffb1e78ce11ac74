//! Kubernetes health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the store be reached? Failure → pulled from load-balancer. |

use tracing::warn;

use crate::app::AppState;
use crate::store::StudentStore;
use crate::{Request, Response, Status};

/// Liveness probe. Always `200 ok`; it deliberately ignores the store.
pub async fn liveness<S: StudentStore>(_req: Request, _state: AppState<S>) -> Response {
    Response::text("ok")
}

/// Readiness probe. `200 ready` when the store answers a ping, `503` otherwise.
pub async fn readiness<S: StudentStore>(_req: Request, state: AppState<S>) -> Response {
    match state.store.ping().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!(error = %e, "readiness ping failed");
            Response::detail(Status::ServiceUnavailable, "Store unavailable")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::request::test_request;
    use crate::store::{DownStore, MemoryStore};

    #[tokio::test]
    async fn probes_answer_when_store_is_up() {
        let state = AppState::new(MemoryStore::new());
        let live = liveness(test_request(Method::Get, "/healthz", None, ""), state.clone()).await;
        let ready = readiness(test_request(Method::Get, "/readyz", None, ""), state).await;
        assert_eq!(live.body(), b"ok");
        assert_eq!(ready.status_code(), 200);
        assert_eq!(ready.body(), b"ready");
    }

    #[tokio::test]
    async fn readiness_is_503_when_store_is_down() {
        let state = AppState::new(DownStore);
        let ready = readiness(test_request(Method::Get, "/readyz", None, ""), state).await;
        assert_eq!(ready.status_code(), 503);
    }
}
