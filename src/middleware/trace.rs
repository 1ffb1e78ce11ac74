//! Per-request tracing.

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, info, info_span, warn};

use crate::method::Method;
use crate::response::Response;

/// Runs `fut` inside a `request` span and logs its outcome.
///
/// 5xx responses are logged at `warn`; everything else at `info`.
pub(crate) async fn instrument<F>(method: Method, path: &str, fut: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("request", %method, path);
    let started = Instant::now();
    let response = fut.instrument(span.clone()).await;
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
    let status = response.status_code();

    let _guard = span.enter();
    if status >= 500 {
        warn!(status, latency_ms, "request failed");
    } else {
        info!(status, latency_ms, "request completed");
    }
    response
}
