use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result as MiddlewareResult};
use std::time::Instant;
use tracing::{debug, warn};

/// Logs every outgoing GitHub request with its status and latency.
///
/// Only the method and URL are logged; headers carry the token.
pub struct TracingMiddleware;

#[async_trait::async_trait]
impl Middleware for TracingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> MiddlewareResult<Response> {
        let method = req.method().clone();
        let url = req.url().clone();
        let started = Instant::now();

        let response = next.run(req, extensions).await;
        let elapsed_ms = started.elapsed().as_millis();

        match &response {
            Ok(resp) => debug!(
                "{} {} -> {} ({} ms)",
                method,
                url,
                resp.status(),
                elapsed_ms
            ),
            Err(err) => warn!("{} {} failed after {} ms: {}", method, url, elapsed_ms, err),
        }

        response
    }
}
