//! Middleware pipeline contract — the signature the router drops into.
//!
//! The router is one stage of a larger request-handling pipeline. This module
//! defines that pipeline's types:
//!
//! - [`Middleware`] — trait implemented by every stage, including
//!   [`Router`](crate::router::Router) itself.
//! - [`Next`] — cursor into the remaining chain; the router hands the request
//!   to it when it declines to handle a path.
//! - [`MiddlewareHandler`] — type-erased, cheaply-cloneable stage function.
//! - [`from_middleware`] — converts a [`Middleware`] trait object into a
//!   [`MiddlewareHandler`].
//! - [`LoggerMiddleware`] — built-in request/response logger.
//!
//! Stages return `Result<Response, HandlerError>`: a failing handler aborts
//! the request's processing for this pipeline, and the error propagates to
//! whoever runs the chain.

use std::{future::Future, pin::Pin, sync::Arc};
use tokio::time::Instant;

use crate::handler::HandlerError;
use crate::http::{Request, Response, StatusCode};

/// A type-erased, reference-counted pipeline stage.
///
/// Every entry in the chain is stored as a `MiddlewareHandler`. The [`Arc`]
/// wrapper makes stages cheap to clone so [`Next`] can advance through the
/// chain without copying closures.
///
/// ```
/// use std::sync::Arc;
/// use junction::middleware::{MiddlewareHandler, Next};
/// use junction::http::Request;
///
/// let stage: MiddlewareHandler = Arc::new(|request: Request, next: Next| {
///     Box::pin(async move { next.run(request).await })
/// });
/// ```
pub type MiddlewareHandler = Arc<
    dyn Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, HandlerError>> + Send>>
        + Send
        + Sync
        + 'static,
>;

/// A cursor into the remaining pipeline for a single request.
///
/// `Next` is consumed by [`run`](Self::run), so a stage can delegate at most
/// once. When the chain is exhausted without any stage producing a response,
/// a `500 Internal Server Error` fallback is returned.
pub struct Next {
    stages: Vec<MiddlewareHandler>,
    // Which stage to invoke on the next `run` call.
    index: usize,
}

impl Next {
    /// Creates a `Next` positioned at the start of the given chain.
    pub fn new(stages: Vec<MiddlewareHandler>) -> Self {
        Self { stages, index: 0 }
    }

    /// Invokes the next stage in the chain and returns its result.
    ///
    /// Advances the internal cursor by one, clones the stage at the current
    /// position, and awaits it. An exhausted chain yields a `500` response.
    pub async fn run(mut self, request: Request) -> Result<Response, HandlerError> {
        if self.index < self.stages.len() {
            let stage = self.stages[self.index].clone();
            self.index += 1;
            stage(request, self).await
        } else {
            Ok(Response::new(StatusCode::InternalServerError)
                .body("No response generated by pipeline"))
        }
    }
}

/// A stage in the request-handling pipeline.
///
/// Implementors receive a [`Request`] and a [`Next`] cursor and may pass
/// through, short-circuit with their own response, or decorate the downstream
/// result. Implementations must be `Send + Sync` — the pipeline is shared
/// across Tokio tasks — and must return a pinned, `Send` future.
pub trait Middleware: Send + Sync {
    /// Handle the request and optionally delegate to the next stage.
    fn process(
        &self,
        request: Request,
        next: Next,
    ) -> Pin<Box<dyn Future<Output = Result<Response, HandlerError>> + Send>>;
}

/// Converts a [`Middleware`] implementation into a [`MiddlewareHandler`].
///
/// ```
/// use std::sync::Arc;
/// use junction::middleware::{LoggerMiddleware, from_middleware};
///
/// let stage = from_middleware(Arc::new(LoggerMiddleware));
/// ```
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |request: Request, next: Next| middleware.process(request, next))
}

/// Built-in middleware that logs each request's method, path, outcome, and
/// duration.
///
/// Emits one `tracing` record after the downstream stage completes: `info!`
/// with the response status on success, `warn!` with the error on failure.
/// It never short-circuits and returns the downstream result unmodified.
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    fn process(
        &self,
        request: Request,
        next: Next,
    ) -> Pin<Box<dyn Future<Output = Result<Response, HandlerError>> + Send>> {
        Box::pin(async move {
            let start = Instant::now();
            let method = request.method().as_str().to_owned();
            let path = request.path().to_owned();

            let result = next.run(request).await;

            let duration = start.elapsed();
            match &result {
                Ok(response) => {
                    tracing::info!(
                        "{} {} - {} ({:?})",
                        method,
                        path,
                        response.status().as_u16(),
                        duration
                    );
                }
                Err(error) => {
                    tracing::warn!("{} {} - failed: {} ({:?})", method, path, error, duration);
                }
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;

    fn terminal(status: StatusCode, body: &'static str) -> MiddlewareHandler {
        Arc::new(move |_request: Request, _next: Next| {
            Box::pin(async move { Ok(Response::new(status).body(body)) })
        })
    }

    #[tokio::test]
    async fn exhausted_chain_yields_500() {
        let next = Next::new(vec![]);
        let response = next.run(Request::new(Method::Get, "/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::InternalServerError);
    }

    #[tokio::test]
    async fn single_stage_runs() {
        let next = Next::new(vec![terminal(StatusCode::Ok, "done")]);
        let response = next.run(Request::new(Method::Get, "/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body_bytes(), b"done");
    }

    #[tokio::test]
    async fn stages_run_in_order() {
        // First stage decorates the downstream response.
        let decorate: MiddlewareHandler = Arc::new(|request: Request, next: Next| {
            Box::pin(async move {
                let response = next.run(request).await?;
                Ok(response.header("X-Decorated", "yes"))
            })
        });
        let next = Next::new(vec![decorate, terminal(StatusCode::Accepted, "inner")]);
        let response = next.run(Request::new(Method::Get, "/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::Accepted);
        assert_eq!(response.headers().get("x-decorated"), Some("yes"));
    }

    #[tokio::test]
    async fn short_circuit_skips_downstream() {
        let gate: MiddlewareHandler = Arc::new(|_request: Request, _next: Next| {
            Box::pin(async move { Ok(Response::new(StatusCode::Forbidden)) })
        });
        let next = Next::new(vec![gate, terminal(StatusCode::Ok, "unreachable")]);
        let response = next.run(Request::new(Method::Get, "/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::Forbidden);
    }

    #[tokio::test]
    async fn logger_passes_response_through() {
        let next = Next::new(vec![
            from_middleware(Arc::new(LoggerMiddleware)),
            terminal(StatusCode::Ok, "logged"),
        ]);
        let response = next.run(Request::new(Method::Get, "/log")).await.unwrap();
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body_bytes(), b"logged");
    }

    #[tokio::test]
    async fn logger_passes_error_through() {
        let failing: MiddlewareHandler = Arc::new(|_request: Request, _next: Next| {
            Box::pin(async move {
                Err(HandlerError::Execution {
                    handler: "test::Failing",
                    source: "boom".into(),
                })
            })
        });
        let next = Next::new(vec![from_middleware(Arc::new(LoggerMiddleware)), failing]);
        let result = next.run(Request::new(Method::Get, "/fail")).await;
        assert!(matches!(result, Err(HandlerError::Execution { .. })));
    }
}
