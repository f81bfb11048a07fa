//! The handler contract — the capability every routable unit provides.
//!
//! A [`Handler`] declares the exact URI path it answers to, is constructed
//! from exactly one incoming [`Request`], and produces one [`Response`]
//! before being discarded. The router stores handler *types* (as factories),
//! never instances; a fresh instance is created per request.
//!
//! Failures from either step are surfaced to the pipeline as a
//! [`HandlerError`] carrying the original cause. The router performs no
//! retries and never synthesizes an error response for a failing handler —
//! producing one is the job of a layer above this crate.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::http::{Request, Response};

/// A boxed error type for handler-author-facing failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The boxed future a handler's [`process`](Handler::process) returns.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send>>;

/// A request-handling unit routable by [`Router`](crate::router::Router).
///
/// Implementations are registered by type, so satisfying this trait is the
/// whole registration-time capability check: a type that does not implement
/// `Handler` cannot be registered at all.
///
/// # Contract
///
/// - [`uri_path`](Self::uri_path) is queried once at registration time, never
///   per request, and must return the same string on every call.
/// - [`from_request`](Self::from_request) takes exactly the incoming request;
///   no other mandatory construction input exists from the router's side.
/// - [`process`](Self::process) consumes the instance — a handler lives for
///   one request only.
///
/// # Examples
///
/// ```
/// use junction::handler::{BoxError, Handler, HandlerFuture};
/// use junction::http::{Request, Response, StatusCode};
///
/// struct Ping {
///     request: Request,
/// }
///
/// impl Handler for Ping {
///     fn uri_path() -> &'static str {
///         "/ping"
///     }
///
///     fn from_request(request: Request) -> Result<Self, BoxError> {
///         Ok(Self { request })
///     }
///
///     fn process(self) -> HandlerFuture {
///         Box::pin(async move {
///             let body = format!("pong for {}", self.request.path());
///             Ok(Response::new(StatusCode::Ok).body(body))
///         })
///     }
/// }
/// ```
pub trait Handler: Sized + Send + 'static {
    /// The exact path this handler answers to. No pattern syntax — matching
    /// is plain string equality.
    fn uri_path() -> &'static str;

    /// Constructs a handler instance bound to `request`.
    fn from_request(request: Request) -> Result<Self, BoxError>;

    /// Produces the response for the bound request, consuming the handler.
    fn process(self) -> HandlerFuture;
}

/// Errors surfaced by the router when a handler fails.
///
/// Both variants keep the handler's own failure as a `source`, so the full
/// cause chain is available via [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler's [`Handler::from_request`] constructor failed.
    #[error("failed to construct handler `{handler}`")]
    Instantiation {
        /// Type name of the failing handler.
        handler: &'static str,
        #[source]
        source: BoxError,
    },

    /// The handler's [`Handler::process`] call failed.
    #[error("handler `{handler}` failed while producing a response")]
    Execution {
        /// Type name of the failing handler.
        handler: &'static str,
        #[source]
        source: BoxError,
    },
}
