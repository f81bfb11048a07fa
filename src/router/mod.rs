//! Path-to-handler routing — the crate's single piece of real logic.
//!
//! [`Router`] holds a table mapping exact path strings to handler factories.
//! On each request it looks the path up, constructs the matched
//! [`Handler`] from the request, runs it, and returns its response. When no
//! route matches it falls back, in order of configuration: designated
//! not-found handler, canonical not-found response, or delegation to the next
//! pipeline stage.
//!
//! Matching is plain string equality. No trailing-slash normalization,
//! case-folding, or query-string stripping happens here — the request
//! abstraction supplies the canonical path.
//!
//! Registration is a setup phase: populate the table before serving traffic,
//! then share the router freely (`process` takes `&self` and the table is
//! never mutated by dispatch).
//!
//! # Examples
//!
//! ```
//! use junction::handler::{BoxError, Handler, HandlerFuture};
//! use junction::http::{Method, Request, Response, StatusCode};
//! use junction::middleware::Next;
//! use junction::router::Router;
//!
//! struct Hello {
//!     request: Request,
//! }
//!
//! impl Handler for Hello {
//!     fn uri_path() -> &'static str {
//!         "/hello"
//!     }
//!
//!     fn from_request(request: Request) -> Result<Self, BoxError> {
//!         Ok(Self { request })
//!     }
//!
//!     fn process(self) -> HandlerFuture {
//!         Box::pin(async move { Ok(Response::new(StatusCode::Ok).body("Hello, World!")) })
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new(true);
//! router.register::<Hello>();
//!
//! let request = Request::new(Method::Get, "/hello");
//! let response = router.process(request, Next::new(vec![])).await?;
//! assert_eq!(response.status(), StatusCode::Ok);
//! # Ok(())
//! # }
//! ```

use std::any;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::handler::{Handler, HandlerError};
use crate::http::{Request, Response};
use crate::middleware::{Middleware, Next};

// Type-erased handler factory: builds a fresh handler instance from the
// request and runs it, folding both failure modes into `HandlerError`.
type RouteEntry = Arc<
    dyn Fn(Request) -> Pin<Box<dyn Future<Output = Result<Response, HandlerError>> + Send>>
        + Send
        + Sync
        + 'static,
>;

// Erase a concrete `Handler` type into a `RouteEntry`.
fn route_entry<H: Handler>() -> RouteEntry {
    Arc::new(|request: Request| {
        Box::pin(async move {
            let handler =
                H::from_request(request).map_err(|source| HandlerError::Instantiation {
                    handler: any::type_name::<H>(),
                    source,
                })?;
            handler
                .process()
                .await
                .map_err(|source| HandlerError::Execution {
                    handler: any::type_name::<H>(),
                    source,
                })
        })
    })
}

/// Routes requests to registered [`Handler`] types by exact path match.
///
/// Cloning is cheap (the table holds `Arc`'d factories), and the router
/// implements [`Middleware`] so it drops straight into a pipeline chain.
#[derive(Clone)]
pub struct Router {
    routes: HashMap<String, RouteEntry>,
    not_found: Option<RouteEntry>,
    send_not_found: bool,
}

impl Router {
    /// Creates an empty router.
    ///
    /// `send_not_found` controls what happens when no route matches and no
    /// not-found handler is configured: `true` returns the canonical
    /// [`Response::not_found`]; `false` delegates to the next pipeline stage.
    /// The flag is fixed for the router's lifetime.
    pub fn new(send_not_found: bool) -> Self {
        Self {
            routes: HashMap::new(),
            not_found: None,
            send_not_found,
        }
    }

    /// Registers `H` under its declared [`uri_path`](Handler::uri_path).
    ///
    /// Stores a factory, not an instance — a fresh `H` is constructed per
    /// matched request. Registering a second handler for the same path
    /// silently replaces the first (last registration wins).
    pub fn register<H: Handler>(&mut self) {
        let path = H::uri_path();
        debug!(path, handler = any::type_name::<H>(), "route registered");
        self.routes.insert(path.to_owned(), route_entry::<H>());
    }

    /// Designates `H` as the not-found handler, dispatched when no route
    /// matches (and [`send_not_found`](Self::new) is enabled).
    ///
    /// With `map_path` set, `H` is also registered into the route table under
    /// its own declared path, making it directly addressable as well as the
    /// fallback.
    pub fn set_not_found<H: Handler>(&mut self, map_path: bool) {
        debug!(
            handler = any::type_name::<H>(),
            map_path, "not-found handler set"
        );
        self.not_found = Some(route_entry::<H>());
        if map_path {
            self.routes
                .insert(H::uri_path().to_owned(), route_entry::<H>());
        }
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes have been registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatches `request` and returns the produced response.
    ///
    /// The decision tree, evaluated per call with no state carried across
    /// calls:
    ///
    /// 1. Exact path hit → construct the matched handler from the request,
    ///    run it, return its result.
    /// 2. Miss, not-found responses enabled, not-found handler set → construct
    ///    and run that handler instead.
    /// 3. Miss, not-found responses enabled, no not-found handler → return
    ///    [`Response::not_found`] without constructing anything.
    /// 4. Miss, not-found responses disabled → hand the request to `next` and
    ///    return its result verbatim.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Instantiation`] or [`HandlerError::Execution`] when the
    /// dispatched handler fails; the route table is untouched either way.
    pub async fn process(
        &self,
        request: Request,
        next: Next,
    ) -> Result<Response, HandlerError> {
        if let Some(entry) = self.routes.get(request.path()) {
            trace!(path = %request.path(), "route matched");
            return entry(request).await;
        }

        if self.send_not_found {
            if let Some(entry) = &self.not_found {
                trace!(path = %request.path(), "no route — running not-found handler");
                return entry(request).await;
            }
            trace!(path = %request.path(), "no route — sending canonical not-found response");
            return Ok(Response::not_found());
        }

        trace!(path = %request.path(), "no route — delegating to next pipeline stage");
        next.run(request).await
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Middleware for Router {
    fn process(
        &self,
        request: Request,
        next: Next,
    ) -> Pin<Box<dyn Future<Output = Result<Response, HandlerError>> + Send>> {
        let router = self.clone();
        Box::pin(async move { router.process(request, next).await })
    }
}
