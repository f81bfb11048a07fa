//! # junction
//!
//! A minimal path-to-handler HTTP router, packaged as a pipeline middleware.
//!
//! The router maps exact URI paths to [`Handler`] types. Each matched request
//! constructs a fresh handler instance, runs it, and returns its response.
//! Unmatched requests fall back to a designated not-found handler, a canonical
//! `404` response, or the next pipeline stage — depending on configuration.
//!
//! ## Quick Start
//!
//! ```rust
//! use junction::{Handler, Next, Request, Response, Router, StatusCode};
//! use junction::handler::{BoxError, HandlerFuture};
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
//!         Box::pin(async move {
//!             let greeting = format!("Hello from {}", self.request.path());
//!             Ok(Response::new(StatusCode::Ok).body(greeting))
//!         })
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new(true);
//! router.register::<Hello>();
//!
//! let raw = b"GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n";
//! let request = Request::parse(raw)?;
//! let response = router.process(request, Next::new(vec![])).await?;
//! assert_eq!(response.status(), StatusCode::Ok);
//! # Ok(())
//! # }
//! ```

pub mod handler;
pub mod http;
pub mod middleware;
pub mod router;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use handler::{Handler, HandlerError};
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use middleware::{Middleware, Next};
pub use router::Router;
