//! # sieve
//!
//! A small HTTP service skeleton: an ordered regex router in front of async
//! handlers, and a declarative validator for the payloads they decode.
//!
//! - **Routing**: `(method, pattern, handler)` triples scanned in order. The
//!   pattern is a regular expression over the path; its capture groups reach
//!   the handler as positional parameters through [`Request::param`].
//! - **Validation**: a [`validate::Schema`] per payload type, with one
//!   constraint tag per field: a regex for text, `min,max` for numbers,
//!   `lower,upper` relative periods such as `-2years+3months,+7days` for
//!   timestamps.
//! - **Serving**: tokio + hyper, HTTP/1.1 and HTTP/2, graceful shutdown on
//!   SIGTERM / Ctrl-C.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use sieve::{Config, Request, Response, Router, Server, Status};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sieve::Error> {
//!     let config = Config::load(".env")?;
//!
//!     let app = Router::new()
//!         .get(r"^/product/?$", list)
//!         .get(r"^/product/([^/]+)/?$", read);
//!
//!     Server::from_config(&config)?.serve(app).await
//! }
//!
//! async fn list(_req: Request) -> Response {
//!     Response::text("Product list")
//! }
//!
//! async fn read(req: Request) -> Response {
//!     match req.param(0) {
//!         Some(id) => Response::text(format!("Product read: {id}")),
//!         None => Response::status(Status::InternalServerError),
//!     }
//! }
//! ```

mod config;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod validate;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::{PathParams, Request};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{Route, RouteMatch, Router};
pub use server::Server;
pub use status::Status;
