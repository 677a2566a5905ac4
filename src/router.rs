//! Ordered regex request router.
//!
//! Routes are `(method, pattern, handler)` triples, scanned in registration
//! order. A pattern is a regular expression over the whole request path; its
//! capture groups become the request's [`PathParams`]. Patterns are compiled
//! once, when the route is registered.
//!
//! The scan is deliberately linear: the same pattern may be registered under
//! several methods, and whether a pattern matches depends on how many times it
//! matches, so neither order nor duplication can be indexed away.

use std::fmt;

use regex::Regex;
use tracing::debug;

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::{PathParams, Request};
use crate::response::Response;
use crate::status::Status;

/// One entry of the route table.
pub struct Route {
    method: Method,
    pattern: String,
    regex: Regex,
    handler: BoxedHandler,
}

impl Route {
    pub fn method(&self) -> Method { self.method }
    pub fn pattern(&self) -> &str { &self.pattern }

    /// Capture groups of the single match of this route's pattern in `path`.
    ///
    /// `None` unless the pattern matches exactly once. A pattern that matches
    /// at several places (say `o` in `/foo`) counts as not matching at all;
    /// anchor patterns with `^…$` to match the whole path. Groups that did not
    /// take part in the match come back as empty strings.
    fn match_once(&self, path: &str) -> Option<PathParams> {
        let mut matches = self.regex.captures_iter(path);
        let caps = matches.next()?;
        if matches.next().is_some() {
            return None;
        }

        let groups = caps
            .iter()
            .skip(1)
            .map(|group| group.map_or_else(String::new, |g| g.as_str().to_owned()))
            .collect();
        Some(PathParams(groups))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// A successful [`Router::lookup`].
#[derive(Debug)]
pub struct RouteMatch<'r> {
    pub route: &'r Route,
    pub params: PathParams,
}

/// The application router.
///
/// Build it once at startup and hand it to [`Server::serve`](crate::Server::serve);
/// it is read-only afterwards and shared by every connection.
///
/// ```rust
/// use sieve::{Method, Request, Response, Router};
///
/// # async fn list(_: Request) -> Response { Response::text("") }
/// # async fn read(_: Request) -> Response { Response::text("") }
/// let app = Router::new()
///     .on(Method::Get, r"^/product/?$", list)
///     .on(Method::Get, r"^/product/([^/]+)/?$", read);
/// ```
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route. Returns `self` for chaining.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regular expression. The route table
    /// is fixed at startup, so a bad pattern is a programming error; use
    /// [`try_on`](Router::try_on) to handle it instead.
    pub fn on(self, method: Method, pattern: &str, handler: impl Handler) -> Self {
        self.try_on(method, pattern, handler)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Appends a route, or returns [`Error::RoutePattern`] if `pattern` does
    /// not compile.
    pub fn try_on(mut self, method: Method, pattern: &str, handler: impl Handler) -> Result<Self, Error> {
        let regex = Regex::new(pattern).map_err(|source| Error::RoutePattern {
            pattern: pattern.to_owned(),
            source,
        })?;

        debug!(%method, pattern, "route registered");
        self.routes.push(Route {
            method,
            pattern: pattern.to_owned(),
            regex,
            handler: handler.into_boxed_handler(),
        });
        Ok(self)
    }

    pub fn get(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, pattern, handler)
    }

    pub fn post(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, pattern, handler)
    }

    pub fn put(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, pattern, handler)
    }

    pub fn patch(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Patch, pattern, handler)
    }

    pub fn delete(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, pattern, handler)
    }

    /// The route table, in scan order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Finds the first route whose pattern matches `path` exactly once and
    /// whose method is `method`.
    ///
    /// A route whose pattern matches under a different method does not stop
    /// the scan; a later route may still qualify.
    pub fn lookup<'r>(&'r self, method: Method, path: &str) -> Option<RouteMatch<'r>> {
        self.routes.iter().find_map(|route| {
            let params = route.match_once(path)?;
            (route.method == method).then_some(RouteMatch { route, params })
        })
    }

    /// Routes `req` and runs the selected handler, or answers `404 Not Found`
    /// with an empty body.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let Some(RouteMatch { route, params }) = self.lookup(req.method(), req.path()) else {
            debug!(method = %req.method(), path = req.path(), "no route");
            return Response::status(Status::NotFound);
        };

        debug!(method = %req.method(), path = req.path(), pattern = route.pattern(), "dispatch");
        req.extensions_mut().insert(params);
        route.handler.call(req).await
    }
}
