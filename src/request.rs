//! Incoming HTTP request type.

use bytes::Bytes;
use http::{Extensions, HeaderMap};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;

use crate::method::Method;

/// Positional path parameters: the capture groups of the route pattern that
/// matched, in order, without the whole match.
///
/// The router stores them in the request's [extensions](Request::extensions)
/// under this type; [`Request::params`] reads them back.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PathParams(pub Vec<String>);

/// An incoming HTTP request with its body fully read.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    extensions: Extensions,
}

impl Request {
    /// Builds a request by hand, e.g. to drive a [`Router`](crate::Router) in
    /// tests. The server builds them from the wire.
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: body.into(),
            extensions: Extensions::new(),
        }
    }

    /// Builds a request read off the wire. The path is percent-decoded, so
    /// routes match and capture `/product/desk lamp`, never `desk%20lamp`.
    pub(crate) fn from_parts(method: Method, parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            method,
            path: percent_decode_str(parts.uri.path()).decode_utf8_lossy().into_owned(),
            headers: parts.headers,
            body,
            extensions: parts.extensions,
        }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }

    /// Header lookup; `None` when absent or not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The path parameters set by the router.
    ///
    /// `None` only when the request did not go through
    /// [`Router::dispatch`](crate::Router::dispatch).
    pub fn params(&self) -> Option<&[String]> {
        self.extensions.get::<PathParams>().map(|p| p.0.as_slice())
    }

    /// The path parameter at `index`.
    ///
    /// For a route `^/product/([^/]+)/?$`, `req.param(0)` on `/product/42`
    /// returns `Some("42")`.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params()?.get(index).map(String::as_str)
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
