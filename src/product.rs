//! Product endpoints.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sieve::validate::{Schema, ValidationError};
use sieve::{Request, Response, Router, Status};
use tracing::debug;

const NAME: &str = "^.{4,8}$";
const DESCRIPTION: &str = "^.{5,25}$";
const PRICE: &str = ",25";
const AVAILABLE: &str = "-2years+3months,+7days";

/// Body of `POST /product`.
#[derive(Debug, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f32,
    pub available: DateTime<Utc>,
}

/// Body of `PATCH /product`: only the fields being changed.
#[derive(Debug, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f32>,
    pub available: Option<DateTime<Utc>>,
}

pub struct ProductHandler {
    create: Schema<NewProduct>,
    update: Schema<ProductPatch>,
}

impl ProductHandler {
    pub fn new() -> Result<Self, ValidationError> {
        let create = Schema::builder()
            .field("name", NAME, |p: &NewProduct| &p.name)
            .field("description", DESCRIPTION, |p: &NewProduct| &p.description)
            .field("price", PRICE, |p: &NewProduct| &p.price)
            .field("available", AVAILABLE, |p: &NewProduct| &p.available)
            .build()?;

        let update = Schema::builder()
            .field("name", NAME, |p: &ProductPatch| &p.name)
            .field("description", DESCRIPTION, |p: &ProductPatch| &p.description)
            .field("price", PRICE, |p: &ProductPatch| &p.price)
            .field("available", AVAILABLE, |p: &ProductPatch| &p.available)
            .build()?;

        Ok(Self { create, update })
    }

    pub async fn list(self: Arc<Self>, _req: Request) -> Response {
        Response::text("Product list")
    }

    pub async fn read(self: Arc<Self>, req: Request) -> Response {
        match req.param(0) {
            Some(id) => Response::text(format!("Product read: {id}")),
            None => missing_params(),
        }
    }

    pub async fn create(self: Arc<Self>, req: Request) -> Response {
        accept(&self.create, &req)
    }

    pub async fn update(self: Arc<Self>, req: Request) -> Response {
        accept(&self.update, &req)
    }

    pub async fn remove(self: Arc<Self>, req: Request) -> Response {
        match req.param(0) {
            Some(id) => Response::text(format!("Product removed: {id}")),
            None => missing_params(),
        }
    }
}

/// The product route table.
pub fn routes(handler: ProductHandler) -> Router {
    let handler = Arc::new(handler);

    Router::new()
        .get(r"^/product/?$", with(Arc::clone(&handler), ProductHandler::list))
        .get(r"^/product/([^/]+)/?$", with(Arc::clone(&handler), ProductHandler::read))
        .post(r"^/product/?$", with(Arc::clone(&handler), ProductHandler::create))
        .patch(r"^/product/?$", with(Arc::clone(&handler), ProductHandler::update))
        .delete(r"^/product/([^/]+)/?$", with(Arc::clone(&handler), ProductHandler::remove))
}

/// Adapts a `ProductHandler` method into a route handler sharing `handler`.
fn with<F, Fut>(
    handler: Arc<ProductHandler>,
    method: F,
) -> impl Fn(Request) -> Fut + Send + Sync + 'static
where
    F: Fn(Arc<ProductHandler>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    move |req| method(Arc::clone(&handler), req)
}

/// Decodes the body as `T` and validates it: `200` with no body, or `400`
/// with the reason.
fn accept<T: DeserializeOwned>(schema: &Schema<T>, req: &Request) -> Response {
    let input: T = match req.json() {
        Ok(input) => input,
        Err(e) => return bad_request(e),
    };

    match schema.validate(&input) {
        Ok(()) => Response::status(Status::Ok),
        Err(e) => {
            debug!(field = e.field(), path = req.path(), "rejected payload");
            bad_request(e)
        }
    }
}

fn bad_request(reason: impl Display) -> Response {
    Response::builder()
        .status(Status::BadRequest)
        .text(reason.to_string())
}

fn missing_params() -> Response {
    Response::builder()
        .status(Status::InternalServerError)
        .text("path parameters are missing")
}
