//! Product service.
//!
//! Run with:
//!   RUST_LOG=debug cargo run -- sieve.env
//!
//! Try:
//!   curl http://localhost:8080/product/42
//!   curl -X POST http://localhost:8080/product \
//!        -d '{"name":"lamp","description":"a desk lamp","price":19.5,"available":"2026-01-01T00:00:00Z"}'

mod product;

use std::path::PathBuf;

use clap::Parser;
use sieve::{Config, Server};
use tracing_subscriber::EnvFilter;

use crate::product::ProductHandler;

#[derive(Debug, Parser)]
#[command(version, about = "Product service")]
struct Args {
    /// Path of the `key=value` configuration file.
    #[arg(default_value = ".env")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), sieve::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;
    let app = product::routes(ProductHandler::new()?);

    Server::from_config(&config)?.serve(app).await
}
