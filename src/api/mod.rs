//! API Module
//!
//! HTTP handlers and routing for the cache and sieve REST API.
//!
//! # Endpoints
//! - `PUT /cache`, `DELETE /cache` - Store a value / clear everything
//! - `GET /cache/:key`, `DELETE /cache/:key` - Read / delete one key
//! - `POST /cache/cleanup` - Sweep expired entries
//! - `GET /stats` - Cache statistics
//! - `POST /sieve`, `POST /filter` - Filter posted records
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
