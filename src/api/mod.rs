//! API Module
//!
//! HTTP handlers and routing over the storage driver contract.
//!
//! # Endpoints
//! - `PUT /set` - Write a key (optionally write-once)
//! - `GET /get/:key` - Read a value
//! - `GET /int/:key` - Read a value as an integer
//! - `GET /ttl/:key` - Remaining time-to-live
//! - `POST /upgrade/:key` - Restart a mutable key's expiry
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
