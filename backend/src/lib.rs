//! Lightning node transaction history service.
//!
//! Merges a node's payments and paged invoices into one reverse-chronological,
//! cursor-paginated feed and serves it over HTTP.

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod server;
pub mod services;
pub mod utils;
