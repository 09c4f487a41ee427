//! Route configuration for the search API.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod database_routes;

pub use database_routes::create_routes;
