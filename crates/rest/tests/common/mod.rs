//! Common test utilities for search API testing.
//!
//! - [`fixtures`] - Firmware records seeded into the backend
//! - [`harness`] - Test server wiring and the test principal layer

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;
