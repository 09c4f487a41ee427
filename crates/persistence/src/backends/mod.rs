//! Backend implementations.
//!
//! This module contains implementations of the collaborator traits in
//! [`crate::core`].
//!
//! # Available Backends
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`memory`] | Linear scan over records held in memory, for tests and development |
//!
//! # Example
//!
//! ```no_run
//! use firmscope_persistence::backends::memory::InMemoryBackend;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Start empty
//! let backend = InMemoryBackend::new();
//!
//! // Or seed from a JSON data file
//! let backend = InMemoryBackend::load_records("./data/records.json")?;
//! # Ok(())
//! # }
//! ```

pub mod memory;
