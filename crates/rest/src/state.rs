//! Application state for the search API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the database backend, the binary search task queue, the
//! query composer and the configuration.

use std::sync::Arc;

use firmscope_persistence::core::{BinarySearchService, Catalog, SearchBackend};

use crate::composer::QueryComposer;
use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The database backend type (must implement [`SearchBackend`] and [`Catalog`])
///
/// # Example
///
/// ```rust,ignore
/// use firmscope_rest::{AppState, ServerConfig};
/// use firmscope_persistence::backends::memory::{InMemoryBackend, InMemoryBinarySearch};
/// use std::sync::Arc;
///
/// let state = AppState::new(
///     Arc::new(InMemoryBackend::new()),
///     Arc::new(InMemoryBinarySearch::new()),
///     ServerConfig::default(),
/// );
/// ```
pub struct AppState<S> {
    /// The database backend.
    storage: Arc<S>,

    /// Task queue for binary pattern searches.
    binary_search: Arc<dyn BinarySearchService>,

    /// Query composer built from the configuration.
    composer: Arc<QueryComposer>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            binary_search: Arc::clone(&self.binary_search),
            composer: Arc::clone(&self.composer),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: SearchBackend + Catalog> AppState<S> {
    /// Creates a new AppState with the given collaborators and configuration.
    ///
    /// # Arguments
    ///
    /// * `storage` - The database backend (wrapped in Arc)
    /// * `binary_search` - The binary search task queue
    /// * `config` - Server configuration
    pub fn new(
        storage: Arc<S>,
        binary_search: Arc<dyn BinarySearchService>,
        config: ServerConfig,
    ) -> Self {
        Self {
            storage,
            binary_search,
            composer: Arc::new(QueryComposer::from_config(&config)),
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the database backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the binary search task queue.
    pub fn binary_search(&self) -> &dyn BinarySearchService {
        self.binary_search.as_ref()
    }

    /// Returns the query composer.
    pub fn composer(&self) -> &QueryComposer {
        &self.composer
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns whether search privileges are enforced.
    pub fn auth_enabled(&self) -> bool {
        self.config.enable_auth
    }
}
