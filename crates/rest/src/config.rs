//! Server configuration for the firmware search API.
//!
//! This module provides configuration types for the server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FIRMSCOPE_SERVER_PORT` | 8080 | Server port |
//! | `FIRMSCOPE_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `FIRMSCOPE_LOG_LEVEL` | info | Log level |
//! | `FIRMSCOPE_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `FIRMSCOPE_ENABLE_CORS` | true | Enable CORS |
//! | `FIRMSCOPE_CORS_ORIGINS` | * | Allowed origins |
//! | `FIRMSCOPE_CORS_METHODS` | GET,POST,OPTIONS | Allowed methods |
//! | `FIRMSCOPE_CORS_HEADERS` | Content-Type,Authorization,Accept | Allowed headers |
//! | `FIRMSCOPE_RESULTS_PER_PAGE` | 10 | Default page size of result lists |
//! | `FIRMSCOPE_MAX_RESULTS_PER_PAGE` | 1000 | Upper bound for `per_page` |
//! | `FIRMSCOPE_HASH_ALGORITHMS` | sha256,md5 | Hash algorithms searched by hash value |
//! | `FIRMSCOPE_ENABLE_AUTH` | false | Enforce search privileges |
//! | `FIRMSCOPE_DATA_FILE` | - | JSON records loaded into the in-memory backend |
//!
//! # Example
//!
//! ```rust
//! use firmscope_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     hash_algorithms: "sha256".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.hash_algorithm_list(), vec!["sha256".to_string()]);
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Server configuration for the firmware search API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "firmscope")]
#[command(about = "Firmware database search server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "FIRMSCOPE_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "FIRMSCOPE_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "FIRMSCOPE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "FIRMSCOPE_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "FIRMSCOPE_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "FIRMSCOPE_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "FIRMSCOPE_CORS_METHODS", default_value = "GET,POST,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "FIRMSCOPE_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept"
    )]
    pub cors_headers: String,

    /// Default number of results per page.
    #[arg(long, env = "FIRMSCOPE_RESULTS_PER_PAGE", default_value = "10")]
    pub results_per_page: usize,

    /// Maximum number of results per page a client may request.
    #[arg(long, env = "FIRMSCOPE_MAX_RESULTS_PER_PAGE", default_value = "1000")]
    pub max_results_per_page: usize,

    /// Hash algorithms searched when a hash value is given (comma-separated).
    #[arg(long, env = "FIRMSCOPE_HASH_ALGORITHMS", default_value = "sha256,md5")]
    pub hash_algorithms: String,

    /// Enforce search privileges on the database routes.
    #[arg(long, env = "FIRMSCOPE_ENABLE_AUTH", default_value = "false")]
    pub enable_auth: bool,

    /// JSON file with records to load into the in-memory backend.
    #[arg(long, env = "FIRMSCOPE_DATA_FILE")]
    pub data_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept".to_string(),
            results_per_page: 10,
            max_results_per_page: 1000,
            hash_algorithms: "sha256,md5".to_string(),
            enable_auth: false,
            data_file: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the configured hash algorithms, in order, without blanks.
    pub fn hash_algorithm_list(&self) -> Vec<String> {
        self.hash_algorithms
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.results_per_page == 0 {
            errors.push("Results per page cannot be 0".to_string());
        }

        if self.results_per_page > self.max_results_per_page {
            errors.push("Results per page cannot exceed max results per page".to_string());
        }

        for algorithm in self.hash_algorithm_list() {
            if !algorithm
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                errors.push(format!("Invalid hash algorithm name: {}", algorithm));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and disables features that might interfere
    /// with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            results_per_page: 10,
            max_results_per_page: 100,
            hash_algorithms: "sha256,md5".to_string(),
            enable_auth: false,
            data_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.results_per_page, 10);
        assert!(config.enable_cors);
        assert!(!config.enable_auth);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_hash_algorithm_list() {
        let config = ServerConfig {
            hash_algorithms: " sha256, ,md5,".to_string(),
            ..Default::default()
        };
        assert_eq!(config.hash_algorithm_list(), vec!["sha256", "md5"]);

        let none = ServerConfig {
            hash_algorithms: String::new(),
            ..Default::default()
        };
        assert!(none.hash_algorithm_list().is_empty());
    }

    #[test]
    fn test_validate_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().iter().any(|e| e.contains("Port")));
    }

    #[test]
    fn test_validate_reports_all_problems() {
        let config = ServerConfig {
            results_per_page: 100,
            max_results_per_page: 50,
            hash_algorithms: "sha256,sha 1".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_parse_from_args() {
        let config = ServerConfig::try_parse_from([
            "firmscope",
            "--port",
            "9000",
            "--results-per-page",
            "25",
            "--hash-algorithms",
            "md5",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.results_per_page, 25);
        assert_eq!(config.hash_algorithm_list(), vec!["md5"]);
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
        assert!(config.data_file.is_none());
    }
}
