//! # show-client
//!
//! `Backend` implementation that talks JSON over HTTP to the show server.
//!
//! ```rust,ignore
//! use show_client::{BackendConfig, HttpBackend};
//! use show_core::QueryClient;
//!
//! let backend = Arc::new(HttpBackend::new(BackendConfig::from_env()));
//! let queries = QueryClient::connected(backend);
//! ```

mod config;
mod http;

pub use config::BackendConfig;
pub use http::{error_from_status, HttpBackend};
