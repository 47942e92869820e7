//! Cached client for the Open5e reference API.
//!
//! - [`Open5eApi`] - typed queries, filtering and grouping over fetched data
//! - [`QueryCache`] - per-process response cache with request deduplication
//! - [`SourceSelection`] - the persisted choice of sourcebooks
//! - [`ClientConfig`] - file and environment configuration

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod signal;
pub mod sources;

pub use api::Open5eApi;
pub use cache::{CacheStats, QueryCache, QueryKey};
pub use config::{ApiConfig, ClientConfig, LoggingConfig, SourcesConfig};
pub use error::{ClientError, Result};
pub use gateway::{HttpGateway, ReqwestGateway};
pub use signal::{ErrorSignal, TracingSignal};
pub use sources::{
    DEFAULT_SOURCES, FileStore, MemoryStore, SOURCES_KEY, SourceSelection, SourceStore, Sources,
};
