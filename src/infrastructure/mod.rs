//! Infrastructure layer - Transport and storage implementations
//!
//! This layer contains:
//! - HTTP gateway over the backend API (http_gateway)
//! - Key-value store implementations (store)

pub mod http_gateway;
pub mod store;

pub use http_gateway::HttpGateway;
pub use store::{FileStore, MemoryStore};
