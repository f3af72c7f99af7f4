//! Domain layer - Pure client abstractions
//!
//! This layer makes no transport calls (no requests sent, no file I/O).
//! `ClientError` only converts transport errors into client errors.
//! Only gateway and store trait definitions and the client error type.

pub mod errors;
pub mod gateways;
pub mod store;

pub use errors::ClientError;
pub use gateways::*;
pub use store::KeyValueStore;
