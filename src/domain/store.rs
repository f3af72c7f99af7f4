//! Key-value store contract behind the preference store

use super::ClientError;

/// Flat string dictionary, the shape of browser local storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;

    /// Removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}
