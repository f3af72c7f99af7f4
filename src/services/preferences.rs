//! Preference Store - typed access to the persisted keys
//!
//! Favorites and generated recipes are JSON arrays; the session is a JSON
//! object plus a `"true"` marker key. Unreadable values load as empty.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{ClientError, KeyValueStore};
use crate::models::{Id, Recipe, UserSession};

pub const FAVORITES_KEY: &str = "favoriteRecipes";
pub const AI_RECIPES_KEY: &str = "aiGeneratedRecipes";
pub const USER_KEY: &str = "spicePilotUser";
pub const LOGGED_IN_KEY: &str = "spicePilotLoggedIn";

#[derive(Clone)]
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read '{}': {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring unreadable '{}': {}", key, e);
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), ClientError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }

    pub fn load_favorites(&self) -> Vec<Id> {
        self.read(FAVORITES_KEY).unwrap_or_default()
    }

    pub fn save_favorites(&self, favorites: &[Id]) -> Result<(), ClientError> {
        self.write(FAVORITES_KEY, favorites)
    }

    pub fn load_ai_recipes(&self) -> Vec<Recipe> {
        self.read(AI_RECIPES_KEY).unwrap_or_default()
    }

    pub fn save_ai_recipes(&self, recipes: &[Recipe]) -> Result<(), ClientError> {
        self.write(AI_RECIPES_KEY, recipes)
    }

    pub fn load_session(&self) -> Option<UserSession> {
        self.read(USER_KEY)
    }

    pub fn save_session(&self, user: &UserSession) -> Result<(), ClientError> {
        self.write(USER_KEY, user)?;
        self.store.set(LOGGED_IN_KEY, "true")
    }

    pub fn clear_session(&self) -> Result<(), ClientError> {
        self.store.remove(USER_KEY)?;
        self.store.remove(LOGGED_IN_KEY)
    }
}
