//! Gateway trait definitions
//!
//! These traits define the contract with the backend.
//! The HTTP implementation lives in the infrastructure layer.

use async_trait::async_trait;

use super::ClientError;
use crate::models::{
    GeneratedRecipe, GenerationRequest, Id, LoginRequest, RateResponse, RatingsOverview, Recipe,
    SignupRequest, UserSession,
};

/// Recipe catalogue, generation and rating endpoints
#[async_trait]
pub trait RecipeGateway: Send + Sync {
    /// Full catalogue
    async fn list(&self) -> Result<Vec<Recipe>, ClientError>;

    /// Server-side search over name, country, cuisine, description and ingredients
    async fn search(&self, query: &str) -> Result<Vec<Recipe>, ClientError>;

    /// Random subset picked by the server
    async fn surprise(&self) -> Result<Vec<Recipe>, ClientError>;

    /// Full detail for one catalogue recipe
    async fn detail(&self, id: &Id) -> Result<Recipe, ClientError>;

    /// Synthesize a recipe from user ingredients
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedRecipe, ClientError>;

    /// Store a 1..=5 rating and return the new aggregate
    async fn rate(&self, id: &Id, stars: u8) -> Result<RateResponse, ClientError>;

    /// Ratings breakdown and the caller's own vote
    async fn ratings(&self, id: &Id) -> Result<RatingsOverview, ClientError>;

    /// Distinct cuisine types, for the filter choices
    async fn cuisines(&self) -> Result<Vec<String>, ClientError>;

    /// Distinct countries, for the filter choices
    async fn countries(&self) -> Result<Vec<String>, ClientError>;
}

/// Session endpoints. The backend keeps the session in a cookie.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// `Ok(None)` when the backend answers with any non-success status
    async fn current_user(&self) -> Result<Option<UserSession>, ClientError>;

    async fn login(&self, request: &LoginRequest) -> Result<UserSession, ClientError>;

    async fn signup(&self, request: &SignupRequest) -> Result<UserSession, ClientError>;

    async fn logout(&self) -> Result<(), ClientError>;
}
