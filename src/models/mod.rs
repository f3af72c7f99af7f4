pub mod filter;
pub mod id;
pub mod recipe;
pub mod user;

pub use filter::{FilterState, Tab};
pub use id::Id;
pub use recipe::{
    GeneratedRecipe, GenerationPreferences, GenerationRequest, RateRequest, RateResponse,
    RatingSummary, RatingsOverview, Recipe,
};
pub use user::{AuthResponse, LoginRequest, OAuthProvider, SignupRequest, UserSession};
