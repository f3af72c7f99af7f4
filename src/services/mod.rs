//! Services Layer
//!
//! Client state and the rules that keep it consistent with what is rendered.
//! Nothing here talks to the network directly; gateways are injected.

pub mod collection;
pub mod preferences;
pub mod session;

// Re-export for convenience
pub use collection::{
    Favorites, Ingredients, Listing, RecipeCollection, RequestTracker, Ticket, MIN_INGREDIENTS,
};
pub use preferences::PreferenceStore;
pub use session::{AuthManager, SessionMachine, SessionPhase, SessionStatus};
