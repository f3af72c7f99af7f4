//! View layer - display models and the pure functions that build them
//!
//! Nothing here holds state. `App::view` assembles a `Screen` from the
//! current collection and session by calling into `render`.

pub mod models;
pub mod render;

pub use models::*;
