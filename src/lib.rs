pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod validation;
pub mod view;

pub use app::App;
pub use domain::ClientError;
