//! Sentiserve Server
//!
//! HTTP front-end for the sentiment classifier. The model is loaded once at
//! startup and shared by every request through [`AppState`].

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::ServerConfig;
pub use routes::{create_router, AppError};
pub use state::AppState;
