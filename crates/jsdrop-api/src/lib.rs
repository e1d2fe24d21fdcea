//! jsdrop API Library
//!
//! This crate provides the HTTP upload endpoint, its middleware, and application setup.

// Module declarations
mod api_doc;
mod handlers;
mod middleware;
mod services;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod response;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
