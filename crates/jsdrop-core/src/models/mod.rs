//! Data models for the upload pipeline
//!
//! `upload` holds the server-side domain types that live for one request;
//! `wire` holds the JSON shapes exchanged with clients.

mod upload;
mod wire;

pub use upload::*;
pub use wire::*;
