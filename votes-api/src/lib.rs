//! Votes API Library
//!
//! This library exposes the voting core over HTTP, including configuration
//! management, bearer token authentication, error handling, and dependency
//! injection.

pub mod auth;
pub mod config;
pub mod errors;
pub mod server;

pub use config::Dependencies;
pub use errors::{ApiError, AppError};
