//! Authentication module for JWT bearer-token auth with local accounts.
//!
//! This module provides:
//! - Argon2 password hashing and verification
//! - JWT token creation and validation
//! - Register, login and profile handlers
//! - `require_auth` middleware for protecting routes

mod handlers;
mod jwt;
mod middleware;
mod password;
pub mod types;

pub use handlers::{login, profile, register};
pub use middleware::require_auth;
pub use types::{AuthConfig, AuthUser};
