//! Persisted auth credentials in browser local storage.

use gloo::storage::{LocalStorage, Storage};
use shared_types::UserProfile;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

pub fn get_token() -> Option<String> {
    LocalStorage::get(TOKEN_KEY).ok()
}

pub fn set_token(token: &str) {
    if let Err(e) = LocalStorage::set(TOKEN_KEY, token) {
        tracing::error!("Failed to persist token: {}", e);
    }
}

/// Stored user, or `None` when absent or unreadable.
pub fn get_user() -> Option<UserProfile> {
    LocalStorage::get(USER_KEY).ok()
}

pub fn set_user(user: &UserProfile) {
    if let Err(e) = LocalStorage::set(USER_KEY, user) {
        tracing::error!("Failed to persist user: {}", e);
    }
}

pub fn clear_auth() {
    LocalStorage::delete(TOKEN_KEY);
    LocalStorage::delete(USER_KEY);
}
