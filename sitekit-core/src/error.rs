use crate::StoreScope;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{scope} storage unavailable: {message}")]
    Unavailable { scope: StoreScope, message: String },
    #[error("failed to read `{key}` from {scope} storage: {message}")]
    Read {
        scope: StoreScope,
        key: String,
        message: String,
    },
    #[error("failed to write `{key}` to {scope} storage: {message}")]
    Write {
        scope: StoreScope,
        key: String,
        message: String,
    },
    #[error("failed to remove `{key}` from {scope} storage: {message}")]
    Remove {
        scope: StoreScope,
        key: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("redirect to `{target}` failed: {message}")]
pub struct NavigationError {
    pub target: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}
