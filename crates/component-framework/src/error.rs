//! # Framework Errors
//!
//! This module defines the common error types used throughout the component framework.
//! By centralizing error definitions, we ensure consistent error handling across
//! every component and client.

use crate::address::Address;

/// Errors that can occur within the component framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Component closed")]
    ActorClosed,
    #[error("Component dropped response channel")]
    ActorDropped,
    /// The component's one-time setup already ran.
    #[error("Component already initialized")]
    AlreadyInitialized,
    /// The component was called before its one-time setup.
    #[error("Component not initialized")]
    NotInitialized,
    #[error("Address already in use: {0}")]
    AddressInUse(Address),
    #[error("Unexpected response from {method}: {detail}")]
    InvalidResponse { method: String, detail: String },
    #[error("Component task failed: {0}")]
    TaskFailed(String),
    #[error("Component error: {0}")]
    ComponentError(Box<dyn std::error::Error + Send + Sync>),
}
