//! # Component Messages
//!
//! This module defines the message types used for communication between
//! the `ComponentClient` and `ComponentActor`.

use crate::address::Address;
use crate::error::FrameworkError;
use crate::value::Value;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by components.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Message sent to a component to request an operation.
///
/// Unlike a per-entity protocol, every component speaks the same three requests and
/// carries its arguments as [`Value`]s. That keeps [`ComponentClient`](crate::ComponentClient)
/// non-generic, so components of different kinds can sit side by side in one registry.
///
/// - **Initialize**: The one-time setup call.
/// - **Call**: A named post-setup operation (grants, configuration, views).
/// - **Status**: Reads the kind, address and initialization state.
#[derive(Debug)]
pub enum ComponentRequest {
    Initialize {
        caller: Address,
        args: Vec<Value>,
        respond_to: Response<()>,
    },
    Call {
        caller: Address,
        method: String,
        args: Vec<Value>,
        respond_to: Response<Value>,
    },
    Status {
        respond_to: Response<ComponentStatus>,
    },
}

/// Snapshot of a component's identity and setup state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentStatus {
    pub kind: String,
    pub address: Address,
    pub initialized: bool,
}
