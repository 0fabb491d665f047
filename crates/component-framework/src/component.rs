//! # Component Trait
//!
//! The `Component` trait defines the contract every deployable unit (access control,
//! token, vault, reward locker, …) must implement to be hosted by the generic
//! [`ComponentActor`](crate::ComponentActor). It specifies the error type and the two
//! entry points the outside world can reach: the one-time `initialize` and
//! post-setup `handle_call`.
//!
//! # Architecture Note
//! The framework, not the component, owns the "exactly once" rule for setup: the actor
//! tracks whether `initialize` already succeeded and rejects a second attempt with
//! [`FrameworkError::AlreadyInitialized`](crate::FrameworkError::AlreadyInitialized)
//! before the component ever sees it. Components only validate their own arguments.

use crate::address::Address;
use crate::value::Value;
use async_trait::async_trait;

/// Who is calling, and which instance is being called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub this: Address,
}

/// Trait that any deployable component must implement to be hosted by `ComponentActor`.
///
/// # Async
/// This trait is `#[async_trait]` so hooks may await (e.g. to simulate slow setup).
#[async_trait]
pub trait Component: Send + 'static {
    /// The error type for this component.
    /// Must implement std::error::Error for proper error propagation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Human-readable kind, e.g. `GlobalAccessControl`.
    fn kind(&self) -> &str;

    /// One-time setup. Only called while the component is uninitialized.
    async fn initialize(&mut self, ctx: &CallContext, args: Vec<Value>) -> Result<(), Self::Error>;

    /// Handle a named post-setup call.
    async fn handle_call(
        &mut self,
        ctx: &CallContext,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, Self::Error>;
}
