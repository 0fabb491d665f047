//! # Generic Component Host
//!
//! This module defines the `ComponentActor`, the task that hosts one component
//! instance. It implements the "Server" side of the Actor Model, processing
//! messages sequentially and ensuring exclusive access to the component's state.

use crate::address::Address;
use crate::client::ComponentClient;
use crate::component::{CallContext, Component};
use crate::error::FrameworkError;
use crate::message::{ComponentRequest, ComponentStatus};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that hosts a single component.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the component state and
/// the receiver end of the channel.
///
/// **Concurrency Model**:
/// Each `ComponentActor` processes its own messages *sequentially* in a loop, so the
/// component never needs a `Mutex`. Exclusive ownership inside the task is the lock.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ComponentActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Run**: Spawn the actor's run loop in a background task.
/// 3.  **Initialize**: Send the one-time setup through the client.
///
/// ```rust
/// use component_framework::{Address, CallContext, Component, ComponentActor, Value};
/// use async_trait::async_trait;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("vault error")]
/// struct VaultError;
///
/// #[derive(Default)]
/// struct Vault { owner: Option<Address> }
///
/// #[async_trait]
/// impl Component for Vault {
///     type Error = VaultError;
///     fn kind(&self) -> &str { "Vault" }
///     async fn initialize(&mut self, _: &CallContext, args: Vec<Value>) -> Result<(), VaultError> {
///         self.owner = args.first().and_then(Value::as_address);
///         Ok(())
///     }
///     async fn handle_call(&mut self, _: &CallContext, _: &str, _: Vec<Value>) -> Result<Value, VaultError> {
///         Ok(Value::Bool(true))
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ComponentActor::new(Address::derive("vault"), Vault::default(), 10);
///     tokio::spawn(actor.run());
///
///     let owner = Address::derive("owner");
///     client.initialize(owner, vec![owner.into()]).await.unwrap();
///     assert!(client.status().await.unwrap().initialized);
/// }
/// ```
///
/// ## Operations
///
/// * **Initialize**:
///     1. Rejects with `AlreadyInitialized` if setup already succeeded.
///     2. Calls the component's `initialize` hook.
///     3. Marks the component initialized only if the hook succeeded.
///
/// * **Call**:
///     1. Rejects with `NotInitialized` before setup.
///     2. Calls `handle_call` and returns its value.
///
/// * **Status**: Reports kind, address and initialization state.
pub struct ComponentActor<T: Component> {
    receiver: mpsc::Receiver<ComponentRequest>,
    address: Address,
    component: T,
    initialized: bool,
}

impl<T: Component> ComponentActor<T> {
    /// Creates a new `ComponentActor` and its associated `ComponentClient`.
    ///
    /// # Arguments
    ///
    /// * `address` - Where the component lives; the client carries it too.
    /// * `component` - The freshly constructed, uninitialized component.
    /// * `buffer_size` - The capacity of the MPSC channel.
    pub fn new(address: Address, component: T, buffer_size: usize) -> (Self, ComponentClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            address,
            component,
            initialized: false,
        };
        let client = ComponentClient::new(address, sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    pub async fn run(mut self) {
        let kind = self.component.kind().to_string();
        let address = self.address;
        info!(%kind, %address, "Component started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ComponentRequest::Initialize {
                    caller,
                    args,
                    respond_to,
                } => {
                    debug!(%kind, %address, %caller, ?args, "Initialize");
                    if self.initialized {
                        warn!(%kind, %address, "Initialize rejected: already initialized");
                        let _ = respond_to.send(Err(FrameworkError::AlreadyInitialized));
                        continue;
                    }
                    let ctx = CallContext {
                        caller,
                        this: address,
                    };
                    match self.component.initialize(&ctx, args).await {
                        Ok(()) => {
                            self.initialized = true;
                            info!(%kind, %address, "Initialized");
                            let _ = respond_to.send(Ok(()));
                        }
                        Err(e) => {
                            warn!(%kind, %address, error = %e, "Initialize failed");
                            let _ = respond_to
                                .send(Err(FrameworkError::ComponentError(Box::new(e))));
                        }
                    }
                }
                ComponentRequest::Call {
                    caller,
                    method,
                    args,
                    respond_to,
                } => {
                    debug!(%kind, %address, %caller, %method, ?args, "Call");
                    if !self.initialized {
                        warn!(%kind, %address, %method, "Call rejected: not initialized");
                        let _ = respond_to.send(Err(FrameworkError::NotInitialized));
                        continue;
                    }
                    let ctx = CallContext {
                        caller,
                        this: address,
                    };
                    let result = self
                        .component
                        .handle_call(&ctx, &method, args)
                        .await
                        .map_err(|e| FrameworkError::ComponentError(Box::new(e)));
                    match &result {
                        Ok(_) => debug!(%kind, %address, %method, "Call ok"),
                        Err(e) => warn!(%kind, %address, %method, error = %e, "Call failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ComponentRequest::Status { respond_to } => {
                    let _ = respond_to.send(Ok(ComponentStatus {
                        kind: kind.clone(),
                        address,
                        initialized: self.initialized,
                    }));
                }
            }
        }

        info!(%kind, %address, initialized = self.initialized, "Shutdown");
    }
}
