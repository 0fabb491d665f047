//! # Component Factories
//!
//! A factory is the "constructor reference" of a component: given the address the
//! network picked, it builds the component, hosts it in a [`ComponentActor`] and hands
//! back the client plus the task handle.

use crate::actor::ComponentActor;
use crate::address::Address;
use crate::client::ComponentClient;
use crate::component::Component;
use tokio::task::JoinHandle;

/// Channel capacity for every hosted component.
pub const DEFAULT_BUFFER_SIZE: usize = 32;

/// Builds and starts components of one kind.
pub trait ComponentFactory: Send + Sync {
    fn kind(&self) -> &str;

    /// Constructs a fresh component at `address` and spawns its actor.
    fn spawn(&self, address: Address) -> (ComponentClient, JoinHandle<()>);
}

/// [`ComponentFactory`] for any [`Component`] built by a closure.
pub struct Factory<T> {
    kind: String,
    build: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T: Component> Factory<T> {
    pub fn new(kind: impl Into<String>, build: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            kind: kind.into(),
            build: Box::new(build),
        }
    }
}

impl<T: Component> ComponentFactory for Factory<T> {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn spawn(&self, address: Address) -> (ComponentClient, JoinHandle<()>) {
        let (actor, client) = ComponentActor::new(address, (self.build)(), DEFAULT_BUFFER_SIZE);
        let handle = tokio::spawn(actor.run());
        (client, handle)
    }
}
