//! # Component Client
//!
//! This module defines the client the orchestrator uses to reach a component.

use crate::address::Address;
use crate::error::FrameworkError;
use crate::message::{ComponentRequest, ComponentStatus};
use crate::value::Value;
use tokio::sync::{mpsc, oneshot};

/// ## ComponentClient
///
/// The `ComponentClient` forwards Initialize / Call / Status requests over a Tokio mpsc
/// channel and returns results via oneshot channels. It also carries the address of the
/// component it talks to.
///
/// * **Cloneable** – holds only a sender and an address, so cloning is inexpensive.
/// * **Non-generic** – every component speaks [`ComponentRequest`], so clients for
///   different component kinds are interchangeable.
#[derive(Debug, Clone)]
pub struct ComponentClient {
    address: Address,
    sender: mpsc::Sender<ComponentRequest>,
}

impl ComponentClient {
    pub fn new(address: Address, sender: mpsc::Sender<ComponentRequest>) -> Self {
        Self { address, sender }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sends the one-time setup call.
    pub async fn initialize(&self, caller: Address, args: Vec<Value>) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ComponentRequest::Initialize {
                caller,
                args,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn call(
        &self,
        caller: Address,
        method: impl Into<String>,
        args: Vec<Value>,
    ) -> Result<Value, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ComponentRequest::Call {
                caller,
                method: method.into(),
                args,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn status(&self) -> Result<ComponentStatus, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ComponentRequest::Status { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}
