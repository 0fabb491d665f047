//! # Local Network
//!
//! The in-process transport components are deployed onto. It plays the part the RPC
//! node plays for a real deployment: it assigns addresses, keeps "code" (a live client)
//! per address, and lets callers attach to an address that already hosts something.

use crate::address::Address;
use crate::client::ComponentClient;
use crate::error::FrameworkError;
use crate::factory::ComponentFactory;
use std::collections::HashMap;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// In-process network of hosted components.
#[derive(Debug, Default)]
pub struct LocalNetwork {
    code: HashMap<Address, ComponentClient>,
    nonces: HashMap<Address, u64>,
    handles: Vec<JoinHandle<()>>,
}

impl LocalNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploys a fresh component from `deployer`; the address follows the deployer's nonce.
    pub fn deploy(
        &mut self,
        factory: &dyn ComponentFactory,
        deployer: Address,
    ) -> Result<ComponentClient, FrameworkError> {
        let nonce = self.nonces.entry(deployer).or_insert(0);
        let address = Address::create(deployer, *nonce);
        *nonce += 1;
        self.deploy_at(address, factory)
    }

    /// Deploys a component at a fixed address (genesis state, forked assets).
    pub fn deploy_at(
        &mut self,
        address: Address,
        factory: &dyn ComponentFactory,
    ) -> Result<ComponentClient, FrameworkError> {
        if self.code.contains_key(&address) {
            return Err(FrameworkError::AddressInUse(address));
        }
        let (client, handle) = factory.spawn(address);
        info!(kind = factory.kind(), %address, "Deployed");
        self.code.insert(address, client.clone());
        self.handles.push(handle);
        Ok(client)
    }

    /// Binds to whatever is hosted at `address`, without constructing anything.
    pub fn attach(&self, address: Address) -> Option<ComponentClient> {
        self.code.get(&address).cloned()
    }

    pub fn has_code(&self, address: Address) -> bool {
        self.code.contains_key(&address)
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Gracefully shuts down every hosted component.
    ///
    /// Dropping the network's clients closes the channels once every other clone is
    /// gone too; each actor then leaves its loop. Callers must drop their own clients
    /// first or this waits forever.
    pub async fn shutdown(self) -> Result<(), FrameworkError> {
        info!(components = self.code.len(), "Shutting down network...");
        drop(self.code);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Component task failed: {:?}", e);
                return Err(FrameworkError::TaskFailed(e.to_string()));
            }
        }

        info!("Network shutdown complete.");
        Ok(())
    }
}
