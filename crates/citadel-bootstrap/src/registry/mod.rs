//! # Component Registry
//!
//! The registry owns every component instance of a run. Other code never keeps a
//! client around; it looks components up by name when it needs them, so an instance
//! can only ever be reached through the registry that created it.

use crate::error::{BootstrapError, Result};
use crate::model::{ComponentSpec, Origin, Source};
use component_framework::{Address, ComponentClient, FrameworkError, LocalNetwork};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// A registered, addressable component.
#[derive(Debug)]
pub struct ComponentInstance {
    pub name: String,
    /// Component kind for fresh deployments; attached components are opaque.
    pub kind: Option<String>,
    pub address: Address,
    pub origin: Origin,
    /// `None` for an attached address nothing is hosted at (an externally managed
    /// asset). Such components cannot be called and count as initialized.
    client: Option<ComponentClient>,
}

impl ComponentInstance {
    pub fn client(&self) -> Option<&ComponentClient> {
        self.client.as_ref()
    }

    /// Asks the component whether its one-time setup has run.
    pub async fn is_initialized(&self) -> std::result::Result<bool, FrameworkError> {
        match &self.client {
            Some(client) => Ok(client.status().await?.initialized),
            None => Ok(true),
        }
    }
}

/// Name-keyed set of the run's component instances.
#[derive(Debug)]
pub struct Registry {
    network: LocalNetwork,
    deployer: Address,
    instances: Vec<ComponentInstance>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Creates an empty registry deploying onto `network` as `deployer`.
    pub fn new(network: LocalNetwork, deployer: Address) -> Self {
        Self {
            network,
            deployer,
            instances: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates an empty registry on a fresh local network.
    pub fn local(deployer: Address) -> Self {
        Self::new(LocalNetwork::new(), deployer)
    }

    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// Creates (fresh) or binds (attached) the instance and stores it under `spec.name`.
    pub fn register(&mut self, spec: ComponentSpec) -> Result<&ComponentInstance> {
        if self.index.contains_key(&spec.name) {
            return Err(BootstrapError::DuplicateName(spec.name));
        }

        let instance = match spec.source {
            Source::Fresh(factory) => {
                let client = self
                    .network
                    .deploy(factory.as_ref(), self.deployer)
                    .map_err(|e| BootstrapError::ComponentCallFailed {
                        component: spec.name.clone(),
                        cause: e.to_string(),
                    })?;
                info!(name = %spec.name, kind = factory.kind(), address = %client.address(), "Registered fresh component");
                ComponentInstance {
                    name: spec.name,
                    kind: Some(factory.kind().to_string()),
                    address: client.address(),
                    origin: Origin::Fresh,
                    client: Some(client),
                }
            }
            Source::Attached(address) => {
                let client = self.network.attach(address);
                info!(name = %spec.name, %address, hosted = client.is_some(), "Attached component");
                ComponentInstance {
                    name: spec.name,
                    kind: None,
                    address,
                    origin: Origin::Attached,
                    client,
                }
            }
        };

        let slot = self.instances.len();
        self.index.insert(instance.name.clone(), slot);
        self.instances.push(instance);
        Ok(&self.instances[slot])
    }

    pub fn get(&self, name: &str) -> Option<&ComponentInstance> {
        self.index.get(name).map(|&slot| &self.instances[slot])
    }

    /// Looks up a previously registered instance.
    pub fn resolve(&self, name: &str) -> Result<&ComponentInstance> {
        self.get(name)
            .ok_or_else(|| BootstrapError::UnknownComponent(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instances.iter().map(|instance| instance.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Name to address map for downstream tooling.
    pub fn manifest(&self) -> BTreeMap<String, Address> {
        self.instances
            .iter()
            .map(|instance| (instance.name.clone(), instance.address))
            .collect()
    }

    /// The underlying network, for seeding pre-existing components before a run.
    pub fn network_mut(&mut self) -> &mut LocalNetwork {
        &mut self.network
    }

    /// Drops every client and waits for all hosted components to stop.
    pub async fn shutdown(self) -> std::result::Result<(), FrameworkError> {
        debug!(components = self.instances.len(), "Shutting down registry");
        drop(self.instances);
        self.network.shutdown().await
    }
}
