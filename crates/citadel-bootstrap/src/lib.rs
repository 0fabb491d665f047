//! # Citadel Bootstrap
//!
//! Dependency-ordered initialization and role provisioning for a fresh Citadel protocol
//! deployment.
//!
//! ## Modules
//!
//! - **[model]**: Declarative run inputs: component specs, initialization steps with
//!   typed argument expressions, role grants and the signer table.
//! - **[registry]**: The name-keyed owner of every component instance of a run.
//! - **[params]**: Pure resolution and validation of the raw parameter table.
//! - **[initializer]**: Runs setup steps in plan order, enforcing that dependencies are
//!   initialized first.
//! - **[provisioning]**: Applies role grants at the access-control component.
//! - **[report]**: The append-only audit trail of a run.
//! - **[lifecycle]**: Ties the phases together into one [`Bootstrap`](lifecycle::Bootstrap) run.
//! - **[contracts]** / **[plan]** / **[config]**: The Citadel components, the concrete
//!   deployment plan and its TOML configuration.
//!
//! ## Testing
//!
//! See [`component_framework::mock`] for a component double that injects failures.

pub mod clients;
pub mod config;
pub mod contracts;
pub mod error;
pub mod initializer;
pub mod lifecycle;
pub mod model;
pub mod params;
pub mod plan;
pub mod provisioning;
pub mod registry;
pub mod report;

pub use error::{BootstrapError, Result};
