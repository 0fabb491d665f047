//! # Run Lifecycle
//!
//! A run goes through its phases strictly in order, each one consuming what the previous
//! one produced:
//!
//! 1. **Parameters** - the raw parameter table is resolved against the current time.
//!    Nothing is deployed if a parameter is invalid, so this phase never shows up in the
//!    report; the error is the whole outcome.
//! 2. **Inputs** - every parameter and signer the plan names is looked up. A missing
//!    one fails the run with a single report entry, still before anything is deployed.
//! 3. **Registry** - pre-existing assets are seeded (local runs only), then every
//!    component is deployed fresh or attached, one report entry each.
//! 4. **Definitions** - every step's component references are checked against the
//!    now-populated registry.
//! 5. **Initialization** - the [`Initializer`](crate::initializer::Initializer) runs the
//!    plan's steps in order.
//! 6. **Provisioning** - the [`RoleProvisioner`](crate::provisioning::RoleProvisioner)
//!    applies the grant set as the plan's authority.
//!
//! The first failure ends the run. [`Bootstrap::run`] hands back the registry once it exists,
//! so the caller can inspect the partially set-up components and then shut them down:
//!
//! ```rust,no_run
//! use citadel_bootstrap::config::BootstrapConfig;
//! use citadel_bootstrap::lifecycle::Bootstrap;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let bootstrap = Bootstrap::new(BootstrapConfig::local()?);
//! match bootstrap.run(chrono::Utc::now()).await {
//!     Ok(deployment) => {
//!         println!("{}", deployment.summary);
//!         deployment.registry.shutdown().await?;
//!     }
//!     Err(failure) => {
//!         eprintln!("{}", failure.summary);
//!         if let Some(registry) = failure.registry {
//!             registry.shutdown().await?;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;

pub use bootstrap::*;
