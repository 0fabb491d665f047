//! # Component Framework
//!
//! This crate hosts deployable components the way a chain hosts contracts: each component
//! lives at an [`Address`], runs in its own Tokio task, and is reached only through a
//! [`ComponentClient`] that sends it typed [`Value`] arguments.
//!
//! ## Why Actors for Components?
//!
//! - Isolated state (no shared memory, no locks)
//! - Sequential processing within each component, so setup and grants never race
//! - A real call boundary: the orchestrator can only see what a component answers,
//!   which is exactly the position a deployment script is in against an RPC node
//!
//! ## Architecture
//!
//! 1. **Component Layer** ([`Component`]) - The component's own logic: one-time setup and named calls
//! 2. **Runtime Layer** ([`ComponentActor`]) - Message processing and the "exactly once" setup rule
//! 3. **Interface Layer** ([`ComponentClient`]) - Type-erased, cloneable communication
//! 4. **Transport Layer** ([`LocalNetwork`]) - Address assignment, deploy and attach
//!
//! ## Deploying a Component
//!
//! ```rust
//! use component_framework::{Address, CallContext, Component, Factory, LocalNetwork, Value};
//! use async_trait::async_trait;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("token error")]
//! struct TokenError;
//!
//! #[derive(Default)]
//! struct Token { symbol: String }
//!
//! #[async_trait]
//! impl Component for Token {
//!     type Error = TokenError;
//!     fn kind(&self) -> &str { "Token" }
//!     async fn initialize(&mut self, _: &CallContext, args: Vec<Value>) -> Result<(), TokenError> {
//!         self.symbol = args.first().and_then(Value::as_str).ok_or(TokenError)?.to_string();
//!         Ok(())
//!     }
//!     async fn handle_call(&mut self, _: &CallContext, _: &str, _: Vec<Value>) -> Result<Value, TokenError> {
//!         Ok(Value::Str(self.symbol.clone()))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut network = LocalNetwork::new();
//!     let deployer = Address::derive("deployer");
//!     let factory = Factory::new("Token", Token::default);
//!
//!     let client = network.deploy(&factory, deployer).unwrap();
//!     client.initialize(deployer, vec!["CTDL".into()]).await.unwrap();
//!     assert_eq!(client.call(deployer, "symbol", vec![]).await.unwrap(), Value::from("CTDL"));
//!
//!     drop(client);
//!     network.shutdown().await.unwrap();
//! }
//! ```
//!
//! ## Testing
//!
//! See the [`mock`] module for a `MockClient` that answers requests from expectations.

pub mod actor;
pub mod address;
pub mod client;
pub mod component;
pub mod error;
pub mod factory;
pub mod message;
pub mod mock;
pub mod network;
pub mod tracing;
pub mod value;

// Re-export core types for convenience
pub use actor::ComponentActor;
pub use address::{Address, AddressParseError};
pub use client::ComponentClient;
pub use component::{CallContext, Component};
pub use error::FrameworkError;
pub use factory::{ComponentFactory, Factory, DEFAULT_BUFFER_SIZE};
pub use message::{ComponentRequest, ComponentStatus, Response};
pub use network::LocalNetwork;
pub use value::{Value, ValueKind};
