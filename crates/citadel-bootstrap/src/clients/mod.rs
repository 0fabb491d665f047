//! Typed wrappers over [`ComponentClient`](component_framework::ComponentClient) for the
//! components the orchestrator talks to beyond their setup call.

pub mod access_control;

pub use access_control::AccessControlClient;
