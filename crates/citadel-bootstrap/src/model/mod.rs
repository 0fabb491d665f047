//! Declarative inputs of a run: what to deploy, how to set it up, who gets which role.

pub mod component;
pub mod grant;
pub mod signers;
pub mod step;

pub use component::*;
pub use grant::*;
pub use signers::*;
pub use step::*;
