//! Component specs: what to register, and whether to build it or bind to it.

use component_framework::{Address, ComponentFactory};
use serde::Serialize;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Where a component comes from: built fresh, or bound to an existing address.
#[derive(Clone)]
pub enum Source {
    /// Construct a new instance with this factory.
    Fresh(Arc<dyn ComponentFactory>),
    /// Bind to something that already lives at this address.
    Attached(Address),
}

impl Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Fresh(factory) => f.debug_tuple("Fresh").field(&factory.kind()).finish(),
            Source::Attached(address) => f.debug_tuple("Attached").field(address).finish(),
        }
    }
}

/// One component to register, under a logical name unique within the run.
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    pub name: String,
    pub source: Source,
}

impl ComponentSpec {
    pub fn fresh(name: impl Into<String>, factory: Arc<dyn ComponentFactory>) -> Self {
        Self {
            name: name.into(),
            source: Source::Fresh(factory),
        }
    }

    pub fn attached(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            source: Source::Attached(address),
        }
    }
}

/// How a registered instance came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Fresh,
    Attached,
}
