//! # Bootstrap Errors
//!
//! Every failure the orchestrator can report. All of them are fatal to the current run:
//! the run stops, records the error as the final report entry and returns it.

use component_framework::{Address, FrameworkError};
use std::fmt::{self, Display};
use thiserror::Error;

/// Result type alias for orchestrator operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;

/// What an unresolved argument pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Component(String),
    Parameter(String),
    Signer(String),
}

impl Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Component(name) => write!(f, "component `{name}`"),
            Reference::Parameter(name) => write!(f, "parameter `{name}`"),
            Reference::Signer(name) => write!(f, "signer `{name}`"),
        }
    }
}

/// Errors surfaced by a bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    /// A second component was registered under an existing name.
    #[error("component name already registered: {0}")]
    DuplicateName(String),

    /// A name was looked up that was never registered.
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    /// A step argument (or target) names something that does not exist.
    #[error("{step}: unresolved reference to {reference}")]
    UnresolvedReference { step: String, reference: Reference },

    /// The component reported that its one-time setup already ran.
    #[error("{component} is already initialized")]
    AlreadyInitialized { component: String },

    /// A dependency was used before it was initialized.
    #[error("{required_by}: {component} is not initialized")]
    ComponentNotInitialized {
        component: String,
        required_by: String,
    },

    /// A raw parameter violated its validity predicate.
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: String, reason: String },

    /// The acting authority may not grant the role.
    #[error("{authority} may not grant {role}")]
    UnauthorizedGrantor { role: String, authority: Address },

    /// Any other failure surfaced by a component call.
    #[error("call to {component} failed: {cause}")]
    ComponentCallFailed { component: String, cause: String },
}

impl BootstrapError {
    /// Maps a failed component call made on behalf of `step` against `component`.
    ///
    /// The component's own setup-state rejections keep their dedicated kinds; everything
    /// else (rejected arguments, missing authority, transport failure) becomes
    /// `ComponentCallFailed` with the underlying cause.
    pub fn from_call(component: &str, step: &str, err: FrameworkError) -> Self {
        match err {
            FrameworkError::AlreadyInitialized => BootstrapError::AlreadyInitialized {
                component: component.to_string(),
            },
            FrameworkError::NotInitialized => BootstrapError::ComponentNotInitialized {
                component: component.to_string(),
                required_by: step.to_string(),
            },
            other => BootstrapError::ComponentCallFailed {
                component: component.to_string(),
                cause: other.to_string(),
            },
        }
    }

    pub fn invalid_parameter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        BootstrapError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_call_keeps_setup_state_kinds() {
        assert_eq!(
            BootstrapError::from_call("gac", "initialize gac", FrameworkError::AlreadyInitialized),
            BootstrapError::AlreadyInitialized {
                component: "gac".into()
            }
        );
        assert_eq!(
            BootstrapError::from_call("locker", "locker.addReward", FrameworkError::NotInitialized),
            BootstrapError::ComponentNotInitialized {
                component: "locker".into(),
                required_by: "locker.addReward".into()
            }
        );
    }

    #[test]
    fn test_from_call_wraps_transport_failures() {
        let err = BootstrapError::from_call("citadel", "initialize citadel", FrameworkError::ActorClosed);
        assert_eq!(
            err,
            BootstrapError::ComponentCallFailed {
                component: "citadel".into(),
                cause: "Component closed".into()
            }
        );
        assert_eq!(err.to_string(), "call to citadel failed: Component closed");
    }

    #[test]
    fn test_unresolved_reference_names_step_and_target() {
        let err = BootstrapError::UnresolvedReference {
            step: "initialize xCitadel".into(),
            reference: Reference::Component("vester".into()),
        };
        assert_eq!(
            err.to_string(),
            "initialize xCitadel: unresolved reference to component `vester`"
        );
    }
}
