//! # Mock Components & Testing Guide
//!
//! The `MockClient` type stands in for a hosted component. It answers Initialize / Call /
//! Status requests from a queue of expectations, so tests can inject failures that are
//! hard to provoke with real components (a dropped transport, a component that rejects
//! its arguments, a component that claims it is already initialized).
//!
//! ## When to use Mocks vs Real Components
//!
//! | Feature | MockClient | Real Component |
//! |---------|------------|----------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **State** | No real state (expectations) | Real setup/role state |
//! | **Use Case** | Failure injection, argument capture | Ordering and idempotence flows |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires specific state) |
//!
//! ## Example
//!
//! ```rust
//! use component_framework::mock::MockClient;
//! use component_framework::{Address, FrameworkError, Value};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::new("Token");
//!     mock.expect_initialize().return_ok();
//!     mock.expect_call("mint").return_err(FrameworkError::ActorClosed);
//!
//!     let client = mock.client();
//!     let caller = Address::derive("governance");
//!     client.initialize(caller, vec![Value::from("CTDL")]).await.unwrap();
//!     assert!(client.call(caller, "mint", vec![]).await.is_err());
//!
//!     mock.verify();
//!     assert_eq!(mock.received()[0].args, vec![Value::from("CTDL")]);
//! }
//! ```
//!
//! ## Plugging a Mock into a Deployment
//!
//! [`MockClient::factory`] returns a [`ComponentFactory`] that hands out this mock no
//! matter which address the network picks, so the mock can be registered like any fresh
//! component.

use crate::address::Address;
use crate::client::ComponentClient;
use crate::error::FrameworkError;
use crate::factory::ComponentFactory;
use crate::message::{ComponentRequest, ComponentStatus};
use crate::value::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock client.
enum Expectation {
    Initialize {
        response: Result<(), FrameworkError>,
    },
    Call {
        method: String,
        response: Result<Value, FrameworkError>,
    },
    Status {
        response: Result<ComponentStatus, FrameworkError>,
    },
}

/// A request the mock received, kept for argument assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedRequest {
    /// `"initialize"`, the call's method name, or `"status"`.
    pub method: String,
    pub caller: Option<Address>,
    pub args: Vec<Value>,
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A mock component with expectation tracking for fluent testing.
pub struct MockClient {
    kind: String,
    address: Address,
    sender: mpsc::Sender<ComponentRequest>,
    expectations: Expectations,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    _handle: JoinHandle<()>,
}

impl MockClient {
    /// Creates a new mock with no expectations.
    pub fn new(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        let (sender, mut receiver) = mpsc::channel::<ComponentRequest>(100);
        let expectations: Expectations = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let received_clone = received.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        ComponentRequest::Initialize {
                            caller,
                            args,
                            respond_to,
                        },
                        Some(Expectation::Initialize { response }),
                    ) => {
                        received_clone.lock().unwrap().push(ReceivedRequest {
                            method: "initialize".to_string(),
                            caller: Some(caller),
                            args,
                        });
                        let _ = respond_to.send(response);
                    }
                    (
                        ComponentRequest::Call {
                            caller,
                            method,
                            args,
                            respond_to,
                        },
                        Some(Expectation::Call {
                            method: expected,
                            response,
                        }),
                    ) if method == expected => {
                        received_clone.lock().unwrap().push(ReceivedRequest {
                            method,
                            caller: Some(caller),
                            args,
                        });
                        let _ = respond_to.send(response);
                    }
                    (
                        ComponentRequest::Status { respond_to },
                        Some(Expectation::Status { response }),
                    ) => {
                        received_clone.lock().unwrap().push(ReceivedRequest {
                            method: "status".to_string(),
                            caller: None,
                            args: Vec::new(),
                        });
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            kind,
            address: Address::derive("mock"),
            sender,
            expectations,
            received,
            _handle: handle,
        }
    }

    /// Returns a client for use in tests.
    pub fn client(&self) -> ComponentClient {
        ComponentClient::new(self.address, self.sender.clone())
    }

    /// Returns a factory that deploys this mock at whatever address it is given.
    pub fn factory(&self) -> Arc<dyn ComponentFactory> {
        Arc::new(MockFactory {
            kind: self.kind.clone(),
            sender: self.sender.clone(),
        })
    }

    /// Expects an `initialize` request.
    pub fn expect_initialize(&mut self) -> InitializeExpectationBuilder {
        InitializeExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `call` request for `method`.
    pub fn expect_call(&mut self, method: impl Into<String>) -> CallExpectationBuilder {
        CallExpectationBuilder {
            method: method.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `status` request.
    pub fn expect_status(&mut self) -> StatusExpectationBuilder {
        StatusExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Requests received so far, in order.
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

struct MockFactory {
    kind: String,
    sender: mpsc::Sender<ComponentRequest>,
}

impl ComponentFactory for MockFactory {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn spawn(&self, address: Address) -> (ComponentClient, JoinHandle<()>) {
        let client = ComponentClient::new(address, self.sender.clone());
        (client, tokio::spawn(async {}))
    }
}

/// Builder for `initialize` expectations.
pub struct InitializeExpectationBuilder {
    expectations: Expectations,
}

impl InitializeExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Initialize { response: Ok(()) });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Initialize {
            response: Err(error),
        });
    }
}

/// Builder for `call` expectations.
pub struct CallExpectationBuilder {
    method: String,
    expectations: Expectations,
}

impl CallExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: Value) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Call {
            method: self.method,
            response: Ok(value),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Call {
            method: self.method,
            response: Err(error),
        });
    }
}

/// Builder for `status` expectations.
pub struct StatusExpectationBuilder {
    expectations: Expectations,
}

impl StatusExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, status: ComponentStatus) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Status {
            response: Ok(status),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Status {
            response: Err(error),
        });
    }
}
