//! consul-demo core: service identity, layered key paths, and the error type.
//!
//! This crate holds the pieces shared by the service and its tests that do not
//! depend on a runtime, an HTTP stack, or a live Consul agent.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Bad environment input surfaces as `DemoError`, never as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod identity;
pub mod keys;

/// Shared result type.
pub use error::{DemoError, Result};
pub use identity::ServiceIdentity;
pub use keys::Layer;
