//! Top-level facade crate for consul-demo.
//!
//! Re-exports the core types and the service library so users can depend on a single crate.

pub mod core {
    pub use consul_demo_core::*;
}

pub mod service {
    pub use consul_demo_service::*;
}
