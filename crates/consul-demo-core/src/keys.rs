//! Layered configuration keys.
//!
//! Lookups run lowest priority first; a later layer that has a value
//! overwrites whatever an earlier one produced.

use crate::identity::ServiceIdentity;

pub const GLOBAL_MESSAGE_KEY: &str = "config/global/message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Global,
    Region,
    Service,
}

impl Layer {
    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Global => "global",
            Layer::Region => "region",
            Layer::Service => "service",
        }
    }
}

pub fn region_message_key(region: &str) -> String {
    format!("config/region/{region}/message")
}

pub fn service_message_key(service_id: &str) -> String {
    format!("config/service/{service_id}/message")
}

/// Keys to read for `identity`, in priority order (global, region, service).
/// The region layer is skipped when no region is known.
pub fn layered_keys(identity: &ServiceIdentity) -> Vec<(Layer, String)> {
    let mut keys = Vec::with_capacity(3);
    keys.push((Layer::Global, GLOBAL_MESSAGE_KEY.to_string()));
    if !identity.region.is_empty() {
        keys.push((Layer::Region, region_message_key(&identity.region)));
    }
    keys.push((Layer::Service, service_message_key(&identity.service_id())));
    keys
}
