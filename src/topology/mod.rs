//! Network topology module.
//!
//! This module contains the topology document model shared by every pipeline
//! stage, and the thin store that loads and saves it as JSON.

pub mod types;
pub mod model;
pub mod store;

// Re-export key types and functions for easier access
pub use types::{
    Capabilities, Device, Endpoint, Entry, Link, Role, Side, TopologyDocument, TopologyError, Vendor,
    NETWORK_PLACEHOLDER,
};
pub use model::TopologyModel;
pub use store::{load_document, save_document, StoreError};
