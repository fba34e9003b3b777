//! In-memory topology model.
//!
//! The model owns a [`TopologyDocument`] while it is being built up by the
//! ingestion front end. Id uniqueness is not enforced here; duplicates are
//! reported by document validation.

use super::store::{self, StoreError};
use super::types::{Device, Entry, Link, TopologyDocument};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopologyModel {
    document: TopologyDocument,
}

impl TopologyModel {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            document: TopologyDocument::new(project_name),
        }
    }

    pub fn from_document(document: TopologyDocument) -> Self {
        Self { document }
    }

    /// Append a device. Devices with an empty id are ignored; the vendor is
    /// normalized so the device reads back the way it was stored.
    pub fn add_node(&mut self, mut device: Device) -> bool {
        if device.id.trim().is_empty() {
            log::debug!("Ignoring device with empty id");
            return false;
        }
        device.brand = device.brand.normalized();
        self.document.nodes.push(Entry::Valid(device));
        true
    }

    /// Append a link. Links with an endpoint that would not read back from
    /// its `dev:intf` form (empty part, `:` inside a part, padding) are ignored.
    pub fn add_link(&mut self, link: Link) -> bool {
        if !link.source.is_well_formed() || !link.target.is_well_formed() {
            log::warn!("Ignoring link {} <-> {}: malformed endpoint", link.source, link.target);
            return false;
        }
        self.document.links.push(Entry::Valid(link));
        true
    }

    pub fn document(&self) -> &TopologyDocument {
        &self.document
    }

    pub fn into_document(self) -> TopologyDocument {
        self.document
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        store::save_document(path, &self.document)
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        store::load_document(path).map(Self::from_document)
    }
}
