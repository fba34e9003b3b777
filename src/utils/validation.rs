//! Topology document validation.
//!
//! This module reports data-quality problems in a loaded document. Nothing
//! here rejects a document: the pipeline degrades locally around each
//! finding, and callers decide whether a finding matters.

use crate::ip::extract_designator;
use crate::topology::TopologyDocument;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A single data-quality finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentIssue {
    /// More than one node uses this id
    DuplicateDeviceId(String),
    /// A link endpoint names a device that is not in `nodes`
    UnknownEndpoint { link_index: usize, endpoint: String },
    /// Linked devices that share a designator and so share addresses
    SharedDesignator { designator: u32, devices: Vec<String> },
    /// No configuration dialect exists for this vendor
    UnknownVendor { device: String, brand: String },
    /// Node entries that could not be read as devices
    MalformedNodes(usize),
    /// Link entries that could not be read as links
    MalformedLinks(usize),
}

impl fmt::Display for DocumentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentIssue::DuplicateDeviceId(id) => write!(f, "device id '{}' is used more than once", id),
            DocumentIssue::UnknownEndpoint { link_index, endpoint } => {
                write!(f, "link #{}: endpoint '{}' refers to an unknown device", link_index, endpoint)
            }
            DocumentIssue::SharedDesignator { designator, devices } => write!(
                f,
                "devices {} share designator {} and will receive overlapping addresses",
                devices.join(", "),
                designator
            ),
            DocumentIssue::UnknownVendor { device, brand } => {
                write!(f, "device '{}' has unsupported vendor '{}'", device, brand)
            }
            DocumentIssue::MalformedNodes(count) => write!(f, "{} malformed node entr(y/ies) skipped", count),
            DocumentIssue::MalformedLinks(count) => write!(f, "{} malformed link entr(y/ies) skipped", count),
        }
    }
}

/// All findings for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<DocumentIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Log every finding at warn level
    pub fn log_warnings(&self) {
        for issue in &self.issues {
            log::warn!("{}", issue);
        }
    }
}

/// Validate a topology document
///
/// Checks for:
/// - Duplicate device ids
/// - Link endpoints naming devices that do not exist
/// - Linked devices sharing a designator
/// - Vendors without a configuration dialect
/// - Malformed node and link entries
pub fn validate_document(document: &TopologyDocument) -> ValidationReport {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for device in document.devices() {
        if !seen.insert(device.id.as_str()) && reported.insert(device.id.as_str()) {
            issues.push(DocumentIssue::DuplicateDeviceId(device.id.clone()));
        }
    }

    let mut linked = HashSet::new();
    for (index, entry) in document.links.iter().enumerate() {
        let Some(link) = entry.valid() else { continue };
        for endpoint in [&link.source, &link.target] {
            if seen.contains(endpoint.device.as_str()) {
                linked.insert(endpoint.device.as_str());
            } else {
                issues.push(DocumentIssue::UnknownEndpoint {
                    link_index: index,
                    endpoint: endpoint.to_string(),
                });
            }
        }
    }

    let mut by_designator: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    let mut grouped = HashSet::new();
    for device in document.devices() {
        if linked.contains(device.id.as_str()) && grouped.insert(device.id.as_str()) {
            by_designator
                .entry(extract_designator(&device.id))
                .or_default()
                .push(device.id.clone());
        }
    }
    for (designator, devices) in by_designator {
        if devices.len() > 1 {
            issues.push(DocumentIssue::SharedDesignator { designator, devices });
        }
    }

    for device in document.devices() {
        if !device.brand.is_known() {
            issues.push(DocumentIssue::UnknownVendor {
                device: device.id.clone(),
                brand: device.brand.to_string(),
            });
        }
    }

    match document.malformed_nodes() {
        0 => {}
        count => issues.push(DocumentIssue::MalformedNodes(count)),
    }
    match document.malformed_links() {
        0 => {}
        count => issues.push(DocumentIssue::MalformedLinks(count)),
    }

    if issues.is_empty() {
        log::debug!(
            "Topology '{}' validated: {} device(s), {} link(s)",
            document.name,
            seen.len(),
            document.links().count()
        );
    }

    ValidationReport { issues }
}
