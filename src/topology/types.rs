//! Topology type definitions.
//!
//! This file contains the devices, links and document aggregate exchanged
//! between the ingestion front end, the allocator, the synthesizer and the
//! external topology renderer. Field names follow the JSON document shape
//! (`id`, `brand`, `type`, `source`, `target`, `network`, `source_ip`,
//! `target_ip`, `topology_name`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Placeholder stored in `network` until the allocator has run
pub const NETWORK_PLACEHOLDER: &str = "TBD";

/// Errors raised while reading typed values out of document text
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Invalid link endpoint '{0}': expected '<device_id>:<interface_name>'")]
    InvalidEndpoint(String),
}

/// Device vendor, resolved once from the document's `brand` text.
///
/// Known vendors are persisted in canonical lowercase; anything else keeps the
/// text it was loaded with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Vendor {
    Cisco,
    Arista,
    PaloAlto,
    /// Vendor outside the supported vocabulary
    Other(String),
}

impl Vendor {
    /// Resolve a free-text brand, ignoring case, spaces, hyphens and underscores
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "cisco" => Vendor::Cisco,
            "arista" => Vendor::Arista,
            "paloalto" | "pan" | "panos" => Vendor::PaloAlto,
            _ => Vendor::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Vendor::Cisco => "cisco",
            Vendor::Arista => "arista",
            Vendor::PaloAlto => "paloalto",
            Vendor::Other(raw) => raw,
        }
    }

    /// Returns true for vendors the synthesizer has a dialect for
    pub fn is_known(&self) -> bool {
        !matches!(self, Vendor::Other(_))
    }

    /// Re-resolve an `Other` built by hand, so `Other("CISCO")` becomes
    /// `Cisco` before it is persisted
    pub fn normalized(self) -> Self {
        match self {
            Vendor::Other(raw) => Vendor::parse(&raw),
            known => known,
        }
    }
}

impl From<String> for Vendor {
    fn from(raw: String) -> Self {
        Vendor::parse(&raw)
    }
}

impl From<Vendor> for String {
    fn from(vendor: Vendor) -> Self {
        vendor.as_str().to_string()
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability flags derived from a role label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub router: bool,
    pub switch: bool,
    pub firewall: bool,
}

impl Capabilities {
    /// Router or switch roles take part in dynamic routing
    pub fn routes(&self) -> bool {
        self.router || self.switch
    }
}

/// Device role: the label as written plus the capabilities it implies.
///
/// A label such as `"Router/Switch"` carries both the router and the switch
/// capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Role {
    label: String,
    capabilities: Capabilities,
}

impl Role {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let lowered = label.to_lowercase();
        let capabilities = Capabilities {
            router: lowered.contains("router"),
            switch: lowered.contains("switch"),
            firewall: lowered.contains("firewall"),
        };
        Self { label, capabilities }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }
}

impl From<String> for Role {
    fn from(label: String) -> Self {
        Role::new(label)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.label
    }
}

/// One end of a link: `"<device_id>:<interface_name>"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint {
    pub device: String,
    pub interface: String,
}

impl Endpoint {
    pub fn new(device: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            interface: interface.into(),
        }
    }

    /// Whether the endpoint survives its `dev:intf` text form unchanged:
    /// both parts non-empty, trimmed, and free of `:`
    pub fn is_well_formed(&self) -> bool {
        [&self.device, &self.interface]
            .iter()
            .all(|part| !part.is_empty() && !part.contains(':') && part.trim() == part.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(device), Some(interface), None) => {
                let (device, interface) = (device.trim(), interface.trim());
                if device.is_empty() || interface.is_empty() {
                    return Err(TopologyError::InvalidEndpoint(s.to_string()));
                }
                Ok(Endpoint::new(device, interface))
            }
            _ => Err(TopologyError::InvalidEndpoint(s.to_string())),
        }
    }
}

impl TryFrom<String> for Endpoint {
    type Error = TopologyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device, self.interface)
    }
}

/// A network device in the topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub brand: Vendor,
    #[serde(rename = "type", alias = "role")]
    pub role: Role,
    /// Keys this version does not interpret, kept for round-tripping
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    pub fn new(id: impl Into<String>, brand: Vendor, role: Role) -> Self {
        Self {
            id: id.into(),
            brand,
            role,
            extra: Map::new(),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.role.capabilities()
    }
}

/// Which end of a link a device sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Source => Side::Target,
            Side::Target => Side::Source,
        }
    }
}

/// A point-to-point connection between two device interfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: Endpoint,
    pub target: Endpoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ip: Option<String>,
    /// Keys this version does not interpret, kept for round-tripping
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Link {
    /// New unallocated link carrying the `TBD` network placeholder
    pub fn new(source: Endpoint, target: Endpoint) -> Self {
        Self {
            source,
            target,
            network: Some(NETWORK_PLACEHOLDER.to_string()),
            source_ip: None,
            target_ip: None,
            extra: Map::new(),
        }
    }

    pub fn endpoint(&self, side: Side) -> &Endpoint {
        match side {
            Side::Source => &self.source,
            Side::Target => &self.target,
        }
    }

    pub fn address(&self, side: Side) -> Option<&str> {
        match side {
            Side::Source => self.source_ip.as_deref(),
            Side::Target => self.target_ip.as_deref(),
        }
    }

    /// True once the allocator has written a subnet and both addresses
    pub fn is_allocated(&self) -> bool {
        let network_set = self
            .network
            .as_deref()
            .is_some_and(|n| !n.eq_ignore_ascii_case(NETWORK_PLACEHOLDER));
        network_set && self.source_ip.is_some() && self.target_ip.is_some()
    }
}

/// A node or link entry as stored in the document.
///
/// Entries that do not read as the typed record are kept verbatim so that
/// re-saving the document never drops data; the pipeline passes skip them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry<T> {
    Valid(T),
    Malformed(Value),
}

impl<T> Entry<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Entry::Valid(item) => Some(item),
            Entry::Malformed(_) => None,
        }
    }

    pub fn valid_mut(&mut self) -> Option<&mut T> {
        match self {
            Entry::Valid(item) => Some(item),
            Entry::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Entry::Malformed(_))
    }
}

/// The persisted topology aggregate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopologyDocument {
    #[serde(rename = "topology_name", alias = "name", default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Entry<Device>>,
    #[serde(default)]
    pub links: Vec<Entry<Link>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TopologyDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Well-formed devices in document order
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.nodes.iter().filter_map(Entry::valid)
    }

    /// Well-formed links in document order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter_map(Entry::valid)
    }

    /// First device with the given id
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices().find(|device| device.id == id)
    }

    pub fn malformed_nodes(&self) -> usize {
        self.nodes.iter().filter(|entry| entry.is_malformed()).count()
    }

    pub fn malformed_links(&self) -> usize {
        self.links.iter().filter(|entry| entry.is_malformed()).count()
    }
}
