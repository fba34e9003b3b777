//! Per-device link resolution.
//!
//! Groups every link end by the device it belongs to, so each device sees the
//! interfaces it has to configure and who sits on the other side. Matching is
//! on the exact device id (`R1` never picks up `R10`'s links).

use std::collections::{HashMap, HashSet};

use crate::topology::{Endpoint, Side, TopologyDocument};

/// Whether the far end of a link names a device present in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerStatus {
    Known,
    Unknown,
}

/// One local interface to configure on a device
#[derive(Debug, Clone, PartialEq)]
pub struct InterfacePlan<'a> {
    pub interface: &'a str,
    /// Allocated address of the local end, if the allocator has run
    pub address: Option<&'a str>,
    pub peer: &'a Endpoint,
    pub peer_status: PeerStatus,
}

impl InterfacePlan<'_> {
    /// Interface description naming the far end, e.g. `Connected_to_R2_Gi0/0`
    pub fn description(&self) -> String {
        format!("Connected_to_{}_{}", self.peer.device, self.peer.interface)
    }
}

/// Interface plans of every device, in link order
#[derive(Debug, Default)]
pub struct LinkIndex<'a> {
    by_device: HashMap<&'a str, Vec<InterfacePlan<'a>>>,
}

impl<'a> LinkIndex<'a> {
    pub fn build(document: &'a TopologyDocument) -> Self {
        let known: HashSet<&str> = document.devices().map(|d| d.id.as_str()).collect();
        let mut by_device: HashMap<&'a str, Vec<InterfacePlan<'a>>> = HashMap::new();

        for link in document.links() {
            for side in [Side::Source, Side::Target] {
                let local = link.endpoint(side);
                let peer = link.endpoint(side.opposite());
                let peer_status = if known.contains(peer.device.as_str()) {
                    PeerStatus::Known
                } else {
                    PeerStatus::Unknown
                };

                if peer_status == PeerStatus::Unknown && known.contains(local.device.as_str()) {
                    log::warn!(
                        "{}: link {} -> {} refers to unknown device '{}'",
                        local.device,
                        local,
                        peer,
                        peer.device
                    );
                }

                by_device
                    .entry(local.device.as_str())
                    .or_default()
                    .push(InterfacePlan {
                        interface: &local.interface,
                        address: link.address(side),
                        peer,
                        peer_status,
                    });
            }
        }

        Self { by_device }
    }

    /// Interfaces of one device; empty if it has no links
    pub fn interfaces(&self, device_id: &str) -> &[InterfacePlan<'a>] {
        self.by_device
            .get(device_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> TopologyDocument {
        serde_json::from_value(json!({
            "topology_name": "lab",
            "nodes": [
                {"id": "R1", "brand": "cisco", "type": "router"},
                {"id": "R10", "brand": "cisco", "type": "router"},
                {"id": "R2", "brand": "cisco", "type": "router"}
            ],
            "links": [
                {"source": "R1:Gi0/0", "target": "R2:Gi0/0", "network": "192.168.12.0/30",
                 "source_ip": "192.168.12.1", "target_ip": "192.168.12.2"},
                {"source": "R10:Gi0/0", "target": "R2:Gi0/1"},
                {"source": "R1:Gi0/1", "target": "R9:Gi0/0"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_exact_device_match() {
        let document = document();
        let index = LinkIndex::build(&document);

        let r1: Vec<&str> = index.interfaces("R1").iter().map(|p| p.interface).collect();
        assert_eq!(r1, vec!["Gi0/0", "Gi0/1"]);
        assert_eq!(index.interfaces("R10").len(), 1);
        assert_eq!(index.interfaces("R2").len(), 2);
        assert!(index.interfaces("R3").is_empty());
    }

    #[test]
    fn test_local_and_peer_addresses() {
        let document = document();
        let index = LinkIndex::build(&document);

        let plan = &index.interfaces("R2")[0];
        assert_eq!(plan.address, Some("192.168.12.2"));
        assert_eq!(plan.peer.to_string(), "R1:Gi0/0");
        assert_eq!(plan.peer_status, PeerStatus::Known);
        assert_eq!(plan.description(), "Connected_to_R1_Gi0/0");

        let unallocated = &index.interfaces("R2")[1];
        assert_eq!(unallocated.address, None);
    }

    #[test]
    fn test_unknown_peer_gets_placeholder() {
        let document = document();
        let index = LinkIndex::build(&document);

        let plan = &index.interfaces("R1")[1];
        assert_eq!(plan.peer_status, PeerStatus::Unknown);
        assert_eq!(plan.description(), "Connected_to_R9_Gi0/0");
    }
}
