//! Configuration synthesis module.
//!
//! Turns each device of an address-annotated topology document into an
//! ordered list of vendor configuration statements. Sections are always
//! emitted in the same order:
//!
//! 1. identity and hardening
//! 2. loopback
//! 3. one block per link interface
//! 4. dynamic routing (router/switch roles only)
//! 5. perimeter policy
//!
//! Each vendor [`Dialect`] fills in the sections it supports. Devices render
//! independently, so a document is rendered in parallel.

pub mod artifact;
pub mod dialect;
pub mod ios;
pub mod panos;
pub mod resolve;

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::config::{Strictness, SynthesisConfig};
use crate::ip::extract_designator;
use crate::topology::{Device, TopologyDocument};

pub use artifact::{write_artifacts, Artifact};
pub use dialect::{dialect_for, DeviceContext, Dialect};
pub use resolve::{InterfacePlan, LinkIndex, PeerStatus};

/// Errors that stop a synthesis run
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("Device '{device}' has unsupported vendor '{brand}'")]
    UnknownVendor { device: String, brand: String },
}

pub struct Synthesizer<'a> {
    config: &'a SynthesisConfig,
}

impl<'a> Synthesizer<'a> {
    pub fn new(config: &'a SynthesisConfig) -> Self {
        Self { config }
    }

    /// Render one device given the interfaces resolved for it
    pub fn render_device(
        &self,
        device: &Device,
        interfaces: &[InterfacePlan<'_>],
    ) -> Result<Artifact, SynthesisError> {
        let Some(dialect) = dialect_for(&device.brand) else {
            return match self.config.strictness {
                Strictness::Strict => Err(SynthesisError::UnknownVendor {
                    device: device.id.clone(),
                    brand: device.brand.to_string(),
                }),
                Strictness::Permissive => {
                    log::warn!(
                        "{}: no configuration dialect for vendor '{}', emitting an empty artifact",
                        device.id,
                        device.brand
                    );
                    Ok(Artifact::empty(&device.id))
                }
            };
        };

        let ctx = DeviceContext {
            device,
            designator: extract_designator(&device.id),
            config: self.config,
        };
        let mut statements = Vec::new();

        dialect.identity(&ctx, &mut statements);
        dialect.loopback(&ctx, &mut statements);
        for plan in interfaces {
            if plan.address.is_none() {
                log::warn!(
                    "{}: interface {} has no allocated address, run allocation first",
                    device.id,
                    plan.interface
                );
            }
            dialect.interface(&ctx, plan, &mut statements);
        }
        if device.capabilities().routes() {
            dialect.routing(&ctx, &mut statements);
        }
        dialect.perimeter(&ctx, &mut statements);

        log::debug!(
            "{}: rendered {} statement(s) with {} dialect",
            device.id,
            statements.len(),
            dialect.name()
        );

        Ok(Artifact {
            device_id: device.id.clone(),
            statements,
        })
    }

    /// Render every device of the document, in document order.
    ///
    /// A device id that appears more than once is rendered for its first
    /// occurrence only, and so is a device whose artifact file name is
    /// already taken by an earlier device (`S/1` and `S_1` both map to
    /// `S_1.txt`).
    pub fn render_document(&self, document: &TopologyDocument) -> Result<Vec<Artifact>, SynthesisError> {
        let index = LinkIndex::build(document);

        let mut seen = HashSet::new();
        let mut file_owners: HashMap<String, &str> = HashMap::new();
        let devices: Vec<&Device> = document
            .devices()
            .filter(|device| {
                if !seen.insert(device.id.as_str()) {
                    log::warn!("Duplicate device id '{}', rendering its first entry only", device.id);
                    return false;
                }
                let file_name = Artifact::empty(&device.id).file_name();
                if let Some(owner) = file_owners.get(&file_name) {
                    log::warn!(
                        "Device '{}' maps to {} already used by device '{}', skipping it",
                        device.id,
                        file_name,
                        owner
                    );
                    return false;
                }
                file_owners.insert(file_name, device.id.as_str());
                true
            })
            .collect();

        log::info!("Rendering configuration for {} device(s)", devices.len());

        devices
            .par_iter()
            .map(|device| self.render_device(device, index.interfaces(&device.id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn allocated_document() -> TopologyDocument {
        serde_json::from_value(json!({
            "topology_name": "lab",
            "nodes": [
                {"id": "R1", "brand": "cisco", "type": "Router"},
                {"id": "R2", "brand": "arista", "type": "Router/Switch"},
                {"id": "FW3", "brand": "paloalto", "type": "Firewall"},
                {"id": "J4", "brand": "juniper", "type": "Router"}
            ],
            "links": [
                {"source": "R1:Gi0/0", "target": "R2:Et1", "network": "192.168.12.0/30",
                 "source_ip": "192.168.12.1", "target_ip": "192.168.12.2"},
                {"source": "R1:Gi0/1", "target": "FW3:ethernet1/1", "network": "192.168.13.0/30",
                 "source_ip": "192.168.13.1", "target_ip": "192.168.13.3"}
            ]
        }))
        .unwrap()
    }

    fn render(document: &TopologyDocument, id: &str, config: &SynthesisConfig) -> Artifact {
        let index = LinkIndex::build(document);
        let device = document.device(id).unwrap();
        Synthesizer::new(config)
            .render_device(device, index.interfaces(id))
            .unwrap()
    }

    fn position(artifact: &Artifact, statement: &str) -> usize {
        artifact
            .statements
            .iter()
            .position(|s| s == statement)
            .unwrap_or_else(|| panic!("missing statement {:?}", statement))
    }

    #[test]
    fn test_cisco_router_section_order() {
        let document = allocated_document();
        let artifact = render(&document, "R1", &SynthesisConfig::default());

        let hostname = position(&artifact, "hostname R1");
        let vty = position(&artifact, "line vty 0 15");
        let loopback = position(&artifact, "interface Loopback0");
        let first_if = position(&artifact, "interface Gi0/0");
        let second_if = position(&artifact, "interface Gi0/1");
        let ospf = position(&artifact, "router ospf 1");

        assert_eq!(hostname, 0);
        assert!(hostname < vty);
        assert!(vty < loopback);
        assert!(loopback < first_if);
        assert!(first_if < second_if);
        assert!(second_if < ospf);
        assert_eq!(artifact.statements.last().map(String::as_str), Some("exit"));
    }

    #[test]
    fn test_cisco_router_statements() {
        let document = allocated_document();
        let artifact = render(&document, "R1", &SynthesisConfig::default());
        let text = artifact.text();

        assert!(text.contains(" ip address 1.1.1.1 255.255.255.255"));
        assert!(text.contains(
            "interface Gi0/0\n description Connected_to_R2_Et1\n ip address 192.168.12.1 255.255.255.252\n no shutdown\nexit"
        ));
        assert!(text.contains(" router-id 1.1.1.1\n network 0.0.0.0 255.255.255.255 area 0\nexit"));
        assert!(text.contains(" transport input ssh"));
        assert!(text.contains("snmp-server host 192.168.100.3 version 2c public"));
        assert!(!text.contains("set "));
    }

    #[test]
    fn test_arista_uses_prefix_network_statement() {
        let document = allocated_document();
        let artifact = render(&document, "R2", &SynthesisConfig::default());
        let text = artifact.text();

        assert!(text.contains(" ip address 2.2.2.2 255.255.255.255"));
        assert!(text.contains(" ip address 192.168.12.2 255.255.255.252"));
        assert!(text.contains(" network 0.0.0.0/0 area 0"));
        assert!(!text.contains("255.255.255.255 area"));
    }

    #[test]
    fn test_paloalto_firewall() {
        let document = allocated_document();
        let artifact = render(&document, "FW3", &SynthesisConfig::default());

        assert_eq!(
            artifact.statements,
            vec![
                "set network interface ethernet ethernet1/1 layer3 ip 192.168.13.3/30",
                "set network interface ethernet ethernet1/1 comment Connected_to_R1_Gi0/1",
                "set deviceconfig system hostname FW3",
                "set deviceconfig system timezone US/Pacific",
                "set deviceconfig system ntp-servers primary-ntp address 192.168.100.1",
                "set mgt-config users admin password Admin@1234",
                "set mgt-config users admin permissions role-based superuser yes",
                "set rulebase security rules Trust-to-Untrust service [ service-http service-https ] action allow",
            ]
        );
    }

    #[test]
    fn test_non_routing_role_skips_ospf() {
        let document: TopologyDocument = serde_json::from_value(json!({
            "topology_name": "lab",
            "nodes": [{"id": "FW5", "brand": "cisco", "type": "firewall"}],
            "links": []
        }))
        .unwrap();
        let artifact = render(&document, "FW5", &SynthesisConfig::default());

        assert!(artifact.statements.contains(&"interface Loopback0".to_string()));
        assert!(!artifact.text().contains("router ospf"));
    }

    #[test]
    fn test_unknown_vendor_permissive_is_empty() {
        let document = allocated_document();
        let artifact = render(&document, "J4", &SynthesisConfig::default());
        assert!(artifact.is_empty());
    }

    #[test]
    fn test_unknown_vendor_strict_fails() {
        let document = allocated_document();
        let config = SynthesisConfig {
            strictness: Strictness::Strict,
            ..SynthesisConfig::default()
        };
        let err = Synthesizer::new(&config).render_document(&document).unwrap_err();
        assert!(matches!(err, SynthesisError::UnknownVendor { ref device, .. } if device == "J4"));
    }

    #[test]
    fn test_unallocated_interface_has_no_address() {
        let document: TopologyDocument = serde_json::from_value(json!({
            "topology_name": "lab",
            "nodes": [{"id": "R1", "brand": "cisco", "type": "router"}],
            "links": [{"source": "R1:Gi0/0", "target": "R7:Gi0/0", "network": "TBD"}]
        }))
        .unwrap();
        let artifact = render(&document, "R1", &SynthesisConfig::default());
        let text = artifact.text();

        assert!(text.contains("interface Gi0/0\n description Connected_to_R7_Gi0/0\n no ip address\n no shutdown"));
    }

    #[test]
    fn test_render_document_keeps_order_and_dedups() {
        let mut document = allocated_document();
        let duplicate = document.nodes[0].clone();
        document.nodes.push(duplicate);

        let artifacts = Synthesizer::new(&SynthesisConfig::default())
            .render_document(&document)
            .unwrap();
        let ids: Vec<&str> = artifacts.iter().map(|a| a.device_id.as_str()).collect();
        assert_eq!(ids, vec!["R1", "R2", "FW3", "J4"]);
    }

    #[test]
    fn test_render_document_skips_clashing_file_names() {
        let document: TopologyDocument = serde_json::from_value(json!({
            "topology_name": "lab",
            "nodes": [
                {"id": "S/1", "brand": "cisco", "type": "Switch"},
                {"id": "S_1", "brand": "arista", "type": "Switch"},
                {"id": "S2", "brand": "arista", "type": "Switch"}
            ],
            "links": []
        }))
        .unwrap();

        let artifacts = Synthesizer::new(&SynthesisConfig::default())
            .render_document(&document)
            .unwrap();
        let ids: Vec<&str> = artifacts.iter().map(|a| a.device_id.as_str()).collect();
        assert_eq!(ids, vec!["S/1", "S2"]);

        let names: HashSet<String> = artifacts.iter().map(Artifact::file_name).collect();
        assert_eq!(names.len(), artifacts.len());
    }

    #[test]
    fn test_custom_settings_flow_into_output() {
        let document = allocated_document();
        let config = SynthesisConfig {
            admin_user: "netops".to_string(),
            ospf_process: 10,
            ospf_area: 5,
            ..SynthesisConfig::default()
        };
        let text = render(&document, "R1", &config).text();

        assert!(text.contains("username netops privilege 15 secret Admin@1234"));
        assert!(text.contains("router ospf 10"));
        assert!(text.contains(" network 0.0.0.0 255.255.255.255 area 5"));
    }
}
