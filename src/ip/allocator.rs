//! Point-to-point address allocation.
//!
//! Every link gets a /30 whose third octet (the discriminator) is the decimal
//! concatenation of the two endpoint designators, smaller first, and each
//! endpoint's host octet is its own designator:
//!
//! ```text
//! R1:Gi0/0 <-> R2:Gi0/0   =>   192.168.12.0/30, .1 and .2
//! ```
//!
//! The scheme is kept as is. Its weak spots (different pairs sharing a
//! discriminator, hosts outside the block, octets above 255) are detected and
//! listed in the [`AllocationReport`] rather than corrected, so callers decide
//! how to remediate.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::registry::{DesignatorPair, SubnetCollision, SubnetRegistry};
use crate::config::AddressingConfig;
use crate::topology::{Entry, TopologyDocument};
use crate::utils::ip_utils;

/// Prefix length of every allocated link subnet
pub const SUBNET_PREFIX_LEN: u8 = 30;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("Invalid designator regex"));

/// Numeric designator of a device id: its first run of decimal digits.
///
/// `"R12"` is 12, `"R01"` is 1, an id without digits (or with a run too long
/// for `u32`) is 0.
pub fn extract_designator(device_id: &str) -> u32 {
    DIGITS
        .find(device_id)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0)
}

/// Returns true when the id has a digit run that does not fit a `u32`, so
/// its designator silently falls back to 0
fn designator_overflows(device_id: &str) -> bool {
    DIGITS
        .find(device_id)
        .is_some_and(|m| m.as_str().parse::<u32>().is_err())
}

/// Subnet discriminator for a pair: the digits of `lo` followed by the
/// digits of `hi`, read back as a number (so `(0, 12)` gives 12).
pub fn discriminator(pair: DesignatorPair) -> u64 {
    let hi_digits = pair.hi.checked_ilog10().map_or(1, |log| log + 1);
    u64::from(pair.lo)
        .saturating_mul(10u64.pow(hi_digits))
        .saturating_add(u64::from(pair.hi))
}

/// Addresses written onto one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAssignment {
    /// Index into the document's `links`
    pub link_index: usize,
    pub source_device: String,
    pub target_device: String,
    pub source_designator: u32,
    pub target_designator: u32,
    pub discriminator: u64,
    pub network: String,
    pub source_ip: String,
    pub target_ip: String,
}

/// Data-quality findings of an allocation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationIssue {
    /// A different device pair already owns this link's subnet
    Collision(SubnetCollision),
    /// Both endpoints have the same designator and therefore the same address
    SharedDesignator { link_index: usize, designator: u32 },
    /// The address is the network/broadcast address or outside the /30
    UnusableHost { link_index: usize, address: String },
    /// An octet of the computed address exceeds 255
    OctetOverflow { link_index: usize, value: u64 },
    /// The device id's digit run is too large and was read as designator 0
    DesignatorOverflow { link_index: usize, device: String },
}

impl fmt::Display for AllocationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationIssue::Collision(collision) => write!(f, "subnet collision: {}", collision),
            AllocationIssue::SharedDesignator { link_index, designator } => write!(
                f,
                "link #{}: both endpoints have designator {} and receive the same address",
                link_index, designator
            ),
            AllocationIssue::UnusableHost { link_index, address } => write!(
                f,
                "link #{}: {} is not a usable host of its /{}",
                link_index, address, SUBNET_PREFIX_LEN
            ),
            AllocationIssue::OctetOverflow { link_index, value } => write!(
                f,
                "link #{}: octet value {} exceeds 255, address is not valid IPv4",
                link_index, value
            ),
            AllocationIssue::DesignatorOverflow { link_index, device } => write!(
                f,
                "link #{}: digits of device '{}' do not fit a designator, treated as 0",
                link_index, device
            ),
        }
    }
}

/// Outcome of an allocation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationReport {
    pub assignments: Vec<LinkAssignment>,
    pub issues: Vec<AllocationIssue>,
    /// Malformed link entries left untouched
    pub skipped: usize,
}

impl AllocationReport {
    pub fn collisions(&self) -> impl Iterator<Item = &SubnetCollision> {
        self.issues.iter().filter_map(|issue| match issue {
            AllocationIssue::Collision(collision) => Some(collision),
            _ => None,
        })
    }

    pub fn has_collisions(&self) -> bool {
        self.collisions().next().is_some()
    }
}

/// Annotated document plus the report describing it
#[derive(Debug, Clone)]
pub struct Allocation {
    pub document: TopologyDocument,
    pub report: AllocationReport,
}

/// Raised when the caller asked for collisions to abort the pass
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("Refusing to write allocation with {count} subnet collision(s); first: {first}")]
    CollisionsDenied { count: usize, first: SubnetCollision },
}

/// Compute `network`, `source_ip` and `target_ip` for every well-formed link.
///
/// The input is left untouched; the annotated copy is returned with the
/// report. Existing assignments are recomputed, so running the pass twice
/// yields the same document.
pub fn allocate_links(document: &TopologyDocument, addressing: &AddressingConfig) -> Allocation {
    let mut annotated = document.clone();
    let mut registry = SubnetRegistry::new();
    let mut report = AllocationReport::default();
    let base = addressing.base_prefix.as_str();

    log::info!(
        "Allocating {}.x.y/{} addresses for {} link(s)",
        base,
        SUBNET_PREFIX_LEN,
        annotated.links.len()
    );

    for (index, entry) in annotated.links.iter_mut().enumerate() {
        let Entry::Valid(link) = entry else {
            log::warn!("Skipping malformed link entry #{}", index);
            report.skipped += 1;
            continue;
        };

        let y1 = extract_designator(&link.source.device);
        let y2 = extract_designator(&link.target.device);
        let pair = DesignatorPair::new(y1, y2);
        let x = discriminator(pair);

        let network = format!("{}.{}.0/{}", base, x, SUBNET_PREFIX_LEN);
        let source_ip = format!("{}.{}.{}", base, x, y1);
        let target_ip = format!("{}.{}.{}", base, x, y2);

        log::info!(
            "  Link {} <-> {}: subnet {} | {}: .{} | {}: .{}",
            link.source.device,
            link.target.device,
            network,
            link.source.device,
            y1,
            link.target.device,
            y2
        );

        for device in [&link.source.device, &link.target.device] {
            if designator_overflows(device) {
                report.issues.push(AllocationIssue::DesignatorOverflow {
                    link_index: index,
                    device: device.clone(),
                });
            }
        }
        if let Err(collision) = registry.claim(x, pair, index) {
            report.issues.push(AllocationIssue::Collision(collision));
        }
        if y1 == y2 {
            report.issues.push(AllocationIssue::SharedDesignator {
                link_index: index,
                designator: y1,
            });
        }

        let mut overflowed = false;
        let mut octets = vec![x, u64::from(y1)];
        if y2 != y1 {
            octets.push(u64::from(y2));
        }
        for value in octets.into_iter().filter(|v| *v > 255) {
            overflowed = true;
            report.issues.push(AllocationIssue::OctetOverflow {
                link_index: index,
                value,
            });
        }
        if !overflowed {
            let mut hosts = vec![&source_ip];
            if y2 != y1 {
                hosts.push(&target_ip);
            }
            for address in hosts {
                if !ip_utils::is_usable_host(&network, address) {
                    report.issues.push(AllocationIssue::UnusableHost {
                        link_index: index,
                        address: address.clone(),
                    });
                }
            }
        }

        report.assignments.push(LinkAssignment {
            link_index: index,
            source_device: link.source.device.clone(),
            target_device: link.target.device.clone(),
            source_designator: y1,
            target_designator: y2,
            discriminator: x,
            network: network.clone(),
            source_ip: source_ip.clone(),
            target_ip: target_ip.clone(),
        });

        link.network = Some(network);
        link.source_ip = Some(source_ip);
        link.target_ip = Some(target_ip);
    }

    for issue in &report.issues {
        log::warn!("{}", issue);
    }
    log::info!(
        "Allocated {} link(s) into {} subnet(s), {} issue(s), {} skipped",
        report.assignments.len(),
        registry.len(),
        report.issues.len(),
        report.skipped
    );

    Allocation {
        document: annotated,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{Device, Endpoint, Link, Role, Vendor};
    use serde_json::json;

    fn document_with_links(pairs: &[(&str, &str)]) -> TopologyDocument {
        let mut document = TopologyDocument::new("lab");
        for (source, target) in pairs {
            for id in [source, target] {
                let id = id.split(':').next().unwrap();
                if document.device(id).is_none() {
                    document
                        .nodes
                        .push(Entry::Valid(Device::new(id, Vendor::Cisco, Role::new("Router"))));
                }
            }
            document.links.push(Entry::Valid(Link::new(
                source.parse::<Endpoint>().unwrap(),
                target.parse::<Endpoint>().unwrap(),
            )));
        }
        document
    }

    fn first_link(document: &TopologyDocument) -> &Link {
        document.links().next().unwrap()
    }

    #[test]
    fn test_extract_designator() {
        assert_eq!(extract_designator("R12"), 12);
        assert_eq!(extract_designator("FW"), 0);
        assert_eq!(extract_designator("R01"), 1);
        assert_eq!(extract_designator("core-SW10-b2"), 10);
        assert_eq!(extract_designator("R99999999999"), 0);
    }

    #[test]
    fn test_discriminator_concatenates_digits() {
        assert_eq!(discriminator(DesignatorPair::new(1, 2)), 12);
        assert_eq!(discriminator(DesignatorPair::new(2, 1)), 12);
        assert_eq!(discriminator(DesignatorPair::new(3, 10)), 310);
        assert_eq!(discriminator(DesignatorPair::new(0, 12)), 12);
        assert_eq!(discriminator(DesignatorPair::new(0, 0)), 0);
    }

    #[test]
    fn test_allocate_r1_r2() {
        let document = document_with_links(&[("R1:Gi0/0", "R2:Gi0/0")]);
        let allocation = allocate_links(&document, &AddressingConfig::default());

        let link = first_link(&allocation.document);
        assert_eq!(link.network.as_deref(), Some("192.168.12.0/30"));
        assert_eq!(link.source_ip.as_deref(), Some("192.168.12.1"));
        assert_eq!(link.target_ip.as_deref(), Some("192.168.12.2"));
        assert!(allocation.report.issues.is_empty());

        // The input document is not modified
        assert_eq!(first_link(&document).network.as_deref(), Some("TBD"));
    }

    #[test]
    fn test_reverse_link_order_shares_subnet() {
        let document = document_with_links(&[("R2:Gi0/1", "R1:Gi0/1")]);
        let allocation = allocate_links(&document, &AddressingConfig::default());

        let link = first_link(&allocation.document);
        assert_eq!(link.network.as_deref(), Some("192.168.12.0/30"));
        assert_eq!(link.source_ip.as_deref(), Some("192.168.12.2"));
        assert_eq!(link.target_ip.as_deref(), Some("192.168.12.1"));
    }

    #[test]
    fn test_allocation_is_deterministic_and_repeatable() {
        let document =
            document_with_links(&[("R1:Gi0/0", "R2:Gi0/0"), ("R2:Gi0/1", "SW3:Et1"), ("SW3:Et2", "R1:Gi0/1")]);
        let config = AddressingConfig::default();

        let first = allocate_links(&document, &config);
        let second = allocate_links(&document, &config);
        assert_eq!(first.document, second.document);
        assert_eq!(
            serde_json::to_string(&first.document).unwrap(),
            serde_json::to_string(&second.document).unwrap()
        );

        let rerun = allocate_links(&first.document, &config);
        assert_eq!(rerun.document, first.document);
    }

    #[test]
    fn test_parallel_links_between_same_pair_do_not_collide() {
        let document = document_with_links(&[("R1:Gi0/0", "R2:Gi0/0"), ("R1:Gi0/1", "R2:Gi0/1")]);
        let allocation = allocate_links(&document, &AddressingConfig::default());
        assert!(!allocation.report.has_collisions());
    }

    #[test]
    fn test_collision_between_different_pairs_is_reported() {
        // "1" + "234" and "12" + "34" both read 1234
        let document = document_with_links(&[("R1:Gi0/0", "R234:Gi0/0"), ("R12:Gi0/1", "R34:Gi0/1")]);
        let allocation = allocate_links(&document, &AddressingConfig::default());

        let collisions: Vec<_> = allocation.report.collisions().collect();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].discriminator, 1234);
        assert_eq!(collisions[0].existing, DesignatorPair::new(1, 234));
        assert_eq!(collisions[0].incoming, DesignatorPair::new(12, 34));
        assert_eq!(collisions[0].link_index, 1);

        // Addresses are still written exactly as the scheme computes them
        let networks: Vec<_> = allocation
            .document
            .links()
            .map(|l| l.network.clone().unwrap())
            .collect();
        assert_eq!(networks, vec!["192.168.1234.0/30", "192.168.1234.0/30"]);
    }

    #[test]
    fn test_undesignated_device_collides_with_concatenated_pair() {
        // FW has designator 0, so FW-R12 reads "012" = 12, same as R1-R2
        let document = document_with_links(&[("R1:Gi0/0", "R2:Gi0/0"), ("FW:eth1", "R12:Gi0/0")]);
        let allocation = allocate_links(&document, &AddressingConfig::default());

        let collision = allocation.report.collisions().next().unwrap();
        assert_eq!(collision.discriminator, 12);
        assert_eq!(collision.incoming, DesignatorPair::new(0, 12));
    }

    #[test]
    fn test_hosts_outside_the_block_are_reported() {
        let document = document_with_links(&[("R3:Gi0/0", "R5:Gi0/0")]);
        let allocation = allocate_links(&document, &AddressingConfig::default());

        let link = first_link(&allocation.document);
        assert_eq!(link.network.as_deref(), Some("192.168.35.0/30"));
        assert_eq!(link.target_ip.as_deref(), Some("192.168.35.5"));
        assert_eq!(
            allocation.report.issues,
            vec![
                AllocationIssue::UnusableHost {
                    link_index: 0,
                    address: "192.168.35.3".to_string()
                },
                AllocationIssue::UnusableHost {
                    link_index: 0,
                    address: "192.168.35.5".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_octet_overflow_is_reported() {
        let document = document_with_links(&[("R12:Gi0/0", "R34:Gi0/0")]);
        let allocation = allocate_links(&document, &AddressingConfig::default());

        assert_eq!(first_link(&allocation.document).source_ip.as_deref(), Some("192.168.1234.12"));
        assert_eq!(
            allocation.report.issues,
            vec![AllocationIssue::OctetOverflow {
                link_index: 0,
                value: 1234
            }]
        );
    }

    #[test]
    fn test_shared_designator_is_reported() {
        let document = document_with_links(&[("R1:Gi0/0", "SW1:Et1")]);
        let allocation = allocate_links(&document, &AddressingConfig::default());

        let link = first_link(&allocation.document);
        assert_eq!(link.source_ip, link.target_ip);
        assert!(allocation.report.issues.contains(&AllocationIssue::SharedDesignator {
            link_index: 0,
            designator: 1
        }));
    }

    #[test]
    fn test_oversized_designator_is_reported() {
        let document = document_with_links(&[("R99999999999:Gi0/0", "FW:eth1"), ("R1:Gi0/0", "R2:Gi0/0")]);
        let allocation = allocate_links(&document, &AddressingConfig::default());

        let overflows: Vec<&AllocationIssue> = allocation
            .report
            .issues
            .iter()
            .filter(|issue| matches!(issue, AllocationIssue::DesignatorOverflow { .. }))
            .collect();
        assert_eq!(
            overflows,
            vec![&AllocationIssue::DesignatorOverflow {
                link_index: 0,
                device: "R99999999999".to_string()
            }]
        );
        assert_eq!(first_link(&allocation.document).network.as_deref(), Some("192.168.0.0/30"));
    }

    #[test]
    fn test_malformed_links_are_skipped() {
        let document: TopologyDocument = serde_json::from_value(json!({
            "topology_name": "lab",
            "nodes": [],
            "links": [
                {"source": "R1", "target": "R2:Gi0/0"},
                {"source": "R1:Gi0/0", "target": "R2:Gi0/0", "network": "TBD"}
            ]
        }))
        .unwrap();

        let allocation = allocate_links(&document, &AddressingConfig::default());
        assert_eq!(allocation.report.skipped, 1);
        assert_eq!(allocation.report.assignments.len(), 1);
        assert_eq!(allocation.report.assignments[0].link_index, 1);
        assert_eq!(allocation.document.links[0], document.links[0]);
    }

    #[test]
    fn test_custom_base_prefix() {
        let document = document_with_links(&[("R1:Gi0/0", "R2:Gi0/0")]);
        let config = AddressingConfig {
            base_prefix: "10.20".to_string(),
            ..AddressingConfig::default()
        };
        let allocation = allocate_links(&document, &config);
        assert_eq!(first_link(&allocation.document).network.as_deref(), Some("10.20.12.0/30"));
    }
}
