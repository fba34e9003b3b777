//! IOS-style CLI dialect, shared by Cisco IOS and Arista EOS.
//!
//! The two only differ in how OSPF network statements are written.

use super::dialect::{DeviceContext, Dialect};
use super::resolve::InterfacePlan;
use crate::ip::SUBNET_PREFIX_LEN;
use crate::utils::ip_utils::prefix_to_mask;

/// How `network ... area` statements express the advertised range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkSyntax {
    /// `network 0.0.0.0 255.255.255.255 area 0`
    Mask,
    /// `network 0.0.0.0/0 area 0`
    Prefix,
}

#[derive(Debug, Clone, Copy)]
pub struct IosDialect {
    name: &'static str,
    network_syntax: NetworkSyntax,
}

impl IosDialect {
    pub const CISCO: Self = Self {
        name: "cisco-ios",
        network_syntax: NetworkSyntax::Mask,
    };

    pub const ARISTA: Self = Self {
        name: "arista-eos",
        network_syntax: NetworkSyntax::Prefix,
    };
}

impl Dialect for IosDialect {
    fn name(&self) -> &'static str {
        self.name
    }

    fn identity(&self, ctx: &DeviceContext<'_>, out: &mut Vec<String>) {
        let cfg = ctx.config;
        out.extend([
            format!("hostname {}", ctx.device.id),
            "service password-encryption".to_string(),
            format!("enable secret {}", cfg.secret),
            format!("username {} privilege 15 secret {}", cfg.admin_user, cfg.secret),
            format!("clock timezone {}", cfg.timezone),
            format!("ntp server {}", cfg.ntp_server),
            format!("logging host {}", cfg.syslog_server),
            format!("snmp-server community {} RO", cfg.snmp_community),
            format!("snmp-server host {} version 2c {}", cfg.snmp_trap_host, cfg.snmp_community),
            format!("ip domain-name {}", cfg.domain_name),
            "ip ssh version 2".to_string(),
            // Telnet off, SSH only
            "line vty 0 15".to_string(),
            format!(" password {}", cfg.secret),
            " login local".to_string(),
            " transport input ssh".to_string(),
            "exit".to_string(),
        ]);
    }

    fn loopback(&self, ctx: &DeviceContext<'_>, out: &mut Vec<String>) {
        out.extend([
            "interface Loopback0".to_string(),
            " description Router-ID_Loopback".to_string(),
            format!(" ip address {} 255.255.255.255", ctx.loopback_address()),
            "exit".to_string(),
        ]);
    }

    fn interface(&self, _ctx: &DeviceContext<'_>, plan: &InterfacePlan<'_>, out: &mut Vec<String>) {
        let address = match plan.address {
            Some(ip) => format!(" ip address {} {}", ip, prefix_to_mask(SUBNET_PREFIX_LEN)),
            None => " no ip address".to_string(),
        };
        out.extend([
            format!("interface {}", plan.interface),
            format!(" description {}", plan.description()),
            address,
            " no shutdown".to_string(),
            "exit".to_string(),
        ]);
    }

    fn routing(&self, ctx: &DeviceContext<'_>, out: &mut Vec<String>) {
        let cfg = ctx.config;
        let network = match self.network_syntax {
            NetworkSyntax::Mask => format!(" network 0.0.0.0 255.255.255.255 area {}", cfg.ospf_area),
            NetworkSyntax::Prefix => format!(" network 0.0.0.0/0 area {}", cfg.ospf_area),
        };
        out.extend([
            format!("router ospf {}", cfg.ospf_process),
            format!(" router-id {}", ctx.loopback_address()),
            network,
            "exit".to_string(),
        ]);
    }
}
