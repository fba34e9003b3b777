//! PAN-OS set-command dialect for Palo Alto firewalls.

use super::dialect::{DeviceContext, Dialect};
use super::resolve::InterfacePlan;
use crate::ip::SUBNET_PREFIX_LEN;

#[derive(Debug, Clone, Copy)]
pub struct PanOsDialect;

impl Dialect for PanOsDialect {
    fn name(&self) -> &'static str {
        "panos"
    }

    fn interface(&self, _ctx: &DeviceContext<'_>, plan: &InterfacePlan<'_>, out: &mut Vec<String>) {
        let prefix = format!("set network interface ethernet {}", plan.interface);
        if let Some(ip) = plan.address {
            out.push(format!("{} layer3 ip {}/{}", prefix, ip, SUBNET_PREFIX_LEN));
        }
        out.push(format!("{} comment {}", prefix, plan.description()));
    }

    fn perimeter(&self, ctx: &DeviceContext<'_>, out: &mut Vec<String>) {
        let cfg = ctx.config;
        let rule = &cfg.security_rule;
        out.extend([
            format!("set deviceconfig system hostname {}", ctx.device.id),
            format!("set deviceconfig system timezone {}", cfg.firewall_timezone),
            format!("set deviceconfig system ntp-servers primary-ntp address {}", cfg.ntp_server),
            format!("set mgt-config users {} password {}", cfg.admin_user, cfg.secret),
            format!("set mgt-config users {} permissions role-based superuser yes", cfg.admin_user),
            format!(
                "set rulebase security rules {} service [ {} ] action allow",
                rule.name,
                rule.services.join(" ")
            ),
        ]);
    }
}
