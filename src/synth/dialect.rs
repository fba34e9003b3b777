//! Vendor dialects.
//!
//! A dialect renders the configuration sections a vendor supports. Sections a
//! vendor has no counterpart for keep the default no-op, so the synthesizer
//! can drive every dialect through the same fixed section order.

use super::ios::IosDialect;
use super::panos::PanOsDialect;
use super::resolve::InterfacePlan;
use crate::config::SynthesisConfig;
use crate::topology::{Device, Vendor};

static CISCO: IosDialect = IosDialect::CISCO;
static ARISTA: IosDialect = IosDialect::ARISTA;
static PALO_ALTO: PanOsDialect = PanOsDialect;

/// What a dialect knows about the device being rendered
#[derive(Debug, Clone, Copy)]
pub struct DeviceContext<'a> {
    pub device: &'a Device,
    pub designator: u32,
    pub config: &'a SynthesisConfig,
}

impl DeviceContext<'_> {
    /// Router id / loopback address: the designator in all four octets
    pub fn loopback_address(&self) -> String {
        let d = self.designator;
        format!("{d}.{d}.{d}.{d}")
    }
}

pub trait Dialect: Sync {
    fn name(&self) -> &'static str;

    /// Hostname, credentials, time, management services and access lines
    fn identity(&self, _ctx: &DeviceContext<'_>, _out: &mut Vec<String>) {}

    /// Loopback interface carrying the router id
    fn loopback(&self, _ctx: &DeviceContext<'_>, _out: &mut Vec<String>) {}

    /// One physical interface facing a link peer
    fn interface(&self, _ctx: &DeviceContext<'_>, _plan: &InterfacePlan<'_>, _out: &mut Vec<String>) {}

    /// Single-area link-state routing. Only called for router/switch roles.
    fn routing(&self, _ctx: &DeviceContext<'_>, _out: &mut Vec<String>) {}

    /// Perimeter system settings, admin account and default security rule
    fn perimeter(&self, _ctx: &DeviceContext<'_>, _out: &mut Vec<String>) {}
}

/// Dialect for a vendor, or None for vendors outside the supported set
pub fn dialect_for(vendor: &Vendor) -> Option<&'static dyn Dialect> {
    match vendor {
        Vendor::Cisco => Some(&CISCO),
        Vendor::Arista => Some(&ARISTA),
        Vendor::PaloAlto => Some(&PALO_ALTO),
        Vendor::Other(_) => None,
    }
}
