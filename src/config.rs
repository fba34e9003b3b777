use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// How the synthesizer treats devices whose vendor it has no dialect for
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Log a warning and emit an empty artifact
    #[default]
    Permissive,
    /// Fail the synthesis run
    Strict,
}

/// Top-level pipeline configuration that mirrors the YAML configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub addressing: AddressingConfig,
    pub synthesis: SynthesisConfig,
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.addressing.validate()?;
        self.synthesis.validate()?;
        Ok(())
    }
}

/// Point-to-point addressing settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AddressingConfig {
    /// First two octets shared by every allocated /30, e.g. "192.168"
    pub base_prefix: String,
    /// Refuse to write an allocation whose report contains subnet collisions
    pub deny_collisions: bool,
}

impl AddressingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let octets: Vec<&str> = self.base_prefix.split('.').collect();
        let valid = octets.len() == 2 && octets.iter().all(|o| o.parse::<u8>().is_ok());
        if !valid {
            return Err(ConfigError::InvalidAddressing(format!(
                "base_prefix '{}' must be two dotted octets such as 192.168",
                self.base_prefix
            )));
        }
        Ok(())
    }
}

impl Default for AddressingConfig {
    fn default() -> Self {
        Self {
            base_prefix: "192.168".to_string(),
            deny_collisions: false,
        }
    }
}

/// Settings baked into the generated device configurations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SynthesisConfig {
    pub strictness: Strictness,
    /// Enable secret, admin password and vty password
    pub secret: String,
    pub admin_user: String,
    /// IOS-style `clock timezone` argument
    pub timezone: String,
    /// Olson timezone used by firewall dialects
    pub firewall_timezone: String,
    pub ntp_server: String,
    pub syslog_server: String,
    pub snmp_community: String,
    pub snmp_trap_host: String,
    pub domain_name: String,
    pub ospf_process: u32,
    pub ospf_area: u32,
    pub security_rule: SecurityRuleConfig,
}

impl SynthesisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("ntp_server", &self.ntp_server),
            ("syslog_server", &self.syslog_server),
            ("snmp_trap_host", &self.snmp_trap_host),
        ] {
            if value.parse::<Ipv4Addr>().is_err() {
                return Err(ConfigError::InvalidSynthesis(format!(
                    "{} '{}' is not an IPv4 address",
                    field, value
                )));
            }
        }

        if self.admin_user.trim().is_empty() {
            return Err(ConfigError::InvalidSynthesis("admin_user cannot be empty".to_string()));
        }

        if self.security_rule.services.is_empty() {
            return Err(ConfigError::InvalidSynthesis(
                "security_rule.services cannot be an empty list".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Permissive,
            secret: "Admin@1234".to_string(),
            admin_user: "admin".to_string(),
            timezone: "PST -8 0".to_string(),
            firewall_timezone: "US/Pacific".to_string(),
            ntp_server: "192.168.100.1".to_string(),
            syslog_server: "192.168.100.2".to_string(),
            snmp_community: "public".to_string(),
            snmp_trap_host: "192.168.100.3".to_string(),
            domain_name: "lab.local".to_string(),
            ospf_process: 1,
            ospf_area: 0,
            security_rule: SecurityRuleConfig::default(),
        }
    }
}

/// The single default perimeter rule emitted for firewalls
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SecurityRuleConfig {
    pub name: String,
    pub services: Vec<String>,
}

impl Default for SecurityRuleConfig {
    fn default() -> Self {
        Self {
            name: "Trust-to-Untrust".to_string(),
            services: vec!["service-http".to_string(), "service-https".to_string()],
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid addressing configuration: {0}")]
    InvalidAddressing(String),
    #[error("Invalid synthesis configuration: {0}")]
    InvalidSynthesis(String),
}
