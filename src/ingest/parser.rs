//! Line parser for pasted topology descriptions.
//!
//! Recognised forms:
//!
//! ```text
//! R1,Cisco,Router              device: id, brand, role
//! R1:Gi0/1 连接 SW3:Et1        link, separators: 连接, connect, <->, to, -
//! # comment                    ignored
//! done                         end of input
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::topology::{Device, Endpoint, Link, Role, Vendor};

/// Compiled patterns for the two record forms
pub struct LinePatterns {
    /// Match: "<dev>:<intf> <sep> <dev>:<intf>"
    pub link: Regex,
    /// Match: "<id>,<brand>,<role>"
    pub device: Regex,
}

impl LinePatterns {
    pub fn new() -> Self {
        Self {
            link: Regex::new(
                r"^([\w.-]+):([\w/.-]+)(?:\s*(?:连接|<->|-)\s*|\s+(?:connect|to)\s+)([\w.-]+):([\w/.-]+)$"
            ).expect("Invalid link regex"),
            device: Regex::new(
                r"^([^,]+),([^,]+),([^,]+)$"
            ).expect("Invalid device regex"),
        }
    }
}

impl Default for LinePatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global patterns instance
pub static PATTERNS: LazyLock<LinePatterns> = LazyLock::new(LinePatterns::new);

/// What a single input line turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Device(Device),
    Link(Link),
    /// Empty line or comment
    Blank,
    /// The `done` terminator
    Done,
    Unrecognized,
}

/// Classify and parse one input line
pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return ParsedLine::Blank;
    }
    if line.eq_ignore_ascii_case("done") {
        return ParsedLine::Done;
    }

    if let Some(caps) = PATTERNS.link.captures(line) {
        let source = Endpoint::new(&caps[1], &caps[2]);
        let target = Endpoint::new(&caps[3], &caps[4]);
        return ParsedLine::Link(Link::new(source, target));
    }

    if let Some(caps) = PATTERNS.device.captures(line) {
        let (id, brand, role) = (caps[1].trim(), caps[2].trim(), caps[3].trim());
        if !id.is_empty() && !brand.is_empty() && !role.is_empty() {
            return ParsedLine::Device(Device::new(id, Vendor::parse(brand), Role::new(role)));
        }
    }

    ParsedLine::Unrecognized
}
