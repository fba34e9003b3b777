use std::net::Ipv4Addr;

/// IPv4 helpers for the textual addresses stored in topology documents

/// Check if a string is a valid IPv4 address
pub fn is_valid_ipv4(ip: &str) -> bool {
    ip.parse::<Ipv4Addr>().is_ok()
}

/// Dotted netmask for a prefix length, e.g. 30 -> 255.255.255.252
pub fn prefix_to_mask(prefix_len: u8) -> Ipv4Addr {
    let bits = match prefix_len {
        0 => 0,
        len if len >= 32 => u32::MAX,
        len => u32::MAX << (32 - u32::from(len)),
    };
    Ipv4Addr::from(bits)
}

/// Split "a.b.c.d/len" into its network address and prefix length
pub fn parse_cidr(cidr: &str) -> Option<(Ipv4Addr, u8)> {
    let (addr, len) = cidr.split_once('/')?;
    let addr = addr.parse::<Ipv4Addr>().ok()?;
    let len = len.parse::<u8>().ok().filter(|len| *len <= 32)?;
    Some((addr, len))
}

/// Check whether `ip` is a usable host address of `cidr`: inside the block
/// and neither its network nor its broadcast address.
///
/// Returns false when either string does not parse.
pub fn is_usable_host(cidr: &str, ip: &str) -> bool {
    let Some((network, len)) = parse_cidr(cidr) else {
        return false;
    };
    let Ok(host) = ip.parse::<Ipv4Addr>() else {
        return false;
    };

    let mask = u32::from(prefix_to_mask(len));
    let base = u32::from(network) & mask;
    let host = u32::from(host);
    if host & mask != base {
        return false;
    }
    if len >= 31 {
        return true;
    }
    let broadcast = base | !mask;
    host != base && host != broadcast
}
