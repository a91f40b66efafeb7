use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// L4 protocol a flow was observed over. Any other IP protocol number is
/// dropped by the classifier before a `FlowKey` is ever constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    Icmpv6,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Icmp => "ICMP",
            Protocol::Icmpv6 => "ICMPv6",
        };
        f.write_str(s)
    }
}

/// One side of a flow: an IPv6-shaped address plus a port. IPv4 addresses
/// are stored in their IPv4-mapped IPv6 form so `FlowKey` never needs to
/// branch on address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    addr: Ipv6Addr,
    port: u16,
}

impl Endpoint {
    pub fn from_v4(addr: Ipv4Addr, port: u16) -> Self {
        Self {
            addr: addr.to_ipv6_mapped(),
            port,
        }
    }

    pub fn from_v6(addr: Ipv6Addr, port: u16) -> Self {
        Self { addr, port }
    }

    pub fn addr(&self) -> Ipv6Addr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The address alone, dotted-quad for IPv4-mapped addresses and
    /// canonical IPv6 text otherwise. Used by the CSV logger, which wants
    /// address and port in separate columns.
    pub fn addr_text(&self) -> String {
        match self.addr.to_ipv4_mapped() {
            Some(v4) => v4.to_string(),
            None => self.addr.to_string(),
        }
    }

    /// Render as `"<ip>:<port>"`, using dotted-quad form for IPv4-mapped
    /// addresses and canonical IPv6 text otherwise.
    pub fn display(&self) -> String {
        format!("{}:{}", self.addr_text(), self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Canonical identity of one directional conversation. Swapping `src` and
/// `dst` yields a different key by design — opposite-direction halves of a
/// TCP/UDP session are two separate flows (see the module-level docs on
/// `FlowTable` for why).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowKey {
    pub src: Endpoint,
    pub dst: Endpoint,
    pub protocol: Protocol,
}

impl FlowKey {
    pub fn from_ipv4(
        src_ip: Ipv4Addr,
        src_port: u16,
        dst_ip: Ipv4Addr,
        dst_port: u16,
        protocol: Protocol,
    ) -> Self {
        Self {
            src: Endpoint::from_v4(src_ip, src_port),
            dst: Endpoint::from_v4(dst_ip, dst_port),
            protocol,
        }
    }

    pub fn from_ipv6(
        src_ip: Ipv6Addr,
        src_port: u16,
        dst_ip: Ipv6Addr,
        dst_port: u16,
        protocol: Protocol,
    ) -> Self {
        Self {
            src: Endpoint::from_v6(src_ip, src_port),
            dst: Endpoint::from_v6(dst_ip, dst_port),
            protocol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v4_key_round_trips_through_display() {
        let key = FlowKey::from_ipv4(
            Ipv4Addr::new(192, 168, 1, 10),
            12345,
            Ipv4Addr::new(8, 8, 8, 8),
            80,
            Protocol::Tcp,
        );

        assert_eq!(key.src.display(), "192.168.1.10:12345");
        assert_eq!(key.dst.display(), "8.8.8.8:80");
    }

    #[test]
    fn v6_key_uses_canonical_text() {
        let src = "2001:db8::1".parse().unwrap();
        let dst = "2001:db8::2".parse().unwrap();
        let key = FlowKey::from_ipv6(src, 12345, dst, 53, Protocol::Udp);

        assert_eq!(key.src.display(), "2001:db8::1:12345");
        assert_eq!(key.dst.display(), "2001:db8::2:53");
    }

    #[test]
    fn direction_matters_for_equality() {
        let forward = FlowKey::from_ipv4(
            Ipv4Addr::new(10, 0, 0, 1),
            1000,
            Ipv4Addr::new(10, 0, 0, 2),
            2000,
            Protocol::Tcp,
        );
        let reverse = FlowKey::from_ipv4(
            Ipv4Addr::new(10, 0, 0, 2),
            2000,
            Ipv4Addr::new(10, 0, 0, 1),
            1000,
            Protocol::Tcp,
        );

        assert_ne!(forward, reverse);
    }

    #[test]
    fn icmp_has_zero_ports() {
        let key = FlowKey::from_ipv4(
            Ipv4Addr::new(1, 1, 1, 1),
            0,
            Ipv4Addr::new(2, 2, 2, 2),
            0,
            Protocol::Icmp,
        );

        assert_eq!(key.src.port(), 0);
        assert_eq!(key.dst.port(), 0);
    }
}
