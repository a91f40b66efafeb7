//! Turns one captured frame into zero, one or two `FlowTable::update` calls.
//!
//! The classifier is stateless: it holds no per-packet state of its own,
//! only the immutable link type and local address sets collected at
//! capture start. Every code path that can't make sense of a frame
//! returns without touching the table; a malformed or unrecognized
//! packet is dropped silently rather than treated as an error.

use std::net::{Ipv4Addr, Ipv6Addr};

use tracing::trace;

use crate::flow::{Direction, FlowTable};
use crate::net::{FlowKey, Protocol};

use super::source::{LinkType, LocalAddresses, RawFrame};

const IPPROTO_ICMP: u8 = 1;
const IPPROTO_TCP: u8 = 6;
const IPPROTO_UDP: u8 = 17;
const IPPROTO_ICMPV6: u8 = 58;

const IPV6_FIXED_HEADER_LEN: usize = 40;

/// Classify one frame and post the resulting updates into `table`.
pub fn classify(frame: &RawFrame, link_type: LinkType, locals: &LocalAddresses, table: &FlowTable) {
    let data = &frame.data;

    let (ip_offset, forced_family) = match link_type {
        LinkType::Ethernet => (14, None),
        LinkType::Null => (4, Some(read_family_host_order(data))),
        LinkType::Loop => (4, Some(read_family_big_endian(data))),
    };

    if data.len() <= ip_offset {
        trace!("frame shorter than link-layer header, dropping");
        return;
    }
    let ip_packet = &data[ip_offset..];

    let version = match forced_family {
        Some(Some(4)) => 4,
        Some(Some(6)) => 6,
        Some(Some(_)) | Some(None) => return,
        None => match ip_packet[0] >> 4 {
            4 => 4,
            6 => 6,
            _ => return,
        },
    };

    match version {
        4 => classify_ipv4(ip_packet, frame.wire_length, locals, table),
        6 => classify_ipv6(ip_packet, frame.wire_length, locals, table),
        _ => unreachable!(),
    }
}

/// `DLT_NULL`: host byte order address family in the first 4 bytes.
fn read_family_host_order(data: &[u8]) -> Option<u32> {
    if data.len() < 4 {
        return None;
    }
    let raw = u32::from_ne_bytes([data[0], data[1], data[2], data[3]]);
    family_to_version(raw)
}

/// `DLT_LOOP`: big-endian address family in the first 4 bytes.
fn read_family_big_endian(data: &[u8]) -> Option<u32> {
    if data.len() < 4 {
        return None;
    }
    let raw = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    family_to_version(raw)
}

fn family_to_version(af: u32) -> Option<u32> {
    const AF_INET: u32 = 2;
    const AF_INET6_LINUX: u32 = 10;
    const AF_INET6_BSD: u32 = 28;
    match af {
        AF_INET => Some(4),
        AF_INET6_LINUX | AF_INET6_BSD => Some(6),
        _ => None,
    }
}

fn classify_ipv4(data: &[u8], wire_length: u64, locals: &LocalAddresses, table: &FlowTable) {
    if data.len() < 20 {
        return;
    }

    let version = data[0] >> 4;
    if version != 4 {
        return;
    }
    let ihl = (data[0] & 0x0F) as usize * 4;
    if ihl < 20 || data.len() < ihl {
        return;
    }

    let protocol = data[9];
    let src_ip = Ipv4Addr::new(data[12], data[13], data[14], data[15]);
    let dst_ip = Ipv4Addr::new(data[16], data[17], data[18], data[19]);

    let src_is_local = locals.contains_v4(&src_ip);
    let dst_is_local = locals.contains_v4(&dst_ip);
    if !src_is_local && !dst_is_local {
        return;
    }

    let l4 = &data[ihl..];

    let key = match protocol {
        IPPROTO_TCP | IPPROTO_UDP => {
            if l4.len() < 4 {
                return;
            }
            let src_port = u16::from_be_bytes([l4[0], l4[1]]);
            let dst_port = u16::from_be_bytes([l4[2], l4[3]]);
            let proto = if protocol == IPPROTO_TCP {
                Protocol::Tcp
            } else {
                Protocol::Udp
            };
            FlowKey::from_ipv4(src_ip, src_port, dst_ip, dst_port, proto)
        }
        IPPROTO_ICMP => FlowKey::from_ipv4(src_ip, 0, dst_ip, 0, Protocol::Icmp),
        _ => return,
    };

    post_update(key, src_is_local, dst_is_local, wire_length, table);
}

fn classify_ipv6(data: &[u8], wire_length: u64, locals: &LocalAddresses, table: &FlowTable) {
    if data.len() < IPV6_FIXED_HEADER_LEN {
        return;
    }

    let version = data[0] >> 4;
    if version != 6 {
        return;
    }

    let next_header = data[6];
    let src_ip = Ipv6Addr::from(<[u8; 16]>::try_from(&data[8..24]).unwrap());
    let dst_ip = Ipv6Addr::from(<[u8; 16]>::try_from(&data[24..40]).unwrap());

    let src_is_local = locals.contains_v6(&src_ip);
    let dst_is_local = locals.contains_v6(&dst_ip);
    if !src_is_local && !dst_is_local {
        return;
    }

    // Extension header chains are not walked: only a next_header that
    // names TCP/UDP/ICMPv6 directly is handled.
    let l4 = &data[IPV6_FIXED_HEADER_LEN..];

    let key = match next_header {
        IPPROTO_TCP | IPPROTO_UDP => {
            if l4.len() < 4 {
                return;
            }
            let src_port = u16::from_be_bytes([l4[0], l4[1]]);
            let dst_port = u16::from_be_bytes([l4[2], l4[3]]);
            let proto = if next_header == IPPROTO_TCP {
                Protocol::Tcp
            } else {
                Protocol::Udp
            };
            FlowKey::from_ipv6(src_ip, src_port, dst_ip, dst_port, proto)
        }
        IPPROTO_ICMPV6 => FlowKey::from_ipv6(src_ip, 0, dst_ip, 0, Protocol::Icmpv6),
        _ => return,
    };

    post_update(key, src_is_local, dst_is_local, wire_length, table);
}

fn post_update(key: FlowKey, src_is_local: bool, dst_is_local: bool, wire_length: u64, table: &FlowTable) {
    let now = std::time::Instant::now();
    if src_is_local {
        table.update(key, Direction::Tx, wire_length, now);
    }
    if dst_is_local {
        table.update(key, Direction::Rx, wire_length, now);
    }
}
