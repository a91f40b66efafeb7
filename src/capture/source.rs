//! The contract between the capture thread and whatever delivers frames.
//!
//! The raw frame source is treated as a swappable collaborator: just one
//! trait a concrete capture backend can implement, plus the shape of
//! what it hands back per frame. `PnetSource` is the one concrete
//! implementation shipped here.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::SystemTime;

use anyhow::Result;

/// Link-layer framing of the packet source. Determines where the IP
/// header starts in `RawFrame::data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// `DLT_EN10MB`: standard Ethernet, IP header at offset 14.
    Ethernet,
    /// `DLT_NULL`: BSD loopback, 4-byte host-order address family header.
    Null,
    /// `DLT_LOOP`: OpenBSD loopback, 4-byte big-endian address family header.
    Loop,
}

/// One captured frame as delivered by the source, before any parsing.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Link-layer bytes as captured, possibly shorter than `wire_length`
    /// if the source applied a snap length.
    pub data: Vec<u8>,
    /// Total length of the frame as it appeared on the wire. This, not
    /// `data.len()`, is the byte count the classifier attributes to a flow.
    pub wire_length: u64,
    pub timestamp: SystemTime,
}

/// The set of addresses bound to the interface being monitored,
/// collected once at capture start and treated as immutable for the
/// life of the capture session.
#[derive(Debug, Clone, Default)]
pub struct LocalAddresses {
    pub v4: Vec<Ipv4Addr>,
    pub v6: Vec<Ipv6Addr>,
}

impl LocalAddresses {
    pub fn contains_v4(&self, addr: &Ipv4Addr) -> bool {
        self.v4.contains(addr)
    }

    pub fn contains_v6(&self, addr: &Ipv6Addr) -> bool {
        self.v6.contains(addr)
    }
}

/// A source of link-layer frames for one interface. The capture thread
/// blocks on `next_frame` in a loop; it never polls.
pub trait FrameSource {
    /// Block until the next frame arrives, or return `Ok(None)` on a
    /// source-level timeout (the caller should just loop again).
    fn next_frame(&mut self) -> Result<Option<RawFrame>>;

    fn link_type(&self) -> LinkType;

    fn local_addresses(&self) -> &LocalAddresses;

    fn interface_name(&self) -> &str;
}
