//! `FrameSource` backed by `pnet`'s datalink layer (AF_PACKET on Linux).

use std::net::IpAddr;
use std::time::{Duration, SystemTime};

use anyhow::Result;
use pnet::datalink::{self, Channel, Config, DataLinkReceiver};
use tracing::{info, warn};

use crate::error::CaptureError;

use super::source::{FrameSource, LinkType, LocalAddresses, RawFrame};

pub struct PnetSource {
    interface_name: String,
    link_type: LinkType,
    locals: LocalAddresses,
    rx: Box<dyn DataLinkReceiver>,
}

impl PnetSource {
    /// Open `interface_name` for capture. Fatal (returns `Err`) if the
    /// interface doesn't exist, can't be opened, or uses a link type the
    /// classifier has no header-stripping rule for.
    pub fn open(interface_name: &str) -> Result<Self> {
        let interfaces = datalink::interfaces();
        let iface = interfaces
            .into_iter()
            .find(|i| i.name == interface_name)
            .ok_or_else(|| CaptureError::InterfaceNotFound(interface_name.to_string()))?;

        if !iface.is_up() {
            return Err(CaptureError::InterfaceDown(interface_name.to_string()).into());
        }

        let link_type = if iface.is_loopback() {
            // pnet/libpcap report BSD-style loopback framing (DLT_NULL)
            // for the loopback device on Linux as well.
            LinkType::Null
        } else {
            LinkType::Ethernet
        };

        let mut locals = LocalAddresses::default();
        for ip in &iface.ips {
            match ip.ip() {
                IpAddr::V4(v4) => locals.v4.push(v4),
                IpAddr::V6(v6) => locals.v6.push(v6),
            }
        }

        let config = Config {
            read_timeout: Some(Duration::from_millis(100)),
            read_buffer_size: 65536,
            ..Default::default()
        };

        let (_tx, rx) = match datalink::channel(&iface, config) {
            Ok(Channel::Ethernet(tx, rx)) => (tx, rx),
            Ok(_) => {
                return Err(CaptureError::UnsupportedLinkType(interface_name.to_string()).into())
            }
            Err(e) => {
                return Err(CaptureError::OpenFailed {
                    interface: interface_name.to_string(),
                    source: e.into(),
                }
                .into())
            }
        };

        info!(interface = %interface_name, ?link_type, "capture opened");

        Ok(Self {
            interface_name: interface_name.to_string(),
            link_type,
            locals,
            rx,
        })
    }
}

impl FrameSource for PnetSource {
    fn next_frame(&mut self) -> Result<Option<RawFrame>> {
        match self.rx.next() {
            Ok(packet) => Ok(Some(RawFrame {
                data: packet.to_vec(),
                wire_length: packet.len() as u64,
                timestamp: SystemTime::now(),
            })),
            Err(e) => {
                let msg = e.to_string().to_lowercase();
                if msg.contains("timed out") || msg.contains("timeout") {
                    Ok(None)
                } else {
                    warn!(interface = %self.interface_name, error = %e, "capture read error");
                    Ok(None)
                }
            }
        }
    }

    fn link_type(&self) -> LinkType {
        self.link_type
    }

    fn local_addresses(&self) -> &LocalAddresses {
        &self.locals
    }

    fn interface_name(&self) -> &str {
        &self.interface_name
    }
}
