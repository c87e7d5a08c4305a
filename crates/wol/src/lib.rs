//! Wake-on-LAN magic packets and the broadcast primitive used to send them.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use async_trait::async_trait;
pub use pnet_base::MacAddr;
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::debug;

pub const MAGIC_PACKET_LEN: usize = 6 + 16 * 6;

/// Limited broadcast on the discard port, which is where most NICs listen.
pub const DEFAULT_BROADCAST: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::BROADCAST, 9));

#[derive(Debug, Error)]
pub enum WakeError {
    #[error("invalid hardware address '{0}'")]
    InvalidMac(String),
    #[error("failed to send magic packet to {addr}: {source}")]
    Send {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("short write to {addr}: only {sent} bytes of the magic packet were sent")]
    ShortWrite { addr: SocketAddr, sent: usize },
}

/// Parses a hardware address. Besides pnet's `AA:BB:CC:DD:EE:FF` form this
/// accepts `AA-BB-CC-DD-EE-FF` and twelve bare hex digits.
pub fn parse_mac(raw: &str) -> Result<MacAddr, WakeError> {
    let trimmed = raw.trim();
    let normalised = if trimmed.len() == 12 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        (0..6)
            .map(|idx| &trimmed[idx * 2..idx * 2 + 2])
            .collect::<Vec<_>>()
            .join(":")
    } else if !trimmed.contains(':') {
        trimmed.replace('-', ":")
    } else {
        trimmed.to_string()
    };
    normalised
        .parse::<MacAddr>()
        .map_err(|_| WakeError::InvalidMac(raw.to_string()))
}

/// Six bytes of `0xFF` followed by the hardware address sixteen times.
pub fn magic_packet(mac: MacAddr) -> [u8; MAGIC_PACKET_LEN] {
    let octets = mac.octets();
    let mut packet = [0xFF; MAGIC_PACKET_LEN];
    for chunk in packet[6..].chunks_exact_mut(6) {
        chunk.copy_from_slice(&octets);
    }
    packet
}

/// Sends a wake signal to a hardware address. Success means the signal left
/// this host, not that the machine woke up.
#[async_trait]
pub trait WakeSender: Send + Sync {
    async fn wake(&self, mac: &str) -> Result<(), WakeError>;
}

/// Broadcasts magic packets over UDP.
#[derive(Debug, Clone)]
pub struct UdpWakeSender {
    destination: SocketAddr,
}

impl UdpWakeSender {
    pub fn new(destination: SocketAddr) -> Self {
        Self { destination }
    }
}

impl Default for UdpWakeSender {
    fn default() -> Self {
        Self::new(DEFAULT_BROADCAST)
    }
}

#[async_trait]
impl WakeSender for UdpWakeSender {
    async fn wake(&self, mac: &str) -> Result<(), WakeError> {
        let mac = parse_mac(mac)?;
        let addr = self.destination;
        let send_err = |source| WakeError::Send { addr, source };

        let bind: SocketAddr = if addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind).await.map_err(send_err)?;
        socket.set_broadcast(true).map_err(send_err)?;

        let packet = magic_packet(mac);
        let sent = socket.send_to(&packet, addr).await.map_err(send_err)?;
        if sent != packet.len() {
            return Err(WakeError::ShortWrite { addr, sent });
        }
        debug!(%mac, %addr, "magic packet sent");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
