//! # Per-Port Outcome Model
//!
//! Every probe produces exactly one [`PortResult`]. A refused or timed out
//! connection is the named state [`PortState::Closed`], not the absence of a result.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use chrono::{DateTime, Local};

use crate::ScanError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Protocol {
    #[default]
    Tcp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            _ => Err(ScanError::InvalidChoice(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortState {
    /// The handshake completed.
    Open,
    /// Refused or timed out. The two causes are not distinguished.
    Closed,
    /// Any other network failure, with the underlying cause.
    Error(String),
}

#[derive(Clone, Debug)]
pub struct PortResult {
    pub addr: IpAddr,
    pub port: u16,
    pub protocol: Protocol,
    pub state: PortState,
    pub service: Option<String>,
    pub banner: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl PortResult {
    fn with_state(addr: IpAddr, port: u16, state: PortState) -> Self {
        Self {
            addr,
            port,
            protocol: Protocol::Tcp,
            state,
            service: None,
            banner: None,
            timestamp: Local::now(),
        }
    }

    pub fn open(addr: IpAddr, port: u16, service: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
            ..Self::with_state(addr, port, PortState::Open)
        }
    }

    pub fn closed(addr: IpAddr, port: u16) -> Self {
        Self::with_state(addr, port, PortState::Closed)
    }

    pub fn error(addr: IpAddr, port: u16, reason: impl Into<String>) -> Self {
        Self::with_state(addr, port, PortState::Error(reason.into()))
    }

    pub fn with_banner(mut self, banner: String) -> Self {
        self.banner = Some(banner);
        self
    }

    pub fn is_open(&self) -> bool {
        self.state == PortState::Open
    }

    pub fn is_error(&self) -> bool {
        matches!(self.state, PortState::Error(_))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn open_result_carries_service() {
        let result = PortResult::open(ADDR, 22, "ssh");
        assert!(result.is_open());
        assert!(!result.is_error());
        assert_eq!(result.service.as_deref(), Some("ssh"));
        assert_eq!(result.protocol, Protocol::Tcp);
    }

    #[test]
    fn closed_result_has_no_service() {
        let result = PortResult::closed(ADDR, 23);
        assert_eq!(result.state, PortState::Closed);
        assert!(result.service.is_none());
    }

    #[test]
    fn error_result_keeps_reason() {
        let result = PortResult::error(ADDR, 80, "network unreachable");
        assert_eq!(result.state, PortState::Error("network unreachable".into()));
        assert!(result.is_error());
    }

    #[test]
    fn protocol_round_trips_through_text() {
        assert_eq!(Protocol::Tcp.to_string(), "TCP");
        assert_eq!("tcp".parse::<Protocol>().unwrap(), Protocol::Tcp);
        assert!("udp".parse::<Protocol>().is_err());
    }
}
