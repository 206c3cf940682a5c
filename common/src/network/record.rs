//! # Persisted Scan Record
//!
//! One line per open port:
//!
//! ```text
//! 2026-10-19 14:03:11.204518 - 192.168.1.10:22 (TCP) - ssh
//! ```
//!
//! [`fmt::Display`] writes that line without the trailing newline and
//! [`FromStr`] reads it back.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::ScanError;
use crate::network::port::{PortResult, Protocol};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanRecord {
    pub timestamp: NaiveDateTime,
    pub target: String,
    pub port: u16,
    pub protocol: Protocol,
    pub service: String,
}

impl ScanRecord {
    /// Builds the record for an open result. Anything else is not persisted.
    pub fn from_result(result: &PortResult) -> Option<Self> {
        if !result.is_open() {
            return None;
        }

        Some(Self {
            timestamp: result.timestamp.naive_local(),
            target: result.addr.to_string(),
            port: result.port,
            protocol: result.protocol,
            service: result
                .service
                .clone()
                .unwrap_or_else(|| crate::services::UNKNOWN_SERVICE.to_string()),
        })
    }
}

impl fmt::Display for ScanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}:{} ({}) - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.target,
            self.port,
            self.protocol,
            self.service
        )
    }
}

impl FromStr for ScanRecord {
    type Err = ScanError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || ScanError::MalformedRecord(line.to_string());
        let line = line.trim_end_matches(['\r', '\n']);

        let (timestamp, rest) = line.split_once(" - ").ok_or_else(malformed)?;
        let (endpoint, rest) = rest.split_once(" (").ok_or_else(malformed)?;
        let (protocol, service) = rest.split_once(") - ").ok_or_else(malformed)?;
        // rsplit keeps IPv6 literals intact
        let (target, port) = endpoint.rsplit_once(':').ok_or_else(malformed)?;

        if target.is_empty() || service.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            timestamp: NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
                .map_err(|_| malformed())?,
            target: target.to_string(),
            port: port.parse().map_err(|_| malformed())?,
            protocol: protocol.parse().map_err(|_| malformed())?,
            service: service.to_string(),
        })
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
