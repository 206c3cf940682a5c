//! # Port Range Model
//!
//! A validated, inclusive range of TCP ports.
//!
//! Construction is the only place the `1 <= start <= end <= 65535` invariant is
//! checked, so every [`PortRange`] in circulation is valid and immutable.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::ScanError;

pub const MIN_PORT: u16 = 1;
pub const MAX_PORT: u16 = u16::MAX;
pub const QUICK_SCAN_END: u16 = 1024;

/// Represents a continuous range of ports, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    pub fn new(start: u16, end: u16) -> Result<Self, ScanError> {
        Self::checked(start.into(), end.into())
    }

    /// Validates raw user numbers, which may exceed the `u16` domain.
    pub fn checked(start: u32, end: u32) -> Result<Self, ScanError> {
        let in_bounds = |p: u32| (u32::from(MIN_PORT)..=u32::from(MAX_PORT)).contains(&p);
        if !in_bounds(start) || !in_bounds(end) || start > end {
            return Err(ScanError::InvalidRange { start, end });
        }
        Ok(Self {
            start: start as u16,
            end: end as u16,
        })
    }

    /// Well-known ports, 1-1024.
    pub fn quick() -> Self {
        Self {
            start: MIN_PORT,
            end: QUICK_SCAN_END,
        }
    }

    /// Every TCP port, 1-65535.
    pub fn full() -> Self {
        Self {
            start: MIN_PORT,
            end: MAX_PORT,
        }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of ports in the range. Never zero.
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn contains(&self, port: u16) -> bool {
        (self.start..=self.end).contains(&port)
    }

    pub fn iter(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl IntoIterator for PortRange {
    type Item = u16;
    type IntoIter = RangeInclusive<u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for PortRange {
    type Err = ScanError;

    /// Parses a port range.
    ///
    /// Supported formats:
    /// * **Presets**: "quick" (1-1024) and "full" (1-65535), case-insensitive.
    /// * **Range**: "Start-End" (e.g., "20-25").
    /// * **Single port**: "443".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "quick" => return Ok(Self::quick()),
            "full" => return Ok(Self::full()),
            _ => {}
        }

        let (start, end) = match s.split_once('-') {
            Some((start, end)) => (parse_port(start, s)?, parse_port(end, s)?),
            None => {
                let port = parse_port(s, s)?;
                (port, port)
            }
        };

        Self::checked(start, end)
    }
}

fn parse_port(part: &str, original: &str) -> Result<u32, ScanError> {
    part.trim()
        .parse::<u32>()
        .map_err(|_| ScanError::InvalidPortSpec(original.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
