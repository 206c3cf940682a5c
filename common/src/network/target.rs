//! # Scan Target Model
//!
//! A target is what the user typed (hostname or literal address) plus, once the
//! resolver has run, the address that will actually be probed.

use std::fmt;
use std::fs;
use std::net::IpAddr;
use std::path::Path;

use tracing::debug;

use crate::ScanError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub addr: Option<IpAddr>,
}

impl Target {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            addr: None,
        }
    }

    /// Consumes the unresolved target and pins it to `addr`.
    pub fn resolved(self, addr: IpAddr) -> Self {
        Self {
            name: self.name,
            addr: Some(addr),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.addr.is_some()
    }

    /// Reads targets from a file, one per line. Blank lines are skipped.
    pub fn from_file(path: &Path) -> Result<Vec<Target>, ScanError> {
        let content = fs::read_to_string(path).map_err(|source| ScanError::TargetFile {
            path: path.to_path_buf(),
            source,
        })?;

        let targets = parse_lines(&content);
        if targets.is_empty() {
            return Err(ScanError::EmptyTargetFile {
                path: path.to_path_buf(),
            });
        }

        debug!("Loaded {} targets from {}", targets.len(), path.display());
        Ok(targets)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr {
            Some(addr) if addr.to_string() != self.name => write!(f, "{} ({addr})", self.name),
            _ => write!(f, "{}", self.name),
        }
    }
}

fn parse_lines(content: &str) -> Vec<Target> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Target::new)
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
