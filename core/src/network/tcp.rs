//! TCP connect probing.
//!
//! A probe is a plain three-way handshake bounded by a timeout. Refused and
//! timed out attempts are the normal signal for a port that is not open, so
//! they are reported as [`PortState::Closed`] and never logged above `trace`.
//!
//! [`PortState::Closed`]: portly_common::network::port::PortState::Closed

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use portly_common::config::Config;
use portly_common::network::port::{PortResult, Protocol};
use portly_common::services;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

pub const NO_BANNER: &str = "No banner available";

const BANNER_BUFFER_SIZE: usize = 1024;
const BANNER_REQUEST: &[u8] = b"GET / HTTP/1.1\r\n\r\n";

/// Probes a single `(address, port)` pair and always yields an outcome.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: IpAddr, port: u16) -> PortResult;
}

#[derive(Debug, Clone)]
pub struct TcpProber {
    connect_timeout: Duration,
    banner_timeout: Option<Duration>,
}

impl TcpProber {
    pub fn new(connect_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            banner_timeout: None,
        }
    }

    /// Enables banner grabbing on open ports, bounded by `limit`.
    pub fn with_banner(mut self, limit: Duration) -> Self {
        self.banner_timeout = Some(limit);
        self
    }

    pub fn from_config(cfg: &Config) -> Self {
        let prober = Self::new(cfg.connect_timeout);
        match cfg.grab_banner {
            true => prober.with_banner(cfg.banner_timeout),
            false => prober,
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: IpAddr, port: u16) -> PortResult {
        let socket_addr: SocketAddr = SocketAddr::new(addr, port);

        match timeout(self.connect_timeout, TcpStream::connect(socket_addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                let service: &str = services::service_name(port, Protocol::Tcp);
                let result: PortResult = PortResult::open(addr, port, service);
                match self.banner_timeout {
                    Some(limit) => result.with_banner(grab_banner(socket_addr, limit).await),
                    None => result,
                }
            }
            Ok(Err(e)) => failed_connect(addr, port, Some(e)),
            Err(_elapsed) => failed_connect(addr, port, None),
        }
    }
}

/// Outcome of a connect that did not complete. `None` means the timeout elapsed.
fn failed_connect(addr: IpAddr, port: u16, failure: Option<io::Error>) -> PortResult {
    match failure {
        None => {
            trace!("{addr}:{port} timed out");
            PortResult::closed(addr, port)
        }
        Some(e) if is_closed(&e) => {
            trace!("{addr}:{port} closed: {e}");
            PortResult::closed(addr, port)
        }
        Some(e) => {
            debug!("Could not scan port {port}: {e}");
            PortResult::error(addr, port, e.to_string())
        }
    }
}

fn is_closed(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionRefused | io::ErrorKind::TimedOut
    )
}

/// Opens a fresh connection, sends a minimal HTTP request and returns what
/// the service answered. Any failure yields [`NO_BANNER`].
pub async fn grab_banner(addr: SocketAddr, limit: Duration) -> String {
    match timeout(limit, read_banner(addr)).await {
        Ok(Ok(banner)) if !banner.is_empty() => banner,
        Ok(Ok(_)) => NO_BANNER.to_string(),
        Ok(Err(e)) => {
            trace!("Banner grab on {addr} failed: {e}");
            NO_BANNER.to_string()
        }
        Err(_elapsed) => NO_BANNER.to_string(),
    }
}

async fn read_banner(addr: SocketAddr) -> io::Result<String> {
    let mut stream: TcpStream = TcpStream::connect(addr).await?;
    stream.write_all(BANNER_REQUEST).await?;

    let mut buf = [0u8; BANNER_BUFFER_SIZE];
    let read: usize = stream.read(&mut buf).await?;
    let text: &str = std::str::from_utf8(&buf[..read])
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    Ok(text.trim().to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
