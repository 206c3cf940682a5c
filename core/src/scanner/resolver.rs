use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use portly_common::ScanError;
use portly_common::network::target::Target;
use tokio::net::lookup_host;
use tracing::debug;

/// Maps a hostname or literal address to the address that will be probed.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<IpAddr, ScanError>;
}

/// Uses the operating system resolver, preferring IPv4 results.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

#[async_trait]
impl Resolve for SystemResolver {
    async fn resolve(&self, name: &str) -> Result<IpAddr, ScanError> {
        let name: &str = name.trim();
        if let Ok(addr) = name.parse::<IpAddr>() {
            return Ok(addr);
        }

        if name.is_empty() {
            return Err(resolution_error(name, "empty hostname"));
        }

        let addrs: Vec<SocketAddr> = lookup_host((name, 0))
            .await
            .map_err(|e| resolution_error(name, &e.to_string()))?
            .collect();

        let addr: IpAddr = preferred(addrs.iter().map(SocketAddr::ip))
            .ok_or_else(|| resolution_error(name, "no addresses returned"))?;

        debug!("Resolved {name} to {addr}");
        Ok(addr)
    }
}

/// Resolves `target` once, returning it pinned to its address.
pub async fn resolve_target(resolver: &dyn Resolve, target: Target) -> Result<Target, ScanError> {
    if target.is_resolved() {
        return Ok(target);
    }
    let addr: IpAddr = resolver.resolve(&target.name).await?;
    Ok(target.resolved(addr))
}

fn preferred(addrs: impl IntoIterator<Item = IpAddr>) -> Option<IpAddr> {
    let addrs: Vec<IpAddr> = addrs.into_iter().collect();
    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

fn resolution_error(name: &str, reason: &str) -> ScanError {
    ScanError::Resolution {
        name: name.to_string(),
        reason: reason.to_string(),
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
