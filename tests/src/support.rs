use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use portly_common::ScanError;
use portly_common::network::port::PortResult;
use portly_common::network::record::ScanRecord;
use portly_core::{Prober, Resolve, ScanObserver};
use tokio::net::TcpListener;

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

pub async fn listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

pub fn read_records(path: &Path) -> Vec<ScanRecord> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|line| line.parse::<ScanRecord>().expect("malformed record line"))
        .collect()
}

/// Resolves names from a fixed table; anything else fails like an unknown host.
pub struct StaticResolver(pub HashMap<&'static str, IpAddr>);

#[async_trait]
impl Resolve for StaticResolver {
    async fn resolve(&self, name: &str) -> Result<IpAddr, ScanError> {
        self.0.get(name).copied().ok_or_else(|| ScanError::Resolution {
            name: name.to_string(),
            reason: "Name or service not known".to_string(),
        })
    }
}

/// Every port is closed after `delay`. Tracks the peak number of probes in flight.
pub struct CountingProber {
    pub delay: Duration,
    current: AtomicUsize,
    pub peak: AtomicUsize,
    pub calls: AtomicUsize,
}

impl CountingProber {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Prober for CountingProber {
    async fn probe(&self, addr: IpAddr, port: u16) -> PortResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.current.fetch_sub(1, Ordering::SeqCst);
        PortResult::closed(addr, port)
    }
}

/// Collects every outcome it is shown.
#[derive(Default)]
pub struct Recorder {
    pub results: Mutex<Vec<PortResult>>,
    pub started: AtomicUsize,
    pub failed: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn ports(&self) -> Vec<u16> {
        let mut ports: Vec<u16> = self.results.lock().unwrap().iter().map(|r| r.port).collect();
        ports.sort_unstable();
        ports
    }
}

impl ScanObserver for Recorder {
    fn target_started(&self, _request: &portly_common::network::request::ScanRequest) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn port_scanned(&self, result: &PortResult) {
        self.results.lock().unwrap().push(result.clone());
    }

    fn target_failed(&self, target: &portly_common::network::target::Target, _error: &ScanError) {
        self.failed.lock().unwrap().push(target.name.clone());
    }
}
