//! The **scan coordinator**.
//!
//! A [`PortScanner`] fans one probe per port out over a pool of tasks bounded
//! by the request's concurrency limit, settles every outcome exactly once and
//! forwards open ports to the configured [`ResultSink`].
//!
//! Targets are processed one after another by [`PortScanner::scan_targets`];
//! only the ports of a single target are probed concurrently. A failure local
//! to one probe or one target never aborts unrelated work.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use portly_common::ScanError;
use portly_common::network::port::{PortResult, PortState};
use portly_common::network::range::PortRange;
use portly_common::network::request::ScanRequest;
use portly_common::network::target::Target;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, error, warn};

use crate::network::tcp::Prober;
use crate::sink::ResultSink;

pub mod resolver;

use resolver::Resolve;

/// Cooperative cancellation flag shared between the coordinator and its caller.
///
/// Once raised, no new probe is dispatched. Probes already in flight finish or
/// time out on their own and are still accounted for.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Receives progress while a scan runs. Results arrive in completion order.
pub trait ScanObserver: Send + Sync {
    fn target_started(&self, _request: &ScanRequest) {}

    fn port_scanned(&self, result: &PortResult);

    fn target_finished(&self, _report: &ScanReport) {}

    fn target_failed(&self, _target: &Target, _error: &ScanError) {}
}

/// Observer that ignores everything.
pub struct Silent;

impl ScanObserver for Silent {
    fn port_scanned(&self, _result: &PortResult) {}
}

/// Summary of one target's scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub target: String,
    pub addr: IpAddr,
    pub range: PortRange,
    /// Outcomes settled so far, whatever their state.
    pub probed: usize,
    pub closed: usize,
    pub open: Vec<PortResult>,
    pub errors: Vec<PortResult>,
    pub sink_failures: Vec<String>,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl ScanReport {
    fn new(request: &ScanRequest) -> Self {
        Self {
            target: request.target.clone(),
            addr: request.addr,
            range: request.range,
            probed: 0,
            closed: 0,
            open: Vec::new(),
            errors: Vec::new(),
            sink_failures: Vec::new(),
            cancelled: false,
            elapsed: Duration::ZERO,
        }
    }

    fn add(&mut self, result: PortResult) {
        self.probed += 1;
        match result.state {
            PortState::Open => self.open.push(result),
            PortState::Closed => self.closed += 1,
            PortState::Error(_) => self.errors.push(result),
        }
    }

    /// Every port of the range produced an outcome.
    pub fn is_complete(&self) -> bool {
        self.probed == self.range.len()
    }
}

/// The per-target result of a multi-target run.
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: Target,
    pub result: Result<ScanReport, ScanError>,
}

pub struct PortScanner {
    prober: Arc<dyn Prober>,
    sink: Option<Arc<dyn ResultSink>>,
    stop: StopSignal,
}

impl PortScanner {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober,
            sink: None,
            stop: StopSignal::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Scans every port of `request.range` on `request.addr`.
    ///
    /// At most `request.concurrency` probes are in flight at any moment. The
    /// returned report accounts for every dispatched probe; when the stop
    /// signal was raised the report is flagged `cancelled` and covers only
    /// the ports dispatched before that.
    pub async fn scan(&self, request: &ScanRequest, observer: &dyn ScanObserver) -> ScanReport {
        let started: Instant = Instant::now();
        let mut report: ScanReport = ScanReport::new(request);
        let permits: Arc<Semaphore> = Arc::new(Semaphore::new(pool_size(request)));
        let mut probes: JoinSet<PortResult> = JoinSet::new();
        let mut in_flight: HashMap<task::Id, u16> = HashMap::new();

        debug!(
            "Dispatching {} probes against {} with concurrency {}",
            request.range.len(),
            request.addr,
            request.concurrency
        );
        observer.target_started(request);

        for port in request.range {
            if self.stop.is_stopped() {
                report.cancelled = true;
                break;
            }

            // The semaphore is never closed, so acquiring only waits.
            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                break;
            };

            let prober: Arc<dyn Prober> = Arc::clone(&self.prober);
            let addr: IpAddr = request.addr;
            let handle = probes.spawn(async move {
                let _permit = permit;
                prober.probe(addr, port).await
            });
            in_flight.insert(handle.id(), port);

            while let Some(joined) = probes.try_join_next_with_id() {
                self.settle(joined, request.addr, &mut in_flight, &mut report, observer)
                    .await;
            }
        }

        while let Some(joined) = probes.join_next_with_id().await {
            self.settle(joined, request.addr, &mut in_flight, &mut report, observer)
                .await;
        }

        report.elapsed = started.elapsed();
        if report.cancelled {
            warn!(
                "Scan of {} stopped after {} of {} ports",
                request.target,
                report.probed,
                request.range.len()
            );
        }
        observer.target_finished(&report);
        report
    }

    /// Resolves and scans each target in turn.
    ///
    /// A target that cannot be resolved is reported as failed and skipped; the
    /// remaining targets are still scanned. Once the stop signal is raised every
    /// target not yet started gets a [`ScanError::Cancelled`] outcome.
    pub async fn scan_targets(
        &self,
        resolver: &dyn Resolve,
        targets: Vec<Target>,
        range: PortRange,
        concurrency: usize,
        observer: &dyn ScanObserver,
    ) -> Result<Vec<TargetOutcome>, ScanError> {
        if concurrency == 0 {
            return Err(ScanError::InvalidConcurrency);
        }

        let mut outcomes: Vec<TargetOutcome> = Vec::with_capacity(targets.len());
        let mut pending = targets.into_iter();
        while let Some(target) = pending.next() {
            if self.stop.is_stopped() {
                let skipped: Vec<Target> = std::iter::once(target).chain(pending).collect();
                warn!("Scan stopped, {} targets not scanned", skipped.len());
                outcomes.extend(skipped.into_iter().map(|target| TargetOutcome {
                    target,
                    result: Err(ScanError::Cancelled),
                }));
                break;
            }

            let target: Target = match resolver::resolve_target(resolver, target.clone()).await {
                Ok(resolved) => resolved,
                Err(e) => {
                    debug!("Skipping {}: {e}", target.name);
                    observer.target_failed(&target, &e);
                    outcomes.push(TargetOutcome {
                        target,
                        result: Err(e),
                    });
                    continue;
                }
            };

            let result = match target.addr {
                Some(addr) => match ScanRequest::new(&target.name, addr, range, concurrency) {
                    Ok(request) => Ok(self.scan(&request, observer).await),
                    Err(e) => Err(e),
                },
                None => Err(ScanError::Resolution {
                    name: target.name.clone(),
                    reason: "no address".to_string(),
                }),
            };

            outcomes.push(TargetOutcome { target, result });
        }

        Ok(outcomes)
    }

    async fn settle(
        &self,
        joined: Result<(task::Id, PortResult), JoinError>,
        addr: IpAddr,
        in_flight: &mut HashMap<task::Id, u16>,
        report: &mut ScanReport,
        observer: &dyn ScanObserver,
    ) {
        let result: PortResult = match joined {
            Ok((id, result)) => {
                in_flight.remove(&id);
                result
            }
            Err(e) => {
                let port: u16 = in_flight.remove(&e.id()).unwrap_or_default();
                PortResult::error(addr, port, format!("probe task failed: {e}"))
            }
        };

        if let Some(sink) = self.sink.as_ref().filter(|_| result.is_open()) {
            if let Err(reason) = persist(Arc::clone(sink), result.clone()).await {
                error!("Failed to persist {}:{}: {reason}", result.addr, result.port);
                report.sink_failures.push(reason);
            }
        }

        observer.port_scanned(&result);
        report.add(result);
    }
}

/// Sink writes are blocking file I/O, so they run on the blocking pool while
/// in-flight probes keep making progress.
async fn persist(sink: Arc<dyn ResultSink>, result: PortResult) -> Result<(), String> {
    match task::spawn_blocking(move || sink.record(&result)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("sink task failed: {e}")),
    }
}

/// More permits than ports can never be used, and tokio caps a semaphore at
/// [`Semaphore::MAX_PERMITS`].
fn pool_size(request: &ScanRequest) -> usize {
    request
        .concurrency
        .get()
        .min(request.range.len())
        .min(Semaphore::MAX_PERMITS)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
