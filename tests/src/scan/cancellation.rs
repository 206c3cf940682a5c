use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use portly_common::ScanError;
use portly_common::network::port::PortResult;
use portly_common::network::range::PortRange;
use portly_common::network::request::ScanRequest;
use portly_common::network::target::Target;
use portly_core::{PortScanner, ScanObserver, StopSignal};

use crate::support::{CountingProber, LOCALHOST, StaticResolver};

/// Raises the stop signal as soon as the first outcome arrives.
struct StopAfterFirst(StopSignal);

impl ScanObserver for StopAfterFirst {
    fn port_scanned(&self, _result: &PortResult) {
        self.0.stop();
    }
}

#[tokio::test]
async fn stop_signal_drains_in_flight_probes() {
    let prober = Arc::new(CountingProber::new(Duration::from_millis(20)));
    let stop = StopSignal::new();
    let scanner = PortScanner::new(prober.clone()).with_stop_signal(stop.clone());
    let request = ScanRequest::new("localhost", LOCALHOST, PortRange::new(1, 5000).unwrap(), 8).unwrap();

    let report = scanner.scan(&request, &StopAfterFirst(stop)).await;

    assert!(report.cancelled);
    assert!(!report.is_complete());
    assert!(report.probed >= 1);
    // every dispatched probe was settled before the scan returned
    assert_eq!(report.probed, prober.calls.load(Ordering::SeqCst));
}

#[tokio::test]
async fn stop_during_first_target_cancels_the_rest() {
    let prober = Arc::new(CountingProber::new(Duration::from_millis(5)));
    let stop = StopSignal::new();
    let scanner = PortScanner::new(prober).with_stop_signal(stop.clone());
    let resolver = StaticResolver(
        [("first.example", LOCALHOST), ("second.example", LOCALHOST)]
            .into_iter()
            .collect(),
    );
    let targets = vec![
        Target::new("first.example"),
        Target::new("second.example"),
        Target::new("third.example"),
    ];

    let outcomes = scanner
        .scan_targets(&resolver, targets, PortRange::new(1, 2000).unwrap(), 4, &StopAfterFirst(stop))
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    let first = outcomes[0].result.as_ref().unwrap();
    assert!(first.cancelled);
    for outcome in &outcomes[1..] {
        assert!(matches!(outcome.result, Err(ScanError::Cancelled)));
    }
}
