use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use portly_common::ScanError;
use portly_common::network::range::PortRange;
use portly_common::network::target::Target;
use portly_core::{PortScanner, TargetOutcome};

use crate::support::{CountingProber, LOCALHOST, Recorder, StaticResolver};

fn resolver() -> StaticResolver {
    StaticResolver(HashMap::from([("good.example", LOCALHOST), ("also-good.example", LOCALHOST)]))
}

#[tokio::test]
async fn resolution_failure_skips_only_that_target() {
    let scanner = PortScanner::new(Arc::new(CountingProber::new(Duration::ZERO)));
    let recorder = Recorder::default();
    let targets = vec![
        Target::new("missing.example"),
        Target::new("good.example"),
        Target::new("also-missing.example"),
        Target::new("also-good.example"),
    ];

    let outcomes: Vec<TargetOutcome> = scanner
        .scan_targets(&resolver(), targets, PortRange::new(1, 50).unwrap(), 5, &recorder)
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 4);
    assert!(matches!(outcomes[0].result, Err(ScanError::Resolution { .. })));
    assert!(matches!(outcomes[2].result, Err(ScanError::Resolution { .. })));

    for outcome in [&outcomes[1], &outcomes[3]] {
        let report = outcome.result.as_ref().unwrap();
        assert!(report.is_complete());
        assert_eq!(outcome.target.addr, Some(LOCALHOST));
    }

    assert_eq!(recorder.started.load(Ordering::SeqCst), 2);
    assert_eq!(recorder.results.lock().unwrap().len(), 100);
    assert_eq!(
        *recorder.failed.lock().unwrap(),
        vec!["missing.example".to_string(), "also-missing.example".to_string()]
    );
}

#[tokio::test]
async fn targets_are_scanned_one_after_another() {
    let prober = Arc::new(CountingProber::new(Duration::from_millis(2)));
    let scanner = PortScanner::new(prober.clone());
    let targets = vec![Target::new("good.example"), Target::new("also-good.example")];

    scanner
        .scan_targets(&resolver(), targets, PortRange::new(1, 40).unwrap(), 4, &Recorder::default())
        .await
        .unwrap();

    // two targets, four probes each at most, never overlapping
    assert!(prober.peak.load(Ordering::SeqCst) <= 4);
    assert_eq!(prober.calls.load(Ordering::SeqCst), 80);
}

#[tokio::test]
async fn invalid_concurrency_fails_the_whole_run() {
    let scanner = PortScanner::new(Arc::new(CountingProber::new(Duration::ZERO)));
    let result = scanner
        .scan_targets(&resolver(), vec![Target::new("good.example")], PortRange::quick(), 0, &Recorder::default())
        .await;
    assert!(matches!(result, Err(ScanError::InvalidConcurrency)));
}
