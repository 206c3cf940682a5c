use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use portly_common::network::range::PortRange;
use portly_common::network::request::ScanRequest;
use portly_core::{FileSink, PortScanner, ScanReport, TcpProber};

use crate::support::{self, CountingProber, LOCALHOST, Recorder};

/// A real listener on loopback must be reported open exactly once, both in
/// the report and in the results file. Other ports in the window may belong to
/// unrelated processes, so the file is checked against the report.
#[tokio::test]
async fn listening_port_is_found_and_persisted_once() {
    let (_listener, port) = support::listener().await;
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(FileSink::open(dir.path().join("scan_results.txt")).unwrap());

    let range = PortRange::new(port.saturating_sub(20).max(1), port.saturating_add(20)).unwrap();
    let request = ScanRequest::new("localhost", LOCALHOST, range, 16).unwrap();
    let scanner = PortScanner::new(Arc::new(TcpProber::new(Duration::from_millis(500))))
        .with_sink(sink.clone());
    let recorder = Recorder::default();

    let report: ScanReport = scanner.scan(&request, &recorder).await;

    assert!(report.is_complete());
    assert_eq!(recorder.ports(), range.iter().collect::<Vec<u16>>());
    assert_eq!(report.open.iter().filter(|r| r.port == port).count(), 1);

    let records = support::read_records(sink.path());
    assert_eq!(records.len(), report.open.len());
    assert_eq!(records.iter().filter(|r| r.port == port).count(), 1);
    assert!(records.iter().all(|r| r.target == "127.0.0.1" && range.contains(r.port)));

    let persisted: HashSet<u16> = records.iter().map(|r| r.port).collect();
    let reported: HashSet<u16> = report.open.iter().map(|r| r.port).collect();
    assert_eq!(persisted, reported);
}

#[tokio::test]
async fn banner_is_attached_but_not_persisted() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let (listener, port) = support::listener().await;
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 128];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(b"HTTP/1.1 200 OK\r\nServer: test\r\n\r\n").await;
            });
        }
    });

    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(FileSink::open(dir.path().join("scan_results.txt")).unwrap());
    let prober = TcpProber::new(Duration::from_millis(500)).with_banner(Duration::from_secs(2));
    let scanner = PortScanner::new(Arc::new(prober)).with_sink(sink.clone());
    let request = ScanRequest::new("localhost", LOCALHOST, PortRange::new(port, port).unwrap(), 1).unwrap();

    let report = scanner.scan(&request, &Recorder::default()).await;

    assert_eq!(report.open.len(), 1);
    let banner = report.open[0].banner.as_deref().unwrap();
    assert!(banner.starts_with("HTTP/1.1 200 OK"));

    let records = support::read_records(sink.path());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].port, port);
}

/// The full range with a bounded pool settles every port and never exceeds the limit.
#[tokio::test]
async fn full_range_respects_concurrency_limit() {
    let prober = Arc::new(CountingProber::new(Duration::ZERO));
    let scanner = PortScanner::new(prober.clone());
    let addr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
    let request = ScanRequest::new("unreachable", addr, PortRange::full(), 50).unwrap();

    let report = scanner.scan(&request, &Recorder::default()).await;

    assert_eq!(report.probed, 65_535);
    assert_eq!(report.closed, 65_535);
    assert!(report.open.is_empty());
    assert_eq!(prober.calls.load(Ordering::SeqCst), 65_535);
    assert!(prober.peak.load(Ordering::SeqCst) <= 50);
}

#[tokio::test]
async fn slow_probes_never_exceed_the_limit() {
    let prober = Arc::new(CountingProber::new(Duration::from_millis(10)));
    let scanner = PortScanner::new(prober.clone());
    let request = ScanRequest::new("localhost", LOCALHOST, PortRange::new(1, 200).unwrap(), 12).unwrap();

    let report = scanner.scan(&request, &Recorder::default()).await;

    assert!(report.is_complete());
    let peak = prober.peak.load(Ordering::SeqCst);
    assert!(peak <= 12, "observed {peak} probes in flight");
}

/// Nothing answers on a documentation-only address: the scan still ends,
/// finds nothing and writes nothing.
#[tokio::test]
async fn unreachable_target_terminates_without_records() {
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(FileSink::open(dir.path().join("scan_results.txt")).unwrap());
    let scanner = PortScanner::new(Arc::new(TcpProber::new(Duration::from_millis(100))))
        .with_sink(sink.clone());
    let addr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
    let request = ScanRequest::new("test-net", addr, PortRange::new(1, 200).unwrap(), 50).unwrap();

    let report = tokio::time::timeout(Duration::from_secs(30), scanner.scan(&request, &Recorder::default()))
        .await
        .expect("scan hung");

    assert_eq!(report.probed, 200);
    assert!(report.open.is_empty());
    assert_eq!(report.closed + report.errors.len(), 200);
    assert!(support::read_records(sink.path()).is_empty());
}
