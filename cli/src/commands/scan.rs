use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use colored::*;
use portly_common::ScanError;
use portly_common::config::Config;
use portly_common::network::port::PortResult;
use portly_common::network::range::PortRange;
use portly_common::network::request::ScanRequest;
use portly_common::network::target::Target;
use portly_core::{
    FileSink, PortScanner, ScanObserver, ScanReport, StopSignal, SystemResolver, TargetOutcome,
    TcpProber,
};
use tracing::{error, info};

use crate::mprint;
use crate::terminal::{colors, format, print, progress};

pub async fn scan(
    targets: Vec<Target>,
    range: PortRange,
    concurrency: usize,
    cfg: &Config,
    stop: StopSignal,
) -> anyhow::Result<()> {
    let sink: Arc<FileSink> = Arc::new(FileSink::open(&cfg.output)?);
    let prober: Arc<TcpProber> = Arc::new(TcpProber::from_config(cfg));
    let scanner: PortScanner = PortScanner::new(prober)
        .with_sink(sink)
        .with_stop_signal(stop);

    let observer: TerminalObserver = TerminalObserver::new(cfg.quiet);
    let start_time: Instant = Instant::now();
    let outcomes: Vec<TargetOutcome> = scanner
        .scan_targets(&SystemResolver, targets, range, concurrency, &observer)
        .await?;

    scan_ends(&outcomes, start_time, cfg);

    let failed: usize = outcomes.iter().filter(|o| o.result.is_err()).count();
    if !outcomes.is_empty() && failed == outcomes.len() {
        anyhow::bail!("none of the requested targets could be scanned");
    }
    Ok(())
}

fn scan_ends(outcomes: &[TargetOutcome], start_time: Instant, cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }

    print::header("scan summary", cfg.quiet);
    let reports: Vec<&ScanReport> = outcomes.iter().filter_map(|o| o.result.as_ref().ok()).collect();
    if reports.iter().all(|report| report.open.is_empty()) {
        print::no_results();
    }

    for (idx, outcome) in outcomes.iter().enumerate() {
        match &outcome.result {
            Ok(report) => {
                print::tree_head(idx, &outcome.target);
                print::as_tree_one_level(format::report_to_details(report));
            }
            Err(e) => {
                print::tree_head(idx, &outcome.target);
                let reason: ColoredString = e.to_string().color(colors::FAILURE);
                print::as_tree_one_level(vec![("Skipped".to_string(), reason)]);
            }
        }
        if idx + 1 != outcomes.len() {
            mprint!();
        }
    }

    let open: usize = reports.iter().map(|report| report.open.len()).sum();
    let summary: String = format!(
        "Port scan completed: {} found in {}",
        format!("{open} open ports").bold().green(),
        format::duration(start_time.elapsed())
    );

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&summary);
            print::end_of_program();
        }
        _ => {
            mprint!();
            print::print(&summary);
        }
    }
    print::aligned_line("Results saved to", &cfg.output.display().to_string());
}

/// Live terminal output: a progress bar per target and one line per open port.
pub struct TerminalObserver {
    quiet: u8,
    open_found: AtomicUsize,
}

impl TerminalObserver {
    pub fn new(quiet: u8) -> Self {
        Self {
            quiet,
            open_found: AtomicUsize::new(0),
        }
    }
}

impl ScanObserver for TerminalObserver {
    fn target_started(&self, request: &ScanRequest) {
        self.open_found.store(0, Ordering::Relaxed);
        if self.quiet == 0 {
            mprint!();
            info!(
                "Scanning {} from port {} to {}...",
                request.target.bold(),
                request.range.start(),
                request.range.end()
            );
        }
        progress::start(request.range.len() as u64, self.quiet > 0);
    }

    fn port_scanned(&self, result: &PortResult) {
        if result.is_open() {
            print::open_port(result);
            let found: usize = self.open_found.fetch_add(1, Ordering::Relaxed) + 1;
            progress::set_message(format!("({} open)", found.to_string().green().bold()));
        }
        progress::inc();
    }

    fn target_finished(&self, report: &ScanReport) {
        progress::finish();
        if self.quiet == 0 && report.cancelled {
            info!("Partial results for {} kept", report.target);
        }
    }

    fn target_failed(&self, _target: &Target, error: &ScanError) {
        error!("{error}");
    }
}
