use std::time::Duration;

use crate::terminal::colors;
use colored::*;
use portly_core::ScanReport;

type Detail = (String, ColoredString);

pub fn duration(elapsed: Duration) -> ColoredString {
    format!("{:.2}s", elapsed.as_secs_f64()).bold().yellow()
}

pub fn report_to_details(report: &ScanReport) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("Address".to_string(), report.addr.to_string().color(colors::PRIMARY)),
        ("Range".to_string(), report.range.to_string().normal()),
        (
            "Open".to_string(),
            report.open.len().to_string().color(colors::OPEN).bold(),
        ),
        ("Closed".to_string(), report.closed.to_string().normal()),
    ];

    if !report.errors.is_empty() {
        details.push(errors_detail(report));
    }

    if !report.sink_failures.is_empty() {
        let failed: ColoredString = format!("{} results not saved", report.sink_failures.len())
            .color(colors::FAILURE)
            .bold();
        details.push(("Storage".to_string(), failed));
    }

    if report.cancelled {
        let partial: ColoredString =
            format!("stopped after {} of {} ports", report.probed, report.range.len()).yellow();
        details.push(("Status".to_string(), partial));
    }

    details.push(("Time".to_string(), duration(report.elapsed)));
    details
}

fn errors_detail(report: &ScanReport) -> Detail {
    let first_reason: &str = report
        .errors
        .iter()
        .find_map(|result| match &result.state {
            portly_common::network::port::PortState::Error(reason) => Some(reason.as_str()),
            _ => None,
        })
        .unwrap_or_default();

    let value: ColoredString = format!("{} (e.g. {})", report.errors.len(), first_reason)
        .color(colors::FAILURE);
    ("Errors".to_string(), value)
}
