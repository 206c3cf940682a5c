use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{spinner:.blue} [{elapsed_precise}] [{bar:36.green/bright_black}] {pos}/{len} ports {msg}";
const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Replaces the active bar with a fresh one of `len` steps.
pub fn start(len: u64, hidden: bool) {
    let pb: ProgressBar = match hidden {
        true => ProgressBar::hidden(),
        false => ProgressBar::new(len),
    };
    let style: ProgressStyle = ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICKS)
        .progress_chars("━╸─");
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));

    if let Some(previous) = slot().replace(pb) {
        previous.finish_and_clear();
    }
}

pub fn inc() {
    if let Some(pb) = slot().as_ref() {
        pb.inc(1);
    }
}

pub fn set_message(msg: String) {
    if let Some(pb) = slot().as_ref() {
        pb.set_message(msg);
    }
}

pub fn finish() {
    if let Some(pb) = slot().take() {
        pb.finish_and_clear();
    }
}

/// Runs `f` with the active bar hidden, so whatever `f` prints stays intact.
pub fn suspend<F: FnOnce() -> R, R>(f: F) -> R {
    let active: Option<ProgressBar> = slot().clone();
    match active {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}

fn slot() -> std::sync::MutexGuard<'static, Option<ProgressBar>> {
    ACTIVE.lock().unwrap_or_else(PoisonError::into_inner)
}
