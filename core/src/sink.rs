//! # Result Sink
//!
//! Persists every open port as one line of the append-only results file.
//!
//! All writers go through [`ResultSink::record`]. The file implementation
//! holds a mutex around a handle opened in append mode and writes each line
//! with a single `write_all`, so concurrent producers never interleave
//! partial lines.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use portly_common::ScanError;
use portly_common::network::port::PortResult;
use portly_common::network::record::ScanRecord;

pub trait ResultSink: Send + Sync {
    /// Appends `result` if it is open. Other states are ignored.
    fn record(&self, result: &PortResult) -> Result<(), ScanError>;
}

#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Opens (or creates) the results file for appending.
    ///
    /// Failure here is fatal for the run: without a store no result can be kept.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| ScanError::Sink {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for FileSink {
    fn record(&self, result: &PortResult) -> Result<(), ScanError> {
        let Some(record) = ScanRecord::from_result(result) else {
            return Ok(());
        };
        let line: String = format!("{record}\n");

        // a poisoned lock still guards a usable handle
        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        file.write_all(line.as_bytes())
            .map_err(|source| ScanError::Sink {
                path: self.path.clone(),
                source,
            })
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
