//! # Portly Core
//!
//! The concurrent scanning engine.
//!
//! * **[`scanner`]**: the coordinator that fans probes out over a bounded pool,
//!   plus the [`scanner::resolver`] that turns names into addresses.
//! * **[`network`]**: the TCP connect prober and banner grabbing.
//! * **[`sink`]**: serialized, append-only persistence of open ports.
//!
//! Nothing in this crate prints to the terminal or terminates the process;
//! outcomes and errors are returned to the caller.

pub mod network;
pub mod scanner;
pub mod sink;

pub use network::tcp::{Prober, TcpProber};
pub use scanner::resolver::{Resolve, SystemResolver};
pub use scanner::{PortScanner, ScanObserver, ScanReport, StopSignal, TargetOutcome};
pub use sink::{FileSink, ResultSink};
