pub mod menu;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use portly_common::config::{Config, DEFAULT_BANNER_TIMEOUT, DEFAULT_OUTPUT};
use portly_common::network::range::PortRange;

pub const DEFAULT_CONCURRENCY: usize = 100;

#[derive(Parser)]
#[command(name = "portly")]
#[command(about = "A concurrent TCP port scanner.", version)]
#[command(after_help = "Run without a subcommand for the interactive menu.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Ports to scan: quick (1-1024), full (1-65535), START-END or a single port
    #[arg(short, long, global = true, default_value = "quick")]
    pub ports: PortRange,

    /// Maximum number of connection attempts in flight per target
    #[arg(short, long, global = true, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// File that open ports are appended to
    #[arg(short, long, global = true, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Connect timeout in milliseconds
    #[arg(short, long = "timeout", global = true, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Read a banner from every open port
    #[arg(short, long, global = true)]
    pub banner: bool,

    /// Less output (-q hides decorations, -qq prints only open ports)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a single host or address
    #[command(alias = "s")]
    Scan { target: String },
    /// Scan every target listed in a file, one per line
    #[command(alias = "f")]
    File { path: PathBuf },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            connect_timeout: Duration::from_millis(self.timeout_ms),
            banner_timeout: DEFAULT_BANNER_TIMEOUT,
            grab_banner: self.banner,
            output: self.output.clone(),
            quiet: self.quiet.min(2),
        }
    }
}
