use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_BANNER_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_OUTPUT: &str = "scan_results.txt";

#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound for a single connect attempt.
    pub connect_timeout: Duration,
    /// Upper bound for the whole banner exchange on an open port.
    pub banner_timeout: Duration,
    /// Opens a second connection to every open port and reads its banner.
    pub grab_banner: bool,
    /// File that open ports are appended to.
    pub output: PathBuf,
    /// 0 prints everything, 1 hides decorations, 2 prints only open ports.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            banner_timeout: DEFAULT_BANNER_TIMEOUT,
            grab_banner: false,
            output: PathBuf::from(DEFAULT_OUTPUT),
            quiet: 0,
        }
    }
}
