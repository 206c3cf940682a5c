use std::net::IpAddr;
use std::num::NonZeroUsize;

use crate::ScanError;
use crate::network::port::Protocol;
use crate::network::range::PortRange;

/// Everything one coordinator run needs. Built once, never mutated.
#[derive(Clone, Debug)]
pub struct ScanRequest {
    /// Name as the user typed it, kept for reporting.
    pub target: String,
    pub addr: IpAddr,
    pub range: PortRange,
    pub concurrency: NonZeroUsize,
    pub protocol: Protocol,
}

impl ScanRequest {
    pub fn new(
        target: impl Into<String>,
        addr: IpAddr,
        range: PortRange,
        concurrency: usize,
    ) -> Result<Self, ScanError> {
        let concurrency = NonZeroUsize::new(concurrency).ok_or(ScanError::InvalidConcurrency)?;
        Ok(Self {
            target: target.into(),
            addr,
            range,
            concurrency,
            protocol: Protocol::Tcp,
        })
    }
}
