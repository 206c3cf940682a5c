//! End-to-end tests of the scanning engine against loopback listeners.

#[cfg(test)]
mod scan;
#[cfg(test)]
mod support;
