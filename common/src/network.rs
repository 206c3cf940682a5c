pub mod port;
pub mod range;
pub mod record;
pub mod request;
pub mod target;
