mod cancellation;
mod integration;
mod multi_target;
