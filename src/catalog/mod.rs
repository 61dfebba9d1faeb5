pub mod clock;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod fetcher;
pub mod product;
pub mod stats;
pub mod store;
pub(crate) mod refresh_gate;
