#![allow(clippy::explicit_counter_loop)]

pub mod common;
pub mod ensure_fresh;
pub mod store_queries;
