//! Core library for the `loadpulse` CLI.
//!
//! A fixed pool of virtual users issues HTTP requests against one target for
//! a bounded wall-clock duration, pausing for a randomized think time between
//! requests. Outcomes feed a race-free aggregate and an optional per-request
//! log; the binary prints a summary once every worker has joined.
pub mod args;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod shutdown;

mod app;
