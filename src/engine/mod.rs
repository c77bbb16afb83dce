//! Virtual-user engine: run parameters, worker loop, and scheduler.
mod identity;
mod limiter;
mod pacing;
mod run_config;
mod scheduler;
mod worker;

#[cfg(test)]
mod tests;

pub use identity::{Identity, IdentityCatalog};
pub use limiter::RequestLimiter;
pub use pacing::ThinkTime;
pub use run_config::RunConfig;
pub use scheduler::{RunTiming, run_scheduler};
