mod runner;
pub(crate) mod summary;


pub(crate) use runner::run_local;
pub(crate) use summary::{Report, render_report};
