//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use cli::LoadArgs;
pub use types::{HttpMethod, OutputFormat, PositiveU64, PositiveUsize};

pub(crate) use defaults::{
    DEFAULT_IDENTITY_CATALOG, DEFAULT_IDENTITY_HEADER, DEFAULT_REQUEST_LOG, DEFAULT_USER_AGENT,
};
