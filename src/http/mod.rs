//! HTTP transport used by the virtual users.
mod client;
mod transport;


pub use client::build_transports;
pub use transport::{HttpTransport, Transport};
