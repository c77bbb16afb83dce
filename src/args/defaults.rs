pub(crate) const DEFAULT_USER_AGENT: &str = concat!("loadpulse/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_IDENTITY_HEADER: &str = "User-Agent";

pub(crate) const DEFAULT_REQUEST_LOG: &str = "loadpulse-requests.log";

/// Identities used when neither `--identity`, `--identity-file`, nor the config
/// file supply a catalog. Traffic diversification only; replace freely.
pub(crate) const DEFAULT_IDENTITY_CATALOG: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_2) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
    DEFAULT_USER_AGENT,
];
