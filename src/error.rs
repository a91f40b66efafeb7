//! Error taxonomy. Startup errors are typed and fatal; anything that can
//! happen once capture is running is swallowed at the call site instead
//! of being threaded through a `Result`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("interface '{0}' not found")]
    InterfaceNotFound(String),

    #[error("interface '{0}' is not up")]
    InterfaceDown(String),

    #[error("unsupported datalink type on interface '{0}'")]
    UnsupportedLinkType(String),

    #[error("failed to open interface '{interface}': {source}")]
    OpenFailed {
        interface: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Configuration errors caught before either thread starts. clap already
/// rejects a missing `-i` or an unparseable `-s`; this enum covers the
/// defensive re-checks `Config::validate` runs on top of that (an
/// interface name clap would happily accept as a non-empty string but
/// that is blank after trimming, or a log path whose parent directory
/// doesn't exist).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("interface name must not be empty")]
    EmptyInterface,

    #[error("log path '{0}' has no parent directory")]
    LogPathHasNoParent(String),

    #[error("log path parent directory '{0}' does not exist")]
    LogParentMissing(String),
}
