use thiserror::Error;

/// Failures of the systemctl transport layer.
///
/// A negative answer from the service manager (a unit that is inactive or
/// refuses to start) is not an error; only failing to talk to systemctl or to
/// read its answer is.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid utf-8 from systemctl: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("systemd error: {0}")]
    Systemd(String),
}
