use std::fmt::{Debug, Display};
use std::time::Duration;

/// Result for API calls from this crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// No Roku device answered before the discovery timeout elapsed
    NoDevicesFound(Duration),
    /// Error from http client
    Reqwest(reqwest::Error),
    /// Error from std::io
    IO(std::io::Error),
    #[doc(hidden)]
    Other(String),
}

impl Error {
    pub fn is_no_devices_found(&self) -> bool {
        matches!(self, Error::NoDevicesFound(_))
    }

    pub fn is_reqwest(&self) -> bool {
        matches!(self, Error::Reqwest(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Error::IO(_))
    }

    pub(crate) fn no_devices_found(timeout: Duration) -> Error {
        Error::NoDevicesFound(timeout)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Reqwest(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IO(e)
    }
}

impl From<String> for Error {
    fn from(e: String) -> Error {
        Error::Other(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDevicesFound(timeout) => write!(
                f,
                "Could not find any Roku devices after {} seconds",
                timeout.as_millis() as f64 / 1000.0
            ),
            Self::Reqwest(e) => write!(f, "{}", e),
            Self::IO(e) => write!(f, "{}", e),
            Self::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}
