//! Standard error type for clbind.

use clbind_core::Status;


/// clbind result type.
pub type Result<T> = ::std::result::Result<T, Error>;


/// An error from the standard layer: either a failure reported by the
/// core layer (and thereby the driver) or an argument rejected before any
/// driver call was made.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Core: Driver and core wrapper errors:
    #[error("{0}")]
    Core(#[from] clbind_core::Error),
    // InvalidArgument: Rejected before reaching the driver:
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    // OutOfRange: An index past the end of a list:
    #[error("{0}")]
    OutOfRange(String),
    // HostBufferTooSmall:
    #[error("Host buffer is too small: {required} elements required, {len} available.")]
    HostBufferTooSmall { required: usize, len: usize },
}

impl Error {
    pub(crate) fn invalid<S: Into<String>>(desc: S) -> Error {
        Error::InvalidArgument(desc.into())
    }

    pub(crate) fn out_of_range(what: &str, index: usize, len: usize) -> Error {
        Error::OutOfRange(format!("{} index out of range: {} (length: {}).", what, index, len))
    }

    /// Returns the error status code for driver errors with a known code.
    pub fn api_status(&self) -> Option<Status> {
        match *self {
            Error::Core(ref err) => err.api_status(),
            _ => None,
        }
    }

    /// Returns the raw error code for driver errors.
    pub fn api_code(&self) -> Option<i32> {
        match *self {
            Error::Core(ref err) => err.api_code(),
            _ => None,
        }
    }

    /// Returns the build log carried by a program build failure, if any.
    pub fn build_log(&self) -> Option<&str> {
        match *self {
            Error::Core(ref err) => err.build_log(),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for Error {
    fn from(desc: &'a str) -> Self {
        Error::Core(clbind_core::Error::from(desc))
    }
}

impl From<String> for Error {
    fn from(desc: String) -> Self {
        Error::Core(clbind_core::Error::from(desc))
    }
}
