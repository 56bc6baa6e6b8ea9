//! Standard error type for clbind-core.
//!

use crate::ffi::LoadError;
use crate::util::UtilError;
use crate::functions::{ApiError, VersionLowError, ProgramBuildError, ApiWrapperError};
use crate::Status;


/// clbind-core result type.
pub type Result<T> = ::std::result::Result<T, Error>;


/// An enum one of several error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // String: An arbitrary error:
    #[error("{0}")]
    String(String),
    // FfiNul: Ffi string conversion error:
    #[error("{0}")]
    FfiNul(#[from] ::std::ffi::NulError),
    // FromUtf8: String conversion error:
    #[error("{0}")]
    FromUtf8(#[from] ::std::string::FromUtf8Error),
    // IntoString: Ffi string conversion error:
    #[error("{0}")]
    IntoString(#[from] ::std::ffi::IntoStringError),
    // Util:
    #[error("{0}")]
    Util(#[from] UtilError),
    // Api:
    #[error("{0}")]
    Api(#[from] ApiError),
    // Load: The OpenCL library could not be loaded:
    #[error("{0}")]
    Load(#[from] LoadError),
    // EntryPointUnavailable: Not exported by the loaded driver:
    #[error("The OpenCL entry point '{0}' is not available from the loaded driver (it requires \
        a newer OpenCL version).")]
    EntryPointUnavailable(&'static str),
    // Version:
    #[error("{0}")]
    Version(#[from] VersionLowError),
    // ProgramBuild:
    #[error("{0}")]
    ProgramBuild(#[from] ProgramBuildError),
    // ApiWrapper:
    #[error("{0}")]
    ApiWrapper(#[from] ApiWrapperError),
}

impl Error {
    /// Returns the error status code for `Api` variants with a known code.
    pub fn api_status(&self) -> Option<Status> {
        match *self {
            Error::Api(ref err) => err.status(),
            _ => None,
        }
    }

    /// Returns the raw error code for `Api` variants, including codes not
    /// known to `Status`.
    pub fn api_code(&self) -> Option<i32> {
        match *self {
            Error::Api(ref err) => Some(err.code()),
            _ => None,
        }
    }

    /// Returns the build log carried by a program build failure, if any.
    pub fn build_log(&self) -> Option<&str> {
        match *self {
            Error::ProgramBuild(ProgramBuildError::BuildLog { ref log, .. }) => Some(log),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for Error {
    fn from(desc: &'a str) -> Self {
        Error::String(String::from(desc))
    }
}

impl From<String> for Error {
    fn from(desc: String) -> Self {
        Error::String(desc)
    }
}
