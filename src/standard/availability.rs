//! Checks whether OpenCL can be used on this host.

use std::fmt;
use clbind_core::{self as core, Status};


/// The result of probing the host for a usable OpenCL installation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Availability {
    /// At least one platform with at least one device was found.
    Available,
    /// The OpenCL library could not be loaded.
    LibraryNotLoaded,
    /// The library loaded but listing platforms failed or found none.
    ConfigurationNotComplete,
    /// Platforms were found but none of them has a device.
    DeviceNotFound,
}

impl Availability {
    /// Returns `true` for `Availability::Available`.
    pub fn is_available(&self) -> bool {
        *self == Availability::Available
    }

    /// Returns the numeric status used by other OpenCL wrappers for this
    /// state: zero when available, negative otherwise.
    pub fn code(&self) -> i32 {
        match *self {
            Availability::Available => 0,
            Availability::LibraryNotLoaded => -1,
            Availability::ConfigurationNotComplete => -2,
            Availability::DeviceNotFound => -3,
        }
    }

    /// Returns a short description of this state.
    pub fn message(&self) -> &'static str {
        match *self {
            Availability::Available => "OpenCL is available.",
            Availability::LibraryNotLoaded => "OpenCL library not loaded.",
            Availability::ConfigurationNotComplete => "OpenCL configuration is not complete.",
            Availability::DeviceNotFound => "OpenCL device is not found.",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}


/// Checks the host: loads the driver table if necessary, lists platforms,
/// then looks for a device on any of them.
///
/// Never fails. Errors met along the way are logged at `debug` and folded
/// into the returned state.
pub fn availability() -> Availability {
    if let Err(err) = core::api() {
        log::debug!("clbind: OpenCL library unavailable: {}", err);
        return Availability::LibraryNotLoaded;
    }

    let platforms = match core::get_platform_ids() {
        Ok(platforms) => platforms,
        Err(err) => {
            log::debug!("clbind: unable to list OpenCL platforms: {}", err);
            return Availability::ConfigurationNotComplete;
        },
    };

    if platforms.is_empty() {
        log::debug!("clbind: no OpenCL platforms found.");
        return Availability::ConfigurationNotComplete;
    }

    for platform in platforms.iter() {
        match core::get_device_ids(platform, None, None) {
            Ok(ref devices) if !devices.is_empty() => return Availability::Available,
            Ok(_) => (),
            Err(ref err) if err.api_status() == Some(Status::CL_DEVICE_NOT_FOUND) => (),
            Err(err) => log::debug!("clbind: unable to list devices for platform {:?}: {}",
                platform, err),
        }
    }

    Availability::DeviceNotFound
}
