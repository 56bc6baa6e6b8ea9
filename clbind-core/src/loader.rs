//! The process-wide entry point table.

use std::sync::{Mutex, OnceLock, PoisonError};
use crate::ffi::ClApi;
use crate::error::Result as ClResult;
use crate::functions::ApiWrapperError;

static API: OnceLock<&'static ClApi> = OnceLock::new();

/// Held while the system library is loaded, so only one table is ever leaked.
static LOADING: Mutex<()> = Mutex::new(());

/// Resolves an entry point from the process-wide table, returning early with
/// `Error::EntryPointUnavailable` if the driver does not provide it.
macro_rules! cl_fn {
    ($name:ident) => {
        match crate::loader::api()?.$name {
            Some(f) => f,
            None => return Err(crate::Error::EntryPointUnavailable(stringify!($name))),
        }
    };
}

/// Returns the process-wide entry point table, loading the system OpenCL
/// library on first use.
///
/// The library named by `CLBIND_OPENCL_LIBRARY` is tried first, then the
/// platform's default library names. A failed load is not cached: the next
/// call tries again.
pub fn api() -> ClResult<&'static ClApi> {
    if let Some(api) = API.get() {
        return Ok(*api);
    }

    let _loading = LOADING.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(api) = API.get() {
        return Ok(*api);
    }

    // A table installed meanwhile wins and `loaded` is dropped, unloading
    // the library again.
    let loaded = unsafe { ClApi::load()? };
    let api = *API.get_or_init(|| Box::leak(Box::new(loaded)));
    log::debug!("clbind_core: OpenCL entry point table ready (missing: {:?}).",
        api.missing_entry_points());
    Ok(api)
}

/// Installs `api` as the process-wide entry point table.
///
/// Succeeds if no table has been installed or loaded yet, or if `api` is the
/// table already installed.
pub fn install_api(api: &'static ClApi) -> ClResult<()> {
    let installed = *API.get_or_init(|| api);

    if std::ptr::eq(installed, api) {
        log::debug!("clbind_core: entry point table installed.");
        Ok(())
    } else {
        Err(ApiWrapperError::ApiAlreadyInstalled.into())
    }
}
