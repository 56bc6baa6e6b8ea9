//! An OpenCL platform identifier and the list of platforms on this host.
//!
//! Info documentation copied from
//! [SDK - clGetPlatformInfo](https://www.khronos.org/registry/cl/sdk/1.2/docs/man/xhtml/)

use std::ops::Deref;
use clbind_core::{self as core, PlatformId as PlatformIdCore, PlatformInfo, InfoResult,
    OpenclVersion};
use crate::error::{Error, Result};


/// A platform identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Platform(PlatformIdCore);

impl Platform {
    /// Creates a new `Platform` from a `PlatformIdCore`.
    pub fn new(id_core: PlatformIdCore) -> Platform {
        Platform(id_core)
    }

    /// Returns a list of all platforms avaliable on the host machine.
    pub fn list() -> Result<Vec<Platform>> {
        let list_core = core::get_platform_ids()?;
        Ok(list_core.into_iter().map(Platform::new).collect())
    }

    /// Returns the default platform (see `clbind_core::default_platform`).
    pub fn default() -> Result<Platform> {
        Ok(Platform(core::default_platform()?))
    }

    /// Returns info about the platform.
    pub fn info(&self, info_kind: PlatformInfo) -> Result<InfoResult> {
        core::get_platform_info(&self.0, info_kind).map_err(Error::from)
    }

    fn info_string(&self, info_kind: PlatformInfo) -> Result<String> {
        Ok(self.info(info_kind)?.into_string()?)
    }

    /// Returns the platform profile as a string.
    ///
    /// Returns the profile name supported by the implementation. The profile name returned can be
    /// one of the following strings:
    ///
    /// * FULL_PROFILE - if the implementation supports the OpenCL specification (functionality
    ///   defined as part of the core specification and does not require any extensions to be
    ///   supported).
    ///
    /// * EMBEDDED_PROFILE - if the implementation supports the OpenCL embedded profile. The
    ///   embedded profile is defined to be a subset for each version of OpenCL.
    ///
    pub fn profile(&self) -> Result<String> {
        self.info_string(PlatformInfo::Profile)
    }

    /// Returns the platform driver version as a string.
    ///
    /// Returns the OpenCL version supported by the implementation. This version string has the
    /// following format:
    ///
    /// * OpenCL<space><major_version.minor_version><space><platform-specific information>
    pub fn version_string(&self) -> Result<String> {
        self.info_string(PlatformInfo::Version)
    }

    /// Returns the parsed platform version.
    pub fn version(&self) -> Result<OpenclVersion> {
        Ok(self.0.version()?)
    }

    /// Returns the platform name as a string.
    pub fn name(&self) -> Result<String> {
        self.info_string(PlatformInfo::Name)
    }

    /// Returns the platform vendor as a string.
    pub fn vendor(&self) -> Result<String> {
        self.info_string(PlatformInfo::Vendor)
    }

    /// Returns the list of platform extensions as a string.
    ///
    /// Returns a space-separated list of extension names (the extension names themselves do not
    /// contain any spaces) supported by the platform. Extensions defined here must be supported
    /// by all devices associated with this platform.
    pub fn extensions(&self) -> Result<String> {
        self.info_string(PlatformInfo::Extensions)
    }

    /// Returns `true` if `name` is one of this platform's extensions.
    pub fn has_extension(&self, name: &str) -> Result<bool> {
        Ok(self.extensions()?.split_whitespace().any(|ext| ext == name))
    }

    /// Returns a reference to the underlying `PlatformIdCore`.
    pub fn core(&self) -> &PlatformIdCore {
        &self.0
    }

    fn fmt_info(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("Profile", &self.info(PlatformInfo::Profile))
            .field("Version", &self.info(PlatformInfo::Version))
            .field("Name", &self.info(PlatformInfo::Name))
            .field("Vendor", &self.info(PlatformInfo::Vendor))
            .field("Extensions", &self.info(PlatformInfo::Extensions))
            .finish()
    }
}

impl From<PlatformIdCore> for Platform {
    fn from(core: PlatformIdCore) -> Platform {
        Platform(core)
    }
}

impl From<Platform> for PlatformIdCore {
    fn from(p: Platform) -> PlatformIdCore {
        p.0
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_info(f)
    }
}

impl Deref for Platform {
    type Target = PlatformIdCore;

    fn deref(&self) -> &PlatformIdCore {
        &self.0
    }
}

impl AsRef<PlatformIdCore> for Platform {
    fn as_ref(&self) -> &PlatformIdCore {
        &self.0
    }
}


/// The platforms available on this host, in driver order.
#[derive(Clone, Debug, Default)]
pub struct PlatformList {
    platforms: Vec<Platform>,
}

impl PlatformList {
    /// Lists the platforms on this host. An empty list is not an error.
    pub fn new() -> Result<PlatformList> {
        Ok(PlatformList { platforms: Platform::list()? })
    }

    /// Returns a list made up of `platforms`.
    pub fn from_platforms(platforms: Vec<Platform>) -> PlatformList {
        PlatformList { platforms }
    }

    /// Returns the number of platforms.
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Returns the platform at `index`.
    pub fn get(&self, index: usize) -> Result<Platform> {
        self.platforms.get(index).cloned()
            .ok_or_else(|| Error::out_of_range("Platform", index, self.platforms.len()))
    }

    /// Returns a list holding only the platform at `index`.
    pub fn get_one(&self, index: usize) -> Result<PlatformList> {
        Ok(PlatformList { platforms: vec![self.get(index)?] })
    }

    /// Returns info about the platform at `index`.
    pub fn info(&self, index: usize, info_kind: PlatformInfo) -> Result<InfoResult> {
        self.get(index)?.info(info_kind)
    }

    pub fn iter(&self) -> std::slice::Iter<Platform> {
        self.platforms.iter()
    }

    /// Returns the platforms as a slice.
    pub fn as_slice(&self) -> &[Platform] {
        &self.platforms
    }
}

impl<'a> IntoIterator for &'a PlatformList {
    type Item = &'a Platform;
    type IntoIter = std::slice::Iter<'a, Platform>;

    fn into_iter(self) -> Self::IntoIter {
        self.platforms.iter()
    }
}
