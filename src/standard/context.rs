//! An OpenCL context.

use std::ops::{Deref, DerefMut};
use clbind_core::{self as core, Context as ContextCore, ContextProperties, ContextNotifier,
    ContextErrorHandler, ContextInfo, DeviceType, InfoResult, ImageFormat, MemFlags,
    MemObjectType};
use crate::error::{Error, Result};
use crate::standard::{Platform, Device, DeviceList};


/// A context for a particular platform and set of devices.
///
/// Wraps a `ContextCore` such as that returned by `core::create_context`.
/// Clones share the underlying context (which is retained on clone and
/// released on drop).
#[derive(Clone, Debug)]
pub struct Context {
    obj_core: ContextCore,
    devices: DeviceList,
}

impl Context {
    /// Creates a context for every device in `devices`.
    ///
    /// An empty device list is an error.
    pub fn new(devices: &DeviceList) -> Result<Context> {
        if devices.is_empty() {
            return Err(Error::invalid("Context::new: the device list is empty."));
        }
        let obj_core = unsafe { core::create_context(None, &devices.ids(), None)? };
        Ok(Context { obj_core, devices: devices.clone() })
    }

    /// Creates a context for every device in `devices` and registers
    /// `handler` to receive the error reports the driver makes about it.
    ///
    /// The handler may be called from any thread for as long as the driver
    /// holds the context. It is kept alive for the rest of the process.
    pub fn with_error_handler<H>(devices: &DeviceList, handler: H) -> Result<Context>
            where H: ContextErrorHandler
    {
        if devices.is_empty() {
            return Err(Error::invalid("Context::with_error_handler: the device list is empty."));
        }
        let notifier = Box::new(ContextNotifier::new(handler));
        let obj_core = unsafe { core::create_context(None, &devices.ids(), Some(&*notifier))? };
        // The driver may report errors until its last reference is gone:
        let _ = Box::leak(notifier);
        Ok(Context { obj_core, devices: devices.clone() })
    }

    /// Creates a context for every device of `device_type` on the default
    /// platform (see `clbind_core::default_platform`).
    pub fn from_device_type(device_type: DeviceType) -> Result<Context> {
        let platform = Platform::default()?;
        Context::from_device_type_on(&platform, device_type)
    }

    /// Creates a context for every device of `device_type` on `platform`.
    ///
    /// The platform is always named in the context properties; drivers
    /// reject `clCreateContextFromType` without one.
    pub fn from_device_type_on(platform: &Platform, device_type: DeviceType) -> Result<Context> {
        let properties = ContextProperties::new().platform(*platform.core());
        let obj_core = unsafe {
            core::create_context_from_type(Some(&properties), device_type, None)?
        };
        Context::from_core(obj_core)
    }

    /// Wraps an existing core context, querying its device list.
    pub fn from_core(obj_core: ContextCore) -> Result<Context> {
        let devices = match core::get_context_info(&obj_core, ContextInfo::Devices)? {
            InfoResult::Devices(ids) => DeviceList::from_devices(ids),
            other => return Err(format!("Context::from_core: unexpected info result: {:?}",
                other).into()),
        };
        Ok(Context { obj_core, devices })
    }

    /// Returns the devices this context was created for.
    pub fn devices(&self) -> &DeviceList {
        &self.devices
    }

    /// Returns the device at `index` within this context.
    pub fn device(&self, index: usize) -> Result<Device> {
        self.devices.get(index)
    }

    /// Returns the platform this context pertains to, if it was named at
    /// creation.
    pub fn platform(&self) -> Result<Option<Platform>> {
        Ok(core::get_context_platform(&self.obj_core)?.map(Platform::new))
    }

    /// Returns info about this context.
    pub fn info(&self, info_kind: ContextInfo) -> Result<InfoResult> {
        core::get_context_info(&self.obj_core, info_kind).map_err(Error::from)
    }

    /// Returns the image formats supported by this context for images of
    /// `image_type` created with `flags`.
    ///
    /// Formats this crate has no name for are skipped.
    pub fn supported_image_formats(&self, flags: MemFlags, image_type: MemObjectType)
            -> Result<Vec<ImageFormat>>
    {
        let formats = core::get_supported_image_formats(&self.obj_core, flags, image_type)?;
        Ok(formats.into_iter().filter_map(|fmt| match fmt {
            Ok(fmt) => Some(fmt),
            Err(err) => {
                log::debug!("clbind: skipping unsupported image format: {}", err);
                None
            },
        }).collect())
    }

    /// Returns a reference to the core pointer wrapper, usable by functions in
    /// the `core` module.
    #[inline]
    pub fn core(&self) -> &ContextCore {
        &self.obj_core
    }

    fn fmt_info(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("ReferenceCount", &self.info(ContextInfo::ReferenceCount))
            .field("Devices", &self.info(ContextInfo::Devices))
            .field("Properties", &self.info(ContextInfo::Properties))
            .field("NumDevices", &self.info(ContextInfo::NumDevices))
            .finish()
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_info(f)
    }
}

impl AsRef<ContextCore> for Context {
    fn as_ref(&self) -> &ContextCore {
        &self.obj_core
    }
}

impl Deref for Context {
    type Target = ContextCore;

    fn deref(&self) -> &ContextCore {
        &self.obj_core
    }
}

impl DerefMut for Context {
    fn deref_mut(&mut self) -> &mut ContextCore {
        &mut self.obj_core
    }
}
