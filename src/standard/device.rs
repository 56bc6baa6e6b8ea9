//! An OpenCL device identifier and device lists.

use std::ops::Deref;
use clbind_core::{self as core, DeviceId as DeviceIdCore, DeviceInfo, DeviceType, InfoResult,
    OpenclVersion, Status};
use crate::error::{Error, Result};
use crate::standard::{Platform, PlatformList};


/// A device identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Device(DeviceIdCore);

impl Device {
    /// Creates a new `Device` from a `DeviceIdCore`.
    pub fn new(id_core: DeviceIdCore) -> Device {
        Device(id_core)
    }

    /// Returns a list of all devices avaliable for a given platform which
    /// optionally match the flags set in the bitfield, `device_types`.
    ///
    /// Setting `device_types` to `None` will return a list of all avaliable
    /// devices for `platform`. A platform with no matching devices returns
    /// an empty list.
    pub fn list(platform: &Platform, device_types: Option<DeviceType>) -> Result<Vec<Device>> {
        match core::get_device_ids(platform.core(), device_types, None) {
            Ok(list_core) => Ok(list_core.into_iter().map(Device::new).collect()),
            Err(ref err) if err.api_status() == Some(Status::CL_DEVICE_NOT_FOUND) => {
                Ok(Vec::new())
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Returns a list of all devices avaliable for a given `platform`.
    ///
    /// Equivalent to `::list(platform, None)`.
    pub fn list_all(platform: &Platform) -> Result<Vec<Device>> {
        Device::list(platform, None)
    }

    /// Returns info about the device.
    pub fn info(&self, info_kind: DeviceInfo) -> Result<InfoResult> {
        core::get_device_info(&self.0, info_kind).map_err(Error::from)
    }

    fn info_string(&self, info_kind: DeviceInfo) -> Result<String> {
        Ok(self.info(info_kind)?.into_string()?)
    }

    /// Returns the device name.
    pub fn name(&self) -> Result<String> {
        self.info_string(DeviceInfo::Name)
    }

    /// Returns the device vendor.
    pub fn vendor(&self) -> Result<String> {
        self.info_string(DeviceInfo::Vendor)
    }

    /// Returns the parsed device version (`CL_DEVICE_VERSION`).
    pub fn version(&self) -> Result<OpenclVersion> {
        Ok(self.0.version()?)
    }

    /// Returns the device type.
    pub fn device_type(&self) -> Result<DeviceType> {
        match self.info(DeviceInfo::Type)? {
            InfoResult::DeviceType(dt) => Ok(dt),
            other => Err(format!("Device::device_type: unexpected info result: {:?}",
                other).into()),
        }
    }

    /// Returns the platform this device belongs to.
    pub fn platform(&self) -> Result<Platform> {
        match self.info(DeviceInfo::Platform)? {
            InfoResult::Platform(p) => Ok(Platform::new(p)),
            other => Err(format!("Device::platform: unexpected info result: {:?}",
                other).into()),
        }
    }

    /// Returns the maximum number of work items in a work group.
    pub fn max_wg_size(&self) -> Result<usize> {
        let info = self.info(DeviceInfo::MaxWorkGroupSize)?;
        info.as_size().ok_or_else(|| format!("Device::max_wg_size: unexpected info result: \
            {:?}", info).into())
    }

    /// Returns the maximum number of work items per dimension.
    pub fn max_work_item_sizes(&self) -> Result<Vec<usize>> {
        let info = self.info(DeviceInfo::MaxWorkItemSizes)?;
        info.as_sizes().map(|s| s.to_vec()).ok_or_else(|| format!("Device::\
            max_work_item_sizes: unexpected info result: {:?}", info).into())
    }

    /// Returns `true` if the device supports images.
    pub fn image_support(&self) -> Result<bool> {
        Ok(self.info(DeviceInfo::ImageSupport)?.as_bool().unwrap_or(false))
    }

    /// Returns `true` if this device is available.
    pub fn is_available(&self) -> Result<bool> {
        Ok(self.info(DeviceInfo::Available)?.as_bool().unwrap_or(false))
    }

    /// Returns the device extensions as a string.
    pub fn extensions(&self) -> Result<String> {
        self.info_string(DeviceInfo::Extensions)
    }

    /// Returns the names of the built-in kernels this device provides.
    pub fn built_in_kernels(&self) -> Result<Vec<String>> {
        Ok(self.info_string(DeviceInfo::BuiltInKernels)?
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect())
    }

    /// Returns a reference to the underlying `DeviceIdCore`.
    #[inline]
    pub fn core(&self) -> &DeviceIdCore {
        &self.0
    }

    fn fmt_info(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("Type", &self.info(DeviceInfo::Type))
            .field("Name", &self.info(DeviceInfo::Name))
            .field("Vendor", &self.info(DeviceInfo::Vendor))
            .field("Version", &self.info(DeviceInfo::Version))
            .field("DriverVersion", &self.info(DeviceInfo::DriverVersion))
            .field("MaxComputeUnits", &self.info(DeviceInfo::MaxComputeUnits))
            .field("MaxWorkGroupSize", &self.info(DeviceInfo::MaxWorkGroupSize))
            .field("MaxWorkItemSizes", &self.info(DeviceInfo::MaxWorkItemSizes))
            .field("GlobalMemSize", &self.info(DeviceInfo::GlobalMemSize))
            .field("LocalMemSize", &self.info(DeviceInfo::LocalMemSize))
            .field("ImageSupport", &self.info(DeviceInfo::ImageSupport))
            .field("Extensions", &self.info(DeviceInfo::Extensions))
            .finish()
    }
}

impl From<DeviceIdCore> for Device {
    fn from(core: DeviceIdCore) -> Device {
        Device(core)
    }
}

impl From<Device> for DeviceIdCore {
    fn from(d: Device) -> DeviceIdCore {
        d.0
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_info(f)
    }
}

impl Deref for Device {
    type Target = DeviceIdCore;

    fn deref(&self) -> &DeviceIdCore {
        &self.0
    }
}

impl AsRef<DeviceIdCore> for Device {
    fn as_ref(&self) -> &DeviceIdCore {
        &self.0
    }
}


/// An ordered list of devices, used to create contexts and to restrict
/// program builds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceList {
    devices: Vec<Device>,
}

impl DeviceList {
    /// Lists the devices of the platform at `platform_idx` in `platforms`
    /// matching `device_type` (`None` or an empty type means all devices).
    ///
    /// A platform without matching devices is an error
    /// (`CL_DEVICE_NOT_FOUND`).
    pub fn new(platforms: &PlatformList, platform_idx: usize, device_type: Option<DeviceType>)
            -> Result<DeviceList>
    {
        let platform = platforms.get(platform_idx)?;
        DeviceList::from_platform(&platform, device_type)
    }

    /// Lists the devices of `platform` matching `device_type`.
    pub fn from_platform(platform: &Platform, device_type: Option<DeviceType>)
            -> Result<DeviceList>
    {
        let device_type = match device_type {
            Some(dt) if dt.is_empty() => None,
            other => other,
        };
        let ids = core::get_device_ids(platform.core(), device_type, None)?;
        Ok(DeviceList { devices: ids.into_iter().map(Device::new).collect() })
    }

    /// Returns a list made up of `devices`.
    pub fn from_devices<D: Into<Device>, I: IntoIterator<Item = D>>(devices: I) -> DeviceList {
        DeviceList { devices: devices.into_iter().map(Into::into).collect() }
    }

    /// Returns the number of devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Returns the device at `index`.
    pub fn get(&self, index: usize) -> Result<Device> {
        self.devices.get(index).cloned()
            .ok_or_else(|| Error::out_of_range("Device", index, self.devices.len()))
    }

    /// Returns a list holding only the device at `index`.
    pub fn get_one(&self, index: usize) -> Result<DeviceList> {
        Ok(DeviceList { devices: vec![self.get(index)?] })
    }

    /// Appends every device of `other`.
    pub fn append(&mut self, other: &DeviceList) {
        self.devices.extend(other.devices.iter().cloned());
    }

    /// Appends a single device.
    pub fn push<D: Into<Device>>(&mut self, device: D) {
        self.devices.push(device.into());
    }

    /// Returns info about the device at `index`.
    pub fn info(&self, index: usize, info_kind: DeviceInfo) -> Result<InfoResult> {
        self.get(index)?.info(info_kind)
    }

    /// Returns a new list holding the devices of this one whose type
    /// intersects `device_type`.
    pub fn filter(&self, device_type: DeviceType) -> Result<DeviceList> {
        let mut devices = Vec::with_capacity(self.devices.len());
        for device in self.devices.iter() {
            if device.device_type()?.intersects(device_type) {
                devices.push(*device);
            }
        }
        Ok(DeviceList { devices })
    }

    pub fn iter(&self) -> std::slice::Iter<Device> {
        self.devices.iter()
    }

    /// Returns the devices as a slice.
    pub fn as_slice(&self) -> &[Device] {
        &self.devices
    }

    /// Returns the core device identifiers.
    pub fn ids(&self) -> Vec<DeviceIdCore> {
        self.devices.iter().map(|d| d.0).collect()
    }
}

impl From<Vec<Device>> for DeviceList {
    fn from(devices: Vec<Device>) -> DeviceList {
        DeviceList { devices }
    }
}

impl<'a> IntoIterator for &'a DeviceList {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}
