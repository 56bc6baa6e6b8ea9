//! Rust implementations of various structs used by the OpenCL API.

use std::fmt;
use std::ptr;
use enum_primitive::FromPrimitive;
use crate::ffi::{self, cl_image_format, cl_image_desc, cl_buffer_region, cl_context_properties,
    cl_device_partition_property};
use crate::error::{Error as ClError, Result as ClResult};
use crate::{PlatformId, Mem, ImageChannelOrder, ImageChannelDataType, MemObjectType,
    DeviceAffinityDomain};

//=============================================================================
//================================= VERSION ===================================
//=============================================================================

/// An OpenCL version (major, minor).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpenclVersion {
    ver: [u16; 2],
}

impl OpenclVersion {
    pub fn new(major: u16, minor: u16) -> OpenclVersion {
        OpenclVersion { ver: [major, minor] }
    }

    pub fn major(&self) -> u16 {
        self.ver[0]
    }

    pub fn minor(&self) -> u16 {
        self.ver[1]
    }

    /// Parses a version string in any of the formats the OpenCL API returns
    /// them in: `OpenCL <major>.<minor> <vendor-specific>` for platforms and
    /// devices, and `OpenCL C <major>.<minor> <vendor-specific>` for the
    /// device language version.
    pub fn from_info_str(s: &str) -> Option<OpenclVersion> {
        let mut words = s.split_whitespace();
        if words.next() != Some("OpenCL") {
            return None;
        }

        let mut version_word = words.next()?;
        if version_word == "C" {
            version_word = words.next()?;
        }

        let mut nums = version_word.split('.');
        let major = nums.next()?.parse::<u16>().ok()?;
        let minor = nums.next()?.parse::<u16>().ok()?;
        Some(OpenclVersion::new(major, minor))
    }
}

impl From<[u16; 2]> for OpenclVersion {
    fn from(ver: [u16; 2]) -> OpenclVersion {
        OpenclVersion { ver }
    }
}

impl fmt::Display for OpenclVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.ver[0], self.ver[1])
    }
}

//=============================================================================
//============================ CONTEXT PROPERTIES =============================
//=============================================================================

/// A context property identifier and its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextPropertyValue {
    Platform(PlatformId),
    InteropUserSync(bool),
}

/// Context properties list.
///
/// [SDK](https://www.khronos.org/registry/cl/sdk/1.2/docs/man/xhtml/clCreateContext.html)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextProperties(Vec<ContextPropertyValue>);

impl ContextProperties {
    /// Returns an empty new list of context properties
    pub fn new() -> ContextProperties {
        ContextProperties(Vec::with_capacity(4))
    }

    /// Specifies a platform (builder-style).
    pub fn platform(mut self, platform: PlatformId) -> ContextProperties {
        self.set_platform(platform);
        self
    }

    /// Specifies whether the user is responsible for synchronization between
    /// OpenCL and other APIs (builder-style).
    pub fn interop_user_sync(mut self, sync: bool) -> ContextProperties {
        self.0.retain(|p| !matches!(p, ContextPropertyValue::InteropUserSync(_)));
        self.0.push(ContextPropertyValue::InteropUserSync(sync));
        self
    }

    /// Specifies a platform, replacing any previously set.
    pub fn set_platform(&mut self, platform: PlatformId) {
        self.0.retain(|p| !matches!(p, ContextPropertyValue::Platform(_)));
        self.0.push(ContextPropertyValue::Platform(platform));
    }

    /// Returns the platform property, if set.
    pub fn get_platform(&self) -> Option<PlatformId> {
        self.0.iter().find_map(|p| match *p {
            ContextPropertyValue::Platform(plat) => Some(plat),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContextPropertyValue> {
        self.0.iter()
    }

    /// Returns a zero-terminated raw property list.
    pub fn to_raw(&self) -> Vec<cl_context_properties> {
        let mut raw = Vec::with_capacity(self.0.len() * 2 + 1);
        for prop in self.0.iter() {
            match *prop {
                ContextPropertyValue::Platform(platform) => {
                    raw.push(ffi::CL_CONTEXT_PLATFORM);
                    raw.push(platform.as_ptr() as cl_context_properties);
                },
                ContextPropertyValue::InteropUserSync(sync) => {
                    raw.push(ffi::CL_CONTEXT_INTEROP_USER_SYNC);
                    raw.push(sync as cl_context_properties);
                },
            }
        }
        raw.push(0);
        raw
    }

    /// Parses a zero-terminated raw property list as returned by
    /// `clGetContextInfo`.
    pub fn from_raw(raw: &[cl_context_properties]) -> ClResult<ContextProperties> {
        let mut props = ContextProperties::new();
        let mut iter = raw.iter();

        while let Some(&key) = iter.next() {
            if key == 0 {
                break;
            }
            let val = match iter.next() {
                Some(&v) => v,
                None => return Err(ClError::from(format!("Context property list is missing \
                    a value for key {:#X}.", key))),
            };
            match key {
                ffi::CL_CONTEXT_PLATFORM => props.0.push(ContextPropertyValue::Platform(
                    unsafe { PlatformId::from_raw(val as ffi::cl_platform_id) })),
                ffi::CL_CONTEXT_INTEROP_USER_SYNC => props.0.push(
                    ContextPropertyValue::InteropUserSync(val != 0)),
                other => log::debug!("clbind_core: skipping unknown context property {:#X}.",
                    other),
            }
        }

        Ok(props)
    }
}

//=============================================================================
//============================= DEVICE PARTITION ==============================
//=============================================================================

/// A sub-device partitioning scheme for `clCreateSubDevices`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DevicePartition {
    /// Split into as many sub-devices as possible with this many compute
    /// units each.
    Equally(u32),
    /// One sub-device per listed compute unit count.
    ByCounts(Vec<u32>),
    ByAffinityDomain(DeviceAffinityDomain),
}

impl DevicePartition {
    /// Returns a zero-terminated raw property list.
    pub fn to_raw(&self) -> Vec<cl_device_partition_property> {
        match *self {
            DevicePartition::Equally(units) => vec![ffi::CL_DEVICE_PARTITION_EQUALLY,
                units as cl_device_partition_property, 0],
            DevicePartition::ByCounts(ref counts) => {
                let mut raw = Vec::with_capacity(counts.len() + 3);
                raw.push(ffi::CL_DEVICE_PARTITION_BY_COUNTS);
                raw.extend(counts.iter().map(|&c| c as cl_device_partition_property));
                raw.push(ffi::CL_DEVICE_PARTITION_BY_COUNTS_LIST_END);
                raw.push(0);
                raw
            },
            DevicePartition::ByAffinityDomain(domain) => vec![
                ffi::CL_DEVICE_PARTITION_BY_AFFINITY_DOMAIN,
                domain.bits() as cl_device_partition_property, 0],
        }
    }
}

//=============================================================================
//=============================== IMAGE FORMAT ================================
//=============================================================================

/// An error parsing a raw image format.
#[derive(Debug, thiserror::Error)]
pub enum ImageFormatParseError {
    #[error("Unknown image channel order: {0:#X}")]
    UnknownImageChannelOrder(u32),
    #[error("Unknown image channel data type: {0:#X}")]
    UnknownImageChannelDataType(u32),
}

/// Image format properties used by `Image`.
///
/// A structure that describes format properties of the image to be allocated. (from SDK)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageFormat {
    pub channel_order: ImageChannelOrder,
    pub channel_data_type: ImageChannelDataType,
}

impl ImageFormat {
    pub fn new(order: ImageChannelOrder, data_type: ImageChannelDataType) -> ImageFormat {
        ImageFormat {
            channel_order: order,
            channel_data_type: data_type,
        }
    }

    pub fn new_rgba() -> ImageFormat {
        ImageFormat::new(ImageChannelOrder::Rgba, ImageChannelDataType::SnormInt8)
    }

    pub fn from_raw(raw: cl_image_format) -> Result<ImageFormat, ImageFormatParseError> {
        let order = ImageChannelOrder::from_u32(raw.image_channel_order)
            .ok_or(ImageFormatParseError::UnknownImageChannelOrder(raw.image_channel_order))?;
        let data_type = ImageChannelDataType::from_u32(raw.image_channel_data_type)
            .ok_or(ImageFormatParseError::UnknownImageChannelDataType(
                raw.image_channel_data_type))?;
        Ok(ImageFormat::new(order, data_type))
    }

    /// Parses a list of raw image formats, keeping parse failures in place.
    pub fn list_from_raw(raw: &[cl_image_format])
            -> Vec<Result<ImageFormat, ImageFormatParseError>> {
        raw.iter().map(|&f| ImageFormat::from_raw(f)).collect()
    }

    pub fn to_raw(&self) -> cl_image_format {
        cl_image_format {
            image_channel_order: self.channel_order as ffi::cl_channel_order,
            image_channel_data_type: self.channel_data_type as ffi::cl_channel_type,
        }
    }

    /// Returns the number of channels.
    pub fn channel_count(&self) -> usize {
        match self.channel_order {
            ImageChannelOrder::R | ImageChannelOrder::A | ImageChannelOrder::Intensity
                | ImageChannelOrder::Luminance | ImageChannelOrder::Rx
                | ImageChannelOrder::Depth => 1,
            ImageChannelOrder::Rg | ImageChannelOrder::Ra | ImageChannelOrder::Rgx
                | ImageChannelOrder::DepthStencil => 2,
            ImageChannelOrder::Rgb | ImageChannelOrder::Rgbx => 3,
            ImageChannelOrder::Rgba | ImageChannelOrder::Bgra | ImageChannelOrder::Argb => 4,
        }
    }

    /// Returns the size in bytes of a single pixel (element).
    pub fn pixel_bytes(&self) -> usize {
        let channel_bytes = match self.channel_data_type {
            ImageChannelDataType::SnormInt8 | ImageChannelDataType::UnormInt8
                | ImageChannelDataType::SignedInt8 | ImageChannelDataType::UnsignedInt8 => 1,
            ImageChannelDataType::SnormInt16 | ImageChannelDataType::UnormInt16
                | ImageChannelDataType::SignedInt16 | ImageChannelDataType::UnsignedInt16
                | ImageChannelDataType::HalfFloat => 2,
            ImageChannelDataType::SignedInt32 | ImageChannelDataType::UnsignedInt32
                | ImageChannelDataType::Float => 4,
            // Packed formats: the whole pixel, not one channel.
            ImageChannelDataType::UnormShort565 | ImageChannelDataType::UnormShort555 => return 2,
            ImageChannelDataType::UnormInt101010 => return 4,
            ImageChannelDataType::UnormInt24 => return 4,
        };
        channel_bytes * self.channel_count()
    }
}

//=============================================================================
//============================= IMAGE DESCRIPTOR ==============================
//=============================================================================

/// An image descriptor use in the creation of `Image`.
///
/// `buffer` is only used by `Image1dBuffer` images.
#[derive(Debug, Clone)]
pub struct ImageDescriptor {
    pub image_type: MemObjectType,
    pub image_width: usize,
    pub image_height: usize,
    pub image_depth: usize,
    pub image_array_size: usize,
    pub image_row_pitch: usize,
    pub image_slice_pitch: usize,
    num_mip_levels: u32,
    num_samples: u32,
    pub buffer: Option<Mem>,
}

impl ImageDescriptor {
    /// Returns a new image descriptor. Mip levels and samples are always zero
    /// in OpenCL 1.2.
    pub fn new(image_type: MemObjectType, width: usize, height: usize, depth: usize,
                array_size: usize, row_pitch: usize, slc_pitch: usize, buffer: Option<Mem>)
                -> ImageDescriptor {
        ImageDescriptor {
            image_type,
            image_width: width,
            image_height: height,
            image_depth: depth,
            image_array_size: array_size,
            image_row_pitch: row_pitch,
            image_slice_pitch: slc_pitch,
            num_mip_levels: 0,
            num_samples: 0,
            buffer,
        }
    }

    /// Returns the `(width, height, depth)` region covering the whole image,
    /// with unused dimensions set to one.
    pub fn region(&self) -> [usize; 3] {
        match self.image_type {
            MemObjectType::Image1d | MemObjectType::Image1dBuffer => [self.image_width, 1, 1],
            MemObjectType::Image1dArray => [self.image_width, self.image_array_size, 1],
            MemObjectType::Image2d => [self.image_width, self.image_height, 1],
            MemObjectType::Image2dArray => [self.image_width, self.image_height,
                self.image_array_size],
            MemObjectType::Image3d => [self.image_width, self.image_height, self.image_depth],
            MemObjectType::Buffer => [self.image_width, 1, 1],
        }
    }

    pub fn to_raw(&self) -> cl_image_desc {
        cl_image_desc {
            image_type: self.image_type as ffi::cl_mem_object_type,
            image_width: self.image_width,
            image_height: self.image_height,
            image_depth: self.image_depth,
            image_array_size: self.image_array_size,
            image_row_pitch: self.image_row_pitch,
            image_slice_pitch: self.image_slice_pitch,
            num_mip_levels: self.num_mip_levels,
            num_samples: self.num_samples,
            buffer: match self.buffer {
                Some(ref b) => b.as_ptr(),
                None => ptr::null_mut(),
            },
        }
    }
}

//=============================================================================
//=============================== BUFFER REGION ===============================
//=============================================================================

/// A buffer region used when creating a sub-buffer. Offsets are in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct BufferRegion {
    pub origin: usize,
    pub size: usize,
}

impl BufferRegion {
    pub fn new(origin: usize, size: usize) -> BufferRegion {
        BufferRegion { origin, size }
    }

    pub fn to_raw(&self) -> cl_buffer_region {
        cl_buffer_region {
            origin: self.origin,
            size: self.size,
        }
    }
}
