//! Parsed results of the `clGet*Info` family of queries.
//!
//! Every info enum knows the [`InfoKind`] of its result. Raw bytes returned
//! by the driver are parsed into an [`InfoResult`] of that kind. Enumerated
//! values the driver returns which are not known here (vendor extensions)
//! are kept as the raw integer rather than failing.

use std::fmt;
use enum_primitive::FromPrimitive;
use crate::ffi::{cl_context, cl_command_queue, cl_program, cl_mem, cl_device_id, cl_platform_id,
    cl_image_format, cl_context_properties, intptr_t};
use crate::error::{Error as ClError, Result as ClResult};
use crate::util;
use crate::{PlatformId, DeviceId, Context, CommandQueue, Program, Mem, OpenclVersion,
    ContextProperties, ImageFormat, DeviceType, DeviceFpConfig, DeviceExecCapabilities,
    CommandQueueProperties, DeviceAffinityDomain, MemFlags, KernelArgTypeQualifier,
    DeviceMemCacheType, DeviceLocalMemType, MemObjectType, AddressingMode, FilterMode,
    BuildStatus, ProgramBinaryType, CommandType, CommandExecutionStatus,
    KernelArgAddressQualifier, KernelArgAccessQualifier, PlatformInfo, DeviceInfo, ContextInfo,
    CommandQueueInfo, MemInfo, ImageInfo, SamplerInfo, ProgramInfo, ProgramBuildInfo, KernelInfo,
    KernelArgInfo, KernelWorkGroupInfo, EventInfo, ProfilingInfo};


/// The shape of an info query result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InfoKind {
    String,
    Bool,
    Uint,
    Ulong,
    Size,
    Sizes,
    DeviceType,
    FpConfig,
    ExecCapabilities,
    QueueProperties,
    AffinityDomain,
    MemFlags,
    ArgTypeQualifier,
    MemCacheType,
    LocalMemType,
    MemObjectType,
    AddressingMode,
    FilterMode,
    BuildStatus,
    BinaryType,
    CommandType,
    ExecutionStatus,
    ArgAddressQualifier,
    ArgAccessQualifier,
    ImageFormat,
    Platform,
    Device,
    Devices,
    Context,
    CommandQueue,
    Program,
    Mem,
    ContextProperties,
    PartitionProperties,
    HostPtr,
    Binaries,
}


/// A parsed info query result.
#[derive(Debug, Clone)]
pub enum InfoResult {
    String(String),
    Bool(bool),
    Uint(u32),
    Int(i32),
    Ulong(u64),
    Size(usize),
    Sizes(Vec<usize>),
    DeviceType(DeviceType),
    FpConfig(DeviceFpConfig),
    ExecCapabilities(DeviceExecCapabilities),
    QueueProperties(CommandQueueProperties),
    AffinityDomain(DeviceAffinityDomain),
    MemFlags(MemFlags),
    ArgTypeQualifier(KernelArgTypeQualifier),
    MemCacheType(DeviceMemCacheType),
    LocalMemType(DeviceLocalMemType),
    MemObjectType(MemObjectType),
    AddressingMode(AddressingMode),
    FilterMode(FilterMode),
    BuildStatus(BuildStatus),
    BinaryType(ProgramBinaryType),
    CommandType(CommandType),
    ExecutionStatus(CommandExecutionStatus),
    ArgAddressQualifier(KernelArgAddressQualifier),
    ArgAccessQualifier(KernelArgAccessQualifier),
    ImageFormat(ImageFormat),
    Platform(PlatformId),
    Device(Option<DeviceId>),
    Devices(Vec<DeviceId>),
    Context(Context),
    CommandQueue(Option<CommandQueue>),
    Program(Program),
    Mem(Option<Mem>),
    ContextProperties(ContextProperties),
    PartitionProperties(Vec<intptr_t>),
    HostPtr(usize),
    Binaries(Vec<Vec<u8>>),
}

macro_rules! enum_or_raw {
    ($bytes:expr, $raw:ty, $from:ident, $enum:ident, $variant:ident, $fallback:ident) => {{
        let raw = unsafe { util::bytes_to::<$raw>($bytes)? };
        match $enum::$from(raw) {
            Some(val) => InfoResult::$variant(val),
            None => InfoResult::$fallback(raw),
        }
    }};
}

impl InfoResult {
    /// Parses the raw bytes returned by an info query.
    ///
    /// Handles returned as part of the result (contexts, queues, programs,
    /// memory objects) are retained.
    pub fn from_bytes(kind: InfoKind, bytes: Vec<u8>) -> ClResult<InfoResult> {
        let result = match kind {
            InfoKind::String => InfoResult::String(util::bytes_into_string(bytes)?),
            InfoKind::Bool => InfoResult::Bool(unsafe { util::bytes_to::<u32>(&bytes)? } != 0),
            InfoKind::Uint => InfoResult::Uint(unsafe { util::bytes_to::<u32>(&bytes)? }),
            InfoKind::Ulong => InfoResult::Ulong(unsafe { util::bytes_to::<u64>(&bytes)? }),
            InfoKind::Size => InfoResult::Size(unsafe { util::bytes_to::<usize>(&bytes)? }),
            InfoKind::Sizes => InfoResult::Sizes(unsafe { util::bytes_to_vec::<usize>(&bytes)? }),
            InfoKind::HostPtr => InfoResult::HostPtr(unsafe { util::bytes_to::<usize>(&bytes)? }),
            InfoKind::DeviceType => InfoResult::DeviceType(DeviceType::from_bits_truncate(
                unsafe { util::bytes_to::<u64>(&bytes)? })),
            InfoKind::FpConfig => InfoResult::FpConfig(DeviceFpConfig::from_bits_truncate(
                unsafe { util::bytes_to::<u64>(&bytes)? })),
            InfoKind::ExecCapabilities => InfoResult::ExecCapabilities(
                DeviceExecCapabilities::from_bits_truncate(
                    unsafe { util::bytes_to::<u64>(&bytes)? })),
            InfoKind::QueueProperties => InfoResult::QueueProperties(
                CommandQueueProperties::from_bits_truncate(
                    unsafe { util::bytes_to::<u64>(&bytes)? })),
            InfoKind::AffinityDomain => InfoResult::AffinityDomain(
                DeviceAffinityDomain::from_bits_truncate(
                    unsafe { util::bytes_to::<u64>(&bytes)? })),
            InfoKind::MemFlags => InfoResult::MemFlags(MemFlags::from_bits_truncate(
                unsafe { util::bytes_to::<u64>(&bytes)? })),
            InfoKind::ArgTypeQualifier => InfoResult::ArgTypeQualifier(
                KernelArgTypeQualifier::from_bits_truncate(
                    unsafe { util::bytes_to::<u64>(&bytes)? })),
            InfoKind::MemCacheType => enum_or_raw!(&bytes, u32, from_u32, DeviceMemCacheType,
                MemCacheType, Uint),
            InfoKind::LocalMemType => enum_or_raw!(&bytes, u32, from_u32, DeviceLocalMemType,
                LocalMemType, Uint),
            InfoKind::MemObjectType => enum_or_raw!(&bytes, u32, from_u32, MemObjectType,
                MemObjectType, Uint),
            InfoKind::AddressingMode => enum_or_raw!(&bytes, u32, from_u32, AddressingMode,
                AddressingMode, Uint),
            InfoKind::FilterMode => enum_or_raw!(&bytes, u32, from_u32, FilterMode,
                FilterMode, Uint),
            InfoKind::BuildStatus => enum_or_raw!(&bytes, i32, from_i32, BuildStatus,
                BuildStatus, Int),
            InfoKind::BinaryType => enum_or_raw!(&bytes, u32, from_u32, ProgramBinaryType,
                BinaryType, Uint),
            InfoKind::CommandType => enum_or_raw!(&bytes, u32, from_u32, CommandType,
                CommandType, Uint),
            InfoKind::ExecutionStatus => enum_or_raw!(&bytes, i32, from_i32,
                CommandExecutionStatus, ExecutionStatus, Int),
            InfoKind::ArgAddressQualifier => enum_or_raw!(&bytes, u32, from_u32,
                KernelArgAddressQualifier, ArgAddressQualifier, Uint),
            InfoKind::ArgAccessQualifier => enum_or_raw!(&bytes, u32, from_u32,
                KernelArgAccessQualifier, ArgAccessQualifier, Uint),
            InfoKind::ImageFormat => {
                let raw = unsafe { util::bytes_to::<cl_image_format>(&bytes)? };
                InfoResult::ImageFormat(ImageFormat::from_raw(raw)
                    .map_err(|err| ClError::from(err.to_string()))?)
            },
            InfoKind::Platform => InfoResult::Platform(unsafe {
                PlatformId::from_raw(util::bytes_to::<cl_platform_id>(&bytes)?) }),
            InfoKind::Device => {
                let ptr = unsafe { util::bytes_to::<cl_device_id>(&bytes)? };
                InfoResult::Device(if ptr.is_null() { None }
                    else { Some(unsafe { DeviceId::from_raw(ptr) }) })
            },
            InfoKind::Devices => {
                let ptrs = unsafe { util::bytes_to_vec::<cl_device_id>(&bytes)? };
                InfoResult::Devices(ptrs.into_iter()
                    .map(|ptr| unsafe { DeviceId::from_raw(ptr) })
                    .collect())
            },
            InfoKind::Context => InfoResult::Context(unsafe {
                Context::from_raw_copied_ptr(util::bytes_to::<cl_context>(&bytes)?)? }),
            InfoKind::CommandQueue => {
                let ptr = unsafe { util::bytes_to::<cl_command_queue>(&bytes)? };
                InfoResult::CommandQueue(if ptr.is_null() { None }
                    else { Some(unsafe { CommandQueue::from_raw_copied_ptr(ptr)? }) })
            },
            InfoKind::Program => InfoResult::Program(unsafe {
                Program::from_raw_copied_ptr(util::bytes_to::<cl_program>(&bytes)?)? }),
            InfoKind::Mem => {
                let ptr = unsafe { util::bytes_to::<cl_mem>(&bytes)? };
                InfoResult::Mem(if ptr.is_null() { None }
                    else { Some(unsafe { Mem::from_raw_copied_ptr(ptr)? }) })
            },
            InfoKind::ContextProperties => {
                let raw = unsafe { util::bytes_to_vec::<cl_context_properties>(&bytes)? };
                InfoResult::ContextProperties(ContextProperties::from_raw(&raw)?)
            },
            InfoKind::PartitionProperties => InfoResult::PartitionProperties(
                unsafe { util::bytes_to_vec::<intptr_t>(&bytes)? }),
            InfoKind::Binaries => return Err(ClError::from("InfoResult::from_bytes: program \
                binaries can not be parsed from a single byte buffer (use \
                'get_program_binaries').")),
        };
        Ok(result)
    }

    /// Returns the contained string or an error.
    pub fn into_string(self) -> ClResult<String> {
        match self {
            InfoResult::String(s) => Ok(s),
            other => Err(ClError::from(format!("InfoResult::into_string: not a string: {:?}",
                other))),
        }
    }

    /// Parses the contained version string.
    pub fn into_opencl_version(self) -> ClResult<OpenclVersion> {
        let s = self.into_string()?;
        OpenclVersion::from_info_str(&s).ok_or_else(|| ClError::from(format!(
            "Unable to parse OpenCL version from '{}'.", s)))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self { InfoResult::Bool(b) => Some(b), _ => None }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match *self { InfoResult::Uint(v) => Some(v), _ => None }
    }

    pub fn as_ulong(&self) -> Option<u64> {
        match *self { InfoResult::Ulong(v) => Some(v), _ => None }
    }

    pub fn as_size(&self) -> Option<usize> {
        match *self { InfoResult::Size(v) => Some(v), _ => None }
    }

    pub fn as_sizes(&self) -> Option<&[usize]> {
        match *self { InfoResult::Sizes(ref v) => Some(v), _ => None }
    }

    pub fn as_str(&self) -> Option<&str> {
        match *self { InfoResult::String(ref s) => Some(s), _ => None }
    }
}

impl fmt::Display for InfoResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            InfoResult::String(ref s) => write!(f, "{}", s),
            InfoResult::Bool(v) => write!(f, "{}", v),
            InfoResult::Uint(v) => write!(f, "{}", v),
            InfoResult::Int(v) => write!(f, "{}", v),
            InfoResult::Ulong(v) => write!(f, "{}", v),
            InfoResult::Size(v) => write!(f, "{}", v),
            InfoResult::HostPtr(v) => write!(f, "{:#x}", v),
            InfoResult::Binaries(ref bins) => write!(f, "{:?}",
                bins.iter().map(|b| b.len()).collect::<Vec<_>>()),
            ref other => write!(f, "{:?}", other),
        }
    }
}

//=============================================================================
//=========================== RESULT KIND MAPPINGS ============================
//=============================================================================

impl PlatformInfo {
    pub fn kind(&self) -> InfoKind {
        InfoKind::String
    }
}

impl DeviceInfo {
    pub fn kind(&self) -> InfoKind {
        use self::DeviceInfo::*;
        match *self {
            Type => InfoKind::DeviceType,
            VendorId | MaxComputeUnits | MaxWorkItemDimensions | PreferredVectorWidthChar
                | PreferredVectorWidthShort | PreferredVectorWidthInt | PreferredVectorWidthLong
                | PreferredVectorWidthFloat | PreferredVectorWidthDouble
                | PreferredVectorWidthHalf | MaxClockFrequency | AddressBits | MaxReadImageArgs
                | MaxWriteImageArgs | MaxSamplers | MemBaseAddrAlign | MinDataTypeAlignSize
                | GlobalMemCachelineSize | MaxConstantArgs | NativeVectorWidthChar
                | NativeVectorWidthShort | NativeVectorWidthInt | NativeVectorWidthLong
                | NativeVectorWidthFloat | NativeVectorWidthDouble | NativeVectorWidthHalf
                | PartitionMaxSubDevices | ReferenceCount | ImagePitchAlignment
                | ImageBaseAddressAlignment => InfoKind::Uint,
            MaxWorkGroupSize | Image2dMaxWidth | Image2dMaxHeight | Image3dMaxWidth
                | Image3dMaxHeight | Image3dMaxDepth | MaxParameterSize
                | ProfilingTimerResolution | ImageMaxBufferSize | ImageMaxArraySize
                | PrintfBufferSize => InfoKind::Size,
            MaxWorkItemSizes => InfoKind::Sizes,
            MaxMemAllocSize | GlobalMemCacheSize | GlobalMemSize | MaxConstantBufferSize
                | LocalMemSize => InfoKind::Ulong,
            ImageSupport | ErrorCorrectionSupport | EndianLittle | Available
                | CompilerAvailable | HostUnifiedMemory | LinkerAvailable
                | PreferredInteropUserSync => InfoKind::Bool,
            SingleFpConfig | DoubleFpConfig => InfoKind::FpConfig,
            GlobalMemCacheType => InfoKind::MemCacheType,
            LocalMemType => InfoKind::LocalMemType,
            ExecutionCapabilities => InfoKind::ExecCapabilities,
            QueueProperties => InfoKind::QueueProperties,
            Name | Vendor | DriverVersion | Profile | Version | Extensions | OpenclCVersion
                | BuiltInKernels => InfoKind::String,
            Platform => InfoKind::Platform,
            ParentDevice => InfoKind::Device,
            PartitionProperties | PartitionType => InfoKind::PartitionProperties,
            PartitionAffinityDomain => InfoKind::AffinityDomain,
        }
    }
}

impl ContextInfo {
    pub fn kind(&self) -> InfoKind {
        match *self {
            ContextInfo::ReferenceCount | ContextInfo::NumDevices => InfoKind::Uint,
            ContextInfo::Devices => InfoKind::Devices,
            ContextInfo::Properties => InfoKind::ContextProperties,
        }
    }
}

impl CommandQueueInfo {
    pub fn kind(&self) -> InfoKind {
        match *self {
            CommandQueueInfo::Context => InfoKind::Context,
            CommandQueueInfo::Device => InfoKind::Device,
            CommandQueueInfo::ReferenceCount => InfoKind::Uint,
            CommandQueueInfo::Properties => InfoKind::QueueProperties,
        }
    }
}

impl MemInfo {
    pub fn kind(&self) -> InfoKind {
        match *self {
            MemInfo::Type => InfoKind::MemObjectType,
            MemInfo::Flags => InfoKind::MemFlags,
            MemInfo::Size | MemInfo::Offset => InfoKind::Size,
            MemInfo::HostPtr => InfoKind::HostPtr,
            MemInfo::MapCount | MemInfo::ReferenceCount => InfoKind::Uint,
            MemInfo::Context => InfoKind::Context,
            MemInfo::AssociatedMemobject => InfoKind::Mem,
        }
    }
}

impl ImageInfo {
    pub fn kind(&self) -> InfoKind {
        match *self {
            ImageInfo::Format => InfoKind::ImageFormat,
            ImageInfo::ElementSize | ImageInfo::RowPitch | ImageInfo::SlicePitch
                | ImageInfo::Width | ImageInfo::Height | ImageInfo::Depth
                | ImageInfo::ArraySize => InfoKind::Size,
            ImageInfo::Buffer => InfoKind::Mem,
            ImageInfo::NumMipLevels | ImageInfo::NumSamples => InfoKind::Uint,
        }
    }
}

impl SamplerInfo {
    pub fn kind(&self) -> InfoKind {
        match *self {
            SamplerInfo::ReferenceCount => InfoKind::Uint,
            SamplerInfo::Context => InfoKind::Context,
            SamplerInfo::NormalizedCoords => InfoKind::Bool,
            SamplerInfo::AddressingMode => InfoKind::AddressingMode,
            SamplerInfo::FilterMode => InfoKind::FilterMode,
        }
    }
}

impl ProgramInfo {
    pub fn kind(&self) -> InfoKind {
        match *self {
            ProgramInfo::ReferenceCount | ProgramInfo::NumDevices => InfoKind::Uint,
            ProgramInfo::Context => InfoKind::Context,
            ProgramInfo::Devices => InfoKind::Devices,
            ProgramInfo::Source | ProgramInfo::KernelNames => InfoKind::String,
            ProgramInfo::BinarySizes => InfoKind::Sizes,
            ProgramInfo::Binaries => InfoKind::Binaries,
            ProgramInfo::NumKernels => InfoKind::Size,
        }
    }
}

impl ProgramBuildInfo {
    pub fn kind(&self) -> InfoKind {
        match *self {
            ProgramBuildInfo::BuildStatus => InfoKind::BuildStatus,
            ProgramBuildInfo::BuildOptions | ProgramBuildInfo::BuildLog => InfoKind::String,
            ProgramBuildInfo::BinaryType => InfoKind::BinaryType,
        }
    }
}

impl KernelInfo {
    pub fn kind(&self) -> InfoKind {
        match *self {
            KernelInfo::FunctionName | KernelInfo::Attributes => InfoKind::String,
            KernelInfo::NumArgs | KernelInfo::ReferenceCount => InfoKind::Uint,
            KernelInfo::Context => InfoKind::Context,
            KernelInfo::Program => InfoKind::Program,
        }
    }
}

impl KernelArgInfo {
    pub fn kind(&self) -> InfoKind {
        match *self {
            KernelArgInfo::AddressQualifier => InfoKind::ArgAddressQualifier,
            KernelArgInfo::AccessQualifier => InfoKind::ArgAccessQualifier,
            KernelArgInfo::TypeName | KernelArgInfo::Name => InfoKind::String,
            KernelArgInfo::TypeQualifier => InfoKind::ArgTypeQualifier,
        }
    }
}

impl KernelWorkGroupInfo {
    pub fn kind(&self) -> InfoKind {
        match *self {
            KernelWorkGroupInfo::WorkGroupSize
                | KernelWorkGroupInfo::PreferredWorkGroupSizeMultiple => InfoKind::Size,
            KernelWorkGroupInfo::CompileWorkGroupSize
                | KernelWorkGroupInfo::GlobalWorkSize => InfoKind::Sizes,
            KernelWorkGroupInfo::LocalMemSize
                | KernelWorkGroupInfo::PrivateMemSize => InfoKind::Ulong,
        }
    }
}

impl EventInfo {
    pub fn kind(&self) -> InfoKind {
        match *self {
            EventInfo::CommandQueue => InfoKind::CommandQueue,
            EventInfo::CommandType => InfoKind::CommandType,
            EventInfo::ReferenceCount => InfoKind::Uint,
            EventInfo::CommandExecutionStatus => InfoKind::ExecutionStatus,
            EventInfo::Context => InfoKind::Context,
        }
    }
}

impl ProfilingInfo {
    pub fn kind(&self) -> InfoKind {
        InfoKind::Ulong
    }
}
