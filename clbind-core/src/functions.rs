//! Thin and safe OpenCL API function wrappers.
//!
//!
//!
//!
// ### Error Handling Notes
//
// Every function uses the same error type, `ApiError`, for status codes
// returned by the driver. The integer code is kept as returned, including
// vendor specific codes, and error messages include a link to the relevant
// Khronos API reference web page.
//

use std::ptr;
use std::mem;
use std::ffi::CString;
use std::thread;
use std::time::Duration;
use std::env;
use std::fmt;
use enum_primitive::FromPrimitive;

use crate::ffi::{self, size_t, c_void, cl_int, cl_uint, cl_event, cl_mem, cl_program,
    cl_device_id, cl_native_kernel_fn, cl_event_notify_fn};

use crate::error::{Error as ClError, Result as ClResult};
use crate::callbacks::{self, EventCallback, BuildCallback, MemDestructorCallback,
    ContextNotifier};

use crate::{OclPrm, PlatformId, DeviceId, SubDevice, Context, ContextProperties, CommandQueue,
    Mem, Program, Kernel, Event, Sampler, ClWaitListPtr, ClNullEventPtr, DeviceType, MemFlags,
    MapFlags, MemMigrationFlags, CommandQueueProperties, MemObjectType, ImageFormat,
    ImageFormatParseError, ImageDescriptor, BufferRegion, DevicePartition, AddressingMode,
    FilterMode, CommandExecutionStatus, OpenclVersion, Status, InfoResult, PlatformInfo,
    DeviceInfo, ContextInfo, CommandQueueInfo, MemInfo, ImageInfo, SamplerInfo, ProgramInfo,
    ProgramBuildInfo, KernelInfo, KernelArgInfo, KernelWorkGroupInfo, EventInfo, ProfilingInfo,
    BufferCreateType};

/// Environment variable selecting the platform returned by
/// `default_platform`.
pub const DEFAULT_PLATFORM_IDX_ENV_VAR: &str = "CLBIND_DEFAULT_PLATFORM_IDX";
/// Environment variable selecting the device type returned by
/// `default_device_type`.
pub const DEFAULT_DEVICE_TYPE_ENV_VAR: &str = "CLBIND_DEFAULT_DEVICE_TYPE";

const PLATFORM_IDS_ATTEMPT_TIMEOUT_MS: u64 = 2000;
const PLATFORM_IDS_ATTEMPT_COUNT: u64 = 5;

//============================================================================
//============================================================================
//============================ ERROR HANDLING ================================
//============================================================================
//============================================================================

static SDK_DOCS_URL_PRE: &str = "https://www.khronos.org/registry/cl/sdk/1.2/docs/man/xhtml/";
static SDK_DOCS_URL_SUF: &str = ".html#errors";


/// An OpenCL API error.
pub struct ApiError {
    code: i32,
    fn_name: &'static str,
    fn_info: Option<String>,
}

impl ApiError {
    pub fn new<S: Into<String>>(code: i32, fn_name: &'static str, fn_info: Option<S>) -> ApiError {
        ApiError {
            code,
            fn_name,
            fn_info: fn_info.map(|s| s.into()),
        }
    }

    /// Returns the status if `code` is a known OpenCL status code.
    pub fn status(&self) -> Option<Status> {
        Status::from_i32(self.code)
    }

    /// Returns the raw status code as returned by the driver.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Returns the name of the entry point which returned this error.
    pub fn fn_name(&self) -> &'static str {
        self.fn_name
    }
}

impl std::error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let fn_info_string = match self.fn_info {
            Some(ref fn_info) => format!("(\"{}\")", fn_info),
            None => String::with_capacity(0),
        };

        let status_string = match self.status() {
            Some(status) => format!("{:?}", status),
            None => String::from("<unknown status>"),
        };

        write!(f, "\n\n\
            ################################ OPENCL ERROR ############################### \
            \n\nError executing function: {}{}  \
            \n\nStatus error code: {} ({})  \
            \n\nPlease visit the following url for more information: \n\n{}{}{}  \n\n\
            ############################################################################# \n",
            self.fn_name, fn_info_string, status_string, self.code,
            SDK_DOCS_URL_PRE, self.fn_name, SDK_DOCS_URL_SUF)
    }
}

impl fmt::Debug for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self, f)
    }
}

/// Evaluates `errcode` and returns an `Err` with a failure message if it is
/// not 0 (Status::CL_SUCCESS).
///
#[inline(always)]
fn eval_errcode<T, S>(errcode: cl_int, result: T, fn_name: &'static str, fn_info: Option<S>)
        -> ClResult<T>
        where S: Into<String> {
    if (Status::CL_SUCCESS as i32) == errcode {
        Ok(result)
    } else {
        Err(ApiError::new(errcode, fn_name, fn_info).into())
    }
}

/// Evaluates the status of a `clCreate...` call and checks that the
/// returned handle is not null.
#[inline(always)]
fn eval_create_ptr(errcode: cl_int, ptr: *mut c_void, fn_name: &'static str)
        -> ClResult<*mut c_void> {
    eval_errcode(errcode, ptr, fn_name, None::<String>)?;
    if ptr.is_null() {
        return Err(ApiWrapperError::NullHandleReturned(fn_name).into());
    }
    Ok(ptr)
}


/// An OpenCL program build error.
#[derive(Debug, thiserror::Error)]
pub enum ProgramBuildError {
    #[error("Device list is empty. Aborting build.")]
    DeviceListEmpty,
    #[error(
        "\n\n\
        ###################### OPENCL PROGRAM BUILD DEBUG OUTPUT \
        ######################\
        \n\n{fn_name} failed with status {code}.\n\n{log}\n\
        ########################################################\
        #######################\
        \n\n"
    )]
    BuildLog { code: i32, fn_name: &'static str, log: String },
    #[error("{0}")]
    InfoResult(Box<ClError>),
}

impl ProgramBuildError {
    /// Returns the raw status code of a failed build.
    pub fn code(&self) -> Option<i32> {
        match *self {
            ProgramBuildError::BuildLog { code, .. } => Some(code),
            _ => None,
        }
    }
}


/// A version kind identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionKind {
    Device,
    Platform,
}


/// A version too low error.
#[derive(Debug, thiserror::Error)]
#[error("OpenCL ({kind:?}) version too low to use {function} (detected: {detected}, \
    required: {required}).")]
pub struct VersionLowError {
    pub detected: OpenclVersion,
    pub required: OpenclVersion,
    pub function: &'static str,
    pub kind: VersionKind,
}


/// An error representing miscellaneous errors from throughout this module.
#[derive(Debug, thiserror::Error)]
pub enum ApiWrapperError {
    #[error("Unable to get platform id list after {0} seconds of waiting.")]
    GetPlatformIdsPlatformListUnavailable(u64),
    #[error("`devices_max` can not be zero.")]
    GetDeviceIdsDevicesMaxZero,
    #[error("No devices specified.")]
    CreateContextNoDevicesSpecified,
    #[error("Buffer length and data length and do not match.")]
    CreateBufferDataLengthMismatch,
    #[error("The memory flags ({0:?}) require host data but none was provided.")]
    CreateMemHostDataMissing(MemFlags),
    #[error("Length of 'devices' must be greater than zero.")]
    CreateProgramWithBinaryDevicesLenZero,
    #[error("Length of 'devices' must equal the length of 'binaries' \
        (e.g. one binary per device).")]
    CreateProgramWithBinaryDevicesLenMismatch,
    #[error("Length of 'input_headers' ({headers}) must equal the length of \
        'header_include_names' ({names}).")]
    CompileProgramHeaderNamesLenMismatch { headers: usize, names: usize },
    #[error("Buffer fill range does not fit in bytes (offset: {offset}, length: {len}).")]
    FillBufferRangeOverflow { offset: usize, len: usize },
    #[error("The fill color of an image must have exactly four elements (found {0}).")]
    FillImageColorLen(usize),
    #[error("The fill color of an image must be four `f32`, `i32`, or `u32` values \
        (found an element size of {0} bytes).")]
    FillImageColorElementSize(usize),
    #[error("Native kernel memory object locations ({locs}) must match the memory object \
        count ({mems}) and lie within the argument block.")]
    NativeKernelMemLocs { mems: usize, locs: usize },
    #[error("User event error statuses must be negative (found {0}).")]
    UserEventErrorNotNegative(i32),
    #[error("The specified function does not exist for the implementation or \
        'platform' is not a valid platform.")]
    GetExtensionFunctionAddressForPlatformInvalidFunction,
    #[error("'{0}' reported success but returned a null handle.")]
    NullHandleReturned(&'static str),
    #[error("No OpenCL platforms found. Check your driver.")]
    DefaultPlatformNoPlatforms,
    #[error("The default platform set by the environment variable \
        'CLBIND_DEFAULT_PLATFORM_IDX' has an index which is out of range \
        (index: [{default_platform_idx}], max: [{max_idx}]).")]
    DefaultPlatformEnvVarBadIdx { default_platform_idx: usize, max_idx: usize },
    #[error("The default platform set by the environment variable \
        'CLBIND_DEFAULT_PLATFORM_IDX' ('{0}') is not a valid index.")]
    DefaultPlatformEnvVarInvalid(String),
    #[error("The default device type set by the environment variable \
        'CLBIND_DEFAULT_DEVICE_TYPE': ('{0}') is invalid. Valid types are: 'DEFAULT', 'CPU', \
        'GPU', 'ACCELERATOR', 'CUSTOM', and 'ALL'.")]
    DefaultDeviceTypeInvalidType(String),
    #[error("A different OpenCL entry point table has already been installed or loaded.")]
    ApiAlreadyInstalled,
}


//============================================================================
//============================================================================
//=========================== SUPPORT FUNCTIONS ==============================
//============================================================================
//============================================================================


/// Maps options of slices to pointers and a length.
fn resolve_event_ptrs<En: ClNullEventPtr, Ewl: ClWaitListPtr>(wait_list: Option<Ewl>,
            new_event: Option<En>) -> (cl_uint, *const cl_event, *mut cl_event)
{
    // If the wait list is empty or if its containing option is none, map to (0, null),
    // otherwise map to the length and pointer:
    let (wait_list_len, wait_list_ptr) = match wait_list {
        Some(wl) => {
            if wl.count() > 0 {
                (wl.count(), unsafe { wl.as_ptr_ptr() })
            } else {
                (0, ptr::null())
            }
        },
        None => (0, ptr::null()),
    };

    let new_event_ptr = match new_event {
        Some(mut ne) => ne.alloc_new(),
        None => ptr::null_mut(),
    };

    (wait_list_len, wait_list_ptr, new_event_ptr)
}

/// Converts an array option reference into a pointer to the contained array.
fn resolve_work_dims(work_dims: Option<&[usize; 3]>) -> *const size_t {
    match work_dims {
        Some(w) => w.as_ptr(),
        None => ptr::null(),
    }
}

/// Runs the two-step size-then-data pattern of an info query.
fn info_bytes<F>(fn_name: &'static str, mut query: F) -> ClResult<Vec<u8>>
        where F: FnMut(size_t, *mut c_void, *mut size_t) -> cl_int
{
    let mut size: size_t = 0;
    eval_errcode(query(0, ptr::null_mut(), &mut size), (), fn_name, None::<String>)?;

    if size == 0 {
        return Ok(Vec::new());
    }

    let mut bytes = vec![0u8; size];
    let errcode = query(size, bytes.as_mut_ptr() as *mut c_void, ptr::null_mut());
    eval_errcode(errcode, bytes, fn_name, None::<String>)
}

/// Verifies that OpenCL versions are above a specified threshold.
pub fn verify_versions(versions: &[OpenclVersion], required_version: [u16; 2],
        function: &'static str, kind: VersionKind) -> ClResult<()> {
    let reqd_ver = OpenclVersion::from(required_version);

    for &d_ver in versions {
        if d_ver < reqd_ver {
            return Err(VersionLowError {
                detected: d_ver,
                required: reqd_ver,
                function,
                kind,
            }.into());
        }
    }

    Ok(())
}

/// Returns the versions of a list of devices.
pub fn device_versions(device_ids: &[DeviceId]) -> ClResult<Vec<OpenclVersion>> {
    device_ids.iter().map(|d| d.version()).collect()
}

/// Verifies that every device in `device_ids` supports at least
/// `required_version` before `function` is used with them.
pub fn verify_device_versions(device_ids: &[DeviceId], required_version: [u16; 2],
        function: &'static str) -> ClResult<()> {
    verify_versions(&device_versions(device_ids)?, required_version, function,
        VersionKind::Device)
}

fn device_ptrs(device_ids: &[DeviceId]) -> (cl_uint, *const cl_device_id) {
    if device_ids.is_empty() {
        (0, ptr::null())
    } else {
        (device_ids.len() as cl_uint, device_ids.as_ptr() as *const cl_device_id)
    }
}

//============================================================================
//============================================================================
//======================= OPENCL FUNCTION WRAPPERS ===========================
//============================================================================
//============================================================================

//============================================================================
//============================= Platform API =================================
//============================================================================

/// Returns a list of available platforms as 'core' objects.
pub fn get_platform_ids() -> ClResult<Vec<PlatformId>> {
    let get_ids = cl_fn!(clGetPlatformIDs);
    let mut num_platforms = 0 as cl_uint;

    // Get a count of available platforms:
    let mut errcode: cl_int = unsafe { get_ids(0, ptr::null_mut(), &mut num_platforms) };

    // Deal with ICD wake up problems when called from multiple threads at the
    // same time by adding a delay/retry loop:
    if errcode == Status::CL_PLATFORM_NOT_FOUND_KHR as i32 {
        let sleep_ms = PLATFORM_IDS_ATTEMPT_TIMEOUT_MS;
        let mut iters_rmng = PLATFORM_IDS_ATTEMPT_COUNT;

        while errcode == Status::CL_PLATFORM_NOT_FOUND_KHR as i32 {
            if iters_rmng == 0 {
                return Err(ApiWrapperError::GetPlatformIdsPlatformListUnavailable(
                    (PLATFORM_IDS_ATTEMPT_COUNT * sleep_ms) / 1000).into())
            }

            log::debug!("clbind_core: platform list unavailable, retrying in {}ms.", sleep_ms);
            thread::sleep(Duration::from_millis(sleep_ms));

            errcode = unsafe { get_ids(0, ptr::null_mut(), &mut num_platforms) };
            iters_rmng -= 1;
        }
    }

    eval_errcode(errcode, (), "clGetPlatformIDs", None::<String>)?;

    // If no platforms are found, return an empty vec directly:
    if num_platforms == 0 {
        return Ok(vec![]);
    }

    let mut platforms = vec![unsafe { PlatformId::null() }; num_platforms as usize];

    errcode = unsafe {
        get_ids(
            num_platforms,
            platforms.as_mut_ptr() as *mut ffi::cl_platform_id,
            ptr::null_mut()
        )
    };

    eval_errcode(errcode, platforms, "clGetPlatformIDs", None::<String>)
}

/// Returns the unparsed bytes of a platform info query.
pub fn get_platform_info_raw(platform: &PlatformId, request: PlatformInfo) -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetPlatformInfo);
    info_bytes("clGetPlatformInfo", |size, value, size_ret| unsafe {
        get_info(platform.as_ptr(), request as ffi::cl_platform_info, size, value, size_ret)
    })
}

/// Returns platform information of the requested type.
pub fn get_platform_info(platform: &PlatformId, request: PlatformInfo) -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_platform_info_raw(platform, request)?)
}

//============================================================================
//============================= Device APIs  =================================
//============================================================================

/// Returns a list of available devices for the provided platform.
///
/// `device_types` defaults to `DeviceType::ALL`. At most `devices_max`
/// devices are returned if specified.
pub fn get_device_ids(platform: &PlatformId, device_types: Option<DeviceType>,
        devices_max: Option<u32>) -> ClResult<Vec<DeviceId>>
{
    let get_ids = cl_fn!(clGetDeviceIDs);
    let device_types = device_types.unwrap_or(DeviceType::ALL);

    if devices_max == Some(0) {
        return Err(ApiWrapperError::GetDeviceIdsDevicesMaxZero.into());
    }

    let mut num_devices: cl_uint = 0;
    let errcode = unsafe {
        get_ids(platform.as_ptr(), device_types.bits(), 0, ptr::null_mut(), &mut num_devices)
    };
    eval_errcode(errcode, (), "clGetDeviceIDs", None::<String>)?;

    if let Some(max) = devices_max {
        num_devices = num_devices.min(max);
    }

    if num_devices == 0 {
        return Ok(vec![]);
    }

    let mut device_ids = vec![unsafe { DeviceId::null() }; num_devices as usize];
    let errcode = unsafe {
        get_ids(platform.as_ptr(), device_types.bits(), num_devices,
            device_ids.as_mut_ptr() as *mut cl_device_id, ptr::null_mut())
    };
    eval_errcode(errcode, device_ids, "clGetDeviceIDs", None::<String>)
}

/// Returns the unparsed bytes of a device info query.
pub fn get_device_info_raw(device: &DeviceId, request: DeviceInfo) -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetDeviceInfo);
    info_bytes("clGetDeviceInfo", |size, value, size_ret| unsafe {
        get_info(device.as_ptr(), request as ffi::cl_device_info, size, value, size_ret)
    })
}

/// Returns information about a device.
pub fn get_device_info(device: &DeviceId, request: DeviceInfo) -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_device_info_raw(device, request)?)
}

/// Partitions a device into sub-devices.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn create_sub_devices(device: &DeviceId, partition: &DevicePartition)
        -> ClResult<Vec<SubDevice>>
{
    let create = cl_fn!(clCreateSubDevices);
    let properties = partition.to_raw();

    let mut num_devices: cl_uint = 0;
    let errcode = unsafe {
        create(device.as_ptr(), properties.as_ptr(), 0, ptr::null_mut(), &mut num_devices)
    };
    eval_errcode(errcode, (), "clCreateSubDevices", None::<String>)?;

    if num_devices == 0 {
        return Ok(vec![]);
    }

    let mut raw_devices: Vec<cl_device_id> = vec![ptr::null_mut(); num_devices as usize];
    let errcode = unsafe {
        create(device.as_ptr(), properties.as_ptr(), num_devices, raw_devices.as_mut_ptr(),
            ptr::null_mut())
    };
    eval_errcode(errcode, (), "clCreateSubDevices", None::<String>)?;

    Ok(raw_devices.into_iter()
        .map(|ptr| unsafe { SubDevice::from_raw_create_ptr(ptr) })
        .collect())
}

/// Increments the reference count of a sub-device.
///
/// [Version Controlled: OpenCL 1.2+]
pub unsafe fn retain_device(device: &DeviceId) -> ClResult<()> {
    let retain = cl_fn!(clRetainDevice);
    eval_errcode(retain(device.as_ptr()), (), "clRetainDevice", None::<String>)
}

/// Decrements the reference count of a sub-device.
///
/// [Version Controlled: OpenCL 1.2+]
pub unsafe fn release_device(device: &DeviceId) -> ClResult<()> {
    let release = cl_fn!(clReleaseDevice);
    eval_errcode(release(device.as_ptr()), (), "clReleaseDevice", None::<String>)
}

//============================================================================
//============================= Context APIs  ================================
//============================================================================

/// Creates a new context pointer valid for all devices in `device_ids`.
///
/// ## Safety
///
/// If `notifier` is given, it must outlive every reference to the returned
/// context, including references held by the driver.
pub unsafe fn create_context(properties: Option<&ContextProperties>, device_ids: &[DeviceId],
        notifier: Option<&ContextNotifier>) -> ClResult<Context>
{
    let create = cl_fn!(clCreateContext);

    if device_ids.is_empty() {
        return Err(ApiWrapperError::CreateContextNoDevicesSpecified.into());
    }

    let properties_raw = properties.map(|p| p.to_raw());
    let properties_ptr = match properties_raw {
        Some(ref raw) => raw.as_ptr(),
        None => ptr::null(),
    };

    let (pfn_notify, user_data) = match notifier {
        Some(n) => n.raw_parts(),
        None => (None, ptr::null_mut()),
    };

    let mut errcode: cl_int = 0;
    let context_ptr = create(
        properties_ptr,
        device_ids.len() as cl_uint,
        device_ids.as_ptr() as *const cl_device_id,
        pfn_notify,
        user_data,
        &mut errcode,
    );

    eval_create_ptr(errcode, context_ptr, "clCreateContext")
        .map(|ptr| Context::from_raw_create_ptr(ptr))
}

/// Creates a new context pointer for all devices of a specific type.
///
/// ## Safety
///
/// See `create_context`.
pub unsafe fn create_context_from_type(properties: Option<&ContextProperties>,
        device_type: DeviceType, notifier: Option<&ContextNotifier>) -> ClResult<Context>
{
    let create = cl_fn!(clCreateContextFromType);

    let properties_raw = properties.map(|p| p.to_raw());
    let properties_ptr = match properties_raw {
        Some(ref raw) => raw.as_ptr(),
        None => ptr::null(),
    };

    let (pfn_notify, user_data) = match notifier {
        Some(n) => n.raw_parts(),
        None => (None, ptr::null_mut()),
    };

    let mut errcode: cl_int = 0;
    let context_ptr = create(properties_ptr, device_type.bits(), pfn_notify, user_data,
        &mut errcode);

    eval_create_ptr(errcode, context_ptr, "clCreateContextFromType")
        .map(|ptr| Context::from_raw_create_ptr(ptr))
}

/// Increments the reference count of a context.
pub unsafe fn retain_context(context: &Context) -> ClResult<()> {
    let retain = cl_fn!(clRetainContext);
    eval_errcode(retain(context.as_ptr()), (), "clRetainContext", None::<String>)
}

/// Decrements the reference count of a context.
pub unsafe fn release_context(context: &Context) -> ClResult<()> {
    let release = cl_fn!(clReleaseContext);
    eval_errcode(release(context.as_ptr()), (), "clReleaseContext", None::<String>)
}

/// Returns the unparsed bytes of a context info query.
pub fn get_context_info_raw(context: &Context, request: ContextInfo) -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetContextInfo);
    info_bytes("clGetContextInfo", |size, value, size_ret| unsafe {
        get_info(context.as_ptr(), request as ffi::cl_context_info, size, value, size_ret)
    })
}

/// Returns various kinds of context information.
pub fn get_context_info(context: &Context, request: ContextInfo) -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_context_info_raw(context, request)?)
}

/// Returns the platform for a context.
///
/// Returns `None` if the context properties do not specify a platform.
pub fn get_context_platform(context: &Context) -> ClResult<Option<PlatformId>> {
    match get_context_info(context, ContextInfo::Properties)? {
        InfoResult::ContextProperties(props) => Ok(props.get_platform()),
        _ => Ok(None),
    }
}

//============================================================================
//========================== Command Queue APIs ==============================
//============================================================================

/// Returns a new command queue pointer.
pub fn create_command_queue(context: &Context, device: &DeviceId,
        properties: Option<CommandQueueProperties>) -> ClResult<CommandQueue>
{
    let create = cl_fn!(clCreateCommandQueue);
    let properties = properties.unwrap_or(CommandQueueProperties::empty());

    let mut errcode: cl_int = 0;
    let cq_ptr = unsafe {
        create(context.as_ptr(), device.as_ptr(), properties.bits(), &mut errcode)
    };

    eval_create_ptr(errcode, cq_ptr, "clCreateCommandQueue")
        .map(|ptr| unsafe { CommandQueue::from_raw_create_ptr(ptr) })
}

/// Increments the reference count of a command queue.
pub unsafe fn retain_command_queue(queue: &CommandQueue) -> ClResult<()> {
    let retain = cl_fn!(clRetainCommandQueue);
    eval_errcode(retain(queue.as_ptr()), (), "clRetainCommandQueue", None::<String>)
}

/// Decrements the reference count of a command queue.
pub unsafe fn release_command_queue(queue: &CommandQueue) -> ClResult<()> {
    let release = cl_fn!(clReleaseCommandQueue);
    eval_errcode(release(queue.as_ptr()), (), "clReleaseCommandQueue", None::<String>)
}

/// Returns the unparsed bytes of a command queue info query.
pub fn get_command_queue_info_raw(queue: &CommandQueue, request: CommandQueueInfo)
        -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetCommandQueueInfo);
    info_bytes("clGetCommandQueueInfo", |size, value, size_ret| unsafe {
        get_info(queue.as_ptr(), request as ffi::cl_command_queue_info, size, value, size_ret)
    })
}

/// Returns information about a command queue
pub fn get_command_queue_info(queue: &CommandQueue, request: CommandQueueInfo)
        -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_command_queue_info_raw(queue, request)?)
}

//============================================================================
//========================== Memory Object APIs ==============================
//============================================================================

/// Returns a new buffer pointer with size (bytes): `len` * sizeof(T).
///
/// ## Safety
///
/// If `flags` contains `USE_HOST_PTR`, `data` must outlive the buffer and
/// must not be accessed while the driver may use it.
pub unsafe fn create_buffer<T: OclPrm>(context: &Context, flags: MemFlags, len: usize,
        data: Option<&[T]>) -> ClResult<Mem>
{
    let create = cl_fn!(clCreateBuffer);

    let host_ptr = match data {
        Some(d) => {
            if d.len() != len {
                return Err(ApiWrapperError::CreateBufferDataLengthMismatch.into());
            }
            d.as_ptr() as *mut c_void
        },
        None => {
            if flags.requires_host_ptr() {
                return Err(ApiWrapperError::CreateMemHostDataMissing(flags).into());
            }
            ptr::null_mut()
        },
    };

    let mut errcode: cl_int = 0;
    let buf_ptr = create(
        context.as_ptr(),
        flags.bits(),
        len * mem::size_of::<T>(),
        host_ptr,
        &mut errcode,
    );

    eval_create_ptr(errcode, buf_ptr, "clCreateBuffer").map(|ptr| Mem::from_raw_create_ptr(ptr))
}

/// Return a new sub-buffer covering `region` (in bytes) of `buffer`.
pub fn create_sub_buffer(buffer: &Mem, flags: MemFlags, region: &BufferRegion) -> ClResult<Mem> {
    let create = cl_fn!(clCreateSubBuffer);
    let buffer_create_info = region.to_raw();

    let mut errcode: cl_int = 0;
    let sub_buf_ptr = unsafe {
        create(
            buffer.as_ptr(),
            flags.bits(),
            BufferCreateType::Region as ffi::cl_buffer_create_type,
            &buffer_create_info as *const ffi::cl_buffer_region as *const c_void,
            &mut errcode,
        )
    };

    eval_create_ptr(errcode, sub_buf_ptr, "clCreateSubBuffer")
        .map(|ptr| unsafe { Mem::from_raw_create_ptr(ptr) })
}

/// Returns a new image (mem) pointer.
///
/// [Version Controlled: OpenCL 1.2+]
///
/// ## Safety
///
/// See `create_buffer`.
pub unsafe fn create_image<T: OclPrm>(context: &Context, flags: MemFlags, format: &ImageFormat,
        desc: &ImageDescriptor, data: Option<&[T]>) -> ClResult<Mem>
{
    let create = cl_fn!(clCreateImage);

    let host_ptr = match data {
        Some(d) => d.as_ptr() as *mut c_void,
        None => {
            if flags.requires_host_ptr() {
                return Err(ApiWrapperError::CreateMemHostDataMissing(flags).into());
            }
            ptr::null_mut()
        },
    };

    let format_raw = format.to_raw();
    let desc_raw = desc.to_raw();

    let mut errcode: cl_int = 0;
    let image_ptr = create(
        context.as_ptr(),
        flags.bits(),
        &format_raw,
        &desc_raw,
        host_ptr,
        &mut errcode,
    );

    eval_create_ptr(errcode, image_ptr, "clCreateImage").map(|ptr| Mem::from_raw_create_ptr(ptr))
}

/// Increments the reference counter of a mem object.
pub unsafe fn retain_mem_object(mem: &Mem) -> ClResult<()> {
    let retain = cl_fn!(clRetainMemObject);
    eval_errcode(retain(mem.as_ptr()), (), "clRetainMemObject", None::<String>)
}

/// Decrements the reference counter of a mem object.
pub unsafe fn release_mem_object(mem: &Mem) -> ClResult<()> {
    let release = cl_fn!(clReleaseMemObject);
    eval_errcode(release(mem.as_ptr()), (), "clReleaseMemObject", None::<String>)
}

/// Returns a list of supported image formats. Formats unknown to
/// `ImageFormat` are returned as parse errors in place.
pub fn get_supported_image_formats(context: &Context, flags: MemFlags,
        image_type: MemObjectType) -> ClResult<Vec<Result<ImageFormat, ImageFormatParseError>>>
{
    let get_formats = cl_fn!(clGetSupportedImageFormats);
    let mut num_image_formats: cl_uint = 0;

    let errcode = unsafe {
        get_formats(context.as_ptr(), flags.bits(), image_type as ffi::cl_mem_object_type,
            0, ptr::null_mut(), &mut num_image_formats)
    };
    eval_errcode(errcode, (), "clGetSupportedImageFormats", None::<String>)?;

    if num_image_formats == 0 {
        return Ok(vec![]);
    }

    let mut image_formats = vec![ffi::cl_image_format::default(); num_image_formats as usize];

    let errcode = unsafe {
        get_formats(context.as_ptr(), flags.bits(), image_type as ffi::cl_mem_object_type,
            num_image_formats, image_formats.as_mut_ptr(), ptr::null_mut())
    };
    eval_errcode(errcode, (), "clGetSupportedImageFormats", None::<String>)?;

    Ok(ImageFormat::list_from_raw(&image_formats))
}

/// Returns the unparsed bytes of a mem object info query.
pub fn get_mem_object_info_raw(obj: &Mem, request: MemInfo) -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetMemObjectInfo);
    info_bytes("clGetMemObjectInfo", |size, value, size_ret| unsafe {
        get_info(obj.as_ptr(), request as ffi::cl_mem_info, size, value, size_ret)
    })
}

/// Get mem object info.
pub fn get_mem_object_info(obj: &Mem, request: MemInfo) -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_mem_object_info_raw(obj, request)?)
}

/// Returns the unparsed bytes of an image info query.
pub fn get_image_info_raw(obj: &Mem, request: ImageInfo) -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetImageInfo);
    info_bytes("clGetImageInfo", |size, value, size_ret| unsafe {
        get_info(obj.as_ptr(), request as ffi::cl_image_info, size, value, size_ret)
    })
}

/// Get image info.
pub fn get_image_info(obj: &Mem, request: ImageInfo) -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_image_info_raw(obj, request)?)
}

/// Registers a closure to be called when `mem` is destroyed. Closures
/// registered on the same object are called in reverse order of
/// registration.
pub fn set_mem_object_destructor_callback<C>(mem: &Mem, callback: C) -> ClResult<()>
        where C: MemDestructorCallback
{
    let set_callback = cl_fn!(clSetMemObjectDestructorCallback);
    let user_data = callbacks::mem_destructor_user_data(callback);

    let errcode = unsafe {
        set_callback(mem.as_ptr(),
            Some(callbacks::mem_destructor_trampoline as ffi::cl_mem_destructor_fn), user_data)
    };

    if errcode != Status::CL_SUCCESS as i32 {
        unsafe { callbacks::drop_mem_destructor(user_data) };
    }
    eval_errcode(errcode, (), "clSetMemObjectDestructorCallback", None::<String>)
}

//============================================================================
//============================= Sampler APIs =================================
//============================================================================

/// Creates and returns a new sampler object.
pub fn create_sampler(context: &Context, normalize_coords: bool, addressing_mode: AddressingMode,
        filter_mode: FilterMode) -> ClResult<Sampler>
{
    let create = cl_fn!(clCreateSampler);
    let mut errcode = 0;

    let sampler = unsafe {
        create(
            context.as_ptr(),
            normalize_coords as ffi::cl_bool,
            addressing_mode as ffi::cl_addressing_mode,
            filter_mode as ffi::cl_filter_mode,
            &mut errcode,
        )
    };

    eval_create_ptr(errcode, sampler, "clCreateSampler")
        .map(|ptr| unsafe { Sampler::from_raw_create_ptr(ptr) })
}

/// Increments a sampler reference counter.
pub unsafe fn retain_sampler(sampler: &Sampler) -> ClResult<()> {
    let retain = cl_fn!(clRetainSampler);
    eval_errcode(retain(sampler.as_ptr()), (), "clRetainSampler", None::<String>)
}

/// Decrements a sampler reference counter.
pub unsafe fn release_sampler(sampler: &Sampler) -> ClResult<()> {
    let release = cl_fn!(clReleaseSampler);
    eval_errcode(release(sampler.as_ptr()), (), "clReleaseSampler", None::<String>)
}

/// Returns the unparsed bytes of a sampler info query.
pub fn get_sampler_info_raw(sampler: &Sampler, request: SamplerInfo) -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetSamplerInfo);
    info_bytes("clGetSamplerInfo", |size, value, size_ret| unsafe {
        get_info(sampler.as_ptr(), request as ffi::cl_sampler_info, size, value, size_ret)
    })
}

/// Returns information about the sampler object.
pub fn get_sampler_info(sampler: &Sampler, request: SamplerInfo) -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_sampler_info_raw(sampler, request)?)
}

//============================================================================
//========================== Program Object APIs =============================
//============================================================================

/// Creates a new program.
pub fn create_program_with_source(context: &Context, src_strings: &[CString])
        -> ClResult<Program>
{
    let create = cl_fn!(clCreateProgramWithSource);

    // Lengths (not including \0 terminator) of each string:
    let ks_lens: Vec<usize> = src_strings.iter().map(|cs| cs.as_bytes().len()).collect();

    // Pointers to each string:
    let kern_string_ptrs: Vec<*const _> = src_strings.iter().map(|cs| cs.as_ptr()).collect();

    let mut errcode: cl_int = 0;

    let program_ptr = unsafe { create(
        context.as_ptr(),
        kern_string_ptrs.len() as cl_uint,
        kern_string_ptrs.as_ptr(),
        ks_lens.as_ptr(),
        &mut errcode,
    ) };

    eval_create_ptr(errcode, program_ptr, "clCreateProgramWithSource")
        .map(|ptr| unsafe { Program::from_raw_create_ptr(ptr) })
}

/// Creates a program object for a context, and loads the binary bits
/// specified by binary into the program object.
///
/// [SDK Docs]: https://www.khronos.org/registry/cl/sdk/1.2/docs/man/xhtml/clCreateProgramWithBinary.html
///
pub fn create_program_with_binary(context: &Context, devices: &[DeviceId], binaries: &[&[u8]])
        -> ClResult<Program>
{
    let create = cl_fn!(clCreateProgramWithBinary);

    if devices.is_empty() {
        return Err(ApiWrapperError::CreateProgramWithBinaryDevicesLenZero.into())
    }

    if devices.len() != binaries.len() {
        return Err(ApiWrapperError::CreateProgramWithBinaryDevicesLenMismatch.into())
    }

    let lengths: Vec<usize> = binaries.iter().map(|bin| bin.len()).collect();
    let binary_ptrs: Vec<*const u8> = binaries.iter().map(|bin| bin.as_ptr()).collect();
    let mut binary_status: Vec<i32> = vec![0; devices.len()];
    let mut errcode: cl_int = 0;

    let program = unsafe { create(
        context.as_ptr(),
        devices.len() as cl_uint,
        devices.as_ptr() as *const cl_device_id,
        lengths.as_ptr(),
        binary_ptrs.as_ptr(),
        binary_status.as_mut_ptr(),
        &mut errcode,
    ) };

    if errcode != Status::CL_SUCCESS as i32 {
        let failed: Vec<(usize, i32)> = binary_status.iter().cloned().enumerate()
            .filter(|&(_, s)| s != Status::CL_SUCCESS as i32)
            .collect();
        return Err(ApiError::new(errcode, "clCreateProgramWithBinary",
            Some(format!("binary status (index, code): {:?}", failed))).into());
    }

    eval_create_ptr(errcode, program, "clCreateProgramWithBinary")
        .map(|ptr| unsafe { Program::from_raw_create_ptr(ptr) })
}

/// Creates a program object for a context from the device built-in kernels
/// named in the `;` separated `kernel_names`.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn create_program_with_built_in_kernels(context: &Context, devices: &[DeviceId],
        kernel_names: &CString) -> ClResult<Program>
{
    let create = cl_fn!(clCreateProgramWithBuiltInKernels);
    let (num_devices, device_ptr) = device_ptrs(devices);
    let mut errcode: cl_int = 0;

    let program_ptr = unsafe {
        create(context.as_ptr(), num_devices, device_ptr, kernel_names.as_ptr(), &mut errcode)
    };

    eval_create_ptr(errcode, program_ptr, "clCreateProgramWithBuiltInKernels")
        .map(|ptr| unsafe { Program::from_raw_create_ptr(ptr) })
}

/// Increments a program reference counter.
pub unsafe fn retain_program(program: &Program) -> ClResult<()> {
    let retain = cl_fn!(clRetainProgram);
    eval_errcode(retain(program.as_ptr()), (), "clRetainProgram", None::<String>)
}

/// Decrements a program reference counter.
pub unsafe fn release_program(program: &Program) -> ClResult<()> {
    let release = cl_fn!(clReleaseProgram);
    eval_errcode(release(program.as_ptr()), (), "clReleaseProgram", None::<String>)
}

/// Returns the build logs of `program` for `device_ids` joined together.
/// Empty logs are skipped.
pub fn program_build_log(program: &Program, device_ids: &[DeviceId]) -> ClResult<String> {
    let mut logs = Vec::with_capacity(device_ids.len());

    for device_id in device_ids.iter() {
        let log = get_program_build_info(program, device_id, ProgramBuildInfo::BuildLog)?
            .into_string()?;
        if !log.is_empty() {
            logs.push(log);
        }
    }

    Ok(logs.join("\n"))
}

/// Failures after which the driver still calls the build callback.
fn is_build_failure(code: cl_int) -> bool {
    code == Status::CL_BUILD_PROGRAM_FAILURE as i32
        || code == Status::CL_COMPILE_PROGRAM_FAILURE as i32
        || code == Status::CL_LINK_PROGRAM_FAILURE as i32
}

/// Drops the build callback behind `user_data` if the call failed without
/// reaching the build, so the driver never calls it.
fn reclaim_build_callback(errcode: cl_int, user_data: *mut c_void) {
    if !user_data.is_null() && errcode != Status::CL_SUCCESS as i32
        && !is_build_failure(errcode)
    {
        unsafe { callbacks::drop_build_callback(user_data) };
    }
}

/// Converts a build, compile, or link failure into a `ProgramBuildError` carrying
/// the build log of each device.
fn program_build_err(err: ClError, program: &Program, device_ids: Option<&[DeviceId]>)
        -> ClError
{
    let code = match err.api_code() {
        Some(code) if is_build_failure(code) => code,
        _ => return err,
    };
    let fn_name = match err {
        ClError::Api(ref api_err) => api_err.fn_name(),
        _ => "clBuildProgram",
    };

    let device_ids = match device_ids {
        Some(ids) if !ids.is_empty() => ids.to_vec(),
        _ => match get_program_info(program, ProgramInfo::Devices) {
            Ok(InfoResult::Devices(ids)) => ids,
            Ok(_) => return err,
            Err(info_err) => return ProgramBuildError::InfoResult(Box::new(info_err)).into(),
        },
    };

    if device_ids.is_empty() {
        return ProgramBuildError::DeviceListEmpty.into();
    }

    match program_build_log(program, &device_ids) {
        Ok(log) => ProgramBuildError::BuildLog { code, fn_name, log }.into(),
        Err(info_err) => ProgramBuildError::InfoResult(Box::new(info_err)).into(),
    }
}

/// Builds a program.
///
/// A build failure (`CL_BUILD_PROGRAM_FAILURE`) is returned as a
/// `ProgramBuildError::BuildLog` containing the build log.
///
/// If `callback` is given the driver may return before the build finishes.
/// The callback is dropped without being called only if the driver never
/// calls it.
pub fn build_program(program: &Program, device_ids: Option<&[DeviceId]>, options: &CString,
        callback: Option<Box<dyn BuildCallback>>) -> ClResult<()>
{
    let build = cl_fn!(clBuildProgram);

    if let Some(ids) = device_ids {
        if ids.is_empty() {
            return Err(ProgramBuildError::DeviceListEmpty.into());
        }
    }

    let (num_devices, device_ptr) = device_ptrs(device_ids.unwrap_or(&[]));
    let (pfn_notify, user_data) = match callback {
        Some(cb) => (Some(callbacks::build_callback_trampoline as ffi::cl_program_notify_fn),
            callbacks::build_callback_user_data(cb)),
        None => (None, ptr::null_mut()),
    };

    let errcode = unsafe {
        build(program.as_ptr(), num_devices, device_ptr, options.as_ptr(), pfn_notify,
            user_data)
    };

    reclaim_build_callback(errcode, user_data);
    eval_errcode(errcode, (), "clBuildProgram", None::<String>)
        .map_err(|err| program_build_err(err, program, device_ids))
}

/// Compiles a program's source for all the devices or a specific device(s)
/// in the OpenCL context associated with program.
///
/// `input_headers` and `header_include_names` are parallel: each header
/// program is made available to `#include` under the matching name.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn compile_program(program: &Program, device_ids: Option<&[DeviceId]>, options: &CString,
        input_headers: &[&Program], header_include_names: &[CString],
        callback: Option<Box<dyn BuildCallback>>) -> ClResult<()>
{
    let compile = cl_fn!(clCompileProgram);

    if input_headers.len() != header_include_names.len() {
        return Err(ApiWrapperError::CompileProgramHeaderNamesLenMismatch {
            headers: input_headers.len(),
            names: header_include_names.len(),
        }.into());
    }

    let (num_devices, device_ptr) = device_ptrs(device_ids.unwrap_or(&[]));
    let input_hdr_ptrs: Vec<cl_program> = input_headers.iter().map(|h| h.as_ptr()).collect();
    let hdr_name_ptrs: Vec<*const _> = header_include_names.iter().map(|n| n.as_ptr()).collect();

    let (input_hdrs_ptr, hdr_names_ptr) = if input_hdr_ptrs.is_empty() {
        (ptr::null(), ptr::null())
    } else {
        (input_hdr_ptrs.as_ptr(), hdr_name_ptrs.as_ptr())
    };

    let (pfn_notify, user_data) = match callback {
        Some(cb) => (Some(callbacks::build_callback_trampoline as ffi::cl_program_notify_fn),
            callbacks::build_callback_user_data(cb)),
        None => (None, ptr::null_mut()),
    };

    let errcode = unsafe {
        compile(
            program.as_ptr(),
            num_devices,
            device_ptr,
            options.as_ptr(),
            input_hdr_ptrs.len() as cl_uint,
            input_hdrs_ptr,
            hdr_names_ptr,
            pfn_notify,
            user_data,
        )
    };

    reclaim_build_callback(errcode, user_data);
    eval_errcode(errcode, (), "clCompileProgram", None::<String>)
        .map_err(|err| program_build_err(err, program, device_ids))
}

/// Links a set of compiled program objects and libraries for all the devices
/// or a specific device(s) in the OpenCL context and creates an executable.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn link_program(context: &Context, device_ids: Option<&[DeviceId]>, options: &CString,
        input_programs: &[&Program], callback: Option<Box<dyn BuildCallback>>)
        -> ClResult<Program>
{
    let link = cl_fn!(clLinkProgram);

    let (num_devices, device_ptr) = device_ptrs(device_ids.unwrap_or(&[]));
    let input_ptrs: Vec<cl_program> = input_programs.iter().map(|p| p.as_ptr()).collect();

    let (pfn_notify, user_data) = match callback {
        Some(cb) => (Some(callbacks::build_callback_trampoline as ffi::cl_program_notify_fn),
            callbacks::build_callback_user_data(cb)),
        None => (None, ptr::null_mut()),
    };

    let mut errcode: cl_int = 0;
    let program_ptr = unsafe {
        link(
            context.as_ptr(),
            num_devices,
            device_ptr,
            options.as_ptr(),
            input_ptrs.len() as cl_uint,
            input_ptrs.as_ptr(),
            pfn_notify,
            user_data,
            &mut errcode,
        )
    };

    reclaim_build_callback(errcode, user_data);

    // A failed link may still return a program holding the link log:
    if errcode == Status::CL_LINK_PROGRAM_FAILURE as i32 && !program_ptr.is_null() {
        let program = unsafe { Program::from_raw_create_ptr(program_ptr) };
        let err = eval_errcode(errcode, (), "clLinkProgram", None::<String>)
            .map_err(|err| program_build_err(err, &program, device_ids));
        return err.map(|_| program);
    }

    eval_create_ptr(errcode, program_ptr, "clLinkProgram")
        .map(|ptr| unsafe { Program::from_raw_create_ptr(ptr) })
}

/// Allows the implementation to release the resources allocated by the
/// OpenCL compiler for `platform`.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn unload_platform_compiler(platform: &PlatformId) -> ClResult<()> {
    let unload = cl_fn!(clUnloadPlatformCompiler);
    let errcode = unsafe { unload(platform.as_ptr()) };
    eval_errcode(errcode, (), "clUnloadPlatformCompiler", None::<String>)
}

/// Returns the unparsed bytes of a program info query.
pub fn get_program_info_raw(program: &Program, request: ProgramInfo) -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetProgramInfo);
    info_bytes("clGetProgramInfo", |size, value, size_ret| unsafe {
        get_info(program.as_ptr(), request as ffi::cl_program_info, size, value, size_ret)
    })
}

/// Returns the binary of `program` for each of its devices.
pub fn get_program_binaries(program: &Program) -> ClResult<Vec<Vec<u8>>> {
    let get_info = cl_fn!(clGetProgramInfo);

    let sizes = match get_program_info(program, ProgramInfo::BinarySizes)? {
        InfoResult::Sizes(sizes) => sizes,
        other => return Err(format!("get_program_binaries: unexpected binary sizes result: \
            {:?}", other).into()),
    };

    let mut binaries: Vec<Vec<u8>> = sizes.iter().map(|&size| vec![0u8; size]).collect();
    let mut binary_ptrs: Vec<*mut u8> = binaries.iter_mut().map(|b| b.as_mut_ptr()).collect();

    let errcode = unsafe {
        get_info(
            program.as_ptr(),
            ffi::CL_PROGRAM_BINARIES,
            binary_ptrs.len() * mem::size_of::<*mut u8>(),
            binary_ptrs.as_mut_ptr() as *mut c_void,
            ptr::null_mut(),
        )
    };

    eval_errcode(errcode, binaries, "clGetProgramInfo", Some("CL_PROGRAM_BINARIES"))
}

/// Get program info.
pub fn get_program_info(program: &Program, request: ProgramInfo) -> ClResult<InfoResult> {
    match request {
        ProgramInfo::Binaries => get_program_binaries(program).map(InfoResult::Binaries),
        _ => InfoResult::from_bytes(request.kind(), get_program_info_raw(program, request)?),
    }
}

/// Returns the unparsed bytes of a program build info query.
pub fn get_program_build_info_raw(program: &Program, device: &DeviceId,
        request: ProgramBuildInfo) -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetProgramBuildInfo);
    info_bytes("clGetProgramBuildInfo", |size, value, size_ret| unsafe {
        get_info(program.as_ptr(), device.as_ptr(), request as ffi::cl_program_build_info,
            size, value, size_ret)
    })
}

/// Get program build info.
pub fn get_program_build_info(program: &Program, device: &DeviceId, request: ProgramBuildInfo)
        -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_program_build_info_raw(program, device, request)?)
}

//============================================================================
//=========================== Kernel Object APIs =============================
//============================================================================

/// A kernel argument.
#[derive(Debug, Clone, Copy)]
pub enum KernelArg<'a> {
    /// A memory object (buffer or image).
    Mem(&'a Mem),
    /// A null memory object.
    MemNull,
    /// A sampler.
    Sampler(&'a Sampler),
    /// A null sampler.
    SamplerNull,
    /// The bytes of a scalar or vector value.
    Scalar(&'a [u8]),
    /// A `__local` buffer of the given size in bytes.
    Local(usize),
    /// Raw size and pointer.
    UnsafePointer { size: usize, value: *const c_void },
}

impl<'a> KernelArg<'a> {
    /// Returns a scalar argument holding the bytes of `val`.
    pub fn scalar<T: OclPrm>(val: &'a T) -> KernelArg<'a> {
        KernelArg::Scalar(crate::util::as_bytes(val))
    }

    /// Returns a vector argument holding the bytes of `vals`.
    pub fn vector<T: OclPrm>(vals: &'a [T]) -> KernelArg<'a> {
        KernelArg::Scalar(crate::util::slice_as_bytes(vals))
    }
}

/// Returns a new kernel.
pub fn create_kernel<S: AsRef<str>>(program: &Program, name: S) -> ClResult<Kernel> {
    let create = cl_fn!(clCreateKernel);
    let mut errcode: cl_int = 0;
    let name_c = CString::new(name.as_ref().as_bytes())?;

    let kernel_ptr = unsafe { create(program.as_ptr(), name_c.as_ptr(), &mut errcode) };

    eval_errcode(errcode, (), "clCreateKernel", Some(name.as_ref()))?;
    eval_create_ptr(errcode, kernel_ptr, "clCreateKernel")
        .map(|ptr| unsafe { Kernel::from_raw_create_ptr(ptr) })
}

/// Creates a kernel object for every kernel function in `program`.
pub fn create_kernels_in_program(program: &Program) -> ClResult<Vec<Kernel>> {
    let create = cl_fn!(clCreateKernelsInProgram);
    let mut num_kernels: cl_uint = 0;

    let errcode = unsafe { create(program.as_ptr(), 0, ptr::null_mut(), &mut num_kernels) };
    eval_errcode(errcode, (), "clCreateKernelsInProgram", None::<String>)?;

    let mut kernel_ptrs: Vec<ffi::cl_kernel> = vec![ptr::null_mut(); num_kernels as usize];
    let errcode = unsafe {
        create(program.as_ptr(), num_kernels, kernel_ptrs.as_mut_ptr(), ptr::null_mut())
    };
    eval_errcode(errcode, (), "clCreateKernelsInProgram", None::<String>)?;

    Ok(kernel_ptrs.into_iter()
        .map(|ptr| unsafe { Kernel::from_raw_create_ptr(ptr) })
        .collect())
}

/// Increments a kernel reference counter.
pub unsafe fn retain_kernel(kernel: &Kernel) -> ClResult<()> {
    let retain = cl_fn!(clRetainKernel);
    eval_errcode(retain(kernel.as_ptr()), (), "clRetainKernel", None::<String>)
}

/// Decrements a kernel reference counter.
pub unsafe fn release_kernel(kernel: &Kernel) -> ClResult<()> {
    let release = cl_fn!(clReleaseKernel);
    eval_errcode(release(kernel.as_ptr()), (), "clReleaseKernel", None::<String>)
}

/// Sets the argument value for the kernel argument at index `arg_index`.
///
/// Not thread-safe for the same kernel.
pub fn set_kernel_arg(kernel: &Kernel, arg_index: u32, arg: KernelArg) -> ClResult<()> {
    let set_arg = cl_fn!(clSetKernelArg);

    let mem_ptr;
    let sampler_ptr;

    let (arg_size, arg_value): (size_t, *const c_void) = match arg {
        KernelArg::Mem(mem_obj) => {
            mem_ptr = mem_obj.as_ptr();
            (mem::size_of::<cl_mem>(), &mem_ptr as *const cl_mem as *const c_void)
        },
        KernelArg::MemNull => (mem::size_of::<cl_mem>(), ptr::null()),
        KernelArg::Sampler(smplr) => {
            sampler_ptr = smplr.as_ptr();
            (mem::size_of::<ffi::cl_sampler>(),
                &sampler_ptr as *const ffi::cl_sampler as *const c_void)
        },
        KernelArg::SamplerNull => (mem::size_of::<ffi::cl_sampler>(), ptr::null()),
        KernelArg::Scalar(bytes) => (bytes.len(), bytes.as_ptr() as *const c_void),
        KernelArg::Local(size) => (size, ptr::null()),
        KernelArg::UnsafePointer { size, value } => (size, value),
    };

    let errcode = unsafe { set_arg(kernel.as_ptr(), arg_index, arg_size, arg_value) };

    if errcode != Status::CL_SUCCESS as i32 {
        let name = get_kernel_name(kernel).unwrap_or_default();
        return eval_errcode(errcode, (), "clSetKernelArg",
            Some(format!("kernel: '{}', argument index: {}", name, arg_index)));
    }
    Ok(())
}

/// Returns the unparsed bytes of a kernel info query.
pub fn get_kernel_info_raw(kernel: &Kernel, request: KernelInfo) -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetKernelInfo);
    info_bytes("clGetKernelInfo", |size, value, size_ret| unsafe {
        get_info(kernel.as_ptr(), request as ffi::cl_kernel_info, size, value, size_ret)
    })
}

/// Get kernel info.
pub fn get_kernel_info(kernel: &Kernel, request: KernelInfo) -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_kernel_info_raw(kernel, request)?)
}

/// Returns the unparsed bytes of a kernel argument info query.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn get_kernel_arg_info_raw(kernel: &Kernel, arg_index: u32, request: KernelArgInfo)
        -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetKernelArgInfo);
    info_bytes("clGetKernelArgInfo", |size, value, size_ret| unsafe {
        get_info(kernel.as_ptr(), arg_index, request as ffi::cl_kernel_arg_info, size, value,
            size_ret)
    })
}

/// Get kernel arg info.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn get_kernel_arg_info(kernel: &Kernel, arg_index: u32, request: KernelArgInfo)
        -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_kernel_arg_info_raw(kernel, arg_index, request)?)
}

/// Returns the unparsed bytes of a kernel work group info query.
pub fn get_kernel_work_group_info_raw(kernel: &Kernel, device: &DeviceId,
        request: KernelWorkGroupInfo) -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetKernelWorkGroupInfo);
    info_bytes("clGetKernelWorkGroupInfo", |size, value, size_ret| unsafe {
        get_info(kernel.as_ptr(), device.as_ptr(), request as ffi::cl_kernel_work_group_info,
            size, value, size_ret)
    })
}

/// Get kernel work group info.
pub fn get_kernel_work_group_info(kernel: &Kernel, device: &DeviceId,
        request: KernelWorkGroupInfo) -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(),
        get_kernel_work_group_info_raw(kernel, device, request)?)
}

//============================================================================
//=========================== Event Object APIs ==============================
//============================================================================

/// Blocks until the first `num_events` events in `event_list` are complete.
pub fn wait_for_events<Ewl: ClWaitListPtr>(wait_list: Ewl) -> ClResult<()> {
    let wait = cl_fn!(clWaitForEvents);

    if wait_list.count() == 0 {
        return Ok(());
    }

    let errcode = unsafe { wait(wait_list.count(), wait_list.as_ptr_ptr()) };
    eval_errcode(errcode, (), "clWaitForEvents", None::<String>)
}

/// Returns the unparsed bytes of an event info query.
pub fn get_event_info_raw(event: &Event, request: EventInfo) -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetEventInfo);
    info_bytes("clGetEventInfo", |size, value, size_ret| unsafe {
        get_info(event.as_ptr(), request as ffi::cl_event_info, size, value, size_ret)
    })
}

/// Get event info.
pub fn get_event_info(event: &Event, request: EventInfo) -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_event_info_raw(event, request)?)
}

/// Creates an event not already associated with any command.
pub fn create_user_event(context: &Context) -> ClResult<Event> {
    let create = cl_fn!(clCreateUserEvent);
    let mut errcode = 0;
    let event = unsafe { create(context.as_ptr(), &mut errcode) };
    eval_create_ptr(errcode, event, "clCreateUserEvent")
        .map(|ptr| unsafe { Event::from_raw_create_ptr(ptr) })
}

/// Increments an event's reference counter.
pub unsafe fn retain_event(event: &Event) -> ClResult<()> {
    let retain = cl_fn!(clRetainEvent);
    eval_errcode(retain(event.as_ptr()), (), "clRetainEvent", None::<String>)
}

/// Decrements an event's reference counter.
pub unsafe fn release_event(event: &Event) -> ClResult<()> {
    let release = cl_fn!(clReleaseEvent);
    eval_errcode(release(event.as_ptr()), (), "clReleaseEvent", None::<String>)
}

/// Updates a user events status.
///
/// Setting status to `CommandExecutionStatus::Complete` will cause commands
/// waiting upon this event to execute. A user event's status can only be set
/// once.
pub fn set_user_event_status(event: &Event, execution_status: CommandExecutionStatus)
        -> ClResult<()> {
    let set_status = cl_fn!(clSetUserEventStatus);
    let errcode = unsafe { set_status(event.as_ptr(), execution_status as cl_int) };
    eval_errcode(errcode, (), "clSetUserEventStatus", None::<String>)
}

/// Terminates a user event with a negative error status. Commands waiting
/// upon it will not execute.
pub fn set_user_event_error(event: &Event, error_status: i32) -> ClResult<()> {
    let set_status = cl_fn!(clSetUserEventStatus);

    if error_status >= 0 {
        return Err(ApiWrapperError::UserEventErrorNotNegative(error_status).into());
    }

    let errcode = unsafe { set_status(event.as_ptr(), error_status) };
    eval_errcode(errcode, (), "clSetUserEventStatus", None::<String>)
}

/// Registers a closure to be called once `event` is complete or terminates
/// with an error. The closure receives the final execution status.
pub fn set_event_callback<C>(event: &Event, callback: C) -> ClResult<()>
        where C: EventCallback
{
    let user_data = callbacks::event_callback_user_data(callback);

    let result = unsafe {
        set_event_callback_raw(event, CommandExecutionStatus::Complete,
            Some(callbacks::event_callback_trampoline as cl_event_notify_fn), user_data)
    };

    if result.is_err() {
        unsafe { callbacks::drop_event_callback(user_data) };
    }
    result
}

/// Sets a raw callback function for a specific command execution status.
///
/// ## Safety
///
/// `user_data` must be valid for `callback_receiver` whenever the driver
/// calls it, on any thread.
pub unsafe fn set_event_callback_raw(event: &Event, callback_trigger: CommandExecutionStatus,
        callback_receiver: Option<cl_event_notify_fn>, user_data: *mut c_void) -> ClResult<()>
{
    let set_callback = cl_fn!(clSetEventCallback);
    let errcode = set_callback(event.as_ptr(), callback_trigger as cl_int, callback_receiver,
        user_data);
    eval_errcode(errcode, (), "clSetEventCallback", None::<String>)
}

//============================================================================
//============================ Profiling APIs ================================
//============================================================================

/// Returns the unparsed bytes of an event profiling info query.
pub fn get_event_profiling_info_raw(event: &Event, request: ProfilingInfo)
        -> ClResult<Vec<u8>> {
    let get_info = cl_fn!(clGetEventProfilingInfo);
    info_bytes("clGetEventProfilingInfo", |size, value, size_ret| unsafe {
        get_info(event.as_ptr(), request as ffi::cl_profiling_info, size, value, size_ret)
    })
}

/// Get event profiling info (for debugging / benchmarking).
pub fn get_event_profiling_info(event: &Event, request: ProfilingInfo) -> ClResult<InfoResult> {
    InfoResult::from_bytes(request.kind(), get_event_profiling_info_raw(event, request)?)
}

//============================================================================
//========================= Flush and Finish APIs ============================
//============================================================================

/// Issues all previously queued OpenCL commands in a command-queue to the
/// device associated with the command-queue.
pub fn flush(command_queue: &CommandQueue) -> ClResult<()> {
    let flush = cl_fn!(clFlush);
    let errcode = unsafe { flush(command_queue.as_ptr()) };
    eval_errcode(errcode, (), "clFlush", None::<String>)
}

/// Blocks until all previously queued OpenCL commands in a command-queue are
/// issued to the associated device and have completed.
pub fn finish(command_queue: &CommandQueue) -> ClResult<()> {
    let finish = cl_fn!(clFinish);
    let errcode = unsafe { finish(command_queue.as_ptr()) };
    eval_errcode(errcode, (), "clFinish", None::<String>)
}

//============================================================================
//======================= Enqueued Commands APIs =============================
//============================================================================

/// Enqueues a read from device memory referred to by `buffer` to device memory,
/// `data`. `offset` and the length of `data` are in elements of `T`.
///
/// ## Safety
///
/// Caller must ensure that `data` lives until the read is complete. Use
/// `new_event` to monitor it.
///
/// ## Official Documentation
///
/// [SDK - clEnqueueReadBuffer](https://www.khronos.org/registry/cl/sdk/1.2/docs/man/xhtml/clEnqueueReadBuffer.html)
///
pub unsafe fn enqueue_read_buffer<T, En, Ewl>(
        command_queue: &CommandQueue,
        buffer: &Mem,
        block: bool,
        offset: usize,
        data: &mut [T],
        wait_list: Option<Ewl>,
        new_event: Option<En>,
        ) -> ClResult<()>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let read = cl_fn!(clEnqueueReadBuffer);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let offset_bytes = offset * mem::size_of::<T>();

    let errcode = read(
        command_queue.as_ptr(),
        buffer.as_ptr(),
        block as cl_uint,
        offset_bytes,
        mem::size_of_val(data),
        data.as_mut_ptr() as *mut c_void,
        wait_list_len,
        wait_list_ptr,
        new_event_ptr,
    );

    eval_errcode(errcode, (), "clEnqueueReadBuffer", None::<String>)
}

/// Enqueues a command to read from a rectangular region from a buffer object to host memory.
///
/// The x components of the origins and of `region` are in elements of `T`.
/// Pitches are in bytes.
///
/// ## Safety
///
/// Caller must ensure that `data` lives until the read is complete. Use
/// `new_event` to monitor it.
///
/// ## Official Documentation
///
/// [SDK - clEnqueueReadBufferRect](https://www.khronos.org/registry/cl/sdk/1.2/docs/man/xhtml/clEnqueueReadBufferRect.html)
///
pub unsafe fn enqueue_read_buffer_rect<T, En, Ewl>(
            command_queue: &CommandQueue,
            buffer: &Mem,
            block: bool,
            buffer_origin: [usize; 3],
            host_origin: [usize; 3],
            region: [usize; 3],
            buffer_row_pitch_bytes: usize,
            buffer_slc_pitch_bytes: usize,
            host_row_pitch_bytes: usize,
            host_slc_pitch_bytes: usize,
            data: &mut [T],
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let read = cl_fn!(clEnqueueReadBufferRect);
    let buffer_origin_bytes = [buffer_origin[0] * mem::size_of::<T>(),
        buffer_origin[1], buffer_origin[2]];
    let host_origin_bytes = [host_origin[0] * mem::size_of::<T>(),
        host_origin[1], host_origin[2]];
    let region_bytes = [region[0] * mem::size_of::<T>(), region[1], region[2]];

    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = read(
        command_queue.as_ptr(),
        buffer.as_ptr(),
        block as cl_uint,
        buffer_origin_bytes.as_ptr(),
        host_origin_bytes.as_ptr(),
        region_bytes.as_ptr(),
        buffer_row_pitch_bytes,
        buffer_slc_pitch_bytes,
        host_row_pitch_bytes,
        host_slc_pitch_bytes,
        data.as_mut_ptr() as *mut c_void,
        wait_list_len,
        wait_list_ptr,
        new_event_ptr,
    );

    eval_errcode(errcode, (), "clEnqueueReadBufferRect", None::<String>)
}

/// Enqueues a write from host memory, `data`, to device memory referred to by
/// `buffer`. `offset` is in elements of `T`.
///
/// ## Safety
///
/// Caller must ensure that `data` lives until the write is complete.
pub unsafe fn enqueue_write_buffer<T, En, Ewl>(
            command_queue: &CommandQueue,
            buffer: &Mem,
            block: bool,
            offset: usize,
            data: &[T],
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let write = cl_fn!(clEnqueueWriteBuffer);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let offset_bytes = offset * mem::size_of::<T>();

    let errcode = write(
        command_queue.as_ptr(),
        buffer.as_ptr(),
        block as cl_uint,
        offset_bytes,
        mem::size_of_val(data),
        data.as_ptr() as *const c_void,
        wait_list_len,
        wait_list_ptr,
        new_event_ptr,
    );
    eval_errcode(errcode, (), "clEnqueueWriteBuffer", None::<String>)
}

/// Enqueues a command to write from a rectangular region from host memory to
/// a buffer object.
///
/// The x components of the origins and of `region` are in elements of `T`.
/// Pitches are in bytes.
///
/// ## Safety
///
/// Caller must ensure that `data` lives until the write is complete.
pub unsafe fn enqueue_write_buffer_rect<T, En, Ewl>(
            command_queue: &CommandQueue,
            buffer: &Mem,
            block: bool,
            buffer_origin: [usize; 3],
            host_origin: [usize; 3],
            region: [usize; 3],
            buffer_row_pitch_bytes: usize,
            buffer_slc_pitch_bytes: usize,
            host_row_pitch_bytes: usize,
            host_slc_pitch_bytes: usize,
            data: &[T],
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let write = cl_fn!(clEnqueueWriteBufferRect);
    let buffer_origin_bytes = [buffer_origin[0] * mem::size_of::<T>(),
        buffer_origin[1], buffer_origin[2]];
    let host_origin_bytes = [host_origin[0] * mem::size_of::<T>(),
        host_origin[1], host_origin[2]];
    let region_bytes = [region[0] * mem::size_of::<T>(), region[1], region[2]];

    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = write(
        command_queue.as_ptr(),
        buffer.as_ptr(),
        block as cl_uint,
        buffer_origin_bytes.as_ptr(),
        host_origin_bytes.as_ptr(),
        region_bytes.as_ptr(),
        buffer_row_pitch_bytes,
        buffer_slc_pitch_bytes,
        host_row_pitch_bytes,
        host_slc_pitch_bytes,
        data.as_ptr() as *const c_void,
        wait_list_len,
        wait_list_ptr,
        new_event_ptr,
    );
    eval_errcode(errcode, (), "clEnqueueWriteBufferRect", None::<String>)
}

/// Enqueues a command to fill a buffer object with `pattern`, repeated.
/// `offset` and `len` are in elements of `T` and must be multiples of
/// `pattern.len()`.
///
/// The pattern must be a power of two no larger than 128 bytes.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn enqueue_fill_buffer<T, En, Ewl>(
            command_queue: &CommandQueue,
            buffer: &Mem,
            pattern: &[T],
            offset: usize,
            len: usize,
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let fill = cl_fn!(clEnqueueFillBuffer);
    let elem_size = mem::size_of::<T>();
    let pattern_size = pattern.len() * elem_size;
    let (offset_bytes, size_bytes) = match (offset.checked_mul(elem_size),
            len.checked_mul(elem_size)) {
        (Some(offset_bytes), Some(size_bytes)) => (offset_bytes, size_bytes),
        _ => return Err(ApiWrapperError::FillBufferRangeOverflow { offset, len }.into()),
    };

    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = unsafe {
        fill(
            command_queue.as_ptr(),
            buffer.as_ptr(),
            pattern.as_ptr() as *const c_void,
            pattern_size,
            offset_bytes,
            size_bytes,
            wait_list_len,
            wait_list_ptr,
            new_event_ptr,
        )
    };
    eval_errcode(errcode, (), "clEnqueueFillBuffer", None::<String>)
}

/// Copies the contents of one buffer to another. Offsets and `len` are in
/// elements of `T`.
pub fn enqueue_copy_buffer<T, En, Ewl>(
            command_queue: &CommandQueue,
            src_buffer: &Mem,
            dst_buffer: &Mem,
            src_offset: usize,
            dst_offset: usize,
            len: usize,
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let copy = cl_fn!(clEnqueueCopyBuffer);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let src_offset_bytes = src_offset * mem::size_of::<T>();
    let dst_offset_bytes = dst_offset * mem::size_of::<T>();
    let len_bytes = len * mem::size_of::<T>();

    let errcode = unsafe {
        copy(
            command_queue.as_ptr(),
            src_buffer.as_ptr(),
            dst_buffer.as_ptr(),
            src_offset_bytes,
            dst_offset_bytes,
            len_bytes,
            wait_list_len,
            wait_list_ptr,
            new_event_ptr,
        )
    };
    eval_errcode(errcode, (), "clEnqueueCopyBuffer", None::<String>)
}

/// Enqueues a command to copy a rectangular region from a buffer object to
/// another buffer object.
///
/// The x components of the origins and of `region` are in elements of `T`.
/// Pitches are in bytes.
pub fn enqueue_copy_buffer_rect<T, En, Ewl>(
            command_queue: &CommandQueue,
            src_buffer: &Mem,
            dst_buffer: &Mem,
            src_origin: [usize; 3],
            dst_origin: [usize; 3],
            region: [usize; 3],
            src_row_pitch_bytes: usize,
            src_slc_pitch_bytes: usize,
            dst_row_pitch_bytes: usize,
            dst_slc_pitch_bytes: usize,
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let copy = cl_fn!(clEnqueueCopyBufferRect);
    let src_origin_bytes = [src_origin[0] * mem::size_of::<T>(), src_origin[1], src_origin[2]];
    let dst_origin_bytes = [dst_origin[0] * mem::size_of::<T>(), dst_origin[1], dst_origin[2]];
    let region_bytes = [region[0] * mem::size_of::<T>(), region[1], region[2]];

    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = unsafe {
        copy(
            command_queue.as_ptr(),
            src_buffer.as_ptr(),
            dst_buffer.as_ptr(),
            src_origin_bytes.as_ptr(),
            dst_origin_bytes.as_ptr(),
            region_bytes.as_ptr(),
            src_row_pitch_bytes,
            src_slc_pitch_bytes,
            dst_row_pitch_bytes,
            dst_slc_pitch_bytes,
            wait_list_len,
            wait_list_ptr,
            new_event_ptr,
        )
    };
    eval_errcode(errcode, (), "clEnqueueCopyBufferRect", None::<String>)
}

/// Enqueues a command to read from an image or image array object to host
/// memory. `origin` and `region` are in pixels, pitches in bytes.
///
/// ## Safety
///
/// Caller must ensure that `data` lives until the read is complete.
pub unsafe fn enqueue_read_image<T, En, Ewl>(
            command_queue: &CommandQueue,
            image: &Mem,
            block: bool,
            origin: [usize; 3],
            region: [usize; 3],
            row_pitch_bytes: usize,
            slc_pitch_bytes: usize,
            data: &mut [T],
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let read = cl_fn!(clEnqueueReadImage);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = read(
        command_queue.as_ptr(),
        image.as_ptr(),
        block as cl_uint,
        origin.as_ptr(),
        region.as_ptr(),
        row_pitch_bytes,
        slc_pitch_bytes,
        data.as_mut_ptr() as *mut c_void,
        wait_list_len,
        wait_list_ptr,
        new_event_ptr,
    );
    eval_errcode(errcode, (), "clEnqueueReadImage", None::<String>)
}

/// Enqueues a command to write to an image or image array object from host
/// memory. `origin` and `region` are in pixels, pitches in bytes.
///
/// ## Safety
///
/// Caller must ensure that `data` lives until the write is complete.
pub unsafe fn enqueue_write_image<T, En, Ewl>(
            command_queue: &CommandQueue,
            image: &Mem,
            block: bool,
            origin: [usize; 3],
            region: [usize; 3],
            input_row_pitch_bytes: usize,
            input_slc_pitch_bytes: usize,
            data: &[T],
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let write = cl_fn!(clEnqueueWriteImage);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = write(
        command_queue.as_ptr(),
        image.as_ptr(),
        block as cl_uint,
        origin.as_ptr(),
        region.as_ptr(),
        input_row_pitch_bytes,
        input_slc_pitch_bytes,
        data.as_ptr() as *const c_void,
        wait_list_len,
        wait_list_ptr,
        new_event_ptr,
    );
    eval_errcode(errcode, (), "clEnqueueWriteImage", None::<String>)
}

/// Enqueues a command to fill an image object with a specified color.
///
/// `color` must have four elements: a four component float, signed, or
/// unsigned integer color matching the image's channel data type.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn enqueue_fill_image<T, En, Ewl>(
            command_queue: &CommandQueue,
            image: &Mem,
            color: &[T],
            origin: [usize; 3],
            region: [usize; 3],
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let fill = cl_fn!(clEnqueueFillImage);

    if color.len() != 4 {
        return Err(ApiWrapperError::FillImageColorLen(color.len()).into());
    }
    if mem::size_of::<T>() != 4 {
        return Err(ApiWrapperError::FillImageColorElementSize(mem::size_of::<T>()).into());
    }

    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = unsafe {
        fill(
            command_queue.as_ptr(),
            image.as_ptr(),
            color.as_ptr() as *const c_void,
            origin.as_ptr(),
            region.as_ptr(),
            wait_list_len,
            wait_list_ptr,
            new_event_ptr,
        )
    };
    eval_errcode(errcode, (), "clEnqueueFillImage", None::<String>)
}

/// Enqueues a command to copy image objects.
pub fn enqueue_copy_image<En, Ewl>(
            command_queue: &CommandQueue,
            src_image: &Mem,
            dst_image: &Mem,
            src_origin: [usize; 3],
            dst_origin: [usize; 3],
            region: [usize; 3],
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let copy = cl_fn!(clEnqueueCopyImage);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = unsafe {
        copy(
            command_queue.as_ptr(),
            src_image.as_ptr(),
            dst_image.as_ptr(),
            src_origin.as_ptr(),
            dst_origin.as_ptr(),
            region.as_ptr(),
            wait_list_len,
            wait_list_ptr,
            new_event_ptr,
        )
    };
    eval_errcode(errcode, (), "clEnqueueCopyImage", None::<String>)
}

/// Enqueues a command to copy an image object to a buffer object.
/// `dst_offset` is in bytes.
pub fn enqueue_copy_image_to_buffer<En, Ewl>(
            command_queue: &CommandQueue,
            src_image: &Mem,
            dst_buffer: &Mem,
            src_origin: [usize; 3],
            region: [usize; 3],
            dst_offset: usize,
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let copy = cl_fn!(clEnqueueCopyImageToBuffer);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = unsafe {
        copy(
            command_queue.as_ptr(),
            src_image.as_ptr(),
            dst_buffer.as_ptr(),
            src_origin.as_ptr(),
            region.as_ptr(),
            dst_offset,
            wait_list_len,
            wait_list_ptr,
            new_event_ptr,
        )
    };
    eval_errcode(errcode, (), "clEnqueueCopyImageToBuffer", None::<String>)
}

/// Enqueues a command to copy a buffer object to an image object.
/// `src_offset` is in bytes.
pub fn enqueue_copy_buffer_to_image<En, Ewl>(
            command_queue: &CommandQueue,
            src_buffer: &Mem,
            dst_image: &Mem,
            src_offset: usize,
            dst_origin: [usize; 3],
            region: [usize; 3],
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let copy = cl_fn!(clEnqueueCopyBufferToImage);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = unsafe {
        copy(
            command_queue.as_ptr(),
            src_buffer.as_ptr(),
            dst_image.as_ptr(),
            src_offset,
            dst_origin.as_ptr(),
            region.as_ptr(),
            wait_list_len,
            wait_list_ptr,
            new_event_ptr,
        )
    };
    eval_errcode(errcode, (), "clEnqueueCopyBufferToImage", None::<String>)
}

/// Enqueues a command to map a region of the buffer object given by `buffer`
/// into the host address space and returns a pointer to this mapped region.
/// `offset` and `len` are in elements of `T`.
///
/// ## Safety
///
/// The returned pointer is only valid until the region is unmapped with
/// `enqueue_unmap_mem_object`, and for non-blocking maps only once the
/// map command has completed.
pub unsafe fn enqueue_map_buffer<T, En, Ewl>(
            command_queue: &CommandQueue,
            buffer: &Mem,
            block: bool,
            map_flags: MapFlags,
            offset: usize,
            len: usize,
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<*mut T>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let map = cl_fn!(clEnqueueMapBuffer);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let mut errcode = 0i32;

    let mapped_ptr = map(
        command_queue.as_ptr(),
        buffer.as_ptr(),
        block as cl_uint,
        map_flags.bits(),
        offset * mem::size_of::<T>(),
        len * mem::size_of::<T>(),
        wait_list_len,
        wait_list_ptr,
        new_event_ptr,
        &mut errcode,
    );

    eval_create_ptr(errcode, mapped_ptr, "clEnqueueMapBuffer").map(|ptr| ptr as *mut T)
}

/// Enqueues a command to map a region of an image into the host address
/// space. Returns the mapped pointer, the row pitch, and the slice pitch.
///
/// ## Safety
///
/// See `enqueue_map_buffer`.
pub unsafe fn enqueue_map_image<T, En, Ewl>(
            command_queue: &CommandQueue,
            image: &Mem,
            block: bool,
            map_flags: MapFlags,
            origin: [usize; 3],
            region: [usize; 3],
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<(*mut T, usize, usize)>
        where T: OclPrm, En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let map = cl_fn!(clEnqueueMapImage);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let mut errcode = 0i32;
    let mut row_pitch_bytes = 0usize;
    let mut slc_pitch_bytes = 0usize;

    let mapped_ptr = map(
        command_queue.as_ptr(),
        image.as_ptr(),
        block as cl_uint,
        map_flags.bits(),
        origin.as_ptr(),
        region.as_ptr(),
        &mut row_pitch_bytes,
        &mut slc_pitch_bytes,
        wait_list_len,
        wait_list_ptr,
        new_event_ptr,
        &mut errcode,
    );

    eval_create_ptr(errcode, mapped_ptr, "clEnqueueMapImage")
        .map(|ptr| (ptr as *mut T, row_pitch_bytes, slc_pitch_bytes))
}

/// Enqueues a command to unmap a previously mapped region of a memory object.
///
/// ## Safety
///
/// `mapped_ptr` must have been returned by a map call on `memobj`, and must
/// not be used after this call.
pub unsafe fn enqueue_unmap_mem_object<En, Ewl>(
            command_queue: &CommandQueue,
            memobj: &Mem,
            mapped_ptr: *mut c_void,
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let unmap = cl_fn!(clEnqueueUnmapMemObject);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = unmap(
        command_queue.as_ptr(),
        memobj.as_ptr(),
        mapped_ptr,
        wait_list_len,
        wait_list_ptr,
        new_event_ptr,
    );
    eval_errcode(errcode, (), "clEnqueueUnmapMemObject", None::<String>)
}

/// Enqueues a command to indicate which device a set of memory objects
/// should be associated with.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn enqueue_migrate_mem_objects<En, Ewl>(
            command_queue: &CommandQueue,
            mem_objects: &[&Mem],
            flags: MemMigrationFlags,
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let migrate = cl_fn!(clEnqueueMigrateMemObjects);
    let mem_ptrs: Vec<cl_mem> = mem_objects.iter().map(|m| m.as_ptr()).collect();

    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = unsafe {
        migrate(
            command_queue.as_ptr(),
            mem_ptrs.len() as cl_uint,
            mem_ptrs.as_ptr(),
            flags.bits(),
            wait_list_len,
            wait_list_ptr,
            new_event_ptr,
        )
    };
    eval_errcode(errcode, (), "clEnqueueMigrateMemObjects", None::<String>)
}

/// Enqueues a command to execute a kernel on a device.
///
/// `work_dims` (1, 2, or 3) selects how many components of the work size
/// arrays are used.
///
/// ## Safety
///
/// Running any kernel is unsafe: the kernel may read or write any memory
/// object it was given.
///
/// [SDK - clEnqueueNDRangeKernel](https://www.khronos.org/registry/cl/sdk/1.2/docs/man/xhtml/clEnqueueNDRangeKernel.html)
pub unsafe fn enqueue_kernel<En, Ewl>(
            command_queue: &CommandQueue,
            kernel: &Kernel,
            work_dims: u32,
            global_work_offset: Option<[usize; 3]>,
            global_work_dims: &[usize; 3],
            local_work_dims: Option<[usize; 3]>,
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let enqueue = cl_fn!(clEnqueueNDRangeKernel);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let gwo = resolve_work_dims(global_work_offset.as_ref());
    let gws = global_work_dims.as_ptr();
    let lws = resolve_work_dims(local_work_dims.as_ref());

    let errcode = enqueue(
        command_queue.as_ptr(),
        kernel.as_ptr(),
        work_dims,
        gwo,
        gws,
        lws,
        wait_list_len,
        wait_list_ptr,
        new_event_ptr,
    );

    if errcode != Status::CL_SUCCESS as i32 {
        let name = get_kernel_name(kernel).unwrap_or_default();
        return eval_errcode(errcode, (), "clEnqueueNDRangeKernel", Some(name));
    }
    Ok(())
}

/// Enqueues a command to execute a kernel on a device as a single work item.
///
/// ## Safety
///
/// See `enqueue_kernel`.
pub unsafe fn enqueue_task<En, Ewl>(
            command_queue: &CommandQueue,
            kernel: &Kernel,
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    enqueue_kernel(command_queue, kernel, 1, None, &[1, 1, 1], Some([1, 1, 1]), wait_list,
        new_event)
}

/// Enqueues a command to execute a native C/C++ function not compiled using
/// the OpenCL compiler.
///
/// The driver copies `args`. For each memory object in `mem_list` the driver
/// writes a pointer to its contents into the copy at the matching byte
/// offset in `mem_offsets`.
///
/// ## Safety
///
/// `user_func` must only access `args` within its length and must treat the
/// patched locations as pointers to the memory objects' contents.
pub unsafe fn enqueue_native_kernel<En, Ewl>(
            command_queue: &CommandQueue,
            user_func: cl_native_kernel_fn,
            args: &mut [u8],
            mem_list: &[&Mem],
            mem_offsets: &[usize],
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let enqueue = cl_fn!(clEnqueueNativeKernel);

    let ptr_size = mem::size_of::<cl_mem>();
    if mem_list.len() != mem_offsets.len()
            || mem_offsets.iter().any(|&off| off + ptr_size > args.len()) {
        return Err(ApiWrapperError::NativeKernelMemLocs {
            mems: mem_list.len(),
            locs: mem_offsets.len(),
        }.into());
    }

    let mem_ptrs: Vec<cl_mem> = mem_list.iter().map(|m| m.as_ptr()).collect();
    let mem_locs: Vec<*const c_void> = mem_offsets.iter()
        .map(|&off| args.as_ptr().add(off) as *const c_void)
        .collect();

    let (mem_ptrs_ptr, mem_locs_ptr) = if mem_ptrs.is_empty() {
        (ptr::null(), ptr::null())
    } else {
        (mem_ptrs.as_ptr(), mem_locs.as_ptr())
    };

    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = enqueue(
        command_queue.as_ptr(),
        Some(user_func),
        args.as_mut_ptr() as *mut c_void,
        args.len(),
        mem_ptrs.len() as cl_uint,
        mem_ptrs_ptr,
        mem_locs_ptr,
        wait_list_len,
        wait_list_ptr,
        new_event_ptr,
    );
    eval_errcode(errcode, (), "clEnqueueNativeKernel", None::<String>)
}

/// Enqueues a marker command which waits for either a list of events to
/// complete, or all previously enqueued commands to complete.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn enqueue_marker_with_wait_list<En, Ewl>(
            command_queue: &CommandQueue,
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let enqueue = cl_fn!(clEnqueueMarkerWithWaitList);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = unsafe {
        enqueue(command_queue.as_ptr(), wait_list_len, wait_list_ptr, new_event_ptr)
    };
    eval_errcode(errcode, (), "clEnqueueMarkerWithWaitList", None::<String>)
}

/// A synchronization point that enqueues a barrier operation.
///
/// [Version Controlled: OpenCL 1.2+]
pub fn enqueue_barrier_with_wait_list<En, Ewl>(
            command_queue: &CommandQueue,
            wait_list: Option<Ewl>,
            new_event: Option<En>,
        ) -> ClResult<()>
        where En: ClNullEventPtr, Ewl: ClWaitListPtr
{
    let enqueue = cl_fn!(clEnqueueBarrierWithWaitList);
    let (wait_list_len, wait_list_ptr, new_event_ptr) =
        resolve_event_ptrs(wait_list, new_event);

    let errcode = unsafe {
        enqueue(command_queue.as_ptr(), wait_list_len, wait_list_ptr, new_event_ptr)
    };
    eval_errcode(errcode, (), "clEnqueueBarrierWithWaitList", None::<String>)
}

//============================================================================
//========================= Extension Function APIs ==========================
//============================================================================

/// Returns the address of the extension function named by
/// `func_name` for a given platform.
///
/// The pointer returned should be cast to a function pointer type matching
/// the extension function's definition defined in the appropriate extension
/// specification and header file.
///
/// [Version Controlled: OpenCL 1.2+]
pub unsafe fn get_extension_function_address_for_platform(platform: &PlatformId,
        func_name: &str) -> ClResult<*mut c_void>
{
    let get_address = cl_fn!(clGetExtensionFunctionAddressForPlatform);
    let func_name_c = CString::new(func_name)?;

    let ext_fn = get_address(platform.as_ptr(), func_name_c.as_ptr());

    if ext_fn.is_null() {
        Err(ApiWrapperError::GetExtensionFunctionAddressForPlatformInvalidFunction.into())
    } else {
        Ok(ext_fn)
    }
}

//============================================================================
//============================================================================
//=========================== DERIVED FUNCTIONS ==============================
//============================================================================
//============================================================================

/// Parses the value of `CLBIND_DEFAULT_PLATFORM_IDX`. Unset means zero.
pub fn parse_default_platform_idx(value: Option<&str>) -> ClResult<usize> {
    match value {
        Some(s) => s.trim().parse::<usize>()
            .map_err(|_| ApiWrapperError::DefaultPlatformEnvVarInvalid(s.to_owned()).into()),
        None => Ok(0),
    }
}

/// Returns the platform index set by `CLBIND_DEFAULT_PLATFORM_IDX`, or zero.
pub fn default_platform_idx() -> ClResult<usize> {
    parse_default_platform_idx(env::var(DEFAULT_PLATFORM_IDX_ENV_VAR).ok().as_deref())
}

/// Returns the default or first platform.
pub fn default_platform() -> ClResult<PlatformId> {
    let platform_list = get_platform_ids()?;

    if platform_list.is_empty() {
        Err(ApiWrapperError::DefaultPlatformNoPlatforms.into())
    } else {
        let default_platform_idx = default_platform_idx()?;
        if default_platform_idx > platform_list.len() - 1 {
            Err(ApiWrapperError::DefaultPlatformEnvVarBadIdx {
                    default_platform_idx, max_idx: platform_list.len() - 1}.into())
        } else {
            Ok(platform_list[default_platform_idx])
        }
    }
}

/// Parses the value of `CLBIND_DEFAULT_DEVICE_TYPE`. Unset means
/// `DeviceType::ALL`.
pub fn parse_default_device_type(value: Option<&str>) -> ClResult<DeviceType> {
    match value {
        Some(s) => DeviceType::from_name(s)
            .ok_or_else(|| ApiWrapperError::DefaultDeviceTypeInvalidType(s.to_owned()).into()),
        None => Ok(DeviceType::ALL),
    }
}

/// Returns the default device type bitflags as specified by environment
/// variable or else `DeviceType::ALL`.
pub fn default_device_type() -> ClResult<DeviceType> {
    parse_default_device_type(env::var(DEFAULT_DEVICE_TYPE_ENV_VAR).ok().as_deref())
}

/// Returns the name of a kernel.
pub fn get_kernel_name(kernel: &Kernel) -> ClResult<String> {
    get_kernel_info(kernel, KernelInfo::FunctionName)?.into_string()
}

/// Creates, builds, and returns a new program pointer from `src_strings`.
pub fn create_build_program(
            context: &Context,
            src_strings: &[CString],
            device_ids: Option<&[DeviceId]>,
            cmplr_opts: &CString,
        ) -> ClResult<Program>
{
    let program = create_program_with_source(context, src_strings)?;
    build_program(&program, device_ids, cmplr_opts, None)?;
    Ok(program)
}

/// Blocks until an event is complete.
pub fn wait_for_event(event: &Event) -> ClResult<()> {
    wait_for_events(event)
}

/// Returns the status of `event`.
///
/// A command which terminated abnormally is returned as an `ApiError`
/// carrying its negative status.
pub fn event_status(event: &Event) -> ClResult<CommandExecutionStatus> {
    let get_info = cl_fn!(clGetEventInfo);
    let mut status_int: cl_int = 0;

    let errcode = unsafe {
        get_info(
            event.as_ptr(),
            ffi::CL_EVENT_COMMAND_EXECUTION_STATUS,
            mem::size_of::<cl_int>(),
            &mut status_int as *mut cl_int as *mut c_void,
            ptr::null_mut(),
        )
    };
    eval_errcode(errcode, (), "clGetEventInfo", None::<String>)?;

    match CommandExecutionStatus::from_i32(status_int) {
        Some(status) => Ok(status),
        None => Err(ApiError::new(status_int, "clGetEventInfo",
            Some("CL_EVENT_COMMAND_EXECUTION_STATUS")).into()),
    }
}

/// Returns true if an event is complete, false if not complete.
pub fn event_is_complete(event: &Event) -> ClResult<bool> {
    event_status(event).map(|status| status == CommandExecutionStatus::Complete)
}
