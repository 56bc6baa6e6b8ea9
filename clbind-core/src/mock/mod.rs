//! An in-process OpenCL 1.2 driver for tests.
//!
//! Every entry point of [`ClApi`](crate::ffi::ClApi) is implemented against
//! per-thread state: each test thread sees its own platform with one GPU and
//! one CPU device. Objects are reference counted the way a real driver
//! counts them and every call is recorded, so tests can check object
//! lifecycles and the exact entry points used.
//!
//! Memory objects are backed by host memory and every transfer, fill, copy,
//! and map is carried out. Kernels are parsed for their signatures but never
//! run; each dispatch is recorded instead (see [`last_dispatch`]). The
//! built-in kernels `mock_copy` and `mock_fill` and native kernels are the
//! exception and do run.
//!
//! Driver callbacks run on the calling thread once the entry point which
//! triggered them has finished, or on a short-lived worker thread after
//! [`set_worker_thread_callbacks`].
//!
//! ```
//! clbind_core::mock::install().unwrap();
//! let platforms = clbind_core::get_platform_ids().unwrap();
//! assert_eq!(platforms, vec![clbind_core::mock::platform()]);
//! ```

mod source;
mod state;
mod entry;
mod mem;
mod program;

use std::cell::RefCell;
use std::ffi::CString;
use std::mem as std_mem;
use std::ptr;
use std::sync::OnceLock;
use crate::ffi::{self, c_void, size_t, cl_int, cl_uint, cl_ulong, cl_image_format, ClApi};
use crate::error::Result as ClResult;
use crate::{PlatformId, DeviceId, DeviceType};
use self::state::{State, Pending};

pub use self::state::Dispatch;

/// Every program binary produced by the mock starts with this line.
pub(super) const BINARY_MAGIC: &str = "MOCKBIN\n";

thread_local! {
    static STATE: RefCell<State> = RefCell::new(State::new());
}

static MOCK_API: OnceLock<ClApi> = OnceLock::new();

macro_rules! mock_table {
    ($( $module:ident: [$($name:ident),* $(,)?] ),* $(,)?) => {
        fn build_table() -> ClApi {
            let mut api = ClApi::empty();
            $( $( api.$name = Some(self::$module::$name); )* )*
            api
        }
    };
}

mock_table! {
    entry: [
        clGetPlatformIDs, clGetPlatformInfo, clGetDeviceIDs, clGetDeviceInfo,
        clCreateSubDevices, clRetainDevice, clReleaseDevice, clCreateContext,
        clCreateContextFromType, clRetainContext, clReleaseContext, clGetContextInfo,
        clCreateCommandQueue, clRetainCommandQueue, clReleaseCommandQueue,
        clGetCommandQueueInfo, clWaitForEvents, clGetEventInfo, clCreateUserEvent,
        clRetainEvent, clReleaseEvent, clSetUserEventStatus, clSetEventCallback,
        clGetEventProfilingInfo, clFlush, clFinish, clEnqueueMarkerWithWaitList,
        clEnqueueBarrierWithWaitList, clGetExtensionFunctionAddressForPlatform,
    ],
    mem: [
        clCreateBuffer, clCreateSubBuffer, clCreateImage, clRetainMemObject,
        clReleaseMemObject, clGetSupportedImageFormats, clGetMemObjectInfo, clGetImageInfo,
        clSetMemObjectDestructorCallback, clCreateSampler, clRetainSampler, clReleaseSampler,
        clGetSamplerInfo, clEnqueueReadBuffer, clEnqueueReadBufferRect, clEnqueueWriteBuffer,
        clEnqueueWriteBufferRect, clEnqueueFillBuffer, clEnqueueCopyBuffer,
        clEnqueueCopyBufferRect, clEnqueueReadImage, clEnqueueWriteImage, clEnqueueFillImage,
        clEnqueueCopyImage, clEnqueueCopyImageToBuffer, clEnqueueCopyBufferToImage,
        clEnqueueMapBuffer, clEnqueueMapImage, clEnqueueUnmapMemObject,
        clEnqueueMigrateMemObjects,
    ],
    program: [
        clCreateProgramWithSource, clCreateProgramWithBinary,
        clCreateProgramWithBuiltInKernels, clRetainProgram, clReleaseProgram, clBuildProgram,
        clCompileProgram, clLinkProgram, clUnloadPlatformCompiler, clGetProgramInfo,
        clGetProgramBuildInfo, clCreateKernel, clCreateKernelsInProgram, clRetainKernel,
        clReleaseKernel, clSetKernelArg, clGetKernelInfo, clGetKernelArgInfo,
        clGetKernelWorkGroupInfo, clEnqueueNDRangeKernel, clEnqueueNativeKernel,
    ],
}

/// Returns the mock entry point table.
pub fn api() -> &'static ClApi {
    MOCK_API.get_or_init(build_table)
}

/// Installs the mock as the process-wide entry point table and resets the
/// calling thread's driver state.
pub fn install() -> ClResult<()> {
    crate::install_api(api())?;
    reset();
    Ok(())
}

//=============================================================================
//=========================== ENTRY POINT PLUMBING ============================
//=============================================================================

fn with_state<R, F: FnOnce(&mut State) -> R>(f: F) -> Option<R> {
    STATE.try_with(|cell| cell.try_borrow_mut().ok().map(|mut state| f(&mut state)))
        .ok()
        .flatten()
}

/// Runs queued driver callbacks until none remain.
fn run_pending() {
    loop {
        let drained = with_state(|s| (std_mem::take(&mut s.pending), s.worker_thread_callbacks));
        match drained {
            Some((pending, worker)) if !pending.is_empty() => {
                for callback in pending {
                    callback.run(worker);
                }
            },
            _ => return,
        }
    }
}

/// Records a call to `name` and runs `f` against the driver state.
///
/// A failure registered with [`fail_next`] for `name` is returned in place of
/// running `f`. Callbacks queued by `f` run after the state is released.
fn call<R, F>(name: &'static str, f: F) -> Result<R, cl_int>
        where F: FnOnce(&mut State) -> Result<R, cl_int>
{
    let result = with_state(|s| {
        s.calls.push(name);
        match s.fail_next.remove(name) {
            Some(code) => Err(code),
            None => f(s),
        }
    }).unwrap_or(Err(ffi::CL_OUT_OF_HOST_MEMORY));
    run_pending();
    result
}

/// Converts the result of a call into a status code.
fn status(result: Result<(), cl_int>) -> cl_int {
    match result {
        Ok(()) => ffi::CL_SUCCESS,
        Err(code) => code,
    }
}

/// Converts the result of a create call into a handle, storing the status in
/// `errcode_ret`.
unsafe fn create(errcode_ret: *mut cl_int, result: Result<usize, cl_int>) -> *mut c_void {
    create_with_code(errcode_ret, result.map(|handle| (handle, ffi::CL_SUCCESS)))
}

/// Like `create`, for calls that can fail and still return a handle.
unsafe fn create_with_code(errcode_ret: *mut cl_int, result: Result<(usize, cl_int), cl_int>)
        -> *mut c_void
{
    let (handle, code) = match result {
        Ok(pair) => pair,
        Err(code) => (0, code),
    };
    if !errcode_ret.is_null() {
        *errcode_ret = code;
    }
    handle as *mut c_void
}

/// Copies an info value into a caller's buffer following the usual
/// `param_value` / `param_value_size_ret` protocol.
unsafe fn write_info(bytes: &[u8], size: size_t, value: *mut c_void, size_ret: *mut size_t)
        -> Result<(), cl_int>
{
    if !value.is_null() {
        if size < bytes.len() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        ptr::copy_nonoverlapping(bytes.as_ptr(), value as *mut u8, bytes.len());
    }
    if !size_ret.is_null() {
        *size_ret = bytes.len();
    }
    Ok(())
}

/// Copies `count` handles out of a caller's array.
unsafe fn handles(count: cl_uint, list: *const *mut c_void) -> Vec<usize> {
    if count == 0 || list.is_null() {
        return Vec::new();
    }
    std::slice::from_raw_parts(list, count as usize).iter().map(|&h| h as usize).collect()
}

/// Reads and checks the shape of an event wait list.
unsafe fn wait_list(count: cl_uint, list: *const *mut c_void) -> Result<Vec<usize>, cl_int> {
    if (count == 0) != list.is_null() {
        return Err(ffi::CL_INVALID_EVENT_WAIT_LIST);
    }
    Ok(handles(count, list))
}

/// Stores a new event handle in `event` if the caller asked for one.
unsafe fn store_event(event: *mut *mut c_void, handle: Option<usize>) {
    if let (false, Some(handle)) = (event.is_null(), handle) {
        *event = handle as *mut c_void;
    }
}

unsafe fn c_str(ptr: *const ffi::c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

//=============================================================================
//============================== INFO ENCODING ================================
//=============================================================================

fn uint(val: cl_uint) -> Vec<u8> {
    val.to_ne_bytes().to_vec()
}

fn int(val: cl_int) -> Vec<u8> {
    val.to_ne_bytes().to_vec()
}

fn ulong(val: cl_ulong) -> Vec<u8> {
    val.to_ne_bytes().to_vec()
}

fn size(val: usize) -> Vec<u8> {
    val.to_ne_bytes().to_vec()
}

fn sizes(vals: &[usize]) -> Vec<u8> {
    vals.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

fn intptrs(vals: &[isize]) -> Vec<u8> {
    vals.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

fn string(val: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(val.len() + 1);
    bytes.extend_from_slice(val.as_bytes());
    bytes.push(0);
    bytes
}

fn image_format(format: &cl_image_format) -> Vec<u8> {
    let mut bytes = uint(format.image_channel_order);
    bytes.extend(uint(format.image_channel_data_type));
    bytes
}

//=============================================================================
//================================== HOOKS ====================================
//=============================================================================

/// Returns the mock platform.
pub fn platform() -> PlatformId {
    unsafe { PlatformId::from_raw(state::PLATFORM as *mut c_void) }
}

/// Returns the mock GPU device: 8 compute units, work groups of up to 256.
pub fn gpu_device() -> DeviceId {
    unsafe { DeviceId::from_raw(state::GPU_DEVICE as *mut c_void) }
}

/// Returns the mock CPU device: 4 compute units, native kernel support, and
/// partitionable into sub-devices.
pub fn cpu_device() -> DeviceId {
    unsafe { DeviceId::from_raw(state::CPU_DEVICE as *mut c_void) }
}

/// Discards every object, recorded call, and setting of the calling thread's
/// driver.
pub fn reset() {
    with_state(|s| *s = State::new());
}

/// Sets the number of status polls a non-blocking command takes to complete.
/// Blocking commands account for the same number of polls before returning.
pub fn set_completion_polls(polls: u32) {
    with_state(|s| s.completion_polls = polls);
}

/// Returns the number of event status polls served so far.
pub fn polls() -> u64 {
    with_state(|s| s.poll_count).unwrap_or(0)
}

/// Makes the next call to the entry point `name` fail with `code`.
pub fn fail_next(name: &'static str, code: i32) {
    with_state(|s| s.fail_next.insert(name, code));
}

/// Returns the name of every entry point called so far, in order.
pub fn calls() -> Vec<&'static str> {
    with_state(|s| s.calls.clone()).unwrap_or_default()
}

/// Returns the number of calls made to the entry point `name`.
pub fn call_count(name: &str) -> usize {
    with_state(|s| s.calls.iter().filter(|&&c| c == name).count()).unwrap_or(0)
}

pub fn clear_calls() {
    with_state(|s| s.calls.clear());
}

/// Returns the reference count of a live object, or `None` if `handle` does
/// not name one. Root devices always report 1.
pub fn refcount(handle: *mut c_void) -> Option<u32> {
    let handle = handle as usize;
    with_state(|s| {
        if s.devices.iter().any(|d| d.id == handle) {
            Some(1)
        } else {
            s.objects.get(&handle).map(|obj| obj.refcount)
        }
    }).flatten()
}

/// Returns the number of live objects.
pub fn live_objects() -> usize {
    with_state(|s| s.objects.len()).unwrap_or(0)
}

/// Reports an error through a context's notification callback. Returns
/// `false` if the context is unknown or has no callback.
pub fn raise_context_error(context: *mut c_void, errinfo: &str, private_info: &[u8]) -> bool {
    let queued = with_state(|s| {
        let notify = match s.context(context as usize) {
            Ok(ctx) => ctx.notify,
            Err(_) => return false,
        };
        match notify {
            Some((f, user_data)) => {
                let errinfo = CString::new(errinfo.replace('\0', " "))
                    .unwrap_or_default();
                s.pending.push(Pending::ContextError { f, errinfo,
                    private_info: private_info.to_vec(), user_data });
                true
            },
            None => false,
        }
    }).unwrap_or(false);
    run_pending();
    queued
}

/// Sets the number of platforms reported. Only the first one has devices.
pub fn set_platform_count(count: usize) {
    with_state(|s| s.platform_count = count);
}

/// Hides every root device matching `device_type` from device queries.
pub fn hide_devices(device_type: DeviceType) {
    with_state(|s| {
        for device in s.devices.iter_mut() {
            if device.device_type & device_type.bits() != 0 {
                device.hidden = true;
            }
        }
    });
}

/// Sets the version string a device reports. Returns `false` for an unknown
/// device.
pub fn set_device_version(device: DeviceId, version: &str) -> bool {
    with_state(|s| match s.device_mut(device.as_ptr() as usize) {
        Ok(dev) => {
            dev.version = version.to_owned();
            true
        },
        Err(_) => false,
    }).unwrap_or(false)
}

/// Returns the most recent kernel dispatch.
pub fn last_dispatch() -> Option<Dispatch> {
    with_state(|s| s.dispatches.last().cloned()).flatten()
}

/// Returns every kernel dispatch, in order.
pub fn dispatches() -> Vec<Dispatch> {
    with_state(|s| s.dispatches.clone()).unwrap_or_default()
}

/// Runs event, build, memory destructor, and context error callbacks on a
/// separate thread, as a real driver would.
///
/// The worker thread has driver state of its own: callbacks running there
/// must not use objects of the thread which triggered them.
pub fn set_worker_thread_callbacks(enabled: bool) {
    with_state(|s| s.worker_thread_callbacks = enabled);
}
