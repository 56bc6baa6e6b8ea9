//! Platform, device, context, queue, and event entry points.

#![allow(non_snake_case)]

use crate::ffi::{self, c_void, c_char, size_t, cl_int, cl_uint, cl_bool, cl_platform_id,
    cl_platform_info, cl_device_id, cl_device_type, cl_device_info, cl_device_partition_property,
    cl_context, cl_context_properties, cl_context_info, cl_context_notify_fn, cl_command_queue,
    cl_command_queue_properties, cl_command_queue_info, cl_event, cl_event_info,
    cl_event_notify_fn, cl_profiling_info};
use super::state::{self, State, Device, ContextObj, QueueObj, EventObj, ObjKind, Kind, Pending};
use super::{call, status, create, write_info, handles, wait_list, store_event, uint, int, ulong,
    size, sizes, intptrs, string};

const PLATFORM_EXTENSIONS: &str = "cl_khr_icd cl_khr_byte_addressable_store";
const DEVICE_EXTENSIONS: &str = "cl_khr_byte_addressable_store cl_khr_fp64 \
    cl_khr_global_int32_base_atomics";

const KNOWN_DEVICE_TYPES: cl_device_type = ffi::CL_DEVICE_TYPE_DEFAULT | ffi::CL_DEVICE_TYPE_CPU
    | ffi::CL_DEVICE_TYPE_GPU | ffi::CL_DEVICE_TYPE_ACCELERATOR | ffi::CL_DEVICE_TYPE_CUSTOM;

//=============================================================================
//================================ PLATFORM ===================================
//=============================================================================

pub(super) unsafe extern "system" fn clGetPlatformIDs(num_entries: cl_uint,
        platforms: *mut cl_platform_id, num_platforms: *mut cl_uint) -> cl_int
{
    status(call("clGetPlatformIDs", |s| {
        if (num_entries == 0 && !platforms.is_null())
                || (platforms.is_null() && num_platforms.is_null()) {
            return Err(ffi::CL_INVALID_VALUE);
        }
        if !platforms.is_null() {
            for idx in 0..s.platform_count.min(num_entries as usize) {
                *platforms.add(idx) = (state::PLATFORM + idx * state::PLATFORM_STEP) as *mut c_void;
            }
        }
        if !num_platforms.is_null() {
            *num_platforms = s.platform_count as cl_uint;
        }
        Ok(())
    }))
}

pub(super) unsafe extern "system" fn clGetPlatformInfo(platform: cl_platform_id,
        param_name: cl_platform_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int
{
    status(call("clGetPlatformInfo", |s| {
        if !s.platform_valid(platform as usize) {
            return Err(ffi::CL_INVALID_PLATFORM);
        }
        let bytes = match param_name {
            ffi::CL_PLATFORM_PROFILE => string("FULL_PROFILE"),
            ffi::CL_PLATFORM_VERSION => string(state::PLATFORM_VERSION),
            ffi::CL_PLATFORM_NAME => string("clbind mock platform"),
            ffi::CL_PLATFORM_VENDOR => string("clbind"),
            ffi::CL_PLATFORM_EXTENSIONS => string(PLATFORM_EXTENSIONS),
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

pub(super) unsafe extern "system" fn clGetExtensionFunctionAddressForPlatform(
        platform: cl_platform_id, func_name: *const c_char) -> *mut c_void
{
    let name = super::c_str(func_name);
    let found = call("clGetExtensionFunctionAddressForPlatform", |s| {
        if !s.platform_valid(platform as usize) {
            return Err(ffi::CL_INVALID_PLATFORM);
        }
        match name.as_deref() {
            Some("clIcdGetPlatformIDsKHR") => Ok(clGetPlatformIDs as usize),
            _ => Err(ffi::CL_INVALID_VALUE),
        }
    });
    found.unwrap_or(0) as *mut c_void
}

//=============================================================================
//================================= DEVICES ===================================
//=============================================================================

pub(super) unsafe extern "system" fn clGetDeviceIDs(platform: cl_platform_id,
        device_type: cl_device_type, num_entries: cl_uint, devices: *mut cl_device_id,
        num_devices: *mut cl_uint) -> cl_int
{
    status(call("clGetDeviceIDs", |s| {
        if !s.platform_valid(platform as usize) {
            return Err(ffi::CL_INVALID_PLATFORM);
        }
        if device_type != ffi::CL_DEVICE_TYPE_ALL && device_type & !KNOWN_DEVICE_TYPES != 0 {
            return Err(ffi::CL_INVALID_DEVICE_TYPE);
        }
        if (num_entries == 0 && !devices.is_null())
                || (devices.is_null() && num_devices.is_null()) {
            return Err(ffi::CL_INVALID_VALUE);
        }

        let found = s.platform_devices(platform as usize, device_type);
        if found.is_empty() {
            return Err(ffi::CL_DEVICE_NOT_FOUND);
        }
        if !devices.is_null() {
            for (idx, &id) in found.iter().take(num_entries as usize).enumerate() {
                *devices.add(idx) = id as *mut c_void;
            }
        }
        if !num_devices.is_null() {
            *num_devices = found.len() as cl_uint;
        }
        Ok(())
    }))
}

fn device_info(s: &State, handle: usize, dev: &Device, param: cl_device_info)
        -> Result<Vec<u8>, cl_int>
{
    let is_cpu = dev.device_type & ffi::CL_DEVICE_TYPE_CPU != 0;
    let fp_config = ffi::CL_FP_DENORM | ffi::CL_FP_INF_NAN | ffi::CL_FP_ROUND_TO_NEAREST
        | ffi::CL_FP_FMA;

    Ok(match param {
        ffi::CL_DEVICE_TYPE => ulong(dev.device_type),
        ffi::CL_DEVICE_VENDOR_ID => uint(0xC1B1),
        ffi::CL_DEVICE_MAX_COMPUTE_UNITS => uint(dev.compute_units),
        ffi::CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS => uint(3),
        ffi::CL_DEVICE_MAX_WORK_GROUP_SIZE => size(dev.max_work_group_size),
        ffi::CL_DEVICE_MAX_WORK_ITEM_SIZES => sizes(&dev.max_work_item_sizes),
        ffi::CL_DEVICE_PREFERRED_VECTOR_WIDTH_CHAR
            | ffi::CL_DEVICE_NATIVE_VECTOR_WIDTH_CHAR => uint(if is_cpu { 16 } else { 4 }),
        ffi::CL_DEVICE_PREFERRED_VECTOR_WIDTH_SHORT
            | ffi::CL_DEVICE_NATIVE_VECTOR_WIDTH_SHORT => uint(if is_cpu { 8 } else { 2 }),
        ffi::CL_DEVICE_PREFERRED_VECTOR_WIDTH_INT
            | ffi::CL_DEVICE_NATIVE_VECTOR_WIDTH_INT
            | ffi::CL_DEVICE_PREFERRED_VECTOR_WIDTH_FLOAT
            | ffi::CL_DEVICE_NATIVE_VECTOR_WIDTH_FLOAT => uint(if is_cpu { 4 } else { 1 }),
        ffi::CL_DEVICE_PREFERRED_VECTOR_WIDTH_LONG
            | ffi::CL_DEVICE_NATIVE_VECTOR_WIDTH_LONG
            | ffi::CL_DEVICE_PREFERRED_VECTOR_WIDTH_DOUBLE
            | ffi::CL_DEVICE_NATIVE_VECTOR_WIDTH_DOUBLE => uint(if is_cpu { 2 } else { 1 }),
        ffi::CL_DEVICE_PREFERRED_VECTOR_WIDTH_HALF
            | ffi::CL_DEVICE_NATIVE_VECTOR_WIDTH_HALF => uint(0),
        ffi::CL_DEVICE_MAX_CLOCK_FREQUENCY => uint(if is_cpu { 3000 } else { 1200 }),
        ffi::CL_DEVICE_ADDRESS_BITS => uint(64),
        ffi::CL_DEVICE_MAX_READ_IMAGE_ARGS => uint(128),
        ffi::CL_DEVICE_MAX_WRITE_IMAGE_ARGS => uint(8),
        ffi::CL_DEVICE_MAX_MEM_ALLOC_SIZE => ulong(state::MAX_MEM_ALLOC_SIZE as u64),
        ffi::CL_DEVICE_IMAGE2D_MAX_WIDTH | ffi::CL_DEVICE_IMAGE2D_MAX_HEIGHT => size(8192),
        ffi::CL_DEVICE_IMAGE3D_MAX_WIDTH | ffi::CL_DEVICE_IMAGE3D_MAX_HEIGHT
            | ffi::CL_DEVICE_IMAGE3D_MAX_DEPTH => size(2048),
        ffi::CL_DEVICE_IMAGE_SUPPORT => uint(ffi::CL_TRUE),
        ffi::CL_DEVICE_MAX_PARAMETER_SIZE => size(1024),
        ffi::CL_DEVICE_MAX_SAMPLERS => uint(16),
        ffi::CL_DEVICE_MEM_BASE_ADDR_ALIGN => uint(state::MEM_BASE_ADDR_ALIGN),
        ffi::CL_DEVICE_MIN_DATA_TYPE_ALIGN_SIZE => uint(128),
        ffi::CL_DEVICE_SINGLE_FP_CONFIG => ulong(fp_config),
        ffi::CL_DEVICE_DOUBLE_FP_CONFIG => ulong(fp_config | ffi::CL_FP_ROUND_TO_ZERO
            | ffi::CL_FP_ROUND_TO_INF),
        ffi::CL_DEVICE_GLOBAL_MEM_CACHE_TYPE => uint(ffi::CL_READ_WRITE_CACHE),
        ffi::CL_DEVICE_GLOBAL_MEM_CACHELINE_SIZE => uint(64),
        ffi::CL_DEVICE_GLOBAL_MEM_CACHE_SIZE => ulong(1 << 20),
        ffi::CL_DEVICE_GLOBAL_MEM_SIZE => ulong(1 << 30),
        ffi::CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE => ulong(64 << 10),
        ffi::CL_DEVICE_MAX_CONSTANT_ARGS => uint(8),
        ffi::CL_DEVICE_LOCAL_MEM_TYPE => uint(if is_cpu { ffi::CL_GLOBAL } else { ffi::CL_LOCAL }),
        ffi::CL_DEVICE_LOCAL_MEM_SIZE => ulong(32 << 10),
        ffi::CL_DEVICE_ERROR_CORRECTION_SUPPORT => uint(ffi::CL_FALSE),
        ffi::CL_DEVICE_PROFILING_TIMER_RESOLUTION => size(1),
        ffi::CL_DEVICE_ENDIAN_LITTLE | ffi::CL_DEVICE_AVAILABLE
            | ffi::CL_DEVICE_COMPILER_AVAILABLE | ffi::CL_DEVICE_LINKER_AVAILABLE
            | ffi::CL_DEVICE_PREFERRED_INTEROP_USER_SYNC => uint(ffi::CL_TRUE),
        ffi::CL_DEVICE_HOST_UNIFIED_MEMORY => uint(is_cpu as cl_bool),
        ffi::CL_DEVICE_EXECUTION_CAPABILITIES => ulong(dev.exec_capabilities),
        ffi::CL_DEVICE_QUEUE_PROPERTIES => ulong(ffi::CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE
            | ffi::CL_QUEUE_PROFILING_ENABLE),
        ffi::CL_DEVICE_NAME => string(dev.name),
        ffi::CL_DEVICE_VENDOR => string("clbind"),
        ffi::CL_DRIVER_VERSION => string(env!("CARGO_PKG_VERSION")),
        ffi::CL_DEVICE_PROFILE => string("FULL_PROFILE"),
        ffi::CL_DEVICE_VERSION => string(&dev.version),
        ffi::CL_DEVICE_EXTENSIONS => string(DEVICE_EXTENSIONS),
        ffi::CL_DEVICE_OPENCL_C_VERSION => string("OpenCL C 1.2"),
        ffi::CL_DEVICE_PLATFORM => size(state::PLATFORM),
        ffi::CL_DEVICE_BUILT_IN_KERNELS => string(state::BUILT_IN_KERNELS),
        ffi::CL_DEVICE_IMAGE_MAX_BUFFER_SIZE => size(65536),
        ffi::CL_DEVICE_IMAGE_MAX_ARRAY_SIZE => size(2048),
        ffi::CL_DEVICE_PARENT_DEVICE => size(dev.parent.unwrap_or(0)),
        ffi::CL_DEVICE_PARTITION_MAX_SUB_DEVICES =>
            uint(if dev.supports_partitioning() { dev.compute_units } else { 0 }),
        ffi::CL_DEVICE_PARTITION_PROPERTIES => if dev.supports_partitioning() {
            intptrs(&[ffi::CL_DEVICE_PARTITION_EQUALLY, ffi::CL_DEVICE_PARTITION_BY_COUNTS])
        } else {
            intptrs(&[0])
        },
        ffi::CL_DEVICE_PARTITION_AFFINITY_DOMAIN => ulong(0),
        ffi::CL_DEVICE_PARTITION_TYPE => intptrs(&dev.partition_type),
        ffi::CL_DEVICE_REFERENCE_COUNT => uint(s.refcount_of(handle, Kind::Device)?),
        ffi::CL_DEVICE_PRINTF_BUFFER_SIZE => size(1 << 20),
        ffi::CL_DEVICE_IMAGE_PITCH_ALIGNMENT | ffi::CL_DEVICE_IMAGE_BASE_ADDRESS_ALIGNMENT =>
            uint(1),
        _ => return Err(ffi::CL_INVALID_VALUE),
    })
}

pub(super) unsafe extern "system" fn clGetDeviceInfo(device: cl_device_id,
        param_name: cl_device_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int
{
    status(call("clGetDeviceInfo", |s| {
        let handle = device as usize;
        let st: &State = s;
        let bytes = device_info(st, handle, st.device(handle)?, param_name)?;
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

/// Returns the compute unit count of each sub-device a partition request
/// produces, along with the request as it will be reported by
/// `CL_DEVICE_PARTITION_TYPE`.
unsafe fn partition_counts(dev: &Device, properties: *const cl_device_partition_property)
        -> Result<(Vec<cl_uint>, Vec<isize>), cl_int>
{
    if properties.is_null() || !dev.supports_partitioning() {
        return Err(ffi::CL_INVALID_VALUE);
    }

    match *properties {
        ffi::CL_DEVICE_PARTITION_EQUALLY => {
            let units = *properties.add(1);
            if units <= 0 {
                return Err(ffi::CL_INVALID_VALUE);
            }
            let count = dev.compute_units / units as cl_uint;
            if count == 0 {
                return Err(ffi::CL_DEVICE_PARTITION_FAILED);
            }
            Ok((vec![units as cl_uint; count as usize],
                vec![ffi::CL_DEVICE_PARTITION_EQUALLY, units, 0]))
        },
        ffi::CL_DEVICE_PARTITION_BY_COUNTS => {
            let mut counts = Vec::new();
            loop {
                let count = *properties.add(counts.len() + 1);
                if count == ffi::CL_DEVICE_PARTITION_BY_COUNTS_LIST_END {
                    break;
                }
                if count < 0 || counts.len() == dev.compute_units as usize {
                    return Err(ffi::CL_INVALID_DEVICE_PARTITION_COUNT);
                }
                counts.push(count);
            }
            if counts.is_empty() || counts.iter().sum::<isize>() > dev.compute_units as isize {
                return Err(ffi::CL_INVALID_DEVICE_PARTITION_COUNT);
            }

            let mut raw = Vec::with_capacity(counts.len() + 3);
            raw.push(ffi::CL_DEVICE_PARTITION_BY_COUNTS);
            raw.extend(counts.iter().copied());
            raw.push(ffi::CL_DEVICE_PARTITION_BY_COUNTS_LIST_END);
            raw.push(0);
            Ok((counts.iter().map(|&c| c as cl_uint).collect(), raw))
        },
        // No cache or NUMA hierarchy is modelled, so no domain yields a
        // sub-device:
        ffi::CL_DEVICE_PARTITION_BY_AFFINITY_DOMAIN => Ok((Vec::new(),
            vec![ffi::CL_DEVICE_PARTITION_BY_AFFINITY_DOMAIN, *properties.add(1), 0])),
        _ => Err(ffi::CL_INVALID_VALUE),
    }
}

pub(super) unsafe extern "system" fn clCreateSubDevices(in_device: cl_device_id,
        properties: *const cl_device_partition_property, num_devices: cl_uint,
        out_devices: *mut cl_device_id, num_devices_ret: *mut cl_uint) -> cl_int
{
    status(call("clCreateSubDevices", |s| {
        let parent_handle = in_device as usize;
        let parent = s.device(parent_handle)?.clone();
        let (counts, raw) = partition_counts(&parent, properties)?;

        if !out_devices.is_null() {
            if (num_devices as usize) < counts.len() {
                return Err(ffi::CL_INVALID_VALUE);
            }
            for (idx, &units) in counts.iter().enumerate() {
                let sub = Device {
                    compute_units: units,
                    parent: Some(parent_handle),
                    partition_type: raw.clone(),
                    hidden: false,
                    ..parent.clone()
                };
                s.retain_implicit(parent_handle);
                let handle = s.insert(ObjKind::SubDevice(sub));
                if let Ok(dev) = s.device_mut(handle) {
                    dev.id = handle;
                }
                *out_devices.add(idx) = handle as *mut c_void;
            }
        }
        if !num_devices_ret.is_null() {
            *num_devices_ret = counts.len() as cl_uint;
        }
        Ok(())
    }))
}

pub(super) unsafe extern "system" fn clRetainDevice(device: cl_device_id) -> cl_int {
    status(call("clRetainDevice", |s| s.retain(device as usize, Kind::Device)))
}

pub(super) unsafe extern "system" fn clReleaseDevice(device: cl_device_id) -> cl_int {
    status(call("clReleaseDevice", |s| s.release(device as usize, Kind::Device)))
}

//=============================================================================
//================================= CONTEXT ===================================
//=============================================================================

/// Reads and validates a zero-terminated context property list.
unsafe fn context_properties(s: &State, properties: *const cl_context_properties)
        -> Result<(Vec<isize>, Option<usize>), cl_int>
{
    if properties.is_null() {
        return Ok((Vec::new(), None));
    }

    let mut raw = Vec::new();
    let mut platform = None;
    let mut seen = Vec::new();
    let mut idx = 0;

    loop {
        let key = *properties.add(idx);
        if key == 0 {
            break;
        }
        let val = *properties.add(idx + 1);
        idx += 2;

        if seen.contains(&key) {
            return Err(ffi::CL_INVALID_PROPERTY);
        }
        seen.push(key);

        match key {
            ffi::CL_CONTEXT_PLATFORM => {
                if !s.platform_valid(val as usize) {
                    return Err(ffi::CL_INVALID_PLATFORM);
                }
                platform = Some(val as usize);
            },
            ffi::CL_CONTEXT_INTEROP_USER_SYNC => (),
            _ => return Err(ffi::CL_INVALID_PROPERTY),
        }
        raw.push(key);
        raw.push(val);
    }
    raw.push(0);
    Ok((raw, platform))
}

fn context_notify(pfn_notify: Option<cl_context_notify_fn>, user_data: *mut c_void)
        -> Result<Option<(cl_context_notify_fn, usize)>, cl_int>
{
    match pfn_notify {
        Some(f) => Ok(Some((f, user_data as usize))),
        None if !user_data.is_null() => Err(ffi::CL_INVALID_VALUE),
        None => Ok(None),
    }
}

pub(super) unsafe extern "system" fn clCreateContext(properties: *const cl_context_properties,
        num_devices: cl_uint, devices: *const cl_device_id,
        pfn_notify: Option<cl_context_notify_fn>, user_data: *mut c_void,
        errcode_ret: *mut cl_int) -> cl_context
{
    create(errcode_ret, call("clCreateContext", |s| {
        let notify = context_notify(pfn_notify, user_data)?;
        if num_devices == 0 || devices.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let (properties, _) = context_properties(s, properties)?;
        let devices = handles(num_devices, devices);
        for &device in devices.iter() {
            s.device(device)?;
        }
        for &device in devices.iter() {
            s.retain_implicit(device);
        }
        Ok(s.insert(ObjKind::Context(ContextObj { devices, properties, notify })))
    }))
}

pub(super) unsafe extern "system" fn clCreateContextFromType(
        properties: *const cl_context_properties, device_type: cl_device_type,
        pfn_notify: Option<cl_context_notify_fn>, user_data: *mut c_void,
        errcode_ret: *mut cl_int) -> cl_context
{
    create(errcode_ret, call("clCreateContextFromType", |s| {
        let notify = context_notify(pfn_notify, user_data)?;
        let (properties, platform) = context_properties(s, properties)?;
        if device_type != ffi::CL_DEVICE_TYPE_ALL && device_type & !KNOWN_DEVICE_TYPES != 0 {
            return Err(ffi::CL_INVALID_DEVICE_TYPE);
        }
        let devices = s.platform_devices(platform.unwrap_or(state::PLATFORM), device_type);
        if devices.is_empty() {
            return Err(ffi::CL_DEVICE_NOT_FOUND);
        }
        Ok(s.insert(ObjKind::Context(ContextObj { devices, properties, notify })))
    }))
}

pub(super) unsafe extern "system" fn clRetainContext(context: cl_context) -> cl_int {
    status(call("clRetainContext", |s| s.retain(context as usize, Kind::Context)))
}

pub(super) unsafe extern "system" fn clReleaseContext(context: cl_context) -> cl_int {
    status(call("clReleaseContext", |s| s.release(context as usize, Kind::Context)))
}

pub(super) unsafe extern "system" fn clGetContextInfo(context: cl_context,
        param_name: cl_context_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int
{
    status(call("clGetContextInfo", |s| {
        let handle = context as usize;
        let ctx = s.context(handle)?;
        let bytes = match param_name {
            ffi::CL_CONTEXT_REFERENCE_COUNT => uint(s.refcount_of(handle, Kind::Context)?),
            ffi::CL_CONTEXT_DEVICES => sizes(&ctx.devices),
            ffi::CL_CONTEXT_PROPERTIES => intptrs(&ctx.properties),
            ffi::CL_CONTEXT_NUM_DEVICES => uint(ctx.devices.len() as cl_uint),
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

//=============================================================================
//============================== COMMAND QUEUE ================================
//=============================================================================

pub(super) unsafe extern "system" fn clCreateCommandQueue(context: cl_context,
        device: cl_device_id, properties: cl_command_queue_properties,
        errcode_ret: *mut cl_int) -> cl_command_queue
{
    create(errcode_ret, call("clCreateCommandQueue", |s| {
        let (context, device) = (context as usize, device as usize);
        if !s.context(context)?.devices.contains(&device) {
            return Err(ffi::CL_INVALID_DEVICE);
        }
        if properties & !(ffi::CL_QUEUE_OUT_OF_ORDER_EXEC_MODE_ENABLE
                | ffi::CL_QUEUE_PROFILING_ENABLE) != 0 {
            return Err(ffi::CL_INVALID_VALUE);
        }
        s.retain_implicit(context);
        Ok(s.insert(ObjKind::Queue(QueueObj { context, device, properties })))
    }))
}

pub(super) unsafe extern "system" fn clRetainCommandQueue(queue: cl_command_queue) -> cl_int {
    status(call("clRetainCommandQueue", |s| s.retain(queue as usize, Kind::Queue)))
}

pub(super) unsafe extern "system" fn clReleaseCommandQueue(queue: cl_command_queue) -> cl_int {
    status(call("clReleaseCommandQueue", |s| {
        s.finish_queue(queue as usize);
        s.release(queue as usize, Kind::Queue)
    }))
}

pub(super) unsafe extern "system" fn clGetCommandQueueInfo(queue: cl_command_queue,
        param_name: cl_command_queue_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int
{
    status(call("clGetCommandQueueInfo", |s| {
        let handle = queue as usize;
        let q = s.queue(handle)?;
        let bytes = match param_name {
            ffi::CL_QUEUE_CONTEXT => size(q.context),
            ffi::CL_QUEUE_DEVICE => size(q.device),
            ffi::CL_QUEUE_REFERENCE_COUNT => uint(s.refcount_of(handle, Kind::Queue)?),
            ffi::CL_QUEUE_PROPERTIES => ulong(q.properties),
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

pub(super) unsafe extern "system" fn clFlush(queue: cl_command_queue) -> cl_int {
    status(call("clFlush", |s| s.queue(queue as usize).map(|_| ())))
}

pub(super) unsafe extern "system" fn clFinish(queue: cl_command_queue) -> cl_int {
    status(call("clFinish", |s| {
        s.queue(queue as usize)?;
        s.finish_queue(queue as usize);
        Ok(())
    }))
}

/// Validates the queue and wait list of an enqueue call. Returns the queue's
/// context and whether any event in the wait list terminated abnormally.
pub(super) unsafe fn enqueue_prelude(s: &State, queue: cl_command_queue,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event)
        -> Result<(usize, bool), cl_int>
{
    let context = s.queue(queue as usize)?.context;
    let wait = wait_list(num_events_in_wait_list, event_wait_list)?;
    let failed = s.check_wait_list(context, &wait)?;
    Ok((context, failed))
}

/// Completes an enqueued command and hands its event to the caller if one was
/// asked for.
pub(super) unsafe fn finish_command(s: &mut State, queue: cl_command_queue,
        command_type: cl_uint, blocking: bool, wait_failed: bool, event: *mut cl_event)
        -> Result<(), cl_int>
{
    let handle = s.complete_command(queue as usize, command_type, blocking, wait_failed,
        !event.is_null())?;
    store_event(event, handle);
    Ok(())
}

unsafe fn enqueue_sync_point(name: &'static str, command_type: cl_uint, queue: cl_command_queue,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event, event: *mut cl_event)
        -> cl_int
{
    status(call(name, |s| {
        let (_, failed) = enqueue_prelude(s, queue, num_events_in_wait_list, event_wait_list)?;
        finish_command(s, queue, command_type, false, failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueMarkerWithWaitList(queue: cl_command_queue,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    enqueue_sync_point("clEnqueueMarkerWithWaitList", ffi::CL_COMMAND_MARKER, queue,
        num_events_in_wait_list, event_wait_list, event)
}

pub(super) unsafe extern "system" fn clEnqueueBarrierWithWaitList(queue: cl_command_queue,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    enqueue_sync_point("clEnqueueBarrierWithWaitList", ffi::CL_COMMAND_BARRIER, queue,
        num_events_in_wait_list, event_wait_list, event)
}

//=============================================================================
//================================== EVENTS ===================================
//=============================================================================

pub(super) unsafe extern "system" fn clWaitForEvents(num_events: cl_uint,
        event_list: *const cl_event) -> cl_int
{
    status(call("clWaitForEvents", |s| {
        if num_events == 0 || event_list.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let events = handles(num_events, event_list);
        let mut context = None;
        for &handle in events.iter() {
            let event = s.event(handle)?;
            if *context.get_or_insert(event.context) != event.context {
                return Err(ffi::CL_INVALID_CONTEXT);
            }
            // Nothing else on this thread could ever set it.
            if event.user && event.status > ffi::CL_COMPLETE {
                return Err(ffi::CL_INVALID_OPERATION);
            }
        }

        let mut failed = false;
        for &handle in events.iter() {
            s.drain_event(handle);
            failed |= s.event(handle)?.status < 0;
        }
        if failed {
            Err(ffi::CL_EXEC_STATUS_ERROR_FOR_EVENTS_IN_WAIT_LIST)
        } else {
            Ok(())
        }
    }))
}

pub(super) unsafe extern "system" fn clGetEventInfo(event: cl_event, param_name: cl_event_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int
{
    status(call("clGetEventInfo", |s| {
        let handle = event as usize;
        s.event(handle)?;
        if param_name == ffi::CL_EVENT_COMMAND_EXECUTION_STATUS && !param_value.is_null() {
            s.poll_event(handle);
        }
        let ev = s.event(handle)?;
        let bytes = match param_name {
            ffi::CL_EVENT_COMMAND_QUEUE => size(ev.queue.unwrap_or(0)),
            ffi::CL_EVENT_CONTEXT => size(ev.context),
            ffi::CL_EVENT_COMMAND_TYPE => uint(ev.command_type),
            ffi::CL_EVENT_COMMAND_EXECUTION_STATUS => int(ev.status),
            ffi::CL_EVENT_REFERENCE_COUNT => uint(s.refcount_of(handle, Kind::Event)?),
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

pub(super) unsafe extern "system" fn clCreateUserEvent(context: cl_context,
        errcode_ret: *mut cl_int) -> cl_event
{
    create(errcode_ret, call("clCreateUserEvent", |s| {
        let context = context as usize;
        s.context(context)?;
        s.retain_implicit(context);
        Ok(s.insert(ObjKind::Event(EventObj {
            context,
            queue: None,
            command_type: ffi::CL_COMMAND_USER,
            status: ffi::CL_SUBMITTED,
            polls_remaining: 0,
            user: true,
            callbacks: Vec::new(),
            profiling: None,
        })))
    }))
}

pub(super) unsafe extern "system" fn clRetainEvent(event: cl_event) -> cl_int {
    status(call("clRetainEvent", |s| s.retain(event as usize, Kind::Event)))
}

pub(super) unsafe extern "system" fn clReleaseEvent(event: cl_event) -> cl_int {
    status(call("clReleaseEvent", |s| s.release(event as usize, Kind::Event)))
}

pub(super) unsafe extern "system" fn clSetUserEventStatus(event: cl_event,
        execution_status: cl_int) -> cl_int
{
    status(call("clSetUserEventStatus", |s| {
        let handle = event as usize;
        let ev = s.event(handle)?;
        if !ev.user {
            return Err(ffi::CL_INVALID_EVENT);
        }
        if execution_status > ffi::CL_COMPLETE {
            return Err(ffi::CL_INVALID_VALUE);
        }
        if ev.status <= ffi::CL_COMPLETE {
            return Err(ffi::CL_INVALID_OPERATION);
        }
        s.set_event_status(handle, execution_status);
        Ok(())
    }))
}

pub(super) unsafe extern "system" fn clSetEventCallback(event: cl_event,
        command_exec_callback_type: cl_int, pfn_notify: Option<cl_event_notify_fn>,
        user_data: *mut c_void) -> cl_int
{
    status(call("clSetEventCallback", |s| {
        let handle = event as usize;
        let f = pfn_notify.ok_or(ffi::CL_INVALID_VALUE)?;
        match command_exec_callback_type {
            ffi::CL_COMPLETE | ffi::CL_RUNNING | ffi::CL_SUBMITTED => (),
            _ => return Err(ffi::CL_INVALID_VALUE),
        }

        let ev = s.event_mut(handle)?;
        if ev.status <= command_exec_callback_type {
            let status = ev.status;
            s.pending.push(Pending::Event { f, event: handle, status,
                user_data: user_data as usize });
        } else {
            ev.callbacks.push((command_exec_callback_type, f, user_data as usize));
        }
        Ok(())
    }))
}

pub(super) unsafe extern "system" fn clGetEventProfilingInfo(event: cl_event,
        param_name: cl_profiling_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int
{
    status(call("clGetEventProfilingInfo", |s| {
        let ev = s.event(event as usize)?;
        let times = match ev.profiling {
            Some(times) if ev.status == ffi::CL_COMPLETE => times,
            _ => return Err(ffi::CL_PROFILING_INFO_NOT_AVAILABLE),
        };
        let idx = match param_name {
            ffi::CL_PROFILING_COMMAND_QUEUED => 0,
            ffi::CL_PROFILING_COMMAND_SUBMIT => 1,
            ffi::CL_PROFILING_COMMAND_START => 2,
            ffi::CL_PROFILING_COMMAND_END => 3,
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&ulong(times[idx]), param_value_size, param_value, param_value_size_ret)
    }))
}
