//! Memory object, sampler, and transfer entry points.

#![allow(non_snake_case)]

use std::cell::RefCell;
use std::ptr;
use std::rc::Rc;
use crate::ffi::{self, c_void, size_t, cl_int, cl_uint, cl_bool, cl_context, cl_mem,
    cl_mem_flags, cl_mem_info, cl_image_info, cl_mem_object_type, cl_buffer_create_type,
    cl_buffer_region, cl_image_format, cl_image_desc, cl_mem_destructor_fn, cl_sampler,
    cl_sampler_info, cl_addressing_mode, cl_filter_mode, cl_command_queue, cl_event,
    cl_map_flags, cl_mem_migration_flags};
use super::state::{self, State, MemObj, ImageMeta, SamplerObj, ObjKind, Kind};
use super::entry::{enqueue_prelude, finish_command};
use super::{call, status, create, write_info, handles, uint, ulong, size, image_format};

const ACCESS_FLAGS: cl_mem_flags = ffi::CL_MEM_READ_WRITE | ffi::CL_MEM_WRITE_ONLY
    | ffi::CL_MEM_READ_ONLY;
const HOST_ACCESS_FLAGS: cl_mem_flags = ffi::CL_MEM_HOST_WRITE_ONLY | ffi::CL_MEM_HOST_READ_ONLY
    | ffi::CL_MEM_HOST_NO_ACCESS;
const HOST_PTR_FLAGS: cl_mem_flags = ffi::CL_MEM_USE_HOST_PTR | ffi::CL_MEM_ALLOC_HOST_PTR
    | ffi::CL_MEM_COPY_HOST_PTR;

/// Channel order, channel data type, and element size of every supported
/// image format.
const SUPPORTED_FORMATS: &[(cl_uint, cl_uint, usize)] = &[
    (ffi::CL_RGBA, ffi::CL_UNORM_INT8, 4),
    (ffi::CL_RGBA, ffi::CL_UNSIGNED_INT8, 4),
    (ffi::CL_RGBA, ffi::CL_FLOAT, 16),
    (ffi::CL_BGRA, ffi::CL_UNORM_INT8, 4),
    (ffi::CL_R, ffi::CL_FLOAT, 4),
    (ffi::CL_R, ffi::CL_UNSIGNED_INT32, 4),
    (ffi::CL_R, ffi::CL_UNORM_INT8, 1),
    (ffi::CL_RG, ffi::CL_FLOAT, 8),
];

const KNOWN_CHANNEL_ORDERS: &[cl_uint] = &[ffi::CL_R, ffi::CL_A, ffi::CL_RG, ffi::CL_RA,
    ffi::CL_RGB, ffi::CL_RGBA, ffi::CL_BGRA, ffi::CL_ARGB, ffi::CL_INTENSITY, ffi::CL_LUMINANCE,
    ffi::CL_DEPTH, ffi::CL_DEPTH_STENCIL];

const KNOWN_CHANNEL_TYPES: &[cl_uint] = &[ffi::CL_SNORM_INT8, ffi::CL_SNORM_INT16,
    ffi::CL_UNORM_INT8, ffi::CL_UNORM_INT16, ffi::CL_UNORM_SHORT_565, ffi::CL_UNORM_SHORT_555,
    ffi::CL_UNORM_INT_101010, ffi::CL_SIGNED_INT8, ffi::CL_SIGNED_INT16, ffi::CL_SIGNED_INT32,
    ffi::CL_UNSIGNED_INT8, ffi::CL_UNSIGNED_INT16, ffi::CL_UNSIGNED_INT32, ffi::CL_HALF_FLOAT,
    ffi::CL_FLOAT, ffi::CL_UNORM_INT24];

const MAX_IMAGE_2D: usize = 8192;
const MAX_IMAGE_3D: usize = 2048;
const MAX_IMAGE_ARRAY: usize = 2048;
const MAX_IMAGE_BUFFER: usize = 65536;

//=============================================================================
//================================= HELPERS ===================================
//=============================================================================

fn check_mem_flags(flags: cl_mem_flags, host_ptr: *mut c_void) -> Result<(), cl_int> {
    if flags & !(ACCESS_FLAGS | HOST_ACCESS_FLAGS | HOST_PTR_FLAGS) != 0
            || (flags & ACCESS_FLAGS).count_ones() > 1
            || (flags & HOST_ACCESS_FLAGS).count_ones() > 1
            || (flags & ffi::CL_MEM_USE_HOST_PTR != 0
                && flags & (ffi::CL_MEM_ALLOC_HOST_PTR | ffi::CL_MEM_COPY_HOST_PTR) != 0) {
        return Err(ffi::CL_INVALID_VALUE);
    }
    let wants_ptr = flags & (ffi::CL_MEM_USE_HOST_PTR | ffi::CL_MEM_COPY_HOST_PTR) != 0;
    if wants_ptr == host_ptr.is_null() {
        return Err(ffi::CL_INVALID_HOST_PTR);
    }
    Ok(())
}

fn new_mem(context: usize, flags: cl_mem_flags, mem_type: cl_uint, size: usize,
        storage: Rc<RefCell<Vec<u8>>>, host_ptr: *mut c_void) -> MemObj
{
    MemObj {
        context,
        flags,
        mem_type,
        size,
        storage,
        offset: 0,
        parent: None,
        host_ptr: if flags & ffi::CL_MEM_USE_HOST_PTR != 0 { host_ptr as usize } else { 0 },
        image: None,
        destructors: Vec::new(),
        maps: Vec::new(),
    }
}

/// Looks up a buffer used by a command on a queue of `context`.
fn buffer_in(s: &State, handle: cl_mem, context: usize) -> Result<&MemObj, cl_int> {
    let mem = s.mem(handle as usize)?;
    if mem.mem_type != ffi::CL_MEM_OBJECT_BUFFER {
        return Err(ffi::CL_INVALID_MEM_OBJECT);
    }
    if mem.context != context {
        return Err(ffi::CL_INVALID_CONTEXT);
    }
    Ok(mem)
}

/// Looks up an image used by a command on a queue of `context`.
fn image_in(s: &State, handle: cl_mem, context: usize) -> Result<(&MemObj, ImageMeta), cl_int> {
    let mem = s.mem(handle as usize)?;
    let meta = mem.image.ok_or(ffi::CL_INVALID_MEM_OBJECT)?;
    if mem.context != context {
        return Err(ffi::CL_INVALID_CONTEXT);
    }
    Ok((mem, meta))
}

/// Returns `offset + len` if the range lies within `size` bytes.
fn range_end(offset: usize, len: usize, size: usize) -> Result<usize, cl_int> {
    match offset.checked_add(len) {
        Some(end) if len > 0 && end <= size => Ok(end),
        _ => Err(ffi::CL_INVALID_VALUE),
    }
}

unsafe fn read3(ptr: *const size_t) -> Result<[usize; 3], cl_int> {
    if ptr.is_null() {
        return Err(ffi::CL_INVALID_VALUE);
    }
    Ok([*ptr, *ptr.add(1), *ptr.add(2)])
}

/// Resolves zero pitches of a rectangular region to tightly packed ones.
fn rect_pitches(region: [usize; 3], row_pitch: usize, slice_pitch: usize)
        -> Result<(usize, usize), cl_int>
{
    let row = if row_pitch == 0 { region[0] } else { row_pitch };
    if row < region[0] {
        return Err(ffi::CL_INVALID_VALUE);
    }
    let slice = if slice_pitch == 0 { row * region[1] } else { slice_pitch };
    if slice < row * region[1] || slice % row != 0 {
        return Err(ffi::CL_INVALID_VALUE);
    }
    Ok((row, slice))
}

/// Returns the first byte and one past the last byte a rectangular region
/// touches.
fn rect_span(origin: [usize; 3], region: [usize; 3], pitches: (usize, usize)) -> (usize, usize) {
    let start = origin[2] * pitches.1 + origin[1] * pitches.0 + origin[0];
    let end = start + (region[2] - 1) * pitches.1 + (region[1] - 1) * pitches.0 + region[0];
    (start, end)
}

/// Copies a region of `region[0]` bytes by `region[1]` rows by `region[2]`
/// slices. `src` and `dst` point at the first byte of the region.
unsafe fn copy_rect(src: *const u8, src_pitches: (usize, usize), dst: *mut u8,
        dst_pitches: (usize, usize), region: [usize; 3])
{
    for z in 0..region[2] {
        for y in 0..region[1] {
            let src_off = z * src_pitches.1 + y * src_pitches.0;
            let dst_off = z * dst_pitches.1 + y * dst_pitches.0;
            ptr::copy(src.add(src_off), dst.add(dst_off), region[0]);
        }
    }
}

fn check_image_region(meta: &ImageMeta, origin: [usize; 3], region: [usize; 3])
        -> Result<(), cl_int>
{
    let extents = meta.extents();
    for dim in 0..3 {
        match origin[dim].checked_add(region[dim]) {
            Some(end) if region[dim] > 0 && end <= extents[dim] => (),
            _ => return Err(ffi::CL_INVALID_VALUE),
        }
    }
    Ok(())
}

fn image_offset(meta: &ImageMeta, origin: [usize; 3]) -> usize {
    origin[0] * meta.elem_size + origin[1] * meta.row_pitch() + origin[2] * meta.slice_pitch()
}

fn image_pitches(meta: &ImageMeta) -> (usize, usize) {
    (meta.row_pitch(), meta.slice_pitch())
}

/// Returns the slice pitch reported for an image: zero for images without
/// slices.
fn reported_slice_pitch(meta: &ImageMeta) -> usize {
    match meta.image_type {
        ffi::CL_MEM_OBJECT_IMAGE1D_ARRAY => meta.row_pitch(),
        ffi::CL_MEM_OBJECT_IMAGE2D_ARRAY | ffi::CL_MEM_OBJECT_IMAGE3D => meta.slice_pitch(),
        _ => 0,
    }
}

/// Resolves the host pitches of an image transfer.
fn host_image_pitches(meta: &ImageMeta, region: [usize; 3], row_pitch: usize,
        slice_pitch: usize) -> Result<(usize, usize), cl_int>
{
    rect_pitches([region[0] * meta.elem_size, region[1], region[2]], row_pitch, slice_pitch)
}

//=============================================================================
//================================= BUFFERS ===================================
//=============================================================================

pub(super) unsafe extern "system" fn clCreateBuffer(context: cl_context, flags: cl_mem_flags,
        size: size_t, host_ptr: *mut c_void, errcode_ret: *mut cl_int) -> cl_mem
{
    create(errcode_ret, call("clCreateBuffer", |s| {
        let context = context as usize;
        s.context(context)?;
        check_mem_flags(flags, host_ptr)?;
        if size == 0 || size > state::MAX_MEM_ALLOC_SIZE {
            return Err(ffi::CL_INVALID_BUFFER_SIZE);
        }

        let mut storage = vec![0u8; size];
        if !host_ptr.is_null() {
            ptr::copy_nonoverlapping(host_ptr as *const u8, storage.as_mut_ptr(), size);
        }
        s.retain_implicit(context);
        let mem = new_mem(context, flags, ffi::CL_MEM_OBJECT_BUFFER, size,
            Rc::new(RefCell::new(storage)), host_ptr);
        Ok(s.insert(ObjKind::Mem(mem)))
    }))
}

pub(super) unsafe extern "system" fn clCreateSubBuffer(buffer: cl_mem, flags: cl_mem_flags,
        buffer_create_type: cl_buffer_create_type, buffer_create_info: *const c_void,
        errcode_ret: *mut cl_int) -> cl_mem
{
    create(errcode_ret, call("clCreateSubBuffer", |s| {
        let parent_handle = buffer as usize;
        let parent = s.mem(parent_handle)?;
        if parent.mem_type != ffi::CL_MEM_OBJECT_BUFFER || parent.parent.is_some() {
            return Err(ffi::CL_INVALID_MEM_OBJECT);
        }
        if buffer_create_type != ffi::CL_BUFFER_CREATE_TYPE_REGION
                || buffer_create_info.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        if flags & HOST_PTR_FLAGS != 0 {
            return Err(ffi::CL_INVALID_VALUE);
        }
        check_mem_flags(flags, ptr::null_mut())?;

        // Access flags which contradict the parent's are rejected; missing
        // ones are inherited.
        let parent_access = parent.flags & ACCESS_FLAGS;
        let access = match flags & ACCESS_FLAGS {
            0 => parent_access,
            a if parent_access == 0 || parent_access == ffi::CL_MEM_READ_WRITE
                || a == parent_access => a,
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        let host_access = match flags & HOST_ACCESS_FLAGS {
            0 => parent.flags & HOST_ACCESS_FLAGS,
            h => h,
        };

        let region = *(buffer_create_info as *const cl_buffer_region);
        if region.size == 0 {
            return Err(ffi::CL_INVALID_BUFFER_SIZE);
        }
        range_end(region.origin, region.size, parent.size)?;
        if region.origin % (state::MEM_BASE_ADDR_ALIGN as usize / 8) != 0 {
            return Err(ffi::CL_MISALIGNED_SUB_BUFFER_OFFSET);
        }

        let mem = MemObj {
            offset: parent.offset + region.origin,
            parent: Some(parent_handle),
            host_ptr: if parent.host_ptr != 0 { parent.host_ptr + region.origin } else { 0 },
            ..new_mem(parent.context, access | host_access
                | (parent.flags & HOST_PTR_FLAGS), ffi::CL_MEM_OBJECT_BUFFER, region.size,
                parent.storage.clone(), ptr::null_mut())
        };
        let context = mem.context;
        s.retain_implicit(parent_handle);
        s.retain_implicit(context);
        Ok(s.insert(ObjKind::Mem(mem)))
    }))
}

pub(super) unsafe extern "system" fn clRetainMemObject(memobj: cl_mem) -> cl_int {
    status(call("clRetainMemObject", |s| s.retain(memobj as usize, Kind::Mem)))
}

pub(super) unsafe extern "system" fn clReleaseMemObject(memobj: cl_mem) -> cl_int {
    status(call("clReleaseMemObject", |s| s.release(memobj as usize, Kind::Mem)))
}

pub(super) unsafe extern "system" fn clSetMemObjectDestructorCallback(memobj: cl_mem,
        pfn_notify: Option<cl_mem_destructor_fn>, user_data: *mut c_void) -> cl_int
{
    status(call("clSetMemObjectDestructorCallback", |s| {
        let mem = s.mem_mut(memobj as usize)?;
        let f = pfn_notify.ok_or(ffi::CL_INVALID_VALUE)?;
        mem.destructors.push((f, user_data as usize));
        Ok(())
    }))
}

pub(super) unsafe extern "system" fn clGetMemObjectInfo(memobj: cl_mem, param_name: cl_mem_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int
{
    status(call("clGetMemObjectInfo", |s| {
        let handle = memobj as usize;
        let mem = s.mem(handle)?;
        let associated = mem.parent.or_else(|| mem.image.and_then(|img| img.buffer));
        let bytes = match param_name {
            ffi::CL_MEM_TYPE => uint(mem.mem_type),
            ffi::CL_MEM_FLAGS => ulong(mem.flags),
            ffi::CL_MEM_SIZE => size(mem.size),
            ffi::CL_MEM_HOST_PTR => size(mem.host_ptr),
            ffi::CL_MEM_MAP_COUNT => uint(mem.maps.len() as cl_uint),
            ffi::CL_MEM_REFERENCE_COUNT => uint(s.refcount_of(handle, Kind::Mem)?),
            ffi::CL_MEM_CONTEXT => size(mem.context),
            ffi::CL_MEM_ASSOCIATED_MEMOBJECT => size(associated.unwrap_or(0)),
            ffi::CL_MEM_OFFSET => size(if mem.parent.is_some() { mem.offset } else { 0 }),
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueReadBuffer(command_queue: cl_command_queue,
        buffer: cl_mem, blocking_read: cl_bool, offset: size_t, cb: size_t, ptr: *mut c_void,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueReadBuffer", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let mem = buffer_in(s, buffer, context)?;
        range_end(offset, cb, mem.size)?;
        if ptr.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        if !mem.host_readable() {
            return Err(ffi::CL_INVALID_OPERATION);
        }
        if !failed {
            ptr::copy_nonoverlapping(mem.host_address(offset), ptr as *mut u8, cb);
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_READ_BUFFER, blocking_read != 0,
            failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueWriteBuffer(command_queue: cl_command_queue,
        buffer: cl_mem, blocking_write: cl_bool, offset: size_t, cb: size_t,
        ptr: *const c_void, num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueWriteBuffer", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let mem = buffer_in(s, buffer, context)?;
        range_end(offset, cb, mem.size)?;
        if ptr.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        if !mem.host_writable() {
            return Err(ffi::CL_INVALID_OPERATION);
        }
        if !failed {
            ptr::copy_nonoverlapping(ptr as *const u8, mem.host_address(offset), cb);
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_WRITE_BUFFER, blocking_write != 0,
            failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueReadBufferRect(command_queue: cl_command_queue,
        buffer: cl_mem, blocking_read: cl_bool, buffer_origin: *const size_t,
        host_origin: *const size_t, region: *const size_t, buffer_row_pitch: size_t,
        buffer_slice_pitch: size_t, host_row_pitch: size_t, host_slice_pitch: size_t,
        ptr: *mut c_void, num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueReadBufferRect", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let mem = buffer_in(s, buffer, context)?;
        let (buf_origin, host_origin, region) =
            (read3(buffer_origin)?, read3(host_origin)?, read3(region)?);
        if ptr.is_null() || region.contains(&0) {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let buf_pitches = rect_pitches(region, buffer_row_pitch, buffer_slice_pitch)?;
        let host_pitches = rect_pitches(region, host_row_pitch, host_slice_pitch)?;
        let (buf_start, buf_end) = rect_span(buf_origin, region, buf_pitches);
        if buf_end > mem.size {
            return Err(ffi::CL_INVALID_VALUE);
        }
        if !mem.host_readable() {
            return Err(ffi::CL_INVALID_OPERATION);
        }
        if !failed {
            let (host_start, _) = rect_span(host_origin, region, host_pitches);
            copy_rect(mem.host_address(buf_start), buf_pitches,
                (ptr as *mut u8).add(host_start), host_pitches, region);
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_READ_BUFFER_RECT, blocking_read != 0,
            failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueWriteBufferRect(command_queue: cl_command_queue,
        buffer: cl_mem, blocking_write: cl_bool, buffer_origin: *const size_t,
        host_origin: *const size_t, region: *const size_t, buffer_row_pitch: size_t,
        buffer_slice_pitch: size_t, host_row_pitch: size_t, host_slice_pitch: size_t,
        ptr: *const c_void, num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueWriteBufferRect", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let mem = buffer_in(s, buffer, context)?;
        let (buf_origin, host_origin, region) =
            (read3(buffer_origin)?, read3(host_origin)?, read3(region)?);
        if ptr.is_null() || region.contains(&0) {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let buf_pitches = rect_pitches(region, buffer_row_pitch, buffer_slice_pitch)?;
        let host_pitches = rect_pitches(region, host_row_pitch, host_slice_pitch)?;
        let (buf_start, buf_end) = rect_span(buf_origin, region, buf_pitches);
        if buf_end > mem.size {
            return Err(ffi::CL_INVALID_VALUE);
        }
        if !mem.host_writable() {
            return Err(ffi::CL_INVALID_OPERATION);
        }
        if !failed {
            let (host_start, _) = rect_span(host_origin, region, host_pitches);
            copy_rect((ptr as *const u8).add(host_start), host_pitches,
                mem.host_address(buf_start), buf_pitches, region);
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_WRITE_BUFFER_RECT,
            blocking_write != 0, failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueFillBuffer(command_queue: cl_command_queue,
        buffer: cl_mem, pattern: *const c_void, pattern_size: size_t, offset: size_t,
        size: size_t, num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueFillBuffer", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let mem = buffer_in(s, buffer, context)?;
        if pattern.is_null() || !pattern_size.is_power_of_two() || pattern_size > 128
                || offset % pattern_size != 0 || size % pattern_size != 0 {
            return Err(ffi::CL_INVALID_VALUE);
        }
        range_end(offset, size, mem.size)?;
        if !failed {
            let dst = mem.host_address(offset);
            for idx in 0..size / pattern_size {
                ptr::copy_nonoverlapping(pattern as *const u8, dst.add(idx * pattern_size),
                    pattern_size);
            }
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_FILL_BUFFER, false, failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueCopyBuffer(command_queue: cl_command_queue,
        src_buffer: cl_mem, dst_buffer: cl_mem, src_offset: size_t, dst_offset: size_t,
        cb: size_t, num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueCopyBuffer", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let src = buffer_in(s, src_buffer, context)?;
        let dst = buffer_in(s, dst_buffer, context)?;
        range_end(src_offset, cb, src.size)?;
        range_end(dst_offset, cb, dst.size)?;

        if Rc::ptr_eq(&src.storage, &dst.storage) {
            let src_start = src.offset + src_offset;
            let dst_start = dst.offset + dst_offset;
            if src_start < dst_start + cb && dst_start < src_start + cb {
                return Err(ffi::CL_MEM_COPY_OVERLAP);
            }
        }
        if !failed {
            ptr::copy(src.host_address(src_offset), dst.host_address(dst_offset), cb);
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_COPY_BUFFER, false, failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueCopyBufferRect(command_queue: cl_command_queue,
        src_buffer: cl_mem, dst_buffer: cl_mem, src_origin: *const size_t,
        dst_origin: *const size_t, region: *const size_t, src_row_pitch: size_t,
        src_slice_pitch: size_t, dst_row_pitch: size_t, dst_slice_pitch: size_t,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueCopyBufferRect", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let src = buffer_in(s, src_buffer, context)?;
        let dst = buffer_in(s, dst_buffer, context)?;
        let (src_origin, dst_origin, region) =
            (read3(src_origin)?, read3(dst_origin)?, read3(region)?);
        if region.contains(&0) {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let src_pitches = rect_pitches(region, src_row_pitch, src_slice_pitch)?;
        let dst_pitches = rect_pitches(region, dst_row_pitch, dst_slice_pitch)?;
        let (src_start, src_end) = rect_span(src_origin, region, src_pitches);
        let (dst_start, dst_end) = rect_span(dst_origin, region, dst_pitches);
        if src_end > src.size || dst_end > dst.size {
            return Err(ffi::CL_INVALID_VALUE);
        }

        if Rc::ptr_eq(&src.storage, &dst.storage) {
            let (a0, a1) = (src.offset + src_start, src.offset + src_end);
            let (b0, b1) = (dst.offset + dst_start, dst.offset + dst_end);
            if a0 < b1 && b0 < a1 {
                return Err(ffi::CL_MEM_COPY_OVERLAP);
            }
        }
        if !failed {
            copy_rect(src.host_address(src_start), src_pitches, dst.host_address(dst_start),
                dst_pitches, region);
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_COPY_BUFFER_RECT, false, failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueMapBuffer(command_queue: cl_command_queue,
        buffer: cl_mem, blocking_map: cl_bool, map_flags: cl_map_flags, offset: size_t,
        cb: size_t, num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event, errcode_ret: *mut cl_int) -> *mut c_void
{
    create(errcode_ret, call("clEnqueueMapBuffer", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let mem = buffer_in(s, buffer, context)?;
        range_end(offset, cb, mem.size)?;
        check_map_flags(mem, map_flags)?;
        let mapped = mem.host_address(offset) as usize;

        finish_command(s, command_queue, ffi::CL_COMMAND_MAP_BUFFER, blocking_map != 0, failed,
            event)?;
        s.mem_mut(buffer as usize)?.maps.push(mapped);
        Ok(mapped)
    }))
}

fn check_map_flags(mem: &MemObj, map_flags: cl_map_flags) -> Result<(), cl_int> {
    let known = ffi::CL_MAP_READ | ffi::CL_MAP_WRITE | ffi::CL_MAP_WRITE_INVALIDATE_REGION;
    if map_flags & !known != 0 || (map_flags & ffi::CL_MAP_WRITE_INVALIDATE_REGION != 0
            && map_flags & (ffi::CL_MAP_READ | ffi::CL_MAP_WRITE) != 0) {
        return Err(ffi::CL_INVALID_VALUE);
    }
    if (map_flags & ffi::CL_MAP_READ != 0 && !mem.host_readable())
            || (map_flags & (ffi::CL_MAP_WRITE | ffi::CL_MAP_WRITE_INVALIDATE_REGION) != 0
                && !mem.host_writable()) {
        return Err(ffi::CL_INVALID_OPERATION);
    }
    Ok(())
}

pub(super) unsafe extern "system" fn clEnqueueUnmapMemObject(command_queue: cl_command_queue,
        memobj: cl_mem, mapped_ptr: *mut c_void, num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event, event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueUnmapMemObject", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let mem = s.mem_mut(memobj as usize)?;
        if mem.context != context {
            return Err(ffi::CL_INVALID_CONTEXT);
        }
        match mem.maps.iter().position(|&p| p == mapped_ptr as usize) {
            Some(idx) => mem.maps.remove(idx),
            None => return Err(ffi::CL_INVALID_VALUE),
        };
        finish_command(s, command_queue, ffi::CL_COMMAND_UNMAP_MEM_OBJECT, false, failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueMigrateMemObjects(command_queue: cl_command_queue,
        num_mem_objects: cl_uint, mem_objects: *const cl_mem, flags: cl_mem_migration_flags,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueMigrateMemObjects", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        if num_mem_objects == 0 || mem_objects.is_null() || flags
                & !(ffi::CL_MIGRATE_MEM_OBJECT_HOST
                    | ffi::CL_MIGRATE_MEM_OBJECT_CONTENT_UNDEFINED) != 0 {
            return Err(ffi::CL_INVALID_VALUE);
        }
        for handle in handles(num_mem_objects, mem_objects) {
            if s.mem(handle)?.context != context {
                return Err(ffi::CL_INVALID_CONTEXT);
            }
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_MIGRATE_MEM_OBJECTS, false, failed,
            event)
    }))
}

//=============================================================================
//================================== IMAGES ===================================
//=============================================================================

fn format_element_size(format: &cl_image_format) -> Result<usize, cl_int> {
    let found = SUPPORTED_FORMATS.iter().find(|&&(order, data_type, _)|
        order == format.image_channel_order && data_type == format.image_channel_data_type);
    match found {
        Some(&(_, _, elem_size)) => Ok(elem_size),
        None if KNOWN_CHANNEL_ORDERS.contains(&format.image_channel_order)
            && KNOWN_CHANNEL_TYPES.contains(&format.image_channel_data_type) =>
                Err(ffi::CL_IMAGE_FORMAT_NOT_SUPPORTED),
        None => Err(ffi::CL_INVALID_IMAGE_FORMAT_DESCRIPTOR),
    }
}

/// Validates an image descriptor against the device limits.
fn image_meta(s: &State, format: cl_image_format, elem_size: usize, desc: &cl_image_desc)
        -> Result<ImageMeta, cl_int>
{
    let meta = ImageMeta {
        format,
        elem_size,
        image_type: desc.image_type,
        width: desc.image_width,
        height: desc.image_height,
        depth: desc.image_depth,
        array_size: desc.image_array_size,
        buffer: if desc.buffer.is_null() { None } else { Some(desc.buffer as usize) },
    };

    let (limits, needs): ([usize; 3], [bool; 4]) = match meta.image_type {
        // [width, height, depth] limits; [height, depth, array, buffer] used
        ffi::CL_MEM_OBJECT_IMAGE1D => ([MAX_IMAGE_2D, 0, 0], [false, false, false, false]),
        ffi::CL_MEM_OBJECT_IMAGE1D_BUFFER =>
            ([MAX_IMAGE_BUFFER, 0, 0], [false, false, false, true]),
        ffi::CL_MEM_OBJECT_IMAGE1D_ARRAY => ([MAX_IMAGE_2D, 0, 0], [false, false, true, false]),
        ffi::CL_MEM_OBJECT_IMAGE2D =>
            ([MAX_IMAGE_2D, MAX_IMAGE_2D, 0], [true, false, false, false]),
        ffi::CL_MEM_OBJECT_IMAGE2D_ARRAY =>
            ([MAX_IMAGE_2D, MAX_IMAGE_2D, 0], [true, false, true, false]),
        ffi::CL_MEM_OBJECT_IMAGE3D =>
            ([MAX_IMAGE_3D, MAX_IMAGE_3D, MAX_IMAGE_3D], [true, true, false, false]),
        _ => return Err(ffi::CL_INVALID_IMAGE_DESCRIPTOR),
    };

    if meta.width == 0 || (needs[0] && meta.height == 0) || (needs[1] && meta.depth == 0)
            || (needs[2] && meta.array_size == 0) || needs[3] != meta.buffer.is_some()
            || desc.num_mip_levels != 0 || desc.num_samples != 0 {
        return Err(ffi::CL_INVALID_IMAGE_DESCRIPTOR);
    }
    if meta.width > limits[0] || (needs[0] && meta.height > limits[1])
            || (needs[1] && meta.depth > limits[2])
            || (needs[2] && meta.array_size > MAX_IMAGE_ARRAY) {
        return Err(ffi::CL_INVALID_IMAGE_SIZE);
    }

    if let Some(buffer) = meta.buffer {
        let buf = s.mem(buffer).map_err(|_| ffi::CL_INVALID_IMAGE_DESCRIPTOR)?;
        if buf.mem_type != ffi::CL_MEM_OBJECT_BUFFER {
            return Err(ffi::CL_INVALID_IMAGE_DESCRIPTOR);
        }
        if meta.size() > buf.size {
            return Err(ffi::CL_INVALID_IMAGE_SIZE);
        }
    }
    Ok(meta)
}

pub(super) unsafe extern "system" fn clCreateImage(context: cl_context, flags: cl_mem_flags,
        image_format: *const cl_image_format, image_desc: *const cl_image_desc,
        host_ptr: *mut c_void, errcode_ret: *mut cl_int) -> cl_mem
{
    create(errcode_ret, call("clCreateImage", |s| {
        let context = context as usize;
        s.context(context)?;
        check_mem_flags(flags, host_ptr)?;
        if image_format.is_null() {
            return Err(ffi::CL_INVALID_IMAGE_FORMAT_DESCRIPTOR);
        }
        if image_desc.is_null() {
            return Err(ffi::CL_INVALID_IMAGE_DESCRIPTOR);
        }
        let format = *image_format;
        let desc = *image_desc;
        let elem_size = format_element_size(&format)?;
        let meta = image_meta(s, format, elem_size, &desc)?;

        if host_ptr.is_null() && (desc.image_row_pitch != 0 || desc.image_slice_pitch != 0) {
            return Err(ffi::CL_INVALID_IMAGE_DESCRIPTOR);
        }
        let extents = meta.extents();
        let tight = (meta.row_pitch(), meta.slice_pitch());
        let host_pitches = rect_pitches([tight.0, extents[1], extents[2]],
            desc.image_row_pitch, desc.image_slice_pitch)
            .map_err(|_| ffi::CL_INVALID_IMAGE_DESCRIPTOR)?;
        if host_pitches.0 % elem_size != 0 {
            return Err(ffi::CL_INVALID_IMAGE_DESCRIPTOR);
        }

        let mem = match meta.buffer {
            Some(buffer) => {
                let buf = s.mem(buffer)?;
                MemObj {
                    offset: buf.offset,
                    image: Some(meta),
                    ..new_mem(context, flags, meta.image_type, meta.size(), buf.storage.clone(),
                        host_ptr)
                }
            },
            None => MemObj {
                image: Some(meta),
                ..new_mem(context, flags, meta.image_type, meta.size(),
                    Rc::new(RefCell::new(vec![0u8; meta.size()])), host_ptr)
            },
        };
        if !host_ptr.is_null() {
            copy_rect(host_ptr as *const u8, host_pitches, mem.host_address(0), tight,
                [tight.0, extents[1], extents[2]]);
        }

        if let Some(buffer) = meta.buffer {
            s.retain_implicit(buffer);
        }
        s.retain_implicit(context);
        Ok(s.insert(ObjKind::Mem(mem)))
    }))
}

pub(super) unsafe extern "system" fn clGetSupportedImageFormats(context: cl_context,
        flags: cl_mem_flags, image_type: cl_mem_object_type, num_entries: cl_uint,
        image_formats: *mut cl_image_format, num_image_formats: *mut cl_uint) -> cl_int
{
    status(call("clGetSupportedImageFormats", |s| {
        s.context(context as usize)?;
        check_mem_flags(flags & !(ffi::CL_MEM_USE_HOST_PTR | ffi::CL_MEM_COPY_HOST_PTR),
            ptr::null_mut())?;
        match image_type {
            ffi::CL_MEM_OBJECT_IMAGE1D | ffi::CL_MEM_OBJECT_IMAGE1D_BUFFER
                | ffi::CL_MEM_OBJECT_IMAGE1D_ARRAY | ffi::CL_MEM_OBJECT_IMAGE2D
                | ffi::CL_MEM_OBJECT_IMAGE2D_ARRAY | ffi::CL_MEM_OBJECT_IMAGE3D => (),
            _ => return Err(ffi::CL_INVALID_VALUE),
        }
        if num_entries == 0 && !image_formats.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }

        if !image_formats.is_null() {
            for (idx, &(order, data_type, _)) in SUPPORTED_FORMATS.iter()
                    .take(num_entries as usize).enumerate() {
                *image_formats.add(idx) = cl_image_format {
                    image_channel_order: order,
                    image_channel_data_type: data_type,
                };
            }
        }
        if !num_image_formats.is_null() {
            *num_image_formats = SUPPORTED_FORMATS.len() as cl_uint;
        }
        Ok(())
    }))
}

pub(super) unsafe extern "system" fn clGetImageInfo(image: cl_mem, param_name: cl_image_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int
{
    status(call("clGetImageInfo", |s| {
        let meta = s.mem(image as usize)?.image.ok_or(ffi::CL_INVALID_MEM_OBJECT)?;
        let is = |types: &[cl_uint]| types.contains(&meta.image_type);
        let bytes = match param_name {
            ffi::CL_IMAGE_FORMAT => image_format(&meta.format),
            ffi::CL_IMAGE_ELEMENT_SIZE => size(meta.elem_size),
            ffi::CL_IMAGE_ROW_PITCH => size(meta.row_pitch()),
            ffi::CL_IMAGE_SLICE_PITCH => size(reported_slice_pitch(&meta)),
            ffi::CL_IMAGE_WIDTH => size(meta.width),
            ffi::CL_IMAGE_HEIGHT => size(if is(&[ffi::CL_MEM_OBJECT_IMAGE2D,
                ffi::CL_MEM_OBJECT_IMAGE2D_ARRAY, ffi::CL_MEM_OBJECT_IMAGE3D]) {
                meta.height
            } else {
                0
            }),
            ffi::CL_IMAGE_DEPTH =>
                size(if is(&[ffi::CL_MEM_OBJECT_IMAGE3D]) { meta.depth } else { 0 }),
            ffi::CL_IMAGE_ARRAY_SIZE => size(if is(&[ffi::CL_MEM_OBJECT_IMAGE1D_ARRAY,
                ffi::CL_MEM_OBJECT_IMAGE2D_ARRAY]) {
                meta.array_size
            } else {
                0
            }),
            ffi::CL_IMAGE_BUFFER => size(meta.buffer.unwrap_or(0)),
            ffi::CL_IMAGE_NUM_MIP_LEVELS | ffi::CL_IMAGE_NUM_SAMPLES => uint(0),
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueReadImage(command_queue: cl_command_queue,
        image: cl_mem, blocking_read: cl_bool, origin: *const size_t, region: *const size_t,
        row_pitch: size_t, slice_pitch: size_t, ptr: *mut c_void,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueReadImage", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let (mem, meta) = image_in(s, image, context)?;
        let (origin, region) = (read3(origin)?, read3(region)?);
        check_image_region(&meta, origin, region)?;
        if ptr.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let host_pitches = host_image_pitches(&meta, region, row_pitch, slice_pitch)?;
        if !mem.host_readable() {
            return Err(ffi::CL_INVALID_OPERATION);
        }
        if !failed {
            copy_rect(mem.host_address(image_offset(&meta, origin)), image_pitches(&meta),
                ptr as *mut u8, host_pitches, [region[0] * meta.elem_size, region[1], region[2]]);
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_READ_IMAGE, blocking_read != 0, failed,
            event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueWriteImage(command_queue: cl_command_queue,
        image: cl_mem, blocking_write: cl_bool, origin: *const size_t, region: *const size_t,
        input_row_pitch: size_t, input_slice_pitch: size_t, ptr: *const c_void,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueWriteImage", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let (mem, meta) = image_in(s, image, context)?;
        let (origin, region) = (read3(origin)?, read3(region)?);
        check_image_region(&meta, origin, region)?;
        if ptr.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let host_pitches = host_image_pitches(&meta, region, input_row_pitch,
            input_slice_pitch)?;
        if !mem.host_writable() {
            return Err(ffi::CL_INVALID_OPERATION);
        }
        if !failed {
            copy_rect(ptr as *const u8, host_pitches,
                mem.host_address(image_offset(&meta, origin)), image_pitches(&meta),
                [region[0] * meta.elem_size, region[1], region[2]]);
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_WRITE_IMAGE, blocking_write != 0,
            failed, event)
    }))
}

/// Converts an RGBA fill color into one pixel of `format`.
unsafe fn fill_pixel(format: &cl_image_format, color: *const c_void) -> Vec<u8> {
    let floats = color as *const f32;
    let uints = color as *const u32;
    let channels: &[usize] = match format.image_channel_order {
        ffi::CL_BGRA => &[2, 1, 0, 3],
        ffi::CL_R => &[0],
        ffi::CL_RG => &[0, 1],
        _ => &[0, 1, 2, 3],
    };

    let mut pixel = Vec::with_capacity(16);
    for &ch in channels {
        match format.image_channel_data_type {
            ffi::CL_UNORM_INT8 =>
                pixel.push(((*floats.add(ch)).clamp(0.0, 1.0) * 255.0).round() as u8),
            ffi::CL_UNSIGNED_INT8 => pixel.push((*uints.add(ch)).min(255) as u8),
            ffi::CL_FLOAT => pixel.extend_from_slice(&(*floats.add(ch)).to_ne_bytes()),
            _ => pixel.extend_from_slice(&(*uints.add(ch)).to_ne_bytes()),
        }
    }
    pixel
}

pub(super) unsafe extern "system" fn clEnqueueFillImage(command_queue: cl_command_queue,
        image: cl_mem, fill_color: *const c_void, origin: *const size_t, region: *const size_t,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueFillImage", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let (mem, meta) = image_in(s, image, context)?;
        let (origin, region) = (read3(origin)?, read3(region)?);
        check_image_region(&meta, origin, region)?;
        if fill_color.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        if !failed {
            let pixel = fill_pixel(&meta.format, fill_color);
            let base = mem.host_address(image_offset(&meta, origin));
            let (row_pitch, slice_pitch) = image_pitches(&meta);
            for z in 0..region[2] {
                for y in 0..region[1] {
                    for x in 0..region[0] {
                        let off = z * slice_pitch + y * row_pitch + x * meta.elem_size;
                        ptr::copy_nonoverlapping(pixel.as_ptr(), base.add(off), pixel.len());
                    }
                }
            }
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_FILL_IMAGE, false, failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueCopyImage(command_queue: cl_command_queue,
        src_image: cl_mem, dst_image: cl_mem, src_origin: *const size_t,
        dst_origin: *const size_t, region: *const size_t, num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event, event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueCopyImage", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let (src, src_meta) = image_in(s, src_image, context)?;
        let (dst, dst_meta) = image_in(s, dst_image, context)?;
        if src_meta.format != dst_meta.format {
            return Err(ffi::CL_IMAGE_FORMAT_MISMATCH);
        }
        let (src_origin, dst_origin, region) =
            (read3(src_origin)?, read3(dst_origin)?, read3(region)?);
        check_image_region(&src_meta, src_origin, region)?;
        check_image_region(&dst_meta, dst_origin, region)?;

        if src_image == dst_image && (0..3).all(|d| src_origin[d] < dst_origin[d] + region[d]
                && dst_origin[d] < src_origin[d] + region[d]) {
            return Err(ffi::CL_MEM_COPY_OVERLAP);
        }
        if !failed {
            copy_rect(src.host_address(image_offset(&src_meta, src_origin)),
                image_pitches(&src_meta),
                dst.host_address(image_offset(&dst_meta, dst_origin)),
                image_pitches(&dst_meta),
                [region[0] * src_meta.elem_size, region[1], region[2]]);
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_COPY_IMAGE, false, failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueCopyImageToBuffer(command_queue: cl_command_queue,
        src_image: cl_mem, dst_buffer: cl_mem, src_origin: *const size_t,
        region: *const size_t, dst_offset: size_t, num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event, event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueCopyImageToBuffer", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let (src, meta) = image_in(s, src_image, context)?;
        let dst = buffer_in(s, dst_buffer, context)?;
        let (src_origin, region) = (read3(src_origin)?, read3(region)?);
        check_image_region(&meta, src_origin, region)?;
        let row = region[0] * meta.elem_size;
        range_end(dst_offset, row * region[1] * region[2], dst.size)?;
        if !failed {
            copy_rect(src.host_address(image_offset(&meta, src_origin)), image_pitches(&meta),
                dst.host_address(dst_offset), (row, row * region[1]),
                [row, region[1], region[2]]);
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_COPY_IMAGE_TO_BUFFER, false, failed,
            event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueCopyBufferToImage(command_queue: cl_command_queue,
        src_buffer: cl_mem, dst_image: cl_mem, src_offset: size_t, dst_origin: *const size_t,
        region: *const size_t, num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event, event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueCopyBufferToImage", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let src = buffer_in(s, src_buffer, context)?;
        let (dst, meta) = image_in(s, dst_image, context)?;
        let (dst_origin, region) = (read3(dst_origin)?, read3(region)?);
        check_image_region(&meta, dst_origin, region)?;
        let row = region[0] * meta.elem_size;
        range_end(src_offset, row * region[1] * region[2], src.size)?;
        if !failed {
            copy_rect(src.host_address(src_offset), (row, row * region[1]),
                dst.host_address(image_offset(&meta, dst_origin)), image_pitches(&meta),
                [row, region[1], region[2]]);
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_COPY_BUFFER_TO_IMAGE, false, failed,
            event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueMapImage(command_queue: cl_command_queue,
        image: cl_mem, blocking_map: cl_bool, map_flags: cl_map_flags, origin: *const size_t,
        region: *const size_t, image_row_pitch: *mut size_t, image_slice_pitch: *mut size_t,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event, errcode_ret: *mut cl_int) -> *mut c_void
{
    create(errcode_ret, call("clEnqueueMapImage", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let (mem, meta) = image_in(s, image, context)?;
        let (origin, region) = (read3(origin)?, read3(region)?);
        check_image_region(&meta, origin, region)?;
        check_map_flags(mem, map_flags)?;
        if image_row_pitch.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let has_slices = reported_slice_pitch(&meta) != 0;
        if has_slices && image_slice_pitch.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let mapped = mem.host_address(image_offset(&meta, origin)) as usize;

        finish_command(s, command_queue, ffi::CL_COMMAND_MAP_IMAGE, blocking_map != 0, failed,
            event)?;
        *image_row_pitch = meta.row_pitch();
        if !image_slice_pitch.is_null() {
            *image_slice_pitch = reported_slice_pitch(&meta);
        }
        s.mem_mut(image as usize)?.maps.push(mapped);
        Ok(mapped)
    }))
}

//=============================================================================
//================================= SAMPLERS ==================================
//=============================================================================

pub(super) unsafe extern "system" fn clCreateSampler(context: cl_context,
        normalized_coords: cl_bool, addressing_mode: cl_addressing_mode,
        filter_mode: cl_filter_mode, errcode_ret: *mut cl_int) -> cl_sampler
{
    create(errcode_ret, call("clCreateSampler", |s| {
        let context = context as usize;
        s.context(context)?;
        let addressing_ok = matches!(addressing_mode, ffi::CL_ADDRESS_NONE
            | ffi::CL_ADDRESS_CLAMP_TO_EDGE | ffi::CL_ADDRESS_CLAMP | ffi::CL_ADDRESS_REPEAT
            | ffi::CL_ADDRESS_MIRRORED_REPEAT);
        let filter_ok = matches!(filter_mode, ffi::CL_FILTER_NEAREST | ffi::CL_FILTER_LINEAR);
        if !addressing_ok || !filter_ok || normalized_coords > ffi::CL_TRUE {
            return Err(ffi::CL_INVALID_VALUE);
        }
        s.retain_implicit(context);
        Ok(s.insert(ObjKind::Sampler(SamplerObj {
            context,
            normalized_coords,
            addressing_mode,
            filter_mode,
        })))
    }))
}

pub(super) unsafe extern "system" fn clRetainSampler(sampler: cl_sampler) -> cl_int {
    status(call("clRetainSampler", |s| s.retain(sampler as usize, Kind::Sampler)))
}

pub(super) unsafe extern "system" fn clReleaseSampler(sampler: cl_sampler) -> cl_int {
    status(call("clReleaseSampler", |s| s.release(sampler as usize, Kind::Sampler)))
}

pub(super) unsafe extern "system" fn clGetSamplerInfo(sampler: cl_sampler,
        param_name: cl_sampler_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int
{
    status(call("clGetSamplerInfo", |s| {
        let handle = sampler as usize;
        let smp = s.sampler(handle)?;
        let bytes = match param_name {
            ffi::CL_SAMPLER_REFERENCE_COUNT => uint(s.refcount_of(handle, Kind::Sampler)?),
            ffi::CL_SAMPLER_CONTEXT => size(smp.context),
            ffi::CL_SAMPLER_NORMALIZED_COORDS => uint(smp.normalized_coords),
            ffi::CL_SAMPLER_ADDRESSING_MODE => uint(smp.addressing_mode),
            ffi::CL_SAMPLER_FILTER_MODE => uint(smp.filter_mode),
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}
