//! The OpenCL entry point table and driver library loader.
//!
//! Every entry point is resolved by name from the driver library at runtime.
//! Entry points introduced with OpenCL 1.2 are optional: a driver which only
//! implements 1.1 still loads, and the missing functions resolve to `None`.
//!

#![allow(non_snake_case)]

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use libloading::Library;
use crate::cl_h::*;

/// Environment variable naming an explicit OpenCL library path, tried before
/// the platform defaults.
pub const LIBRARY_ENV_VAR: &str = "CLBIND_OPENCL_LIBRARY";

#[cfg(target_os = "windows")]
const DEFAULT_LIBRARY_NAMES: &[&str] = &["OpenCL.dll"];

#[cfg(target_os = "macos")]
const DEFAULT_LIBRARY_NAMES: &[&str] = &["/System/Library/Frameworks/OpenCL.framework/OpenCL"];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const DEFAULT_LIBRARY_NAMES: &[&str] = &["libOpenCL.so.1", "libOpenCL.so"];

/// The OpenCL version which introduced an entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// OpenCL 1.0 and 1.1. Loading fails if one of these is missing.
    Core,
    /// OpenCL 1.2. Resolved if present.
    Cl12,
}

/// The name and version requirement of an entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryPoint {
    pub name: &'static str,
    pub requirement: Requirement,
}

/// An error loading the OpenCL library.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Unable to load an OpenCL library (tried: {tried:?}): {reason}")]
    LibraryNotFound { tried: Vec<OsString>, reason: String },
    #[error("The OpenCL library '{library:?}' does not export the required entry point \
        '{name}': {source}")]
    MissingSymbol { library: OsString, name: &'static str, source: libloading::Error },
}

macro_rules! entry_points {
    ($( [$req:ident] fn $name:ident($($arg:ident: $ty:ty),* $(,)?) -> $ret:ty; )*) => {
        /// A table of OpenCL entry points.
        ///
        /// A table loaded from a library keeps that library open for as long
        /// as the table lives. Functions stored in a table built some other
        /// way (`ClApi::empty` plus field assignment) must uphold the
        /// contract of the OpenCL function with the same name.
        pub struct ClApi {
            library: Option<Library>,
            $( pub $name: Option<unsafe extern "system" fn($($arg: $ty),*) -> $ret>, )*
        }

        impl ClApi {
            /// Returns a table with every entry point unresolved.
            pub const fn empty() -> ClApi {
                ClApi {
                    library: None,
                    $( $name: None, )*
                }
            }

            /// Resolves every entry point from `library`.
            unsafe fn resolve(library: Library, path: &OsStr) -> Result<ClApi, LoadError> {
                let mut api = ClApi::empty();
                $(
                    api.$name = match library.get::<unsafe extern "system" fn($($ty),*) -> $ret>(
                            concat!(stringify!($name), "\0").as_bytes()) {
                        Ok(sym) => Some(*sym),
                        Err(source) => match Requirement::$req {
                            Requirement::Core => return Err(LoadError::MissingSymbol {
                                library: path.to_owned(),
                                name: stringify!($name),
                                source,
                            }),
                            Requirement::Cl12 => {
                                log::debug!("clbind_sys: '{}' not exported by {:?}.",
                                    stringify!($name), path);
                                None
                            },
                        },
                    };
                )*
                api.library = Some(library);
                Ok(api)
            }

            /// Returns the name and version requirement of every entry point
            /// in this table.
            pub fn entry_points() -> &'static [EntryPoint] {
                const ENTRY_POINTS: &[EntryPoint] = &[
                    $( EntryPoint { name: stringify!($name), requirement: Requirement::$req }, )*
                ];
                ENTRY_POINTS
            }

            /// Returns `true` if the entry point named `name` has been
            /// resolved.
            pub fn is_available(&self, name: &str) -> bool {
                match name {
                    $( stringify!($name) => self.$name.is_some(), )*
                    _ => false,
                }
            }

            /// Returns a table filled from the link-time declarations in
            /// [`linked`](crate::linked).
            #[cfg(feature = "linked")]
            pub fn linked() -> ClApi {
                ClApi {
                    library: None,
                    $( $name: Some(linked_decls::$name), )*
                }
            }
        }

        /// Entry points declared for static linking against the system
        /// OpenCL library.
        #[cfg(feature = "linked")]
        pub mod linked_decls {
            use crate::cl_h::*;

            #[cfg_attr(target_os = "macos", link(name = "OpenCL", kind = "framework"))]
            #[cfg_attr(not(target_os = "macos"), link(name = "OpenCL"))]
            extern "system" {
                $( pub fn $name($($arg: $ty),*) -> $ret; )*
            }
        }
    };
}

entry_points! {
    // Platform:
    [Core] fn clGetPlatformIDs(num_entries: cl_uint, platforms: *mut cl_platform_id,
        num_platforms: *mut cl_uint) -> cl_int;
    [Core] fn clGetPlatformInfo(platform: cl_platform_id, param_name: cl_platform_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int;

    // Device:
    [Core] fn clGetDeviceIDs(platform: cl_platform_id, device_type: cl_device_type,
        num_entries: cl_uint, devices: *mut cl_device_id, num_devices: *mut cl_uint) -> cl_int;
    [Core] fn clGetDeviceInfo(device: cl_device_id, param_name: cl_device_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int;
    [Cl12] fn clCreateSubDevices(in_device: cl_device_id,
        properties: *const cl_device_partition_property, num_devices: cl_uint,
        out_devices: *mut cl_device_id, num_devices_ret: *mut cl_uint) -> cl_int;
    [Cl12] fn clRetainDevice(device: cl_device_id) -> cl_int;
    [Cl12] fn clReleaseDevice(device: cl_device_id) -> cl_int;

    // Context:
    [Core] fn clCreateContext(properties: *const cl_context_properties, num_devices: cl_uint,
        devices: *const cl_device_id, pfn_notify: Option<cl_context_notify_fn>,
        user_data: *mut c_void, errcode_ret: *mut cl_int) -> cl_context;
    [Core] fn clCreateContextFromType(properties: *const cl_context_properties,
        device_type: cl_device_type, pfn_notify: Option<cl_context_notify_fn>,
        user_data: *mut c_void, errcode_ret: *mut cl_int) -> cl_context;
    [Core] fn clRetainContext(context: cl_context) -> cl_int;
    [Core] fn clReleaseContext(context: cl_context) -> cl_int;
    [Core] fn clGetContextInfo(context: cl_context, param_name: cl_context_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int;

    // Command Queue:
    [Core] fn clCreateCommandQueue(context: cl_context, device: cl_device_id,
        properties: cl_command_queue_properties, errcode_ret: *mut cl_int) -> cl_command_queue;
    [Core] fn clRetainCommandQueue(command_queue: cl_command_queue) -> cl_int;
    [Core] fn clReleaseCommandQueue(command_queue: cl_command_queue) -> cl_int;
    [Core] fn clGetCommandQueueInfo(command_queue: cl_command_queue,
        param_name: cl_command_queue_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int;

    // Memory Object:
    [Core] fn clCreateBuffer(context: cl_context, flags: cl_mem_flags, size: size_t,
        host_ptr: *mut c_void, errcode_ret: *mut cl_int) -> cl_mem;
    [Core] fn clCreateSubBuffer(buffer: cl_mem, flags: cl_mem_flags,
        buffer_create_type: cl_buffer_create_type, buffer_create_info: *const c_void,
        errcode_ret: *mut cl_int) -> cl_mem;
    [Cl12] fn clCreateImage(context: cl_context, flags: cl_mem_flags,
        image_format: *const cl_image_format, image_desc: *const cl_image_desc,
        host_ptr: *mut c_void, errcode_ret: *mut cl_int) -> cl_mem;
    [Core] fn clRetainMemObject(memobj: cl_mem) -> cl_int;
    [Core] fn clReleaseMemObject(memobj: cl_mem) -> cl_int;
    [Core] fn clGetSupportedImageFormats(context: cl_context, flags: cl_mem_flags,
        image_type: cl_mem_object_type, num_entries: cl_uint,
        image_formats: *mut cl_image_format, num_image_formats: *mut cl_uint) -> cl_int;
    [Core] fn clGetMemObjectInfo(memobj: cl_mem, param_name: cl_mem_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int;
    [Core] fn clGetImageInfo(image: cl_mem, param_name: cl_image_info, param_value_size: size_t,
        param_value: *mut c_void, param_value_size_ret: *mut size_t) -> cl_int;
    [Core] fn clSetMemObjectDestructorCallback(memobj: cl_mem,
        pfn_notify: Option<cl_mem_destructor_fn>, user_data: *mut c_void) -> cl_int;

    // Sampler:
    [Core] fn clCreateSampler(context: cl_context, normalized_coords: cl_bool,
        addressing_mode: cl_addressing_mode, filter_mode: cl_filter_mode,
        errcode_ret: *mut cl_int) -> cl_sampler;
    [Core] fn clRetainSampler(sampler: cl_sampler) -> cl_int;
    [Core] fn clReleaseSampler(sampler: cl_sampler) -> cl_int;
    [Core] fn clGetSamplerInfo(sampler: cl_sampler, param_name: cl_sampler_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int;

    // Program Object:
    [Core] fn clCreateProgramWithSource(context: cl_context, count: cl_uint,
        strings: *const *const c_char, lengths: *const size_t, errcode_ret: *mut cl_int)
        -> cl_program;
    [Core] fn clCreateProgramWithBinary(context: cl_context, num_devices: cl_uint,
        device_list: *const cl_device_id, lengths: *const size_t,
        binaries: *const *const u8, binary_status: *mut cl_int, errcode_ret: *mut cl_int)
        -> cl_program;
    [Cl12] fn clCreateProgramWithBuiltInKernels(context: cl_context, num_devices: cl_uint,
        device_list: *const cl_device_id, kernel_names: *const c_char, errcode_ret: *mut cl_int)
        -> cl_program;
    [Core] fn clRetainProgram(program: cl_program) -> cl_int;
    [Core] fn clReleaseProgram(program: cl_program) -> cl_int;
    [Core] fn clBuildProgram(program: cl_program, num_devices: cl_uint,
        device_list: *const cl_device_id, options: *const c_char,
        pfn_notify: Option<cl_program_notify_fn>, user_data: *mut c_void) -> cl_int;
    [Cl12] fn clCompileProgram(program: cl_program, num_devices: cl_uint,
        device_list: *const cl_device_id, options: *const c_char, num_input_headers: cl_uint,
        input_headers: *const cl_program, header_include_names: *const *const c_char,
        pfn_notify: Option<cl_program_notify_fn>, user_data: *mut c_void) -> cl_int;
    [Cl12] fn clLinkProgram(context: cl_context, num_devices: cl_uint,
        device_list: *const cl_device_id, options: *const c_char, num_input_programs: cl_uint,
        input_programs: *const cl_program, pfn_notify: Option<cl_program_notify_fn>,
        user_data: *mut c_void, errcode_ret: *mut cl_int) -> cl_program;
    [Cl12] fn clUnloadPlatformCompiler(platform: cl_platform_id) -> cl_int;
    [Core] fn clGetProgramInfo(program: cl_program, param_name: cl_program_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int;
    [Core] fn clGetProgramBuildInfo(program: cl_program, device: cl_device_id,
        param_name: cl_program_build_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int;

    // Kernel Object:
    [Core] fn clCreateKernel(program: cl_program, kernel_name: *const c_char,
        errcode_ret: *mut cl_int) -> cl_kernel;
    [Core] fn clCreateKernelsInProgram(program: cl_program, num_kernels: cl_uint,
        kernels: *mut cl_kernel, num_kernels_ret: *mut cl_uint) -> cl_int;
    [Core] fn clRetainKernel(kernel: cl_kernel) -> cl_int;
    [Core] fn clReleaseKernel(kernel: cl_kernel) -> cl_int;
    [Core] fn clSetKernelArg(kernel: cl_kernel, arg_index: cl_uint, arg_size: size_t,
        arg_value: *const c_void) -> cl_int;
    [Core] fn clGetKernelInfo(kernel: cl_kernel, param_name: cl_kernel_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int;
    [Cl12] fn clGetKernelArgInfo(kernel: cl_kernel, arg_indx: cl_uint,
        param_name: cl_kernel_arg_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int;
    [Core] fn clGetKernelWorkGroupInfo(kernel: cl_kernel, device: cl_device_id,
        param_name: cl_kernel_work_group_info, param_value_size: size_t,
        param_value: *mut c_void, param_value_size_ret: *mut size_t) -> cl_int;

    // Event Object:
    [Core] fn clWaitForEvents(num_events: cl_uint, event_list: *const cl_event) -> cl_int;
    [Core] fn clGetEventInfo(event: cl_event, param_name: cl_event_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int;
    [Core] fn clCreateUserEvent(context: cl_context, errcode_ret: *mut cl_int) -> cl_event;
    [Core] fn clRetainEvent(event: cl_event) -> cl_int;
    [Core] fn clReleaseEvent(event: cl_event) -> cl_int;
    [Core] fn clSetUserEventStatus(event: cl_event, execution_status: cl_int) -> cl_int;
    [Core] fn clSetEventCallback(event: cl_event, command_exec_callback_type: cl_int,
        pfn_notify: Option<cl_event_notify_fn>, user_data: *mut c_void) -> cl_int;

    // Profiling:
    [Core] fn clGetEventProfilingInfo(event: cl_event, param_name: cl_profiling_info,
        param_value_size: size_t, param_value: *mut c_void, param_value_size_ret: *mut size_t)
        -> cl_int;

    // Flush and Finish:
    [Core] fn clFlush(command_queue: cl_command_queue) -> cl_int;
    [Core] fn clFinish(command_queue: cl_command_queue) -> cl_int;

    // Enqueued Commands:
    [Core] fn clEnqueueReadBuffer(command_queue: cl_command_queue, buffer: cl_mem,
        blocking_read: cl_bool, offset: size_t, cb: size_t, ptr: *mut c_void,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueReadBufferRect(command_queue: cl_command_queue, buffer: cl_mem,
        blocking_read: cl_bool, buffer_origin: *const size_t, host_origin: *const size_t,
        region: *const size_t, buffer_row_pitch: size_t, buffer_slice_pitch: size_t,
        host_row_pitch: size_t, host_slice_pitch: size_t, ptr: *mut c_void,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueWriteBuffer(command_queue: cl_command_queue, buffer: cl_mem,
        blocking_write: cl_bool, offset: size_t, cb: size_t, ptr: *const c_void,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueWriteBufferRect(command_queue: cl_command_queue, buffer: cl_mem,
        blocking_write: cl_bool, buffer_origin: *const size_t, host_origin: *const size_t,
        region: *const size_t, buffer_row_pitch: size_t, buffer_slice_pitch: size_t,
        host_row_pitch: size_t, host_slice_pitch: size_t, ptr: *const c_void,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Cl12] fn clEnqueueFillBuffer(command_queue: cl_command_queue, buffer: cl_mem,
        pattern: *const c_void, pattern_size: size_t, offset: size_t, size: size_t,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueCopyBuffer(command_queue: cl_command_queue, src_buffer: cl_mem,
        dst_buffer: cl_mem, src_offset: size_t, dst_offset: size_t, cb: size_t,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueCopyBufferRect(command_queue: cl_command_queue, src_buffer: cl_mem,
        dst_buffer: cl_mem, src_origin: *const size_t, dst_origin: *const size_t,
        region: *const size_t, src_row_pitch: size_t, src_slice_pitch: size_t,
        dst_row_pitch: size_t, dst_slice_pitch: size_t, num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event, event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueReadImage(command_queue: cl_command_queue, image: cl_mem,
        blocking_read: cl_bool, origin: *const size_t, region: *const size_t,
        row_pitch: size_t, slice_pitch: size_t, ptr: *mut c_void,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueWriteImage(command_queue: cl_command_queue, image: cl_mem,
        blocking_write: cl_bool, origin: *const size_t, region: *const size_t,
        input_row_pitch: size_t, input_slice_pitch: size_t, ptr: *const c_void,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Cl12] fn clEnqueueFillImage(command_queue: cl_command_queue, image: cl_mem,
        fill_color: *const c_void, origin: *const size_t, region: *const size_t,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueCopyImage(command_queue: cl_command_queue, src_image: cl_mem,
        dst_image: cl_mem, src_origin: *const size_t, dst_origin: *const size_t,
        region: *const size_t, num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event, event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueCopyImageToBuffer(command_queue: cl_command_queue, src_image: cl_mem,
        dst_buffer: cl_mem, src_origin: *const size_t, region: *const size_t,
        dst_offset: size_t, num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event, event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueCopyBufferToImage(command_queue: cl_command_queue, src_buffer: cl_mem,
        dst_image: cl_mem, src_offset: size_t, dst_origin: *const size_t,
        region: *const size_t, num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event, event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueMapBuffer(command_queue: cl_command_queue, buffer: cl_mem,
        blocking_map: cl_bool, map_flags: cl_map_flags, offset: size_t, cb: size_t,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event, errcode_ret: *mut cl_int) -> *mut c_void;
    [Core] fn clEnqueueMapImage(command_queue: cl_command_queue, image: cl_mem,
        blocking_map: cl_bool, map_flags: cl_map_flags, origin: *const size_t,
        region: *const size_t, image_row_pitch: *mut size_t, image_slice_pitch: *mut size_t,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event, errcode_ret: *mut cl_int) -> *mut c_void;
    [Core] fn clEnqueueUnmapMemObject(command_queue: cl_command_queue, memobj: cl_mem,
        mapped_ptr: *mut c_void, num_events_in_wait_list: cl_uint,
        event_wait_list: *const cl_event, event: *mut cl_event) -> cl_int;
    [Cl12] fn clEnqueueMigrateMemObjects(command_queue: cl_command_queue,
        num_mem_objects: cl_uint, mem_objects: *const cl_mem, flags: cl_mem_migration_flags,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueNDRangeKernel(command_queue: cl_command_queue, kernel: cl_kernel,
        work_dim: cl_uint, global_work_offset: *const size_t,
        global_work_size: *const size_t, local_work_size: *const size_t,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Core] fn clEnqueueNativeKernel(command_queue: cl_command_queue,
        user_func: Option<cl_native_kernel_fn>, args: *mut c_void, cb_args: size_t,
        num_mem_objects: cl_uint, mem_list: *const cl_mem, args_mem_loc: *const *const c_void,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Cl12] fn clEnqueueMarkerWithWaitList(command_queue: cl_command_queue,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;
    [Cl12] fn clEnqueueBarrierWithWaitList(command_queue: cl_command_queue,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int;

    // Extension function access:
    [Cl12] fn clGetExtensionFunctionAddressForPlatform(platform: cl_platform_id,
        func_name: *const c_char) -> *mut c_void;
}

impl ClApi {
    /// Loads the OpenCL library at `path` and resolves its entry points.
    ///
    /// ## Safety
    ///
    /// Loading a library runs its initialization routines. The library must
    /// be an OpenCL implementation whose exported symbols match the OpenCL
    /// 1.2 signatures.
    pub unsafe fn load_from<P: AsRef<OsStr>>(path: P) -> Result<ClApi, LoadError> {
        let path = path.as_ref();
        log::debug!("clbind_sys: loading OpenCL library {:?}.", path);
        let library = Library::new(path).map_err(|err| LoadError::LibraryNotFound {
            tried: vec![path.to_owned()],
            reason: err.to_string(),
        })?;
        ClApi::resolve(library, path)
    }

    /// Loads the OpenCL library named by `CLBIND_OPENCL_LIBRARY`, if set,
    /// otherwise the first of the platform's default library names which
    /// loads.
    ///
    /// ## Safety
    ///
    /// See [`ClApi::load_from`].
    pub unsafe fn load() -> Result<ClApi, LoadError> {
        let mut candidates: Vec<OsString> = Vec::with_capacity(DEFAULT_LIBRARY_NAMES.len() + 1);
        if let Some(path) = env::var_os(LIBRARY_ENV_VAR) {
            candidates.push(path);
        }
        candidates.extend(DEFAULT_LIBRARY_NAMES.iter().map(OsString::from));

        let mut reason = String::new();
        for candidate in candidates.iter() {
            log::debug!("clbind_sys: trying OpenCL library {:?}.", candidate);
            match Library::new(candidate) {
                Ok(library) => return ClApi::resolve(library, candidate),
                Err(err) => reason = err.to_string(),
            }
        }

        Err(LoadError::LibraryNotFound { tried: candidates, reason })
    }

    /// Returns the library names tried by [`ClApi::load`] after the
    /// environment override.
    pub fn default_library_names() -> &'static [&'static str] {
        DEFAULT_LIBRARY_NAMES
    }

    /// Returns `true` if this table was loaded from a library.
    pub fn is_loaded(&self) -> bool {
        self.library.is_some()
    }

    /// Returns `true` if every OpenCL 1.2 entry point is present.
    pub fn supports_cl12(&self) -> bool {
        ClApi::entry_points().iter()
            .filter(|ep| ep.requirement == Requirement::Cl12)
            .all(|ep| self.is_available(ep.name))
    }

    /// Returns the names of entry points which are not resolved.
    pub fn missing_entry_points(&self) -> Vec<&'static str> {
        ClApi::entry_points().iter()
            .filter(|ep| !self.is_available(ep.name))
            .map(|ep| ep.name)
            .collect()
    }
}

impl fmt::Debug for ClApi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ClApi")
            .field("loaded", &self.library.is_some())
            .field("missing", &self.missing_entry_points())
            .finish()
    }
}
