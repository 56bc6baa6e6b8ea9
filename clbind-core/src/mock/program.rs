//! Program, kernel, and kernel dispatch entry points.
//!
//! The compiler is a signature scanner: a build succeeds unless the source
//! contains an `#error` directive or includes a header which was not
//! supplied, in which case a clang style log is produced.

#![allow(non_snake_case)]

use std::mem as std_mem;
use std::ptr;
use crate::ffi::{self, c_void, c_char, size_t, cl_int, cl_uint, cl_context, cl_device_id,
    cl_platform_id, cl_program, cl_program_info, cl_program_build_info, cl_program_notify_fn,
    cl_kernel, cl_kernel_info, cl_kernel_arg_info, cl_kernel_work_group_info, cl_command_queue,
    cl_event, cl_mem, cl_native_kernel_fn};
use super::source::{self, KernelDecl};
use super::state::{self, State, ProgramObj, KernelObj, ArgValue, ObjKind, Kind, Pending,
    Dispatch};
use super::entry::{enqueue_prelude, finish_command};
use super::{call, status, create, create_with_code, write_info, handles, c_str, uint, int,
    ulong, size, sizes, string, BINARY_MAGIC};

/// Signatures of the built-in kernels.
///
/// `mock_copy` copies one byte per work item. `mock_fill` stores `value` in
/// one `uint` per work item.
const BUILT_IN_SOURCE: &str = "\
    __kernel void mock_copy(__global const uchar* src, __global uchar* dst)\n\
    __kernel void mock_fill(__global uint* dst, uint value)\n";

const PTR_SIZE: usize = std_mem::size_of::<*mut c_void>();

//=============================================================================
//================================= HELPERS ===================================
//=============================================================================

fn new_program(context: usize, devices: Vec<usize>) -> ProgramObj {
    ProgramObj {
        context,
        devices,
        source: None,
        from_binary: false,
        binary_type: ffi::CL_PROGRAM_BINARY_TYPE_NONE,
        build_status: ffi::CL_BUILD_NONE,
        build_log: String::new(),
        build_options: String::new(),
        kernels: Vec::new(),
        attached_kernels: 0,
    }
}

/// Reads an optional device list, checking every device against `allowed`.
unsafe fn device_list(num_devices: cl_uint, list: *const cl_device_id, allowed: &[usize])
        -> Result<Option<Vec<usize>>, cl_int>
{
    if (num_devices == 0) != list.is_null() {
        return Err(ffi::CL_INVALID_VALUE);
    }
    if list.is_null() {
        return Ok(None);
    }
    let devices = handles(num_devices, list);
    if devices.iter().any(|d| !allowed.contains(d)) {
        return Err(ffi::CL_INVALID_DEVICE);
    }
    Ok(Some(devices))
}

fn check_notify(pfn_notify: Option<cl_program_notify_fn>, user_data: *mut c_void)
        -> Result<(), cl_int>
{
    if pfn_notify.is_none() && !user_data.is_null() {
        return Err(ffi::CL_INVALID_VALUE);
    }
    Ok(())
}

fn queue_build_callback(s: &mut State, pfn_notify: Option<cl_program_notify_fn>, program: usize,
        user_data: *mut c_void)
{
    if let Some(f) = pfn_notify {
        s.pending.push(Pending::Build { f, program, user_data: user_data as usize });
    }
}

/// Returns true if every token of a compiler option string is understood.
fn compiler_options_valid(options: &str) -> bool {
    let mut tokens = options.split_whitespace();
    while let Some(token) = tokens.next() {
        match token {
            "-D" | "-I" => {
                if tokens.next().is_none() {
                    return false;
                }
            },
            "-w" | "-Werror" | "-g" => (),
            t if t.starts_with("-D") || t.starts_with("-I") || t.starts_with("-cl-") => (),
            _ => return false,
        }
    }
    true
}

fn linker_options_valid(options: &str) -> bool {
    options.split_whitespace().all(|token| matches!(token,
        "-create-library" | "-enable-link-options") || token.starts_with("-cl-"))
}

/// Scans a program source for directives which fail a build. Returns the
/// build log, empty on success.
fn compile_log(src: &str, headers: &[String]) -> String {
    let mut lines: Vec<(usize, String)> = source::errors(src);
    for (line, name) in source::includes(src) {
        if !headers.contains(&name) {
            lines.push((line, format!("'{}' file not found", name)));
        }
    }
    lines.sort();
    lines.iter()
        .map(|(line, msg)| format!("<source>:{}:1: error: {}", line, msg))
        .collect::<Vec<_>>()
        .join("\n")
}

//=============================================================================
//================================= PROGRAMS ==================================
//=============================================================================

pub(super) unsafe extern "system" fn clCreateProgramWithSource(context: cl_context,
        count: cl_uint, strings: *const *const c_char, lengths: *const size_t,
        errcode_ret: *mut cl_int) -> cl_program
{
    create(errcode_ret, call("clCreateProgramWithSource", |s| {
        let context = context as usize;
        let devices = s.context(context)?.devices.clone();
        if count == 0 || strings.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }

        let mut src = String::new();
        for idx in 0..count as usize {
            let string = *strings.add(idx);
            if string.is_null() {
                return Err(ffi::CL_INVALID_VALUE);
            }
            let len = if lengths.is_null() { 0 } else { *lengths.add(idx) };
            if len == 0 {
                src.push_str(&c_str(string).unwrap_or_default());
            } else {
                let bytes = std::slice::from_raw_parts(string as *const u8, len);
                src.push_str(&String::from_utf8_lossy(bytes));
            }
        }

        s.retain_implicit(context);
        Ok(s.insert(ObjKind::Program(ProgramObj {
            source: Some(src),
            ..new_program(context, devices)
        })))
    }))
}

pub(super) unsafe extern "system" fn clCreateProgramWithBinary(context: cl_context,
        num_devices: cl_uint, device_list: *const cl_device_id, lengths: *const size_t,
        binaries: *const *const u8, binary_status: *mut cl_int, errcode_ret: *mut cl_int)
        -> cl_program
{
    create(errcode_ret, call("clCreateProgramWithBinary", |s| {
        let context = context as usize;
        let ctx_devices = s.context(context)?.devices.clone();
        if num_devices == 0 || device_list.is_null() || lengths.is_null() || binaries.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let devices = handles(num_devices, device_list);
        if devices.iter().any(|d| !ctx_devices.contains(d)) {
            return Err(ffi::CL_INVALID_DEVICE);
        }

        let mut kernels: Option<Vec<KernelDecl>> = None;
        let mut result = Ok(());
        for idx in 0..devices.len() {
            let (len, bin) = (*lengths.add(idx), *binaries.add(idx));
            let code = if len == 0 || bin.is_null() {
                ffi::CL_INVALID_VALUE
            } else {
                let text = String::from_utf8_lossy(std::slice::from_raw_parts(bin, len));
                match text.strip_prefix(BINARY_MAGIC) {
                    Some(body) => {
                        kernels.get_or_insert_with(|| source::parse_kernels(body));
                        ffi::CL_SUCCESS
                    },
                    None => ffi::CL_INVALID_BINARY,
                }
            };
            if !binary_status.is_null() {
                *binary_status.add(idx) = code;
            }
            if code != ffi::CL_SUCCESS && result.is_ok() {
                result = Err(code);
            }
        }
        result?;

        s.retain_implicit(context);
        Ok(s.insert(ObjKind::Program(ProgramObj {
            from_binary: true,
            binary_type: ffi::CL_PROGRAM_BINARY_TYPE_EXECUTABLE,
            kernels: kernels.unwrap_or_default(),
            ..new_program(context, devices)
        })))
    }))
}

pub(super) unsafe extern "system" fn clCreateProgramWithBuiltInKernels(context: cl_context,
        num_devices: cl_uint, device_list: *const cl_device_id, kernel_names: *const c_char,
        errcode_ret: *mut cl_int) -> cl_program
{
    create(errcode_ret, call("clCreateProgramWithBuiltInKernels", |s| {
        let context = context as usize;
        let ctx_devices = s.context(context)?.devices.clone();
        if num_devices == 0 || device_list.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let devices = handles(num_devices, device_list);
        if devices.iter().any(|d| !ctx_devices.contains(d)) {
            return Err(ffi::CL_INVALID_DEVICE);
        }

        let names = c_str(kernel_names).ok_or(ffi::CL_INVALID_VALUE)?;
        let available = source::parse_kernels(BUILT_IN_SOURCE);
        let mut kernels = Vec::new();
        for name in names.split(';').map(str::trim) {
            if !state::BUILT_IN_KERNELS.split(';').any(|k| k == name) {
                return Err(ffi::CL_INVALID_VALUE);
            }
            if let Some(decl) = available.iter().find(|k| k.name == name) {
                kernels.push(decl.clone());
            }
        }

        s.retain_implicit(context);
        Ok(s.insert(ObjKind::Program(ProgramObj {
            binary_type: ffi::CL_PROGRAM_BINARY_TYPE_EXECUTABLE,
            build_status: ffi::CL_BUILD_SUCCESS,
            kernels,
            ..new_program(context, devices)
        })))
    }))
}

pub(super) unsafe extern "system" fn clRetainProgram(program: cl_program) -> cl_int {
    status(call("clRetainProgram", |s| s.retain(program as usize, Kind::Program)))
}

pub(super) unsafe extern "system" fn clReleaseProgram(program: cl_program) -> cl_int {
    status(call("clReleaseProgram", |s| s.release(program as usize, Kind::Program)))
}

pub(super) unsafe extern "system" fn clBuildProgram(program: cl_program, num_devices: cl_uint,
        device_list: *const cl_device_id, options: *const c_char,
        pfn_notify: Option<cl_program_notify_fn>, user_data: *mut c_void) -> cl_int
{
    status(call("clBuildProgram", |s| {
        let handle = program as usize;
        let prog = s.program(handle)?;
        self::device_list(num_devices, device_list, &prog.devices)?;
        check_notify(pfn_notify, user_data)?;
        if prog.source.is_none() && !prog.from_binary {
            return Err(ffi::CL_INVALID_OPERATION);
        }
        if prog.attached_kernels > 0 {
            return Err(ffi::CL_INVALID_OPERATION);
        }
        let options = c_str(options).unwrap_or_default();
        if !compiler_options_valid(&options) {
            return Err(ffi::CL_INVALID_BUILD_OPTIONS);
        }

        let log = match prog.source {
            Some(ref src) => compile_log(src, &[]),
            None => String::new(),
        };
        let kernels = match prog.source {
            Some(ref src) if log.is_empty() => source::parse_kernels(src),
            _ => prog.kernels.clone(),
        };

        let prog = s.program_mut(handle)?;
        prog.build_options = options;
        let result = if log.is_empty() {
            prog.build_status = ffi::CL_BUILD_SUCCESS;
            prog.binary_type = ffi::CL_PROGRAM_BINARY_TYPE_EXECUTABLE;
            prog.kernels = kernels;
            Ok(())
        } else {
            prog.build_status = ffi::CL_BUILD_ERROR;
            Err(ffi::CL_BUILD_PROGRAM_FAILURE)
        };
        prog.build_log = log;

        queue_build_callback(s, pfn_notify, handle, user_data);
        result
    }))
}

pub(super) unsafe extern "system" fn clCompileProgram(program: cl_program,
        num_devices: cl_uint, device_list: *const cl_device_id, options: *const c_char,
        num_input_headers: cl_uint, input_headers: *const cl_program,
        header_include_names: *const *const c_char, pfn_notify: Option<cl_program_notify_fn>,
        user_data: *mut c_void) -> cl_int
{
    status(call("clCompileProgram", |s| {
        let handle = program as usize;
        let prog = s.program(handle)?;
        self::device_list(num_devices, device_list, &prog.devices)?;
        check_notify(pfn_notify, user_data)?;
        if (num_input_headers == 0) != input_headers.is_null()
                || input_headers.is_null() != header_include_names.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let src = prog.source.clone().ok_or(ffi::CL_INVALID_OPERATION)?;
        if prog.attached_kernels > 0 {
            return Err(ffi::CL_INVALID_OPERATION);
        }
        let options = c_str(options).unwrap_or_default();
        if !compiler_options_valid(&options) {
            return Err(ffi::CL_INVALID_COMPILER_OPTIONS);
        }

        let mut header_names = Vec::with_capacity(num_input_headers as usize);
        for (idx, header) in handles(num_input_headers, input_headers).into_iter().enumerate() {
            s.program(header)?;
            header_names.push(c_str(*header_include_names.add(idx))
                .ok_or(ffi::CL_INVALID_VALUE)?);
        }

        let log = compile_log(&src, &header_names);
        let prog = s.program_mut(handle)?;
        prog.build_options = options;
        let result = if log.is_empty() {
            prog.build_status = ffi::CL_BUILD_SUCCESS;
            prog.binary_type = ffi::CL_PROGRAM_BINARY_TYPE_COMPILED_OBJECT;
            prog.kernels = source::parse_kernels(&src);
            Ok(())
        } else {
            prog.build_status = ffi::CL_BUILD_ERROR;
            Err(ffi::CL_COMPILE_PROGRAM_FAILURE)
        };
        prog.build_log = log;

        queue_build_callback(s, pfn_notify, handle, user_data);
        result
    }))
}

pub(super) unsafe extern "system" fn clLinkProgram(context: cl_context, num_devices: cl_uint,
        device_list: *const cl_device_id, options: *const c_char, num_input_programs: cl_uint,
        input_programs: *const cl_program, pfn_notify: Option<cl_program_notify_fn>,
        user_data: *mut c_void, errcode_ret: *mut cl_int) -> cl_program
{
    create_with_code(errcode_ret, call("clLinkProgram", |s| {
        let context = context as usize;
        let ctx_devices = s.context(context)?.devices.clone();
        let devices = self::device_list(num_devices, device_list, &ctx_devices)?
            .unwrap_or(ctx_devices);
        check_notify(pfn_notify, user_data)?;
        if num_input_programs == 0 || input_programs.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let options = c_str(options).unwrap_or_default();
        if !linker_options_valid(&options) {
            return Err(ffi::CL_INVALID_LINKER_OPTIONS);
        }

        let mut kernels: Vec<KernelDecl> = Vec::new();
        let mut duplicates: Vec<String> = Vec::new();
        for input in handles(num_input_programs, input_programs) {
            let prog = s.program(input)?;
            if prog.context != context {
                return Err(ffi::CL_INVALID_PROGRAM);
            }
            if prog.build_status != ffi::CL_BUILD_SUCCESS
                    || !matches!(prog.binary_type, ffi::CL_PROGRAM_BINARY_TYPE_COMPILED_OBJECT
                        | ffi::CL_PROGRAM_BINARY_TYPE_LIBRARY) {
                return Err(ffi::CL_INVALID_OPERATION);
            }
            for decl in prog.kernels.iter() {
                if kernels.iter().any(|k| k.name == decl.name) {
                    duplicates.push(decl.name.clone());
                } else {
                    kernels.push(decl.clone());
                }
            }
        }
        // A failed link still returns a program, holding the link log:
        s.retain_implicit(context);
        if !duplicates.is_empty() {
            let build_log = duplicates.iter()
                .map(|name| format!("error: duplicate kernel '{}'", name))
                .collect::<Vec<_>>()
                .join("\n");
            let handle = s.insert(ObjKind::Program(ProgramObj {
                build_status: ffi::CL_BUILD_ERROR,
                build_options: options,
                build_log,
                ..new_program(context, devices)
            }));
            queue_build_callback(s, pfn_notify, handle, user_data);
            return Ok((handle, ffi::CL_LINK_PROGRAM_FAILURE));
        }

        let binary_type = if options.split_whitespace().any(|t| t == "-create-library") {
            ffi::CL_PROGRAM_BINARY_TYPE_LIBRARY
        } else {
            ffi::CL_PROGRAM_BINARY_TYPE_EXECUTABLE
        };

        let handle = s.insert(ObjKind::Program(ProgramObj {
            binary_type,
            build_status: ffi::CL_BUILD_SUCCESS,
            build_options: options,
            kernels,
            ..new_program(context, devices)
        }));
        queue_build_callback(s, pfn_notify, handle, user_data);
        Ok((handle, ffi::CL_SUCCESS))
    }))
}

pub(super) unsafe extern "system" fn clUnloadPlatformCompiler(platform: cl_platform_id)
        -> cl_int
{
    status(call("clUnloadPlatformCompiler", |s| {
        if s.platform_valid(platform as usize) {
            Ok(())
        } else {
            Err(ffi::CL_INVALID_PLATFORM)
        }
    }))
}

pub(super) unsafe extern "system" fn clGetProgramInfo(program: cl_program,
        param_name: cl_program_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int
{
    status(call("clGetProgramInfo", |s| {
        let handle = program as usize;
        let prog = s.program(handle)?;
        let bytes = match param_name {
            ffi::CL_PROGRAM_REFERENCE_COUNT => uint(s.refcount_of(handle, Kind::Program)?),
            ffi::CL_PROGRAM_CONTEXT => size(prog.context),
            ffi::CL_PROGRAM_NUM_DEVICES => uint(prog.devices.len() as cl_uint),
            ffi::CL_PROGRAM_DEVICES => sizes(&prog.devices),
            ffi::CL_PROGRAM_SOURCE => string(prog.source.as_deref().unwrap_or("")),
            ffi::CL_PROGRAM_BINARY_SIZES => sizes(&vec![prog.binary().len(); prog.devices.len()]),
            ffi::CL_PROGRAM_BINARIES => {
                let ptrs_len = prog.devices.len() * PTR_SIZE;
                if !param_value.is_null() {
                    if param_value_size < ptrs_len {
                        return Err(ffi::CL_INVALID_VALUE);
                    }
                    let binary = prog.binary();
                    let outs = param_value as *const *mut u8;
                    for idx in 0..prog.devices.len() {
                        let dst = *outs.add(idx);
                        if !dst.is_null() {
                            ptr::copy_nonoverlapping(binary.as_ptr(), dst, binary.len());
                        }
                    }
                }
                if !param_value_size_ret.is_null() {
                    *param_value_size_ret = ptrs_len;
                }
                return Ok(());
            },
            ffi::CL_PROGRAM_NUM_KERNELS | ffi::CL_PROGRAM_KERNEL_NAMES
                    if !prog.is_executable() => return Err(ffi::CL_INVALID_PROGRAM_EXECUTABLE),
            ffi::CL_PROGRAM_NUM_KERNELS => size(prog.kernels.len()),
            ffi::CL_PROGRAM_KERNEL_NAMES => {
                let names: Vec<&str> = prog.kernels.iter().map(|k| k.name.as_str()).collect();
                string(&names.join(";"))
            },
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

pub(super) unsafe extern "system" fn clGetProgramBuildInfo(program: cl_program,
        device: cl_device_id, param_name: cl_program_build_info, param_value_size: size_t,
        param_value: *mut c_void, param_value_size_ret: *mut size_t) -> cl_int
{
    status(call("clGetProgramBuildInfo", |s| {
        let prog = s.program(program as usize)?;
        if !prog.devices.contains(&(device as usize)) {
            return Err(ffi::CL_INVALID_DEVICE);
        }
        let bytes = match param_name {
            ffi::CL_PROGRAM_BUILD_STATUS => int(prog.build_status),
            ffi::CL_PROGRAM_BUILD_OPTIONS => string(&prog.build_options),
            ffi::CL_PROGRAM_BUILD_LOG => string(&prog.build_log),
            ffi::CL_PROGRAM_BINARY_TYPE => uint(prog.binary_type),
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

//=============================================================================
//================================== KERNELS ==================================
//=============================================================================

fn insert_kernel(s: &mut State, program: usize, decl: KernelDecl) -> Result<usize, cl_int> {
    s.program_mut(program)?.attached_kernels += 1;
    s.retain_implicit(program);
    let args = vec![None; decl.args.len()];
    Ok(s.insert(ObjKind::Kernel(KernelObj { program, decl, args })))
}

pub(super) unsafe extern "system" fn clCreateKernel(program: cl_program,
        kernel_name: *const c_char, errcode_ret: *mut cl_int) -> cl_kernel
{
    create(errcode_ret, call("clCreateKernel", |s| {
        let handle = program as usize;
        let prog = s.program(handle)?;
        let name = c_str(kernel_name).ok_or(ffi::CL_INVALID_VALUE)?;
        if !prog.is_executable() {
            return Err(ffi::CL_INVALID_PROGRAM_EXECUTABLE);
        }
        let decl = prog.kernels.iter().find(|k| k.name == name).cloned()
            .ok_or(ffi::CL_INVALID_KERNEL_NAME)?;
        insert_kernel(s, handle, decl)
    }))
}

pub(super) unsafe extern "system" fn clCreateKernelsInProgram(program: cl_program,
        num_kernels: cl_uint, kernels: *mut cl_kernel, num_kernels_ret: *mut cl_uint) -> cl_int
{
    status(call("clCreateKernelsInProgram", |s| {
        let handle = program as usize;
        let prog = s.program(handle)?;
        if !prog.is_executable() {
            return Err(ffi::CL_INVALID_PROGRAM_EXECUTABLE);
        }
        let decls = prog.kernels.clone();
        if !kernels.is_null() {
            if (num_kernels as usize) < decls.len() {
                return Err(ffi::CL_INVALID_VALUE);
            }
            for (idx, decl) in decls.iter().enumerate() {
                *kernels.add(idx) = insert_kernel(s, handle, decl.clone())? as *mut c_void;
            }
        }
        if !num_kernels_ret.is_null() {
            *num_kernels_ret = decls.len() as cl_uint;
        }
        Ok(())
    }))
}

pub(super) unsafe extern "system" fn clRetainKernel(kernel: cl_kernel) -> cl_int {
    status(call("clRetainKernel", |s| s.retain(kernel as usize, Kind::Kernel)))
}

pub(super) unsafe extern "system" fn clReleaseKernel(kernel: cl_kernel) -> cl_int {
    status(call("clReleaseKernel", |s| s.release(kernel as usize, Kind::Kernel)))
}

/// Validates one argument value against its declaration.
unsafe fn arg_value(s: &State, context: usize, decl: &source::ArgDecl, arg_size: usize,
        arg_value: *const c_void) -> Result<ArgValue, cl_int>
{
    if decl.is_local() {
        if !arg_value.is_null() {
            return Err(ffi::CL_INVALID_ARG_VALUE);
        }
        if arg_size == 0 {
            return Err(ffi::CL_INVALID_ARG_SIZE);
        }
        return Ok(ArgValue::Local(arg_size));
    }

    if decl.is_mem() || decl.is_sampler() {
        if arg_size != PTR_SIZE {
            return Err(ffi::CL_INVALID_ARG_SIZE);
        }
        let handle = if arg_value.is_null() { 0 } else { *(arg_value as *const usize) };

        if decl.is_sampler() {
            if handle == 0 {
                return Err(ffi::CL_INVALID_ARG_VALUE);
            }
            s.sampler(handle)?;
            return Ok(ArgValue::Sampler(handle));
        }

        if handle == 0 {
            return if decl.is_image() { Err(ffi::CL_INVALID_ARG_VALUE) } else {
                Ok(ArgValue::Mem(None))
            };
        }
        let mem = s.mem(handle)?;
        if mem.context != context {
            return Err(ffi::CL_INVALID_MEM_OBJECT);
        }
        if decl.is_image() != mem.image.is_some() {
            return Err(ffi::CL_INVALID_ARG_VALUE);
        }
        return Ok(ArgValue::Mem(Some(handle)));
    }

    if arg_value.is_null() {
        return Err(ffi::CL_INVALID_ARG_VALUE);
    }
    match source::type_size(&decl.type_name) {
        Some(expected) if expected != arg_size => return Err(ffi::CL_INVALID_ARG_SIZE),
        None if arg_size == 0 => return Err(ffi::CL_INVALID_ARG_SIZE),
        _ => (),
    }
    let bytes = std::slice::from_raw_parts(arg_value as *const u8, arg_size);
    Ok(ArgValue::Bytes(bytes.to_vec()))
}

pub(super) unsafe extern "system" fn clSetKernelArg(kernel: cl_kernel, arg_index: cl_uint,
        arg_size: size_t, arg_value: *const c_void) -> cl_int
{
    status(call("clSetKernelArg", |s| {
        let handle = kernel as usize;
        let kern = s.kernel(handle)?;
        let decl = kern.decl.args.get(arg_index as usize).ok_or(ffi::CL_INVALID_ARG_INDEX)?;
        let context = s.program(kern.program)?.context;
        let value = self::arg_value(s, context, decl, arg_size, arg_value)?;
        s.kernel_mut(handle)?.args[arg_index as usize] = Some(value);
        Ok(())
    }))
}

pub(super) unsafe extern "system" fn clGetKernelInfo(kernel: cl_kernel,
        param_name: cl_kernel_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int
{
    status(call("clGetKernelInfo", |s| {
        let handle = kernel as usize;
        let kern = s.kernel(handle)?;
        let bytes = match param_name {
            ffi::CL_KERNEL_FUNCTION_NAME => string(&kern.decl.name),
            ffi::CL_KERNEL_NUM_ARGS => uint(kern.decl.args.len() as cl_uint),
            ffi::CL_KERNEL_REFERENCE_COUNT => uint(s.refcount_of(handle, Kind::Kernel)?),
            ffi::CL_KERNEL_CONTEXT => size(s.program(kern.program)?.context),
            ffi::CL_KERNEL_PROGRAM => size(kern.program),
            ffi::CL_KERNEL_ATTRIBUTES => string(""),
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

pub(super) unsafe extern "system" fn clGetKernelArgInfo(kernel: cl_kernel, arg_indx: cl_uint,
        param_name: cl_kernel_arg_info, param_value_size: size_t, param_value: *mut c_void,
        param_value_size_ret: *mut size_t) -> cl_int
{
    status(call("clGetKernelArgInfo", |s| {
        let kern = s.kernel(kernel as usize)?;
        let decl = kern.decl.args.get(arg_indx as usize).ok_or(ffi::CL_INVALID_ARG_INDEX)?;
        if s.program(kern.program)?.from_binary {
            return Err(ffi::CL_KERNEL_ARG_INFO_NOT_AVAILABLE);
        }
        let bytes = match param_name {
            ffi::CL_KERNEL_ARG_ADDRESS_QUALIFIER => uint(decl.address),
            ffi::CL_KERNEL_ARG_ACCESS_QUALIFIER => uint(decl.access),
            ffi::CL_KERNEL_ARG_TYPE_NAME => string(&decl.type_name),
            ffi::CL_KERNEL_ARG_TYPE_QUALIFIER => ulong(decl.type_qualifier),
            ffi::CL_KERNEL_ARG_NAME => string(&decl.name),
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

pub(super) unsafe extern "system" fn clGetKernelWorkGroupInfo(kernel: cl_kernel,
        device: cl_device_id, param_name: cl_kernel_work_group_info, param_value_size: size_t,
        param_value: *mut c_void, param_value_size_ret: *mut size_t) -> cl_int
{
    status(call("clGetKernelWorkGroupInfo", |s| {
        let kern = s.kernel(kernel as usize)?;
        let devices = &s.program(kern.program)?.devices;
        let device = match device as usize {
            0 if devices.len() == 1 => devices[0],
            0 => return Err(ffi::CL_INVALID_DEVICE),
            d if devices.contains(&d) => d,
            _ => return Err(ffi::CL_INVALID_DEVICE),
        };
        let dev = s.device(device)?;

        let local_mem: usize = kern.args.iter()
            .map(|arg| match arg {
                Some(ArgValue::Local(len)) => *len,
                _ => 0,
            })
            .sum();
        let bytes = match param_name {
            ffi::CL_KERNEL_WORK_GROUP_SIZE => size(dev.max_work_group_size),
            ffi::CL_KERNEL_COMPILE_WORK_GROUP_SIZE => sizes(&[0, 0, 0]),
            ffi::CL_KERNEL_LOCAL_MEM_SIZE => ulong(local_mem as u64),
            ffi::CL_KERNEL_PREFERRED_WORK_GROUP_SIZE_MULTIPLE =>
                size(if dev.device_type & ffi::CL_DEVICE_TYPE_GPU != 0 { 32 } else { 1 }),
            ffi::CL_KERNEL_PRIVATE_MEM_SIZE => ulong(0),
            _ => return Err(ffi::CL_INVALID_VALUE),
        };
        write_info(&bytes, param_value_size, param_value, param_value_size_ret)
    }))
}

//=============================================================================
//================================= DISPATCH ==================================
//=============================================================================

unsafe fn read_dims(ptr: *const size_t, work_dim: usize) -> Option<Vec<usize>> {
    if ptr.is_null() {
        None
    } else {
        Some(std::slice::from_raw_parts(ptr, work_dim).to_vec())
    }
}

/// Checks the work sizes of a dispatch against the limits of `device`.
fn check_work_sizes(dev: &state::Device, global: &[usize], local: Option<&[usize]>)
        -> Result<(), cl_int>
{
    if global.contains(&0) {
        return Err(ffi::CL_INVALID_GLOBAL_WORK_SIZE);
    }
    let local = match local {
        Some(local) => local,
        None => return Ok(()),
    };
    for (dim, (&g, &l)) in global.iter().zip(local.iter()).enumerate() {
        if l == 0 || g % l != 0 {
            return Err(ffi::CL_INVALID_WORK_GROUP_SIZE);
        }
        if l > dev.max_work_item_sizes[dim] {
            return Err(ffi::CL_INVALID_WORK_ITEM_SIZE);
        }
    }
    if local.iter().product::<usize>() > dev.max_work_group_size {
        return Err(ffi::CL_INVALID_WORK_GROUP_SIZE);
    }
    Ok(())
}

fn mem_arg(args: &[Option<ArgValue>], idx: usize) -> Result<usize, cl_int> {
    match args.get(idx) {
        Some(Some(ArgValue::Mem(Some(handle)))) => Ok(*handle),
        _ => Err(ffi::CL_INVALID_KERNEL_ARGS),
    }
}

/// Runs one of the built-in kernels over `[offset, offset + count)`.
unsafe fn run_built_in(s: &State, name: &str, args: &[Option<ArgValue>], offset: usize,
        count: usize) -> Result<(), cl_int>
{
    match name {
        "mock_copy" => {
            let src = s.mem(mem_arg(args, 0)?)?;
            let dst = s.mem(mem_arg(args, 1)?)?;
            if offset + count > src.size || offset + count > dst.size {
                return Err(ffi::CL_OUT_OF_RESOURCES);
            }
            ptr::copy(src.host_address(offset), dst.host_address(offset), count);
        },
        "mock_fill" => {
            let dst = s.mem(mem_arg(args, 0)?)?;
            let value = match args.get(1) {
                Some(Some(ArgValue::Bytes(bytes))) => bytes.clone(),
                _ => return Err(ffi::CL_INVALID_KERNEL_ARGS),
            };
            if (offset + count) * value.len() > dst.size {
                return Err(ffi::CL_OUT_OF_RESOURCES);
            }
            for idx in offset..offset + count {
                dst.write(idx * value.len(), &value);
            }
        },
        _ => (),
    }
    Ok(())
}

pub(super) unsafe extern "system" fn clEnqueueNDRangeKernel(command_queue: cl_command_queue,
        kernel: cl_kernel, work_dim: cl_uint, global_work_offset: *const size_t,
        global_work_size: *const size_t, local_work_size: *const size_t,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueNDRangeKernel", |s| {
        let (context, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let kern = s.kernel(kernel as usize)?;
        let prog = s.program(kern.program)?;
        if prog.context != context {
            return Err(ffi::CL_INVALID_CONTEXT);
        }
        let device = s.queue(command_queue as usize)?.device;
        if !prog.devices.contains(&device) {
            return Err(ffi::CL_INVALID_PROGRAM_EXECUTABLE);
        }
        if kern.args.iter().any(Option::is_none) {
            return Err(ffi::CL_INVALID_KERNEL_ARGS);
        }
        if !(1..=3).contains(&work_dim) {
            return Err(ffi::CL_INVALID_WORK_DIMENSION);
        }

        let dims = work_dim as usize;
        let global = read_dims(global_work_size, dims).ok_or(ffi::CL_INVALID_GLOBAL_WORK_SIZE)?;
        let offset = read_dims(global_work_offset, dims);
        let local = read_dims(local_work_size, dims);
        check_work_sizes(s.device(device)?, &global, local.as_deref())?;

        let dispatch = Dispatch {
            kernel: kern.decl.name.clone(),
            work_dim,
            global_work_offset: offset,
            global_work_size: global,
            local_work_size: local,
        };
        if !failed {
            let start = dispatch.global_work_offset.as_ref().map_or(0, |o| o[0]);
            run_built_in(s, &dispatch.kernel, &kern.args, start, dispatch.global_work_size[0])?;
        }
        s.dispatches.push(dispatch);

        finish_command(s, command_queue, ffi::CL_COMMAND_NDRANGE_KERNEL, false, failed, event)
    }))
}

pub(super) unsafe extern "system" fn clEnqueueNativeKernel(command_queue: cl_command_queue,
        user_func: Option<cl_native_kernel_fn>, args: *mut c_void, cb_args: size_t,
        num_mem_objects: cl_uint, mem_list: *const cl_mem, args_mem_loc: *const *const c_void,
        num_events_in_wait_list: cl_uint, event_wait_list: *const cl_event,
        event: *mut cl_event) -> cl_int
{
    status(call("clEnqueueNativeKernel", |s| {
        let (_, failed) = enqueue_prelude(s, command_queue, num_events_in_wait_list,
            event_wait_list)?;
        let f = user_func.ok_or(ffi::CL_INVALID_VALUE)?;
        if args.is_null() != (cb_args == 0) || (args.is_null() && num_mem_objects > 0) {
            return Err(ffi::CL_INVALID_VALUE);
        }
        if (num_mem_objects == 0) != mem_list.is_null()
                || mem_list.is_null() != args_mem_loc.is_null() {
            return Err(ffi::CL_INVALID_VALUE);
        }
        let device = s.queue(command_queue as usize)?.device;
        if s.device(device)?.exec_capabilities & ffi::CL_EXEC_NATIVE_KERNEL == 0 {
            return Err(ffi::CL_INVALID_OPERATION);
        }

        let mut copy = if args.is_null() {
            Vec::new()
        } else {
            std::slice::from_raw_parts(args as *const u8, cb_args).to_vec()
        };
        for (idx, handle) in handles(num_mem_objects, mem_list).into_iter().enumerate() {
            let contents = s.mem(handle)?.host_address(0) as usize;
            let loc = (*args_mem_loc.add(idx) as usize).wrapping_sub(args as usize);
            if loc.checked_add(PTR_SIZE).map_or(true, |end| end > copy.len()) {
                return Err(ffi::CL_INVALID_VALUE);
            }
            copy[loc..loc + PTR_SIZE].copy_from_slice(&contents.to_ne_bytes());
        }

        if !failed {
            s.pending.push(Pending::NativeKernel { f, args: copy });
        }
        finish_command(s, command_queue, ffi::CL_COMMAND_NATIVE_KERNEL, false, failed, event)
    }))
}
