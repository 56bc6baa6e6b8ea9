//! Program creation, builds, separate compilation, and program info.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use crate::{mock, Error, ProgramBuildError, ProgramInfo, ProgramBuildInfo, ProgramBinaryType,
    BuildStatus, BuildCallback, InfoResult, KernelArgInfo, Status};
use super::{gpu_setup, cstr, build};

const SRC: &str = r#"
    __kernel void add(__global const float* a, __global float* b) {}
    __kernel void scale(__global float* b, float factor) {}
"#;


fn build_status(program: &crate::Program, device: &crate::DeviceId) -> BuildStatus {
    match crate::get_program_build_info(program, device, ProgramBuildInfo::BuildStatus).unwrap() {
        InfoResult::BuildStatus(status) => status,
        other => panic!("unexpected info result: {:?}", other),
    }
}

fn binary_type(program: &crate::Program, device: &crate::DeviceId) -> ProgramBinaryType {
    match crate::get_program_build_info(program, device, ProgramBuildInfo::BinaryType).unwrap() {
        InfoResult::BinaryType(binary_type) => binary_type,
        other => panic!("unexpected info result: {:?}", other),
    }
}

fn string_info(program: &crate::Program, info: ProgramInfo) -> String {
    crate::get_program_info(program, info).unwrap().into_string().unwrap()
}


#[test]
fn build_reports_program_info() {
    let (device, context, _) = gpu_setup();
    let program = crate::create_program_with_source(&context, &[cstr(SRC)]).unwrap();
    assert_eq!(build_status(&program, &device), BuildStatus::None);

    crate::build_program(&program, None, &cstr("-D N=4 -cl-fast-relaxed-math"), None).unwrap();
    assert_eq!(build_status(&program, &device), BuildStatus::Success);
    assert_eq!(binary_type(&program, &device), ProgramBinaryType::Executable);
    assert_eq!(crate::get_program_build_info(&program, &device, ProgramBuildInfo::BuildOptions)
        .unwrap().into_string().unwrap(), "-D N=4 -cl-fast-relaxed-math");

    assert_eq!(string_info(&program, ProgramInfo::KernelNames), "add;scale");
    assert_eq!(string_info(&program, ProgramInfo::Source), SRC);
    assert_eq!(crate::get_program_info(&program, ProgramInfo::NumKernels).unwrap().as_size(),
        Some(2));
    match crate::get_program_info(&program, ProgramInfo::Devices).unwrap() {
        InfoResult::Devices(devices) => assert_eq!(devices, vec![device]),
        other => panic!("unexpected info result: {:?}", other),
    }

    let kernels = crate::create_kernels_in_program(&program).unwrap();
    let names: Vec<String> = kernels.iter().map(|k| crate::get_kernel_name(k).unwrap()).collect();
    assert_eq!(names, vec!["add".to_owned(), "scale".to_owned()]);
}

#[test]
fn build_failure_returns_the_log() {
    let (device, context, _) = gpu_setup();
    let src = "__kernel void k(__global uint* out) {}\n#error missing feature\n";

    let err = crate::create_build_program(&context, &[cstr(src)], None, &cstr("")).unwrap_err();
    let log = err.build_log().expect("build error without a log");
    assert!(log.contains("<source>:2:1: error: missing feature"), "log: {}", log);
    match err {
        Error::ProgramBuild(ref build_err) =>
            assert_eq!(build_err.code(), Some(Status::CL_BUILD_PROGRAM_FAILURE as i32)),
        ref other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("missing feature"));

    let program = crate::create_program_with_source(&context, &[cstr(src)]).unwrap();
    assert!(crate::build_program(&program, None, &cstr(""), None).is_err());
    assert_eq!(build_status(&program, &device), BuildStatus::Error);
    assert_eq!(crate::program_build_log(&program, &[device]).unwrap(),
        "<source>:2:1: error: missing feature");

    // No kernels can be created from a failed build:
    let err = crate::create_kernel(&program, "k").unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_PROGRAM_EXECUTABLE));
}

#[test]
fn invalid_build_options_are_rejected() {
    let (_, context, _) = gpu_setup();
    let program = crate::create_program_with_source(&context, &[cstr(SRC)]).unwrap();

    let err = crate::build_program(&program, None, &cstr("-O9000"), None).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_BUILD_OPTIONS));
    assert!(err.build_log().is_none());

    match crate::build_program(&program, Some(&[]), &cstr(""), None).unwrap_err() {
        Error::ProgramBuild(ProgramBuildError::DeviceListEmpty) => (),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn rejected_build_drops_its_callback() {
    let (_, context, _) = gpu_setup();
    let program = crate::create_program_with_source(&context, &[cstr(SRC)]).unwrap();

    let called = Arc::new(AtomicBool::new(false));
    let called_cb = called.clone();
    let callback: Box<dyn BuildCallback> =
        Box::new(move || called_cb.store(true, Ordering::SeqCst));
    let err = crate::build_program(&program, None, &cstr("-O9000"), Some(callback))
        .unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_BUILD_OPTIONS));
    assert!(!called.load(Ordering::SeqCst));
    assert_eq!(Arc::strong_count(&called), 1);
}

#[test]
fn failed_link_still_calls_its_callback() {
    let (_, context, _) = gpu_setup();
    let program = crate::create_program_with_source(&context,
        &[cstr("__kernel void k(uint x) {}")]).unwrap();
    crate::compile_program(&program, None, &cstr(""), &[], &[], None).unwrap();

    let called = Arc::new(AtomicBool::new(false));
    let called_cb = called.clone();
    let callback: Box<dyn BuildCallback> =
        Box::new(move || called_cb.store(true, Ordering::SeqCst));
    let err = crate::link_program(&context, None, &cstr(""), &[&program, &program],
        Some(callback)).unwrap_err();
    assert!(err.build_log().unwrap().contains("duplicate kernel 'k'"));
    assert!(called.load(Ordering::SeqCst));
    assert_eq!(Arc::strong_count(&called), 1);
}

#[test]
fn rebuilding_with_attached_kernels_fails() {
    let (_, context, _) = gpu_setup();
    let program = build(&context, SRC);
    let kernel = crate::create_kernel(&program, "add").unwrap();

    let err = crate::build_program(&program, None, &cstr(""), None).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_OPERATION));

    drop(kernel);
    crate::build_program(&program, None, &cstr(""), None).unwrap();
}

#[test]
fn build_callback_is_called() {
    let (_, context, _) = gpu_setup();
    let program = crate::create_program_with_source(&context, &[cstr(SRC)]).unwrap();

    let called = Arc::new(AtomicBool::new(false));
    let called_cb = called.clone();
    let callback: Box<dyn BuildCallback> =
        Box::new(move || called_cb.store(true, Ordering::SeqCst));
    crate::build_program(&program, None, &cstr(""), Some(callback)).unwrap();
    assert!(called.load(Ordering::SeqCst));
}

#[test]
fn binaries_round_trip() {
    let (device, context, _) = gpu_setup();
    let program = build(&context, SRC);

    let binaries = crate::get_program_binaries(&program).unwrap();
    assert_eq!(binaries.len(), 1);
    assert!(binaries[0].starts_with(b"MOCKBIN\n"));
    match crate::get_program_info(&program, ProgramInfo::BinarySizes).unwrap() {
        InfoResult::Sizes(sizes) => assert_eq!(sizes, vec![binaries[0].len()]),
        other => panic!("unexpected info result: {:?}", other),
    }

    let loaded = crate::create_program_with_binary(&context, &[device], &[&binaries[0][..]])
        .unwrap();
    crate::build_program(&loaded, None, &cstr(""), None).unwrap();
    assert_eq!(string_info(&loaded, ProgramInfo::KernelNames), "add;scale");

    // Argument info is not kept in binaries:
    let kernel = crate::create_kernel(&loaded, "scale").unwrap();
    let err = crate::get_kernel_arg_info(&kernel, 1, KernelArgInfo::Name).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_KERNEL_ARG_INFO_NOT_AVAILABLE));

    let err = crate::create_program_with_binary(&context, &[device], &[&b"not a binary"[..]])
        .unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_BINARY));

    // One binary per device:
    let err = crate::create_program_with_binary(&context, &[device], &[]).unwrap_err();
    assert!(err.api_status().is_none());
}

#[test]
fn built_in_kernels() {
    let (device, context, _) = gpu_setup();
    let program = crate::create_program_with_built_in_kernels(&context, &[device],
        &cstr("mock_copy; mock_fill")).unwrap();
    assert_eq!(string_info(&program, ProgramInfo::KernelNames), "mock_copy;mock_fill");
    crate::create_kernel(&program, "mock_fill").unwrap();

    let err = crate::create_program_with_built_in_kernels(&context, &[device],
        &cstr("mock_copy;mock_sort")).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_VALUE));

    let other_device = mock::cpu_device();
    let err = crate::create_program_with_built_in_kernels(&context, &[other_device],
        &cstr("mock_copy")).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_DEVICE));
}

#[test]
fn compile_with_headers_then_link() {
    let (device, context, _) = gpu_setup();
    let header = crate::create_program_with_source(&context, &[cstr("#define N 4\n")]).unwrap();
    let main = crate::create_program_with_source(&context,
        &[cstr("#include \"common.h\"\n__kernel void k(__global uint* out) {}\n")]).unwrap();

    // The header must be supplied under the included name:
    let err = crate::compile_program(&main, None, &cstr(""), &[], &[], None).unwrap_err();
    assert_eq!(err.build_log(), Some("<source>:1:1: error: 'common.h' file not found"));

    let err = crate::compile_program(&main, None, &cstr(""), &[&header], &[], None).unwrap_err();
    assert!(err.api_status().is_none());

    crate::compile_program(&main, None, &cstr(""), &[&header], &[cstr("common.h")], None)
        .unwrap();
    assert_eq!(binary_type(&main, &device), ProgramBinaryType::CompiledObject);

    // Compiled objects are not executable:
    let err = crate::create_kernel(&main, "k").unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_PROGRAM_EXECUTABLE));

    let lib = crate::create_program_with_source(&context,
        &[cstr("__kernel void other(uint x) {}")]).unwrap();
    crate::compile_program(&lib, None, &cstr(""), &[], &[], None).unwrap();

    let linked = crate::link_program(&context, None, &cstr(""), &[&main, &lib], None).unwrap();
    assert_eq!(binary_type(&linked, &device), ProgramBinaryType::Executable);
    assert_eq!(string_info(&linked, ProgramInfo::KernelNames), "k;other");
    crate::create_kernel(&linked, "other").unwrap();

    let library = crate::link_program(&context, None, &cstr("-create-library"), &[&lib], None)
        .unwrap();
    assert_eq!(binary_type(&library, &device), ProgramBinaryType::Library);

    // The same kernel defined twice:
    let err = crate::link_program(&context, None, &cstr(""), &[&main, &main], None).unwrap_err();
    match err {
        Error::ProgramBuild(ProgramBuildError::BuildLog { code, fn_name, ref log }) => {
            assert_eq!(code, Status::CL_LINK_PROGRAM_FAILURE as i32);
            assert_eq!(fn_name, "clLinkProgram");
            assert_eq!(log, "error: duplicate kernel 'k'");
        },
        other => panic!("unexpected error: {:?}", other),
    }

    let err = crate::link_program(&context, None, &cstr("-O2"), &[&lib], None).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_LINKER_OPTIONS));
}
