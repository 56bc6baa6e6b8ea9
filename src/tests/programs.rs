//! Programs: building from source, binaries, built-in kernels, and separate
//! compilation and linking.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use clbind_core::BuildStatus;
use crate::{Program, ProgramSource, DeviceList, ProgramInfo, ProgramBuildInfo, Error, Status};
use super::gpu_setup;


static ADD_SRC: &str = r#"
    __kernel void add(__global float* buffer, float addend) {
        buffer[get_global_id(0)] += addend;
    }

    __kernel void scale(__global float* buffer, float factor) {
        buffer[get_global_id(0)] *= factor;
    }
"#;


#[test]
fn build_from_source() {
    let (devices, context, _) = gpu_setup();
    let program = Program::create_build(&context, &[ADD_SRC], "-D FACTOR=2 -cl-fast-relaxed-math",
        None).unwrap();

    assert_eq!(program.build_status(devices.get(0).unwrap()).unwrap(), BuildStatus::Success);
    assert_eq!(program.kernel_names().unwrap(), vec!["add", "scale"]);
    assert_eq!(program.devices().unwrap(), devices);
    assert_eq!(program.build_log(None).unwrap(), "");
    assert_eq!(program.build_info(devices.get(0).unwrap(), ProgramBuildInfo::BuildOptions)
        .unwrap().into_string().unwrap(), "-D FACTOR=2 -cl-fast-relaxed-math");

    // Several source strings are concatenated:
    let split = Program::with_source(&context, &[
        "__kernel void first(__global int* a) {}\n".to_owned(),
        "__kernel void second(__global int* a) {}\n".to_owned(),
    ]).unwrap();
    split.build("", Some(&devices)).unwrap();
    assert_eq!(split.kernel_names().unwrap(), vec!["first", "second"]);

    let empty: [&str; 0] = [];
    match Program::with_source(&context, &empty) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn build_failure_carries_the_log() {
    let (devices, context, _) = gpu_setup();
    let src = "__kernel void broken(__global int* a) {}\n#error missing semicolon\n";
    let program = Program::with_source(&context, &[src]).unwrap();

    let err = program.build("", None).unwrap_err();
    assert_eq!(err.build_log(), Some("<source>:2:1: error: missing semicolon"));
    assert!(err.to_string().contains("missing semicolon"));
    assert_eq!(program.build_status(devices.get(0).unwrap()).unwrap(), BuildStatus::Error);
    assert_eq!(program.build_log(Some(&devices)).unwrap(),
        "<source>:2:1: error: missing semicolon");

    // Options the compiler does not know:
    let program = Program::with_source(&context, &[ADD_SRC]).unwrap();
    let err = program.build("-O9000", None).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_BUILD_OPTIONS));
    assert_eq!(err.build_log(), None);
}

#[test]
fn explicit_empty_device_list_is_rejected() {
    let (_, context, _) = gpu_setup();
    let program = Program::with_source(&context, &[ADD_SRC]).unwrap();
    match program.build("", Some(&DeviceList::default())) {
        Err(Error::InvalidArgument(msg)) =>
            assert_eq!(msg, "Program::build: the device list is empty."),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(Program::with_built_in_kernels(&context, &DeviceList::default(), "mock_fill").is_err());
}

#[test]
fn build_callback_runs() {
    let (_, context, _) = gpu_setup();
    let program = Program::with_source(&context, &[ADD_SRC]).unwrap();
    let done = Arc::new(AtomicBool::new(false));
    let done_cb = done.clone();
    program.build_with_callback("", None, move || done_cb.store(true, Ordering::SeqCst))
        .unwrap();
    assert!(done.load(Ordering::SeqCst));
}

#[test]
fn rebuild_with_kernels_attached_fails() {
    let (_, context, _) = gpu_setup();
    let program = Program::create_build(&context, &[ADD_SRC], "", None).unwrap();
    let kernel = program.create_kernel("add").unwrap();
    let err = program.build("", None).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_OPERATION));
    drop(kernel);
    program.build("", None).unwrap();
}

#[test]
fn binaries_round_trip() {
    let (devices, context, _) = gpu_setup();
    let program = Program::create_build(&context, &[ADD_SRC], "", None).unwrap();
    let binaries = program.binaries().unwrap();
    assert_eq!(binaries.len(), 1);
    assert!(binaries[0].starts_with(b"MOCKBIN\n"));
    assert_eq!(program.binary(devices.get(0).unwrap()).unwrap(), binaries[0]);

    let loaded = Program::with_binary(&context, &devices, &[&binaries[0][..]]).unwrap();
    loaded.build("", None).unwrap();
    assert_eq!(loaded.kernel_names().unwrap(), vec!["add", "scale"]);

    let via_new = Program::new(&context, ProgramSource::Binary(binaries.clone()),
        Some(&devices)).unwrap();
    via_new.build("", None).unwrap();
    assert_eq!(via_new.create_kernels().unwrap().len(), 2);

    let err = Program::with_binary(&context, &devices, &[&b"not a binary"[..]]).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_BINARY));
    assert!(Program::with_binary(&context, &devices, &[]).is_err());
    match Program::new(&context, ProgramSource::Binary(binaries), None) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn built_in_kernels() {
    let (devices, context, _) = gpu_setup();
    let program = Program::with_built_in_kernels(&context, &devices, "mock_fill").unwrap();
    assert_eq!(program.kernel_names().unwrap(), vec!["mock_fill"]);

    let program = Program::new(&context,
        ProgramSource::BuiltInKernels("mock_copy;mock_fill".to_owned()), Some(&devices))
        .unwrap();
    let kernels = program.create_kernels().unwrap();
    let names: Vec<&str> = kernels.iter().map(|k| k.name()).collect();
    assert_eq!(names, vec!["mock_copy", "mock_fill"]);

    let err = Program::with_built_in_kernels(&context, &devices, "mock_sort").unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_VALUE));
}

#[test]
fn compile_and_link() {
    let (devices, context, _) = gpu_setup();
    let header = Program::with_source(&context, &["#define SCALE 2.0f\n"]).unwrap();
    let main = Program::with_source(&context,
        &["#include \"scale.h\"\n__kernel void twice(__global float* b) {}\n"]).unwrap();
    let util = Program::with_source(&context, &["__kernel void half(__global float* b) {}\n"])
        .unwrap();

    // Without the header the include fails:
    let err = main.compile(Vec::<(&str, &Program)>::new(), "", None).unwrap_err();
    assert_eq!(err.build_log(), Some("<source>:1:1: error: 'scale.h' file not found"));

    let mut headers = HashMap::new();
    headers.insert("scale.h", &header);
    main.compile(headers, "", None).unwrap();
    util.compile(vec![("unused.h", &header)], "-w", Some(&devices)).unwrap();

    let linked = Program::link(&context, &[&main, &util], "", None).unwrap();
    assert_eq!(linked.kernel_names().unwrap(), vec!["twice", "half"]);
    assert_eq!(linked.create_kernel("half").unwrap().name(), "half");

    let library = Program::new(&context, ProgramSource::Link {
        programs: vec![main.clone()],
        options: "-create-library".to_owned(),
    }, None).unwrap();
    assert_eq!(library.info(ProgramInfo::NumDevices).unwrap().as_uint(), Some(1));

    let err = Program::link(&context, &[&main], "-O2", None).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_LINKER_OPTIONS));
    let err = Program::link(&context, &[&main, &main], "", None).unwrap_err();
    assert_eq!(err.api_status(), None);
    assert!(err.build_log().unwrap().starts_with("error: duplicate kernel"));
    match Program::link(&context, &[], "", None) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn display_lists_info() {
    let (_, context, _) = gpu_setup();
    let program = Program::create_build(&context, &[ADD_SRC], "", None).unwrap();
    let text = format!("{}", program);
    assert!(text.starts_with("Program"));
    assert!(text.contains("KernelNames"));
}
