//! Kernel arguments, kernel info, and dispatch.

use std::sync::atomic::{AtomicUsize, Ordering};
use crate::ffi::c_void;
use crate::{mock, Event, MemFlags, KernelArg, KernelInfo, KernelArgInfo, KernelWorkGroupInfo,
    KernelArgAddressQualifier, KernelArgAccessQualifier, KernelArgTypeQualifier, InfoResult,
    Status, AddressingMode, FilterMode, ImageFormat, ImageDescriptor, ImageChannelOrder,
    ImageChannelDataType, MemObjectType};
use super::{init, context_queue, gpu_setup, cstr, build};

const SRC: &str = r#"
    __kernel void saxpy(__global const float* x, __global float* y, float a,
            __local float* scratch) {}
    __kernel void sample(read_only image2d_t img, sampler_t s, __global float4* out) {}
"#;


fn read_u32s(queue: &crate::CommandQueue, buffer: &crate::Mem, len: usize) -> Vec<u32> {
    let mut out = vec![0u32; len];
    unsafe {
        crate::enqueue_read_buffer(queue, buffer, true, 0, &mut out, None::<()>,
            None::<&mut Event>).unwrap();
    }
    out
}


#[test]
fn arg_info_describes_the_signature() {
    let (_, context, _) = gpu_setup();
    let program = build(&context, SRC);
    let kernel = crate::create_kernel(&program, "saxpy").unwrap();

    assert_eq!(crate::get_kernel_info(&kernel, KernelInfo::NumArgs).unwrap().as_uint(),
        Some(4));
    match crate::get_kernel_info(&kernel, KernelInfo::Program).unwrap() {
        InfoResult::Program(prog) => assert_eq!(prog.as_ptr(), program.as_ptr()),
        other => panic!("unexpected info result: {:?}", other),
    }

    let arg_str = |idx, info| crate::get_kernel_arg_info(&kernel, idx, info).unwrap()
        .into_string().unwrap();
    assert_eq!(arg_str(0, KernelArgInfo::Name), "x");
    assert_eq!(arg_str(0, KernelArgInfo::TypeName), "float*");
    assert_eq!(arg_str(2, KernelArgInfo::TypeName), "float");

    match crate::get_kernel_arg_info(&kernel, 0, KernelArgInfo::TypeQualifier).unwrap() {
        InfoResult::ArgTypeQualifier(q) => assert_eq!(q, KernelArgTypeQualifier::CONST),
        other => panic!("unexpected info result: {:?}", other),
    }
    match crate::get_kernel_arg_info(&kernel, 3, KernelArgInfo::AddressQualifier).unwrap() {
        InfoResult::ArgAddressQualifier(KernelArgAddressQualifier::Local) => (),
        other => panic!("unexpected info result: {:?}", other),
    }
    match crate::get_kernel_arg_info(&kernel, 2, KernelArgInfo::AddressQualifier).unwrap() {
        InfoResult::ArgAddressQualifier(KernelArgAddressQualifier::Private) => (),
        other => panic!("unexpected info result: {:?}", other),
    }

    let sample = crate::create_kernel(&program, "sample").unwrap();
    match crate::get_kernel_arg_info(&sample, 0, KernelArgInfo::AccessQualifier).unwrap() {
        InfoResult::ArgAccessQualifier(KernelArgAccessQualifier::ReadOnly) => (),
        other => panic!("unexpected info result: {:?}", other),
    }

    let err = crate::get_kernel_arg_info(&kernel, 4, KernelArgInfo::Name).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_ARG_INDEX));

    let err = crate::create_kernel(&program, "missing").unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_KERNEL_NAME));
}

#[test]
fn set_args_are_checked() {
    let (_, context, _) = gpu_setup();
    let program = build(&context, SRC);
    let kernel = crate::create_kernel(&program, "saxpy").unwrap();
    let buffer = unsafe {
        crate::create_buffer::<f32>(&context, MemFlags::READ_WRITE, 16, None).unwrap()
    };

    crate::set_kernel_arg(&kernel, 0, KernelArg::Mem(&buffer)).unwrap();
    crate::set_kernel_arg(&kernel, 1, KernelArg::MemNull).unwrap();
    crate::set_kernel_arg(&kernel, 2, KernelArg::scalar(&2.0f32)).unwrap();
    crate::set_kernel_arg(&kernel, 3, KernelArg::Local(256)).unwrap();

    let err = crate::set_kernel_arg(&kernel, 2, KernelArg::scalar(&2.0f64)).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_ARG_SIZE));
    assert!(err.to_string().contains("saxpy"), "error: {}", err);

    let err = crate::set_kernel_arg(&kernel, 3, KernelArg::Local(0)).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_ARG_SIZE));

    let err = crate::set_kernel_arg(&kernel, 9, KernelArg::MemNull).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_ARG_INDEX));

    // Images and samplers go only where declared:
    let sample = crate::create_kernel(&program, "sample").unwrap();
    let err = crate::set_kernel_arg(&sample, 0, KernelArg::Mem(&buffer)).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_ARG_VALUE));

    let format = ImageFormat::new(ImageChannelOrder::Rgba, ImageChannelDataType::Float);
    let desc = ImageDescriptor::new(MemObjectType::Image2d, 8, 8, 0, 0, 0, 0, None);
    let image = unsafe {
        crate::create_image::<f32>(&context, MemFlags::READ_ONLY, &format, &desc, None).unwrap()
    };
    let sampler = crate::create_sampler(&context, false, AddressingMode::Clamp,
        FilterMode::Nearest).unwrap();
    crate::set_kernel_arg(&sample, 0, KernelArg::Mem(&image)).unwrap();
    crate::set_kernel_arg(&sample, 1, KernelArg::Sampler(&sampler)).unwrap();
    let err = crate::set_kernel_arg(&sample, 1, KernelArg::SamplerNull).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_ARG_VALUE));
}

#[test]
fn work_group_info() {
    let (device, context, _) = gpu_setup();
    let program = build(&context, SRC);
    let kernel = crate::create_kernel(&program, "saxpy").unwrap();

    assert_eq!(crate::get_kernel_work_group_info(&kernel, &device,
        KernelWorkGroupInfo::WorkGroupSize).unwrap().as_size(), Some(256));
    assert_eq!(crate::get_kernel_work_group_info(&kernel, &device,
        KernelWorkGroupInfo::PreferredWorkGroupSizeMultiple).unwrap().as_size(), Some(32));
    assert_eq!(crate::get_kernel_work_group_info(&kernel, &device,
        KernelWorkGroupInfo::LocalMemSize).unwrap().as_ulong(), Some(0));

    crate::set_kernel_arg(&kernel, 3, KernelArg::Local(512)).unwrap();
    assert_eq!(crate::get_kernel_work_group_info(&kernel, &device,
        KernelWorkGroupInfo::LocalMemSize).unwrap().as_ulong(), Some(512));
}

#[test]
fn dispatch_is_recorded() {
    let (_, context, queue) = gpu_setup();
    let program = build(&context, SRC);
    let kernel = crate::create_kernel(&program, "saxpy").unwrap();
    let buffer = unsafe {
        crate::create_buffer::<f32>(&context, MemFlags::READ_WRITE, 1024, None).unwrap()
    };

    // Every argument must be set first:
    crate::set_kernel_arg(&kernel, 0, KernelArg::Mem(&buffer)).unwrap();
    let err = unsafe {
        crate::enqueue_kernel(&queue, &kernel, 1, None, &[1024, 1, 1], None, None::<()>,
            None::<&mut Event>).unwrap_err()
    };
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_KERNEL_ARGS));

    crate::set_kernel_arg(&kernel, 1, KernelArg::Mem(&buffer)).unwrap();
    crate::set_kernel_arg(&kernel, 2, KernelArg::scalar(&0.5f32)).unwrap();
    crate::set_kernel_arg(&kernel, 3, KernelArg::Local(64)).unwrap();

    let mut event = Event::null();
    unsafe {
        crate::enqueue_kernel(&queue, &kernel, 2, Some([0, 8, 0]), &[32, 16, 1],
            Some([16, 4, 1]), None::<()>, Some(&mut event)).unwrap();
    }
    crate::wait_for_event(&event).unwrap();

    let dispatch = mock::last_dispatch().unwrap();
    assert_eq!(dispatch.kernel, "saxpy");
    assert_eq!(dispatch.work_dim, 2);
    assert_eq!(dispatch.global_work_offset, Some(vec![0, 8]));
    assert_eq!(dispatch.global_work_size, vec![32, 16]);
    assert_eq!(dispatch.local_work_size, Some(vec![16, 4]));

    unsafe {
        crate::enqueue_task(&queue, &kernel, None::<()>, None::<&mut Event>).unwrap();
    }
    assert_eq!(mock::dispatches().len(), 2);
    assert_eq!(mock::last_dispatch().unwrap().global_work_size, vec![1]);
}

#[test]
fn work_sizes_are_checked() {
    let (_, context, queue) = gpu_setup();
    let program = build(&context, "__kernel void k() {}");
    let kernel = crate::create_kernel(&program, "k").unwrap();

    let enqueue = |dims: u32, global: [usize; 3], local: Option<[usize; 3]>| unsafe {
        crate::enqueue_kernel(&queue, &kernel, dims, None, &global, local, None::<()>,
            None::<&mut Event>)
    };

    enqueue(3, [64, 64, 64], Some([4, 4, 4])).unwrap();
    assert_eq!(enqueue(4, [64, 1, 1], None).unwrap_err().api_status(),
        Some(Status::CL_INVALID_WORK_DIMENSION));
    assert_eq!(enqueue(1, [0, 1, 1], None).unwrap_err().api_status(),
        Some(Status::CL_INVALID_GLOBAL_WORK_SIZE));
    assert_eq!(enqueue(1, [64, 1, 1], Some([48, 1, 1])).unwrap_err().api_status(),
        Some(Status::CL_INVALID_WORK_GROUP_SIZE));
    assert_eq!(enqueue(1, [1024, 1, 1], Some([512, 1, 1])).unwrap_err().api_status(),
        Some(Status::CL_INVALID_WORK_ITEM_SIZE));
    assert_eq!(enqueue(2, [64, 64, 1], Some([32, 32, 1])).unwrap_err().api_status(),
        Some(Status::CL_INVALID_WORK_GROUP_SIZE));
    assert_eq!(mock::dispatches().len(), 1);
}

#[test]
fn built_in_kernels_run() {
    let (device, context, queue) = gpu_setup();
    let program = crate::create_program_with_built_in_kernels(&context, &[device],
        &cstr("mock_copy;mock_fill")).unwrap();
    let src = unsafe {
        crate::create_buffer::<u32>(&context, MemFlags::READ_WRITE, 16, None).unwrap()
    };
    let dst = unsafe {
        crate::create_buffer::<u32>(&context, MemFlags::READ_WRITE, 16, None).unwrap()
    };

    let fill = crate::create_kernel(&program, "mock_fill").unwrap();
    crate::set_kernel_arg(&fill, 0, KernelArg::Mem(&src)).unwrap();
    crate::set_kernel_arg(&fill, 1, KernelArg::scalar(&0xABu32)).unwrap();
    unsafe {
        crate::enqueue_kernel(&queue, &fill, 1, Some([4, 0, 0]), &[8, 1, 1], None, None::<()>,
            None::<&mut Event>).unwrap();
    }
    let filled = read_u32s(&queue, &src, 16);
    assert_eq!(&filled[..4], &[0; 4]);
    assert_eq!(&filled[4..12], &[0xAB; 8]);
    assert_eq!(&filled[12..], &[0; 4]);

    // One byte per work item:
    let copy = crate::create_kernel(&program, "mock_copy").unwrap();
    crate::set_kernel_arg(&copy, 0, KernelArg::Mem(&src)).unwrap();
    crate::set_kernel_arg(&copy, 1, KernelArg::Mem(&dst)).unwrap();
    unsafe {
        crate::enqueue_kernel(&queue, &copy, 1, None, &[64, 1, 1], None, None::<()>,
            None::<&mut Event>).unwrap();
    }
    crate::finish(&queue).unwrap();
    assert_eq!(read_u32s(&queue, &dst, 16), filled);
}

static NATIVE_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Arguments: a pointer to a buffer's contents, then a `u32` to store in
/// its first four elements.
extern "system" fn native_fill(args: *mut c_void) {
    unsafe {
        let bytes = args as *mut u8;
        let contents = *(bytes as *const *mut u32);
        let value = *(bytes.add(std::mem::size_of::<usize>()) as *const u32);
        for idx in 0..4 {
            *contents.add(idx) = value;
        }
    }
    NATIVE_CALLS.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn native_kernels_run_on_the_cpu() {
    init();
    let (context, queue) = context_queue(mock::cpu_device(), None);
    let buffer = unsafe {
        crate::create_buffer::<u32>(&context, MemFlags::READ_WRITE, 8, None).unwrap()
    };

    let ptr_size = std::mem::size_of::<usize>();
    let mut args = vec![0u8; ptr_size + 4];
    args[ptr_size..].copy_from_slice(&77u32.to_ne_bytes());

    let calls_before = NATIVE_CALLS.load(Ordering::SeqCst);
    unsafe {
        crate::enqueue_native_kernel(&queue, native_fill, &mut args, &[&buffer], &[0],
            None::<()>, None::<&mut Event>).unwrap();
    }
    crate::finish(&queue).unwrap();
    assert!(NATIVE_CALLS.load(Ordering::SeqCst) > calls_before);
    assert_eq!(read_u32s(&queue, &buffer, 8), vec![77, 77, 77, 77, 0, 0, 0, 0]);

    // The locations must fit inside the arguments:
    let err = unsafe {
        crate::enqueue_native_kernel(&queue, native_fill, &mut args, &[&buffer], &[8],
            None::<()>, None::<&mut Event>).unwrap_err()
    };
    assert!(err.api_status().is_none());

    // GPU devices cannot run native kernels:
    let (gpu_context, gpu_queue) = context_queue(mock::gpu_device(), None);
    let gpu_buffer = unsafe {
        crate::create_buffer::<u32>(&gpu_context, MemFlags::READ_WRITE, 8, None).unwrap()
    };
    let err = unsafe {
        crate::enqueue_native_kernel(&gpu_queue, native_fill, &mut args, &[&gpu_buffer], &[0],
            None::<()>, None::<&mut Event>).unwrap_err()
    };
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_OPERATION));
}
