//! Kernels: arguments, work size checks, and dispatch.

use clbind_core::mock;
use crate::{Program, Kernel, KernelArg, Buffer, Image, Sampler, MemFlags, ImageFormat,
    ImageDescriptor, ImageChannelOrder, ImageChannelDataType, MemObjectType, AddressingMode,
    FilterMode, KernelArgInfo, KernelWorkGroupInfo, InfoResult, EventList, Context, Error,
    Status};
use super::gpu_setup;


static SRC: &str = r#"
    __kernel void add(__global float* buffer, float addend) {
        buffer[get_global_id(0)] += addend;
    }

    __kernel void blur(__global float* out, __local float* tmp, sampler_t smp,
            read_only image2d_t img, float4 weights)
    {
    }
"#;

fn add_kernel(context: &Context) -> (Program, Kernel) {
    let program = Program::create_build(context, &[SRC], "", None).unwrap();
    let kernel = program.create_kernel("add").unwrap();
    (program, kernel)
}

fn invalid_msg(res: crate::Result<()>) -> String {
    match res {
        Err(Error::InvalidArgument(msg)) => msg,
        other => panic!("unexpected result: {:?}", other),
    }
}


#[test]
fn arguments_must_be_set() {
    let (_, context, queue) = gpu_setup();
    let (_, mut kernel) = add_kernel(&context);
    assert_eq!(kernel.name(), "add");
    assert_eq!(kernel.num_args(), 2);

    match kernel.set_arg_scalar(2, 1.0f32) {
        Err(Error::OutOfRange(msg)) =>
            assert_eq!(msg, "Kernel argument index out of range: 2 (length: 2)."),
        other => panic!("unexpected result: {:?}", other),
    }

    let buffer = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 64, None).unwrap();
    kernel.set_arg_buffer(0, &buffer).unwrap();
    let err = kernel.enqueue_nd_range(&queue, &[64], None, None, None, None).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_KERNEL_ARGS));

    // A `float` takes four bytes:
    let err = kernel.set_arg_scalar(1, 1.0f64).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_ARG_SIZE));

    kernel.set_arg_scalar(1, 1.0f32).unwrap();
    let mut events = EventList::new();
    kernel.enqueue_nd_range(&queue, &[64], None, None, Some(&mut events), None).unwrap();
    events.wait().unwrap();

    let dispatch = mock::last_dispatch().unwrap();
    assert_eq!(dispatch.kernel, "add");
    assert_eq!(dispatch.work_dim, 1);
    assert_eq!(dispatch.global_work_size, vec![64]);
    assert_eq!(dispatch.global_work_offset, None);
    assert_eq!(dispatch.local_work_size, None);
}

#[test]
fn work_sizes_are_checked() {
    let (_, context, queue) = gpu_setup();
    let (_, mut kernel) = add_kernel(&context);
    let buffer = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 1024, None).unwrap();
    kernel.set_arg(0, KernelArg::buffer(&buffer)).unwrap();
    kernel.set_arg(1, KernelArg::scalar(0.5f32)).unwrap();

    invalid_msg(kernel.enqueue_nd_range(&queue, &[], None, None, None, None));
    invalid_msg(kernel.enqueue_nd_range(&queue, &[1, 1, 1, 1], None, None, None, None));
    invalid_msg(kernel.enqueue_nd_range(&queue, &[64, 0], None, None, None, None));
    invalid_msg(kernel.enqueue_nd_range(&queue, &[64], Some(&[0]), None, None, None));

    let msg = invalid_msg(kernel.enqueue_nd_range(&queue, &[32, 32], Some(&[8]), None, None,
        None));
    assert_eq!(msg, "Number of dimensions differ: 2 (global), 1 (local).");
    let msg = invalid_msg(kernel.enqueue_nd_range(&queue, &[32, 32], None, Some(&[0, 0, 0]),
        None, None));
    assert_eq!(msg, "Number of dimensions differ: 2 (global), 3 (offset).");

    // Device limits are left to the driver:
    let err = kernel.enqueue_nd_range(&queue, &[64], Some(&[3]), None, None, None).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_WORK_GROUP_SIZE));
    let err = kernel.enqueue_nd_range(&queue, &[512], Some(&[512]), None, None, None)
        .unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_WORK_ITEM_SIZE));
    let err = kernel.enqueue_nd_range(&queue, &[32, 32], Some(&[16, 32]), None, None, None)
        .unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_WORK_GROUP_SIZE));
    assert!(mock::last_dispatch().is_none());

    kernel.enqueue_nd_range(&queue, &[32, 32], Some(&[16, 16]), Some(&[4, 0]), None, None)
        .unwrap();
    let dispatch = mock::last_dispatch().unwrap();
    assert_eq!(dispatch.work_dim, 2);
    assert_eq!(dispatch.global_work_size, vec![32, 32]);
    assert_eq!(dispatch.local_work_size, Some(vec![16, 16]));
    assert_eq!(dispatch.global_work_offset, Some(vec![4, 0]));

    kernel.enqueue_task(&queue, None, None).unwrap();
    let dispatch = mock::last_dispatch().unwrap();
    assert_eq!(dispatch.global_work_size, vec![1]);
    assert_eq!(dispatch.local_work_size, Some(vec![1]));
}

#[test]
fn built_in_fill_writes_the_buffer() {
    let (devices, context, queue) = gpu_setup();
    let program = Program::with_built_in_kernels(&context, &devices, "mock_fill").unwrap();
    let mut fill = Kernel::new(&program, "mock_fill").unwrap();

    let buffer = Buffer::<u32>::new(&context, MemFlags::READ_WRITE, 16, None).unwrap();
    buffer.fill(&queue, &[0], 0, 0, None, None).unwrap();
    fill.set_arg_buffer(0, &buffer).unwrap();
    fill.set_arg_scalar(1, 7u32).unwrap();

    fill.enqueue_nd_range(&queue, &[8], None, Some(&[4]), None, None).unwrap();
    let mut out = vec![0u32; 16];
    buffer.read(&queue, &mut out, 0, 0, None, None).unwrap();
    assert_eq!(&out[..4], &[0, 0, 0, 0]);
    assert_eq!(&out[4..12], &[7; 8]);
    assert_eq!(&out[12..], &[0, 0, 0, 0]);
    assert_eq!(mock::last_dispatch().unwrap().kernel, "mock_fill");
}

#[test]
fn memory_sampler_local_and_vector_arguments() {
    let (devices, context, queue) = gpu_setup();
    let program = Program::create_build(&context, &[SRC], "", None).unwrap();
    let mut blur = program.create_kernel("blur").unwrap();
    assert_eq!(blur.num_args(), 5);

    let image = Image::new::<f32>(&context, MemFlags::READ_ONLY,
        ImageFormat::new(ImageChannelOrder::R, ImageChannelDataType::Float),
        ImageDescriptor::new(MemObjectType::Image2d, 8, 8, 1, 1, 0, 0, None), None).unwrap();
    let sampler = Sampler::new(&context, false, AddressingMode::ClampToEdge,
        FilterMode::Nearest).unwrap();
    let buffer = Buffer::<f32>::new(&context, MemFlags::WRITE_ONLY, 64, None).unwrap();

    // Images and buffers are not interchangeable:
    let err = blur.set_arg(3, KernelArg::buffer(&buffer)).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_ARG_VALUE));
    let err = blur.set_arg(2, KernelArg::SamplerNull).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_ARG_VALUE));

    blur.set_arg(0, KernelArg::MemNull).unwrap();
    blur.set_arg_local::<f32>(1, 64).unwrap();
    blur.set_arg(2, KernelArg::sampler(&sampler)).unwrap();
    blur.set_arg(3, KernelArg::image(&image)).unwrap();
    blur.set_arg(4, KernelArg::vector(&[0.25f32, 0.5, 0.25, 0.0])).unwrap();
    blur.set_arg(0, KernelArg::buffer(&buffer)).unwrap();

    let gpu = devices.get(0).unwrap();
    match blur.work_group_info(gpu, KernelWorkGroupInfo::LocalMemSize).unwrap() {
        InfoResult::Ulong(size) => assert_eq!(size, 256),
        other => panic!("unexpected info result: {:?}", other),
    }
    assert_eq!(blur.max_wg_size(gpu).unwrap(), 256);

    blur.enqueue_nd_range(&queue, &[8, 8], Some(&[8, 8]), None, None, None).unwrap();
    assert_eq!(mock::last_dispatch().unwrap().kernel, "blur");
}

#[test]
fn argument_info() {
    let (_, context, _) = gpu_setup();
    let (_, kernel) = add_kernel(&context);
    assert_eq!(kernel.arg_info(0, KernelArgInfo::Name).unwrap().into_string().unwrap(),
        "buffer");
    assert_eq!(kernel.arg_info(1, KernelArgInfo::TypeName).unwrap().into_string().unwrap(),
        "float");
    assert!(kernel.arg_info(2, KernelArgInfo::Name).is_err());
    assert!(format!("{}", kernel).contains("FunctionName"));
}

#[test]
fn kernel_holds_its_memory_and_sampler_arguments() {
    let (_, context, queue) = gpu_setup();
    let (_, mut kernel) = add_kernel(&context);
    let buffer = Buffer::<f32>::new(&context, MemFlags::READ_WRITE, 64, None).unwrap();
    let buffer_ptr = buffer.core().as_ptr();

    kernel.set_arg_buffer(0, &buffer).unwrap();
    kernel.set_arg_scalar(1, 1.0f32).unwrap();
    assert_eq!(mock::refcount(buffer_ptr), Some(2));

    drop(buffer);
    assert_eq!(mock::refcount(buffer_ptr), Some(1));
    kernel.enqueue_nd_range(&queue, &[64], None, None, None, None).unwrap();

    // Replacing the argument releases the old buffer:
    kernel.set_arg(0, KernelArg::MemNull).unwrap();
    assert_eq!(mock::refcount(buffer_ptr), None);

    let program = Program::create_build(&context, &[SRC], "", None).unwrap();
    let mut blur = program.create_kernel("blur").unwrap();
    let sampler = Sampler::new(&context, true, AddressingMode::Repeat, FilterMode::Linear)
        .unwrap();
    let sampler_ptr = sampler.core().as_ptr();
    blur.set_arg(2, KernelArg::sampler(&sampler)).unwrap();
    drop(sampler);
    assert_eq!(mock::refcount(sampler_ptr), Some(1));
    drop(blur);
    assert_eq!(mock::refcount(sampler_ptr), None);
}
