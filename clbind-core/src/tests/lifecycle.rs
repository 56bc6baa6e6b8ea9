//! Reference counting of wrapped handles.

use crate::{mock, ContextInfo, CommandQueueInfo, MemFlags, MemInfo, DevicePartition, DeviceInfo,
    InfoResult, KernelArg, AddressingMode, FilterMode, Event, CommandExecutionStatus,
    DeviceAffinityDomain};
use super::{init, gpu_setup, build};


#[test]
fn clone_retains_and_drop_releases() {
    let (_, context, queue) = gpu_setup();

    // The queue holds a reference of its own on the context:
    assert_eq!(mock::refcount(context.as_ptr()), Some(2));
    assert_eq!(crate::get_context_info(&context, ContextInfo::ReferenceCount).unwrap().as_uint(),
        Some(2));

    let queue_clone = queue.clone();
    assert_eq!(mock::refcount(queue.as_ptr()), Some(2));
    assert_eq!(crate::get_command_queue_info(&queue, CommandQueueInfo::ReferenceCount).unwrap()
        .as_uint(), Some(2));

    drop(queue_clone);
    assert_eq!(mock::refcount(queue.as_ptr()), Some(1));
}

#[test]
fn objects_keep_their_context_alive() {
    let (_, context, queue) = gpu_setup();
    let buffer = unsafe {
        crate::create_buffer::<u32>(&context, MemFlags::READ_WRITE, 64, None).unwrap()
    };
    let context_ptr = context.as_ptr();

    drop(queue);
    drop(context);
    assert_eq!(mock::refcount(context_ptr), Some(1));

    // Info queries returning a handle retain it:
    match crate::get_mem_object_info(&buffer, MemInfo::Context).unwrap() {
        InfoResult::Context(ctx) => {
            assert_eq!(ctx.as_ptr(), context_ptr);
            assert_eq!(mock::refcount(context_ptr), Some(2));
        },
        other => panic!("unexpected info result: {:?}", other),
    }
    assert_eq!(mock::refcount(context_ptr), Some(1));

    drop(buffer);
    assert_eq!(mock::refcount(context_ptr), None);
    assert_eq!(mock::live_objects(), 0);
}

#[test]
fn every_object_is_released() {
    let (_, context, queue) = gpu_setup();
    {
        let program = build(&context, "__kernel void k(__global uint* out) {}");
        let kernel = crate::create_kernel(&program, "k").unwrap();
        let buffer = unsafe {
            crate::create_buffer::<u32>(&context, MemFlags::READ_WRITE, 16, None).unwrap()
        };
        crate::set_kernel_arg(&kernel, 0, KernelArg::Mem(&buffer)).unwrap();
        let _sampler = crate::create_sampler(&context, false, AddressingMode::None,
            FilterMode::Nearest).unwrap();

        let mut event = Event::null();
        unsafe {
            crate::enqueue_kernel(&queue, &kernel, 1, None, &[16, 1, 1], None, None::<()>,
                Some(&mut event)).unwrap();
        }
        crate::wait_for_event(&event).unwrap();

        let user_event = crate::create_user_event(&context).unwrap();
        crate::set_user_event_status(&user_event, CommandExecutionStatus::Complete).unwrap();

        assert!(mock::live_objects() > 2);
    }
    drop(queue);
    drop(context);
    assert_eq!(mock::live_objects(), 0);
}

#[test]
fn sub_devices_are_released_on_drop() {
    init();
    let cpu = mock::cpu_device();

    // Root devices are never counted:
    assert_eq!(mock::refcount(cpu.as_ptr()), Some(1));

    let sub_devices = crate::create_sub_devices(&cpu, &DevicePartition::Equally(2)).unwrap();
    assert_eq!(sub_devices.len(), 2);
    let ptrs: Vec<_> = sub_devices.iter().map(|d| d.as_ptr()).collect();

    for sub_device in sub_devices.iter() {
        assert_eq!(mock::refcount(sub_device.as_ptr()), Some(1));
        match crate::get_device_info(sub_device, DeviceInfo::ParentDevice).unwrap() {
            InfoResult::Device(Some(parent)) => assert_eq!(parent, cpu),
            other => panic!("unexpected info result: {:?}", other),
        }
        assert_eq!(crate::get_device_info(sub_device, DeviceInfo::MaxComputeUnits).unwrap()
            .as_uint(), Some(2));
    }

    let first_clone = sub_devices[0].clone();
    assert_eq!(mock::refcount(ptrs[0]), Some(2));
    drop(first_clone);

    drop(sub_devices);
    for ptr in ptrs {
        assert_eq!(mock::refcount(ptr), None);
    }
}

#[test]
fn gpu_device_cannot_be_partitioned() {
    init();
    let err = crate::create_sub_devices(&mock::gpu_device(), &DevicePartition::Equally(2))
        .unwrap_err();
    assert!(err.api_status().is_some());
}

#[test]
fn empty_partition_skips_the_second_call() {
    init();
    let partition = DevicePartition::ByAffinityDomain(DeviceAffinityDomain::NUMA);
    let sub_devices = crate::create_sub_devices(&mock::cpu_device(), &partition).unwrap();
    assert!(sub_devices.is_empty());
    assert_eq!(mock::call_count("clCreateSubDevices"), 1);
}
