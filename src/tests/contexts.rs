//! Contexts and queues.

use std::sync::{Arc, Mutex};
use clbind_core::mock;
use crate::{Context, Queue, Device, DeviceList, Platform, DeviceType, MemFlags, MemObjectType,
    ImageFormat, ImageChannelOrder, ImageChannelDataType, CommandQueueProperties, ContextInfo,
    EventList, Error, Status};
use super::{init, gpu_setup};


#[test]
fn context_from_device_list() {
    let (devices, context, _) = gpu_setup();
    assert_eq!(context.devices(), &devices);
    assert_eq!(context.device(0).unwrap(), Device::new(mock::gpu_device()));
    assert!(context.device(1).is_err());
    assert_eq!(context.info(ContextInfo::NumDevices).unwrap().as_uint(), Some(1));
    // No platform was named at creation:
    assert_eq!(context.platform().unwrap(), None);

    match Context::new(&DeviceList::default()) {
        Err(Error::InvalidArgument(_)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn context_from_device_type() {
    init();
    let context = Context::from_device_type(DeviceType::CPU).unwrap();
    assert_eq!(context.devices().ids(), vec![mock::cpu_device()]);
    assert_eq!(context.platform().unwrap(), Some(Platform::new(mock::platform())));

    let context = Context::from_device_type(DeviceType::ALL).unwrap();
    assert_eq!(context.devices().len(), 2);

    let err = Context::from_device_type(DeviceType::ACCELERATOR).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_DEVICE_NOT_FOUND));
}

#[test]
fn context_error_handler() {
    init();
    let devices = DeviceList::from_devices(vec![mock::gpu_device()]);
    let reports = Arc::new(Mutex::new(Vec::new()));
    let reports_cb = reports.clone();
    let context = Context::with_error_handler(&devices, move |errinfo: &str, private: &[u8]| {
        reports_cb.lock().unwrap().push((errinfo.to_owned(), private.to_vec()));
    }).unwrap();

    assert!(mock::raise_context_error(context.core().as_ptr(), "device lost", &[7]));
    assert_eq!(*reports.lock().unwrap(), vec![("device lost".to_owned(), vec![7u8])]);
}

#[test]
fn supported_image_formats() {
    let (_, context, _) = gpu_setup();
    let formats = context.supported_image_formats(MemFlags::READ_WRITE, MemObjectType::Image2d)
        .unwrap();
    assert!(formats.contains(&ImageFormat::new(ImageChannelOrder::Rgba,
        ImageChannelDataType::UnormInt8)));
    assert!(formats.contains(&ImageFormat::new(ImageChannelOrder::R,
        ImageChannelDataType::Float)));
    assert!(!formats.contains(&ImageFormat::new(ImageChannelOrder::Rgb,
        ImageChannelDataType::UnormInt8)));
}

#[test]
fn queue_basics() {
    let (devices, context, queue) = gpu_setup();
    assert_eq!(queue.device(), devices.get(0).unwrap());
    assert_eq!(queue.device_version().minor(), 2);
    assert_eq!(queue.context().devices(), &devices);
    assert_eq!(queue.properties().unwrap(), CommandQueueProperties::empty());
    queue.flush().unwrap();
    queue.finish().unwrap();

    let props = CommandQueueProperties::OUT_OF_ORDER_EXEC_MODE_ENABLE
        | CommandQueueProperties::PROFILING_ENABLE;
    let ooo = Queue::new(&context, devices.get(0).unwrap(), Some(props)).unwrap();
    assert_eq!(ooo.properties().unwrap(), props);

    // The CPU is not part of this context:
    let err = Queue::new(&context, mock::cpu_device(), None).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_DEVICE));
}

#[test]
fn markers_and_barriers() {
    let (_, _, queue) = gpu_setup();
    let mut events = EventList::new();
    queue.enqueue_marker(Some(&mut events), None).unwrap();
    queue.enqueue_barrier(Some(&mut events), None).unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.is_complete().unwrap());

    let wait = events.clone();
    queue.enqueue_marker(Some(&mut events), Some(&wait)).unwrap();
    assert_eq!(events.len(), 3);
    events.wait().unwrap();

    // No event requested:
    queue.enqueue_barrier(None, None).unwrap();
    assert_eq!(mock::call_count("clEnqueueBarrierWithWaitList"), 2);
}
