//! Availability, platform lists, and device lists.

use clbind_core::mock;
use crate::{availability, Availability, Platform, PlatformList, Device, DeviceList, DeviceType,
    DeviceInfo, Error, Status};
use super::init;


#[test]
fn availability_states() {
    init();
    assert_eq!(availability(), Availability::Available);
    assert!(availability().is_available());

    mock::hide_devices(DeviceType::ALL);
    assert_eq!(availability(), Availability::DeviceNotFound);
    assert_eq!(availability().code(), -3);

    mock::set_platform_count(0);
    let avail = availability();
    assert_eq!(avail, Availability::ConfigurationNotComplete);
    assert_eq!(avail.to_string(), "OpenCL configuration is not complete.");
}

#[test]
fn platform_list() {
    init();
    let platforms = PlatformList::new().unwrap();
    assert_eq!(platforms.len(), 1);

    let platform = platforms.get(0).unwrap();
    assert_eq!(platform.name().unwrap(), "clbind mock platform");
    assert_eq!(platform.vendor().unwrap(), "clbind");
    assert_eq!(platform.version().unwrap().major(), 1);
    assert_eq!(platform.version().unwrap().minor(), 2);
    assert!(platform.has_extension("cl_khr_icd").unwrap());
    assert_eq!(Platform::default().unwrap(), platform);

    match platforms.get(1) {
        Err(Error::OutOfRange(msg)) =>
            assert_eq!(msg, "Platform index out of range: 1 (length: 1)."),
        other => panic!("unexpected result: {:?}", other),
    }

    mock::set_platform_count(2);
    let platforms = PlatformList::new().unwrap();
    assert_eq!(platforms.len(), 2);
    assert_eq!(platforms.get_one(1).unwrap().len(), 1);
    // Only the first mock platform has devices:
    assert!(Device::list_all(&platforms.get(1).unwrap()).unwrap().is_empty());
}

#[test]
fn device_list() {
    init();
    let platforms = PlatformList::new().unwrap();
    let all = DeviceList::new(&platforms, 0, None).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.get(0).unwrap().name().unwrap(), "clbind mock gpu");
    assert_eq!(all.get(1).unwrap().name().unwrap(), "clbind mock cpu");

    // An empty type means all devices:
    assert_eq!(DeviceList::new(&platforms, 0, Some(DeviceType::empty())).unwrap(), all);

    let gpus = all.filter(DeviceType::GPU).unwrap();
    assert_eq!(gpus.len(), 1);
    assert_eq!(gpus.get(0).unwrap(), Device::new(mock::gpu_device()));
    assert_eq!(gpus.get(0).unwrap().device_type().unwrap(), DeviceType::GPU);

    let cpus = DeviceList::new(&platforms, 0, Some(DeviceType::CPU)).unwrap();
    assert_eq!(cpus.ids(), vec![mock::cpu_device()]);

    let mut merged = gpus.clone();
    merged.append(&cpus);
    assert_eq!(merged, all);
    assert!(all.get(2).is_err());
    assert!(all.get_one(5).is_err());

    let err = DeviceList::new(&platforms, 0, Some(DeviceType::ACCELERATOR)).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_DEVICE_NOT_FOUND));
    assert!(Device::list(&platforms.get(0).unwrap(), Some(DeviceType::ACCELERATOR)).unwrap()
        .is_empty());
}

#[test]
fn device_info() {
    init();
    let gpu = Device::new(mock::gpu_device());
    assert_eq!(gpu.max_wg_size().unwrap(), 256);
    assert_eq!(gpu.max_work_item_sizes().unwrap(), vec![256, 256, 64]);
    assert!(gpu.is_available().unwrap());
    assert_eq!(gpu.platform().unwrap(), Platform::new(mock::platform()));
    assert_eq!(gpu.built_in_kernels().unwrap(), vec!["mock_copy", "mock_fill"]);
    assert_eq!(gpu.info(DeviceInfo::Name).unwrap().into_string().unwrap(), "clbind mock gpu");

    mock::set_device_version(mock::gpu_device(), "OpenCL 1.1 clbind-mock");
    assert_eq!(gpu.version().unwrap().minor(), 1);

    // Display queries every field without failing:
    assert!(format!("{}", gpu).contains("clbind mock gpu"));
}
