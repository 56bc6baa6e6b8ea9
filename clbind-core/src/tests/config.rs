//! Platform and device discovery, defaults, versions, and context
//! notifications.

use std::sync::{Arc, Mutex};
use crate::{mock, Error, ApiWrapperError, DeviceType, OpenclVersion, VersionKind, PlatformInfo,
    ContextProperties, ContextNotifier, ContextInfo, DeviceInfo, InfoResult, Status};
use super::init;


#[test]
fn default_settings_parse() {
    assert_eq!(crate::parse_default_platform_idx(None).unwrap(), 0);
    assert_eq!(crate::parse_default_platform_idx(Some(" 2 ")).unwrap(), 2);
    match crate::parse_default_platform_idx(Some("second")) {
        Err(Error::ApiWrapper(ApiWrapperError::DefaultPlatformEnvVarInvalid(ref s)))
            if s == "second" => (),
        other => panic!("unexpected result: {:?}", other),
    }

    assert_eq!(crate::parse_default_device_type(None).unwrap(), DeviceType::ALL);
    assert_eq!(crate::parse_default_device_type(Some("GPU")).unwrap(), DeviceType::GPU);
    assert_eq!(crate::parse_default_device_type(Some("ACCELERATOR")).unwrap(),
        DeviceType::ACCELERATOR);
    assert!(crate::parse_default_device_type(Some("gpu")).is_err());
}

#[test]
fn version_checks() {
    let versions = [OpenclVersion::new(1, 2), OpenclVersion::new(2, 0)];
    crate::verify_versions(&versions, [1, 2], "clCreateImage", VersionKind::Device).unwrap();

    match crate::verify_versions(&versions, [2, 0], "clSVMAlloc", VersionKind::Platform) {
        Err(Error::Version(ref err)) => {
            assert_eq!(err.detected, OpenclVersion::new(1, 2));
            assert_eq!(err.function, "clSVMAlloc");
            assert_eq!(err.kind, VersionKind::Platform);
        },
        other => panic!("unexpected result: {:?}", other),
    }

    assert_eq!(OpenclVersion::from_info_str("OpenCL 1.1 Vendor 4.2"),
        Some(OpenclVersion::new(1, 1)));
    assert_eq!(OpenclVersion::from_info_str("garbage"), None);
}

#[test]
fn device_versions_come_from_the_driver() {
    init();
    let gpu = mock::gpu_device();
    crate::verify_device_versions(&[gpu], [1, 2], "clEnqueueFillBuffer").unwrap();

    assert!(mock::set_device_version(gpu, "OpenCL 1.1 old-driver"));
    assert_eq!(gpu.version().unwrap(), OpenclVersion::new(1, 1));
    let err = crate::verify_device_versions(&[gpu, mock::cpu_device()], [1, 2],
        "clEnqueueFillBuffer").unwrap_err();
    assert!(err.to_string().contains("clEnqueueFillBuffer"), "error: {}", err);
}

#[test]
fn platform_discovery() {
    init();
    let platform = crate::default_platform().unwrap();
    assert_eq!(platform, mock::platform());
    assert_eq!(platform.version().unwrap(), OpenclVersion::new(1, 2));
    assert!(crate::get_platform_info(&platform, PlatformInfo::Extensions).unwrap()
        .into_string().unwrap().contains("cl_khr_icd"));

    mock::set_platform_count(3);
    assert_eq!(crate::get_platform_ids().unwrap().len(), 3);

    mock::set_platform_count(0);
    assert!(crate::get_platform_ids().unwrap().is_empty());
    match crate::default_platform() {
        Err(Error::ApiWrapper(ApiWrapperError::DefaultPlatformNoPlatforms)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn device_discovery() {
    init();
    let platform = mock::platform();

    let all = crate::get_device_ids(&platform, None, None).unwrap();
    assert_eq!(all, vec![mock::gpu_device(), mock::cpu_device()]);
    assert_eq!(crate::get_device_ids(&platform, Some(DeviceType::CPU), None).unwrap(),
        vec![mock::cpu_device()]);
    assert_eq!(crate::get_device_ids(&platform, None, Some(1)).unwrap().len(), 1);
    assert!(crate::get_device_ids(&platform, None, Some(0)).is_err());

    match crate::get_device_info(&mock::gpu_device(), DeviceInfo::Type).unwrap() {
        InfoResult::DeviceType(device_type) => assert_eq!(device_type, DeviceType::GPU),
        other => panic!("unexpected info result: {:?}", other),
    }

    mock::hide_devices(DeviceType::GPU);
    let err = crate::get_device_ids(&platform, Some(DeviceType::GPU), None).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_DEVICE_NOT_FOUND));
    assert_eq!(crate::get_device_ids(&platform, None, None).unwrap(),
        vec![mock::cpu_device()]);
}

#[test]
fn context_properties_name_the_platform() {
    init();
    let platform = mock::platform();
    let properties = ContextProperties::new().platform(platform);
    let context = unsafe {
        crate::create_context(Some(&properties), &[mock::gpu_device()], None).unwrap()
    };
    assert_eq!(crate::get_context_platform(&context).unwrap(), Some(platform));

    let by_type = unsafe {
        crate::create_context_from_type(Some(&properties), DeviceType::CPU, None).unwrap()
    };
    match crate::get_context_info(&by_type, ContextInfo::Devices).unwrap() {
        InfoResult::Devices(devices) => assert_eq!(devices, vec![mock::cpu_device()]),
        other => panic!("unexpected info result: {:?}", other),
    }
}

#[test]
fn context_errors_reach_the_notifier() {
    init();
    let reports: Arc<Mutex<Vec<(String, Vec<u8>)>>> = Arc::new(Mutex::new(Vec::new()));
    let reports_cb = reports.clone();
    let notifier = ContextNotifier::new(move |errinfo: &str, private_info: &[u8]| {
        reports_cb.lock().unwrap().push((errinfo.to_owned(), private_info.to_vec()));
    });

    let context = unsafe {
        crate::create_context(None, &[mock::gpu_device()], Some(&notifier)).unwrap()
    };
    assert!(mock::raise_context_error(context.as_ptr(), "out of memory on device", &[1, 2]));
    drop(context);

    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, "out of memory on device");
    assert_eq!(reports[0].1, vec![1, 2]);
}

#[test]
fn extension_function_addresses() {
    init();
    let platform = mock::platform();
    let address = unsafe {
        crate::get_extension_function_address_for_platform(&platform, "clIcdGetPlatformIDsKHR")
            .unwrap()
    };
    assert!(!address.is_null());

    match unsafe { crate::get_extension_function_address_for_platform(&platform, "clNope") } {
        Err(Error::ApiWrapper(
            ApiWrapperError::GetExtensionFunctionAddressForPlatformInvalidFunction)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn api_table_is_shared_across_threads() {
    init();
    let mock_table = mock::api() as *const crate::ffi::ClApi as usize;
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| crate::api().unwrap() as *const crate::ffi::ClApi as usize))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), mock_table);
    }
}
