//! Error conversion and the error helpers.

use crate::ffi::ClApi;
use crate::{mock, Error, ApiWrapperError, MemFlags, Event, Status};
use super::{init, gpu_setup};


#[test]
fn driver_failures_carry_their_status() {
    let (_, context, queue) = gpu_setup();

    mock::fail_next("clCreateBuffer", Status::CL_OUT_OF_RESOURCES as i32);
    let err = unsafe {
        crate::create_buffer::<u8>(&context, MemFlags::READ_WRITE, 16, None).unwrap_err()
    };
    assert_eq!(err.api_status(), Some(Status::CL_OUT_OF_RESOURCES));
    assert_eq!(err.api_code(), Some(-5));
    assert!(err.to_string().contains("clCreateBuffer"), "error: {}", err);

    // Only the next call fails:
    let buffer = unsafe {
        crate::create_buffer::<u8>(&context, MemFlags::READ_WRITE, 16, None).unwrap()
    };

    mock::fail_next("clEnqueueWriteBuffer", Status::CL_INVALID_EVENT_WAIT_LIST as i32);
    let err = unsafe {
        crate::enqueue_write_buffer(&queue, &buffer, true, 0, &[1u8; 16], None::<()>,
            None::<&mut Event>).unwrap_err()
    };
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_EVENT_WAIT_LIST));
    assert_eq!(mock::call_count("clEnqueueWriteBuffer"), 1);
}

#[test]
fn unknown_codes_are_kept() {
    let (_, context, _) = gpu_setup();

    mock::fail_next("clCreateUserEvent", -9999);
    let err = crate::create_user_event(&context).unwrap_err();
    assert_eq!(err.api_status(), None);
    assert_eq!(err.api_code(), Some(-9999));
    assert!(err.to_string().contains("-9999"));
}

#[test]
fn wrapper_errors_have_no_status() {
    let (_, context, _) = gpu_setup();

    let data = vec![0u32; 8];
    match unsafe { crate::create_buffer(&context, MemFlags::COPY_HOST_PTR, 16, Some(&data[..])) } {
        Err(Error::ApiWrapper(ApiWrapperError::CreateBufferDataLengthMismatch)) => (),
        other => panic!("unexpected result: {:?}", other),
    }

    let err = crate::set_user_event_error(&crate::create_user_event(&context).unwrap(), 0)
        .unwrap_err();
    assert!(err.api_status().is_none());
    assert!(err.api_code().is_none());
}

#[test]
fn a_second_table_cannot_be_installed() {
    init();

    // Installing the same table again is fine:
    crate::install_api(mock::api()).unwrap();

    let other: &'static ClApi = Box::leak(Box::new(ClApi::empty()));
    match crate::install_api(other) {
        Err(Error::ApiWrapper(ApiWrapperError::ApiAlreadyInstalled)) => (),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(std::ptr::eq(crate::api().unwrap(), mock::api()));
}

#[test]
fn mock_table_is_complete() {
    init();
    assert!(mock::api().missing_entry_points().is_empty());
    assert!(mock::api().supports_cl12());
    assert!(!mock::api().is_loaded());
    assert!(!ClApi::empty().supports_cl12());
}
