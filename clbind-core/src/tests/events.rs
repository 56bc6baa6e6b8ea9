//! User events, event callbacks, status polling, and profiling.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::mpsc;
use std::time::Duration;
use crate::{mock, Event, EventInfo, InfoResult, CommandExecutionStatus, CommandType, MemFlags,
    ProfilingInfo, Status, CommandQueueProperties};
use super::{init, context_queue, gpu_setup};


#[test]
fn user_event_status_is_set_once() {
    let (_, context, _) = gpu_setup();
    let event = crate::create_user_event(&context).unwrap();

    match crate::get_event_info(&event, EventInfo::CommandType).unwrap() {
        InfoResult::CommandType(CommandType::User) => (),
        other => panic!("unexpected info result: {:?}", other),
    }
    assert_eq!(event.status().unwrap(), CommandExecutionStatus::Submitted);
    assert!(!event.is_complete().unwrap());

    crate::set_user_event_status(&event, CommandExecutionStatus::Complete).unwrap();
    assert!(event.is_complete().unwrap());

    let err = crate::set_user_event_status(&event, CommandExecutionStatus::Complete)
        .unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_OPERATION));

    // Only negative statuses are errors:
    let other = crate::create_user_event(&context).unwrap();
    assert!(crate::set_user_event_error(&other, 3).unwrap_err().api_status().is_none());
    crate::set_user_event_error(&other, -5).unwrap();
    assert_eq!(other.status().unwrap_err().api_code(), Some(-5));
}

#[test]
fn event_callback_receives_final_status() {
    let (_, context, _) = gpu_setup();
    let event = crate::create_user_event(&context).unwrap();

    let status = Arc::new(AtomicI32::new(99));
    let status_cb = status.clone();
    crate::set_event_callback(&event, move |s| status_cb.store(s, Ordering::SeqCst)).unwrap();
    assert_eq!(status.load(Ordering::SeqCst), 99);

    crate::set_user_event_status(&event, CommandExecutionStatus::Complete).unwrap();
    assert_eq!(status.load(Ordering::SeqCst), 0);

    // Registering on a finished event fires at once:
    let late = Arc::new(AtomicI32::new(99));
    let late_cb = late.clone();
    crate::set_event_callback(&event, move |s| late_cb.store(s, Ordering::SeqCst)).unwrap();
    assert_eq!(late.load(Ordering::SeqCst), 0);
}

#[test]
fn event_callback_receives_error_status() {
    let (_, context, _) = gpu_setup();
    let event = crate::create_user_event(&context).unwrap();

    let status = Arc::new(AtomicI32::new(99));
    let status_cb = status.clone();
    crate::set_event_callback(&event, move |s| status_cb.store(s, Ordering::SeqCst)).unwrap();

    crate::set_user_event_error(&event, -5).unwrap();
    assert_eq!(status.load(Ordering::SeqCst), -5);
}

#[test]
fn event_callback_on_worker_thread() {
    let (_, context, _) = gpu_setup();
    mock::set_worker_thread_callbacks(true);
    let event = crate::create_user_event(&context).unwrap();

    let (tx, rx) = mpsc::channel();
    let test_thread = std::thread::current().id();
    crate::set_event_callback(&event, move |s| {
        tx.send((s, std::thread::current().id())).unwrap();
    }).unwrap();

    crate::set_user_event_status(&event, CommandExecutionStatus::Complete).unwrap();
    let (status, thread) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(status, 0);
    assert_ne!(thread, test_thread);
}

#[test]
fn non_blocking_commands_complete_after_polling() {
    let (_, context, queue) = gpu_setup();
    mock::set_completion_polls(3);
    let buffer = unsafe {
        crate::create_buffer::<u32>(&context, MemFlags::READ_WRITE, 16, None).unwrap()
    };
    let data = vec![7u32; 16];

    let mut event = Event::null();
    unsafe {
        crate::enqueue_write_buffer(&queue, &buffer, false, 0, &data, None::<()>,
            Some(&mut event)).unwrap();
    }
    assert!(!event.is_null());
    assert_eq!(event.status().unwrap(), CommandExecutionStatus::Running);
    assert_eq!(event.status().unwrap(), CommandExecutionStatus::Running);
    assert_eq!(event.status().unwrap(), CommandExecutionStatus::Complete);
    assert_eq!(mock::polls(), 3);

    let mut second = Event::null();
    unsafe {
        crate::enqueue_write_buffer(&queue, &buffer, false, 0, &data, None::<()>,
            Some(&mut second)).unwrap();
    }
    crate::wait_for_event(&second).unwrap();
    assert!(second.is_complete().unwrap());
    assert_eq!(mock::polls(), 6);

    // Blocking commands account for their polls up front:
    unsafe {
        crate::enqueue_write_buffer(&queue, &buffer, true, 0, &data, None::<()>,
            None::<&mut Event>).unwrap();
    }
    assert_eq!(mock::polls(), 9);
}

#[test]
fn finish_completes_outstanding_commands() {
    let (_, context, queue) = gpu_setup();
    mock::set_completion_polls(4);

    let mut event = Event::null();
    crate::enqueue_marker_with_wait_list(&queue, None::<()>, Some(&mut event)).unwrap();
    crate::flush(&queue).unwrap();
    crate::finish(&queue).unwrap();
    assert!(event.is_complete().unwrap());

    match crate::get_event_info(&event, EventInfo::CommandType).unwrap() {
        InfoResult::CommandType(CommandType::Marker) => (),
        other => panic!("unexpected info result: {:?}", other),
    }
    match crate::get_event_info(&event, EventInfo::CommandQueue).unwrap() {
        InfoResult::CommandQueue(Some(q)) => assert_eq!(q.as_ptr(), queue.as_ptr()),
        other => panic!("unexpected info result: {:?}", other),
    }
    match crate::get_event_info(&event, EventInfo::Context).unwrap() {
        InfoResult::Context(ctx) => assert_eq!(ctx.as_ptr(), context.as_ptr()),
        other => panic!("unexpected info result: {:?}", other),
    }

    let mut barrier = Event::null();
    crate::enqueue_barrier_with_wait_list(&queue, Some(&event), Some(&mut barrier)).unwrap();
    crate::wait_for_event(&barrier).unwrap();
}

#[test]
fn failed_wait_list_fails_dependent_commands() {
    let (_, context, queue) = gpu_setup();
    let buffer = unsafe {
        crate::create_buffer::<u32>(&context, MemFlags::READ_WRITE, 16, None).unwrap()
    };
    let data = vec![1u32; 16];
    let gate = crate::create_user_event(&context).unwrap();
    crate::set_user_event_error(&gate, -5).unwrap();

    let mut event = Event::null();
    unsafe {
        crate::enqueue_write_buffer(&queue, &buffer, false, 0, &data, Some(&gate),
            Some(&mut event)).unwrap();
    }
    let err = event.status().unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_EXEC_STATUS_ERROR_FOR_EVENTS_IN_WAIT_LIST));

    let err = unsafe {
        crate::enqueue_write_buffer(&queue, &buffer, true, 0, &data, Some(&gate),
            None::<&mut Event>).unwrap_err()
    };
    assert_eq!(err.api_status(), Some(Status::CL_EXEC_STATUS_ERROR_FOR_EVENTS_IN_WAIT_LIST));

    let err = crate::wait_for_event(&gate).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_EXEC_STATUS_ERROR_FOR_EVENTS_IN_WAIT_LIST));

    // The failed write never reached the buffer:
    let mut out = vec![9u32; 16];
    unsafe {
        crate::enqueue_read_buffer(&queue, &buffer, true, 0, &mut out, None::<()>,
            None::<&mut Event>).unwrap();
    }
    assert_eq!(out, vec![0u32; 16]);
}

#[test]
fn waiting_on_an_unset_user_event_fails() {
    let (_, context, _) = gpu_setup();
    let event = crate::create_user_event(&context).unwrap();

    let err = crate::wait_for_event(&event).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_OPERATION));

    // An empty wait list is a no-op:
    crate::wait_for_events(&[] as &[Event]).unwrap();
}

#[test]
fn waiting_on_events_of_two_contexts_fails() {
    let (_, context_a, _) = gpu_setup();
    let context_b = unsafe { crate::create_context(None, &[mock::cpu_device()], None).unwrap() };
    let events = [crate::create_user_event(&context_a).unwrap(),
        crate::create_user_event(&context_b).unwrap()];
    for event in events.iter() {
        crate::set_user_event_status(event, CommandExecutionStatus::Complete).unwrap();
    }

    let err = crate::wait_for_events(&events[..]).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_CONTEXT));
}

#[test]
fn profiling_times_are_ordered() {
    init();
    let device = mock::gpu_device();
    let (context, queue) = context_queue(device, Some(CommandQueueProperties::PROFILING_ENABLE));
    let buffer = unsafe {
        crate::create_buffer::<f32>(&context, MemFlags::READ_WRITE, 8, None).unwrap()
    };

    let mut event = Event::null();
    crate::enqueue_fill_buffer(&queue, &buffer, &[1.5f32], 0, 8, None::<()>, Some(&mut event))
        .unwrap();
    crate::wait_for_event(&event).unwrap();

    let times: Vec<u64> = [ProfilingInfo::Queued, ProfilingInfo::Submit, ProfilingInfo::Start,
            ProfilingInfo::End].iter()
        .map(|&info| crate::get_event_profiling_info(&event, info).unwrap().as_ulong().unwrap())
        .collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]), "times: {:?}", times);

    // Not available without profiling enabled on the queue:
    let (_, plain_queue) = context_queue(device, None);
    let mut plain = Event::null();
    crate::enqueue_fill_buffer(&plain_queue, &buffer, &[1.5f32], 0, 8, None::<()>,
        Some(&mut plain)).unwrap();
    let err = crate::get_event_profiling_info(&plain, ProfilingInfo::End).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_PROFILING_INFO_NOT_AVAILABLE));
}
