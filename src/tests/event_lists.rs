//! Event lists: user events, callbacks, and use as wait lists.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use clbind_core::mock;
use crate::{EventList, Buffer, MemFlags, CommandExecutionStatus, EventInfo, InfoResult, Error,
    Status};
use super::gpu_setup;


#[test]
fn user_events() {
    let (_, context, _) = gpu_setup();
    let mut events = EventList::with_user_event(&context).unwrap();
    events.create_user_event(&context).unwrap();
    assert_eq!(events.len(), 2);

    assert_eq!(events.status(0).unwrap(), CommandExecutionStatus::Submitted);
    assert!(!events.is_complete().unwrap());

    events.set_status(0, CommandExecutionStatus::Complete).unwrap();
    assert_eq!(events.status(0).unwrap(), CommandExecutionStatus::Complete);
    assert!(!events.is_complete().unwrap());

    // A user event's status is set once:
    let err = events.set_status(0, CommandExecutionStatus::Complete).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_INVALID_OPERATION));

    events.set_error(1, -9).unwrap();
    assert_eq!(events.status(1).unwrap_err().api_code(), Some(-9));

    match events.set_status(2, CommandExecutionStatus::Complete) {
        Err(Error::OutOfRange(msg)) =>
            assert_eq!(msg, "Event index out of range: 2 (length: 2)."),
        other => panic!("unexpected result: {:?}", other),
    }

    match events.info(0, EventInfo::CommandExecutionStatus).unwrap() {
        InfoResult::ExecutionStatus(CommandExecutionStatus::Complete) => (),
        other => panic!("unexpected info result: {:?}", other),
    }
}

#[test]
fn callbacks() {
    let (_, context, _) = gpu_setup();
    let events = EventList::with_user_event(&context).unwrap();

    let status = Arc::new(AtomicI32::new(99));
    let status_cb = status.clone();
    events.set_callback(0, move |s| status_cb.store(s, Ordering::SeqCst)).unwrap();
    assert_eq!(status.load(Ordering::SeqCst), 99);

    events.set_status(0, CommandExecutionStatus::Complete).unwrap();
    assert_eq!(status.load(Ordering::SeqCst), 0);

    assert!(events.set_callback(3, |_| ()).is_err());
}

#[test]
fn move_copy_and_clear() {
    let (_, context, queue) = gpu_setup();
    let mut a = EventList::new();
    queue.enqueue_marker(Some(&mut a), None).unwrap();
    queue.enqueue_marker(Some(&mut a), None).unwrap();
    let marker = a[0].as_ptr();
    assert_eq!(mock::refcount(marker), Some(1));

    let mut b = EventList::with_user_event(&context).unwrap();
    b.copy_from(&a);
    assert_eq!(b.len(), 3);
    assert_eq!(a.len(), 2);
    assert_eq!(mock::refcount(marker), Some(2));

    let mut c = EventList::new();
    c.move_from(&mut a);
    assert!(a.is_empty());
    assert_eq!(c.len(), 2);
    assert_eq!(mock::refcount(marker), Some(2));

    c.clear();
    assert!(c.is_empty());
    assert_eq!(mock::refcount(marker), Some(1));

    drop(b);
    assert_eq!(mock::refcount(marker), None);

    // An empty list waits for nothing:
    EventList::new().wait().unwrap();
}

#[test]
fn null_events_are_not_stored() {
    let (_, context, queue) = gpu_setup();
    let mut list = EventList::new();
    list.push(clbind_core::Event::null());
    assert!(list.is_empty());

    let mut markers = EventList::new();
    queue.enqueue_marker(Some(&mut markers), None).unwrap();
    list.push(markers[0].clone());
    list.push(clbind_core::Event::null());
    assert_eq!(list.len(), 1);

    let buffer = Buffer::<u32>::new(&context, MemFlags::READ_WRITE, 4, None).unwrap();
    let mut out = vec![0u32; 4];
    buffer.read(&queue, &mut out, 0, 0, None, Some(&list)).unwrap();
}

#[test]
fn failed_wait_event_fails_the_command() {
    let (_, context, queue) = gpu_setup();
    let buffer = Buffer::<u32>::new(&context, MemFlags::READ_WRITE, 8, None).unwrap();
    let gate = EventList::with_user_event(&context).unwrap();
    gate.set_error(0, -20).unwrap();

    let mut data = vec![0u32; 8];
    let err = buffer.read(&queue, &mut data, 0, 0, None, Some(&gate)).unwrap_err();
    assert_eq!(err.api_status(), Some(Status::CL_EXEC_STATUS_ERROR_FOR_EVENTS_IN_WAIT_LIST));

    let mut events = EventList::new();
    buffer.fill(&queue, &[5], 0, 0, Some(&mut events), Some(&gate)).unwrap();
    assert_eq!(events.status(0).unwrap_err().api_status(),
        Some(Status::CL_EXEC_STATUS_ERROR_FOR_EVENTS_IN_WAIT_LIST));
}

#[test]
fn non_blocking_commands_complete_after_polls() {
    let (_, context, queue) = gpu_setup();
    mock::set_completion_polls(3);
    let buffer = Buffer::<u32>::new(&context, MemFlags::READ_WRITE, 8, None).unwrap();

    let mut events = EventList::new();
    buffer.fill(&queue, &[1], 0, 0, Some(&mut events), None).unwrap();
    assert!(!events.is_complete().unwrap());
    events.wait().unwrap();
    assert!(events.is_complete().unwrap());
    assert!(mock::polls() >= 3);
}
