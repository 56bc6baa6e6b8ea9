//! Event list for coordinating enqueued commands.

use std::ops::Index;
use clbind_core::{self as core, Event as EventCore, EventCallback, CommandExecutionStatus,
    ClWaitListPtr, EventInfo, InfoResult};
use clbind_core::ffi::cl_event;
use crate::error::{Error, Result};
use crate::standard::Context;


/// A list of events for coordinating enqueued commands.
///
/// Events contain status information about the command that
/// created them. Used to coordinate the activity of multiple commands with
/// more fine-grained control than the queue alone.
///
/// Every enqueue method in this crate takes an optional `&mut EventList`,
/// to which the event of the new command is appended, and an optional
/// `&EventList` of events the command waits for.
#[derive(Debug, Clone, Default)]
pub struct EventList {
    events: Vec<EventCore>,
}

impl EventList {
    /// Returns a new, empty, `EventList`.
    pub fn new() -> EventList {
        EventList { events: Vec::new() }
    }

    /// Returns a list holding a single new user event in `context`.
    pub fn with_user_event(context: &Context) -> Result<EventList> {
        let mut list = EventList::new();
        list.create_user_event(context)?;
        Ok(list)
    }

    /// Creates a user event in `context` and appends it. Its status starts
    /// as `Submitted` and is changed with `set_status`.
    pub fn create_user_event(&mut self, context: &Context) -> Result<()> {
        let event = core::create_user_event(context)?;
        self.events.push(event);
        Ok(())
    }

    /// Runs an enqueue with a fresh event slot and appends the event it
    /// produced to `events` (when given).
    pub(crate) fn enqueue_with<F>(events: Option<&mut EventList>, enqueue: F) -> Result<()>
            where F: FnOnce(Option<&mut EventCore>) -> core::Result<()>
    {
        match events {
            Some(list) => {
                let mut new_event = EventCore::null();
                enqueue(Some(&mut new_event))?;
                if !new_event.is_null() {
                    list.events.push(new_event);
                }
                Ok(())
            },
            None => enqueue(None).map_err(Error::from),
        }
    }

    /// Appends `event`. A null event is dropped instead.
    pub fn push(&mut self, event: EventCore) {
        if !event.is_null() {
            self.events.push(event);
        }
    }

    /// Returns the number of events in the list.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the event at `index`.
    pub fn get(&self, index: usize) -> Result<&EventCore> {
        self.events.get(index)
            .ok_or_else(|| Error::out_of_range("Event", index, self.events.len()))
    }

    /// Returns the most recently added event.
    pub fn last(&self) -> Option<&EventCore> {
        self.events.last()
    }

    /// Returns a new copy of an event by index (retained).
    pub fn get_clone(&self, index: usize) -> Option<EventCore> {
        self.events.get(index).cloned()
    }

    /// Waits for all events in list to complete. An empty list returns at
    /// once.
    pub fn wait(&self) -> Result<()> {
        if self.events.is_empty() {
            return Ok(());
        }
        core::wait_for_events(self).map_err(Error::from)
    }

    /// Releases every event in the list.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Takes every event from `other`, leaving it empty.
    pub fn move_from(&mut self, other: &mut EventList) {
        self.events.append(&mut other.events);
    }

    /// Appends a retained copy of every event in `other`.
    pub fn copy_from(&mut self, other: &EventList) {
        self.events.extend(other.events.iter().cloned());
    }

    /// Sets the execution status of the user event at `index`.
    ///
    /// The driver accepts this only once per user event and only for user
    /// events.
    pub fn set_status(&self, index: usize, status: CommandExecutionStatus) -> Result<()> {
        core::set_user_event_status(self.get(index)?, status).map_err(Error::from)
    }

    /// Terminates the user event at `index` with `error_code`, which must
    /// be negative. Commands waiting on it fail.
    pub fn set_error(&self, index: usize, error_code: i32) -> Result<()> {
        core::set_user_event_error(self.get(index)?, error_code).map_err(Error::from)
    }

    /// Returns the execution status of the event at `index`.
    ///
    /// An event which terminated abnormally returns its error code as an
    /// error.
    pub fn status(&self, index: usize) -> Result<CommandExecutionStatus> {
        core::event_status(self.get(index)?).map_err(Error::from)
    }

    /// Returns `true` once every event in the list has completed.
    pub fn is_complete(&self) -> Result<bool> {
        for event in self.events.iter() {
            if !core::event_is_complete(event)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Returns info about the event at `index`.
    pub fn info(&self, index: usize, info_kind: EventInfo) -> Result<InfoResult> {
        core::get_event_info(self.get(index)?, info_kind).map_err(Error::from)
    }

    /// Registers `callback` to run once the event at `index` completes.
    ///
    /// The callback receives `CL_COMPLETE` (zero) or the negative error
    /// code the command terminated with. It may run on a driver thread, or
    /// immediately if the event has already finished.
    pub fn set_callback<C>(&self, index: usize, callback: C) -> Result<()>
            where C: EventCallback
    {
        core::set_event_callback(self.get(index)?, callback).map_err(Error::from)
    }

    pub fn iter(&self) -> std::slice::Iter<EventCore> {
        self.events.iter()
    }

    /// Returns the events as a slice.
    pub fn as_slice(&self) -> &[EventCore] {
        &self.events
    }
}

impl Index<usize> for EventList {
    type Output = EventCore;

    fn index(&self, index: usize) -> &EventCore {
        &self.events[index]
    }
}

impl From<Vec<EventCore>> for EventList {
    fn from(events: Vec<EventCore>) -> EventList {
        EventList { events: events.into_iter().filter(|ev| !ev.is_null()).collect() }
    }
}

impl From<EventCore> for EventList {
    fn from(event: EventCore) -> EventList {
        EventList::from(vec![event])
    }
}

impl AsRef<[EventCore]> for EventList {
    fn as_ref(&self) -> &[EventCore] {
        &self.events
    }
}

impl<'a> IntoIterator for &'a EventList {
    type Item = &'a EventCore;
    type IntoIter = std::slice::Iter<'a, EventCore>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

// Null events are never stored.
unsafe impl<'a> ClWaitListPtr for &'a EventList {
    unsafe fn as_ptr_ptr(&self) -> *const cl_event {
        self.events.as_ptr() as *const cl_event
    }

    fn count(&self) -> u32 {
        self.events.len() as u32
    }
}
