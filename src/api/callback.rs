//! Event sink surface for consumers
//!
//! Any `FnMut(LocationEvent)` closure is a sink, so consumers can either
//! implement [`EventSink`] on their own type or register a closure.

use crate::api::types::LocationEvent;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives every user-facing event the assistant produces
pub trait EventSink {
    fn on_event(&mut self, event: LocationEvent);
}

impl<F> EventSink for F
where
    F: FnMut(LocationEvent),
{
    fn on_event(&mut self, event: LocationEvent) {
        self(event)
    }
}

/// Boxed closure sink
pub type EventCallback = Box<dyn FnMut(LocationEvent)>;

/// Sink that keeps every event, shareable with the code that inspects it
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<LocationEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events received so far
    pub fn events(&self) -> Vec<LocationEvent> {
        self.events.borrow().clone()
    }

    /// Drain and return all events received so far
    pub fn take(&self) -> Vec<LocationEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Number of received events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&LocationEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| predicate(event)).count()
    }

    pub fn last(&self) -> Option<LocationEvent> {
        self.events.borrow().last().cloned()
    }
}

impl EventSink for RecordingSink {
    fn on_event(&mut self, event: LocationEvent) {
        self.events.borrow_mut().push(event);
    }
}
