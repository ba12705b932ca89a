//! Routing decoded gesture frames to observers.

use crate::gestures::{GestureEvent, GestureTable};
use crate::observer::GestureObserver;
use std::collections::HashMap;
use std::fmt;
use touch_protocol::{GestureFrame, TouchPoint};
use tracing::{debug, trace};

/// What happened to a dispatched gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A registered observer received the event.
    Observer(GestureEvent),
    /// The default handler received the event.
    Default(GestureEvent),
    /// The gesture name is not in the table; nothing was called.
    Unrecognized,
}

impl DispatchOutcome {
    /// The dispatched event, if any.
    pub fn event(&self) -> Option<GestureEvent> {
        match self {
            DispatchOutcome::Observer(e) | DispatchOutcome::Default(e) => Some(*e),
            DispatchOutcome::Unrecognized => None,
        }
    }
}

/// Whether a gesture is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// The last recognized event, until a release.
    Active(GestureEvent),
}

impl GestureState {
    fn next(self, event: GestureEvent) -> Self {
        match event {
            GestureEvent::Release => GestureState::Idle,
            event => GestureState::Active(event),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, GestureState::Active(_))
    }
}

/// Counters kept by the dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Frames passed to [`GestureDispatcher::dispatch`].
    pub frames: u64,
    /// Events delivered to registered observers.
    pub observed: u64,
    /// Events delivered to the default handler.
    pub defaulted: u64,
    /// Frames whose name was not in the table.
    pub unrecognized: u64,
}

/// Maps gesture frames to events and delivers them.
///
/// An observer registered for an event takes that event over completely;
/// events with no observer go to the default handler `D`. The choice is made
/// per event, so overriding zoom leaves drag with the default.
pub struct GestureDispatcher<D> {
    table: GestureTable,
    observers: HashMap<GestureEvent, Box<dyn GestureObserver>>,
    defaults: D,
    state: GestureState,
    stats: DispatchStats,
}

impl<D: GestureObserver> GestureDispatcher<D> {
    /// Create a dispatcher using the standard gesture table.
    pub fn new(defaults: D) -> Self {
        Self::with_table(GestureTable::standard(), defaults)
    }

    /// Create with an explicit gesture table.
    pub fn with_table(table: GestureTable, defaults: D) -> Self {
        Self {
            table,
            observers: HashMap::new(),
            defaults,
            state: GestureState::Idle,
            stats: DispatchStats::default(),
        }
    }

    /// Register `observer` for `event`, returning the one it replaces.
    pub fn add_observer<O>(
        &mut self,
        event: GestureEvent,
        observer: O,
    ) -> Option<Box<dyn GestureObserver>>
    where
        O: GestureObserver + 'static,
    {
        self.observers.insert(event, Box::new(observer))
    }

    /// Remove the observer for `event`, restoring the default handler.
    pub fn remove_observer(&mut self, event: GestureEvent) -> Option<Box<dyn GestureObserver>> {
        self.observers.remove(&event)
    }

    /// Returns true if an observer is registered for `event`.
    pub fn has_observer(&self, event: GestureEvent) -> bool {
        self.observers.contains_key(&event)
    }

    /// Dispatch a decoded frame.
    pub fn dispatch(&mut self, frame: &GestureFrame) -> DispatchOutcome {
        self.stats.frames += 1;
        match self.table.lookup(&frame.gesture_name) {
            Some(event) => self.dispatch_event(event, &frame.touch_points),
            None => {
                self.stats.unrecognized += 1;
                debug!(gesture = %frame.gesture_name, "ignoring unrecognized gesture");
                DispatchOutcome::Unrecognized
            }
        }
    }

    /// Dispatch an event directly, bypassing the name table.
    ///
    /// This is the only way to raise events no wire name maps to.
    pub fn dispatch_event(&mut self, event: GestureEvent, touches: &[TouchPoint]) -> DispatchOutcome {
        self.state = self.state.next(event);

        if let Some(observer) = self.observers.get_mut(&event) {
            trace!(%event, touches = touches.len(), "observer");
            observer.handle(event, touches);
            self.stats.observed += 1;
            return DispatchOutcome::Observer(event);
        }

        if event.has_default_handler() {
            trace!(%event, touches = touches.len(), "default handler");
        } else {
            trace!(%event, "no default action");
        }
        self.defaults.handle(event, touches);
        self.stats.defaulted += 1;
        DispatchOutcome::Default(event)
    }

    pub fn table(&self) -> &GestureTable {
        &self.table
    }

    pub fn defaults(&self) -> &D {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut D {
        &mut self.defaults
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}

impl<D: fmt::Debug> fmt::Debug for GestureDispatcher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut observed: Vec<_> = self.observers.keys().copied().collect();
        observed.sort();
        f.debug_struct("GestureDispatcher")
            .field("observers", &observed)
            .field("defaults", &self.defaults)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}
