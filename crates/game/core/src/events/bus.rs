//! Ordered event log with synchronous listener dispatch.
//!
//! Listeners are keyed by [`EventKind`] in a fixed table. `push` appends the
//! event to the log and runs every listener for that kind before returning, in
//! registration order.

use std::fmt;

use super::types::{EventKind, GameEvent};

type Listener = Box<dyn FnMut(&GameEvent) + Send>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

pub struct EventBus {
    log: Vec<GameEvent>,
    listeners: [Vec<(ListenerId, Listener)>; EventKind::COUNT],
    next_listener: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.log.len())
            .field(
                "listeners",
                &self.listeners.iter().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            listeners: std::array::from_fn(|_| Vec::new()),
            next_listener: 0,
        }
    }

    /// Registers `listener` for every event of `kind`.
    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&GameEvent) + Send + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners[kind.index()].push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        for slot in &mut self.listeners {
            if let Some(index) = slot.iter().position(|(listener, _)| *listener == id) {
                drop(slot.remove(index));
                return true;
            }
        }
        false
    }

    /// Appends `event` to the log and dispatches it to its listeners.
    pub fn push(&mut self, event: GameEvent) {
        tracing::trace!(kind = ?event.kind(), "event");
        for (_, listener) in &mut self.listeners[event.kind().index()] {
            listener(&event);
        }
        self.log.push(event);
    }

    /// Returns and clears the buffered log. Listeners have already seen these events.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.log)
    }

    /// Buffered events since the last drain.
    pub fn pending(&self) -> &[GameEvent] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::ecs::EntityId;

    #[test]
    fn listeners_run_in_registration_order() {
        let mut bus = EventBus::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let calls = Arc::clone(&calls);
            bus.subscribe(EventKind::Healed, move |_| calls.lock().unwrap().push(tag));
        }
        bus.push(GameEvent::Healed {
            who: EntityId(1),
            amount: 3,
        });

        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn listeners_only_see_their_kind() {
        let mut bus = EventBus::new();
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        bus.subscribe(EventKind::FloorChanged, move |_| *counter.lock().unwrap() += 1);

        bus.push(GameEvent::message("hello", 0));
        bus.push(GameEvent::FloorChanged { floor: 2 });

        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn drain_returns_log_and_clears_it() {
        let mut bus = EventBus::new();
        bus.push(GameEvent::FloorChanged { floor: 1 });
        bus.push(GameEvent::message("a", 0));

        let drained = bus.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind(), EventKind::FloorChanged);
        assert!(bus.is_empty());
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let mut bus = EventBus::new();
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        let id = bus.subscribe(EventKind::Message, move |_| *counter.lock().unwrap() += 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.push(GameEvent::message("quiet", 0));
        assert_eq!(*seen.lock().unwrap(), 0);
    }
}
