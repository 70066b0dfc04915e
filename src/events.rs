use crate::pose::Pose;
use crate::trackball::InteractionState;

/// Lifecycle points emitted by the trackball controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A gesture began (pointer or touch went down).
    Start,
    /// A gesture finished (pointer or touch released).
    End,
    /// The camera pose moved since the last emit.
    Change,
    /// A wheel tick began an atomic zoom.
    ZoomStart,
    /// A wheel tick finished an atomic zoom.
    ZoomEnd,
}

/// Event payload: which lifecycle point fired, the pose at that moment, and
/// the interaction state that produced it.
#[derive(Debug, Clone, Copy)]
pub struct ControlEvent {
    pub kind: EventKind,
    pub pose: Pose,
    pub state: InteractionState,
}

/// Returned by `subscribe`, identifies a handler for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionToken(u64);

type Handler = Box<dyn FnMut(&ControlEvent)>;

/// Dispatch table for controller events. Handlers registered for a kind run
/// synchronously, in subscription order, when that kind is emitted.
#[derive(Default)]
pub struct EventHub {
    next_token: u64,
    handlers: Vec<(SubscriptionToken, EventKind, Handler)>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&ControlEvent) + 'static,
    ) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        self.handlers.push((token, kind, Box::new(handler)));
        token
    }

    /// Remove a handler. Returns false if the token was already gone.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(t, _, _)| *t != token);
        self.handlers.len() != before
    }

    pub fn emit(&mut self, event: &ControlEvent) {
        for (_, kind, handler) in self.handlers.iter_mut() {
            if *kind == event.kind {
                handler(event);
            }
        }
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(kind: EventKind) -> ControlEvent {
        ControlEvent {
            kind,
            pose: Pose::default(),
            state: InteractionState::None,
        }
    }

    #[test]
    fn handlers_only_see_their_kind() {
        let mut hub = EventHub::new();
        let starts = Rc::new(RefCell::new(0));
        let ends = Rc::new(RefCell::new(0));

        let s = starts.clone();
        hub.subscribe(EventKind::Start, move |_| *s.borrow_mut() += 1);
        let e = ends.clone();
        hub.subscribe(EventKind::End, move |_| *e.borrow_mut() += 1);

        hub.emit(&event(EventKind::Start));
        hub.emit(&event(EventKind::Start));
        hub.emit(&event(EventKind::End));

        assert_eq!(*starts.borrow(), 2);
        assert_eq!(*ends.borrow(), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut hub = EventHub::new();
        let count = Rc::new(RefCell::new(0));

        let c = count.clone();
        let token = hub.subscribe(EventKind::Change, move |_| *c.borrow_mut() += 1);

        hub.emit(&event(EventKind::Change));
        assert!(hub.unsubscribe(token));
        hub.emit(&event(EventKind::Change));

        assert_eq!(*count.borrow(), 1);
        assert!(!hub.unsubscribe(token));
    }

    #[test]
    fn tokens_are_unique_across_kinds() {
        let mut hub = EventHub::new();
        let a = hub.subscribe(EventKind::Start, |_| {});
        let b = hub.subscribe(EventKind::Start, |_| {});
        assert_ne!(a, b);
    }
}
