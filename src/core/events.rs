//! Per-manager notification channels
//!
//! Each manager owns one `EventChannel` per event family. Subscribers are
//! plain closures; `clear` drops them all when the owning manager shuts down.

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

type Subscriber<E> = Box<dyn FnMut(&E)>;

/// Observer registry for one event type
pub struct EventChannel<E> {
    subscribers: Vec<(SubscriptionId, Subscriber<E>)>,
    next_id: u64,
}

impl<E> EventChannel<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a subscriber. Subscribers are invoked in registration order.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber, returns false if the id was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: E) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }

    /// Drop every subscriber
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let mut channel: EventChannel<u32> = EventChannel::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = Rc::clone(&seen);
        channel.subscribe(move |e| a.borrow_mut().push(("a", *e)));
        let b = Rc::clone(&seen);
        channel.subscribe(move |e| b.borrow_mut().push(("b", *e)));

        channel.emit(5);

        assert_eq!(*seen.borrow(), vec![("a", 5), ("b", 5)]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut channel: EventChannel<u32> = EventChannel::new();
        let count = Rc::new(RefCell::new(0));

        let c = Rc::clone(&count);
        let id = channel.subscribe(move |_| *c.borrow_mut() += 1);

        channel.emit(1);
        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id));
        channel.emit(2);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_clear_drops_subscribers() {
        let mut channel: EventChannel<()> = EventChannel::new();
        channel.subscribe(|_| {});
        channel.subscribe(|_| {});
        assert_eq!(channel.subscriber_count(), 2);

        channel.clear();
        assert_eq!(channel.subscriber_count(), 0);

        // Emitting with no subscribers is fine
        channel.emit(());
    }
}
