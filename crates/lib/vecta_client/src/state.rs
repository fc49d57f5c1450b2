//! Reactive state primitives.
//!
//! - [`Signal`]: a value cell that can be read synchronously and observed.
//! - [`EventEmitter`]: fan-out of one-shot notifications.
//! - [`LatestGuard`]: switch-latest guard for async call sites. A result
//!   is applied only if no newer call started on the same guard.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{broadcast, watch};

/// Observable value cell backed by a `watch` channel.
///
/// Subscribers always see the latest value; intermediate values may be
/// skipped if the subscriber is slow.
#[derive(Debug)]
pub struct Signal<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Signal<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + PartialEq> Signal<T> {
    /// Replace the value only if it differs. Returns whether it changed.
    pub fn set_if_changed(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }
}

impl<T: Clone + Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Capacity of each emitter's buffer; lagging receivers lose old events.
const EVENT_CAPACITY: usize = 64;

/// Broadcast emitter for outward notifications.
#[derive(Debug)]
pub struct EventEmitter<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone> EventEmitter<T> {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    /// Deliver to all current subscribers. Without subscribers the event is dropped.
    pub fn emit(&self, event: T) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Generation number handed out by [`LatestGuard::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Generation counter implementing last-write-wins for one pipeline.
#[derive(Debug, Default)]
pub struct LatestGuard {
    generation: AtomicU64,
}

impl LatestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new call, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` still belongs to the newest call.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Number of calls started so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_get_set_update() {
        let signal = Signal::new(1);
        assert_eq!(signal.get(), 1);
        signal.set(2);
        signal.update(|v| *v += 1);
        assert_eq!(signal.get(), 3);
        assert_eq!(signal.with(|v| v * 2), 6);
    }

    #[tokio::test]
    async fn subscribers_observe_changes() {
        let signal = Signal::new("a".to_string());
        let mut rx = signal.subscribe();
        signal.set("b".into());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "b");
    }

    #[test]
    fn set_if_changed_skips_equal_values() {
        let signal = Signal::new(5);
        let rx = signal.subscribe();
        assert!(!signal.set_if_changed(5));
        assert!(!rx.has_changed().unwrap());
        assert!(signal.set_if_changed(6));
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn emitter_fans_out() {
        let emitter = EventEmitter::new();
        let mut a = emitter.subscribe();
        let mut b = emitter.subscribe();
        emitter.emit(7u32);
        assert_eq!(a.recv().await.unwrap(), 7);
        assert_eq!(b.recv().await.unwrap(), 7);
    }

    #[test]
    fn emit_without_subscribers_is_silent() {
        EventEmitter::<u32>::new().emit(1);
    }

    #[test]
    fn newer_ticket_supersedes_older() {
        let guard = LatestGuard::new();
        let first = guard.begin();
        assert!(guard.is_current(first));
        let second = guard.begin();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
        assert_eq!(guard.generation(), 2);
    }
}
