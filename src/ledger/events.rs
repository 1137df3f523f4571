use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::invoice::InvoiceRecord;

/// Handle identifying a registered change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type ChangeCallback = Box<dyn Fn(&[InvoiceRecord]) + Send>;

/// Synchronous broadcast list for collection mutations. Listeners run in
/// subscription order with the full post-mutation snapshot; a panicking
/// listener is logged and does not prevent the rest from running.
#[derive(Default)]
pub struct ChangeBus {
    listeners: Vec<(u64, ChangeCallback)>,
    next_handle: u64,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: Fn(&[InvoiceRecord]) + Send + 'static,
    {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.listeners.push((handle, Box::new(callback)));
        Subscription(handle)
    }

    /// Removes the listener; returns whether it was registered.
    pub fn unsubscribe(&mut self, handle: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != handle.0);
        self.listeners.len() != before
    }

    pub fn broadcast(&self, records: &[InvoiceRecord]) {
        for (handle, callback) in &self.listeners {
            if catch_unwind(AssertUnwindSafe(|| callback(records))).is_err() {
                tracing::warn!(listener = *handle, "change listener panicked, continuing");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn listeners_run_in_subscription_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut bus = ChangeBus::new();
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.subscribe(move |_| order.lock().unwrap().push(tag));
        }
        bus.broadcast(&[]);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribed_listener_stops_firing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut bus = ChangeBus::new();
        let counter = Arc::clone(&calls);
        let handle = bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        bus.broadcast(&[]);
        assert!(bus.unsubscribe(handle));
        assert!(!bus.unsubscribe(handle), "second removal is a no-op");
        bus.broadcast(&[]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_listener_does_not_starve_the_rest() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut bus = ChangeBus::new();
        bus.subscribe(|_| panic!("listener failure"));
        let counter = Arc::clone(&calls);
        bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        bus.broadcast(&[]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
