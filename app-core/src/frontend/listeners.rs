use std::sync::{
    atomic::{AtomicBool, Ordering::SeqCst},
    mpsc::{channel, Receiver, Sender},
    Arc,
};

use log::debug;

/// A hub for application wide events (e.g. pointer presses) that components
/// can subscribe to.
///
/// Every subscriber receives its own copy of each published event. A
/// subscription ends when its [`Subscription`] is dropped, the hub forgets
/// about it on the next publish or count.
pub struct GlobalListeners<E> {
    listeners: Vec<Listener<E>>,
}

struct Listener<E> {
    tx: Sender<E>,
    is_subscribed: Arc<AtomicBool>,
    name: String,
}

pub struct Subscription<E> {
    rx: Receiver<E>,
    is_subscribed: Arc<AtomicBool>,
}

impl<E> Default for GlobalListeners<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<E: Clone> GlobalListeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, name: &str) -> Subscription<E> {
        let (tx, rx) = channel();
        let is_subscribed = Arc::new(AtomicBool::new(true));
        debug!("subscribing global listener '{name}'");
        self.listeners.push(Listener {
            tx,
            is_subscribed: is_subscribed.clone(),
            name: name.to_owned(),
        });
        Subscription { rx, is_subscribed }
    }

    /// Deliver `event` to every live subscriber, returns how many received it.
    pub fn publish(&mut self, event: E) -> usize {
        self.prune();
        let mut delivered = 0;
        for listener in self.listeners.iter() {
            if listener.tx.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn listener_count(&mut self) -> usize {
        self.prune();
        self.listeners.len()
    }

    fn prune(&mut self) {
        self.listeners.retain(|listener| {
            let keep = listener.is_subscribed.load(SeqCst);
            if !keep {
                debug!("removing global listener '{}'", listener.name);
            }
            keep
        });
    }
}

impl<E> Subscription<E> {
    /// All events published since the last call, oldest first.
    pub fn drain(&self) -> Vec<E> {
        self.rx.try_iter().collect()
    }

    pub fn is_subscribed(&self) -> bool {
        self.is_subscribed.load(SeqCst)
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        self.is_subscribed.store(false, SeqCst);
    }
}
