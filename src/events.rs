//! Event Multiplexing
//!
//! Every cross-boundary event in the crate (window lifecycle, key presses,
//! mouse motion, device connection changes, …) is exposed as an [`Event`]:
//! an ordered list of listeners sitting in front of exactly one native
//! subscription.
//!
//! # Lazy Subscription
//!
//! - Adding the first listener connects to the native source once.
//! - Removing the last listener disconnects once.
//! - Every other add/remove only edits the listener list.
//!
//! Listener identity is the `Arc` allocation of the [`Listener`], so the same
//! value can be added and removed symmetrically. Counting is per entry: a
//! listener added twice must be removed twice before the native source is
//! released.
//!
//! # Native Sources
//!
//! Backends expose their raw callback slots as [`NativeSignal`]s. A signal
//! hands out RAII [`Subscription`]s; dropping one disconnects the handler.
//! Native handlers only keep a [`Weak`] reference back to the channel, so a
//! dropped [`Event`] never stays alive through its own native hook.
//!
//! # Threading
//!
//! Listeners run synchronously on whatever thread emitted the native event.
//! No lock is held while listeners run, so a listener may add or remove
//! listeners (including itself) re-entrantly.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use smallvec::SmallVec;

/// A shared event callback.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Wraps a closure into a [`Listener`].
pub fn listener<E>(f: impl Fn(&E) + Send + Sync + 'static) -> Listener<E> {
    Arc::new(f)
}

// ============================================================================
// Subscription
// ============================================================================

/// RAII guard over one native connection. Disconnects when dropped.
#[must_use = "dropping a Subscription disconnects it immediately"]
pub struct Subscription {
    disconnect: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(disconnect: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            disconnect: Some(Box::new(disconnect)),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self { disconnect: None }
    }

    /// Disconnects now instead of at drop.
    pub fn unsubscribe(mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.disconnect.is_some())
            .finish()
    }
}

// ============================================================================
// NativeSignal
// ============================================================================

type NativeHandler<N> = Arc<dyn Fn(&N) + Send + Sync>;

/// A backend callback slot carrying backend-native argument values.
///
/// This is the "native event" side of the multiplexer: backends emit into it,
/// [`Event`] channels connect to it.
pub struct NativeSignal<N> {
    handlers: Mutex<Vec<(u64, NativeHandler<N>)>>,
    next_id: AtomicU64,
}

impl<N: 'static> NativeSignal<N> {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        })
    }

    /// Registers a native handler. The returned guard removes it on drop.
    pub fn connect(self: &Arc<Self>, handler: impl Fn(&N) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers.lock().push((id, Arc::new(handler)));

        let signal = Arc::downgrade(self);
        Subscription::new(move || {
            if let Some(signal) = signal.upgrade() {
                signal.handlers.lock().retain(|(handler_id, _)| *handler_id != id);
            }
        })
    }

    /// Invokes every connected handler in connection order.
    pub fn emit(&self, args: &N) {
        let snapshot: SmallVec<[NativeHandler<N>; 4]> =
            self.handlers.lock().iter().map(|(_, h)| h.clone()).collect();
        for handler in snapshot {
            handler(args);
        }
    }

    /// Number of live native connections.
    pub fn handler_count(&self) -> usize {
        self.handlers.lock().len()
    }
}

impl<N> fmt::Debug for NativeSignal<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeSignal")
            .field("handlers", &self.handlers.lock().len())
            .finish()
    }
}

// ============================================================================
// Event (fan-out adapter)
// ============================================================================

struct Channel<E> {
    listeners: SmallVec<[Listener<E>; 4]>,
    native: Option<Subscription>,
}

/// Fan-out handle given to the native hook. Holds the channel weakly.
pub struct Fanout<E> {
    channel: Weak<Mutex<Channel<E>>>,
}

impl<E> Clone for Fanout<E> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

impl<E> Fanout<E> {
    /// Delivers `args` to every listener registered at the time of the call.
    pub fn emit(&self, args: &E) {
        let Some(channel) = self.channel.upgrade() else {
            return;
        };
        let snapshot = channel.lock().listeners.clone();
        for listener in snapshot {
            listener(args);
        }
    }
}

type Connector<E> = Box<dyn Fn(Fanout<E>) -> Subscription + Send + Sync>;

/// An engine-level event channel with lazily managed native subscription.
pub struct Event<E> {
    name: &'static str,
    channel: Arc<Mutex<Channel<E>>>,
    connect: Connector<E>,
}

impl<E: 'static> Event<E> {
    /// Creates a channel whose native subscription is produced by `connect`.
    ///
    /// `connect` runs when the first listener arrives; the [`Subscription`] it
    /// returns is dropped when the last listener leaves.
    pub fn new(
        name: &'static str,
        connect: impl Fn(Fanout<E>) -> Subscription + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            channel: Arc::new(Mutex::new(Channel {
                listeners: SmallVec::new(),
                native: None,
            })),
            connect: Box::new(connect),
        }
    }

    /// Channel backed by a [`NativeSignal`], translating each native value.
    ///
    /// `translate` returning `None` suppresses the event (e.g. a resize
    /// notification whose size did not change).
    pub fn from_signal<N: 'static>(
        name: &'static str,
        signal: &Arc<NativeSignal<N>>,
        translate: impl Fn(&N) -> Option<E> + Send + Sync + 'static,
    ) -> Self {
        let signal = signal.clone();
        let translate = Arc::new(translate);
        Self::new(name, move |fanout| {
            let translate = translate.clone();
            signal.connect(move |native| {
                if let Some(args) = translate(native) {
                    fanout.emit(&args);
                }
            })
        })
    }

    /// A channel with no native source. Listeners are stored but never invoked.
    pub fn inert(name: &'static str) -> Self {
        Self::new(name, |_| Subscription::empty())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Appends a listener; connects the native source if this is the first one.
    pub fn add(&self, listener: Listener<E>) {
        let mut channel = self.channel.lock();
        channel.listeners.push(listener);
        if channel.listeners.len() == 1 && channel.native.is_none() {
            let fanout = Fanout {
                channel: Arc::downgrade(&self.channel),
            };
            channel.native = Some((self.connect)(fanout));
            log::trace!("{}: native source connected", self.name);
        }
    }

    /// Convenience for `add(listener(f))`, returning the stored listener for later removal.
    pub fn subscribe(&self, f: impl Fn(&E) + Send + Sync + 'static) -> Listener<E> {
        let listener: Listener<E> = Arc::new(f);
        self.add(listener.clone());
        listener
    }

    /// Removes one registration of `listener`.
    ///
    /// Returns `false` when the listener was not registered. Disconnects the
    /// native source when the list becomes empty.
    pub fn remove(&self, listener: &Listener<E>) -> bool {
        let mut channel = self.channel.lock();
        let Some(index) = channel
            .listeners
            .iter()
            .position(|registered| Arc::ptr_eq(registered, listener))
        else {
            return false;
        };
        channel.listeners.remove(index);
        if channel.listeners.is_empty()
            && let Some(native) = channel.native.take()
        {
            native.unsubscribe();
            log::trace!("{}: native source disconnected", self.name);
        }
        true
    }

    pub fn listener_count(&self) -> usize {
        self.channel.lock().listeners.len()
    }

    /// Whether the native source is currently connected.
    pub fn is_connected(&self) -> bool {
        self.channel.lock().native.is_some()
    }

    /// Emits directly to listeners, bypassing the native source.
    pub fn emit(&self, args: &E) {
        Fanout {
            channel: Arc::downgrade(&self.channel),
        }
        .emit(args);
    }
}

impl<E> fmt::Debug for Event<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = self.channel.lock();
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("listeners", &channel.listeners.len())
            .field("connected", &channel.native.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn listener_may_remove_itself_while_firing() {
        let signal = NativeSignal::<u32>::new();
        let event = Arc::new(Event::from_signal("test", &signal, |v: &u32| Some(*v)));
        let hits = Arc::new(AtomicUsize::new(0));

        let slot: Arc<Mutex<Option<Listener<u32>>>> = Arc::new(Mutex::new(None));
        let l = {
            let event = Arc::downgrade(&event);
            let slot = slot.clone();
            let hits = hits.clone();
            listener(move |_: &u32| {
                hits.fetch_add(1, Ordering::SeqCst);
                if let (Some(event), Some(me)) = (event.upgrade(), slot.lock().clone()) {
                    event.remove(&me);
                }
            })
        };
        *slot.lock() = Some(l.clone());
        event.add(l);

        signal.emit(&1);
        signal.emit(&2);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signal.handler_count(), 0);
    }

    #[test]
    fn dropping_event_releases_native_handler() {
        let signal = NativeSignal::<()>::new();
        {
            let event = Event::from_signal("drop", &signal, |(): &()| Some(()));
            event.subscribe(|()| {});
            assert_eq!(signal.handler_count(), 1);
        }
        assert_eq!(signal.handler_count(), 0);
    }
}
