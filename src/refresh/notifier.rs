//! Cross-thread invalidation posting
//!
//! The terminal engine may report selection or size changes from its own
//! thread. Those reports are folded into a shared bit set and a single
//! wake-up message is posted to the owner thread until the owner drains it,
//! so a burst of N notifications costs one message.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use super::{Invalidation, InvalidationSet};

#[derive(Debug, Default)]
struct Shared {
    pending: AtomicU8,
    posted: AtomicBool,
}

/// Sending half, handed to other threads
#[derive(Debug, Clone)]
pub struct RefreshNotifier {
    shared: Arc<Shared>,
    wake: Sender<()>,
}

impl RefreshNotifier {
    /// Record an invalidation. Returns true if this call posted the
    /// wake-up message, false if one was already on its way.
    pub fn notify(&self, reason: Invalidation) -> bool {
        self.shared.pending.fetch_or(reason.bit(), Ordering::AcqRel);
        if self.shared.posted.swap(true, Ordering::AcqRel) {
            return false;
        }
        // The owner may be gone; the notification is simply dropped then
        self.wake.send(()).is_ok()
    }
}

/// Receiving half, owned by the refresh coordinator
#[derive(Debug)]
pub(crate) struct NotifierInbox {
    shared: Arc<Shared>,
    wake: Receiver<()>,
}

impl NotifierInbox {
    /// Take everything posted since the last drain
    pub(crate) fn drain(&self) -> InvalidationSet {
        let mut woken = false;
        while self.wake.try_recv().is_ok() {
            woken = true;
        }
        if !woken {
            return InvalidationSet::empty();
        }
        // Clear the flag before taking the bits so a racing notify posts again
        self.shared.posted.store(false, Ordering::Release);
        InvalidationSet::from_bits(self.shared.pending.swap(0, Ordering::AcqRel))
    }
}

pub(crate) fn channel() -> (RefreshNotifier, NotifierInbox) {
    let shared = Arc::new(Shared::default());
    let (tx, rx) = mpsc::channel();
    (
        RefreshNotifier {
            shared: Arc::clone(&shared),
            wake: tx,
        },
        NotifierInbox { shared, wake: rx },
    )
}
