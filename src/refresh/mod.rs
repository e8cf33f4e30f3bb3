//! Display refresh coordination
//!
//! Coalesces invalidations into a single scheduled redraw:
//!
//! ```text
//!            invalidate                 run_scheduled
//!   Idle ─────────────────▶ RefreshScheduled ─────────────▶ Idle
//!                              │        ▲
//!                              └────────┘ invalidate (absorbed)
//! ```
//!
//! Every invalidation while a refresh is scheduled is absorbed into the
//! pending set, and running the scheduled refresh performs exactly one
//! redraw pass. The periodic [`RefreshTicker`] runs only while redraws keep
//! arriving and pauses itself on the first idle tick.

mod notifier;
mod tick;

pub use notifier::RefreshNotifier;
pub use tick::RefreshTicker;

use std::time::{Duration, Instant};

use tracing::trace;

use notifier::NotifierInbox;

/// Why the view needs redrawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    SelectionChanged,
    SizeChanged,
    BufferScrolled,
    TextCommitted,
    /// Terminal output changed the screen
    ContentChanged,
    /// Provisional IME text or its caret moved
    CompositionChanged,
}

impl Invalidation {
    const ALL: [Invalidation; 6] = [
        Invalidation::SelectionChanged,
        Invalidation::SizeChanged,
        Invalidation::BufferScrolled,
        Invalidation::TextCommitted,
        Invalidation::ContentChanged,
        Invalidation::CompositionChanged,
    ];

    fn bit(self) -> u8 {
        match self {
            Invalidation::SelectionChanged => 1 << 0,
            Invalidation::SizeChanged => 1 << 1,
            Invalidation::BufferScrolled => 1 << 2,
            Invalidation::TextCommitted => 1 << 3,
            Invalidation::ContentChanged => 1 << 4,
            Invalidation::CompositionChanged => 1 << 5,
        }
    }
}

/// A set of invalidation reasons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvalidationSet(u8);

impl InvalidationSet {
    pub fn empty() -> Self {
        Self(0)
    }

    fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn insert(&mut self, reason: Invalidation) {
        self.0 |= reason.bit();
    }

    pub fn contains(&self, reason: Invalidation) -> bool {
        self.0 & reason.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Invalidation> + '_ {
        Invalidation::ALL.into_iter().filter(|reason| self.contains(*reason))
    }
}

impl From<Invalidation> for InvalidationSet {
    fn from(reason: Invalidation) -> Self {
        Self(reason.bit())
    }
}

/// Coordinator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    RefreshScheduled,
}

/// Coalesces invalidations into scheduled redraws.
///
/// Owned by the UI thread. Other threads post through a
/// [`RefreshNotifier`] obtained from [`RefreshCoordinator::notifier`].
#[derive(Debug)]
pub struct RefreshCoordinator {
    state: RefreshState,
    pending: InvalidationSet,
    ticker: RefreshTicker,
    notifier: RefreshNotifier,
    inbox: NotifierInbox,
    scheduled: u64,
    redraws: u64,
}

impl RefreshCoordinator {
    pub fn new(tick_interval: Duration) -> Self {
        let (notifier, inbox) = notifier::channel();
        Self {
            state: RefreshState::Idle,
            pending: InvalidationSet::empty(),
            ticker: RefreshTicker::new(tick_interval),
            notifier,
            inbox,
            scheduled: 0,
            redraws: 0,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// Whether a redraw is scheduled and not yet performed
    pub fn needs_redraw(&self) -> bool {
        self.state == RefreshState::RefreshScheduled
    }

    /// Reasons accumulated for the scheduled redraw
    pub fn pending(&self) -> InvalidationSet {
        self.pending
    }

    pub fn ticker(&self) -> &RefreshTicker {
        &self.ticker
    }

    /// Handle for posting invalidations from other threads
    pub fn notifier(&self) -> RefreshNotifier {
        self.notifier.clone()
    }

    /// Number of refresh callbacks scheduled so far
    pub fn scheduled_count(&self) -> u64 {
        self.scheduled
    }

    /// Number of redraw passes performed so far
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Record an invalidation on the owner thread.
    ///
    /// Returns true when this call scheduled a new refresh, false when it
    /// was absorbed into one already scheduled.
    pub fn invalidate(&mut self, reason: Invalidation) -> bool {
        self.pending.insert(reason);
        self.ticker.resume();
        match self.state {
            RefreshState::Idle => {
                self.state = RefreshState::RefreshScheduled;
                self.scheduled += 1;
                trace!(?reason, "refresh scheduled");
                true
            },
            RefreshState::RefreshScheduled => {
                trace!(?reason, "invalidation coalesced");
                false
            },
        }
    }

    /// Move invalidations posted from other threads onto this thread.
    /// Returns true if that scheduled a new refresh.
    pub fn pump(&mut self) -> bool {
        let posted = self.inbox.drain();
        let mut scheduled = false;
        for reason in posted.iter() {
            scheduled |= self.invalidate(reason);
        }
        scheduled
    }

    /// Run the scheduled refresh callback, if any: one `redraw` pass with
    /// every reason accumulated since scheduling, then back to idle.
    pub fn run_scheduled<F>(&mut self, redraw: F) -> bool
    where
        F: FnOnce(InvalidationSet),
    {
        if self.state != RefreshState::RefreshScheduled {
            return false;
        }
        let reasons = std::mem::take(&mut self.pending);
        self.state = RefreshState::Idle;
        self.redraws += 1;
        redraw(reasons);
        true
    }

    /// Periodic tick from the host. Picks up cross-thread posts, runs a
    /// scheduled refresh, and pauses the ticker when there was nothing to
    /// draw. Returns true if a redraw pass ran.
    pub fn tick<F>(&mut self, now: Instant, redraw: F) -> bool
    where
        F: FnOnce(InvalidationSet),
    {
        self.pump();
        if !self.ticker.fire(now) {
            return false;
        }
        if self.run_scheduled(redraw) {
            true
        } else {
            self.ticker.pause();
            false
        }
    }

    /// Keep the ticker running while content is continuously changing
    /// (streaming output, animation)
    pub fn content_changed(&mut self) -> bool {
        self.invalidate(Invalidation::ContentChanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> RefreshCoordinator {
        RefreshCoordinator::new(Duration::from_millis(16))
    }

    #[test]
    fn test_invalidations_coalesce_into_one_callback() {
        let mut refresh = coordinator();
        assert!(refresh.invalidate(Invalidation::SelectionChanged));
        for _ in 0..10 {
            assert!(!refresh.invalidate(Invalidation::SizeChanged));
        }
        assert!(!refresh.invalidate(Invalidation::BufferScrolled));
        assert_eq!(refresh.scheduled_count(), 1);

        let mut calls = 0;
        let mut seen = InvalidationSet::empty();
        assert!(refresh.run_scheduled(|reasons| {
            calls += 1;
            seen = reasons;
        }));
        assert!(!refresh.run_scheduled(|_| calls += 1));

        assert_eq!(calls, 1);
        assert!(seen.contains(Invalidation::SelectionChanged));
        assert!(seen.contains(Invalidation::SizeChanged));
        assert!(seen.contains(Invalidation::BufferScrolled));
        assert!(!seen.contains(Invalidation::TextCommitted));
        assert_eq!(refresh.state(), RefreshState::Idle);
        assert!(refresh.pending().is_empty());
    }

    #[test]
    fn test_new_window_after_refresh() {
        let mut refresh = coordinator();
        refresh.invalidate(Invalidation::TextCommitted);
        refresh.run_scheduled(|_| {});
        assert!(refresh.invalidate(Invalidation::TextCommitted));
        assert_eq!(refresh.scheduled_count(), 2);
    }

    #[test]
    fn test_remote_notifications_coalesce() {
        let mut refresh = coordinator();
        let notifier = refresh.notifier();
        for _ in 0..50 {
            notifier.notify(Invalidation::SelectionChanged);
        }
        notifier.notify(Invalidation::SizeChanged);
        assert!(!refresh.needs_redraw());

        assert!(refresh.pump());
        assert!(!refresh.pump());
        assert_eq!(refresh.scheduled_count(), 1);

        let mut calls = 0;
        refresh.run_scheduled(|_| calls += 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_ticker_pauses_when_idle() {
        let mut refresh = coordinator();
        let now = Instant::now();
        assert!(refresh.ticker().is_paused());
        assert!(!refresh.tick(now, |_| {}));

        refresh.content_changed();
        assert!(!refresh.ticker().is_paused());
        assert!(refresh.tick(now, |_| {}));
        assert!(!refresh.ticker().is_paused());

        // Nothing new arrived: the next tick pauses the ticker
        assert!(!refresh.tick(now + Duration::from_millis(16), |_| {}));
        assert!(refresh.ticker().is_paused());
        assert_eq!(refresh.ticker().fired(), 2);
        assert_eq!(refresh.redraw_count(), 1);
    }

    #[test]
    fn test_tick_picks_up_remote_posts() {
        let mut refresh = coordinator();
        refresh.content_changed();
        refresh.run_scheduled(|_| {});

        refresh.notifier().notify(Invalidation::SizeChanged);
        let mut seen = InvalidationSet::empty();
        assert!(refresh.tick(Instant::now(), |reasons| seen = reasons));
        assert_eq!(seen, InvalidationSet::from(Invalidation::SizeChanged));
    }

    #[test]
    fn test_invalidation_set_iter() {
        let mut set = InvalidationSet::empty();
        set.insert(Invalidation::CompositionChanged);
        set.insert(Invalidation::TextCommitted);
        set.insert(Invalidation::SelectionChanged);
        assert!(!set.contains(Invalidation::ContentChanged));
        let reasons: Vec<_> = set.iter().collect();
        assert_eq!(
            reasons,
            vec![
                Invalidation::SelectionChanged,
                Invalidation::TextCommitted,
                Invalidation::CompositionChanged,
            ]
        );
    }
}
