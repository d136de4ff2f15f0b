//! Transient insight notifications
//!
//! After a change (a new expense, a new budget) one insight is picked at
//! random and shown for a few seconds. The random source is injectable so
//! callers and tests can pin the selection.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use super::types::{Insight, InsightKind};

/// How long a notification stays visible
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Source of uniformly distributed indexes
pub trait RandomSource {
    /// Return an index in `0..len`. Only called with `len > 0`.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: rand::Rng> RandomSource for R {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Always returns the same index (clamped to the list)
#[derive(Debug, Clone, Copy)]
pub struct FixedIndex(pub usize);

impl RandomSource for FixedIndex {
    fn pick(&mut self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}

/// Choose one insight to surface, or `None` if there are none
pub fn pick_notification<'a>(
    insights: &'a [Insight],
    rng: &mut dyn RandomSource,
) -> Option<&'a Insight> {
    if insights.is_empty() {
        return None;
    }
    insights.get(rng.pick(insights.len()))
}

/// A visible notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

#[derive(Default)]
struct NotifierState {
    current: Option<Notification>,
    next_id: u64,
    timer: Option<JoinHandle<()>>,
}

/// Holds at most one notification and dismisses it after a delay
///
/// `show` must be called from within a tokio runtime; the dismissal runs as
/// a spawned task.
#[derive(Clone)]
pub struct Notifier {
    state: Arc<Mutex<NotifierState>>,
    display_for: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_DURATION)
    }
}

impl Notifier {
    pub fn new(display_for: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(NotifierState::default())),
            display_for,
        }
    }

    pub fn display_duration(&self) -> Duration {
        self.display_for
    }

    /// Show an insight, replacing (and un-scheduling) any visible one
    pub fn show(&self, insight: &Insight) -> Notification {
        let mut state = self.lock();

        state.next_id += 1;
        let notification = Notification {
            id: state.next_id,
            kind: insight.kind,
            title: insight.title.clone(),
            message: insight.message.clone(),
        };

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.current = Some(notification.clone());

        let shared = Arc::clone(&self.state);
        let id = notification.id;
        let display_for = self.display_for;
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(display_for).await;
            let mut state = match shared.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if state.current.as_ref().map(|n| n.id) == Some(id) {
                state.current = None;
                state.timer = None;
                tracing::debug!(id, "Notification dismissed after timeout");
            }
        }));

        notification
    }

    /// Pick a random insight and show it
    pub fn show_random(
        &self,
        insights: &[Insight],
        rng: &mut dyn RandomSource,
    ) -> Option<Notification> {
        pick_notification(insights, rng).map(|insight| self.show(insight))
    }

    /// Hide the visible notification now
    pub fn dismiss(&self) {
        let mut state = self.lock();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.current = None;
    }

    pub fn current(&self) -> Option<Notification> {
        self.lock().current.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NotifierState> {
        // State stays consistent even if a holder panicked
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
