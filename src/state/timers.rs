use editor_notifications_util::NotificationId;
use std::{
    collections::{BTreeMap, HashMap},
    time::Instant,
};

pub type TimerId = u64;

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// The visibility duration of a card ran out
    Autohide(NotificationId),
    /// The removal animation of a card finished
    Removal(NotificationId),
    /// Refresh the relative timestamp of a log entry
    LogTick(NotificationId),
}

/// Cancellable one-shot timers ordered by deadline
///
/// Timers sharing a deadline fire in the order they were scheduled.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: TimerId,
    queue: BTreeMap<(Instant, TimerId), TimerKind>,
    deadlines: HashMap<TimerId, Instant>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Instant, kind: TimerKind) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.insert((deadline, id), kind);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancel a timer, returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let Some(deadline) = self.deadlines.remove(&id) else {
            return false;
        };
        self.queue.remove(&(deadline, id)).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Remove and return the earliest timer due at `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, TimerKind)> {
        let (&(deadline, id), _) = self.queue.first_key_value()?;
        if deadline > now {
            return None;
        }
        self.deadlines.remove(&id);
        self.queue.remove(&(deadline, id)).map(|kind| (deadline, kind))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fires_in_deadline_order() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule(start + Duration::from_millis(20), TimerKind::Removal(2));
        timers.schedule(start + Duration::from_millis(10), TimerKind::Autohide(1));
        timers.schedule(start + Duration::from_millis(10), TimerKind::LogTick(1));

        assert_eq!(timers.next_deadline(), Some(start + Duration::from_millis(10)));
        assert_eq!(timers.pop_due(start), None, "nothing due yet");

        let now = start + Duration::from_millis(20);
        let fired: Vec<_> = std::iter::from_fn(|| timers.pop_due(now).map(|(_, k)| k)).collect();
        assert_eq!(
            fired,
            vec![TimerKind::Autohide(1), TimerKind::LogTick(1), TimerKind::Removal(2)]
        );
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        let id = timers.schedule(start, TimerKind::Autohide(7));
        assert!(timers.is_pending(id));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id), "second cancel is a no-op");
        assert_eq!(timers.pop_due(start), None);
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn test_fired_timer_cannot_be_cancelled() {
        let start = Instant::now();
        let mut timers = TimerQueue::new();
        let id = timers.schedule(start, TimerKind::Removal(3));
        assert!(timers.pop_due(start).is_some());
        assert!(!timers.is_pending(id));
        assert!(!timers.cancel(id));
    }
}
