use crate::{
    constants::{JUST_NOW_THRESHOLD, LOG_URI, TIMESTAMP_REFRESH},
    state::{TimerId, TimerKind, TimerQueue},
};
use chrono::{DateTime, Local};
use chrono_humanize::HumanTime;
use editor_notifications_util::{Notification, NotificationId, NotificationType, hidden_type_class};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::Arc,
    time::{Instant, SystemTime},
};

/// The only state of the log kept across restarts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogState {
    #[serde(default)]
    pub types_hidden: BTreeMap<NotificationType, bool>,
}

/// Relative age of a notification, "just now" for the first seconds
pub fn relative_label(time: SystemTime, now: SystemTime) -> String {
    let age = now.duration_since(time).unwrap_or_default();
    if age < JUST_NOW_THRESHOLD {
        return "just now".to_string();
    }
    let seconds = i64::try_from(age.as_secs()).unwrap_or(i64::MAX);
    HumanTime::from(chrono::Duration::seconds(-seconds)).to_string()
}

/// Absolute creation time shown in the timestamp tooltip
pub fn absolute_label(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%b %-d, %Y, %-I:%M:%S %p")
        .to_string()
}

/// One notification in the log
#[derive(Debug)]
pub struct LogEntry {
    notification: Arc<Notification>,
    label: String,
    tooltip: String,
    tick: Option<TimerId>,
}

impl LogEntry {
    pub fn notification(&self) -> &Arc<Notification> {
        &self.notification
    }

    /// Relative timestamp, refreshed every minute
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }
}

type Listener<T> = Box<dyn FnMut(&T) + Send>;

/// History of every notification that passed the duplicate filter
///
/// Entries are kept in arrival order and listed newest first.
pub struct NotificationsLog {
    entries: Vec<LogEntry>,
    types_hidden: BTreeMap<NotificationType, bool>,
    item_click_listeners: Vec<Listener<Arc<Notification>>>,
    destroy_listeners: Vec<Listener<()>>,
}

impl std::fmt::Debug for NotificationsLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationsLog")
            .field("entries", &self.entries)
            .field("types_hidden", &self.types_hidden)
            .finish_non_exhaustive()
    }
}

impl Default for NotificationsLog {
    fn default() -> Self {
        Self::new(LogState::default())
    }
}

impl NotificationsLog {
    pub const TITLE: &'static str = "Log";
    pub const LONG_TITLE: &'static str = "Notifications Log";

    /// Create an empty log; types missing from `state` are shown
    pub fn new(state: LogState) -> Self {
        let mut types_hidden: BTreeMap<_, _> = NotificationType::ALL.iter().map(|t| (*t, false)).collect();
        types_hidden.extend(state.types_hidden);
        Self {
            entries: Vec::new(),
            types_hidden,
            item_click_listeners: Vec::new(),
            destroy_listeners: Vec::new(),
        }
    }

    pub fn uri(&self) -> &'static str {
        LOG_URI
    }

    pub fn add(&mut self, notification: Arc<Notification>, timers: &mut TimerQueue, now: Instant, wall: SystemTime) {
        let tick = timers.schedule(now + TIMESTAMP_REFRESH, TimerKind::LogTick(notification.id));
        self.entries.push(LogEntry {
            label: relative_label(notification.time, wall),
            tooltip: absolute_label(notification.time),
            notification,
            tick: Some(tick),
        });
    }

    /// Refresh the relative timestamp of an entry and schedule the next refresh
    pub fn on_tick(&mut self, id: NotificationId, timers: &mut TimerQueue, now: Instant, wall: SystemTime) {
        let Some(entry) = self.entries.iter_mut().find(|e| e.notification.id == id) else {
            return;
        };
        entry.label = relative_label(entry.notification.time, wall);
        entry.tick = Some(timers.schedule(now + TIMESTAMP_REFRESH, TimerKind::LogTick(id)));
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_type_hidden(&self, kind: NotificationType) -> bool {
        self.types_hidden.get(&kind).copied().unwrap_or(false)
    }

    /// Flip the visibility of a type, or set it when `force` is given
    pub fn toggle_type(&mut self, kind: NotificationType, force: Option<bool>) -> bool {
        let hidden = force.unwrap_or(!self.is_type_hidden(kind));
        self.types_hidden.insert(kind, hidden);
        hidden
    }

    /// Classes of the entry list, one per hidden type
    pub fn list_classes(&self) -> Vec<String> {
        self.types_hidden
            .iter()
            .filter(|(_, hidden)| **hidden)
            .map(|(kind, _)| hidden_type_class(*kind))
            .collect()
    }

    /// Click on an entry outside its buttons
    pub fn click(&mut self, id: NotificationId) -> Option<Arc<Notification>> {
        let notification = self
            .entries
            .iter()
            .find(|e| e.notification.id == id)
            .map(|e| e.notification.clone())?;
        for listener in &mut self.item_click_listeners {
            listener(&notification);
        }
        Some(notification)
    }

    pub fn on_item_click(&mut self, listener: impl FnMut(&Arc<Notification>) + Send + 'static) {
        self.item_click_listeners.push(Box::new(listener));
    }

    pub fn on_did_destroy(&mut self, listener: impl FnMut(&()) + Send + 'static) {
        self.destroy_listeners.push(Box::new(listener));
    }

    /// Remove every entry and stop their timestamp refreshes
    pub fn clear(&mut self, timers: &mut TimerQueue) {
        for entry in self.entries.drain(..) {
            if let Some(tick) = entry.tick {
                timers.cancel(tick);
            }
        }
    }

    pub fn serialize(&self) -> LogState {
        LogState {
            types_hidden: self.types_hidden.clone(),
        }
    }

    /// Tear the log down and tell the listeners
    pub fn destroy(mut self, timers: &mut TimerQueue) {
        self.clear(timers);
        for listener in &mut self.destroy_listeners {
            listener(&());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_notifications_util::NotificationOptions;
    use std::{
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    fn notification(id: NotificationId, kind: NotificationType, time: SystemTime) -> Arc<Notification> {
        Arc::new(Notification::new(id, kind, format!("n{id}"), NotificationOptions::default()).with_time(time))
    }

    #[test]
    fn test_relative_labels() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        assert_eq!(relative_label(t, t), "just now");
        assert_eq!(relative_label(t, t + Duration::from_secs(29)), "just now");
        assert_eq!(relative_label(t + Duration::from_secs(5), t), "just now", "clock skew");

        let label = relative_label(t, t + Duration::from_secs(2 * 60 * 60));
        assert!(label.contains("hour") && label.ends_with("ago"), "got {label}");
    }

    #[test]
    fn test_entries_newest_first() {
        let mut timers = TimerQueue::new();
        let mut log = NotificationsLog::default();
        let now = Instant::now();
        let wall = SystemTime::now();
        for id in 1..=3 {
            log.add(notification(id, NotificationType::Info, wall), &mut timers, now, wall);
        }
        let ids: Vec<_> = log.entries().map(|e| e.notification().id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(timers.len(), 3, "one refresh timer per entry");
    }

    #[test]
    fn test_tick_refreshes_label() {
        let mut timers = TimerQueue::new();
        let mut log = NotificationsLog::default();
        let now = Instant::now();
        let wall = SystemTime::now();
        log.add(notification(1, NotificationType::Info, wall), &mut timers, now, wall);
        assert_eq!(log.entries().next().map(LogEntry::label), Some("just now"));

        let later = now + TIMESTAMP_REFRESH * 5;
        let (_, kind) = timers.pop_due(later).unwrap();
        assert_eq!(kind, TimerKind::LogTick(1));
        log.on_tick(1, &mut timers, later, wall + TIMESTAMP_REFRESH * 5);
        assert_ne!(log.entries().next().map(LogEntry::label), Some("just now"));
        assert_eq!(timers.next_deadline(), Some(later + TIMESTAMP_REFRESH));
    }

    #[test]
    fn test_clear_cancels_ticks() {
        let mut timers = TimerQueue::new();
        let mut log = NotificationsLog::default();
        let now = Instant::now();
        log.add(notification(1, NotificationType::Error, SystemTime::now()), &mut timers, now, SystemTime::now());
        log.clear(&mut timers);
        assert!(log.is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_type_toggles_and_state() {
        let mut log = NotificationsLog::new(LogState {
            types_hidden: BTreeMap::from([(NotificationType::Info, true)]),
        });
        assert!(log.is_type_hidden(NotificationType::Info));
        assert!(!log.is_type_hidden(NotificationType::Fatal));

        assert!(log.toggle_type(NotificationType::Error, None));
        assert!(!log.toggle_type(NotificationType::Error, None));
        assert!(log.toggle_type(NotificationType::Success, Some(true)));
        assert!(log.toggle_type(NotificationType::Success, Some(true)), "forced value is kept");
        assert_eq!(log.list_classes(), vec!["hide-info".to_string(), "hide-success".to_string()]);

        let state = log.serialize();
        assert_eq!(state.types_hidden.len(), 5);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"typesHidden\""));
        assert!(json.contains("\"info\":true"));
        assert_eq!(serde_json::from_str::<LogState>(&json).unwrap(), state);
    }

    #[test]
    fn test_click_and_destroy_listeners() {
        let mut timers = TimerQueue::new();
        let mut log = NotificationsLog::default();
        let clicked = Arc::new(Mutex::new(Vec::new()));
        let destroyed = Arc::new(AtomicUsize::new(0));

        let sink = clicked.clone();
        log.on_item_click(move |n| sink.lock().unwrap().push(n.id));
        let counter = destroyed.clone();
        log.on_did_destroy(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let wall = SystemTime::now();
        log.add(notification(4, NotificationType::Warning, wall), &mut timers, Instant::now(), wall);
        assert_eq!(log.click(4).map(|n| n.id), Some(4));
        assert!(log.click(99).is_none());
        assert_eq!(*clicked.lock().unwrap(), vec![4]);

        log.destroy(&mut timers);
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
        assert!(timers.is_empty());
    }
}
