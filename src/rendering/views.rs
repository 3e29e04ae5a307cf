use super::cards::{ButtonView, CardView, fatal_view, notification_buttons, renderer_for};
use crate::{
    state::Card,
    views::{LogEntry, NotificationsLog, StatusCounter},
};
use editor_notifications_util::{NotificationId, NotificationType, type_icon};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeToggleView {
    pub kind: NotificationType,
    pub icon: &'static str,
    pub shown: bool,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogItemView {
    pub id: NotificationId,
    pub kind: NotificationType,
    pub icon: &'static str,
    pub message: String,
    pub buttons: Vec<ButtonView>,
    pub timestamp: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogView {
    pub title: &'static str,
    pub long_title: &'static str,
    pub uri: &'static str,
    pub toggles: Vec<TypeToggleView>,
    pub list_classes: Vec<String>,
    /// Newest first
    pub items: Vec<LogItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterView {
    pub count: usize,
    pub tooltip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_type: Option<NotificationType>,
    pub highlighted: bool,
}

/// Full state of the surface as the host should draw it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub cards: Vec<CardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogView>,
    pub counter: CounterView,
}

pub fn render_cards(cards: &[Card]) -> Vec<CardView> {
    cards
        .iter()
        .map(|card| renderer_for(card.notification().kind).render(card))
        .collect()
}

fn log_item(entry: &LogEntry, card: Option<&Card>) -> LogItemView {
    let n = entry.notification();
    let fatal_buttons = card.and_then(|c| {
        let issue = c.fatal()?;
        let view = fatal_view(issue, c.issue_check_requested())?;
        Some(
            view.issue_button
                .into_iter()
                .chain(Some(view.copy_report))
                .chain(view.open_settings)
                .collect::<Vec<_>>(),
        )
    });
    LogItemView {
        id: n.id,
        kind: n.kind,
        icon: n.icon(),
        message: n.message.clone(),
        buttons: fatal_buttons.unwrap_or_else(|| notification_buttons(n)),
        timestamp: entry.label().to_string(),
        tooltip: entry.tooltip().to_string(),
    }
}

/// Log pane, cards are looked up to mirror their toolbars
pub fn render_log<'a>(log: &NotificationsLog, card_for: impl Fn(NotificationId) -> Option<&'a Card>) -> LogView {
    LogView {
        title: NotificationsLog::TITLE,
        long_title: NotificationsLog::LONG_TITLE,
        uri: log.uri(),
        toggles: NotificationType::ALL
            .iter()
            .map(|kind| TypeToggleView {
                kind: *kind,
                icon: type_icon(*kind),
                shown: !log.is_type_hidden(*kind),
                tooltip: format!("Toggle {kind} notifications"),
            })
            .collect(),
        list_classes: log.list_classes(),
        items: log
            .entries()
            .map(|entry| log_item(entry, card_for(entry.notification().id)))
            .collect(),
    }
}

pub fn render_counter(counter: &StatusCounter) -> CounterView {
    CounterView {
        count: counter.count(),
        tooltip: counter.tooltip(),
        last_type: counter.last_type(),
        highlighted: counter.just_added(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TimerQueue;
    use editor_notifications_util::{Button, Notification, NotificationOptions};
    use std::{
        sync::Arc,
        time::{Duration, Instant, SystemTime},
    };

    #[test]
    fn test_log_view_mirrors_buttons_and_toggles() {
        let mut timers = TimerQueue::new();
        let mut log = NotificationsLog::default();
        log.toggle_type(NotificationType::Info, Some(true));

        let options = NotificationOptions {
            buttons: vec![Button::new("Open")],
            ..Default::default()
        };
        let n = Arc::new(Notification::new(1, NotificationType::Success, "Saved", options));
        let wall = SystemTime::now();
        log.add(n.clone(), &mut timers, Instant::now(), wall);
        let card = Card::new(n, Duration::from_secs(5), None);

        let view = render_log(&log, |id| (id == 1).then_some(&card));
        assert_eq!(view.list_classes, vec!["hide-info".to_string()]);
        assert_eq!(view.toggles.len(), 5);
        assert_eq!(view.toggles[0].tooltip, "Toggle fatal notifications");
        assert!(!view.toggles.iter().find(|t| t.kind == NotificationType::Info).unwrap().shown);

        let item = &view.items[0];
        assert_eq!(item.icon, "check");
        assert_eq!(item.timestamp, "just now");
        assert_eq!(item.buttons[0].text, "Open");
    }

    #[test]
    fn test_counter_view() {
        let mut counter = StatusCounter::new();
        counter.add(NotificationType::Error);
        let view = render_counter(&counter);
        assert_eq!(view.count, 1);
        assert_eq!(view.tooltip, "1 notification");
        assert_eq!(view.last_type, Some(NotificationType::Error));
        assert!(view.highlighted);
    }
}
