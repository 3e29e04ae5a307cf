use editor_notifications_config::PopupPolicy;
use editor_notifications_util::Notification;
use std::{sync::Arc, time::Duration};

/// Whether `incoming` should be shown given the notification seen just before it
///
/// An identical notification arriving inside `window` is a duplicate.
pub fn should_display(incoming: &Notification, previous: Option<&Notification>, window: Duration) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    incoming.elapsed_since(previous) >= window || !incoming.is_equal(previous)
}

/// Whether the popup policy lets `notification` open a card
pub fn popup_admitted(policy: PopupPolicy, notification: &Notification) -> bool {
    match policy {
        PopupPolicy::All => true,
        PopupPolicy::Errors => notification.kind.is_error(),
        PopupPolicy::Dismissable => notification.is_dismissable(),
        PopupPolicy::None => false,
    }
}

/// Drops a notification identical to the one right before it
///
/// Only the most recent notification is remembered, so the check is O(1).
#[derive(Debug)]
pub struct DuplicateFilter {
    window: Duration,
    last: Option<Arc<Notification>>,
}

impl DuplicateFilter {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Check if a notification should be displayed and remember it.
    /// The notification becomes the new reference even when it is a duplicate.
    pub fn check_and_update(&mut self, notification: &Arc<Notification>) -> bool {
        let show = should_display(notification, self.last.as_deref(), self.window);
        if !show {
            tracing::debug!(
                "Dropping duplicate {} notification {}: {:?}",
                notification.kind,
                notification.id,
                notification.message
            );
        }
        self.last = Some(notification.clone());
        show
    }

    pub fn last(&self) -> Option<&Arc<Notification>> {
        self.last.as_ref()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
