use editor_notifications_util::{Notification, NotificationId, NotificationOptions, NotificationType};
use std::{num::NonZeroU32, sync::Arc, time::SystemTime};

/// In-process notification bus
///
/// Allocates ids and keeps every notification created since the last clear,
/// in creation order.
#[derive(Debug)]
pub struct NotificationBus {
    next_id: NonZeroU32,
    notifications: Vec<Arc<Notification>>,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self {
            next_id: NonZeroU32::MIN,
            notifications: Vec::new(),
        }
    }

    fn allocate_id(&mut self) -> NotificationId {
        let id = self.next_id.get();
        self.next_id = self.next_id.checked_add(1).unwrap_or(NonZeroU32::MIN);
        id
    }

    /// Create a notification and put it on the bus
    pub fn add(
        &mut self,
        kind: NotificationType,
        message: impl Into<String>,
        options: NotificationOptions,
    ) -> Arc<Notification> {
        self.add_at(kind, message, options, SystemTime::now())
    }

    /// Same as [`add`](Self::add) with an explicit creation time
    pub fn add_at(
        &mut self,
        kind: NotificationType,
        message: impl Into<String>,
        options: NotificationOptions,
        time: SystemTime,
    ) -> Arc<Notification> {
        let id = self.allocate_id();
        let notification = Arc::new(Notification::new(id, kind, message, options).with_time(time));
        self.notifications.push(notification.clone());
        notification
    }

    pub fn add_error(&mut self, message: impl Into<String>, options: NotificationOptions) -> Arc<Notification> {
        self.add(NotificationType::Error, message, options)
    }

    pub fn add_fatal_error(&mut self, message: impl Into<String>, options: NotificationOptions) -> Arc<Notification> {
        self.add(NotificationType::Fatal, message, options)
    }

    /// Put a notification created elsewhere on the bus
    pub fn push(&mut self, notification: Arc<Notification>) {
        self.next_id = self
            .next_id
            .max(NonZeroU32::new(notification.id.saturating_add(1)).unwrap_or(NonZeroU32::MIN));
        self.notifications.push(notification);
    }

    /// Pending notifications, oldest first
    pub fn notifications(&self) -> &[Arc<Notification>] {
        &self.notifications
    }

    pub fn get(&self, id: NotificationId) -> Option<&Arc<Notification>> {
        self.notifications.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}
