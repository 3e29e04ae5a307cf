use crate::constants::NEW_NOTIFICATION_ANIMATION;
use editor_notifications_util::NotificationType;

/// Status bar badge counting the notifications of the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounter {
    count: usize,
    last_type: Option<NotificationType>,
    /// Highlight flag, cleared by the end of the highlight animation
    just_added: bool,
}

impl StatusCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn last_type(&self) -> Option<NotificationType> {
        self.last_type
    }

    pub fn just_added(&self) -> bool {
        self.just_added
    }

    pub fn add(&mut self, kind: NotificationType) {
        self.count += 1;
        self.last_type = Some(kind);
        self.just_added = true;
    }

    /// An animation on the badge ended; only the highlight animation counts
    pub fn on_animation_end(&mut self, animation: &str) -> bool {
        if animation != NEW_NOTIFICATION_ANIMATION {
            return false;
        }
        std::mem::take(&mut self.just_added)
    }

    pub fn tooltip(&self) -> String {
        let s = if self.count == 1 { "" } else { "s" };
        format!("{} notification{}", self.count, s)
    }

    pub fn clear(&mut self) {
        self.count = 0;
        self.last_type = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_tooltip() {
        let mut counter = StatusCounter::new();
        assert_eq!(counter.tooltip(), "0 notifications");

        counter.add(NotificationType::Info);
        assert_eq!(counter.tooltip(), "1 notification");
        assert_eq!(counter.last_type(), Some(NotificationType::Info));

        counter.add(NotificationType::Fatal);
        assert_eq!(counter.count(), 2);
        assert_eq!(counter.tooltip(), "2 notifications");
        assert_eq!(counter.last_type(), Some(NotificationType::Fatal));
    }

    #[test]
    fn test_highlight_cleared_by_animation_only() {
        let mut counter = StatusCounter::new();
        counter.add(NotificationType::Warning);
        assert!(counter.just_added());

        assert!(!counter.on_animation_end("fade-out"));
        assert!(counter.just_added());

        assert!(counter.on_animation_end(NEW_NOTIFICATION_ANIMATION));
        assert!(!counter.just_added());
    }

    #[test]
    fn test_clear() {
        let mut counter = StatusCounter::new();
        counter.add(NotificationType::Error);
        counter.clear();
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.last_type(), None);
        assert_eq!(counter.tooltip(), "0 notifications");
    }
}
