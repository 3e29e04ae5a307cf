pub mod command_log;
pub mod issue_text;
pub mod kind;
pub mod kind_style;
pub mod link;
pub mod options;
pub mod os_release;
pub mod package_path;
pub mod repository;
pub mod stack_trace;

pub use command_log::CommandLog;
pub use issue_text::{IssueReport, ThrownFrom, issue_title};
pub use kind::{NotificationType, UnknownType};
pub use kind_style::{button_class, hidden_type_class, type_icon};
pub use link::{is_safe_url, open_link};
pub use options::{Button, ButtonCallback, NotificationOptions};
pub use os_release::{linux_distro, macos_version, windows_edition};
pub use package_path::{file_path_from_location, is_subfolder, package_name_from_path};
pub use repository::{github_repo_slug, issue_url, normalize_repo_url, release_url, settings_uri};
pub use stack_trace::{StackFrame, has_traceable_frame, normalize_path, normalize_stack_paths, parse_stack};

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, SystemTime},
};

pub type NotificationId = u32;

/// A single user-facing message
///
/// The record is shared between the popup area, the log and the diagnostic
/// pipeline, so the mutable flags are atomics behind `&self`.
#[derive(Debug)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationType,
    pub message: String,
    pub options: NotificationOptions,
    pub time: SystemTime,
    dismissable: AtomicBool,
    dismissed: AtomicBool,
    displayed: AtomicBool,
}

impl Notification {
    pub fn new(
        id: NotificationId,
        kind: NotificationType,
        message: impl Into<String>,
        options: NotificationOptions,
    ) -> Self {
        let dismissable = options.dismissable;
        Notification {
            id,
            kind,
            message: message.into(),
            options,
            time: SystemTime::now(),
            dismissable: AtomicBool::new(dismissable),
            dismissed: AtomicBool::new(false),
            displayed: AtomicBool::new(false),
        }
    }

    /// Replace the creation time, used when replaying stored notifications
    pub fn with_time(mut self, time: SystemTime) -> Self {
        self.time = time;
        self
    }

    pub fn detail(&self) -> Option<&str> {
        self.options.detail.as_deref().filter(|d| !d.is_empty())
    }

    pub fn stack(&self) -> Option<&str> {
        self.options.stack.as_deref().filter(|s| !s.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.options.description.as_deref().filter(|d| !d.is_empty())
    }

    pub fn buttons(&self) -> &[Button] {
        &self.options.buttons
    }

    pub fn package_name(&self) -> Option<&str> {
        self.options.package_name.as_deref().filter(|p| !p.is_empty())
    }

    pub fn icon(&self) -> &'static str {
        type_icon(self.kind)
    }

    pub fn is_dismissable(&self) -> bool {
        self.dismissable.load(Ordering::Acquire)
    }

    /// Turn on dismissability, returns false if it was already on
    pub fn make_dismissable(&self) -> bool {
        !self.dismissable.swap(true, Ordering::AcqRel)
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed.load(Ordering::Acquire)
    }

    /// Mark the notification dismissed
    ///
    /// Only dismissable notifications can be dismissed. Returns true when the
    /// flag actually flipped.
    pub fn dismiss(&self) -> bool {
        if !self.is_dismissable() {
            return false;
        }
        !self.dismissed.swap(true, Ordering::AcqRel)
    }

    /// Force the dismissed flag, used when a card leaves the popup area on its own
    pub fn mark_dismissed(&self) {
        self.dismissed.store(true, Ordering::Release);
    }

    /// Clear the dismissed flag so the notification can be shown again
    pub fn restore(&self) {
        self.dismissed.store(false, Ordering::Release);
    }

    pub fn was_displayed(&self) -> bool {
        self.displayed.load(Ordering::Acquire)
    }

    /// Record that the notification reached the screen. There is no way back.
    pub fn mark_displayed(&self) {
        self.displayed.store(true, Ordering::Release);
    }

    /// Same type, message and options
    pub fn is_equal(&self, other: &Notification) -> bool {
        self.kind == other.kind && self.message == other.message && self.options == other.options
    }

    /// Time elapsed between `earlier` and this notification, zero if `earlier` is newer
    pub fn elapsed_since(&self, earlier: &Notification) -> Duration {
        self.time.duration_since(earlier.time).unwrap_or(Duration::ZERO)
    }

    pub fn duration_since(&self) -> Option<Duration> {
        SystemTime::now().duration_since(self.time).ok()
    }
}
