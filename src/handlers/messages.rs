use crate::uncaught::UncaughtError;
use editor_notifications_config::NotificationsConfig;
use editor_notifications_util::{NotificationId, NotificationOptions, NotificationType};
use serde::Deserialize;

/// Input accepted by a [`Session`](crate::session::Session)
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Message {
    /// New notification from the editor
    Notify {
        kind: NotificationType,
        message: String,
        #[serde(default)]
        options: NotificationOptions,
    },
    /// Close button of a card
    Dismissed { id: NotificationId },
    /// Click on a card body
    ClickCard { id: NotificationId },
    /// Pointer entered or left a card
    Hover { id: NotificationId, hovered: bool },
    /// Keyboard focus entered or left a card
    Focus { id: NotificationId, focused: bool },
    /// "Close All" button of any card
    CloseAll,
    ToggleStack { id: NotificationId },
    /// Toolbar button supplied with the notification
    ButtonClicked { id: NotificationId, index: usize },
    /// Click on a log entry outside its buttons
    ClickLogItem { id: NotificationId },
    ClickCounter,
    /// CSS animation finished on the counter
    AnimationEnd { name: String },
    ToggleLogType {
        kind: NotificationType,
        #[serde(default)]
        force: Option<bool>,
    },
    /// Issue button of a fatal card or log entry
    ClickIssueButton { id: NotificationId },
    CopyReport { id: NotificationId },
    OpenSettings { id: NotificationId },
    /// Editor command, e.g. `notifications-plus:clear-log`
    Command { name: String },
    /// Error the editor did not catch
    UncaughtError(UncaughtError),
    /// Configuration updated
    Config(NotificationsConfig),
    /// Editor dev mode switched
    DevMode { enabled: bool },
}
