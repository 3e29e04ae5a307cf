use crate::NotificationType;

/// Icon names used by cards and log items
pub mod icons {
    pub const FATAL: &str = "bug";
    pub const ERROR: &str = "flame";
    pub const WARNING: &str = "alert";
    pub const INFO: &str = "info";
    pub const SUCCESS: &str = "check";
}

/// Get the icon name for a notification type
pub fn type_icon(kind: NotificationType) -> &'static str {
    match kind {
        NotificationType::Fatal => icons::FATAL,
        NotificationType::Error => icons::ERROR,
        NotificationType::Warning => icons::WARNING,
        NotificationType::Info => icons::INFO,
        NotificationType::Success => icons::SUCCESS,
    }
}

/// Button class for a notification type
///
/// Fatal notifications share the error button style.
pub fn button_class(kind: NotificationType) -> &'static str {
    match kind {
        NotificationType::Fatal | NotificationType::Error => "btn-error",
        NotificationType::Warning => "btn-warning",
        NotificationType::Info => "btn-info",
        NotificationType::Success => "btn-success",
    }
}

/// Class that hides a type in the log list
pub fn hidden_type_class(kind: NotificationType) -> String {
    format!("hide-{}", kind.as_str())
}
