//! Conversion of uncaught host errors into notifications.

use crate::settings::Settings;
use editor_notifications_util::{NotificationOptions, NotificationType, has_traceable_frame};
use serde::Deserialize;

/// An error the host failed to catch
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UncaughtError {
    pub message: String,
    /// Script the error was raised in
    pub url: String,
    pub line: u32,
    /// Constructor name of the original error
    pub name: Option<String>,
    /// System error code, e.g. `ENOENT`
    pub code: Option<String>,
    pub stack: Option<String>,
}

/// What to do with an uncaught error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UncaughtOutcome {
    /// Show a notification instead of the raw error
    Notify {
        kind: NotificationType,
        message: String,
        options: NotificationOptions,
    },
    /// The stack offers nothing to act on
    Drop,
    /// Leave the error to the host
    Ignore,
}

const BUFFERED_PROCESS_PREFIX: &str = "Uncaught BufferedProcessError: ";

fn spawned_program(message: &str) -> Option<&str> {
    let rest = &message[message.find("spawn ")? + "spawn ".len()..];
    let end = rest.rfind(" ENOENT")?;
    Some(&rest[..end]).filter(|p| !p.is_empty())
}

fn mentions_app(message: &str) -> bool {
    message.to_lowercase().contains("/atom")
}

/// Classify an uncaught error
///
/// Process and spawn failures become dismissable errors with a readable
/// message. Anything else becomes a fatal notification unless dev mode
/// hides it or its stack has no traceable frame.
pub fn classify(error: &UncaughtError, settings: &Settings) -> UncaughtOutcome {
    if error.name.as_deref() == Some("BufferedProcessError") {
        return UncaughtOutcome::Notify {
            kind: NotificationType::Error,
            message: error.message.replacen(BUFFERED_PROCESS_PREFIX, "", 1),
            options: NotificationOptions::dismissable(),
        };
    }

    if error.code.as_deref() == Some("ENOENT") && !mentions_app(&error.message) {
        if let Some(program) = spawned_program(&error.message) {
            return UncaughtOutcome::Notify {
                kind: NotificationType::Error,
                message: format!(
                    "'{program}' could not be spawned.\nIs it installed and on your path?\nIf so please open an issue on the package spawning the process."
                ),
                options: NotificationOptions::dismissable(),
            };
        }
    }

    if !settings.reports_uncaught_errors() {
        return UncaughtOutcome::Ignore;
    }

    if let Some(stack) = error.stack.as_deref().filter(|s| !s.is_empty()) {
        if !has_traceable_frame(stack) {
            tracing::debug!("Dropping uncaught error without a traceable frame: {}", error.message);
            return UncaughtOutcome::Drop;
        }
    }

    UncaughtOutcome::Notify {
        kind: NotificationType::Fatal,
        message: error.message.clone(),
        options: NotificationOptions {
            detail: Some(format!("{}:{}", error.url, error.line)),
            stack: error.stack.clone(),
            dismissable: true,
            ..Default::default()
        },
    }
}
