// Constants module for editor-notifications
// Centralizes magic numbers and command names

use std::time::Duration;

// ============================================================================
// Ingestion Constants
// ============================================================================

/// Identical notifications closer together than this are dropped
pub const DUPLICATE_WINDOW: Duration = Duration::from_millis(500);

// ============================================================================
// Card Lifecycle Constants
// ============================================================================

/// Length of the removal animation; keep in sync with the stylesheet
pub const ANIMATION_DURATION: Duration = Duration::from_millis(360);

/// Initial capacity for the popup card vector
pub(crate) const INITIAL_CARDS_CAPACITY: usize = 16;

/// Removed cards kept around so log clicks can bring them back
pub(crate) const MAX_DETACHED_CARDS: usize = 500;

// ============================================================================
// Log Constants
// ============================================================================

/// Interval between relative timestamp refreshes of a log entry
pub const TIMESTAMP_REFRESH: Duration = Duration::from_secs(60);

/// Entries younger than this read "just now"
pub(crate) const JUST_NOW_THRESHOLD: Duration = Duration::from_secs(30);

/// Workspace URI of the log pane
pub const LOG_URI: &str = "atom://notifications-plus/log";

/// Animation whose end clears the counter highlight
pub const NEW_NOTIFICATION_ANIMATION: &str = "new-notification";

// ============================================================================
// Command Names
// ============================================================================

pub const TOGGLE_LOG_COMMAND: &str = "notifications-plus:toggle-log";
pub const CLEAR_LOG_COMMAND: &str = "notifications-plus:clear-log";
pub const DISMISS_ALL_COMMAND: &str = "notifications-plus:dismiss-all";
pub const CANCEL_COMMAND: &str = "core:cancel";

/// Dispatched by the "Check for package updates" remediation
pub const CHECK_PACKAGE_UPDATES_COMMAND: &str = "settings-view:check-for-package-updates";
