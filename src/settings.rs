use editor_notifications_config::{
    FatalIssueCheck, NotificationsConfig, PopupPolicy, TelemetryConsent,
};
use editor_notifications_util::Notification;
use std::time::Duration;

/// Runtime settings, resolved once from the stored config and the host state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub popup_policy: PopupPolicy,
    /// Autohide delay for cards without their own timeout
    pub visibility_duration: Duration,
    pub always_dismiss: bool,
    pub fatal_issue_check: FatalIssueCheck,
    /// Read from the host, never written here
    pub telemetry_consent: TelemetryConsent,
    pub show_errors_in_dev_mode: bool,
    /// Whether the editor runs in dev mode
    pub dev_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(&NotificationsConfig::default(), TelemetryConsent::default(), false)
    }
}

impl Settings {
    pub fn new(config: &NotificationsConfig, telemetry_consent: TelemetryConsent, dev_mode: bool) -> Self {
        Self {
            popup_policy: config.allow_popups,
            visibility_duration: Duration::from_millis(u64::from(config.timeout_ms())),
            always_dismiss: config.always_dismiss,
            fatal_issue_check: config.check_fatal_issues,
            telemetry_consent,
            show_errors_in_dev_mode: config.show_errors_in_dev_mode,
            dev_mode,
        }
    }

    /// How long a card for `notification` stays before autohiding
    pub fn visibility_for(&self, notification: &Notification) -> Duration {
        notification
            .options
            .timeout()
            .unwrap_or(self.visibility_duration)
    }

    /// Whether a new card for `notification` arms the autohide timer
    pub fn autohides(&self, notification: &Notification) -> bool {
        !notification.is_dismissable() || self.always_dismiss
    }

    /// Whether fatal cards look up reported issues without being asked
    pub fn checks_issues_automatically(&self) -> bool {
        match self.fatal_issue_check {
            FatalIssueCheck::Yes => true,
            FatalIssueCheck::No => false,
            FatalIssueCheck::Telemetry => self.telemetry_consent != TelemetryConsent::No,
        }
    }

    /// Whether uncaught errors become fatal notifications
    pub fn reports_uncaught_errors(&self) -> bool {
        !self.dev_mode || self.show_errors_in_dev_mode
    }
}
