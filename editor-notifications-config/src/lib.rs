use cosmic_config::{Config, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};

pub const ID: &str = "io.atom.NotificationsPlus";

/// Smallest accepted default timeout in milliseconds
pub const MIN_TIMEOUT_MS: u32 = 1000;

/// Which notifications may open a popup card
///
/// Unrecognized values fall back to `All`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PopupPolicy {
    /// Only error and fatal notifications
    Errors,
    /// Only notifications that wait for the user
    Dismissable,
    None,
    #[default]
    #[serde(other)]
    All,
}

/// Whether fatal errors look up reported issues on their own
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatalIssueCheck {
    Yes,
    No,
    /// Follow the editor's telemetry consent
    #[default]
    #[serde(other)]
    Telemetry,
}

/// Editor wide telemetry consent, owned by the host
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryConsent {
    Limited,
    No,
    #[default]
    #[serde(other)]
    Undecided,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq, CosmicConfigEntry)]
#[version = 1]
pub struct NotificationsConfig {
    /// Show notifications for uncaught exceptions even in dev mode.
    #[serde(default)]
    pub show_errors_in_dev_mode: bool,
    /// Popup admission policy. All notifications still go to the log.
    #[serde(default)]
    pub allow_popups: PopupPolicy,
    /// Autohide delay in milliseconds for non-dismissable notifications (default: 5000, minimum: 1000)
    #[serde(default = "default_timeout")]
    pub default_timeout: u32,
    /// Autohide dismissable notifications as well.
    #[serde(default)]
    pub always_dismiss: bool,
    /// Automatically check for reported issues on fatal errors.
    #[serde(default)]
    pub check_fatal_issues: FatalIssueCheck,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            show_errors_in_dev_mode: false,
            allow_popups: PopupPolicy::default(),
            default_timeout: default_timeout(),
            always_dismiss: false,
            check_fatal_issues: FatalIssueCheck::default(),
        }
    }
}

impl NotificationsConfig {
    /// Default timeout with the minimum applied
    pub fn timeout_ms(&self) -> u32 {
        self.default_timeout.max(MIN_TIMEOUT_MS)
    }

    /// Load the stored entry, falling back to defaults for anything unreadable
    ///
    /// The returned helper is `None` when the config store is unavailable.
    pub fn load() -> (Option<Config>, Self) {
        let helper = Config::new(ID, Self::VERSION).ok();

        let config = helper
            .as_ref()
            .map(|helper| {
                Self::get_entry(helper).unwrap_or_else(|(errors, config)| {
                    for err in errors {
                        if err.is_err() {
                            tracing::error!("{:?}", err);
                        }
                    }
                    config
                })
            })
            .unwrap_or_default();

        (helper, config)
    }
}

// Default value helpers for serde
const fn default_timeout() -> u32 {
    5000
}
