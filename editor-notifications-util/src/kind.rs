use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Informational message (default)
    #[default]
    Info,
    /// An operation completed
    Success,
    Warning,
    Error,
    /// Uncaught runtime error, triggers the diagnostic pipeline
    Fatal,
}

impl NotificationType {
    /// Every type, in the order the log header shows its toggles
    pub const ALL: [NotificationType; 5] = [
        NotificationType::Fatal,
        NotificationType::Error,
        NotificationType::Warning,
        NotificationType::Info,
        NotificationType::Success,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::Info => "info",
            NotificationType::Success => "success",
            NotificationType::Warning => "warning",
            NotificationType::Error => "error",
            NotificationType::Fatal => "fatal",
        }
    }

    /// Error and fatal notifications
    pub fn is_error(self) -> bool {
        matches!(self, NotificationType::Error | NotificationType::Fatal)
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a notification type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl fmt::Display for UnknownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown notification type '{}'", self.0)
    }
}

impl std::error::Error for UnknownType {}

impl FromStr for NotificationType {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(NotificationType::Info),
            "success" => Ok(NotificationType::Success),
            "warning" => Ok(NotificationType::Warning),
            "error" => Ok(NotificationType::Error),
            "fatal" => Ok(NotificationType::Fatal),
            other => Err(UnknownType(other.to_string())),
        }
    }
}
