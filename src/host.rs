//! Collaborators provided by the editor hosting the notification surface.

use async_trait::async_trait;
use editor_notifications_util::CommandLog;
use serde::Deserialize;
use std::{
    fmt,
    path::PathBuf,
    sync::{Arc, Mutex},
};

/// Failure of a network or disk lookup
#[derive(Debug)]
pub enum LookupError {
    /// The service could not be reached or answered with an error
    Unavailable(String),
    NotFound(String),
    Io(std::io::Error),
    /// The answer could not be understood
    Malformed(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Unavailable(msg) => write!(f, "service unavailable: {}", msg),
            LookupError::NotFound(what) => write!(f, "not found: {}", what),
            LookupError::Io(err) => write!(f, "I/O error: {}", err),
            LookupError::Malformed(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LookupError {
    fn from(err: std::io::Error) -> Self {
        LookupError::Io(err)
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Malformed(err.to_string())
    }
}

/// `repository` field of a package manifest
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Repository {
    Url(String),
    Object { url: Option<String> },
}

impl Repository {
    pub fn url(&self) -> Option<&str> {
        match self {
            Repository::Url(url) => Some(url.as_str()),
            Repository::Object { url } => url.as_deref(),
        }
        .filter(|url| !url.is_empty())
    }
}

/// The parts of a `package.json` the diagnostics read
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: String,
    pub version: Option<String>,
    pub repository: Option<Repository>,
}

/// A package as seen by the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    /// Install directory
    pub path: PathBuf,
    pub metadata: PackageManifest,
}

impl PackageInfo {
    pub fn version(&self) -> Option<&str> {
        self.metadata.version.as_deref()
    }
}

/// Packages known to the editor
pub trait PackageRegistry: Send + Sync {
    /// Packages currently loaded
    fn loaded_packages(&self) -> Vec<PackageInfo>;

    fn loaded_package(&self, name: &str) -> Option<PackageInfo> {
        self.loaded_packages().into_iter().find(|p| p.name == name)
    }

    /// Install directory of a package, loaded or not
    fn resolve_package_path(&self, name: &str) -> Option<PathBuf>;

    /// Whether the package ships with the editor
    fn is_bundled(&self, name: &str) -> bool;

    /// Version of a bundled package included with the running editor
    fn version_shipped_with_app(&self, name: &str) -> Option<String>;

    /// Every installed package, loaded or not
    fn available_packages(&self) -> Vec<PackageInfo>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// An issue returned by the issue search
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct Issue {
    pub title: String,
    pub state: IssueState,
    pub html_url: String,
}

/// Issue search and link shortening
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Free text search; the query carries its own `repo:` scope
    async fn search_issues(&self, query: &str) -> Result<Vec<Issue>, LookupError>;

    /// Shorten a long link so every platform can open it
    async fn shorten_url(&self, url: &str) -> Result<String, LookupError>;
}

/// Latest published package data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPackage {
    pub latest_version: String,
    pub repository: Option<String>,
}

/// Release information for packages and the application
#[async_trait]
pub trait VersionService: Send + Sync {
    async fn latest_app_version(&self) -> Result<String, LookupError>;

    async fn latest_package(&self, name: &str) -> Result<PublishedPackage, LookupError>;
}

/// Editor workspace actions triggered from cards
pub trait Workspace: Send + Sync {
    /// Give focus back to the active editor pane
    fn activate_active_pane(&self);

    fn dispatch(&self, command: &str);

    /// Open an editor URI
    fn open(&self, uri: &str);

    /// Open a web link outside the editor
    fn open_external(&self, url: &str);

    fn write_clipboard(&self, text: &str);
}

/// Facts about the running editor used in bug reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemInfo {
    pub app_version: String,
    pub arch: String,
    pub runtime_version: String,
    /// Fixed OS description; probed from the system when unset
    pub os: Option<String>,
    pub user: Option<String>,
    pub home: Option<String>,
    /// Editor configuration directory
    pub app_home: Option<String>,
}

impl SystemInfo {
    /// Read what the environment knows about the current user
    pub fn from_env(app_version: &str, runtime_version: &str) -> Self {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok();
        Self {
            app_version: app_version.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            runtime_version: runtime_version.to_string(),
            os: None,
            user: std::env::var("USER").or_else(|_| std::env::var("USERNAME")).ok(),
            app_home: std::env::var("ATOM_HOME")
                .ok()
                .or_else(|| home.as_ref().map(|h| format!("{h}/.atom"))),
            home,
        }
    }
}

/// Everything the session needs from its host
#[derive(Clone)]
pub struct Host {
    pub packages: Arc<dyn PackageRegistry>,
    pub issues: Arc<dyn IssueTracker>,
    pub versions: Arc<dyn VersionService>,
    pub workspace: Arc<dyn Workspace>,
    pub system: SystemInfo,
    pub commands: Arc<Mutex<CommandLog>>,
}

impl Host {
    pub fn new(
        packages: Arc<dyn PackageRegistry>,
        issues: Arc<dyn IssueTracker>,
        versions: Arc<dyn VersionService>,
        workspace: Arc<dyn Workspace>,
        system: SystemInfo,
    ) -> Self {
        Self {
            packages,
            issues,
            versions,
            workspace,
            system,
            commands: Arc::new(Mutex::new(CommandLog::new())),
        }
    }

    /// Text of the recent command log for a bug report
    pub fn command_text(&self, now: std::time::SystemTime) -> String {
        match self.commands.lock() {
            Ok(log) => log.text(now),
            Err(poisoned) => poisoned.into_inner().text(now),
        }
    }

    pub fn record_command(&self, name: &str, target: &str) {
        match self.commands.lock() {
            Ok(mut log) => log.record(name, target),
            Err(poisoned) => poisoned.into_inner().record(name, target),
        }
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").field("system", &self.system).finish_non_exhaustive()
    }
}
