//! Collaborators used when the surface runs as a standalone process.
//!
//! Packages come from the editor's home directory, network lookups are
//! disabled and workspace actions are forwarded to the driving process.

use crate::{
    diagnostics::attribution::read_manifest,
    host::{
        Issue, IssueTracker, LookupError, PackageInfo, PackageRegistry, PublishedPackage,
        VersionService, Workspace,
    },
};
use async_trait::async_trait;
use editor_notifications_util::{is_safe_url, open_link};
use serde::Serialize;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use tokio::sync::mpsc::UnboundedSender;

/// Packages installed under the editor home
#[derive(Debug, Clone, Default)]
pub struct LocalPackages {
    packages: Vec<PackageInfo>,
    /// Bundled package name to the version shipped with the editor
    bundled: HashMap<String, String>,
}

impl LocalPackages {
    /// Read every `packages/*/package.json` and `dev/packages/*/package.json`
    pub async fn scan(app_home: &Path) -> Self {
        let mut packages = Vec::new();
        for dir in [app_home.join("packages"), app_home.join("dev").join("packages")] {
            packages.extend(scan_dir(&dir).await);
        }
        tracing::debug!("Found {} packages under {}", packages.len(), app_home.display());
        Self {
            packages,
            bundled: HashMap::new(),
        }
    }

    /// Mark a package as shipped with the editor at `version`
    pub fn with_bundled(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.bundled.insert(name.into(), version.into());
        self
    }
}

async fn scan_dir(dir: &Path) -> Vec<PackageInfo> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!("Skipping {}: {}", dir.display(), err);
            return Vec::new();
        }
    };

    let mut packages = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(err) => {
                tracing::warn!("Failed to list {}: {}", dir.display(), err);
                break;
            }
        };
        let path = entry.path();
        let Some(mut metadata) = read_manifest(&path).await else {
            continue;
        };
        if metadata.name.is_empty() {
            metadata.name = entry.file_name().to_string_lossy().into_owned();
        }
        packages.push(PackageInfo {
            name: metadata.name.clone(),
            path,
            metadata,
        });
    }
    packages
}

impl PackageRegistry for LocalPackages {
    fn loaded_packages(&self) -> Vec<PackageInfo> {
        self.packages.clone()
    }

    fn resolve_package_path(&self, name: &str) -> Option<PathBuf> {
        self.packages.iter().find(|p| p.name == name).map(|p| p.path.clone())
    }

    fn is_bundled(&self, name: &str) -> bool {
        self.bundled.contains_key(name)
    }

    fn version_shipped_with_app(&self, name: &str) -> Option<String> {
        self.bundled.get(name).cloned()
    }

    fn available_packages(&self) -> Vec<PackageInfo> {
        self.packages.clone()
    }
}

/// Issue search and version lookups that always fail
///
/// Every diagnosis made with it falls through to "create an issue".
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

#[async_trait]
impl IssueTracker for Offline {
    async fn search_issues(&self, _query: &str) -> Result<Vec<Issue>, LookupError> {
        Err(LookupError::Unavailable("issue search is disabled".to_string()))
    }

    async fn shorten_url(&self, _url: &str) -> Result<String, LookupError> {
        Err(LookupError::Unavailable("link shortening is disabled".to_string()))
    }
}

#[async_trait]
impl VersionService for Offline {
    async fn latest_app_version(&self) -> Result<String, LookupError> {
        Err(LookupError::Unavailable("release lookup is disabled".to_string()))
    }

    async fn latest_package(&self, name: &str) -> Result<PublishedPackage, LookupError> {
        Err(LookupError::Unavailable(format!("package lookup for {name} is disabled")))
    }
}

/// Workspace action for the driving process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum WorkspaceEvent {
    ActivatePane,
    Dispatch { command: String },
    Open { uri: String },
    OpenExternal { url: String },
    WriteClipboard { text: String },
}

/// Forwards workspace actions over a channel
///
/// Web links are also opened in the default browser.
#[derive(Debug, Clone)]
pub struct ShellWorkspace {
    tx: UnboundedSender<WorkspaceEvent>,
}

impl ShellWorkspace {
    pub fn new(tx: UnboundedSender<WorkspaceEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: WorkspaceEvent) {
        if let Err(err) = self.tx.send(event) {
            tracing::error!("Workspace channel closed, dropping {:?}", err.0);
        }
    }
}

impl Workspace for ShellWorkspace {
    fn activate_active_pane(&self) {
        self.send(WorkspaceEvent::ActivatePane);
    }

    fn dispatch(&self, command: &str) {
        self.send(WorkspaceEvent::Dispatch {
            command: command.to_string(),
        });
    }

    fn open(&self, uri: &str) {
        self.send(WorkspaceEvent::Open { uri: uri.to_string() });
    }

    fn open_external(&self, url: &str) {
        if !is_safe_url(url) {
            tracing::warn!("Blocked unsafe URL: {}", url);
            return;
        }
        if let Err(e) = open_link(url) {
            tracing::error!("Failed to open link {}: {}", url, e);
        }
        self.send(WorkspaceEvent::OpenExternal { url: url.to_string() });
    }

    fn write_clipboard(&self, text: &str) {
        self.send(WorkspaceEvent::WriteClipboard { text: text.to_string() });
    }
}
