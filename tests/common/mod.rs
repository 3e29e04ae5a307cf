//! Hand-written collaborators shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use editor_notifications::host::{
    Host, Issue, IssueTracker, LookupError, PackageInfo, PackageManifest, PackageRegistry,
    PublishedPackage, Repository, SystemInfo, VersionService, Workspace,
};
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

#[derive(Debug, Default)]
pub struct Packages {
    pub loaded: Vec<PackageInfo>,
    /// Installed but not loaded
    pub paths: HashMap<String, PathBuf>,
    pub bundled: HashMap<String, String>,
}

impl Packages {
    pub fn with_loaded(mut self, name: &str, path: impl Into<PathBuf>, version: &str, repo: Option<&str>) -> Self {
        self.loaded.push(PackageInfo {
            name: name.to_string(),
            path: path.into(),
            metadata: PackageManifest {
                name: name.to_string(),
                version: Some(version.to_string()),
                repository: repo.map(|r| Repository::Url(r.to_string())),
            },
        });
        self
    }
}

impl PackageRegistry for Packages {
    fn loaded_packages(&self) -> Vec<PackageInfo> {
        self.loaded.clone()
    }

    fn resolve_package_path(&self, name: &str) -> Option<PathBuf> {
        self.loaded
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.path.clone())
            .or_else(|| self.paths.get(name).cloned())
    }

    fn is_bundled(&self, name: &str) -> bool {
        self.bundled.contains_key(name)
    }

    fn version_shipped_with_app(&self, name: &str) -> Option<String> {
        self.bundled.get(name).cloned()
    }

    fn available_packages(&self) -> Vec<PackageInfo> {
        self.loaded.clone()
    }
}

/// Issue search answering from a fixed list
#[derive(Debug, Default)]
pub struct Issues {
    /// `None` makes every search fail
    pub results: Option<Vec<Issue>>,
    pub short_url: Option<String>,
    pub queries: Mutex<Vec<String>>,
}

#[async_trait]
impl IssueTracker for Issues {
    async fn search_issues(&self, query: &str) -> Result<Vec<Issue>, LookupError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results
            .clone()
            .ok_or_else(|| LookupError::Unavailable("search offline".to_string()))
    }

    async fn shorten_url(&self, _url: &str) -> Result<String, LookupError> {
        self.short_url
            .clone()
            .ok_or_else(|| LookupError::Unavailable("shortener offline".to_string()))
    }
}

#[derive(Debug, Default)]
pub struct Versions {
    pub app: Option<String>,
    pub packages: HashMap<String, String>,
}

#[async_trait]
impl VersionService for Versions {
    async fn latest_app_version(&self) -> Result<String, LookupError> {
        self.app
            .clone()
            .ok_or_else(|| LookupError::Unavailable("releases offline".to_string()))
    }

    async fn latest_package(&self, name: &str) -> Result<PublishedPackage, LookupError> {
        self.packages
            .get(name)
            .map(|latest| PublishedPackage {
                latest_version: latest.clone(),
                repository: None,
            })
            .ok_or_else(|| LookupError::NotFound(name.to_string()))
    }
}

/// Records every workspace action as a short string
#[derive(Debug, Default)]
pub struct Recorder {
    pub actions: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    fn push(&self, action: String) {
        self.actions.lock().unwrap().push(action);
    }
}

impl Workspace for Recorder {
    fn activate_active_pane(&self) {
        self.push("activate-pane".to_string());
    }

    fn dispatch(&self, command: &str) {
        self.push(format!("dispatch {command}"));
    }

    fn open(&self, uri: &str) {
        self.push(format!("open {uri}"));
    }

    fn open_external(&self, url: &str) {
        self.push(format!("open-external {url}"));
    }

    fn write_clipboard(&self, text: &str) {
        self.push(format!("clipboard {}", text.len()));
    }
}

pub fn system() -> SystemInfo {
    SystemInfo {
        app_version: "1.40.0".to_string(),
        arch: "x64".to_string(),
        runtime_version: "3.1.0".to_string(),
        os: Some("Ubuntu 20.04".to_string()),
        user: Some("me".to_string()),
        home: Some("/home/me".to_string()),
        app_home: Some("/home/me/.atom".to_string()),
    }
}

pub fn host(packages: Packages, issues: Issues, versions: Versions, workspace: Arc<Recorder>) -> Host {
    Host::new(
        Arc::new(packages),
        Arc::new(issues),
        Arc::new(versions),
        workspace,
        system(),
    )
}

pub fn offline_host(workspace: Arc<Recorder>) -> Host {
    host(Packages::default(), Issues::default(), Versions::default(), workspace)
}

pub fn issue(title: &str, state: editor_notifications::host::IssueState, url: &str) -> Issue {
    Issue {
        title: title.to_string(),
        state,
        html_url: url.to_string(),
    }
}
