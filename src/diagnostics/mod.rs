//! Bug report workflow for fatal notifications.
//!
//! Each fatal notification gets one [`FatalIssue`]. Everything it looks up is
//! memoized, so the card, the log and the report buttons can ask again
//! without repeating network or disk work.

pub mod attribution;
pub mod remediation;
pub mod system;
pub mod versions;

pub use attribution::Attribution;
pub use remediation::{Remediation, SimilarIssues};
pub use versions::{AppVersionCheck, PackageVersionCheck};

use crate::host::Host;
use editor_notifications_util::{
    IssueReport, Notification, ThrownFrom, github_repo_slug, issue_title, issue_url,
    normalize_stack_paths,
};
use std::{path::PathBuf, sync::Arc, time::SystemTime};
use tokio::sync::OnceCell;

/// Everything learned about a fatal error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnosis {
    pub similar: Option<SimilarIssues>,
    pub app: Option<AppVersionCheck>,
    pub package: Option<PackageVersionCheck>,
    pub remediation: Remediation,
}

pub struct FatalIssue {
    notification: Arc<Notification>,
    host: Host,
    attribution: OnceCell<Attribution>,
    diagnosis: OnceCell<Diagnosis>,
    body: OnceCell<String>,
}

impl std::fmt::Debug for FatalIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FatalIssue")
            .field("notification", &self.notification.id)
            .field("attribution", &self.attribution.get())
            .field("diagnosis", &self.diagnosis.get())
            .finish_non_exhaustive()
    }
}

impl FatalIssue {
    pub fn new(notification: Arc<Notification>, host: Host) -> Self {
        Self {
            notification,
            host,
            attribution: OnceCell::new(),
            diagnosis: OnceCell::new(),
            body: OnceCell::new(),
        }
    }

    pub fn notification(&self) -> &Arc<Notification> {
        &self.notification
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub async fn attribution(&self) -> &Attribution {
        self.attribution
            .get_or_init(|| attribution::attribute(&self.notification, self.host.packages.as_ref()))
            .await
    }

    /// Attribution if it already finished
    pub fn cached_attribution(&self) -> Option<&Attribution> {
        self.attribution.get()
    }

    /// Diagnosis if it already finished
    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        self.diagnosis.get()
    }

    pub fn issue_title(&self) -> String {
        issue_title(
            &self.notification.message,
            self.host.system.app_home.as_deref(),
            self.host.system.home.as_deref(),
        )
    }

    /// Search the owning repository for an issue with the same title
    ///
    /// Search failures count as no match.
    pub async fn find_similar_issues(&self) -> Option<SimilarIssues> {
        let attribution = self.attribution().await;
        let title = self.issue_title();
        let query = format!("{} repo:{}", title, github_repo_slug(attribution.repo_url.as_deref()));
        match self.host.issues.search_issues(&query).await {
            Ok(issues) => SimilarIssues::from_results(issues, &title),
            Err(err) => {
                tracing::warn!("Issue search failed for notification {}: {}", self.notification.id, err);
                None
            }
        }
    }

    /// Run every lookup once and pick a remediation
    ///
    /// The issue search and both version checks run concurrently; a failed
    /// lookup only removes its own input from the decision.
    pub async fn diagnose(&self) -> &Diagnosis {
        self.diagnosis
            .get_or_init(|| async {
                let package_name = self.attribution().await.package_name.clone();
                let (similar, app, package) = tokio::join!(
                    self.find_similar_issues(),
                    versions::app_version_check(&self.host),
                    async {
                        match &package_name {
                            Some(name) => versions::package_version_check(&self.host, name).await,
                            None => None,
                        }
                    },
                );

                let shadowed = package.as_ref().is_some_and(|c| c.is_core && !c.up_to_date);
                let unlink_path = match (&package_name, shadowed) {
                    (Some(name), true) => self.linked_install(name).await,
                    _ => None,
                };

                let remediation = remediation::decide(
                    similar.as_ref(),
                    app.as_ref(),
                    package.as_ref(),
                    package_name.as_deref(),
                    unlink_path,
                );
                tracing::debug!(
                    "Notification {} diagnosed: {:?}",
                    self.notification.id,
                    remediation
                );
                Diagnosis {
                    similar,
                    app,
                    package,
                    remediation,
                }
            })
            .await
    }

    /// Install directory of a loaded package when it is a symlink
    async fn linked_install(&self, package_name: &str) -> Option<PathBuf> {
        let package = self.host.packages.loaded_package(package_name)?;
        match tokio::fs::symlink_metadata(&package.path).await {
            Ok(meta) if meta.file_type().is_symlink() => Some(package.path),
            Ok(_) => None,
            Err(err) => {
                tracing::debug!("Failed to stat {}: {}", package.path.display(), err);
                None
            }
        }
    }

    /// Markdown body of the bug report, built once
    pub async fn issue_body(&self) -> &str {
        self.body
            .get_or_init(|| async {
                let attribution = self.attribution().await.clone();
                let os = match &self.host.system.os {
                    Some(os) => os.clone(),
                    None => system::os_version().await,
                };
                let non_core_packages = system::non_core_packages(self.host.packages.as_ref());
                let version = attribution
                    .package_name
                    .as_deref()
                    .and_then(|name| self.host.packages.loaded_package(name))
                    .and_then(|p| p.metadata.version);
                let thrown_from = match (attribution.package_name, attribution.repo_url) {
                    (Some(name), Some(repo_url)) => ThrownFrom::LinkedPackage {
                        name,
                        repo_url,
                        version,
                    },
                    (Some(name), None) => ThrownFrom::Package { name, version },
                    (None, _) => ThrownFrom::Core,
                };
                let home = self.host.system.home.as_deref();
                let report = IssueReport {
                    app_version: self.host.system.app_version.clone(),
                    arch: self.host.system.arch.clone(),
                    runtime_version: self.host.system.runtime_version.clone(),
                    os,
                    thrown_from,
                    root_user: self.host.system.user.as_deref() == Some("root"),
                    message: self.notification.message.clone(),
                    detail: self.notification.detail().map(str::to_string),
                    stack: self.notification.stack().map(|s| normalize_stack_paths(s, home)),
                    commands: self.host.command_text(SystemTime::now()),
                    non_core_packages,
                };
                report.body()
            })
            .await
    }

    /// Link to a pre-filled new issue on the owning repository
    pub async fn issue_url(&self) -> Option<String> {
        let body = self.issue_body().await;
        let repo_url = self.attribution().await.repo_url.clone();
        match issue_url(repo_url.as_deref(), &self.issue_title(), body) {
            Ok(url) => Some(url),
            Err(err) => {
                tracing::warn!("Invalid repository link {:?}: {}", repo_url, err);
                None
            }
        }
    }

    /// Issue link short enough for every platform to open
    ///
    /// The full link is returned when shortening fails.
    pub async fn issue_url_for_system(&self) -> Option<String> {
        let url = self.issue_url().await?;
        match self.host.issues.shorten_url(&url).await {
            Ok(short) if !short.trim().is_empty() => Some(short.trim().to_string()),
            Ok(_) => Some(url),
            Err(err) => {
                tracing::warn!("Failed to shorten issue link: {}", err);
                Some(url)
            }
        }
    }
}
