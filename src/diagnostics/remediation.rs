use super::versions::{AppVersionCheck, PackageVersionCheck};
use crate::host::{Issue, IssueState};
use std::path::PathBuf;

/// First open and first closed issue whose title contains the search title
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimilarIssues {
    pub open: Option<Issue>,
    pub closed: Option<Issue>,
}

impl SimilarIssues {
    /// Keep the first match of each state; `None` when nothing matched
    pub fn from_results(issues: Vec<Issue>, title: &str) -> Option<Self> {
        let mut similar = SimilarIssues::default();
        for issue in issues {
            if !issue.title.contains(title) {
                continue;
            }
            let slot = match issue.state {
                IssueState::Open => &mut similar.open,
                IssueState::Closed => &mut similar.closed,
            };
            if slot.is_none() {
                *slot = Some(issue);
            }
            if similar.open.is_some() && similar.closed.is_some() {
                break;
            }
        }
        (similar.open.is_some() || similar.closed.is_some()).then_some(similar)
    }

    /// The issue to link, open before closed
    pub fn preferred(&self) -> Option<&Issue> {
        self.open.as_ref().or(self.closed.as_ref())
    }
}

/// What a fatal card suggests to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remediation {
    /// The error is already reported
    ViewIssue { url: String },
    /// A newer version of the package is published
    UpdatePackage {
        package: String,
        installed: String,
        latest: String,
    },
    /// An outdated local install shadows a package bundled with the editor
    ShadowedCorePackage {
        package: String,
        installed: String,
        shipped: String,
        /// Set when the local install is a link that can be removed
        unlink_path: Option<PathBuf>,
    },
    /// The editor itself is outdated
    UpdateApp { installed: String, latest: String },
    CreateIssue,
}

/// Pick the remediation, first matching rule wins
///
/// `unlink_path` is only consulted for a shadowed core package.
pub fn decide(
    similar: Option<&SimilarIssues>,
    app: Option<&AppVersionCheck>,
    package: Option<&PackageVersionCheck>,
    package_name: Option<&str>,
    unlink_path: Option<PathBuf>,
) -> Remediation {
    if let Some(issue) = similar.and_then(SimilarIssues::preferred) {
        return Remediation::ViewIssue {
            url: issue.html_url.clone(),
        };
    }

    if let Some(check) = package.filter(|c| !c.up_to_date) {
        let package = package_name.unwrap_or_default().to_string();
        if !check.is_core {
            return Remediation::UpdatePackage {
                package,
                installed: check.installed_version.clone(),
                latest: check.latest_version.clone(),
            };
        }
        return Remediation::ShadowedCorePackage {
            package,
            installed: check.installed_version.clone(),
            shipped: check.version_shipped_with_app.clone().unwrap_or_default(),
            unlink_path,
        };
    }

    if let Some(check) = app.filter(|c| !c.up_to_date) {
        return Remediation::UpdateApp {
            installed: check.installed_version.clone(),
            latest: check.latest_version.clone(),
        };
    }

    Remediation::CreateIssue
}
