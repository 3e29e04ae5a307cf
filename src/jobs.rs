//! Background work started by fatal cards.
//!
//! The session never awaits; it queues jobs and the host runs them on its
//! executor. Results are memoized inside [`FatalIssue`], so a finished job
//! only tells the host to draw again.

use crate::diagnostics::FatalIssue;
use crate::rendering::cards::has_issue_button;
use editor_notifications_util::NotificationId;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Job {
    /// Attribute the error and, when `check` is set, look up issues and versions
    Inspect { issue: Arc<FatalIssue>, check: bool },
    /// Open the pre-filled issue form in the browser
    OpenIssueUrl { issue: Arc<FatalIssue> },
    /// Put the bug report on the clipboard
    CopyReport { issue: Arc<FatalIssue> },
}

/// Finished job, handed back to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobDone {
    pub notification: NotificationId,
}

impl Job {
    pub fn notification(&self) -> NotificationId {
        self.issue().notification().id
    }

    fn issue(&self) -> &Arc<FatalIssue> {
        match self {
            Job::Inspect { issue, .. } | Job::OpenIssueUrl { issue } | Job::CopyReport { issue } => issue,
        }
    }

    pub async fn run(self) -> JobDone {
        let notification = self.notification();
        match self {
            Job::Inspect { issue, check } => {
                let attribution = issue.attribution().await;
                tracing::debug!("Notification {} attributed to {:?}", notification, attribution.package_name);
                if check && has_issue_button(attribution) {
                    issue.diagnose().await;
                }
            }
            Job::OpenIssueUrl { issue } => match issue.issue_url_for_system().await {
                Some(url) => issue.host().workspace.open_external(&url),
                None => tracing::warn!("No issue link for notification {}", notification),
            },
            Job::CopyReport { issue } => {
                let body = issue.issue_body().await;
                issue.host().workspace.write_clipboard(body);
            }
        }
        JobDone { notification }
    }
}
