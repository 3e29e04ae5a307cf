use crate::{
    diagnostics::{Attribution, FatalIssue, Remediation},
    state::{Card, CardState},
};
use editor_notifications_util::{
    Notification, NotificationId, NotificationType, button_class, repository::CORE_REPO_SLUG,
    release_url,
};
use serde::Serialize;

/// Label of the stack toggle for the current stack visibility
pub fn stack_toggle_label(expanded: bool) -> &'static str {
    if expanded {
        "Hide Stack Trace"
    } else {
        "Show Stack Trace"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    pub text: String,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ButtonView {
    fn new(text: impl Into<String>, classes: &[&str]) -> Self {
        Self {
            text: text.into(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            href: None,
            title: None,
        }
    }

    fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackView {
    pub lines: Vec<String>,
    pub expanded: bool,
    pub toggle_label: &'static str,
}

/// Bug report section of a fatal card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FatalView {
    /// Markdown
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_button: Option<ButtonView>,
    pub copy_report: ButtonView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_settings: Option<ButtonView>,
}

/// Everything needed to draw a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: NotificationId,
    pub kind: NotificationType,
    pub state: CardState,
    pub classes: Vec<String>,
    /// Markdown
    pub message: String,
    pub detail: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<StackView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub buttons: Vec<ButtonView>,
    pub close_all: ButtonView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal: Option<FatalView>,
}

/// Turns a card into its view
pub trait Render: Sync {
    fn render(&self, card: &Card) -> CardView;
}

/// Cards of every type but fatal
pub struct StandardRenderer;

/// Fatal cards: the standard card plus the bug report section
pub struct FatalRenderer;

/// Renderer for a notification type
pub fn renderer_for(kind: NotificationType) -> &'static dyn Render {
    match kind {
        NotificationType::Fatal => &FatalRenderer,
        _ => &StandardRenderer,
    }
}

fn card_classes(card: &Card) -> Vec<String> {
    let n = card.notification();
    let mut classes = vec![
        n.kind.as_str().to_string(),
        "icon".to_string(),
        format!("icon-{}", n.icon()),
        "native-key-bindings".to_string(),
    ];
    let flags = [
        (n.detail().is_some(), "has-detail"),
        (n.is_dismissable(), "has-close"),
        (n.detail().is_some() && n.stack().is_some(), "has-stack"),
        (n.description().is_some(), "has-description"),
        (!n.buttons().is_empty(), "has-buttons"),
        (card.is_removing(), "remove"),
        (card.is_hovered(), "mouse-over"),
    ];
    classes.extend(flags.iter().filter(|(on, _)| *on).map(|(_, c)| c.to_string()));
    classes
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// Buttons supplied with the notification
pub fn notification_buttons(n: &Notification) -> Vec<ButtonView> {
    let class = button_class(n.kind);
    n.buttons()
        .iter()
        .map(|button| {
            let mut classes = vec!["btn".to_string(), class.to_string()];
            classes.extend(button.classes().map(str::to_string));
            ButtonView {
                text: button.text.clone(),
                classes,
                href: None,
                title: None,
            }
        })
        .collect()
}

impl Render for StandardRenderer {
    fn render(&self, card: &Card) -> CardView {
        let n = card.notification();
        let stack = match (n.detail(), n.stack()) {
            (Some(_), Some(stack)) => Some(StackView {
                lines: split_lines(stack),
                expanded: card.stack_expanded(),
                toggle_label: stack_toggle_label(card.stack_expanded()),
            }),
            _ => None,
        };

        CardView {
            id: n.id,
            kind: n.kind,
            state: card.state(),
            classes: card_classes(card),
            message: n.message.clone(),
            detail: n.detail().map(split_lines).unwrap_or_default(),
            stack,
            description: n.description().map(str::to_string),
            buttons: notification_buttons(n),
            close_all: ButtonView::new("Close All", &["close-all", "btn", button_class(n.kind)]),
            fatal: None,
        }
    }
}

impl Render for FatalRenderer {
    fn render(&self, card: &Card) -> CardView {
        let mut view = StandardRenderer.render(card);
        view.fatal = card
            .fatal()
            .and_then(|issue| fatal_view(issue, card.issue_check_requested()));
        view
    }
}

/// Sentence naming where the error came from
pub fn thrown_from_text(attribution: &Attribution) -> String {
    match (&attribution.package_name, &attribution.repo_url) {
        (Some(name), Some(repo)) => format!("The error was thrown from the [{name} package]({repo}). "),
        (Some(name), None) => format!("The error was thrown from the {name} package. "),
        (None, _) => "This is likely a bug in Atom. ".to_string(),
    }
}

/// Whether the card can offer an issue button at all
///
/// Packages without a repository have nowhere to file the issue.
pub fn has_issue_button(attribution: &Attribution) -> bool {
    attribution.package_name.is_none() || attribution.repo_url.is_some()
}

fn create_issue_label(attribution: &Attribution) -> String {
    match (&attribution.package_name, &attribution.repo_url) {
        (Some(name), Some(_)) => format!("Create issue on the {name} package"),
        _ => format!("Create issue on {CORE_REPO_SLUG}"),
    }
}

/// Text appended to the description once a remediation is known
pub fn remediation_text(remediation: &Remediation) -> String {
    match remediation {
        Remediation::ViewIssue { .. } => " This issue has already been reported.".to_string(),
        Remediation::UpdatePackage {
            package,
            installed,
            latest,
        } => format!(
            "`{package}` is out of date: {installed} installed;\n{latest} latest.\nUpgrading to the latest version may fix this issue."
        ),
        Remediation::ShadowedCorePackage {
            package,
            installed,
            shipped,
            unlink_path,
        } => {
            let mut text = format!(
                "\n\nLocally installed core Atom package `{package}` is out of date: {installed} installed locally;\n{shipped} included with the version of Atom you're running.\nRemoving the locally installed version may fix this issue."
            );
            if let Some(path) = unlink_path {
                text.push_str(&format!("\n\nUse: `apm unlink {}`", path.display()));
            }
            text
        }
        Remediation::UpdateApp { installed, latest } => format!(
            "Atom is out of date: {installed} installed;\n{latest} latest.\nUpgrading to the [latest version]({}) may fix this issue.",
            release_url(latest)
        ),
        Remediation::CreateIssue => {
            " You can help by creating an issue. Please explain what actions triggered this error.".to_string()
        }
    }
}

fn issue_button(issue: &FatalIssue, attribution: &Attribution, check_requested: bool) -> Option<ButtonView> {
    let classes = ["btn-issue", "btn", "btn-error"];
    let Some(diagnosis) = issue.diagnosis() else {
        let label = if check_requested {
            create_issue_label(attribution)
        } else {
            "Check reported issues".to_string()
        };
        return Some(ButtonView::new(label, &classes));
    };

    match &diagnosis.remediation {
        Remediation::ViewIssue { url } => Some(ButtonView {
            href: Some(url.clone()),
            ..ButtonView::new("View Issue", &classes)
        }),
        Remediation::UpdatePackage { .. } => Some(ButtonView::new("Check for package updates", &classes)),
        Remediation::ShadowedCorePackage { .. } | Remediation::UpdateApp { .. } => None,
        Remediation::CreateIssue => Some(ButtonView::new(create_issue_label(attribution), &classes)),
    }
}

/// Bug report section, `None` until the attribution is known
pub fn fatal_view(issue: &FatalIssue, check_requested: bool) -> Option<FatalView> {
    let attribution = issue.cached_attribution()?;
    let mut description = thrown_from_text(attribution);

    let issue_button = if has_issue_button(attribution) {
        if let Some(diagnosis) = issue.diagnosis() {
            description.push_str(&remediation_text(&diagnosis.remediation));
        }
        issue_button(issue, attribution, check_requested)
    } else {
        None
    };

    let open_settings = attribution.package_name.as_ref().map(|_| {
        ButtonView::new("", &["btn-open-settings", "icon", "icon-gear"]).with_title("Open package settings")
    });

    Some(FatalView {
        description,
        issue_button,
        copy_report: ButtonView::new("", &["btn-copy-report", "icon", "icon-clippy"])
            .with_title("Copy error report to clipboard"),
        open_settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_notifications_util::{Button, NotificationOptions};
    use std::{path::PathBuf, sync::Arc, time::Duration};

    fn card(kind: NotificationType, options: NotificationOptions) -> Card {
        let n = Notification::new(5, kind, "Something *happened*", options);
        Card::new(Arc::new(n), Duration::from_secs(5), None)
    }

    #[test]
    fn test_standard_classes() {
        let c = card(
            NotificationType::Warning,
            NotificationOptions {
                detail: Some("line one\nline two".to_string()),
                stack: Some("Error\n    at x (/a.js:1:1)".to_string()),
                description: Some("More".to_string()),
                buttons: vec![Button::new("Retry").with_class("retry primary")],
                dismissable: true,
                ..Default::default()
            },
        );
        let view = renderer_for(NotificationType::Warning).render(&c);
        for class in ["warning", "icon-alert", "has-detail", "has-close", "has-stack", "has-description", "has-buttons"] {
            assert!(view.classes.contains(&class.to_string()), "missing {class}");
        }
        assert!(!view.classes.contains(&"remove".to_string()));
        assert_eq!(view.detail, vec!["line one", "line two"]);
        assert_eq!(view.buttons[0].classes, vec!["btn", "btn-warning", "retry", "primary"]);
        assert_eq!(view.close_all.classes, vec!["close-all", "btn", "btn-warning"]);
        assert!(view.fatal.is_none());
    }

    #[test]
    fn test_stack_needs_detail() {
        let c = card(
            NotificationType::Error,
            NotificationOptions {
                stack: Some("Error\n    at x (/a.js:1:1)".to_string()),
                ..Default::default()
            },
        );
        let view = StandardRenderer.render(&c);
        assert!(view.stack.is_none());
        assert!(!view.classes.contains(&"has-stack".to_string()));
    }

    #[test]
    fn test_stack_toggle_label() {
        let mut c = card(
            NotificationType::Error,
            NotificationOptions {
                detail: Some("d".to_string()),
                stack: Some("s".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(StandardRenderer.render(&c).stack.map(|s| s.toggle_label), Some("Show Stack Trace"));
        c.toggle_stack();
        assert_eq!(StandardRenderer.render(&c).stack.map(|s| s.toggle_label), Some("Hide Stack Trace"));
    }

    #[test]
    fn test_fatal_close_all_uses_error_class() {
        let c = card(NotificationType::Fatal, NotificationOptions::default());
        let view = renderer_for(NotificationType::Fatal).render(&c);
        assert!(view.close_all.classes.contains(&"btn-error".to_string()));
        assert!(view.fatal.is_none(), "no bug report section without an issue");
    }

    #[test]
    fn test_thrown_from_text() {
        let linked = Attribution {
            package_name: Some("linter".to_string()),
            repo_url: Some("https://github.com/me/linter".to_string()),
        };
        assert_eq!(
            thrown_from_text(&linked),
            "The error was thrown from the [linter package](https://github.com/me/linter). "
        );
        assert!(has_issue_button(&linked));
        assert_eq!(create_issue_label(&linked), "Create issue on the linter package");

        let plain = Attribution {
            package_name: Some("linter".to_string()),
            repo_url: None,
        };
        assert_eq!(thrown_from_text(&plain), "The error was thrown from the linter package. ");
        assert!(!has_issue_button(&plain));

        let core = Attribution::core();
        assert_eq!(thrown_from_text(&core), "This is likely a bug in Atom. ");
        assert!(has_issue_button(&core));
        assert_eq!(create_issue_label(&core), "Create issue on atom/atom");
    }

    #[test]
    fn test_remediation_texts() {
        assert_eq!(
            remediation_text(&Remediation::ViewIssue { url: "u".to_string() }),
            " This issue has already been reported."
        );
        let text = remediation_text(&Remediation::ShadowedCorePackage {
            package: "tabs".to_string(),
            installed: "0.1.0".to_string(),
            shipped: "0.2.0".to_string(),
            unlink_path: Some(PathBuf::from("/home/me/.atom/packages/tabs")),
        });
        assert!(text.contains("`tabs` is out of date: 0.1.0 installed locally;\n0.2.0 included"));
        assert!(text.ends_with("Use: `apm unlink /home/me/.atom/packages/tabs`"));

        let text = remediation_text(&Remediation::UpdateApp {
            installed: "1.0.0".to_string(),
            latest: "1.1.0".to_string(),
        });
        assert!(text.contains("(https://github.com/atom/atom/releases/tag/v1.1.0)"));
    }
}
