//! Integration tests for bug report text
//!
//! These tests build complete reports from a raw notification the way the
//! fatal card does, using only the helpers exported by this crate.

use editor_notifications_util::{
    CommandLog, IssueReport, Notification, NotificationOptions, NotificationType, ThrownFrom,
    github_repo_slug, has_traceable_frame, issue_title, issue_url, normalize_repo_url,
    normalize_stack_paths, package_name_from_path, parse_stack,
};
use std::time::{Duration, SystemTime};

const HOME: &str = "/home/user";
const APP_HOME: &str = "/home/user/.atom";

const STACK: &str = "TypeError: Cannot read property 'getText' of null
    at MinimapView.update (/home/user/.atom/packages/minimap/lib/view.js:42:17)
    at Emitter.emit (/usr/share/atom/resources/app.asar/node_modules/event-kit/lib/emitter.js:86:11)";

fn fatal() -> Notification {
    let options = NotificationOptions {
        detail: Some("/home/user/.atom/packages/minimap/lib/view.js:42".to_string()),
        stack: Some(STACK.to_string()),
        dismissable: true,
        ..Default::default()
    };
    Notification::new(
        1,
        NotificationType::Fatal,
        "Uncaught TypeError: Cannot read property 'getText' of null",
        options,
    )
}

#[test]
fn test_report_for_package_error() {
    // Test: A stack owned by a user package produces a linked report
    let n = fatal();
    let frames = parse_stack(n.stack().unwrap());
    assert_eq!(frames.len(), 2, "two frames expected");
    assert!(has_traceable_frame(n.stack().unwrap()));

    let package = package_name_from_path(&frames[0].file).expect("package owns the top frame");
    assert_eq!(package, "minimap");

    let mut commands = CommandLog::new();
    let start = SystemTime::UNIX_EPOCH + Duration::from_secs(5_000);
    commands.record_at("minimap:toggle", "atom-workspace", start);

    let report = IssueReport {
        app_version: "1.58.0".to_string(),
        arch: "x64".to_string(),
        runtime_version: "9.4.4".to_string(),
        os: "Ubuntu 20.04".to_string(),
        thrown_from: ThrownFrom::LinkedPackage {
            name: package.clone(),
            repo_url: normalize_repo_url("git+https://github.com/atom-minimap/minimap.git"),
            version: Some("4.39.0".to_string()),
        },
        root_user: false,
        message: n.message.clone(),
        detail: n.detail().map(str::to_string),
        stack: n.stack().map(|s| normalize_stack_paths(s, Some(HOME))),
        commands: commands.text(start + Duration::from_secs(3)),
        non_core_packages: vec!["minimap 4.39.0 ".to_string()],
    };
    let body = report.body();

    assert!(body.contains("**Atom**: 1.58.0 x64"));
    assert!(body.contains("**Thrown From**: [minimap](https://github.com/atom-minimap/minimap) package 4.39.0"));
    assert!(body.contains("at MinimapView.update (/packages/minimap/lib/view.js:42:17)"));
    assert!(body.contains("(/app.asar/node_modules/event-kit/lib/emitter.js:86:11)"));
    assert!(body.contains("minimap:toggle (atom-workspace)"));
    assert!(!body.contains("**User**: root"));
}

#[test]
fn test_issue_link_is_scoped_to_package() {
    // Test: Title, search scope and link all point at the package repository
    let n = fatal();
    let repo = "https://github.com/atom-minimap/minimap";
    let title = issue_title(&n.message, Some(APP_HOME), Some(HOME));
    assert_eq!(title, "Uncaught TypeError: Cannot read property 'getText' of null");
    assert_eq!(github_repo_slug(Some(repo)), "atom-minimap/minimap");

    let url = issue_url(Some(repo), &title, "body text").unwrap();
    assert!(url.starts_with("https://github.com/atom-minimap/minimap/issues/new?title=Uncaught+TypeError"));
    assert!(url.ends_with("&body=body+text"));
}

#[test]
fn test_core_error_goes_to_core_repository() {
    // Test: Without an attributed package the core repository is used
    assert_eq!(github_repo_slug(None), "atom/atom");
    let url = issue_url(None, "Boom", "").unwrap();
    assert!(url.starts_with("https://github.com/atom/atom/issues/new?"));
    assert_eq!(ThrownFrom::Core.to_string(), "Atom Core");
}

#[test]
fn test_console_errors_are_not_traceable() {
    // Test: Frames typed into a console carry no local path
    let stack = "ReferenceError: x is not defined\n    at <anonymous>:1:1";
    assert!(!has_traceable_frame(stack));
}
