use crate::host::{PackageManifest, PackageRegistry, Repository};
use editor_notifications_util::{
    Notification, file_path_from_location, is_subfolder, normalize_repo_url, package_name_from_path,
    parse_stack, stack_trace::is_absolute_path,
};
use std::path::{Path, PathBuf};

/// Package a fatal error is blamed on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    pub package_name: Option<String>,
    /// Normalized repository link of the package
    pub repo_url: Option<String>,
}

impl Attribution {
    pub fn core() -> Self {
        Self::default()
    }

    pub fn is_core(&self) -> bool {
        self.package_name.is_none()
    }
}

/// Resolve the package and its repository for a notification
pub async fn attribute(notification: &Notification, packages: &dyn PackageRegistry) -> Attribution {
    let package_name = package_name(notification, packages).await;
    let repo_url = match &package_name {
        Some(name) => repo_url(name, packages).await,
        None => None,
    };
    tracing::debug!(
        "Notification {} attributed to {:?} ({:?})",
        notification.id,
        package_name,
        repo_url
    );
    Attribution {
        package_name,
        repo_url,
    }
}

fn is_user_install(path: &Path) -> bool {
    let path = path.to_string_lossy().replace('\\', "/");
    path.contains(".atom/dev/packages") || path.contains(".atom/packages")
}

/// Install directories of the loaded packages, user installs resolved to their real path
async fn loaded_package_paths(packages: &dyn PackageRegistry) -> Vec<(String, PathBuf)> {
    let mut paths = Vec::new();
    for package in packages.loaded_packages() {
        let path = if is_user_install(&package.path) {
            match tokio::fs::canonicalize(&package.path).await {
                Ok(real) => real,
                Err(err) => {
                    tracing::debug!("Failed to resolve {}: {}", package.path.display(), err);
                    package.path
                }
            }
        } else {
            package.path
        };
        paths.push((package.name, path));
    }
    paths
}

fn package_for_location(location: &str, package_paths: &[(String, PathBuf)]) -> Option<String> {
    let file = file_path_from_location(location);
    if is_absolute_path(&file) && file != "node.js" {
        let owner = package_paths
            .iter()
            .find(|(_, dir)| is_subfolder(&file, &dir.to_string_lossy()));
        if let Some((name, _)) = owner {
            return Some(name.clone());
        }
    }
    package_name_from_path(&file)
}

/// Name of the package that raised the notification
///
/// An explicit package name wins. Otherwise the detail line is tried, then
/// the stack frames from the top. A frame without a file was typed into a
/// console and ends the search.
pub async fn package_name(notification: &Notification, packages: &dyn PackageRegistry) -> Option<String> {
    if let Some(name) = notification.package_name() {
        return Some(name.to_string());
    }

    let detail = notification.detail();
    let stack = notification.stack();
    if detail.is_none() && stack.is_none() {
        return None;
    }

    let package_paths = loaded_package_paths(packages).await;

    if let Some(name) = detail.and_then(|d| package_for_location(d, &package_paths)) {
        return Some(name);
    }

    for frame in parse_stack(stack?) {
        if frame.file.is_empty() {
            return None;
        }
        if let Some(name) = package_for_location(&frame.file, &package_paths) {
            return Some(name);
        }
    }
    None
}

/// Repository link of a package
///
/// Loaded packages answer from memory; otherwise the `package.json` in the
/// install directory is read.
pub async fn repo_url(package_name: &str, packages: &dyn PackageRegistry) -> Option<String> {
    let loaded = packages
        .loaded_package(package_name)
        .and_then(|p| p.metadata.repository)
        .and_then(|r| r.url().map(str::to_string));

    let url = match loaded {
        Some(url) => Some(url),
        None => {
            let path = packages.resolve_package_path(package_name)?;
            read_manifest(&path)
                .await
                .and_then(|m| m.repository)
                .as_ref()
                .and_then(Repository::url)
                .map(str::to_string)
        }
    };
    url.map(|u| normalize_repo_url(&u))
}

/// Read `package.json` from a package directory, `None` on any failure
pub async fn read_manifest(package_dir: &Path) -> Option<PackageManifest> {
    let manifest_path = package_dir.join("package.json");
    let content = match tokio::fs::read_to_string(&manifest_path).await {
        Ok(content) => content,
        Err(err) => {
            tracing::debug!("Failed to read {}: {}", manifest_path.display(), err);
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(manifest) => Some(manifest),
        Err(err) => {
            tracing::debug!("Failed to parse {}: {}", manifest_path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PackageInfo;
    use editor_notifications_util::{NotificationOptions, NotificationType};

    #[derive(Default)]
    struct Packages {
        loaded: Vec<PackageInfo>,
    }

    impl PackageRegistry for Packages {
        fn loaded_packages(&self) -> Vec<PackageInfo> {
            self.loaded.clone()
        }

        fn resolve_package_path(&self, _name: &str) -> Option<PathBuf> {
            None
        }

        fn is_bundled(&self, _name: &str) -> bool {
            false
        }

        fn version_shipped_with_app(&self, _name: &str) -> Option<String> {
            None
        }

        fn available_packages(&self) -> Vec<PackageInfo> {
            self.loaded.clone()
        }
    }

    fn package(name: &str, path: &str) -> PackageInfo {
        PackageInfo {
            name: name.to_string(),
            path: PathBuf::from(path),
            metadata: PackageManifest {
                name: name.to_string(),
                ..Default::default()
            },
        }
    }

    fn fatal(options: NotificationOptions) -> Notification {
        Notification::new(1, NotificationType::Fatal, "Uncaught Error", options)
    }

    #[tokio::test]
    async fn test_explicit_package_name_wins() {
        let n = fatal(NotificationOptions {
            package_name: Some("explicit".to_string()),
            detail: Some("/opt/bundled/lint/index.js:1:1".to_string()),
            ..Default::default()
        });
        let packages = Packages {
            loaded: vec![package("lint", "/opt/bundled/lint")],
        };
        assert_eq!(package_name(&n, &packages).await.as_deref(), Some("explicit"));
    }

    #[tokio::test]
    async fn test_no_detail_or_stack_is_core() {
        let n = fatal(NotificationOptions::default());
        assert_eq!(package_name(&n, &Packages::default()).await, None);
    }

    #[tokio::test]
    async fn test_detail_inside_loaded_package() {
        let n = fatal(NotificationOptions {
            detail: Some("/opt/bundled/lint/lib/main.js:10:5".to_string()),
            ..Default::default()
        });
        let packages = Packages {
            loaded: vec![
                package("lint-extra", "/opt/bundled/lint-extra"),
                package("lint", "/opt/bundled/lint"),
            ],
        };
        assert_eq!(package_name(&n, &packages).await.as_deref(), Some("lint"));
    }

    #[tokio::test]
    async fn test_prefix_is_not_a_subfolder() {
        let n = fatal(NotificationOptions {
            detail: Some("/opt/bundled/lint-extra/index.js:1".to_string()),
            ..Default::default()
        });
        let packages = Packages {
            loaded: vec![package("lint", "/opt/bundled/lint")],
        };
        assert_eq!(package_name(&n, &packages).await, None);
    }

    #[tokio::test]
    async fn test_topmost_package_frame_wins() {
        let stack = "Error: boom\n    at explode (/home/me/.atom/packages/first/lib/a.js:3:9)\n    at call (/home/me/.atom/packages/second/lib/b.js:8:1)";
        let n = fatal(NotificationOptions {
            stack: Some(stack.to_string()),
            detail: Some("/nowhere/file.js:1".to_string()),
            ..Default::default()
        });
        assert_eq!(
            package_name(&n, &Packages::default()).await.as_deref(),
            Some("first")
        );
    }

    #[tokio::test]
    async fn test_console_frame_stops_search() {
        let stack = "Error: boom\n    at eval ()\n    at run (/home/me/.atom/packages/second/lib/b.js:8:1)";
        let n = fatal(NotificationOptions {
            stack: Some(stack.to_string()),
            ..Default::default()
        });
        assert_eq!(package_name(&n, &Packages::default()).await, None);
    }

    #[tokio::test]
    async fn test_loaded_repository_is_normalized() {
        let mut pkg = package("lint", "/opt/bundled/lint");
        pkg.metadata.repository = Some(Repository::Object {
            url: Some("git+https://github.com/me/lint.git".to_string()),
        });
        let packages = Packages { loaded: vec![pkg] };
        assert_eq!(
            repo_url("lint", &packages).await.as_deref(),
            Some("https://github.com/me/lint")
        );
        assert_eq!(repo_url("missing", &packages).await, None);
    }
}
