use crate::host::Host;
use semver::Version;

/// Installed editor version against the latest release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppVersionCheck {
    pub up_to_date: bool,
    pub installed_version: String,
    pub latest_version: String,
}

/// Installed package version against the latest publication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersionCheck {
    /// The package ships with the editor
    pub is_core: bool,
    pub up_to_date: bool,
    pub installed_version: String,
    pub latest_version: String,
    pub version_shipped_with_app: Option<String>,
}

/// Parse a version, accepting a `v` prefix and missing minor or patch parts
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);
    if let Ok(parsed) = Version::parse(version) {
        return Some(parsed);
    }

    let (core, rest) = match version.find(['-', '+']) {
        Some(pos) => version.split_at(pos),
        None => (version, ""),
    };
    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    while parts.len() < 3 {
        parts.push("0");
    }
    Version::parse(&format!("{}{}", parts.join("."), rest)).ok()
}

/// `installed >= required`, `None` when either side does not parse
fn at_least(installed: &str, required: &str) -> Option<bool> {
    Some(parse_version(installed)? >= parse_version(required)?)
}

/// Compare the running editor with the latest release
///
/// Pre-release suffixes of the installed version are ignored.
pub fn check_app(installed: &str, latest: &str) -> Option<AppVersionCheck> {
    let installed = installed.split('-').next().unwrap_or_default();
    if installed.is_empty() {
        return None;
    }
    let up_to_date = at_least(installed, latest)?;
    Some(AppVersionCheck {
        up_to_date,
        installed_version: installed.to_string(),
        latest_version: latest.to_string(),
    })
}

/// Compare an installed package with the latest publication
///
/// A bundled package is compared with the version the editor ships instead,
/// since an older local install shadows the bundled copy.
pub fn check_package(installed: Option<&str>, latest: &str, shipped: Option<&str>) -> Option<PackageVersionCheck> {
    let installed = installed.filter(|v| !v.is_empty())?;
    let up_to_date = match shipped {
        Some(shipped) => at_least(installed, shipped)?,
        None => at_least(installed, latest)?,
    };
    Some(PackageVersionCheck {
        is_core: shipped.is_some(),
        up_to_date,
        installed_version: installed.to_string(),
        latest_version: latest.to_string(),
        version_shipped_with_app: shipped.map(str::to_string),
    })
}

/// Look up the latest editor release, `None` when inconclusive
pub async fn app_version_check(host: &Host) -> Option<AppVersionCheck> {
    match host.versions.latest_app_version().await {
        Ok(latest) => check_app(&host.system.app_version, &latest),
        Err(err) => {
            tracing::warn!("Failed to fetch the latest editor version: {}", err);
            None
        }
    }
}

/// Look up the latest publication of a package, `None` when inconclusive
pub async fn package_version_check(host: &Host, package_name: &str) -> Option<PackageVersionCheck> {
    let published = match host.versions.latest_package(package_name).await {
        Ok(published) => published,
        Err(err) => {
            tracing::warn!("Failed to fetch package data for {}: {}", package_name, err);
            return None;
        }
    };
    let installed = host
        .packages
        .loaded_package(package_name)
        .and_then(|p| p.metadata.version);
    let shipped = host.packages.version_shipped_with_app(package_name);
    check_package(installed.as_deref(), &published.latest_version, shipped.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_is_lenient() {
        assert_eq!(parse_version("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version("v1.2"), Some(Version::new(1, 2, 0)));
        assert_eq!(parse_version("2"), Some(Version::new(2, 0, 0)));
        assert!(parse_version("1.2-beta1").is_some());
        assert_eq!(parse_version("not a version"), None);
    }

    #[test]
    fn test_app_check_strips_prerelease() {
        let check = check_app("1.40.0-beta3", "1.40.0").unwrap();
        assert!(check.up_to_date);
        assert_eq!(check.installed_version, "1.40.0");

        let check = check_app("1.39.1", "1.40.0").unwrap();
        assert!(!check.up_to_date);
        assert_eq!(check.latest_version, "1.40.0");
    }

    #[test]
    fn test_app_check_inconclusive_on_garbage() {
        assert_eq!(check_app("", "1.0.0"), None);
        assert_eq!(check_app("1.0.0", "latest"), None);
    }

    #[test]
    fn test_package_check_against_latest() {
        let check = check_package(Some("1.0.0"), "1.1.0", None).unwrap();
        assert!(!check.is_core);
        assert!(!check.up_to_date);

        let check = check_package(Some("1.1.0"), "1.1.0", None).unwrap();
        assert!(check.up_to_date);
    }

    #[test]
    fn test_core_package_checks_against_shipped_version() {
        let check = check_package(Some("0.9.0"), "2.0.0", Some("1.0.0")).unwrap();
        assert!(check.is_core);
        assert!(!check.up_to_date);
        assert_eq!(check.version_shipped_with_app.as_deref(), Some("1.0.0"));

        let check = check_package(Some("1.0.0"), "2.0.0", Some("1.0.0")).unwrap();
        assert!(check.up_to_date, "latest publication is irrelevant for core packages");
    }

    #[test]
    fn test_missing_installed_version_is_inconclusive() {
        assert_eq!(check_package(None, "1.0.0", None), None);
        assert_eq!(check_package(Some(""), "1.0.0", None), None);
    }
}
