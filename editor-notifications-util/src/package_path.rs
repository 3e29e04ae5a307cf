use once_cell::sync::Lazy;
use regex::Regex;

// Dev packages first so a dev checkout wins over an installed copy.
static PACKAGE_DIRS: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        Regex::new(r"/\.atom/dev/packages/([^/]+)/").expect("dev packages regex"),
        Regex::new(r"\\\.atom\\dev\\packages\\([^\\]+)\\").expect("windows dev packages regex"),
        Regex::new(r"/\.atom/packages/([^/]+)/").expect("packages regex"),
        Regex::new(r"\\\.atom\\packages\\([^\\]+)\\").expect("windows packages regex"),
    ]
});

static PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((.+?):\d+|\((.+)\)").expect("parenthesized location regex"));

static LINE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?::\d+){1,2}$").expect("line suffix regex"));

/// Package name from the user or dev package directory layout
///
/// `/home/me/.atom/packages/linter/lib/main.js` belongs to `linter`.
pub fn package_name_from_path(path: &str) -> Option<String> {
    PACKAGE_DIRS
        .iter()
        .find_map(|re| re.captures(path))
        .map(|caps| caps[1].to_string())
}

/// Extract the file path from a detail string or a stack frame location
///
/// Accepts `(path:line:col)`, `path:line`, plain paths and `file://` URLs.
pub fn file_path_from_location(location: &str) -> String {
    let location = location.trim();
    let path = PARENTHESIZED
        .captures(location)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map_or(location, |m| m.as_str());

    let path = LINE_SUFFIX.replace(path, "");

    // First try parsing as a file:// URL
    if path.starts_with("file:") {
        if let Some(file) = url::Url::parse(&path)
            .ok()
            .and_then(|u| u.to_file_path().ok())
        {
            return file.to_string_lossy().into_owned();
        }
    }
    path.into_owned()
}

/// Whether `file` lives strictly inside `dir`
///
/// Both separators are accepted; `/pkgs/foo-bar` is not inside `/pkgs/foo`.
pub fn is_subfolder(file: &str, dir: &str) -> bool {
    let file = file.replace('\\', "/");
    let dir = dir.replace('\\', "/");
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        return false;
    }
    file.strip_prefix(dir)
        .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
}
