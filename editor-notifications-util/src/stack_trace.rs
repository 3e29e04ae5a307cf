use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*at (?:(?P<method>.+?) \()?(?P<location>.*?)\)?\s*$").expect("frame regex")
});

static LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<file>.*?)(?::(?P<line>\d+))?(?::(?P<column>\d+))?$").expect("location regex")
});

static STACK_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(^\W+at )([\w.]{2,} [(])?(.*)(:\d+:\d+[)]?)").expect("stack path regex")
});

static BUNDLE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*(/(?:app\.asar|packages/).*)$").expect("bundle prefix regex"));

static WINDOWS_DRIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]:[\\/]").expect("windows drive regex"));

/// Frame name used by the editor for code inside its snapshot
pub const EMBEDDED_FILE: &str = "<embedded>";

/// One `at ...` line of a V8 style stack trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub method: Option<String>,
    /// Empty when the code was run from an interactive console
    pub file: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

/// Parse the frames of a stack trace, top frame first
///
/// Lines that are not frames (the error message, blank lines) are skipped.
pub fn parse_stack(stack: &str) -> Vec<StackFrame> {
    stack
        .lines()
        .filter_map(|line| {
            let caps = FRAME.captures(line)?;
            let method = caps.name("method").map(|m| m.as_str().to_string());
            let location = caps.name("location").map_or("", |m| m.as_str());
            let loc = LOCATION.captures(location)?;
            Some(StackFrame {
                method,
                file: loc.name("file").map_or("", |m| m.as_str()).to_string(),
                line: loc.name("line").and_then(|m| m.as_str().parse().ok()),
                column: loc.name("column").and_then(|m| m.as_str().parse().ok()),
            })
        })
        .collect()
}

/// Absolute on either platform, independent of the host OS
pub fn is_absolute_path(path: &str) -> bool {
    path.starts_with('/') || path.starts_with("\\\\") || WINDOWS_DRIVE.is_match(path)
}

/// Whether a stack points at code the user can act on
///
/// Traces without an absolute path or an embedded frame cannot be traced back
/// to a package or the editor itself.
pub fn has_traceable_frame(stack: &str) -> bool {
    parse_stack(stack)
        .iter()
        .any(|frame| frame.file == EMBEDDED_FILE || is_absolute_path(&frame.file))
}

/// Shorten a file path for an issue report
///
/// Drops the file URL scheme, replaces the home directory with `~` and keeps
/// only the part from `/app.asar` or `/packages/` on.
pub fn normalize_path(path: &str, home: Option<&str>) -> String {
    let mut path = path.replacen("file://", "", 1).replace('\\', "/");
    if let Some(home) = home.filter(|h| !h.is_empty()) {
        let home = home.replace('\\', "/");
        path = path.replacen(&home, "~", 1);
    }
    BUNDLE_PREFIX.replace(&path, "$1").into_owned()
}

/// Rewrite every frame path of a stack with [`normalize_path`]
pub fn normalize_stack_paths(stack: &str, home: Option<&str>) -> String {
    STACK_PATH
        .replace_all(stack, |caps: &Captures| {
            format!(
                "{}{}{}{}",
                &caps[1],
                caps.get(2).map_or("", |m| m.as_str()),
                normalize_path(&caps[3], home),
                &caps[4]
            )
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STACK: &str = "TypeError: Cannot read property 'x' of undefined
    at Foo.bar (/home/user/.atom/packages/linter/lib/main.js:12:5)
    at /home/user/.atom/packages/minimap/lib/view.js:3:9
    at <embedded>:11:20";

    #[test]
    fn test_parse_named_and_anonymous_frames() {
        let frames = parse_stack(STACK);
        assert_eq!(frames.len(), 3);

        assert_eq!(frames[0].method.as_deref(), Some("Foo.bar"));
        assert_eq!(frames[0].file, "/home/user/.atom/packages/linter/lib/main.js");
        assert_eq!(frames[0].line, Some(12));
        assert_eq!(frames[0].column, Some(5));

        assert_eq!(frames[1].method, None);
        assert_eq!(frames[1].file, "/home/user/.atom/packages/minimap/lib/view.js");

        assert_eq!(frames[2].file, EMBEDDED_FILE);
    }

    #[test]
    fn test_parse_console_frame_has_empty_file() {
        let frames = parse_stack("Error\n    at eval ()");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].file, "");
    }

    #[test]
    fn test_parse_skips_non_frames() {
        assert!(parse_stack("just a message\n\n").is_empty());
    }

    #[test]
    fn test_traceable_frames() {
        assert!(has_traceable_frame(STACK));
        assert!(has_traceable_frame("Error\n    at x (<embedded>:1:1)"));
        assert!(has_traceable_frame("Error\n    at x (C:\\Users\\me\\a.js:1:1)"));
        assert!(!has_traceable_frame("Error\n    at x (index.js:1:1)\n    at <anonymous>"));
    }

    #[test]
    fn test_normalize_path_home_and_packages() {
        assert_eq!(
            normalize_path("/home/user/.atom/packages/linter/lib/main.js", Some("/home/user")),
            "/packages/linter/lib/main.js"
        );
        assert_eq!(
            normalize_path("file:///usr/share/atom/resources/app.asar/src/x.js", None),
            "/app.asar/src/x.js"
        );
        assert_eq!(normalize_path("/home/user/dev/x.js", Some("/home/user")), "~/dev/x.js");
    }

    #[test]
    fn test_normalize_path_windows_separators() {
        assert_eq!(
            normalize_path("C:\\Users\\me\\.atom\\packages\\foo\\index.js", Some("C:\\Users\\me")),
            "/packages/foo/index.js"
        );
    }

    #[test]
    fn test_normalize_stack_paths() {
        let normalized = normalize_stack_paths(STACK, Some("/home/user"));
        let lines: Vec<&str> = normalized.lines().collect();
        assert_eq!(lines[0], "TypeError: Cannot read property 'x' of undefined");
        assert_eq!(lines[1], "    at Foo.bar (/packages/linter/lib/main.js:12:5)");
        assert_eq!(lines[2], "    at /packages/minimap/lib/view.js:3:9");
    }
}
