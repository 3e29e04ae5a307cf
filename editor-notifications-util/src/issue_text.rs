use std::fmt;

/// Issue titles are cut to this many characters, ellipsis included
pub const TITLE_CHAR_LIMIT: usize = 100;

/// Build the title of an issue from a notification message
///
/// Machine specific directories are replaced so that the same error
/// reported by two users gets the same title.
pub fn issue_title(message: &str, app_home: Option<&str>, home: Option<&str>) -> String {
    let mut title = message.to_string();
    if let Some(app_home) = app_home.filter(|h| !h.is_empty()) {
        title = title.replacen(app_home, "$ATOM_HOME", 1);
    }
    if let Some(home) = home.filter(|h| !h.is_empty()) {
        title = title.replacen(home, "~", 1);
    }

    if title.chars().count() > TITLE_CHAR_LIMIT {
        title = title.chars().take(TITLE_CHAR_LIMIT - 3).collect::<String>() + "...";
    }
    title.replace("\r\n", "").replace(['\n', '\r'], "")
}

/// Where a fatal error came from, as written in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThrownFrom {
    /// Attributed package with a known repository
    LinkedPackage {
        name: String,
        repo_url: String,
        version: Option<String>,
    },
    /// Attributed package without repository metadata
    Package { name: String, version: Option<String> },
    Core,
}

impl fmt::Display for ThrownFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThrownFrom::LinkedPackage {
                name,
                repo_url,
                version,
            } => write!(
                f,
                "[{}]({}) package {}",
                name,
                repo_url,
                version.as_deref().unwrap_or("unknown")
            ),
            ThrownFrom::Package { name, version } => write!(
                f,
                "'{}' package v{}",
                name,
                version.as_deref().unwrap_or("unknown")
            ),
            ThrownFrom::Core => f.write_str("Atom Core"),
        }
    }
}

/// Everything that goes into the body of a bug report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReport {
    pub app_version: String,
    pub arch: String,
    pub runtime_version: String,
    pub os: String,
    pub thrown_from: ThrownFrom,
    pub root_user: bool,
    pub message: String,
    pub detail: Option<String>,
    /// Stack with paths already normalized
    pub stack: Option<String>,
    pub commands: String,
    pub non_core_packages: Vec<String>,
}

impl IssueReport {
    /// Markdown body of the issue
    pub fn body(&self) -> String {
        let root_user = if self.root_user { "**User**: root" } else { "" };
        format!(
            "[Enter steps to reproduce:]

1. ...
2. ...

**Atom**: {app_version} {arch}
**Electron**: {runtime}
**OS**: {os}
**Thrown From**: {thrown_from}
{root_user}

### Stack Trace

{message}

```
At {detail}

{stack}
```

### Commands

{commands}

### Non-Core Packages

```
{packages}
```
",
            app_version = self.app_version,
            arch = self.arch,
            runtime = self.runtime_version,
            os = self.os,
            thrown_from = self.thrown_from,
            message = self.message,
            detail = self.detail.as_deref().unwrap_or_default(),
            stack = self.stack.as_deref().unwrap_or_default(),
            commands = self.commands,
            packages = self.non_core_packages.join("\n"),
        )
    }
}
