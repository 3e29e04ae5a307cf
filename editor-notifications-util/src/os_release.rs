use once_cell::sync::Lazy;
use regex::Regex;

static WINDOWS_EDITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)OS.+(Microsoft.+)$").expect("windows edition regex"));

/// `lsb_release -ds` output to "Distro Version"
pub fn linux_distro(output: &str) -> Option<String> {
    let mut words = output.trim().split(' ');
    let name = words.next().filter(|w| !w.is_empty())?;
    let version = words.next().filter(|w| !w.is_empty())?;
    Some(format!("{name} {version}"))
}

/// PlistBuddy output (version line then name line) to "Name Version"
pub fn macos_version(output: &str) -> Option<String> {
    let mut lines = output.trim().lines().map(str::trim);
    let version = lines.next().filter(|l| !l.is_empty())?;
    let name = lines.next().filter(|l| !l.is_empty())?;
    Some(format!("{name} {version}"))
}

/// Edition line of `systeminfo` output
pub fn windows_edition(output: &str) -> Option<String> {
    WINDOWS_EDITION
        .captures(output)
        .map(|caps| caps[1].trim_end().to_string())
}
