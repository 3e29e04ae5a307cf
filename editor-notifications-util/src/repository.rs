use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Repository that receives reports nobody else owns
pub const CORE_REPO_SLUG: &str = "atom/atom";
pub const CORE_REPO_URL: &str = "https://github.com/atom/atom";

static GITHUB_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://(\d+\.)?github\.com/").expect("github prefix regex"));

/// Clean a manifest repository URL: no `git+` scheme prefix, no `.git` suffix
pub fn normalize_repo_url(repo_url: &str) -> String {
    let url = repo_url.trim();
    let url = url.strip_suffix(".git").unwrap_or(url);
    url.strip_prefix("git+").unwrap_or(url).to_string()
}

/// `owner/name` form used to scope an issue search
pub fn github_repo_slug(repo_url: Option<&str>) -> String {
    match repo_url.filter(|u| !u.is_empty()) {
        Some(url) => GITHUB_PREFIX.replace_all(url, "").into_owned(),
        None => CORE_REPO_SLUG.to_string(),
    }
}

/// Link that opens a pre-filled new issue form
pub fn issue_url(repo_url: Option<&str>, title: &str, body: &str) -> Result<String, url::ParseError> {
    let repo = repo_url.filter(|u| !u.is_empty()).unwrap_or(CORE_REPO_URL);
    let mut url = Url::parse(&format!("{}/issues/new", repo.trim_end_matches('/')))?;
    url.query_pairs_mut()
        .append_pair("title", title)
        .append_pair("body", body);
    Ok(url.into())
}

/// Release page for an application version
pub fn release_url(version: &str) -> String {
    format!("{CORE_REPO_URL}/releases/tag/v{version}")
}

/// Editor URI of a package's settings page
pub fn settings_uri(package_name: &str) -> String {
    format!("atom://config/packages/{package_name}")
}
