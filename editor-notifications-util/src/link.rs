/// Check if a URL is safe to hand to the system opener (http, https only)
pub fn is_safe_url(url: &str) -> bool {
    let url_lower = url.to_lowercase();
    url_lower.starts_with("https://") || url_lower.starts_with("http://")
}

/// Open an issue or release link in the default browser
#[cfg(feature = "open")]
pub fn open_link(url: &str) -> Result<(), std::io::Error> {
    if !is_safe_url(url) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Unsafe URL scheme",
        ));
    }
    tracing::debug!("Opening {}", url);
    open::that(url)
}

#[cfg(not(feature = "open"))]
pub fn open_link(url: &str) -> Result<(), std::io::Error> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("cannot open {url}: built without the `open` feature"),
    ))
}
