use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc, time::Duration};

/// Callback run when a button is clicked
pub type ButtonCallback = Arc<dyn Fn() + Send + Sync>;

/// A button displayed in the toolbar of a notification card
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    /// User-visible label
    pub text: String,
    /// Extra classes, space separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip)]
    pub on_click: Option<ButtonCallback>,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class_name: None,
            on_click: None,
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn on_click(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(callback));
        self
    }

    /// Run the click callback, if any
    pub fn click(&self) {
        if let Some(callback) = &self.on_click {
            callback();
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class_name
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("text", &self.text)
            .field("class_name", &self.class_name)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

// Callbacks are not comparable; buttons are equal when they look the same.
impl PartialEq for Button {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.class_name == other.class_name
    }
}

impl Eq for Button {}

/// Optional payload attached to a notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationOptions {
    pub detail: Option<String>,
    pub stack: Option<String>,
    /// Whether the card waits for the user to close it
    pub dismissable: bool,
    /// Per-notification autohide timeout in milliseconds, `0` means unset
    pub timeout: Option<u32>,
    pub description: Option<String>,
    pub buttons: Vec<Button>,
    /// Explicit owner of the notification, skips package attribution
    pub package_name: Option<String>,
}

impl NotificationOptions {
    pub fn dismissable() -> Self {
        Self {
            dismissable: true,
            ..Default::default()
        }
    }

    /// Timeout override, if one was given and is non-zero
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
            .filter(|ms| *ms > 0)
            .map(|ms| Duration::from_millis(u64::from(ms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_button_click_runs_callback() {
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = clicks.clone();
        let button = Button::new("Retry").on_click(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        button.click();
        button.click();
        assert_eq!(clicks.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_button_without_callback_is_noop() {
        Button::new("Nothing").click();
    }

    #[test]
    fn test_button_equality_ignores_callback() {
        let a = Button::new("Open").on_click(|| {});
        let b = Button::new("Open");
        assert_eq!(a, b);
        assert_ne!(a, Button::new("Open").with_class("primary"));
    }

    #[test]
    fn test_button_classes_split() {
        let button = Button::new("Go").with_class("icon  icon-gear");
        assert_eq!(button.classes().collect::<Vec<_>>(), vec!["icon", "icon-gear"]);
        assert_eq!(Button::new("Go").classes().count(), 0);
    }

    #[test]
    fn test_timeout_zero_is_unset() {
        let mut options = NotificationOptions::default();
        assert_eq!(options.timeout(), None);

        options.timeout = Some(0);
        assert_eq!(options.timeout(), None);

        options.timeout = Some(1500);
        assert_eq!(options.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_options_deserialize_camel_case() {
        let json = r#"{
            "detail": "/home/user/.atom/packages/foo/lib/main.js:10",
            "dismissable": true,
            "packageName": "foo",
            "buttons": [{"text": "Fix", "className": "btn-fix"}]
        }"#;

        let options: NotificationOptions = serde_json::from_str(json).unwrap();
        assert!(options.dismissable);
        assert_eq!(options.package_name.as_deref(), Some("foo"));
        assert_eq!(options.buttons.len(), 1);
        assert_eq!(options.buttons[0].class_name.as_deref(), Some("btn-fix"));
        assert!(options.stack.is_none());
    }

    #[test]
    fn test_options_deserialize_empty_object() {
        let options: NotificationOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, NotificationOptions::default());
    }
}
