use super::timers::{TimerId, TimerKind, TimerQueue};
use crate::{constants::ANIMATION_DURATION, diagnostics::FatalIssue, host::Workspace};
use editor_notifications_util::{Notification, NotificationId};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// Where a card is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardState {
    /// Created, not rendered yet
    Pending,
    /// In the popup area, possibly counting down to autohide
    Visible,
    /// In the popup area until the user closes it
    Dismissable,
    /// Playing the removal animation
    Removing,
    /// Detached from the popup area
    Removed,
}

/// Popup card of one notification
#[derive(Debug)]
pub struct Card {
    notification: Arc<Notification>,
    state: CardState,
    visibility: Duration,
    autohide: Option<TimerId>,
    removal: Option<TimerId>,
    /// Click and hover handling, only while the card can autohide
    interactive: bool,
    hovered: bool,
    focused: bool,
    stack_expanded: bool,
    issue_check_requested: bool,
    fatal: Option<Arc<FatalIssue>>,
}

impl Card {
    pub fn new(notification: Arc<Notification>, visibility: Duration, fatal: Option<Arc<FatalIssue>>) -> Self {
        Self {
            notification,
            state: CardState::Pending,
            visibility,
            autohide: None,
            removal: None,
            interactive: false,
            hovered: false,
            focused: false,
            stack_expanded: false,
            issue_check_requested: false,
            fatal,
        }
    }

    pub fn id(&self) -> NotificationId {
        self.notification.id
    }

    pub fn notification(&self) -> &Arc<Notification> {
        &self.notification
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn fatal(&self) -> Option<&Arc<FatalIssue>> {
        self.fatal.as_ref()
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_removing(&self) -> bool {
        matches!(self.state, CardState::Removing | CardState::Removed)
    }

    /// Whether an autohide countdown is running
    pub fn is_auto_closing(&self) -> bool {
        self.autohide.is_some()
    }

    pub fn stack_expanded(&self) -> bool {
        self.stack_expanded
    }

    pub fn issue_check_requested(&self) -> bool {
        self.issue_check_requested
    }

    /// Record that the reported-issue lookup was started, false if it already was
    pub fn request_issue_check(&mut self) -> bool {
        !std::mem::replace(&mut self.issue_check_requested, true)
    }

    /// Put the card on screen
    ///
    /// Cards that are not dismissable, or every card when `always_dismiss`
    /// is set, start the autohide countdown and react to clicks and hover.
    pub fn show(&mut self, autohide: bool, timers: &mut TimerQueue, now: Instant) {
        if autohide {
            self.autohide = Some(timers.schedule(now + self.visibility, TimerKind::Autohide(self.id())));
            self.interactive = true;
            self.state = CardState::Visible;
        } else {
            self.state = CardState::Dismissable;
        }
    }

    /// Autohide deadline passed
    ///
    /// A hovered card stays and becomes dismissable instead.
    pub fn on_autohide(&mut self, timers: &mut TimerQueue, now: Instant, workspace: &dyn Workspace) {
        self.autohide = None;
        if self.is_removing() {
            return;
        }
        if self.hovered {
            tracing::trace!("Card {} hovered at autohide, keeping it", self.id());
            self.make_dismissable(timers);
        } else {
            self.begin_removal(timers, now, workspace);
        }
    }

    /// Click on the card body pins a non-dismissable card
    pub fn click(&mut self, timers: &mut TimerQueue) -> bool {
        if !self.interactive || self.is_removing() || self.notification.is_dismissable() {
            return false;
        }
        self.make_dismissable(timers);
        true
    }

    /// Stop autohiding and wait for the user to close the card
    pub fn make_dismissable(&mut self, timers: &mut TimerQueue) {
        if self.notification.make_dismissable() {
            self.notification.restore();
        }
        if let Some(id) = self.autohide.take() {
            timers.cancel(id);
        }
        self.interactive = false;
        self.hovered = false;
        if self.state == CardState::Visible {
            self.state = CardState::Dismissable;
        }
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        if self.interactive {
            self.hovered = hovered;
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Start the removal animation
    ///
    /// Focus held by the card goes back to the active pane right away.
    /// Returns false if the card was already on its way out.
    pub fn begin_removal(&mut self, timers: &mut TimerQueue, now: Instant, workspace: &dyn Workspace) -> bool {
        if self.is_removing() {
            return false;
        }
        if let Some(id) = self.autohide.take() {
            timers.cancel(id);
        }
        self.notification.mark_dismissed();
        if self.focused {
            workspace.activate_active_pane();
            self.focused = false;
        }
        self.hovered = false;
        self.removal = Some(timers.schedule(now + ANIMATION_DURATION, TimerKind::Removal(self.id())));
        self.state = CardState::Removing;
        true
    }

    /// Removal animation ended
    pub fn finish_removal(&mut self) {
        self.removal = None;
        self.state = CardState::Removed;
    }

    /// Bring a removed card back from the log
    ///
    /// The card comes back dismissable. Returns false when the card was
    /// still in the popup area.
    pub fn resurrect(&mut self, timers: &mut TimerQueue) -> bool {
        self.make_dismissable(timers);
        if !self.is_removing() {
            return false;
        }
        if let Some(id) = self.removal.take() {
            timers.cancel(id);
        }
        self.notification.restore();
        self.notification.mark_displayed();
        self.state = CardState::Dismissable;
        true
    }

    /// Card refused by the popup policy: dismissed without ever showing
    pub fn suppress(&mut self, timers: &mut TimerQueue) {
        self.make_dismissable(timers);
        self.notification.dismiss();
        self.state = CardState::Removed;
    }

    pub fn toggle_stack(&mut self) -> bool {
        self.stack_expanded = !self.stack_expanded;
        self.stack_expanded
    }

    /// Drop every pending timer of the card
    pub fn cancel_timers(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.autohide.take() {
            timers.cancel(id);
        }
        if let Some(id) = self.removal.take() {
            timers.cancel(id);
        }
    }
}
