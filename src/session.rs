//! The notification surface of one editor window.
//!
//! A [`Session`] owns everything that used to be global: the bus, the
//! duplicate filter, the popup cards, the log and the counter. It never
//! sleeps or awaits. The host feeds it [`Message`]s, calls
//! [`Session::advance_to`] when [`Session::next_deadline`] passes and runs
//! the [`Job`]s it hands out.

use crate::{
    bus::NotificationBus,
    constants::*,
    diagnostics::{FatalIssue, Remediation},
    handlers::Message,
    host::Host,
    jobs::Job,
    policy::{DuplicateFilter, popup_admitted},
    rendering::{
        Snapshot,
        cards::has_issue_button,
        views::{render_cards, render_counter, render_log},
    },
    settings::Settings,
    state::{Card, NotificationState, TimerKind, TimerQueue},
    uncaught::{UncaughtError, UncaughtOutcome, classify},
    views::{LogState, NotificationsLog, StatusCounter},
};
use editor_notifications_util::{
    Notification, NotificationId, NotificationOptions, NotificationType, settings_uri,
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Instant, SystemTime},
};

pub struct Session {
    host: Host,
    settings: Settings,
    bus: NotificationBus,
    duplicates: DuplicateFilter,
    cards: NotificationState,
    timers: TimerQueue,
    log: NotificationsLog,
    log_open: bool,
    counter: StatusCounter,
    jobs: Vec<Job>,
    /// Bug report workflows by notification, kept past card eviction
    fatal_issues: HashMap<NotificationId, Arc<FatalIssue>>,
    active: bool,
    /// Monotonic instant matching `anchor_wall`
    anchor: Instant,
    anchor_wall: SystemTime,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("settings", &self.settings)
            .field("active", &self.active)
            .field("cards", &self.cards.visible_count())
            .field("log", &self.log.len())
            .field("timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create an inactive session
    ///
    /// `now` and `wall` pin the session clock: wall time at any later instant
    /// is `wall + (instant - now)`.
    pub fn new(host: Host, settings: Settings, log_state: LogState, now: Instant, wall: SystemTime) -> Self {
        Self {
            host,
            settings,
            bus: NotificationBus::new(),
            duplicates: DuplicateFilter::new(DUPLICATE_WINDOW),
            cards: NotificationState::new(),
            timers: TimerQueue::new(),
            log: NotificationsLog::new(log_state),
            log_open: false,
            counter: StatusCounter::new(),
            jobs: Vec::new(),
            fatal_issues: HashMap::new(),
            active: false,
            anchor: now,
            anchor_wall: wall,
        }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    pub fn cards(&self) -> &NotificationState {
        &self.cards
    }

    pub fn log(&self) -> &NotificationsLog {
        &self.log
    }

    /// Register log listeners before the session starts
    pub fn log_mut(&mut self) -> &mut NotificationsLog {
        &mut self.log
    }

    pub fn counter(&self) -> &StatusCounter {
        &self.counter
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_log_open(&self) -> bool {
        self.log_open
    }

    /// Wall clock time at `now`
    pub fn wall_time(&self, now: Instant) -> SystemTime {
        self.anchor_wall + now.saturating_duration_since(self.anchor)
    }

    /// Start showing notifications
    ///
    /// Everything already on the bus goes through ingestion in order, so
    /// notifications that were displayed before only reach the log.
    pub fn activate(&mut self, now: Instant) {
        if self.active {
            return;
        }
        self.active = true;
        let pending = self.bus.notifications().to_vec();
        tracing::debug!("Activating with {} notifications on the bus", pending.len());
        for notification in pending {
            self.ingest(Some(notification), now);
        }
    }

    /// Stop showing notifications and return the state worth keeping
    pub fn deactivate(&mut self) -> LogState {
        let state = self.log.serialize();
        for card in self.cards.iter_mut() {
            card.cancel_timers(&mut self.timers);
        }
        self.cards.clear();
        let log = std::mem::replace(&mut self.log, NotificationsLog::new(state.clone()));
        log.destroy(&mut self.timers);
        self.timers.clear();
        self.counter.clear();
        self.duplicates.reset();
        self.jobs.clear();
        self.fatal_issues.clear();
        self.log_open = false;
        self.active = false;
        state
    }

    pub fn update_settings(&mut self, settings: Settings) {
        tracing::debug!("Settings updated: {:?}", settings);
        self.settings = settings;
    }

    /// Create a notification on the bus and show it when active
    pub fn notify(
        &mut self,
        kind: NotificationType,
        message: impl Into<String>,
        options: NotificationOptions,
        now: Instant,
    ) -> Arc<Notification> {
        let time = self.wall_time(now);
        let notification = self.bus.add_at(kind, message, options, time);
        if self.active {
            self.ingest(Some(notification.clone()), now);
        }
        notification
    }

    /// Put a notification created by the editor on the bus
    pub fn add_notification(&mut self, notification: Arc<Notification>, now: Instant) {
        self.bus.push(notification.clone());
        if self.active {
            self.ingest(Some(notification), now);
        }
    }

    /// Route a notification to the log, the counter and the popup area
    ///
    /// Duplicates are dropped before anything else sees them. A notification
    /// that was displayed once never opens a second card.
    pub fn ingest(&mut self, notification: Option<Arc<Notification>>, now: Instant) {
        let Some(notification) = notification else {
            return;
        };
        if !self.duplicates.check_and_update(&notification) {
            return;
        }

        let wall = self.wall_time(now);
        self.log.add(notification.clone(), &mut self.timers, now, wall);
        self.counter.add(notification.kind);

        if notification.was_displayed() {
            return;
        }

        let mut card = self.new_card(notification.clone());
        if popup_admitted(self.settings.popup_policy, &notification) {
            card.show(self.settings.autohides(&notification), &mut self.timers, now);
            notification.mark_displayed();
            self.cards.attach(card);
        } else {
            tracing::debug!(
                "Popup policy {:?} keeps {} notification {} in the log",
                self.settings.popup_policy,
                notification.kind,
                notification.id
            );
            card.suppress(&mut self.timers);
            self.cards.attach_hidden(card);
        }
    }

    /// Card for `notification`, with its bug report workflow when fatal
    ///
    /// A card rebuilt after eviction picks up the workflow of the first one,
    /// so lookups that already ran are not repeated.
    fn new_card(&mut self, notification: Arc<Notification>) -> Card {
        let visibility = self.settings.visibility_for(&notification);
        let fatal = (notification.kind == NotificationType::Fatal).then(|| {
            let host = &self.host;
            self.fatal_issues
                .entry(notification.id)
                .or_insert_with(|| Arc::new(FatalIssue::new(notification.clone(), host.clone())))
                .clone()
        });
        let mut card = Card::new(notification, visibility, fatal.clone());

        if let Some(issue) = fatal {
            let check = self.settings.checks_issues_automatically() || issue.diagnosis().is_some();
            if check {
                card.request_issue_check();
            }
            self.jobs.push(Job::Inspect { issue, check });
        }
        card
    }

    /// Run an editor command
    pub fn dispatch(&mut self, command: &str, now: Instant) {
        self.host.record_command(command, "notifications");
        match command {
            TOGGLE_LOG_COMMAND => {
                self.log_open = !self.log_open;
                tracing::debug!("Log open: {}", self.log_open);
            }
            CLEAR_LOG_COMMAND => self.clear_log(now),
            DISMISS_ALL_COMMAND | CANCEL_COMMAND => self.dismiss_all(now),
            _ => tracing::trace!("Ignoring command {}", command),
        }
    }

    /// Dismiss every notification, including those that never had a card
    pub fn dismiss_all(&mut self, now: Instant) {
        for notification in self.bus.notifications() {
            notification.make_dismissable();
            notification.dismiss();
        }
        let workspace = self.host.workspace.as_ref();
        for card in self.cards.iter_mut() {
            card.make_dismissable(&mut self.timers);
            card.notification().dismiss();
            card.begin_removal(&mut self.timers, now, workspace);
        }
    }

    /// Empty the popup area, the log and the counter at once
    pub fn clear_log(&mut self, now: Instant) {
        self.dismiss_all(now);
        for card in self.cards.iter_mut() {
            card.cancel_timers(&mut self.timers);
        }
        self.cards.clear();
        self.bus.clear();
        self.log.clear(&mut self.timers);
        self.counter.clear();
        self.fatal_issues.clear();
        tracing::debug!("Log cleared");
    }

    /// Close button of a card
    pub fn dismiss(&mut self, id: NotificationId, now: Instant) -> bool {
        let workspace = self.host.workspace.as_ref();
        let Some(card) = self.cards.get_mut(id) else {
            return false;
        };
        if !card.notification().dismiss() {
            return false;
        }
        card.begin_removal(&mut self.timers, now, workspace)
    }

    pub fn click_card(&mut self, id: NotificationId) -> bool {
        self.cards
            .get_mut(id)
            .is_some_and(|card| card.click(&mut self.timers))
    }

    pub fn hover(&mut self, id: NotificationId, hovered: bool) {
        if let Some(card) = self.cards.get_mut(id) {
            card.set_hovered(hovered);
        }
    }

    pub fn focus(&mut self, id: NotificationId, focused: bool) {
        if let Some(card) = self.cards.get_mut(id) {
            card.set_focused(focused);
        }
    }

    /// "Close All": remove every card and dismiss the dismissable ones
    pub fn close_all(&mut self, now: Instant) {
        let workspace = self.host.workspace.as_ref();
        for card in self.cards.iter_mut() {
            card.notification().dismiss();
            card.begin_removal(&mut self.timers, now, workspace);
        }
    }

    pub fn toggle_stack(&mut self, id: NotificationId) {
        if let Some(card) = self.cards.get_mut(id) {
            card.toggle_stack();
        }
    }

    /// Run the callback of a notification button
    pub fn click_button(&mut self, id: NotificationId, index: usize) {
        let Some(card) = self.cards.get(id) else {
            return;
        };
        match card.notification().buttons().get(index) {
            Some(button) => button.click(),
            None => tracing::warn!("Notification {} has no button {}", id, index),
        }
    }

    /// Bring the notification of a log entry back to the popup area
    pub fn click_log_item(&mut self, id: NotificationId, now: Instant) -> bool {
        let Some(notification) = self.log.click(id) else {
            return false;
        };

        if let Some(card) = self.cards.get_mut(id) {
            card.resurrect(&mut self.timers);
            if !self.cards.is_attached(id) {
                self.cards.reattach(id);
            }
            return true;
        }

        // The card was evicted or never existed.
        let mut card = self.new_card(notification.clone());
        card.make_dismissable(&mut self.timers);
        notification.restore();
        notification.mark_displayed();
        card.show(false, &mut self.timers, now);
        self.cards.attach(card);
        true
    }

    pub fn click_counter(&mut self, now: Instant) {
        self.dispatch(TOGGLE_LOG_COMMAND, now);
    }

    pub fn counter_animation_end(&mut self, animation: &str) {
        self.counter.on_animation_end(animation);
    }

    pub fn toggle_log_type(&mut self, kind: NotificationType, force: Option<bool>) -> bool {
        self.log.toggle_type(kind, force)
    }

    fn fatal_issue(&self, id: NotificationId) -> Option<Arc<FatalIssue>> {
        self.cards.get(id).and_then(|card| card.fatal().cloned())
    }

    /// Issue button of a fatal card
    ///
    /// The first click starts the issue lookup. Later clicks act on what the
    /// lookup found and do nothing while it is still running. Cards without
    /// an issue button ignore the click.
    pub fn click_issue_button(&mut self, id: NotificationId) {
        let Some(card) = self.cards.get_mut(id) else {
            return;
        };
        let Some(issue) = card.fatal().cloned() else {
            return;
        };
        if !issue.cached_attribution().is_some_and(has_issue_button) {
            tracing::debug!("Notification {} has no issue button", id);
            return;
        }

        if card.request_issue_check() {
            self.jobs.push(Job::Inspect { issue, check: true });
            return;
        }

        match issue.diagnosis().map(|d| &d.remediation) {
            Some(Remediation::ViewIssue { url }) => self.host.workspace.open_external(url),
            Some(Remediation::UpdatePackage { .. }) => self.host.workspace.dispatch(CHECK_PACKAGE_UPDATES_COMMAND),
            Some(Remediation::ShadowedCorePackage { .. } | Remediation::UpdateApp { .. }) => {}
            Some(Remediation::CreateIssue) => self.jobs.push(Job::OpenIssueUrl { issue: issue.clone() }),
            None => tracing::debug!("Issue lookup for notification {} still running", id),
        }
    }

    pub fn click_copy_report(&mut self, id: NotificationId) {
        if let Some(issue) = self.fatal_issue(id) {
            self.jobs.push(Job::CopyReport { issue });
        }
    }

    /// Settings page of the package that threw
    pub fn click_open_settings(&mut self, id: NotificationId) {
        let package = self
            .fatal_issue(id)
            .and_then(|issue| issue.cached_attribution().and_then(|a| a.package_name.clone()));
        match package {
            Some(name) => self.host.workspace.open(&settings_uri(&name)),
            None => tracing::debug!("Notification {} has no package settings", id),
        }
    }

    /// Turn an uncaught editor error into a notification
    ///
    /// Returns true when a notification was shown for it.
    pub fn handle_uncaught_error(&mut self, error: &UncaughtError, now: Instant) -> bool {
        match classify(error, &self.settings) {
            UncaughtOutcome::Notify { kind, message, options } => {
                self.notify(kind, message, options, now);
                true
            }
            UncaughtOutcome::Drop | UncaughtOutcome::Ignore => false,
        }
    }

    /// Fire every timer due at `now`
    ///
    /// Each timer runs at its own deadline, so timers it schedules are
    /// measured from there and fire in the same call when due.
    pub fn advance_to(&mut self, now: Instant) {
        while let Some((deadline, kind)) = self.timers.pop_due(now) {
            match kind {
                TimerKind::Autohide(id) => {
                    let workspace = self.host.workspace.as_ref();
                    if let Some(card) = self.cards.get_mut(id) {
                        card.on_autohide(&mut self.timers, deadline, workspace);
                    }
                }
                TimerKind::Removal(id) => {
                    if let Some(card) = self.cards.get_mut(id) {
                        card.finish_removal();
                    }
                    self.cards.detach(id);
                }
                TimerKind::LogTick(id) => {
                    let wall = self.wall_time(deadline);
                    self.log.on_tick(id, &mut self.timers, deadline, wall);
                }
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Jobs queued since the last call
    pub fn take_jobs(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.jobs)
    }

    pub fn log_state(&self) -> LogState {
        self.log.serialize()
    }

    /// Apply one message
    pub fn update(&mut self, message: Message, now: Instant) {
        match message {
            Message::Notify { kind, message, options } => {
                self.notify(kind, message, options, now);
            }
            Message::Dismissed { id } => {
                self.dismiss(id, now);
            }
            Message::ClickCard { id } => {
                self.click_card(id);
            }
            Message::Hover { id, hovered } => self.hover(id, hovered),
            Message::Focus { id, focused } => self.focus(id, focused),
            Message::CloseAll => self.close_all(now),
            Message::ToggleStack { id } => self.toggle_stack(id),
            Message::ButtonClicked { id, index } => self.click_button(id, index),
            Message::ClickLogItem { id } => {
                self.click_log_item(id, now);
            }
            Message::ClickCounter => self.click_counter(now),
            Message::AnimationEnd { name } => self.counter_animation_end(&name),
            Message::ToggleLogType { kind, force } => {
                self.toggle_log_type(kind, force);
            }
            Message::ClickIssueButton { id } => self.click_issue_button(id),
            Message::CopyReport { id } => self.click_copy_report(id),
            Message::OpenSettings { id } => self.click_open_settings(id),
            Message::Command { name } => self.dispatch(&name, now),
            Message::UncaughtError(error) => {
                self.handle_uncaught_error(&error, now);
            }
            Message::Config(config) => {
                let settings = Settings::new(&config, self.settings.telemetry_consent, self.settings.dev_mode);
                self.update_settings(settings);
            }
            Message::DevMode { enabled } => {
                let settings = Settings {
                    dev_mode: enabled,
                    ..self.settings.clone()
                };
                self.update_settings(settings);
            }
        }
    }

    /// Everything the host should draw
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cards: render_cards(self.cards.visible()),
            log: self
                .log_open
                .then(|| render_log(&self.log, |id| self.cards.get(id))),
            counter: render_counter(&self.counter),
        }
    }
}
