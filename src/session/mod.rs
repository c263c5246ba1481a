//! Interactive session state machine.
//!
//! A [`Session`] owns every piece of UI state and is mutated only through
//! [`Session::handle_event`], one event at a time, by the thread that drives
//! it. Rendering reads the session but never changes it.

pub mod input;
pub mod keys;

use crate::catalog::{derive_catalog, CatalogWarning, Profile};
use crate::config::{load_config_document, ConfigDocument, Section};
use crate::filter::{filter_profiles, reconcile_selection};
use crate::promote::promote_profile;
use crate::shared::logging::EventLog;
use crate::watch::WatchSignal;
use crossterm::event::KeyEvent;
use input::{FilterInput, InputEdit};
use keys::{session_action_from_key, SessionAction};
use std::path::{Path, PathBuf};

pub const INFO_LINES: [&str; 2] = [
    "(info) You will see only [profile ...] sections on the list",
    "(info) Profile [default] is updated with chosen profile values",
];

// Rows taken by everything except the profile list on a typical layout.
const LIST_CHROME_ROWS: u16 = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    Reload,
    WatchError(String),
    InputFailed(String),
}

impl From<WatchSignal> for SessionEvent {
    fn from(signal: WatchSignal) -> Self {
        match signal {
            WatchSignal::Changed => SessionEvent::Reload,
            WatchSignal::Failed(reason) => SessionEvent::WatchError(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Running,
    Quitting,
}

/// What the driver has to do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    Continue,
    Resubscribe,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Cancelled,
    NothingSelected,
    Promoted { profile: String, keys_copied: usize },
    PromotionFailed { profile: String, error: String },
    Aborted { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug)]
pub struct Session {
    config_path: PathBuf,
    document: ConfigDocument,
    all_profiles: Vec<Profile>,
    warnings: Vec<CatalogWarning>,
    input: FilterInput,
    filtered: Vec<Profile>,
    selection: Option<usize>,
    terminal_size: (u16, u16),
    phase: SessionPhase,
    outcome: Option<SessionOutcome>,
    notice: Option<Notice>,
    show_info: bool,
    log: EventLog,
}

impl Session {
    pub fn new(config_path: impl Into<PathBuf>, document: ConfigDocument, log: EventLog) -> Self {
        let catalog = derive_catalog(&document);
        let filtered = catalog.profiles.clone();
        let selection = reconcile_selection(&filtered, None);
        let session = Self {
            config_path: config_path.into(),
            document,
            all_profiles: catalog.profiles,
            warnings: catalog.warnings,
            input: FilterInput::default(),
            filtered,
            selection,
            terminal_size: (80, 24),
            phase: SessionPhase::Running,
            outcome: None,
            notice: None,
            show_info: true,
            log,
        };
        session.log.info(
            "session_started",
            &format!(
                "{} profiles loaded from {}",
                session.all_profiles.len(),
                session.config_path.display()
            ),
        );
        session.log_warnings();
        session
    }

    pub fn with_info_lines(mut self, show_info: bool) -> Self {
        self.show_info = show_info;
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.all_profiles
    }

    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    pub fn input(&self) -> &FilterInput {
        &self.input
    }

    pub fn query(&self) -> &str {
        self.input.value()
    }

    pub fn filtered(&self) -> &[Profile] {
        &self.filtered
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected_profile(&self) -> Option<&Profile> {
        self.selection.and_then(|index| self.filtered.get(index))
    }

    pub fn selected_section(&self) -> Option<&Section> {
        self.selected_profile()
            .and_then(|profile| self.document.section(&profile.section_name()))
    }

    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_quitting(&self) -> bool {
        self.phase == SessionPhase::Quitting
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn show_info(&self) -> bool {
        self.show_info
    }

    pub fn page_size(&self) -> usize {
        usize::from(self.terminal_size.1.saturating_sub(LIST_CHROME_ROWS)).max(1)
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> SessionEffect {
        if self.is_quitting() {
            return SessionEffect::Quit;
        }
        match event {
            SessionEvent::Key(key) => match session_action_from_key(key) {
                Some(action) => self.handle_action(action),
                None => SessionEffect::Continue,
            },
            SessionEvent::Resize { width, height } => {
                self.terminal_size = (width, height);
                SessionEffect::Continue
            }
            SessionEvent::Reload => self.reload(),
            SessionEvent::WatchError(reason) => {
                self.log.error("watch_error", &reason);
                self.set_notice(
                    NoticeLevel::Error,
                    format!("watching stopped until the next reload: {reason}"),
                );
                SessionEffect::Continue
            }
            SessionEvent::InputFailed(reason) => {
                self.log.error("input_failed", &reason);
                self.finish(SessionOutcome::Aborted { reason })
            }
        }
    }

    fn handle_action(&mut self, action: SessionAction) -> SessionEffect {
        match action {
            SessionAction::Cancel => {
                self.log.info("session_cancelled", "no changes written");
                self.finish(SessionOutcome::Cancelled)
            }
            SessionAction::Confirm => self.confirm(),
            SessionAction::MoveUp => self.move_selection(-1),
            SessionAction::MoveDown => self.move_selection(1),
            SessionAction::PageUp => self.move_selection(-page_delta(self.page_size())),
            SessionAction::PageDown => self.move_selection(page_delta(self.page_size())),
            SessionAction::Edit(edit) => self.edit_query(edit),
        }
    }

    fn confirm(&mut self) -> SessionEffect {
        let Some(profile) = self.selected_profile().map(|p| p.name().to_string()) else {
            self.log.info("session_cancelled", "confirmed with no profile selected");
            return self.finish(SessionOutcome::NothingSelected);
        };
        let outcome = match promote_profile(&mut self.document, &profile, &self.config_path) {
            Ok(keys_copied) => {
                self.log.info(
                    "profile_promoted",
                    &format!(
                        "copied {keys_copied} keys from [profile {profile}] into [default] in {}",
                        self.config_path.display()
                    ),
                );
                SessionOutcome::Promoted {
                    profile,
                    keys_copied,
                }
            }
            Err(err) => {
                self.log.error("promotion_failed", &err.to_string());
                SessionOutcome::PromotionFailed {
                    profile,
                    error: err.to_string(),
                }
            }
        };
        self.finish(outcome)
    }

    fn move_selection(&mut self, delta: isize) -> SessionEffect {
        if self.filtered.is_empty() {
            self.selection = None;
            return SessionEffect::Continue;
        }
        let last = self.filtered.len() - 1;
        let current = self.selection.unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.selection = Some(next);
        SessionEffect::Continue
    }

    fn edit_query(&mut self, edit: InputEdit) -> SessionEffect {
        if self.input.apply(edit) {
            self.filtered = filter_profiles(&self.all_profiles, self.input.value());
            self.selection = reconcile_selection(&self.filtered, self.selection);
        }
        SessionEffect::Continue
    }

    fn reload(&mut self) -> SessionEffect {
        match load_config_document(&self.config_path) {
            Ok(document) => {
                let catalog = derive_catalog(&document);
                self.document = document;
                self.all_profiles = catalog.profiles;
                self.warnings = catalog.warnings;
                self.filtered = filter_profiles(&self.all_profiles, self.input.value());
                self.selection = if self.filtered.is_empty() {
                    None
                } else {
                    Some(0)
                };
                let message = format!(
                    "reloaded {} profiles from {}",
                    self.all_profiles.len(),
                    self.config_path.display()
                );
                self.log.info("config_reloaded", &message);
                self.log_warnings();
                self.set_notice(NoticeLevel::Info, message);
            }
            Err(err) => {
                self.log.error("config_reload_failed", &err.to_string());
                self.set_notice(
                    NoticeLevel::Error,
                    format!("reload failed, keeping previous profiles: {err}"),
                );
            }
        }
        SessionEffect::Resubscribe
    }

    fn finish(&mut self, outcome: SessionOutcome) -> SessionEffect {
        self.outcome = Some(outcome);
        self.phase = SessionPhase::Quitting;
        SessionEffect::Quit
    }

    fn set_notice(&mut self, level: NoticeLevel, text: String) {
        self.notice = Some(Notice { level, text });
    }

    fn log_warnings(&self) {
        for warning in &self.warnings {
            self.log.warn("catalog_warning", &warning.to_string());
        }
    }
}

fn page_delta(page_size: usize) -> isize {
    isize::try_from(page_size).unwrap_or(isize::MAX)
}
