//! Floating action button menu.
//!
//! `trigger` is pure: it closes the menu and describes what should happen.
//! The dashboard applies the effect, scheduling deferred follow-ups.

use serde::Serialize;

use crate::models::{FabAction, ModalKind, NotificationKind, TabId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FabNotice {
    pub kind: NotificationKind,
    pub title: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "target", rename_all = "snake_case")]
pub enum FabFollowup {
    OpenModal(ModalKind),
    SwitchTab(TabId),
    OpenSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FabEffect {
    pub notice: Option<FabNotice>,
    pub followup: Option<FabFollowup>,
    /// Run the follow-up after the configured delay instead of immediately.
    pub deferred: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FabMenu {
    open: bool,
}

impl FabMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Main button icon.
    pub fn icon(&self) -> &'static str {
        if self.open {
            "fa-times"
        } else {
            "fa-plus"
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn trigger(&mut self, action: FabAction) -> FabEffect {
        self.close();
        tracing::info!(action = %action, "FAB action");

        let notice = |kind, title, message| Some(FabNotice { kind, title, message });
        match action {
            FabAction::Emergency => FabEffect {
                notice: notice(
                    NotificationKind::Emergency,
                    "Emergency Alert",
                    "Emergency protocol activated for current patient",
                ),
                followup: None,
                deferred: false,
            },
            FabAction::Prescription => FabEffect {
                notice: notice(
                    NotificationKind::Success,
                    "Quick Prescription",
                    "Opening prescription form...",
                ),
                followup: Some(FabFollowup::OpenModal(ModalKind::Prescription)),
                deferred: true,
            },
            FabAction::Notes => FabEffect {
                notice: notice(NotificationKind::Info, "Add Notes", "Opening notes section..."),
                followup: Some(FabFollowup::SwitchTab(TabId::Notes)),
                deferred: true,
            },
            FabAction::Appointment => FabEffect {
                notice: notice(
                    NotificationKind::Info,
                    "Schedule Appointment",
                    "Opening appointment scheduler...",
                ),
                followup: None,
                deferred: false,
            },
            FabAction::Search => FabEffect {
                notice: None,
                followup: Some(FabFollowup::OpenSearch),
                deferred: false,
            },
        }
    }
}
