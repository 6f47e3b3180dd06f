//! Tabbed record panels: exactly one tab is active at any time.
//!
//! A click starts a short transition toward a pending tab. Every click bumps
//! a generation, and a transition only lands if no click came after it.

use serde::Serialize;

use crate::models::TabId;
use crate::notifications::NotificationQueue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabController {
    active: TabId,
    pending: Option<TabId>,
    #[serde(skip)]
    generation: u64,
}

/// A requested tab change, valid until the next click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabTransition {
    tab: TabId,
    generation: u64,
}

impl TabTransition {
    pub fn tab(&self) -> TabId {
        self.tab
    }
}

impl Default for TabController {
    fn default() -> Self {
        Self::new()
    }
}

impl TabController {
    /// Starts on the first declared tab.
    pub fn new() -> Self {
        Self {
            active: TabId::ALL[0],
            pending: None,
            generation: 0,
        }
    }

    pub fn active(&self) -> TabId {
        self.active
    }

    pub fn is_active(&self, tab: TabId) -> bool {
        self.active == tab
    }

    /// Bumped by every click that changes where the panel is heading.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Tab a transition is currently heading to.
    pub fn pending(&self) -> Option<TabId> {
        self.pending
    }

    /// Record a click on `tab`.
    ///
    /// Returns the transition to complete later, or None when `tab` is
    /// already where the panel is heading. Clicking back to the active tab
    /// mid-transition cancels the pending one.
    pub fn request(&mut self, tab: TabId) -> Option<TabTransition> {
        if self.pending.unwrap_or(self.active) == tab {
            return None;
        }
        self.generation += 1;
        if self.active == tab {
            tracing::debug!(tab = %tab, "Pending tab transition cancelled");
            self.pending = None;
            return None;
        }
        self.pending = Some(tab);
        Some(TabTransition {
            tab,
            generation: self.generation,
        })
    }

    /// Land `transition` unless a later click superseded it.
    pub fn complete(&mut self, transition: TabTransition, notifications: &NotificationQueue) -> bool {
        if transition.generation != self.generation || self.pending != Some(transition.tab) {
            tracing::debug!(tab = %transition.tab, "Stale tab transition dropped");
            return false;
        }
        self.pending = None;
        self.switch_to(transition.tab, notifications)
    }

    /// Activate `tab` and announce it. Returns false when `tab` was already
    /// active, in which case nothing happens.
    pub fn switch_to(&mut self, tab: TabId, notifications: &NotificationQueue) -> bool {
        if self.active == tab {
            return false;
        }
        let previous = std::mem::replace(&mut self.active, tab);
        tracing::info!(from = %previous, to = %tab, "Tab switched");
        notifications.info(tab.label(), &format!("Switched to {tab} view"));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::clock::FixedClock;

    fn notifications() -> NotificationQueue {
        NotificationQueue::new(
            Arc::new(FixedClock::on(2025, 9, 18).unwrap()),
            Duration::from_millis(5000),
        )
    }

    #[test]
    fn starts_on_prescriptions() {
        let tabs = TabController::new();
        assert_eq!(tabs.active(), TabId::Prescriptions);
        assert!(tabs.is_active(TabId::Prescriptions));
    }

    #[test]
    fn switch_changes_active_and_notifies() {
        let queue = notifications();
        let mut tabs = TabController::new();

        assert!(tabs.switch_to(TabId::Notes, &queue));
        assert_eq!(tabs.active(), TabId::Notes);

        let log = queue.log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].message, "Switched to notes view");
        assert_eq!(log[0].title, "Clinical Notes");
    }

    #[test]
    fn switching_twice_to_same_tab_is_a_noop_the_second_time() {
        let queue = notifications();
        let mut tabs = TabController::new();

        assert!(tabs.switch_to(TabId::Labs, &queue));
        assert!(!tabs.switch_to(TabId::Labs, &queue));
        assert_eq!(tabs.active(), TabId::Labs);
        assert_eq!(queue.log_len(), 1);
    }

    #[test]
    fn switching_to_active_tab_emits_nothing() {
        let queue = notifications();
        let mut tabs = TabController::new();
        assert!(!tabs.switch_to(TabId::Prescriptions, &queue));
        assert_eq!(queue.log_len(), 0);
    }

    #[test]
    fn later_click_supersedes_pending_transition() {
        let queue = notifications();
        let mut tabs = TabController::new();

        let labs = tabs.request(TabId::Labs).unwrap();
        let visits = tabs.request(TabId::Visits).unwrap();
        assert_eq!(tabs.pending(), Some(TabId::Visits));

        assert!(!tabs.complete(labs, &queue));
        assert_eq!(tabs.active(), TabId::Prescriptions);
        assert!(tabs.complete(visits, &queue));
        assert_eq!(tabs.active(), TabId::Visits);
        assert_eq!(tabs.pending(), None);
        assert_eq!(queue.log_len(), 1);
    }

    #[test]
    fn clicking_back_to_active_tab_cancels_transition() {
        let queue = notifications();
        let mut tabs = TabController::new();

        let labs = tabs.request(TabId::Labs).unwrap();
        assert!(tabs.request(TabId::Prescriptions).is_none());
        assert_eq!(tabs.pending(), None);

        assert!(!tabs.complete(labs, &queue));
        assert_eq!(tabs.active(), TabId::Prescriptions);
        assert_eq!(queue.log_len(), 0);
    }

    #[test]
    fn repeated_click_on_pending_tab_keeps_first_transition() {
        let queue = notifications();
        let mut tabs = TabController::new();

        let first = tabs.request(TabId::Notes).unwrap();
        assert!(tabs.request(TabId::Notes).is_none());
        assert!(tabs.complete(first, &queue));
        assert_eq!(tabs.active(), TabId::Notes);
    }

    #[test]
    fn exactly_one_tab_active_after_any_sequence() {
        let queue = notifications();
        let mut tabs = TabController::new();
        for tab in [TabId::Visits, TabId::Contacts, TabId::Visits, TabId::Vaccinations] {
            tabs.switch_to(tab, &queue);
            let active: Vec<&TabId> = TabId::ALL.iter().filter(|t| tabs.is_active(**t)).collect();
            assert_eq!(active, vec![&tab]);
        }
    }
}
