//! Toast notifications and the persistent notification log.
//!
//! `NotificationQueue` is a cheap cloneable handle; every controller that
//! needs to notify gets one injected. Each toast owns its own expiry task,
//! so toasts vanish independently. The log is only emptied by `clear_log`.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::DashboardError;
use crate::models::NotificationKind;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToastId(pub u64);

/// One notification, as stored in the log and carried by a toast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

impl Notification {
    /// Log timestamp, e.g. "14:05".
    pub fn time_label(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}

/// A visible, auto-expiring notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub id: ToastId,
    pub notification: Notification,
    pub duration_ms: u64,
}

#[derive(Debug, Default)]
struct QueueState {
    next_id: u64,
    /// Oldest first, matching on-screen stacking.
    toasts: Vec<Toast>,
    /// Newest first.
    log: Vec<Notification>,
    log_visible: bool,
}

// ═══════════════════════════════════════════════════════════
// NotificationQueue
// ═══════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct NotificationQueue {
    state: Arc<Mutex<QueueState>>,
    clock: Arc<dyn Clock>,
    default_duration: Duration,
}

impl NotificationQueue {
    pub fn new(clock: Arc<dyn Clock>, default_duration: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState::default())),
            clock,
            default_duration,
        }
    }

    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Show a toast for `duration` and record it in the log.
    ///
    /// Expiry runs on the current tokio runtime. Outside a runtime the toast
    /// stays until dismissed.
    pub fn push(
        &self,
        kind: NotificationKind,
        title: &str,
        message: &str,
        duration: Duration,
    ) -> ToastId {
        let notification = Notification {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            created_at: self.clock.now(),
        };

        let id = match self.state.lock() {
            Ok(mut state) => {
                state.next_id += 1;
                let id = ToastId(state.next_id);
                state.log.insert(0, notification.clone());
                state.toasts.push(Toast {
                    id,
                    notification,
                    duration_ms: duration.as_millis() as u64,
                });
                id
            }
            Err(_) => {
                tracing::error!("Notification state lock poisoned, dropping toast");
                return ToastId(0);
            }
        };

        tracing::debug!(toast = id.0, kind = %kind, title, "Toast shown");
        self.schedule_expiry(id, duration);
        id
    }

    pub fn success(&self, title: &str, message: &str) -> ToastId {
        self.push(NotificationKind::Success, title, message, self.default_duration)
    }

    pub fn info(&self, title: &str, message: &str) -> ToastId {
        self.push(NotificationKind::Info, title, message, self.default_duration)
    }

    pub fn warning(&self, title: &str, message: &str) -> ToastId {
        self.push(NotificationKind::Warning, title, message, self.default_duration)
    }

    /// Emergencies share the default timing; they are never rate limited.
    pub fn emergency(&self, title: &str, message: &str) -> ToastId {
        self.push(NotificationKind::Emergency, title, message, self.default_duration)
    }

    /// Add a log entry without showing a toast.
    pub fn log_only(&self, kind: NotificationKind, title: &str, message: &str) {
        let notification = Notification {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            created_at: self.clock.now(),
        };
        if let Ok(mut state) = self.state.lock() {
            state.log.insert(0, notification);
        }
    }

    /// Entries present when the dashboard first opens.
    pub fn seed_initial_log(&self, patient_name: &str) {
        self.log_only(
            NotificationKind::Info,
            "System Ready",
            "Doctor dashboard loaded successfully",
        );
        self.log_only(
            NotificationKind::Info,
            "Patient Loaded",
            &format!("{patient_name}'s medical records loaded"),
        );
    }

    /// Remove a toast before it expires. Returns false if it was already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        remove_toast(&self.state, id)
    }

    /// Visible toasts, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.state
            .lock()
            .map(|state| state.toasts.clone())
            .unwrap_or_default()
    }

    /// Log entries, newest first.
    pub fn log(&self) -> Vec<Notification> {
        self.state
            .lock()
            .map(|state| state.log.clone())
            .unwrap_or_default()
    }

    pub fn log_len(&self) -> usize {
        self.state.lock().map(|state| state.log.len()).unwrap_or(0)
    }

    /// Empty the log ("clear all"), then record that it was cleared.
    pub fn clear_log(&self) -> Result<(), DashboardError> {
        self.state
            .lock()
            .map_err(|_| DashboardError::LockPoisoned)?
            .log
            .clear();
        self.info("Cleared", "All notifications cleared");
        Ok(())
    }

    pub fn show_log(&self) {
        self.set_log_visible(true);
    }

    pub fn hide_log(&self) {
        self.set_log_visible(false);
    }

    pub fn is_log_visible(&self) -> bool {
        self.state.lock().map(|state| state.log_visible).unwrap_or(false)
    }

    // ── Internal ────────────────────────────────────────────

    fn set_log_visible(&self, visible: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.log_visible = visible;
        }
    }

    fn schedule_expiry(&self, id: ToastId, duration: Duration) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(toast = id.0, "No tokio runtime, toast will not auto-expire");
                return;
            }
        };

        // Deadline is fixed now, not when the task is first polled.
        let deadline = tokio::time::Instant::now() + duration;
        let state: Weak<Mutex<QueueState>> = Arc::downgrade(&self.state);
        handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(state) = state.upgrade() {
                if remove_toast(&state, id) {
                    tracing::debug!(toast = id.0, "Toast expired");
                }
            }
        });
    }
}

fn remove_toast(state: &Mutex<QueueState>, id: ToastId) -> bool {
    match state.lock() {
        Ok(mut state) => {
            let before = state.toasts.len();
            state.toasts.retain(|t| t.id != id);
            state.toasts.len() != before
        }
        Err(_) => false,
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn queue() -> NotificationQueue {
        NotificationQueue::new(
            Arc::new(FixedClock::on(2025, 9, 18).unwrap()),
            Duration::from_millis(5000),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn push_shows_toast_and_logs() {
        let q = queue();
        let id = q.push(NotificationKind::Info, "Title", "Message", Duration::from_millis(5000));

        let toasts = q.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].id, id);
        assert_eq!(toasts[0].notification.title, "Title");
        assert_eq!(toasts[0].duration_ms, 5000);
        assert_eq!(q.log_len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn toast_expires_after_its_duration_and_log_survives() {
        let q = queue();
        let id = q.push(NotificationKind::Success, "Saved", "ok", Duration::from_millis(5000));

        tokio::time::advance(Duration::from_millis(4999)).await;
        assert!(q.toasts().iter().any(|t| t.id == id));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(q.toasts().is_empty());
        assert_eq!(q.log_len(), 1);
        assert_eq!(q.log()[0].title, "Saved");
    }

    #[tokio::test(start_paused = true)]
    async fn each_toast_owns_its_timer() {
        let q = queue();
        let short = q.push(NotificationKind::Info, "short", "", Duration::from_millis(1000));
        let long = q.push(NotificationKind::Info, "long", "", Duration::from_millis(3000));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let ids: Vec<ToastId> = q.toasts().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![long]);
        assert!(!ids.contains(&short));

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(q.toasts().is_empty());
        assert_eq!(q.log_len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_removes_early_and_expiry_is_harmless() {
        let q = queue();
        let id = q.info("a", "b");
        assert!(q.dismiss(id));
        assert!(!q.dismiss(id));
        assert!(q.toasts().is_empty());

        tokio::time::sleep(Duration::from_millis(6000)).await;
        assert_eq!(q.log_len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn log_is_newest_first() {
        let q = queue();
        q.info("first", "");
        q.warning("second", "");
        let log = q.log();
        assert_eq!(log[0].title, "second");
        assert_eq!(log[0].kind, NotificationKind::Warning);
        assert_eq!(log[1].title, "first");
    }

    #[tokio::test(start_paused = true)]
    async fn clear_log_leaves_only_cleared_entry() {
        let q = queue();
        q.seed_initial_log("Rajesh Kumar");
        q.success("x", "y");
        assert_eq!(q.log_len(), 3);

        q.clear_log().unwrap();
        let log = q.log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].title, "Cleared");
        assert_eq!(log[0].message, "All notifications cleared");
    }

    #[test]
    fn seed_initial_log_does_not_toast() {
        let q = queue();
        q.seed_initial_log("Rajesh Kumar");
        assert!(q.toasts().is_empty());
        let log = q.log();
        assert_eq!(log[0].title, "Patient Loaded");
        assert_eq!(log[0].message, "Rajesh Kumar's medical records loaded");
        assert_eq!(log[1].title, "System Ready");
    }

    #[test]
    fn push_without_runtime_keeps_toast() {
        let q = queue();
        q.emergency("Emergency Alert", "Protocol activated");
        assert_eq!(q.toasts().len(), 1);
        assert_eq!(q.toasts()[0].notification.kind, NotificationKind::Emergency);
    }

    #[test]
    fn log_panel_visibility() {
        let q = queue();
        assert!(!q.is_log_visible());
        q.show_log();
        assert!(q.is_log_visible());
        q.hide_log();
        assert!(!q.is_log_visible());
    }

    #[test]
    fn time_label_uses_clock() {
        let q = queue();
        q.log_only(NotificationKind::Info, "t", "m");
        assert_eq!(q.log()[0].time_label(), "09:30");
    }

    #[test]
    fn clones_share_state() {
        let q = queue();
        let other = q.clone();
        other.log_only(NotificationKind::Info, "t", "m");
        assert_eq!(q.log_len(), 1);
    }
}
