//! Boot sequence: login, progress overlay, dashboard construction and the
//! scripted demo alerts.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::auth::AuthGate;
use crate::config::DashboardConfig;
use crate::dashboard::{Collaborators, DashboardController};
use crate::error::DashboardError;
use crate::models::NotificationKind;
use crate::notifications::NotificationQueue;
use crate::progress::ProgressTracker;

pub const LOADING_STEPS: [&str; 4] = [
    "Authenticating credentials...",
    "Loading patient database...",
    "Initializing dashboard...",
    "Ready!",
];

const HEALTH_ALERT_AFTER: Duration = Duration::from_secs(8);
const HEALTH_ALERT_DURATION: Duration = Duration::from_millis(6000);
const LAB_RESULTS_AFTER: Duration = Duration::from_secs(15);
const LAB_RESULTS_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub id: String,
    pub password: String,
}

impl Credentials {
    pub fn new(id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            password: password.into(),
        }
    }
}

/// A booted dashboard. Dropping it cancels pending demo alerts.
pub struct Session {
    pub dashboard: DashboardController,
    pub progress: ProgressTracker,
    user_id: String,
    demo_alerts: Vec<JoinHandle<()>>,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        for task in &self.demo_alerts {
            task.abort();
        }
    }
}

/// Log in and bring up the dashboard.
///
/// Fails immediately with a validation error when either credential is
/// empty; otherwise every credential pair is accepted.
pub async fn boot(
    config: DashboardConfig,
    credentials: &Credentials,
    collaborators: Collaborators,
) -> Result<Session, DashboardError> {
    let notifications = NotificationQueue::new(collaborators.clock.clone(), config.toast_duration);

    let (user_tx, user_rx) = oneshot::channel();
    let gate = AuthGate::new(config.auth_verify_delay, move |user_id| {
        let _ = user_tx.send(user_id);
    });
    gate.submit(&credentials.id, &credentials.password)?;
    let user_id = user_rx.await.map_err(|_| DashboardError::AuthIncomplete)?;
    tracing::info!(user_id = %user_id, "Signed in, initializing dashboard");

    tokio::time::sleep(config.auth_success_hold).await;

    let mut progress = ProgressTracker::new();
    progress.show("Loading Health Dashboard", "Preparing your medical workspace...");
    progress
        .simulate(&LOADING_STEPS, config.progress_step, config.progress_jitter)
        .await;

    let mut dashboard = DashboardController::new(config.clone(), notifications.clone(), collaborators);
    dashboard.run_for(config.welcome_delay).await;
    notifications.push(
        NotificationKind::Info,
        "Welcome Doctor!",
        "Dashboard initialized successfully. All systems are operational.",
        config.ready_toast_duration,
    );
    let demo_alerts = if config.demo_alerts {
        schedule_demo_alerts(&notifications)
    } else {
        Vec::new()
    };

    progress.hide();
    notifications.push(
        NotificationKind::Success,
        "Dashboard Ready",
        "Your medical dashboard is ready for use.",
        config.ready_toast_duration,
    );
    tracing::info!("Boot complete");

    Ok(Session {
        dashboard,
        progress,
        user_id,
        demo_alerts,
    })
}

fn schedule_demo_alerts(notifications: &NotificationQueue) -> Vec<JoinHandle<()>> {
    let alert = |after: Duration, kind, title: &'static str, message: &'static str, duration| {
        let notifications = notifications.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            notifications.push(kind, title, message, duration);
        })
    };
    vec![
        alert(
            HEALTH_ALERT_AFTER,
            NotificationKind::Warning,
            "Health Alert",
            "Patient vitals require attention in Room 204.",
            HEALTH_ALERT_DURATION,
        ),
        alert(
            LAB_RESULTS_AFTER,
            NotificationKind::Success,
            "Lab Results",
            "New blood test results available for Patient ID: WRK001.",
            LAB_RESULTS_DURATION,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::alerts::TracingAlertSink;
    use crate::analytics::TracingChartRenderer;
    use crate::clock::FixedClock;
    use crate::error::ValidationError;

    fn collaborators() -> Collaborators {
        Collaborators {
            clock: Arc::new(FixedClock::on(2025, 9, 18).unwrap()),
            charts: Arc::new(TracingChartRenderer),
            alerts: Arc::new(TracingAlertSink),
        }
    }

    fn titles(session: &Session) -> Vec<String> {
        session
            .dashboard
            .notifications()
            .log()
            .into_iter()
            .map(|n| n.title)
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn boot_runs_the_whole_sequence() {
        let start = tokio::time::Instant::now();
        let session = boot(
            DashboardConfig::default(),
            &Credentials::new("a", "b"),
            collaborators(),
        )
        .await
        .unwrap();

        // 800 auth + 1200 hold + 4 x (800..=1200) progress + 500 welcome
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(5700), "{elapsed:?}");
        assert!(elapsed <= Duration::from_millis(7300), "{elapsed:?}");

        assert_eq!(session.user_id(), "a");
        assert!(!session.progress.is_visible());
        assert_eq!(session.progress.percentage_label(), "100%");
        assert_eq!(session.progress.description(), "Ready!");

        let titles = titles(&session);
        assert_eq!(titles[0], "Dashboard Ready");
        assert_eq!(titles[1], "Welcome Doctor!");
        assert!(titles.contains(&"System Ready".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn dashboard_finishes_loading_after_boot() {
        let mut session = boot(
            DashboardConfig::default(),
            &Credentials::new("DR001", "pw"),
            collaborators(),
        )
        .await
        .unwrap();
        assert!(session.dashboard.is_loading());

        session.dashboard.run_for(Duration::from_millis(301)).await;
        assert!(!session.dashboard.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_credentials_fail_fast() {
        let start = tokio::time::Instant::now();
        let result = boot(DashboardConfig::default(), &Credentials::new(" ", "b"), collaborators()).await;
        match result {
            Err(DashboardError::Validation(ValidationError { reason, .. })) => {
                assert_eq!(reason, "Please enter both ID and password.");
            }
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(_) => panic!("boot should fail"),
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn demo_alerts_fire_on_schedule() {
        let mut session = boot(
            DashboardConfig::default(),
            &Credentials::new("a", "b"),
            collaborators(),
        )
        .await
        .unwrap();

        session.dashboard.run_for(Duration::from_millis(7900)).await;
        assert!(!titles(&session).contains(&"Health Alert".to_string()));

        session.dashboard.run_for(Duration::from_millis(200)).await;
        assert_eq!(titles(&session)[0], "Health Alert");

        session.dashboard.run_for(Duration::from_secs(7)).await;
        assert_eq!(titles(&session)[0], "Lab Results");
    }

    #[tokio::test(start_paused = true)]
    async fn demo_alerts_can_be_disabled() {
        let config = DashboardConfig {
            demo_alerts: false,
            ..DashboardConfig::default()
        };
        let mut session = boot(config, &Credentials::new("a", "b"), collaborators())
            .await
            .unwrap();
        session.dashboard.run_for(Duration::from_secs(20)).await;
        let titles = titles(&session);
        assert!(!titles.contains(&"Health Alert".to_string()));
        assert!(!titles.contains(&"Lab Results".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_latency_boot_is_instant() {
        let start = tokio::time::Instant::now();
        let config = DashboardConfig::default().scaled(0.0);
        boot(config, &Credentials::new("a", "b"), collaborators())
            .await
            .unwrap();
        assert!(start.elapsed() < Duration::from_millis(1));
    }
}
