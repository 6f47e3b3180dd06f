use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Doctor Dashboard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable scaling every simulated delay (0 disables latency).
pub const LATENCY_SCALE_ENV: &str = "DASHBOARD_LATENCY_SCALE";

/// Minimum query length before quick search returns anything.
pub const SEARCH_MIN_QUERY_LEN: usize = 2;

/// Fallback tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "doctor_dashboard_lib=info,doctor_dashboard=info"
}

// ═══════════════════════════════════════════════════════════
// DashboardConfig: simulated latency and toast durations
// ═══════════════════════════════════════════════════════════

/// All artificial delays of the dashboard.
///
/// Defaults match the timings the demo UI was tuned with. Every field is
/// a plain `Duration` so tests can shrink them or rely on paused tokio time.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// AuthGate: `authenticating -> authenticated`.
    pub auth_verify_delay: Duration,
    /// Pause on the success screen before the progress overlay.
    pub auth_success_hold: Duration,
    /// Base duration of one progress step.
    pub progress_step: Duration,
    /// Upper bound of random jitter added to each progress step.
    pub progress_jitter: Duration,
    /// Loading pulse shown by a freshly constructed dashboard.
    pub dashboard_load_delay: Duration,
    /// Simulated modal save round-trip.
    pub modal_save_latency: Duration,
    /// Panel fade between tabs.
    pub tab_transition: Duration,
    /// Default toast lifetime.
    pub toast_duration: Duration,
    /// Lifetime of the "Dashboard Ready" and welcome toasts.
    pub ready_toast_duration: Duration,
    /// Gap between "Dashboard Ready" and the welcome toast.
    pub welcome_delay: Duration,
    /// Delay before a FAB shortcut performs its follow-up action.
    pub fab_followup_delay: Duration,
    /// Whether the scripted demo alerts are scheduled after boot.
    pub demo_alerts: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            auth_verify_delay: Duration::from_millis(800),
            auth_success_hold: Duration::from_millis(1200),
            progress_step: Duration::from_millis(800),
            progress_jitter: Duration::from_millis(400),
            dashboard_load_delay: Duration::from_millis(800),
            modal_save_latency: Duration::from_millis(1000),
            tab_transition: Duration::from_millis(150),
            toast_duration: Duration::from_millis(5000),
            ready_toast_duration: Duration::from_millis(3000),
            welcome_delay: Duration::from_millis(500),
            fab_followup_delay: Duration::from_millis(500),
            demo_alerts: true,
        }
    }
}

impl DashboardConfig {
    /// Scale every simulated delay by `factor`. Toast durations are kept,
    /// since they are display time rather than latency.
    pub fn scaled(&self, factor: f64) -> Self {
        // Duration::mul_f64 panics on negative or overflowing results.
        let factor = if factor.is_finite() { factor.clamp(0.0, 1000.0) } else { 1.0 };
        let scale = |d: Duration| d.mul_f64(factor);
        Self {
            auth_verify_delay: scale(self.auth_verify_delay),
            auth_success_hold: scale(self.auth_success_hold),
            progress_step: scale(self.progress_step),
            progress_jitter: scale(self.progress_jitter),
            dashboard_load_delay: scale(self.dashboard_load_delay),
            modal_save_latency: scale(self.modal_save_latency),
            tab_transition: scale(self.tab_transition),
            toast_duration: self.toast_duration,
            ready_toast_duration: self.ready_toast_duration,
            welcome_delay: scale(self.welcome_delay),
            fab_followup_delay: scale(self.fab_followup_delay),
            demo_alerts: self.demo_alerts,
        }
    }

    /// Defaults, scaled by `DASHBOARD_LATENCY_SCALE` when set.
    pub fn from_env() -> Self {
        let base = Self::default();
        match std::env::var(LATENCY_SCALE_ENV) {
            Ok(raw) => match raw.trim().parse::<f64>() {
                Ok(factor) => base.scaled(factor),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "Ignoring invalid {LATENCY_SCALE_ENV}");
                    base
                }
            },
            Err(_) => base,
        }
    }
}
