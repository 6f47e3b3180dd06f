//! Full-screen progress overlay shown while the dashboard boots.

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressTracker {
    visible: bool,
    title: String,
    description: String,
    percent: f64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the overlay and reset to 0%.
    pub fn show(&mut self, title: &str, description: &str) {
        self.visible = true;
        self.title = title.to_string();
        self.description = description.to_string();
        self.set_progress(0.0);
        tracing::debug!(title, "Progress overlay shown");
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Clamped to 0..=100.
    pub fn set_progress(&mut self, percent: f64) {
        self.percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
    }

    pub fn increment(&mut self, amount: f64) {
        self.set_progress(self.percent + amount);
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// "67%"
    pub fn percentage_label(&self) -> String {
        format!("{}%", self.percent.round() as u32)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Walk through `steps`, showing each description with
    /// `(i + 1) * 100 / n` percent, then pausing `step` plus up to `jitter`.
    pub async fn simulate(&mut self, steps: &[&str], step: Duration, jitter: Duration) {
        let total = steps.len() as f64;
        for (i, description) in steps.iter().enumerate() {
            self.set_progress((i + 1) as f64 * 100.0 / total);
            self.description = description.to_string();
            tracing::debug!(step = i + 1, of = steps.len(), description, "Progress step");
            tokio::time::sleep(step + random_jitter(jitter)).await;
        }
    }
}

fn random_jitter(max: Duration) -> Duration {
    use rand::Rng;
    let max_ms = max.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    let mut rng = rand::thread_rng();
    Duration::from_millis(rng.gen_range(0..=max_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_resets_progress() {
        let mut p = ProgressTracker::new();
        p.set_progress(60.0);
        p.show("Loading Health Dashboard", "Preparing your medical workspace...");
        assert!(p.is_visible());
        assert_eq!(p.percent(), 0.0);
        assert_eq!(p.percentage_label(), "0%");
        assert_eq!(p.title(), "Loading Health Dashboard");
    }

    #[test]
    fn progress_is_clamped() {
        let mut p = ProgressTracker::new();
        p.set_progress(150.0);
        assert_eq!(p.percent(), 100.0);
        p.set_progress(-5.0);
        assert_eq!(p.percent(), 0.0);
        p.set_progress(f64::NAN);
        assert_eq!(p.percent(), 0.0);
    }

    #[test]
    fn increment_accumulates_and_clamps() {
        let mut p = ProgressTracker::new();
        p.increment(10.0);
        p.increment(10.0);
        assert_eq!(p.percentage_label(), "20%");
        p.increment(500.0);
        assert_eq!(p.percentage_label(), "100%");
    }

    #[test]
    fn percentage_label_rounds() {
        let mut p = ProgressTracker::new();
        p.set_progress(200.0 / 3.0);
        assert_eq!(p.percentage_label(), "67%");
    }

    #[test]
    fn jitter_stays_in_bounds() {
        for _ in 0..50 {
            assert!(random_jitter(Duration::from_millis(400)) <= Duration::from_millis(400));
        }
        assert_eq!(random_jitter(Duration::ZERO), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn simulate_ends_on_last_step_at_full() {
        let mut p = ProgressTracker::new();
        p.show("Loading", "");
        let start = tokio::time::Instant::now();
        p.simulate(
            &["one", "two", "three", "Ready!"],
            Duration::from_millis(800),
            Duration::from_millis(400),
        )
        .await;

        assert_eq!(p.percent(), 100.0);
        assert_eq!(p.description(), "Ready!");
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(3200));
        assert!(elapsed <= Duration::from_millis(4800));
    }

    #[test]
    fn hide_keeps_last_state() {
        let mut p = ProgressTracker::new();
        p.show("t", "d");
        p.set_progress(50.0);
        p.hide();
        assert!(!p.is_visible());
        assert_eq!(p.percent(), 50.0);
    }
}
