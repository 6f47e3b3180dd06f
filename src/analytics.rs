//! Health analytics: vital-signs trend chart, health-score gauge and the
//! medical timeline.
//!
//! The core only describes charts (`ChartSpec`). Drawing is delegated to a
//! `ChartRenderer`; the bundled `TracingChartRenderer` just logs them.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Timeframe;
use crate::notifications::NotificationQueue;

pub const VITALS_CHART_ID: &str = "vitalSignsChart";
pub const HEALTH_SCORE_CHART_ID: &str = "healthScoreGauge";
pub const HEALTH_SCORE: f64 = 78.0;
pub const HEALTH_SCORE_MAX: f64 = 100.0;

// ═══════════════════════════════════════════════════════════
// Chart descriptions
// ═══════════════════════════════════════════════════════════

/// Vertical fill gradient, top colour to bottom colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gradient {
    pub top: String,
    pub bottom: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    pub color: String,
    pub fill: Gradient,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSpec {
    Line {
        id: String,
        labels: Vec<String>,
        series: Vec<Series>,
    },
    Gauge {
        id: String,
        value: f64,
        max: f64,
        color: String,
        track: String,
    },
}

impl ChartSpec {
    pub fn id(&self) -> &str {
        match self {
            ChartSpec::Line { id, .. } | ChartSpec::Gauge { id, .. } => id,
        }
    }
}

/// Draws chart descriptions on some surface.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, chart: &ChartSpec);
}

/// Renderer for headless runs: logs each chart at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingChartRenderer;

impl ChartRenderer for TracingChartRenderer {
    fn render(&self, chart: &ChartSpec) {
        match chart {
            ChartSpec::Line { id, labels, series } => {
                tracing::debug!(chart = %id, points = labels.len(), series = series.len(), "Line chart rendered");
            }
            ChartSpec::Gauge { id, value, max, .. } => {
                tracing::debug!(chart = %id, value, max, "Gauge rendered");
            }
        }
    }
}

// ── Vital signs data ────────────────────────────────────

struct VitalsData {
    labels: &'static [&'static str],
    systolic: &'static [f64],
    heart_rate: &'static [f64],
    temperature: &'static [f64],
}

const SIX_MONTHS: VitalsData = VitalsData {
    labels: &["Jan", "Feb", "Mar", "Apr", "May", "Jun"],
    systolic: &[120.0, 125.0, 118.0, 122.0, 128.0, 124.0],
    heart_rate: &[72.0, 75.0, 70.0, 73.0, 78.0, 74.0],
    temperature: &[98.6, 98.8, 98.4, 98.7, 99.1, 98.9],
};

fn vitals_for(timeframe: Option<Timeframe>) -> VitalsData {
    match timeframe {
        None => SIX_MONTHS,
        Some(Timeframe::Week) => VitalsData {
            labels: &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
            systolic: &[122.0, 120.0, 125.0, 118.0, 124.0, 119.0, 121.0],
            heart_rate: &[74.0, 72.0, 76.0, 71.0, 75.0, 73.0, 74.0],
            temperature: &[98.7, 98.6, 98.9, 98.5, 98.8, 98.6, 98.7],
        },
        Some(Timeframe::Month) => VitalsData {
            labels: &["Week 1", "Week 2", "Week 3", "Week 4"],
            systolic: &[120.0, 125.0, 118.0, 124.0],
            heart_rate: &[72.0, 75.0, 70.0, 74.0],
            temperature: &[98.6, 98.8, 98.4, 98.9],
        },
        Some(Timeframe::Quarter) => VitalsData {
            labels: &["Month 1", "Month 2", "Month 3"],
            systolic: &[125.0, 120.0, 122.0],
            heart_rate: &[75.0, 72.0, 73.0],
            temperature: &[98.8, 98.6, 98.7],
        },
        Some(Timeframe::Year) => VitalsData {
            labels: &["Q1", "Q2", "Q3", "Q4"],
            systolic: &[123.0, 121.0, 119.0, 122.0],
            heart_rate: &[74.0, 73.0, 71.0, 73.0],
            temperature: &[98.7, 98.6, 98.5, 98.7],
        },
    }
}

fn series(label: &str, values: &[f64], rgb: (u8, u8, u8), hex: &str) -> Series {
    let (r, g, b) = rgb;
    Series {
        label: label.to_string(),
        values: values.to_vec(),
        color: hex.to_string(),
        fill: Gradient {
            top: format!("rgba({r}, {g}, {b}, 0.8)"),
            bottom: format!("rgba({r}, {g}, {b}, 0.1)"),
        },
    }
}

/// Vital-signs line chart. `None` is the default six-month view.
pub fn vitals_chart(timeframe: Option<Timeframe>) -> ChartSpec {
    let data = vitals_for(timeframe);
    ChartSpec::Line {
        id: VITALS_CHART_ID.to_string(),
        labels: data.labels.iter().map(|l| l.to_string()).collect(),
        series: vec![
            series("Blood Pressure (Systolic)", data.systolic, (46, 139, 87), "#2E8B57"),
            series("Heart Rate", data.heart_rate, (239, 68, 68), "#ef4444"),
            series("Temperature (°F)", data.temperature, (245, 158, 11), "#f59e0b"),
        ],
    }
}

pub fn health_score_gauge() -> ChartSpec {
    ChartSpec::Gauge {
        id: HEALTH_SCORE_CHART_ID.to_string(),
        value: HEALTH_SCORE,
        max: HEALTH_SCORE_MAX,
        color: "#2E8B57".to_string(),
        track: "rgba(46, 139, 87, 0.1)".to_string(),
    }
}

// ── Medical timeline ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    /// Icon colour class: diagnosis, prescription, test or appointment.
    pub category: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub date: NaiveDate,
    pub icon: &'static str,
}

impl TimelineEntry {
    /// "August 15, 2024"
    pub fn date_label(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }
}

pub fn medical_timeline() -> Vec<TimelineEntry> {
    let entry = |category, title, description, (y, m, d): (i32, u32, u32), icon| TimelineEntry {
        category,
        title,
        description,
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        icon,
    };
    vec![
        entry(
            "diagnosis",
            "Hypertension Diagnosis",
            "Diagnosed with stage 1 hypertension. Blood pressure consistently elevated.",
            (2024, 8, 15),
            "fa-stethoscope",
        ),
        entry(
            "prescription",
            "Medication Prescribed",
            "Prescribed Lisinopril 10mg daily for blood pressure management.",
            (2024, 8, 15),
            "fa-pills",
        ),
        entry(
            "test",
            "Blood Work Results",
            "Complete metabolic panel shows normal kidney function.",
            (2024, 8, 10),
            "fa-flask",
        ),
        entry(
            "appointment",
            "Follow-up Scheduled",
            "Monthly check-up scheduled to monitor blood pressure trends.",
            (2024, 8, 5),
            "fa-calendar-check",
        ),
        entry(
            "diagnosis",
            "Initial Consultation",
            "Patient reported frequent headaches and dizziness. Initial assessment completed.",
            (2024, 7, 28),
            "fa-user-md",
        ),
    ]
}

// ═══════════════════════════════════════════════════════════
// HealthAnalytics
// ═══════════════════════════════════════════════════════════

pub struct HealthAnalytics {
    timeframe: Option<Timeframe>,
    renderer: Arc<dyn ChartRenderer>,
}

impl HealthAnalytics {
    pub fn new(renderer: Arc<dyn ChartRenderer>) -> Self {
        Self {
            timeframe: None,
            renderer,
        }
    }

    /// `None` until a timeframe is picked.
    pub fn timeframe(&self) -> Option<Timeframe> {
        self.timeframe
    }

    pub fn vitals(&self) -> ChartSpec {
        vitals_chart(self.timeframe)
    }

    /// Draw both charts.
    pub fn render(&self) {
        self.renderer.render(&self.vitals());
        self.renderer.render(&health_score_gauge());
    }

    /// Swap the vitals chart to `timeframe` and announce it. Selecting the
    /// current timeframe again does nothing.
    pub fn set_timeframe(&mut self, timeframe: Timeframe, notifications: &NotificationQueue) -> bool {
        if self.timeframe == Some(timeframe) {
            return false;
        }
        self.timeframe = Some(timeframe);
        self.renderer.render(&self.vitals());
        tracing::info!(timeframe = %timeframe, "Analytics timeframe changed");
        notifications.info(
            "Analytics Updated",
            &format!("Switched to {} view", timeframe.label()),
        );
        true
    }
}
