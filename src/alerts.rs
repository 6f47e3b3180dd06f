//! Blocking acknowledgements for flows the dashboard does not implement.

use crate::models::{LabReport, PlaceholderAction, Prescription};

/// Receives placeholder acknowledgements (a modal alert in a browser).
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Sink for headless runs: logs the alert.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn alert(&self, message: &str) {
        tracing::info!(message, "Alert");
    }
}

pub fn placeholder_message(action: PlaceholderAction) -> String {
    match action {
        PlaceholderAction::QrScan => "QR Code Scanner would open here".to_string(),
        PlaceholderAction::ForgotPassword => "For access assistance, please contact:\n\n\
             System Administrator\n\
             Email: admin@healthcare.com\n\
             Phone: +91-1234567890\n\n\
             Any ID and password combination will work for demo purposes."
            .to_string(),
        other => format!("{} would open here", other.label()),
    }
}

pub fn prescription_detail(prescription: &Prescription) -> String {
    let medicines: Vec<String> = prescription.medicines.iter().map(|m| m.display()).collect();
    format!(
        "Opening prescription: {}\nDate: {}\nMedicines: {}",
        prescription.title,
        prescription.date.format("%Y-%m-%d"),
        medicines.join(", ")
    )
}

pub fn report_detail(report: &LabReport) -> String {
    format!(
        "Opening report: {}\nDate: {}\nResult: {}",
        report.title,
        report.date.format("%Y-%m-%d"),
        report.result
    )
}
