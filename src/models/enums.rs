use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

/// Macro to generate a closed enum with `as_str` / `label` + `std::str::FromStr`.
///
/// `as_str` is the stable wire form (also the serde form), `label` is the
/// human-readable text shown in the UI.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal, $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// ── Navigation ──────────────────────────────────────────

str_enum!(TabId {
    Prescriptions => "prescriptions", "Prescriptions",
    Notes => "notes", "Clinical Notes",
    Labs => "labs", "Lab Reports",
    Visits => "visits", "Visit History",
    Vaccinations => "vaccinations", "Vaccinations",
    Contacts => "contacts", "Contacts",
});

impl TabId {
    /// The record sequence shown in this tab's panel.
    pub fn record_kind(self) -> RecordKind {
        match self {
            TabId::Prescriptions => RecordKind::Prescription,
            TabId::Notes => RecordKind::Note,
            TabId::Labs => RecordKind::LabReport,
            TabId::Visits => RecordKind::Visit,
            TabId::Vaccinations => RecordKind::Vaccination,
            TabId::Contacts => RecordKind::Contact,
        }
    }
}

// ── Records ─────────────────────────────────────────────

str_enum!(RecordKind {
    Prescription => "prescription", "Prescription",
    Note => "note", "Note",
    LabReport => "lab_report", "Lab Report",
    Visit => "visit", "Visit",
    Vaccination => "vaccination", "Vaccination",
    Contact => "contact", "Contact",
});

str_enum!(DocumentFormat {
    Pdf => "pdf", "PDF",
    Image => "image", "Image",
});

impl DocumentFormat {
    pub fn icon(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "fa-file-pdf",
            DocumentFormat::Image => "fa-image",
        }
    }
}

str_enum!(VaccinationStatus {
    Completed => "completed", "Completed",
    Due => "due", "Due Soon",
    NotTaken => "not-taken", "Not Taken",
});

impl VaccinationStatus {
    pub fn icon(self) -> &'static str {
        match self {
            VaccinationStatus::Completed => "fa-check-circle",
            VaccinationStatus::Due => "fa-clock",
            VaccinationStatus::NotTaken => "fa-times-circle",
        }
    }
}

// ── Modal forms ─────────────────────────────────────────

str_enum!(ModalKind {
    Prescription => "prescription", "Add Prescription",
    Diagnosis => "diagnosis", "Record Diagnosis",
    Reminder => "reminder", "Set Reminder",
    Flag => "flag", "Flag Case",
});

str_enum!(FormField {
    MedicineName => "medicine_name", "Medicine Name",
    Dosage => "dosage", "Dosage",
    Duration => "duration", "Duration",
    Instructions => "instructions", "Instructions",
    Diagnosis => "diagnosis", "Diagnosis",
    DiagnosisNotes => "diagnosis_notes", "Notes",
    ReminderType => "reminder_type", "Reminder Type",
    ReminderDateTime => "reminder_datetime", "Date & Time",
    ReminderNotes => "reminder_notes", "Notes",
    FlagReason => "flag_reason", "Flag Reason",
    Authority => "authority", "Authority to Notify",
    FlagDetails => "flag_details", "Details",
});

str_enum!(ReminderType {
    Medication => "medication", "Medication",
    Checkup => "checkup", "Follow-up Checkup",
    Test => "test", "Lab Test",
});

str_enum!(FlagReason {
    Critical => "critical", "Critical Condition",
    Infectious => "infectious", "Infectious Disease",
    Emergency => "emergency", "Emergency Case",
    Other => "other", "Other",
});

str_enum!(Authority {
    HealthDept => "health-dept", "Health Department",
    LaborDept => "labor-dept", "Labor Department",
    Emergency => "emergency", "Emergency Services",
});

// ── Notifications ───────────────────────────────────────

str_enum!(NotificationKind {
    Success => "success", "Success",
    Info => "info", "Info",
    Warning => "warning", "Warning",
    Emergency => "emergency", "Emergency",
});

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "fa-check",
            NotificationKind::Info => "fa-info-circle",
            NotificationKind::Warning => "fa-exclamation-triangle",
            NotificationKind::Emergency => "fa-exclamation-triangle",
        }
    }

    /// Toast style class. Emergencies render with the error style.
    pub fn style(self) -> &'static str {
        match self {
            NotificationKind::Emergency => "error",
            other => other.as_str(),
        }
    }
}

// ── FAB, search, analytics, placeholders ────────────────

str_enum!(FabAction {
    Emergency => "emergency", "Emergency Alert",
    Prescription => "prescription", "Quick Prescription",
    Notes => "notes", "Add Notes",
    Appointment => "appointment", "Schedule Appointment",
    Search => "search", "Quick Search",
});

str_enum!(SearchFilter {
    All => "all", "All",
    Patients => "patients", "Patients",
    Conditions => "conditions", "Conditions",
    Medications => "medications", "Medications",
});

str_enum!(SearchResultType {
    Patient => "patient", "Patient",
    Condition => "condition", "Condition",
    Medication => "medication", "Medication",
});

impl SearchFilter {
    pub fn accepts(self, kind: SearchResultType) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::Patients => kind == SearchResultType::Patient,
            SearchFilter::Conditions => kind == SearchResultType::Condition,
            SearchFilter::Medications => kind == SearchResultType::Medication,
        }
    }
}

str_enum!(Timeframe {
    Week => "week", "This Week",
    Month => "month", "This Month",
    Quarter => "quarter", "This Quarter",
    Year => "year", "This Year",
});

str_enum!(PlaceholderAction {
    QrScan => "qr-scan", "QR Code Scanner",
    UploadDocument => "upload", "Upload Document",
    OrderLab => "lab-order", "Order Lab Test",
    ExportPdf => "pdf-export", "Export PDF",
    ShareLink => "share-link", "Share Link",
    ForgotPassword => "forgot-password", "Forgot Password",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn tab_ids_parse_and_render() {
        for tab in TabId::ALL {
            assert_eq!(TabId::from_str(tab.as_str()).unwrap(), *tab);
        }
        assert_eq!(TabId::ALL[0], TabId::Prescriptions);
    }

    #[test]
    fn unknown_tab_is_rejected() {
        let err = TabId::from_str("billing").unwrap_err();
        assert_eq!(err.field, "TabId");
        assert_eq!(err.value, "billing");
    }

    #[test]
    fn every_tab_maps_to_a_distinct_record_kind() {
        let mut kinds: Vec<RecordKind> = TabId::ALL.iter().map(|t| t.record_kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), RecordKind::ALL.len());
    }

    #[test]
    fn serde_uses_wire_form() {
        let json = serde_json::to_string(&VaccinationStatus::NotTaken).unwrap();
        assert_eq!(json, "\"not-taken\"");
        let back: Authority = serde_json::from_str("\"labor-dept\"").unwrap();
        assert_eq!(back, Authority::LaborDept);
    }

    #[test]
    fn modal_titles() {
        assert_eq!(ModalKind::Prescription.label(), "Add Prescription");
        assert_eq!(ModalKind::Diagnosis.label(), "Record Diagnosis");
        assert_eq!(ModalKind::Reminder.label(), "Set Reminder");
        assert_eq!(ModalKind::Flag.label(), "Flag Case");
    }

    #[test]
    fn emergency_uses_error_style() {
        assert_eq!(NotificationKind::Emergency.style(), "error");
        assert_eq!(NotificationKind::Success.style(), "success");
    }

    #[test]
    fn search_filter_accepts() {
        assert!(SearchFilter::All.accepts(SearchResultType::Medication));
        assert!(SearchFilter::Patients.accepts(SearchResultType::Patient));
        assert!(!SearchFilter::Patients.accepts(SearchResultType::Condition));
        assert!(SearchFilter::Medications.accepts(SearchResultType::Medication));
    }
}
