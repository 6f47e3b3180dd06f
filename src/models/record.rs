use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Authority, DocumentFormat, FlagReason, RecordKind, VaccinationStatus};

/// One medicine line on a prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medicine {
    pub name: String,
    pub dosage: Option<String>,
}

impl Medicine {
    pub fn new(name: impl Into<String>, dosage: Option<&str>) -> Self {
        Self {
            name: name.into(),
            dosage: dosage.map(str::to_string),
        }
    }

    /// "Metformin 500mg", or just the name when no dosage was given.
    pub fn display(&self) -> String {
        match &self.dosage {
            Some(dosage) => format!("{} {}", self.name, dosage),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub format: DocumentFormat,
    pub medicines: Vec<Medicine>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReport {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub format: DocumentFormat,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub date: NaiveDate,
    pub doctor: String,
    pub visit_type: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vaccination {
    pub name: String,
    pub status: VaccinationStatus,
    pub date: Option<NaiveDate>,
}

/// An authority contacted about this patient (flagged case).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub date: NaiveDate,
    pub authority: Authority,
    pub reason: FlagReason,
    pub details: String,
}

/// One item of the patient's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Prescription(Prescription),
    Note(ClinicalNote),
    LabReport(LabReport),
    Visit(Visit),
    Vaccination(Vaccination),
    Contact(Contact),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Prescription(_) => RecordKind::Prescription,
            Record::Note(_) => RecordKind::Note,
            Record::LabReport(_) => RecordKind::LabReport,
            Record::Visit(_) => RecordKind::Visit,
            Record::Vaccination(_) => RecordKind::Vaccination,
            Record::Contact(_) => RecordKind::Contact,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Record::Prescription(p) => p.title.clone(),
            Record::Note(n) => n.title.clone(),
            Record::LabReport(r) => r.title.clone(),
            Record::Visit(v) => format!("{} - {}", v.visit_type, v.doctor),
            Record::Vaccination(v) => v.name.clone(),
            Record::Contact(c) => format!("{} notified", c.authority.label()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Record::Prescription(p) => Some(p.date),
            Record::Note(n) => Some(n.date),
            Record::LabReport(r) => Some(r.date),
            Record::Visit(v) => Some(v.date),
            Record::Vaccination(v) => v.date,
            Record::Contact(c) => Some(c.date),
        }
    }

    pub fn as_prescription(&self) -> Option<&Prescription> {
        match self {
            Record::Prescription(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_lab_report(&self) -> Option<&LabReport> {
        match self {
            Record::LabReport(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_note(&self) -> Option<&ClinicalNote> {
        match self {
            Record::Note(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_contact(&self) -> Option<&Contact> {
        match self {
            Record::Contact(c) => Some(c),
            _ => None,
        }
    }
}
