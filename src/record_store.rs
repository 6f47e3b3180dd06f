//! In-memory patient record sequences, one per record kind.
//!
//! Sequences are newest-first by construction: `prepend` is the only
//! mutation and no sort is ever applied, so insertion order is display order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    ClinicalNote, DocumentFormat, LabReport, Medicine, Prescription, Record, RecordKind,
    Vaccination, VaccinationStatus, Visit,
};

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    sequences: BTreeMap<RecordKind, Vec<Record>>,
}

impl RecordStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` at the head of its kind's sequence.
    pub fn prepend(&mut self, record: Record) {
        let kind = record.kind();
        tracing::debug!(kind = %kind, "Record prepended");
        self.sequences.entry(kind).or_default().insert(0, record);
    }

    /// All records of `kind`, newest first.
    pub fn all(&self, kind: RecordKind) -> &[Record] {
        self.sequences.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, kind: RecordKind) -> usize {
        self.all(kind).len()
    }

    pub fn is_empty(&self, kind: RecordKind) -> bool {
        self.all(kind).is_empty()
    }

    pub fn prescription(&self, id: Uuid) -> Option<&Prescription> {
        self.all(RecordKind::Prescription)
            .iter()
            .filter_map(Record::as_prescription)
            .find(|p| p.id == id)
    }

    pub fn lab_report(&self, id: Uuid) -> Option<&LabReport> {
        self.all(RecordKind::LabReport)
            .iter()
            .filter_map(Record::as_lab_report)
            .find(|r| r.id == id)
    }

    /// Vaccination completion, `round(completed / total * 100)`. 0 when empty.
    pub fn vaccination_percent(&self) -> u32 {
        let vaccinations = self.all(RecordKind::Vaccination);
        if vaccinations.is_empty() {
            return 0;
        }
        let completed = vaccinations
            .iter()
            .filter(|r| matches!(r, Record::Vaccination(v) if v.status == VaccinationStatus::Completed))
            .count();
        ((completed as f64 / vaccinations.len() as f64) * 100.0).round() as u32
    }

    /// The demo patient's history.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        // Seeds are listed newest-first; push oldest first so prepend keeps that order.
        for record in demo_records().into_iter().rev() {
            store.prepend(record);
        }
        store
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn demo_records() -> Vec<Record> {
    let prescription = |title: &str, date: NaiveDate, format: DocumentFormat, medicines: Vec<Medicine>| {
        Record::Prescription(Prescription {
            id: Uuid::new_v4(),
            title: title.into(),
            date,
            format,
            medicines,
            duration: None,
            instructions: None,
        })
    };
    let note = |date: NaiveDate, title: &str, content: &str| {
        Record::Note(ClinicalNote {
            date,
            title: title.into(),
            content: content.into(),
        })
    };
    let report = |title: &str, date: NaiveDate, format: DocumentFormat, result: &str| {
        Record::LabReport(LabReport {
            id: Uuid::new_v4(),
            title: title.into(),
            date,
            format,
            result: result.into(),
        })
    };
    let visit = |date: NaiveDate, doctor: &str, visit_type: &str, notes: &str| {
        Record::Visit(Visit {
            date,
            doctor: doctor.into(),
            visit_type: visit_type.into(),
            notes: notes.into(),
        })
    };
    let vaccination = |name: &str, status: VaccinationStatus, date: Option<NaiveDate>| {
        Record::Vaccination(Vaccination {
            name: name.into(),
            status,
            date,
        })
    };

    vec![
        prescription(
            "Prescription #001",
            ymd(2025, 9, 10),
            DocumentFormat::Pdf,
            vec![Medicine::new("Metformin", Some("500mg")), Medicine::new("Vitamin D3", None)],
        ),
        prescription(
            "Prescription #002",
            ymd(2025, 8, 15),
            DocumentFormat::Pdf,
            vec![Medicine::new("Amlodipine", Some("5mg"))],
        ),
        prescription(
            "Emergency Rx",
            ymd(2025, 7, 22),
            DocumentFormat::Image,
            vec![Medicine::new("Paracetamol", Some("500mg"))],
        ),
        note(
            ymd(2025, 9, 10),
            "Regular Checkup",
            "Patient showing good progress with diabetes management. Blood sugar levels stable.",
        ),
        note(
            ymd(2025, 8, 15),
            "Blood Pressure Review",
            "BP slightly elevated. Adjusted Amlodipine dosage. Recommended lifestyle changes.",
        ),
        note(
            ymd(2025, 7, 22),
            "Emergency Visit",
            "Patient complained of severe headache. Prescribed pain relief. Advised rest.",
        ),
        report("Blood Sugar Test", ymd(2025, 9, 5), DocumentFormat::Pdf, "Normal"),
        report("Lipid Profile", ymd(2025, 8, 20), DocumentFormat::Pdf, "Elevated"),
        report("Chest X-Ray", ymd(2025, 7, 15), DocumentFormat::Image, "Clear"),
        visit(ymd(2025, 9, 10), "Dr. Sharma", "Regular Checkup", "Diabetes management review"),
        visit(ymd(2025, 8, 15), "Dr. Patel", "Consultation", "Blood pressure adjustment"),
        visit(ymd(2025, 7, 22), "Dr. Kumar", "Emergency", "Headache treatment"),
        vaccination("Tetanus", VaccinationStatus::Completed, Some(ymd(2024, 1, 15))),
        vaccination("COVID Booster", VaccinationStatus::Due, Some(ymd(2025, 9, 20))),
        vaccination("Hepatitis B", VaccinationStatus::NotTaken, None),
        vaccination("Influenza", VaccinationStatus::Completed, Some(ymd(2024, 10, 1))),
    ]
}
