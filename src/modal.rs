//! The single shared modal and its per-kind forms.
//!
//! Each `ModalForm` variant carries its own field schema and validator.
//! Saving is two-phase so the dashboard can simulate latency:
//! `begin_save` hands out a `SaveTicket`, `finish_save` redeems it. Every
//! open/close bumps a generation counter, so a ticket issued before the
//! modal was closed (or reopened) is discarded instead of mutating state.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{DashboardError, ValidationError};
use crate::models::{
    Authority, ClinicalNote, Contact, DocumentFormat, FlagReason, FormField, Medicine,
    ModalKind, Prescription, Record, RecordKind, ReminderType,
};
use crate::notifications::NotificationQueue;
use crate::record_store::RecordStore;

/// Accepted reminder formats; the first is what a datetime-local input sends.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

// ═══════════════════════════════════════════════════════════
// Field schema
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectSource {
    ReminderType,
    FlagReason,
    Authority,
}

impl SelectSource {
    /// `(value, label)` pairs in display order.
    pub fn options(self) -> Vec<(&'static str, &'static str)> {
        match self {
            SelectSource::ReminderType => {
                ReminderType::ALL.iter().map(|o| (o.as_str(), o.label())).collect()
            }
            SelectSource::FlagReason => {
                FlagReason::ALL.iter().map(|o| (o.as_str(), o.label())).collect()
            }
            SelectSource::Authority => {
                Authority::ALL.iter().map(|o| (o.as_str(), o.label())).collect()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "source", rename_all = "snake_case")]
pub enum InputKind {
    Text,
    TextArea,
    DateTime,
    Select(SelectSource),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: FormField,
    pub input: InputKind,
    pub placeholder: &'static str,
    pub required: bool,
}

const fn spec(field: FormField, input: InputKind, placeholder: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        field,
        input,
        placeholder,
        required,
    }
}

const PRESCRIPTION_FIELDS: &[FieldSpec] = &[
    spec(FormField::MedicineName, InputKind::Text, "Enter medicine name", true),
    spec(FormField::Dosage, InputKind::Text, "e.g., 500mg", true),
    spec(FormField::Duration, InputKind::Text, "e.g., 7 days", false),
    spec(FormField::Instructions, InputKind::TextArea, "Special instructions...", false),
];

const DIAGNOSIS_FIELDS: &[FieldSpec] = &[
    spec(FormField::Diagnosis, InputKind::Text, "Enter diagnosis", true),
    spec(FormField::DiagnosisNotes, InputKind::TextArea, "Detailed notes...", false),
];

const REMINDER_FIELDS: &[FieldSpec] = &[
    spec(FormField::ReminderType, InputKind::Select(SelectSource::ReminderType), "", false),
    spec(FormField::ReminderDateTime, InputKind::DateTime, "YYYY-MM-DDTHH:MM", true),
    spec(FormField::ReminderNotes, InputKind::TextArea, "Additional notes...", false),
];

const FLAG_FIELDS: &[FieldSpec] = &[
    spec(FormField::FlagReason, InputKind::Select(SelectSource::FlagReason), "", true),
    spec(FormField::Authority, InputKind::Select(SelectSource::Authority), "", true),
    spec(FormField::FlagDetails, InputKind::TextArea, "Provide detailed information...", false),
];

/// Field set presented for a modal kind.
pub fn fields_for(kind: ModalKind) -> &'static [FieldSpec] {
    match kind {
        ModalKind::Prescription => PRESCRIPTION_FIELDS,
        ModalKind::Diagnosis => DIAGNOSIS_FIELDS,
        ModalKind::Reminder => REMINDER_FIELDS,
        ModalKind::Flag => FLAG_FIELDS,
    }
}

// ═══════════════════════════════════════════════════════════
// Forms
// ═══════════════════════════════════════════════════════════

/// What a successful validation produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSave {
    pub record: Record,
    /// Toast title.
    pub title: &'static str,
    /// Toast message.
    pub message: String,
}

/// Inputs a validator needs from outside the form.
#[derive(Debug, Clone, Copy)]
pub struct SaveContext {
    pub today: NaiveDate,
    /// Sequence number for the next generated prescription title.
    pub next_prescription_number: usize,
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrescriptionForm {
    pub medicine_name: String,
    pub dosage: String,
    pub duration: String,
    pub instructions: String,
}

impl PrescriptionForm {
    fn validate(&self, ctx: &SaveContext) -> Result<ValidatedSave, ValidationError> {
        let medicine = self.medicine_name.trim();
        let dosage = self.dosage.trim();
        if medicine.is_empty() || dosage.is_empty() {
            let field = if medicine.is_empty() {
                FormField::MedicineName
            } else {
                FormField::Dosage
            };
            return Err(ValidationError::for_field(
                field,
                "Please fill in medicine name and dosage",
            ));
        }

        let record = Record::Prescription(Prescription {
            id: Uuid::new_v4(),
            title: format!("Prescription #{:03}", ctx.next_prescription_number),
            date: ctx.today,
            format: DocumentFormat::Pdf,
            medicines: vec![Medicine::new(medicine, Some(dosage))],
            duration: optional(&self.duration),
            instructions: optional(&self.instructions),
        });
        Ok(ValidatedSave {
            record,
            title: "Prescription Added",
            message: format!("Prescription added: {medicine} {dosage}"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosisForm {
    pub diagnosis: String,
    pub notes: String,
}

impl DiagnosisForm {
    fn validate(&self, ctx: &SaveContext) -> Result<ValidatedSave, ValidationError> {
        let diagnosis = self.diagnosis.trim();
        if diagnosis.is_empty() {
            return Err(ValidationError::for_field(
                FormField::Diagnosis,
                "Please enter a diagnosis",
            ));
        }

        let record = Record::Note(ClinicalNote {
            date: ctx.today,
            title: format!("Diagnosis: {diagnosis}"),
            content: self.notes.trim().to_string(),
        });
        Ok(ValidatedSave {
            record,
            title: "Diagnosis Recorded",
            message: format!("Diagnosis recorded: {diagnosis}"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReminderForm {
    /// Empty means the select's default, medication.
    pub reminder_type: String,
    pub datetime: String,
    pub notes: String,
}

impl ReminderForm {
    fn validate(&self, ctx: &SaveContext) -> Result<ValidatedSave, ValidationError> {
        let raw_type = self.reminder_type.trim();
        let reminder_type = if raw_type.is_empty() {
            ReminderType::Medication
        } else {
            raw_type.parse::<ReminderType>().map_err(|_| {
                ValidationError::for_field(
                    FormField::ReminderType,
                    format!("Unknown reminder type: {raw_type}"),
                )
            })?
        };

        let raw_datetime = self.datetime.trim();
        if raw_datetime.is_empty() {
            return Err(ValidationError::for_field(
                FormField::ReminderDateTime,
                "Please select a date and time",
            ));
        }
        let when = parse_datetime(raw_datetime).ok_or_else(|| {
            ValidationError::for_field(
                FormField::ReminderDateTime,
                "Please enter a valid date and time (YYYY-MM-DDTHH:MM)",
            )
        })?;

        let mut content = format!("Scheduled for {}", when.format("%Y-%m-%d %H:%M"));
        if let Some(notes) = optional(&self.notes) {
            content.push_str(". ");
            content.push_str(&notes);
        }

        let record = Record::Note(ClinicalNote {
            date: ctx.today,
            title: format!("Reminder: {}", reminder_type.label()),
            content,
        });
        Ok(ValidatedSave {
            record,
            title: "Reminder Set",
            message: format!("Reminder set for {}", reminder_type.label()),
        })
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagForm {
    pub reason: String,
    pub authority: String,
    pub details: String,
}

impl FlagForm {
    fn validate(&self, ctx: &SaveContext) -> Result<ValidatedSave, ValidationError> {
        let raw_reason = self.reason.trim();
        let raw_authority = self.authority.trim();
        if raw_reason.is_empty() || raw_authority.is_empty() {
            let field = if raw_reason.is_empty() {
                FormField::FlagReason
            } else {
                FormField::Authority
            };
            return Err(ValidationError::for_field(
                field,
                "Please select a flag reason and an authority to notify",
            ));
        }

        let reason = raw_reason.parse::<FlagReason>().map_err(|_| {
            ValidationError::for_field(FormField::FlagReason, format!("Unknown flag reason: {raw_reason}"))
        })?;
        let authority = raw_authority.parse::<Authority>().map_err(|_| {
            ValidationError::for_field(FormField::Authority, format!("Unknown authority: {raw_authority}"))
        })?;

        let record = Record::Contact(Contact {
            date: ctx.today,
            authority,
            reason,
            details: self.details.trim().to_string(),
        });
        Ok(ValidatedSave {
            record,
            title: "Case Flagged",
            message: format!("Case flagged to {} for {}", authority.label(), reason.label()),
        })
    }
}

/// Form values of the open modal, one variant per modal kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModalForm {
    Prescription(PrescriptionForm),
    Diagnosis(DiagnosisForm),
    Reminder(ReminderForm),
    Flag(FlagForm),
}

impl ModalForm {
    pub fn empty(kind: ModalKind) -> Self {
        match kind {
            ModalKind::Prescription => ModalForm::Prescription(PrescriptionForm::default()),
            ModalKind::Diagnosis => ModalForm::Diagnosis(DiagnosisForm::default()),
            ModalKind::Reminder => ModalForm::Reminder(ReminderForm::default()),
            ModalKind::Flag => ModalForm::Flag(FlagForm::default()),
        }
    }

    pub fn kind(&self) -> ModalKind {
        match self {
            ModalForm::Prescription(_) => ModalKind::Prescription,
            ModalForm::Diagnosis(_) => ModalKind::Diagnosis,
            ModalForm::Reminder(_) => ModalKind::Reminder,
            ModalForm::Flag(_) => ModalKind::Flag,
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        fields_for(self.kind())
    }

    /// Record sequence a successful save lands in.
    pub fn target(&self) -> RecordKind {
        match self {
            ModalForm::Prescription(_) => RecordKind::Prescription,
            ModalForm::Diagnosis(_) | ModalForm::Reminder(_) => RecordKind::Note,
            ModalForm::Flag(_) => RecordKind::Contact,
        }
    }

    pub fn value(&self, field: FormField) -> Option<&str> {
        self.slot(field).map(String::as_str)
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> Result<(), DashboardError> {
        let kind = self.kind();
        let slot = self
            .slot_mut(field)
            .ok_or(DashboardError::FieldNotInForm { field, kind })?;
        *slot = value.into();
        Ok(())
    }

    pub fn validate(&self, ctx: &SaveContext) -> Result<ValidatedSave, ValidationError> {
        match self {
            ModalForm::Prescription(form) => form.validate(ctx),
            ModalForm::Diagnosis(form) => form.validate(ctx),
            ModalForm::Reminder(form) => form.validate(ctx),
            ModalForm::Flag(form) => form.validate(ctx),
        }
    }

    fn slot(&self, field: FormField) -> Option<&String> {
        match (self, field) {
            (ModalForm::Prescription(f), FormField::MedicineName) => Some(&f.medicine_name),
            (ModalForm::Prescription(f), FormField::Dosage) => Some(&f.dosage),
            (ModalForm::Prescription(f), FormField::Duration) => Some(&f.duration),
            (ModalForm::Prescription(f), FormField::Instructions) => Some(&f.instructions),
            (ModalForm::Diagnosis(f), FormField::Diagnosis) => Some(&f.diagnosis),
            (ModalForm::Diagnosis(f), FormField::DiagnosisNotes) => Some(&f.notes),
            (ModalForm::Reminder(f), FormField::ReminderType) => Some(&f.reminder_type),
            (ModalForm::Reminder(f), FormField::ReminderDateTime) => Some(&f.datetime),
            (ModalForm::Reminder(f), FormField::ReminderNotes) => Some(&f.notes),
            (ModalForm::Flag(f), FormField::FlagReason) => Some(&f.reason),
            (ModalForm::Flag(f), FormField::Authority) => Some(&f.authority),
            (ModalForm::Flag(f), FormField::FlagDetails) => Some(&f.details),
            _ => None,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> Option<&mut String> {
        match (self, field) {
            (ModalForm::Prescription(f), FormField::MedicineName) => Some(&mut f.medicine_name),
            (ModalForm::Prescription(f), FormField::Dosage) => Some(&mut f.dosage),
            (ModalForm::Prescription(f), FormField::Duration) => Some(&mut f.duration),
            (ModalForm::Prescription(f), FormField::Instructions) => Some(&mut f.instructions),
            (ModalForm::Diagnosis(f), FormField::Diagnosis) => Some(&mut f.diagnosis),
            (ModalForm::Diagnosis(f), FormField::DiagnosisNotes) => Some(&mut f.notes),
            (ModalForm::Reminder(f), FormField::ReminderType) => Some(&mut f.reminder_type),
            (ModalForm::Reminder(f), FormField::ReminderDateTime) => Some(&mut f.datetime),
            (ModalForm::Reminder(f), FormField::ReminderNotes) => Some(&mut f.notes),
            (ModalForm::Flag(f), FormField::FlagReason) => Some(&mut f.reason),
            (ModalForm::Flag(f), FormField::Authority) => Some(&mut f.authority),
            (ModalForm::Flag(f), FormField::FlagDetails) => Some(&mut f.details),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// ModalController
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "form", rename_all = "snake_case")]
pub enum ModalState {
    Closed,
    Open(ModalForm),
}

/// Proof that a save was started for one particular opening of the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Record stored, toast shown, modal closed.
    Saved { kind: RecordKind, message: String },
    /// The ticket belonged to an earlier opening of the modal.
    Discarded,
}

#[derive(Debug)]
pub struct ModalController {
    state: ModalState,
    generation: u64,
    in_flight: Option<SaveTicket>,
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalController {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn kind(&self) -> Option<ModalKind> {
        self.form().map(ModalForm::kind)
    }

    pub fn form(&self) -> Option<&ModalForm> {
        match &self.state {
            ModalState::Open(form) => Some(form),
            ModalState::Closed => None,
        }
    }

    /// Bumped by every `open` and `close`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the save button is disabled.
    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Open `kind` with an empty form, replacing whatever was open.
    pub fn open(&mut self, kind: ModalKind) {
        self.generation += 1;
        self.in_flight = None;
        self.state = ModalState::Open(ModalForm::empty(kind));
        tracing::info!(kind = %kind, "Modal opened");
    }

    /// Close and discard unsaved values. Returns false if nothing was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.generation += 1;
        if self.in_flight.take().is_some() {
            tracing::info!("Modal closed with a save in flight, save cancelled");
        }
        self.state = ModalState::Closed;
        was_open
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<(), DashboardError> {
        match &mut self.state {
            ModalState::Open(form) => form.set(field, value),
            ModalState::Closed => Err(DashboardError::ModalNotOpen),
        }
    }

    /// Start a save. Only one save may be in flight per opening.
    pub fn begin_save(&mut self) -> Result<SaveTicket, DashboardError> {
        if !self.is_open() {
            return Err(DashboardError::ModalNotOpen);
        }
        if self.in_flight.is_some() {
            return Err(DashboardError::SaveInFlight);
        }
        let ticket = SaveTicket {
            generation: self.generation,
        };
        self.in_flight = Some(ticket);
        Ok(ticket)
    }

    /// Complete a save started with `begin_save`.
    ///
    /// A ticket from an earlier opening is discarded without touching the
    /// store. On validation failure the modal stays open and can be saved again.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        store: &mut RecordStore,
        notifications: &NotificationQueue,
        today: NaiveDate,
    ) -> Result<SaveOutcome, ValidationError> {
        if self.in_flight != Some(ticket) || ticket.generation != self.generation {
            tracing::debug!(ticket = ticket.generation, current = self.generation, "Stale save discarded");
            return Ok(SaveOutcome::Discarded);
        }
        self.in_flight = None;
        self.commit(store, notifications, today)
    }

    /// Validate and commit immediately, without simulated latency.
    pub fn save(
        &mut self,
        store: &mut RecordStore,
        notifications: &NotificationQueue,
        today: NaiveDate,
    ) -> Result<(), DashboardError> {
        let ticket = self.begin_save()?;
        match self.finish_save(ticket, store, notifications, today)? {
            SaveOutcome::Saved { .. } => Ok(()),
            SaveOutcome::Discarded => Err(DashboardError::ModalNotOpen),
        }
    }

    fn commit(
        &mut self,
        store: &mut RecordStore,
        notifications: &NotificationQueue,
        today: NaiveDate,
    ) -> Result<SaveOutcome, ValidationError> {
        let ModalState::Open(form) = &self.state else {
            return Ok(SaveOutcome::Discarded);
        };

        let ctx = SaveContext {
            today,
            next_prescription_number: store.len(RecordKind::Prescription) + 1,
        };
        let validated = match form.validate(&ctx) {
            Ok(validated) => validated,
            Err(e) => {
                tracing::warn!(kind = %form.kind(), reason = %e, "Modal save rejected");
                return Err(e);
            }
        };

        let kind = validated.record.kind();
        store.prepend(validated.record);
        notifications.success(validated.title, &validated.message);
        tracing::info!(kind = %kind, "Modal saved");
        self.close();
        Ok(SaveOutcome::Saved {
            kind,
            message: validated.message,
        })
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
