//! Serialisable snapshots of the dashboard for whatever frontend draws it.
//!
//! Nothing here holds state. Each type is built from the controllers on
//! demand by `DashboardController::view`.

use serde::Serialize;
use uuid::Uuid;

use crate::analytics::{ChartSpec, TimelineEntry};
use crate::modal::{FieldSpec, InputKind, ModalForm};
use crate::models::{
    Condition, FormField, ModalKind, NotificationKind, PatientProfile, Record, RecordKind,
    SearchFilter, TabId, Timeframe, Treatment,
};
use crate::notifications::{Notification, Toast};
use crate::search::{QuickSearch, SearchResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Patient summary
// ---------------------------------------------------------------------------

/// The red strip across the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyBar {
    pub blood_group: String,
    pub allergies: String,
    pub emergency_contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientSidebar {
    pub name: String,
    pub age_gender: String,
    pub worker_id: String,
    pub occupation: String,
    pub medical_history: Vec<Condition>,
    pub treatments: Vec<Treatment>,
}

impl From<&PatientProfile> for EmergencyBar {
    fn from(patient: &PatientProfile) -> Self {
        Self {
            blood_group: patient.blood_group.clone(),
            allergies: patient.allergy_summary(),
            emergency_contact: patient.emergency_contact.clone(),
        }
    }
}

impl From<&PatientProfile> for PatientSidebar {
    fn from(patient: &PatientProfile) -> Self {
        Self {
            name: patient.name.clone(),
            age_gender: patient.age_gender(),
            worker_id: patient.worker_id.clone(),
            occupation: patient.occupation.clone(),
            medical_history: patient.medical_history.clone(),
            treatments: patient.treatments.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tabs and record cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabView {
    pub id: TabId,
    pub label: &'static str,
    pub active: bool,
    pub count: usize,
}

/// One card in the active tab's panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordCard {
    pub kind: RecordKind,
    /// Present on cards that open a detail view.
    pub id: Option<Uuid>,
    pub title: String,
    pub date: Option<String>,
    pub icon: Option<&'static str>,
    /// Short badge: document format, lab result, vaccination status, flag reason.
    pub tag: Option<String>,
    pub lines: Vec<String>,
}

impl From<&Record> for RecordCard {
    fn from(record: &Record) -> Self {
        let mut card = RecordCard {
            kind: record.kind(),
            id: None,
            title: record.title(),
            date: record.date().map(|d| d.format(DATE_FORMAT).to_string()),
            icon: None,
            tag: None,
            lines: Vec::new(),
        };
        match record {
            Record::Prescription(p) => {
                card.id = Some(p.id);
                card.icon = Some(p.format.icon());
                card.tag = Some(p.format.label().to_string());
                card.lines = p.medicines.iter().map(|m| m.display()).collect();
            }
            Record::Note(n) => {
                if !n.content.is_empty() {
                    card.lines.push(n.content.clone());
                }
            }
            Record::LabReport(r) => {
                card.id = Some(r.id);
                card.icon = Some(r.format.icon());
                card.tag = Some(r.result.clone());
            }
            Record::Visit(v) => {
                card.lines.push(v.notes.clone());
            }
            Record::Vaccination(v) => {
                card.icon = Some(v.status.icon());
                card.tag = Some(v.status.label().to_string());
            }
            Record::Contact(c) => {
                card.tag = Some(c.reason.label().to_string());
                if !c.details.is_empty() {
                    card.lines.push(c.details.clone());
                }
            }
        }
        card
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub tab: TabId,
    pub cards: Vec<RecordCard>,
    /// Only set on the vaccinations panel.
    pub completion_percent: Option<u32>,
    /// Badge text, e.g. "50% Complete".
    pub completion_label: Option<String>,
}

impl PanelView {
    pub fn new(tab: TabId, cards: Vec<RecordCard>, completion_percent: Option<u32>) -> Self {
        Self {
            tab,
            cards,
            completion_percent,
            completion_label: completion_percent.map(|p| format!("{p}% Complete")),
        }
    }
}

// ---------------------------------------------------------------------------
// Modal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub field: FormField,
    pub label: &'static str,
    pub input: InputKind,
    pub placeholder: &'static str,
    pub required: bool,
    pub value: String,
    pub options: Vec<SelectOption>,
}

impl FieldView {
    fn new(spec: &FieldSpec, form: &ModalForm) -> Self {
        let options = match spec.input {
            InputKind::Select(source) => source
                .options()
                .into_iter()
                .map(|(value, label)| SelectOption { value, label })
                .collect(),
            _ => Vec::new(),
        };
        Self {
            field: spec.field,
            label: spec.field.label(),
            input: spec.input,
            placeholder: spec.placeholder,
            required: spec.required,
            value: form.value(spec.field).unwrap_or_default().to_string(),
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub kind: ModalKind,
    pub title: &'static str,
    /// Save button disabled while true.
    pub saving: bool,
    pub fields: Vec<FieldView>,
}

impl ModalView {
    pub fn new(form: &ModalForm, saving: bool) -> Self {
        let kind = form.kind();
        Self {
            kind,
            title: kind.label(),
            saving,
            fields: form.fields().iter().map(|spec| FieldView::new(spec, form)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastView {
    pub id: u64,
    pub kind: NotificationKind,
    pub style: &'static str,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
    pub duration_ms: u64,
}

impl From<&Toast> for ToastView {
    fn from(toast: &Toast) -> Self {
        let kind = toast.notification.kind;
        Self {
            id: toast.id.0,
            kind,
            style: kind.style(),
            icon: kind.icon(),
            title: toast.notification.title.clone(),
            message: toast.notification.message.clone(),
            duration_ms: toast.duration_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntryView {
    pub kind: NotificationKind,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
    pub time: String,
}

impl From<&Notification> for LogEntryView {
    fn from(n: &Notification) -> Self {
        Self {
            kind: n.kind,
            icon: n.kind.icon(),
            title: n.title.clone(),
            message: n.message.clone(),
            time: n.time_label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogPanelView {
    pub visible: bool,
    pub entries: Vec<LogEntryView>,
}

// ---------------------------------------------------------------------------
// Overlays and analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FabView {
    pub open: bool,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsView {
    pub timeframe: Option<Timeframe>,
    pub vitals: ChartSpec,
    pub health_score: ChartSpec,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchView {
    pub open: bool,
    pub query: String,
    pub filter: SearchFilter,
    pub results: Vec<SearchResult>,
    /// Show the "No results found" row.
    pub no_results: bool,
}

impl From<&QuickSearch> for SearchView {
    fn from(search: &QuickSearch) -> Self {
        Self {
            open: search.is_open(),
            query: search.query().to_string(),
            filter: search.filter(),
            results: search.results().to_vec(),
            no_results: search.shows_no_results(),
        }
    }
}

// ---------------------------------------------------------------------------
// Whole dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// True during the initial loading pulse.
    pub loading: bool,
    pub emergency_bar: EmergencyBar,
    pub sidebar: PatientSidebar,
    pub tabs: Vec<TabView>,
    pub panel: PanelView,
    pub modal: Option<ModalView>,
    pub toasts: Vec<ToastView>,
    pub notification_log: LogPanelView,
    pub fab: FabView,
    pub search: SearchView,
    pub analytics: AnalyticsView,
}
