//! The dashboard orchestrator.
//!
//! `DashboardController` owns every piece of UI state and consumes
//! `DashboardEvent`s from an unbounded channel. Simulated latency is a
//! spawned sleep that posts a follow-up event back onto the same channel,
//! so all state changes happen on the controller, one event at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::alerts::{self, AlertSink, TracingAlertSink};
use crate::analytics::{self, ChartRenderer, HealthAnalytics, TracingChartRenderer};
use crate::clock::{Clock, SystemClock};
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::fab::{FabFollowup, FabMenu};
use crate::modal::{ModalController, SaveOutcome, SaveTicket};
use crate::models::{
    FabAction, FormField, ModalKind, PatientProfile, PlaceholderAction, SearchFilter, TabId,
    Timeframe,
};
use crate::notifications::{NotificationQueue, ToastId};
use crate::record_store::RecordStore;
use crate::search::QuickSearch;
use crate::tabs::{TabController, TabTransition};
use crate::view::{
    AnalyticsView, DashboardView, EmergencyBar, FabView, LogEntryView, LogPanelView, ModalView,
    PanelView, PatientSidebar, RecordCard, SearchView, TabView, ToastView,
};

// ═══════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    // ── User input ──
    SwitchTab(TabId),
    OpenModal(ModalKind),
    SetField(FormField, String),
    SaveModal,
    CloseModal,
    ToggleFab,
    CloseFab,
    Fab(FabAction),
    OpenSearch,
    CloseSearch,
    SearchQuery(String),
    SearchFilter(SearchFilter),
    SelectSearchResult(usize),
    SetTimeframe(Timeframe),
    OpenPrescription(Uuid),
    OpenReport(Uuid),
    Placeholder(PlaceholderAction),
    ShowLog,
    HideLog,
    ClearLog,
    DismissToast(ToastId),

    // ── Timers ──
    LoadingFinished,
    TabTransitionDone(TabTransition),
    SaveCompleted(SaveTicket),
    FabFollowup(DeferredFollowup),

    /// Stop `run`.
    Shutdown,
}

impl DashboardEvent {
    /// Events that come from the user rather than from an elapsed timer.
    pub fn is_user_input(&self) -> bool {
        !matches!(
            self,
            DashboardEvent::LoadingFinished
                | DashboardEvent::TabTransitionDone(_)
                | DashboardEvent::SaveCompleted(_)
                | DashboardEvent::FabFollowup(_)
                | DashboardEvent::Shutdown
        )
    }
}

/// A FAB follow-up stamped with the modal and tab generations current when
/// it was scheduled. It is dropped if the user changed either since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredFollowup {
    followup: FabFollowup,
    modal_generation: u64,
    tab_generation: u64,
}

// ═══════════════════════════════════════════════════════════
// Collaborators
// ═══════════════════════════════════════════════════════════

/// Injected outside-world dependencies.
#[derive(Clone)]
pub struct Collaborators {
    pub clock: Arc<dyn Clock>,
    pub charts: Arc<dyn ChartRenderer>,
    pub alerts: Arc<dyn AlertSink>,
}

impl Collaborators {
    /// System clock, charts and alerts written to the log.
    pub fn headless() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            charts: Arc::new(TracingChartRenderer),
            alerts: Arc::new(TracingAlertSink),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// DashboardController
// ═══════════════════════════════════════════════════════════

pub struct DashboardController {
    config: DashboardConfig,
    patient: PatientProfile,
    store: RecordStore,
    tabs: TabController,
    modal: ModalController,
    fab: FabMenu,
    search: QuickSearch,
    analytics: HealthAnalytics,
    notifications: NotificationQueue,
    clock: Arc<dyn Clock>,
    alerts: Arc<dyn AlertSink>,
    loading: bool,
    events_tx: mpsc::UnboundedSender<DashboardEvent>,
    events_rx: mpsc::UnboundedReceiver<DashboardEvent>,
}

impl DashboardController {
    /// Build the dashboard for the demo patient and start its loading pulse.
    pub fn new(
        config: DashboardConfig,
        notifications: NotificationQueue,
        collaborators: Collaborators,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let patient = PatientProfile::demo();
        notifications.seed_initial_log(&patient.name);

        let dashboard = Self {
            patient,
            store: RecordStore::seeded(),
            tabs: TabController::new(),
            modal: ModalController::new(),
            fab: FabMenu::new(),
            search: QuickSearch::new(),
            analytics: HealthAnalytics::new(collaborators.charts),
            notifications,
            clock: collaborators.clock,
            alerts: collaborators.alerts,
            loading: true,
            events_tx,
            events_rx,
            config,
        };
        tracing::info!(patient = %dashboard.patient.name, "Dashboard loading");
        dashboard.schedule(dashboard.config.dashboard_load_delay, DashboardEvent::LoadingFinished);
        dashboard
    }

    /// Handle for posting events from outside the controller.
    pub fn sender(&self) -> mpsc::UnboundedSender<DashboardEvent> {
        self.events_tx.clone()
    }

    // ── Accessors ──────────────────────────────────────────

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn patient(&self) -> &PatientProfile {
        &self.patient
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn tabs(&self) -> &TabController {
        &self.tabs
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn fab(&self) -> &FabMenu {
        &self.fab
    }

    pub fn search(&self) -> &QuickSearch {
        &self.search
    }

    pub fn analytics(&self) -> &HealthAnalytics {
        &self.analytics
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    // ── Event loop ─────────────────────────────────────────

    /// Wait for one event and handle it. Returns false on `Shutdown`.
    pub async fn tick(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => self.handle(event),
            None => false,
        }
    }

    /// Handle events until `Shutdown`.
    pub async fn run(&mut self) {
        while self.tick().await {}
        tracing::info!("Dashboard event loop stopped");
    }

    /// Handle events for `duration`, then return. Returns false if
    /// `Shutdown` arrived first.
    pub async fn run_for(&mut self, duration: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => return true,
                event = self.events_rx.recv() => match event {
                    Some(event) => {
                        if !self.handle(event) {
                            return false;
                        }
                    }
                    None => return false,
                },
            }
        }
    }

    /// Apply one event now.
    ///
    /// User input is ignored while the dashboard is still loading.
    pub fn dispatch(&mut self, event: DashboardEvent) -> Result<(), DashboardError> {
        if self.loading && event.is_user_input() {
            tracing::debug!(?event, "Ignored while loading");
            return Ok(());
        }

        match event {
            DashboardEvent::SwitchTab(tab) => {
                if let Some(transition) = self.tabs.request(tab) {
                    self.schedule(
                        self.config.tab_transition,
                        DashboardEvent::TabTransitionDone(transition),
                    );
                }
            }
            DashboardEvent::TabTransitionDone(transition) => {
                self.tabs.complete(transition, &self.notifications);
            }
            DashboardEvent::OpenModal(kind) => self.modal.open(kind),
            DashboardEvent::SetField(field, value) => self.modal.set_field(field, value)?,
            DashboardEvent::SaveModal => {
                let ticket = self.modal.begin_save()?;
                self.schedule(self.config.modal_save_latency, DashboardEvent::SaveCompleted(ticket));
            }
            DashboardEvent::SaveCompleted(ticket) => {
                let today = self.clock.today();
                let outcome =
                    self.modal
                        .finish_save(ticket, &mut self.store, &self.notifications, today)?;
                if outcome == SaveOutcome::Discarded {
                    tracing::debug!("Save completed after modal was closed");
                }
            }
            DashboardEvent::CloseModal => {
                self.modal.close();
            }
            DashboardEvent::ToggleFab => self.fab.toggle(),
            DashboardEvent::CloseFab => self.fab.close(),
            DashboardEvent::Fab(action) => self.trigger_fab(action),
            DashboardEvent::FabFollowup(deferred) => self.apply_deferred(deferred)?,
            DashboardEvent::OpenSearch => self.search.open(),
            DashboardEvent::CloseSearch => self.search.close(),
            DashboardEvent::SearchQuery(query) => {
                self.search.set_query(&query);
            }
            DashboardEvent::SearchFilter(filter) => {
                self.search.set_filter(filter);
            }
            DashboardEvent::SelectSearchResult(index) => {
                self.search.select(index, &self.notifications)?;
            }
            DashboardEvent::SetTimeframe(timeframe) => {
                self.analytics.set_timeframe(timeframe, &self.notifications);
            }
            DashboardEvent::OpenPrescription(id) => {
                let prescription = self
                    .store
                    .prescription(id)
                    .ok_or(DashboardError::UnknownRecord(id))?;
                self.alerts.alert(&alerts::prescription_detail(prescription));
            }
            DashboardEvent::OpenReport(id) => {
                let report = self
                    .store
                    .lab_report(id)
                    .ok_or(DashboardError::UnknownRecord(id))?;
                self.alerts.alert(&alerts::report_detail(report));
            }
            DashboardEvent::Placeholder(action) => {
                self.alerts.alert(&alerts::placeholder_message(action));
            }
            DashboardEvent::ShowLog => self.notifications.show_log(),
            DashboardEvent::HideLog => self.notifications.hide_log(),
            DashboardEvent::ClearLog => self.notifications.clear_log()?,
            DashboardEvent::DismissToast(id) => {
                self.notifications.dismiss(id);
            }
            DashboardEvent::LoadingFinished => self.finish_loading(),
            DashboardEvent::Shutdown => {}
        }
        Ok(())
    }

    /// Snapshot of everything on screen.
    pub fn view(&self) -> DashboardView {
        let active = self.tabs.active();
        let tabs = TabId::ALL
            .iter()
            .map(|tab| TabView {
                id: *tab,
                label: tab.label(),
                active: self.tabs.is_active(*tab),
                count: self.store.len(tab.record_kind()),
            })
            .collect();
        let panel = PanelView::new(
            active,
            self.store
                .all(active.record_kind())
                .iter()
                .map(RecordCard::from)
                .collect(),
            (active == TabId::Vaccinations).then(|| self.store.vaccination_percent()),
        );

        DashboardView {
            loading: self.loading,
            emergency_bar: EmergencyBar::from(&self.patient),
            sidebar: PatientSidebar::from(&self.patient),
            tabs,
            panel,
            modal: self
                .modal
                .form()
                .map(|form| ModalView::new(form, self.modal.is_saving())),
            toasts: self.notifications.toasts().iter().map(ToastView::from).collect(),
            notification_log: LogPanelView {
                visible: self.notifications.is_log_visible(),
                entries: self.notifications.log().iter().map(LogEntryView::from).collect(),
            },
            fab: FabView {
                open: self.fab.is_open(),
                icon: self.fab.icon(),
            },
            search: SearchView::from(&self.search),
            analytics: AnalyticsView {
                timeframe: self.analytics.timeframe(),
                vitals: self.analytics.vitals(),
                health_score: analytics::health_score_gauge(),
                timeline: analytics::medical_timeline(),
            },
        }
    }

    // ── Internal ────────────────────────────────────────────

    /// Returns false on `Shutdown`.
    fn handle(&mut self, event: DashboardEvent) -> bool {
        if event == DashboardEvent::Shutdown {
            return false;
        }
        if let Err(e) = self.dispatch(event) {
            self.report(e);
        }
        true
    }

    fn report(&self, error: DashboardError) {
        match error {
            DashboardError::Validation(e) => {
                tracing::warn!(reason = %e, field = ?e.field, "Validation failed");
                self.notifications.warning("Warning", &e.reason);
            }
            other => tracing::error!(error = %other, "Dashboard event failed"),
        }
    }

    fn finish_loading(&mut self) {
        if !self.loading {
            return;
        }
        self.loading = false;
        self.analytics.render();
        tracing::info!("Dashboard loaded");
        self.notifications.success(
            "Welcome",
            &format!("Welcome! Viewing {}'s medical record", self.patient.name),
        );
    }

    fn trigger_fab(&mut self, action: FabAction) {
        let effect = self.fab.trigger(action);
        if let Some(notice) = effect.notice {
            self.notifications.push(
                notice.kind,
                notice.title,
                notice.message,
                self.notifications.default_duration(),
            );
        }
        if let Some(followup) = effect.followup {
            if effect.deferred {
                let deferred = DeferredFollowup {
                    followup,
                    modal_generation: self.modal.generation(),
                    tab_generation: self.tabs.generation(),
                };
                self.schedule(self.config.fab_followup_delay, DashboardEvent::FabFollowup(deferred));
            } else if let Err(e) = self.apply_followup(followup) {
                self.report(e);
            }
        }
    }

    fn apply_deferred(&mut self, deferred: DeferredFollowup) -> Result<(), DashboardError> {
        let superseded = match deferred.followup {
            FabFollowup::OpenModal(_) => deferred.modal_generation != self.modal.generation(),
            FabFollowup::SwitchTab(_) => deferred.tab_generation != self.tabs.generation(),
            FabFollowup::OpenSearch => false,
        };
        if superseded {
            tracing::debug!(followup = ?deferred.followup, "FAB follow-up superseded by user input");
            return Ok(());
        }
        self.apply_followup(deferred.followup)
    }

    fn apply_followup(&mut self, followup: FabFollowup) -> Result<(), DashboardError> {
        match followup {
            FabFollowup::OpenModal(kind) => self.modal.open(kind),
            FabFollowup::SwitchTab(tab) => self.dispatch(DashboardEvent::SwitchTab(tab))?,
            FabFollowup::OpenSearch => self.search.open(),
        }
        Ok(())
    }

    /// Post `event` back to this controller after `delay`.
    fn schedule(&self, delay: Duration, event: DashboardEvent) {
        let tx = self.events_tx.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if tx.send(event).is_err() {
                        tracing::debug!("Dashboard dropped before timer fired");
                    }
                });
            }
            Err(_) => {
                tracing::warn!(?event, "No tokio runtime, delivering timer event immediately");
                let _ = tx.send(event);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::tests::RecordingSink;
    use crate::analytics::tests::RecordingRenderer;
    use crate::clock::FixedClock;
    use crate::models::{NotificationKind, RecordKind};

    struct Harness {
        dashboard: DashboardController,
        alerts: Arc<RecordingSink>,
        charts: Arc<RecordingRenderer>,
    }

    fn harness() -> Harness {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::on(2025, 9, 18).unwrap());
        let alerts = Arc::new(RecordingSink::default());
        let charts = Arc::new(RecordingRenderer::default());
        let config = DashboardConfig::default();
        let notifications = NotificationQueue::new(clock.clone(), config.toast_duration);
        let dashboard = DashboardController::new(
            config,
            notifications,
            Collaborators {
                clock,
                charts: charts.clone(),
                alerts: alerts.clone(),
            },
        );
        Harness {
            dashboard,
            alerts,
            charts,
        }
    }

    async fn loaded() -> Harness {
        let mut h = harness();
        h.dashboard.run_for(Duration::from_millis(801)).await;
        assert!(!h.dashboard.is_loading());
        h
    }

    fn send(dashboard: &DashboardController, event: DashboardEvent) {
        dashboard.sender().send(event).unwrap();
    }

    fn last_log(dashboard: &DashboardController) -> (NotificationKind, String, String) {
        let entry = dashboard.notifications().log()[0].clone();
        (entry.kind, entry.title, entry.message)
    }

    // ───────────────────────────────────────
    // loading
    // ───────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn loading_pulse_then_welcome() {
        let mut h = harness();
        assert!(h.dashboard.is_loading());
        assert_eq!(h.dashboard.notifications().log_len(), 2);

        h.dashboard.run_for(Duration::from_millis(799)).await;
        assert!(h.dashboard.is_loading());

        h.dashboard.run_for(Duration::from_millis(2)).await;
        assert!(!h.dashboard.is_loading());
        let (kind, _, message) = last_log(&h.dashboard);
        assert_eq!(kind, NotificationKind::Success);
        assert_eq!(message, "Welcome! Viewing Rajesh Kumar's medical record");
        assert_eq!(h.charts.charts.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn user_input_is_ignored_while_loading() {
        let mut h = harness();
        h.dashboard.dispatch(DashboardEvent::OpenModal(ModalKind::Diagnosis)).unwrap();
        assert!(!h.dashboard.modal().is_open());
    }

    // ───────────────────────────────────────
    // tabs
    // ───────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn tab_switch_lands_after_transition() {
        let mut h = loaded().await;
        send(&h.dashboard, DashboardEvent::SwitchTab(TabId::Labs));

        h.dashboard.run_for(Duration::from_millis(100)).await;
        assert_eq!(h.dashboard.tabs().active(), TabId::Prescriptions);

        h.dashboard.run_for(Duration::from_millis(100)).await;
        assert_eq!(h.dashboard.tabs().active(), TabId::Labs);
        assert_eq!(last_log(&h.dashboard).2, "Switched to labs view");
    }

    #[tokio::test(start_paused = true)]
    async fn double_switch_notifies_once() {
        let mut h = loaded().await;
        let before = h.dashboard.notifications().log_len();
        send(&h.dashboard, DashboardEvent::SwitchTab(TabId::Visits));
        send(&h.dashboard, DashboardEvent::SwitchTab(TabId::Visits));
        h.dashboard.run_for(Duration::from_millis(500)).await;

        assert_eq!(h.dashboard.tabs().active(), TabId::Visits);
        assert_eq!(h.dashboard.notifications().log_len(), before + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn clicking_back_mid_transition_stays_put() {
        let mut h = loaded().await;
        let before = h.dashboard.notifications().log_len();
        send(&h.dashboard, DashboardEvent::SwitchTab(TabId::Labs));
        h.dashboard.run_for(Duration::from_millis(50)).await;
        send(&h.dashboard, DashboardEvent::SwitchTab(TabId::Prescriptions));
        h.dashboard.run_for(Duration::from_millis(500)).await;

        assert_eq!(h.dashboard.tabs().active(), TabId::Prescriptions);
        assert_eq!(h.dashboard.tabs().pending(), None);
        assert_eq!(h.dashboard.notifications().log_len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_switches_end_on_last_click() {
        let mut h = loaded().await;
        let before = h.dashboard.notifications().log_len();
        send(&h.dashboard, DashboardEvent::SwitchTab(TabId::Labs));
        h.dashboard.run_for(Duration::from_millis(50)).await;
        send(&h.dashboard, DashboardEvent::SwitchTab(TabId::Visits));
        h.dashboard.run_for(Duration::from_millis(500)).await;

        assert_eq!(h.dashboard.tabs().active(), TabId::Visits);
        assert_eq!(h.dashboard.notifications().log_len(), before + 1);
        assert_eq!(last_log(&h.dashboard).2, "Switched to visits view");
    }

    // ───────────────────────────────────────
    // modal saves
    // ───────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn save_with_latency_prepends_and_closes() {
        let mut h = loaded().await;
        let d = &mut h.dashboard;
        d.dispatch(DashboardEvent::OpenModal(ModalKind::Prescription)).unwrap();
        d.dispatch(DashboardEvent::SetField(FormField::MedicineName, "Paracetamol".into())).unwrap();
        d.dispatch(DashboardEvent::SetField(FormField::Dosage, "500mg".into())).unwrap();
        d.dispatch(DashboardEvent::SaveModal).unwrap();

        assert!(d.modal().is_saving());
        assert!(matches!(d.dispatch(DashboardEvent::SaveModal), Err(DashboardError::SaveInFlight)));

        d.run_for(Duration::from_millis(999)).await;
        assert!(d.modal().is_open());

        d.run_for(Duration::from_millis(2)).await;
        assert!(!d.modal().is_open());
        let head = d.store().all(RecordKind::Prescription)[0].as_prescription().unwrap();
        assert_eq!(head.medicines[0].display(), "Paracetamol 500mg");
        assert_eq!(head.date.to_string(), "2025-09-18");
        assert_eq!(last_log(d).2, "Prescription added: Paracetamol 500mg");
    }

    #[tokio::test(start_paused = true)]
    async fn validation_failure_surfaces_as_warning_toast() {
        let mut h = loaded().await;
        let d = &mut h.dashboard;
        d.dispatch(DashboardEvent::OpenModal(ModalKind::Reminder)).unwrap();
        d.dispatch(DashboardEvent::SaveModal).unwrap();
        d.run_for(Duration::from_millis(1001)).await;

        assert!(d.modal().is_open());
        assert!(!d.modal().is_saving());
        assert_eq!(d.store().len(RecordKind::Note), 3);
        let (kind, _, message) = last_log(d);
        assert_eq!(kind, NotificationKind::Warning);
        assert_eq!(message, "Please select a date and time");
    }

    #[tokio::test(start_paused = true)]
    async fn closing_mid_save_discards_it() {
        let mut h = loaded().await;
        let d = &mut h.dashboard;
        d.dispatch(DashboardEvent::OpenModal(ModalKind::Diagnosis)).unwrap();
        d.dispatch(DashboardEvent::SetField(FormField::Diagnosis, "Flu".into())).unwrap();
        d.dispatch(DashboardEvent::SaveModal).unwrap();
        d.run_for(Duration::from_millis(300)).await;
        d.dispatch(DashboardEvent::CloseModal).unwrap();
        let log_before = d.notifications().log_len();

        d.run_for(Duration::from_millis(1000)).await;
        assert!(!d.modal().is_open());
        assert_eq!(d.store().len(RecordKind::Note), 3);
        assert_eq!(d.notifications().log_len(), log_before);
    }

    // ───────────────────────────────────────
    // FAB and search
    // ───────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn fab_prescription_opens_modal_after_delay() {
        let mut h = loaded().await;
        let d = &mut h.dashboard;
        d.dispatch(DashboardEvent::ToggleFab).unwrap();
        d.dispatch(DashboardEvent::Fab(FabAction::Prescription)).unwrap();

        assert!(!d.fab().is_open());
        assert_eq!(last_log(d).1, "Quick Prescription");
        assert!(!d.modal().is_open());

        d.run_for(Duration::from_millis(501)).await;
        assert_eq!(d.modal().kind(), Some(ModalKind::Prescription));
    }

    #[tokio::test(start_paused = true)]
    async fn fab_notes_switches_tab() {
        let mut h = loaded().await;
        let d = &mut h.dashboard;
        d.dispatch(DashboardEvent::Fab(FabAction::Notes)).unwrap();
        d.run_for(Duration::from_millis(700)).await;
        assert_eq!(d.tabs().active(), TabId::Notes);
    }

    #[tokio::test(start_paused = true)]
    async fn fab_modal_followup_yields_to_user_save() {
        let mut h = loaded().await;
        let d = &mut h.dashboard;
        d.dispatch(DashboardEvent::Fab(FabAction::Prescription)).unwrap();
        d.dispatch(DashboardEvent::OpenModal(ModalKind::Diagnosis)).unwrap();
        d.dispatch(DashboardEvent::SetField(FormField::Diagnosis, "Flu".into())).unwrap();
        d.dispatch(DashboardEvent::SaveModal).unwrap();

        d.run_for(Duration::from_millis(600)).await;
        assert_eq!(d.modal().kind(), Some(ModalKind::Diagnosis));
        assert!(d.modal().is_saving());

        d.run_for(Duration::from_millis(900)).await;
        assert!(!d.modal().is_open());
        assert_eq!(d.store().len(RecordKind::Note), 4);
        assert_eq!(d.store().all(RecordKind::Note)[0].title(), "Diagnosis: Flu");
    }

    #[tokio::test(start_paused = true)]
    async fn fab_tab_followup_yields_to_user_click() {
        let mut h = loaded().await;
        let d = &mut h.dashboard;
        d.dispatch(DashboardEvent::Fab(FabAction::Notes)).unwrap();
        d.run_for(Duration::from_millis(100)).await;
        d.dispatch(DashboardEvent::SwitchTab(TabId::Labs)).unwrap();

        d.run_for(Duration::from_millis(1000)).await;
        assert_eq!(d.tabs().active(), TabId::Labs);
        assert_eq!(d.tabs().pending(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn fab_emergency_is_an_emergency_toast() {
        let mut h = loaded().await;
        let d = &mut h.dashboard;
        d.dispatch(DashboardEvent::Fab(FabAction::Emergency)).unwrap();
        let toast = d.view().toasts.last().cloned().unwrap();
        assert_eq!(toast.title, "Emergency Alert");
        assert_eq!(toast.style, "error");
    }

    #[tokio::test(start_paused = true)]
    async fn fab_search_then_select() {
        let mut h = loaded().await;
        let d = &mut h.dashboard;
        d.dispatch(DashboardEvent::Fab(FabAction::Search)).unwrap();
        assert!(d.search().is_open());

        d.dispatch(DashboardEvent::SearchQuery("metf".into())).unwrap();
        d.dispatch(DashboardEvent::SelectSearchResult(0)).unwrap();
        assert!(!d.search().is_open());
        assert_eq!(last_log(d).2, "Selected medication: Metformin");
    }

    // ───────────────────────────────────────
    // placeholders, analytics, view
    // ───────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn record_details_go_to_alert_sink() {
        let mut h = loaded().await;
        let id = h.dashboard.store().all(RecordKind::LabReport)[2]
            .as_lab_report()
            .unwrap()
            .id;
        h.dashboard.dispatch(DashboardEvent::OpenReport(id)).unwrap();
        h.dashboard
            .dispatch(DashboardEvent::Placeholder(PlaceholderAction::QrScan))
            .unwrap();

        let alerts = h.alerts.alerts.lock().unwrap();
        assert!(alerts[0].starts_with("Opening report: Chest X-Ray"));
        assert_eq!(alerts[1], "QR Code Scanner would open here");
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_record_is_an_error() {
        let mut h = loaded().await;
        let id = Uuid::new_v4();
        let err = h.dashboard.dispatch(DashboardEvent::OpenPrescription(id)).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownRecord(e) if e == id));
        assert!(h.alerts.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timeframe_change_redraws_vitals() {
        let mut h = loaded().await;
        h.dashboard.dispatch(DashboardEvent::SetTimeframe(Timeframe::Week)).unwrap();
        assert_eq!(h.dashboard.analytics().timeframe(), Some(Timeframe::Week));
        assert_eq!(h.charts.charts.lock().unwrap().len(), 3);
        assert_eq!(last_log(&h.dashboard).2, "Switched to This Week view");
    }

    #[tokio::test(start_paused = true)]
    async fn view_reflects_state() {
        let mut h = loaded().await;
        let d = &mut h.dashboard;
        send(d, DashboardEvent::SwitchTab(TabId::Vaccinations));
        d.run_for(Duration::from_millis(200)).await;
        d.dispatch(DashboardEvent::OpenModal(ModalKind::Flag)).unwrap();

        let view = d.view();
        assert!(!view.loading);
        assert_eq!(view.sidebar.name, "Rajesh Kumar");
        assert_eq!(view.panel.tab, TabId::Vaccinations);
        assert_eq!(view.panel.cards.len(), 4);
        assert_eq!(view.panel.completion_percent, Some(50));
        assert_eq!(view.panel.completion_label.as_deref(), Some("50% Complete"));
        assert_eq!(view.tabs.iter().filter(|t| t.active).count(), 1);
        assert_eq!(view.modal.as_ref().map(|m| m.title), Some("Flag Case"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["panel"]["tab"], "vaccinations");
        assert_eq!(json["analytics"]["health_score"]["value"], 78.0);
        assert_eq!(json["search"]["no_results"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn log_controls() {
        let mut h = loaded().await;
        let d = &mut h.dashboard;
        d.dispatch(DashboardEvent::ShowLog).unwrap();
        assert!(d.view().notification_log.visible);
        d.dispatch(DashboardEvent::ClearLog).unwrap();
        assert_eq!(d.notifications().log_len(), 1);
        d.dispatch(DashboardEvent::HideLog).unwrap();
        assert!(!d.notifications().is_log_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown() {
        let mut h = loaded().await;
        send(&h.dashboard, DashboardEvent::OpenModal(ModalKind::Diagnosis));
        send(&h.dashboard, DashboardEvent::Shutdown);
        h.dashboard.run().await;
        assert!(h.dashboard.modal().is_open());
    }
}
