pub mod config;
pub mod error;
pub mod clock;
pub mod models;
pub mod record_store; // Patient record sequences
pub mod notifications; // Toasts + notification log
pub mod tabs;
pub mod modal; // Modal forms, validation, two-phase save
pub mod auth; // Mock login gate
pub mod progress;
pub mod fab;
pub mod search;
pub mod analytics; // Vitals chart, health score, timeline
pub mod alerts;
pub mod view; // Serialisable dashboard snapshots
pub mod dashboard; // Event-loop orchestrator
pub mod session; // Boot sequence

use std::process::ExitCode;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::config::DashboardConfig;
use crate::dashboard::{Collaborators, DashboardEvent};
use crate::error::DashboardError;
use crate::models::{FormField, ModalKind, SearchFilter, TabId, Timeframe};
use crate::session::Credentials;
use crate::view::DashboardView;

/// `doctor-dashboard [ID] [PASSWORD]`: boot a session, play a short scripted
/// interaction and print the resulting view as JSON.
pub fn run() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let mut args = std::env::args().skip(1);
    let credentials = Credentials::new(
        args.next().unwrap_or_else(|| "demo".to_string()),
        args.next().unwrap_or_else(|| "demo".to_string()),
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start async runtime");
            return ExitCode::FAILURE;
        }
    };

    let view = match runtime.block_on(demo_session(credentials)) {
        Ok(view) => view,
        Err(e) => {
            tracing::error!(error = %e, "Demo session failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&view) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialise dashboard view");
            ExitCode::FAILURE
        }
    }
}

async fn demo_session(credentials: Credentials) -> Result<DashboardView, DashboardError> {
    let config = DashboardConfig::from_env();
    let mut session = session::boot(config.clone(), &credentials, Collaborators::headless()).await?;
    let dashboard = &mut session.dashboard;
    dashboard.run_for(config.dashboard_load_delay).await;

    let script = [
        DashboardEvent::SwitchTab(TabId::Notes),
        DashboardEvent::OpenModal(ModalKind::Diagnosis),
        DashboardEvent::SetField(FormField::Diagnosis, "Seasonal influenza".to_string()),
        DashboardEvent::SetField(FormField::DiagnosisNotes, "Rest and fluids for 5 days".to_string()),
        DashboardEvent::SaveModal,
        DashboardEvent::SetTimeframe(Timeframe::Month),
        DashboardEvent::OpenSearch,
        DashboardEvent::SearchFilter(SearchFilter::Conditions),
        DashboardEvent::SearchQuery("hyper".to_string()),
    ];
    for event in script {
        dashboard.dispatch(event)?;
    }

    let settle = config.modal_save_latency + config.tab_transition + Duration::from_millis(50);
    dashboard.run_for(settle).await;
    Ok(dashboard.view())
}
