//! Quick search overlay over a fixed catalog of patients, conditions and
//! medications.

use serde::Serialize;

use crate::config::SEARCH_MIN_QUERY_LEN;
use crate::error::DashboardError;
use crate::models::{SearchFilter, SearchResultType};
use crate::notifications::NotificationQueue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub kind: SearchResultType,
    pub name: String,
    pub detail: String,
    pub icon: String,
}

impl SearchResult {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.detail.to_lowercase().contains(needle)
    }
}

const CATALOG: &[(SearchResultType, &str, &str, &str)] = &[
    (SearchResultType::Patient, "Rajesh Kumar", "Construction Worker, ID: KL-MW-2024-1234", "fa-user"),
    (SearchResultType::Patient, "Priya Sharma", "Factory Worker, ID: KL-MW-2024-1235", "fa-user"),
    (SearchResultType::Condition, "Hypertension", "High blood pressure condition", "fa-heartbeat"),
    (SearchResultType::Condition, "Diabetes Type 2", "Blood sugar management", "fa-tint"),
    (SearchResultType::Medication, "Lisinopril", "ACE inhibitor for blood pressure", "fa-pills"),
    (SearchResultType::Medication, "Metformin", "Diabetes medication", "fa-pills"),
];

fn catalog() -> impl Iterator<Item = SearchResult> {
    CATALOG.iter().map(|(kind, name, detail, icon)| SearchResult {
        kind: *kind,
        name: name.to_string(),
        detail: detail.to_string(),
        icon: icon.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickSearch {
    open: bool,
    query: String,
    filter: SearchFilter,
    results: Vec<SearchResult>,
}

impl Default for QuickSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl QuickSearch {
    pub fn new() -> Self {
        Self {
            open: false,
            query: String::new(),
            filter: SearchFilter::All,
            results: Vec::new(),
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the overlay and clear the query and results. The filter is kept.
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.results.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> SearchFilter {
        self.filter
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// True when a long enough query matched nothing.
    pub fn shows_no_results(&self) -> bool {
        self.query_is_searchable() && self.results.is_empty()
    }

    pub fn set_query(&mut self, query: &str) -> &[SearchResult] {
        self.query = query.to_string();
        self.refresh();
        &self.results
    }

    /// Change the filter and re-run the current query.
    pub fn set_filter(&mut self, filter: SearchFilter) -> &[SearchResult] {
        self.filter = filter;
        self.refresh();
        &self.results
    }

    /// Pick the result at `index`, announce it and close the overlay.
    pub fn select(
        &mut self,
        index: usize,
        notifications: &NotificationQueue,
    ) -> Result<SearchResult, DashboardError> {
        let result = self
            .results
            .get(index)
            .cloned()
            .ok_or(DashboardError::NoSuchSearchResult(index))?;
        notifications.success("Selected", &format!("Selected {}: {}", result.kind, result.name));
        tracing::info!(kind = %result.kind, name = %result.name, "Search result selected");
        self.close();
        Ok(result)
    }

    fn query_is_searchable(&self) -> bool {
        self.query.chars().count() >= SEARCH_MIN_QUERY_LEN
    }

    fn refresh(&mut self) {
        if !self.query_is_searchable() {
            self.results.clear();
            return;
        }
        let needle = self.query.to_lowercase();
        let filter = self.filter;
        self.results = catalog()
            .filter(|r| filter.accepts(r.kind) && r.matches(&needle))
            .collect();
    }
}
