//! Past predictions and their summary statistics
//!
//! The aggregator owns the list shown by the history view. Fetches are
//! generation-tagged like upload sessions: when a newer fetch has started,
//! the completion of an older one is dropped instead of overwriting the list.
//! A failed fetch replaces the list with an empty one plus an error message;
//! there is no partial success.

use crate::api::{FetchError, HistoryPage, HistoryRecord};
use crate::core::traits::HistorySource;
use serde::Serialize;
use std::sync::Arc;

/// Number of records requested when the caller does not say otherwise
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Display band for a confidence value.
///
/// Boundaries are strict: exactly 0.8 is `Medium`, exactly 0.5 is `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn for_confidence(confidence: f64) -> Self {
        if confidence > 0.8 {
            ConfidenceBand::High
        } else if confidence > 0.5 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}

/// Derived statistics over a fetched list, never stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoryAggregate {
    pub count: usize,
    /// Mean confidence as a rounded integer percentage, 0 for an empty list
    pub mean_confidence_percent: u32,
    /// Records whose label is not "Healthy"
    pub issue_count: usize,
}

pub fn summarize(records: &[HistoryRecord]) -> HistoryAggregate {
    let count = records.len();
    let mean_confidence_percent = if count > 0 {
        let sum: f64 = records.iter().map(|r| r.confidence).sum();
        (sum / count as f64 * 100.0).round() as u32
    } else {
        0
    };
    let issue_count = records.iter().filter(|r| !r.is_healthy()).count();

    HistoryAggregate {
        count,
        mean_confidence_percent,
        issue_count,
    }
}

/// Pending fetch, tagged with the aggregator generation that started it
#[derive(Debug, Clone, Copy)]
pub struct FetchTicket {
    generation: u64,
    limit: usize,
    skip: usize,
}

impl FetchTicket {
    pub async fn run(self, source: &dyn HistorySource) -> FetchOutcome {
        tracing::debug!("Fetching history (limit {}, skip {})", self.limit, self.skip);
        let result = source.fetch_history(self.limit, self.skip).await.map(|mut page| {
            page.results.truncate(self.limit);
            page
        });
        FetchOutcome {
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug)]
pub struct FetchOutcome {
    generation: u64,
    result: Result<HistoryPage, FetchError>,
}

pub struct HistoryAggregator {
    source: Arc<dyn HistorySource>,
    limit: usize,
    generation: u64,
    loading: bool,
    records: Vec<HistoryRecord>,
    total: Option<u64>,
    error: Option<String>,
}

impl HistoryAggregator {
    pub fn new(source: Arc<dyn HistorySource>) -> Self {
        Self::with_limit(source, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(source: Arc<dyn HistorySource>, limit: usize) -> Self {
        Self {
            source,
            limit,
            generation: 0,
            loading: false,
            records: Vec::new(),
            total: None,
            error: None,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fetch one page without touching the displayed list
    pub async fn fetch_history(
        &self,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<HistoryRecord>, FetchError> {
        let mut page = self.source.fetch_history(limit, skip).await?;
        page.results.truncate(limit);
        Ok(page.results)
    }

    /// Start a fetch; any fetch started earlier becomes stale
    pub fn begin_fetch(&mut self, skip: usize) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        FetchTicket {
            generation: self.generation,
            limit: self.limit,
            skip,
        }
    }

    /// Apply a finished fetch. Returns `false` if it was stale and dropped.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                "Discarding stale history fetch (generation {} != {})",
                outcome.generation,
                self.generation
            );
            return false;
        }

        self.loading = false;
        match outcome.result {
            Ok(page) => {
                tracing::info!("Loaded {} history records", page.results.len());
                self.total = Some(page.total.unwrap_or(page.results.len() as u64));
                self.records = page.results;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!("History fetch failed: {:?}", err);
                self.records.clear();
                self.total = None;
                self.error = Some(err.to_string());
            }
        }
        true
    }

    /// Fetch the first page and replace the displayed list
    pub async fn refresh(&mut self) -> Result<HistoryAggregate, FetchError> {
        self.refresh_page(0).await
    }

    pub async fn refresh_page(&mut self, skip: usize) -> Result<HistoryAggregate, FetchError> {
        let ticket = self.begin_fetch(skip);
        let source = Arc::clone(&self.source);
        let outcome = ticket.run(source.as_ref()).await;
        let failure = outcome.result.as_ref().err().cloned();
        self.apply(outcome);

        match failure {
            Some(err) => Err(err),
            None => Ok(self.summary()),
        }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Total stored predictions reported by the service
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn summary(&self) -> HistoryAggregate {
        summarize(&self.records)
    }
}
