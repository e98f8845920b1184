use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::error::ApiError;
use super::MedicationApi;
use crate::models::{InteractionResult, MedicationCandidate, MedicationId, SearchResult};

/// Canned backend for tests and offline runs.
///
/// Responses are keyed by the lower-cased query. Unknown autocomplete
/// queries answer with an empty list. A per-query delay lets tests force
/// responses to arrive out of issuance order.
#[derive(Clone, Default)]
pub struct MockMedicationApi {
    responses: Arc<MockResponses>,
    calls: Arc<CallCounts>,
}

#[derive(Clone, Default)]
struct MockResponses {
    candidates: HashMap<String, Vec<MedicationCandidate>>,
    search_results: HashMap<String, Vec<SearchResult>>,
    interactions: Vec<InteractionResult>,
    delays: HashMap<String, Duration>,
    failure: Option<ApiError>,
}

#[derive(Default)]
struct CallCounts {
    autocomplete: AtomicUsize,
    search: AtomicUsize,
    interactions: AtomicUsize,
}

impl MockMedicationApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(mut self, query: &str, candidates: Vec<MedicationCandidate>) -> Self {
        Arc::make_mut(&mut self.responses)
            .candidates
            .insert(query.to_lowercase(), candidates);
        self
    }

    pub fn with_search_results(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        Arc::make_mut(&mut self.responses)
            .search_results
            .insert(query.to_lowercase(), results);
        self
    }

    pub fn with_interactions(mut self, interactions: Vec<InteractionResult>) -> Self {
        Arc::make_mut(&mut self.responses).interactions = interactions;
        self
    }

    /// Delay every response for `query` (autocomplete and search).
    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        Arc::make_mut(&mut self.responses)
            .delays
            .insert(query.to_lowercase(), delay);
        self
    }

    /// Fail every call with `error`.
    pub fn failing(mut self, error: ApiError) -> Self {
        Arc::make_mut(&mut self.responses).failure = Some(error);
        self
    }

    pub fn autocomplete_calls(&self) -> usize {
        self.calls.autocomplete.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.calls.search.load(Ordering::SeqCst)
    }

    pub fn interaction_calls(&self) -> usize {
        self.calls.interactions.load(Ordering::SeqCst)
    }

    async fn pause_for(&self, key: &str) {
        if let Some(delay) = self.responses.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        match &self.responses.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl MedicationApi for MockMedicationApi {
    async fn autocomplete(&self, query: &str) -> Result<Vec<MedicationCandidate>, ApiError> {
        self.calls.autocomplete.fetch_add(1, Ordering::SeqCst);
        let key = query.to_lowercase();
        self.pause_for(&key).await;
        self.check_failure()?;
        Ok(self.responses.candidates.get(&key).cloned().unwrap_or_default())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        self.calls.search.fetch_add(1, Ordering::SeqCst);
        let key = query.to_lowercase();
        self.pause_for(&key).await;
        self.check_failure()?;
        Ok(self.responses.search_results.get(&key).cloned().unwrap_or_default())
    }

    async fn check_interactions(
        &self,
        _ids: &[MedicationId],
    ) -> Result<Vec<InteractionResult>, ApiError> {
        self.calls.interactions.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.responses.interactions.clone())
    }
}
