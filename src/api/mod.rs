//! Backend client for the medication lookup service.
//!
//! Three endpoints are consumed:
//! - `GET /autocomplete?q=`: suggestion candidates
//! - `POST /search`: full-text search result cards
//! - `POST /interactions`: interaction warnings for a set of ids
//!
//! `MedicationApi` is the seam between the widget driver and the network;
//! `HttpMedicationApi` talks to a real server, `MockMedicationApi` serves
//! canned data for tests and offline runs.

pub mod client;
pub mod error;
pub mod mock;
pub mod types;

use std::future::Future;

pub use client::HttpMedicationApi;
pub use error::ApiError;
pub use mock::MockMedicationApi;
pub use types::*;

use crate::models::{InteractionResult, MedicationCandidate, MedicationId, SearchResult};

/// Async access to the backend endpoints.
///
/// Implementations are cloned into spawned fetch tasks, so they must be
/// cheap to clone and `Send`.
pub trait MedicationApi: Clone + Send + Sync + 'static {
    fn autocomplete(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<MedicationCandidate>, ApiError>> + Send;

    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchResult>, ApiError>> + Send;

    fn check_interactions(
        &self,
        ids: &[MedicationId],
    ) -> impl Future<Output = Result<Vec<InteractionResult>, ApiError>> + Send;
}
