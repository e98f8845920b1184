//! Wire types for the backend endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{CandidateSource, MedicationCandidate, MedicationId};

/// One row of the `/autocomplete` response.
///
/// Older servers answered with `{name, drugid}` only; newer ones add the
/// source and name lists. Both shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct AutocompleteEntry {
    #[serde(alias = "name")]
    pub med_name: String,
    pub drugid: MedicationId,
    #[serde(default)]
    pub source: Option<CandidateSource>,
    #[serde(default)]
    pub generic_names: Vec<String>,
    #[serde(default)]
    pub brand_names: Vec<String>,
}

impl From<AutocompleteEntry> for MedicationCandidate {
    fn from(entry: AutocompleteEntry) -> Self {
        let trim_all =
            |names: Vec<String>| names.into_iter().map(|n| n.trim().to_string()).collect();
        Self {
            id: entry.drugid,
            display_name: entry.med_name.trim().to_string(),
            generic_names: trim_all(entry.generic_names),
            brand_names: trim_all(entry.brand_names),
            source: entry.source.unwrap_or_default(),
        }
    }
}

/// Request body for `POST /search`.
#[derive(Debug, Serialize)]
pub struct SearchRequestBody<'a> {
    pub query: &'a str,
}

/// Request body for `POST /interactions`.
#[derive(Debug, Serialize)]
pub struct InteractionRequestBody<'a> {
    pub drugs: &'a [MedicationId],
}

/// Error payload on non-2xx responses: `{error}` or `{message}`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error
            .into_iter()
            .chain(self.message)
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
    }
}
