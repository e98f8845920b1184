use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::enums::CandidateSource;

/// Opaque medication identifier as issued by the backend.
///
/// The backend has sent both numeric and string ids over time; both are
/// normalised to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MedicationId(String);

impl MedicationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MedicationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for MedicationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Uint(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Int(n) => Self(n.to_string()),
            RawId::Uint(n) => Self(n.to_string()),
        })
    }
}

/// A medication suggested for the current query. Lives only while the
/// suggestion dropdown shows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationCandidate {
    pub id: MedicationId,
    pub display_name: String,
    pub generic_names: Vec<String>,
    pub brand_names: Vec<String>,
    pub source: CandidateSource,
}

impl MedicationCandidate {
    pub fn new(id: impl Into<String>, display_name: &str) -> Self {
        Self {
            id: MedicationId::new(id),
            display_name: display_name.to_string(),
            generic_names: Vec::new(),
            brand_names: Vec::new(),
            source: CandidateSource::default(),
        }
    }

    /// The single Candidate → Selection projection.
    pub fn to_selection(&self) -> SelectedMedication {
        SelectedMedication {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            generic_names: self.generic_names.clone(),
            brand_names: self.brand_names.clone(),
        }
    }
}

/// A medication the user has committed to the selection set.
///
/// Identity is `id` alone; the name lists only feed the optional tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedMedication {
    pub id: MedicationId,
    pub display_name: String,
    #[serde(default)]
    pub generic_names: Vec<String>,
    #[serde(default)]
    pub brand_names: Vec<String>,
}

impl SelectedMedication {
    pub fn new(id: impl Into<String>, display_name: &str) -> Self {
        Self {
            id: MedicationId::new(id),
            display_name: display_name.to_string(),
            generic_names: Vec::new(),
            brand_names: Vec::new(),
        }
    }

    /// "Generic: a, b · Brand: c"; empty when neither list has entries.
    pub fn name_tooltip(&self) -> String {
        name_tooltip(&self.generic_names, &self.brand_names)
    }
}

/// Result card from the full-text `/search` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "drugid")]
    pub id: MedicationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl SearchResult {
    pub fn to_selection(&self) -> SelectedMedication {
        SelectedMedication {
            id: self.id.clone(),
            display_name: self.name.clone(),
            generic_names: Vec::new(),
            brand_names: Vec::new(),
        }
    }
}

pub fn name_tooltip(generic_names: &[String], brand_names: &[String]) -> String {
    let mut parts = Vec::new();
    if !generic_names.is_empty() {
        parts.push(format!("Generic: {}", generic_names.join(", ")));
    }
    if !brand_names.is_empty() {
        parts.push(format!("Brand: {}", brand_names.join(", ")));
    }
    parts.join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medication_id_accepts_numbers_and_strings() {
        let ids: Vec<MedicationId> = serde_json::from_str(r#"["d1", 42]"#).unwrap();
        assert_eq!(ids, vec![MedicationId::new("d1"), MedicationId::new("42")]);
    }

    #[test]
    fn medication_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&MedicationId::new("d1")).unwrap();
        assert_eq!(json, "\"d1\"");
    }

    #[test]
    fn candidate_projection_keeps_identity_and_name() {
        let mut candidate = MedicationCandidate::new("d1", "Ibuprofen");
        candidate.brand_names = vec!["Advil".into()];
        let selected = candidate.to_selection();
        assert_eq!(selected.id, MedicationId::new("d1"));
        assert_eq!(selected.display_name, "Ibuprofen");
        assert_eq!(selected.name_tooltip(), "Brand: Advil");
    }

    #[test]
    fn tooltip_lists_both_name_kinds() {
        let tip = name_tooltip(
            &["ibuprofen".into()],
            &["Advil".into(), "Motrin".into()],
        );
        assert_eq!(tip, "Generic: ibuprofen · Brand: Advil, Motrin");
        assert_eq!(name_tooltip(&[], &[]), "");
    }

    #[test]
    fn search_result_reads_drugid_key() {
        let result: SearchResult =
            serde_json::from_str(r#"{"drugid": 7, "name": "Warfarin"}"#).unwrap();
        assert_eq!(result.id.as_str(), "7");
        assert_eq!(result.description, "");
        assert_eq!(result.to_selection().display_name, "Warfarin");
    }
}
