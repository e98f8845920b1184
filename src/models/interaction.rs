use serde::{Deserialize, Deserializer, Serialize};

use super::enums::Severity;

const DEFAULT_HEADING: &str = "Potential Interaction";

/// One warning about selected medications that may interact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResult {
    #[serde(default = "unknown_severity", deserialize_with = "lenient_severity")]
    pub severity: Severity,
    #[serde(default)]
    pub title: Option<String>,
    pub description: String,
    #[serde(default)]
    pub recommendation: Option<String>,
}

impl InteractionResult {
    pub fn heading(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => DEFAULT_HEADING,
        }
    }
}

fn unknown_severity() -> Severity {
    Severity::Unknown
}

fn lenient_severity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Severity, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(Severity::parse_lenient).unwrap_or(Severity::Unknown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_result() {
        let result: InteractionResult = serde_json::from_str(
            r#"{"severity": "High", "description": "Bleeding risk"}"#,
        )
        .unwrap();
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.heading(), "Potential Interaction");
        assert!(result.recommendation.is_none());
    }

    #[test]
    fn unknown_or_null_severity_does_not_fail() {
        let result: InteractionResult = serde_json::from_str(
            r#"{"severity": null, "title": "Serotonin syndrome", "description": "x"}"#,
        )
        .unwrap();
        assert_eq!(result.severity, Severity::Unknown);
        assert_eq!(result.heading(), "Serotonin syndrome");
    }

    #[test]
    fn missing_severity_is_unknown() {
        let result: InteractionResult =
            serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(result.severity, Severity::Unknown);
    }

    #[test]
    fn blank_title_uses_default_heading() {
        let result = InteractionResult {
            severity: Severity::Low,
            title: Some("  ".into()),
            description: "x".into(),
            recommendation: None,
        };
        assert_eq!(result.heading(), "Potential Interaction");
    }
}
