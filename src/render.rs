//! HTML fragments for the widget's regions.
//!
//! Every piece of server- or user-supplied text goes through
//! `escape_html`; nothing is interpolated raw.

use std::collections::HashSet;
use std::fmt::Write;

use crate::config::WidgetConfig;
use crate::interactions::InteractionOutcome;
use crate::models::{name_tooltip, MedicationCandidate, MedicationId, SearchResult, SelectedMedication};

pub const NO_INTERACTIONS_TEXT: &str =
    "No known interactions found between the selected medications.";
pub const NO_INTERACTIONS_DISCLAIMER: &str = "Note: This does not guarantee that there are no \
     interactions. Always consult with your healthcare provider about potential drug interactions.";

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn title_attr(tooltip: &str) -> String {
    if tooltip.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(tooltip))
    }
}

/// Suggestion dropdown. `is_selected` marks candidates already in the
/// selection set.
pub fn suggestion_list(
    candidates: &[MedicationCandidate],
    highlighted: Option<usize>,
    is_selected: impl Fn(&MedicationId) -> bool,
    show_tooltip: bool,
) -> String {
    let mut html = String::from(r#"<ul class="suggestions" role="listbox">"#);
    for (index, candidate) in candidates.iter().enumerate() {
        let active = highlighted == Some(index);
        let mut class = String::from("suggestion");
        if active {
            class.push_str(" highlighted");
        }
        if is_selected(&candidate.id) {
            class.push_str(" selected");
        }
        let tooltip = if show_tooltip {
            name_tooltip(&candidate.generic_names, &candidate.brand_names)
        } else {
            String::new()
        };
        let _ = write!(
            html,
            r#"<li id="suggestion-{index}" class="{class}" role="option" aria-selected="{active}" data-index="{index}" data-source="{source}"{title}>{name}</li>"#,
            source = candidate.source,
            title = title_attr(&tooltip),
            name = escape_html(&candidate.display_name),
        );
    }
    html.push_str("</ul>");
    html
}

/// Removable tags for the current selection.
pub fn tag_list(items: &[SelectedMedication], config: &WidgetConfig) -> String {
    let mut html = String::from(r#"<ul class="med-list">"#);
    for item in items {
        let name = escape_html(&item.display_name);
        let tooltip = if config.show_name_tooltip {
            item.name_tooltip()
        } else {
            String::new()
        };
        let label = match config.link_to_detail.then(|| config.detail_url(&item.display_name)) {
            Some(Ok(url)) => format!(
                r#"<a href="{}" target="_blank" rel="noopener"{}>{name}</a>"#,
                escape_html(&url),
                title_attr(&tooltip),
            ),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Cannot build detail link, rendering plain tag");
                format!("<span{}>{name}</span>", title_attr(&tooltip))
            }
            None => format!("<span{}>{name}</span>", title_attr(&tooltip)),
        };
        let _ = write!(
            html,
            r#"<li class="med-item" data-drug-id="{id}">{label}<button type="button" class="remove-btn" data-drug-id="{id}" aria-label="Remove {name}">✖</button></li>"#,
            id = escape_html(item.id.as_str()),
        );
    }
    html.push_str("</ul>");
    html
}

/// Cards for `/search` results with their Select/Selected toggle.
pub fn search_cards(results: &[SearchResult], selected: &HashSet<MedicationId>) -> String {
    results
        .iter()
        .map(|result| {
            let is_selected = selected.contains(&result.id);
            let name = escape_html(&result.name);
            format!(
                r#"<div class="drug-card" role="article"><h3>{name}</h3><p>{description}</p><button type="button" class="{class}" data-drug-id="{id}" aria-pressed="{is_selected}" aria-label="Select {name}">{label}</button></div>"#,
                description = escape_html(&result.description),
                class = if is_selected { "select-drug selected" } else { "select-drug" },
                id = escape_html(result.id.as_str()),
                label = select_label(is_selected),
            )
        })
        .collect()
}

pub fn select_label(is_selected: bool) -> &'static str {
    if is_selected {
        "Selected"
    } else {
        "Select"
    }
}

pub fn interaction_report(outcome: &InteractionOutcome) -> String {
    match outcome {
        InteractionOutcome::NoKnownInteractions => format!(
            r#"<div class="no-interactions" role="alert"><p>{NO_INTERACTIONS_TEXT}</p><p class="note">{NO_INTERACTIONS_DISCLAIMER}</p></div>"#
        ),
        InteractionOutcome::Warnings(results) => {
            let mut html = String::new();
            for result in results {
                let _ = write!(
                    html,
                    r#"<div class="interaction-warning {severity}" role="alert"><h4>{heading}</h4><p>{description}</p>"#,
                    severity = result.severity,
                    heading = escape_html(result.heading()),
                    description = escape_html(&result.description),
                );
                if let Some(recommendation) = &result.recommendation {
                    let _ = write!(
                        html,
                        "<p><strong>Recommendation:</strong> {}</p>",
                        escape_html(recommendation)
                    );
                }
                html.push_str("</div>");
            }
            html
        }
        InteractionOutcome::Failed(message) => feedback("error", message),
    }
}

/// One feedback line. `kind` becomes a class hook (`loading`, `empty`, `error`).
pub fn feedback(kind: &str, text: &str) -> String {
    format!(
        r#"<p class="feedback feedback-{kind}" role="status">{}</p>"#,
        escape_html(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InteractionResult, Severity};

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"A&B's"</b>"#),
            "&lt;b&gt;&quot;A&amp;B&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn suggestion_list_marks_highlight_and_selection() {
        let mut a = MedicationCandidate::new("d1", "Ibuprofen");
        a.brand_names = vec!["Advil".into()];
        let b = MedicationCandidate::new("d2", "Ibuprofen <lysine>");
        let html = suggestion_list(&[a, b], Some(1), |id| id.as_str() == "d1", true);
        assert!(html.contains(r#"class="suggestion selected" role="option" aria-selected="false""#));
        assert!(html.contains(r#"class="suggestion highlighted" role="option" aria-selected="true""#));
        assert!(html.contains(r#"title="Brand: Advil""#));
        assert!(html.contains("Ibuprofen &lt;lysine&gt;"));
    }

    #[test]
    fn suggestion_tooltip_can_be_disabled() {
        let mut a = MedicationCandidate::new("d1", "Ibuprofen");
        a.generic_names = vec!["ibuprofen".into()];
        let html = suggestion_list(&[a], None, |_| false, false);
        assert!(!html.contains("title="));
    }

    #[test]
    fn tag_list_links_to_detail_page() {
        let config = WidgetConfig::default().with_base_url("http://example.test");
        let html = tag_list(&[SelectedMedication::new("d1", "Aspirin 81")], &config);
        assert!(html.contains(r#"href="http://example.test/medication-search/Aspirin%2081""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(r#"aria-label="Remove Aspirin 81""#));
    }

    #[test]
    fn tag_list_without_links_uses_span() {
        let config = WidgetConfig {
            link_to_detail: false,
            ..WidgetConfig::default()
        };
        let html = tag_list(&[SelectedMedication::new("d1", "Aspirin")], &config);
        assert!(html.contains("<span>Aspirin</span>"));
        assert!(!html.contains("href"));
    }

    #[test]
    fn search_cards_reflect_membership() {
        let results = vec![
            SearchResult { id: "d1".into(), name: "Ibuprofen".into(), description: "NSAID".into() },
            SearchResult { id: "d2".into(), name: "Aspirin".into(), description: "NSAID".into() },
        ];
        let selected: HashSet<MedicationId> = [MedicationId::new("d2")].into_iter().collect();
        let html = search_cards(&results, &selected);
        assert!(html.contains(r#"class="select-drug" data-drug-id="d1" aria-pressed="false" aria-label="Select Ibuprofen">Select<"#));
        assert!(html.contains(r#"class="select-drug selected" data-drug-id="d2" aria-pressed="true" aria-label="Select Aspirin">Selected<"#));
    }

    #[test]
    fn empty_report_has_disclaimer_not_error() {
        let html = interaction_report(&InteractionOutcome::NoKnownInteractions);
        assert!(html.contains(NO_INTERACTIONS_TEXT));
        assert!(html.contains("does not guarantee"));
        assert!(!html.contains("feedback-error"));
    }

    #[test]
    fn warnings_render_one_block_each_with_severity_class() {
        let results = vec![
            InteractionResult {
                severity: Severity::High,
                title: None,
                description: "Bleeding".into(),
                recommendation: Some("Avoid".into()),
            },
            InteractionResult {
                severity: Severity::Low,
                title: Some("Mild".into()),
                description: "Drowsiness".into(),
                recommendation: None,
            },
        ];
        let html = interaction_report(&InteractionOutcome::Warnings(results));
        assert_eq!(html.matches(r#"role="alert""#).count(), 2);
        assert!(html.contains(r#"class="interaction-warning high""#));
        assert!(html.contains("<h4>Potential Interaction</h4>"));
        assert!(html.contains("<strong>Recommendation:</strong> Avoid"));
        assert!(html.contains(r#"class="interaction-warning low""#));
    }
}
