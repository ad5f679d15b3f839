//! Annotation records: one submitted row destined for the user's ledger tab.

use chrono::{DateTime, Local};

use crate::corpus::AnnotationUnit;
use crate::labels::{LabelSchema, FRAGMENT_SEPARATOR};

/// Timestamp column format, local clock at submit time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One highlighted span as returned by the external highlighting widget.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Selection {
    /// Label key from the active [`LabelSchema`] (e.g. `"evasion"`).
    pub label: String,
    /// The highlighted text fragment.
    pub text: String,
}

/// One submitted annotation row. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub user_id: String,
    /// Position within the session's unannotated queue at submit time.
    pub text_index: usize,
    pub full_text: String,
    pub debate_unit_id: Option<i64>,
    /// Per-label fragment text, parallel to the schema's label order.
    /// Labels with no fragments hold `""`, never an absent column.
    pub label_texts: Vec<String>,
    pub comment: String,
    pub timestamp: String,
}

impl AnnotationRecord {
    /// Build a record from the widget's labeled spans.
    ///
    /// Fragments sharing a label are concatenated in submission order,
    /// joined with [`FRAGMENT_SEPARATOR`]. Selections carrying a label key
    /// outside `schema` are dropped; only known categories land in the row.
    pub fn build(
        schema: &LabelSchema,
        user_id: &str,
        text_index: usize,
        unit: &AnnotationUnit,
        selections: &[Selection],
        comment: &str,
        submitted_at: DateTime<Local>,
    ) -> Self {
        let label_texts = schema
            .labels
            .iter()
            .map(|label| {
                selections
                    .iter()
                    .filter(|s| s.label == label.key)
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join(FRAGMENT_SEPARATOR)
            })
            .collect();

        Self {
            user_id: user_id.to_string(),
            text_index,
            full_text: unit.text.clone(),
            debate_unit_id: unit.debate_unit_id,
            label_texts,
            comment: comment.to_string(),
            timestamp: submitted_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Serialize to one ledger row in header-row column order.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(4 + self.label_texts.len() + 2);
        row.push(self.user_id.clone());
        row.push(self.text_index.to_string());
        row.push(self.full_text.clone());
        row.push(
            self.debate_unit_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        );
        row.extend(self.label_texts.iter().cloned());
        row.push(self.comment.clone());
        row.push(self.timestamp.clone());
        row
    }
}
