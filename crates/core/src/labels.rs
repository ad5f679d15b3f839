//! Versioned label schema for rhetorical-strategy annotation.
//!
//! The label set has changed across revisions of the annotation campaign
//! (four strategies, then six, then six renamed categories). Rather than
//! branching per revision, the ledger header row and the record row layout
//! both derive from a single [`LabelSchema`] value, so adding or renaming a
//! category is a data change, not a code change.

use serde::Serialize;

/// Separator used when several highlighted fragments share one label.
pub const FRAGMENT_SEPARATOR: &str = ";";

/// Columns that precede the per-label columns in every ledger tab.
const PREFIX_COLUMNS: &[&str] = &["user_id", "text_index", "full_text", "debate_unit_id"];

/// Columns that follow the per-label columns in every ledger tab.
const SUFFIX_COLUMNS: &[&str] = &["comment_field", "timestamp"];

/// One annotatable rhetorical-strategy category.
///
/// `key` is the stable ledger column name; `display` is the human-facing
/// name shown by the highlighting widget (Danish, as presented to the
/// annotators).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Label {
    pub key: &'static str,
    pub display: &'static str,
}

/// An ordered, versioned set of labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSchema {
    pub version: u32,
    pub labels: &'static [Label],
}

/// First campaign: four strategy categories, no explicit "answered" label.
pub const SCHEMA_V1: LabelSchema = LabelSchema {
    version: 1,
    labels: &[
        Label { key: "stretch", display: "Overdrivelse" },
        Label { key: "dodge", display: "Undvigelse" },
        Label { key: "omission", display: "Udeladelse" },
        Label { key: "deflection", display: "Afledning" },
    ],
};

/// Second campaign: adds "Svar" (a real answer) and a catch-all.
pub const SCHEMA_V2: LabelSchema = LabelSchema {
    version: 2,
    labels: &[
        Label { key: "stretch", display: "Overdrivelse" },
        Label { key: "dodge", display: "Undvigelse" },
        Label { key: "omission", display: "Udeladelse" },
        Label { key: "deflection", display: "Afledning" },
        Label { key: "answer", display: "Svar" },
        Label { key: "other", display: "Andet" },
    ],
};

/// Current campaign: renamed categories, answer listed first.
pub const SCHEMA_V3: LabelSchema = LabelSchema {
    version: 3,
    labels: &[
        Label { key: "answer", display: "Svar" },
        Label { key: "stretch", display: "Overdrivelse" },
        Label { key: "evasion", display: "Undvigelse" },
        Label { key: "self_promotion", display: "Selvpromovering" },
        Label { key: "attack", display: "Angreb" },
        Label { key: "other", display: "Andet" },
    ],
};

impl LabelSchema {
    /// The schema used for all new sessions.
    pub fn latest() -> &'static LabelSchema {
        &SCHEMA_V3
    }

    /// Full ledger header row in exact column order:
    /// `user_id, text_index, full_text, debate_unit_id, <labels...>,
    /// comment_field, timestamp`.
    pub fn header(&self) -> Vec<String> {
        PREFIX_COLUMNS
            .iter()
            .copied()
            .chain(self.labels.iter().map(|l| l.key))
            .chain(SUFFIX_COLUMNS.iter().copied())
            .map(String::from)
            .collect()
    }

    /// Total number of columns in a ledger row for this schema.
    pub fn column_count(&self) -> usize {
        PREFIX_COLUMNS.len() + self.labels.len() + SUFFIX_COLUMNS.len()
    }

    /// Zero-based column index of `full_text` in a ledger row.
    pub fn full_text_column(&self) -> usize {
        2
    }

    /// Position of a label key within this schema's label list.
    pub fn label_index(&self, key: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_header_matches_ledger_schema() {
        let header = LabelSchema::latest().header();
        assert_eq!(
            header,
            vec![
                "user_id",
                "text_index",
                "full_text",
                "debate_unit_id",
                "answer",
                "stretch",
                "evasion",
                "self_promotion",
                "attack",
                "other",
                "comment_field",
                "timestamp",
            ]
        );
    }

    #[test]
    fn header_length_matches_column_count() {
        for schema in [&SCHEMA_V1, &SCHEMA_V2, &SCHEMA_V3] {
            assert_eq!(schema.header().len(), schema.column_count());
        }
    }

    #[test]
    fn full_text_column_points_at_full_text() {
        let schema = LabelSchema::latest();
        assert_eq!(schema.header()[schema.full_text_column()], "full_text");
    }

    #[test]
    fn label_index_known_key() {
        assert_eq!(SCHEMA_V3.label_index("answer"), Some(0));
        assert_eq!(SCHEMA_V3.label_index("other"), Some(5));
    }

    #[test]
    fn label_index_unknown_key_is_none() {
        assert_eq!(SCHEMA_V3.label_index("dodge"), None);
        assert_eq!(SCHEMA_V1.label_index("attack"), None);
    }

    #[test]
    fn schema_versions_are_ordered() {
        assert_eq!(SCHEMA_V1.labels.len(), 4);
        assert_eq!(SCHEMA_V2.labels.len(), 6);
        assert_eq!(SCHEMA_V3.labels.len(), 6);
        assert_eq!(LabelSchema::latest().version, 3);
    }
}
