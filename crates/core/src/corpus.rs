//! The annotation corpus: an ordered, immutable sequence of debate lines.
//!
//! The corpus is a newline-delimited UTF-8 file produced by the preprocessing
//! step. Every non-empty trimmed line becomes one [`AnnotationUnit`]. A line
//! may carry a leading `[<integer>]` prefix identifying the debate unit it
//! was cut from; the prefix is stripped before display.

use std::path::Path;

use crate::error::CoreError;

/// One annotatable line of the corpus.
///
/// `text` doubles as the natural key for "already annotated" lookups, so two
/// corpus lines with identical text are indistinguishable to the progress
/// tracker. See the dedup note on [`crate::progress::remaining`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationUnit {
    /// Zero-based position in the full corpus.
    pub ordinal: usize,
    /// Display text with any `[<id>]` prefix stripped.
    pub text: String,
    /// Debate unit id parsed from the optional `[<id>]` prefix.
    pub debate_unit_id: Option<i64>,
}

/// The fixed ordered corpus loaded at session start.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    units: Vec<AnnotationUnit>,
}

impl Corpus {
    /// Load a corpus from `path`.
    ///
    /// A missing file is [`CoreError::MissingCorpus`]; any other read failure
    /// is [`CoreError::Internal`].
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::MissingCorpus {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!("Failed to read corpus {}: {e}", path.display()))
        })?;
        Ok(Self::parse(&raw))
    }

    /// Parse corpus text: one unit per non-empty trimmed line, in file order.
    pub fn parse(raw: &str) -> Self {
        let units = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(ordinal, line)| {
                let (debate_unit_id, text) = split_unit_prefix(line);
                AnnotationUnit {
                    ordinal,
                    text: text.to_string(),
                    debate_unit_id,
                }
            })
            .collect();
        Self { units }
    }

    pub fn units(&self) -> &[AnnotationUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Split an optional leading `[<integer>]` prefix off a corpus line.
///
/// Returns the parsed id and the remaining text (trimmed). Lines without a
/// well-formed prefix are returned unchanged; a bracketed run that does not
/// parse as an integer is treated as ordinary text.
fn split_unit_prefix(line: &str) -> (Option<i64>, &str) {
    let Some(rest) = line.strip_prefix('[') else {
        return (None, line);
    };
    let Some(close) = rest.find(']') else {
        return (None, line);
    };
    match rest[..close].trim().parse::<i64>() {
        Ok(id) => (Some(id), rest[close + 1..].trim_start()),
        Err(_) => (None, line),
    }
}
