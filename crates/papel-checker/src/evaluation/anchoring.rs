//! Resolves the substrings quoted by the model back to offsets in the essay.
//!
//! Corrections are expected in reading order, so each search starts where the
//! previous anchored span ended. Offsets are counted in characters.

use super::domain::Correction;
use serde_json::Value;

const DEFAULT_CORRECTION_KIND: &str = "error";

/// A correction as reported by the model, before it has a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedCorrection {
    pub original: String,
    pub suggestion: String,
    pub explanation: String,
    pub kind: String,
}

impl ProposedCorrection {
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        let entry = value.as_object()?;
        let text = |key: &str| {
            entry
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let kind = entry
            .get("type")
            .and_then(Value::as_str)
            .filter(|kind| !kind.trim().is_empty())
            .unwrap_or(DEFAULT_CORRECTION_KIND)
            .to_string();

        Some(Self {
            original: text("original"),
            suggestion: text("suggestion"),
            explanation: text("explanation"),
            kind,
        })
    }
}

pub(crate) fn proposed_corrections(value: Option<&Value>) -> Vec<ProposedCorrection> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(ProposedCorrection::from_value)
                .collect()
        })
        .unwrap_or_default()
}

/// Forward-only cursor over the essay text.
#[derive(Debug, Clone)]
pub struct TextAnchor {
    essay: Vec<char>,
    cursor: usize,
}

impl TextAnchor {
    pub fn new(essay: &str) -> Self {
        Self {
            essay: essay.chars().collect(),
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Position of `original` at or after the cursor, then moves the cursor past it.
    ///
    /// Tries an exact match, then a case-insensitive one. When neither is found
    /// the position is `cursor + 1` (or `0` at the start), which keeps positions
    /// increasing but may point at unrelated text.
    pub fn anchor(&mut self, original: &str) -> usize {
        let needle: Vec<char> = original.chars().collect();
        let position = self
            .find_from_cursor(&needle, |a, b| a == b)
            .or_else(|| self.find_from_cursor(&needle, chars_eq_ignore_case))
            .unwrap_or(if self.cursor > 0 { self.cursor + 1 } else { 0 });

        self.cursor = position + needle.len();
        position
    }

    fn find_from_cursor<F>(&self, needle: &[char], matches: F) -> Option<usize>
    where
        F: Fn(char, char) -> bool,
    {
        if needle.is_empty() {
            return Some(self.cursor.min(self.essay.len()));
        }
        if self.cursor >= self.essay.len() || needle.len() > self.essay.len() - self.cursor {
            return None;
        }

        (self.cursor..=self.essay.len() - needle.len()).find(|&start| {
            self.essay[start..start + needle.len()]
                .iter()
                .zip(needle)
                .all(|(a, b)| matches(*a, *b))
        })
    }
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Anchors corrections in order and numbers them by their position in the output.
pub fn anchor_corrections(essay: &str, proposed: Vec<ProposedCorrection>) -> Vec<Correction> {
    let mut anchor = TextAnchor::new(essay);
    proposed
        .into_iter()
        .enumerate()
        .map(|(index, proposal)| {
            let position = anchor.anchor(&proposal.original);
            Correction {
                original: proposal.original,
                suggestion: proposal.suggestion,
                explanation: proposal.explanation,
                kind: proposal.kind,
                position,
                index,
            }
        })
        .collect()
}
