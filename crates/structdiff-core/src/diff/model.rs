//! Difference output types.
//!
//! Values are stored rendered, so a difference is plain data that serializes
//! and compares without reference to the compared objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a single discrepancy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DifferenceKind {
    /// Both values present but not equal
    ValueMismatch,
    /// Values have different runtime types
    TypeMismatch,
    /// Present only in the second operand
    MissingInFirst,
    /// Present only in the first operand
    MissingInSecond,
    /// Collection sizes differ
    CountMismatch,
}

impl DifferenceKind {
    /// The kind seen from the other side of the comparison
    pub fn mirrored(self) -> Self {
        match self {
            DifferenceKind::MissingInFirst => DifferenceKind::MissingInSecond,
            DifferenceKind::MissingInSecond => DifferenceKind::MissingInFirst,
            other => other,
        }
    }
}

/// One discrepancy between the compared values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Difference {
    /// Location relative to the compared root, e.g. `orders[7].total`
    pub path: String,
    /// Rendered value on the first side
    pub value1: String,
    /// Rendered value on the second side
    pub value2: String,
    pub kind: DifferenceKind,
    /// Free-form detail, e.g. the two runtime type names of a type mismatch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Difference {
    pub fn new(
        path: impl Into<String>,
        value1: impl Into<String>,
        value2: impl Into<String>,
        kind: DifferenceKind,
    ) -> Self {
        Self {
            path: path.into(),
            value1: value1.into(),
            value2: value2.into(),
            kind,
            note: None,
        }
    }

    pub fn value_mismatch(
        path: impl Into<String>,
        value1: impl Into<String>,
        value2: impl Into<String>,
    ) -> Self {
        Self::new(path, value1, value2, DifferenceKind::ValueMismatch)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Prefix the path with an enclosing segment
    ///
    /// An empty path becomes the segment, an indexer path (`[1].name`) is
    /// appended directly, anything else is joined with a dot.
    pub fn insert_path(mut self, segment: &str) -> Self {
        self.path = if self.path.is_empty() {
            segment.to_string()
        } else if self.path.starts_with('[') || segment.is_empty() {
            format!("{}{}", segment, self.path)
        } else {
            format!("{}.{}", segment, self.path)
        };
        self
    }

    /// The same discrepancy reported by a comparison with swapped operands
    pub fn mirrored(&self) -> Self {
        Self {
            path: self.path.clone(),
            value1: self.value2.clone(),
            value2: self.value1.clone(),
            kind: self.kind.mirrored(),
            note: self.note.clone(),
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        write!(
            f,
            "{}: {:?} '{}' vs '{}'",
            path, self.kind, self.value1, self.value2
        )?;
        if let Some(note) = &self.note {
            write!(f, " ({})", note)?;
        }
        Ok(())
    }
}
