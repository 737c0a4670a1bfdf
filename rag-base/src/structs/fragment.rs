use std::fmt;

use serde::Serialize;

/// One heading label on a fragment: `level` is the number of `#` (1..=3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.level {
            f.write_str("#")?;
        }
        if !self.text.is_empty() {
            write!(f, " {}", self.text)?;
        }
        Ok(())
    }
}

/// A contiguous span of the knowledge base with the heading path above it.
///
/// `headings` is ordered outermost first, with strictly increasing levels.
/// `index` is the position in document order and is unique within one split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub index: usize,
    pub headings: Vec<Heading>,
    pub body: String,
}

impl Fragment {
    /// `"A > B > C"` breadcrumb of the heading path (empty when there is none).
    pub fn heading_path(&self) -> String {
        self.headings
            .iter()
            .map(|h| h.text.as_str())
            .collect::<Vec<_>>()
            .join(" > ")
    }
}
