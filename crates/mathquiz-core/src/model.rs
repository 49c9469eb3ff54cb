//! Core data model types for mathquiz.
//!
//! These are the fundamental types that the entire mathquiz system uses
//! to represent quizzes and their questions.

use serde::{Deserialize, Serialize};

/// A titled, ordered collection of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Quiz title as shown to students.
    pub title: String,
    /// The questions in this quiz, in authoring order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            questions: Vec::new(),
        }
    }
}

/// A question body paired with its suggested symbol palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question body; may embed LaTeX markup.
    pub text: String,
    /// Catalog tokens suggested for answering this question.
    ///
    /// Insertion-order-preserving and deduplicated. Tokens outside the
    /// builtin catalog are carried through as opaque strings so newer
    /// files keep working against older rendering surfaces.
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl Question {
    pub fn new(text: impl Into<String>, symbols: Vec<String>) -> Self {
        Self {
            text: text.into(),
            symbols: dedup_preserving_order(symbols),
        }
    }
}

/// Drop repeated tokens while keeping the first occurrence's position.
pub(crate) fn dedup_preserving_order(tokens: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokens
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
