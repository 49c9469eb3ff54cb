//! The quiz file codec.
//!
//! Parses the line-oriented `quizzes.txt` format into `Quiz` records and
//! serializes records back into the same format. The format is hand-edited
//! by instructors, so decoding is deliberately permissive: malformed lines
//! are dropped, never reported as errors.

use std::path::Path;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::SymbolCatalog;
use crate::model::{dedup_preserving_order, Question, Quiz};

/// Line marker that opens a new quiz.
const QUIZ_MARKER: &str = "QUIZ:";

lazy_static! {
    // A question line splits on the first whitespace-then-colon boundary,
    // so colons inside the question text survive. Known format limitation:
    // question text that itself contains " :" gets truncated there.
    static ref SYMBOL_DELIMITER: Regex = Regex::new(r"\s:").unwrap();
}

/// Parse quiz file content into quizzes.
///
/// Never fails, whatever the input: blank lines are skipped, question
/// lines without a symbol delimiter are dropped, and question lines seen
/// before any `QUIZ:` marker are discarded since there is no quiz to
/// attach them to.
pub fn decode(text: &str) -> Vec<Quiz> {
    let mut quizzes: Vec<Quiz> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix(QUIZ_MARKER) {
            quizzes.push(Quiz::new(rest.trim()));
        } else if let Some(quiz) = quizzes.last_mut() {
            if let Some(question) = parse_question_line(trimmed) {
                quiz.questions.push(question);
            }
        } else {
            tracing::debug!("dropping question line before any QUIZ: marker");
        }
    }

    quizzes
}

fn parse_question_line(line: &str) -> Option<Question> {
    let delim = SYMBOL_DELIMITER.find(line)?;
    let text = line[..delim.start()].trim();
    let symbols = line[delim.end()..]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Some(Question {
        text: text.to_string(),
        symbols: dedup_preserving_order(symbols),
    })
}

/// Read and decode a quiz file. Fails only at the I/O boundary.
pub fn decode_file(path: &Path) -> Result<Vec<Quiz>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
    Ok(decode(&content))
}

/// Serialize quizzes into the quiz file format.
///
/// Questions with empty text or an empty symbol list are omitted: the
/// format has no way to express them that survives a decode. Callers
/// that care (the authoring surface) warn about this via
/// [`validate_quizzes`] before encoding. Untitled quizzes get a
/// positional default title.
pub fn encode(quizzes: &[Quiz]) -> String {
    let mut out = String::new();

    for (index, quiz) in quizzes.iter().enumerate() {
        let title = if quiz.title.trim().is_empty() {
            format!("Math Quiz (Version {})", index + 1)
        } else {
            quiz.title.clone()
        };
        out.push_str(QUIZ_MARKER);
        out.push(' ');
        out.push_str(&title);
        out.push('\n');

        for question in &quiz.questions {
            if question.text.trim().is_empty() || question.symbols.is_empty() {
                continue;
            }
            out.push_str(&question.text);
            out.push_str(" : ");
            out.push_str(&question.symbols.join(","));
            out.push('\n');
        }

        out.push('\n');
    }

    out
}

/// Encode quizzes and write them to `path`.
pub fn encode_to_file(quizzes: &[Quiz], path: &Path) -> Result<()> {
    std::fs::write(path, encode(quizzes))
        .with_context(|| format!("failed to write quiz file: {}", path.display()))
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Title of the quiz the warning refers to (if applicable).
    pub quiz_title: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate quizzes for common authoring issues.
///
/// None of these block encoding; they flag content that will silently
/// degrade (dropped questions, unknown symbols).
pub fn validate_quizzes(quizzes: &[Quiz], catalog: &SymbolCatalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_titles = std::collections::HashSet::new();
    for quiz in quizzes {
        let title = quiz.title.clone();

        if quiz.title.trim().is_empty() {
            warnings.push(ValidationWarning {
                quiz_title: None,
                message: "quiz has no title; a positional default will be used".into(),
            });
        } else if !seen_titles.insert(&quiz.title) {
            warnings.push(ValidationWarning {
                quiz_title: Some(title.clone()),
                message: format!("duplicate quiz title: {}", quiz.title),
            });
        }

        if quiz.questions.is_empty() {
            warnings.push(ValidationWarning {
                quiz_title: Some(title.clone()),
                message: "quiz has no questions".into(),
            });
        }

        for (idx, question) in quiz.questions.iter().enumerate() {
            if question.text.trim().is_empty() {
                warnings.push(ValidationWarning {
                    quiz_title: Some(title.clone()),
                    message: format!("question {} has no text and will not be saved", idx + 1),
                });
            } else if question.symbols.is_empty() {
                warnings.push(ValidationWarning {
                    quiz_title: Some(title.clone()),
                    message: format!(
                        "question {} has no symbols and will not be saved",
                        idx + 1
                    ),
                });
            }

            for symbol in &question.symbols {
                if !catalog.contains(symbol) {
                    warnings.push(ValidationWarning {
                        quiz_title: Some(title.clone()),
                        message: format!(
                            "question {} uses unknown symbol '{symbol}'",
                            idx + 1
                        ),
                    });
                }
            }
        }
    }

    warnings
}
