//! Per-student quiz session state.
//!
//! A session owns the answers for one quiz attempt. It is created when
//! the student starts a quiz and consumed at submission; answers are
//! held in memory only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Quiz;

/// One student's in-progress attempt at a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    /// Opaque per-session identifier, e.g. `user-3f2a91bc`.
    pub session_id: String,
    /// When the student began the quiz.
    pub started_at: DateTime<Utc>,
    quiz: Quiz,
    answers: Vec<String>,
}

impl QuizSession {
    /// Start a session: one blank answer slot per question.
    pub fn new(quiz: Quiz) -> Self {
        let answers = vec![String::new(); quiz.questions.len()];
        Self {
            session_id: format!("user-{}", &Uuid::new_v4().simple().to_string()[..8]),
            started_at: Utc::now(),
            quiz,
            answers,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Record an answer. Out-of-range indices are ignored; the rendering
    /// surface may outlive a quiz switch and send stale updates.
    pub fn set_answer(&mut self, question_index: usize, value: impl Into<String>) {
        if let Some(slot) = self.answers.get_mut(question_index) {
            *slot = value.into();
        }
    }

    pub fn answer(&self, question_index: usize) -> Option<&str> {
        self.answers.get(question_index).map(String::as_str)
    }

    /// Number of questions with a non-blank answer.
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| !a.trim().is_empty()).count()
    }

    /// Consume the session at submission time.
    pub fn into_answers(self) -> Vec<String> {
        self.answers
    }
}
