//! Batch symbol autofill for quiz authoring.
//!
//! Runs a suggester over every question that still needs a symbol
//! palette, with bounded parallelism and retries on transient errors.
//! A suggester failure never fails the run: the affected question falls
//! back to the deterministic classifier (or stays empty).

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::catalog::SymbolCatalog;
use crate::classifier::{classify, sanitize};
use crate::error::SuggestError;
use crate::model::Quiz;
use crate::suggest::{SuggestRequest, SymbolSuggester};

/// Configuration for the autofill engine.
#[derive(Debug, Clone)]
pub struct AutofillConfig {
    /// Maximum concurrent suggestion requests.
    pub parallelism: usize,
    /// Retries on transient suggester errors.
    pub max_retries: u32,
    /// Initial delay between retries.
    pub retry_delay: Duration,
    /// Also re-suggest questions that already have symbols.
    pub overwrite: bool,
    /// Fall back to the deterministic classifier when the suggester fails.
    pub fallback_to_scan: bool,
}

impl Default for AutofillConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            overwrite: false,
            fallback_to_scan: true,
        }
    }
}

/// Where a question's final symbol list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolSource {
    /// The suggester answered with at least one valid token.
    Suggested,
    /// The suggester failed; the deterministic classifier filled in.
    Fallback,
    /// Nothing to offer: suggester empty or failed with no fallback.
    Empty,
}

/// Outcome for a single autofilled question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub quiz_index: usize,
    pub question_index: usize,
    pub symbols: Vec<String>,
    pub source: SymbolSource,
    /// Suggestion attempts made (0 when the question was skipped as
    /// already filled never appears here; skipped questions produce no
    /// outcome).
    pub attempts: u32,
}

/// Summary of one autofill run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutofillReport {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub outcomes: Vec<QuestionOutcome>,
    pub duration_ms: u64,
}

impl AutofillReport {
    pub fn count(&self, source: SymbolSource) -> usize {
        self.outcomes.iter().filter(|o| o.source == source).count()
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_question_start(&self, quiz_title: &str, question_index: usize);
    fn on_question_done(&self, outcome: &QuestionOutcome);
    fn on_question_error(&self, quiz_title: &str, question_index: usize, error: &str);
    fn on_run_complete(&self, report: &AutofillReport, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_question_start(&self, _: &str, _: usize) {}
    fn on_question_done(&self, _: &QuestionOutcome) {}
    fn on_question_error(&self, _: &str, _: usize, _: &str) {}
    fn on_run_complete(&self, _: &AutofillReport, _: Duration) {}
}

/// The autofill engine.
pub struct AutofillEngine {
    suggester: Arc<dyn SymbolSuggester>,
    config: AutofillConfig,
}

impl AutofillEngine {
    pub fn new(suggester: Arc<dyn SymbolSuggester>, config: AutofillConfig) -> Self {
        Self { suggester, config }
    }

    /// Fill symbol lists in place and return a per-question report.
    ///
    /// Each question is enqueued at most once per run, so there is never
    /// more than one in-flight suggestion for the same question.
    pub async fn run(
        &self,
        quizzes: &mut [Quiz],
        catalog: &SymbolCatalog,
        progress: &dyn ProgressReporter,
    ) -> AutofillReport {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));

        let mut futures = FuturesUnordered::new();

        for (quiz_index, quiz) in quizzes.iter().enumerate() {
            for (question_index, question) in quiz.questions.iter().enumerate() {
                if !self.config.overwrite && !question.symbols.is_empty() {
                    continue;
                }

                progress.on_question_start(&quiz.title, question_index);

                let suggester = Arc::clone(&self.suggester);
                let semaphore = Arc::clone(&semaphore);
                let config = self.config.clone();
                let catalog = catalog.clone();
                let text = question.text.clone();
                let quiz_title = quiz.title.clone();

                futures.push(async move {
                    let _permit = semaphore.acquire_owned().await.ok();

                    let (result, attempts) =
                        suggest_with_retries(suggester.as_ref(), &text, &catalog, &config).await;

                    let outcome = match result {
                        Ok(symbols) => {
                            let source = if symbols.is_empty() {
                                SymbolSource::Empty
                            } else {
                                SymbolSource::Suggested
                            };
                            QuestionOutcome {
                                quiz_index,
                                question_index,
                                symbols,
                                source,
                                attempts,
                            }
                        }
                        Err(e) => {
                            let (symbols, source) = if config.fallback_to_scan {
                                let scanned = classify(&text, &catalog);
                                let source = if scanned.is_empty() {
                                    SymbolSource::Empty
                                } else {
                                    SymbolSource::Fallback
                                };
                                (scanned, source)
                            } else {
                                (Vec::new(), SymbolSource::Empty)
                            };
                            let outcome = QuestionOutcome {
                                quiz_index,
                                question_index,
                                symbols,
                                source,
                                attempts,
                            };
                            return (outcome, Some((quiz_title, e.to_string())));
                        }
                    };
                    (outcome, None)
                });
            }
        }

        let mut outcomes = Vec::new();
        while let Some((outcome, error)) = futures.next().await {
            if let Some((quiz_title, message)) = error {
                tracing::warn!(
                    quiz = %quiz_title,
                    question = outcome.question_index,
                    "suggestion failed after {} attempt(s): {message}",
                    outcome.attempts
                );
                progress.on_question_error(&quiz_title, outcome.question_index, &message);
            }
            progress.on_question_done(&outcome);
            outcomes.push(outcome);
        }

        // Deterministic report order regardless of completion order.
        outcomes.sort_by_key(|o| (o.quiz_index, o.question_index));

        for outcome in &outcomes {
            quizzes[outcome.quiz_index].questions[outcome.question_index].symbols =
                outcome.symbols.clone();
        }

        let elapsed = start.elapsed();
        let report = AutofillReport {
            run_id,
            created_at: Utc::now(),
            outcomes,
            duration_ms: elapsed.as_millis() as u64,
        };
        progress.on_run_complete(&report, elapsed);
        report
    }
}

/// Call the suggester with retry on transient errors and exponential
/// backoff. Permanent errors (bad key, unknown model) and malformed
/// payloads are not retried: with deterministic sampling a retry would
/// only reproduce the same response.
async fn suggest_with_retries(
    suggester: &dyn SymbolSuggester,
    text: &str,
    catalog: &SymbolCatalog,
    config: &AutofillConfig,
) -> (anyhow::Result<Vec<String>>, u32) {
    let request = SuggestRequest {
        text: text.to_string(),
        catalog: catalog.clone(),
    };

    let mut retry_delay = config.retry_delay;
    let mut attempts = 0;
    let mut last_error = None;

    for retry in 0..=config.max_retries {
        if retry > 0 {
            tokio::time::sleep(retry_delay).await;
            retry_delay = (retry_delay * 2).min(Duration::from_secs(60));
        }
        attempts += 1;

        match suggester.suggest(&request).await {
            Ok(response) => {
                return (Ok(sanitize(response.symbols, catalog)), attempts);
            }
            Err(e) => {
                if let Some(se) = e.downcast_ref::<SuggestError>() {
                    if se.is_permanent() || matches!(se, SuggestError::MalformedResponse(_)) {
                        return (Err(e), attempts);
                    }
                    if let Some(ms) = se.retry_after_ms() {
                        retry_delay = Duration::from_millis(ms);
                    }
                }
                last_error = Some(e);
            }
        }
    }

    (
        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("suggestion failed"))),
        attempts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use crate::suggest::SuggestResponse;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick_config() -> AutofillConfig {
        AutofillConfig {
            retry_delay: Duration::from_millis(1),
            ..AutofillConfig::default()
        }
    }

    fn quiz_with(questions: Vec<Question>) -> Vec<Quiz> {
        vec![Quiz {
            title: "T".into(),
            questions,
        }]
    }

    struct FixedSuggester {
        symbols: Vec<String>,
        calls: AtomicU32,
    }

    impl FixedSuggester {
        fn new(symbols: Vec<&str>) -> Self {
            Self {
                symbols: symbols.into_iter().map(String::from).collect(),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl SymbolSuggester for FixedSuggester {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn suggest(&self, _: &SuggestRequest) -> anyhow::Result<SuggestResponse> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(SuggestResponse {
                content: String::new(),
                symbols: self.symbols.clone(),
                model: "fixed".into(),
                latency_ms: 0,
            })
        }
    }

    struct ErroringSuggester {
        error: fn() -> SuggestError,
        calls: AtomicU32,
    }

    #[async_trait::async_trait]
    impl SymbolSuggester for ErroringSuggester {
        fn name(&self) -> &str {
            "erroring"
        }

        async fn suggest(&self, _: &SuggestRequest) -> anyhow::Result<SuggestResponse> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Err((self.error)().into())
        }
    }

    #[tokio::test]
    async fn fills_only_empty_questions() {
        let suggester = Arc::new(FixedSuggester::new(vec!["\\neg", "\\land"]));
        let mut quizzes = quiz_with(vec![
            Question::new("p \\land q", vec![]),
            Question::new("already done", vec!["\\vee".into()]),
        ]);

        let engine = AutofillEngine::new(Arc::clone(&suggester) as _, quick_config());
        let report = engine
            .run(&mut quizzes, &SymbolCatalog::builtin(), &NoopReporter)
            .await;

        assert_eq!(quizzes[0].questions[0].symbols, vec!["\\neg", "\\land"]);
        assert_eq!(quizzes[0].questions[1].symbols, vec!["\\vee"]);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.count(SymbolSource::Suggested), 1);
        assert_eq!(suggester.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn overwrite_re_suggests_everything() {
        let suggester = Arc::new(FixedSuggester::new(vec!["\\neg"]));
        let mut quizzes = quiz_with(vec![Question::new("q", vec!["\\vee".into()])]);

        let config = AutofillConfig {
            overwrite: true,
            ..quick_config()
        };
        let engine = AutofillEngine::new(suggester as _, config);
        engine
            .run(&mut quizzes, &SymbolCatalog::builtin(), &NoopReporter)
            .await;

        assert_eq!(quizzes[0].questions[0].symbols, vec!["\\neg"]);
    }

    #[tokio::test]
    async fn failure_falls_back_to_classifier() {
        let suggester = Arc::new(ErroringSuggester {
            error: || SuggestError::NetworkError("down".into()),
            calls: AtomicU32::new(0),
        });
        let mut quizzes = quiz_with(vec![Question::new("x \\in A", vec![])]);

        let engine = AutofillEngine::new(Arc::clone(&suggester) as _, quick_config());
        let report = engine
            .run(&mut quizzes, &SymbolCatalog::builtin(), &NoopReporter)
            .await;

        assert_eq!(quizzes[0].questions[0].symbols, vec!["\\in"]);
        assert_eq!(report.count(SymbolSource::Fallback), 1);
        // Transient error: initial attempt plus max_retries.
        assert_eq!(suggester.calls.load(Ordering::Relaxed), 4);
    }

    #[tokio::test]
    async fn failure_without_fallback_leaves_question_empty() {
        let suggester = Arc::new(ErroringSuggester {
            error: || SuggestError::NetworkError("down".into()),
            calls: AtomicU32::new(0),
        });
        let mut quizzes = quiz_with(vec![Question::new("x \\in A", vec![])]);

        let config = AutofillConfig {
            fallback_to_scan: false,
            ..quick_config()
        };
        let engine = AutofillEngine::new(suggester as _, config);
        let report = engine
            .run(&mut quizzes, &SymbolCatalog::builtin(), &NoopReporter)
            .await;

        assert!(quizzes[0].questions[0].symbols.is_empty());
        assert_eq!(report.count(SymbolSource::Empty), 1);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let suggester = Arc::new(ErroringSuggester {
            error: || SuggestError::AuthenticationFailed("bad key".into()),
            calls: AtomicU32::new(0),
        });
        let mut quizzes = quiz_with(vec![Question::new("p", vec![])]);

        let engine = AutofillEngine::new(Arc::clone(&suggester) as _, quick_config());
        engine
            .run(&mut quizzes, &SymbolCatalog::builtin(), &NoopReporter)
            .await;

        assert_eq!(suggester.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn untrusted_suggestions_are_sanitized() {
        let suggester = Arc::new(FixedSuggester::new(vec!["\\neg", "\\notarealtoken"]));
        let mut quizzes = quiz_with(vec![Question::new("p", vec![])]);

        let engine = AutofillEngine::new(suggester as _, quick_config());
        engine
            .run(&mut quizzes, &SymbolCatalog::builtin(), &NoopReporter)
            .await;

        assert_eq!(quizzes[0].questions[0].symbols, vec!["\\neg"]);
    }

    #[tokio::test]
    async fn report_outcomes_are_ordered() {
        let suggester = Arc::new(FixedSuggester::new(vec!["\\neg"]));
        let mut quizzes = vec![
            Quiz {
                title: "A".into(),
                questions: vec![
                    Question::new("q1", vec![]),
                    Question::new("q2", vec![]),
                ],
            },
            Quiz {
                title: "B".into(),
                questions: vec![Question::new("q3", vec![])],
            },
        ];

        let engine = AutofillEngine::new(suggester as _, quick_config());
        let report = engine
            .run(&mut quizzes, &SymbolCatalog::builtin(), &NoopReporter)
            .await;

        let keys: Vec<_> = report
            .outcomes
            .iter()
            .map(|o| (o.quiz_index, o.question_index))
            .collect();
        assert_eq!(keys, vec![(0, 0), (0, 1), (1, 0)]);
    }
}
