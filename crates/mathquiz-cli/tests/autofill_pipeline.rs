//! End-to-end autofill tests: decode → suggest → fill → encode.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use mathquiz_core::autofill::{AutofillConfig, AutofillEngine, NoopReporter, SymbolSource};
use mathquiz_core::catalog::SymbolCatalog;
use mathquiz_core::codec;
use mathquiz_suggest::mock::MockSuggester;

fn mathquiz() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("mathquiz").unwrap()
}

fn quick_config() -> AutofillConfig {
    AutofillConfig {
        retry_delay: Duration::from_millis(1),
        ..AutofillConfig::default()
    }
}

// --- Library-level pipeline ---

#[tokio::test]
async fn file_roundtrip_with_mock_suggester() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quizzes.txt");
    std::fs::write(
        &path,
        "QUIZ: Logic\nProve the contrapositive :\nShow p \\vee q : \\vee\n",
    )
    .unwrap();

    let mut responses = HashMap::new();
    responses.insert(
        "contrapositive".to_string(),
        vec!["\\neg".to_string(), "\\rightarrow".to_string()],
    );
    let suggester = Arc::new(MockSuggester::new(responses));

    let mut quizzes = codec::decode_file(&path).unwrap();
    let engine = AutofillEngine::new(Arc::clone(&suggester) as _, quick_config());
    let report = engine
        .run(&mut quizzes, &SymbolCatalog::builtin(), &NoopReporter)
        .await;

    // Only the empty question was suggested; the filled one was skipped.
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.count(SymbolSource::Suggested), 1);
    assert_eq!(suggester.call_count(), 1);

    codec::encode_to_file(&quizzes, &path).unwrap();
    let reloaded = codec::decode_file(&path).unwrap();
    assert_eq!(
        reloaded[0].questions[0].symbols,
        vec!["\\neg", "\\rightarrow"]
    );
    assert_eq!(reloaded[0].questions[1].symbols, vec!["\\vee"]);
}

#[tokio::test]
async fn failed_suggestions_fall_back_and_still_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quizzes.txt");
    std::fs::write(&path, "QUIZ: Sets\nShow x \\in A \\cup B :\n").unwrap();

    // No matching response and no default: the mock answers with an
    // empty list, which counts as an empty outcome, not a failure.
    let suggester = Arc::new(MockSuggester::new(HashMap::new()));

    let mut quizzes = codec::decode_file(&path).unwrap();
    let engine = AutofillEngine::new(suggester as _, quick_config());
    let report = engine
        .run(&mut quizzes, &SymbolCatalog::builtin(), &NoopReporter)
        .await;

    assert_eq!(report.count(SymbolSource::Empty), 1);

    // An empty symbol list cannot be encoded, so the question drops out.
    codec::encode_to_file(&quizzes, &path).unwrap();
    let reloaded = codec::decode_file(&path).unwrap();
    assert!(reloaded[0].questions.is_empty());
}

// --- CLI-level pipeline with the deterministic local suggester ---

#[test]
fn autofill_command_fills_missing_symbols_in_place() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quizzes.txt");
    std::fs::write(
        &path,
        "QUIZ: Sets\nShow x \\in A \\cup B :\nKeep p \\vee q : \\vee\n",
    )
    .unwrap();

    mathquiz()
        .current_dir(dir.path())
        .arg("autofill")
        .arg("--file")
        .arg(&path)
        .arg("--suggester")
        .arg("local")
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved to"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Show x \\in A \\cup B : \\in,\\cup"));
    assert!(content.contains("Keep p \\vee q : \\vee"));
}

#[test]
fn autofill_command_writes_to_output_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quizzes.txt");
    let out = dir.path().join("filled.txt");
    let original = "QUIZ: Sets\nShow x \\in A :\n";
    std::fs::write(&path, original).unwrap();

    mathquiz()
        .current_dir(dir.path())
        .arg("autofill")
        .arg("--file")
        .arg(&path)
        .arg("--output")
        .arg(&out)
        .arg("--suggester")
        .arg("local")
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    assert!(std::fs::read_to_string(&out)
        .unwrap()
        .contains("Show x \\in A : \\in"));
}

#[test]
fn autofill_command_overwrite_re_suggests() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quizzes.txt");
    std::fs::write(&path, "QUIZ: Sets\nShow x \\in A : \\vee\n").unwrap();

    mathquiz()
        .current_dir(dir.path())
        .arg("autofill")
        .arg("--file")
        .arg(&path)
        .arg("--suggester")
        .arg("local")
        .arg("--overwrite")
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Show x \\in A : \\in"));
    assert!(!content.contains("\\vee"));
}

#[test]
fn autofill_command_rejects_zero_parallelism() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quizzes.txt");
    std::fs::write(&path, "QUIZ: T\n").unwrap();

    mathquiz()
        .current_dir(dir.path())
        .arg("autofill")
        .arg("--file")
        .arg(&path)
        .arg("--suggester")
        .arg("local")
        .arg("--parallelism")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parallelism"));
}
