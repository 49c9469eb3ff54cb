//! The `mathquiz autofill` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use mathquiz_core::autofill::{
    AutofillConfig, AutofillEngine, AutofillReport, ProgressReporter, QuestionOutcome,
    SymbolSource,
};
use mathquiz_core::catalog::SymbolCatalog;
use mathquiz_core::codec;
use mathquiz_core::suggest::SymbolSuggester;
use mathquiz_suggest::{create_suggester, load_config_from};

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_question_start(&self, quiz_title: &str, question_index: usize) {
        eprintln!("  Suggesting: {quiz_title} :: question {}", question_index + 1);
    }

    fn on_question_done(&self, outcome: &QuestionOutcome) {
        let source = match outcome.source {
            SymbolSource::Suggested => "suggested",
            SymbolSource::Fallback => "fallback",
            SymbolSource::Empty => "empty",
        };
        eprintln!(
            "  Done: quiz {} question {} [{}] {} symbol(s)",
            outcome.quiz_index + 1,
            outcome.question_index + 1,
            source,
            outcome.symbols.len(),
        );
    }

    fn on_question_error(&self, quiz_title: &str, question_index: usize, error: &str) {
        eprintln!(
            "  ERROR: {quiz_title} :: question {}: {error}",
            question_index + 1
        );
    }

    fn on_run_complete(&self, report: &AutofillReport, elapsed: Duration) {
        eprintln!(
            "\nComplete: {} question(s) in {:.1}s",
            report.outcomes.len(),
            elapsed.as_secs_f64()
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    file: PathBuf,
    output: Option<PathBuf>,
    suggester_name: Option<String>,
    parallelism: Option<usize>,
    overwrite: bool,
    no_fallback: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let name = suggester_name.unwrap_or_else(|| config.default_suggester.clone());
    let suggester_config = config.suggesters.get(&name).ok_or_else(|| {
        anyhow::anyhow!(
            "suggester '{}' not found in config. Available: {:?}",
            name,
            config.suggesters.keys().collect::<Vec<_>>()
        )
    })?;
    let suggester: Arc<dyn SymbolSuggester> = Arc::from(create_suggester(suggester_config)?);

    let mut quizzes = codec::decode_file(&file)?;
    let catalog = SymbolCatalog::builtin();

    let engine_config = AutofillConfig {
        parallelism,
        max_retries: config.max_retries,
        retry_delay: Duration::from_millis(config.retry_delay_ms),
        overwrite,
        fallback_to_scan: !no_fallback && config.fallback_to_scan,
    };

    eprintln!(
        "Autofilling {} with '{}' ({} quiz(es))",
        file.display(),
        name,
        quizzes.len()
    );
    eprintln!();

    let engine = AutofillEngine::new(suggester, engine_config);
    let report = engine.run(&mut quizzes, &catalog, &ConsoleReporter).await;

    print_summary(&report);

    let target = output.unwrap_or(file);
    codec::encode_to_file(&quizzes, &target)?;
    eprintln!("Saved to: {}", target.display());

    Ok(())
}

fn print_summary(report: &AutofillReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Suggested", "Fallback", "Empty", "Duration"]);
    table.add_row(vec![
        Cell::new(report.count(SymbolSource::Suggested)),
        Cell::new(report.count(SymbolSource::Fallback)),
        Cell::new(report.count(SymbolSource::Empty)),
        Cell::new(format!("{}ms", report.duration_ms)),
    ]);

    eprintln!("\n{table}");
    eprintln!(
        "Run {} at {}",
        report.run_id,
        report.created_at.format("%Y-%m-%dT%H:%M:%SZ")
    );
}
