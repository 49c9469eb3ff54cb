//! The `mathquiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

use mathquiz_core::catalog::SymbolCatalog;
use mathquiz_core::codec;

pub fn execute(file: PathBuf) -> Result<()> {
    let quizzes = codec::decode_file(&file)?;
    let catalog = SymbolCatalog::builtin();

    let question_count: usize = quizzes.iter().map(|q| q.questions.len()).sum();
    println!(
        "{}: {} quiz(es), {} question(s)",
        file.display(),
        quizzes.len(),
        question_count
    );

    let warnings = codec::validate_quizzes(&quizzes, &catalog);
    for w in &warnings {
        let prefix = w
            .quiz_title
            .as_ref()
            .map(|t| format!("  [{t}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All quizzes valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
