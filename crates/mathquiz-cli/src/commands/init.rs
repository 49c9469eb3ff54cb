//! The `mathquiz init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create mathquiz.toml
    if std::path::Path::new("mathquiz.toml").exists() {
        println!("mathquiz.toml already exists, skipping.");
    } else {
        std::fs::write("mathquiz.toml", SAMPLE_CONFIG)?;
        println!("Created mathquiz.toml");
    }

    // Create example quiz file
    if std::path::Path::new("quizzes.txt").exists() {
        println!("quizzes.txt already exists, skipping.");
    } else {
        std::fs::write("quizzes.txt", EXAMPLE_QUIZZES)?;
        println!("Created quizzes.txt");
    }

    println!("\nNext steps:");
    println!("  1. Edit mathquiz.toml with your Gemini API key");
    println!("  2. Run: mathquiz validate --file quizzes.txt");
    println!("  3. Run: mathquiz autofill --file quizzes.txt");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mathquiz configuration

[suggesters.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"
model = "gemini-2.5-flash"

[suggesters.local]
type = "local"

default_suggester = "gemini"
parallelism = 4
max_retries = 3
retry_delay_ms = 1000
fallback_to_scan = true
"#;

const EXAMPLE_QUIZZES: &str = r#"QUIZ: Propositional Logic
Prove that \neg (A \land B) \equiv (\neg A) \vee (\neg B) : \neg,\land,\equiv,\vee
Show that A \rightarrow B \equiv \neg A \vee B : \rightarrow,\equiv,\neg,\vee

QUIZ: Set Theory
Prove that A \subseteq B and B \subseteq A implies A = B : \subseteq
For all x \in A \cup B, show x \in A or x \in B :
Compute \sum_{i=1}^{n} i for n = 10 :
"#;
