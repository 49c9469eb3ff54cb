//! The `mathquiz fmt` command.

use std::path::PathBuf;

use anyhow::Result;

use mathquiz_core::codec;

pub fn execute(file: PathBuf, output: Option<PathBuf>, format: String) -> Result<()> {
    let quizzes = codec::decode_file(&file)?;

    let rendered = match format.as_str() {
        "txt" => codec::encode(&quizzes),
        "json" => serde_json::to_string_pretty(&quizzes)? + "\n",
        other => anyhow::bail!("unknown format: '{other}' (expected txt or json)"),
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
