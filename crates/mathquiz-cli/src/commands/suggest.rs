//! The `mathquiz suggest` command.

use std::path::PathBuf;

use anyhow::Result;

use mathquiz_core::catalog::SymbolCatalog;
use mathquiz_core::suggest::suggest_symbols;
use mathquiz_suggest::{create_suggester, load_config_from};

pub async fn execute(
    text: String,
    suggester_name: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let name = suggester_name.unwrap_or_else(|| config.default_suggester.clone());

    let suggester_config = config.suggesters.get(&name).ok_or_else(|| {
        anyhow::anyhow!(
            "suggester '{}' not found in config. Available: {:?}",
            name,
            config.suggesters.keys().collect::<Vec<_>>()
        )
    })?;
    let suggester = create_suggester(suggester_config)?;

    let catalog = SymbolCatalog::builtin();
    let symbols = suggest_symbols(suggester.as_ref(), &catalog, &text).await;

    if symbols.is_empty() {
        println!("No symbols suggested.");
    } else {
        for symbol in &symbols {
            println!("{symbol}");
        }
    }

    Ok(())
}
