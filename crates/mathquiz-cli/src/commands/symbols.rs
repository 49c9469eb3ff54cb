//! The `mathquiz symbols` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use mathquiz_core::catalog::{insertion_template, SymbolCatalog};

pub fn execute() -> Result<()> {
    let catalog = SymbolCatalog::builtin();

    let mut table = Table::new();
    table.set_header(vec!["Token", "Role", "Inserts"]);

    for token in catalog.iter() {
        let inserts = insertion_template(token).unwrap_or_else(|| token.to_string());
        table.add_row(vec![
            Cell::new(token),
            Cell::new(catalog.role(token)),
            Cell::new(inserts),
        ]);
    }

    println!("{table}");
    println!("\n{} token(s) in the catalog.", catalog.len());

    Ok(())
}
