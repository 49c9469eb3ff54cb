//! Editable math surface abstraction.
//!
//! The rendering host supplies one editable rich-text/math control per
//! question. The core only ever talks to it through this trait, so any
//! concrete widget can sit behind it without touching the codec or the
//! classifier.

use crate::catalog::{insertion_template, SymbolCatalog, SymbolRole};

/// Input mode of a math surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Text,
    Math,
}

/// A host-provided editable math control.
pub trait MathSurface {
    /// Current markup value.
    fn value(&self) -> String;

    /// Replace the current value.
    fn set_value(&mut self, value: &str);

    /// Insert a snippet at the cursor. `#0` and `#?` mark placeholder
    /// slots the widget turns into editable boxes.
    fn insert(&mut self, snippet: &str);

    /// Switch between plain-text and math input.
    fn set_mode(&mut self, mode: EditMode);

    /// Register a change notification callback.
    fn set_on_change(&mut self, callback: Box<dyn FnMut(&str) + Send>);
}

/// Insert a catalog token into a surface the way a palette button does:
/// switch to math mode, then insert either the token's structural
/// template or the token itself.
pub fn insert_symbol(surface: &mut dyn MathSurface, catalog: &SymbolCatalog, token: &str) {
    surface.set_mode(EditMode::Math);
    match catalog.role(token) {
        SymbolRole::Operator => {
            if let Some(template) = insertion_template(token) {
                surface.insert(&template);
            }
        }
        SymbolRole::Literal => surface.insert(token),
    }
}
