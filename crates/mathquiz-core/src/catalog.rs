//! The symbol catalog: every notation token eligible for suggestion
//! and insertion, with its role and insertion template.

use serde::{Deserialize, Serialize};

use crate::model::dedup_preserving_order;

/// Every token the system recognizes. LaTeX commands plus the layout
/// keywords at the end (`overline`, `^`, `_`, `table`).
pub const BUILTIN_SYMBOLS: &[&str] = &[
    "\\rightarrow",
    "\\vee",
    "\\neg",
    "\\emptyset",
    "\\times",
    "\\neq",
    "\\subseteq",
    "\\equiv",
    "\\forall",
    "\\in",
    "\\notin",
    "\\cup",
    "\\cap",
    "\\land",
    "\\exists",
    "\\pm",
    "\\mp",
    "\\cdot",
    "\\div",
    "\\ast",
    "\\star",
    "\\circ",
    "\\bullet",
    "\\leq",
    "\\geq",
    "\\approx",
    "\\sim",
    "\\simeq",
    "\\cong",
    "\\propto",
    "\\perp",
    "\\mid",
    "\\parallel",
    "\\angle",
    "\\triangle",
    "\\nabla",
    "\\partial",
    "\\int",
    "\\sum",
    "\\prod",
    "\\sqrt",
    "\\lim",
    "\\sin",
    "\\cos",
    "\\tan",
    "\\log",
    "\\alpha",
    "\\beta",
    "\\gamma",
    "\\delta",
    "\\epsilon",
    "\\zeta",
    "\\eta",
    "\\theta",
    "\\lambda",
    "\\mu",
    "\\pi",
    "\\rho",
    "\\sigma",
    "\\tau",
    "\\phi",
    "\\psi",
    "\\omega",
    "\\Gamma",
    "\\Delta",
    "\\Theta",
    "\\Lambda",
    "\\Pi",
    "\\Sigma",
    "\\Phi",
    "\\Psi",
    "\\Omega",
    "overline",
    "^",
    "_",
    "table",
];

/// Tokens that insert a structural template rather than a literal.
pub const OPERATOR_KEYWORDS: &[&str] = &["overline", "^", "_", "\\sum", "\\prod", "table"];

/// How a token behaves when inserted into a math surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolRole {
    /// Inserts verbatim.
    Literal,
    /// Inserts a placeholder-filled template.
    Operator,
}

impl std::fmt::Display for SymbolRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolRole::Literal => write!(f, "literal"),
            SymbolRole::Operator => write!(f, "operator"),
        }
    }
}

/// An ordered, deduplicated set of recognized notation tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCatalog {
    tokens: Vec<String>,
}

impl SymbolCatalog {
    /// The full builtin catalog.
    pub fn builtin() -> Self {
        Self {
            tokens: BUILTIN_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build a catalog from arbitrary tokens, preserving first-seen order.
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self {
            tokens: dedup_preserving_order(tokens),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Newline-joined token list, the form the suggestion prompt embeds.
    pub fn joined_list(&self) -> String {
        self.tokens.join("\n")
    }

    pub fn role(&self, token: &str) -> SymbolRole {
        if OPERATOR_KEYWORDS.contains(&token) {
            SymbolRole::Operator
        } else {
            SymbolRole::Literal
        }
    }

    /// Split a symbol list into (operator/layout, literal) rows, keeping
    /// relative order within each row.
    pub fn partition_by_role<'a>(&self, symbols: &'a [String]) -> (Vec<&'a str>, Vec<&'a str>) {
        symbols
            .iter()
            .map(String::as_str)
            .partition(|s| self.role(s) == SymbolRole::Operator)
    }
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Insertion template for an operator token. `#0` marks the slot the
/// cursor lands in, `#?` marks prompt-for-value slots. Literal tokens
/// have no template.
pub fn insertion_template(token: &str) -> Option<String> {
    match token {
        "overline" => Some("\\overline{#0}".to_string()),
        "^" => Some("^{#0}".to_string()),
        "_" => Some("_{#0}".to_string()),
        "\\sum" => Some("\\sum_{#?}^{#?}".to_string()),
        "\\prod" => Some("\\prod_{#?}^{#?}".to_string()),
        "table" => Some(array_template(2, 2)),
        _ => None,
    }
}

/// LaTeX array environment with `rows` x `cols` placeholder cells.
/// The first cell gets `#0` so the cursor lands there after insertion.
pub fn array_template(rows: usize, cols: usize) -> String {
    let rows = rows.max(1);
    let cols = cols.max(1);
    let body = (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| if r == 0 && c == 0 { "#0" } else { "#?" })
                .collect::<Vec<_>>()
                .join(" & ")
        })
        .collect::<Vec<_>>()
        .join(" \\\\ ");
    format!("\\begin{{array}}{{{}}} {} \\end{{array}}", "c".repeat(cols), body)
}

/// Resolve a display alias (unicode glyph or keyword) to the LaTeX
/// command a palette button inserts. Unrecognized input passes through.
pub fn display_latex(symbol: &str) -> &str {
    match symbol {
        "→" => "\\rightarrow",
        "∨" => "\\vee",
        "¬" => "\\neg",
        "∅" => "\\emptyset",
        "×" => "\\times",
        "≠" => "\\neq",
        "⊆" => "\\subseteq",
        "≡" => "\\equiv",
        "∀" => "\\forall",
        "∈" => "\\in",
        "∉" => "\\notin",
        "∪" => "\\cup",
        "exist" => "\\exists",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_contains_commands_and_keywords() {
        let catalog = SymbolCatalog::builtin();
        assert!(catalog.contains("\\neg"));
        assert!(catalog.contains("table"));
        assert!(catalog.contains("^"));
        assert!(!catalog.contains("\\notarealtoken"));
        // 72 commands plus overline, ^, _, table.
        assert_eq!(catalog.len(), 76);
        assert_eq!(catalog.len(), BUILTIN_SYMBOLS.len());
    }

    #[test]
    fn roles() {
        let catalog = SymbolCatalog::builtin();
        assert_eq!(catalog.role("\\sum"), SymbolRole::Operator);
        assert_eq!(catalog.role("table"), SymbolRole::Operator);
        assert_eq!(catalog.role("\\neg"), SymbolRole::Literal);
    }

    #[test]
    fn partition_keeps_order() {
        let catalog = SymbolCatalog::builtin();
        let symbols = vec![
            "\\neg".to_string(),
            "\\sum".to_string(),
            "\\land".to_string(),
            "table".to_string(),
        ];
        let (ops, literals) = catalog.partition_by_role(&symbols);
        assert_eq!(ops, vec!["\\sum", "table"]);
        assert_eq!(literals, vec!["\\neg", "\\land"]);
    }

    #[test]
    fn operator_templates() {
        assert_eq!(insertion_template("overline").unwrap(), "\\overline{#0}");
        assert_eq!(insertion_template("\\sum").unwrap(), "\\sum_{#?}^{#?}");
        assert!(insertion_template("\\neg").is_none());
    }

    #[test]
    fn array_template_first_cell_is_cursor_slot() {
        assert_eq!(array_template(1, 1), "\\begin{array}{c} #0 \\end{array}");
        assert_eq!(
            array_template(2, 3),
            "\\begin{array}{ccc} #0 & #? & #? \\\\ #? & #? & #? \\end{array}"
        );
    }

    #[test]
    fn display_aliases() {
        assert_eq!(display_latex("→"), "\\rightarrow");
        assert_eq!(display_latex("exist"), "\\exists");
        assert_eq!(display_latex("\\land"), "\\land");
    }

    #[test]
    fn from_tokens_dedups() {
        let catalog =
            SymbolCatalog::from_tokens(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(catalog.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
