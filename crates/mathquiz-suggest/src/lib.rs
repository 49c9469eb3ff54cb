//! mathquiz-suggest — symbol suggestion backends.
//!
//! Implements the `SymbolSuggester` trait for the hosted Gemini API, for
//! the deterministic local classifier, and for a test mock, so the
//! authoring flow can swap suggestion sources freely.

pub mod config;
pub mod gemini;
pub mod local;
pub mod mock;

pub use config::{create_suggester, load_config, load_config_from, MathquizConfig, SuggesterConfig};
