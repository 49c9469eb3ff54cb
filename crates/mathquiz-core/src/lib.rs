//! mathquiz-core — Quiz file codec, symbol catalog, and classifier.
//!
//! This crate defines the fundamental data model, the line-oriented quiz
//! file format, the deterministic symbol classifier, and the suggestion
//! boundary that the rest of the mathquiz system builds on.

pub mod autofill;
pub mod catalog;
pub mod classifier;
pub mod codec;
pub mod error;
pub mod model;
pub mod session;
pub mod suggest;
pub mod surface;
