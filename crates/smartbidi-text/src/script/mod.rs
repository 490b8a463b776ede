//! Script detection by code-point range membership.
//!
//! Detection is deliberately narrow: RTL presence is a single inclusive
//! range check, and Latin presence only looks at ASCII letters.

pub mod classify;
pub mod range;

pub use classify::{ScriptClassifier, TextClassification, classify};
pub use range::{ScriptRange, ScriptRangeError};
