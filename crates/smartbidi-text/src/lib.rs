//! smartbidi-text: script classification and direction decisions.
//!
//! - `script`: range-membership classification of text into RTL / Latin presence
//! - `direction`: mapping a classification onto a directionality variant

pub mod direction;
pub mod script;

pub use direction::{Decision, DirectionConfig, DirectionVariant, TextDir, decide};
pub use script::{ScriptClassifier, ScriptRange, ScriptRangeError, TextClassification, classify};
