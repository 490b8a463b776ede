use serde::{Deserialize, Serialize};

use super::range::ScriptRange;

/// Which script families appear in a fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextClassification {
    pub has_rtl: bool,
    pub has_latin: bool,
}

impl TextClassification {
    pub fn is_mixed(&self) -> bool {
        self.has_rtl && self.has_latin
    }
}

/// Classify `text` against an RTL range.
///
/// Latin presence only counts plain ASCII letters; accented and
/// Latin-extended letters are ignored.
pub fn classify(text: &str, range: ScriptRange) -> TextClassification {
    let mut out = TextClassification::default();
    for ch in text.chars() {
        out.has_rtl |= range.contains(ch);
        out.has_latin |= ch.is_ascii_alphabetic();
        if out.is_mixed() {
            break;
        }
    }
    out
}

/// Classifier bound to a fixed RTL range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptClassifier {
    range: ScriptRange,
}

impl ScriptClassifier {
    pub fn new(range: ScriptRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> ScriptRange {
        self.range
    }

    pub fn classify(&self, text: &str) -> TextClassification {
        classify(text, self.range)
    }
}
