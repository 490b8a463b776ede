use thiserror::Error;

/// Inclusive code-point range treated as right-to-left script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptRange {
    low: u32,
    high: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptRangeError {
    #[error("range low bound U+{low:04X} is above high bound U+{high:04X}")]
    Inverted { low: u32, high: u32 },
    #[error("U+{0:04X} is outside the Unicode code space")]
    OutOfRange(u32),
}

impl ScriptRange {
    /// Hebrew block only (U+0590..=U+05FF).
    pub const HEBREW: ScriptRange = ScriptRange {
        low: 0x0590,
        high: 0x05FF,
    };

    /// Hebrew through the Arabic supplements (U+0590..=U+08FF).
    pub const HEBREW_ARABIC: ScriptRange = ScriptRange {
        low: 0x0590,
        high: 0x08FF,
    };

    pub fn new(low: u32, high: u32) -> Result<Self, ScriptRangeError> {
        if high > char::MAX as u32 {
            return Err(ScriptRangeError::OutOfRange(high));
        }
        if low > high {
            return Err(ScriptRangeError::Inverted { low, high });
        }
        Ok(Self { low, high })
    }

    /// Same low bound, different (inclusive) high bound.
    pub fn with_high(self, high: u32) -> Result<Self, ScriptRangeError> {
        Self::new(self.low, high)
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    #[inline]
    pub fn contains(&self, ch: char) -> bool {
        let cp = ch as u32;
        cp >= self.low && cp <= self.high
    }
}

impl Default for ScriptRange {
    fn default() -> Self {
        Self::HEBREW_ARABIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_share_low_bound() {
        assert_eq!(ScriptRange::HEBREW.low(), 0x0590);
        assert_eq!(ScriptRange::HEBREW_ARABIC.low(), 0x0590);
        assert_eq!(ScriptRange::HEBREW.high(), 0x05FF);
        assert_eq!(ScriptRange::HEBREW_ARABIC.high(), 0x08FF);
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = ScriptRange::HEBREW;
        assert!(range.contains('\u{0590}'));
        assert!(range.contains('\u{05FF}'));
        assert!(!range.contains('\u{058F}'));
        assert!(!range.contains('\u{0600}'));
    }

    #[test]
    fn rejects_inverted_range() {
        assert_eq!(
            ScriptRange::new(0x05FF, 0x0590),
            Err(ScriptRangeError::Inverted {
                low: 0x05FF,
                high: 0x0590
            })
        );
    }

    #[test]
    fn rejects_bound_past_unicode() {
        assert!(matches!(
            ScriptRange::HEBREW.with_high(0x11_0000),
            Err(ScriptRangeError::OutOfRange(_))
        ));
    }

    #[test]
    fn widening_keeps_low_bound() {
        let wide = ScriptRange::HEBREW.with_high(0x08FF).unwrap();
        assert_eq!(wide, ScriptRange::HEBREW_ARABIC);
    }
}
