//! Parser configuration.

/// Default nesting limit. Each level costs a few stack frames of recursion.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Knobs for [`parse_with_options`](crate::parse_with_options).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum array/object nesting depth. Deeper input fails with
    /// `NestingTooDeep` instead of exhausting the stack.
    pub max_depth: usize,
    /// Reject non-whitespace input after the root value.
    pub reject_trailing: bool,
}

impl ParseOptions {
    /// Rejects trailing content; the default.
    pub const fn strict() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            reject_trailing: true,
        }
    }

    /// Stops after the root value and ignores whatever follows it.
    pub const fn lenient() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            reject_trailing: false,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::strict()
    }
}
