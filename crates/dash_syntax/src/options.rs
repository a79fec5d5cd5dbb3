//! Parse configuration.

/// How the parser reacts to the first error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recovery {
    /// Insert error placeholders, resynchronize, and keep parsing siblings.
    #[default]
    Tolerant,
    /// Stop at the first error. The returned tree holds everything parsed before it.
    FailFast,
}

/// Options for [`crate::parse_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Error policy
    pub recovery: Recovery,
    /// Keep comments as trivia on the root node
    pub keep_comments: bool,
    /// Stop reporting (and parsing) after this many errors
    pub max_errors: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            recovery: Recovery::Tolerant,
            keep_comments: true,
            max_errors: None,
        }
    }
}

impl ParseOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `ParseOptions::new().with_recovery(Recovery::FailFast)`
    pub fn fail_fast() -> Self {
        Self::new().with_recovery(Recovery::FailFast)
    }

    pub fn with_recovery(mut self, recovery: Recovery) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    pub fn with_max_errors(mut self, max: usize) -> Self {
        self.max_errors = Some(max);
        self
    }

    /// Effective error cap: `1` for fail-fast, otherwise `max_errors`.
    pub fn error_limit(&self) -> Option<usize> {
        match self.recovery {
            Recovery::FailFast => Some(1),
            Recovery::Tolerant => self.max_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_tolerant() {
        let options = ParseOptions::default();
        assert_eq!(options.recovery, Recovery::Tolerant);
        assert_eq!(options.error_limit(), None);
    }

    #[test]
    fn test_default_keeps_comments() {
        assert!(ParseOptions::default().keep_comments);
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(ParseOptions::new(), ParseOptions::default());
    }

    #[test]
    fn test_fail_fast_limit() {
        let options = ParseOptions::fail_fast().with_max_errors(10);
        assert_eq!(options.error_limit(), Some(1));
    }

    #[test]
    fn test_max_errors() {
        let options = ParseOptions::new().with_max_errors(3);
        assert_eq!(options.error_limit(), Some(3));
    }

    #[test]
    fn test_with_comments() {
        assert!(!ParseOptions::new().with_comments(false).keep_comments);
    }
}
