use crate::GraphQLParseErrorKind;
use crate::GraphQLSourceSpan;

/// A parse error with location information.
///
/// Provides both a human-readable message and a categorized
/// [`GraphQLParseErrorKind`] for programmatic handling by tools.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{}", self.format_oneline())]
pub struct GraphQLParseError {
    /// Human-readable primary error message.
    ///
    /// Examples: "Expected `:` after object field name", "Unclosed `{`"
    message: String,

    /// The primary span where the error was detected.
    ///
    /// - For "unexpected token" errors: the unexpected token's span
    /// - For "expected X" errors: where X should have appeared
    /// - For "unclosed delimiter" errors: where the delimiter was opened
    span: GraphQLSourceSpan,

    /// Categorized error kind for programmatic handling.
    kind: GraphQLParseErrorKind,
}

impl GraphQLParseError {
    /// Creates a new parse error.
    pub fn new(
        message: impl Into<String>,
        span: GraphQLSourceSpan,
        kind: GraphQLParseErrorKind,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
        }
    }

    /// Returns the human-readable error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the primary span where the error was detected.
    pub fn span(&self) -> &GraphQLSourceSpan {
        &self.span
    }

    /// Returns the categorized error kind.
    pub fn kind(&self) -> &GraphQLParseErrorKind {
        &self.kind
    }

    /// Formats this error as a single-line summary.
    ///
    /// Produces output like:
    /// ```text
    /// 5:12: error: Expected `:` after object field name
    /// ```
    ///
    /// Line and column are displayed 1-based.
    pub fn format_oneline(&self) -> String {
        let line = self.span.start_inclusive.line() + 1;
        let column = self.span.start_inclusive.col() + 1;
        format!("{line}:{column}: error: {}", self.message)
    }
}
