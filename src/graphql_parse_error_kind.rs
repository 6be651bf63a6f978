/// Categorized parse error kind for programmatic handling.
///
/// Enables tools to pattern-match on error types without parsing
/// messages.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphQLParseErrorKind {
    /// A construct that must not be empty was empty (e.g. `{}` as a
    /// selection set).
    InvalidEmptyConstruct {
        construct: &'static str,
    },

    /// A numeric literal that could not be parsed (e.g. `1.`, `01`).
    InvalidNumber,

    /// A character that cannot begin any token.
    InvalidCharacter,

    /// Values, selection sets, or type annotations nested beyond the
    /// parser's depth limit.
    NestingTooDeep,

    /// An escape sequence inside a string literal that is not valid
    /// GraphQL (e.g. `\q`, malformed `\u` escapes).
    InvalidStringEscape,

    /// A delimiter was opened but never closed before end of input.
    UnclosedDelimiter {
        delimiter: char,
    },

    /// The input ended where more tokens were required.
    UnexpectedEof,

    /// A token appeared where a different token was required.
    UnexpectedToken,

    /// A string literal ran to end of line or end of input without a
    /// closing quote.
    UnterminatedString,
}
