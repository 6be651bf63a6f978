use crate::GraphQLSourceSpan;
use std::borrow::Cow;

/// The kind of a GraphQL token.
///
/// Literal kinds (`IntValue`, `FloatValue`) store only the raw source
/// text; `StringValue` stores the processed string after escape
/// resolution and block-string indentation stripping.
///
/// # Lifetime Parameter
///
/// The `'src` lifetime enables zero-copy lexing: names and numeric
/// literals borrow string slices directly from the source text via
/// `Cow::Borrowed`, while processed strings that needed escape
/// resolution use `Cow::Owned`.
///
/// # Negative Numeric Literals
///
/// Negative numbers like `-123` are lexed as single tokens (e.g.
/// `IntValue("-123")`), not as separate minus and number tokens. This
/// matches the GraphQL spec's grammar for `IntValue`/`FloatValue`.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphQLTokenKind<'src> {
    // =========================================================================
    // Punctuators (no allocation needed)
    // =========================================================================
    /// `&`
    Ampersand,
    /// `@`
    At,
    /// `!`
    Bang,
    /// `:`
    Colon,
    /// `}`
    CurlyBraceClose,
    /// `{`
    CurlyBraceOpen,
    /// `$`
    Dollar,
    /// `...`
    Ellipsis,
    /// `=`
    Equals,
    /// `)`
    ParenClose,
    /// `(`
    ParenOpen,
    /// `|`
    Pipe,
    /// `]`
    SquareBracketClose,
    /// `[`
    SquareBracketOpen,

    // =========================================================================
    // Literals
    // =========================================================================
    /// A GraphQL name/identifier.
    Name(Cow<'src, str>),

    /// Raw source text of an integer literal, including optional
    /// negative sign (e.g. `"-123"`, `"0"`).
    IntValue(Cow<'src, str>),

    /// Raw source text of a float literal, including optional negative
    /// sign (e.g. `"-1.23e-4"`, `"0.5"`).
    FloatValue(Cow<'src, str>),

    /// Processed content of a string literal, after escape-sequence
    /// resolution and (for block strings) indentation stripping.
    StringValue {
        value: Cow<'src, str>,
        /// Whether the literal used block (`"""`) syntax.
        block: bool,
    },

    // =========================================================================
    // End of input
    // =========================================================================
    /// End of input.
    Eof,
}

impl GraphQLTokenKind<'_> {
    /// Returns a short human-readable description for error messages.
    pub fn description(&self) -> String {
        match self {
            GraphQLTokenKind::Ampersand => "`&`".to_string(),
            GraphQLTokenKind::At => "`@`".to_string(),
            GraphQLTokenKind::Bang => "`!`".to_string(),
            GraphQLTokenKind::Colon => "`:`".to_string(),
            GraphQLTokenKind::CurlyBraceClose => "`}`".to_string(),
            GraphQLTokenKind::CurlyBraceOpen => "`{`".to_string(),
            GraphQLTokenKind::Dollar => "`$`".to_string(),
            GraphQLTokenKind::Ellipsis => "`...`".to_string(),
            GraphQLTokenKind::Equals => "`=`".to_string(),
            GraphQLTokenKind::ParenClose => "`)`".to_string(),
            GraphQLTokenKind::ParenOpen => "`(`".to_string(),
            GraphQLTokenKind::Pipe => "`|`".to_string(),
            GraphQLTokenKind::SquareBracketClose => "`]`".to_string(),
            GraphQLTokenKind::SquareBracketOpen => "`[`".to_string(),
            GraphQLTokenKind::Name(name) => format!("name `{name}`"),
            GraphQLTokenKind::IntValue(raw) => {
                format!("integer `{raw}`")
            },
            GraphQLTokenKind::FloatValue(raw) => {
                format!("float `{raw}`")
            },
            GraphQLTokenKind::StringValue { .. } => {
                "string value".to_string()
            },
            GraphQLTokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A single lexed token with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphQLToken<'src> {
    pub kind: GraphQLTokenKind<'src>,
    pub span: GraphQLSourceSpan,
}
