//! Byte-scanning lexer for GraphQL source text.
//!
//! Produces a flat vector of [`GraphQLToken`]s. Whitespace, commas,
//! comments, and a leading byte-order mark are skipped as trivia.
//! Names and numeric literals borrow directly from the source text;
//! string literals own their content only when escape resolution or
//! block-string indentation stripping changed it.

use crate::GraphQLParseError;
use crate::GraphQLParseErrorKind;
use crate::GraphQLSourceSpan;
use crate::GraphQLToken;
use crate::GraphQLTokenKind;
use crate::SourcePosition;
use std::borrow::Cow;

pub(crate) struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    /// Byte offset of the next unconsumed byte.
    offset: usize,
    /// 0-based line of `offset`.
    line: usize,
    /// 0-based character column of `offset` within `line`.
    col: usize,
}

impl<'src> Lexer<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            offset: 0,
            line: 0,
            col: 0,
        }
    }

    /// Lexes the entire source, ending with an `Eof` token.
    pub(crate) fn tokenize(
        mut self,
    ) -> Result<Vec<GraphQLToken<'src>>, GraphQLParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == GraphQLTokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.col, self.offset)
    }

    fn span_from(&self, start: SourcePosition) -> GraphQLSourceSpan {
        GraphQLSourceSpan::new(start, self.position())
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    fn peek_at(&self, lookahead: usize) -> Option<u8> {
        self.bytes.get(self.offset + lookahead).copied()
    }

    /// Consumes one character, maintaining line/col bookkeeping.
    fn bump(&mut self) {
        match self.peek() {
            None => {},
            Some(b'\n') => {
                self.offset += 1;
                self.line += 1;
                self.col = 0;
            },
            Some(b'\r') => {
                self.offset += 1;
                // \r\n counts as a single line terminator.
                if self.peek() == Some(b'\n') {
                    self.offset += 1;
                }
                self.line += 1;
                self.col = 0;
            },
            Some(b) if b < 0x80 => {
                self.offset += 1;
                self.col += 1;
            },
            Some(_) => {
                // Multi-byte character: advance past the full scalar.
                let ch = self.source[self.offset..]
                    .chars()
                    .next()
                    .expect("offset is on a char boundary");
                self.offset += ch.len_utf8();
                self.col += 1;
            },
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b',') | Some(b'\n')
                | Some(b'\r') => self.bump(),
                Some(b'#') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' || b == b'\r' {
                            break;
                        }
                        self.bump();
                    }
                },
                // Byte-order mark (U+FEFF), encoded EF BB BF.
                Some(0xEF)
                    if self.peek_at(1) == Some(0xBB)
                        && self.peek_at(2) == Some(0xBF) =>
                {
                    self.bump();
                },
                _ => return,
            }
        }
    }

    fn next_token(
        &mut self,
    ) -> Result<GraphQLToken<'src>, GraphQLParseError> {
        self.skip_trivia();
        let start = self.position();

        let byte = match self.peek() {
            None => {
                return Ok(GraphQLToken {
                    kind: GraphQLTokenKind::Eof,
                    span: self.span_from(start),
                });
            },
            Some(b) => b,
        };

        let kind = match byte {
            b'&' => self.punctuator(GraphQLTokenKind::Ampersand),
            b'@' => self.punctuator(GraphQLTokenKind::At),
            b'!' => self.punctuator(GraphQLTokenKind::Bang),
            b':' => self.punctuator(GraphQLTokenKind::Colon),
            b'}' => self.punctuator(GraphQLTokenKind::CurlyBraceClose),
            b'{' => self.punctuator(GraphQLTokenKind::CurlyBraceOpen),
            b'$' => self.punctuator(GraphQLTokenKind::Dollar),
            b'=' => self.punctuator(GraphQLTokenKind::Equals),
            b')' => self.punctuator(GraphQLTokenKind::ParenClose),
            b'(' => self.punctuator(GraphQLTokenKind::ParenOpen),
            b'|' => self.punctuator(GraphQLTokenKind::Pipe),
            b']' => {
                self.punctuator(GraphQLTokenKind::SquareBracketClose)
            },
            b'[' => {
                self.punctuator(GraphQLTokenKind::SquareBracketOpen)
            },
            b'.' => {
                if self.peek_at(1) == Some(b'.')
                    && self.peek_at(2) == Some(b'.')
                {
                    self.bump();
                    self.bump();
                    self.bump();
                    GraphQLTokenKind::Ellipsis
                } else {
                    self.bump();
                    return Err(GraphQLParseError::new(
                        "Unexpected `.`; did you mean `...`?",
                        self.span_from(start),
                        GraphQLParseErrorKind::InvalidCharacter,
                    ));
                }
            },
            b'"' => return self.lex_string(start),
            b'-' | b'0'..=b'9' => return self.lex_number(start),
            b'_' | b'a'..=b'z' | b'A'..=b'Z' => self.lex_name(),
            other => {
                self.bump();
                return Err(GraphQLParseError::new(
                    format!(
                        "Unexpected character `{}`",
                        char::from(other.min(0x7F)),
                    ),
                    self.span_from(start),
                    GraphQLParseErrorKind::InvalidCharacter,
                ));
            },
        };

        Ok(GraphQLToken {
            kind,
            span: self.span_from(start),
        })
    }

    fn punctuator(
        &mut self,
        kind: GraphQLTokenKind<'src>,
    ) -> GraphQLTokenKind<'src> {
        self.bump();
        kind
    }

    fn lex_name(&mut self) -> GraphQLTokenKind<'src> {
        let start_offset = self.offset;
        while let Some(b) = self.peek() {
            match b {
                b'_' | b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => {
                    self.bump();
                },
                _ => break,
            }
        }
        let text = &self.source[start_offset..self.offset];
        GraphQLTokenKind::Name(Cow::Borrowed(text))
    }

    /// Lexes an `IntValue` or `FloatValue`, including an optional
    /// leading negative sign.
    fn lex_number(
        &mut self,
        start: SourcePosition,
    ) -> Result<GraphQLToken<'src>, GraphQLParseError> {
        let start_offset = self.offset;
        if self.peek() == Some(b'-') {
            self.bump();
        }

        // IntegerPart: 0, or a non-zero digit followed by digits.
        match self.peek() {
            Some(b'0') => {
                self.bump();
                if let Some(b'0'..=b'9') = self.peek() {
                    return Err(GraphQLParseError::new(
                        "Numeric literal cannot have a leading zero",
                        self.span_from(start),
                        GraphQLParseErrorKind::InvalidNumber,
                    ));
                }
            },
            Some(b'1'..=b'9') => {
                while let Some(b'0'..=b'9') = self.peek() {
                    self.bump();
                }
            },
            _ => {
                return Err(GraphQLParseError::new(
                    "Expected a digit after `-`",
                    self.span_from(start),
                    GraphQLParseErrorKind::InvalidNumber,
                ));
            },
        }

        let mut is_float = false;
        if self.peek() == Some(b'.') {
            is_float = true;
            self.bump();
            match self.peek() {
                Some(b'0'..=b'9') => {
                    while let Some(b'0'..=b'9') = self.peek() {
                        self.bump();
                    }
                },
                _ => {
                    return Err(GraphQLParseError::new(
                        "Expected a digit after `.` in float literal",
                        self.span_from(start),
                        GraphQLParseErrorKind::InvalidNumber,
                    ));
                },
            }
        }
        if let Some(b'e') | Some(b'E') = self.peek() {
            is_float = true;
            self.bump();
            if let Some(b'+') | Some(b'-') = self.peek() {
                self.bump();
            }
            match self.peek() {
                Some(b'0'..=b'9') => {
                    while let Some(b'0'..=b'9') = self.peek() {
                        self.bump();
                    }
                },
                _ => {
                    return Err(GraphQLParseError::new(
                        "Expected a digit in float exponent",
                        self.span_from(start),
                        GraphQLParseErrorKind::InvalidNumber,
                    ));
                },
            }
        }

        // A number must not run straight into a name (e.g. `123abc`).
        if let Some(b'_') | Some(b'a'..=b'z') | Some(b'A'..=b'Z') =
            self.peek()
        {
            return Err(GraphQLParseError::new(
                "Numeric literal must not be followed by a name character",
                self.span_from(start),
                GraphQLParseErrorKind::InvalidNumber,
            ));
        }

        let raw = Cow::Borrowed(&self.source[start_offset..self.offset]);
        let kind = if is_float {
            GraphQLTokenKind::FloatValue(raw)
        } else {
            GraphQLTokenKind::IntValue(raw)
        };
        Ok(GraphQLToken {
            kind,
            span: self.span_from(start),
        })
    }

    fn lex_string(
        &mut self,
        start: SourcePosition,
    ) -> Result<GraphQLToken<'src>, GraphQLParseError> {
        if self.peek_at(1) == Some(b'"') && self.peek_at(2) == Some(b'"')
        {
            return self.lex_block_string(start);
        }
        self.bump(); // opening quote

        let content_start = self.offset;
        let mut value: Option<String> = None;
        loop {
            match self.peek() {
                None | Some(b'\n') | Some(b'\r') => {
                    return Err(GraphQLParseError::new(
                        "Unterminated string literal",
                        self.span_from(start),
                        GraphQLParseErrorKind::UnterminatedString,
                    ));
                },
                Some(b'"') => {
                    let borrowed =
                        &self.source[content_start..self.offset];
                    self.bump(); // closing quote
                    let value = match value {
                        Some(owned) => Cow::Owned(owned),
                        None => Cow::Borrowed(borrowed),
                    };
                    return Ok(GraphQLToken {
                        kind: GraphQLTokenKind::StringValue {
                            value,
                            block: false,
                        },
                        span: self.span_from(start),
                    });
                },
                Some(b'\\') => {
                    let owned = value.get_or_insert_with(|| {
                        self.source[content_start..self.offset]
                            .to_string()
                    });
                    self.bump(); // backslash
                    let escaped = self.lex_escape(start)?;
                    owned.push(escaped);
                },
                Some(_) => {
                    let ch = self.source[self.offset..]
                        .chars()
                        .next()
                        .expect("offset is on a char boundary");
                    if let Some(owned) = value.as_mut() {
                        owned.push(ch);
                    }
                    self.bump();
                },
            }
        }
    }

    /// Resolves one escape sequence; called with the cursor on the
    /// character after the backslash.
    fn lex_escape(
        &mut self,
        start: SourcePosition,
    ) -> Result<char, GraphQLParseError> {
        let escaped = match self.peek() {
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\u{0008}',
            Some(b'f') => '\u{000C}',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => {
                self.bump(); // the `u`
                let mut code: u32 = 0;
                for _ in 0..4 {
                    let digit = match self.peek() {
                        Some(b) => {
                            char::from(b).to_digit(16)
                        },
                        None => None,
                    };
                    match digit {
                        Some(d) => {
                            code = code * 16 + d;
                            self.bump();
                        },
                        None => {
                            return Err(GraphQLParseError::new(
                                "Invalid `\\u` escape: expected four hex digits",
                                self.span_from(start),
                                GraphQLParseErrorKind::InvalidStringEscape,
                            ));
                        },
                    }
                }
                return char::from_u32(code).ok_or_else(|| {
                    GraphQLParseError::new(
                        "Invalid `\\u` escape: not a Unicode scalar value",
                        self.span_from(start),
                        GraphQLParseErrorKind::InvalidStringEscape,
                    )
                });
            },
            _ => {
                return Err(GraphQLParseError::new(
                    "Invalid escape sequence in string literal",
                    self.span_from(start),
                    GraphQLParseErrorKind::InvalidStringEscape,
                ));
            },
        };
        self.bump();
        Ok(escaped)
    }

    fn lex_block_string(
        &mut self,
        start: SourcePosition,
    ) -> Result<GraphQLToken<'src>, GraphQLParseError> {
        self.bump();
        self.bump();
        self.bump(); // opening `"""`

        let content_start = self.offset;
        loop {
            match self.peek() {
                None => {
                    return Err(GraphQLParseError::new(
                        "Unterminated block string literal",
                        self.span_from(start),
                        GraphQLParseErrorKind::UnterminatedString,
                    ));
                },
                Some(b'"')
                    if self.peek_at(1) == Some(b'"')
                        && self.peek_at(2) == Some(b'"') =>
                {
                    let raw = &self.source[content_start..self.offset];
                    self.bump();
                    self.bump();
                    self.bump(); // closing `"""`
                    let value = dedent_block_string(raw);
                    return Ok(GraphQLToken {
                        kind: GraphQLTokenKind::StringValue {
                            value: Cow::Owned(value),
                            block: true,
                        },
                        span: self.span_from(start),
                    });
                },
                Some(b'\\')
                    if self.peek_at(1) == Some(b'"')
                        && self.peek_at(2) == Some(b'"')
                        && self.peek_at(3) == Some(b'"') =>
                {
                    self.bump();
                    self.bump();
                    self.bump();
                    self.bump();
                },
                Some(_) => self.bump(),
            }
        }
    }
}

/// Strips common indentation and blank leading/trailing lines from raw
/// block-string content, per the spec's `BlockStringValue` algorithm.
fn dedent_block_string(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let escaped = normalized.replace("\\\"\"\"", "\"\"\"");
    let lines: Vec<&str> = escaped.split('\n').collect();

    let mut common_indent: Option<usize> = None;
    for line in lines.iter().skip(1) {
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent < line.len() {
            common_indent = Some(match common_indent {
                Some(current) => current.min(indent),
                None => indent,
            });
        }
    }

    let mut result: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                *line
            } else {
                let strip = common_indent.unwrap_or(0).min(line.len());
                &line[strip..]
            }
        })
        .collect();

    while result
        .first()
        .map(|line| line.trim().is_empty())
        .unwrap_or(false)
    {
        result.remove(0);
    }
    while result
        .last()
        .map(|line| line.trim().is_empty())
        .unwrap_or(false)
    {
        result.pop();
    }

    result.join("\n")
}
