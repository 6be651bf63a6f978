//! Recursive descent parser for GraphQL documents.
//!
//! This module provides [`GraphQLParser`], which parses executable
//! documents, type-system documents, and documents that mix both, into
//! the dynamic [`Node`] tree the traversal engine walks.
//!
//! The parser uses recursive descent over a pre-lexed token vector,
//! with a delimiter stack so an unclosed `{`/`(`/`[` is reported at
//! the position where it was opened, and a recursion-depth guard
//! against pathologically nested values, selection sets, and type
//! annotations.

use crate::ast::Node;
use crate::ast::NodeKind;
use crate::lexer::Lexer;
use crate::GraphQLParseError;
use crate::GraphQLParseErrorKind;
use crate::GraphQLSourceSpan;
use crate::GraphQLToken;
use crate::GraphQLTokenKind;
use crate::SourcePosition;
use smallvec::SmallVec;
use std::rc::Rc;

/// Most GraphQL documents nest fewer than 8 delimiters deep.
type DelimiterStack = SmallVec<[OpenDelimiter; 8]>;

/// Maximum nesting depth for recursive constructs.
const MAX_RECURSION_DEPTH: usize = 128;

/// Tracks an open delimiter for unclosed-delimiter reporting.
struct OpenDelimiter {
    /// Where the delimiter was opened.
    span: GraphQLSourceSpan,
    delimiter: char,
    /// Human-readable construct description for the error message.
    construct: &'static str,
}

/// A recursive descent parser for GraphQL documents.
///
/// # Usage
///
/// ```rust,ignore
/// use libgraphql_visit::GraphQLParser;
///
/// let doc = GraphQLParser::new("{ hello }").parse_document()?;
/// assert_eq!(doc.kind_str(), "Document");
/// ```
pub struct GraphQLParser<'src> {
    source: &'src str,

    /// Whether parsed nodes carry source spans. Disabled by
    /// [`omit_locations`](GraphQLParser::omit_locations).
    include_locations: bool,
}

impl<'src> GraphQLParser<'src> {
    /// Creates a new parser over a source string.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            include_locations: true,
        }
    }

    /// Disables source-span attachment on parsed nodes.
    pub fn omit_locations(mut self) -> Self {
        self.include_locations = false;
        self
    }

    /// Parses a complete document (executable definitions,
    /// type-system definitions, or a mix).
    pub fn parse_document(
        self,
    ) -> Result<Rc<Node>, GraphQLParseError> {
        let tokens = Lexer::new(self.source).tokenize()?;
        let mut state = ParserState {
            tokens,
            index: 0,
            include_locations: self.include_locations,
            last_end: SourcePosition::new(0, 0, 0),
            delimiter_stack: DelimiterStack::new(),
            recursion_depth: 0,
        };
        state.parse_document().map(Rc::new)
    }
}

struct ParserState<'src> {
    tokens: Vec<GraphQLToken<'src>>,
    index: usize,
    include_locations: bool,
    /// End position of the most recently consumed token; anchors node
    /// spans and EOF errors.
    last_end: SourcePosition,
    delimiter_stack: DelimiterStack,
    recursion_depth: usize,
}

impl<'src> ParserState<'src> {
    // =========================================================================
    // Token plumbing
    // =========================================================================

    fn peek(&self) -> &GraphQLToken<'src> {
        &self.tokens[self.index]
    }

    fn peek_is(&self, kind: &GraphQLTokenKind<'_>) -> bool {
        &self.peek().kind == kind
    }

    fn peek_is_keyword(&self, keyword: &str) -> bool {
        matches!(
            &self.peek().kind,
            GraphQLTokenKind::Name(name) if name.as_ref() == keyword
        )
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == GraphQLTokenKind::Eof
    }

    fn next(&mut self) -> GraphQLToken<'src> {
        let token = self.tokens[self.index].clone();
        if token.kind != GraphQLTokenKind::Eof {
            self.index += 1;
            self.last_end = token.span.end_exclusive;
        }
        token
    }

    fn start_position(&self) -> SourcePosition {
        self.peek().span.start_inclusive
    }

    /// Finishes a node started at `start`, attaching its span when
    /// locations are enabled.
    fn finish(&self, node: Node, start: SourcePosition) -> Node {
        if self.include_locations {
            node.at(GraphQLSourceSpan::new(start, self.last_end))
        } else {
            node
        }
    }

    fn expect(
        &mut self,
        kind: &GraphQLTokenKind<'_>,
        context: &str,
    ) -> Result<GraphQLToken<'src>, GraphQLParseError> {
        if self.peek_is(kind) {
            Ok(self.next())
        } else if self.is_at_end() {
            Err(self.eof_error())
        } else {
            let found = self.peek();
            Err(GraphQLParseError::new(
                format!(
                    "Expected {} {context}, found {}",
                    kind.description(),
                    found.kind.description(),
                ),
                found.span,
                GraphQLParseErrorKind::UnexpectedToken,
            ))
        }
    }

    fn expect_name(
        &mut self,
        context: &str,
    ) -> Result<(String, GraphQLSourceSpan), GraphQLParseError> {
        let name = match &self.peek().kind {
            GraphQLTokenKind::Name(name) => Some(name.to_string()),
            _ => None,
        };
        if let Some(name) = name {
            let span = self.next().span;
            return Ok((name, span));
        }
        if self.is_at_end() {
            return Err(self.eof_error());
        }
        let context = if context.is_empty() {
            String::new()
        } else {
            format!(" {context}")
        };
        Err(GraphQLParseError::new(
            format!(
                "Expected a name{context}, found {}",
                self.peek().kind.description(),
            ),
            self.peek().span,
            GraphQLParseErrorKind::UnexpectedToken,
        ))
    }

    fn expect_keyword(
        &mut self,
        keyword: &str,
    ) -> Result<(), GraphQLParseError> {
        if self.peek_is_keyword(keyword) {
            self.next();
            Ok(())
        } else if self.is_at_end() {
            Err(self.eof_error())
        } else {
            Err(GraphQLParseError::new(
                format!(
                    "Expected `{keyword}`, found {}",
                    self.peek().kind.description(),
                ),
                self.peek().span,
                GraphQLParseErrorKind::UnexpectedToken,
            ))
        }
    }

    /// Builds the right error for running out of input: if a delimiter
    /// is still open, report it unclosed at its opening position.
    fn eof_error(&self) -> GraphQLParseError {
        if let Some(open) = self.delimiter_stack.last() {
            return GraphQLParseError::new(
                format!(
                    "Unclosed `{}` in {}",
                    open.delimiter, open.construct,
                ),
                open.span,
                GraphQLParseErrorKind::UnclosedDelimiter {
                    delimiter: open.delimiter,
                },
            );
        }
        GraphQLParseError::new(
            "Unexpected end of input",
            self.peek().span,
            GraphQLParseErrorKind::UnexpectedEof,
        )
    }

    fn push_delimiter(
        &mut self,
        span: GraphQLSourceSpan,
        delimiter: char,
        construct: &'static str,
    ) {
        self.delimiter_stack.push(OpenDelimiter {
            span,
            delimiter,
            construct,
        });
    }

    fn pop_delimiter(&mut self) {
        self.delimiter_stack.pop();
    }

    fn enter_recursion(&mut self) -> Result<(), GraphQLParseError> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            return Err(GraphQLParseError::new(
                "Document nesting exceeds the parser's depth limit",
                self.peek().span,
                GraphQLParseErrorKind::NestingTooDeep,
            ));
        }
        Ok(())
    }

    fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    // =========================================================================
    // Document & definitions
    // =========================================================================

    fn parse_document(&mut self) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let mut definitions = Vec::new();
        while !self.is_at_end() {
            definitions.push(Rc::new(self.parse_definition()?));
        }
        if definitions.is_empty() {
            return Err(GraphQLParseError::new(
                "Document contains no definitions",
                self.peek().span,
                GraphQLParseErrorKind::UnexpectedEof,
            ));
        }
        Ok(self.finish(
            Node::new(NodeKind::Document).set("definitions", definitions),
            start,
        ))
    }

    fn parse_definition(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            return self.parse_shorthand_operation();
        }
        if let GraphQLTokenKind::StringValue { .. } = self.peek().kind
        {
            // A description can only precede a type-system definition.
            return self.parse_type_system_definition();
        }
        let keyword = match &self.peek().kind {
            GraphQLTokenKind::Name(name) => Some(name.to_string()),
            _ => None,
        };
        if let Some(keyword) = keyword {
            return match keyword.as_str() {
                "query" | "mutation" | "subscription" => {
                    self.parse_operation_definition()
                },
                "fragment" => self.parse_fragment_definition(),
                "schema" | "scalar" | "type" | "interface"
                | "union" | "enum" | "input" | "directive" => {
                    self.parse_type_system_definition()
                },
                other => Err(GraphQLParseError::new(
                    format!(
                        "`{other}` does not begin a definition",
                    ),
                    self.peek().span,
                    GraphQLParseErrorKind::UnexpectedToken,
                )),
            };
        }
        Err(GraphQLParseError::new(
            format!(
                "Expected a definition, found {}",
                self.peek().kind.description(),
            ),
            self.peek().span,
            GraphQLParseErrorKind::UnexpectedToken,
        ))
    }

    /// Parses a shorthand query: a bare selection set.
    fn parse_shorthand_operation(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let selection_set = self.parse_selection_set()?;
        Ok(self.finish(
            Node::new(NodeKind::OperationDefinition)
                .set("operation", "query")
                .set("selectionSet", selection_set),
            start,
        ))
    }

    fn parse_operation_definition(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let (operation, _) =
            self.expect_name("to begin an operation")?;

        let mut node = Node::new(NodeKind::OperationDefinition)
            .set("operation", operation.as_str());

        if let GraphQLTokenKind::Name(_) = self.peek().kind {
            node = node.set("name", self.parse_name()?);
        }
        if self.peek_is(&GraphQLTokenKind::ParenOpen) {
            node = node.set(
                "variableDefinitions",
                self.parse_variable_definitions()?,
            );
        }
        let directives = self.parse_directives(false)?;
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        node = node.set("selectionSet", self.parse_selection_set()?);
        Ok(self.finish(node, start))
    }

    fn parse_fragment_definition(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        self.expect_keyword("fragment")?;
        let name = self.parse_name()?;
        if name.string_scalar("value") == Some("on") {
            return Err(GraphQLParseError::new(
                "Fragment name cannot be `on`",
                self.peek().span,
                GraphQLParseErrorKind::UnexpectedToken,
            ));
        }
        self.expect_keyword("on")?;
        let type_condition = self.parse_named_type()?;
        let directives = self.parse_directives(false)?;
        let selection_set = self.parse_selection_set()?;

        let mut node = Node::new(NodeKind::FragmentDefinition)
            .set("name", name)
            .set("typeCondition", type_condition);
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        node = node.set("selectionSet", selection_set);
        Ok(self.finish(node, start))
    }

    // =========================================================================
    // Selections
    // =========================================================================

    fn parse_selection_set(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        self.enter_recursion()?;
        let result = self.parse_selection_set_impl();
        self.exit_recursion();
        result
    }

    fn parse_selection_set_impl(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let open = self.expect(
            &GraphQLTokenKind::CurlyBraceOpen,
            "to begin a selection set",
        )?;
        self.push_delimiter(open.span, '{', "selection set");

        if self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            return Err(GraphQLParseError::new(
                "Selection set cannot be empty",
                open.span,
                GraphQLParseErrorKind::InvalidEmptyConstruct {
                    construct: "selection set",
                },
            ));
        }

        let mut selections = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            if self.is_at_end() {
                return Err(self.eof_error());
            }
            selections.push(Rc::new(self.parse_selection()?));
        }
        self.next(); // closing `}`
        self.pop_delimiter();

        Ok(self.finish(
            Node::new(NodeKind::SelectionSet)
                .set("selections", selections),
            start,
        ))
    }

    /// Parses a single selection (field, fragment spread, or inline
    /// fragment).
    fn parse_selection(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        if self.peek_is(&GraphQLTokenKind::Ellipsis) {
            let start = self.start_position();
            self.next(); // `...`
            if self.peek_is_keyword("on")
                || self.peek_is(&GraphQLTokenKind::At)
                || self.peek_is(&GraphQLTokenKind::CurlyBraceOpen)
            {
                self.parse_inline_fragment(start)
            } else {
                self.parse_fragment_spread(start)
            }
        } else {
            self.parse_field()
        }
    }

    /// Parses a field:
    /// `alias: name(args) @directives { selections }`
    fn parse_field(&mut self) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let first = self.parse_name()?;

        let (alias, name) =
            if self.peek_is(&GraphQLTokenKind::Colon) {
                self.next();
                (Some(first), self.parse_name()?)
            } else {
                (None, first)
            };

        let mut node = Node::new(NodeKind::Field);
        if let Some(alias) = alias {
            node = node.set("alias", alias);
        }
        node = node.set("name", name);

        if self.peek_is(&GraphQLTokenKind::ParenOpen) {
            node = node
                .set("arguments", self.parse_arguments(false)?);
        }
        let directives = self.parse_directives(false)?;
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            node = node
                .set("selectionSet", self.parse_selection_set()?);
        }
        Ok(self.finish(node, start))
    }

    /// Parses a fragment spread after its `...`:
    /// `...FragmentName @directives`
    fn parse_fragment_spread(
        &mut self,
        start: SourcePosition,
    ) -> Result<Node, GraphQLParseError> {
        let name = self.parse_name()?;
        let directives = self.parse_directives(false)?;
        let mut node =
            Node::new(NodeKind::FragmentSpread).set("name", name);
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        Ok(self.finish(node, start))
    }

    /// Parses an inline fragment after its `...`:
    /// `... on Type @directives { selections }`
    fn parse_inline_fragment(
        &mut self,
        start: SourcePosition,
    ) -> Result<Node, GraphQLParseError> {
        let mut node = Node::new(NodeKind::InlineFragment);
        if self.peek_is_keyword("on") {
            self.next();
            node = node
                .set("typeCondition", self.parse_named_type()?);
        }
        let directives = self.parse_directives(false)?;
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        node = node.set("selectionSet", self.parse_selection_set()?);
        Ok(self.finish(node, start))
    }

    // =========================================================================
    // Arguments, directives, variables
    // =========================================================================

    fn parse_arguments(
        &mut self,
        constant: bool,
    ) -> Result<Vec<Rc<Node>>, GraphQLParseError> {
        let open = self.expect(
            &GraphQLTokenKind::ParenOpen,
            "to begin arguments",
        )?;
        self.push_delimiter(open.span, '(', "arguments");

        if self.peek_is(&GraphQLTokenKind::ParenClose) {
            return Err(GraphQLParseError::new(
                "Argument list cannot be empty",
                open.span,
                GraphQLParseErrorKind::InvalidEmptyConstruct {
                    construct: "argument list",
                },
            ));
        }

        let mut arguments = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::ParenClose) {
            if self.is_at_end() {
                return Err(self.eof_error());
            }
            let start = self.start_position();
            let name = self.parse_name()?;
            self.expect(
                &GraphQLTokenKind::Colon,
                "after argument name",
            )?;
            let value = self.parse_value(constant)?;
            arguments.push(Rc::new(
                self.finish(
                    Node::new(NodeKind::Argument)
                        .set("name", name)
                        .set("value", value),
                    start,
                ),
            ));
        }
        self.next(); // closing `)`
        self.pop_delimiter();
        Ok(arguments)
    }

    fn parse_directives(
        &mut self,
        constant: bool,
    ) -> Result<Vec<Rc<Node>>, GraphQLParseError> {
        let mut directives = Vec::new();
        while self.peek_is(&GraphQLTokenKind::At) {
            let start = self.start_position();
            self.next(); // `@`
            let name = self.parse_name()?;
            let mut node =
                Node::new(NodeKind::Directive).set("name", name);
            if self.peek_is(&GraphQLTokenKind::ParenOpen) {
                node = node.set(
                    "arguments",
                    self.parse_arguments(constant)?,
                );
            }
            directives.push(Rc::new(self.finish(node, start)));
        }
        Ok(directives)
    }

    fn parse_variable_definitions(
        &mut self,
    ) -> Result<Vec<Rc<Node>>, GraphQLParseError> {
        let open = self.expect(
            &GraphQLTokenKind::ParenOpen,
            "to begin variable definitions",
        )?;
        self.push_delimiter(open.span, '(', "variable definitions");

        let mut definitions = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::ParenClose) {
            if self.is_at_end() {
                return Err(self.eof_error());
            }
            definitions
                .push(Rc::new(self.parse_variable_definition()?));
        }
        self.next(); // closing `)`
        self.pop_delimiter();
        Ok(definitions)
    }

    fn parse_variable_definition(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let variable = self.parse_variable()?;
        self.expect(
            &GraphQLTokenKind::Colon,
            "after variable name",
        )?;
        let annotation = self.parse_type_annotation()?;

        let mut node = Node::new(NodeKind::VariableDefinition)
            .set("variable", variable)
            .set("type", annotation);
        if self.peek_is(&GraphQLTokenKind::Equals) {
            self.next();
            node = node.set("defaultValue", self.parse_value(true)?);
        }
        let directives = self.parse_directives(true)?;
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        Ok(self.finish(node, start))
    }

    fn parse_variable(&mut self) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        self.expect(
            &GraphQLTokenKind::Dollar,
            "to begin a variable",
        )?;
        let name = self.parse_name()?;
        Ok(self.finish(
            Node::new(NodeKind::Variable).set("name", name),
            start,
        ))
    }

    // =========================================================================
    // Values
    // =========================================================================

    fn parse_value(
        &mut self,
        constant: bool,
    ) -> Result<Node, GraphQLParseError> {
        self.enter_recursion()?;
        let result = self.parse_value_impl(constant);
        self.exit_recursion();
        result
    }

    fn parse_value_impl(
        &mut self,
        constant: bool,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let span = self.peek().span;
        match self.peek().kind.clone() {
            GraphQLTokenKind::Dollar => {
                if constant {
                    return Err(GraphQLParseError::new(
                        "Variables are not allowed in this position",
                        span,
                        GraphQLParseErrorKind::UnexpectedToken,
                    ));
                }
                self.parse_variable()
            },
            GraphQLTokenKind::IntValue(raw) => {
                self.next();
                let value: i32 =
                    raw.parse().map_err(|_| {
                        GraphQLParseError::new(
                            format!(
                                "Integer `{raw}` does not fit in 32 bits",
                            ),
                            span,
                            GraphQLParseErrorKind::InvalidNumber,
                        )
                    })?;
                Ok(self.finish(
                    Node::new(NodeKind::IntValue)
                        .set("value", value),
                    start,
                ))
            },
            GraphQLTokenKind::FloatValue(raw) => {
                self.next();
                let value: f64 =
                    raw.parse().map_err(|_| {
                        GraphQLParseError::new(
                            format!("Invalid float `{raw}`"),
                            span,
                            GraphQLParseErrorKind::InvalidNumber,
                        )
                    })?;
                Ok(self.finish(
                    Node::new(NodeKind::FloatValue)
                        .set("value", value),
                    start,
                ))
            },
            GraphQLTokenKind::StringValue { value, block } => {
                self.next();
                Ok(self.finish(
                    Node::new(NodeKind::StringValue)
                        .set("value", value.as_ref())
                        .set("block", block),
                    start,
                ))
            },
            GraphQLTokenKind::Name(name) => {
                self.next();
                let node = match name.as_ref() {
                    "true" => Node::new(NodeKind::BooleanValue)
                        .set("value", true),
                    "false" => Node::new(NodeKind::BooleanValue)
                        .set("value", false),
                    "null" => Node::new(NodeKind::NullValue),
                    other => Node::new(NodeKind::EnumValue)
                        .set("value", other),
                };
                Ok(self.finish(node, start))
            },
            GraphQLTokenKind::SquareBracketOpen => {
                let open = self.next();
                self.push_delimiter(open.span, '[', "list value");
                let mut values = Vec::new();
                while !self
                    .peek_is(&GraphQLTokenKind::SquareBracketClose)
                {
                    if self.is_at_end() {
                        return Err(self.eof_error());
                    }
                    values
                        .push(Rc::new(self.parse_value(constant)?));
                }
                self.next(); // closing `]`
                self.pop_delimiter();
                Ok(self.finish(
                    Node::new(NodeKind::ListValue)
                        .set("values", values),
                    start,
                ))
            },
            GraphQLTokenKind::CurlyBraceOpen => {
                let open = self.next();
                self.push_delimiter(open.span, '{', "object value");
                let mut fields = Vec::new();
                while !self
                    .peek_is(&GraphQLTokenKind::CurlyBraceClose)
                {
                    if self.is_at_end() {
                        return Err(self.eof_error());
                    }
                    let field_start = self.start_position();
                    let name = self.parse_name()?;
                    self.expect(
                        &GraphQLTokenKind::Colon,
                        "after object field name",
                    )?;
                    let value = self.parse_value(constant)?;
                    fields.push(Rc::new(
                        self.finish(
                            Node::new(NodeKind::ObjectField)
                                .set("name", name)
                                .set("value", value),
                            field_start,
                        ),
                    ));
                }
                self.next(); // closing `}`
                self.pop_delimiter();
                Ok(self.finish(
                    Node::new(NodeKind::ObjectValue)
                        .set("fields", fields),
                    start,
                ))
            },
            GraphQLTokenKind::Eof => Err(self.eof_error()),
            other => Err(GraphQLParseError::new(
                format!(
                    "Expected a value, found {}",
                    other.description(),
                ),
                span,
                GraphQLParseErrorKind::UnexpectedToken,
            )),
        }
    }

    // =========================================================================
    // Names & type annotations
    // =========================================================================

    fn parse_name(&mut self) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let (name, _) = self.expect_name("")?;
        Ok(self.finish(Node::name(&name), start))
    }

    fn parse_named_type(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let name = self.parse_name()?;
        Ok(self.finish(
            Node::new(NodeKind::NamedType).set("name", name),
            start,
        ))
    }

    /// Parses a type annotation: `Name`, `[Inner]`, each optionally
    /// followed by `!`.
    fn parse_type_annotation(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        self.enter_recursion()?;
        let result = self.parse_type_annotation_impl();
        self.exit_recursion();
        result
    }

    fn parse_type_annotation_impl(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let inner = if self
            .peek_is(&GraphQLTokenKind::SquareBracketOpen)
        {
            let open = self.next();
            self.push_delimiter(open.span, '[', "list type");
            let item = self.parse_type_annotation()?;
            self.expect(
                &GraphQLTokenKind::SquareBracketClose,
                "to close a list type",
            )?;
            self.pop_delimiter();
            self.finish(
                Node::new(NodeKind::ListType).set("type", item),
                start,
            )
        } else {
            self.parse_named_type()?
        };

        if self.peek_is(&GraphQLTokenKind::Bang) {
            self.next();
            Ok(self.finish(
                Node::new(NodeKind::NonNullType).set("type", inner),
                start,
            ))
        } else {
            Ok(inner)
        }
    }

    // =========================================================================
    // Type-system definitions
    // =========================================================================

    fn parse_type_system_definition(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        let description = self.parse_optional_description()?;
        let keyword = match &self.peek().kind {
            GraphQLTokenKind::Name(name) => name.to_string(),
            _ => {
                return Err(GraphQLParseError::new(
                    format!(
                        "Expected a type-system definition, found {}",
                        self.peek().kind.description(),
                    ),
                    self.peek().span,
                    GraphQLParseErrorKind::UnexpectedToken,
                ));
            },
        };
        match keyword.as_str() {
            "schema" => self.parse_schema_definition(description),
            "scalar" => {
                self.parse_scalar_type_definition(description)
            },
            "type" => self.parse_object_type_definition(
                description,
                NodeKind::ObjectTypeDefinition,
            ),
            "interface" => self.parse_object_type_definition(
                description,
                NodeKind::InterfaceTypeDefinition,
            ),
            "union" => self.parse_union_type_definition(description),
            "enum" => self.parse_enum_type_definition(description),
            "input" => {
                self.parse_input_object_type_definition(description)
            },
            "directive" => {
                self.parse_directive_definition(description)
            },
            other => Err(GraphQLParseError::new(
                format!(
                    "`{other}` does not begin a type-system definition",
                ),
                self.peek().span,
                GraphQLParseErrorKind::UnexpectedToken,
            )),
        }
    }

    /// Parses an optional leading description string.
    fn parse_optional_description(
        &mut self,
    ) -> Result<Option<Node>, GraphQLParseError> {
        let start = self.start_position();
        if let GraphQLTokenKind::StringValue { value, block } =
            self.peek().kind.clone()
        {
            self.next();
            Ok(Some(self.finish(
                Node::new(NodeKind::StringValue)
                    .set("value", value.as_ref())
                    .set("block", block),
                start,
            )))
        } else {
            Ok(None)
        }
    }

    fn parse_schema_definition(
        &mut self,
        description: Option<Node>,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        self.expect_keyword("schema")?;
        let directives = self.parse_directives(true)?;

        let open = self.expect(
            &GraphQLTokenKind::CurlyBraceOpen,
            "to begin a schema definition",
        )?;
        self.push_delimiter(open.span, '{', "schema definition");
        let mut operation_types = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            if self.is_at_end() {
                return Err(self.eof_error());
            }
            let entry_start = self.start_position();
            let (operation, operation_span) =
                self.expect_name("for a root operation type")?;
            if !matches!(
                operation.as_str(),
                "query" | "mutation" | "subscription",
            ) {
                return Err(GraphQLParseError::new(
                    format!(
                        "`{operation}` is not an operation type",
                    ),
                    operation_span,
                    GraphQLParseErrorKind::UnexpectedToken,
                ));
            }
            self.expect(
                &GraphQLTokenKind::Colon,
                "after the operation type",
            )?;
            let named = self.parse_named_type()?;
            operation_types.push(Rc::new(
                self.finish(
                    Node::new(NodeKind::OperationTypeDefinition)
                        .set("operation", operation.as_str())
                        .set("type", named),
                    entry_start,
                ),
            ));
        }
        self.next(); // closing `}`
        self.pop_delimiter();

        let mut node = Node::new(NodeKind::SchemaDefinition);
        if let Some(description) = description {
            node = node.set("description", description);
        }
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        node = node.set("operationTypes", operation_types);
        Ok(self.finish(node, start))
    }

    fn parse_scalar_type_definition(
        &mut self,
        description: Option<Node>,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        self.expect_keyword("scalar")?;
        let name = self.parse_name()?;
        let directives = self.parse_directives(true)?;

        let mut node = Node::new(NodeKind::ScalarTypeDefinition);
        if let Some(description) = description {
            node = node.set("description", description);
        }
        node = node.set("name", name);
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        Ok(self.finish(node, start))
    }

    /// Parses `type Name ...` / `interface Name ...` — the two share
    /// a grammar apart from the keyword.
    fn parse_object_type_definition(
        &mut self,
        description: Option<Node>,
        kind: NodeKind,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        self.next(); // `type` / `interface` keyword
        let name = self.parse_name()?;

        let mut interfaces = Vec::new();
        if self.peek_is_keyword("implements") {
            self.next();
            if self.peek_is(&GraphQLTokenKind::Ampersand) {
                self.next();
            }
            interfaces.push(Rc::new(self.parse_named_type()?));
            while self.peek_is(&GraphQLTokenKind::Ampersand) {
                self.next();
                interfaces.push(Rc::new(self.parse_named_type()?));
            }
        }

        let directives = self.parse_directives(true)?;
        let fields = if self
            .peek_is(&GraphQLTokenKind::CurlyBraceOpen)
        {
            self.parse_fields_definition()?
        } else {
            Vec::new()
        };

        let mut node = Node::new(kind);
        if let Some(description) = description {
            node = node.set("description", description);
        }
        node = node.set("name", name);
        if !interfaces.is_empty() {
            node = node.set("interfaces", interfaces);
        }
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        if !fields.is_empty() {
            node = node.set("fields", fields);
        }
        Ok(self.finish(node, start))
    }

    fn parse_fields_definition(
        &mut self,
    ) -> Result<Vec<Rc<Node>>, GraphQLParseError> {
        let open = self.expect(
            &GraphQLTokenKind::CurlyBraceOpen,
            "to begin a fields definition",
        )?;
        self.push_delimiter(open.span, '{', "fields definition");
        let mut fields = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            if self.is_at_end() {
                return Err(self.eof_error());
            }
            fields.push(Rc::new(self.parse_field_definition()?));
        }
        self.next(); // closing `}`
        self.pop_delimiter();
        Ok(fields)
    }

    /// Parses `description? name(args): Type @directives`.
    fn parse_field_definition(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let description = self.parse_optional_description()?;
        let name = self.parse_name()?;
        let arguments = if self
            .peek_is(&GraphQLTokenKind::ParenOpen)
        {
            self.parse_argument_definitions()?
        } else {
            Vec::new()
        };
        self.expect(
            &GraphQLTokenKind::Colon,
            "after the field name",
        )?;
        let annotation = self.parse_type_annotation()?;
        let directives = self.parse_directives(true)?;

        let mut node = Node::new(NodeKind::FieldDefinition);
        if let Some(description) = description {
            node = node.set("description", description);
        }
        node = node.set("name", name);
        if !arguments.is_empty() {
            node = node.set("arguments", arguments);
        }
        node = node.set("type", annotation);
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        Ok(self.finish(node, start))
    }

    fn parse_argument_definitions(
        &mut self,
    ) -> Result<Vec<Rc<Node>>, GraphQLParseError> {
        let open = self.expect(
            &GraphQLTokenKind::ParenOpen,
            "to begin argument definitions",
        )?;
        self.push_delimiter(open.span, '(', "argument definitions");
        let mut arguments = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::ParenClose) {
            if self.is_at_end() {
                return Err(self.eof_error());
            }
            arguments
                .push(Rc::new(self.parse_input_value_definition()?));
        }
        self.next(); // closing `)`
        self.pop_delimiter();
        Ok(arguments)
    }

    /// Parses `description? name: Type = default @directives`.
    fn parse_input_value_definition(
        &mut self,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        let description = self.parse_optional_description()?;
        let name = self.parse_name()?;
        self.expect(
            &GraphQLTokenKind::Colon,
            "after the input value name",
        )?;
        let annotation = self.parse_type_annotation()?;

        let mut node = Node::new(NodeKind::InputValueDefinition);
        if let Some(description) = description {
            node = node.set("description", description);
        }
        node = node.set("name", name).set("type", annotation);
        if self.peek_is(&GraphQLTokenKind::Equals) {
            self.next();
            node = node.set("defaultValue", self.parse_value(true)?);
        }
        let directives = self.parse_directives(true)?;
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        Ok(self.finish(node, start))
    }

    fn parse_union_type_definition(
        &mut self,
        description: Option<Node>,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        self.expect_keyword("union")?;
        let name = self.parse_name()?;
        let directives = self.parse_directives(true)?;

        let mut members = Vec::new();
        if self.peek_is(&GraphQLTokenKind::Equals) {
            self.next();
            if self.peek_is(&GraphQLTokenKind::Pipe) {
                self.next();
            }
            members.push(Rc::new(self.parse_named_type()?));
            while self.peek_is(&GraphQLTokenKind::Pipe) {
                self.next();
                members.push(Rc::new(self.parse_named_type()?));
            }
        }

        let mut node = Node::new(NodeKind::UnionTypeDefinition);
        if let Some(description) = description {
            node = node.set("description", description);
        }
        node = node.set("name", name);
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        if !members.is_empty() {
            node = node.set("types", members);
        }
        Ok(self.finish(node, start))
    }

    fn parse_enum_type_definition(
        &mut self,
        description: Option<Node>,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        self.expect_keyword("enum")?;
        let name = self.parse_name()?;
        let directives = self.parse_directives(true)?;

        let mut values = Vec::new();
        if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            let open = self.next();
            self.push_delimiter(open.span, '{', "enum definition");
            while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose)
            {
                if self.is_at_end() {
                    return Err(self.eof_error());
                }
                let value_start = self.start_position();
                let value_description =
                    self.parse_optional_description()?;
                let value_name = self.parse_name()?;
                let value_directives = self.parse_directives(true)?;
                let mut value =
                    Node::new(NodeKind::EnumValueDefinition);
                if let Some(value_description) = value_description {
                    value =
                        value.set("description", value_description);
                }
                value = value.set("name", value_name);
                if !value_directives.is_empty() {
                    value =
                        value.set("directives", value_directives);
                }
                values
                    .push(Rc::new(self.finish(value, value_start)));
            }
            self.next(); // closing `}`
            self.pop_delimiter();
        }

        let mut node = Node::new(NodeKind::EnumTypeDefinition);
        if let Some(description) = description {
            node = node.set("description", description);
        }
        node = node.set("name", name);
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        if !values.is_empty() {
            node = node.set("values", values);
        }
        Ok(self.finish(node, start))
    }

    fn parse_input_object_type_definition(
        &mut self,
        description: Option<Node>,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        self.expect_keyword("input")?;
        let name = self.parse_name()?;
        let directives = self.parse_directives(true)?;

        let mut fields = Vec::new();
        if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            let open = self.next();
            self.push_delimiter(
                open.span,
                '{',
                "input object definition",
            );
            while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose)
            {
                if self.is_at_end() {
                    return Err(self.eof_error());
                }
                fields.push(Rc::new(
                    self.parse_input_value_definition()?,
                ));
            }
            self.next(); // closing `}`
            self.pop_delimiter();
        }

        let mut node =
            Node::new(NodeKind::InputObjectTypeDefinition);
        if let Some(description) = description {
            node = node.set("description", description);
        }
        node = node.set("name", name);
        if !directives.is_empty() {
            node = node.set("directives", directives);
        }
        if !fields.is_empty() {
            node = node.set("fields", fields);
        }
        Ok(self.finish(node, start))
    }

    /// Parses `directive @name(args) repeatable? on LOC | LOC`.
    fn parse_directive_definition(
        &mut self,
        description: Option<Node>,
    ) -> Result<Node, GraphQLParseError> {
        let start = self.start_position();
        self.expect_keyword("directive")?;
        self.expect(
            &GraphQLTokenKind::At,
            "after the `directive` keyword",
        )?;
        let name = self.parse_name()?;
        let arguments = if self
            .peek_is(&GraphQLTokenKind::ParenOpen)
        {
            self.parse_argument_definitions()?
        } else {
            Vec::new()
        };
        let repeatable = if self.peek_is_keyword("repeatable") {
            self.next();
            true
        } else {
            false
        };
        self.expect_keyword("on")?;

        let mut locations = Vec::new();
        if self.peek_is(&GraphQLTokenKind::Pipe) {
            self.next();
        }
        locations.push(Rc::new(self.parse_name()?));
        while self.peek_is(&GraphQLTokenKind::Pipe) {
            self.next();
            locations.push(Rc::new(self.parse_name()?));
        }

        let mut node = Node::new(NodeKind::DirectiveDefinition);
        if let Some(description) = description {
            node = node.set("description", description);
        }
        node = node.set("name", name);
        if !arguments.is_empty() {
            node = node.set("arguments", arguments);
        }
        node = node.set("repeatable", repeatable);
        node = node.set("locations", locations);
        Ok(self.finish(node, start))
    }
}
