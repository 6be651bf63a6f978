/// Source position information for lexing and parsing.
///
/// This is a pure data struct with no mutation methods. The lexer is
/// responsible for computing position values as it scans input.
///
/// # Indexing Convention
///
/// **All position values are 0-based:**
/// - `line`: 0 = first line of the document
/// - `col`: character count within the current line (0 = first column)
/// - `byte_offset`: byte offset within the whole document
///
/// Human-facing formatting (error display) adds 1 to line and column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SourcePosition {
    /// Line number (0-based: first line is 0)
    line: usize,

    /// Character count within the current line (0-based)
    col: usize,

    /// Byte offset from start of document (0-based)
    byte_offset: usize,
}

impl SourcePosition {
    /// Create a new SourcePosition.
    ///
    /// # Arguments
    /// - `line`: 0-based line number
    /// - `col`: 0-based character count within the current line
    /// - `byte_offset`: 0-based byte offset from document start
    pub fn new(line: usize, col: usize, byte_offset: usize) -> Self {
        Self {
            line,
            col,
            byte_offset,
        }
    }

    /// Returns the 0-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 0-based character count within the current line.
    ///
    /// This increments by 1 for each character regardless of its byte
    /// representation.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns the 0-based byte offset from document start.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }
}
