/*!
Line and column accounting for consumed source text.

Every form that consumes text advances the cursor through [`Position::after`],
so line and column numbers are always derived from the text actually consumed
and never set independently.

A line break is `\n`, `\r`, or the pair `\r\n`, which counts as a single
break.

# Examples

```
use form_grammar::lines::{advance, LineAdvance, Position};

assert_eq!(
    advance("win\r\ndoze"),
    LineAdvance { line_breaks: 1, last_line_length: 4 }
);

let end = Position::START.after("hot\ndog");
assert_eq!(end, Position { offset: 7, line: 1, column: 3 });
```
*/

use std::fmt;

use serde::Serialize;

/// The result of scanning a piece of text for line breaks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineAdvance {
    /// Number of line breaks in the text.
    pub line_breaks: usize,
    /// Number of characters after the last line break, or the length of the
    /// whole text if it contains no break.
    pub last_line_length: usize,
}

/// Scans `text` once, counting line breaks and the length of its last line.
///
/// Lengths are counted in `char`s.
///
/// # Examples
///
/// ```
/// # use form_grammar::lines::advance;
/// assert_eq!(advance("").line_breaks, 0);
/// assert_eq!(advance("a\rb\nc\r\nd").line_breaks, 3);
/// assert_eq!(advance("hotdog\n").last_line_length, 0);
/// ```
pub fn advance(text: &str) -> LineAdvance {
    let mut line_breaks = 0;
    let mut last_line_length = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                // `\r\n` is consumed as one break.
                chars.next_if_eq(&'\n');
                line_breaks += 1;
                last_line_length = 0;
            }
            '\n' => {
                line_breaks += 1;
                last_line_length = 0;
            }
            _ => last_line_length += 1,
        }
    }
    LineAdvance {
        line_breaks,
        last_line_length,
    }
}

/// A cursor position in a source string.
///
/// `offset` is a byte index into the source and always lies on a `char`
/// boundary. `line` and `column` are zero-based; columns count `char`s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    /// Byte offset into the source.
    pub offset: usize,
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based column within the line, in `char`s.
    pub column: usize,
}

impl Position {
    /// The beginning of any source.
    pub const START: Position = Position {
        offset: 0,
        line: 0,
        column: 0,
    };

    /// Returns the position reached after consuming `text` from `self`.
    pub fn after(self, text: &str) -> Position {
        let LineAdvance {
            line_breaks,
            last_line_length,
        } = advance(text);
        Position {
            offset: self.offset + text.len(),
            line: self.line + line_breaks,
            column: if line_breaks > 0 {
                last_line_length
            } else {
                self.column + last_line_length
            },
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
