//! Source positions and byte offset conversion
//!
//! Template positions are 0-based line and column pairs. Generated scripts are
//! lexed with byte spans, which [`SourceLocation`] maps back to positions for error
//! reporting.

use serde::Serialize;
use std::fmt;

/// A position in source text (line and column, both 0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets of a text back to positions
pub struct SourceLocation {
    /// Offset of the first byte of every line
    line_offsets: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let line_offsets = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();
        SourceLocation { line_offsets }
    }

    pub fn byte_to_position(&self, offset: usize) -> Position {
        let line = self
            .line_offsets
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        Position::new(line, offset - self.line_offsets[line])
    }

    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_map_to_template_lines() {
        let location = SourceLocation::new("mixin a\n  p\n+a");

        let positions: Vec<Position> = [0, 6, 8, 10, 12]
            .into_iter()
            .map(|offset| location.byte_to_position(offset))
            .collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(0, 6),
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(2, 0),
            ]
        );
    }

    #[test]
    fn test_line_count() {
        assert_eq!(SourceLocation::new("single").line_count(), 1);
        assert_eq!(SourceLocation::new("a\nb\nc").line_count(), 3);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 7).to_string(), "3:7");
    }
}
