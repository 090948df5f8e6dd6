//! Balanced delimiter scanning
//!
//! Interpolations (`#{...}`) and argument lists (`(...)`) may nest their delimiters and
//! contain single- or double-quoted strings with backslash escapes. Scanning is a
//! single pass with a depth counter; delimiters inside strings are ignored.

use std::str::CharIndices;

/// Why a balanced region could not be closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unbalanced {
    /// The closing delimiter never appears at depth zero
    Unclosed,
    /// A quoted string runs to the end of the input
    UnterminatedString,
}

/// A piece of text with interpolations split out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Interpolation(String),
}

/// Returns the byte index just past the delimiter closing `text`'s leading `open`
pub fn balanced_end(text: &str, open: char, close: char) -> Result<usize, Unbalanced> {
    if !text.starts_with(open) {
        return Err(Unbalanced::Unclosed);
    }

    let mut depth = 0usize;
    let mut chars = text.char_indices();
    while let Some((index, ch)) = chars.next() {
        if ch == '"' || ch == '\'' {
            skip_string(&mut chars, ch)?;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Ok(index + ch.len_utf8());
            }
        }
    }

    Err(Unbalanced::Unclosed)
}

fn skip_string(chars: &mut CharIndices<'_>, quote: char) -> Result<(), Unbalanced> {
    while let Some((_, ch)) = chars.next() {
        if ch == '\\' {
            chars.next();
        } else if ch == quote {
            return Ok(());
        }
    }
    Err(Unbalanced::UnterminatedString)
}

/// Scans a `#{...}` interpolation at the start of `text`.
///
/// Returns the inner expression and the byte length of the whole interpolation, or
/// `None` when `text` does not start with `#{`.
pub fn scan_interpolation(text: &str) -> Option<Result<(&str, usize), Unbalanced>> {
    let body = text.strip_prefix('#')?;
    if !body.starts_with('{') {
        return None;
    }
    Some(balanced_end(body, '{', '}').map(|end| (&body[1..end - 1], end + 1)))
}

/// Splits a delimited list on top-level commas, trimming each item
pub fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut chars = text.char_indices();

    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' | '\'' => {
                // An unterminated string swallows the rest as one item
                if skip_string(&mut chars, ch).is_err() {
                    break;
                }
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                items.push(text[start..index].trim().to_string());
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }

    let last = text[start..].trim();
    if !last.is_empty() {
        items.push(last.to_string());
    }
    items.retain(|item| !item.is_empty());
    items
}

/// Splits text into literal and interpolated segments. `\#{` is a literal `#{`.
pub fn segments(text: &str) -> Result<Vec<Segment>, Unbalanced> {
    let mut result = Vec::new();
    let mut literal = String::new();
    let mut index = 0;

    while index < text.len() {
        let rest = &text[index..];
        if rest.starts_with("\\#{") {
            literal.push_str("#{");
            index += 3;
            continue;
        }
        if let Some(scanned) = scan_interpolation(rest) {
            let (expr, len) = scanned?;
            if !literal.is_empty() {
                result.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            result.push(Segment::Interpolation(expr.trim().to_string()));
            index += len;
            continue;
        }
        let ch = rest.chars().next().unwrap_or_default();
        literal.push(ch);
        index += ch.len_utf8().max(1);
    }

    if !literal.is_empty() {
        result.push(Segment::Literal(literal));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#{a}", Ok(("a", 4)))]
    #[case("#{a} tail", Ok(("a", 4)))]
    #[case("#{ {a: {b: 1}} }", Ok((" {a: {b: 1}} ", 16)))]
    #[case("#{'}'}", Ok(("'}'", 6)))]
    #[case(r#"#{"a\"}"}"#, Ok((r#""a\"}""#, 9)))]
    #[case("#{a", Err(Unbalanced::Unclosed))]
    #[case("#{'a}", Err(Unbalanced::UnterminatedString))]
    fn test_scan_interpolation(
        #[case] input: &str,
        #[case] expected: Result<(&str, usize), Unbalanced>,
    ) {
        assert_eq!(scan_interpolation(input), Some(expected));
    }

    #[test]
    fn test_not_an_interpolation() {
        assert_eq!(scan_interpolation("{a}"), None);
        assert_eq!(scan_interpolation("#a"), None);
    }

    #[test]
    fn test_split_top_level_respects_nesting() {
        assert_eq!(
            split_top_level("{a: 5, b: f(1, 2)}, 'x,y', z", ','),
            vec!["{a: 5, b: f(1, 2)}", "'x,y'", "z"]
        );
        assert!(split_top_level("  ", ',').is_empty());
    }

    #[test]
    fn test_segments() {
        assert_eq!(
            segments("Hi #{name}! \\#{raw}").unwrap(),
            vec![
                Segment::Literal("Hi ".to_string()),
                Segment::Interpolation("name".to_string()),
                Segment::Literal("! #{raw}".to_string()),
            ]
        );
    }

    #[test]
    fn test_balanced_parentheses() {
        assert_eq!(balanced_end("(a, (b)) rest", '(', ')'), Ok(8));
        assert_eq!(balanced_end("(a, ')')", '(', ')'), Ok(8));
        assert_eq!(balanced_end("(a", '(', ')'), Err(Unbalanced::Unclosed));
    }
}
