//! Error types for every stage of the pipeline
//!
//! Each stage owns a small error enum. [`ComponentError`] is the umbrella type returned by
//! the [`Compiler`](crate::component::compiler::Compiler) facade.

use std::fmt;

use super::ast::Position;
use super::transforms::TransformError;

/// What went wrong while scanning a template line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A `#{` without its matching `}` on the same line
    UnterminatedInterpolation,
    /// A quoted string inside an interpolation or argument list that never closes
    UnterminatedString,
    /// A `(` argument list without its matching `)`
    UnbalancedParentheses,
    /// An outdent that does not land on any enclosing indentation level
    InconsistentIndentation,
    /// No scanner accepted the character at the cursor
    UnexpectedCharacter(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnterminatedInterpolation => write!(f, "unterminated interpolation"),
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::UnbalancedParentheses => write!(f, "unbalanced parentheses"),
            LexErrorKind::InconsistentIndentation => write!(f, "inconsistent indentation"),
            LexErrorKind::UnexpectedCharacter(c) => write!(f, "unexpected character '{}'", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub position: Position,
    pub kind: LexErrorKind,
}

impl LexError {
    pub fn new(position: Position, kind: LexErrorKind) -> Self {
        Self { position, kind }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lex error at {}: {}", self.position, self.kind)
    }
}

impl std::error::Error for LexError {}

/// Errors raised while building the syntax tree
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The token stream does not form a valid template
    Syntax { position: Position, message: String },
    /// A hook registered on `after-parse-node` failed
    Transform(TransformError),
}

impl ParseError {
    pub fn syntax(position: Position, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax { position, message } => {
                write!(f, "Parse error at {}: {}", position, message)
            }
            ParseError::Transform(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<TransformError> for ParseError {
    fn from(err: TransformError) -> Self {
        ParseError::Transform(err)
    }
}

/// Errors raised while serializing the syntax tree into a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A keyword node whose name no extension provides codegen for
    UnknownKeyword(String),
    /// Interpolated text with an unbalanced `#{`
    Interpolation(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownKeyword(name) => write!(f, "Unknown keyword '{}'", name),
            FormatError::Interpolation(text) => {
                write!(f, "Unbalanced interpolation in text '{}'", text)
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// A generated script failed to lex or parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub position: Position,
    pub message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script error at {}: {}", self.position, self.message)
    }
}

impl std::error::Error for ScriptError {}

/// Errors raised while executing a generated script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A call site named a fragment that was never defined
    FragmentNotFound { name: String },
    /// None of the candidate names given to the disambiguation helper is defined
    NoCandidateFound { candidates: Vec<String> },
    /// A call expression resolved to something that is not a function
    NotCallable { name: String },
    /// A native function received arguments it cannot work with
    BadArguments { function: String, message: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::FragmentNotFound { name } => write!(f, "Unknown fragment '{}'", name),
            RenderError::NoCandidateFound { candidates } => write!(
                f,
                "No fragment found among candidates: {}",
                candidates
                    .iter()
                    .map(|name| format!("\"{}\"", name))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            RenderError::NotCallable { name } => write!(f, "'{}' is not callable", name),
            RenderError::BadArguments { function, message } => {
                write!(f, "Bad arguments for '{}': {}", function, message)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Umbrella error for the compiler facade
#[derive(Debug)]
pub enum ComponentError {
    Lex(LexError),
    Parse(ParseError),
    Format(FormatError),
    Transform(TransformError),
    Script(ScriptError),
    Render(RenderError),
    Config(config::ConfigError),
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentError::Lex(err) => write!(f, "{}", err),
            ComponentError::Parse(err) => write!(f, "{}", err),
            ComponentError::Format(err) => write!(f, "{}", err),
            ComponentError::Transform(err) => write!(f, "{}", err),
            ComponentError::Script(err) => write!(f, "{}", err),
            ComponentError::Render(err) => write!(f, "{}", err),
            ComponentError::Config(err) => write!(f, "Configuration error: {}", err),
        }
    }
}

impl std::error::Error for ComponentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComponentError::Lex(err) => Some(err),
            ComponentError::Parse(err) => Some(err),
            ComponentError::Format(err) => Some(err),
            ComponentError::Transform(err) => Some(err),
            ComponentError::Script(err) => Some(err),
            ComponentError::Render(err) => Some(err),
            ComponentError::Config(err) => Some(err),
        }
    }
}

impl From<LexError> for ComponentError {
    fn from(err: LexError) -> Self {
        ComponentError::Lex(err)
    }
}

impl From<ParseError> for ComponentError {
    fn from(err: ParseError) -> Self {
        ComponentError::Parse(err)
    }
}

impl From<FormatError> for ComponentError {
    fn from(err: FormatError) -> Self {
        ComponentError::Format(err)
    }
}

impl From<TransformError> for ComponentError {
    fn from(err: TransformError) -> Self {
        ComponentError::Transform(err)
    }
}

impl From<ScriptError> for ComponentError {
    fn from(err: ScriptError) -> Self {
        ComponentError::Script(err)
    }
}

impl From<RenderError> for ComponentError {
    fn from(err: RenderError) -> Self {
        ComponentError::Render(err)
    }
}

impl From<config::ConfigError> for ComponentError {
    fn from(err: config::ConfigError) -> Self {
        ComponentError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_candidate_lists_every_name() {
        let err = RenderError::NoCandidateFound {
            candidates: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "No fragment found among candidates: \"a\", \"b\""
        );
    }

    #[test]
    fn test_lex_error_display() {
        let err = LexError::new(
            Position::new(2, 4),
            LexErrorKind::UnterminatedInterpolation,
        );
        assert_eq!(err.to_string(), "Lex error at 2:4: unterminated interpolation");
    }
}
