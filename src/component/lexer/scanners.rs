//! Template scanners
//!
//! A [`Scanner`] looks at the cursor of a [`State`] and either produces the tokens of
//! one statement or declines with `Ok(None)`. The lexer tries scanners in order and
//! restores the cursor after a declined attempt, so a scanner may consume input
//! speculatively. Extension scanners are placed before the host ones.

use once_cell::sync::Lazy;
use regex::Regex;

use super::interpolation::{balanced_end, split_top_level, Unbalanced};
use super::state::State;
use super::tokens::{Token, TokenKind};
use crate::component::ast::CallName;
use crate::component::error::{LexError, LexErrorKind};

/// Identifier accepted for fragment, tag-less call, and keyword operands
pub static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9\-_]*").expect("valid name pattern"));

/// Tag names may contain `:` but never end with one, so `li: a` expands
static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z](?:[a-zA-Z0-9:_\-]*[a-zA-Z0-9_])?").expect("valid tag pattern")
});

static CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.([a-zA-Z_\-][a-zA-Z0-9_\-]*)").expect("valid class pattern"));

static HOST_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[ \t]*([a-zA-Z_][a-zA-Z0-9\-_]*)").expect("valid call pattern")
});

pub trait Scanner {
    fn name(&self) -> &'static str;

    fn scan(&self, state: &mut State<'_>) -> Result<Option<Vec<Token>>, LexError>;
}

/// Builds the host scanner chain
pub fn host_scanners(mixin_keywords: &[String], keywords: &[String]) -> Vec<Box<dyn Scanner>> {
    vec![
        Box::new(FragmentScanner::new(mixin_keywords.to_vec())),
        Box::new(KeywordScanner::new(keywords.to_vec())),
        Box::new(BlockScanner),
        Box::new(MixinCallScanner),
        Box::new(PipeScanner),
        Box::new(CodeScanner),
        Box::new(ExpressionScanner),
        Box::new(TagScanner),
    ]
}

/// Returns true when `word` starts `rest` as a whole word
fn starts_with_word(rest: &str, word: &str) -> bool {
    rest.strip_prefix(word)
        .map(|after| after.is_empty() || after.starts_with([' ', '\t', ':', '(']))
        .unwrap_or(false)
}

/// `mixin name(params)`
pub struct FragmentScanner {
    keywords: Vec<String>,
}

impl FragmentScanner {
    pub fn new(keywords: Vec<String>) -> Self {
        FragmentScanner { keywords }
    }
}

impl Scanner for FragmentScanner {
    fn name(&self) -> &'static str {
        "fragment"
    }

    fn scan(&self, state: &mut State<'_>) -> Result<Option<Vec<Token>>, LexError> {
        let start = state.checkpoint();
        let Some(keyword) = self
            .keywords
            .iter()
            .find(|keyword| starts_with_word(state.rest(), keyword))
        else {
            return Ok(None);
        };
        state.advance(keyword.len());
        state.skip_spaces();

        let Some(captures) = state.eat_regex(&NAME) else {
            return Ok(None);
        };
        let name = captures[0].to_string();

        let mut tokens = vec![state.token_at(start, TokenKind::FragmentDefinition(name))];
        tokens.extend(SubScanner.scan_tokens(state)?);
        Ok(Some(tokens))
    }
}

/// Extension keywords (`slot title`); the rest of the line is the keyword value
pub struct KeywordScanner {
    names: Vec<String>,
}

impl KeywordScanner {
    pub fn new(names: Vec<String>) -> Self {
        KeywordScanner { names }
    }
}

impl Scanner for KeywordScanner {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn scan(&self, state: &mut State<'_>) -> Result<Option<Vec<Token>>, LexError> {
        let start = state.checkpoint();
        let Some(name) = self
            .names
            .iter()
            .find(|name| starts_with_word(state.rest(), name))
        else {
            return Ok(None);
        };
        state.advance(name.len());
        let value = state.take_rest().trim().to_string();

        Ok(Some(vec![state.token_at(
            start,
            TokenKind::Keyword {
                name: name.clone(),
                value,
            },
        )]))
    }
}

/// `block`
pub struct BlockScanner;

impl Scanner for BlockScanner {
    fn name(&self) -> &'static str {
        "block"
    }

    fn scan(&self, state: &mut State<'_>) -> Result<Option<Vec<Token>>, LexError> {
        let start = state.checkpoint();
        if state.rest().trim_end() != "block" {
            return Ok(None);
        }
        state.take_rest();
        Ok(Some(vec![state.token_at(start, TokenKind::Block)]))
    }
}

/// `+name(args)` with a plain name
pub struct MixinCallScanner;

impl Scanner for MixinCallScanner {
    fn name(&self) -> &'static str {
        "mixin-call"
    }

    fn scan(&self, state: &mut State<'_>) -> Result<Option<Vec<Token>>, LexError> {
        let start = state.checkpoint();
        let Some(captures) = state.eat_regex(&HOST_CALL) else {
            return Ok(None);
        };
        let name = CallName::Plain(captures[1].to_string());

        let mut tokens = vec![state.token_at(start, TokenKind::Call(name))];
        tokens.extend(ClassScanner.scan_tokens(state));
        tokens.extend(SubScanner.scan_tokens(state)?);
        Ok(Some(tokens))
    }
}

/// `| text`
pub struct PipeScanner;

impl Scanner for PipeScanner {
    fn name(&self) -> &'static str {
        "pipe"
    }

    fn scan(&self, state: &mut State<'_>) -> Result<Option<Vec<Token>>, LexError> {
        let start = state.checkpoint();
        if !state.eat("|") {
            return Ok(None);
        }
        state.eat(" ");
        let text = state.take_rest().to_string();
        Ok(Some(vec![state.token_at(start, TokenKind::Text(text))]))
    }
}

/// `- statement`
pub struct CodeScanner;

impl Scanner for CodeScanner {
    fn name(&self) -> &'static str {
        "code"
    }

    fn scan(&self, state: &mut State<'_>) -> Result<Option<Vec<Token>>, LexError> {
        let start = state.checkpoint();
        let code = if state.rest() == "-" {
            state.take_rest();
            String::new()
        } else if state.eat("- ") || state.eat("-\t") {
            state.take_rest().trim().to_string()
        } else {
            return Ok(None);
        };
        Ok(Some(vec![state.token_at(start, TokenKind::Code(code))]))
    }
}

/// `= expression` at the start of a line
pub struct ExpressionScanner;

impl Scanner for ExpressionScanner {
    fn name(&self) -> &'static str {
        "expression"
    }

    fn scan(&self, state: &mut State<'_>) -> Result<Option<Vec<Token>>, LexError> {
        let start = state.checkpoint();
        if !state.eat("=") {
            return Ok(None);
        }
        let expr = state.take_rest().trim().to_string();
        Ok(Some(vec![state.token_at(start, TokenKind::Expression(expr))]))
    }
}

/// `tag`, `tag.class`, or a bare `.class` (an implicit `div`)
pub struct TagScanner;

impl Scanner for TagScanner {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn scan(&self, state: &mut State<'_>) -> Result<Option<Vec<Token>>, LexError> {
        let start = state.checkpoint();
        let tag = match state.eat_regex(&TAG) {
            Some(captures) => captures[0].to_string(),
            None if CLASS.is_match(state.rest()) => "div".to_string(),
            None => return Ok(None),
        };

        let mut tokens = vec![state.token_at(start, TokenKind::Tag(tag))];
        tokens.extend(ClassScanner.scan_tokens(state));
        tokens.extend(SubScanner.scan_tokens(state)?);
        Ok(Some(tokens))
    }
}

/// Consecutive `.class` suffixes
pub struct ClassScanner;

impl ClassScanner {
    pub fn scan_tokens(&self, state: &mut State<'_>) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let start = state.checkpoint();
            let Some(captures) = state.eat_regex(&CLASS) else {
                break;
            };
            tokens.push(state.token_at(start, TokenKind::Class(captures[1].to_string())));
        }
        tokens
    }
}

/// Trailing part of a tag or call: arguments, then expansion, output, or text
pub struct SubScanner;

impl SubScanner {
    pub fn scan_tokens(&self, state: &mut State<'_>) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        if state.peek() == Some('(') {
            let start = state.checkpoint();
            let end = balanced_end(state.rest(), '(', ')').map_err(|err| match err {
                Unbalanced::Unclosed => state.error(LexErrorKind::UnbalancedParentheses),
                Unbalanced::UnterminatedString => state.error(LexErrorKind::UnterminatedString),
            })?;
            let inner = &state.rest()[1..end - 1];
            let arguments = split_top_level(inner, ',');
            state.advance(end);
            tokens.push(state.token_at(start, TokenKind::Arguments(arguments)));
        }

        let start = state.checkpoint();
        if state.rest() == ":" || state.eat(": ") || state.eat(":\t") {
            state.restore(start + 1);
            tokens.push(state.token_at(start, TokenKind::Expansion));
            state.skip_spaces();
        } else if state.eat("=") {
            let expr = state.take_rest().trim().to_string();
            tokens.push(state.token_at(start, TokenKind::Expression(expr)));
        } else if state.eat(" ") {
            let text = state.take_rest().to_string();
            if !text.is_empty() {
                tokens.push(state.token_at(start + 1, TokenKind::Text(text)));
            }
        }

        Ok(tokens)
    }
}
