//! Lexical tokens and the lexer contract.
//!
//! The engine never looks at raw markup; it pulls classified tokens from a
//! [`Lexer`]. [`crate::Tokenizer`] is the bundled implementation, but any
//! source of tokens can drive a conversion.

use rehtml_dom::Attribute;
use smallvec::SmallVec;

/// Token classes reported by a lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<name ...>`
    StartTag,
    /// `</name>`
    EndTag,
    /// `<name .../>`
    SelfClosingTag,
    Text,
    Comment,
    Doctype,
    /// No more input. Lexers keep returning this once reached.
    EndOfInput,
}

/// Most tags carry only a handful of attributes
pub type Attributes = SmallVec<[Attribute; 4]>;

/// A classified unit of markup.
///
/// `data` is the tag name for tag tokens and the raw payload for text,
/// comment and doctype tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub data: String,
    pub attributes: Attributes,
}

impl Token {
    fn new(kind: TokenKind, data: &str) -> Self {
        Self {
            kind,
            data: data.to_string(),
            attributes: Attributes::new(),
        }
    }

    pub fn start_tag(name: &str, attrs: Vec<(&str, &str)>) -> Self {
        Self {
            attributes: attrs
                .into_iter()
                .map(|(k, v)| Attribute::new(k, v))
                .collect(),
            ..Self::new(TokenKind::StartTag, name)
        }
    }

    pub fn self_closing_tag(name: &str, attrs: Vec<(&str, &str)>) -> Self {
        Self {
            kind: TokenKind::SelfClosingTag,
            ..Self::start_tag(name, attrs)
        }
    }

    pub fn end_tag(name: &str) -> Self {
        Self::new(TokenKind::EndTag, name)
    }

    pub fn text(text: &str) -> Self {
        Self::new(TokenKind::Text, text)
    }

    pub fn comment(text: &str) -> Self {
        Self::new(TokenKind::Comment, text)
    }

    pub fn doctype(text: &str) -> Self {
        Self::new(TokenKind::Doctype, text)
    }

    pub fn end_of_input() -> Self {
        Self::new(TokenKind::EndOfInput, "")
    }

    pub fn is_end_of_input(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }

    /// Start and self-closing tags open an element
    pub fn is_opening_tag(&self) -> bool {
        matches!(self.kind, TokenKind::StartTag | TokenKind::SelfClosingTag)
    }
}

/// Failure reported by a lexer
#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

/// Source of tokens for the engine.
pub trait Lexer {
    /// Advance to the next token and return it. After the input is
    /// exhausted every call returns a [`TokenKind::EndOfInput`] token.
    fn next_token(&mut self) -> Result<Token, LexError>;
}

impl<L: Lexer + ?Sized> Lexer for &mut L {
    fn next_token(&mut self) -> Result<Token, LexError> {
        (**self).next_token()
    }
}
