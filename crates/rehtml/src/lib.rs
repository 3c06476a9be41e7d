//! # rehtml
//!
//! Normalize hand-written HTML into well-formed markup.
//!
//! Markup is tokenized, built into a mutable [`Node`] tree and serialized
//! back to text. Along the way, consumers registered per token kind or per
//! tag name can take over tree construction, e.g. to strip `<script>`
//! elements, and rewrite passes can replace nodes once the tree is built.
//!
//! ## Example
//!
//! ```rust
//! use rehtml::Converter;
//!
//! let mut converter = Converter::new();
//! converter.set_strict(false).discard("script");
//!
//! let html = converter
//!     .convert("<script src=\"foo.js\"></script><p>Hi <b>there</p>")
//!     .unwrap();
//! assert_eq!(html, "<p>Hi <b>there</b></p>");
//! ```
//!
//! ## Tree access
//!
//! ```rust
//! use rehtml::Converter;
//!
//! let root = Converter::new().parse("<ul><li>a</li><li>b</li></ul>").unwrap();
//! let items = root.find_descendants_by_name("li");
//! assert_eq!(items.len(), 2);
//! assert_eq!(items[1].text_content(), "b");
//! ```

pub mod consumers;
mod converter;
pub mod engine;
mod options;
mod token;
mod tokenizer;

pub use consumers::{AttrsConsumer, Consumer, ConsumerRegistry, Vacuum};
pub use converter::{Converter, RewriteFn};
pub use engine::Engine;
pub use options::ConvertOptions;
pub use rehtml_dom::{
    is_void, rewrite, serialize, try_rewrite, Attribute, Node, NodeType, VOID_ELEMENTS,
};
pub use token::{Attributes, LexError, Lexer, Token, TokenKind};
pub use tokenizer::Tokenizer;

/// Error type for conversions
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// An end tag with no open element to close, or one that does not
    /// match the innermost open element
    #[error("unexpected end tag: {found}{}", expected_suffix(.expected))]
    UnexpectedEndTag {
        found: String,
        expected: Option<String>,
    },

    /// Input ended before the element's end tag
    #[error("end tag for `{name}` is missing")]
    UnterminatedElement { name: String },

    #[error("lexer failure: {0}")]
    Lexer(#[from] LexError),

    /// A registered consumer rejected the input
    #[error("consumer error: {0}")]
    Consumer(String),
}

fn expected_suffix(expected: &Option<String>) -> String {
    expected
        .as_ref()
        .map(|name| format!(", expected: {}", name))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let stray = ConvertError::UnexpectedEndTag {
            found: "b".to_string(),
            expected: None,
        };
        assert_eq!(stray.to_string(), "unexpected end tag: b");

        let mismatch = ConvertError::UnexpectedEndTag {
            found: "b".to_string(),
            expected: Some("i".to_string()),
        };
        assert_eq!(mismatch.to_string(), "unexpected end tag: b, expected: i");

        let unterminated = ConvertError::UnterminatedElement {
            name: "div".to_string(),
        };
        assert_eq!(unterminated.to_string(), "end tag for `div` is missing");
    }
}
