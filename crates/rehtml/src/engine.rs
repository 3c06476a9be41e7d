//! Token consumption engine.
//!
//! Builds a document tree by recursive descent over the token stream. Every
//! token goes through [`Engine::consume`], which lets registered consumers
//! take over before falling back to [`Engine::consume_default`].
//!
//! # End tag recovery
//!
//! In strict mode any end tag that does not close the innermost open
//! element is an error, and so is running out of input inside an element.
//! In lenient mode:
//!
//! - a mismatched end tag closes the innermost open element and is left in
//!   place, so each enclosing element gets to check it against its own name
//!   in turn;
//! - an end tag that reaches the top level unmatched is dropped;
//! - end of input closes every open element.

use rehtml_dom::{is_void, Node};

use crate::consumers::ConsumerRegistry;
use crate::options::ConvertOptions;
use crate::token::{Lexer, Token, TokenKind};
use crate::{ConvertError, Result};

/// Drives tree construction from a [`Lexer`]
#[derive(Default)]
pub struct Engine {
    pub(crate) options: ConvertOptions,
    pub(crate) registry: ConsumerRegistry,
}

impl Engine {
    pub fn new(options: ConvertOptions, registry: ConsumerRegistry) -> Self {
        Self { options, registry }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn registry(&self) -> &ConsumerRegistry {
        &self.registry
    }

    /// Whether tag nesting mismatches are errors
    pub fn is_strict(&self) -> bool {
        self.options.strict_end_tags
    }

    /// Consume every token the lexer produces into a fresh document root
    pub fn parse(&self, lexer: &mut dyn Lexer) -> Result<Node> {
        let root = Node::root();
        let mut token = self.advance(lexer)?;
        while !token.is_end_of_input() {
            token = self.consume(&root, lexer, token)?;
        }
        Ok(root)
    }

    /// Move the lexer on and return its new current token
    pub fn advance(&self, lexer: &mut dyn Lexer) -> Result<Token> {
        Ok(lexer.next_token()?)
    }

    /// Consume `token` (and, for a start tag, the element's body) into
    /// `parent`, returning the token that follows.
    ///
    /// A consumer registered for the token kind wins; otherwise start and
    /// self-closing tags are offered to the consumer registered for their
    /// name; otherwise [`Engine::consume_default`] runs.
    pub fn consume(&self, parent: &Node, lexer: &mut dyn Lexer, token: Token) -> Result<Token> {
        if let Some(consumer) = self.registry.token_consumer(token.kind) {
            return consumer.consume(self, parent, lexer, token);
        }

        if token.is_opening_tag() {
            if let Some(consumer) = self.registry.tag_consumer(&token.data) {
                return consumer.consume(self, parent, lexer, token);
            }
        }

        self.consume_default(parent, lexer, token)
    }

    /// Built-in handling of `token`, bypassing the registry for this token
    /// only. Tokens inside an element body are still dispatched through
    /// [`Engine::consume`].
    pub fn consume_default(
        &self,
        parent: &Node,
        lexer: &mut dyn Lexer,
        token: Token,
    ) -> Result<Token> {
        match token.kind {
            TokenKind::Doctype => {
                parent.append_child(Node::doctype(&token.data));
                self.advance(lexer)
            }

            TokenKind::Text => {
                parent.append_child(Node::text(&token.data));
                self.advance(lexer)
            }

            TokenKind::Comment => {
                parent.append_child(Node::comment(&token.data));
                self.advance(lexer)
            }

            TokenKind::SelfClosingTag => {
                let element = Node::element_self_closing(&token.data);
                self.consume_attrs(&element, &token)?;
                parent.append_child(element);
                self.advance(lexer)
            }

            // Any end tag that gets here was not claimed by an open element
            TokenKind::EndTag => {
                if self.is_strict() {
                    return Err(ConvertError::UnexpectedEndTag {
                        found: token.data,
                        expected: None,
                    });
                }
                log::trace!("dropping stray </{}>", token.data);
                self.advance(lexer)
            }

            TokenKind::StartTag => {
                let element = Node::element(&token.data);
                self.consume_attrs(&element, &token)?;
                parent.append_child(element.clone());
                self.consume_element_body(&element, lexer, &token.data)
            }

            TokenKind::EndOfInput => Ok(token),
        }
    }

    /// Consume the body of an element whose start tag named `tag_name` is
    /// the lexer's current token, returning the token after the body.
    ///
    /// Void elements have no body; the lexer is only moved past the start
    /// tag. See the module docs for how missing and mismatched end tags are
    /// handled.
    pub fn consume_element_body(
        &self,
        element: &Node,
        lexer: &mut dyn Lexer,
        tag_name: &str,
    ) -> Result<Token> {
        if is_void(tag_name) {
            return self.advance(lexer);
        }

        let mut token = self.advance(lexer)?;
        loop {
            match token.kind {
                TokenKind::EndTag => break,
                TokenKind::EndOfInput => {
                    if self.is_strict() {
                        return Err(ConvertError::UnterminatedElement {
                            name: tag_name.to_string(),
                        });
                    }
                    log::debug!("closing <{}> at end of input", tag_name);
                    return Ok(token);
                }
                _ => token = self.consume(element, lexer, token)?,
            }
        }

        if token.data.eq_ignore_ascii_case(tag_name) {
            return self.advance(lexer);
        }

        if self.is_strict() {
            return Err(ConvertError::UnexpectedEndTag {
                found: token.data,
                expected: Some(tag_name.to_string()),
            });
        }

        // Leave the end tag for an enclosing element to match
        log::trace!("</{}> closes <{}>", token.data, tag_name);
        Ok(token)
    }

    /// Copy the attributes of `token` onto `element`, through the
    /// registered attribute consumer if there is one. By default every
    /// attribute is appended verbatim, in order.
    pub fn consume_attrs(&self, element: &Node, token: &Token) -> Result<()> {
        if let Some(consumer) = self.registry.attrs_consumer() {
            return consumer.consume_attrs(element, token);
        }

        for attr in &token.attributes {
            element.add_attr(&attr.key, &attr.value);
        }
        Ok(())
    }

    /// Consume `token` with the built-in behavior into a throwaway root,
    /// so nothing it produces reaches the caller's tree.
    pub fn discard(&self, lexer: &mut dyn Lexer, token: Token) -> Result<Token> {
        let sink = Node::root();
        self.consume_default(&sink, lexer, token)
    }
}
