//! Consumer traits.

use rehtml_dom::Node;

use crate::engine::Engine;
use crate::token::{Lexer, Token};
use crate::Result;

/// Handles a token in place of the engine's default behavior.
///
/// A consumer gets the same inputs as [`Engine::consume`]: the node new
/// content belongs under, the lexer, and the current token. It must consume
/// at least that token and return the lexer's new current token. It can hand
/// parts of its work back to the engine, e.g. through
/// [`Engine::consume_default`] or [`Engine::discard`].
///
/// Any `Fn(&Engine, &Node, &mut dyn Lexer, Token) -> Result<Token>` closure
/// is a consumer.
pub trait Consumer: Send + Sync {
    fn consume(
        &self,
        engine: &Engine,
        parent: &Node,
        lexer: &mut dyn Lexer,
        token: Token,
    ) -> Result<Token>;
}

impl<F> Consumer for F
where
    F: Fn(&Engine, &Node, &mut dyn Lexer, Token) -> Result<Token> + Send + Sync,
{
    fn consume(
        &self,
        engine: &Engine,
        parent: &Node,
        lexer: &mut dyn Lexer,
        token: Token,
    ) -> Result<Token> {
        self(engine, parent, lexer, token)
    }
}

/// Copies a tag token's attributes onto the element built for it.
///
/// Any `Fn(&Node, &Token) -> Result<()>` closure is an attribute consumer.
pub trait AttrsConsumer: Send + Sync {
    fn consume_attrs(&self, element: &Node, token: &Token) -> Result<()>;
}

impl<F> AttrsConsumer for F
where
    F: Fn(&Node, &Token) -> Result<()> + Send + Sync,
{
    fn consume_attrs(&self, element: &Node, token: &Token) -> Result<()> {
        self(element, token)
    }
}
