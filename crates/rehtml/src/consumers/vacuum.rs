//! Consumer that drops whole elements.

use rehtml_dom::Node;

use super::Consumer;
use crate::engine::Engine;
use crate::token::{Lexer, Token};
use crate::Result;

/// Consumes an element and everything up to its matching end tag without
/// attaching any of it to the tree.
///
/// Register it under a tag name, e.g. `script`, to strip those elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct Vacuum;

impl Consumer for Vacuum {
    fn consume(
        &self,
        engine: &Engine,
        _parent: &Node,
        lexer: &mut dyn Lexer,
        token: Token,
    ) -> Result<Token> {
        engine.discard(lexer, token)
    }
}
