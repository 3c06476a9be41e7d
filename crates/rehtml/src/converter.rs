//! Converter - the main entry point for HTML normalization.

use std::io::Read;

use indexmap::IndexMap;
use rehtml_dom::{rewrite, Node};

use crate::consumers::{AttrsConsumer, Consumer, Vacuum};
use crate::engine::Engine;
use crate::options::ConvertOptions;
use crate::token::{LexError, Lexer, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::Result;

/// Type alias for rewrite passes
pub type RewriteFn = Box<dyn Fn(&Node) -> Option<Node> + Send + Sync>;

/// Parses markup into a tree and serializes it back.
///
/// Configure it first (options, consumers, rewrite passes), then share it:
/// conversions only need `&self`, so one converter can serve any number of
/// inputs, on any number of threads.
#[derive(Default)]
pub struct Converter {
    engine: Engine,
    /// Applied in registration order by the `convert*` methods
    rewrites: IndexMap<String, RewriteFn>,
}

impl Converter {
    /// Create a new Converter with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Converter with custom options
    pub fn with_options(options: ConvertOptions) -> Self {
        Self {
            engine: Engine {
                options,
                ..Engine::default()
            },
            rewrites: IndexMap::new(),
        }
    }

    /// Get the current options
    pub fn options(&self) -> &ConvertOptions {
        &self.engine.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut ConvertOptions {
        &mut self.engine.options
    }

    /// Choose between erroring on (strict) and repairing (lenient) broken
    /// tag nesting
    pub fn set_strict(&mut self, strict: bool) -> &mut Self {
        self.engine.options.strict_end_tags = strict;
        self
    }

    /// The engine, for driving a conversion by hand
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Handle every token of `kind` with `consumer`
    pub fn set_token_consumer<C>(&mut self, kind: TokenKind, consumer: C) -> &mut Self
    where
        C: Consumer + 'static,
    {
        self.engine.registry.set_token_consumer(kind, consumer);
        self
    }

    pub fn remove_token_consumer(&mut self, kind: TokenKind) -> &mut Self {
        self.engine.registry.remove_token_consumer(kind);
        self
    }

    /// Handle start and self-closing tags named `tag` with `consumer`
    pub fn set_tag_consumer<C>(&mut self, tag: &str, consumer: C) -> &mut Self
    where
        C: Consumer + 'static,
    {
        self.engine.registry.set_tag_consumer(tag, consumer);
        self
    }

    pub fn remove_tag_consumer(&mut self, tag: &str) -> &mut Self {
        self.engine.registry.remove_tag_consumer(tag);
        self
    }

    /// Drop elements named `tag`, with everything inside them
    pub fn discard(&mut self, tag: &str) -> &mut Self {
        self.set_tag_consumer(tag, Vacuum)
    }

    /// Replace the default attribute copying
    pub fn set_attrs_consumer<C>(&mut self, consumer: C) -> &mut Self
    where
        C: AttrsConsumer + 'static,
    {
        self.engine.registry.set_attrs_consumer(consumer);
        self
    }

    pub fn remove_attrs_consumer(&mut self) -> &mut Self {
        self.engine.registry.remove_attrs_consumer();
        self
    }

    /// Add a rewrite pass, run over the parsed tree before serialization.
    /// Adding a pass under an existing key replaces it in place.
    pub fn add_rewrite<F>(&mut self, key: &str, f: F) -> &mut Self
    where
        F: Fn(&Node) -> Option<Node> + Send + Sync + 'static,
    {
        self.rewrites.insert(key.to_string(), Box::new(f));
        self
    }

    pub fn remove_rewrite(&mut self, key: &str) -> &mut Self {
        self.rewrites.shift_remove(key);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Parse markup into a tree
    pub fn parse(&self, html: &str) -> Result<Node> {
        self.parse_tokens(&mut Tokenizer::new(html))
    }

    /// Parse markup read from `reader`. The input must be UTF-8.
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Node> {
        let mut html = String::new();
        reader
            .read_to_string(&mut html)
            .map_err(LexError::from)?;
        self.parse(&html)
    }

    /// Build a tree from any token source
    pub fn parse_tokens(&self, lexer: &mut dyn Lexer) -> Result<Node> {
        self.engine.parse(lexer)
    }

    /// Normalize markup: parse, apply rewrite passes, serialize
    pub fn convert(&self, html: &str) -> Result<String> {
        self.convert_tokens(&mut Tokenizer::new(html))
    }

    /// [`Converter::convert`] for markup read from `reader`
    pub fn convert_reader<R: Read>(&self, reader: R) -> Result<String> {
        let root = self.parse_reader(reader)?;
        Ok(self.finish(root))
    }

    /// [`Converter::convert`] for any token source
    pub fn convert_tokens(&self, lexer: &mut dyn Lexer) -> Result<String> {
        let root = self.parse_tokens(lexer)?;
        Ok(self.finish(root))
    }

    fn finish(&self, mut root: Node) -> String {
        for f in self.rewrites.values() {
            if let Some(substitute) = rewrite(&root, |node| f(node)) {
                root = substitute;
            }
        }
        root.outer_html()
    }
}
