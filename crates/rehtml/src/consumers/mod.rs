//! Consumer registry: per-token-kind and per-tag-name overrides.

mod consumer;
mod vacuum;

pub use consumer::{AttrsConsumer, Consumer};
pub use vacuum::Vacuum;

use indexmap::IndexMap;

use crate::token::TokenKind;

/// Lookup table of consumers that replace the engine's default behavior
#[derive(Default)]
pub struct ConsumerRegistry {
    /// Checked first, for every token
    token_consumers: IndexMap<TokenKind, Box<dyn Consumer>>,
    /// Checked for start and self-closing tags, keyed by lowercase name
    tag_consumers: IndexMap<String, Box<dyn Consumer>>,
    attrs_consumer: Option<Box<dyn AttrsConsumer>>,
}

impl ConsumerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a consumer for every token of `kind`, replacing any previous
    pub fn set_token_consumer<C>(&mut self, kind: TokenKind, consumer: C)
    where
        C: Consumer + 'static,
    {
        self.token_consumers.insert(kind, Box::new(consumer));
    }

    pub fn remove_token_consumer(&mut self, kind: TokenKind) -> Option<Box<dyn Consumer>> {
        self.token_consumers.shift_remove(&kind)
    }

    pub fn token_consumer(&self, kind: TokenKind) -> Option<&dyn Consumer> {
        self.token_consumers.get(&kind).map(|c| c.as_ref())
    }

    /// Register a consumer for start and self-closing tags named `tag`
    pub fn set_tag_consumer<C>(&mut self, tag: &str, consumer: C)
    where
        C: Consumer + 'static,
    {
        self.tag_consumers
            .insert(tag.to_ascii_lowercase(), Box::new(consumer));
    }

    pub fn remove_tag_consumer(&mut self, tag: &str) -> Option<Box<dyn Consumer>> {
        self.tag_consumers.shift_remove(&tag.to_ascii_lowercase())
    }

    pub fn tag_consumer(&self, tag: &str) -> Option<&dyn Consumer> {
        self.tag_consumers
            .get(&tag.to_ascii_lowercase())
            .map(|c| c.as_ref())
    }

    /// Tag names with a registered consumer, in registration order
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tag_consumers.keys().map(String::as_str)
    }

    pub fn set_attrs_consumer<C>(&mut self, consumer: C)
    where
        C: AttrsConsumer + 'static,
    {
        self.attrs_consumer = Some(Box::new(consumer));
    }

    pub fn remove_attrs_consumer(&mut self) -> Option<Box<dyn AttrsConsumer>> {
        self.attrs_consumer.take()
    }

    pub fn attrs_consumer(&self) -> Option<&dyn AttrsConsumer> {
        self.attrs_consumer.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_lookup_is_case_insensitive() {
        let mut registry = ConsumerRegistry::new();
        registry.set_tag_consumer("Script", Vacuum);

        assert!(registry.tag_consumer("script").is_some());
        assert!(registry.tag_consumer("SCRIPT").is_some());
        assert!(registry.tag_consumer("style").is_none());
    }

    #[test]
    fn test_remove_clears_override() {
        let mut registry = ConsumerRegistry::new();
        registry.set_tag_consumer("script", Vacuum);
        registry.set_token_consumer(TokenKind::Comment, Vacuum);

        assert!(registry.remove_tag_consumer("script").is_some());
        assert!(registry.remove_tag_consumer("script").is_none());
        assert!(registry.tag_consumer("script").is_none());

        assert!(registry.remove_token_consumer(TokenKind::Comment).is_some());
        assert!(registry.token_consumer(TokenKind::Comment).is_none());
    }

    #[test]
    fn test_tag_names_keep_registration_order() {
        let mut registry = ConsumerRegistry::new();
        registry.set_tag_consumer("style", Vacuum);
        registry.set_tag_consumer("script", Vacuum);
        registry.set_tag_consumer("iframe", Vacuum);

        assert_eq!(
            registry.tag_names().collect::<Vec<_>>(),
            ["style", "script", "iframe"]
        );
    }
}
