//! Conversion options

/// Options for [`crate::Converter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Treat stray, mismatched and missing end tags as errors. When false,
    /// they are repaired instead (see [`crate::engine`]).
    pub strict_end_tags: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            strict_end_tags: true,
        }
    }
}
