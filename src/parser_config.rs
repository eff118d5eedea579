/// Parser options for controlling error handling and resource limits.
///
/// These options let callers trade strictness for compatibility with the
/// malformed content streams that are common in real files.
///
/// # Example
///
/// ```
/// use pdf_content_codec::parser_config::ParserOptions;
///
/// // Lenient mode (default) - drop malformed inline image entries and continue
/// let lenient = ParserOptions::lenient();
///
/// // Strict mode - fail on malformed inline image dictionaries
/// let strict = ParserOptions::strict();
///
/// // Custom configuration
/// let custom = ParserOptions {
///     strict: false,
///     max_nesting: 32,
///     max_decompression_ratio: 100,
///     max_decompressed_size: 16 * 1024 * 1024,
/// };
/// # let _ = (lenient, strict, custom);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Reject recoverable malformations instead of skipping them
    ///
    /// Affects inline image dictionaries: a key that is not a name is an
    /// error in strict mode and is dropped with a warning otherwise.
    pub strict: bool,

    /// Maximum array/dictionary nesting depth inside one operand
    ///
    /// PDF Spec: ISO 32000-1:2008, Annex C - Implementation Limits
    pub max_nesting: usize,

    /// Maximum decompression ratio (decompressed:compressed), 0 disables the check
    pub max_decompression_ratio: u32,

    /// Maximum decompressed stream size in bytes, 0 disables the check
    pub max_decompressed_size: usize,
}

impl Default for ParserOptions {
    /// Default configuration: lenient mode with resource limits
    fn default() -> Self {
        Self::lenient()
    }
}

impl ParserOptions {
    /// Strict mode: fail on any malformation
    pub fn strict() -> Self {
        Self {
            strict: true,
            max_nesting: 100,
            max_decompression_ratio: 100,
            max_decompressed_size: 100 * 1024 * 1024, // 100 MB
        }
    }

    /// Lenient mode: recover where the content is still unambiguous
    pub fn lenient() -> Self {
        Self {
            strict: false,
            max_nesting: 100,
            max_decompression_ratio: 100,
            max_decompressed_size: 100 * 1024 * 1024, // 100 MB
        }
    }

    /// Override the nesting limit.
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }
}
