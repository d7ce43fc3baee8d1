//! Error types for markup compilation and serialization.

use thiserror::Error;

/// Errors that can occur when compiling markup.
///
/// In strict mode these abort the whole compile; in lenient mode the
/// offending token is dropped and compilation continues. Unterminated
/// brackets and parentheses are never errors — they degrade to plain text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// A color or format token could not be decoded.
    #[error("invalid color or format token: {0}")]
    InvalidColorToken(String),

    /// A format token appeared where a color was required, or vice versa.
    #[error("expected a {expected} token: {found}")]
    ColorFormatMismatch {
        /// What the surrounding syntax required (`"color"` or `"format"`).
        expected: &'static str,
        /// The token that was found instead.
        found: String,
    },

    /// A `show_entity` hover payload was malformed.
    #[error("invalid entity reference: {0}")]
    InvalidEntityReference(String),
}

/// Errors that can occur when serializing a styled run tree.
///
/// The serializer has no lenient mode: silently dropping information would
/// break the round trip.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WriteError {
    /// The run has a shape the markup grammar cannot represent.
    #[error("unsupported run shape: {0}")]
    UnsupportedRun(String),
}
