//! Low-level byte-by-byte parser for ASCII text.
//!
//! This module provides [ByteParser], a cursor over an in-memory byte slice
//! with support for peeking, consuming and extracting context for error
//! reporting. It is the foundation of the Newick reader.

use crate::error::PhyError;

/// Number of bytes shown as context in parse errors
pub(crate) const CONTEXT_LENGTH: usize = 20;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser over a borrowed slice, assuming ASCII encoding.
///
/// # Example
/// ```
/// use phylocore::parser::ByteParser;
///
/// let mut parser = ByteParser::from_str("(A:1.5,B);");
/// assert_eq!(parser.peek(), Some(b'('));
/// assert!(parser.consume_if(b'('));
/// assert_eq!(parser.next_byte(), Some(b'A'));
/// assert_eq!(parser.position(), 2);
/// assert_eq!(parser.get_context_as_string(4), ":1.5");
/// ```
pub struct ByteParser<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> ByteParser<'a> {
    /// Creates a new `ByteParser` over a byte slice.
    ///
    /// # Arguments
    /// * `input` - The byte slice to parse
    pub fn from_bytes(input: &'a [u8]) -> Self {
        ByteParser { input, position: 0 }
    }

    /// Creates a new `ByteParser` over the bytes of a string.
    ///
    /// # Arguments
    /// * `input` - The string to parse
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Self::from_bytes(input.as_bytes())
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }

    /// Returns the byte consumed last, if any.
    pub fn prev_byte(&self) -> Option<u8> {
        self.position
            .checked_sub(1)
            .and_then(|p| self.input.get(p).copied())
    }

    /// Consumes the current byte if it matches `ch` exactly.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek() == Some(ch) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the input from `start` up to the current position.
    ///
    /// # Returns
    /// A byte slice, or an empty slice if `start` lies beyond the position
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        self.input.get(start..self.position).unwrap_or(&[])
    }

    /// Returns up to `k` bytes from the current position for error context.
    pub fn get_context(&self, k: usize) -> &'a [u8] {
        let start = self.position.min(self.input.len());
        let end = (start + k).min(self.input.len());
        &self.input[start..end]
    }

    /// Returns a string from up to `k` bytes from the current position for
    /// error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        String::from_utf8_lossy(self.get_context(k)).into_owned()
    }

    // =#========================================================================#=
    // ERROR CONSTRUCTORS
    // =#========================================================================#=

    /// Creates a [PhyError::MalformedInput] at the current position.
    pub(crate) fn malformed<S: Into<String>>(&self, reason: S) -> PhyError {
        PhyError::MalformedInput {
            reason: reason.into(),
            position: self.position,
            context: self.get_context_as_string(CONTEXT_LENGTH),
        }
    }

    /// Creates a [PhyError::InvalidCharacter] for the byte consumed last.
    pub(crate) fn invalid_character(&self) -> PhyError {
        PhyError::InvalidCharacter {
            found: self.prev_byte().map_or('\0', char::from),
            position: self.position.saturating_sub(1),
        }
    }

    /// Creates a [PhyError::Unifurcation] for the byte consumed last.
    pub(crate) fn unifurcation(&self) -> PhyError {
        PhyError::Unifurcation {
            position: self.position.saturating_sub(1),
        }
    }
}
