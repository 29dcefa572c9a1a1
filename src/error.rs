//! Error type shared by parsing, building and editing trees.
//!
//! Every fallible operation returns a [PhyError]. Use [PhyError::kind] to
//! branch on the category without matching on variant payloads.

use thiserror::Error;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, PhyError>;

/// Errors that can occur while parsing, building or editing a tree.
#[derive(Error, Debug)]
pub enum PhyError {
    /// Reserving memory for the lookup arrays failed.
    #[error("cannot allocate memory for {0} nodes")]
    AllocationFailure(usize),

    /// Unexpected character while reading a label or a branch length.
    #[error("unexpected character {found:?} in node label/branch length at position {position}")]
    InvalidCharacter {
        /// The offending character
        found: char,
        /// Byte offset in the Newick string
        position: usize,
    },

    /// An internal node was closed with fewer than two descendants.
    #[error("detected unifurcation in Newick string at position {position}")]
    Unifurcation {
        /// Byte offset in the Newick string
        position: usize,
    },

    /// Unbalanced notes or parentheses, missing terminator, premature end
    /// of input, or a nesting that is not allowed.
    #[error("malformed Newick string at position {position}: {reason}{}", fmt_context(.context))]
    MalformedInput {
        /// What went wrong
        reason: String,
        /// Byte offset in the Newick string
        position: usize,
        /// The bytes following the error position
        context: String,
    },

    /// The node graph handed to [Tree::build](crate::Tree::build) is not a
    /// well-formed tree or does not match the given counts.
    #[error("invalid node graph - {0}")]
    InvalidGraph(String),

    /// Reading or writing a Newick file failed.
    #[error("IO error - {0}")]
    Io(#[from] std::io::Error),
}

/// Category of a [PhyError], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AllocationFailure,
    InvalidCharacter,
    Unifurcation,
    MalformedInput,
    InvalidGraph,
    Io,
}

impl PhyError {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            PhyError::AllocationFailure(_) => ErrorKind::AllocationFailure,
            PhyError::InvalidCharacter { .. } => ErrorKind::InvalidCharacter,
            PhyError::Unifurcation { .. } => ErrorKind::Unifurcation,
            PhyError::MalformedInput { .. } => ErrorKind::MalformedInput,
            PhyError::InvalidGraph(_) => ErrorKind::InvalidGraph,
            PhyError::Io(_) => ErrorKind::Io,
        }
    }

    /// Get the position in the Newick string where the error occurred,
    /// if the error stems from parsing.
    pub fn position(&self) -> Option<usize> {
        match self {
            PhyError::InvalidCharacter { position, .. }
            | PhyError::Unifurcation { position }
            | PhyError::MalformedInput { position, .. } => Some(*position),
            _ => None,
        }
    }
}

fn fmt_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context (next {} bytes): {}", context.len(), context)
    }
}
