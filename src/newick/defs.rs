//! Byte sets for reading and writing Newick strings.

/// Bytes that end a label
pub(crate) const LABEL_DELIMITERS: &[u8] = b":,);[";

/// Bytes that may not occur in a label
pub(crate) const LABEL_FORBIDDEN: &[u8] = b" \n\r\t\x0b\x0c(]";

/// Bytes that may occur in a branch length literal
pub(crate) const BRANCH_LENGTH_BYTES: &[u8] = b"0123456789.+-eE";

/// Bytes that end a branch length
pub(crate) const BRANCH_LENGTH_DELIMITERS: &[u8] = b",);";

/// Extra buffer in Newick string length/capacity estimate
pub(crate) const BUFFER_CHARS: usize = 10;
