//! Newick format reader and writer for phylogenetic trees.
//!
//! # Quick API
//! * [`parse_str`] - parses a single Newick string into a [`Tree`]
//! * [`parse_all_str`] - parses every tree of a `;`-separated list
//! * [`parse_file`] - reads a file and parses its first tree
//! * [`parse_file_all`] - reads a file and parses all its trees
//! * [`to_newick`] - writes the subtree of a node as a Newick string
//! * [`write_file`] - writes a tree to a file, truncating or appending
//!
//! # Format
//! * `tree ::= node ';'`
//! * `node ::= [ '(' node { ',' node } ')' ] [label] ['[' note ']'] [':' number]`
//!
//! Furthermore:
//! * Labels are unquoted and may not contain whitespace, `(`, `)`, `[`, `]`,
//!   `,`, `:` or `;`
//! * Notes may contain anything, including balanced nested brackets
//! * Internal nodes need at least two descendants
//! * Whitespace is only allowed around a complete tree

mod defs;
mod reader;
pub mod writer;

pub use self::writer::to_newick;

use crate::error::{PhyError, Result};
use crate::model::Tree;
use crate::newick::reader::NewickReader;
use crate::parser::byte_parser::CONTEXT_LENGTH;
use crate::parser::ByteParser;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// How [`write_file`] treats an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Replace the file's contents
    #[default]
    Truncate,
    /// Add the tree after the file's contents
    Append,
}

// =#========================================================================#=
// QUICK PARSING API
// =#========================================================================#=
/// Parses a single Newick string into a [`Tree`].
///
/// Surrounding whitespace is ignored; the remaining text must end with `;`.
/// Anything after the first tree's terminating `;` is ignored.
///
/// # Errors
/// [`PhyError::MalformedInput`], [`PhyError::InvalidCharacter`] or
/// [`PhyError::Unifurcation`] if the string is not a valid Newick tree.
///
/// # Example
/// ```
/// use phylocore::newick::parse_str;
///
/// let tree = parse_str("((A:1,B:1)N1:1,(C:1,D:1)N2:1)N3;").unwrap();
/// assert_eq!(tree.ntip(), 4);
/// assert_eq!(tree.nnode(), 7);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree> {
    let newick = newick.as_ref().trim();
    let mut parser = ByteParser::from_str(newick);

    if !newick.ends_with(';') {
        return Err(PhyError::MalformedInput {
            reason: "missing terminating ';'".to_string(),
            position: newick.len(),
            context: String::new(),
        });
    }

    NewickReader::new().read_tree(&mut parser).inspect_err(|e| {
        log::debug!("Failed to parse Newick string: {}", e);
    })
}

/// Parses all trees of a `;`-separated list of Newick strings.
///
/// Whitespace between trees is skipped.
///
/// # Errors
/// The first parse error encountered; trees read before are dropped.
pub fn parse_all_str<S: AsRef<str>>(newick: S) -> Result<Vec<Tree>> {
    let mut parser = ByteParser::from_str(newick.as_ref());
    let mut trees = Vec::new();

    loop {
        while parser.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            parser.next_byte();
        }
        if parser.is_eof() {
            break;
        }
        let tree = NewickReader::new().read_tree(&mut parser).inspect_err(|e| {
            log::debug!(
                "Failed to parse tree {} near '{}': {}",
                trees.len() + 1,
                parser.get_context_as_string(CONTEXT_LENGTH),
                e
            );
        })?;
        trees.push(tree);
    }

    Ok(trees)
}

/// Reads a file and parses the (first) Newick tree in it.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///
/// # Errors
/// [`PhyError::Io`] if reading fails, or any error of [`parse_str`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Tree> {
    parse_str(read_to_string(path.as_ref())?)
}

/// Reads a file and parses all Newick trees in it, e.g. one written by
/// repeated [`write_file`] calls with [`WriteMode::Append`].
///
/// # Errors
/// [`PhyError::Io`] if reading fails, or any error of [`parse_all_str`].
pub fn parse_file_all<P: AsRef<Path>>(path: P) -> Result<Vec<Tree>> {
    parse_all_str(read_to_string(path.as_ref())?)
}

fn read_to_string(path: &Path) -> Result<String> {
    let mut contents = String::new();
    let mut file = File::open(path)?;
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

// =#========================================================================#=
// QUICK WRITING API
// =#========================================================================#=
/// Writes the Newick string of `tree`, followed by a newline, to a file.
///
/// # Arguments
/// * `tree` - The tree to write
/// * `path` - The file to write to; created if missing
/// * `mode` - Whether to replace or extend existing contents
///
/// # Errors
/// [`PhyError::Io`] if the file cannot be opened or written.
pub fn write_file<P: AsRef<Path>>(tree: &Tree, path: P, mode: WriteMode) -> Result<()> {
    let file = match mode {
        WriteMode::Truncate => File::create(path)?,
        WriteMode::Append => OpenOptions::new().create(true).append(true).open(path)?,
    };

    let mut writer = BufWriter::new(file);
    writer.write_all(tree.to_newick().as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
