//! Single-pass Newick reader.
//!
//! [NewickReader] walks the input byte by byte, creating nodes in a
//! [NodeGraph] as parentheses open and commas add siblings, and hands the
//! finished graph to [Tree::build]. On any error the graph is dropped with
//! every node allocated so far.

use crate::error::{PhyError, Result};
use crate::model::{NodeGraph, NodeId, Tree};
use crate::newick::defs::{
    BRANCH_LENGTH_BYTES, BRANCH_LENGTH_DELIMITERS, LABEL_DELIMITERS, LABEL_FORBIDDEN,
};
use crate::parser::ByteParser;

// =#========================================================================#=
// NEWICK READER
// =#========================================================================#=
/// Reader for one Newick tree, starting at the current parser position and
/// stopping right after the terminating `;`.
pub(crate) struct NewickReader {
    graph: NodeGraph,
    root: NodeId,
    current: NodeId,
    nnode: usize,
    ntip: usize,
}

impl NewickReader {
    pub(crate) fn new() -> Self {
        let mut graph = NodeGraph::new();
        let root = graph.alloc();
        NewickReader {
            graph,
            root,
            current: root,
            nnode: 1,
            ntip: 0,
        }
    }

    /// Reads one tree from `parser`.
    ///
    /// # Errors
    /// * [PhyError::MalformedInput] - unbalanced parentheses or notes,
    ///   misplaced `(`, input ending before `;`, invalid or out-of-range number
    /// * [PhyError::InvalidCharacter] - forbidden byte in a label or branch length
    /// * [PhyError::Unifurcation] - a node closed with a single descendant
    pub(crate) fn read_tree(mut self, parser: &mut ByteParser<'_>) -> Result<Tree> {
        let start = parser.position();

        loop {
            let Some(byte) = parser.peek() else {
                return Err(parser.malformed("missing terminating ';'"));
            };

            match byte {
                b';' => {
                    parser.next_byte();
                    break;
                }
                b'(' => {
                    let at_start = parser.position() == start;
                    if !at_start && !matches!(parser.prev_byte(), Some(b'(') | Some(b',')) {
                        return Err(parser.malformed("'(' must follow '(' or ','"));
                    }
                    parser.next_byte();
                    self.descend();
                }
                b',' => {
                    let Some(ancestor) = self.graph[self.current].ancestor() else {
                        return Err(parser.malformed("',' outside of parentheses"));
                    };
                    parser.next_byte();
                    self.close_current();
                    let sibling = self.graph.alloc();
                    self.graph.add_child(ancestor, sibling);
                    self.current = sibling;
                    self.nnode += 1;
                }
                b')' => {
                    let Some(ancestor) = self.graph[self.current].ancestor() else {
                        return Err(parser.malformed("unbalanced ')'"));
                    };
                    parser.next_byte();
                    self.close_current();
                    self.current = ancestor;
                    if self.graph[ancestor].ndesc() < 2 {
                        return Err(parser.unifurcation());
                    }
                }
                _ => {
                    self.read_label(parser)?;
                    self.read_note(parser)?;
                    self.read_branch_length(parser)?;
                }
            }
        }

        if self.current != self.root {
            return Err(parser.malformed("unbalanced parentheses, reached ';' inside a clade"));
        }
        if self.graph[self.root].ndesc() < 2 {
            return Err(parser.unifurcation());
        }

        Tree::build(self.graph, self.root, self.nnode, self.ntip)
    }

    /// Opens a new clade: the new node becomes the current one.
    fn descend(&mut self) {
        let child = self.graph.alloc();
        self.graph.add_child(self.current, child);
        self.current = child;
        self.nnode += 1;
    }

    /// Counts the current node as a tip if nothing was opened below it.
    fn close_current(&mut self) {
        if self.graph[self.current].is_tip() {
            self.ntip += 1;
        }
    }

    /// Reads an optional label, stopping before `:` `,` `)` `;` or `[`.
    fn read_label(&mut self, parser: &mut ByteParser<'_>) -> Result<()> {
        let start = parser.position();
        loop {
            match parser.peek() {
                None => return Err(parser.malformed("premature end of input in label")),
                Some(b) if LABEL_DELIMITERS.contains(&b) => break,
                Some(b) if LABEL_FORBIDDEN.contains(&b) => {
                    parser.next_byte();
                    return Err(parser.invalid_character());
                }
                Some(_) => {
                    parser.next_byte();
                }
            }
        }

        let label = parser.slice_from(start);
        if !label.is_empty() {
            self.graph[self.current].set_label(String::from_utf8_lossy(label));
        }
        Ok(())
    }

    /// Reads an optional `[note]`; notes may nest.
    fn read_note(&mut self, parser: &mut ByteParser<'_>) -> Result<()> {
        if !parser.consume_if(b'[') {
            return Ok(());
        }

        let start = parser.position();
        let mut depth = 1;
        while depth > 0 {
            match parser.next_byte() {
                None => return Err(parser.malformed("unclosed note")),
                Some(b'[') => depth += 1,
                Some(b']') => depth -= 1,
                Some(_) => {}
            }
        }

        // Everything up to, but excluding, the closing bracket
        let note = parser.slice_from(start);
        let note = &note[..note.len() - 1];
        if !note.is_empty() {
            self.graph[self.current].set_note(String::from_utf8_lossy(note));
        }
        Ok(())
    }

    /// Reads an optional `:length`.
    fn read_branch_length(&mut self, parser: &mut ByteParser<'_>) -> Result<()> {
        if !parser.consume_if(b':') {
            return Ok(());
        }

        let start = parser.position();
        loop {
            match parser.peek() {
                None => return Err(parser.malformed("premature end of input in branch length")),
                Some(b) if BRANCH_LENGTH_DELIMITERS.contains(&b) => break,
                Some(b) if BRANCH_LENGTH_BYTES.contains(&b) => {
                    parser.next_byte();
                }
                Some(_) => {
                    parser.next_byte();
                    return Err(parser.invalid_character());
                }
            }
        }

        let literal = String::from_utf8_lossy(parser.slice_from(start));
        if !literal.is_empty() {
            let malformed = |reason: String| PhyError::MalformedInput {
                reason,
                position: start,
                context: literal.to_string(),
            };
            let length = literal
                .parse::<f64>()
                .map_err(|_| malformed(format!("invalid branch length '{}'", literal)))?;
            // Overflowing literals parse to infinity, which cannot be written back
            if !length.is_finite() {
                return Err(malformed(format!("branch length out of range '{}'", literal)));
            }
            self.graph[self.current].set_branch_length(length);
        }
        Ok(())
    }
}
