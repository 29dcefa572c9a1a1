//! Low-level byte parsing infrastructure for the Newick reader.

pub mod byte_parser;

pub use byte_parser::ByteParser;
