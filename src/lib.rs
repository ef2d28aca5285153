//! Opening book best-move table converter library.
//!
//! This crate provides the core types and logic used by the `book_table`
//! converter binary and the `probe` tool:
//!
//! - `record`: Polyglot record decoding (16-byte big-endian records), with an
//!   explicit short-read result so a truncated tail ends the stream cleanly
//! - `book`: grouping of moves by position key and selection of the single
//!   heaviest move per key, preserving first-seen key order
//! - `table`: the compact 16-byte little-endian output table, plus a reader
//!   used to inspect it afterwards
//!
//! The binaries in this repository (`src/main.rs` and `src/bin/probe.rs`)
//! use these modules to write and read best-move tables.
pub mod record;
pub mod book;
pub mod table;
