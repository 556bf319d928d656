//! The data file format.
//!
//! This module documents the text format read by [`Reader`](crate::Reader)
//! and written by [`Writer`](crate::Writer). It has no items of its own.
//!
//! # Overview
//!
//! A data file is a tree of nodes, one node per line. Each node has a name,
//! zero or more arguments, an optional flag, and children given by the lines
//! indented beneath it.
//!
//! ```text
//! # Ships
//! ship "Much Confused Wardragon"
//! 	mass 35
//! 	drag 0.3
//! 	description "A ship built for combat."
//! 	add outfit Hyperdrive
//! ```
//!
//! # Lines
//!
//! ```text
//! [add|remove] name [arg]* [# comment]
//! ```
//!
//! - Tokens are separated by spaces.
//! - An unquoted `#` starts a comment that runs to the end of the line.
//! - A line with no tokens (empty, whitespace only, or comment only) is skipped
//!   and has no effect on nesting.
//! - A line holding only `add` or `remove` is not a node. It still takes part
//!   in indentation, so a deeper line that follows it does not nest.
//!
//! ## Tokens
//!
//! | Form | Meaning | Example |
//! |------|---------|---------|
//! | bare | runs to the next space or `#` | `35` |
//! | `"…"` | runs to the next `"`, may hold spaces and `#` | `"hit force"` |
//! | `` `…` `` | runs to the next backtick, may also hold `"` | `` `say "hi"` `` |
//!
//! The delimiters are not part of the token. A quoted token the line ends
//! inside is kept as it is. There are no escapes, so a token that needs
//! quoting and holds both `"` and a backtick cannot be written faithfully.
//!
//! ## Flags
//!
//! A first token of exactly `add` or `remove` is a flag, and the next token
//! is the name. Flags tell a consumer merging this file over another whether
//! the node adds to or removes from the base data. Flag recognition can be
//! turned off with [`ReadOptions::ignore_node_flags`](crate::ReadOptions::ignore_node_flags),
//! in which case `add` and `remove` are ordinary names.
//!
//! # Indentation
//!
//! Leading tabs and spaces each count as one unit of depth.
//!
//! - A line deeper than the line before it becomes that line's child.
//! - A line at or above the depth of an open level closes every level deeper
//!   than it, and becomes a sibling at the innermost level still open.
//! - The first indentation seen becomes the indent unit. Mixing tabs and
//!   spaces in it, or opening a later level with different whitespace, is
//!   reported as a warning. Nesting is decided by the counts alone.
//!
//! ```text
//! a
//!     b          # child of a
//!         c      # child of b
//!   d            # closes both levels: sibling of a
//! ```
//!
//! # Writing
//!
//! The writer emits the same grammar with one indent unit per level (a tab by
//! default), quotes only the tokens that need it, and follows each top-level
//! node's subtree with a blank line. Reading back what was written gives an
//! equal tree whenever every token is representable and no unflagged node is
//! named `add` or `remove`.
//!
//! # Diagnostics
//!
//! Malformed input never stops a read. The reader skips what it cannot use,
//! reports it to a [`Diagnostics`](crate::Diagnostics) handle, and keeps every
//! node read so far.
//!
//! | Problem | Severity |
//! |---------|----------|
//! | file missing or unreadable | error |
//! | node with an empty name | error |
//! | mixed or inconsistent indentation | warning |
//! | missing or malformed argument in a [`Builder`](crate::Builder) | error |
//! | argument outside its documented range | warning |
