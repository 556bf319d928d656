//! # esdf
//!
//! Reading, writing and inspecting indentation-structured data files.
//!
//! ## What is the format?
//!
//! Each line of a data file is a node: a name, some arguments, and
//! optionally an `add` or `remove` flag. Lines indented under a node are its
//! children. Tokens with spaces are quoted, and `#` starts a comment.
//!
//! ```text
//! ship "Much Confused Wardragon"
//! 	mass 35
//! 	drag 0.3
//! ```
//!
//! See [`format`] for the full description.
//!
//! ## Key Features
//!
//! - **Lossless trees**: every node keeps its order, its flag, and the line
//!   it came from
//! - **Never fails on bad input**: problems are reported to a
//!   [`Diagnostics`] handle and the read goes on, so one typo does not cost
//!   a whole file
//! - **Typed access**: [`Builder`] turns arguments into numbers, with range
//!   checks for common kinds of value
//! - **Round trips**: the [`Writer`] quotes only what it must, so written
//!   files read back as equal trees
//! - **No Unsafe Code**: the tree is an index arena, so parent links are
//!   plain handles
//!
//! ## Quick Start
//!
//! ```rust
//! use esdf::{Builder, Diagnostics};
//!
//! let text = "ship \"Much Confused Wardragon\"\n\tmass 35\n\tdrag 0.3\n";
//! let tree = esdf::from_str(text);
//!
//! let ship = tree.top_level().next().unwrap();
//! assert_eq!(ship.name(), "ship");
//! assert_eq!(ship.arg(0), Some("Much Confused Wardragon"));
//!
//! let diagnostics = Diagnostics::non_terminating();
//! let builder = Builder::new(&diagnostics);
//! let mass = builder.build_int(ship.find_child("mass").unwrap(), 0, "ship");
//! assert_eq!(mass, 35);
//!
//! // Write it back
//! assert_eq!(esdf::to_string(ship).unwrap(), format!("{}\n", text));
//! ```
//!
//! ### Reading with diagnostics
//!
//! ```rust
//! use esdf::{DataTree, Diagnostics, Reader, ReadOptions};
//!
//! let diagnostics = Diagnostics::non_terminating();
//! let mut tree = DataTree::new();
//! Reader::new("outfits.txt", &diagnostics)
//!     .with_options(ReadOptions::new().ignore_node_flags())
//!     .parse_str("add outfit\n\"\" broken\n", &mut tree);
//!
//! // The empty name is reported; the rest of the file is kept
//! assert_eq!(tree.len(), 1);
//! assert_eq!(diagnostics.error_count(), 1);
//! ```
//!
//! ### Building trees with `esdf!`
//!
//! ```rust
//! use esdf::esdf;
//!
//! let tree = esdf! {
//!     ("ship", "Wardragon") {
//!         ("mass", 35)
//!     }
//! }
//! .unwrap();
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! ## Diagnostics
//!
//! Reading, writing and field access report problems instead of returning
//! them. One [`Diagnostics`] handle is shared by everything in a unit of
//! work; its [`error_count`](Diagnostics::error_count) afterwards tells
//! whether the unit succeeded. Reports are also emitted as `tracing` events,
//! so installing a subscriber shows them as they happen.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - read, inspect and write back a file
//! - **`tree_macro.rs`** - build trees with the esdf! macro
//! - **`field_access.rs`** - typed arguments and range checks
//! - **`custom_options.rs`** - indentation and flag options
//!
//! Run any example with: `cargo run --example <name>`

pub mod builder;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod macros;
pub mod node;
pub mod options;
pub mod reader;
pub mod token;
pub mod tree;
pub mod writer;

pub use builder::{Builder, FromArg, IntType, RealType};
pub use diagnostics::{Diagnostics, Severity};
pub use error::{Error, Result};
pub use node::{Flag, Node, NodeId, Provenance, ROOT_NAME};
pub use options::{ReadOptions, WriteOptions};
pub use reader::Reader;
pub use tree::{DataTree, NodeRef};
pub use writer::Writer;

use diagnostics::{messages, Arg};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use tracing::instrument;

/// Source name given to text read by [`from_str`].
const STRING_SOURCE: &str = "<string>";

/// Read a tree from text with default options.
///
/// Problems are emitted as `tracing` events and otherwise ignored; use
/// [`from_str_with`] to inspect them.
///
/// # Examples
///
/// ```rust
/// let tree = esdf::from_str("a\n\tb\nc\n");
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.top_level().count(), 2);
/// ```
#[must_use]
pub fn from_str(text: &str) -> DataTree {
    from_str_with(
        text,
        STRING_SOURCE,
        ReadOptions::default(),
        &Diagnostics::non_terminating(),
    )
}

/// Read a tree from text, naming its source and reporting to `diagnostics`.
///
/// # Examples
///
/// ```rust
/// use esdf::{Diagnostics, ReadOptions};
///
/// let diagnostics = Diagnostics::non_terminating();
/// let tree = esdf::from_str_with("a\n \tb\n", "mixed.txt", ReadOptions::new(), &diagnostics);
/// assert_eq!(tree.len(), 2);
/// assert_eq!(diagnostics.warning_count(), 1);
/// ```
#[must_use]
pub fn from_str_with(
    text: &str,
    source: impl AsRef<Path>,
    options: ReadOptions,
    diagnostics: &Diagnostics,
) -> DataTree {
    let mut tree = DataTree::new();
    Reader::new(source.as_ref(), diagnostics)
        .with_options(options)
        .parse_str(text, &mut tree);
    tree
}

/// Read a tree from a file.
///
/// A missing file gives an empty tree and one reported error.
#[must_use]
pub fn from_file(path: impl AsRef<Path>, diagnostics: &Diagnostics) -> DataTree {
    let mut tree = DataTree::new();
    Reader::new(path.as_ref(), diagnostics).parse_file(&mut tree);
    tree
}

/// Write a node and its subtree as text.
///
/// Given a tree's root, writes every top-level node instead; the root itself
/// is never written.
///
/// # Examples
///
/// ```rust
/// let tree = esdf::from_str("a \"x y\"\n\tb\n");
/// assert_eq!(esdf::to_string(tree.root_node()).unwrap(), "a \"x y\"\n\tb\n\n");
/// ```
///
/// # Errors
///
/// Never fails for in-memory output in practice; the `Result` mirrors
/// [`to_writer`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(node: NodeRef<'_>) -> Result<String> {
    to_string_with_options(node, WriteOptions::default())
}

/// Write a node and its subtree as text with custom options.
///
/// # Examples
///
/// ```rust
/// use esdf::WriteOptions;
///
/// let tree = esdf::from_str("a\n\tb\n");
/// let text = esdf::to_string_with_options(
///     tree.root_node(),
///     WriteOptions::new().with_spaces(2).without_separator(),
/// )
/// .unwrap();
/// assert_eq!(text, "a\n  b\n");
/// ```
///
/// # Errors
///
/// Returns an error if the output is not valid UTF-8.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(node: NodeRef<'_>, options: WriteOptions) -> Result<String> {
    to_string_with(node, options, &Diagnostics::non_terminating())
}

/// Write a node and its subtree as text, reporting to `diagnostics`.
///
/// # Examples
///
/// ```rust
/// use esdf::{Diagnostics, WriteOptions};
///
/// let tree = esdf::from_str("remove x\n");
/// let diagnostics = Diagnostics::non_terminating();
/// let text = esdf::to_string_with(tree.root_node(), WriteOptions::new(), &diagnostics).unwrap();
/// assert_eq!(text, "remove x\n\n");
/// assert_eq!(diagnostics.error_count(), 0);
/// ```
///
/// # Errors
///
/// Returns an error if the output is not valid UTF-8.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with(
    node: NodeRef<'_>,
    options: WriteOptions,
    diagnostics: &Diagnostics,
) -> Result<String> {
    let mut buffer = Vec::new();
    to_writer_with(&mut buffer, node, options, diagnostics)?;
    String::from_utf8(buffer).map_err(Error::io)
}

/// Write a node and its subtree to any [`io::Write`].
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W: io::Write>(writer: W, node: NodeRef<'_>) -> Result<()> {
    to_writer_with_options(writer, node, WriteOptions::default())
}

/// Write a node and its subtree to any [`io::Write`] with custom options.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W: io::Write>(
    writer: W,
    node: NodeRef<'_>,
    options: WriteOptions,
) -> Result<()> {
    to_writer_with(writer, node, options, &Diagnostics::non_terminating())
}

/// Write a node and its subtree to any [`io::Write`], reporting to
/// `diagnostics`.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with<W: io::Write>(
    writer: W,
    node: NodeRef<'_>,
    options: WriteOptions,
    diagnostics: &Diagnostics,
) -> Result<()> {
    let mut writer = Writer::with_diagnostics(writer, diagnostics).with_options(options);
    write_tree_or_node(&mut writer, node)?;
    writer.flush()
}

/// Append a node and its subtree to a file, creating the file if needed.
///
/// A file that cannot be opened or written is reported to `diagnostics` and
/// the error is returned.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or written.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn write_file(
    path: impl AsRef<Path>,
    node: NodeRef<'_>,
    diagnostics: &Diagnostics,
) -> Result<()> {
    let path = path.as_ref();
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(Error::from)
        .and_then(|file| {
            let mut writer = Writer::with_diagnostics(io::BufWriter::new(file), diagnostics);
            write_tree_or_node(&mut writer, node)?;
            writer.flush()
        });

    if let Err(err) = &result {
        let reason = err.to_string();
        diagnostics.report(
            &messages::ERROR_FILE_WRITE,
            [Arg::File(path), Arg::Text(&reason)],
        );
    }
    result
}

fn write_tree_or_node<W: io::Write>(writer: &mut Writer<'_, W>, node: NodeRef<'_>) -> Result<()> {
    if node.is_root() {
        writer.write_children(node)
    } else {
        writer.write(node, 0)
    }
}
