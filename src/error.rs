//! Error types for tree manipulation and writer I/O.
//!
//! Parsing and typed field access never fail with an [`Error`]: problems there
//! are reported through a [`Diagnostics`](crate::Diagnostics) handle and the
//! operation carries on with a usable value. The variants below cover the
//! remaining operations that can genuinely refuse to do what was asked.
//!
//! ## Error Categories
//!
//! - **Tree structure**: unknown handles, empty names, illegal moves
//! - **I/O**: failures of the underlying writer
//!
//! ## Examples
//!
//! ```rust
//! use esdf::{DataTree, Error, Node};
//!
//! let mut tree = DataTree::new();
//! let result = tree.add_child(tree.root(), Node::new(""));
//! assert!(matches!(result, Err(Error::EmptyName)));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents every failure a fallible tree or writer operation can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// IO error while writing output
    #[error("IO error: {0}")]
    Io(String),

    /// The handle does not refer to a live node of this tree
    #[error("Unknown node handle: the node does not exist in this tree")]
    UnknownNode,

    /// Node names must be non-empty
    #[error("Node names must not be empty")]
    EmptyName,

    /// Only the synthetic tree root may carry the ROOT flag
    #[error("Node `{0}` carries the ROOT flag and cannot be attached to a tree")]
    RootFlag(String),

    /// The synthetic root cannot be moved or removed
    #[error("The root node of a tree cannot be moved or removed")]
    MoveRoot,

    /// Moving a node under one of its own descendants would create a cycle
    #[error("Cannot move `{node}` under its own descendant `{target}`")]
    Cycle { node: String, target: String },
}

impl Error {
    /// Creates an I/O error from anything displayable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use esdf::Error;
    ///
    /// let err = Error::io("disk full");
    /// assert_eq!(err.to_string(), "IO error: disk full");
    /// ```
    pub fn io<T: fmt::Display>(msg: T) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a cycle error naming the node being moved and the refused target.
    pub fn cycle(node: &str, target: &str) -> Self {
        Error::Cycle {
            node: node.to_string(),
            target: target.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
