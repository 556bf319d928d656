//! Node payloads stored in a [`DataTree`](crate::DataTree).
//!
//! A [`Node`] is one line of a data file: a name, an optional flag, and an
//! ordered list of arguments. Structure (parent and children) is owned by the
//! tree, which is why those fields are only readable from here.
//!
//! ## Examples
//!
//! ```rust
//! use esdf::{Flag, Node};
//!
//! let node = Node::new("outfit")
//!     .with_flag(Flag::Add)
//!     .with_arg("Hyperdrive")
//!     .with_arg("2");
//!
//! assert_eq!(node.name(), "outfit");
//! assert_eq!(node.args(), ["Hyperdrive", "2"]);
//! ```

use crate::{Error, Result};
use generational_arena::Index;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Name given to the synthetic root of every tree.
pub const ROOT_NAME: &str = "--ROOT--";

/// Handle to a node inside a [`DataTree`](crate::DataTree).
///
/// Handles are only meaningful for the tree that issued them. A handle to a
/// removed node never aliases a later node of the same tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) Index);

/// The flag attached to a node, controlling how it merges into a base document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    /// No special treatment.
    #[default]
    Normal,
    /// Always results in the addition of an object, even where it would usually overwrite one.
    Add,
    /// Results in the removal of the associated object.
    Remove,
    /// The synthetic tree root. Never parsed and never written.
    Root,
}

impl Flag {
    /// The keyword that introduces this flag on a line, if it has one.
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Flag::Add => Some("add"),
            Flag::Remove => Some("remove"),
            Flag::Normal | Flag::Root => None,
        }
    }

    /// Maps a leading token to its flag, if the token is a flag keyword.
    #[must_use]
    pub fn from_keyword(token: &str) -> Option<Flag> {
        match token {
            "add" => Some(Flag::Add),
            "remove" => Some(Flag::Remove),
            _ => None,
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Flag::Normal => "NORMAL",
            Flag::Add => "ADD",
            Flag::Remove => "REMOVE",
            Flag::Root => "ROOT",
        };
        f.write_str(s)
    }
}

/// Where a parsed node came from: a 1-based line number and a source identifier.
///
/// Provenance is diagnostic metadata only and never takes part in equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    pub line: usize,
    pub source: PathBuf,
}

impl Provenance {
    pub fn new(line: usize, source: impl Into<PathBuf>) -> Self {
        Provenance {
            line,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} of {}", self.line, self.source.display())
    }
}

/// One entry of the data tree.
///
/// Build a payload with [`Node::new`] and the `with_*` methods, then attach it
/// with [`DataTree::add_child`](crate::DataTree::add_child).
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) flag: Flag,
    pub(crate) args: Vec<String>,
    pub(crate) provenance: Option<Provenance>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// Creates a detached node with [`Flag::Normal`] and no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            flag: Flag::Normal,
            args: Vec::new(),
            provenance: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn root() -> Self {
        Node::new(ROOT_NAME).with_flag(Flag::Root)
    }

    #[must_use]
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flag = flag;
        self
    }

    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the node.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::EmptyName`] for an empty name, leaving the node
    /// unchanged.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        self.name = name;
        Ok(())
    }

    #[must_use]
    pub fn flag(&self) -> Flag {
        self.flag
    }

    /// Changes the flag. The ROOT flag belongs to the synthetic root only,
    /// so requests to set or clear it are ignored.
    pub fn set_flag(&mut self, flag: Flag) {
        if self.flag != Flag::Root && flag != Flag::Root {
            self.flag = flag;
        }
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    pub fn add_arg(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    pub fn set_args(&mut self, args: Vec<String>) {
        self.args = args;
    }

    #[must_use]
    pub fn count_args(&self) -> usize {
        self.args.len()
    }

    #[must_use]
    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_keywords() {
        assert_eq!(Flag::from_keyword("add"), Some(Flag::Add));
        assert_eq!(Flag::from_keyword("remove"), Some(Flag::Remove));
        assert_eq!(Flag::from_keyword("Add"), None);
        assert_eq!(Flag::Add.keyword(), Some("add"));
        assert_eq!(Flag::Root.keyword(), None);
    }

    #[test]
    fn test_root_flag_is_sticky() {
        let mut root = Node::root();
        root.set_flag(Flag::Add);
        assert_eq!(root.flag(), Flag::Root);

        let mut node = Node::new("ship");
        node.set_flag(Flag::Root);
        assert_eq!(node.flag(), Flag::Normal);
        node.set_flag(Flag::Remove);
        assert_eq!(node.flag(), Flag::Remove);
    }

    #[test]
    fn test_empty_rename_is_rejected() {
        let mut node = Node::new("ship");
        assert!(matches!(node.set_name(""), Err(Error::EmptyName)));
        assert_eq!(node.name(), "ship");
        node.set_name("outfit").unwrap();
        assert_eq!(node.name(), "outfit");
    }

    #[test]
    fn test_provenance_display() {
        let p = Provenance::new(12, "data/ships.txt");
        assert_eq!(p.to_string(), "line 12 of data/ships.txt");
    }

    #[test]
    fn test_builder_methods() {
        let node = Node::new("sprite")
            .with_args(["ship/wardragon", "0.5"])
            .with_provenance(Provenance::new(3, "a.txt"));
        assert_eq!(node.count_args(), 2);
        assert_eq!(node.arg(1), Some("0.5"));
        assert_eq!(node.arg(2), None);
        assert_eq!(node.provenance().map(|p| p.line), Some(3));
    }
}
