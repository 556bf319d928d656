//! Arena-backed node tree.
//!
//! A [`DataTree`] owns every node it contains, including a synthetic root
//! flagged [`Flag::Root`]. Parent links are plain [`NodeId`] handles into the
//! same arena, so they never own anything: dropping the tree drops every node
//! exactly once, and removing a node drops its whole subtree with it.
//!
//! Read access goes through [`NodeRef`], a borrowed view that knows its tree
//! and can therefore walk to children and to its parent. Two `NodeRef`s are
//! equal when their names, flags, arguments and children match recursively;
//! parents and provenance are ignored, so nodes from different trees (or
//! different files) compare naturally.
//!
//! ## Examples
//!
//! ```rust
//! use esdf::{DataTree, Node};
//!
//! let mut tree = DataTree::new();
//! let ship = tree.add_child(tree.root(), Node::new("ship").with_arg("Wardragon")).unwrap();
//! tree.add_child(ship, Node::new("mass").with_arg("35")).unwrap();
//!
//! let ship = tree.node(ship).unwrap();
//! assert_eq!(ship.find_child("mass").and_then(|m| m.arg(0)), Some("35"));
//! assert_eq!(ship.parent().map(|p| p.name()), Some("--ROOT--"));
//! ```

use crate::node::{Flag, Node, NodeId, Provenance};
use crate::{Error, Result};
use generational_arena::{Arena, Index};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::trace;

/// A tree of [`Node`]s stored in a generational arena.
#[derive(Debug, Clone)]
pub struct DataTree {
    arena: Arena<Node>,
    root: Index,
}

impl Default for DataTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTree {
    /// Creates a tree holding only the synthetic root.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Node::root());
        DataTree { arena, root }
    }

    /// Handle of the synthetic root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(self.root)
    }

    /// View of the synthetic root node.
    #[must_use]
    pub fn root_node(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root(),
            node: &self.arena[self.root],
        }
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id.0)
    }

    /// Mutable access to a node's name, flag and arguments.
    ///
    /// Structure is only changed through the tree's own methods.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(id.0)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.arena.get(id.0).map(|node| NodeRef {
            tree: self,
            id,
            node,
        })
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Number of nodes in the tree, not counting the synthetic root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len() - 1
    }

    /// Returns `true` when the tree has no nodes besides its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attaches `node` as the last child of `parent` and returns its handle.
    ///
    /// Any parent or children already recorded on the payload are discarded.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is not in this tree, the name is empty, or the node
    /// carries [`Flag::Root`].
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId> {
        if !self.arena.contains(parent.0) {
            return Err(Error::UnknownNode);
        }
        if node.name.is_empty() {
            return Err(Error::EmptyName);
        }
        if node.flag == Flag::Root {
            return Err(Error::RootFlag(node.name));
        }

        node.parent = Some(parent);
        node.children.clear();
        let index = self.arena.insert(node);
        self.arena[parent.0].children.push(NodeId(index));
        Ok(NodeId(index))
    }

    /// Appends an argument to an existing node.
    ///
    /// # Errors
    ///
    /// Fails if `id` is not in this tree.
    pub fn add_arg(&mut self, id: NodeId, arg: impl Into<String>) -> Result<()> {
        let node = self.arena.get_mut(id.0).ok_or(Error::UnknownNode)?;
        node.add_arg(arg);
        Ok(())
    }

    /// Moves `child` (with its subtree) to the end of `new_parent`'s children.
    ///
    /// Ownership and the parent link change together; on error nothing moves.
    ///
    /// # Errors
    ///
    /// Fails for unknown handles, for the root, and when `new_parent` is
    /// `child` itself or one of its descendants.
    pub fn move_child(&mut self, child: NodeId, new_parent: NodeId) -> Result<()> {
        if child.0 == self.root {
            return Err(Error::MoveRoot);
        }
        if !self.arena.contains(child.0) || !self.arena.contains(new_parent.0) {
            return Err(Error::UnknownNode);
        }
        if self.is_ancestor_or_self(child, new_parent) {
            return Err(Error::cycle(
                &self.arena[child.0].name,
                &self.arena[new_parent.0].name,
            ));
        }

        if let Some(old_parent) = self.arena[child.0].parent {
            if let Some(parent) = self.arena.get_mut(old_parent.0) {
                parent.children.retain(|&id| id != child);
            }
        }
        self.arena[new_parent.0].children.push(child);
        self.arena[child.0].parent = Some(new_parent);
        trace!(child = ?child, parent = ?new_parent, "moved node");
        Ok(())
    }

    /// Detaches `id` from its parent and drops it together with its subtree.
    ///
    /// Returns the number of nodes removed.
    ///
    /// # Errors
    ///
    /// Fails for unknown handles and for the root.
    pub fn remove(&mut self, id: NodeId) -> Result<usize> {
        if id.0 == self.root {
            return Err(Error::MoveRoot);
        }
        let parent = self.arena.get(id.0).ok_or(Error::UnknownNode)?.parent;
        if let Some(parent) = parent.and_then(|p| self.arena.get_mut(p.0)) {
            parent.children.retain(|&child| child != id);
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current.0) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Pre-order iterator over every node below the root.
    pub fn iter(&self) -> Descendants<'_> {
        self.root_node().descendants()
    }

    /// Iterator over the top-level nodes (children of the root).
    pub fn top_level(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.root_node().children()
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.arena.get(id.0).and_then(|node| node.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }
}

/// A borrowed, read-only view of one node and its position in a tree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DataTree,
    id: NodeId,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn tree(&self) -> &'a DataTree {
        self.tree
    }

    /// The underlying payload.
    #[must_use]
    pub fn data(&self) -> &'a Node {
        self.node
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.node.name
    }

    #[must_use]
    pub fn flag(&self) -> Flag {
        self.node.flag
    }

    #[must_use]
    pub fn args(&self) -> &'a [String] {
        &self.node.args
    }

    #[must_use]
    pub fn arg(&self, i: usize) -> Option<&'a str> {
        self.node.args.get(i).map(String::as_str)
    }

    #[must_use]
    pub fn count_args(&self) -> usize {
        self.node.args.len()
    }

    #[must_use]
    pub fn provenance(&self) -> Option<&'a Provenance> {
        self.node.provenance.as_ref()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.node.flag == Flag::Root
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent.and_then(|id| self.tree.node(id))
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.node.children.is_empty()
    }

    #[must_use]
    pub fn count_children(&self) -> usize {
        self.node.children.len()
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node.children.iter().filter_map(move |&id| tree.node(id))
    }

    /// First child with the given name.
    #[must_use]
    pub fn find_child(&self, name: &str) -> Option<NodeRef<'a>> {
        self.children().find(|child| child.name() == name)
    }

    /// Every child with the given name, in order.
    pub fn children_named<'n>(&self, name: &'n str) -> impl Iterator<Item = NodeRef<'a>> + 'n
    where
        'a: 'n,
    {
        self.children().filter(move |child| child.name() == name)
    }

    /// Number of ancestors between this node and the synthetic root.
    ///
    /// Top-level nodes have depth 0; the root itself also reports 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(node) = current {
            if node.is_root() {
                break;
            }
            depth += 1;
            current = node.parent();
        }
        depth
    }

    /// Pre-order iterator over this node's descendants, excluding itself.
    pub fn descendants(&self) -> Descendants<'a> {
        let mut stack: Vec<NodeId> = self.node.children.clone();
        stack.reverse();
        Descendants {
            tree: self.tree,
            stack,
        }
    }

    fn children_ids(&self) -> &'a [NodeId] {
        &self.node.children
    }
}

/// Pre-order iterator returned by [`NodeRef::descendants`] and [`DataTree::iter`].
pub struct Descendants<'a> {
    tree: &'a DataTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.tree.node(id) {
                // Reverse so the leftmost child is visited first
                self.stack.extend(node.children_ids().iter().rev());
                return Some(node);
            }
        }
        None
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(*self, *other)];
        while let Some((a, b)) = pending.pop() {
            if a.name() != b.name()
                || a.flag() != b.flag()
                || a.args() != b.args()
                || a.count_children() != b.count_children()
            {
                return false;
            }
            pending.extend(a.children().zip(b.children()));
        }
        true
    }
}

impl Eq for NodeRef<'_> {}

impl Hash for NodeRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.flag().hash(state);
        self.args().hash(state);
        self.count_children().hash(state);
        for child in self.children() {
            child.hash(state);
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name())
            .field("flag", &self.flag())
            .field("args", &self.args())
            .field("children", &self.children().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node{{name: {}, args: [{}], children: {}}}",
            self.name(),
            self.args().join(", "),
            self.count_children()
        )
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Node", 4)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("flag", &self.flag())?;
        state.serialize_field("args", self.args())?;
        state.serialize_field("children", &Children(*self))?;
        state.end()
    }
}

struct Children<'a>(NodeRef<'a>);

impl Serialize for Children<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.0.children())
    }
}

impl Serialize for DataTree {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.top_level())
    }
}
