//! Writing node trees as text.
//!
//! The [`Writer`] emits one line per node in pre-order: indentation, the flag
//! keyword if any, then the name and arguments, each quoted only as much as
//! the tokenizer needs to read it back as one token.
//!
//! ## Quoting
//!
//! | Token | Written as |
//! |-------|------------|
//! | no space, nothing special | bare: `35` |
//! | space, no `"` | `"Much Confused Wardragon"` |
//! | space and `"` | `` `say "hi"` `` |
//! | empty, contains `#`, starts with a quote or whitespace | quoted as above |
//!
//! A token that needs quoting but holds both `"` and a backtick, or any token
//! holding a line break, has no faithful form. It is written as above anyway
//! and reported as a warning.
//!
//! ## Examples
//!
//! ```rust
//! use esdf::{DataTree, Node, Writer};
//!
//! let mut tree = DataTree::new();
//! let ship = tree.add_child(tree.root(), Node::new("ship").with_arg("Much Confused Wardragon")).unwrap();
//! tree.add_child(ship, Node::new("mass").with_arg("35")).unwrap();
//!
//! let mut out = Vec::new();
//! Writer::new(&mut out).write(tree.node(ship).unwrap(), 0).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "ship \"Much Confused Wardragon\"\n\tmass 35\n\n"
//! );
//! ```

use crate::diagnostics::{messages, Arg, Diagnostics, Message};
use crate::node::Flag;
use crate::options::WriteOptions;
use crate::tree::NodeRef;
use crate::Result;
use std::borrow::Cow;
use std::io;

/// Writes nodes to any [`io::Write`] sink.
pub struct Writer<'d, W> {
    out: W,
    options: WriteOptions,
    diagnostics: Option<&'d Diagnostics>,
}

impl<W: io::Write> Writer<'static, W> {
    /// Creates a writer with default options.
    ///
    /// Reports from this writer are emitted as `tracing` events but counted
    /// on a throwaway handle, so no caller can read them back. Use
    /// [`Writer::with_diagnostics`] to count them.
    pub fn new(out: W) -> Self {
        Writer {
            out,
            options: WriteOptions::default(),
            diagnostics: None,
        }
    }
}

impl<'d, W: io::Write> Writer<'d, W> {
    /// Creates a writer that reports to `diagnostics`.
    pub fn with_diagnostics(out: W, diagnostics: &'d Diagnostics) -> Self {
        Writer {
            out,
            options: WriteOptions::default(),
            diagnostics: Some(diagnostics),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes `node` and its subtree, `indent_level` units deep.
    ///
    /// A node flagged [`Flag::Root`] is reported and skipped. After a depth-0
    /// subtree a blank separator line follows, unless disabled in the options.
    ///
    /// # Errors
    ///
    /// Returns an error only when the underlying sink fails.
    pub fn write(&mut self, node: NodeRef<'_>, indent_level: usize) -> Result<()> {
        if node.is_root() {
            self.report(&messages::ERROR_NODE_WRITE_ROOT, [Arg::Node(node)]);
            return Ok(());
        }

        self.write_subtree(node, indent_level)?;
        if indent_level == 0 && self.options.separate_top_level {
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Writes every child of `node` at depth 0.
    ///
    /// This is how a whole parsed tree is written back: pass its root.
    ///
    /// # Errors
    ///
    /// Returns an error only when the underlying sink fails.
    pub fn write_children(&mut self, node: NodeRef<'_>) -> Result<()> {
        for child in node.children() {
            self.write(child, 0)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn write_subtree(&mut self, node: NodeRef<'_>, indent_level: usize) -> Result<()> {
        // Explicit stack so deep trees cannot exhaust the call stack
        let mut pending = vec![(node, indent_level)];
        while let Some((node, level)) = pending.pop() {
            self.check_representable(node);

            let mut line = self.options.indent.repeat(level);
            line.push_str(&node_to_line(node));
            line.push('\n');
            self.out.write_all(line.as_bytes())?;

            let children: Vec<_> = node.children().collect();
            pending.extend(children.into_iter().rev().map(|child| (child, level + 1)));
        }
        Ok(())
    }

    fn check_representable(&self, node: NodeRef<'_>) {
        if node.flag() == Flag::Normal && Flag::from_keyword(node.name()).is_some() {
            self.report(&messages::WARN_NODE_NAMED_LIKE_FLAG, [Arg::Node(node)]);
        }
        let tokens = std::iter::once(node.name()).chain(node.args().iter().map(String::as_str));
        for token in tokens.filter(|t| !is_representable(t)) {
            self.report(
                &messages::WARN_UNREPRESENTABLE_TOKEN,
                [Arg::Text(token), Arg::Node(node)],
            );
        }
    }

    fn report<'a, I>(&self, message: &Message, args: I)
    where
        I: IntoIterator<Item = Arg<'a>>,
    {
        match self.diagnostics {
            Some(diagnostics) => {
                diagnostics.report(message, args);
            }
            None => {
                Diagnostics::non_terminating().report(message, args);
            }
        }
    }
}

/// Formats one node as a line, without indentation, children or line break.
///
/// ```rust
/// use esdf::{DataTree, Flag, Node};
/// use esdf::writer::node_to_line;
///
/// let mut tree = DataTree::new();
/// let id = tree
///     .add_child(tree.root(), Node::new("outfit").with_flag(Flag::Add).with_arg("Hyperdrive"))
///     .unwrap();
/// assert_eq!(node_to_line(tree.node(id).unwrap()), "add outfit Hyperdrive");
/// ```
#[must_use]
pub fn node_to_line(node: NodeRef<'_>) -> String {
    let mut line = String::new();
    if let Some(keyword) = node.flag().keyword() {
        line.push_str(keyword);
        line.push(' ');
    }
    line.push_str(&quote_word(node.name()));
    for arg in node.args() {
        line.push(' ');
        line.push_str(&quote_word(arg));
    }
    line
}

/// Quotes a token so the tokenizer reads it back as exactly one token.
///
/// ```rust
/// use esdf::writer::quote_word;
///
/// assert_eq!(quote_word("35"), "35");
/// assert_eq!(quote_word("hit force"), "\"hit force\"");
/// assert_eq!(quote_word("say \"hi\" now"), "`say \"hi\" now`");
/// assert_eq!(quote_word(""), "\"\"");
/// ```
#[must_use]
pub fn quote_word(word: &str) -> Cow<'_, str> {
    if !needs_quotes(word) {
        Cow::Borrowed(word)
    } else if word.contains('"') {
        Cow::Owned(format!("`{}`", word))
    } else {
        Cow::Owned(format!("\"{}\"", word))
    }
}

#[inline]
fn needs_quotes(word: &str) -> bool {
    word.is_empty()
        || word.contains(' ')
        || word.contains('#')
        || word.starts_with('"')
        || word.starts_with('`')
        || word.starts_with(char::is_whitespace)
        || word.ends_with(char::is_whitespace)
}

/// Whether [`quote_word`] output reads back as the same single token.
#[must_use]
pub fn is_representable(word: &str) -> bool {
    if word.contains('\n') || word.contains('\r') {
        return false;
    }
    !(needs_quotes(word) && word.contains('"') && word.contains('`'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::token::tokenize;
    use crate::{DataTree, Node};

    fn write_to_string(tree: &DataTree, options: WriteOptions) -> String {
        let mut out = Vec::new();
        Writer::new(&mut out)
            .with_options(options)
            .write_children(tree.root_node())
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_quote_word_inverse_of_tokenize() {
        for word in [
            "plain",
            "two words",
            "say \"hi\" there",
            "",
            "#hash",
            "a#b",
            "\"lead",
            "`lead",
            "\tlead",
            "trail\t",
            "mid\"quote",
            "0.3",
        ] {
            let quoted = quote_word(word);
            assert_eq!(tokenize(&quoted), [word], "round trip of {:?}", word);
        }
    }

    #[test]
    fn test_unrepresentable_tokens() {
        assert!(!is_representable("a \"b\" `c`"));
        assert!(!is_representable("line\nbreak"));
        assert!(is_representable("a\"b`c"));
    }

    #[test]
    fn test_nested_layout_and_separator() {
        let mut tree = DataTree::new();
        let a = tree.add_child(tree.root(), Node::new("a")).unwrap();
        let b = tree.add_child(a, Node::new("b").with_arg("x y")).unwrap();
        tree.add_child(b, Node::new("c")).unwrap();
        tree.add_child(tree.root(), Node::new("d")).unwrap();

        assert_eq!(
            write_to_string(&tree, WriteOptions::new()),
            "a\n\tb \"x y\"\n\t\tc\n\nd\n\n"
        );
        assert_eq!(
            write_to_string(&tree, WriteOptions::new().with_spaces(2).without_separator()),
            "a\n  b \"x y\"\n    c\nd\n"
        );
    }

    #[test]
    fn test_flags_are_written() {
        let mut tree = DataTree::new();
        tree.add_child(tree.root(), Node::new("x").with_flag(Flag::Remove))
            .unwrap();
        assert_eq!(
            write_to_string(&tree, WriteOptions::new().without_separator()),
            "remove x\n"
        );
    }

    #[test]
    fn test_nonzero_indent_level_has_no_separator() {
        let mut tree = DataTree::new();
        let id = tree.add_child(tree.root(), Node::new("x")).unwrap();
        let mut out = Vec::new();
        Writer::new(&mut out).write(tree.node(id).unwrap(), 2).unwrap();
        assert_eq!(out, b"\t\tx\n");
    }

    #[test]
    fn test_root_is_rejected() {
        let tree = DataTree::new();
        let diagnostics = Diagnostics::non_terminating();
        let mut out = Vec::new();
        Writer::with_diagnostics(&mut out, &diagnostics)
            .write(tree.root_node(), 0)
            .unwrap();

        assert!(out.is_empty());
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(
            diagnostics.records()[0].text,
            "--ROOT-- is a root node and should not be written."
        );
    }

    #[test]
    fn test_warnings_for_unfaithful_output() {
        let mut tree = DataTree::new();
        tree.add_child(tree.root(), Node::new("add").with_arg("`a` \"b\" c"))
            .unwrap();
        let diagnostics = Diagnostics::non_terminating();
        let mut out = Vec::new();
        Writer::with_diagnostics(&mut out, &diagnostics)
            .write_children(tree.root_node())
            .unwrap();

        assert_eq!(diagnostics.count(Severity::Warn), 2);
        assert_eq!(diagnostics.error_count(), 0);
    }
}
