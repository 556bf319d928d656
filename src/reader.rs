//! Reading text into a node tree.
//!
//! The [`Reader`] walks a line source once, tracking indentation with a stack
//! of open levels, and attaches one node per non-blank line to the tree it is
//! given. Problems are reported to a [`Diagnostics`] handle; whatever was read
//! before a failure stays in the tree.
//!
//! ## Indentation
//!
//! Tabs and spaces each count as one unit. A line indented deeper than the
//! innermost open level nests under the previous node; a line at or above an
//! open level closes every deeper level first. The first indentation seen
//! becomes the canonical unit: mixing tabs and spaces inside it, or later
//! opening a level with a different run of whitespace, is reported as a
//! warning, but nesting only ever looks at the counts.
//!
//! ## Examples
//!
//! ```rust
//! use esdf::{DataTree, Diagnostics, Reader};
//!
//! let text = "ship \"Wardragon\"\n\tmass 35\n\tdrag 0.3\n";
//! let diagnostics = Diagnostics::non_terminating();
//! let mut tree = DataTree::new();
//! Reader::new("ships.txt", &diagnostics).parse_str(text, &mut tree);
//!
//! let ship = tree.top_level().next().unwrap();
//! assert_eq!(ship.arg(0), Some("Wardragon"));
//! assert_eq!(ship.count_children(), 2);
//! assert_eq!(diagnostics.error_count(), 0);
//! ```

use crate::diagnostics::{messages, Arg, Diagnostics};
use crate::node::{Node, NodeId, Provenance};
use crate::options::ReadOptions;
use crate::token::{count_leading_whitespace, indent_substring, is_blank, split_line};
use crate::DataTree;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Builds node trees from lines of text.
///
/// A reader is tied to one source identifier, which is recorded as the
/// provenance of every node it creates and used in its reports.
#[derive(Debug, Clone)]
pub struct Reader<'d> {
    source: PathBuf,
    options: ReadOptions,
    diagnostics: &'d Diagnostics,
}

impl<'d> Reader<'d> {
    pub fn new(source: impl Into<PathBuf>, diagnostics: &'d Diagnostics) -> Self {
        Reader {
            source: source.into(),
            options: ReadOptions::default(),
            diagnostics,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Opens the source as a file and reads it into the tree's root.
    ///
    /// A file that cannot be opened is reported as an error and leaves the
    /// tree untouched.
    #[instrument(level = "debug", skip(self, tree), fields(source = %self.source.display()))]
    pub fn parse_file(&self, tree: &mut DataTree) {
        let root = tree.root();
        self.parse_file_into(tree, root);
    }

    /// Like [`parse_file`](Self::parse_file), attaching top-level nodes under `parent`.
    pub fn parse_file_into(&self, tree: &mut DataTree, parent: NodeId) {
        match File::open(&self.source) {
            Ok(file) => self.parse_lines_into(BufReader::new(file), tree, parent),
            Err(err) => {
                debug!(error = %err, "could not open source");
                self.diagnostics
                    .report(&messages::ERROR_FILE_DNE, [Arg::File(&self.source)]);
            }
        }
    }

    /// Reads in-memory text into the tree's root.
    pub fn parse_str(&self, text: &str, tree: &mut DataTree) {
        let root = tree.root();
        self.parse(text.lines().map(|line| Ok(line.to_string())), tree, root);
    }

    /// Reads every line of `reader` into the tree's root.
    pub fn parse_lines<R: BufRead>(&self, reader: R, tree: &mut DataTree) {
        let root = tree.root();
        self.parse_lines_into(reader, tree, root);
    }

    /// Reads every line of `reader`, attaching top-level nodes under `parent`.
    pub fn parse_lines_into<R: BufRead>(&self, reader: R, tree: &mut DataTree, parent: NodeId) {
        self.parse(reader.lines(), tree, parent);
    }

    /// Reads a sequence of lines, attaching top-level nodes under `parent`.
    ///
    /// A line that fails to read is reported and ends the parse; nodes added
    /// before it remain.
    pub fn parse<I>(&self, lines: I, tree: &mut DataTree, parent: NodeId)
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        if !tree.contains(parent) {
            self.diagnostics.report(
                &messages::ERROR_GENERIC,
                [Arg::File(&self.source)],
            );
            return;
        }

        let mut state = IndentState::new(parent);
        let mut added = 0usize;
        let mut line_count = 0usize;

        for (index, line) in lines.into_iter().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    let read = index.to_string();
                    let err = err.to_string();
                    self.diagnostics.report(
                        &messages::ERROR_FILE_READ,
                        [Arg::Text(&read), Arg::Text(&err), Arg::File(&self.source)],
                    );
                    break;
                }
            };
            let number = index + 1;
            line_count = number;

            if is_blank(&line) {
                continue;
            }

            let indent = count_leading_whitespace(&line);
            let base = state.depth();
            let added_indent = indent_substring(&line, base);
            let mut warned = false;

            if state.unit.is_none() && !added_indent.is_empty() {
                state.unit = Some(added_indent.to_string());
                if added_indent.contains(' ') && added_indent.contains('\t') {
                    self.warn_mixed(number);
                    warned = true;
                }
            }

            match state.current {
                Some(current) if indent > base => {
                    if !warned && state.unit.as_deref() != Some(added_indent) {
                        self.warn_mixed(number);
                    }
                    state.open(current, indent);
                }
                _ => state.close_to(indent),
            }

            state.current = self.make_node(&line, number, tree, state.parent());
            if state.current.is_some() {
                added += 1;
            }
        }

        debug!(
            source = %self.source.display(),
            lines = line_count,
            nodes = added,
            "parsed source"
        );
    }

    fn make_node(
        &self,
        line: &str,
        number: usize,
        tree: &mut DataTree,
        parent: NodeId,
    ) -> Option<NodeId> {
        let parts = split_line(line, self.options.check_flags)?;
        let node = Node::new(parts.name)
            .with_flag(parts.flag)
            .with_args(parts.args)
            .with_provenance(Provenance::new(number, self.source.clone()));

        match tree.add_child(parent, node) {
            Ok(id) => Some(id),
            Err(err) => {
                let number = number.to_string();
                let err = err.to_string();
                self.diagnostics.report(
                    &messages::ERROR_NODE_PARSE,
                    [Arg::Text(&number), Arg::Text(&err), Arg::File(&self.source)],
                );
                None
            }
        }
    }

    fn warn_mixed(&self, number: usize) {
        let number = number.to_string();
        self.diagnostics.report(
            &messages::WARN_MIXED_WHITESPACE,
            [Arg::Text(&number), Arg::File(&self.source)],
        );
    }
}

/// Open indentation levels while reading.
///
/// `parents` and `depths` run in parallel; `depths` always holds one more
/// entry, the depth of the base level, which is never closed.
struct IndentState {
    base: NodeId,
    parents: Vec<NodeId>,
    depths: Vec<usize>,
    current: Option<NodeId>,
    unit: Option<String>,
}

impl IndentState {
    fn new(base: NodeId) -> Self {
        IndentState {
            base,
            parents: Vec::new(),
            depths: vec![0],
            current: None,
            unit: None,
        }
    }

    fn depth(&self) -> usize {
        self.depths.last().copied().unwrap_or(0)
    }

    fn parent(&self) -> NodeId {
        self.parents.last().copied().unwrap_or(self.base)
    }

    fn open(&mut self, node: NodeId, depth: usize) {
        self.parents.push(node);
        self.depths.push(depth);
    }

    fn close_to(&mut self, indent: usize) {
        while self.depths.len() > 1 && self.depth() > indent {
            self.depths.pop();
            self.parents.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::Flag;

    fn read(text: &str) -> (DataTree, Diagnostics) {
        let diagnostics = Diagnostics::non_terminating();
        let mut tree = DataTree::new();
        Reader::new("test.txt", &diagnostics).parse_str(text, &mut tree);
        (tree, diagnostics)
    }

    fn names(tree: &DataTree) -> Vec<(usize, &str)> {
        tree.iter().map(|n| (n.depth(), n.name())).collect()
    }

    #[test]
    fn test_nesting_and_closing_levels() {
        let (tree, diagnostics) = read("a\n\tb\n\t\tc\n\td\ne\n");
        assert_eq!(
            names(&tree),
            vec![(0, "a"), (1, "b"), (2, "c"), (1, "d"), (0, "e")]
        );
        assert_eq!(diagnostics.records().len(), 0);
    }

    #[test]
    fn test_dedent_past_several_levels() {
        let (tree, _) = read("a\n  b\n    c\n      d\n  e\n");
        assert_eq!(
            names(&tree),
            vec![(0, "a"), (1, "b"), (2, "c"), (3, "d"), (1, "e")]
        );
    }

    #[test]
    fn test_uneven_dedent_closes_deeper_levels() {
        // `d` is shallower than every open level, so all of them close
        let (tree, _) = read("a\n    b\n        c\n  d\n");
        assert_eq!(names(&tree), vec![(0, "a"), (1, "b"), (2, "c"), (0, "d")]);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let (tree, _) = read("# header\n\na # trailing\n\n\t# indented comment\n\tb\n");
        assert_eq!(names(&tree), vec![(0, "a"), (1, "b")]);
    }

    #[test]
    fn test_first_line_indented_attaches_to_root() {
        let (tree, _) = read("\t\ta\nb\n");
        assert_eq!(names(&tree), vec![(0, "a"), (0, "b")]);
    }

    #[test]
    fn test_provenance_recorded() {
        let (tree, _) = read("\n# c\nship\n\tmass 3\n");
        let mass = tree.iter().find(|n| n.name() == "mass").unwrap();
        let provenance = mass.provenance().unwrap();
        assert_eq!(provenance.line, 4);
        assert_eq!(provenance.source, PathBuf::from("test.txt"));
    }

    #[test]
    fn test_flags() {
        let (tree, _) = read("add outfit Hyperdrive\nremove ship Wardragon\nplain\n");
        let flags: Vec<_> = tree.iter().map(|n| (n.name(), n.flag())).collect();
        assert_eq!(
            flags,
            vec![
                ("outfit", Flag::Add),
                ("ship", Flag::Remove),
                ("plain", Flag::Normal)
            ]
        );
    }

    #[test]
    fn test_ignore_node_flags() {
        let diagnostics = Diagnostics::non_terminating();
        let mut tree = DataTree::new();
        Reader::new("test.txt", &diagnostics)
            .with_options(ReadOptions::new().ignore_node_flags())
            .parse_str("add foo 1\n", &mut tree);
        let node = tree.top_level().next().unwrap();
        assert_eq!(node.name(), "add");
        assert_eq!(node.flag(), Flag::Normal);
        assert_eq!(node.args(), ["foo", "1"]);
    }

    #[test]
    fn test_flag_only_line_breaks_nesting() {
        // The flag-only line is no node, so the deeper line cannot nest under it
        let (tree, diagnostics) = read("a\nadd\n\tb\n");
        assert_eq!(names(&tree), vec![(0, "a"), (0, "b")]);
        assert_eq!(diagnostics.error_count(), 0);
    }

    #[test]
    fn test_empty_name_is_reported() {
        let (tree, diagnostics) = read("\"\" 1\nok\n");
        assert_eq!(names(&tree), vec![(0, "ok")]);
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn test_mixed_whitespace_in_unit_warns_once() {
        let (tree, diagnostics) = read("a\n \tb\n");
        assert_eq!(names(&tree), vec![(0, "a"), (1, "b")]);
        assert_eq!(diagnostics.count(Severity::Warn), 1);
        assert_eq!(diagnostics.error_count(), 0);
    }

    #[test]
    fn test_inconsistent_unit_warns_but_still_nests() {
        let (tree, diagnostics) = read("a\n\tb\n\t    c\n");
        assert_eq!(names(&tree), vec![(0, "a"), (1, "b"), (2, "c")]);
        assert_eq!(diagnostics.warning_count(), 1);
        let report = &diagnostics.records()[0];
        assert!(report.text.contains("line 3"));
    }

    #[test]
    fn test_missing_file_reports_error() {
        let diagnostics = Diagnostics::non_terminating();
        let mut tree = DataTree::new();
        Reader::new("definitely/not/here.txt", &diagnostics).parse_file(&mut tree);
        assert!(tree.is_empty());
        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.records()[0].text.contains("here.txt"));
    }

    #[test]
    fn test_read_error_keeps_partial_tree() {
        let diagnostics = Diagnostics::non_terminating();
        let mut tree = DataTree::new();
        let lines = vec![
            Ok("a".to_string()),
            Ok("\tb".to_string()),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad bytes")),
            Ok("c".to_string()),
        ];
        let root = tree.root();
        Reader::new("partial.txt", &diagnostics).parse(lines, &mut tree, root);

        assert_eq!(names(&tree), vec![(0, "a"), (1, "b")]);
        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.records()[0].text.contains("past line 2"));
    }

    #[test]
    fn test_parse_into_existing_node() {
        let diagnostics = Diagnostics::non_terminating();
        let mut tree = DataTree::new();
        let holder = tree.add_child(tree.root(), Node::new("holder")).unwrap();
        Reader::new("x.txt", &diagnostics).parse_lines_into(
            "a\n\tb\n".as_bytes(),
            &mut tree,
            holder,
        );
        assert_eq!(names(&tree), vec![(0, "holder"), (1, "a"), (2, "b")]);
    }
}
