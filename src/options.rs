//! Configuration options for reading and writing.
//!
//! - [`ReadOptions`]: how lines are turned into nodes
//! - [`WriteOptions`]: how nodes are laid out as text
//!
//! ## Examples
//!
//! ```rust
//! use esdf::{ReadOptions, WriteOptions};
//!
//! // Keep `add`/`remove` as ordinary node names
//! let read = ReadOptions::new().ignore_node_flags();
//! assert!(!read.check_flags);
//!
//! // Four spaces per level, no blank line between top-level nodes
//! let write = WriteOptions::new().with_indent("    ").without_separator();
//! assert_eq!(write.indent, "    ");
//! ```

/// Options for the [`Reader`](crate::Reader).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadOptions {
    /// Treat a leading `add` or `remove` token as a node flag.
    pub check_flags: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions { check_flags: true }
    }
}

impl ReadOptions {
    /// Creates default options (flags are recognised).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `add` and `remove` as plain node names.
    #[must_use]
    pub fn ignore_node_flags(mut self) -> Self {
        self.check_flags = false;
        self
    }

    #[must_use]
    pub fn with_check_flags(mut self, check_flags: bool) -> Self {
        self.check_flags = check_flags;
        self
    }
}

/// Options for the [`Writer`](crate::Writer).
///
/// # Examples
///
/// ```rust
/// use esdf::WriteOptions;
///
/// let options = WriteOptions::new();
/// assert_eq!(options.indent, "\t");
/// assert!(options.separate_top_level);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Whitespace written once per nesting level.
    pub indent: String,
    /// Write a blank line after each top-level node's subtree.
    pub separate_top_level: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            indent: "\t".to_string(),
            separate_top_level: true,
        }
    }
}

impl WriteOptions {
    /// Creates default options (one tab per level, blank line between top-level nodes).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indent unit.
    ///
    /// Anything other than spaces and tabs would not read back as indentation,
    /// so other characters are dropped; an indent with no whitespace left
    /// falls back to a single tab.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use esdf::WriteOptions;
    ///
    /// assert_eq!(WriteOptions::new().with_indent("  ").indent, "  ");
    /// assert_eq!(WriteOptions::new().with_indent("").indent, "\t");
    /// ```
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        let indent: String = indent
            .into()
            .chars()
            .filter(|&c| c == ' ' || c == '\t')
            .collect();
        self.indent = if indent.is_empty() {
            "\t".to_string()
        } else {
            indent
        };
        self
    }

    /// Sets the indent unit to `width` spaces.
    #[must_use]
    pub fn with_spaces(self, width: usize) -> Self {
        self.with_indent(" ".repeat(width))
    }

    /// Drops the blank line after each top-level node.
    #[must_use]
    pub fn without_separator(mut self) -> Self {
        self.separate_top_level = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_defaults() {
        assert!(ReadOptions::default().check_flags);
        assert!(!ReadOptions::new().with_check_flags(false).check_flags);
    }

    #[test]
    fn test_indent_is_sanitised() {
        assert_eq!(WriteOptions::new().with_indent(" x\t").indent, " \t");
        assert_eq!(WriteOptions::new().with_spaces(4).indent, "    ");
        assert_eq!(WriteOptions::new().with_spaces(0).indent, "\t");
    }
}
