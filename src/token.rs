//! Line tokenizer.
//!
//! Turns one raw line into its tokens and, optionally, a node flag. This is
//! the only place that knows the quoting rules on the reading side; the
//! writer's [`quote_word`](crate::writer::quote_word) is their inverse.
//!
//! ## Token rules
//!
//! - Whitespace between tokens is skipped.
//! - A token starting with `"` runs to the next `"`; one starting with a
//!   backtick runs to the next backtick. The delimiters are not kept, and a
//!   `#` inside them is ordinary text.
//! - Any other token runs to the next space. An unquoted `#` ends the token
//!   and the rest of the line is a comment.
//! - A token cut short by the end of the line is still kept.
//!
//! ```rust
//! use esdf::token::tokenize;
//!
//! assert_eq!(tokenize(r#"a "b c" d"#), ["a", "b c", "d"]);
//! assert_eq!(tokenize("x # y"), ["x"]);
//! assert!(tokenize("   # only a comment").is_empty());
//! ```

use crate::node::Flag;

/// The pieces of one line that make up a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineParts {
    pub flag: Flag,
    pub name: String,
    pub args: Vec<String>,
}

struct Scan {
    tokens: Vec<String>,
    /// Byte offset of an unquoted `#` in the original line.
    comment: Option<usize>,
}

fn scan(line: &str) -> Scan {
    let offset = line.len() - line.trim_start().len();
    let trimmed = line.trim();

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut split_on = ' ';
    let mut between = true;
    let mut comment = None;

    for (i, c) in trimmed.char_indices() {
        if between {
            if c.is_whitespace() {
                continue;
            }
            between = false;
            match c {
                '"' | '`' => {
                    split_on = c;
                    continue;
                }
                _ => split_on = ' ',
            }
        }

        if c == split_on {
            tokens.push(std::mem::take(&mut current));
            between = true;
        } else if c == '#' && split_on == ' ' {
            comment = Some(offset + i);
            break;
        } else {
            current.push(c);
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    Scan { tokens, comment }
}

/// Splits a line into its tokens, dropping quotes and any trailing comment.
///
/// An empty result means the line holds no node.
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    scan(line).tokens
}

/// Splits a line into flag, name and arguments.
///
/// With `check_flags`, a leading `add` or `remove` token becomes the flag and
/// the next token the name. Returns `None` when no name is left, which covers
/// blank lines, comment-only lines and lines holding nothing but a flag.
///
/// ```rust
/// use esdf::token::split_line;
/// use esdf::Flag;
///
/// let parts = split_line("add foo 1", true).unwrap();
/// assert_eq!((parts.flag, parts.name.as_str()), (Flag::Add, "foo"));
/// assert_eq!(parts.args, ["1"]);
///
/// let parts = split_line("add foo 1", false).unwrap();
/// assert_eq!((parts.flag, parts.name.as_str()), (Flag::Normal, "add"));
/// assert_eq!(parts.args, ["foo", "1"]);
/// ```
#[must_use]
pub fn split_line(line: &str, check_flags: bool) -> Option<LineParts> {
    let mut tokens = tokenize(line).into_iter();
    let first = tokens.next()?;

    let (flag, name) = match Flag::from_keyword(&first) {
        Some(flag) if check_flags => (flag, tokens.next()?),
        _ => (Flag::Normal, first),
    };

    Some(LineParts {
        flag,
        name,
        args: tokens.collect(),
    })
}

/// Returns the part of a line before its first unquoted `#`.
///
/// ```rust
/// use esdf::token::strip_comment;
///
/// assert_eq!(strip_comment(r#"name "a # b" # note"#), r#"name "a # b" "#);
/// ```
#[must_use]
pub fn strip_comment(line: &str) -> &str {
    match scan(line).comment {
        Some(at) => &line[..at],
        None => line,
    }
}

/// Returns `true` when a line holds no tokens at all.
#[must_use]
pub fn is_blank(line: &str) -> bool {
    scan(line).tokens.is_empty()
}

/// Counts the tab and space characters at the start of a line.
///
/// Tabs and spaces count as one unit each.
#[must_use]
pub fn count_leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|&c| c == ' ' || c == '\t').count()
}

/// Returns the run of tabs and spaces that starts `depth` characters into the line.
///
/// This is the whitespace a line adds on top of an enclosing level opened at
/// `depth`. Positions count characters, not bytes.
///
/// ```rust
/// use esdf::token::indent_substring;
///
/// assert_eq!(indent_substring("\t\t  name", 2), "  ");
/// assert_eq!(indent_substring("name", 4), "");
/// ```
#[must_use]
pub fn indent_substring(line: &str, depth: usize) -> &str {
    let start = line
        .char_indices()
        .nth(depth)
        .map_or(line.len(), |(i, _)| i);
    let rest = &line[start..];
    let len = rest
        .bytes()
        .take_while(|&b| b == b' ' || b == b'\t')
        .count();
    &rest[..len]
}
