//! Diagnostic reporting and error counting.
//!
//! Nothing in this crate panics or returns an error for bad input. Parsing
//! and field access report what went wrong to a [`Diagnostics`] handle and
//! carry on with a usable value; callers read [`Diagnostics::error_count`]
//! afterwards to decide whether a unit of work succeeded.
//!
//! ## Messages
//!
//! A [`Message`] pairs a [`Severity`] with a template. Templates use
//! placeholders that are filled from the [`Arg`]s passed to
//! [`Diagnostics::report`]:
//!
//! | Placeholder | Filled from |
//! |-------------|-------------|
//! | `$CONTEXT` | text argument |
//! | `$NODE` | node name |
//! | `$PARENT` | name of the node's parent |
//! | `$FILENAME` | file name of a path argument |
//! | `$FILEPATH` | absolute form of a path argument |
//!
//! The first argument of each kind fills the bare placeholder. Every argument
//! fills the indexed form, numbered by its position among arguments of the
//! same kind: `$CONTEXT[1]` is the second text argument. Placeholders are
//! filled in one pass, so text filled in is never itself substituted, and a
//! placeholder with no matching argument is left as written. When any node
//! argument carries provenance, the first such node appends
//! ` (line L of F)` to the message.
//!
//! ## Output
//!
//! Reports go to `tracing` at the matching level unless an
//! [`Arg::Output`] target is given, in which case the prefixed line is
//! written there instead. Every report is also kept in the handle's history.
//!
//! ## Examples
//!
//! ```rust
//! use esdf::diagnostics::{messages, Arg, Diagnostics};
//!
//! let diagnostics = Diagnostics::non_terminating();
//! let mut out = Vec::new();
//! diagnostics.report(
//!     &messages::ERROR_GENERIC,
//!     [Arg::Output(&mut out)],
//! );
//!
//! assert_eq!(diagnostics.error_count(), 1);
//! assert!(String::from_utf8(out).unwrap().starts_with("Error: "));
//! ```

use crate::node::Provenance;
use crate::tree::NodeRef;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// How serious a reported message is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Ends the process once reported.
    Fatal,
    /// Serious but not immediately fatal; counted.
    Error,
    /// May cause later issues or unintended behaviour.
    Warn,
    Info,
    Success,
}

impl Severity {
    /// The prefix printed before a message of this severity.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Severity::Fatal => "Fatal Error: ",
            Severity::Error => "Error: ",
            Severity::Warn => "Warning: ",
            Severity::Info | Severity::Success => "",
        }
    }

    /// Whether reporting at this severity increments the error count.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Severity::Fatal | Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
            Severity::Success => "SUCCESS",
        };
        f.write_str(s)
    }
}

/// A message template with a fixed severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub template: &'static str,
}

impl Message {
    #[must_use]
    pub const fn new(severity: Severity, template: &'static str) -> Self {
        Message { severity, template }
    }
}

/// The catalogue of messages this crate reports.
pub mod messages {
    use super::{Message, Severity};

    pub const FATAL_GENERIC: Message = Message::new(
        Severity::Fatal,
        "A fatal error was encountered. No other information is available.",
    );

    pub const ERROR_GENERIC: Message = Message::new(
        Severity::Error,
        "An error was encountered. No other information is available.",
    );
    pub const ERROR_FILE_DNE: Message = Message::new(
        Severity::Error,
        "The file $FILEPATH does not exist or could not be found.",
    );
    pub const ERROR_FILE_READ: Message = Message::new(
        Severity::Error,
        "The file $FILEPATH could not be read past line $CONTEXT: $CONTEXT[1]",
    );
    pub const ERROR_FILE_WRITE: Message = Message::new(
        Severity::Error,
        "Could not write to $FILEPATH: $CONTEXT",
    );
    pub const ERROR_NODE_PARSE: Message = Message::new(
        Severity::Error,
        "Could not read the node on line $CONTEXT of $FILEPATH: $CONTEXT[1]",
    );
    pub const ERROR_NODE_WRITE_ROOT: Message = Message::new(
        Severity::Error,
        "$NODE is a root node and should not be written.",
    );

    pub const ERROR_BUILDER_MISSING_ARG: Message =
        Message::new(Severity::Error, "Missing argument for $NODE in $CONTEXT.");
    pub const ERROR_BUILDER_MALFORMED_INT: Message = Message::new(
        Severity::Error,
        "$NODE argument in $CONTEXT is not a valid integer.",
    );
    pub const ERROR_BUILDER_MALFORMED_LONG: Message = Message::new(
        Severity::Error,
        "$NODE argument in $CONTEXT is not a valid long integer.",
    );
    pub const ERROR_BUILDER_MALFORMED_REAL: Message = Message::new(
        Severity::Error,
        "$NODE argument in $CONTEXT is not a real number.",
    );

    pub const WARN_MIXED_WHITESPACE: Message = Message::new(
        Severity::Warn,
        "Mixed or inconsistent whitespace is used for indentation on line $CONTEXT of $FILEPATH.",
    );
    pub const WARN_NODE_NAMED_LIKE_FLAG: Message = Message::new(
        Severity::Warn,
        "$NODE has no flag but is named like one, and will be read back as a flag.",
    );
    pub const WARN_UNREPRESENTABLE_TOKEN: Message = Message::new(
        Severity::Warn,
        "Token `$CONTEXT` of $NODE cannot be quoted so that it reads back unchanged.",
    );

    pub const WARN_BUILDER_NATURAL_OUT_OF_BOUNDS: Message = Message::new(
        Severity::Warn,
        "$NODE argument in $CONTEXT should be a natural number, but is less than 0.",
    );
    pub const WARN_BUILDER_ROLL_OUT_OF_BOUNDS: Message = Message::new(
        Severity::Warn,
        "$NODE argument in $CONTEXT is either too large or too small to be a valid default random roll.",
    );
    pub const WARN_BUILDER_SWIZZLE_OUT_OF_BOUNDS: Message = Message::new(
        Severity::Warn,
        "$NODE argument in $CONTEXT is either too large or too small to be a valid swizzle number.",
    );
    pub const WARN_BUILDER_POSREAL_OUT_OF_BOUNDS: Message = Message::new(
        Severity::Warn,
        "$NODE argument in $CONTEXT should be non-negative, but is less than 0.",
    );
    pub const WARN_BUILDER_SMALLREAL_OUT_OF_BOUNDS: Message = Message::new(
        Severity::Warn,
        "$NODE argument in $CONTEXT is outside the expected range of 0 to 1 inclusive.",
    );
}

/// One value used to fill a message template.
pub enum Arg<'a> {
    Text(&'a str),
    Node(NodeRef<'a>),
    File(&'a Path),
    /// Send the rendered line here instead of to `tracing`.
    Output(&'a mut dyn io::Write),
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Text(s)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(s: &'a String) -> Self {
        Arg::Text(s)
    }
}

impl<'a> From<NodeRef<'a>> for Arg<'a> {
    fn from(node: NodeRef<'a>) -> Self {
        Arg::Node(node)
    }
}

impl<'a> From<&'a Path> for Arg<'a> {
    fn from(path: &'a Path) -> Self {
        Arg::File(path)
    }
}

impl<'a> From<&'a PathBuf> for Arg<'a> {
    fn from(path: &'a PathBuf) -> Self {
        Arg::File(path)
    }
}

/// A rendered message as it was reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub severity: Severity,
    pub text: String,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.severity.prefix(), self.text)
    }
}

/// Collects reports and counts errors for one logical unit of work.
///
/// The handle is single-threaded; share it by reference between the reader,
/// the writer and the builder that make up one parse/build pass.
#[derive(Debug)]
pub struct Diagnostics {
    error_count: Cell<usize>,
    records: RefCell<Vec<Report>>,
    exit_on_fatal: bool,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a handle whose FATAL reports end the process.
    pub fn new() -> Self {
        Diagnostics {
            error_count: Cell::new(0),
            records: RefCell::new(Vec::new()),
            exit_on_fatal: true,
        }
    }

    /// Creates a handle that records FATAL reports without exiting.
    pub fn non_terminating() -> Self {
        Diagnostics {
            exit_on_fatal: false,
            ..Self::new()
        }
    }

    /// Clears the error count and the report history.
    pub fn reset(&self) {
        self.error_count.set(0);
        self.records.borrow_mut().clear();
    }

    /// Number of ERROR and FATAL reports since creation or the last reset.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count.get()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warn)
    }

    /// Number of recorded reports with exactly this severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// A copy of every report recorded so far, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<Report> {
        self.records.borrow().clone()
    }

    /// Renders `message` with `args`, emits it and records it.
    ///
    /// For [`Severity::Fatal`] on a terminating handle this does not return:
    /// the process exits with the current error count as its status.
    pub fn report<'a, I>(&self, message: &Message, args: I) -> Report
    where
        I: IntoIterator<Item = Arg<'a>>,
    {
        let (text, output) = render(message.template, args);
        let report = Report {
            severity: message.severity,
            text,
        };

        if message.severity.is_error() {
            self.error_count.set(self.error_count.get() + 1);
        }
        emit(&report, output);
        self.records.borrow_mut().push(report.clone());

        if message.severity == Severity::Fatal && self.exit_on_fatal {
            let status = i32::try_from(self.error_count()).unwrap_or(i32::MAX);
            std::process::exit(status);
        }
        report
    }
}

fn emit(report: &Report, output: Option<&mut dyn io::Write>) {
    if let Some(out) = output {
        if let Err(err) = writeln!(out, "{}", report) {
            tracing::warn!(error = %err, "could not write diagnostic to output target");
        } else {
            return;
        }
    }

    match report.severity {
        Severity::Fatal => tracing::error!(severity = %report.severity, "{}", report.text),
        Severity::Error => tracing::error!("{}", report.text),
        Severity::Warn => tracing::warn!("{}", report.text),
        Severity::Info | Severity::Success => tracing::info!("{}", report.text),
    }
}

fn render<'a, I>(template: &str, args: I) -> (String, Option<&'a mut dyn io::Write>)
where
    I: IntoIterator<Item = Arg<'a>>,
{
    let mut texts: Vec<&str> = Vec::new();
    let mut nodes: Vec<NodeRef<'a>> = Vec::new();
    let mut files: Vec<&Path> = Vec::new();
    let mut output = None;

    for arg in args {
        match arg {
            Arg::Text(s) => texts.push(s),
            Arg::Node(n) => nodes.push(n),
            Arg::File(p) => files.push(p),
            Arg::Output(w) => output = output.or(Some(w)),
        }
    }

    let mut content = String::with_capacity(template.len());
    let mut rest = template;
    // One pass: filled text is never rescanned
    while let Some(start) = rest.find('$') {
        content.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some((key, index, len)) = placeholder(after) else {
            content.push('$');
            rest = after;
            continue;
        };
        let value = match key {
            "CONTEXT" => texts.get(index).map(|t| (*t).to_string()),
            "NODE" => nodes.get(index).map(|n| n.name().to_string()),
            "PARENT" => nodes.get(index).map(parent_name),
            "FILENAME" => files.get(index).map(|f| file_name(f)),
            "FILEPATH" => files.get(index).map(|f| file_path(f)),
            _ => None,
        };
        match value {
            Some(value) => content.push_str(&value),
            None => content.push_str(&rest[start..start + 1 + len]),
        }
        rest = &after[len..];
    }
    content.push_str(rest);

    if let Some(provenance) = nodes.iter().find_map(|n| n.provenance()) {
        content.push_str(&format!(" ({})", location(provenance)));
    }

    (content, output)
}

const PLACEHOLDERS: [&str; 5] = ["CONTEXT", "NODE", "PARENT", "FILENAME", "FILEPATH"];

/// Matches a placeholder at the start of `text` (just past its `$`).
///
/// Returns the key, the argument index (0 for the bare form) and the length
/// of the matched text.
fn placeholder(text: &str) -> Option<(&'static str, usize, usize)> {
    let key = PLACEHOLDERS.into_iter().find(|key| text.starts_with(key))?;
    let tail = &text[key.len()..];
    if let Some(inner) = tail.strip_prefix('[') {
        let digits = inner.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && inner[digits..].starts_with(']') {
            if let Ok(index) = inner[..digits].parse() {
                return Some((key, index, key.len() + digits + 2));
            }
        }
    }
    Some((key, 0, key.len()))
}

fn location(provenance: &Provenance) -> String {
    provenance.to_string()
}

fn parent_name(node: &NodeRef<'_>) -> String {
    node.parent()
        .map_or_else(|| "(none)".to_string(), |p| p.name().to_string())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn file_path(path: &Path) -> String {
    if path.is_absolute() {
        return path.display().to_string();
    }
    std::env::current_dir()
        .map(|dir| dir.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataTree, Node};

    #[test]
    fn test_error_count_lifecycle() {
        let diagnostics = Diagnostics::non_terminating();
        diagnostics.report(&messages::ERROR_GENERIC, []);
        diagnostics.report(&messages::WARN_MIXED_WHITESPACE, [Arg::Text("3")]);
        diagnostics.report(&messages::FATAL_GENERIC, []);

        assert_eq!(diagnostics.error_count(), 2);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.count(Severity::Fatal), 1);

        diagnostics.reset();
        assert_eq!(diagnostics.error_count(), 0);
        assert!(diagnostics.records().is_empty());
    }

    #[test]
    fn test_node_and_context_placeholders() {
        let mut tree = DataTree::new();
        let ship = tree.add_child(tree.root(), Node::new("ship")).unwrap();
        let mass = tree.add_child(ship, Node::new("mass")).unwrap();
        let diagnostics = Diagnostics::non_terminating();

        let msg = Message::new(Severity::Info, "$NODE under $PARENT in $CONTEXT");
        let report = diagnostics.report(
            &msg,
            [Arg::from(tree.node(mass).unwrap()), Arg::from("outfitter")],
        );
        assert_eq!(report.text, "mass under ship in outfitter");
        assert_eq!(diagnostics.error_count(), 0);
    }

    #[test]
    fn test_indexed_placeholders() {
        let diagnostics = Diagnostics::non_terminating();
        let msg = Message::new(Severity::Info, "$CONTEXT/$CONTEXT[1]/$CONTEXT[0]");
        let report = diagnostics.report(&msg, [Arg::Text("a"), Arg::Text("b")]);
        assert_eq!(report.text, "a/b/a");
    }

    #[test]
    fn test_filled_text_is_not_rescanned() {
        let mut tree = DataTree::new();
        let mass = tree.add_child(tree.root(), Node::new("mass")).unwrap();
        let diagnostics = Diagnostics::non_terminating();

        let msg = Message::new(Severity::Info, "$NODE in $CONTEXT");
        let report = diagnostics.report(
            &msg,
            [Arg::from(tree.node(mass).unwrap()), Arg::Text("cost $NODE $FILEPATH")],
        );
        assert_eq!(report.text, "mass in cost $NODE $FILEPATH");
    }

    #[test]
    fn test_unfilled_placeholders_stay_literal() {
        let diagnostics = Diagnostics::non_terminating();
        let msg = Message::new(Severity::Info, "$5 $CONTEXT[3] $NODE $CONTEXT[x");
        let report = diagnostics.report(&msg, [Arg::Text("a")]);
        assert_eq!(report.text, "$5 $CONTEXT[3] $NODE a[x");
    }

    #[test]
    fn test_provenance_suffix() {
        let mut tree = DataTree::new();
        let node = tree
            .add_child(
                tree.root(),
                Node::new("drag").with_provenance(Provenance::new(4, "ships.txt")),
            )
            .unwrap();
        let diagnostics = Diagnostics::non_terminating();

        let report = diagnostics.report(
            &messages::ERROR_BUILDER_MISSING_ARG,
            [Arg::from(tree.node(node).unwrap()), Arg::Text("ship")],
        );
        assert_eq!(
            report.text,
            "Missing argument for drag in ship. (line 4 of ships.txt)"
        );
        assert_eq!(report.to_string(), format!("Error: {}", report.text));
    }

    #[test]
    fn test_file_placeholders() {
        let diagnostics = Diagnostics::non_terminating();
        let path = Path::new("/data/ships.txt");
        let msg = Message::new(Severity::Info, "$FILENAME at $FILEPATH");
        let report = diagnostics.report(&msg, [Arg::File(path)]);
        assert_eq!(report.text, "ships.txt at /data/ships.txt");
    }

    #[test]
    fn test_output_target_receives_prefixed_line() {
        let diagnostics = Diagnostics::non_terminating();
        let mut out: Vec<u8> = Vec::new();
        diagnostics.report(
            &messages::WARN_MIXED_WHITESPACE,
            [Arg::Text("9"), Arg::File(Path::new("/a.txt")), Arg::Output(&mut out)],
        );
        let written = String::from_utf8(out).unwrap();
        assert_eq!(
            written,
            "Warning: Mixed or inconsistent whitespace is used for indentation on line 9 of /a.txt.\n"
        );
    }
}
