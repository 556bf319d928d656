//! Typed access to node arguments.
//!
//! A [`Builder`] turns argument text into strings and numbers while a caller
//! assembles its own objects from a parsed tree. It never fails: a missing or
//! malformed argument is reported as an error to the [`Diagnostics`] handle
//! and the type's zero value is returned, so a caller can finish the object
//! and decide afterwards, from the error count, whether to keep it.
//!
//! The `_as` variants also check the parsed value against a documented
//! range. A value outside it is reported as a warning and returned
//! unchanged.
//!
//! ## Examples
//!
//! ```rust
//! use esdf::{Builder, Diagnostics, IntType};
//!
//! let tree = esdf::from_str("ship \"Much Confused Wardragon\"\n\tmass 35\n\tdrag 0.3\n");
//! let diagnostics = Diagnostics::non_terminating();
//! let builder = Builder::new(&diagnostics);
//!
//! let ship = tree.top_level().next().unwrap();
//! let name = builder.build_string(ship, 0, "ship");
//! let mass = builder.build_int_as(ship.find_child("mass").unwrap(), 0, "ship", IntType::Natural);
//! let drag = builder.build_double(ship.find_child("drag").unwrap(), 0, "ship");
//!
//! assert_eq!((name.as_str(), mass, drag), ("Much Confused Wardragon", 35, 0.3));
//! assert_eq!(diagnostics.error_count(), 0);
//! ```

use crate::diagnostics::{messages, Arg, Diagnostics, Message};
use crate::tree::NodeRef;
use std::ops::RangeInclusive;

/// An argument type the [`Builder`] can produce.
///
/// `Default` supplies the value returned when the argument is missing or
/// cannot be parsed.
pub trait FromArg: Default {
    /// Reported when the text does not parse as this type.
    const MALFORMED: Message;

    fn parse_arg(text: &str) -> Option<Self>;
}

impl FromArg for String {
    const MALFORMED: Message = messages::ERROR_GENERIC;

    fn parse_arg(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

impl FromArg for i32 {
    const MALFORMED: Message = messages::ERROR_BUILDER_MALFORMED_INT;

    fn parse_arg(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl FromArg for i64 {
    const MALFORMED: Message = messages::ERROR_BUILDER_MALFORMED_LONG;

    fn parse_arg(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl FromArg for f64 {
    const MALFORMED: Message = messages::ERROR_BUILDER_MALFORMED_REAL;

    fn parse_arg(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

/// The intended meaning of an integer argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntType {
    /// Any `i32`.
    #[default]
    Standard,
    /// Zero or more.
    Natural,
    /// A result of the default random roll, 0 to 99.
    PossibleRoll,
    /// A colour swizzle index, 0 to 28.
    Swizzle,
}

impl IntType {
    /// The inclusive range of values this type expects.
    ///
    /// ```rust
    /// use esdf::IntType;
    ///
    /// assert!(IntType::Swizzle.range().contains(&28));
    /// assert!(!IntType::PossibleRoll.range().contains(&100));
    /// ```
    #[must_use]
    pub const fn range(self) -> RangeInclusive<i32> {
        match self {
            IntType::Standard => i32::MIN..=i32::MAX,
            IntType::Natural => 0..=i32::MAX,
            IntType::PossibleRoll => 0..=99,
            IntType::Swizzle => 0..=28,
        }
    }

    const fn out_of_bounds(self) -> Option<Message> {
        match self {
            IntType::Standard => None,
            IntType::Natural => Some(messages::WARN_BUILDER_NATURAL_OUT_OF_BOUNDS),
            IntType::PossibleRoll => Some(messages::WARN_BUILDER_ROLL_OUT_OF_BOUNDS),
            IntType::Swizzle => Some(messages::WARN_BUILDER_SWIZZLE_OUT_OF_BOUNDS),
        }
    }
}

/// The intended meaning of a real-number argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RealType {
    /// Any `f64`.
    #[default]
    Standard,
    /// Zero or more.
    PosReal,
    /// 0 to 1, as used for colour components.
    SmallReal,
}

impl RealType {
    /// The inclusive range of values this type expects.
    #[must_use]
    pub const fn range(self) -> RangeInclusive<f64> {
        match self {
            RealType::Standard => f64::NEG_INFINITY..=f64::INFINITY,
            RealType::PosReal => 0.0..=f64::INFINITY,
            RealType::SmallReal => 0.0..=1.0,
        }
    }

    const fn out_of_bounds(self) -> Option<Message> {
        match self {
            RealType::Standard => None,
            RealType::PosReal => Some(messages::WARN_BUILDER_POSREAL_OUT_OF_BOUNDS),
            RealType::SmallReal => Some(messages::WARN_BUILDER_SMALLREAL_OUT_OF_BOUNDS),
        }
    }
}

/// Reads typed arguments from nodes, reporting problems to a [`Diagnostics`] handle.
///
/// `context` in every method names the object being built from the node
/// (for example `"ship"`) and appears in reports.
#[derive(Clone, Copy, Debug)]
pub struct Builder<'d> {
    diagnostics: &'d Diagnostics,
}

impl<'d> Builder<'d> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Builder { diagnostics }
    }

    #[must_use]
    pub fn diagnostics(&self) -> &'d Diagnostics {
        self.diagnostics
    }

    /// Returns argument `index` of `node` parsed as `T`, or `T::default()` after reporting.
    ///
    /// ```rust
    /// use esdf::{Builder, Diagnostics};
    ///
    /// let tree = esdf::from_str("cost 1200 x\n");
    /// let diagnostics = Diagnostics::non_terminating();
    /// let builder = Builder::new(&diagnostics);
    /// let cost = tree.top_level().next().unwrap();
    ///
    /// assert_eq!(builder.get::<i64>(cost, 0, "outfit"), 1200);
    /// assert_eq!(builder.get::<f64>(cost, 1, "outfit"), 0.0);
    /// assert_eq!(diagnostics.error_count(), 1);
    /// ```
    pub fn get<T: FromArg>(&self, node: NodeRef<'_>, index: usize, context: &str) -> T {
        self.fetch(node, index, context).unwrap_or_default()
    }

    /// Returns the argument text, or an empty string after reporting a missing argument.
    pub fn build_string(&self, node: NodeRef<'_>, index: usize, context: &str) -> String {
        self.get(node, index, context)
    }

    pub fn build_int(&self, node: NodeRef<'_>, index: usize, context: &str) -> i32 {
        self.get(node, index, context)
    }

    /// Like [`build_int`](Self::build_int), warning when the value falls outside `kind`'s range.
    pub fn build_int_as(
        &self,
        node: NodeRef<'_>,
        index: usize,
        context: &str,
        kind: IntType,
    ) -> i32 {
        let Some(value) = self.fetch::<i32>(node, index, context) else {
            return 0;
        };
        if !kind.range().contains(&value) {
            self.warn_out_of_bounds(kind.out_of_bounds(), node, context);
        }
        value
    }

    pub fn build_long(&self, node: NodeRef<'_>, index: usize, context: &str) -> i64 {
        self.get(node, index, context)
    }

    pub fn build_double(&self, node: NodeRef<'_>, index: usize, context: &str) -> f64 {
        self.get(node, index, context)
    }

    /// Like [`build_double`](Self::build_double), warning when the value falls outside `kind`'s range.
    ///
    /// NaN lies outside every range but the standard one.
    pub fn build_double_as(
        &self,
        node: NodeRef<'_>,
        index: usize,
        context: &str,
        kind: RealType,
    ) -> f64 {
        let Some(value) = self.fetch::<f64>(node, index, context) else {
            return 0.0;
        };
        if kind != RealType::Standard && !kind.range().contains(&value) {
            self.warn_out_of_bounds(kind.out_of_bounds(), node, context);
        }
        value
    }

    fn fetch<T: FromArg>(&self, node: NodeRef<'_>, index: usize, context: &str) -> Option<T> {
        let Some(text) = node.arg(index) else {
            self.diagnostics.report(
                &messages::ERROR_BUILDER_MISSING_ARG,
                [Arg::Node(node), Arg::Text(context)],
            );
            return None;
        };

        let value = T::parse_arg(text);
        if value.is_none() {
            self.diagnostics
                .report(&T::MALFORMED, [Arg::Node(node), Arg::Text(context)]);
        }
        value
    }

    fn warn_out_of_bounds(&self, message: Option<Message>, node: NodeRef<'_>, context: &str) {
        if let Some(message) = message {
            self.diagnostics
                .report(&message, [Arg::Node(node), Arg::Text(context)]);
        }
    }
}
