//! Failures raised while parsing, and errors raised while building a grammar.
//!
//! Parsing has a single failure kind, [`Failure`], distinguished only by its
//! [`FailReason`]. It is cheap (no copy of the input) so alternatives and
//! repetitions can produce and discard it freely. Only when a failure escapes
//! the [driver](crate::grammar::Grammar::parse) is it paired with the input to
//! become a renderable [`ParseError`].

use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Why a rule failed to match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailReason {
    /// A leaf's pattern did not match at the offset.
    NoToken,
    /// A repetition stopped before reaching its minimum count.
    InsufficientRepetitions { min: usize, found: usize },
    /// The root rule succeeded without consuming the whole input.
    UnconsumedInput,
    /// A leaf was attempted at or past the end of the input.
    OutOfBounds,
}

/// The failure signal threaded through combinators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub reason: FailReason,
    pub offset: usize,
}

impl Failure {
    pub fn new(reason: FailReason, offset: usize) -> Self {
        Self { reason, offset }
    }
}

const OUT_OF_BOUNDS: &str = "attempted to parse beyond the end of input";

/// A failed parse, able to point at the failing location in the input.
/// ```
/// # use recombi::GrammarBuilder;
/// let mut g = GrammarBuilder::<String>::new();
/// let a = g.leaf("a").unwrap();
/// let grammar = g.build(a).unwrap();
///
/// let err = grammar.parse("b").unwrap_err();
/// assert_eq!(err.to_string(), "unexpected 'b' at position 1\n\nb\n^\n");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    reason: FailReason,
    message: Option<String>,
    offset: usize,
    input: String,
}

impl ParseError {
    /// A failure located in the given input.
    pub fn at(failure: Failure, input: &str) -> Self {
        let message = match failure.reason {
            FailReason::OutOfBounds => Some(String::from(OUT_OF_BOUNDS)),
            _ => None,
        };
        Self {
            reason: failure.reason,
            message,
            offset: failure.offset,
            input: input.to_owned(),
        }
    }

    pub fn reason(&self) -> &FailReason {
        &self.reason
    }

    /// Byte offset of the failure in [`input`](Self::input).
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The message alone, without the pointer into the input.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn headline(&self) -> String {
        let (input, offset) = (self.input.as_str(), self.offset);
        let position = input.get(..offset).map_or(offset, |p| p.chars().count()) + 1;
        let found = match input.get(offset..).and_then(|rest| rest.chars().next()) {
            Some(c) => format!("'{}' at position {position}", c.escape_debug()),
            None => format!("end of input at position {position}"),
        };
        match (&self.message, &self.reason) {
            (Some(msg), _) => format!("{msg} (found {found})"),
            (None, FailReason::InsufficientRepetitions { min, found: count }) => {
                format!("expected at least {min} repetition(s), matched {count} before {found}")
            }
            (None, _) => format!("unexpected {found}"),
        }
    }
}

/// Control characters shown as two character escapes, so the input fits on
/// one line.
fn escaped(c: char) -> Option<&'static str> {
    match c {
        '\n' => Some("\\n"),
        '\r' => Some("\\r"),
        '\t' => Some("\\t"),
        _ => None,
    }
}

/// The number of displayed characters before `offset`, in the escaped input.
fn column(input: &str, offset: usize) -> usize {
    input
        .char_indices()
        .take_while(|(i, _)| *i < offset)
        .map(|(_, c)| escaped(c).map_or(1, |e| e.chars().count()))
        .sum()
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        writeln!(f)?;
        for c in self.input.chars() {
            match escaped(c) {
                Some(e) => f.write_str(e)?,
                None => write!(f, "{c}")?,
            }
        }
        writeln!(f)?;
        writeln!(f, "{}^", " ".repeat(column(&self.input, self.offset)))
    }
}

impl std::error::Error for ParseError {}

/// Errors in the construction of a grammar. None of these can occur once a
/// [`Grammar`](crate::grammar::Grammar) has been built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("invalid repetition bounds: {0}")]
    InvalidBounds(String),
    #[error("the injection point for `{0}` has already been resolved")]
    AlreadyInjected(String),
    #[error("the injection point in `{0}` is never resolved")]
    Unresolved(String),
    #[error("rule does not belong to this grammar")]
    UnknownRule,
}

/// Fails with the error built by `err` when `cond` does not hold.
pub fn ensure(cond: bool, err: impl FnOnce() -> GrammarError) -> Result<(), GrammarError> {
    if cond {
        Ok(())
    } else {
        Err(err())
    }
}
