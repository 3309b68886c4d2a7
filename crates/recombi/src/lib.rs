//! Parser combinators over regular expression leaves.
//!
//! Grammars are built from regex [leaves](builder::GrammarBuilder::leaf), combined by
//! sequence ([and](builder::GrammarBuilder::and)), ordered choice
//! ([or](builder::GrammarBuilder::or)), bounded repetition
//! ([rep](builder::GrammarBuilder::rep)) and token transformation
//! ([map](builder::GrammarBuilder::map)). Recursive grammars are expressed by
//! marking an injection point, and later injecting the rule it refers to.
//!
//! ```
//! # use recombi::GrammarBuilder;
//! // expr := '(' digit expr? ')'
//! let mut g = GrammarBuilder::<String>::new();
//! let open = g.leaf(r"\(").unwrap();
//! let digit = g.leaf(r"\d").unwrap();
//! let close = g.leaf(r"\)").unwrap();
//!
//! let head = g.and(open, digit);
//! let marked = g.mark_ipoint(head);
//! let expr = g.and(marked, close);
//! let expr = g.opt(expr);
//! let expr = g.inject(expr).unwrap();
//!
//! let grammar = g.build(expr).unwrap();
//! assert_eq!(grammar.parse("(1(2))").unwrap(), ["(", "1", "(", "2", ")", ")"]);
//! assert!(grammar.parse("(1(2").is_err());
//! ```
#![warn(clippy::style)]
#![warn(clippy::perf)]
#![warn(clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use derive_where::derive_where;
use std::fmt::{self, Debug, Display, Formatter};
use typed_generational_arena::Index as GenIndex;

pub mod builder;
pub mod config;
mod core;
pub mod derived;
pub mod error;
pub mod grammar;
pub mod leaf;
pub mod macros;

pub use builder::GrammarBuilder;
pub use config::Config;
pub use error::{FailReason, GrammarError, ParseError};
pub use grammar::Grammar;

/// Values a leaf can produce from the text it matched.
pub trait Token: Clone + for<'a> From<&'a str> {}
impl<T: Clone + for<'a> From<&'a str>> Token for T {}

/// A handle to a rule in the [`GrammarBuilder`] that created it.
#[derive_where(Clone, Copy)]
pub struct Rule<T> {
    pub(crate) key: GenIndex<crate::core::Node<T>, usize, usize>,
}

impl<T> Debug for Rule<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({})", self.key.arr_idx())
    }
}

/// The tokens matched so far, and the offset of the first unconsumed byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step<T> {
    pub tokens: Vec<T>,
    pub offset: usize,
}

impl<T> Step<T> {
    pub fn new(tokens: Vec<T>, offset: usize) -> Self {
        Self { tokens, offset }
    }

    /// Continues with a step taken from where this one stopped.
    pub fn then(mut self, next: Step<T>) -> Self {
        self.tokens.extend(next.tokens);
        Self {
            tokens: self.tokens,
            offset: next.offset,
        }
    }
}

/// Displays a rule, for debugging and error messages.
pub struct Repr<'r, T> {
    pub(crate) rules: &'r crate::core::Rules<T>,
    pub(crate) rule: Rule<T>,
}

impl<T> Display for Repr<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.rules.repr(self.rule, f)
    }
}
