//! The built grammar, and the top level driver.

use crate::{
    core::Rules,
    error::{FailReason, Failure, ParseError},
    Repr, Rule, Step, Token,
};
use std::fmt::{self, Display, Formatter};

/// An immutable, checked grammar produced by [`GrammarBuilder::build`](crate::GrammarBuilder::build).
pub struct Grammar<T = String> {
    rules: Rules<T>,
    root: Rule<T>,
}

impl<T> Grammar<T> {
    pub(crate) fn new(rules: Rules<T>, root: Rule<T>) -> Self {
        Self { rules, root }
    }

    pub fn root(&self) -> Rule<T> {
        self.root
    }

    pub fn repr(&self, rule: Rule<T>) -> Repr<'_, T> {
        Repr {
            rules: &self.rules,
            rule,
        }
    }
}

impl<T: Token> Grammar<T> {
    /// Parses the whole of `input`, returning the tokens of the root rule.
    /// Fails if the root rule fails, or leaves input unconsumed.
    pub fn parse(&self, input: &str) -> Result<Vec<T>, ParseError> {
        let Step { tokens, offset } = self.parse_prefix(input)?;
        if offset == input.len() {
            log::debug!("parsed {} bytes into {} tokens", input.len(), tokens.len());
            Ok(tokens)
        } else {
            log::debug!("parse stopped at {offset} of {} bytes", input.len());
            Err(ParseError::at(
                Failure::new(FailReason::UnconsumedInput, offset),
                input,
            ))
        }
    }

    /// Applies the root rule from the start of `input`, without requiring it
    /// to consume everything.
    pub fn parse_prefix(&self, input: &str) -> Result<Step<T>, ParseError> {
        self.rules.comp(self.root, input, 0).map_err(|failure| {
            log::debug!("parse failed at {}: {:?}", failure.offset, failure.reason);
            ParseError::at(failure, input)
        })
    }
}

impl<T> Display for Grammar<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.rules.repr(self.root, f)
    }
}
