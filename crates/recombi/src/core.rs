//! The core combinators from which every grammar is built.
//! - Each is a node in the rule arena, with a [`Comp`] implementation that
//!   threads the offset through its children.
//! - Failures are values: [`and`], [`map`] and [`mark`] propagate them, [`or`]
//!   and [`rep`] inspect them.

use crate::{
    error::{FailReason, Failure},
    leaf::Leaf,
    Rule, Step, Token,
};
use std::fmt::{self, Formatter};
use typed_generational_arena::Arena as GenArena;

/// Evaluation and display of a single combinator.
pub(crate) trait Comp<T> {
    fn comp(&self, rules: &Rules<T>, input: &str, pos: usize) -> Result<Step<T>, Failure>
    where
        T: Token;

    fn repr(&self, rules: &Rules<T>, f: &mut Formatter<'_>) -> fmt::Result;
}

/// Identifies the shared injection slot of a chain of rules.
/// - Leaves and [`empty`] start a new chain.
/// - Every combinator joins the chain of its left (or only) operand.
pub(crate) type Chain = usize;

pub(crate) struct Node<T> {
    pub kind: Kind<T>,
    pub chain: Chain,
}

pub(crate) enum Kind<T> {
    Leaf(Leaf),
    Empty(empty),
    And(and<T>),
    Or(or<T>),
    Rep(rep<T>),
    Map(map<T>),
    Mark(mark<T>),
}

/// The arena of rule nodes, and the injection slot of every chain.
pub(crate) struct Rules<T> {
    pub nodes: GenArena<Node<T>>,
    pub slots: Vec<Option<Rule<T>>>,
}

impl<T> Rules<T> {
    pub fn new() -> Self {
        Self {
            nodes: GenArena::new(),
            slots: Vec::new(),
        }
    }

    pub fn get(&self, rule: Rule<T>) -> Option<&Node<T>> {
        self.nodes.get(rule.key)
    }

    fn node(&self, rule: Rule<T>) -> &Node<T> {
        // INV: handles are only reachable from a grammar once `GrammarBuilder::build` has checked them.
        self.get(rule)
            .expect("rule handles are validated when the grammar is built")
    }

    pub fn comp(&self, rule: Rule<T>, input: &str, pos: usize) -> Result<Step<T>, Failure>
    where
        T: Token,
    {
        match &self.node(rule).kind {
            Kind::Leaf(l) => {
                let (text, offset) = l.comp(input, pos)?;
                Ok(Step::new(vec![T::from(text)], offset))
            }
            Kind::Empty(p) => p.comp(self, input, pos),
            Kind::And(p) => p.comp(self, input, pos),
            Kind::Or(p) => p.comp(self, input, pos),
            Kind::Rep(p) => p.comp(self, input, pos),
            Kind::Map(p) => p.comp(self, input, pos),
            Kind::Mark(p) => p.comp(self, input, pos),
        }
    }

    pub fn repr(&self, rule: Rule<T>, f: &mut Formatter<'_>) -> fmt::Result {
        match self.get(rule).map(|n| &n.kind) {
            Some(Kind::Leaf(l)) => write!(f, "/{}/", l.pattern()),
            Some(Kind::Empty(p)) => p.repr(self, f),
            Some(Kind::And(p)) => p.repr(self, f),
            Some(Kind::Or(p)) => p.repr(self, f),
            Some(Kind::Rep(p)) => p.repr(self, f),
            Some(Kind::Map(p)) => p.repr(self, f),
            Some(Kind::Mark(p)) => p.repr(self, f),
            None => write!(f, "<unknown>"),
        }
    }
}

/// Matches nothing, always succeeds without consuming.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub(crate) struct empty;

impl<T> Comp<T> for empty {
    fn comp(&self, _: &Rules<T>, _: &str, pos: usize) -> Result<Step<T>, Failure> {
        Ok(Step::new(Vec::new(), pos))
    }

    fn repr(&self, _: &Rules<T>, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<empty>")
    }
}

/// Applies the first rule, then the second from where the first stopped.
/// Tokens are concatenated in order.
#[allow(non_camel_case_types)]
pub(crate) struct and<T>(pub Rule<T>, pub Rule<T>);

impl<T> Comp<T> for and<T> {
    fn comp(&self, rules: &Rules<T>, input: &str, pos: usize) -> Result<Step<T>, Failure>
    where
        T: Token,
    {
        let first = rules.comp(self.0, input, pos)?;
        let second = rules.comp(self.1, input, first.offset)?;
        Ok(first.then(second))
    }

    fn repr(&self, rules: &Rules<T>, f: &mut Formatter<'_>) -> fmt::Result {
        rules.repr(self.0, f)?;
        write!(f, " ")?;
        rules.repr(self.1, f)
    }
}

/// Ordered choice: the second rule is only tried, from the same offset, if the
/// first fails.
#[allow(non_camel_case_types)]
pub(crate) struct or<T>(pub Rule<T>, pub Rule<T>);

impl<T> Comp<T> for or<T> {
    fn comp(&self, rules: &Rules<T>, input: &str, pos: usize) -> Result<Step<T>, Failure>
    where
        T: Token,
    {
        match rules.comp(self.0, input, pos) {
            Ok(step) => Ok(step),
            Err(_) => rules.comp(self.1, input, pos),
        }
    }

    fn repr(&self, rules: &Rules<T>, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        rules.repr(self.0, f)?;
        write!(f, " | ")?;
        rules.repr(self.1, f)?;
        write!(f, ")")
    }
}

/// Applies a rule between `min` and `max` times (`None` for no upper bound).
/// - Stops at the first failing application, which is not reported unless
///   fewer than `min` applications succeeded.
/// - An application that succeeds without consuming would repeat forever, so
///   the loop ends there as if it had run to `max`. Stalled tokens are copied
///   once per remaining application, which is `O(max)` when there are any.
#[allow(non_camel_case_types)]
pub(crate) struct rep<T> {
    pub base: Rule<T>,
    pub min: usize,
    pub max: Option<usize>,
}

impl<T> Comp<T> for rep<T> {
    fn comp(&self, rules: &Rules<T>, input: &str, pos: usize) -> Result<Step<T>, Failure>
    where
        T: Token,
    {
        let mut tokens = Vec::new();
        let mut offset = pos;
        let mut count = 0;

        while self.max.map_or(true, |max| count < max) {
            let Ok(step) = rules.comp(self.base, input, offset) else {
                break;
            };
            count += 1;
            if step.offset == offset {
                match self.max {
                    Some(max) => {
                        if !step.tokens.is_empty() {
                            for _ in count..max {
                                tokens.extend(step.tokens.iter().cloned());
                            }
                        }
                        count = max;
                    }
                    None => count = count.max(self.min),
                }
                tokens.extend(step.tokens);
                break;
            }
            tokens.extend(step.tokens);
            offset = step.offset;
        }

        if count < self.min {
            Err(Failure::new(
                FailReason::InsufficientRepetitions {
                    min: self.min,
                    found: count,
                },
                offset,
            ))
        } else {
            Ok(Step::new(tokens, offset))
        }
    }

    fn repr(&self, rules: &Rules<T>, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        rules.repr(self.base, f)?;
        match self.max {
            Some(max) => write!(f, "]{{{},{}}}", self.min, max),
            None => write!(f, "]{{{},}}", self.min),
        }
    }
}

pub(crate) type MapFn<T> = Box<dyn Fn(Vec<T>) -> Vec<T>>;

/// Replaces the tokens of a successful rule, the offset is unchanged.
#[allow(non_camel_case_types)]
pub(crate) struct map<T>(pub Rule<T>, pub MapFn<T>);

impl<T> Comp<T> for map<T> {
    fn comp(&self, rules: &Rules<T>, input: &str, pos: usize) -> Result<Step<T>, Failure>
    where
        T: Token,
    {
        let Step { tokens, offset } = rules.comp(self.0, input, pos)?;
        Ok(Step::new((self.1)(tokens), offset))
    }

    fn repr(&self, rules: &Rules<T>, f: &mut Formatter<'_>) -> fmt::Result {
        rules.repr(self.0, f)
    }
}

/// Applies the base rule, then whichever rule is injected into its chain.
#[allow(non_camel_case_types)]
pub(crate) struct mark<T> {
    pub base: Rule<T>,
    pub chain: Chain,
}

impl<T> Comp<T> for mark<T> {
    fn comp(&self, rules: &Rules<T>, input: &str, pos: usize) -> Result<Step<T>, Failure>
    where
        T: Token,
    {
        let first = rules.comp(self.base, input, pos)?;
        // INV: `GrammarBuilder::build` rejects grammars with a reachable unresolved injection point.
        let injected = rules.slots[self.chain].expect("injection point resolved before parsing");
        let second = rules.comp(injected, input, first.offset)?;
        Ok(first.then(second))
    }

    fn repr(&self, rules: &Rules<T>, f: &mut Formatter<'_>) -> fmt::Result {
        rules.repr(self.base, f)?;
        write!(f, "...")
    }
}
