//! Construction of grammars.
//!
//! A [`GrammarBuilder`] owns every rule it creates; [`Rule`] handles are
//! combined through it, and [`GrammarBuilder::build`] checks the rule graph
//! before handing out an immutable [`Grammar`] that can parse.

use crate::{
    config::Config,
    core::{and, empty, map, mark, or, rep, Chain, Kind, Node, Rules},
    error::{ensure, GrammarError},
    grammar::Grammar,
    leaf::Leaf,
    Repr, Rule,
};
use std::collections::HashSet;

/// Builds the rules of a grammar, see the [crate] documentation for an example.
pub struct GrammarBuilder<T = String> {
    rules: Rules<T>,
    config: Config,
}

impl<T> Default for GrammarBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GrammarBuilder<T> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// A builder whose leaves are all compiled with `config`.
    pub fn with_config(config: Config) -> Self {
        Self {
            rules: Rules::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Displays a rule built by this builder.
    pub fn repr(&self, rule: Rule<T>) -> Repr<'_, T> {
        Repr {
            rules: &self.rules,
            rule,
        }
    }

    fn open_chain(&mut self) -> Chain {
        self.rules.slots.push(None);
        self.rules.slots.len() - 1
    }

    fn chain_of(&mut self, rule: Rule<T>) -> Chain {
        match self.rules.get(rule) {
            Some(node) => node.chain,
            // A foreign handle, rejected by `build`
            None => self.open_chain(),
        }
    }

    fn insert(&mut self, kind: Kind<T>, chain: Chain) -> Rule<T> {
        Rule {
            key: self.rules.nodes.insert(Node { kind, chain }),
        }
    }

    /// A rule matching `pattern` at the current offset.
    pub fn leaf(&mut self, pattern: &str) -> Result<Rule<T>, GrammarError> {
        let leaf = Leaf::new(pattern, &self.config)?;
        let chain = self.open_chain();
        Ok(self.insert(Kind::Leaf(leaf), chain))
    }

    /// A rule that always succeeds, consuming nothing and producing no tokens.
    pub fn empty(&mut self) -> Rule<T> {
        let chain = self.open_chain();
        self.insert(Kind::Empty(empty), chain)
    }

    /// `first` then `second`.
    pub fn and(&mut self, first: Rule<T>, second: Rule<T>) -> Rule<T> {
        let chain = self.chain_of(first);
        self.insert(Kind::And(and(first, second)), chain)
    }

    /// `first`, or if it fails, `second` from the same offset.
    pub fn or(&mut self, first: Rule<T>, second: Rule<T>) -> Rule<T> {
        let chain = self.chain_of(first);
        self.insert(Kind::Or(or(first, second)), chain)
    }

    /// `base` repeated at least `min` and at most `max` times, where a `max`
    /// of `None` is unbounded.
    /// ```
    /// # use recombi::{GrammarBuilder, GrammarError};
    /// let mut g = GrammarBuilder::<String>::new();
    /// let a = g.leaf("a").unwrap();
    /// assert!(g.rep(a, 1, Some(3)).is_ok());
    /// assert!(g.rep(a, 0, None).is_ok());
    /// assert!(matches!(g.rep(a, 2, Some(1)), Err(GrammarError::InvalidBounds(_))));
    /// ```
    pub fn rep(
        &mut self,
        base: Rule<T>,
        min: usize,
        max: Option<usize>,
    ) -> Result<Rule<T>, GrammarError> {
        if let Some(max) = max {
            ensure(max >= min, || {
                GrammarError::InvalidBounds(format!("maximum {max} is less than minimum {min}"))
            })?;
        }
        Ok(self.repeat(base, min, max))
    }

    pub(crate) fn repeat(&mut self, base: Rule<T>, min: usize, max: Option<usize>) -> Rule<T> {
        let chain = self.chain_of(base);
        self.insert(Kind::Rep(rep { base, min, max }), chain)
    }

    /// Replaces the tokens produced by `base` on success.
    pub fn map<F>(&mut self, base: Rule<T>, f: F) -> Rule<T>
    where
        F: Fn(Vec<T>) -> Vec<T> + 'static,
    {
        let chain = self.chain_of(base);
        self.insert(Kind::Map(map(base, Box::new(f))), chain)
    }

    /// `base`, followed by the rule later passed to [`inject`](Self::inject)
    /// from the same chain.
    ///
    /// The chain is shared: every rule derived from `base` (and from the rule
    /// `base` was itself derived from) refers to the same injection slot.
    pub fn mark_ipoint(&mut self, base: Rule<T>) -> Rule<T> {
        let chain = self.chain_of(base);
        self.insert(Kind::Mark(mark { base, chain }), chain)
    }

    /// Resolves the injection point of `rule`'s chain to `rule` itself.
    /// Each chain can be resolved only once.
    pub fn inject(&mut self, rule: Rule<T>) -> Result<Rule<T>, GrammarError> {
        let chain = self.rules.get(rule).ok_or(GrammarError::UnknownRule)?.chain;
        if let Some(prev) = self.rules.slots[chain] {
            return Err(GrammarError::AlreadyInjected(self.repr(prev).to_string()));
        }
        self.rules.slots[chain] = Some(rule);
        Ok(rule)
    }

    /// Checks every rule reachable from `root` and freezes the grammar.
    /// - All handles must come from this builder.
    /// - All reachable injection points must be resolved.
    pub fn build(self, root: Rule<T>) -> Result<Grammar<T>, GrammarError> {
        let mut seen = HashSet::new();
        let mut stack = vec![root];

        while let Some(rule) = stack.pop() {
            if !seen.insert(rule.key.arr_idx()) {
                continue;
            }
            let node = self.rules.get(rule).ok_or(GrammarError::UnknownRule)?;
            match &node.kind {
                Kind::Leaf(_) | Kind::Empty(_) => (),
                Kind::And(and(first, second)) | Kind::Or(or(first, second)) => {
                    stack.push(*second);
                    stack.push(*first);
                }
                Kind::Rep(rep { base, .. }) | Kind::Map(map(base, _)) => stack.push(*base),
                Kind::Mark(mark { base, chain }) => match self.rules.slots[*chain] {
                    Some(injected) => {
                        stack.push(injected);
                        stack.push(*base);
                    }
                    None => return Err(GrammarError::Unresolved(self.repr(rule).to_string())),
                },
            }
        }

        log::debug!(
            "built grammar `{}`: {} reachable of {} rules, {} chains",
            self.repr(root),
            seen.len(),
            self.rules.nodes.len(),
            self.rules.slots.len()
        );
        Ok(Grammar::new(self.rules, root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_rules_share_a_chain() {
        let mut g = GrammarBuilder::<String>::new();
        let a = g.leaf("a").unwrap();
        let b = g.leaf("b").unwrap();
        let ab = g.and(a, b);
        let marked = g.mark_ipoint(ab);
        let alt = g.or(marked, b);

        let chain = |g: &GrammarBuilder<String>, r| g.rules.get(r).unwrap().chain;
        assert_eq!(chain(&g, a), chain(&g, ab));
        assert_eq!(chain(&g, a), chain(&g, marked));
        assert_eq!(chain(&g, a), chain(&g, alt));
        assert_ne!(chain(&g, a), chain(&g, b));
    }

    #[test]
    fn inject_only_once() {
        let mut g = GrammarBuilder::<String>::new();
        let a = g.leaf("a").unwrap();
        let marked = g.mark_ipoint(a);
        let e = g.empty();
        let alt = g.or(marked, e);
        g.inject(alt).unwrap();
        assert!(matches!(
            g.inject(marked),
            Err(GrammarError::AlreadyInjected(_))
        ));
    }

    #[test]
    fn unresolved_injection_is_rejected() {
        let mut g = GrammarBuilder::<String>::new();
        let a = g.leaf("a").unwrap();
        let marked = g.mark_ipoint(a);
        assert_eq!(
            g.build(marked).err(),
            Some(GrammarError::Unresolved(String::from("/a/...")))
        );
    }

    #[test]
    fn unreachable_injection_points_are_ignored() {
        let mut g = GrammarBuilder::<String>::new();
        let a = g.leaf("a").unwrap();
        let _unused = g.mark_ipoint(a);
        let b = g.leaf("b").unwrap();
        assert!(g.build(b).is_ok());
    }

    #[test]
    fn foreign_rule_is_rejected() {
        let mut other = GrammarBuilder::<String>::new();
        for _ in 0..5 {
            other.empty();
        }
        let foreign = other.leaf("y").unwrap();

        let mut g = GrammarBuilder::<String>::new();
        let a = g.leaf("a").unwrap();
        let both = g.and(a, foreign);
        assert_eq!(g.build(both).err(), Some(GrammarError::UnknownRule));
    }

    #[test]
    fn invalid_bounds() {
        let mut g = GrammarBuilder::<String>::new();
        let a = g.leaf("a").unwrap();
        assert!(g.rep(a, 3, Some(3)).is_ok());
        assert_eq!(
            g.rep(a, 3, Some(2)).err(),
            Some(GrammarError::InvalidBounds(String::from(
                "maximum 2 is less than minimum 3"
            )))
        );
    }

    #[test]
    fn repr_of_rules() {
        let mut g = GrammarBuilder::<String>::new();
        let a = g.leaf("a").unwrap();
        let b = g.leaf(r"\d").unwrap();
        let alt = g.or(a, b);
        let many = g.rep(alt, 1, None).unwrap();
        let e = g.empty();
        let seq = g.and(many, e);
        assert_eq!(g.repr(seq).to_string(), r"[(/a/ | /\d/)]{1,} <empty>");
    }
}
