//! Rules derived from the [core](crate::GrammarBuilder) combinators.

use crate::{GrammarBuilder, Rule};

impl<T> GrammarBuilder<T> {
    /// Zero or more repetitions of `base`, like `*` in a regex.
    pub fn rep_star(&mut self, base: Rule<T>) -> Rule<T> {
        self.repeat(base, 0, None)
    }

    /// One or more repetitions of `base`, like `+` in a regex.
    pub fn rep_plus(&mut self, base: Rule<T>) -> Rule<T> {
        self.repeat(base, 1, None)
    }

    /// At least `min` repetitions of `base`, like `{min,}` in a regex.
    pub fn rep_min(&mut self, base: Rule<T>, min: usize) -> Rule<T> {
        self.repeat(base, min, None)
    }

    /// Requires `base` to match, but drops its tokens.
    /// ```
    /// # use recombi::GrammarBuilder;
    /// let mut g = GrammarBuilder::<String>::new();
    /// let word = g.leaf("[a-z]+").unwrap();
    /// let comma = g.leaf(r",\s*").unwrap();
    /// let comma = g.map_discard(comma);
    /// let next = g.and(comma, word);
    /// let rest = g.rep_star(next);
    /// let list = g.and(word, rest);
    ///
    /// let grammar = g.build(list).unwrap();
    /// assert_eq!(grammar.parse("a, b,c").unwrap(), ["a", "b", "c"]);
    /// ```
    pub fn map_discard(&mut self, base: Rule<T>) -> Rule<T> {
        self.map(base, |_| Vec::new())
    }

    /// `base` or nothing.
    pub fn opt(&mut self, base: Rule<T>) -> Rule<T> {
        let nothing = self.empty();
        self.or(base, nothing)
    }
}
