//! Helper macros

/// Helper to combine long sequences, nested to the right.
/// ```
/// # use recombi::{ands, GrammarBuilder};
/// let mut g = GrammarBuilder::<String>::new();
/// let (a, b, c) = (g.leaf("a").unwrap(), g.leaf("b").unwrap(), g.leaf("c").unwrap());
///
/// // g.and(a, g.and(b, c)) is equivalent to
/// let abc = ands!(g; a, b, c);
/// assert_eq!(g.repr(abc).to_string(), "/a/ /b/ /c/");
/// ```
#[macro_export]
macro_rules! ands {
    ($g:expr; $p:expr $(,)?) => {
        $p
    };
    ($g:expr; $p:expr , $($ts:tt)+) => {{
        let first = $p;
        let rest = $crate::ands!($g; $($ts)+);
        $g.and(first, rest)
    }};
}

pub use ands;

/// Helper to combine long ordered choices, nested to the right.
/// ```
/// # use recombi::{ors, GrammarBuilder};
/// let mut g = GrammarBuilder::<String>::new();
/// let (a, b, c) = (g.leaf("a").unwrap(), g.leaf("b").unwrap(), g.leaf("c").unwrap());
///
/// // g.or(a, g.or(b, c)) is equivalent to
/// let any = ors!(g; a, b, c);
/// assert_eq!(g.repr(any).to_string(), "(/a/ | (/b/ | /c/))");
/// ```
#[macro_export]
macro_rules! ors {
    ($g:expr; $p:expr $(,)?) => {
        $p
    };
    ($g:expr; $p:expr , $($ts:tt)+) => {{
        let first = $p;
        let rest = $crate::ors!($g; $($ts)+);
        $g.or(first, rest)
    }};
}

pub use ors;

#[cfg(test)]
mod tests {
    use crate::GrammarBuilder;

    #[test]
    fn ands_in_order() {
        let mut g = GrammarBuilder::<String>::new();
        let key = g.leaf("[a-z]+").unwrap();
        let eq = g.leaf("=").unwrap();
        let value = g.leaf("[0-9]+").unwrap();
        let pair = ands!(g; key, eq, value);
        let grammar = g.build(pair).unwrap();
        assert_eq!(grammar.parse("x=1").unwrap(), ["x", "=", "1"]);
    }

    #[test]
    fn ors_first_match_wins() {
        let mut g = GrammarBuilder::<String>::new();
        let kw = g.leaf("let").unwrap();
        let ident = g.leaf("[a-z]+").unwrap();
        let num = g.leaf("[0-9]+").unwrap();
        let atom = ors!(g; kw, ident, num,);
        let grammar = g.build(atom).unwrap();
        assert_eq!(grammar.parse_prefix("letter").unwrap().tokens, ["let"]);
        assert_eq!(grammar.parse("42").unwrap(), ["42"]);
    }

    #[test]
    fn single_operand() {
        let mut g = GrammarBuilder::<String>::new();
        let a = g.leaf("a").unwrap();
        let only = ands!(g; a);
        assert_eq!(g.repr(only).to_string(), "/a/");
    }
}
