//! The regex leaf, the only rule that consumes input.

use crate::{
    config::Config,
    error::{FailReason, Failure, GrammarError},
};
use regex::{Regex, RegexBuilder};

/// A pattern anchored at the current offset. Matches a prefix of the
/// remaining input, the rest is left for subsequent rules.
/// - `\A` anchors regardless of [`Config::multi_line`].
/// - A pattern can still escape the wrapping group (`a)|(?:b`), so matches
///   not starting at the offset are rejected as well.
#[derive(Clone, Debug)]
pub struct Leaf {
    pattern: String,
    regex: Regex,
}

impl Leaf {
    pub fn new(pattern: &str, config: &Config) -> Result<Self, GrammarError> {
        let regex = config
            .apply(&mut RegexBuilder::new(&format!(r"\A(?:{pattern})")))
            .build()
            .map_err(|e| GrammarError::InvalidPattern {
                pattern: pattern.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            pattern: pattern.to_owned(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the matched text and the offset after it.
    pub fn comp<'i>(&self, input: &'i str, pos: usize) -> Result<(&'i str, usize), Failure> {
        let Some(rest) = input.get(pos..).filter(|rest| !rest.is_empty()) else {
            return Err(Failure::new(FailReason::OutOfBounds, pos));
        };
        match self.regex.find(rest).filter(|m| m.start() == 0) {
            Some(m) => {
                log::trace!("/{}/ matched {:?} at {pos}", self.pattern, m.as_str());
                Ok((m.as_str(), pos + m.end()))
            }
            None => {
                log::trace!("/{}/ failed at {pos}", self.pattern);
                Err(Failure::new(FailReason::NoToken, pos))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(pattern: &str) -> Leaf {
        Leaf::new(pattern, &Config::default()).unwrap()
    }

    #[test]
    fn matches_prefix_only() {
        assert_eq!(leaf(r"\d+").comp("12ab", 0), Ok(("12", 2)));
        assert_eq!(leaf(r"\d+").comp("ab12", 2), Ok(("12", 4)));
    }

    #[test]
    fn anchored_at_offset() {
        assert_eq!(
            leaf("b").comp("ab", 0),
            Err(Failure::new(FailReason::NoToken, 0))
        );
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        assert_eq!(leaf("x|b").comp("ab", 0), Err(Failure::new(FailReason::NoToken, 0)));
        assert_eq!(leaf("a|ab").comp("ab", 0), Ok(("a", 1)));
    }

    #[test]
    fn out_of_bounds_even_for_empty_pattern() {
        assert_eq!(
            leaf("a*").comp("aa", 2),
            Err(Failure::new(FailReason::OutOfBounds, 2))
        );
        assert_eq!(
            leaf("a*").comp("", 0),
            Err(Failure::new(FailReason::OutOfBounds, 0))
        );
    }

    #[test]
    fn empty_match_before_end() {
        assert_eq!(leaf("a*").comp("b", 0), Ok(("", 0)));
    }

    #[test]
    fn invalid_pattern() {
        assert!(matches!(
            Leaf::new("(", &Config::default()),
            Err(GrammarError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn anchored_in_multi_line_mode() {
        let multi = Leaf::new("b", &Config::default().with_multi_line(true)).unwrap();
        assert_eq!(multi.comp("a\nb", 0), Err(Failure::new(FailReason::NoToken, 0)));
        assert_eq!(multi.comp("a\nb", 2), Ok(("b", 3)));

        let line_end = Leaf::new("a$", &Config::default().with_multi_line(true)).unwrap();
        assert_eq!(line_end.comp("a\nb", 0), Ok(("a", 1)));
    }

    #[test]
    fn escaping_the_group_stays_anchored() {
        assert_eq!(leaf("a)|(?:b").comp("xb", 0), Err(Failure::new(FailReason::NoToken, 0)));
        assert_eq!(leaf("a)|(?:b").comp("bx", 0), Ok(("b", 1)));
    }

    #[test]
    fn multibyte_offsets() {
        assert_eq!(leaf("é+").comp("aéé!", 1), Ok(("éé", 5)));
    }
}
