//! Options applied when compiling the pattern of every leaf rule.

use regex::RegexBuilder;

/// Regex options shared by all leaves of a [`GrammarBuilder`](crate::builder::GrammarBuilder).
///
/// The defaults compile each pattern exactly as written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    /// Upper bound (in bytes) on the size of a compiled pattern, `None` keeps
    /// the regex crate's default.
    pub size_limit: Option<usize>,
}

impl Config {
    pub fn with_case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    pub fn with_multi_line(mut self, yes: bool) -> Self {
        self.multi_line = yes;
        self
    }

    pub fn with_dot_matches_new_line(mut self, yes: bool) -> Self {
        self.dot_matches_new_line = yes;
        self
    }

    pub fn with_size_limit(mut self, bytes: usize) -> Self {
        self.size_limit = Some(bytes);
        self
    }

    pub(crate) fn apply<'b>(&self, builder: &'b mut RegexBuilder) -> &'b mut RegexBuilder {
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line);
        if let Some(limit) = self.size_limit {
            builder.size_limit(limit);
        }
        builder
    }
}
