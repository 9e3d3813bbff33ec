/// Literal substring matcher applied to each scanned line.
///
/// Matching is plain byte-for-byte containment; there is no pattern language.
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    pattern: String,
}

impl LiteralMatcher {
    /// Creates a matcher for the given literal pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// The pattern this matcher was built from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether `line` contains the pattern.
    pub fn is_match(&self, line: &str) -> bool {
        line.contains(&self.pattern)
    }

    /// Finds every occurrence of the pattern in `line` as `(start, end)`
    /// byte offsets, in order.
    pub fn find_matches(&self, line: &str) -> Vec<(usize, usize)> {
        line.match_indices(&self.pattern)
            .map(|(start, matched)| (start, start + matched.len()))
            .collect()
    }
}
