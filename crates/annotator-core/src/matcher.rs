//! Pattern matching for rule namespaces and names.
//!
//! A pattern is a comma-separated list of entries. Each entry is a glob in
//! which `*` matches any run of characters (including none) and every other
//! character is literal; a leading `!` negates the entry. Entries are
//! evaluated left to right and the last entry that matches decides the
//! outcome, so `"!dev*,prod*"` matches `prod2` but not `dev2`.
//!
//! An empty pattern is equivalent to `*`. A pattern made only of empty
//! entries (`",,"`) has nothing to match with and never matches.

/// One comma-separated entry of a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
struct PatternEntry {
    negated: bool,
    glob: Vec<char>,
}

/// A parsed pattern, reusable across candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    entries: Vec<PatternEntry>,
}

impl Pattern {
    /// Parse a pattern. Parsing never fails; grammar checks live in
    /// [`crate::rules::validation`].
    pub fn parse(pattern: &str) -> Self {
        let effective = if pattern.is_empty() { "*" } else { pattern };
        let entries = effective
            .split(',')
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.strip_prefix('!') {
                Some(glob) => PatternEntry {
                    negated: true,
                    glob: glob.chars().collect(),
                },
                None => PatternEntry {
                    negated: false,
                    glob: entry.chars().collect(),
                },
            })
            .collect();

        Self {
            source: pattern.to_string(),
            entries,
        }
    }

    /// The pattern text as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Evaluate the pattern against `candidate`
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate: Vec<char> = candidate.chars().collect();
        let mut matched = false;
        for entry in &self.entries {
            if glob_matches(&entry.glob, &candidate) {
                matched = !entry.negated;
            }
        }
        matched
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Match `pattern` against `candidate` without keeping the parsed form.
///
/// # Example
///
/// ```
/// use annotator_core::matcher::matches;
///
/// assert!(matches("", "anything"));
/// assert!(matches("!dev*,prod*", "prod2"));
/// assert!(!matches("!dev*,prod*", "dev2"));
/// assert!(!matches(",,", "anything"));
/// ```
pub fn matches(pattern: &str, candidate: &str) -> bool {
    Pattern::parse(pattern).matches(candidate)
}

/// Whole-string glob match where `*` is the only metacharacter.
///
/// Greedy scan with a single backtrack point: on mismatch, resume just after
/// the most recent `*` and let it swallow one more character.
fn glob_matches(glob: &[char], candidate: &[char]) -> bool {
    let (mut g, mut c) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        if g < glob.len() && glob[g] == '*' {
            backtrack = Some((g, c));
            g += 1;
        } else if g < glob.len() && glob[g] == candidate[c] {
            g += 1;
            c += 1;
        } else if let Some((star, from)) = backtrack {
            g = star + 1;
            c = from + 1;
            backtrack = Some((star, from + 1));
        } else {
            return false;
        }
    }

    glob[g..].iter().all(|ch| *ch == '*')
}
