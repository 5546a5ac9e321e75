use std::collections::HashSet;

use tracing::instrument;

/// Split text into words: maximal runs of non-whitespace characters.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// A set of target words, matched against text without regard to case.
///
/// Targets are normalized once on construction, so a matcher can be reused
/// across many texts. Empty (or whitespace-only) targets can never match a
/// word and are dropped.
///
/// ```
/// use shelf_tokenize::WordMatcher;
///
/// let matcher = WordMatcher::new(["rust", "Borrow"]);
/// assert!(matcher.matches("Fighting the borrow checker"));
/// assert!(!matcher.matches("rusty tools")); // whole words only
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordMatcher {
    targets: HashSet<String>,
}

impl WordMatcher {
    pub fn new<S: AsRef<str>>(targets: impl IntoIterator<Item = S>) -> Self {
        let targets = targets
            .into_iter()
            .map(|target| target.as_ref().trim().to_lowercase())
            .filter(|target| !target.is_empty())
            .collect();
        Self { targets }
    }

    /// Returns `true` if there are no usable targets (nothing can match).
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Returns `true` if at least one word of `text` equals a target,
    /// ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        !self.targets.is_empty() && words(text).any(|word| self.targets.contains(&word.to_lowercase()))
    }
}

/// One-shot form of [`WordMatcher::matches`].
pub fn contains_any<S: AsRef<str>>(text: &str, targets: impl IntoIterator<Item = S>) -> bool {
    WordMatcher::new(targets).matches(text)
}

/// Keep the items whose text contains at least one of `targets`, preserving
/// their order.
#[instrument(level = "trace", skip_all, fields(items = items.len(), kept))]
pub fn containing<'a, T, S: AsRef<str>>(
    items: &'a [T],
    targets: impl IntoIterator<Item = S>,
    text_of: impl Fn(&T) -> &str,
) -> Vec<&'a T> {
    let matcher = WordMatcher::new(targets);
    let kept: Vec<&T> = items.iter().filter(|item| matcher.matches(text_of(*item))).collect();
    tracing::Span::current().record("kept", kept.len());
    kept
}
