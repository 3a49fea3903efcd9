//! Directional token lookup.
//!
//! Rules never walk the token list by hand. They describe what they are
//! looking for with a [`Search`] and ask the [`TokenSequence`] for the next
//! or previous match. A miss is `None`: running off the end of the stream is
//! an ordinary outcome (think `else` as the last token of a file).
//!
//! ```
//! use sniff_core::{tokenize, Search, TokenKind};
//!
//! let tokens = tokenize("else   if ($b) {}");
//! let next = tokens.find_next(0, &Search::none_of(&[TokenKind::Whitespace]));
//! assert_eq!(next, Some(2));
//! assert_eq!(tokens[2].kind, TokenKind::If);
//! ```

use crate::token::{Token, TokenKind, TokenSequence};

/// Which tokens a [`Search`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'k> {
    /// Tokens whose kind is in the set.
    AnyOf(&'k [TokenKind]),
    /// Tokens whose kind is not in the set.
    NoneOf(&'k [TokenKind]),
}

impl Target<'_> {
    fn accepts(self, kind: TokenKind) -> bool {
        match self {
            Self::AnyOf(kinds) => kinds.contains(&kind),
            Self::NoneOf(kinds) => !kinds.contains(&kind),
        }
    }
}

/// A token lookup request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Search<'k> {
    target: Target<'k>,
    skip: &'k [TokenKind],
    end: Option<usize>,
    text: Option<&'k str>,
    local: bool,
}

impl<'k> Search<'k> {
    /// Finds the first token whose kind is one of `kinds`.
    #[must_use]
    pub fn any_of(kinds: &'k [TokenKind]) -> Self {
        Self::new(Target::AnyOf(kinds))
    }

    /// Finds the first token whose kind is not one of `kinds`.
    #[must_use]
    pub fn none_of(kinds: &'k [TokenKind]) -> Self {
        Self::new(Target::NoneOf(kinds))
    }

    /// Creates a search for the given target.
    #[must_use]
    pub fn new(target: Target<'k>) -> Self {
        Self {
            target,
            skip: &[],
            end: None,
            text: None,
            local: false,
        }
    }

    /// Passes over tokens of these kinds without considering them.
    #[must_use]
    pub fn skipping(mut self, kinds: &'k [TokenKind]) -> Self {
        self.skip = kinds;
        self
    }

    /// Stops before reaching index `end` (exclusive, in search direction).
    #[must_use]
    pub fn until(mut self, end: usize) -> Self {
        self.end = Some(end);
        self
    }

    /// Only accepts tokens whose text equals `text`.
    #[must_use]
    pub fn with_text(mut self, text: &'k str) -> Self {
        self.text = Some(text);
        self
    }

    /// Gives up at the first `;` that is not itself a match.
    #[must_use]
    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }

    fn skips(&self, token: &Token<'_>) -> bool {
        self.skip.contains(&token.kind)
    }

    fn matches(&self, token: &Token<'_>) -> bool {
        self.target.accepts(token.kind) && self.text.map_or(true, |text| token.text == text)
    }

    fn scan(
        &self,
        tokens: &TokenSequence<'_>,
        indices: impl Iterator<Item = usize>,
    ) -> Option<usize> {
        for index in indices {
            let token = &tokens[index];
            if self.skips(token) {
                continue;
            }
            if self.matches(token) {
                return Some(index);
            }
            if self.local && token.kind == TokenKind::Semicolon {
                return None;
            }
        }
        None
    }
}

impl TokenSequence<'_> {
    /// Index of the first token after `from` accepted by `search`.
    #[must_use]
    pub fn find_next(&self, from: usize, search: &Search<'_>) -> Option<usize> {
        let start = from.checked_add(1)?;
        let end = search.end.map_or(self.len(), |end| end.min(self.len()));
        search.scan(self, start..end)
    }

    /// Index of the last token before `from` accepted by `search`.
    #[must_use]
    pub fn find_previous(&self, from: usize, search: &Search<'_>) -> Option<usize> {
        let stop = search.end.map_or(0, |end| end.saturating_add(1));
        search.scan(self, (stop..from.min(self.len())).rev())
    }

    /// Like [`find_next`](Self::find_next) with arbitrary predicates.
    ///
    /// Tokens for which `skip` holds are never returned, even if `target`
    /// accepts them.
    pub fn find_next_where<T, S>(&self, from: usize, target: T, skip: S) -> Option<usize>
    where
        T: Fn(&Token<'_>) -> bool,
        S: Fn(&Token<'_>) -> bool,
    {
        let start = from.checked_add(1)?;
        (start..self.len()).find(|&i| !skip(&self[i]) && target(&self[i]))
    }

    /// Like [`find_previous`](Self::find_previous) with arbitrary predicates.
    pub fn find_previous_where<T, S>(&self, from: usize, target: T, skip: S) -> Option<usize>
    where
        T: Fn(&Token<'_>) -> bool,
        S: Fn(&Token<'_>) -> bool,
    {
        (0..from.min(self.len()))
            .rev()
            .find(|&i| !skip(&self[i]) && target(&self[i]))
    }
}
