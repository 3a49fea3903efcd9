//! Token types produced by the tokenizer.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Lexical category of a token.
///
/// Keywords get one variant each so rules can register for them directly.
/// Everything the tokenizer cannot classify more precisely ends up in
/// [`TokenKind::Other`] (well-formed punctuation) or [`TokenKind::Unknown`]
/// (lexical anomalies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// A run of spaces, tabs and line breaks.
    Whitespace,
    /// `// ...`, `# ...` or `/* ... */`.
    Comment,
    /// `/** ... */`.
    DocComment,
    /// `<?php` including the whitespace character that follows it.
    OpenTag,
    /// `<?=`.
    OpenTagWithEcho,
    /// `?>` including one directly following newline.
    CloseTag,
    /// Text outside of PHP tags.
    InlineHtml,
    /// `$name`.
    Variable,
    /// A bare name that is not a keyword.
    Identifier,
    /// Integer or floating point literal.
    Number,
    /// Single-, double- or backtick-quoted literal.
    String,
    /// Heredoc or nowdoc literal, from `<<<` through the closing marker.
    Heredoc,
    /// `(`.
    OpenParen,
    /// `)`.
    CloseParen,
    /// `{`.
    OpenBrace,
    /// `}`.
    CloseBrace,
    /// `[`.
    OpenBracket,
    /// `]`.
    CloseBracket,
    /// `;`.
    Semicolon,
    /// `,`.
    Comma,
    /// Operators and any other single punctuation character.
    Other,
    /// Input the tokenizer could not make sense of.
    Unknown,

    /// `abstract`
    Abstract,
    /// `as`
    As,
    /// `break`
    Break,
    /// `case`
    Case,
    /// `catch`
    Catch,
    /// `class`
    Class,
    /// `const`
    Const,
    /// `continue`
    Continue,
    /// `default`
    Default,
    /// `do`
    Do,
    /// `echo`
    Echo,
    /// `else`
    Else,
    /// `elseif`
    ElseIf,
    /// `endfor`
    EndFor,
    /// `endforeach`
    EndForeach,
    /// `endif`
    EndIf,
    /// `endswitch`
    EndSwitch,
    /// `endwhile`
    EndWhile,
    /// `enum`
    Enum,
    /// `extends`
    Extends,
    /// `final`
    Final,
    /// `finally`
    Finally,
    /// `fn`
    Fn,
    /// `for`
    For,
    /// `foreach`
    Foreach,
    /// `function`
    Function,
    /// `global`
    Global,
    /// `if`
    If,
    /// `implements`
    Implements,
    /// `include`
    Include,
    /// `include_once`
    IncludeOnce,
    /// `instanceof`
    Instanceof,
    /// `interface`
    Interface,
    /// `match`
    Match,
    /// `namespace`
    Namespace,
    /// `new`
    New,
    /// `private`
    Private,
    /// `protected`
    Protected,
    /// `public`
    Public,
    /// `readonly`
    Readonly,
    /// `require`
    Require,
    /// `require_once`
    RequireOnce,
    /// `return`
    Return,
    /// `static`
    Static,
    /// `switch`
    Switch,
    /// `throw`
    Throw,
    /// `trait`
    Trait,
    /// `try`
    Try,
    /// `use`
    Use,
    /// `var`
    Var,
    /// `while`
    While,
    /// `yield`
    Yield,
}

/// Keyword spellings, lowercase, sorted for binary search.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("abstract", TokenKind::Abstract),
    ("as", TokenKind::As),
    ("break", TokenKind::Break),
    ("case", TokenKind::Case),
    ("catch", TokenKind::Catch),
    ("class", TokenKind::Class),
    ("const", TokenKind::Const),
    ("continue", TokenKind::Continue),
    ("default", TokenKind::Default),
    ("do", TokenKind::Do),
    ("echo", TokenKind::Echo),
    ("else", TokenKind::Else),
    ("elseif", TokenKind::ElseIf),
    ("endfor", TokenKind::EndFor),
    ("endforeach", TokenKind::EndForeach),
    ("endif", TokenKind::EndIf),
    ("endswitch", TokenKind::EndSwitch),
    ("endwhile", TokenKind::EndWhile),
    ("enum", TokenKind::Enum),
    ("extends", TokenKind::Extends),
    ("final", TokenKind::Final),
    ("finally", TokenKind::Finally),
    ("fn", TokenKind::Fn),
    ("for", TokenKind::For),
    ("foreach", TokenKind::Foreach),
    ("function", TokenKind::Function),
    ("global", TokenKind::Global),
    ("if", TokenKind::If),
    ("implements", TokenKind::Implements),
    ("include", TokenKind::Include),
    ("include_once", TokenKind::IncludeOnce),
    ("instanceof", TokenKind::Instanceof),
    ("interface", TokenKind::Interface),
    ("match", TokenKind::Match),
    ("namespace", TokenKind::Namespace),
    ("new", TokenKind::New),
    ("private", TokenKind::Private),
    ("protected", TokenKind::Protected),
    ("public", TokenKind::Public),
    ("readonly", TokenKind::Readonly),
    ("require", TokenKind::Require),
    ("require_once", TokenKind::RequireOnce),
    ("return", TokenKind::Return),
    ("static", TokenKind::Static),
    ("switch", TokenKind::Switch),
    ("throw", TokenKind::Throw),
    ("trait", TokenKind::Trait),
    ("try", TokenKind::Try),
    ("use", TokenKind::Use),
    ("var", TokenKind::Var),
    ("while", TokenKind::While),
    ("yield", TokenKind::Yield),
];

/// Longest keyword spelling, used to bound the lowercase buffer.
const MAX_KEYWORD_LEN: usize = 12;

impl TokenKind {
    /// Looks up a keyword by its spelling, ignoring ASCII case.
    ///
    /// Returns `None` for anything that is not a whole keyword, so
    /// `ifSomething` stays an identifier.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        if word.is_empty() || word.len() > MAX_KEYWORD_LEN || !word.is_ascii() {
            return None;
        }
        let mut buf = [0u8; MAX_KEYWORD_LEN];
        let lowered = &mut buf[..word.len()];
        lowered.copy_from_slice(word.as_bytes());
        lowered.make_ascii_lowercase();
        let lowered = std::str::from_utf8(lowered).ok()?;
        KEYWORDS
            .binary_search_by(|(spelling, _)| (*spelling).cmp(lowered))
            .ok()
            .map(|i| KEYWORDS[i].1)
    }

    /// Returns true for keyword kinds.
    #[must_use]
    pub fn is_keyword(self) -> bool {
        self >= Self::Abstract
    }

    /// Returns true for whitespace and both comment kinds.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment | Self::DocComment)
    }
}

/// A single lexical unit borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// Lexical category.
    pub kind: TokenKind,
    /// Exact source text of the token.
    pub text: &'src str,
    /// Byte offset of the first byte.
    pub offset: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number in characters (1-indexed).
    pub column: usize,
}

impl Token<'_> {
    /// Byte offset one past the last byte.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the token covers no text. Never the case for
    /// tokens produced by the tokenizer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns true if this token is of the given kind.
    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Ordered, read-only token list for one source text.
///
/// Token texts concatenate back to the source, offsets strictly increase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence<'src> {
    source: &'src str,
    tokens: Vec<Token<'src>>,
}

impl<'src> TokenSequence<'src> {
    pub(crate) fn new(source: &'src str, tokens: Vec<Token<'src>>) -> Self {
        Self { source, tokens }
    }

    /// The source text this sequence was produced from.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the source was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token<'src>> {
        self.tokens.get(index)
    }

    /// Kind of the token at `index`, if any.
    #[must_use]
    pub fn kind(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).map(|t| t.kind)
    }

    /// Iterates tokens in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token<'src>> {
        self.tokens.iter()
    }

    /// All tokens as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Token<'src>] {
        &self.tokens
    }
}

impl<'src> Index<usize> for TokenSequence<'src> {
    type Output = Token<'src>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}

impl<'a, 'src> IntoIterator for &'a TokenSequence<'src> {
    type Item = &'a Token<'src>;
    type IntoIter = std::slice::Iter<'a, Token<'src>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_is_sorted() {
        assert!(KEYWORDS.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(KEYWORDS.iter().all(|(s, _)| s.len() <= MAX_KEYWORD_LEN));
    }

    #[test]
    fn keyword_lookup_ignores_case() {
        assert_eq!(TokenKind::keyword("else"), Some(TokenKind::Else));
        assert_eq!(TokenKind::keyword("ELSE"), Some(TokenKind::Else));
        assert_eq!(TokenKind::keyword("If"), Some(TokenKind::If));
        assert_eq!(TokenKind::keyword("elseIf"), Some(TokenKind::ElseIf));
    }

    #[test]
    fn keyword_lookup_requires_whole_word() {
        assert_eq!(TokenKind::keyword("ifSomethingElse"), None);
        assert_eq!(TokenKind::keyword("els"), None);
        assert_eq!(TokenKind::keyword(""), None);
        assert_eq!(TokenKind::keyword("élse"), None);
    }

    #[test]
    fn keyword_classification() {
        assert!(TokenKind::If.is_keyword());
        assert!(TokenKind::Yield.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(!TokenKind::Unknown.is_keyword());
        assert!(TokenKind::DocComment.is_trivia());
        assert!(!TokenKind::If.is_trivia());
    }
}
