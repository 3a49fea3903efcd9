//! Lossless PHP tokenizer.
//!
//! [`tokenize`] never fails: input it cannot classify becomes a
//! [`TokenKind::Unknown`] token and scanning resumes right after it. Token
//! texts always concatenate back to the original source, so positions
//! reported against the sequence are positions in the file.
//!
//! Sources containing a PHP open tag are scanned the way PHP itself does,
//! starting in inline-HTML mode. Sources without one (snippets, test
//! fixtures) are scanned as code from the first byte.

use crate::token::{Token, TokenKind, TokenSequence};

/// Splits `source` into tokens.
#[must_use]
pub fn tokenize(source: &str) -> TokenSequence<'_> {
    Tokenizer::new(source).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Html,
    Code,
}

struct Tokenizer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: usize,
    column: usize,
    mode: Mode,
    tokens: Vec<Token<'src>>,
}

impl<'src> Tokenizer<'src> {
    fn new(source: &'src str) -> Self {
        let mode = if find_open_tag(source.as_bytes(), 0).is_some() {
            Mode::Html
        } else {
            Mode::Code
        };
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            mode,
            tokens: Vec::with_capacity(source.len() / 4),
        }
    }

    fn run(mut self) -> TokenSequence<'src> {
        while self.pos < self.bytes.len() {
            let (kind, end) = match self.mode {
                Mode::Html => self.scan_html(),
                Mode::Code => self.scan_code(),
            };
            debug_assert!(end > self.pos, "tokenizer made no progress");
            self.emit(kind, end);
        }
        TokenSequence::new(self.source, self.tokens)
    }

    fn emit(&mut self, kind: TokenKind, end: usize) {
        let text = &self.source[self.pos..end];
        self.tokens.push(Token {
            kind,
            text,
            offset: self.pos,
            line: self.line,
            column: self.column,
        });
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    // ─── inline HTML ───────────────────────────────────────────────

    fn scan_html(&mut self) -> (TokenKind, usize) {
        if let Some((kind, len)) = open_tag_at(self.bytes, self.pos) {
            self.mode = Mode::Code;
            return (kind, self.pos + len);
        }
        let end = find_open_tag(self.bytes, self.pos).map_or(self.bytes.len(), |(at, _, _)| at);
        (TokenKind::InlineHtml, end)
    }

    // ─── code ──────────────────────────────────────────────────────

    fn scan_code(&mut self) -> (TokenKind, usize) {
        let start = self.pos;
        let b = self.bytes[start];
        match b {
            b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => {
                (TokenKind::Whitespace, self.skip_while(start, is_whitespace))
            }
            b'?' if self.peek(1) == Some(b'>') => self.close_tag(start),
            b'/' if self.peek(1) == Some(b'/') => {
                (TokenKind::Comment, self.line_comment_end(start))
            }
            b'/' if self.peek(1) == Some(b'*') => self.block_comment(start),
            b'#' if self.peek(1) == Some(b'[') => (TokenKind::Other, start + 2),
            b'#' => (TokenKind::Comment, self.line_comment_end(start)),
            b'$' if self.peek(1).is_some_and(is_ident_start) => (
                TokenKind::Variable,
                self.skip_while(start + 1, is_ident_continue),
            ),
            b'0'..=b'9' => (TokenKind::Number, self.number(start)),
            b'.' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => {
                (TokenKind::Number, self.number(start))
            }
            b'\'' | b'"' | b'`' => self.quoted(start, b),
            b'<' if self.bytes[start..].starts_with(b"<<<") => self.heredoc(start),
            b'(' => (TokenKind::OpenParen, start + 1),
            b')' => (TokenKind::CloseParen, start + 1),
            b'{' => (TokenKind::OpenBrace, start + 1),
            b'}' => (TokenKind::CloseBrace, start + 1),
            b'[' => (TokenKind::OpenBracket, start + 1),
            b']' => (TokenKind::CloseBracket, start + 1),
            b';' => (TokenKind::Semicolon, start + 1),
            b',' => (TokenKind::Comma, start + 1),
            c if is_ident_start(c) => self.word(start),
            c if c.is_ascii_punctuation() => (TokenKind::Other, start + 1),
            _ => (TokenKind::Unknown, start + 1),
        }
    }

    fn skip_while(&self, mut at: usize, pred: impl Fn(u8) -> bool) -> usize {
        while at < self.bytes.len() && pred(self.bytes[at]) {
            at += 1;
        }
        at
    }

    fn close_tag(&mut self, start: usize) -> (TokenKind, usize) {
        self.mode = Mode::Html;
        let mut end = start + 2;
        if self.bytes[end..].starts_with(b"\r\n") {
            end += 2;
        } else if self.bytes.get(end) == Some(&b'\n') {
            end += 1;
        }
        (TokenKind::CloseTag, end)
    }

    /// End of a `//` or `#` comment: before the line break or a `?>`.
    fn line_comment_end(&self, start: usize) -> usize {
        let mut at = start + 1;
        while at < self.bytes.len() {
            match self.bytes[at] {
                b'\n' | b'\r' => break,
                b'?' if self.bytes.get(at + 1) == Some(&b'>') => break,
                _ => at += 1,
            }
        }
        at
    }

    fn block_comment(&self, start: usize) -> (TokenKind, usize) {
        let doc = self.bytes.get(start + 2) == Some(&b'*')
            && self.bytes.get(start + 3).is_some_and(|&c| is_whitespace(c));
        let end = find(self.bytes, start + 2, b"*/").map_or(self.bytes.len(), |at| at + 2);
        let kind = if doc {
            TokenKind::DocComment
        } else {
            TokenKind::Comment
        };
        (kind, end)
    }

    fn word(&self, start: usize) -> (TokenKind, usize) {
        let end = self.skip_while(start, is_ident_continue);
        let text = &self.source[start..end];
        let kind = match TokenKind::keyword(text) {
            Some(keyword) if !self.follows_member_access() => keyword,
            _ => TokenKind::Identifier,
        };
        (kind, end)
    }

    /// True right after `->`, `?->` or `::`, where keywords are plain names.
    fn follows_member_access(&self) -> bool {
        let Some(last) = self
            .tokens
            .iter()
            .rev()
            .find(|t| t.kind != TokenKind::Whitespace)
        else {
            return false;
        };
        let Some(before) = self.tokens.iter().rev().find(|t| t.end() == last.offset) else {
            return false;
        };
        matches!((before.text, last.text), ("-", ">") | (":", ":"))
    }

    fn number(&self, start: usize) -> usize {
        let bytes = self.bytes;
        let radix = match (bytes[start], bytes.get(start + 1)) {
            (b'0', Some(b'x' | b'X')) => 16,
            (b'0', Some(b'b' | b'B')) => 2,
            (b'0', Some(b'o' | b'O')) => 8,
            _ => 10,
        };
        if radix != 10 {
            let is_digit = |c: u8| char::from(c).is_digit(radix);
            if bytes.get(start + 2).is_some_and(|&c| is_digit(c)) {
                return self.skip_while(start + 2, |c| is_digit(c) || c == b'_');
            }
        }

        let decimal = |c: u8| c.is_ascii_digit() || c == b'_';
        let mut at = self.skip_while(start, decimal);
        if bytes.get(at) == Some(&b'.') && bytes.get(at + 1).is_some_and(u8::is_ascii_digit) {
            at = self.skip_while(at + 1, decimal);
        }
        if matches!(bytes.get(at), Some(b'e' | b'E')) {
            let mut exp = at + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            if bytes.get(exp).is_some_and(u8::is_ascii_digit) {
                at = self.skip_while(exp, decimal);
            }
        }
        at
    }

    fn quoted(&self, start: usize, quote: u8) -> (TokenKind, usize) {
        let mut at = start + 1;
        while at < self.bytes.len() {
            match self.bytes[at] {
                b'\\' => at += 2,
                c if c == quote => return (TokenKind::String, at + 1),
                _ => at += 1,
            }
        }
        (TokenKind::Unknown, self.bytes.len())
    }

    fn heredoc(&self, start: usize) -> (TokenKind, usize) {
        let Some((label, body_start)) = heredoc_label(self.bytes, start) else {
            return (TokenKind::Other, start + 1);
        };
        let mut line_start = body_start;
        while line_start < self.bytes.len() {
            let indent_end = self.skip_while(line_start, |c| c == b' ' || c == b'\t');
            let rest = &self.bytes[indent_end..];
            if rest.starts_with(label)
                && !rest.get(label.len()).is_some_and(|&c| is_ident_continue(c))
            {
                return (TokenKind::Heredoc, indent_end + label.len());
            }
            line_start = match find(self.bytes, line_start, b"\n") {
                Some(newline) => newline + 1,
                None => break,
            };
        }
        (TokenKind::Heredoc, self.bytes.len())
    }
}

/// Parses `<<<ID`, `<<<"ID"` or `<<<'ID'` up to and including the line
/// break, returning the label and where the body begins.
fn heredoc_label(bytes: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let mut at = start + 3;
    while matches!(bytes.get(at), Some(b' ' | b'\t')) {
        at += 1;
    }
    let quote = match bytes.get(at) {
        Some(&q @ (b'\'' | b'"')) => {
            at += 1;
            Some(q)
        }
        _ => None,
    };
    if !bytes.get(at).is_some_and(|&c| is_ident_start(c)) {
        return None;
    }
    let label_start = at;
    while bytes.get(at).is_some_and(|&c| is_ident_continue(c)) {
        at += 1;
    }
    let label = &bytes[label_start..at];
    if let Some(q) = quote {
        if bytes.get(at) != Some(&q) {
            return None;
        }
        at += 1;
    }
    if bytes[at..].starts_with(b"\r\n") {
        Some((label, at + 2))
    } else if bytes.get(at) == Some(&b'\n') {
        Some((label, at + 1))
    } else {
        None
    }
}

/// Recognises an open tag at `at`, returning its kind and length.
///
/// `<?php` must be followed by whitespace or the end of input, and owns one
/// whitespace character (two for `\r\n`).
fn open_tag_at(bytes: &[u8], at: usize) -> Option<(TokenKind, usize)> {
    let rest = &bytes[at..];
    if rest.starts_with(b"<?=") {
        return Some((TokenKind::OpenTagWithEcho, 3));
    }
    if rest.len() < 5 || !rest.starts_with(b"<?") || !rest[2..5].eq_ignore_ascii_case(b"php") {
        return None;
    }
    match rest.get(5) {
        None => Some((TokenKind::OpenTag, 5)),
        Some(b'\r') if rest.get(6) == Some(&b'\n') => Some((TokenKind::OpenTag, 7)),
        Some(&c) if is_whitespace(c) => Some((TokenKind::OpenTag, 6)),
        Some(_) => None,
    }
}

/// Finds the next open tag at or after `from`.
fn find_open_tag(bytes: &[u8], from: usize) -> Option<(usize, TokenKind, usize)> {
    let mut at = from;
    while let Some(candidate) = find(bytes, at, b"<?") {
        if let Some((kind, len)) = open_tag_at(bytes, candidate) {
            return Some((candidate, kind, len));
        }
        at = candidate + 2;
    }
    None
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c >= 0x80
}

fn is_ident_continue(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}
