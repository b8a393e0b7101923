//! Escaper
//!
//! Marks selector metacharacters that sit inside balanced `(...)` or `[...]`
//! blocks so that top-level splitting on commas, combinators and whitespace
//! never looks inside pseudo-class arguments or attribute selectors.
//!
//! The outer delimiters of a block stay [`Glyph::Plain`]; everything between
//! them becomes [`Glyph::Hidden`] (one of the twelve metacharacters) or
//! [`Glyph::Nested`] (any other character). Nested blocks are hidden as part
//! of their enclosing block. A block whose delimiter never closes is left
//! untouched.

/// Metacharacters that carry meaning at the top level of a selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meta {
    Tilde,
    Hash,
    OpenParen,
    CloseParen,
    Plus,
    OpenBracket,
    CloseBracket,
    Colon,
    Comma,
    Dot,
    Greater,
    Space,
}

impl Meta {
    pub const ALL: [Meta; 12] = [
        Meta::Tilde,
        Meta::Hash,
        Meta::OpenParen,
        Meta::CloseParen,
        Meta::Plus,
        Meta::OpenBracket,
        Meta::CloseBracket,
        Meta::Colon,
        Meta::Comma,
        Meta::Dot,
        Meta::Greater,
        Meta::Space,
    ];

    pub fn from_char(c: char) -> Option<Meta> {
        Some(match c {
            '~' => Meta::Tilde,
            '#' => Meta::Hash,
            '(' => Meta::OpenParen,
            ')' => Meta::CloseParen,
            '+' => Meta::Plus,
            '[' => Meta::OpenBracket,
            ']' => Meta::CloseBracket,
            ':' => Meta::Colon,
            ',' => Meta::Comma,
            '.' => Meta::Dot,
            '>' => Meta::Greater,
            ' ' => Meta::Space,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Meta::Tilde => '~',
            Meta::Hash => '#',
            Meta::OpenParen => '(',
            Meta::CloseParen => ')',
            Meta::Plus => '+',
            Meta::OpenBracket => '[',
            Meta::CloseBracket => ']',
            Meta::Colon => ':',
            Meta::Comma => ',',
            Meta::Dot => '.',
            Meta::Greater => '>',
            Meta::Space => ' ',
        }
    }
}

/// One character of an escaped selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// Top-level character, significant to the tokenizer
    Plain(char),
    /// Metacharacter inside a block
    Hidden(Meta),
    /// Ordinary character inside a block
    Nested(char),
}

impl Glyph {
    /// The character this glyph stands for
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Glyph::Plain(c) | Glyph::Nested(c) => c,
            Glyph::Hidden(m) => m.as_char(),
        }
    }

    /// True for the top-level character `c`
    #[inline]
    pub fn is(self, c: char) -> bool {
        self == Glyph::Plain(c)
    }

    fn inside(c: char) -> Glyph {
        Meta::from_char(c).map_or(Glyph::Nested(c), Glyph::Hidden)
    }
}

/// Hide metacharacters nested in balanced blocks
pub fn hide(selector: &str) -> Vec<Glyph> {
    let chars: Vec<char> = selector.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if matches!(c, '(' | '[') {
            if let Some(close) = find_close(&chars, i) {
                out.push(Glyph::Plain(c));
                out.extend(chars[i + 1..close].iter().map(|&c| Glyph::inside(c)));
                out.push(Glyph::Plain(chars[close]));
                i = close + 1;
                continue;
            }
        }
        out.push(Glyph::Plain(c));
        i += 1;
    }
    out
}

/// Restore the original text
pub fn reveal(glyphs: &[Glyph]) -> String {
    glyphs.iter().map(|g| g.as_char()).collect()
}

/// Index of the delimiter closing the block opened at `open`.
/// Quoted text is skipped; a mismatched or missing closer yields `None`.
fn find_close(chars: &[char], open: usize) -> Option<usize> {
    let mut stack = vec![closer(chars[open])?];
    let mut i = open + 1;

    while i < chars.len() {
        match chars[i] {
            q @ ('"' | '\'') if opens_string(chars, i, stack.last() == Some(&']')) => {
                // an unterminated quote is an ordinary character
                if let Some(len) = chars[i + 1..].iter().position(|&c| c == q) {
                    i += len + 1;
                }
            }
            c @ ('(' | '[') => stack.push(closer(c)?),
            c @ (')' | ']') => {
                if stack.pop() != Some(c) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// A quote starts a string inside attribute blocks, or in parentheses when
/// it begins an argument (`(`, `,` or `=` before it). Elsewhere, as in
/// `:contains(don't)`, it is plain text.
fn opens_string(chars: &[char], quote: usize, in_brackets: bool) -> bool {
    in_brackets
        || chars[..quote]
            .iter()
            .rev()
            .find(|c| !c.is_whitespace())
            .is_some_and(|c| matches!(c, '(' | ',' | '='))
}

fn closer(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        _ => None,
    }
}
