//! `an+b` arguments of `:nth-child()` and `:nth-last-child()`

/// Positions `a*k + b` for every `k >= 0`, counted from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpression {
    pub a: i32,
    pub b: i32,
}

impl NthExpression {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    pub fn odd() -> Self {
        Self::new(2, 1)
    }

    pub fn even() -> Self {
        Self::new(2, 0)
    }

    /// Exactly position `n`
    pub fn index(n: i32) -> Self {
        Self::new(0, n)
    }

    /// Parse `odd`, `even`, `7`, `2n`, `-n+3`, `3n - 1`. Whitespace and case
    /// are ignored; anything else yields `None`.
    pub fn parse(arg: &str) -> Option<Self> {
        let compact: String = arg
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if compact == "odd" {
            return Some(Self::odd());
        }
        if compact == "even" {
            return Some(Self::even());
        }

        let Some((coefficient, offset)) = compact.split_once('n') else {
            return compact.parse().ok().map(Self::index);
        };
        let a = match coefficient {
            "" | "+" => 1,
            "-" => -1,
            digits => digits.parse().ok()?,
        };
        let b = match offset {
            "" => 0,
            signed if signed.starts_with(['+', '-']) => signed.parse().ok()?,
            _ => return None,
        };
        Some(Self::new(a, b))
    }

    /// Whether 1-based `position` is selected
    pub fn matches(&self, position: i32) -> bool {
        if self.a == 0 {
            return position == self.b;
        }
        // i64 holds every difference of two i32 values
        let (a, delta) = (i64::from(self.a), i64::from(position) - i64::from(self.b));
        delta % a == 0 && delta / a >= 0
    }
}
