//! Input side of the interpreter: a forward-only cursor over the bytes given
//! at invocation time, plus the policy for reading past their end.

use std::fmt;
use std::str::FromStr;

/// What `,` does once the input has been fully consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EofPolicy {
    /// Abort with [`InputExhausted`](crate::InterpretError::InputExhausted).
    #[default]
    Error,
    /// Store 0 in the current cell and keep going.
    Zero,
}

impl fmt::Display for EofPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EofPolicy::Error => write!(f, "error"),
            EofPolicy::Zero => write!(f, "zero"),
        }
    }
}

impl FromStr for EofPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" | "fail" => Ok(EofPolicy::Error),
            "zero" | "0" => Ok(EofPolicy::Zero),
            other => Err(format!("unknown EOF policy '{other}' (expected 'error' or 'zero')")),
        }
    }
}

/// Forward-only reader over the program input.
#[derive(Debug, Clone)]
pub struct InputCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> InputCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Next input byte, or `None` once the input is used up.
    /// The cursor never moves past the end.
    pub fn next_byte(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.position).copied()?;
        self.position += 1;
        Some(b)
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bytes_in_order_then_stops() {
        let mut input = InputCursor::new(b"ab");
        assert_eq!(input.next_byte(), Some(b'a'));
        assert_eq!(input.next_byte(), Some(b'b'));
        assert_eq!(input.next_byte(), None);
        assert_eq!(input.next_byte(), None);
        assert_eq!(input.position(), 2);
    }

    #[test]
    fn eof_policy_parses_case_insensitively() {
        assert_eq!("Zero".parse::<EofPolicy>(), Ok(EofPolicy::Zero));
        assert_eq!(" error ".parse::<EofPolicy>(), Ok(EofPolicy::Error));
        assert!("ignore".parse::<EofPolicy>().is_err());
    }

    #[test]
    fn default_policy_is_error() {
        assert_eq!(EofPolicy::default(), EofPolicy::Error);
    }
}
