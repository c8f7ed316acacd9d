//! Loop bracket resolution.
//!
//! [`find_loop_end`] is the direct nesting-counter scan: given the code just
//! past an opening `[`, it returns where that loop's `]` sits. [`JumpTable`]
//! computes the same pairing for the whole program in one stack pass so the
//! interpreter can jump in O(1).

use crate::error::{InterpretError, Result};

/// Find the `]` that closes a loop whose body starts at `code[0]`.
///
/// Nested `[`/`]` pairs inside the body are skipped. The returned index is
/// relative to `code`. `None` means the loop is never closed.
pub fn find_loop_end(code: &[char]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &c) in code.iter().enumerate() {
        match c {
            '[' => depth += 1,
            ']' if depth == 0 => return Some(i),
            ']' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Matching bracket positions for a whole program.
///
/// `targets[i]` holds the matching index for a paired `[` or `]` at `i`.
/// A `]` that closes nothing keeps `None` and is executed as a no-op.
#[derive(Debug, Clone)]
pub struct JumpTable {
    targets: Vec<Option<usize>>,
}

impl JumpTable {
    /// Pair every bracket in `code`, failing on the innermost `[` left open.
    pub fn build(code: &[char]) -> Result<Self> {
        let mut targets: Vec<Option<usize>> = vec![None; code.len()];
        let mut stack: Vec<usize> = Vec::new();

        for (i, &c) in code.iter().enumerate() {
            if c == '[' {
                stack.push(i);
            } else if c == ']' {
                let Some(open_index) = stack.pop() else {
                    continue;
                };
                targets[open_index] = Some(i);
                targets[i] = Some(open_index);
            }
        }

        if let Some(unmatched_open) = stack.last().copied() {
            return Err(InterpretError::MalformedProgram { ip: unmatched_open });
        }

        Ok(Self { targets })
    }

    pub fn target(&self, ip: usize) -> Option<usize> {
        self.targets.get(ip).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn finds_flat_loop_end() {
        assert_eq!(find_loop_end(&chars("-]>")), Some(1));
    }

    #[test]
    fn skips_nested_loops() {
        // body of the outer loop in "[>[-]<-]": the inner "]" must not close it
        assert_eq!(find_loop_end(&chars(">[-]<-]+")), Some(6));
    }

    #[test]
    fn unclosed_loop_has_no_end() {
        assert_eq!(find_loop_end(&chars("+[-]")), None);
        assert_eq!(find_loop_end(&[]), None);
    }

    #[test]
    fn table_pairs_nested_brackets() {
        let table = JumpTable::build(&chars("[[]]")).expect("balanced");
        assert_eq!(table.target(0), Some(3));
        assert_eq!(table.target(1), Some(2));
        assert_eq!(table.target(2), Some(1));
        assert_eq!(table.target(3), Some(0));
    }

    #[test]
    fn stray_close_is_inert() {
        let table = JumpTable::build(&chars("+]-")).expect("stray ']' is allowed");
        assert_eq!(table.target(1), None);
    }

    #[test]
    fn unmatched_open_bracket_returns_error() {
        let err = JumpTable::build(&chars("+[[-]")).unwrap_err();
        assert!(matches!(err, InterpretError::MalformedProgram { ip: 1 }));
    }

    #[test]
    fn innermost_unmatched_open_is_reported() {
        let err = JumpTable::build(&chars("[+[")).unwrap_err();
        assert!(matches!(err, InterpretError::MalformedProgram { ip: 2 }));
    }
}
