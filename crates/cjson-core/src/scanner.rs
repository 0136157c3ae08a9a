//! Byte cursor over the decoder input.

/// Cursor over an immutable, explicitly sized input buffer. The buffer is not
/// assumed to carry a terminator: lookahead at the end yields `None`.
#[derive(Debug, Clone)]
pub(crate) struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The next unconsumed byte, without advancing.
    pub(crate) fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Advance past `n` bytes, clamped to the end of input.
    pub(crate) fn bump(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Unconsumed input.
    pub(crate) fn rest(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// Input between `start` and the current position.
    pub(crate) fn slice_from(&self, start: usize) -> &'a [u8] {
        &self.input[start..self.pos]
    }

    /// Consume `byte` if it is the lookahead.
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `literal` if the remaining input starts with it.
    pub(crate) fn eat_literal(&mut self, literal: &[u8]) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Consume bytes while `pred` holds; returns how many were consumed.
    pub(crate) fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.pos += 1;
        }
        self.pos - start
    }

    pub(crate) fn skip_whitespace(&mut self) {
        self.eat_while(is_space);
    }
}

/// ASCII whitespace as classified by C `isspace`: includes vertical tab and
/// form feed, which `u8::is_ascii_whitespace` leaves out.
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_whitespace_covers_vertical_tab_and_form_feed() {
        let mut sc = Scanner::new(b" \t\r\n\x0b\x0cx");
        sc.skip_whitespace();
        assert_eq!(sc.peek(), Some(b'x'));
        assert_eq!(sc.pos(), 6);
    }

    #[test]
    fn peek_at_end_is_none() {
        let mut sc = Scanner::new(b"  ");
        sc.skip_whitespace();
        assert!(sc.is_at_end());
        assert_eq!(sc.peek(), None);
    }

    #[test]
    fn eat_literal_is_bounds_checked() {
        let mut sc = Scanner::new(b"tru");
        assert!(!sc.eat_literal(b"true"));
        assert_eq!(sc.pos(), 0);
    }

    #[test]
    fn bump_clamps_to_end() {
        let mut sc = Scanner::new(b"ab");
        sc.bump(5);
        assert!(sc.is_at_end());
        assert_eq!(sc.rest(), b"");
    }
}
