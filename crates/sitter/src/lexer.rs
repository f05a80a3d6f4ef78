//! The contract between a language and its hand-written external scanner.
//!
//! Tree-sitter grammars delegate tokens that regular expressions cannot
//! describe (raw strings with matching delimiters, indentation, nested
//! comments) to an external scanner. The scanner sees the input one character
//! at a time through a [`Lexer`] and reports which external token it found.

/// Size of the buffer handed to [`ExternalScanner::serialize`].
pub const SERIALIZATION_BUFFER_SIZE: usize = 1024;

/// A character cursor an external scanner drives.
pub trait Lexer {
    /// The next character, or `None` at end of input.
    fn lookahead(&self) -> Option<char>;

    /// Consumes the lookahead character. With `skip`, the character is
    /// treated as whitespace preceding the token rather than part of it.
    fn advance(&mut self, skip: bool);

    /// Marks the current position as the end of the token. Without a call,
    /// the token ends wherever scanning stopped.
    fn mark_end(&mut self);

    /// Returns `true` once all input is consumed.
    fn eof(&self) -> bool;

    /// Records which external token was recognized (its index in the
    /// grammar's `externals` list).
    fn set_result_symbol(&mut self, symbol: u16);

    /// The symbol recorded by [`Lexer::set_result_symbol`], if any.
    fn result_symbol(&self) -> Option<u16>;
}

/// A hand-written scanner for a grammar's external tokens.
///
/// Implementations must be deterministic given their serialized state so the
/// parser can resume scanning anywhere in a document.
pub trait ExternalScanner {
    /// Tries to recognize one of the tokens whose entry in `valid_symbols`
    /// is `true`. Returns `true` and sets the lexer's result symbol on success.
    fn scan(&mut self, lexer: &mut dyn Lexer, valid_symbols: &[bool]) -> bool;

    /// Writes the scanner state into `buffer`, returning the bytes used.
    fn serialize(&self, buffer: &mut [u8]) -> usize;

    /// Restores state written by [`ExternalScanner::serialize`]. An empty
    /// buffer resets the scanner.
    fn deserialize(&mut self, buffer: &[u8]);
}

/// Creates a fresh scanner; registered on a [`Language`](crate::Language).
pub type ScannerFactory = fn() -> Box<dyn ExternalScanner>;

/// An in-memory [`Lexer`] over a string slice.
#[derive(Debug, Clone)]
pub struct StrLexer<'a> {
    input: &'a str,
    position: usize,
    token_start: usize,
    token_end: Option<usize>,
    result_symbol: Option<u16>,
}

impl<'a> StrLexer<'a> {
    /// Starts lexing at the beginning of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            token_start: 0,
            token_end: None,
            result_symbol: None,
        }
    }

    /// Byte offset of the lookahead character.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The text of the token recognized so far: from the first non-skipped
    /// character to the marked end (or the current position).
    #[must_use]
    pub fn token_text(&self) -> &'a str {
        let end = self.token_end.unwrap_or(self.position);
        &self.input[self.token_start..end.max(self.token_start)]
    }

    /// The unconsumed input after the token end.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.token_end.unwrap_or(self.position)..]
    }

    /// Prepares for the next token, starting at the previous token's end.
    pub fn reset_token(&mut self) {
        self.position = self.token_end.unwrap_or(self.position);
        self.token_start = self.position;
        self.token_end = None;
        self.result_symbol = None;
    }
}

impl Lexer for StrLexer<'_> {
    fn lookahead(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn advance(&mut self, skip: bool) {
        if let Some(c) = self.lookahead() {
            self.position += c.len_utf8();
            if skip {
                self.token_start = self.position;
            }
        }
    }

    fn mark_end(&mut self) {
        self.token_end = Some(self.position);
    }

    fn eof(&self) -> bool {
        self.position >= self.input.len()
    }

    fn set_result_symbol(&mut self, symbol: u16) {
        self.result_symbol = Some(symbol);
    }

    fn result_symbol(&self) -> Option<u16> {
        self.result_symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_utf8_and_skips() {
        let mut lexer = StrLexer::new("  λx");
        lexer.advance(true);
        lexer.advance(true);
        assert_eq!(lexer.lookahead(), Some('λ'));
        lexer.advance(false);
        lexer.advance(false);
        assert!(lexer.eof());
        assert_eq!(lexer.token_text(), "λx");
        assert_eq!(lexer.lookahead(), None);
    }

    #[test]
    fn test_mark_end_limits_token() {
        let mut lexer = StrLexer::new("ab\"#");
        lexer.advance(false);
        lexer.advance(false);
        lexer.mark_end();
        lexer.advance(false);
        assert_eq!(lexer.token_text(), "ab");
        assert_eq!(lexer.remaining(), "\"#");

        lexer.reset_token();
        assert_eq!(lexer.lookahead(), Some('"'));
        assert_eq!(lexer.result_symbol(), None);
    }
}
