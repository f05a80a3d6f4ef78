//! External scanner for Lean raw string literals.
//!
//! A raw string opens with `r`, any number of `#` and a quote, and ends at
//! the first quote followed by the same number of `#`: `r#"say "hi""#`.
//! Matching the delimiters needs a counter, which the generated lexer
//! cannot express, so the three pieces of a raw string are external tokens.

use sitter::{ExternalScanner, Lexer};
use tracing::trace;

/// Index of `_raw_str_start` among the grammar's externals.
pub const RAW_STR_START: u16 = 0;
/// Index of `raw_str_content` among the grammar's externals.
pub const RAW_STR_CONTENT: u16 = 1;
/// Index of `_raw_str_end` among the grammar's externals.
pub const RAW_STR_END: u16 = 2;

/// Scanner state: the number of `#` that opened the current raw string.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LeanScanner {
    opening_hash_count: u8,
}

impl LeanScanner {
    /// A scanner outside any raw string.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            opening_hash_count: 0,
        }
    }

    /// Creates a boxed scanner; registered on the Lean language.
    #[must_use]
    pub fn factory() -> Box<dyn ExternalScanner> {
        Box::new(Self::new())
    }

    /// The number of `#` expected before the closing quote.
    #[must_use]
    pub const fn opening_hash_count(&self) -> u8 {
        self.opening_hash_count
    }

    fn scan_start(&mut self, lexer: &mut dyn Lexer) -> bool {
        if lexer.lookahead() != Some('r') {
            return false;
        }
        lexer.advance(false);

        let mut count: u8 = 0;
        while lexer.lookahead() == Some('#') {
            lexer.advance(false);
            let Some(next) = count.checked_add(1) else {
                trace!("raw string opened with too many hashes");
                return false;
            };
            count = next;
        }

        if lexer.lookahead() != Some('"') {
            return false;
        }
        lexer.advance(false);

        self.opening_hash_count = count;
        lexer.set_result_symbol(RAW_STR_START);
        true
    }

    fn scan_content(&self, lexer: &mut dyn Lexer) -> bool {
        loop {
            if lexer.eof() {
                return false;
            }
            if lexer.lookahead() == Some('"') {
                lexer.mark_end();
                lexer.advance(false);
                let mut hash_count = 0;
                while lexer.lookahead() == Some('#') && hash_count < self.opening_hash_count {
                    lexer.advance(false);
                    hash_count += 1;
                }
                if hash_count == self.opening_hash_count {
                    lexer.set_result_symbol(RAW_STR_CONTENT);
                    return true;
                }
            } else {
                lexer.advance(false);
            }
        }
    }

    fn scan_end(&self, lexer: &mut dyn Lexer) -> bool {
        lexer.advance(false);
        for _ in 0..self.opening_hash_count {
            lexer.advance(false);
        }
        lexer.set_result_symbol(RAW_STR_END);
        true
    }
}

fn is_valid(valid_symbols: &[bool], index: u16) -> bool {
    valid_symbols
        .get(usize::from(index))
        .copied()
        .unwrap_or(false)
}

impl ExternalScanner for LeanScanner {
    fn scan(&mut self, lexer: &mut dyn Lexer, valid_symbols: &[bool]) -> bool {
        if is_valid(valid_symbols, RAW_STR_START) && lexer.lookahead() == Some('r') {
            return self.scan_start(lexer);
        }
        if is_valid(valid_symbols, RAW_STR_CONTENT) {
            return self.scan_content(lexer);
        }
        if is_valid(valid_symbols, RAW_STR_END) && lexer.lookahead() == Some('"') {
            return self.scan_end(lexer);
        }
        false
    }

    fn serialize(&self, buffer: &mut [u8]) -> usize {
        match buffer.first_mut() {
            Some(slot) => {
                *slot = self.opening_hash_count;
                1
            }
            None => 0,
        }
    }

    fn deserialize(&mut self, buffer: &[u8]) {
        self.opening_hash_count = match buffer {
            [count] => *count,
            _ => 0,
        };
    }
}

#[cfg(test)]
mod tests {
    use sitter::lexer::SERIALIZATION_BUFFER_SIZE;
    use sitter::StrLexer;

    use super::*;

    const START: [bool; 3] = [true, false, false];
    const CONTENT: [bool; 3] = [false, true, false];
    const END: [bool; 3] = [false, false, true];

    /// Scans the three pieces of a raw string, returning their texts.
    fn scan_raw_string(input: &str) -> Option<[String; 3]> {
        let mut scanner = LeanScanner::new();
        let mut lexer = StrLexer::new(input);
        let mut pieces = Vec::new();
        let steps = [
            (START, RAW_STR_START),
            (CONTENT, RAW_STR_CONTENT),
            (END, RAW_STR_END),
        ];
        for (valid, index) in steps {
            if !scanner.scan(&mut lexer, &valid) {
                return None;
            }
            assert_eq!(lexer.result_symbol(), Some(index));
            pieces.push(lexer.token_text().to_owned());
            lexer.reset_token();
        }
        pieces.try_into().ok()
    }

    #[test]
    fn test_plain_raw_string() {
        let [start, content, end] = scan_raw_string(r#"r"hello""#).unwrap();
        assert_eq!(start, "r\"");
        assert_eq!(content, "hello");
        assert_eq!(end, "\"");
    }

    #[test]
    fn test_hashes_allow_inner_quotes() {
        let [start, content, end] = scan_raw_string(r###"r#"say "hi""#"###).unwrap();
        assert_eq!(start, "r#\"");
        assert_eq!(content, "say \"hi\"");
        assert_eq!(end, "\"#");
    }

    #[test]
    fn test_empty_raw_string() {
        let [_, content, end] = scan_raw_string(r#"r"""#).unwrap();
        assert_eq!(content, "");
        assert_eq!(end, "\"");
    }

    #[test]
    fn test_unterminated_raw_string_fails() {
        assert!(scan_raw_string(r##"r#"abc"##).is_none());
        assert!(scan_raw_string(r###"r##"abc"#"###).is_none());
    }

    #[test]
    fn test_start_requires_quote() {
        let mut scanner = LeanScanner::new();
        assert!(!scanner.scan(&mut StrLexer::new("r#x"), &START));
        assert!(!scanner.scan(&mut StrLexer::new("x\"\""), &START));
        assert!(!scanner.scan(&mut StrLexer::new("r"), &START));
    }

    #[test]
    fn test_too_many_hashes_fails() {
        let input = format!("r{}\"\"", "#".repeat(256));
        let mut scanner = LeanScanner::new();
        assert!(!scanner.scan(&mut StrLexer::new(&input), &START));

        let input = format!("r{}\"\"", "#".repeat(255));
        assert!(scanner.scan(&mut StrLexer::new(&input), &START));
        assert_eq!(scanner.opening_hash_count(), 255);
    }

    #[test]
    fn test_nothing_valid_scans_nothing() {
        let mut scanner = LeanScanner::new();
        let mut lexer = StrLexer::new(r#"r"x""#);
        assert!(!scanner.scan(&mut lexer, &[false; 3]));
        assert!(!scanner.scan(&mut lexer, &[]));
        assert_eq!(lexer.result_symbol(), None);
    }

    #[test]
    fn test_state_round_trips_through_one_byte() {
        let mut scanner = LeanScanner::new();
        assert!(scanner.scan(&mut StrLexer::new("r###\""), &START));

        let mut buffer = [0u8; SERIALIZATION_BUFFER_SIZE];
        assert_eq!(scanner.serialize(&mut buffer), 1);
        assert_eq!(buffer[0], 3);

        let mut restored = LeanScanner::new();
        restored.deserialize(&buffer[..1]);
        assert_eq!(restored, scanner);
    }

    #[test]
    fn test_unexpected_buffer_resets_state() {
        let mut scanner = LeanScanner::new();
        scanner.deserialize(&[7]);
        assert_eq!(scanner.opening_hash_count(), 7);

        scanner.deserialize(&[]);
        assert_eq!(scanner.opening_hash_count(), 0);

        scanner.deserialize(&[7]);
        scanner.deserialize(&[1, 2]);
        assert_eq!(scanner.opening_hash_count(), 0);
    }
}
