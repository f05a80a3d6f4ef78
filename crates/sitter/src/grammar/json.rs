//! Translation between `grammar.json` and facet's enum encoding.
//!
//! `grammar.json` writes a rule's `value` as a bare scalar (`"value": "+"`,
//! `"value": 2`). facet encodes [`RuleValue`](super::RuleValue) with an outer
//! tag (`"value": {"String": "+"}`). Both directions only touch members named
//! `value` whose content has the expected shape; everything else is copied
//! through, so malformed input still reaches facet-json and fails there.

/// Wraps every scalar `value` member in its variant tag, ready for facet.
pub(super) fn tag_values(json: &str) -> String {
    rewrite_values(json, |cursor| match cursor.peek()? {
        b'"' => cursor
            .string()
            .map(|text| format!("{{\"String\":{text}}}")),
        b'-' | b'0'..=b'9' => cursor
            .integer()
            .map(|number| format!("{{\"Integer\":{number}}}")),
        _ => None,
    })
}

/// Unwraps the variant tags facet writes around `value` members.
pub(super) fn untag_values(json: &str) -> String {
    rewrite_values(json, |cursor| {
        if !cursor.eat(b'{') {
            return None;
        }
        cursor.skip_whitespace();
        let tag = cursor.string()?;
        if tag != r#""String""# && tag != r#""Integer""# {
            return None;
        }
        cursor.skip_whitespace();
        if !cursor.eat(b':') {
            return None;
        }
        cursor.skip_whitespace();
        let scalar = match cursor.peek()? {
            b'"' => cursor.string()?,
            _ => cursor.integer()?,
        };
        cursor.skip_whitespace();
        cursor.eat(b'}').then(|| scalar.to_owned())
    })
}

/// Copies `json`, replacing the content of each `value` member for which
/// `replace` returns a substitute. On `None` the content is kept as is.
fn rewrite_values(json: &str, replace: impl Fn(&mut Cursor<'_>) -> Option<String>) -> String {
    let mut out = String::with_capacity(json.len());
    let mut copied = 0;
    let mut cursor = Cursor { src: json, pos: 0 };

    while let Some(byte) = cursor.peek() {
        if byte != b'"' {
            cursor.pos += 1;
            continue;
        }
        let Some(key) = cursor.string() else {
            break;
        };
        if key != r#""value""# {
            continue;
        }
        cursor.skip_whitespace();
        if !cursor.eat(b':') {
            continue;
        }
        cursor.skip_whitespace();
        let start = cursor.pos;
        match replace(&mut cursor) {
            Some(replacement) => {
                out.push_str(&json[copied..start]);
                out.push_str(&replacement);
                copied = cursor.pos;
            }
            None => cursor.pos = start,
        }
    }

    out.push_str(&json[copied..]);
    out
}

/// A byte position in JSON text. Every delimiter it stops at is ASCII, so
/// positions always fall on character boundaries.
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        let found = self.peek() == Some(byte);
        if found {
            self.pos += 1;
        }
        found
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// A string token, quotes included.
    fn string(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.eat(b'"') {
            return None;
        }
        loop {
            match self.peek()? {
                b'\\' => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    return self.src.get(start..self.pos);
                }
                _ => self.pos += 1,
            }
        }
    }

    /// An integer token. Fractions and exponents are not integers, so the
    /// cursor is left where it was.
    fn integer(&mut self) -> Option<&'a str> {
        let start = self.pos;
        self.eat(b'-');
        let digits = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let fraction = matches!(self.peek(), Some(b'.' | b'e' | b'E'));
        if self.pos == digits || fraction {
            self.pos = start;
            return None;
        }
        self.src.get(start..self.pos)
    }
}
