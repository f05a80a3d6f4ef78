//! Name, number, character and string literals.

use sitter::grammar::dsl::{alias, choice, one_of, pattern, repeat, seq, string, sym, token};
use sitter::Rule;

use super::util::Rules;

/// Characters that may follow a backslash.
const QUOTABLE: &str = r#"[\\"'rnt]"#;

fn escape(extra: Option<Rule>) -> Rule {
    let mut escapes = vec![
        pattern(QUOTABLE),
        pattern(r"x[a-fA-F\d]{2}"),
        pattern(r"u[a-fA-F\d]{4}"),
    ];
    escapes.extend(extra);
    seq([string("\\"), choice(escapes)])
}

pub(super) fn rules() -> Rules {
    vec![
        (
            "literal",
            one_of(["name_lit", "num_lit", "char_lit", "str_lit", "raw_str_lit"]),
        ),
        ("name_lit", seq([string("`"), sym("ident")])),
        (
            "num_lit",
            choice([
                pattern("0[bB][01]+"),
                pattern("0[oO][0-7]+"),
                pattern("0[xX][0-9a-fA-F]+"),
                // Decimal and scientific; looser than Lean about exponents.
                pattern(r"-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+\-]?\d+)?"),
            ]),
        ),
        (
            "char_lit",
            token(seq([
                string("'"),
                choice([escape(None), pattern(r"[^\n]")]),
                string("'"),
            ])),
        ),
        (
            "str_lit",
            token(seq([
                string("\""),
                repeat(choice([
                    escape(Some(string("\n"))),
                    pattern(r#"[^\\"\n]+"#),
                ])),
                string("\""),
            ])),
        ),
        (
            "raw_str_lit",
            seq([
                sym("_raw_str_start"),
                alias(sym("raw_str_content"), "str_content", true),
                sym("_raw_str_end"),
            ]),
        ),
    ]
}
