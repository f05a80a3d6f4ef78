//! Parser descriptions inside `syntax` commands.

use sitter::grammar::dsl::{immediate_token, one_of, optional, prec_right, repeat1, seq, string, sym};
use sitter::Rule;

use super::util::Rules;

const SYNTAX: [&str; 8] = [
    "paren", "cat", "unary", "binary", "sep_by", "sep_by_1", "atom", "non_reserved",
];

fn items() -> Rule {
    repeat1(sym("syntax_p"))
}

fn separated(open: &str) -> Rule {
    seq([
        string(open),
        items(),
        string(","),
        sym("str_lit"),
        optional(seq([string(","), items()])),
        optional(seq([string(","), string("allowTrailingSep")])),
        string(")"),
    ])
}

pub(super) fn rules() -> Rules {
    vec![
        ("paren", seq([string("("), items(), string(")")])),
        (
            "cat",
            prec_right(0, seq([sym("ident"), optional(sym("precedence"))])),
        ),
        (
            "unary",
            seq([
                sym("ident"),
                immediate_token(string("(")),
                items(),
                string(")"),
            ]),
        ),
        (
            "binary",
            seq([
                sym("ident"),
                immediate_token(string("(")),
                items(),
                string(","),
                items(),
                string(")"),
            ]),
        ),
        ("sep_by", separated("sepBy(")),
        ("sep_by_1", separated("sepBy1(")),
        ("atom", sym("str_lit")),
        ("non_reserved", seq([string("&"), sym("str_lit")])),
        ("syntax_p", one_of(SYNTAX)),
        ("precedence", seq([string(":"), sym("num_lit")])),
    ]
}
