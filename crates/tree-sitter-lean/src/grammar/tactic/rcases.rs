//! `rcases`, `obtain` and `rintro` with their destructuring patterns.

use sitter::grammar::dsl::{
    choice, one_of, optional, repeat1, seq, sep_by, sep_by1, string, sym,
};
use sitter::Rule;

use crate::grammar::util::{opt_ident, opt_type, Rules};

const RCASES_PATS: [&str; 6] = [
    "rcases_pat_one",
    "rcases_pat_ignore",
    "rcases_pat_clear",
    "rcases_pat_tuple",
    "rcases_pat_explicit_tuple",
    "rcases_pat_paren",
];

/// `rintro` takes the same patterns, except that a parenthesized group may
/// hold several patterns.
const RINTRO_PATS: [&str; 6] = [
    "rcases_pat_one",
    "rcases_pat_ignore",
    "rcases_pat_clear",
    "rcases_pat_tuple",
    "rcases_pat_explicit_tuple",
    "rintro_pat_one",
];

fn tuple(open: &str) -> Rule {
    seq([
        string(open),
        sep_by(sym("_rcases_pat_lo"), string(",")),
        string("⟩"),
    ])
}

pub(super) fn tactics() -> Rules {
    vec![
        (
            "tactic_rcases",
            seq([
                string("rcases"),
                sep_by(sym("elim_target"), string(",")),
                optional(seq([string("with"), sym("_rcases_pat_lo")])),
            ]),
        ),
        (
            "tactic_obtain",
            seq([
                string("obtain"),
                optional(sym("_rcases_pat_med")),
                choice([
                    seq([
                        opt_type(),
                        sym("defeq"),
                        sep_by1(sym("term"), string(",")),
                    ]),
                    sym("type_spec"),
                ]),
            ]),
        ),
        (
            "tactic_rintro",
            seq([string("rintro"), repeat1(sym("rintro_pat")), opt_type()]),
        ),
    ]
}

pub(super) fn patterns() -> Rules {
    vec![
        ("rcases_pat_one", sym("ident")),
        ("rcases_pat_ignore", string("_")),
        ("rcases_pat_clear", string("-")),
        ("rcases_pat_tuple", tuple("⟨")),
        ("rcases_pat_explicit_tuple", tuple("@⟨")),
        (
            "rcases_pat_paren",
            seq([string("("), sym("_rcases_pat_lo"), string(")")]),
        ),
        ("rcases_pat", one_of(RCASES_PATS)),
        (
            "_rcases_pat_med",
            sep_by1(sym("rcases_pat"), string("|")),
        ),
        (
            "_rcases_pat_lo",
            seq([sym("_rcases_pat_med"), opt_type()]),
        ),
        ("rintro_pat", one_of(RINTRO_PATS)),
        (
            "rintro_pat_one",
            seq([
                string("("),
                repeat1(sym("rintro_pat")),
                opt_type(),
                string(")"),
            ]),
        ),
        ("elim_target", seq([opt_ident(), sym("term")])),
    ]
}
