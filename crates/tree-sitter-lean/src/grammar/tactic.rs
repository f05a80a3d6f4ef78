//! Tactic blocks introduced by `by`.

mod rcases;

use sitter::grammar::dsl::{choice, one_of, optional, seq, sep_by1, string, sym};

use super::util::{option_value, sep_by1_indent_semicolon, sep_by_indent_semicolon, Rules};

const TACTICS: [&str; 11] = [
    "tactic_nested",
    "tactic_match",
    "tactic_intro_match",
    "tactic_open",
    "tactic_set_option",
    "tactic_exact",
    "tactic_apply",
    "tactic_rfl",
    "tactic_rcases",
    "tactic_obtain",
    "tactic_rintro",
];

fn tactics() -> Rules {
    let mut tactics = vec![
        ("tactic_nested", sym("tactic_seq_bracketed")),
        (
            "tactic_match",
            seq([
                string("match"),
                optional(sym("generalizing_param")),
                optional(sym("motive")),
                sep_by1(sym("match_discr"), string(",")),
                string("with"),
                sym("match_alts"),
            ]),
        ),
        (
            "tactic_intro_match",
            seq([string("intro"), sym("match_alts")]),
        ),
        (
            "tactic_open",
            seq([
                string("open"),
                sym("_open_decl"),
                string("in"),
                sym("tactic_seq"),
            ]),
        ),
        (
            "tactic_set_option",
            seq([
                string("set_option"),
                sym("ident"),
                option_value(),
                string("in"),
                sym("tactic_seq"),
            ]),
        ),
        ("tactic_exact", seq([string("exact"), sym("term")])),
        ("tactic_apply", seq([string("apply"), sym("term")])),
        ("tactic_rfl", string("rfl")),
    ];
    tactics.extend(rcases::tactics());
    tactics
}

pub(super) fn rules() -> Rules {
    let mut rules = tactics();
    rules.extend(rcases::patterns());
    rules.extend([
        ("tactic_p", one_of(TACTICS)),
        (
            "tactic_seq_indented",
            sep_by1_indent_semicolon(sym("tactic_p")),
        ),
        (
            "tactic_seq_bracketed",
            seq([
                string("{"),
                sep_by_indent_semicolon(sym("tactic_p")),
                string("}"),
            ]),
        ),
        (
            "tactic_seq",
            one_of(["tactic_seq_indented", "tactic_seq_bracketed"]),
        ),
        (
            "generalizing_param",
            seq([
                string("("),
                string("generalizing"),
                sym("defeq"),
                choice([string("true"), string("false")]),
                string(")"),
            ]),
        ),
        (
            "motive",
            seq([
                string("("),
                string("motive"),
                sym("defeq"),
                sym("term"),
                string(")"),
            ]),
        ),
    ]);
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tactic_is_defined() {
        let defined: Vec<_> = tactics().into_iter().map(|(name, _)| name).collect();
        assert_eq!(defined, TACTICS);
    }
}
