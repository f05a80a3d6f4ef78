//! Terms, binders, pattern-matching alternatives and local definitions.
//!
//! Terms are parsed loosely: a term is a run of literals, identifiers and
//! single non-space characters. The structure that matters for editors
//! (binders, `let`, `match` alternatives, `by` blocks) is modelled
//! precisely.

use sitter::grammar::dsl::{
    choice, immediate_token, one_of, optional, pattern, prec, prec_right, repeat, repeat1, seq,
    sep_by1, string, sym, token,
};
use sitter::Rule;

use super::util::{opt_ident, opt_type, sep_by1_indent, Rules};

/// An identifier segment: Unicode letters and subscripts, minus the Greek
/// letters Lean reserves for binders.
const IDENT_SEGMENT: &str = r"[[_\pL]--[λΠΣ]][_!?\pL[₀-₉][ₐ-ₜ][ᵢ-ᵪ]ⱼ']*";

/// A segment in French quotes, which may contain anything but `»`.
fn escaped_segment() -> Rule {
    token(seq([string("«"), pattern("[^»]+"), string("»")]))
}

fn binder_or_bracketed() -> Rule {
    choice([sym("binder_ident"), sym("bracketed_binder")])
}

pub(super) fn rules() -> Rules {
    vec![
        (
            "term",
            prec_right(
                0,
                repeat1(prec(
                    -10,
                    choice([
                        sym("literal"),
                        sym("ident"),
                        sym("by"),
                        pattern(r"[^\s]"),
                    ]),
                )),
            ),
        ),
        (
            "ident",
            seq([
                choice([pattern(IDENT_SEGMENT), escaped_segment()]),
                repeat(seq([
                    immediate_token(string(".")),
                    immediate_token(choice([pattern(IDENT_SEGMENT), escaped_segment()])),
                ])),
            ]),
        ),
        ("hole", string("_")),
        ("type_spec", seq([string(":"), sym("term")])),
        ("binder_ident", choice([prec(10, sym("ident")), sym("hole")])),
        (
            "explicit_binder",
            seq([
                string("("),
                repeat1(sym("binder_ident")),
                opt_type(),
                string(")"),
            ]),
        ),
        (
            "strict_implicit_binder",
            seq([
                choice([string("{{"), string("⦃")]),
                repeat1(sym("binder_ident")),
                opt_type(),
                choice([string("}}"), string("⦄")]),
            ]),
        ),
        (
            "implicit_binder",
            seq([
                string("{"),
                repeat1(sym("binder_ident")),
                opt_type(),
                string("}"),
            ]),
        ),
        (
            "inst_binder",
            seq([string("["), opt_ident(), sym("term"), string("]")]),
        ),
        (
            "bracketed_binder",
            one_of([
                "explicit_binder",
                "strict_implicit_binder",
                "implicit_binder",
                "inst_binder",
            ]),
        ),
        ("defeq", string(":=")),
        ("left_arrow", choice([string("←"), string("<-")])),
        ("darrow", string("=>")),
        (
            "match_alt",
            seq([
                string("|"),
                sep_by1(sep_by1(sym("term"), string(",")), string("|")),
                sym("darrow"),
                sym("term"),
            ]),
        ),
        (
            "match_alts",
            seq([
                sym("_match_alts_start"),
                sep_by1(sym("match_alt"), sym("_match_alt_start")),
                sym("_dedent"),
            ]),
        ),
        ("match_discr", seq([opt_ident(), sym("term")])),
        (
            "match_expr_pat",
            seq([
                optional(seq([sym("ident"), string("@")])),
                sym("ident"),
                repeat(sym("binder_ident")),
            ]),
        ),
        (
            "let_id_lhs",
            seq([sym("binder_ident"), repeat(binder_or_bracketed()), opt_type()]),
        ),
        (
            "let_id_decl",
            seq([sym("let_id_lhs"), sym("defeq"), sym("term")]),
        ),
        (
            "let_id_decl_no_binders",
            seq([sym("ident"), opt_type(), sym("defeq"), sym("term")]),
        ),
        (
            "let_pat_decl",
            seq([sym("term"), opt_type(), sym("defeq"), sym("term")]),
        ),
        ("let_eqns_decl", seq([sym("let_id_lhs"), sym("match_alts")])),
        (
            "let_decl",
            one_of(["let_id_decl", "let_pat_decl", "let_eqns_decl"]),
        ),
        (
            "let_rec_decl",
            seq([
                optional(sym("documentation")),
                optional(sym("attributes")),
                sym("let_decl"),
            ]),
        ),
        (
            "let_rec_decls",
            sep_by1(sym("let_rec_decl"), string("and")),
        ),
        (
            "have_decl",
            choice([
                sym("let_id_decl"),
                sym("let_pat_decl"),
                seq([sym("type_spec"), sym("defeq"), sym("term")]),
            ]),
        ),
        (
            "where_decls",
            seq([
                string("where"),
                sep_by1_indent(sym("let_rec_decl"), string(";")),
            ]),
        ),
        (
            "struct_inst_field",
            seq([
                sym("ident"),
                optional(seq([
                    repeat(binder_or_bracketed()),
                    opt_type(),
                    choice([seq([sym("defeq"), sym("term")]), sym("match_alts")]),
                ])),
            ]),
        ),
        ("by", seq([string("by"), sym("tactic_seq")])),
    ]
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::IDENT_SEGMENT;

    fn ident_regex() -> Regex {
        Regex::new(&format!("^(?:{IDENT_SEGMENT})$")).unwrap()
    }

    #[test]
    fn test_ident_segment_accepts_lean_names() {
        let re = ident_regex();
        for name in ["x", "Nat", "h₁", "foo?", "bar!", "α", "x'", "_aux", "xᵢ"] {
            assert!(re.is_match(name), "{name} should be an identifier");
        }
    }

    #[test]
    fn test_ident_segment_rejects_binder_letters() {
        let re = ident_regex();
        for name in ["λ", "Π", "Σ", "1x", "x.y"] {
            assert!(!re.is_match(name), "{name} should not be an identifier");
        }
    }
}
