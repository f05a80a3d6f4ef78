//! `do` blocks: bindings, reassignment, `if` and nested blocks.

use sitter::grammar::dsl::{
    choice, one_of, optional, pattern, prec_right, repeat, repeat1, seq, string, sym,
};
use sitter::Rule;

use super::util::{many1_indent, opt_ident, opt_type, Rules};

const DO_ELEMS: [&str; 12] = [
    "do_let",
    "do_let_else",
    "do_let_expr",
    "do_let_meta_expr",
    "do_let_rec",
    "do_let_arrow",
    "do_reassign",
    "do_reassign_arrow",
    "do_have",
    "do_if",
    "do_expr",
    "do_nested",
];

fn let_mut() -> [Rule; 2] {
    [string("let"), optional(string("mut"))]
}

/// `| alternative` continuing a refutable binding.
fn else_branch() -> [Rule; 2] {
    [sym("gt_col_bar"), sym("do_seq")]
}

fn if_branch() -> [Rule; 4] {
    [string("if"), sym("do_if_cond"), string("then"), sym("do_seq")]
}

fn do_elems() -> Rules {
    vec![
        (
            "do_let",
            seq(let_mut().into_iter().chain([sym("let_decl")])),
        ),
        (
            "do_let_else",
            seq(let_mut()
                .into_iter()
                .chain([sym("term"), sym("defeq"), sym("term")])
                .chain(else_branch())),
        ),
        (
            "do_let_expr",
            seq([
                string("let_expr"),
                sym("match_expr_pat"),
                sym("defeq"),
                sym("term"),
            ]
            .into_iter()
            .chain(else_branch())),
        ),
        (
            "do_let_meta_expr",
            seq([
                string("let_expr"),
                sym("match_expr_pat"),
                sym("left_arrow"),
                sym("term"),
            ]
            .into_iter()
            .chain(else_branch())),
        ),
        (
            "do_let_rec",
            seq([string("let"), string("rec"), sym("let_rec_decls")]),
        ),
        (
            "do_let_arrow",
            seq(let_mut()
                .into_iter()
                .chain([choice([sym("do_id_decl"), sym("do_pat_decl")])])),
        ),
        (
            "do_reassign",
            one_of(["let_id_decl_no_binders", "let_pat_decl"]),
        ),
        ("do_reassign_arrow", one_of(["do_id_decl", "do_pat_decl"])),
        ("do_have", seq([string("have"), sym("have_decl")])),
        (
            "do_if",
            seq(if_branch().into_iter().chain([
                repeat(seq(
                    [sym("gt_col_else")].into_iter().chain(if_branch()),
                )),
                optional(seq([sym("gt_col_else"), sym("do_seq")])),
            ])),
        ),
        ("do_expr", sym("term")),
        ("do_nested", seq([pattern(r"do\s"), sym("do_seq")])),
    ]
}

pub(super) fn rules() -> Rules {
    let mut rules = do_elems();
    rules.extend([
        ("do_elem", one_of(DO_ELEMS)),
        (
            "do_seq_item",
            seq([sym("do_elem"), optional(string(";"))]),
        ),
        (
            "do_seq_bracketed",
            seq([string("{"), repeat1(sym("do_seq_item")), string("}")]),
        ),
        ("do_seq_indent", many1_indent(sym("do_seq_item"))),
        ("do_seq", one_of(["do_seq_bracketed", "do_seq_indent"])),
        (
            "do_id_decl",
            seq([
                sym("ident"),
                opt_type(),
                sym("left_arrow"),
                sym("do_elem"),
            ]),
        ),
        (
            "do_pat_decl",
            prec_right(
                0,
                seq([
                    sym("term"),
                    sym("left_arrow"),
                    sym("do_elem"),
                    optional(seq(else_branch())),
                ]),
            ),
        ),
        ("do_if_let_pure", seq([sym("defeq"), sym("term")])),
        ("do_if_let_bind", seq([sym("left_arrow"), sym("term")])),
        (
            "do_if_let",
            seq([
                string("let"),
                sym("term"),
                one_of(["do_if_let_pure", "do_if_let_bind"]),
            ]),
        ),
        ("do_if_prop", seq([opt_ident(), sym("term")])),
        ("do_if_cond", one_of(["do_if_let", "do_if_prop"])),
    ]);
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_do_element_is_defined() {
        let defined: Vec<_> = do_elems().into_iter().map(|(name, _)| name).collect();
        assert_eq!(defined, DO_ELEMS);
    }
}
