//! Declarations (`def`, `theorem`, `structure`, ...) and their pieces.

use sitter::grammar::dsl::{
    choice, one_of, optional, pattern, prec_right, repeat, repeat1, seq, sep_by1, string, sym,
};
use sitter::Rule;

use super::util::{
    attr_kind, decl_modifiers, decl_sig, many1_indent, many_indent, opt_decl_sig, opt_type,
    sep_by_indent_semicolon, Rules,
};

/// The declaration kinds accepted after modifiers.
pub(super) const DECLARATIONS: [&str; 10] = [
    "abbrev",
    "definition",
    "theorem",
    "opaque",
    "instance",
    "axiom",
    "example",
    "inductive",
    "class_inductive",
    "structure",
];

fn with_default() -> Rule {
    optional(seq([sym("defeq"), sym("term")]))
}

fn declarations() -> Rules {
    vec![
        (
            "abbrev",
            seq([
                string("abbrev"),
                sym("decl_ident"),
                opt_decl_sig(),
                sym("decl_val"),
            ]),
        ),
        (
            "definition",
            prec_right(
                0,
                seq([
                    string("def"),
                    sym("decl_ident"),
                    opt_decl_sig(),
                    sym("decl_val"),
                    optional(sym("decl_deriving")),
                ]),
            ),
        ),
        (
            "theorem",
            seq([
                choice([string("theorem"), string("lemma")]),
                sym("decl_ident"),
                decl_sig(),
                sym("decl_val"),
            ]),
        ),
        (
            "opaque",
            seq([
                string("opaque"),
                sym("decl_ident"),
                decl_sig(),
                optional(sym("decl_val_simple")),
            ]),
        ),
        (
            "instance",
            seq([
                attr_kind(),
                string("instance"),
                optional(sym("named_prio")),
                optional(sym("decl_ident")),
                decl_sig(),
                sym("decl_val"),
            ]),
        ),
        (
            "axiom",
            seq([string("axiom"), sym("decl_ident"), decl_sig()]),
        ),
        (
            "example",
            seq([string("example"), opt_decl_sig(), sym("decl_val")]),
        ),
        (
            "inductive",
            prec_right(
                0,
                seq([
                    string("inductive"),
                    sym("decl_ident"),
                    opt_decl_sig(),
                    optional(string("where")),
                    repeat(sym("ctor")),
                    optional(sym("computed_fields")),
                    optional(sym("decl_deriving")),
                ]),
            ),
        ),
        (
            "class_inductive",
            prec_right(
                0,
                seq([
                    string("class"),
                    string("inductive"),
                    sym("decl_ident"),
                    opt_decl_sig(),
                    optional(string("where")),
                    repeat(sym("ctor")),
                    optional(sym("decl_deriving")),
                ]),
            ),
        ),
        (
            "structure",
            prec_right(
                0,
                seq([
                    choice([string("structure"), string("class")]),
                    sym("decl_ident"),
                    repeat(sym("bracketed_binder")),
                    opt_type(),
                    optional(sym("extends")),
                    optional(seq([
                        string("where"),
                        optional(sym("struct_ctor")),
                        optional(sym("struct_fields")),
                    ])),
                    optional(sym("decl_deriving")),
                ]),
            ),
        ),
    ]
}

fn pieces() -> Rules {
    vec![
        (
            "documentation",
            seq([string("/--"), sym("comment_body"), string("-/")]),
        ),
        (
            "visibility",
            choice([pattern(r"private\s"), pattern(r"protected\s")]),
        ),
        ("noncomputable", pattern(r"noncomputable\s")),
        (
            "decl_ident",
            seq([
                sym("ident"),
                optional(seq([
                    string(".{"),
                    sep_by1(sym("_level"), string(",")),
                    string("}"),
                ])),
            ]),
        ),
        (
            "decl_val_simple",
            seq([sym("defeq"), sym("term"), optional(sym("where_decls"))]),
        ),
        (
            "decl_val_eqns",
            seq([sym("match_alts"), optional(sym("where_decls"))]),
        ),
        (
            "where_struct_inst",
            seq([
                string("where"),
                sep_by_indent_semicolon(sym("struct_inst_field")),
                optional(sym("where_decls")),
            ]),
        ),
        (
            "decl_val",
            one_of(["decl_val_simple", "decl_val_eqns", "where_struct_inst"]),
        ),
        (
            "decl_deriving",
            seq([string("deriving"), sep_by1(sym("ident"), string(","))]),
        ),
        (
            "named_prio",
            seq([
                string("("),
                string("priority"),
                sym("defeq"),
                sym("num_lit"),
                string(")"),
            ]),
        ),
        (
            "ctor",
            seq([
                optional(sym("documentation")),
                string("|"),
                decl_modifiers(),
                sym("ident"),
                opt_decl_sig(),
            ]),
        ),
        (
            "computed_field",
            seq([
                decl_modifiers(),
                sym("ident"),
                string(":"),
                sym("term"),
                sym("match_alts"),
            ]),
        ),
        (
            "computed_fields",
            prec_right(
                0,
                seq([string("with"), many_indent(sym("computed_field"))]),
            ),
        ),
        (
            "struct_explicit_binder",
            seq([
                decl_modifiers(),
                string("("),
                repeat1(sym("ident")),
                opt_decl_sig(),
                with_default(),
                string(")"),
            ]),
        ),
        (
            "struct_implicit_binder",
            seq([
                decl_modifiers(),
                string("{"),
                repeat1(sym("ident")),
                decl_sig(),
                string("}"),
            ]),
        ),
        (
            "struct_inst_binder",
            seq([
                decl_modifiers(),
                string("["),
                repeat1(sym("ident")),
                decl_sig(),
                string("]"),
            ]),
        ),
        (
            "struct_simple_binder",
            seq([
                decl_modifiers(),
                sym("ident"),
                opt_decl_sig(),
                with_default(),
            ]),
        ),
        (
            "struct_fields",
            many1_indent(one_of([
                "struct_explicit_binder",
                "struct_implicit_binder",
                "struct_inst_binder",
                "struct_simple_binder",
            ])),
        ),
        (
            "struct_ctor",
            seq([decl_modifiers(), sym("ident"), string("::")]),
        ),
        (
            "struct_parent",
            seq([
                optional(seq([sym("ident"), string(":")])),
                sym("term"),
            ]),
        ),
        (
            "extends",
            seq([
                string("extends"),
                sep_by1(sym("struct_parent"), string(",")),
                opt_type(),
            ]),
        ),
    ]
}

pub(super) fn rules() -> Rules {
    let mut rules = declarations();
    rules.extend(pieces());
    rules
}
