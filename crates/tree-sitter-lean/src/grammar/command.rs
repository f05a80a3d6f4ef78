//! Top-level commands.

use sitter::grammar::dsl::{
    choice, one_of, optional, pattern, prec, prec_right, repeat, repeat1, seq, sep_by1, string,
    sym,
};
use sitter::Rule;

use super::declaration::DECLARATIONS;
use super::util::{attr_kind, decl_modifiers, option_value, Rules};

/// Every command a file may contain, in the order they are tried.
const COMMANDS: [&str; 40] = [
    "cmd_module_doc",
    "cmd_declaration",
    "cmd_deriving",
    "cmd_noncomputable_section",
    "cmd_section",
    "cmd_namespace",
    "cmd_end",
    "cmd_variable",
    "cmd_universe",
    "cmd_check",
    "cmd_check_failure",
    "cmd_eval",
    "cmd_eval_bang",
    "cmd_synth",
    "cmd_exit",
    "cmd_print",
    "cmd_print_axioms",
    "cmd_print_eqns",
    "cmd_print_tac_tags",
    "cmd_where",
    "cmd_version",
    "cmd_init_quot",
    "cmd_set_option",
    "cmd_attribute",
    "cmd_export",
    "cmd_open",
    "cmd_mutual",
    "cmd_initialize",
    "cmd_in",
    "cmd_add_docstring",
    "cmd_register_tactic_tag",
    "cmd_tactic_extension",
    "cmd_recommended_spelling",
    "cmd_gen_injective_theorems",
    "cmd_include",
    "cmd_omit",
    "cmd_mixfix",
    "cmd_notation",
    "cmd_macro_rules",
    "cmd_syntax",
];

const OPEN_DECLS: [&str; 5] = [
    "open_hiding",
    "open_renaming",
    "open_only",
    "open_simple",
    "open_scoped",
];

fn idents() -> Rule {
    repeat1(sym("ident"))
}

fn ident_list() -> Rule {
    sep_by1(sym("ident"), string(","))
}

/// Documentation, attributes and scope shared by the notation commands.
fn notation_prefix() -> [Rule; 3] {
    [
        optional(sym("documentation")),
        optional(sym("attributes")),
        attr_kind(),
    ]
}

fn notation_options() -> [Rule; 2] {
    [optional(sym("named_name")), optional(sym("named_prio"))]
}

fn commands() -> Rules {
    vec![
        (
            "cmd_module_doc",
            seq([string("/-!"), sym("comment_body"), string("-/")]),
        ),
        (
            "cmd_declaration",
            seq([decl_modifiers(), one_of(DECLARATIONS)]),
        ),
        (
            "cmd_deriving",
            seq([
                string("deriving"),
                string("instance"),
                ident_list(),
                string("for"),
                ident_list(),
            ]),
        ),
        (
            "cmd_noncomputable_section",
            seq([
                string("noncomputable"),
                string("section"),
                optional(sym("ident")),
            ]),
        ),
        (
            "cmd_section",
            seq([string("section"), optional(sym("ident"))]),
        ),
        ("cmd_namespace", seq([string("namespace"), sym("ident")])),
        ("cmd_end", seq([string("end"), optional(sym("ident"))])),
        (
            "cmd_variable",
            seq([string("variable"), repeat1(sym("bracketed_binder"))]),
        ),
        ("cmd_universe", seq([string("universe"), idents()])),
        ("cmd_check", seq([string("#check"), sym("term")])),
        (
            "cmd_check_failure",
            seq([string("#check_failure"), sym("term")]),
        ),
        ("cmd_eval", seq([string("#eval"), sym("term")])),
        ("cmd_eval_bang", seq([string("#eval!"), sym("term")])),
        ("cmd_synth", seq([string("#synth"), sym("term")])),
        ("cmd_exit", string("#exit")),
        (
            "cmd_print",
            seq([
                string("#print"),
                choice([sym("ident"), sym("str_lit")]),
            ]),
        ),
        (
            "cmd_print_axioms",
            seq([string("#print"), string("axioms"), sym("ident")]),
        ),
        (
            "cmd_print_eqns",
            seq([
                string("#print"),
                choice([string("equations"), string("eqns")]),
                sym("ident"),
            ]),
        ),
        (
            "cmd_print_tac_tags",
            seq([string("#print"), string("tactic"), string("tags")]),
        ),
        ("cmd_where", string("#where")),
        ("cmd_version", string("#version")),
        ("cmd_init_quot", string("init_quot")),
        (
            "cmd_set_option",
            seq([string("set_option"), sym("ident"), option_value()]),
        ),
        (
            "cmd_attribute",
            seq([
                string("attribute"),
                string("["),
                sep_by1(
                    choice([
                        seq([string("-"), sym("ident")]),
                        sym("attr_instance"),
                    ]),
                    string(","),
                ),
                string("]"),
                idents(),
            ]),
        ),
        (
            "cmd_export",
            seq([
                string("export"),
                sym("ident"),
                string("("),
                idents(),
                string(")"),
            ]),
        ),
        ("cmd_open", seq([string("open"), sym("_open_decl")])),
        ("cmd_mutual", string("mutual")),
        (
            "cmd_initialize",
            prec(
                100,
                seq([
                    decl_modifiers(),
                    choice([
                        pattern(r"initialize\s"),
                        pattern(r"builtin_initialize\s"),
                    ]),
                    // The scanner closes the column before the body opens its own.
                    optional(seq([
                        sym("_push_col"),
                        sym("ident"),
                        sym("type_spec"),
                        sym("left_arrow"),
                        sym("_pop_col"),
                    ])),
                    sym("do_seq"),
                ]),
            ),
        ),
        (
            "cmd_in",
            prec_right(
                0,
                seq([sym("command"), pattern(r"\sin\s"), sym("command")]),
            ),
        ),
        (
            "cmd_add_docstring",
            seq([sym("documentation"), string("add_decl_doc"), sym("ident")]),
        ),
        (
            "cmd_register_tactic_tag",
            seq([
                optional(sym("documentation")),
                string("register_tactic_tag"),
                sym("ident"),
                sym("str_lit"),
            ]),
        ),
        (
            "cmd_tactic_extension",
            seq([
                optional(sym("documentation")),
                string("tactic_extension"),
                sym("ident"),
            ]),
        ),
        (
            "cmd_recommended_spelling",
            seq([
                optional(sym("documentation")),
                string("recommended_spelling"),
                sym("str_lit"),
                string("for"),
                sym("str_lit"),
                string("in"),
                string("["),
                ident_list(),
                string("]"),
            ]),
        ),
        (
            "cmd_gen_injective_theorems",
            seq([string("gen_injective_theorems%"), sym("ident")]),
        ),
        ("cmd_include", seq([string("include"), idents()])),
        (
            "cmd_omit",
            seq([
                string("omit"),
                repeat1(choice([sym("ident"), sym("inst_binder")])),
            ]),
        ),
        (
            "cmd_mixfix",
            seq(notation_prefix()
                .into_iter()
                .chain([sym("mixfix_kind"), sym("precedence")])
                .chain(notation_options())
                .chain([sym("str_lit"), sym("darrow"), sym("term")])),
        ),
        (
            "cmd_notation",
            seq(notation_prefix()
                .into_iter()
                .chain([string("notation"), optional(sym("precedence"))])
                .chain(notation_options())
                .chain([repeat(sym("notation_item")), sym("darrow"), sym("term")])),
        ),
        (
            "cmd_macro_rules",
            seq(notation_prefix().into_iter().chain([
                string("macro_rules"),
                optional(sym("kind")),
                sym("match_alts"),
            ])),
        ),
        (
            "cmd_syntax",
            seq(notation_prefix()
                .into_iter()
                .chain([pattern(r"syntax\s"), optional(sym("precedence"))])
                .chain(notation_options())
                .chain([repeat1(sym("syntax_p")), string(":"), sym("ident")])),
        ),
    ]
}

fn open_decls() -> Rules {
    vec![
        (
            "open_hiding",
            seq([sym("ident"), string("hiding"), idents()]),
        ),
        (
            "open_renaming",
            seq([
                sym("ident"),
                string("renaming"),
                sep_by1(
                    seq([
                        sym("ident"),
                        choice([string("→"), string("->")]),
                        sym("ident"),
                    ]),
                    string(","),
                ),
            ]),
        ),
        (
            "open_only",
            seq([sym("ident"), string("("), idents(), string(")")]),
        ),
        ("open_simple", idents()),
        ("open_scoped", seq([string("scoped"), idents()])),
    ]
}

/// Pieces of `notation`, `syntax` and mixfix commands.
fn notation() -> Rules {
    vec![
        (
            "mixfix_kind",
            choice([
                string("prefix"),
                string("infix"),
                string("infixl"),
                string("infixr"),
                string("postfix"),
            ]),
        ),
        (
            "named_name",
            seq([
                string("("),
                string("name"),
                sym("defeq"),
                sym("ident"),
                string(")"),
            ]),
        ),
        (
            "notation_item",
            choice([
                sym("str_lit"),
                seq([sym("ident"), optional(sym("precedence"))]),
            ]),
        ),
        (
            "kind",
            seq([
                string("("),
                string("kind"),
                sym("defeq"),
                sym("ident"),
                string(")"),
            ]),
        ),
    ]
}

pub(super) fn rules() -> Rules {
    let mut rules = commands();
    rules.extend(open_decls());
    rules.extend(notation());
    rules.push(("command", one_of(COMMANDS)));
    rules.push(("_open_decl", one_of(OPEN_DECLS)));
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_command_is_defined() {
        let defined: Vec<_> = commands().into_iter().map(|(name, _)| name).collect();
        assert_eq!(defined, COMMANDS);
    }

    #[test]
    fn test_every_open_form_is_defined() {
        let defined: Vec<_> = open_decls().into_iter().map(|(name, _)| name).collect();
        assert_eq!(defined, OPEN_DECLS);
    }
}
