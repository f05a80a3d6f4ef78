//! Combinators shared by the Lean rule sets.
//!
//! Lean is layout sensitive: blocks are delimited by the column of their
//! first item. The external scanner tracks columns, so the combinators here
//! only arrange its `_push_col`, `_eq_col_start` and `_pop_col` tokens
//! around the items.

use sitter::grammar::dsl::{alias, choice, optional, repeat, seq, sep_by1, string, sym};
use sitter::Rule;

/// Named rules contributed by one area of the language.
pub(super) type Rules = Vec<(&'static str, Rule)>;

/// One or more `item`s aligned on the same column.
pub(super) fn many1_indent(item: Rule) -> Rule {
    seq([
        sym("_push_col"),
        sep_by1(item, sym("_eq_col_start")),
        sym("_pop_col"),
    ])
}

/// Zero or more `item`s aligned on the same column.
pub(super) fn many_indent(item: Rule) -> Rule {
    optional(many1_indent(item))
}

/// One or more `item`s, each on its own aligned line or separated by `sep`.
pub(super) fn sep_by1_indent(item: Rule, sep: Rule) -> Rule {
    seq([
        sym("_push_col"),
        sep_by1(item, choice([sym("_eq_col_start"), sep])),
        sym("_pop_col"),
    ])
}

pub(super) fn sep_by1_indent_semicolon(item: Rule) -> Rule {
    sep_by1_indent(item, string(";"))
}

pub(super) fn sep_by_indent_semicolon(item: Rule) -> Rule {
    optional(sep_by1_indent_semicolon(item))
}

/// An optional `: type` ascription.
pub(super) fn opt_type() -> Rule {
    optional(sym("type_spec"))
}

/// An optional `name :` label.
pub(super) fn opt_ident() -> Rule {
    optional(seq([sym("ident"), string(":")]))
}

/// Binders followed by a mandatory type.
pub(super) fn decl_sig() -> Rule {
    seq([binders(), sym("type_spec")])
}

/// Binders followed by an optional type.
pub(super) fn opt_decl_sig() -> Rule {
    seq([binders(), opt_type()])
}

fn binders() -> Rule {
    repeat(choice([sym("binder_ident"), sym("bracketed_binder")]))
}

/// The modifiers that may precede a declaration, in the order Lean accepts
/// them.
pub(super) fn decl_modifiers() -> Rule {
    seq([
        optional(sym("documentation")),
        optional(sym("attributes")),
        optional(sym("visibility")),
        optional(sym("noncomputable")),
        optional(string("unsafe")),
        optional(choice([string("partial"), string("nonrec")])),
    ])
}

/// An optional `scoped` or `local` keyword, surfaced as an `attr_kind` node.
pub(super) fn attr_kind() -> Rule {
    optional(alias(
        choice([string("scoped"), string("local")]),
        "attr_kind",
        true,
    ))
}

/// A boolean, string or number option value.
pub(super) fn option_value() -> Rule {
    choice([
        string("true"),
        string("false"),
        sym("str_lit"),
        sym("num_lit"),
    ])
}
