//! Attributes: `@[simp, scoped instance 100]`.

use sitter::grammar::dsl::{choice, one_of, prec_right, repeat, seq, sep_by1, string, sym};

use super::util::{attr_kind, Rules};

const ATTRS: [&str; 3] = ["attr_simple", "attr_macro", "attr_export"];

pub(super) fn rules() -> Rules {
    vec![
        (
            "attr_simple",
            prec_right(
                0,
                seq([
                    sym("ident"),
                    repeat(choice([sym("ident"), sym("num_lit")])),
                ]),
            ),
        ),
        ("attr_macro", seq([string("macro"), sym("ident")])),
        ("attr_export", seq([string("export"), sym("ident")])),
        ("attr_p", one_of(ATTRS)),
        ("attr_instance", seq([attr_kind(), sym("attr_p")])),
        (
            "attributes",
            seq([
                string("@["),
                sep_by1(sym("attr_instance"), string(",")),
                string("]"),
            ]),
        ),
    ]
}
