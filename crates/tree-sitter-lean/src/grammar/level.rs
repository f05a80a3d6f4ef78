//! Universe levels, as written in `decl.{u, v}` and `Sort (max u v)`.

use sitter::grammar::dsl::{one_of, repeat1, seq, string, sym};

use super::util::Rules;

const LEVELS: [&str; 7] = [
    "level_paren",
    "level_max",
    "level_imax",
    "level_hole",
    "level_num",
    "level_ident",
    "level_add",
];

pub(super) fn rules() -> Rules {
    vec![
        (
            "level_paren",
            seq([string("("), sym("_level"), string(")")]),
        ),
        ("level_max", string("max")),
        ("level_imax", string("imax")),
        ("level_hole", string("_")),
        ("level_num", sym("num_lit")),
        ("level_ident", sym("ident")),
        ("level_add", string("+")),
        ("_level", repeat1(one_of(LEVELS))),
    ]
}
