//! File headers: `module`, `prelude` and imports.

use sitter::grammar::dsl::{optional, repeat, seq, string, sym};
use sitter::Rule;

use super::util::Rules;

pub(super) fn rules() -> Rules {
    vec![(
        "import",
        seq([
            optional(string("private")),
            string("import"),
            optional(string("all")),
            sym("ident"),
        ]),
    )]
}

/// The optional header that precedes a file's commands.
pub(super) fn header() -> Rule {
    seq([
        optional(string("module")),
        optional(string("prelude")),
        repeat(sym("import")),
    ])
}
