//! The Lean 4 grammar, written with the `sitter` DSL.
//!
//! Rules are grouped by the area of the language they describe. Each group
//! contributes a list of named rules; [`lean`] assembles them together with
//! the external tokens and extras.

mod attr;
mod command;
mod declaration;
mod do_notation;
mod level;
mod literal;
mod module;
mod syntax;
mod tactic;
mod term;
mod util;

use sitter::grammar::dsl::{pattern, repeat, seq, string, sym};
use sitter::{Grammar, GrammarError};

use crate::GRAMMAR_NAME;

/// Tokens produced by the external scanner, in the order the scanner
/// indexes them.
pub const EXTERNALS: [&str; 22] = [
    "_raw_str_start",
    "raw_str_content",
    "_raw_str_end",
    "comment_body",
    "_push_col",
    "_pop_col",
    "_match_alts_start",
    "_match_alt_start",
    "_eq_col_start",
    "gt_col_bar",
    "gt_col_else",
    "_dedent",
    "paren_open",
    "paren_close",
    "angle_open",
    "angle_close",
    "curly_open",
    "curly_close",
    "square_open",
    "square_close",
    "_eof",
    "__error_sentinel",
];

/// Builds the Lean grammar.
///
/// # Errors
///
/// Returns [`GrammarError::DuplicateRule`] if two rule groups define the same
/// name.
pub fn lean() -> Result<Grammar, GrammarError> {
    Grammar::builder(GRAMMAR_NAME)
        .rule(
            "module",
            seq([module::header(), repeat(sym("command")), sym("_eof")]),
        )
        .rules(module::rules())
        .rules(command::rules())
        .rules(declaration::rules())
        .rules(do_notation::rules())
        .rules(literal::rules())
        .rules(term::rules())
        .rules(syntax::rules())
        .rules(level::rules())
        .rules(tactic::rules())
        .rules(attr::rules())
        .rule(
            "comment",
            seq([string("/-"), sym("comment_body"), string("-/")]),
        )
        .rule("line_comment", pattern(r"--[^\n]*\n"))
        .externals(EXTERNALS.map(sym))
        .extras([pattern(r"[\s\n]+"), sym("comment"), sym("line_comment")])
        .build()
}

#[cfg(test)]
mod tests {
    use sitter::{parse_grammar, validate, ValidateOptions};

    use super::*;

    #[test]
    fn test_module_is_the_only_root() {
        let grammar = lean().unwrap();
        assert_eq!(grammar.root_candidates(), vec!["module"]);
        assert_eq!(grammar.start_rule(), Some("module"));
    }

    #[test]
    fn test_grammar_is_consistent() {
        let grammar = lean().unwrap();
        let strict = ValidateOptions { strict: true };
        validate(&grammar, &strict).unwrap();
    }

    #[test]
    fn test_externals_keep_scanner_order() {
        let grammar = lean().unwrap();
        let names: Vec<_> = grammar.external_names().collect();
        assert_eq!(names, EXTERNALS);
        assert_eq!(names[usize::from(crate::scanner::RAW_STR_START)], "_raw_str_start");
        assert_eq!(names[usize::from(crate::scanner::RAW_STR_CONTENT)], "raw_str_content");
        assert_eq!(names[usize::from(crate::scanner::RAW_STR_END)], "_raw_str_end");
    }

    #[test]
    fn test_missing_definitions_are_supplied() {
        let grammar = lean().unwrap();
        for name in [
            "defeq",
            "left_arrow",
            "darrow",
            "match_expr_pat",
            "let_rec_decls",
            "have_decl",
            "let_id_decl_no_binders",
            "generalizing_param",
            "motive",
            "match_discr",
            "elim_target",
            "computed_field",
        ] {
            assert!(grammar.rules.contains_key(name), "{name} is not defined");
        }
        assert!(!grammar.rules.contains_key("attr_kind"));
    }

    #[test]
    fn test_json_round_trip() {
        let grammar = lean().unwrap();
        let json = grammar.to_json();
        assert!(json.contains(r#""name":"lean""#));
        assert!(json.contains(r#""value":"theorem""#));
        assert!(json.contains(r#""type":"PREC_RIGHT","value":0"#));
        assert!(!json.contains(r#"{"String":"#));

        assert_eq!(parse_grammar(&json).unwrap(), grammar);
    }
}
