//! Lean 4 grammar for the `sitter` runtime.
//!
//! The grammar is written in Rust with the `sitter` DSL and compiled into a
//! [`Language`] on demand:
//!
//! ```
//! let language = tree_sitter_lean::language().unwrap();
//! assert_eq!(language.name(), "lean");
//! assert!(language.has_external_scanner());
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// The grammar's rules, grouped by area of the language.
pub mod grammar;

/// The external scanner for raw string literals.
pub mod scanner;

use std::error::Error;

use sitter::{CompileOptions, Grammar, GrammarError, Language};
use tracing::debug;

pub use scanner::LeanScanner;

/// The grammar's `name`, used in node-type files and symbol tables.
pub const GRAMMAR_NAME: &str = "lean";

/// The human-readable name used in error messages.
pub const DISPLAY_NAME: &str = "Lean";

/// Why a language handle could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The grammar could not be built, validated or compiled.
    #[error("Error loading {grammar} grammar")]
    GrammarUnavailable {
        /// Display name of the grammar that failed.
        grammar: String,
        /// The underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync + 'static>,
    },
}

impl LoadError {
    /// Wraps `source` as a failure to load the grammar called `grammar`.
    pub fn unavailable(
        grammar: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        let grammar = grammar.into();
        debug!(%grammar, cause = %source, "grammar unavailable");
        Self::GrammarUnavailable {
            grammar,
            source: Box::new(source),
        }
    }
}

/// Builds the Lean grammar definition.
///
/// # Errors
///
/// Returns [`GrammarError::DuplicateRule`] if the rule groups overlap.
pub fn grammar() -> Result<Grammar, GrammarError> {
    grammar::lean()
}

/// Returns the Lean language handle with its external scanner registered.
///
/// Every call yields an equivalent handle.
///
/// # Errors
///
/// Returns [`LoadError::GrammarUnavailable`] if the grammar cannot be built
/// or compiled.
pub fn language() -> Result<Language, LoadError> {
    let grammar = grammar().map_err(|e| LoadError::unavailable(DISPLAY_NAME, e))?;
    load_language(&grammar)
}

/// Compiles `grammar` as the Lean language, registering the Lean scanner.
///
/// # Errors
///
/// Returns [`LoadError::GrammarUnavailable`] if `grammar` fails validation
/// or compilation.
pub fn load_language(grammar: &Grammar) -> Result<Language, LoadError> {
    load_language_with(grammar, &CompileOptions::default())
}

/// Like [`load_language`], with explicit compile options.
///
/// # Errors
///
/// See [`load_language`].
pub fn load_language_with(
    grammar: &Grammar,
    options: &CompileOptions,
) -> Result<Language, LoadError> {
    debug!(rules = grammar.rules.len(), strict = options.strict, "loading grammar");
    let language =
        Language::load_with(grammar, options).map_err(|e| LoadError::unavailable(DISPLAY_NAME, e))?;
    Ok(language.with_scanner(LeanScanner::factory))
}

/// Checks that the Lean language loads and that its ABI version is usable.
///
/// # Errors
///
/// Returns [`LoadError::GrammarUnavailable`], displayed as
/// `Error loading Lean grammar`, on any failure.
pub fn check_grammar_loads() -> Result<(), LoadError> {
    check_compatible(&language()?)
}

fn check_compatible(language: &Language) -> Result<(), LoadError> {
    language
        .check_compatible()
        .map_err(|e| LoadError::unavailable(DISPLAY_NAME, e))
}

#[cfg(test)]
mod tests {
    use sitter::grammar::dsl::pattern;
    use sitter::{CompileError, SymbolKind};

    use super::*;

    #[test]
    fn test_can_load_grammar() {
        check_grammar_loads().expect("Error loading Lean grammar");
    }

    #[test]
    fn test_loading_is_repeatable() {
        let first = language().unwrap();
        let second = language().unwrap();
        assert_eq!(first.node_kind_count(), second.node_kind_count());
        assert_eq!(first.token_count(), second.token_count());
        for id in 0..u16::try_from(first.node_kind_count()).unwrap() {
            assert_eq!(first.node_kind_for_id(id), second.node_kind_for_id(id));
        }
    }

    #[test]
    fn test_start_symbol_is_module() {
        let language = language().unwrap();
        assert_eq!(language.name(), GRAMMAR_NAME);
        assert_eq!(
            language.id_for_node_kind("module", true),
            Some(language.start_symbol())
        );
        assert_eq!(language.field_count(), 0);
    }

    #[test]
    fn test_externals_follow_declaration_order() {
        let language = language().unwrap();
        assert_eq!(language.external_token_count(), grammar::EXTERNALS.len());

        let names: Vec<_> = language
            .external_tokens()
            .iter()
            .map(|&id| language.node_kind_for_id(id).unwrap())
            .collect();
        assert_eq!(names, grammar::EXTERNALS);

        let raw_start = language.external_tokens()[0];
        assert_eq!(language.symbol_kind(raw_start), Some(SymbolKind::External));
        assert!(!language.node_kind_is_visible(raw_start));
        assert!(language.node_kind_is_visible(language.external_tokens()[1]));
    }

    #[test]
    fn test_aliases_become_node_kinds() {
        let language = language().unwrap();
        for kind in ["str_content", "attr_kind"] {
            let id = language.id_for_node_kind(kind, true).unwrap();
            assert_eq!(language.symbol_kind(id), Some(SymbolKind::Alias));
        }
    }

    #[test]
    fn test_keywords_beat_identifiers() {
        let language = language().unwrap();
        let token = language.lex("theorem foo").unwrap();
        assert_eq!(token.len, "theorem".len());
        assert_eq!(language.node_kind_for_id(token.symbol), Some("theorem"));
        assert!(!language.node_kind_is_named(token.symbol));
    }

    #[test]
    fn test_numbers_lex_as_hidden_tokens() {
        let language = language().unwrap();
        let token = language.lex("0x1F rest").unwrap();
        assert_eq!(token.len, 4);
        assert!(!language.node_kind_is_visible(token.symbol));
    }

    #[test]
    fn test_quoted_names_and_strings_are_single_tokens() {
        let language = language().unwrap();
        assert_eq!(language.lex("foo bar»").unwrap().len, "foo".len());

        let quoted = language.lex("«a b» c").unwrap();
        assert_eq!(quoted.len, "«a b»".len());
        assert!(!language.node_kind_is_visible(quoted.symbol));

        let string = language.lex(r#""a \"b\"" c"#).unwrap();
        assert_eq!(language.node_kind_for_id(string.symbol), Some("str_lit"));
        assert_eq!(string.len, r#""a \"b\"""#.len());
    }

    #[test]
    fn test_rejected_abi_version_reports_lean() {
        let options = CompileOptions {
            abi_version: sitter::LANGUAGE_VERSION + 1,
            ..CompileOptions::default()
        };
        let language = load_language_with(&grammar().unwrap(), &options).unwrap();
        let err = check_compatible(&language).unwrap_err();
        assert_eq!(err.to_string(), "Error loading Lean grammar");
    }

    #[test]
    fn test_scanner_is_registered() {
        let language = language().unwrap();
        let mut scanner = language.create_scanner().unwrap();
        let mut buffer = [0u8; 4];
        assert_eq!(scanner.serialize(&mut buffer), 1);
        assert_eq!(buffer[0], 0);
    }

    #[test]
    fn test_corrupted_grammar_reports_lean() {
        let mut grammar = grammar().unwrap();
        grammar.rules.remove("ident");

        let err = load_language(&grammar).unwrap_err();
        assert_eq!(err.to_string(), "Error loading Lean grammar");
        let cause = err.source().unwrap().to_string();
        assert!(cause.contains("ident"), "{cause}");
    }

    #[test]
    fn test_invalid_token_pattern_reports_lean() {
        let mut grammar = grammar().unwrap();
        grammar.rules.insert("hole".to_owned(), pattern("(_"));

        let err = load_language(&grammar).unwrap_err();
        assert_eq!(err.to_string(), "Error loading Lean grammar");
        let LoadError::GrammarUnavailable { source, .. } = err;
        let cause = source.downcast_ref::<CompileError>().unwrap();
        assert!(matches!(cause, CompileError::InvalidPattern { rule, .. } if rule == "hole"));
    }
}
