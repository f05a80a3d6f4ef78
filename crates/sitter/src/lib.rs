//! A Rust-native tree-sitter grammar runtime.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// Core structures and parsing logic for Tree-sitter grammars.
///
/// This module defines how a language's declarative shape is represented:
/// the grammar itself, the rules it is made of, and the DSL used to write
/// grammars directly in Rust.
pub mod grammar;

/// Compiling grammars into language handles.
///
/// A [`Language`] is the opaque, immutable product of a successfully loaded
/// grammar. Everything a parser needs to know about the language is read
/// from it.
pub mod language;

/// The interface between a language and its external scanner.
pub mod lexer;

/// Grammar validation and consistency checking utilities.
///
/// Validation exists to protect language construction from malformed
/// grammars. It enforces Tree-sitter's invariants and ensures that what's
/// parsed is also semantically meaningful.
pub mod validate;

pub use grammar::{parse_grammar, Grammar, GrammarBuilder, GrammarError, Rule};
pub use language::{
    CompileError, CompileOptions, IncompatibleVersion, Language, SymbolKind, TokenMatch,
    LANGUAGE_VERSION, MIN_COMPATIBLE_LANGUAGE_VERSION,
};
pub use lexer::{ExternalScanner, Lexer, StrLexer};
pub use validate::{validate, ValidateOptions, ValidationError};
