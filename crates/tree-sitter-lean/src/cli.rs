//! `tree-sitter-lean`: load the Lean grammar, or any `grammar.json`, and
//! report whether it compiles into a language.
#![allow(clippy::multiple_crate_versions)]

use std::error::Error;
use std::fs;
use std::process::ExitCode;

use facet::Facet;
use sitter::{parse_grammar, CompileOptions, Grammar, Language};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tree_sitter_lean::{LoadError, DISPLAY_NAME};

/// Load a grammar into a language handle and report the result.
#[derive(Facet, Debug)]
struct Args {
    /// Load this `grammar.json` instead of the built-in Lean grammar.
    #[facet(named, short = 'g', default)]
    grammar: Option<String>,

    /// Print the grammar as JSON instead of a summary.
    #[facet(named, short = 'j')]
    json: bool,

    /// Treat unreachable rules as errors.
    #[facet(named, short = 's')]
    strict: bool,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[facet(named, short = 'v')]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads and parses a grammar file, naming failures after the file.
fn read_grammar(path: &str) -> Result<Grammar, LoadError> {
    let json = fs::read_to_string(path).map_err(|e| LoadError::unavailable(path, e))?;
    parse_grammar(&json).map_err(|e| LoadError::unavailable(path, e))
}

fn load(args: &Args) -> Result<(Grammar, Language), LoadError> {
    let options = CompileOptions {
        strict: args.strict,
        ..CompileOptions::default()
    };
    match &args.grammar {
        Some(path) => {
            let grammar = read_grammar(path)?;
            let language =
                Language::load_with(&grammar, &options).map_err(|e| LoadError::unavailable(path, e))?;
            Ok((grammar, language))
        }
        None => {
            let grammar =
                tree_sitter_lean::grammar().map_err(|e| LoadError::unavailable(DISPLAY_NAME, e))?;
            let language = tree_sitter_lean::load_language_with(&grammar, &options)?;
            Ok((grammar, language))
        }
    }
}

fn summary(grammar: &Grammar, language: &Language) -> String {
    let start = language
        .node_kind_for_id(language.start_symbol())
        .unwrap_or_default();
    format!(
        "{name}: {rules} rules, {symbols} symbols, {tokens} tokens, {externals} external tokens, \
         {fields} fields, start rule '{start}'",
        name = language.name(),
        rules = grammar.rules.len(),
        symbols = language.node_kind_count(),
        tokens = language.token_count(),
        externals = language.external_token_count(),
        fields = language.field_count(),
    )
}

fn report(err: &LoadError) {
    eprintln!("{err}");
    let mut cause = err.source();
    while let Some(inner) = cause {
        eprintln!("  caused by: {inner}");
        cause = inner.source();
    }
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();
    let args: Args = match facet_args::from_slice(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    init_tracing(args.verbose);

    match load(&args) {
        Ok((grammar, language)) => {
            info!(language = %language.name(), "grammar loaded");
            if args.json {
                println!("{}", grammar.to_json());
            } else {
                println!("{}", summary(&grammar, &language));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}
