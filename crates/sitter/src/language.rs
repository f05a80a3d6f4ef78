//! Compiling a [`Grammar`] into a [`Language`] handle.
//!
//! A `Language` is what a parser consumes: a numbered symbol table with
//! visibility metadata, the field table, the compiled lexical tokens and the
//! external-token table. Symbols are laid out the way Tree-sitter lays them
//! out in `parser.c`:
//!
//! | ids            | contents                                   |
//! |----------------|--------------------------------------------|
//! | `0`            | the builtin `end` symbol                   |
//! | terminals      | lexical tokens, in discovery order         |
//! | externals      | external tokens, in declaration order      |
//! | non-terminals  | the start rule, then other rules by name   |
//! | aliases        | alias names that match no other symbol     |

use std::collections::{BTreeSet, HashMap, HashSet};

use regex_automata::meta::{BuildError, Regex};
use regex_automata::{Anchored, Input, MatchKind};
use tracing::{debug, info};

use crate::grammar::{Grammar, Rule, RuleType};
use crate::lexer::{ExternalScanner, ScannerFactory};
use crate::validate::{self, ValidateOptions, ValidationError};

/// The language ABI version this runtime produces.
pub const LANGUAGE_VERSION: usize = 15;

/// The oldest language ABI version this runtime accepts.
pub const MIN_COMPATIBLE_LANGUAGE_VERSION: usize = 13;

/// A language whose ABI version this runtime cannot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "incompatible language version {version}, expected \
     {MIN_COMPATIBLE_LANGUAGE_VERSION} to {LANGUAGE_VERSION}"
)]
pub struct IncompatibleVersion {
    /// The version the language reports.
    pub version: usize,
}

/// Options for [`Language::load_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Reject grammars containing unreachable rules.
    pub strict: bool,
    /// The ABI version stamped on the handle.
    pub abi_version: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict: false,
            abi_version: LANGUAGE_VERSION,
        }
    }
}

/// Why a grammar could not be turned into a [`Language`].
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The grammar failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A token's regular expression does not compile.
    #[error("invalid pattern /{pattern}/ in rule '{rule}': {source}")]
    InvalidPattern {
        /// The rule containing the token.
        rule: String,
        /// The regex source that failed.
        pattern: String,
        /// The regex compiler's complaint.
        #[source]
        source: Box<BuildError>,
    },

    /// A `TOKEN` wraps a reference to a non-lexical rule.
    #[error("non-token symbol '{symbol}' inside token in rule '{rule}'")]
    NonTokenSymbol {
        /// The rule containing the token.
        rule: String,
        /// The offending symbol.
        symbol: String,
    },

    /// More symbols than a `u16` can number.
    #[error("grammar needs more than {} symbols", u16::MAX)]
    TooManySymbols,
}

/// The role a symbol plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// The builtin end-of-input symbol.
    End,
    /// A lexical token.
    Terminal,
    /// A token produced by the external scanner.
    External,
    /// A syntactic rule.
    NonTerminal,
    /// A node name introduced only through `alias`.
    Alias,
}

/// Per-symbol metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMetadata {
    /// Node kind name.
    pub name: String,
    /// What kind of symbol this is.
    pub kind: SymbolKind,
    /// Whether nodes of this kind appear in syntax trees.
    pub visible: bool,
    /// Whether this is a named node (as opposed to anonymous punctuation).
    pub named: bool,
    /// Whether the rule is declared as a supertype.
    pub supertype: bool,
}

/// How a terminal recognizes its text.
#[derive(Debug, Clone)]
pub enum TokenMatcher {
    /// An exact string.
    Literal(String),
    /// A regex run anchored at the start of the input. It reports the
    /// longest match, whatever the order of its alternatives.
    Regex(Regex),
}

impl TokenMatcher {
    /// Compiles a regex matcher with longest-match semantics.
    ///
    /// # Errors
    ///
    /// Returns the regex compiler's error for invalid `source`.
    pub fn regex(source: &str) -> Result<Self, BuildError> {
        Regex::builder()
            .configure(Regex::config().match_kind(MatchKind::All))
            .build(source)
            .map(Self::Regex)
    }

    /// Length in bytes of the longest non-empty match at the start of
    /// `input`.
    #[must_use]
    pub fn match_len(&self, input: &str) -> Option<usize> {
        let len = match self {
            Self::Literal(text) => input.starts_with(text.as_str()).then_some(text.len())?,
            Self::Regex(regex) => {
                let input = Input::new(input).anchored(Anchored::Yes);
                regex.find(input)?.end()
            }
        };
        (len > 0).then_some(len)
    }

    /// Returns `true` for literal matchers.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// A compiled lexical token.
#[derive(Debug, Clone)]
pub struct Token {
    /// The terminal symbol this token produces.
    pub symbol: u16,
    /// The compiled matcher.
    pub matcher: TokenMatcher,
    /// Whether the token must follow the previous token with no extras between.
    pub immediate: bool,
}

/// The result of [`Language::lex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch {
    /// The matched terminal.
    pub symbol: u16,
    /// Match length in bytes.
    pub len: usize,
}

/// An immutable, compiled grammar.
#[derive(Debug, Clone)]
pub struct Language {
    name: String,
    symbols: Vec<SymbolMetadata>,
    fields: Vec<String>,
    tokens: Vec<Token>,
    externals: Vec<u16>,
    extras: Vec<u16>,
    supertypes: Vec<u16>,
    start_symbol: u16,
    word_token: Option<u16>,
    abi_version: usize,
    scanner: Option<ScannerFactory>,
}

impl Language {
    /// Compiles `grammar` with default options.
    ///
    /// # Errors
    ///
    /// See [`Language::load_with`].
    pub fn load(grammar: &Grammar) -> Result<Self, CompileError> {
        Self::load_with(grammar, &CompileOptions::default())
    }

    /// Validates and compiles `grammar`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Validation`] for structurally invalid grammars,
    /// [`CompileError::InvalidPattern`] or [`CompileError::NonTokenSymbol`] for
    /// tokens that cannot be compiled, and [`CompileError::TooManySymbols`]
    /// when the symbol table overflows.
    pub fn load_with(grammar: &Grammar, options: &CompileOptions) -> Result<Self, CompileError> {
        let validate_options = ValidateOptions {
            strict: options.strict,
        };
        validate::validate(grammar, &validate_options)?;
        let start = validate::start_rule(grammar)?;

        let mut language = Compiler::new(grammar, start).compile()?;
        language.abi_version = options.abi_version;
        info!(
            language = %language.name,
            symbols = language.symbols.len(),
            tokens = language.tokens.len(),
            fields = language.fields.len(),
            externals = language.externals.len(),
            "language loaded"
        );
        Ok(language)
    }

    /// Registers the external scanner implementation.
    #[must_use]
    pub fn with_scanner(mut self, factory: ScannerFactory) -> Self {
        self.scanner = Some(factory);
        self
    }

    /// Creates a fresh external scanner, if one is registered.
    #[must_use]
    pub fn create_scanner(&self) -> Option<Box<dyn ExternalScanner>> {
        self.scanner.map(|factory| factory())
    }

    /// Returns `true` if an external scanner is registered.
    #[must_use]
    pub const fn has_external_scanner(&self) -> bool {
        self.scanner.is_some()
    }

    /// The grammar's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ABI version the handle was compiled for.
    #[must_use]
    pub const fn abi_version(&self) -> usize {
        self.abi_version
    }

    /// Checks that a parser built on this runtime can use the language.
    ///
    /// # Errors
    ///
    /// Returns [`IncompatibleVersion`] if [`Language::abi_version`] is
    /// outside the supported range.
    pub fn check_compatible(&self) -> Result<(), IncompatibleVersion> {
        let version = self.abi_version();
        if (MIN_COMPATIBLE_LANGUAGE_VERSION..=LANGUAGE_VERSION).contains(&version) {
            Ok(())
        } else {
            Err(IncompatibleVersion { version })
        }
    }

    /// Number of symbols, including `end` and aliases.
    #[must_use]
    pub fn node_kind_count(&self) -> usize {
        self.symbols.len()
    }

    /// The name of symbol `id`.
    #[must_use]
    pub fn node_kind_for_id(&self, id: u16) -> Option<&str> {
        self.symbol_metadata(id).map(|m| m.name.as_str())
    }

    /// The id of the visible symbol called `kind` with the given namedness.
    #[must_use]
    pub fn id_for_node_kind(&self, kind: &str, named: bool) -> Option<u16> {
        self.symbols
            .iter()
            .position(|m| m.visible && m.named == named && m.name == kind)
            .and_then(|i| u16::try_from(i).ok())
    }

    /// Whether symbol `id` is a named node.
    #[must_use]
    pub fn node_kind_is_named(&self, id: u16) -> bool {
        self.symbol_metadata(id).is_some_and(|m| m.named)
    }

    /// Whether symbol `id` appears in syntax trees.
    #[must_use]
    pub fn node_kind_is_visible(&self, id: u16) -> bool {
        self.symbol_metadata(id).is_some_and(|m| m.visible)
    }

    /// Whether symbol `id` is a supertype.
    #[must_use]
    pub fn node_kind_is_supertype(&self, id: u16) -> bool {
        self.symbol_metadata(id).is_some_and(|m| m.supertype)
    }

    /// The kind of symbol `id`.
    #[must_use]
    pub fn symbol_kind(&self, id: u16) -> Option<SymbolKind> {
        self.symbol_metadata(id).map(|m| m.kind)
    }

    /// Full metadata for symbol `id`.
    #[must_use]
    pub fn symbol_metadata(&self, id: u16) -> Option<&SymbolMetadata> {
        self.symbols.get(usize::from(id))
    }

    /// Number of distinct field names.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// The name of field `id`; ids start at 1.
    #[must_use]
    pub fn field_name_for_id(&self, id: u16) -> Option<&str> {
        let index = usize::from(id).checked_sub(1)?;
        self.fields.get(index).map(String::as_str)
    }

    /// The id of the field called `name`.
    #[must_use]
    pub fn field_id_for_name(&self, name: &str) -> Option<u16> {
        let index = self.fields.iter().position(|f| f == name)?;
        u16::try_from(index + 1).ok()
    }

    /// Number of external tokens.
    #[must_use]
    pub fn external_token_count(&self) -> usize {
        self.externals.len()
    }

    /// External token symbols in scanner order.
    #[must_use]
    pub fn external_tokens(&self) -> &[u16] {
        &self.externals
    }

    /// Symbols allowed between any two tokens.
    #[must_use]
    pub fn extras(&self) -> &[u16] {
        &self.extras
    }

    /// Supertype symbols.
    #[must_use]
    pub fn supertypes(&self) -> &[u16] {
        &self.supertypes
    }

    /// The symbol of the start rule.
    #[must_use]
    pub const fn start_symbol(&self) -> u16 {
        self.start_symbol
    }

    /// The keyword-extraction word token, if declared.
    #[must_use]
    pub const fn word_token(&self) -> Option<u16> {
        self.word_token
    }

    /// Number of compiled lexical tokens.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// The compiled lexical tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Longest token match at the start of `input`, ignoring parse state.
    ///
    /// On equal lengths a literal beats a pattern, then the lower symbol wins.
    #[must_use]
    pub fn lex(&self, input: &str) -> Option<TokenMatch> {
        let mut best: Option<(usize, bool, u16)> = None;
        for token in &self.tokens {
            let Some(len) = token.matcher.match_len(input) else {
                continue;
            };
            let literal = token.matcher.is_literal();
            let better = best.is_none_or(|(best_len, best_literal, _)| {
                len > best_len || (len == best_len && literal && !best_literal)
            });
            if better {
                best = Some((len, literal, token.symbol));
            }
        }
        best.map(|(len, _, symbol)| TokenMatch { symbol, len })
    }
}

/// The body of a rule that compiles to a single token, and whether the
/// token is immediate.
fn lexical_body(rule: &Rule) -> Option<(&Rule, bool)> {
    match rule.rule_type {
        RuleType::String | RuleType::Pattern => Some((rule, false)),
        RuleType::Token => Some((rule.content.as_deref()?, false)),
        RuleType::ImmediateToken => Some((rule.content.as_deref()?, true)),
        t if t.is_precedence() => lexical_body(rule.content.as_deref()?),
        _ => None,
    }
}

/// Translates a token body into regex syntax.
fn token_regex(context: &str, rule: &Rule) -> Result<String, CompileError> {
    let inner = |rule: &Rule| -> Result<String, CompileError> {
        rule.content
            .as_deref()
            .map_or_else(|| Ok(String::new()), |content| token_regex(context, content))
    };

    Ok(match rule.rule_type {
        RuleType::Blank => String::new(),
        RuleType::String => regex::escape(rule.text_value().unwrap_or_default()),
        RuleType::Pattern => {
            let source = rule.text_value().unwrap_or_default();
            if rule.flags.as_deref().is_some_and(|f| f.contains('i')) {
                format!("(?i:{source})")
            } else {
                format!("(?:{source})")
            }
        }
        RuleType::Symbol => {
            return Err(CompileError::NonTokenSymbol {
                rule: context.to_string(),
                symbol: rule.name.clone().unwrap_or_default(),
            });
        }
        RuleType::Seq => rule
            .members
            .iter()
            .map(|m| token_regex(context, m))
            .collect::<Result<String, _>>()?,
        RuleType::Choice => {
            let optional = rule.members.iter().any(|m| m.rule_type == RuleType::Blank);
            let alternatives = rule
                .members
                .iter()
                .filter(|m| m.rule_type != RuleType::Blank)
                .map(|m| token_regex(context, m))
                .collect::<Result<Vec<_>, _>>()?;
            let suffix = if optional { "?" } else { "" };
            format!("(?:{}){suffix}", alternatives.join("|"))
        }
        RuleType::Repeat => format!("(?:{})*", inner(rule)?),
        RuleType::Repeat1 => format!("(?:{})+", inner(rule)?),
        _ => inner(rule)?,
    })
}

enum ExtraRef<'g> {
    Id(u16),
    Name(&'g str),
}

struct Compiler<'g> {
    grammar: &'g Grammar,
    /// The start rule followed by the other rules, sorted by name.
    order: Vec<&'g str>,
    symbols: Vec<SymbolMetadata>,
    tokens: Vec<Token>,
    literals: HashMap<(&'g str, bool), u16>,
    auxiliary: HashMap<(String, bool), u16>,
    auxiliary_counts: HashMap<&'g str, usize>,
    rule_ids: HashMap<&'g str, u16>,
}

impl<'g> Compiler<'g> {
    fn new(grammar: &'g Grammar, start: &'g str) -> Self {
        let mut rest: Vec<&str> = grammar
            .rules
            .keys()
            .map(String::as_str)
            .filter(|name| *name != start)
            .collect();
        rest.sort_unstable();

        let mut order = vec![start];
        order.extend(rest);

        Self {
            grammar,
            order,
            symbols: Vec::new(),
            tokens: Vec::new(),
            literals: HashMap::new(),
            auxiliary: HashMap::new(),
            auxiliary_counts: HashMap::new(),
            rule_ids: HashMap::new(),
        }
    }

    fn compile(mut self) -> Result<Language, CompileError> {
        let grammar = self.grammar;
        self.push_symbol("end", SymbolKind::End, false, true)?;

        // Terminals.
        for name in self.order.clone() {
            let rule = &grammar.rules[name];
            if let Some((body, immediate)) = lexical_body(rule) {
                let id = self.push_symbol(name, SymbolKind::Terminal, visible(name), true)?;
                let matcher = self.matcher(name, body)?;
                self.tokens.push(Token {
                    symbol: id,
                    matcher,
                    immediate,
                });
                self.rule_ids.insert(name, id);
            } else {
                self.collect_tokens(name, rule)?;
            }
        }

        let mut extras = Vec::new();
        for extra in grammar.extras.iter().flatten() {
            extras.push(match extra.rule_type {
                RuleType::Symbol => ExtraRef::Name(extra.name.as_deref().unwrap_or_default()),
                _ => ExtraRef::Id(self.inline_token("extras", extra)?),
            });
        }

        // External tokens.
        let mut externals = Vec::new();
        for external in grammar.externals.iter().flatten() {
            let Some(name) = external.symbol_name().or_else(|| external.string_value()) else {
                continue;
            };
            let named = external.is_symbol();
            let id = self.push_symbol(name, SymbolKind::External, visible(name), named)?;
            self.rule_ids.entry(name).or_insert(id);
            externals.push(id);
        }

        // Non-terminals.
        let supertype_names: HashSet<&str> = grammar
            .supertypes
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();
        for name in self.order.clone() {
            if self.rule_ids.contains_key(name) {
                continue;
            }
            let id = self.push_symbol(name, SymbolKind::NonTerminal, visible(name), true)?;
            if supertype_names.contains(name) {
                self.symbols[usize::from(id)].supertype = true;
            }
            self.rule_ids.insert(name, id);
        }

        self.collect_aliases()?;

        let fields = self.collect_fields();
        let resolve = |name: &str| self.rule_ids.get(name).copied();
        let extras = extras
            .into_iter()
            .filter_map(|extra| match extra {
                ExtraRef::Id(id) => Some(id),
                ExtraRef::Name(name) => resolve(name),
            })
            .collect();
        let supertypes = supertype_names
            .iter()
            .filter_map(|&name| resolve(name))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let word_token = grammar.word.as_deref().and_then(resolve);
        let start_symbol = resolve(self.order[0]).unwrap_or_default();

        Ok(Language {
            name: grammar.name.clone(),
            symbols: self.symbols,
            fields,
            tokens: self.tokens,
            externals,
            extras,
            supertypes,
            start_symbol,
            word_token,
            abi_version: LANGUAGE_VERSION,
            scanner: None,
        })
    }

    fn push_symbol(
        &mut self,
        name: &str,
        kind: SymbolKind,
        visible: bool,
        named: bool,
    ) -> Result<u16, CompileError> {
        let id = u16::try_from(self.symbols.len()).map_err(|_| CompileError::TooManySymbols)?;
        self.symbols.push(SymbolMetadata {
            name: name.to_string(),
            kind,
            visible,
            named,
            supertype: false,
        });
        Ok(id)
    }

    fn matcher(&self, context: &str, body: &Rule) -> Result<TokenMatcher, CompileError> {
        if let Some(text) = body.string_value() {
            return Ok(TokenMatcher::Literal(text.to_string()));
        }
        let source = token_regex(context, body)?;
        TokenMatcher::regex(&source).map_err(|e| CompileError::InvalidPattern {
            rule: context.to_string(),
            pattern: source,
            source: Box::new(e),
        })
    }

    /// Registers the tokens written inline in a syntactic rule.
    fn collect_tokens(&mut self, context: &'g str, rule: &'g Rule) -> Result<(), CompileError> {
        match rule.rule_type {
            RuleType::String
            | RuleType::Pattern
            | RuleType::Token
            | RuleType::ImmediateToken => {
                self.inline_token(context, rule)?;
            }
            _ => {
                for child in rule.children() {
                    self.collect_tokens(context, child)?;
                }
            }
        }
        Ok(())
    }

    /// Returns the terminal for an inline token, creating it on first use.
    fn inline_token(&mut self, context: &'g str, rule: &'g Rule) -> Result<u16, CompileError> {
        let (body, immediate) = lexical_body(rule).unwrap_or((rule, false));

        if let Some(text) = body.string_value() {
            if let Some(&id) = self.literals.get(&(text, immediate)) {
                return Ok(id);
            }
            let id = self.push_symbol(text, SymbolKind::Terminal, true, false)?;
            self.tokens.push(Token {
                symbol: id,
                matcher: TokenMatcher::Literal(text.to_string()),
                immediate,
            });
            self.literals.insert((text, immediate), id);
            return Ok(id);
        }

        let source = token_regex(context, body)?;
        if let Some(&id) = self.auxiliary.get(&(source.clone(), immediate)) {
            return Ok(id);
        }
        let count = self.auxiliary_counts.entry(context).or_default();
        *count += 1;
        let name = format!("{context}_token{count}");
        let matcher = self.matcher(context, body)?;
        let id = self.push_symbol(&name, SymbolKind::Terminal, false, false)?;
        debug!(token = %name, pattern = %source, "auxiliary token");
        self.tokens.push(Token {
            symbol: id,
            matcher,
            immediate,
        });
        self.auxiliary.insert((source, immediate), id);
        Ok(id)
    }

    fn collect_aliases(&mut self) -> Result<(), CompileError> {
        let grammar = self.grammar;
        let mut aliases: Vec<(&str, bool)> = Vec::new();
        for name in &self.order {
            grammar.rules[*name].walk(&mut |node| {
                if node.rule_type == RuleType::Alias {
                    if let Some(value) = node.text_value() {
                        aliases.push((value, node.named.unwrap_or(false)));
                    }
                }
            });
        }

        let mut seen = HashSet::new();
        for (value, named) in aliases {
            if !seen.insert((value, named)) {
                continue;
            }
            let exists = self
                .symbols
                .iter()
                .any(|m| m.visible && m.named == named && m.name == value);
            if !exists {
                self.push_symbol(value, SymbolKind::Alias, true, named)?;
            }
        }
        Ok(())
    }

    fn collect_fields(&self) -> Vec<String> {
        let mut fields = BTreeSet::new();
        for rule in self.grammar.rules.values() {
            rule.walk(&mut |node| {
                if node.rule_type == RuleType::Field {
                    if let Some(name) = node.name.as_deref() {
                        fields.insert(name.to_string());
                    }
                }
            });
        }
        fields.into_iter().collect()
    }
}

/// Rules whose names start with `_` are hidden from syntax trees.
fn visible(name: &str) -> bool {
    !name.starts_with('_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::dsl::{
        alias, choice, field, immediate_token, optional, pattern, repeat, seq, string, sym, token,
    };
    use crate::lexer::{Lexer, StrLexer};

    fn assignments() -> Grammar {
        Grammar::builder("assign")
            .rule("program", repeat(sym("_statement")))
            .rule("_statement", choice([sym("assignment"), sym("call")]))
            .rule(
                "assignment",
                seq([
                    field("left", sym("identifier")),
                    string("="),
                    field("right", sym("_expression")),
                ]),
            )
            .rule(
                "_expression",
                choice([
                    sym("identifier"),
                    sym("number"),
                    alias(sym("call"), "invocation", true),
                    sym("heredoc"),
                ]),
            )
            .rule(
                "call",
                seq([
                    sym("identifier"),
                    immediate_token(string("(")),
                    optional(sym("_expression")),
                    string(")"),
                ]),
            )
            .rule("identifier", pattern("[a-z_]+"))
            .rule("number", token(seq([optional(string("-")), pattern(r"\d+")])))
            .rule("comment", token(seq([string("#"), pattern("[^\n]*")])))
            .extras([pattern(r"\s"), sym("comment")])
            .externals([sym("heredoc")])
            .build()
            .unwrap()
    }

    #[test]
    fn test_symbol_layout() {
        let language = Language::load(&assignments()).unwrap();

        let names: Vec<_> = (0..15)
            .map(|id| language.node_kind_for_id(id).unwrap())
            .collect();
        assert_eq!(
            names,
            [
                "end",
                "=",
                "(",
                ")",
                "comment",
                "identifier",
                "number",
                "extras_token1",
                "heredoc",
                "program",
                "_expression",
                "_statement",
                "assignment",
                "call",
                "invocation",
            ]
        );
        assert_eq!(language.node_kind_count(), 15);
        assert_eq!(language.symbol_kind(8), Some(SymbolKind::External));
        assert_eq!(language.symbol_kind(14), Some(SymbolKind::Alias));
        assert_eq!(language.start_symbol(), 9);
        assert_eq!(language.extras(), &[7, 4]);
        assert_eq!(language.external_tokens(), &[8]);
    }

    #[test]
    fn test_visibility_and_lookup() {
        let language = Language::load(&assignments()).unwrap();

        assert_eq!(language.id_for_node_kind("=", false), Some(1));
        assert_eq!(language.id_for_node_kind("identifier", true), Some(5));
        assert_eq!(language.id_for_node_kind("identifier", false), None);
        assert_eq!(language.id_for_node_kind("_expression", true), None);
        assert!(!language.node_kind_is_visible(10));
        assert!(!language.node_kind_is_visible(7));
        assert!(language.node_kind_is_named(12));
        assert!(!language.node_kind_is_named(3));
        assert_eq!(language.id_for_node_kind("invocation", true), Some(14));
        assert_eq!(language.node_kind_for_id(99), None);
    }

    #[test]
    fn test_fields_start_at_one() {
        let language = Language::load(&assignments()).unwrap();

        assert_eq!(language.field_count(), 2);
        assert_eq!(language.field_id_for_name("left"), Some(1));
        assert_eq!(language.field_id_for_name("right"), Some(2));
        assert_eq!(language.field_name_for_id(0), None);
        assert_eq!(language.field_name_for_id(2), Some("right"));
        assert_eq!(language.field_id_for_name("body"), None);
    }

    #[test]
    fn test_lex_longest_match() {
        let language = Language::load(&assignments()).unwrap();

        assert_eq!(language.lex("foo = 1"), Some(TokenMatch { symbol: 5, len: 3 }));
        assert_eq!(language.lex("-12 "), Some(TokenMatch { symbol: 6, len: 3 }));
        assert_eq!(language.lex("= x"), Some(TokenMatch { symbol: 1, len: 1 }));
        assert_eq!(language.lex("# hi\nx"), Some(TokenMatch { symbol: 4, len: 4 }));
        assert_eq!(language.lex(""), None);
        assert_eq!(language.lex("%"), None);
    }

    #[test]
    fn test_alternation_takes_longest_branch() {
        let grammar = Grammar::builder("num")
            .rule("program", repeat(sym("number")))
            .rule("number", pattern(r"\d+|\d+\.\d+"))
            .build()
            .unwrap();
        let language = Language::load(&grammar).unwrap();

        let number = language.id_for_node_kind("number", true).unwrap();
        assert_eq!(language.lex("1.5"), Some(TokenMatch { symbol: number, len: 3 }));
        assert_eq!(language.lex("12."), Some(TokenMatch { symbol: number, len: 2 }));
        assert_eq!(language.lex("x1"), None);
    }

    #[test]
    fn test_literal_beats_pattern_on_tie() {
        let grammar = Grammar::builder("kw")
            .rule("program", seq([string("let"), sym("identifier")]))
            .rule("identifier", pattern("[a-z]+"))
            .build()
            .unwrap();
        let language = Language::load(&grammar).unwrap();

        let keyword = language.id_for_node_kind("let", false).unwrap();
        let identifier = language.id_for_node_kind("identifier", true).unwrap();
        assert_eq!(language.lex("let x").map(|m| m.symbol), Some(keyword));
        assert_eq!(language.lex("lets").map(|m| m.symbol), Some(identifier));
    }

    #[test]
    fn test_duplicate_literals_share_a_symbol() {
        let grammar = Grammar::builder("dup")
            .rule("program", seq([string(";"), sym("item"), string(";")]))
            .rule("item", seq([string(";"), immediate_token(string(";"))]))
            .build()
            .unwrap();
        let language = Language::load(&grammar).unwrap();

        // ";" and the immediate ";" are distinct terminals.
        assert_eq!(language.token_count(), 2);
        assert!(language.tokens()[1].immediate);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let grammar = Grammar::builder("bad")
            .rule("program", seq([sym("broken")]))
            .rule("broken", pattern("(unclosed"))
            .build()
            .unwrap();
        let err = Language::load(&grammar).unwrap_err();
        assert!(matches!(err, CompileError::InvalidPattern { ref rule, .. } if rule == "broken"));
    }

    #[test]
    fn test_symbol_inside_token_is_rejected() {
        let grammar = Grammar::builder("bad")
            .rule("program", seq([token(seq([string("a"), sym("b")]))]))
            .rule("b", string("b"))
            .build()
            .unwrap();
        let err = Language::load(&grammar).unwrap_err();
        assert!(matches!(
            err,
            CompileError::NonTokenSymbol { ref rule, ref symbol } if rule == "program" && symbol == "b"
        ));
    }

    #[test]
    fn test_validation_errors_propagate() {
        let grammar = Grammar::builder("bad")
            .rule("program", sym("nowhere"))
            .build()
            .unwrap();
        let err = Language::load(&grammar).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Validation(ValidationError::UndefinedSymbol { .. })
        ));
    }

    #[test]
    fn test_scanner_registration() {
        struct Never;
        impl ExternalScanner for Never {
            fn scan(&mut self, _: &mut dyn Lexer, _: &[bool]) -> bool {
                false
            }
            fn serialize(&self, _: &mut [u8]) -> usize {
                0
            }
            fn deserialize(&mut self, _: &[u8]) {}
        }

        let language = Language::load(&assignments()).unwrap();
        assert!(!language.has_external_scanner());
        assert!(language.create_scanner().is_none());

        let language = language.with_scanner(|| -> Box<dyn ExternalScanner> { Box::new(Never) });
        let mut scanner = language.create_scanner().unwrap();
        let mut lexer = StrLexer::new("<<EOF");
        assert!(!scanner.scan(&mut lexer, &[true]));
    }

    #[test]
    fn test_loaded_language_is_compatible() {
        let language = Language::load(&assignments()).unwrap();
        assert_eq!(language.abi_version(), LANGUAGE_VERSION);
        assert_eq!(language.check_compatible(), Ok(()));
    }

    #[test]
    fn test_unsupported_abi_version_is_rejected() {
        for version in [MIN_COMPATIBLE_LANGUAGE_VERSION - 1, LANGUAGE_VERSION + 1] {
            let options = CompileOptions {
                abi_version: version,
                ..CompileOptions::default()
            };
            let language = Language::load_with(&assignments(), &options).unwrap();
            assert_eq!(language.abi_version(), version);
            assert_eq!(language.check_compatible(), Err(IncompatibleVersion { version }));
        }

        let options = CompileOptions {
            abi_version: MIN_COMPATIBLE_LANGUAGE_VERSION,
            ..CompileOptions::default()
        };
        let language = Language::load_with(&assignments(), &options).unwrap();
        assert_eq!(language.check_compatible(), Ok(()));
    }

    #[test]
    fn test_language_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Language>();
    }
}
