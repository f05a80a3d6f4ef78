//! Core structures and parsing logic for Tree-sitter grammars.
//!
//! This module defines the internal representation of a grammar as parsed from
//! Tree-sitter's JSON format. It uses [`facet_json`] for (de)serialization and
//! provides ergonomic accessors for inspecting rule properties and structure.

use facet::Facet;
use std::collections::{BTreeSet, HashMap};

use crate::validate::ValidationError;

/// Rule constructors mirroring the JavaScript grammar DSL.
pub mod dsl;
mod json;
/// The [`Rule`] node type and its accessors.
pub mod rules;

pub use rules::{Rule, RuleType, RuleValue};

/// Represents a full Tree-sitter grammar definition.
///
/// This structure directly mirrors the serialized JSON format produced by
/// `tree-sitter generate`. It captures the complete rule set along with
/// auxiliary metadata such as precedences, conflicts, and supertypes.
///
/// See <https://tree-sitter.github.io/tree-sitter/assets/schemas/grammar.schema.json>
#[derive(Debug, Clone, PartialEq, Facet)]
pub struct Grammar {
    /// Optional `$schema` field from the JSON, typically used for schema
    /// validation or editor integration.
    #[facet(rename = "$schema")]
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub schema: Option<String>,

    /// The short name of the grammar (e.g. `"lean"` or `"rust"`).
    pub name: String,

    /// Optional name of a base grammar that this one inherits from.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub inherits: Option<String>,

    /// Map of all rule identifiers to their corresponding definitions.
    pub rules: HashMap<String, Rule>,

    /// “Extras” that may appear between other tokens, such as whitespace or comments.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub extras: Option<Vec<Rule>>,

    /// Rules implemented externally via a scanner.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub externals: Option<Vec<Rule>>,

    /// Names of rules that should be inlined into other rules.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub inline: Option<Vec<String>>,

    /// Precedence orderings, highest first. Entries are `STRING` rules
    /// naming a precedence or `SYMBOL` rules naming a rule.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub precedences: Option<Vec<Vec<Rule>>>,

    /// Explicit conflict groups expected during parsing.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub conflicts: Option<Vec<Vec<String>>>,

    /// Context-specific reserved word definitions.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub reserved: Option<HashMap<String, Vec<Rule>>>,

    /// The special rule name used to identify word tokens (keywords, identifiers, etc.).
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub word: Option<String>,

    /// A list of node supertypes, grouping related syntactic forms.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub supertypes: Option<Vec<String>>,
}

/// Parse a JSON grammar definition into a strongly typed [`Grammar`] structure.
///
/// # Errors
///
/// Returns [`GrammarError::JsonParse`] if the provided string is not valid JSON
/// or fails schema deserialization.
pub fn parse_grammar(json: &str) -> Result<Grammar, GrammarError> {
    let tagged = json::tag_values(json);
    facet_json::from_str(&tagged).map_err(|e| GrammarError::JsonParse(e.to_string()))
}

/// Possible errors raised during grammar parsing, assembly or validation.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// The input JSON was syntactically invalid or structurally mismatched.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The same rule name was defined twice while building a grammar.
    #[error("rule '{0}' is defined more than once")]
    DuplicateRule(String),

    /// Higher-level structural or semantic validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl Grammar {
    /// Starts building a grammar called `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> GrammarBuilder {
        GrammarBuilder::new(name)
    }

    /// Serializes the grammar into Tree-sitter's JSON format.
    #[must_use]
    pub fn to_json(&self) -> String {
        json::untag_values(&facet_json::to_string(self))
    }

    /// Names of the external tokens, in declaration order.
    ///
    /// Externals are usually `SYMBOL` references; anonymous `STRING`
    /// externals contribute their literal text.
    pub fn external_names(&self) -> impl Iterator<Item = &str> {
        self.externals
            .iter()
            .flatten()
            .filter_map(|rule| rule.symbol_name().or_else(|| rule.string_value()))
    }

    /// Returns `true` if `name` is a rule or an external token.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.rules.contains_key(name) || self.external_names().any(|e| e == name)
    }

    /// Every name that something in the grammar refers to: symbols inside
    /// rules, extras and externals, plus `inline`, `supertypes` and `word`.
    #[must_use]
    pub fn referenced_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        let rules = self.rules.values();
        let extras = self.extras.iter().flatten();
        let externals = self.externals.iter().flatten();
        for rule in rules.chain(extras).chain(externals) {
            collect_symbols(rule, &mut names);
        }

        names.extend(self.inline.iter().flatten().map(String::as_str));
        names.extend(self.supertypes.iter().flatten().map(String::as_str));
        names.extend(self.word.as_deref());
        names
    }

    /// Rules nothing else refers to, sorted by name.
    #[must_use]
    pub fn root_candidates(&self) -> Vec<&str> {
        let referenced = self.referenced_names();
        let mut roots: Vec<&str> = self
            .rules
            .keys()
            .map(String::as_str)
            .filter(|name| !referenced.contains(name))
            .collect();
        roots.sort_unstable();
        roots
    }

    /// The rule parsing starts from.
    ///
    /// Tree-sitter uses the first rule of `grammar.js`; that ordering does not
    /// survive a map, so the start rule is the unique rule no other part of
    /// the grammar refers to. Returns `None` when there is no such rule or
    /// more than one.
    #[must_use]
    pub fn start_rule(&self) -> Option<&str> {
        match self.root_candidates().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

fn collect_symbols<'a>(rule: &'a Rule, names: &mut BTreeSet<&'a str>) {
    rule.walk(&mut |r| {
        if let Some(name) = r.symbol_name() {
            names.insert(name);
        }
    });
}

/// Incrementally assembles a [`Grammar`], rejecting duplicate rule names.
#[derive(Debug)]
pub struct GrammarBuilder {
    grammar: Grammar,
    duplicates: Vec<String>,
}

impl GrammarBuilder {
    /// Creates an empty builder for a grammar called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            grammar: Grammar {
                schema: None,
                name: name.into(),
                inherits: None,
                rules: HashMap::new(),
                extras: None,
                externals: None,
                inline: None,
                precedences: None,
                conflicts: None,
                reserved: None,
                word: None,
                supertypes: None,
            },
            duplicates: Vec::new(),
        }
    }

    /// Adds one rule.
    #[must_use]
    pub fn rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        let name = name.into();
        if self.grammar.rules.contains_key(&name) {
            self.duplicates.push(name);
        } else {
            self.grammar.rules.insert(name, rule);
        }
        self
    }

    /// Adds every `(name, rule)` pair.
    #[must_use]
    pub fn rules<I, S>(self, rules: I) -> Self
    where
        I: IntoIterator<Item = (S, Rule)>,
        S: Into<String>,
    {
        rules
            .into_iter()
            .fold(self, |builder, (name, rule)| builder.rule(name, rule))
    }

    /// Sets the tokens allowed anywhere between other tokens.
    #[must_use]
    pub fn extras(mut self, extras: impl IntoIterator<Item = Rule>) -> Self {
        self.grammar.extras = Some(extras.into_iter().collect());
        self
    }

    /// Sets the tokens produced by the external scanner, in scanner order.
    #[must_use]
    pub fn externals(mut self, externals: impl IntoIterator<Item = Rule>) -> Self {
        self.grammar.externals = Some(externals.into_iter().collect());
        self
    }

    /// Sets the rules to inline at their use sites.
    #[must_use]
    pub fn inline<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.grammar.inline = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the supertype rules.
    #[must_use]
    pub fn supertypes<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.grammar.supertypes = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the keyword-extraction word rule.
    #[must_use]
    pub fn word(mut self, name: impl Into<String>) -> Self {
        self.grammar.word = Some(name.into());
        self
    }

    /// Adds an expected conflict group.
    #[must_use]
    pub fn conflict<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.grammar
            .conflicts
            .get_or_insert_with(Vec::new)
            .push(names.into_iter().map(Into::into).collect());
        self
    }

    /// Finishes the grammar.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::DuplicateRule`] naming the first rule that was
    /// defined twice.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        match self.duplicates.into_iter().next() {
            Some(name) => Err(GrammarError::DuplicateRule(name)),
            None => Ok(self.grammar),
        }
    }
}
