//! Validation routines for Tree-sitter grammars.
//!
//! This module performs structural checks over parsed [`Grammar`](crate::grammar::Grammar)
//! definitions, such as verifying symbol references, ensuring all rules are reachable,
//! detecting left recursion, and confirming precedence consistency. It runs as
//! the first step of [`Language::load`](crate::Language::load).

use crate::grammar::{Grammar, Rule, RuleType};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Represents a validation failure encountered when checking a grammar.
///
/// Validation errors indicate issues such as undefined symbols, unreachable
/// rules, or malformed rule nodes that violate Tree-sitter's grammar constraints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The grammar defines no rules at all.
    #[error("grammar has no rules")]
    NoRules,

    /// A `SYMBOL` names neither a rule nor an external token.
    #[error("undefined symbol '{symbol}' referenced in rule '{rule}'")]
    UndefinedSymbol {
        /// The missing name.
        symbol: String,
        /// The rule containing the reference.
        rule: String,
    },

    /// A rule node lacks a field its type requires.
    #[error("malformed {kind} in rule '{rule}': {reason}")]
    MalformedRule {
        /// The rule containing the node.
        rule: String,
        /// The node's rule type.
        kind: &'static str,
        /// What is missing.
        reason: &'static str,
    },

    /// The `word` property names an unknown rule.
    #[error("word token '{0}' is not a rule")]
    UndefinedWord(String),

    /// A supertype names an unknown rule.
    #[error("supertype '{0}' is not a rule")]
    UndefinedSupertype(String),

    /// Every rule is referenced by another, so none can be the start rule.
    #[error("no start rule: every rule is referenced by another rule")]
    NoStartRule,

    /// Several rules are unreferenced and could be the start rule.
    #[error("ambiguous start rule, candidates: {}", .0.join(", "))]
    AmbiguousStartRule(Vec<String>),

    /// A rule cannot be reached from the start rule (strict mode only).
    #[error("rule '{0}' is unreachable from the start rule")]
    UnreachableRule(String),
}

/// Knobs for [`validate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Treat unreachable rules as errors instead of warnings.
    pub strict: bool,
}

/// Performs semantic validation of a parsed [`Grammar`](crate::grammar::Grammar).
///
/// This function runs several consistency passes over the grammar:
///
/// - Checks that every rule node is well formed.
/// - Checks that all referenced symbols are defined.
/// - Checks `word` and `supertypes`.
/// - Determines the start rule and warns about unreachable rules.
/// - Logs immediate left recursion and mixed precedence levels.
///
/// # Errors
///
/// Returns a [`ValidationError`] if any structural rule violation is detected.
pub fn validate(grammar: &Grammar, options: &ValidateOptions) -> Result<(), ValidationError> {
    if grammar.rules.is_empty() {
        return Err(ValidationError::NoRules);
    }

    check_well_formed(grammar)?;
    check_undefined_symbols(grammar)?;
    check_properties(grammar)?;
    check_unreachable_rules(grammar, options)?;
    check_left_recursion(grammar);
    check_precedence(grammar);

    Ok(())
}

fn check_well_formed(grammar: &Grammar) -> Result<(), ValidationError> {
    let extras = grammar.extras.iter().flatten().map(|r| ("extras", r));
    let externals = grammar.externals.iter().flatten().map(|r| ("externals", r));
    let rules = grammar.rules.iter().map(|(n, r)| (n.as_str(), r));

    for (context, rule) in rules.chain(extras).chain(externals) {
        let mut failure = None;
        rule.walk(&mut |node| {
            if failure.is_none() {
                failure = malformation(node).map(|reason| (node.rule_type.as_str(), reason));
            }
        });
        if let Some((kind, reason)) = failure {
            return Err(ValidationError::MalformedRule {
                rule: context.to_string(),
                kind,
                reason,
            });
        }
    }
    Ok(())
}

fn malformation(rule: &Rule) -> Option<&'static str> {
    match rule.rule_type {
        RuleType::String | RuleType::Pattern if rule.text_value().is_none() => {
            Some("missing string value")
        }
        RuleType::Symbol if rule.name.is_none() => Some("missing symbol name"),
        RuleType::Field if rule.name.is_none() => Some("missing field name"),
        RuleType::Alias if rule.text_value().is_none() => Some("missing alias value"),
        RuleType::Seq | RuleType::Choice if rule.members.is_empty() => Some("no members"),
        t if t.is_unary() && rule.content.is_none() => Some("missing content"),
        _ => None,
    }
}

fn check_undefined_symbols(grammar: &Grammar) -> Result<(), ValidationError> {
    let defined: HashSet<&str> = grammar
        .rules
        .keys()
        .map(String::as_str)
        .chain(grammar.external_names())
        .collect();

    let extras = grammar.extras.iter().flatten().map(|r| ("extras", r));
    let rules = grammar.rules.iter().map(|(n, r)| (n.as_str(), r));

    for (context, rule) in rules.chain(extras) {
        check_rule_symbols(rule, &defined, context)?;
    }

    Ok(())
}

fn check_rule_symbols(
    rule: &Rule,
    defined: &HashSet<&str>,
    context: &str,
) -> Result<(), ValidationError> {
    if let Some(name) = rule.symbol_name() {
        if !defined.contains(name) {
            return Err(ValidationError::UndefinedSymbol {
                symbol: name.to_string(),
                rule: context.to_string(),
            });
        }
    }
    rule.children()
        .try_for_each(|child| check_rule_symbols(child, defined, context))
}

fn check_properties(grammar: &Grammar) -> Result<(), ValidationError> {
    if let Some(word) = &grammar.word {
        if !grammar.rules.contains_key(word) {
            return Err(ValidationError::UndefinedWord(word.clone()));
        }
    }
    for supertype in grammar.supertypes.iter().flatten() {
        if !grammar.rules.contains_key(supertype) {
            return Err(ValidationError::UndefinedSupertype(supertype.clone()));
        }
    }
    Ok(())
}

/// Resolves the start rule, reporting why it cannot be found.
pub(crate) fn start_rule(grammar: &Grammar) -> Result<&str, ValidationError> {
    match grammar.root_candidates().as_slice() {
        [] => Err(ValidationError::NoStartRule),
        [only] => Ok(*only),
        many => Err(ValidationError::AmbiguousStartRule(
            many.iter().map(ToString::to_string).collect(),
        )),
    }
}

fn check_unreachable_rules(
    grammar: &Grammar,
    options: &ValidateOptions,
) -> Result<(), ValidationError> {
    let entry_point = start_rule(grammar)?;

    let mut to_visit = vec![entry_point];
    for extra in grammar.extras.iter().flatten() {
        collect_referenced_symbols(extra, &mut to_visit);
    }
    to_visit.extend(grammar.external_names());

    let mut reachable = HashSet::new();
    while let Some(rule_name) = to_visit.pop() {
        if !reachable.insert(rule_name) {
            continue; // Already visited
        }

        if let Some(rule) = grammar.rules.get(rule_name) {
            collect_referenced_symbols(rule, &mut to_visit);
        }
    }

    let mut unreachable: Vec<&str> = grammar
        .rules
        .keys()
        .map(String::as_str)
        .filter(|name| !reachable.contains(name))
        .collect();
    unreachable.sort_unstable();

    for rule_name in unreachable {
        let inline_contains = grammar
            .inline
            .as_ref()
            .is_some_and(|v| v.iter().any(|n| n == rule_name));
        if inline_contains {
            continue;
        }
        if options.strict {
            return Err(ValidationError::UnreachableRule(rule_name.to_string()));
        }
        warn!(rule = rule_name, "unreachable rule");
    }

    Ok(())
}

fn collect_referenced_symbols<'a>(rule: &'a Rule, symbols: &mut Vec<&'a str>) {
    rule.walk(&mut |node| {
        if let Some(name) = node.symbol_name() {
            symbols.push(name);
        }
    });
}

fn check_left_recursion(grammar: &Grammar) {
    for (rule_name, rule) in &grammar.rules {
        if has_immediate_left_recursion(rule, rule_name) {
            debug!(rule = %rule_name, "rule is immediately left-recursive");
        }
    }
}

fn has_immediate_left_recursion(rule: &Rule, target: &str) -> bool {
    match rule.rule_type {
        RuleType::Symbol => rule.symbol_name() == Some(target),

        RuleType::Seq => rule
            .members
            .first()
            .is_some_and(|first| has_immediate_left_recursion(first, target)),

        RuleType::Choice => rule
            .members
            .iter()
            .any(|member| has_immediate_left_recursion(member, target)),

        RuleType::Prec
        | RuleType::PrecLeft
        | RuleType::PrecRight
        | RuleType::PrecDynamic
        | RuleType::Field
        | RuleType::Alias => rule
            .content
            .as_deref()
            .is_some_and(|content| has_immediate_left_recursion(content, target)),

        _ => false,
    }
}

fn check_precedence(grammar: &Grammar) {
    let mut prec_levels: HashMap<&str, Vec<i32>> = HashMap::new();

    for (rule_name, rule) in &grammar.rules {
        rule.walk(&mut |node| {
            if let Some(p) = node.precedence() {
                prec_levels.entry(rule_name.as_str()).or_default().push(p);
            }
        });
    }

    for (rule, mut levels) in prec_levels {
        levels.sort_unstable();
        levels.dedup();
        if levels.len() > 1 {
            warn!(rule, ?levels, "rule mixes several precedence levels");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::dsl::{choice, pattern, repeat, seq, string, sym};
    use crate::grammar::Rule;

    fn grammar(rules: Vec<(&str, Rule)>) -> Grammar {
        Grammar::builder("test").rules(rules).build().unwrap()
    }

    #[test]
    fn test_accepts_consistent_grammar() {
        let g = grammar(vec![
            ("program", repeat(sym("item"))),
            ("item", choice([sym("number"), string(";")])),
            ("number", pattern(r"\d+")),
        ]);
        assert_eq!(validate(&g, &ValidateOptions::default()), Ok(()));
        assert_eq!(validate(&g, &ValidateOptions { strict: true }), Ok(()));
    }

    #[test]
    fn test_reports_undefined_symbol() {
        let g = grammar(vec![("program", seq([sym("missing"), string(";")]))]);
        assert_eq!(
            validate(&g, &ValidateOptions::default()),
            Err(ValidationError::UndefinedSymbol {
                symbol: "missing".into(),
                rule: "program".into(),
            })
        );
    }

    #[test]
    fn test_externals_count_as_defined() {
        let g = Grammar::builder("test")
            .rule("program", seq([sym("_indent"), sym("body")]))
            .rule("body", string("x"))
            .externals([sym("_indent")])
            .build()
            .unwrap();
        assert_eq!(validate(&g, &ValidateOptions::default()), Ok(()));
    }

    #[test]
    fn test_reports_malformed_nodes() {
        let g = grammar(vec![("program", seq(Vec::new()))]);
        assert!(matches!(
            validate(&g, &ValidateOptions::default()),
            Err(ValidationError::MalformedRule { kind: "SEQ", .. })
        ));
    }

    #[test]
    fn test_start_rule_problems() {
        let cyclic = grammar(vec![("a", sym("b")), ("b", sym("a"))]);
        assert_eq!(
            validate(&cyclic, &ValidateOptions::default()),
            Err(ValidationError::NoStartRule)
        );

        let two_roots = grammar(vec![("a", string("a")), ("b", string("b"))]);
        assert_eq!(
            validate(&two_roots, &ValidateOptions::default()),
            Err(ValidationError::AmbiguousStartRule(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_strict_mode_rejects_unreachable_cycle() {
        let g = grammar(vec![
            ("program", string("x")),
            ("left", sym("right")),
            ("right", seq([string("("), sym("left"), string(")")])),
        ]);
        assert_eq!(validate(&g, &ValidateOptions::default()), Ok(()));
        assert_eq!(
            validate(&g, &ValidateOptions { strict: true }),
            Err(ValidationError::UnreachableRule("left".into()))
        );
    }

    #[test]
    fn test_word_must_be_a_rule() {
        let g = Grammar::builder("test")
            .rule("program", string("x"))
            .word("identifier")
            .build()
            .unwrap();
        assert_eq!(
            validate(&g, &ValidateOptions::default()),
            Err(ValidationError::UndefinedWord("identifier".into()))
        );
    }

    #[test]
    fn test_detects_left_recursion() {
        let rule = choice([seq([sym("expr"), string("+"), sym("expr")]), sym("num")]);
        assert!(has_immediate_left_recursion(&rule, "expr"));
        assert!(!has_immediate_left_recursion(&rule, "num_lit"));
    }
}
