//! Rule constructors mirroring the `grammar.js` DSL.
//!
//! These functions build [`Rule`] values in exactly the shape `tree-sitter
//! generate` writes into `grammar.json`, so a grammar written with them can be
//! dumped and fed to other Tree-sitter tooling unchanged.

use super::rules::{Rule, RuleType, RuleValue};

fn unary(rule_type: RuleType, content: Rule) -> Rule {
    Rule {
        content: Some(Box::new(content)),
        ..Rule::new(rule_type)
    }
}

fn compound(rule_type: RuleType, members: impl IntoIterator<Item = Rule>) -> Rule {
    Rule {
        members: members.into_iter().collect(),
        ..Rule::new(rule_type)
    }
}

fn precedence(rule_type: RuleType, value: i32, content: Rule) -> Rule {
    Rule {
        value: Some(RuleValue::Integer(value)),
        ..unary(rule_type, content)
    }
}

/// The empty production.
#[must_use]
pub const fn blank() -> Rule {
    Rule::new(RuleType::Blank)
}

/// A literal string token.
#[must_use]
pub fn string(value: impl Into<String>) -> Rule {
    Rule {
        value: Some(RuleValue::String(value.into())),
        ..Rule::new(RuleType::String)
    }
}

/// A regular-expression token.
#[must_use]
pub fn pattern(source: impl Into<String>) -> Rule {
    Rule {
        value: Some(RuleValue::String(source.into())),
        ..Rule::new(RuleType::Pattern)
    }
}

/// A regular-expression token with flags (e.g. `"i"`).
#[must_use]
pub fn pattern_with_flags(source: impl Into<String>, flags: impl Into<String>) -> Rule {
    Rule {
        flags: Some(flags.into()),
        ..pattern(source)
    }
}

/// A reference to the rule called `name` (`$.name` in JavaScript).
#[must_use]
pub fn sym(name: impl Into<String>) -> Rule {
    Rule {
        name: Some(name.into()),
        ..Rule::new(RuleType::Symbol)
    }
}

/// Matches each member in order.
#[must_use]
pub fn seq(members: impl IntoIterator<Item = Rule>) -> Rule {
    compound(RuleType::Seq, members)
}

/// Matches exactly one of the members.
#[must_use]
pub fn choice(members: impl IntoIterator<Item = Rule>) -> Rule {
    compound(RuleType::Choice, members)
}

/// Zero or more repetitions.
#[must_use]
pub fn repeat(content: Rule) -> Rule {
    unary(RuleType::Repeat, content)
}

/// One or more repetitions.
#[must_use]
pub fn repeat1(content: Rule) -> Rule {
    unary(RuleType::Repeat1, content)
}

/// Zero or one occurrence, encoded as `CHOICE[content, BLANK]`.
#[must_use]
pub fn optional(content: Rule) -> Rule {
    choice([content, blank()])
}

/// Numeric precedence.
#[must_use]
pub fn prec(value: i32, content: Rule) -> Rule {
    precedence(RuleType::Prec, value, content)
}

/// Left-associative precedence.
#[must_use]
pub fn prec_left(value: i32, content: Rule) -> Rule {
    precedence(RuleType::PrecLeft, value, content)
}

/// Right-associative precedence.
#[must_use]
pub fn prec_right(value: i32, content: Rule) -> Rule {
    precedence(RuleType::PrecRight, value, content)
}

/// Dynamic precedence, resolved at parse time.
#[must_use]
pub fn prec_dynamic(value: i32, content: Rule) -> Rule {
    precedence(RuleType::PrecDynamic, value, content)
}

/// Labels `content` with a field name.
#[must_use]
pub fn field(name: impl Into<String>, content: Rule) -> Rule {
    Rule {
        name: Some(name.into()),
        ..unary(RuleType::Field, content)
    }
}

/// Renames the node produced by `content`.
///
/// `named` follows the JavaScript DSL: aliasing to `$.foo` produces a named
/// node, aliasing to `'foo'` an anonymous one.
#[must_use]
pub fn alias(content: Rule, value: impl Into<String>, named: bool) -> Rule {
    Rule {
        value: Some(RuleValue::String(value.into())),
        named: Some(named),
        ..unary(RuleType::Alias, content)
    }
}

/// Collapses `content` into a single lexical token.
#[must_use]
pub fn token(content: Rule) -> Rule {
    unary(RuleType::Token, content)
}

/// A token that must follow the previous one without intervening extras.
#[must_use]
pub fn immediate_token(content: Rule) -> Rule {
    unary(RuleType::ImmediateToken, content)
}

/// One or more `item`s separated by `sep`.
#[must_use]
pub fn sep_by1(item: Rule, sep: Rule) -> Rule {
    seq([item.clone(), repeat(seq([sep, item]))])
}

/// Zero or more `item`s separated by `sep`.
#[must_use]
pub fn sep_by(item: Rule, sep: Rule) -> Rule {
    optional(sep_by1(item, sep))
}

/// A choice over symbol references, one per name.
#[must_use]
pub fn one_of<I, S>(names: I) -> Rule
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    choice(names.into_iter().map(sym))
}
