//! The rule tree of a grammar.
//!
//! Field names and `type` tags follow `grammar.json`, so a [`Rule`] reads and
//! writes the same objects `tree-sitter generate` does.

use facet::Facet;

/// One node of a rule tree.
///
/// Which optional fields are set depends on [`RuleType`]: terminals carry a
/// `value`, references and fields a `name`, wrappers a `content` and
/// `SEQ`/`CHOICE` their `members`. Unset fields are left out of the JSON.
/// Rules are usually built with [`dsl`](crate::grammar::dsl).
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct Rule {
    /// What kind of rule this is.
    #[facet(rename = "type")]
    pub rule_type: RuleType,

    /// Literal text, regex source, alias name or precedence.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub value: Option<RuleValue>,

    /// Symbol or field name.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub name: Option<String>,

    /// The wrapped rule of a unary construct.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub content: Option<Box<Rule>>,

    /// Operands of `SEQ` and `CHOICE`.
    #[facet(default)]
    #[facet(skip_serializing_if = Vec::is_empty)]
    pub members: Vec<Rule>,

    /// Whether an alias produces a named node.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub named: Option<bool>,

    /// Regex flags of a `PATTERN`; only `i` is honoured.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub flags: Option<String>,

    /// Reserved-word set of a `RESERVED` wrapper.
    #[facet(default)]
    #[facet(skip_serializing_if = Option::is_none)]
    pub context_name: Option<String>,
}

/// The scalar in a rule's `value`.
///
/// `grammar.json` writes it as a bare string or integer. facet models enums
/// with an outer tag, so [`parse_grammar`](crate::grammar::parse_grammar) and
/// [`Grammar::to_json`](crate::grammar::Grammar::to_json) translate between
/// the two spellings.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum RuleValue {
    /// Text: a literal, a regex, an alias name or a named precedence.
    String(String),

    /// A numeric precedence.
    Integer(i32),
}

/// The `type` tag of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum RuleType {
    /// Matches nothing.
    #[facet(rename = "BLANK")]
    Blank,
    /// Literal text.
    #[facet(rename = "STRING")]
    String,
    /// A regex.
    #[facet(rename = "PATTERN")]
    Pattern,
    /// A reference to a rule or external token.
    #[facet(rename = "SYMBOL")]
    Symbol,
    /// Alternatives.
    #[facet(rename = "CHOICE")]
    Choice,
    /// A sequence.
    #[facet(rename = "SEQ")]
    Seq,
    /// Zero or more.
    #[facet(rename = "REPEAT")]
    Repeat,
    /// One or more.
    #[facet(rename = "REPEAT1")]
    Repeat1,
    /// Precedence without associativity.
    #[facet(rename = "PREC")]
    Prec,
    /// Left-associative precedence.
    #[facet(rename = "PREC_LEFT")]
    PrecLeft,
    /// Right-associative precedence.
    #[facet(rename = "PREC_RIGHT")]
    PrecRight,
    /// Precedence applied when resolving ambiguities at parse time.
    #[facet(rename = "PREC_DYNAMIC")]
    PrecDynamic,
    /// Labels its content with a field name.
    #[facet(rename = "FIELD")]
    Field,
    /// Renames the node its content produces.
    #[facet(rename = "ALIAS")]
    Alias,
    /// Lexes its content as one token.
    #[facet(rename = "TOKEN")]
    Token,
    /// A token that no extras may precede.
    #[facet(rename = "IMMEDIATE_TOKEN")]
    ImmediateToken,
    /// Selects a reserved-word set for its content.
    #[facet(rename = "RESERVED")]
    Reserved,
}

impl RuleType {
    /// The tag as written in `grammar.json`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "BLANK",
            Self::String => "STRING",
            Self::Pattern => "PATTERN",
            Self::Symbol => "SYMBOL",
            Self::Choice => "CHOICE",
            Self::Seq => "SEQ",
            Self::Repeat => "REPEAT",
            Self::Repeat1 => "REPEAT1",
            Self::Prec => "PREC",
            Self::PrecLeft => "PREC_LEFT",
            Self::PrecRight => "PREC_RIGHT",
            Self::PrecDynamic => "PREC_DYNAMIC",
            Self::Field => "FIELD",
            Self::Alias => "ALIAS",
            Self::Token => "TOKEN",
            Self::ImmediateToken => "IMMEDIATE_TOKEN",
            Self::Reserved => "RESERVED",
        }
    }

    /// Returns `true` for the wrappers that carry a single `content` rule.
    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(
            self,
            Self::Repeat
                | Self::Repeat1
                | Self::Prec
                | Self::PrecLeft
                | Self::PrecRight
                | Self::PrecDynamic
                | Self::Field
                | Self::Alias
                | Self::Token
                | Self::ImmediateToken
                | Self::Reserved
        )
    }

    /// Returns `true` for `SEQ` and `CHOICE`.
    #[must_use]
    pub const fn is_compound(self) -> bool {
        matches!(self, Self::Seq | Self::Choice)
    }

    /// Returns `true` for the four precedence wrappers.
    #[must_use]
    pub const fn is_precedence(self) -> bool {
        matches!(
            self,
            Self::Prec | Self::PrecLeft | Self::PrecRight | Self::PrecDynamic
        )
    }
}

impl Rule {
    /// Creates a rule of the given type with every optional field empty.
    #[must_use]
    pub const fn new(rule_type: RuleType) -> Self {
        Self {
            rule_type,
            value: None,
            name: None,
            content: None,
            members: Vec::new(),
            named: None,
            flags: None,
            context_name: None,
        }
    }

    /// Returns `true` if this rule represents a terminal (lexical) token.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.rule_type, RuleType::String | RuleType::Pattern)
    }

    /// Returns `true` if this rule is a symbol reference.
    #[must_use]
    pub const fn is_symbol(&self) -> bool {
        matches!(self.rule_type, RuleType::Symbol)
    }

    /// Returns the referenced symbol name, if applicable.
    #[must_use]
    pub fn symbol_name(&self) -> Option<&str> {
        if self.is_symbol() {
            self.name.as_deref()
        } else {
            None
        }
    }

    /// Returns the numeric precedence value if this rule is a precedence wrapper.
    ///
    /// Named precedences (string values) yield `None`.
    #[must_use]
    pub fn precedence(&self) -> Option<i32> {
        if !self.rule_type.is_precedence() {
            return None;
        }
        match self.value.as_ref()? {
            RuleValue::Integer(i) => Some(*i),
            RuleValue::String(_) => None,
        }
    }

    /// Returns the literal string value if this is a `STRING` rule.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        if matches!(self.rule_type, RuleType::String) {
            self.text_value()
        } else {
            None
        }
    }

    /// Returns the pattern source if this is a `PATTERN` rule.
    #[must_use]
    pub fn pattern_value(&self) -> Option<&str> {
        if matches!(self.rule_type, RuleType::Pattern) {
            self.text_value()
        } else {
            None
        }
    }

    /// Returns the string payload of `value`, regardless of rule type.
    #[must_use]
    pub fn text_value(&self) -> Option<&str> {
        match self.value.as_ref()? {
            RuleValue::String(s) => Some(s.as_str()),
            RuleValue::Integer(_) => None,
        }
    }

    /// Iterates over the direct sub-rules: `content` for wrappers, `members`
    /// for `SEQ` and `CHOICE`.
    pub fn children(&self) -> impl Iterator<Item = &Self> {
        self.content.as_deref().into_iter().chain(self.members.iter())
    }

    /// Calls `f` on this rule and every rule nested inside it, depth first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Self)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::dsl::{choice, pattern, prec_left, seq, string, sym};

    #[test]
    fn test_precedence_accessor() {
        let rule = prec_left(1, seq([sym("expr"), string("+"), sym("expr")]));
        assert_eq!(rule.precedence(), Some(1));
        assert_eq!(rule.rule_type.as_str(), "PREC_LEFT");
        assert_eq!(seq([sym("expr")]).precedence(), None);
    }

    #[test]
    fn test_value_accessors_respect_rule_type() {
        let lit = string("hello");
        let pat = pattern("[0-9]+");
        assert_eq!(lit.string_value(), Some("hello"));
        assert_eq!(lit.pattern_value(), None);
        assert_eq!(pat.pattern_value(), Some("[0-9]+"));
        assert!(lit.is_terminal() && pat.is_terminal());
        assert_eq!(sym("expression").symbol_name(), Some("expression"));
    }

    #[test]
    fn test_walk_visits_nested_rules() {
        let rule = choice([string("a"), seq([sym("b"), sym("c")])]);
        let mut symbols = Vec::new();
        rule.walk(&mut |r| {
            if let Some(name) = r.symbol_name() {
                symbols.push(name);
            }
        });
        assert_eq!(symbols, ["b", "c"]);
    }
}
