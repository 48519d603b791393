//! Selector algebra
//!
//! Selectors are immutable trees of compound selectors joined by combinators
//! or grouped into comma separated alternatives. The rendered text is
//! canonical and is the only identity a selector has: two selectors are equal
//! exactly when they render the same.

mod pseudo;

pub use pseudo::{NthExpr, PseudoClass, PseudoElement};

use crate::error::{CompilerError, Result};
use crate::utils::{escape_identifier, is_identifier, quote_string};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// `[name]`
    Exists,
    /// `[name="v"]`
    Equals,
    /// `[name~="v"]`, one of a whitespace separated list
    Includes,
    /// `[name|="v"]`, exactly `v` or starting with `v-`
    DashMatch,
    /// `[name^="v"]`
    Prefix,
    /// `[name$="v"]`
    Suffix,
    /// `[name*="v"]`
    Substring,
}

impl AttributeOperator {
    fn token(self) -> &'static str {
        match self {
            AttributeOperator::Exists => "",
            AttributeOperator::Equals => "=",
            AttributeOperator::Includes => "~=",
            AttributeOperator::DashMatch => "|=",
            AttributeOperator::Prefix => "^=",
            AttributeOperator::Suffix => "$=",
            AttributeOperator::Substring => "*=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatcher {
    name: String,
    operator: AttributeOperator,
    value: String,
    case_insensitive: bool,
}

impl AttributeMatcher {
    pub fn exists(name: impl Into<String>) -> Result<Self> {
        Self::new(name, AttributeOperator::Exists, "")
    }

    pub fn new(name: impl Into<String>, operator: AttributeOperator, value: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CompilerError::construction("Attribute selector needs a name"));
        }
        Ok(Self {
            name,
            operator,
            value: value.into(),
            case_insensitive: false,
        })
    }

    /// Match the value ASCII case-insensitively (`i` flag)
    pub fn ignore_case(self) -> Self {
        Self {
            case_insensitive: true,
            ..self
        }
    }
}

impl fmt::Display for AttributeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", escape_identifier(&self.name))?;
        if self.operator != AttributeOperator::Exists {
            write!(f, "{}{}", self.operator.token(), quote_string(&self.value))?;
            if self.case_insensitive {
                write!(f, " i")?;
            }
        }
        write!(f, "]")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimpleSelector {
    Universal,
    Type(String),
    Class(String),
    Id(String),
    Attribute(AttributeMatcher),
    PseudoClass(PseudoClass),
    PseudoElement(PseudoElement),
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleSelector::Universal => write!(f, "*"),
            SimpleSelector::Type(name) => write!(f, "{}", name),
            SimpleSelector::Class(name) => write!(f, ".{}", escape_identifier(name)),
            SimpleSelector::Id(name) => write!(f, "#{}", escape_identifier(name)),
            SimpleSelector::Attribute(matcher) => write!(f, "{}", matcher),
            SimpleSelector::PseudoClass(pseudo) => write!(f, "{}", pseudo),
            SimpleSelector::PseudoElement(pseudo) => write!(f, "{}", pseudo),
        }
    }
}

/// A sequence of simple selectors that all apply to the same element
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    parts: Vec<SimpleSelector>,
}

impl Compound {
    fn single(part: SimpleSelector) -> Self {
        Self { parts: vec![part] }
    }

    pub fn parts(&self) -> &[SimpleSelector] {
        &self.parts
    }

    fn has_pseudo_element(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, SimpleSelector::PseudoElement(_)))
    }

    fn with(&self, part: SimpleSelector) -> Result<Self> {
        let conflict = match &part {
            SimpleSelector::Type(_) | SimpleSelector::Universal => self
                .parts
                .iter()
                .any(|p| matches!(p, SimpleSelector::Type(_) | SimpleSelector::Universal)),
            SimpleSelector::PseudoElement(_) => self.has_pseudo_element(),
            _ => false,
        };
        if conflict {
            return Err(CompilerError::construction(format!(
                "Compound selector '{}' cannot take another '{}'",
                self, part
            )));
        }

        let mut parts = self.parts.clone();
        parts.push(part);
        Ok(Self { parts })
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element = self
            .parts
            .iter()
            .find(|p| matches!(p, SimpleSelector::Type(_) | SimpleSelector::Universal));
        let qualifiers: Vec<&SimpleSelector> = self
            .parts
            .iter()
            .filter(|p| !matches!(p, SimpleSelector::Type(_) | SimpleSelector::Universal | SimpleSelector::PseudoElement(_)))
            .collect();
        let pseudo_element = self.parts.iter().find(|p| matches!(p, SimpleSelector::PseudoElement(_)));

        match element {
            // `*` is implied when anything else qualifies the element
            Some(SimpleSelector::Universal) if !qualifiers.is_empty() || pseudo_element.is_some() => {}
            Some(element) => write!(f, "{}", element)?,
            None => {}
        }
        for qualifier in qualifiers {
            write!(f, "{}", qualifier)?;
        }
        if let Some(pseudo_element) = pseudo_element {
            write!(f, "{}", pseudo_element)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a>b`
    Child,
    /// `a+b`
    Adjacent,
    /// `a~b`
    Sibling,
}

impl Combinator {
    fn token(self) -> &'static str {
        match self {
            Combinator::Descendant => " ",
            Combinator::Child => ">",
            Combinator::Adjacent => "+",
            Combinator::Sibling => "~",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Selector {
    Compound(Compound),
    Complex {
        left: Box<Selector>,
        combinator: Combinator,
        right: Compound,
    },
    Group(Vec<Selector>),
}

impl Selector {
    pub fn universal() -> Self {
        Selector::Compound(Compound::single(SimpleSelector::Universal))
    }

    /// Element type selector such as `button`
    pub fn tag(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_identifier(&name)? {
            return Err(CompilerError::construction(format!("'{}' is not a valid element name", name)));
        }
        Ok(Selector::Compound(Compound::single(SimpleSelector::Type(name))))
    }

    pub fn class(name: impl Into<String>) -> Result<Self> {
        Ok(Selector::Compound(Compound::single(SimpleSelector::Class(non_empty("class", name.into())?))))
    }

    pub fn id(name: impl Into<String>) -> Result<Self> {
        Ok(Selector::Compound(Compound::single(SimpleSelector::Id(non_empty("id", name.into())?))))
    }

    pub fn attribute(matcher: AttributeMatcher) -> Self {
        Selector::Compound(Compound::single(SimpleSelector::Attribute(matcher)))
    }

    pub fn pseudo(pseudo: PseudoClass) -> Self {
        Selector::Compound(Compound::single(SimpleSelector::PseudoClass(pseudo)))
    }

    /// Alternatives rendered as `a,b`; nested groups are flattened
    pub fn group(members: Vec<Selector>) -> Self {
        let mut flattened = Vec::with_capacity(members.len());
        for member in members {
            match member {
                Selector::Group(inner) => flattened.extend(inner),
                other => flattened.push(other),
            }
        }
        Selector::Group(flattened)
    }

    pub fn or(self, other: Selector) -> Self {
        Selector::group(vec![self, other])
    }

    /// Add a simple selector to the rightmost compound of every alternative
    pub fn with(&self, part: SimpleSelector) -> Result<Self> {
        match self {
            Selector::Compound(compound) => Ok(Selector::Compound(compound.with(part)?)),
            Selector::Complex { left, combinator, right } => Ok(Selector::Complex {
                left: left.clone(),
                combinator: *combinator,
                right: right.with(part)?,
            }),
            Selector::Group(members) => {
                let members = members
                    .iter()
                    .map(|member| member.with(part.clone()))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Selector::Group(members))
            }
        }
    }

    pub fn with_class(&self, name: impl Into<String>) -> Result<Self> {
        self.with(SimpleSelector::Class(non_empty("class", name.into())?))
    }

    pub fn with_id(&self, name: impl Into<String>) -> Result<Self> {
        self.with(SimpleSelector::Id(non_empty("id", name.into())?))
    }

    pub fn with_attribute(&self, matcher: AttributeMatcher) -> Result<Self> {
        self.with(SimpleSelector::Attribute(matcher))
    }

    pub fn state(&self, pseudo: PseudoClass) -> Result<Self> {
        self.with(SimpleSelector::PseudoClass(pseudo))
    }

    pub fn pseudo_element(&self, pseudo: PseudoElement) -> Result<Self> {
        self.with(SimpleSelector::PseudoElement(pseudo))
    }

    pub fn descendant(&self, other: &Selector) -> Result<Self> {
        self.combine(Combinator::Descendant, other)
    }

    pub fn child(&self, other: &Selector) -> Result<Self> {
        self.combine(Combinator::Child, other)
    }

    pub fn adjacent(&self, other: &Selector) -> Result<Self> {
        self.combine(Combinator::Adjacent, other)
    }

    pub fn sibling(&self, other: &Selector) -> Result<Self> {
        self.combine(Combinator::Sibling, other)
    }

    /// Join two selectors; combining with a group distributes over its members
    pub fn combine(&self, combinator: Combinator, other: &Selector) -> Result<Self> {
        match (self, other) {
            (Selector::Group(members), _) => Ok(Selector::Group(
                members
                    .iter()
                    .map(|member| member.combine(combinator, other))
                    .collect::<Result<Vec<_>>>()?,
            )),
            (_, Selector::Group(members)) => Ok(Selector::Group(
                members
                    .iter()
                    .map(|member| self.combine(combinator, member))
                    .collect::<Result<Vec<_>>>()?,
            )),
            (_, Selector::Compound(compound)) => {
                if self.rightmost().is_some_and(Compound::has_pseudo_element) {
                    return Err(CompilerError::construction(format!(
                        "Cannot combine after pseudo-element in '{}'",
                        self
                    )));
                }
                Ok(Selector::Complex {
                    left: Box::new(self.clone()),
                    combinator,
                    right: compound.clone(),
                })
            }
            (_, Selector::Complex { left, combinator: inner, right }) => Ok(Selector::Complex {
                left: Box::new(self.combine(combinator, left)?),
                combinator: *inner,
                right: right.clone(),
            }),
        }
    }

    fn rightmost(&self) -> Option<&Compound> {
        match self {
            Selector::Compound(compound) => Some(compound),
            Selector::Complex { right, .. } => Some(right),
            Selector::Group(_) => None,
        }
    }

    /// The canonical text, failing if the tree contains an empty group
    pub fn canonical(&self) -> Result<String> {
        self.check()?;
        Ok(self.to_string())
    }

    fn check(&self) -> Result<()> {
        match self {
            Selector::Compound(compound) => check_compound(compound),
            Selector::Complex { left, right, .. } => {
                left.check()?;
                check_compound(right)
            }
            Selector::Group(members) if members.is_empty() => {
                Err(CompilerError::serialization("Selector group has no members"))
            }
            Selector::Group(members) => members.iter().try_for_each(Selector::check),
        }
    }
}

fn check_compound(compound: &Compound) -> Result<()> {
    for part in compound.parts() {
        if let SimpleSelector::PseudoClass(pseudo) = part {
            if let Some(argument) = pseudo.argument() {
                argument.check()?;
            }
        }
    }
    Ok(())
}

fn non_empty(kind: &str, name: String) -> Result<String> {
    if name.is_empty() {
        return Err(CompilerError::construction(format!("Selector {} name must not be empty", kind)));
    }
    Ok(name)
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Compound(compound) => write!(f, "{}", compound),
            Selector::Complex { left, combinator, right } => {
                write!(f, "{}{}{}", left, combinator.token(), right)
            }
            Selector::Group(members) => {
                for (index, member) in members.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
        }
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Selector {}

impl Hash for Selector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_selectors() {
        assert_eq!(Selector::class("button").unwrap().to_string(), ".button");
        assert_eq!(Selector::id("main").unwrap().to_string(), "#main");
        assert_eq!(Selector::tag("a").unwrap().to_string(), "a");
        assert_eq!(Selector::universal().to_string(), "*");
        assert!(Selector::class("").is_err());
        assert!(Selector::tag("2a").is_err());
    }

    #[test]
    fn test_escaping() {
        assert_eq!(Selector::class("w-1/2").unwrap().to_string(), ".w-1\\/2");
        assert_eq!(Selector::id("1st").unwrap().to_string(), "#\\31 st");
    }

    #[test]
    fn test_compound_ordering() {
        let selector = Selector::class("item")
            .unwrap()
            .pseudo_element(PseudoElement::Before)
            .unwrap()
            .state(PseudoClass::Hover)
            .unwrap()
            .with(SimpleSelector::Type("li".to_string()))
            .unwrap();
        assert_eq!(selector.to_string(), "li.item:hover::before");

        let starred = Selector::universal().with_class("x").unwrap();
        assert_eq!(starred.to_string(), ".x");
    }

    #[test]
    fn test_compound_conflicts() {
        let tag = Selector::tag("a").unwrap();
        assert!(tag.with(SimpleSelector::Type("b".to_string())).is_err());

        let before = Selector::class("x").unwrap().pseudo_element(PseudoElement::Before).unwrap();
        assert!(before.pseudo_element(PseudoElement::After).is_err());
        assert!(matches!(
            before.child(&Selector::class("y").unwrap()),
            Err(CompilerError::Construction { .. })
        ));
    }

    #[test]
    fn test_attribute_matchers() {
        let exists = Selector::attribute(AttributeMatcher::exists("disabled").unwrap());
        assert_eq!(exists.to_string(), "[disabled]");

        let prefix = AttributeMatcher::new("href", AttributeOperator::Prefix, "https").unwrap();
        assert_eq!(Selector::attribute(prefix).to_string(), "[href^=\"https\"]");

        let typed = AttributeMatcher::new("type", AttributeOperator::Equals, "Text").unwrap().ignore_case();
        assert_eq!(
            Selector::tag("input").unwrap().with_attribute(typed).unwrap().to_string(),
            "input[type=\"Text\" i]"
        );

        let quoted = AttributeMatcher::new("title", AttributeOperator::Substring, "say \"hi\"").unwrap();
        assert_eq!(Selector::attribute(quoted).to_string(), "[title*=\"say \\\"hi\\\"\"]");
    }

    #[test]
    fn test_combinators() {
        let nav = Selector::class("nav").unwrap();
        let link = Selector::tag("a").unwrap();

        assert_eq!(nav.descendant(&link).unwrap().to_string(), ".nav a");
        assert_eq!(nav.child(&link).unwrap().to_string(), ".nav>a");
        assert_eq!(nav.adjacent(&link).unwrap().to_string(), ".nav+a");
        assert_eq!(nav.sibling(&link).unwrap().to_string(), ".nav~a");

        let chain = Selector::tag("ul").unwrap().child(&Selector::tag("li").unwrap()).unwrap();
        assert_eq!(nav.descendant(&chain).unwrap().to_string(), ".nav ul>li");
    }

    #[test]
    fn test_groups_distribute() {
        let group = Selector::class("a").unwrap().or(Selector::class("b").unwrap());
        let scoped = Selector::id("app").unwrap().descendant(&group).unwrap();
        assert_eq!(scoped.to_string(), "#app .a,#app .b");

        let hovered = group.state(PseudoClass::Hover).unwrap();
        assert_eq!(hovered.to_string(), ".a:hover,.b:hover");

        let nested = Selector::group(vec![group, Selector::class("c").unwrap()]);
        assert_eq!(nested.to_string(), ".a,.b,.c");
    }

    #[test]
    fn test_functional_pseudo_classes() {
        let row = Selector::tag("tr").unwrap().state(PseudoClass::NthChild(NthExpr::even())).unwrap();
        assert_eq!(row.to_string(), "tr:nth-child(2n)");

        let excluded = Selector::class("btn")
            .unwrap()
            .state(PseudoClass::not(Selector::class("primary").unwrap().or(Selector::class("link").unwrap())))
            .unwrap();
        assert_eq!(excluded.to_string(), ".btn:not(.primary,.link)");
    }

    #[test]
    fn test_equality_by_canonical_text() {
        let first = Selector::class("a").unwrap().with_class("b").unwrap();
        let second = Selector::class("a").unwrap().with(SimpleSelector::Class("b".to_string())).unwrap();
        assert_eq!(first, second);
        assert_ne!(first, Selector::class("b").unwrap().with_class("a").unwrap());
    }

    #[test]
    fn test_empty_group_fails_canonicalization() {
        let empty = Selector::group(vec![]);
        assert!(matches!(empty.canonical(), Err(CompilerError::Serialization { .. })));

        let inside = Selector::class("x").unwrap().state(PseudoClass::is(Selector::group(vec![]))).unwrap();
        assert!(inside.canonical().is_err());
        assert_eq!(Selector::class("x").unwrap().canonical().unwrap(), ".x");
    }
}
