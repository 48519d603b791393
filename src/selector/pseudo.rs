//! Pseudo-classes, pseudo-elements and `An+B` expressions

use super::Selector;
use crate::error::{CompilerError, Result};
use crate::utils::is_identifier;
use std::fmt;

/// The `An+B` argument of the `:nth-*` family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpr {
    pub a: i32,
    pub b: i32,
}

impl NthExpr {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Exactly the `b`th element
    pub fn index(b: i32) -> Self {
        Self { a: 0, b }
    }

    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }
}

impl fmt::Display for NthExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.a, self.b) {
            (0, b) => write!(f, "{}", b),
            (a, b) => {
                match a {
                    1 => write!(f, "n")?,
                    -1 => write!(f, "-n")?,
                    a => write!(f, "{}n", a)?,
                }
                match b {
                    0 => Ok(()),
                    b if b > 0 => write!(f, "+{}", b),
                    b => write!(f, "{}", b),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    Hover,
    Active,
    Focus,
    FocusVisible,
    FocusWithin,
    Visited,
    Link,
    Target,
    Checked,
    Disabled,
    Enabled,
    Required,
    Optional,
    ReadOnly,
    PlaceholderShown,
    Empty,
    Root,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpr),
    NthLastChild(NthExpr),
    NthOfType(NthExpr),
    NthLastOfType(NthExpr),
    Not(Box<Selector>),
    Is(Box<Selector>),
    Lang(String),
}

impl PseudoClass {
    pub fn not(selector: Selector) -> Self {
        PseudoClass::Not(Box::new(selector))
    }

    pub fn is(selector: Selector) -> Self {
        PseudoClass::Is(Box::new(selector))
    }

    pub fn lang(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        if !is_identifier(&code)? {
            return Err(CompilerError::construction(format!("'{}' is not a valid language code", code)));
        }
        Ok(PseudoClass::Lang(code))
    }

    fn keyword(&self) -> &'static str {
        match self {
            PseudoClass::Hover => "hover",
            PseudoClass::Active => "active",
            PseudoClass::Focus => "focus",
            PseudoClass::FocusVisible => "focus-visible",
            PseudoClass::FocusWithin => "focus-within",
            PseudoClass::Visited => "visited",
            PseudoClass::Link => "link",
            PseudoClass::Target => "target",
            PseudoClass::Checked => "checked",
            PseudoClass::Disabled => "disabled",
            PseudoClass::Enabled => "enabled",
            PseudoClass::Required => "required",
            PseudoClass::Optional => "optional",
            PseudoClass::ReadOnly => "read-only",
            PseudoClass::PlaceholderShown => "placeholder-shown",
            PseudoClass::Empty => "empty",
            PseudoClass::Root => "root",
            PseudoClass::FirstChild => "first-child",
            PseudoClass::LastChild => "last-child",
            PseudoClass::OnlyChild => "only-child",
            PseudoClass::FirstOfType => "first-of-type",
            PseudoClass::LastOfType => "last-of-type",
            PseudoClass::OnlyOfType => "only-of-type",
            PseudoClass::NthChild(_) => "nth-child",
            PseudoClass::NthLastChild(_) => "nth-last-child",
            PseudoClass::NthOfType(_) => "nth-of-type",
            PseudoClass::NthLastOfType(_) => "nth-last-of-type",
            PseudoClass::Not(_) => "not",
            PseudoClass::Is(_) => "is",
            PseudoClass::Lang(_) => "lang",
        }
    }

    /// Selector argument of `:not()` / `:is()`, if any
    pub(crate) fn argument(&self) -> Option<&Selector> {
        match self {
            PseudoClass::Not(selector) | PseudoClass::Is(selector) => Some(selector),
            _ => None,
        }
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.keyword())?;
        match self {
            PseudoClass::NthChild(expr)
            | PseudoClass::NthLastChild(expr)
            | PseudoClass::NthOfType(expr)
            | PseudoClass::NthLastOfType(expr) => write!(f, "({})", expr),
            PseudoClass::Not(selector) | PseudoClass::Is(selector) => write!(f, "({})", selector),
            PseudoClass::Lang(code) => write!(f, "({})", code),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoElement {
    Before,
    After,
    FirstLine,
    FirstLetter,
    Placeholder,
    Selection,
    Marker,
    Backdrop,
}

impl fmt::Display for PseudoElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PseudoElement::Before => "before",
            PseudoElement::After => "after",
            PseudoElement::FirstLine => "first-line",
            PseudoElement::FirstLetter => "first-letter",
            PseudoElement::Placeholder => "placeholder",
            PseudoElement::Selection => "selection",
            PseudoElement::Marker => "marker",
            PseudoElement::Backdrop => "backdrop",
        };
        write!(f, "::{}", name)
    }
}
