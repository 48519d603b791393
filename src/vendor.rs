//! Vendor prefix policy and declaration expansion
//!
//! A policy pairs a set of target vendors with a table of rules describing
//! which declarations need a vendor specific form. Expansion inserts one
//! prefixed variant per vendor immediately before the unprefixed declaration,
//! in the fixed vendor order `webkit`, `moz`, `ms`, `o`.

use crate::error::{CompilerError, Result};
use crate::property::PropertyDeclaration;
use crate::utils::cached_regex;
use crate::value::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::OnceLock;

static VENDOR_PREFIX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Webkit,
    Moz,
    Ms,
    O,
}

impl Vendor {
    pub const ALL: [Vendor; 4] = [Vendor::Webkit, Vendor::Moz, Vendor::Ms, Vendor::O];

    pub fn prefix(self) -> &'static str {
        match self {
            Vendor::Webkit => "-webkit-",
            Vendor::Moz => "-moz-",
            Vendor::Ms => "-ms-",
            Vendor::O => "-o-",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Vendor::Webkit => "webkit",
            Vendor::Moz => "moz",
            Vendor::Ms => "ms",
            Vendor::O => "o",
        }
    }

    /// Split a vendor prefixed token such as `-moz-appearance`
    pub fn strip_prefix(token: &str) -> Result<Option<(Vendor, &str)>> {
        let regex = cached_regex(&VENDOR_PREFIX, r"^-(webkit|moz|ms|o)-(.+)$")?;
        let Some(captures) = regex.captures(token) else {
            return Ok(None);
        };

        let vendor = match &captures[1] {
            "webkit" => Vendor::Webkit,
            "moz" => Vendor::Moz,
            "ms" => Vendor::Ms,
            _ => Vendor::O,
        };
        let rest = captures.get(2).map_or("", |m| m.as_str());
        Ok(Some((vendor, rest)))
    }

    pub fn is_prefixed(token: &str) -> Result<bool> {
        Ok(Self::strip_prefix(token)?.is_some())
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the expansion table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixRule {
    /// The property name itself takes the prefix: `-webkit-transform`
    Property { property: String, vendors: Vec<Vendor> },
    /// A keyword value of a property takes the prefix: `display:-webkit-flex`
    Keyword { property: String, keyword: String, vendors: Vec<Vendor> },
    /// Values with a legacy functional form (calc, gradients) render prefixed
    ValueForm { vendors: Vec<Vendor> },
}

impl PrefixRule {
    pub fn property(property: impl Into<String>, vendors: &[Vendor]) -> Self {
        PrefixRule::Property {
            property: property.into(),
            vendors: vendors.to_vec(),
        }
    }

    pub fn keyword(property: impl Into<String>, keyword: impl Into<String>, vendors: &[Vendor]) -> Self {
        PrefixRule::Keyword {
            property: property.into(),
            keyword: keyword.into(),
            vendors: vendors.to_vec(),
        }
    }

    pub fn value_form(vendors: &[Vendor]) -> Self {
        PrefixRule::ValueForm {
            vendors: vendors.to_vec(),
        }
    }

    fn vendors(&self) -> &[Vendor] {
        match self {
            PrefixRule::Property { vendors, .. }
            | PrefixRule::Keyword { vendors, .. }
            | PrefixRule::ValueForm { vendors } => vendors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VendorPrefixPolicy {
    targets: BTreeSet<Vendor>,
    rules: Vec<PrefixRule>,
}

impl VendorPrefixPolicy {
    /// A policy that targets no vendor and never expands anything
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(rules: Vec<PrefixRule>) -> Self {
        Self {
            targets: BTreeSet::new(),
            rules,
        }
    }

    /// The built-in rule table, without any target vendor enabled
    pub fn standard() -> Self {
        use Vendor::*;

        Self::new(vec![
            PrefixRule::property("appearance", &[Moz, Webkit, Ms]),
            PrefixRule::property("user-select", &[Moz, Ms, Webkit]),
            PrefixRule::property("flex-direction", &[Webkit]),
            PrefixRule::property("flex-wrap", &[Webkit]),
            PrefixRule::property("justify-content", &[Webkit]),
            PrefixRule::property("align-content", &[Webkit]),
            PrefixRule::property("align-items", &[Webkit]),
            PrefixRule::property("transform", &[Webkit, Ms]),
            PrefixRule::property("transition-property", &[Webkit, Moz, O]),
            PrefixRule::property("transition-duration", &[Webkit, Moz, O]),
            PrefixRule::property("transition-timing-function", &[Webkit, Moz, O]),
            PrefixRule::property("transition-delay", &[Webkit, Moz, O]),
            PrefixRule::keyword("display", "flex", &[Webkit]),
            PrefixRule::keyword("display", "inline-flex", &[Webkit]),
            PrefixRule::keyword("position", "sticky", &[Webkit]),
            PrefixRule::value_form(&[Webkit, Moz, O]),
        ])
    }

    /// Enable the given vendors; every one of them must appear in some rule
    pub fn with_targets(self, targets: impl IntoIterator<Item = Vendor>) -> Result<Self> {
        let targets: BTreeSet<Vendor> = targets.into_iter().collect();
        self.check_targets(&targets)?;
        Ok(Self { targets, ..self })
    }

    pub fn targets(&self) -> &BTreeSet<Vendor> {
        &self.targets
    }

    pub fn rules(&self) -> &[PrefixRule] {
        &self.rules
    }

    pub fn check_targets(&self, targets: &BTreeSet<Vendor>) -> Result<()> {
        for vendor in targets {
            let covered = self.rules.iter().any(|rule| rule.vendors().contains(vendor));
            if !covered {
                return Err(CompilerError::prefix_policy(
                    vendor.name(),
                    "vendor is targeted but no expansion rule mentions it",
                ));
            }
        }
        Ok(())
    }

    /// Expand every declaration that needs a vendor form.
    ///
    /// Declarations that already carry a vendor prefix pass through untouched
    /// and a variant equal to a declaration already in the list is skipped, so
    /// expanding twice yields the same list as expanding once.
    pub fn expand(&self, declarations: &[PropertyDeclaration]) -> Result<Vec<PropertyDeclaration>> {
        if self.targets.is_empty() {
            return Ok(declarations.to_vec());
        }

        let mut present: HashSet<(String, String)> = declarations.iter().map(signature).collect();
        let mut expanded = Vec::with_capacity(declarations.len());

        for declaration in declarations {
            if !declaration.is_custom() && !is_vendor_specific(declaration)? {
                for vendor in &self.targets {
                    if let Some(variant) = self.variant(declaration, *vendor)? {
                        if present.insert(signature(&variant)) {
                            log::trace!("Added {} variant of '{}'", vendor, declaration.name());
                            expanded.push(variant);
                        }
                    }
                }
            }
            expanded.push(declaration.clone());
        }

        Ok(expanded)
    }

    fn variant(&self, declaration: &PropertyDeclaration, vendor: Vendor) -> Result<Option<PropertyDeclaration>> {
        let mut name = None;
        let mut value = None;
        let mut value_vendor = None;

        for rule in &self.rules {
            if !rule.vendors().contains(&vendor) {
                continue;
            }
            match rule {
                PrefixRule::Property { property, .. } if property == declaration.name() => {
                    name = Some(format!("{}{}", vendor.prefix(), property));
                }
                PrefixRule::Keyword { property, keyword, .. } if property == declaration.name() => {
                    if matches!(declaration.value(), Value::Keyword(token) if token == keyword) {
                        value = Some(Value::Keyword(format!("{}{}", vendor.prefix(), keyword)));
                    }
                }
                PrefixRule::ValueForm { .. } if declaration.value().has_vendor_form() => {
                    value_vendor = Some(vendor);
                }
                _ => {}
            }
        }

        if name.is_none() && value.is_none() && value_vendor.is_none() {
            return Ok(None);
        }

        let mut variant = declaration.clone();
        if let Some(name) = name {
            variant = variant.with_name(name);
        }
        if let Some(value) = value {
            variant = variant.with_value(value);
        }
        if value_vendor.is_some() {
            variant = variant.with_vendor(value_vendor);
        }
        Ok(Some(variant))
    }
}

/// Does the declaration already carry a vendor specific name or value?
fn is_vendor_specific(declaration: &PropertyDeclaration) -> Result<bool> {
    if declaration.vendor().is_some() || Vendor::is_prefixed(declaration.name())? {
        return Ok(true);
    }
    match declaration.value() {
        Value::Keyword(token) => Vendor::is_prefixed(token),
        _ => Ok(false),
    }
}

fn signature(declaration: &PropertyDeclaration) -> (String, String) {
    (declaration.name().to_string(), declaration.render_value())
}
