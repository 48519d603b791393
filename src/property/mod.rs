//! Property declarations
//!
//! A declaration binds a property name to a typed value. Known properties are
//! validated against the catalog in [`definition`]; shorthand families live in
//! [`shorthand`] and expand into ordered longhand declarations.

pub mod definition;
pub mod shorthand;

pub use definition::{Multiplicity, PropertyDefinition, ValueShape, CSS_WIDE_KEYWORDS};
pub use shorthand::{Border, BorderStyle, FontShorthand, Shorthand, Side, Sizing, Transition};

use crate::error::{CompilerError, Result};
use crate::utils::{is_custom_property, is_identifier};
use crate::value::Value;
use crate::vendor::Vendor;

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDeclaration {
    name: String,
    value: Value,
    important: bool,
    /// Vendor whose legacy value form is rendered (`-webkit-calc(..)`)
    vendor: Option<Vendor>,
}

impl PropertyDeclaration {
    /// Build a declaration, checking the value against the property's catalog entry
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let name = name.into();
        let value = value.into();

        let definition = definition_for(&name)?;
        value
            .check()
            .map_err(|e| CompilerError::detached_property(&name, e.to_string()))?;
        if definition.is_none() && !is_custom_property(&name)? {
            log::warn!("Unknown property '{}' accepts any value", name);
        }

        let declaration = Self {
            name,
            value,
            important: false,
            vendor: None,
        };
        declaration.check_against(definition)?;
        Ok(declaration)
    }

    /// A custom property declaration `--name: value`
    pub fn custom(name: &str, value: impl Into<Value>) -> Result<Self> {
        Self::new(format!("--{}", name), value)
    }

    pub fn important(self) -> Self {
        Self { important: true, ..self }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_important(&self) -> bool {
        self.important
    }

    pub fn vendor(&self) -> Option<Vendor> {
        self.vendor
    }

    pub fn is_custom(&self) -> bool {
        self.name.starts_with("--")
    }

    pub fn render_value(&self) -> String {
        self.value.render(self.vendor)
    }

    /// Re-check the current value, used once variable references are resolved
    pub fn validate(&self) -> Result<()> {
        self.check_against(definition_for(&self.name)?)
    }

    fn check_against(&self, definition: Option<PropertyDefinition>) -> Result<()> {
        match definition {
            Some(definition) if !definition.accepts(&self.value) => Err(CompilerError::detached_property(
                &self.name,
                format!(
                    "expected {}, got {} '{}'",
                    definition.describe(),
                    self.value.kind_name(),
                    self.value.render(None)
                ),
            )),
            _ => Ok(()),
        }
    }

    pub(crate) fn with_name(self, name: String) -> Self {
        Self { name, ..self }
    }

    pub(crate) fn with_value(self, value: Value) -> Self {
        Self { value, ..self }
    }

    pub(crate) fn with_vendor(self, vendor: Option<Vendor>) -> Self {
        Self { vendor, ..self }
    }
}

/// Catalog entry for `name`; vendor prefixed names share the unprefixed entry
fn definition_for(name: &str) -> Result<Option<PropertyDefinition>> {
    if is_custom_property(name)? {
        return Ok(None);
    }
    if !is_identifier(name)? {
        return Err(CompilerError::detached_property(name, "not a valid property name"));
    }

    let base = match Vendor::strip_prefix(name)? {
        Some((_, base)) => base,
        None => name,
    };
    if Shorthand::is_shorthand_name(base) {
        return Err(CompilerError::detached_property(
            name,
            "is a shorthand; register it with StyleRule::shorthand so it expands into longhands",
        ));
    }
    Ok(PropertyDefinition::lookup(base))
}
