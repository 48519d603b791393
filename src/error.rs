//! Error types for the stylist compiler

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Invalid value: {message}")]
    Value { message: String },

    #[error("Construction error: {message}")]
    Construction { message: String },

    #[error("Property error in '{selector}' at '{property}': {message}")]
    Property { selector: String, property: String, message: String },

    #[error("Unresolved variable '{variable}' in '{selector}' at '{property}' (scheme '{scheme}')")]
    UnresolvedVariable { variable: String, selector: String, property: String, scheme: String },

    #[error("Circular variable reference in '{selector}' at '{property}' (scheme '{scheme}'): {}", chain.join(" -> "))]
    CircularVariable { chain: Vec<String>, selector: String, property: String, scheme: String },

    #[error("Unresolved at-rule '{name}' referenced in '{selector}' at '{property}'")]
    UnresolvedAtRule { name: String, selector: String, property: String },

    #[error("Vendor prefix policy error for '{vendor}': {message}")]
    PrefixPolicy { vendor: String, message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("IO error: {0}")]
    Io(String),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },
}

pub type Result<T> = std::result::Result<T, CompilerError>;

/// Placeholder used for the selector of a declaration that has not been
/// attached to a rule yet.
pub const DETACHED: &str = "<detached>";

impl From<std::io::Error> for CompilerError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl CompilerError {
    pub fn value(message: impl Into<String>) -> Self {
        Self::Value {
            message: message.into(),
        }
    }

    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction {
            message: message.into(),
        }
    }

    pub fn property(selector: impl Into<String>, property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Property {
            selector: selector.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    /// Property error raised while building a declaration, before any rule owns it
    pub fn detached_property(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::property(DETACHED, property, message)
    }

    pub fn unresolved_variable(
        variable: impl Into<String>,
        selector: impl Into<String>,
        property: impl Into<String>,
        scheme: impl Into<String>,
    ) -> Self {
        Self::UnresolvedVariable {
            variable: variable.into(),
            selector: selector.into(),
            property: property.into(),
            scheme: scheme.into(),
        }
    }

    pub fn circular_variable(
        chain: Vec<String>,
        selector: impl Into<String>,
        property: impl Into<String>,
        scheme: impl Into<String>,
    ) -> Self {
        Self::CircularVariable {
            chain,
            selector: selector.into(),
            property: property.into(),
            scheme: scheme.into(),
        }
    }

    pub fn unresolved_at_rule(name: impl Into<String>, selector: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnresolvedAtRule {
            name: name.into(),
            selector: selector.into(),
            property: property.into(),
        }
    }

    pub fn prefix_policy(vendor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PrefixPolicy {
            vendor: vendor.into(),
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Re-attribute a detached property error to the rule that owns the declaration
    pub fn within(self, selector: &str) -> Self {
        match self {
            Self::Property { selector: owner, property, message } if owner == DETACHED => Self::Property {
                selector: selector.to_string(),
                property,
                message,
            },
            other => other,
        }
    }
}
