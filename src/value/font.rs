//! Font family lists

use crate::error::{CompilerError, Result};
use crate::utils::{is_identifier, quote_string};

const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "math",
    "emoji",
    "fangsong",
];

/// A primary font family followed by its ordered fallbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    family: String,
    fallbacks: Vec<String>,
}

impl Font {
    pub fn new(family: impl Into<String>) -> Result<Self> {
        let family = family.into();
        check_family(&family)?;
        Ok(Self {
            family,
            fallbacks: Vec::new(),
        })
    }

    pub fn fallback(mut self, family: impl Into<String>) -> Result<Self> {
        let family = family.into();
        check_family(&family)?;
        self.fallbacks.push(family);
        Ok(self)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }

    pub fn render(&self) -> String {
        std::iter::once(&self.family)
            .chain(self.fallbacks.iter())
            .map(|family| render_family(family))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn check_family(family: &str) -> Result<()> {
    if family.trim().is_empty() {
        return Err(CompilerError::value("Font family name must not be empty"));
    }
    Ok(())
}

fn render_family(family: &str) -> String {
    if GENERIC_FAMILIES.contains(&family) {
        return family.to_string();
    }

    // Plain identifiers stay bare, anything else is quoted
    match is_identifier(family) {
        Ok(true) => family.to_string(),
        _ => quote_string(family),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_rendering() {
        let font = Font::new("Open Sans")
            .unwrap()
            .fallback("Arial")
            .unwrap()
            .fallback("sans-serif")
            .unwrap();
        assert_eq!(font.render(), "\"Open Sans\",Arial,sans-serif");
    }

    #[test]
    fn test_empty_family_rejected() {
        assert!(matches!(Font::new("  "), Err(CompilerError::Value { .. })));
        assert!(Font::new("Roboto").unwrap().fallback("").is_err());
    }
}
