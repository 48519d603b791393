//! Post-resolution validation
//!
//! Construction already checked every literal value. What remains are values
//! that only became concrete once variables were substituted.

use super::resolve::ResolvedRule;
use crate::error::Result;
use crate::rule::Keyframes;

pub(crate) struct Validator {
    checked: usize,
}

impl Validator {
    pub fn new() -> Self {
        Self { checked: 0 }
    }

    pub fn checked(&self) -> usize {
        self.checked
    }

    pub fn validate_rule(&mut self, rule: &ResolvedRule) -> Result<()> {
        for declaration in rule.effective.iter().chain(&rule.custom_properties) {
            declaration.validate().map_err(|e| e.within(&rule.selector))?;
            self.checked += 1;
        }
        Ok(())
    }

    pub fn validate_keyframes(&mut self, keyframes: &Keyframes) -> Result<()> {
        let owner = format!("@keyframes {}", keyframes.name());
        for frame in keyframes.frames() {
            for declaration in frame.declarations() {
                declaration.validate().map_err(|e| e.within(&owner))?;
                self.checked += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompilerError;
    use crate::property::PropertyDeclaration;
    use crate::value::{Numeric, Value};

    #[test]
    fn test_incompatible_resolved_value_is_property_error() {
        let declared = PropertyDeclaration::new("color", Value::var("size").unwrap()).unwrap();
        let rule = ResolvedRule {
            selector: ".title".to_string(),
            custom_properties: Vec::new(),
            declarations: vec![declared.clone()],
            effective: vec![declared.with_value(Numeric::px(12.0).unwrap().into())],
        };

        let mut validator = Validator::new();
        match validator.validate_rule(&rule) {
            Err(CompilerError::Property { selector, property, .. }) => {
                assert_eq!(selector, ".title");
                assert_eq!(property, "color");
            }
            other => panic!("expected property error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_rule_passes() {
        let declaration = PropertyDeclaration::new("width", Numeric::px(12.0).unwrap()).unwrap();
        let rule = ResolvedRule {
            selector: ".title".to_string(),
            custom_properties: Vec::new(),
            declarations: vec![declaration.clone()],
            effective: vec![declaration],
        };

        let mut validator = Validator::new();
        assert!(validator.validate_rule(&rule).is_ok());
        assert_eq!(validator.checked(), 1);
    }
}
