//! Variable and at-rule reference resolution against the active scheme

use super::RuleBlock;
use crate::error::{CompilerError, Result};
use crate::property::PropertyDeclaration;
use crate::rule::Keyframes;
use crate::scheme::DesignScheme;
use crate::value::Value;
use crate::VariableMode;
use std::collections::HashSet;

/// A rule after resolution
#[derive(Debug, Clone)]
pub(crate) struct ResolvedRule {
    pub selector: String,
    /// Custom properties carrying the scheme bindings this rule references
    pub custom_properties: Vec<PropertyDeclaration>,
    /// Declarations as they will be emitted
    pub declarations: Vec<PropertyDeclaration>,
    /// Declarations with every variable substituted, used for validation
    pub effective: Vec<PropertyDeclaration>,
}

pub(crate) struct VariableResolver<'a> {
    scheme: &'a DesignScheme,
    mode: VariableMode,
    keyframes: &'a [Keyframes],
    /// Keyframes names in first reference order
    referenced: Vec<String>,
    resolved_count: usize,
}

impl<'a> VariableResolver<'a> {
    pub fn new(scheme: &'a DesignScheme, mode: VariableMode, keyframes: &'a [Keyframes]) -> Self {
        Self {
            scheme,
            mode,
            keyframes,
            referenced: Vec::new(),
            resolved_count: 0,
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved_count
    }

    /// Keyframes names in the order rules first reference them
    pub fn referenced_keyframes(&self) -> &[String] {
        &self.referenced
    }

    pub fn resolve_rule(&mut self, rule: RuleBlock) -> Result<ResolvedRule> {
        let mut effective = Vec::with_capacity(rule.declarations.len());
        let mut referenced_variables: HashSet<String> = HashSet::new();

        for declaration in &rule.declarations {
            for name in declaration.value().variables() {
                referenced_variables.insert(name.to_string());
            }
            let resolved = self.substitute(declaration, &rule.selector)?;
            self.check_frames(&resolved, &rule.selector)?;
            effective.push(resolved);
        }

        let (declarations, custom_properties) = match self.mode {
            VariableMode::Inline => (effective.clone(), Vec::new()),
            VariableMode::CustomProperties => {
                // A `--name` the rule declares itself wins over the scheme binding
                for declaration in rule.declarations.iter().filter(|d| d.is_custom()) {
                    referenced_variables.remove(&declaration.name()[2..]);
                }
                let custom = self.custom_properties(&referenced_variables, &rule.selector)?;
                (rule.declarations, custom)
            }
        };

        Ok(ResolvedRule {
            selector: rule.selector,
            custom_properties,
            declarations,
            effective,
        })
    }

    /// Keyframes declarations are always substituted inline
    pub fn resolve_keyframes(&mut self, keyframes: &Keyframes) -> Result<Keyframes> {
        let owner = format!("@keyframes {}", keyframes.name());
        let mut frames = Vec::with_capacity(keyframes.frames().len());
        for frame in keyframes.frames() {
            let declarations = frame
                .declarations()
                .iter()
                .map(|declaration| self.substitute(declaration, &owner))
                .collect::<Result<Vec<_>>>()?;
            frames.push(frame.with_declarations(declarations));
        }
        Ok(keyframes.with_frames(frames))
    }

    fn substitute(&mut self, declaration: &PropertyDeclaration, selector: &str) -> Result<PropertyDeclaration> {
        let variables = declaration.value().variables().len();
        if variables == 0 {
            return Ok(declaration.clone());
        }

        let scheme = self.scheme;
        let value = declaration
            .value()
            .substitute(&mut |name: &str| scheme.resolve(name))
            .map_err(|e| locate(e, selector, declaration.name()))?;
        self.resolved_count += variables;
        log::trace!("Resolved {} variable(s) in '{}' at '{}'", variables, selector, declaration.name());
        Ok(declaration.clone().with_value(value))
    }

    fn check_frames(&mut self, declaration: &PropertyDeclaration, selector: &str) -> Result<()> {
        for name in declaration.value().frames_references() {
            if !self.keyframes.iter().any(|keyframes| keyframes.name() == name) {
                return Err(CompilerError::unresolved_at_rule(name, selector, declaration.name()));
            }
            if !self.referenced.iter().any(|seen| seen == name) {
                self.referenced.push(name.to_string());
            }
        }
        Ok(())
    }

    /// One `--name` declaration per referenced binding, in scheme order
    fn custom_properties(&self, referenced: &HashSet<String>, selector: &str) -> Result<Vec<PropertyDeclaration>> {
        let mut custom = Vec::new();
        for (name, _) in self.scheme.flattened() {
            if !referenced.contains(name) {
                continue;
            }
            let value = self
                .scheme
                .resolve(name)
                .map_err(|e| locate(e, selector, &format!("--{}", name)))?;
            custom.push(PropertyDeclaration::custom(name, value).map_err(|e| e.within(selector))?);
        }
        Ok(custom)
    }
}

/// Attach the owning rule and property to a detached resolution error.
/// A nested value rejecting its substituted member is a property mismatch.
fn locate(error: CompilerError, selector: &str, property: &str) -> CompilerError {
    match error {
        CompilerError::UnresolvedVariable { variable, scheme, .. } => {
            CompilerError::unresolved_variable(variable, selector, property, scheme)
        }
        CompilerError::CircularVariable { chain, scheme, .. } => {
            CompilerError::circular_variable(chain, selector, property, scheme)
        }
        CompilerError::Value { message } => CompilerError::property(selector, property, message),
        other => other.within(selector),
    }
}
