//! Design schemes (themes) and their registry
//!
//! A scheme maps variable names to values and may fall back to a parent
//! scheme. Schemes are frozen once registered and shared through `Arc`, so a
//! registry can hand the same scheme to several concurrent compiles.

use crate::error::{CompilerError, Result, DETACHED};
use crate::utils::is_variable_name;
use crate::value::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct DesignScheme {
    name: String,
    bindings: Vec<(String, Value)>,
    parent: Option<Arc<DesignScheme>>,
}

impl DesignScheme {
    /// A scheme without bindings or parent
    pub fn empty() -> Self {
        Self {
            name: "empty".to_string(),
            bindings: Vec::new(),
            parent: None,
        }
    }

    pub fn builder(name: impl Into<String>) -> DesignSchemeBuilder {
        DesignSchemeBuilder {
            name: name.into(),
            bindings: Vec::new(),
            parent: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<DesignScheme>> {
        self.parent.as_ref()
    }

    /// Own bindings in declaration order
    pub fn bindings(&self) -> &[(String, Value)] {
        &self.bindings
    }

    /// The fallback chain, starting with this scheme
    pub fn chain(&self) -> Vec<&DesignScheme> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = &current.parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// The raw binding for `variable`, checking this scheme before its ancestors
    pub fn lookup(&self, variable: &str) -> Option<&Value> {
        self.chain().into_iter().find_map(|scheme| {
            scheme
                .bindings
                .iter()
                .find(|(name, _)| name == variable)
                .map(|(_, value)| value)
        })
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.lookup(variable).is_some()
    }

    /// Resolve `variable` to a value free of variable references.
    ///
    /// Bindings may alias other variables; aliases are looked up through the
    /// whole chain of this scheme, so a child can redirect a parent's alias.
    /// An unbound name yields `UnresolvedVariable` with a detached location.
    pub fn resolve(&self, variable: &str) -> Result<Value> {
        let mut stack = Vec::new();
        self.resolve_with(variable, &mut stack)
    }

    fn resolve_with(&self, variable: &str, stack: &mut Vec<String>) -> Result<Value> {
        if stack.iter().any(|seen| seen == variable) {
            let mut chain = stack.clone();
            chain.push(variable.to_string());
            return Err(CompilerError::circular_variable(chain, DETACHED, DETACHED, &self.name));
        }

        let value = self
            .lookup(variable)
            .ok_or_else(|| CompilerError::unresolved_variable(variable, DETACHED, DETACHED, &self.name))?;

        stack.push(variable.to_string());
        let resolved = value.substitute(&mut |name: &str| self.resolve_with(name, stack));
        stack.pop();
        resolved
    }

    /// Every effective binding across the chain, root scheme first.
    ///
    /// A binding overridden by a descendant keeps the position where the
    /// ancestor declared it.
    pub fn flattened(&self) -> Vec<(&str, &Value)> {
        let mut flattened: Vec<(&str, &Value)> = Vec::new();
        for scheme in self.chain().into_iter().rev() {
            for (name, value) in &scheme.bindings {
                match flattened.iter_mut().find(|slot| slot.0 == name.as_str()) {
                    Some(slot) => slot.1 = value,
                    None => flattened.push((name.as_str(), value)),
                }
            }
        }
        flattened
    }
}

impl Default for DesignScheme {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone)]
pub struct DesignSchemeBuilder {
    name: String,
    bindings: Vec<(String, Value)>,
    parent: Option<String>,
}

impl DesignSchemeBuilder {
    pub fn bind(mut self, variable: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let variable = variable.into();
        if !is_variable_name(&variable)? {
            return Err(CompilerError::construction(format!(
                "'{}' is not a valid variable name in scheme '{}'",
                variable, self.name
            )));
        }
        if self.bindings.iter().any(|(name, _)| *name == variable) {
            return Err(CompilerError::construction(format!(
                "Variable '{}' is bound twice in scheme '{}'",
                variable, self.name
            )));
        }
        let value = value.into();
        value.check().map_err(|e| {
            CompilerError::construction(format!("Variable '{}' in scheme '{}': {}", variable, self.name, e))
        })?;
        self.bindings.push((variable, value));
        Ok(self)
    }

    /// Fall back to an already registered scheme
    pub fn extends(self, parent: impl Into<String>) -> Self {
        Self {
            parent: Some(parent.into()),
            ..self
        }
    }

    /// Freeze the scheme without a registry; a named parent is not allowed here
    pub fn build(self) -> Result<DesignScheme> {
        if let Some(parent) = &self.parent {
            return Err(CompilerError::construction(format!(
                "Scheme '{}' extends '{}' and must be registered",
                self.name, parent
            )));
        }
        Ok(DesignScheme {
            name: self.name,
            bindings: self.bindings,
            parent: None,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemeRegistry {
    schemes: Vec<Arc<DesignScheme>>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, builder: DesignSchemeBuilder) -> Result<Arc<DesignScheme>> {
        if builder.name.is_empty() {
            return Err(CompilerError::construction("Scheme name must not be empty"));
        }
        if self.get(&builder.name).is_some() {
            return Err(CompilerError::construction(format!(
                "Scheme '{}' is already registered",
                builder.name
            )));
        }

        let parent = match &builder.parent {
            Some(parent) => Some(self.get(parent).ok_or_else(|| {
                CompilerError::construction(format!(
                    "Scheme '{}' extends unknown scheme '{}'",
                    builder.name, parent
                ))
            })?),
            None => None,
        };

        let scheme = Arc::new(DesignScheme {
            name: builder.name,
            bindings: builder.bindings,
            parent,
        });
        log::debug!("Registered scheme '{}' ({} bindings)", scheme.name, scheme.bindings.len());
        self.schemes.push(Arc::clone(&scheme));
        Ok(scheme)
    }

    pub fn get(&self, name: &str) -> Option<Arc<DesignScheme>> {
        self.schemes.iter().find(|scheme| scheme.name == name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.schemes.iter().map(|scheme| scheme.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Color, Numeric};

    fn registry() -> SchemeRegistry {
        let mut registry = SchemeRegistry::new();
        registry
            .register(
                DesignScheme::builder("base")
                    .bind("primary", Color::rgb(0, 0, 255).unwrap())
                    .unwrap()
                    .bind("accent", Value::var("primary").unwrap())
                    .unwrap()
                    .bind("spacing", Numeric::px(8.0).unwrap())
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                DesignScheme::builder("dark")
                    .extends("base")
                    .bind("primary", Color::rgb(255, 255, 0).unwrap())
                    .unwrap(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_child_overrides_parent() {
        let registry = registry();
        let dark = registry.get("dark").unwrap();
        assert_eq!(dark.resolve("primary").unwrap().to_string(), "#ffff00");
        assert_eq!(dark.resolve("spacing").unwrap().to_string(), "8px");

        let base = registry.get("base").unwrap();
        assert_eq!(base.resolve("primary").unwrap().to_string(), "#0000ff");
    }

    #[test]
    fn test_alias_resolves_through_active_scheme() {
        let registry = registry();
        assert_eq!(registry.get("dark").unwrap().resolve("accent").unwrap().to_string(), "#ffff00");
        assert_eq!(registry.get("base").unwrap().resolve("accent").unwrap().to_string(), "#0000ff");
    }

    #[test]
    fn test_unbound_variable() {
        let registry = registry();
        let result = registry.get("dark").unwrap().resolve("missing");
        assert!(matches!(
            result,
            Err(CompilerError::UnresolvedVariable { ref variable, ref scheme, .. })
                if variable == "missing" && scheme == "dark"
        ));
    }

    #[test]
    fn test_alias_cycle_is_detected() {
        let scheme = DesignScheme::builder("loop")
            .bind("a", Value::var("b").unwrap())
            .unwrap()
            .bind("b", Value::var("a").unwrap())
            .unwrap()
            .build()
            .unwrap();
        match scheme.resolve("a") {
            Err(CompilerError::CircularVariable { chain, .. }) => assert_eq!(chain, vec!["a", "b", "a"]),
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_registration_errors() {
        let mut registry = registry();
        assert!(registry.register(DesignScheme::builder("base")).is_err());
        assert!(registry.register(DesignScheme::builder("light").extends("nope")).is_err());
        assert!(DesignScheme::builder("x").bind("--bad", Color::BLACK).is_err());
        assert!(DesignScheme::builder("x")
            .bind("a", Color::BLACK)
            .unwrap()
            .bind("a", Color::WHITE)
            .is_err());
        assert!(matches!(
            DesignScheme::builder("x").bind("raw", Value::Keyword("two words".to_string())),
            Err(CompilerError::Construction { .. })
        ));
        assert_eq!(registry.names(), vec!["base", "dark"]);
    }

    #[test]
    fn test_flattened_keeps_ancestor_order() {
        let registry = registry();
        let dark = registry.get("dark").unwrap();
        let flattened: Vec<(&str, String)> = dark
            .flattened()
            .into_iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect();
        assert_eq!(
            flattened,
            vec![
                ("primary", "#ffff00".to_string()),
                ("accent", "var(--primary)".to_string()),
                ("spacing", "8px".to_string()),
            ]
        );
    }

    #[test]
    fn test_schemes_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Arc<DesignScheme>>();
        assert_send_sync::<SchemeRegistry>();
    }
}
