//! Collection and canonical merging of style rules

use super::RuleBlock;
use crate::error::{CompilerError, Result};
use crate::property::PropertyDeclaration;
use crate::rule::{Keyframes, StyleRule, Stylesheet};
use std::collections::HashMap;

/// Everything reachable from a stylesheet, flattened
#[derive(Debug, Default)]
pub(crate) struct Collection {
    pub rules: Vec<RuleBlock>,
    /// Top level keyframes first, then nested ones in the order they were found
    pub keyframes: Vec<Keyframes>,
}

/// Flatten rules depth first (parent before children) and hoist nested keyframes
pub(crate) fn collect(sheet: &Stylesheet) -> Result<Collection> {
    let mut collection = Collection::default();

    for keyframes in sheet.keyframes() {
        register_keyframes(&mut collection.keyframes, keyframes)?;
    }
    for rule in sheet.rules() {
        collect_rule(rule, &mut collection)?;
    }

    Ok(collection)
}

fn collect_rule(rule: &StyleRule, collection: &mut Collection) -> Result<()> {
    collection.rules.push(RuleBlock {
        selector: rule.selector().canonical()?,
        declarations: rule.declarations().to_vec(),
    });

    for keyframes in rule.at_rules() {
        register_keyframes(&mut collection.keyframes, keyframes)?;
    }
    for child in rule.children() {
        collect_rule(child, collection)?;
    }
    Ok(())
}

fn register_keyframes(registered: &mut Vec<Keyframes>, keyframes: &Keyframes) -> Result<()> {
    match registered.iter().find(|existing| existing.name() == keyframes.name()) {
        Some(existing) if existing == keyframes => Ok(()),
        Some(_) => Err(CompilerError::construction(format!(
            "Keyframes '{}' are registered twice with different frames",
            keyframes.name()
        ))),
        None => {
            registered.push(keyframes.clone());
            Ok(())
        }
    }
}

/// Merges rules that share canonical selector text
pub(crate) struct RuleMerger {
    merged_count: usize,
}

impl RuleMerger {
    pub fn new() -> Self {
        Self { merged_count: 0 }
    }

    /// Number of input rules folded into an earlier rule with the same selector
    pub fn merged_count(&self) -> usize {
        self.merged_count
    }

    /// Group rules by selector in first occurrence order, concatenating their
    /// declarations, then drop every declaration overridden later in its group
    pub fn merge(&mut self, rules: Vec<RuleBlock>) -> Vec<RuleBlock> {
        let mut order: Vec<RuleBlock> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for rule in rules {
            match index.get(&rule.selector) {
                Some(&position) => {
                    log::trace!("Merging repeated rule '{}'", rule.selector);
                    self.merged_count += 1;
                    order[position].declarations.extend(rule.declarations);
                }
                None => {
                    index.insert(rule.selector.clone(), order.len());
                    order.push(rule);
                }
            }
        }

        for rule in &mut order {
            rule.declarations = apply_overrides(std::mem::take(&mut rule.declarations));
        }
        order
    }
}

/// Keep only the last declaration of each property name, at its last position
pub(crate) fn apply_overrides(declarations: Vec<PropertyDeclaration>) -> Vec<PropertyDeclaration> {
    let mut last: HashMap<String, usize> = HashMap::new();
    for (position, declaration) in declarations.iter().enumerate() {
        last.insert(declaration.name().to_string(), position);
    }

    declarations
        .into_iter()
        .enumerate()
        .filter(|(position, declaration)| last.get(declaration.name()) == Some(position))
        .map(|(_, declaration)| declaration)
        .collect()
}
