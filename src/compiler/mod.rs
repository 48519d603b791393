// FILE: src/compiler/mod.rs

// This file defines the main "compiler" module and orchestrates the pipeline.

mod merge;
mod resolve;
mod serialize;
mod validate;

use crate::error::Result;
use crate::property::PropertyDeclaration;
use crate::rule::{Keyframes, Stylesheet};
use crate::scheme::DesignScheme;
use crate::vendor::VendorPrefixPolicy;
use crate::{CompilationStats, CompilerOptions};

use merge::RuleMerger;
use resolve::VariableResolver;
use serialize::Serializer;
use validate::Validator;

/// A rule reduced to its canonical selector text and its declarations
#[derive(Debug, Clone)]
pub(crate) struct RuleBlock {
    pub selector: String,
    pub declarations: Vec<PropertyDeclaration>,
}

/// Run every stage over a frozen stylesheet.
/// Nothing is returned unless all stages succeed.
pub fn compile_with_options(
    sheet: &Stylesheet,
    scheme: &DesignScheme,
    policy: &VendorPrefixPolicy,
    options: &CompilerOptions,
) -> Result<(String, CompilationStats)> {
    let mut stats = CompilationStats::default();

    // Caller supplied targets replace the policy's own, against the same rule table
    let overridden;
    let policy = match &options.vendor_targets {
        Some(targets) => {
            overridden = policy.clone().with_targets(targets.iter().copied())?;
            &overridden
        }
        None => policy,
    };

    if options.debug_mode {
        log::debug!(
            "Starting compilation against scheme '{}' ({:?}, {:?}, {} vendor target(s))",
            scheme.name(),
            options.render_mode,
            options.variable_mode,
            policy.targets().len()
        );
    }

    // =======================================================
    // THE COMPILER PIPELINE
    // =======================================================

    // STAGE 1: COLLECT
    // Flatten nested rules and gather every registered keyframes block.
    let collection = merge::collect(sheet)?;
    stats.input_rules = collection.rules.len();

    if options.debug_mode {
        log::debug!(
            "Stage 1 complete. Collected {} rule(s) and {} keyframes block(s)",
            collection.rules.len(),
            collection.keyframes.len()
        );
    }

    // STAGE 2: CANONICALIZE & MERGE
    // Rules whose selectors render identically become one block.
    let mut merger = RuleMerger::new();
    let rules = merger.merge(collection.rules);
    stats.merged_rules = merger.merged_count();

    if options.debug_mode {
        log::debug!("Stage 2 complete. {} rule block(s), {} merged", rules.len(), stats.merged_rules);
    }

    // STAGE 3: RESOLVE VARIABLES
    let mut resolver = VariableResolver::new(scheme, options.variable_mode, &collection.keyframes);
    let mut resolved = Vec::with_capacity(rules.len());
    for rule in rules {
        resolved.push(resolver.resolve_rule(rule)?);
    }
    let keyframes = collection
        .keyframes
        .iter()
        .map(|block| resolver.resolve_keyframes(block))
        .collect::<Result<Vec<_>>>()?;
    stats.resolved_variables = resolver.resolved_count();
    let referenced = resolver.referenced_keyframes().to_vec();

    if options.debug_mode {
        log::debug!("Stage 3 complete. Resolved {} variable reference(s)", stats.resolved_variables);
    }

    // STAGE 4: VALIDATE
    // Substituted values are checked against their properties again.
    let mut validator = Validator::new();
    for rule in &resolved {
        validator.validate_rule(rule)?;
    }
    for block in &keyframes {
        validator.validate_keyframes(block)?;
    }

    if options.debug_mode {
        log::debug!("Stage 4 complete. Validated {} declaration(s)", validator.checked());
    }

    // STAGE 5: EXPAND PREFIXES
    for rule in &mut resolved {
        let expanded = policy.expand(&rule.declarations)?;
        stats.prefixed_declarations += expanded.len() - rule.declarations.len();
        rule.declarations = expanded;
    }
    let mut expanded_keyframes = Vec::with_capacity(keyframes.len());
    for block in &keyframes {
        let mut frames = Vec::with_capacity(block.frames().len());
        for frame in block.frames() {
            let expanded = policy.expand(frame.declarations())?;
            stats.prefixed_declarations += expanded.len() - frame.declarations().len();
            frames.push(frame.with_declarations(expanded));
        }
        expanded_keyframes.push(block.with_frames(frames));
    }

    if options.debug_mode {
        log::debug!("Stage 5 complete. Added {} prefixed declaration(s)", stats.prefixed_declarations);
    }

    // STAGE 6: SERIALIZE
    // At-rules come first, referenced ones in first reference order.
    let mut serializer = Serializer::new(options.render_mode);
    for block in emission_order(&expanded_keyframes, &referenced) {
        serializer.keyframes(block)?;
        stats.at_rules += 1;
    }
    for rule in &resolved {
        if rule.declarations.is_empty() && rule.custom_properties.is_empty() {
            log::trace!("Skipping empty rule '{}'", rule.selector);
            continue;
        }
        serializer.rule(&rule.selector, rule.custom_properties.iter().chain(&rule.declarations))?;
        stats.emitted_rules += 1;
        stats.declarations += rule.custom_properties.len() + rule.declarations.len();
    }
    let output = serializer.finish();

    // =======================================================
    // FINAL STATS
    // =======================================================

    stats.output_size = output.len();

    if options.debug_mode {
        log::debug!(
            "Compilation complete. {} rule(s), {} at-rule(s), {} byte(s)",
            stats.emitted_rules,
            stats.at_rules,
            stats.output_size
        );
    }

    Ok((output, stats))
}

/// Referenced keyframes in first reference order, then the rest in registration order
fn emission_order<'a>(keyframes: &'a [Keyframes], referenced: &[String]) -> Vec<&'a Keyframes> {
    let mut ordered: Vec<&Keyframes> = referenced
        .iter()
        .filter_map(|name| keyframes.iter().find(|block| block.name() == name))
        .collect();

    for block in keyframes {
        if !referenced.iter().any(|name| name == block.name()) {
            log::warn!("Keyframes '{}' are registered but never referenced", block.name());
            ordered.push(block);
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{FrameOffset, Keyframe};
    use crate::value::Numeric;

    fn block(name: &str) -> Keyframes {
        let frame = Keyframe::new(
            vec![FrameOffset::To],
            vec![PropertyDeclaration::new("opacity", Numeric::number(1.0).unwrap()).unwrap()],
        )
        .unwrap();
        Keyframes::named(name, vec![frame]).unwrap()
    }

    #[test]
    fn test_emission_order_puts_referenced_first() {
        let registered = vec![block("a"), block("b"), block("c")];
        let referenced = vec!["c".to_string(), "a".to_string()];

        let names: Vec<&str> = emission_order(&registered, &referenced).iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
