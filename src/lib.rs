//! Stylist Stylesheet Compiler
//!
//! Compiles typed style rules, evaluated against a design scheme, into
//! deterministic stylesheet text.
//!
//! # Features
//!
//! - Typed values (numerics with units, colors, gradients, shadows, fonts)
//!   validated at construction
//! - A static property catalog with shorthand expansion
//! - Selector algebra with canonical rendering
//! - Merging of rules that share a selector, with a last-declaration-wins override law
//! - Design schemes with parent fallback, inline or as custom properties
//! - Vendor prefix expansion driven by an explicit policy
//! - Keyframes at-rules, emitted ahead of the rules referencing them
//!
//! # Basic Usage
//!
//! ```rust
//! use stylist::rule::{StyleRule, Stylesheet};
//! use stylist::selector::Selector;
//! use stylist::value::{Color, Numeric};
//! use stylist::{compile, DesignScheme, RenderMode, Result, VendorPrefixPolicy};
//!
//! fn main() -> Result<()> {
//!     let button = StyleRule::new(Selector::class("button")?)
//!         .declaration("color", Color::rgba(255, 0, 0, 1.0)?)?
//!         .declaration("font-size", Numeric::px(14.0)?)?;
//!     let sheet = Stylesheet::new().with_rule(button);
//!
//!     let css = compile(&sheet, &DesignScheme::empty(), &VendorPrefixPolicy::none(), RenderMode::Compact)?;
//!     assert_eq!(css, ".button{color:#ff0000;font-size:14px}");
//!     Ok(())
//! }
//! ```
//!
//! # Compilation Pipeline
//!
//! 1. **Collect** - Flatten nested rules and hoist keyframes
//! 2. **Merge** - Render selectors canonically and merge identical ones
//! 3. **Resolve** - Substitute scheme variables or emit custom properties
//! 4. **Validate** - Re-check substituted values against their properties
//! 5. **Expand** - Add vendor prefixed declarations
//! 6. **Serialize** - Emit at-rules, then rules, in expanded or compact form

pub mod config;
pub mod error;
pub mod property;
pub mod rule;
pub mod scheme;
pub mod selector;
pub mod utils;
pub mod value;
pub mod vendor;

mod compiler;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

// Re-export commonly used types and functions
pub use config::ConfigFile;
pub use error::{CompilerError, Result};
pub use property::{PropertyDeclaration, Shorthand};
pub use rule::{FrameOffset, Keyframe, Keyframes, StyleRule, Stylesheet};
pub use scheme::{DesignScheme, DesignSchemeBuilder, SchemeRegistry};
pub use selector::Selector;
pub use value::{Color, Numeric, Value};
pub use vendor::{PrefixRule, Vendor, VendorPrefixPolicy};

/// Compiler version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Output formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// One declaration per line, blank line between blocks
    Expanded,
    /// No insignificant whitespace
    #[default]
    Compact,
}

/// How scheme variables reach the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariableMode {
    /// Every reference is replaced by its resolved value
    #[default]
    Inline,
    /// References stay as `var(--name)` and each rule declares the
    /// custom properties it uses
    CustomProperties,
}

/// Compilation options and settings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilerOptions {
    /// Expanded or compact output
    pub render_mode: RenderMode,

    /// Inline substitution or custom properties
    pub variable_mode: VariableMode,

    /// Replaces the vendor policy's own targets when set
    pub vendor_targets: Option<BTreeSet<Vendor>>,

    /// Enable debug mode with stage by stage logging
    pub debug_mode: bool,
}

/// Compilation statistics and metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompilationStats {
    /// Rules collected, nested rules included
    pub input_rules: usize,

    /// Rule blocks written to the output
    pub emitted_rules: usize,

    /// Rules folded into an earlier rule with the same selector
    pub merged_rules: usize,

    /// Declarations written inside rule blocks
    pub declarations: usize,

    /// Keyframes blocks written
    pub at_rules: usize,

    /// Variable references substituted
    pub resolved_variables: usize,

    /// Vendor prefixed declarations added by expansion
    pub prefixed_declarations: usize,

    /// Output size in bytes
    pub output_size: usize,
}

/// Compile with inline variable substitution
pub fn compile(
    sheet: &Stylesheet,
    scheme: &DesignScheme,
    policy: &VendorPrefixPolicy,
    render_mode: RenderMode,
) -> Result<String> {
    let options = CompilerOptions {
        render_mode,
        ..CompilerOptions::default()
    };
    let (output, _stats) = compile_with_options(sheet, scheme, policy, &options)?;
    Ok(output)
}

/// Compile with custom options
pub fn compile_with_options(
    sheet: &Stylesheet,
    scheme: &DesignScheme,
    policy: &VendorPrefixPolicy,
    options: &CompilerOptions,
) -> Result<(String, CompilationStats)> {
    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::debug!("Compiler options: {:?}", options);
    }

    let (output, stats) = compiler::compile_with_options(sheet, scheme, policy, options)?;

    if options.debug_mode {
        log::info!("Compilation successful!");
        log::info!("Output size: {} bytes", stats.output_size);
        log::debug!("Full stats: {:?}", stats);
    }

    Ok((output, stats))
}

/// Compile and write the stylesheet to `output_path`.
/// The file is only written when compilation succeeds.
pub fn compile_to_file(
    sheet: &Stylesheet,
    scheme: &DesignScheme,
    policy: &VendorPrefixPolicy,
    options: &CompilerOptions,
    output_path: impl AsRef<Path>,
) -> Result<CompilationStats> {
    let output_path = output_path.as_ref();
    let (output, stats) = compile_with_options(sheet, scheme, policy, options)?;
    std::fs::write(output_path, output)?;

    if options.debug_mode {
        log::info!("Wrote '{}'", output_path.display());
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::PseudoClass;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn compact(sheet: &Stylesheet, scheme: &DesignScheme, policy: &VendorPrefixPolicy) -> Result<String> {
        compile(sheet, scheme, policy, RenderMode::Compact)
    }

    fn button_sheet() -> Stylesheet {
        let button = StyleRule::new(Selector::class("button").unwrap())
            .declaration("color", Color::rgba(255, 0, 0, 1.0).unwrap())
            .unwrap()
            .declaration("font-size", Numeric::px(14.0).unwrap())
            .unwrap();
        Stylesheet::new().with_rule(button)
    }

    fn themes() -> SchemeRegistry {
        let mut registry = SchemeRegistry::new();
        registry
            .register(
                DesignScheme::builder("base")
                    .bind("text", Color::BLACK)
                    .unwrap()
                    .bind("gap", Numeric::px(4.0).unwrap())
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(DesignScheme::builder("dark").extends("base").bind("text", Color::WHITE).unwrap())
            .unwrap();
        registry
    }

    fn card_sheet() -> Stylesheet {
        let card = StyleRule::new(Selector::class("card").unwrap())
            .declaration("color", Value::var("text").unwrap())
            .unwrap()
            .declaration("margin-top", Value::var("gap").unwrap())
            .unwrap();
        Stylesheet::new().with_rule(card)
    }

    #[test]
    fn test_compile_button_compact() {
        init_logger();
        let css = compact(&button_sheet(), &DesignScheme::empty(), &VendorPrefixPolicy::none()).unwrap();
        assert_eq!(css, ".button{color:#ff0000;font-size:14px}");
    }

    #[test]
    fn test_compile_button_expanded() {
        let css = compile(
            &button_sheet(),
            &DesignScheme::empty(),
            &VendorPrefixPolicy::none(),
            RenderMode::Expanded,
        )
        .unwrap();
        assert_eq!(css, ".button {\n  color: #ff0000;\n  font-size: 14px;\n}\n");
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let registry = themes();
        let dark = registry.get("dark").unwrap();
        let policy = VendorPrefixPolicy::standard().with_targets([Vendor::Webkit]).unwrap();

        let first = compact(&card_sheet(), &dark, &policy).unwrap();
        let second = compact(&card_sheet(), &dark, &policy).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rules_with_identical_selectors_merge() {
        let first = StyleRule::new(Selector::class("a").unwrap())
            .declaration("width", Numeric::px(1.0).unwrap())
            .unwrap()
            .declaration("height", Numeric::px(1.0).unwrap())
            .unwrap();
        let other = StyleRule::new(Selector::class("b").unwrap())
            .declaration("width", Numeric::px(5.0).unwrap())
            .unwrap();
        let again = StyleRule::new(Selector::class("a").unwrap())
            .declaration("width", Numeric::px(2.0).unwrap())
            .unwrap();
        let sheet = Stylesheet::new().with_rule(first).with_rule(other).with_rule(again);

        let (css, stats) =
            compile_with_options(&sheet, &DesignScheme::empty(), &VendorPrefixPolicy::none(), &CompilerOptions::default())
                .unwrap();
        assert_eq!(css, ".a{height:1px;width:2px}.b{width:5px}");
        assert_eq!(stats.input_rules, 3);
        assert_eq!(stats.emitted_rules, 2);
        assert_eq!(stats.merged_rules, 1);
        assert_eq!(stats.declarations, 3);
        assert_eq!(stats.output_size, css.len());
    }

    #[test]
    fn test_later_declaration_overrides_important() {
        let first = StyleRule::new(Selector::class("a").unwrap())
            .with_declaration(PropertyDeclaration::new("color", Color::BLACK).unwrap().important());
        let second = StyleRule::new(Selector::class("a").unwrap())
            .declaration("color", Color::WHITE)
            .unwrap();
        let sheet = Stylesheet::new().with_rule(first).with_rule(second);

        let css = compact(&sheet, &DesignScheme::empty(), &VendorPrefixPolicy::none()).unwrap();
        assert_eq!(css, ".a{color:#ffffff}");
    }

    #[test]
    fn test_important_flag_is_rendered() {
        let rule = StyleRule::new(Selector::class("a").unwrap())
            .with_declaration(PropertyDeclaration::new("color", Color::BLACK).unwrap().important());
        let sheet = Stylesheet::new().with_rule(rule);

        let css = compact(&sheet, &DesignScheme::empty(), &VendorPrefixPolicy::none()).unwrap();
        assert_eq!(css, ".a{color:#000000!important}");
    }

    #[test]
    fn test_child_scheme_overrides_parent() {
        let registry = themes();

        let base = compact(&card_sheet(), &registry.get("base").unwrap(), &VendorPrefixPolicy::none()).unwrap();
        assert_eq!(base, ".card{color:#000000;margin-top:4px}");

        let dark = compact(&card_sheet(), &registry.get("dark").unwrap(), &VendorPrefixPolicy::none()).unwrap();
        assert_eq!(dark, ".card{color:#ffffff;margin-top:4px}");
    }

    #[test]
    fn test_unbound_variable_fails_whole_compile() {
        let registry = themes();
        let sheet = card_sheet().with_rule(
            StyleRule::new(Selector::class("title").unwrap())
                .declaration("color", Value::var("brand").unwrap())
                .unwrap(),
        );

        let result = compact(&sheet, &registry.get("dark").unwrap(), &VendorPrefixPolicy::none());
        assert_eq!(
            result.unwrap_err(),
            CompilerError::unresolved_variable("brand", ".title", "color", "dark")
        );
    }

    #[test]
    fn test_incompatible_variable_is_property_error() {
        let scheme = DesignScheme::builder("sizes")
            .bind("size", Numeric::px(12.0).unwrap())
            .unwrap()
            .build()
            .unwrap();
        let sheet = Stylesheet::new().with_rule(
            StyleRule::new(Selector::class("t").unwrap())
                .declaration("color", Value::var("size").unwrap())
                .unwrap(),
        );

        match compact(&sheet, &scheme, &VendorPrefixPolicy::none()) {
            Err(CompilerError::Property { selector, property, .. }) => {
                assert_eq!(selector, ".t");
                assert_eq!(property, "color");
            }
            other => panic!("expected property error, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_substitution_mismatch_is_property_error() {
        let scheme = DesignScheme::builder("odd")
            .bind("shade", Numeric::px(3.0).unwrap())
            .unwrap()
            .build()
            .unwrap();
        let shadow = value::Shadow::new(Numeric::zero(), Numeric::px(1.0).unwrap(), Value::var("shade").unwrap()).unwrap();
        let gradient = value::Gradient::linear(vec![
            value::ColorStop::new(Color::BLACK),
            value::ColorStop::new(Value::var("shade").unwrap()),
        ])
        .unwrap();

        let shadowed = Stylesheet::new().with_rule(
            StyleRule::new(Selector::class("s").unwrap()).declaration("box-shadow", shadow).unwrap(),
        );
        match compact(&shadowed, &scheme, &VendorPrefixPolicy::none()) {
            Err(CompilerError::Property { selector, property, .. }) => {
                assert_eq!(selector, ".s");
                assert_eq!(property, "box-shadow");
            }
            other => panic!("expected property error, got {:?}", other),
        }

        let painted = Stylesheet::new().with_rule(
            StyleRule::new(Selector::class("g").unwrap()).declaration("background-image", gradient).unwrap(),
        );
        match compact(&painted, &scheme, &VendorPrefixPolicy::none()) {
            Err(CompilerError::Property { selector, property, .. }) => {
                assert_eq!(selector, ".g");
                assert_eq!(property, "background-image");
            }
            other => panic!("expected property error, got {:?}", other),
        }
    }

    #[test]
    fn test_shorthand_then_longhand_override() {
        let rule = StyleRule::new(Selector::class("a").unwrap())
            .shorthand(Shorthand::Margin(vec![Numeric::px(1.0).unwrap().into()]))
            .unwrap()
            .declaration("margin-top", Numeric::px(9.0).unwrap())
            .unwrap();
        let sheet = Stylesheet::new().with_rule(rule);

        let css = compact(&sheet, &DesignScheme::empty(), &VendorPrefixPolicy::none()).unwrap();
        assert_eq!(css, ".a{margin-right:1px;margin-bottom:1px;margin-left:1px;margin-top:9px}");
    }

    #[test]
    fn test_shorthand_names_are_not_plain_declarations() {
        let pair = Value::list(
            vec![Numeric::px(1.0).unwrap().into(), Numeric::px(1.0).unwrap().into()],
            value::Separator::Space,
        )
        .unwrap();
        let result = StyleRule::new(Selector::class("a").unwrap()).declaration("margin", pair);
        match result {
            Err(CompilerError::Property { selector, property, .. }) => {
                assert_eq!(selector, ".a");
                assert_eq!(property, "margin");
            }
            other => panic!("expected property error, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_property_mode_keeps_declared_custom_property() {
        let registry = themes();
        let options = CompilerOptions {
            variable_mode: VariableMode::CustomProperties,
            ..CompilerOptions::default()
        };
        let rule = StyleRule::new(Selector::class("card").unwrap())
            .with_declaration(PropertyDeclaration::custom("text", Color::rgb(255, 0, 0).unwrap()).unwrap())
            .declaration("color", Value::var("text").unwrap())
            .unwrap();
        let sheet = Stylesheet::new().with_rule(rule);

        let (css, _) =
            compile_with_options(&sheet, &registry.get("dark").unwrap(), &VendorPrefixPolicy::none(), &options).unwrap();
        assert_eq!(css, ".card{--text:#ff0000;color:var(--text)}");
    }

    #[test]
    fn test_custom_property_mode() {
        let registry = themes();
        let options = CompilerOptions {
            variable_mode: VariableMode::CustomProperties,
            ..CompilerOptions::default()
        };

        let (css, _) =
            compile_with_options(&card_sheet(), &registry.get("dark").unwrap(), &VendorPrefixPolicy::none(), &options)
                .unwrap();
        assert_eq!(
            css,
            ".card{--text:#ffffff;--gap:4px;color:var(--text);margin-top:var(--gap)}"
        );
    }

    #[test]
    fn test_vendor_expansion_order_and_idempotency() {
        let rule = StyleRule::new(Selector::class("x").unwrap())
            .declaration("user-select", Value::keyword("none").unwrap())
            .unwrap();
        let sheet = Stylesheet::new().with_rule(rule);
        let policy = VendorPrefixPolicy::standard().with_targets([Vendor::Moz, Vendor::Webkit]).unwrap();

        let css = compact(&sheet, &DesignScheme::empty(), &policy).unwrap();
        assert_eq!(css, ".x{-webkit-user-select:none;-moz-user-select:none;user-select:none}");

        let declarations = sheet.rules()[0].declarations();
        let once = policy.expand(declarations).unwrap();
        let twice = policy.expand(&once).unwrap();
        assert_eq!(once.len(), 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_option_targets_replace_policy_targets() {
        let rule = StyleRule::new(Selector::class("row").unwrap())
            .declaration("display", Value::keyword("flex").unwrap())
            .unwrap();
        let sheet = Stylesheet::new().with_rule(rule);
        let options = CompilerOptions {
            vendor_targets: Some([Vendor::Webkit].into_iter().collect()),
            ..CompilerOptions::default()
        };

        let (css, stats) =
            compile_with_options(&sheet, &DesignScheme::empty(), &VendorPrefixPolicy::standard(), &options).unwrap();
        assert_eq!(css, ".row{display:-webkit-flex;display:flex}");
        assert_eq!(stats.prefixed_declarations, 1);
    }

    #[test]
    fn test_uncovered_vendor_target_is_policy_error() {
        let policy = VendorPrefixPolicy::new(vec![PrefixRule::property("appearance", &[Vendor::Webkit])]);
        let options = CompilerOptions {
            vendor_targets: Some([Vendor::Ms].into_iter().collect()),
            ..CompilerOptions::default()
        };

        let result = compile_with_options(&button_sheet(), &DesignScheme::empty(), &policy, &options);
        assert!(matches!(result, Err(CompilerError::PrefixPolicy { .. })));
    }

    #[test]
    fn test_keyframes_precede_rules_in_reference_order() {
        let frames = |opacity: f64| {
            vec![Keyframe::new(
                vec![FrameOffset::To],
                vec![PropertyDeclaration::new("opacity", Numeric::number(opacity).unwrap()).unwrap()],
            )
            .unwrap()]
        };

        let mut sheet = Stylesheet::new();
        sheet.add_keyframes(Keyframes::named("unused", frames(0.5)).unwrap()).unwrap();
        let fade = sheet.add_keyframes(Keyframes::named("fade", frames(1.0)).unwrap()).unwrap();
        sheet.add_rule(
            StyleRule::new(Selector::class("a").unwrap())
                .declaration("animation-name", fade)
                .unwrap(),
        );

        let (css, stats) =
            compile_with_options(&sheet, &DesignScheme::empty(), &VendorPrefixPolicy::none(), &CompilerOptions::default())
                .unwrap();
        assert_eq!(
            css,
            "@keyframes fade{to{opacity:1}}@keyframes unused{to{opacity:0.5}}.a{animation-name:fade}"
        );
        assert_eq!(stats.at_rules, 2);
    }

    #[test]
    fn test_nested_state_rule_and_empty_rules() {
        let button = StyleRule::new(Selector::class("btn").unwrap())
            .declaration("color", Color::BLACK)
            .unwrap()
            .nested(
                |selector| selector.state(PseudoClass::Hover),
                || Ok(vec![PropertyDeclaration::new("color", Color::WHITE)?]),
            )
            .unwrap();
        let empty = StyleRule::new(Selector::class("empty").unwrap());
        let sheet = Stylesheet::new().with_rule(button).with_rule(empty);

        let css = compact(&sheet, &DesignScheme::empty(), &VendorPrefixPolicy::none()).unwrap();
        assert_eq!(css, ".btn{color:#000000}.btn:hover{color:#ffffff}");
    }

    #[test]
    fn test_concurrent_compiles_per_theme() {
        let registry = themes();
        let sheet = card_sheet();
        let policy = VendorPrefixPolicy::none();
        let schemes: Vec<Arc<DesignScheme>> =
            registry.names().iter().filter_map(|name| registry.get(name)).collect();

        let sequential: Vec<String> = schemes
            .iter()
            .map(|scheme| compact(&sheet, scheme, &policy).unwrap())
            .collect();

        let (sheet, policy) = (&sheet, &policy);
        let concurrent: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = schemes
                .iter()
                .map(|scheme| scope.spawn(move || compact(sheet, scheme, policy).unwrap()))
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        assert_eq!(sequential, concurrent);
        assert_ne!(concurrent[0], concurrent[1]);
    }

    #[test]
    fn test_compile_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("button.css");

        let options = CompilerOptions {
            debug_mode: true,
            ..CompilerOptions::default()
        };
        let stats = compile_to_file(
            &button_sheet(),
            &DesignScheme::empty(),
            &VendorPrefixPolicy::none(),
            &options,
            &output_path,
        )
        .unwrap();

        let written = fs::read_to_string(&output_path).unwrap();
        assert_eq!(written, ".button{color:#ff0000;font-size:14px}");
        assert_eq!(stats.output_size, written.len());
    }

    #[test]
    fn test_failed_compile_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("card.css");

        let result = compile_to_file(
            &card_sheet(),
            &DesignScheme::empty(),
            &VendorPrefixPolicy::none(),
            &CompilerOptions::default(),
            &output_path,
        );
        assert!(matches!(result, Err(CompilerError::UnresolvedVariable { .. })));
        assert!(!output_path.exists());
    }

    #[test]
    fn test_stats_serialize() {
        let (_, stats) = compile_with_options(
            &button_sheet(),
            &DesignScheme::empty(),
            &VendorPrefixPolicy::none(),
            &CompilerOptions::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["emitted_rules"], 1);
        assert_eq!(json["declarations"], 2);
    }
}
