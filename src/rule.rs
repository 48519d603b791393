//! Style rules, keyframes at-rules and the stylesheet that registers them

use crate::error::{CompilerError, Result};
use crate::property::{PropertyDeclaration, Shorthand};
use crate::selector::Selector;
use crate::utils::{format_number, is_identifier};
use crate::value::Value;
use std::fmt;

/// Position of a keyframe within an animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOffset {
    From,
    To,
    Percent(f64),
}

impl FrameOffset {
    pub fn percent(amount: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&amount) {
            return Err(CompilerError::construction(format!(
                "Keyframe offset {}% is outside 0% to 100%",
                amount
            )));
        }
        Ok(FrameOffset::Percent(amount))
    }
}

impl fmt::Display for FrameOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameOffset::From => write!(f, "from"),
            FrameOffset::To => write!(f, "to"),
            FrameOffset::Percent(amount) => write!(f, "{}%", format_number(*amount)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    offsets: Vec<FrameOffset>,
    declarations: Vec<PropertyDeclaration>,
}

impl Keyframe {
    pub fn new(offsets: Vec<FrameOffset>, declarations: Vec<PropertyDeclaration>) -> Result<Self> {
        if offsets.is_empty() {
            return Err(CompilerError::construction("Keyframe needs at least one offset"));
        }
        Ok(Self { offsets, declarations })
    }

    pub fn offsets(&self) -> &[FrameOffset] {
        &self.offsets
    }

    pub fn declarations(&self) -> &[PropertyDeclaration] {
        &self.declarations
    }

    pub fn selector_text(&self) -> String {
        self.offsets.iter().map(|o| o.to_string()).collect::<Vec<_>>().join(",")
    }

    pub(crate) fn with_declarations(&self, declarations: Vec<PropertyDeclaration>) -> Self {
        Self {
            offsets: self.offsets.clone(),
            declarations,
        }
    }
}

/// A named `@keyframes` block
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    name: String,
    frames: Vec<Keyframe>,
}

impl Keyframes {
    pub fn named(name: impl Into<String>, frames: Vec<Keyframe>) -> Result<Self> {
        let name = name.into();
        if !is_identifier(&name)? {
            return Err(CompilerError::construction(format!("'{}' is not a valid keyframes name", name)));
        }
        Self::check_frames(&name, &frames)?;
        Ok(Self { name, frames })
    }

    /// Keyframes named after a digest of their content, so equal frames share a name
    pub fn anonymous(frames: Vec<Keyframe>) -> Result<Self> {
        let digest = format!("{:x}", md5::compute(frames_text(&frames)));
        let name = format!("frames-{}", &digest[..10]);
        Self::check_frames(&name, &frames)?;
        Ok(Self { name, frames })
    }

    fn check_frames(name: &str, frames: &[Keyframe]) -> Result<()> {
        if frames.is_empty() {
            return Err(CompilerError::construction(format!("Keyframes '{}' have no frames", name)));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[Keyframe] {
        &self.frames
    }

    /// A value referencing these keyframes, for `animation-name`
    pub fn reference(&self) -> Value {
        Value::Frames(self.name.clone())
    }

    pub(crate) fn with_frames(&self, frames: Vec<Keyframe>) -> Self {
        Self {
            name: self.name.clone(),
            frames,
        }
    }
}

/// Compact text of the frames, used to derive anonymous names
fn frames_text(frames: &[Keyframe]) -> String {
    let mut text = String::new();
    for frame in frames {
        text.push_str(&frame.selector_text());
        text.push('{');
        for declaration in &frame.declarations {
            text.push_str(declaration.name());
            text.push(':');
            text.push_str(&declaration.render_value());
            text.push(';');
        }
        text.push('}');
    }
    text
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    selector: Selector,
    declarations: Vec<PropertyDeclaration>,
    at_rules: Vec<Keyframes>,
    children: Vec<StyleRule>,
}

impl StyleRule {
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            declarations: Vec::new(),
            at_rules: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Build a rule from a body that returns its declarations
    pub fn declare<F>(selector: Selector, body: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Vec<PropertyDeclaration>>,
    {
        let declarations = body().map_err(|e| e.within(&selector.to_string()))?;
        Ok(Self {
            declarations,
            ..Self::new(selector)
        })
    }

    pub fn declaration(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        let declaration = PropertyDeclaration::new(name, value).map_err(|e| e.within(&self.selector.to_string()))?;
        self.declarations.push(declaration);
        Ok(self)
    }

    pub fn with_declaration(mut self, declaration: PropertyDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn shorthand(mut self, shorthand: Shorthand) -> Result<Self> {
        let longhands = shorthand.expand().map_err(|e| e.within(&self.selector.to_string()))?;
        self.declarations.extend(longhands);
        Ok(self)
    }

    /// Nest a keyframes block; it is hoisted to the top level when compiled
    pub fn with_keyframes(mut self, keyframes: Keyframes) -> Self {
        self.at_rules.push(keyframes);
        self
    }

    pub fn with_child(mut self, child: StyleRule) -> Self {
        self.children.push(child);
        self
    }

    /// Add a child rule whose selector is derived from this rule's selector,
    /// such as its `:hover` state
    pub fn nested<S, F>(self, derive: S, body: F) -> Result<Self>
    where
        S: FnOnce(&Selector) -> Result<Selector>,
        F: FnOnce() -> Result<Vec<PropertyDeclaration>>,
    {
        let selector = derive(&self.selector)?;
        let child = StyleRule::declare(selector, body)?;
        Ok(self.with_child(child))
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn declarations(&self) -> &[PropertyDeclaration] {
        &self.declarations
    }

    pub fn at_rules(&self) -> &[Keyframes] {
        &self.at_rules
    }

    pub fn children(&self) -> &[StyleRule] {
        &self.children
    }
}

/// The registered rules and keyframes a compile runs over
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    rules: Vec<StyleRule>,
    keyframes: Vec<Keyframes>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, rule: StyleRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rule(mut self, rule: StyleRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Register keyframes at the top level and return a reference to them.
    ///
    /// Registering identical keyframes twice is a no-op; different keyframes
    /// under one name are rejected.
    pub fn add_keyframes(&mut self, keyframes: Keyframes) -> Result<Value> {
        let reference = keyframes.reference();
        match self.keyframes.iter().find(|existing| existing.name == keyframes.name) {
            Some(existing) if *existing == keyframes => {}
            Some(_) => {
                return Err(CompilerError::construction(format!(
                    "Keyframes '{}' are already registered with different frames",
                    keyframes.name
                )))
            }
            None => self.keyframes.push(keyframes),
        }
        Ok(reference)
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn keyframes(&self) -> &[Keyframes] {
        &self.keyframes
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.keyframes.is_empty()
    }
}
