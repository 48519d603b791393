//! Typed stylesheet values
//!
//! Every value validates itself when it is constructed, so rendering a value
//! can never fail. Rendering is canonical: the same value always produces the
//! same text.

mod color;
mod font;
mod gradient;
mod numeric;
mod shadow;
mod unit;

pub use color::Color;
pub use font::Font;
pub use gradient::{ColorStop, Gradient, GradientShape, RadialShape};
pub use numeric::{CalcOp, MathFunction, Numeric};
pub use shadow::Shadow;
pub use unit::{Unit, UnitKind};

use crate::error::{CompilerError, Result};
use crate::utils::{is_identifier, is_variable_name, quote_string};
use crate::vendor::Vendor;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Space,
    Comma,
}

impl Separator {
    fn token(self) -> &'static str {
        match self {
            Separator::Space => " ",
            Separator::Comma => ",",
        }
    }
}

/// A two dimensional position such as a background origin
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub x: Numeric,
    pub y: Numeric,
}

impl Position {
    pub fn new(x: Numeric, y: Numeric) -> Result<Self> {
        for axis in [&x, &y] {
            let positional = axis
                .leaf_kinds()
                .iter()
                .all(|kind| matches!(kind, Some(UnitKind::Length) | Some(UnitKind::Percentage)));
            if !positional && !axis.is_zero() {
                return Err(CompilerError::value(format!("Position offset '{}' must be a length or percentage", axis)));
            }
        }
        Ok(Self { x, y })
    }

    pub fn center() -> Self {
        Self::percentages(50.0, 50.0)
    }

    pub fn top_left() -> Self {
        Self {
            x: Numeric::zero(),
            y: Numeric::zero(),
        }
    }

    pub fn bottom_right() -> Self {
        Self::percentages(100.0, 100.0)
    }

    fn percentages(x: f64, y: f64) -> Self {
        Self {
            x: Numeric::Dimension { amount: x, unit: Some(Unit::Percent) },
            y: Numeric::Dimension { amount: y, unit: Some(Unit::Percent) },
        }
    }
}

/// A typed value.
///
/// Prefer the validating constructors (`Value::keyword`, `Value::var`,
/// `Value::list` and the `From` impls). Variants built by hand are accepted
/// for matching convenience and re-checked by [`Value::check`] when a
/// declaration or scheme binding takes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Numeric(Numeric),
    Color(Color),
    Gradient(Gradient),
    Shadow(Shadow),
    Font(Font),
    Keyword(String),
    Str(String),
    Position(Position),
    List(Vec<Value>, Separator),
    /// Reference to a design scheme variable, resolved at compile time
    Var(String),
    /// Reference to a keyframes block by name
    Frames(String),
}

impl Value {
    pub fn keyword(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if !is_identifier(&token)? {
            return Err(CompilerError::value(format!("'{}' is not a valid keyword", token)));
        }
        Ok(Value::Keyword(token))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::Str(text.into())
    }

    pub fn var(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_variable_name(&name)? {
            return Err(CompilerError::value(format!("'{}' is not a valid variable name", name)));
        }
        Ok(Value::Var(name))
    }

    pub fn frames(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_identifier(&name)? {
            return Err(CompilerError::value(format!("'{}' is not a valid keyframes name", name)));
        }
        Ok(Value::Frames(name))
    }

    pub fn list(values: Vec<Value>, separator: Separator) -> Result<Self> {
        if values.is_empty() {
            return Err(CompilerError::value("Value list must not be empty"));
        }
        Ok(Value::List(values, separator))
    }

    /// Re-check the invariants the constructors enforce
    pub fn check(&self) -> Result<()> {
        match self {
            Value::Numeric(numeric) => numeric.check(),
            Value::Keyword(token) => Value::keyword(token.as_str()).map(|_| ()),
            Value::Var(name) => Value::var(name.as_str()).map(|_| ()),
            Value::Frames(name) => Value::frames(name.as_str()).map(|_| ()),
            Value::Position(position) => Position::new(position.x.clone(), position.y.clone()).map(|_| ()),
            Value::Gradient(gradient) => gradient.stops().iter().try_for_each(|stop| {
                stop.color.check()?;
                stop.position.as_ref().map_or(Ok(()), Numeric::check)
            }),
            Value::Shadow(shadow) => shadow.color().check(),
            Value::List(values, _) => {
                if values.is_empty() {
                    return Err(CompilerError::value("Value list must not be empty"));
                }
                values.iter().try_for_each(Value::check)
            }
            Value::Color(_) | Value::Font(_) | Value::Str(_) => Ok(()),
        }
    }

    /// Short name of the variant, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Numeric(_) => "numeric",
            Value::Color(_) => "color",
            Value::Gradient(_) => "gradient",
            Value::Shadow(_) => "shadow",
            Value::Font(_) => "font",
            Value::Keyword(_) => "keyword",
            Value::Str(_) => "string",
            Value::Position(_) => "position",
            Value::List(..) => "list",
            Value::Var(_) => "variable",
            Value::Frames(_) => "keyframes reference",
        }
    }

    /// Names of every variable referenced by this value, in order of appearance
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Value::Var(name) => names.push(name),
            Value::Gradient(gradient) => {
                for stop in gradient.stops() {
                    stop.color.collect_variables(names);
                }
            }
            Value::Shadow(shadow) => shadow.color().collect_variables(names),
            Value::List(values, _) => {
                for value in values {
                    value.collect_variables(names);
                }
            }
            _ => {}
        }
    }

    /// Names of every keyframes block referenced by this value
    pub fn frames_references(&self) -> Vec<&str> {
        match self {
            Value::Frames(name) => vec![name.as_str()],
            Value::List(values, _) => values.iter().flat_map(Value::frames_references).collect(),
            _ => Vec::new(),
        }
    }

    /// Replace every variable reference with the value produced by `resolve`
    pub fn substitute<F>(&self, resolve: &mut F) -> Result<Value>
    where
        F: FnMut(&str) -> Result<Value>,
    {
        match self {
            Value::Var(name) => resolve(name),
            Value::Gradient(gradient) => {
                let mut colors = Vec::with_capacity(gradient.stops().len());
                for stop in gradient.stops() {
                    colors.push(stop.color.substitute(resolve)?);
                }
                Ok(Value::Gradient(gradient.with_stop_colors(colors)?))
            }
            Value::Shadow(shadow) => {
                let color = shadow.color().substitute(resolve)?;
                Ok(Value::Shadow(shadow.with_color(color)?))
            }
            Value::List(values, separator) => {
                let mut substituted = Vec::with_capacity(values.len());
                for value in values {
                    substituted.push(value.substitute(resolve)?);
                }
                Ok(Value::List(substituted, *separator))
            }
            other => Ok(other.clone()),
        }
    }

    /// Does this value render differently for a vendor (calc, gradients)?
    pub fn has_vendor_form(&self) -> bool {
        match self {
            Value::Numeric(numeric) => numeric.has_vendor_form(),
            Value::Gradient(_) => true,
            Value::List(values, _) => values.iter().any(Value::has_vendor_form),
            _ => false,
        }
    }

    /// Render the value, using the legacy prefixed form for `vendor` when given
    pub fn render(&self, vendor: Option<Vendor>) -> String {
        match self {
            Value::Numeric(numeric) => numeric.render(vendor),
            Value::Color(color) => color.to_string(),
            Value::Gradient(gradient) => gradient.render(vendor),
            Value::Shadow(shadow) => shadow.render(),
            Value::Font(font) => font.render(),
            Value::Keyword(token) => token.clone(),
            Value::Str(text) => quote_string(text),
            Value::Position(position) => format!("{} {}", position.x, position.y),
            Value::List(values, separator) => values
                .iter()
                .map(|value| value.render(vendor))
                .collect::<Vec<_>>()
                .join(separator.token()),
            Value::Var(name) => format!("var(--{})", name),
            Value::Frames(name) => name.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

impl From<Numeric> for Value {
    fn from(value: Numeric) -> Self {
        Value::Numeric(value)
    }
}

impl From<Color> for Value {
    fn from(value: Color) -> Self {
        Value::Color(value)
    }
}

impl From<Gradient> for Value {
    fn from(value: Gradient) -> Self {
        Value::Gradient(value)
    }
}

impl From<Shadow> for Value {
    fn from(value: Shadow) -> Self {
        Value::Shadow(value)
    }
}

impl From<Font> for Value {
    fn from(value: Font) -> Self {
        Value::Font(value)
    }
}

impl From<Position> for Value {
    fn from(value: Position) -> Self {
        Value::Position(value)
    }
}
