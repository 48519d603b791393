//! Box and text shadows

use super::numeric::Numeric;
use super::unit::UnitKind;
use super::Value;
use crate::error::{CompilerError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    offset_x: Numeric,
    offset_y: Numeric,
    blur: Numeric,
    spread: Numeric,
    color: Box<Value>,
    inset: bool,
}

impl Shadow {
    /// A shadow with the given offsets and color; blur and spread start at zero
    pub fn new(offset_x: Numeric, offset_y: Numeric, color: impl Into<Value>) -> Result<Self> {
        check_length("offset-x", &offset_x)?;
        check_length("offset-y", &offset_y)?;
        let color = color.into();
        check_color(&color)?;

        Ok(Self {
            offset_x,
            offset_y,
            blur: Numeric::zero(),
            spread: Numeric::zero(),
            color: Box::new(color),
            inset: false,
        })
    }

    pub fn blur(self, blur: Numeric) -> Result<Self> {
        check_length("blur", &blur)?;
        if blur.is_negative() {
            return Err(CompilerError::value(format!("Shadow blur radius must not be negative, got {}", blur)));
        }
        Ok(Self { blur, ..self })
    }

    pub fn spread(self, spread: Numeric) -> Result<Self> {
        check_length("spread", &spread)?;
        Ok(Self { spread, ..self })
    }

    pub fn inset(self) -> Self {
        Self { inset: true, ..self }
    }

    pub fn color(&self) -> &Value {
        &self.color
    }

    pub fn is_inset(&self) -> bool {
        self.inset
    }

    pub(crate) fn with_color(&self, color: Value) -> Result<Self> {
        check_color(&color)?;
        Ok(Self {
            color: Box::new(color),
            ..self.clone()
        })
    }

    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(6);
        if self.inset {
            parts.push("inset".to_string());
        }
        parts.push(self.offset_x.to_string());
        parts.push(self.offset_y.to_string());
        parts.push(self.blur.to_string());
        parts.push(self.spread.to_string());
        parts.push(self.color.render(None));
        parts.join(" ")
    }
}

fn check_length(name: &str, value: &Numeric) -> Result<()> {
    let is_length = value.leaf_kinds().iter().all(|kind| *kind == Some(UnitKind::Length));
    if is_length || value.is_zero() {
        Ok(())
    } else {
        Err(CompilerError::value(format!("Shadow {} '{}' must be a length", name, value)))
    }
}

fn check_color(color: &Value) -> Result<()> {
    match color {
        Value::Color(_) | Value::Var(_) => Ok(()),
        other => Err(CompilerError::value(format!(
            "Shadow color '{}' is not a color",
            other.render(None)
        ))),
    }
}
