//! Linear and radial gradients

use super::numeric::Numeric;
use super::unit::{Unit, UnitKind};
use super::Value;
use crate::error::{CompilerError, Result};
use crate::vendor::Vendor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialShape {
    Circle,
    Ellipse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GradientShape {
    Linear { angle: Option<Numeric> },
    Radial { shape: RadialShape },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    pub color: Value,
    pub position: Option<Numeric>,
}

impl ColorStop {
    pub fn new(color: impl Into<Value>) -> Self {
        Self {
            color: color.into(),
            position: None,
        }
    }

    pub fn at(color: impl Into<Value>, position: Numeric) -> Self {
        Self {
            color: color.into(),
            position: Some(position),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    shape: GradientShape,
    repeating: bool,
    stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn linear(stops: Vec<ColorStop>) -> Result<Self> {
        Self::build(GradientShape::Linear { angle: None }, stops)
    }

    pub fn radial(shape: RadialShape, stops: Vec<ColorStop>) -> Result<Self> {
        Self::build(GradientShape::Radial { shape }, stops)
    }

    fn build(shape: GradientShape, stops: Vec<ColorStop>) -> Result<Self> {
        if stops.len() < 2 {
            return Err(CompilerError::value(format!(
                "Gradient needs at least two color stops, got {}",
                stops.len()
            )));
        }

        for stop in &stops {
            check_stop(stop)?;
        }

        Ok(Self {
            shape,
            repeating: false,
            stops,
        })
    }

    /// Set the direction of a linear gradient; the angle must use an angle unit
    pub fn with_angle(self, angle: Numeric) -> Result<Self> {
        let is_angle = !angle.leaf_kinds().is_empty()
            && angle.leaf_kinds().iter().all(|kind| *kind == Some(UnitKind::Angle));
        if !is_angle && !angle.is_zero() {
            return Err(CompilerError::value(format!("Gradient angle '{}' is not an angle", angle)));
        }

        match self.shape {
            GradientShape::Linear { .. } => Ok(Self {
                shape: GradientShape::Linear { angle: Some(angle) },
                ..self
            }),
            GradientShape::Radial { .. } => Err(CompilerError::value("Radial gradients have no angle")),
        }
    }

    pub fn repeating(self) -> Self {
        Self { repeating: true, ..self }
    }

    pub fn shape(&self) -> &GradientShape {
        &self.shape
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    /// Rebuild with the given stop colors, keeping positions and shape
    pub(crate) fn with_stop_colors(&self, colors: Vec<Value>) -> Result<Self> {
        let stops = self
            .stops
            .iter()
            .zip(colors)
            .map(|(stop, color)| ColorStop {
                color,
                position: stop.position.clone(),
            })
            .collect();
        let mut rebuilt = Self::build(self.shape.clone(), stops)?;
        rebuilt.repeating = self.repeating;
        Ok(rebuilt)
    }

    pub fn render(&self, vendor: Option<Vendor>) -> String {
        let mut out = String::new();

        if let Some(vendor) = vendor {
            out.push_str(vendor.prefix());
        }
        if self.repeating {
            out.push_str("repeating-");
        }

        match &self.shape {
            GradientShape::Linear { angle } => {
                out.push_str("linear-gradient(");
                if let Some(angle) = angle {
                    let rendered = match vendor {
                        Some(_) => legacy_angle(angle),
                        None => angle.to_string(),
                    };
                    out.push_str(&rendered);
                    out.push(',');
                }
            }
            GradientShape::Radial { shape } => {
                out.push_str("radial-gradient(");
                out.push_str(match shape {
                    RadialShape::Circle => "circle",
                    RadialShape::Ellipse => "ellipse",
                });
                out.push(',');
            }
        }

        let stops: Vec<String> = self
            .stops
            .iter()
            .map(|stop| match &stop.position {
                Some(position) => format!("{} {}", stop.color.render(None), position),
                None => stop.color.render(None),
            })
            .collect();
        out.push_str(&stops.join(","));
        out.push(')');

        out
    }
}

fn check_stop(stop: &ColorStop) -> Result<()> {
    match &stop.color {
        Value::Color(_) | Value::Var(_) => {}
        other => {
            return Err(CompilerError::value(format!(
                "Gradient stop '{}' is not a color",
                other.render(None)
            )))
        }
    }

    if let Some(position) = &stop.position {
        let positional = position
            .leaf_kinds()
            .iter()
            .all(|kind| matches!(kind, Some(UnitKind::Length) | Some(UnitKind::Percentage)));
        if !positional && !position.is_zero() {
            return Err(CompilerError::value(format!(
                "Gradient stop position '{}' must be a length or percentage",
                position
            )));
        }
    }

    Ok(())
}

/// Prefixed gradients measure angles from the east, counter-clockwise
fn legacy_angle(angle: &Numeric) -> String {
    let degrees = match (angle.amount(), angle.unit()) {
        (Some(amount), Some(unit)) => unit.to_degrees(amount),
        (Some(amount), None) if amount == 0.0 => Some(0.0),
        _ => None,
    };

    match degrees {
        Some(degrees) => Numeric::Dimension {
            amount: (90.0 - degrees).rem_euclid(360.0),
            unit: Some(Unit::Deg),
        }
        .to_string(),
        None => angle.to_string(),
    }
}
