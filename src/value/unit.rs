//! Measurement units

use std::fmt;

/// Broad family a unit belongs to; property validation works on families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Length,
    Percentage,
    Angle,
    Time,
    Flex,
    Resolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    // Absolute lengths
    Px,
    Pt,
    Pc,
    Cm,
    Mm,
    In,

    // Font relative lengths
    Em,
    Rem,
    Ex,
    Ch,
    Lh,

    // Viewport lengths
    Vw,
    Vh,
    Vmin,
    Vmax,
    Dvw,
    Dvh,

    Percent,

    // Angles
    Deg,
    Rad,
    Grad,
    Turn,

    // Times
    S,
    Ms,

    Fr,

    // Resolutions
    Dpi,
    Dppx,
}

impl Unit {
    pub fn token(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Pt => "pt",
            Unit::Pc => "pc",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::In => "in",
            Unit::Em => "em",
            Unit::Rem => "rem",
            Unit::Ex => "ex",
            Unit::Ch => "ch",
            Unit::Lh => "lh",
            Unit::Vw => "vw",
            Unit::Vh => "vh",
            Unit::Vmin => "vmin",
            Unit::Vmax => "vmax",
            Unit::Dvw => "dvw",
            Unit::Dvh => "dvh",
            Unit::Percent => "%",
            Unit::Deg => "deg",
            Unit::Rad => "rad",
            Unit::Grad => "grad",
            Unit::Turn => "turn",
            Unit::S => "s",
            Unit::Ms => "ms",
            Unit::Fr => "fr",
            Unit::Dpi => "dpi",
            Unit::Dppx => "dppx",
        }
    }

    pub fn kind(self) -> UnitKind {
        match self {
            Unit::Percent => UnitKind::Percentage,
            Unit::Deg | Unit::Rad | Unit::Grad | Unit::Turn => UnitKind::Angle,
            Unit::S | Unit::Ms => UnitKind::Time,
            Unit::Fr => UnitKind::Flex,
            Unit::Dpi | Unit::Dppx => UnitKind::Resolution,
            _ => UnitKind::Length,
        }
    }

    /// Convert an amount expressed in this angle unit to degrees
    pub fn to_degrees(self, amount: f64) -> Option<f64> {
        match self {
            Unit::Deg => Some(amount),
            Unit::Rad => Some(amount.to_degrees()),
            Unit::Grad => Some(amount * 0.9),
            Unit::Turn => Some(amount * 360.0),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
