//! Numeric values: dimensions, calc() expressions and math functions

use super::unit::{Unit, UnitKind};
use crate::error::{CompilerError, Result};
use crate::utils::format_number;
use crate::vendor::Vendor;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl CalcOp {
    fn token(self) -> &'static str {
        match self {
            CalcOp::Add => " + ",
            CalcOp::Subtract => " - ",
            CalcOp::Multiply => " * ",
            CalcOp::Divide => " / ",
        }
    }

    fn binds_tightly(self) -> bool {
        matches!(self, CalcOp::Multiply | CalcOp::Divide)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFunction {
    Min,
    Max,
    Clamp,
}

impl MathFunction {
    fn name(self) -> &'static str {
        match self {
            MathFunction::Min => "min",
            MathFunction::Max => "max",
            MathFunction::Clamp => "clamp",
        }
    }
}

/// A number with an optional unit, or an arithmetic expression over such numbers.
///
/// The variants are public for matching. Build values through [`Numeric::new`],
/// the unit helpers and the arithmetic methods; a raw variant is re-checked by
/// [`Numeric::check`] when it reaches a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Dimension { amount: f64, unit: Option<Unit> },
    Calc { lhs: Box<Numeric>, op: CalcOp, rhs: Box<Numeric> },
    Function { function: MathFunction, args: Vec<Numeric> },
}

impl Numeric {
    pub fn new(amount: f64, unit: Unit) -> Result<Self> {
        Self::dimension(amount, Some(unit))
    }

    /// A unitless number
    pub fn number(amount: f64) -> Result<Self> {
        Self::dimension(amount, None)
    }

    pub fn zero() -> Self {
        Numeric::Dimension { amount: 0.0, unit: None }
    }

    pub fn px(amount: f64) -> Result<Self> {
        Self::new(amount, Unit::Px)
    }

    pub fn em(amount: f64) -> Result<Self> {
        Self::new(amount, Unit::Em)
    }

    pub fn rem(amount: f64) -> Result<Self> {
        Self::new(amount, Unit::Rem)
    }

    pub fn percent(amount: f64) -> Result<Self> {
        Self::new(amount, Unit::Percent)
    }

    pub fn deg(amount: f64) -> Result<Self> {
        Self::new(amount, Unit::Deg)
    }

    pub fn seconds(amount: f64) -> Result<Self> {
        Self::new(amount, Unit::S)
    }

    pub fn millis(amount: f64) -> Result<Self> {
        Self::new(amount, Unit::Ms)
    }

    fn dimension(amount: f64, unit: Option<Unit>) -> Result<Self> {
        if !amount.is_finite() {
            return Err(CompilerError::value(format!("Numeric amount must be finite, got {}", amount)));
        }
        Ok(Numeric::Dimension { amount, unit })
    }

    /// Re-check finiteness and function arity over the whole expression
    pub fn check(&self) -> Result<()> {
        match self {
            Numeric::Dimension { amount, unit } => Self::dimension(*amount, *unit).map(|_| ()),
            Numeric::Calc { lhs, rhs, .. } => {
                lhs.check()?;
                rhs.check()
            }
            Numeric::Function { function, args } => {
                let required = if *function == MathFunction::Clamp { 3 } else { 1 };
                Self::function(*function, args.clone(), required)?;
                args.iter().try_for_each(Numeric::check)
            }
        }
    }

    /// The smallest of the given values, `min(a,b,...)`
    pub fn min(args: Vec<Numeric>) -> Result<Self> {
        Self::function(MathFunction::Min, args, 1)
    }

    /// The largest of the given values, `max(a,b,...)`
    pub fn max(args: Vec<Numeric>) -> Result<Self> {
        Self::function(MathFunction::Max, args, 1)
    }

    /// `clamp(min,preferred,max)`
    pub fn clamp(min: Numeric, preferred: Numeric, max: Numeric) -> Result<Self> {
        Self::function(MathFunction::Clamp, vec![min, preferred, max], 3)
    }

    fn function(function: MathFunction, args: Vec<Numeric>, required: usize) -> Result<Self> {
        let arity_ok = match function {
            MathFunction::Clamp => args.len() == required,
            _ => args.len() >= required,
        };
        if !arity_ok {
            return Err(CompilerError::value(format!(
                "{}() received {} arguments",
                function.name(),
                args.len()
            )));
        }
        Ok(Numeric::Function { function, args })
    }

    pub fn plus(&self, other: &Numeric) -> Numeric {
        self.combine(CalcOp::Add, other)
    }

    pub fn minus(&self, other: &Numeric) -> Numeric {
        self.combine(CalcOp::Subtract, other)
    }

    pub fn times(&self, factor: f64) -> Result<Numeric> {
        let factor = Numeric::number(factor)?;
        Ok(self.combine(CalcOp::Multiply, &factor))
    }

    pub fn divide(&self, divisor: f64) -> Result<Numeric> {
        if divisor == 0.0 {
            return Err(CompilerError::value(format!("Cannot divide {} by zero", self)));
        }
        let divisor = Numeric::number(divisor)?;
        Ok(self.combine(CalcOp::Divide, &divisor))
    }

    pub fn negate(&self) -> Numeric {
        match self {
            Numeric::Dimension { amount, unit } => Numeric::Dimension { amount: -amount, unit: *unit },
            other => other.combine(CalcOp::Multiply, &Numeric::Dimension { amount: -1.0, unit: None }),
        }
    }

    fn combine(&self, op: CalcOp, other: &Numeric) -> Numeric {
        if let (
            Numeric::Dimension { amount: a, unit: ua },
            Numeric::Dimension { amount: b, unit: ub },
        ) = (self, other)
        {
            match op {
                CalcOp::Add | CalcOp::Subtract => {
                    let b = if op == CalcOp::Add { *b } else { -b };
                    if ua == ub {
                        return Numeric::Dimension { amount: a + b, unit: *ua };
                    }
                    if *a == 0.0 && ua.is_none() {
                        return Numeric::Dimension { amount: b, unit: *ub };
                    }
                    if b == 0.0 && ub.is_none() {
                        return self.clone();
                    }
                }
                CalcOp::Multiply if ub.is_none() => {
                    return Numeric::Dimension { amount: a * b, unit: *ua };
                }
                CalcOp::Divide if ub.is_none() && *b != 0.0 => {
                    return Numeric::Dimension { amount: a / b, unit: *ua };
                }
                _ => {}
            }
        }

        Numeric::Calc {
            lhs: Box::new(self.clone()),
            op,
            rhs: Box::new(other.clone()),
        }
    }

    pub fn amount(&self) -> Option<f64> {
        match self {
            Numeric::Dimension { amount, .. } => Some(*amount),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<Unit> {
        match self {
            Numeric::Dimension { unit, .. } => *unit,
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Numeric::Dimension { amount, .. } if *amount == 0.0)
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Numeric::Dimension { amount, .. } if *amount < 0.0)
    }

    /// Unit families of every leaf; `None` marks a unitless number
    pub fn leaf_kinds(&self) -> Vec<Option<UnitKind>> {
        let mut kinds = Vec::new();
        self.collect_kinds(&mut kinds);
        kinds
    }

    fn collect_kinds(&self, kinds: &mut Vec<Option<UnitKind>>) {
        match self {
            Numeric::Dimension { unit, .. } => kinds.push(unit.map(Unit::kind)),
            Numeric::Calc { lhs, rhs, .. } => {
                lhs.collect_kinds(kinds);
                rhs.collect_kinds(kinds);
            }
            Numeric::Function { args, .. } => {
                for arg in args {
                    arg.collect_kinds(kinds);
                }
            }
        }
    }

    /// Does rendering this value differ for vendors (a top level `calc()`)?
    pub fn has_vendor_form(&self) -> bool {
        matches!(self, Numeric::Calc { .. })
    }

    pub fn render(&self, vendor: Option<Vendor>) -> String {
        match self {
            Numeric::Dimension { amount, unit } => render_dimension(*amount, *unit),
            Numeric::Calc { .. } => {
                let prefix = vendor.map(Vendor::prefix).unwrap_or("");
                format!("{}calc({})", prefix, self.expression())
            }
            Numeric::Function { function, args } => {
                let args: Vec<String> = args.iter().map(|arg| arg.render(None)).collect();
                format!("{}({})", function.name(), args.join(","))
            }
        }
    }

    /// Body of a calc() expression; nested calcs are flattened into it
    fn expression(&self) -> String {
        match self {
            Numeric::Calc { lhs, op, rhs } => {
                let left = lhs.operand(*op, false);
                let right = rhs.operand(*op, true);
                format!("{}{}{}", left, op.token(), right)
            }
            other => other.render(None),
        }
    }

    fn operand(&self, parent: CalcOp, right_side: bool) -> String {
        match self {
            Numeric::Calc { op, .. } => {
                let needs_parens = (parent.binds_tightly() && !op.binds_tightly())
                    || (right_side && matches!(parent, CalcOp::Subtract | CalcOp::Divide) && op.binds_tightly() == parent.binds_tightly());
                if needs_parens {
                    format!("({})", self.expression())
                } else {
                    self.expression()
                }
            }
            other => other.render(None),
        }
    }
}

fn render_dimension(amount: f64, unit: Option<Unit>) -> String {
    let number = format_number(amount);
    match unit {
        Some(unit) if number != "0" => format!("{}{}", number, unit),
        _ => number,
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_rendering() {
        assert_eq!(Numeric::px(14.0).unwrap().to_string(), "14px");
        assert_eq!(Numeric::em(1.25).unwrap().to_string(), "1.25em");
        assert_eq!(Numeric::percent(50.0).unwrap().to_string(), "50%");
        assert_eq!(Numeric::px(0.0).unwrap().to_string(), "0");
        assert_eq!(Numeric::number(1.5).unwrap().to_string(), "1.5");
    }

    #[test]
    fn test_non_finite_amount_rejected() {
        assert!(matches!(Numeric::px(f64::NAN), Err(CompilerError::Value { .. })));
        assert!(Numeric::number(f64::INFINITY).is_err());
    }

    #[test]
    fn test_same_unit_arithmetic_folds() {
        let a = Numeric::px(10.0).unwrap();
        let b = Numeric::px(4.5).unwrap();
        assert_eq!(a.plus(&b).to_string(), "14.5px");
        assert_eq!(a.minus(&b).to_string(), "5.5px");
        assert_eq!(a.times(3.0).unwrap().to_string(), "30px");
        assert_eq!(a.divide(4.0).unwrap().to_string(), "2.5px");
        assert_eq!(a.negate().to_string(), "-10px");
    }

    #[test]
    fn test_mixed_units_build_calc() {
        let full = Numeric::percent(100.0).unwrap();
        let gap = Numeric::px(10.0).unwrap();
        let arrow = Numeric::em(1.0).unwrap();

        let value = full.minus(&gap).plus(&arrow);
        assert_eq!(value.to_string(), "calc(100% - 10px + 1em)");
        assert!(value.has_vendor_form());
        assert_eq!(value.render(Some(Vendor::Webkit)), "-webkit-calc(100% - 10px + 1em)");
    }

    #[test]
    fn test_calc_precedence_parentheses() {
        let sum = Numeric::percent(100.0).unwrap().minus(&Numeric::px(20.0).unwrap());
        let half = sum.divide(2.0).unwrap();
        assert_eq!(half.to_string(), "calc((100% - 20px) / 2)");

        let nested = Numeric::px(10.0).unwrap().minus(&sum);
        assert_eq!(nested.to_string(), "calc(10px - (100% - 20px))");
    }

    #[test]
    fn test_divide_by_zero_is_value_error() {
        let result = Numeric::px(10.0).unwrap().divide(0.0);
        assert!(matches!(result, Err(CompilerError::Value { .. })));
    }

    #[test]
    fn test_math_functions() {
        let value = Numeric::min(vec![Numeric::percent(50.0).unwrap(), Numeric::px(300.0).unwrap()]).unwrap();
        assert_eq!(value.to_string(), "min(50%,300px)");
        assert!(!value.has_vendor_form());

        let clamp = Numeric::clamp(
            Numeric::rem(1.0).unwrap(),
            Numeric::new(2.5, Unit::Vw).unwrap(),
            Numeric::rem(2.0).unwrap(),
        )
        .unwrap();
        assert_eq!(clamp.to_string(), "clamp(1rem,2.5vw,2rem)");

        assert!(Numeric::max(vec![]).is_err());
    }

    #[test]
    fn test_leaf_kinds() {
        let value = Numeric::percent(100.0).unwrap().minus(&Numeric::px(1.0).unwrap());
        assert_eq!(value.leaf_kinds(), vec![Some(UnitKind::Percentage), Some(UnitKind::Length)]);
    }
}
