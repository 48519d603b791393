//! Shorthand and closed property families
//!
//! Each shorthand expands into its longhands in a fixed order. A later
//! longhand in the same rule overrides the matching component because the
//! merge keeps the last declaration of every property name.
//!
//! | shorthand    | longhands, in order                                                     |
//! |--------------|-------------------------------------------------------------------------|
//! | `margin`     | `margin-top`, `margin-right`, `margin-bottom`, `margin-left`            |
//! | `padding`    | `padding-top`, `padding-right`, `padding-bottom`, `padding-left`        |
//! | `border`     | `border[-side]-width`, `border[-side]-style`, `border[-side]-color`     |
//! | `flex`       | `flex-grow`, `flex-shrink`, `flex-basis`                                |
//! | `font`       | `font-style`, `font-weight`, `font-size`, `line-height`, `font-family`  |
//! | `transition` | `transition-property`, `-duration`, `-timing-function`, `-delay`        |
//! | `overflow`   | `overflow-x`, `overflow-y`                                              |
//! | `gap`        | `row-gap`, `column-gap`                                                 |

use super::PropertyDeclaration;
use crate::error::{CompilerError, Result};
use crate::value::{Font, Numeric, Separator, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn name(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    None,
    Hidden,
    Dotted,
    Dashed,
    Solid,
    Double,
    Groove,
    Ridge,
    Inset,
    Outset,
}

impl BorderStyle {
    pub fn keyword(self) -> &'static str {
        match self {
            BorderStyle::None => "none",
            BorderStyle::Hidden => "hidden",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Solid => "solid",
            BorderStyle::Double => "double",
            BorderStyle::Groove => "groove",
            BorderStyle::Ridge => "ridge",
            BorderStyle::Inset => "inset",
            BorderStyle::Outset => "outset",
        }
    }

    fn value(self) -> Value {
        Value::Keyword(self.keyword().to_string())
    }
}

/// One member of the border family, applied to every side or a single one
#[derive(Debug, Clone, PartialEq)]
pub enum Border {
    Width(Numeric),
    Style(BorderStyle),
    Color(Value),
}

impl Border {
    pub fn declare(self, side: Option<Side>) -> Result<PropertyDeclaration> {
        let (member, value) = match self {
            Border::Width(width) => ("width", Value::Numeric(width)),
            Border::Style(style) => ("style", style.value()),
            Border::Color(color) => ("color", color),
        };
        let name = match side {
            Some(side) => format!("border-{}-{}", side.name(), member),
            None => format!("border-{}", member),
        };
        PropertyDeclaration::new(name, value)
    }
}

/// The display sizing family
#[derive(Debug, Clone, PartialEq)]
pub enum Sizing {
    Width(Value),
    Height(Value),
    MinWidth(Value),
    MinHeight(Value),
    MaxWidth(Value),
    MaxHeight(Value),
}

impl Sizing {
    pub fn declare(self) -> Result<PropertyDeclaration> {
        let (name, value) = match self {
            Sizing::Width(value) => ("width", value),
            Sizing::Height(value) => ("height", value),
            Sizing::MinWidth(value) => ("min-width", value),
            Sizing::MinHeight(value) => ("min-height", value),
            Sizing::MaxWidth(value) => ("max-width", value),
            Sizing::MaxHeight(value) => ("max-height", value),
        };
        PropertyDeclaration::new(name, value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontShorthand {
    pub style: Option<Value>,
    pub weight: Option<Value>,
    pub size: Numeric,
    pub line_height: Option<Value>,
    pub family: Font,
}

impl FontShorthand {
    pub fn new(size: Numeric, family: Font) -> Self {
        Self {
            style: None,
            weight: None,
            size,
            line_height: None,
            family,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub property: String,
    pub duration: Numeric,
    pub timing: String,
    pub delay: Numeric,
}

impl Transition {
    pub fn new(property: impl Into<String>, duration: Numeric) -> Self {
        Self {
            property: property.into(),
            duration,
            timing: "ease".to_string(),
            delay: Numeric::zero(),
        }
    }

    pub fn timing(self, timing: impl Into<String>) -> Self {
        Self {
            timing: timing.into(),
            ..self
        }
    }

    pub fn delay(self, delay: Numeric) -> Self {
        Self { delay, ..self }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shorthand {
    /// One to four values, following the top/right/bottom/left convention
    Margin(Vec<Value>),
    Padding(Vec<Value>),
    Border {
        side: Option<Side>,
        width: Numeric,
        style: BorderStyle,
        color: Value,
    },
    Flex {
        grow: f64,
        shrink: f64,
        basis: Value,
    },
    Font(FontShorthand),
    Transition(Vec<Transition>),
    Overflow {
        x: Value,
        y: Value,
    },
    Gap {
        row: Value,
        column: Value,
    },
}

impl Shorthand {
    /// Property names that only exist as a family and must go through expansion
    pub const NAMES: &'static [&'static str] = &[
        "margin",
        "padding",
        "border",
        "border-top",
        "border-right",
        "border-bottom",
        "border-left",
        "flex",
        "font",
        "transition",
        "overflow",
        "gap",
    ];

    pub fn is_shorthand_name(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shorthand::Margin(_) => "margin",
            Shorthand::Padding(_) => "padding",
            Shorthand::Border { .. } => "border",
            Shorthand::Flex { .. } => "flex",
            Shorthand::Font(_) => "font",
            Shorthand::Transition(_) => "transition",
            Shorthand::Overflow { .. } => "overflow",
            Shorthand::Gap { .. } => "gap",
        }
    }

    /// Expand into longhand declarations in the documented order
    pub fn expand(self) -> Result<Vec<PropertyDeclaration>> {
        let name = self.name();
        match self {
            Shorthand::Margin(values) => edges("margin", values),
            Shorthand::Padding(values) => edges("padding", values),
            Shorthand::Border { side, width, style, color } => [
                Border::Width(width),
                Border::Style(style),
                Border::Color(color),
            ]
            .into_iter()
            .map(|member| member.declare(side))
            .collect(),
            Shorthand::Flex { grow, shrink, basis } => Ok(vec![
                PropertyDeclaration::new("flex-grow", Numeric::number(grow)?)?,
                PropertyDeclaration::new("flex-shrink", Numeric::number(shrink)?)?,
                PropertyDeclaration::new("flex-basis", basis)?,
            ]),
            Shorthand::Font(font) => {
                let normal = || Value::Keyword("normal".to_string());
                Ok(vec![
                    PropertyDeclaration::new("font-style", font.style.unwrap_or_else(normal))?,
                    PropertyDeclaration::new("font-weight", font.weight.unwrap_or_else(normal))?,
                    PropertyDeclaration::new("font-size", font.size)?,
                    PropertyDeclaration::new("line-height", font.line_height.unwrap_or_else(normal))?,
                    PropertyDeclaration::new("font-family", font.family)?,
                ])
            }
            Shorthand::Transition(transitions) => {
                if transitions.is_empty() {
                    return Err(CompilerError::detached_property(name, "needs at least one transition"));
                }
                let mut properties = Vec::with_capacity(transitions.len());
                let mut durations = Vec::with_capacity(transitions.len());
                let mut timings = Vec::with_capacity(transitions.len());
                let mut delays = Vec::with_capacity(transitions.len());
                for transition in transitions {
                    properties.push(Value::keyword(transition.property)?);
                    durations.push(Value::Numeric(transition.duration));
                    timings.push(Value::keyword(transition.timing)?);
                    delays.push(Value::Numeric(transition.delay));
                }
                Ok(vec![
                    PropertyDeclaration::new("transition-property", comma_list(properties))?,
                    PropertyDeclaration::new("transition-duration", comma_list(durations))?,
                    PropertyDeclaration::new("transition-timing-function", comma_list(timings))?,
                    PropertyDeclaration::new("transition-delay", comma_list(delays))?,
                ])
            }
            Shorthand::Overflow { x, y } => Ok(vec![
                PropertyDeclaration::new("overflow-x", x)?,
                PropertyDeclaration::new("overflow-y", y)?,
            ]),
            Shorthand::Gap { row, column } => Ok(vec![
                PropertyDeclaration::new("row-gap", row)?,
                PropertyDeclaration::new("column-gap", column)?,
            ]),
        }
    }
}

fn edges(property: &str, values: Vec<Value>) -> Result<Vec<PropertyDeclaration>> {
    let [top, right, bottom, left] = match values.as_slice() {
        [all] => [all, all, all, all],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        [top, right, bottom, left] => [top, right, bottom, left],
        _ => {
            return Err(CompilerError::detached_property(
                property,
                format!("expects one to four values, got {}", values.len()),
            ))
        }
    };

    Side::ALL
        .iter()
        .zip([top, right, bottom, left])
        .map(|(side, value)| PropertyDeclaration::new(format!("{}-{}", property, side.name()), value.clone()))
        .collect()
}

fn comma_list(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::List(values, Separator::Comma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Color;

    fn rendered(declarations: &[PropertyDeclaration]) -> Vec<String> {
        declarations
            .iter()
            .map(|d| format!("{}:{}", d.name(), d.render_value()))
            .collect()
    }

    fn px(amount: f64) -> Value {
        Numeric::px(amount).unwrap().into()
    }

    #[test]
    fn test_edge_expansion() {
        let margin = Shorthand::Margin(vec![px(1.0), px(2.0)]).expand().unwrap();
        assert_eq!(
            rendered(&margin),
            vec!["margin-top:1px", "margin-right:2px", "margin-bottom:1px", "margin-left:2px"]
        );

        let padding = Shorthand::Padding(vec![px(1.0), px(2.0), px(3.0)]).expand().unwrap();
        assert_eq!(rendered(&padding)[3], "padding-left:2px");

        assert!(Shorthand::Margin(vec![]).expand().is_err());
        assert!(Shorthand::Padding(vec![Value::keyword("auto").unwrap()]).expand().is_err());
    }

    #[test]
    fn test_border_family() {
        let border = Shorthand::Border {
            side: Some(Side::Left),
            width: Numeric::px(1.0).unwrap(),
            style: BorderStyle::Solid,
            color: Color::BLACK.into(),
        }
        .expand()
        .unwrap();
        assert_eq!(
            rendered(&border),
            vec!["border-left-width:1px", "border-left-style:solid", "border-left-color:#000000"]
        );

        let color = Border::Color(Color::WHITE.into()).declare(None).unwrap();
        assert_eq!(color.name(), "border-color");
        assert!(Border::Color(px(1.0)).declare(None).is_err());
    }

    #[test]
    fn test_flex_and_font_order() {
        let flex = Shorthand::Flex {
            grow: 1.0,
            shrink: 0.0,
            basis: Value::keyword("auto").unwrap(),
        }
        .expand()
        .unwrap();
        assert_eq!(rendered(&flex), vec!["flex-grow:1", "flex-shrink:0", "flex-basis:auto"]);

        let font = FontShorthand::new(Numeric::px(14.0).unwrap(), Font::new("Arial").unwrap());
        let names: Vec<String> = Shorthand::Font(font)
            .expand()
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["font-style", "font-weight", "font-size", "line-height", "font-family"]);
    }

    #[test]
    fn test_transition_lists() {
        let transitions = vec![
            Transition::new("opacity", Numeric::millis(200.0).unwrap()),
            Transition::new("transform", Numeric::seconds(1.0).unwrap()).timing("linear"),
        ];
        let expanded = Shorthand::Transition(transitions).expand().unwrap();
        assert_eq!(
            rendered(&expanded),
            vec![
                "transition-property:opacity,transform",
                "transition-duration:200ms,1s",
                "transition-timing-function:ease,linear",
                "transition-delay:0,0",
            ]
        );
        assert!(Shorthand::Transition(vec![]).expand().is_err());
    }

    #[test]
    fn test_family_names() {
        assert!(Shorthand::is_shorthand_name("margin"));
        assert!(Shorthand::is_shorthand_name("border-left"));
        assert!(!Shorthand::is_shorthand_name("border-left-color"));
        assert!(!Shorthand::is_shorthand_name("outline"));
    }

    #[test]
    fn test_sizing_and_pairs() {
        let width = Sizing::MaxWidth(px(640.0)).declare().unwrap();
        assert_eq!(width.name(), "max-width");

        let overflow = Shorthand::Overflow {
            x: Value::keyword("hidden").unwrap(),
            y: Value::keyword("auto").unwrap(),
        }
        .expand()
        .unwrap();
        assert_eq!(rendered(&overflow), vec!["overflow-x:hidden", "overflow-y:auto"]);

        let gap = Shorthand::Gap { row: px(4.0), column: px(8.0) }.expand().unwrap();
        assert_eq!(rendered(&gap), vec!["row-gap:4px", "column-gap:8px"]);
    }
}
