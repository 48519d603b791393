//! Property catalog: the value shapes each known property accepts

use crate::value::{Numeric, Separator, UnitKind, Value};

/// Keywords every property accepts
pub const CSS_WIDE_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Length or percentage, including calc and math functions over them
    Length,
    Number,
    Time,
    Angle,
    Color,
    /// Gradients and `none`
    Image,
    Shadow,
    Font,
    Str,
    Position,
    /// A keyframes reference or `none`
    Frames,
    Keyword(&'static [&'static str]),
    /// Any identifier, such as a transitioned property name
    Ident,
    Any,
}

impl ValueShape {
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (ValueShape::Any, _) => true,
            (ValueShape::Length, Value::Numeric(n)) => numeric_of(n, &[UnitKind::Length, UnitKind::Percentage]),
            (ValueShape::Number, Value::Numeric(n)) => n.leaf_kinds().iter().all(Option::is_none),
            (ValueShape::Time, Value::Numeric(n)) => numeric_of(n, &[UnitKind::Time]),
            (ValueShape::Angle, Value::Numeric(n)) => numeric_of(n, &[UnitKind::Angle]),
            (ValueShape::Color, Value::Color(_)) => true,
            (ValueShape::Color, Value::Keyword(k)) => k == "currentcolor" || k == "transparent",
            (ValueShape::Image, Value::Gradient(_)) => true,
            (ValueShape::Image | ValueShape::Shadow | ValueShape::Frames, Value::Keyword(k)) => k == "none",
            (ValueShape::Shadow, Value::Shadow(_)) => true,
            (ValueShape::Font, Value::Font(_)) => true,
            (ValueShape::Str, Value::Str(_)) => true,
            (ValueShape::Position, Value::Position(_)) => true,
            (ValueShape::Frames, Value::Frames(_)) => true,
            (ValueShape::Keyword(allowed), Value::Keyword(k)) => allowed.contains(&k.as_str()),
            (ValueShape::Ident, Value::Keyword(_)) => true,
            _ => false,
        }
    }

    pub fn describe(self) -> String {
        match self {
            ValueShape::Length => "length".to_string(),
            ValueShape::Number => "number".to_string(),
            ValueShape::Time => "time".to_string(),
            ValueShape::Angle => "angle".to_string(),
            ValueShape::Color => "color".to_string(),
            ValueShape::Image => "image".to_string(),
            ValueShape::Shadow => "shadow".to_string(),
            ValueShape::Font => "font family".to_string(),
            ValueShape::Str => "string".to_string(),
            ValueShape::Position => "position".to_string(),
            ValueShape::Frames => "keyframes name".to_string(),
            ValueShape::Keyword(allowed) => format!("one of [{}]", allowed.join(", ")),
            ValueShape::Ident => "identifier".to_string(),
            ValueShape::Any => "any value".to_string(),
        }
    }
}

/// A unitless zero counts as every dimension
fn numeric_of(numeric: &Numeric, kinds: &[UnitKind]) -> bool {
    if numeric.is_zero() {
        return true;
    }

    // Unitless leaves are allowed inside calc() as scale factors
    let expression = !matches!(numeric, Numeric::Dimension { .. });
    let leaves = numeric.leaf_kinds();
    leaves.iter().any(Option::is_some)
        && leaves.iter().all(|kind| match kind {
            Some(kind) => kinds.contains(kind),
            None => expression,
        })
}

/// How many space separated components a property value may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    Single,
    /// Up to the given number of space separated components
    Space(usize),
    /// A comma separated list whose items may contain space separated parts
    Comma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub shapes: &'static [ValueShape],
    pub multiplicity: Multiplicity,
}

const DISPLAY: &[&str] = &[
    "none", "block", "inline", "inline-block", "flex", "inline-flex", "grid", "inline-grid", "contents",
    "table", "table-row", "table-cell", "list-item",
];
const POSITION: &[&str] = &["static", "relative", "absolute", "fixed", "sticky"];
const BORDER_STYLE: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];
const OVERFLOW: &[&str] = &["visible", "hidden", "clip", "scroll", "auto"];
const FLEX_DIRECTION: &[&str] = &["row", "row-reverse", "column", "column-reverse"];
const FLEX_WRAP: &[&str] = &["nowrap", "wrap", "wrap-reverse"];
const JUSTIFY: &[&str] = &[
    "flex-start", "flex-end", "start", "end", "center", "space-between", "space-around", "space-evenly",
    "stretch", "normal",
];
const ALIGN: &[&str] = &[
    "flex-start", "flex-end", "start", "end", "center", "baseline", "stretch", "normal", "space-between",
    "space-around", "auto",
];
const FONT_STYLE: &[&str] = &["normal", "italic", "oblique"];
const FONT_WEIGHT: &[&str] = &["normal", "bold", "bolder", "lighter"];
const TEXT_ALIGN: &[&str] = &["left", "right", "center", "justify", "start", "end"];
const VISIBILITY: &[&str] = &["visible", "hidden", "collapse"];
const AUTO: &[&str] = &["auto"];
const SIZE_KEYWORDS: &[&str] = &["auto", "none", "min-content", "max-content", "fit-content"];
const TIMING: &[&str] = &["ease", "linear", "ease-in", "ease-out", "ease-in-out", "step-start", "step-end"];
const CURSOR: &[&str] = &[
    "auto", "default", "pointer", "text", "move", "wait", "help", "not-allowed", "crosshair", "grab",
    "grabbing", "progress",
];
const BOX_SIZING: &[&str] = &["content-box", "border-box"];
const POINTER_EVENTS: &[&str] = &["auto", "none"];
const USER_SELECT: &[&str] = &["auto", "none", "text", "all"];
const APPEARANCE: &[&str] = &["auto", "none"];
const WHITE_SPACE: &[&str] = &["normal", "nowrap", "pre", "pre-wrap", "pre-line", "break-spaces"];
const ANIMATION_DIRECTION: &[&str] = &["normal", "reverse", "alternate", "alternate-reverse"];
const ANIMATION_FILL: &[&str] = &["none", "forwards", "backwards", "both"];
const ITERATION: &[&str] = &["infinite"];
const TEXT_DECORATION: &[&str] = &["none", "underline", "overline", "line-through"];
const TEXT_TRANSFORM: &[&str] = &["none", "capitalize", "uppercase", "lowercase"];
const LIST_STYLE: &[&str] = &["none", "disc", "circle", "square", "decimal"];
const VERTICAL_ALIGN: &[&str] = &["baseline", "top", "middle", "bottom", "text-top", "text-bottom", "sub", "super"];
const NORMAL: &[&str] = &["normal"];
const ALL: &[&str] = &["all", "none"];

macro_rules! def {
    ([$($shape:expr),+ $(,)?]) => {
        def!([$($shape),+], Multiplicity::Single)
    };
    ([$($shape:expr),+ $(,)?], $multiplicity:expr) => {
        PropertyDefinition {
            shapes: &[$($shape),+],
            multiplicity: $multiplicity,
        }
    };
}

impl PropertyDefinition {
    /// Look up the definition of a known property; shorthand family names have none
    pub fn lookup(name: &str) -> Option<PropertyDefinition> {
        use ValueShape::*;

        let definition = match name {
            "color" => def!([Color]),
            "background-color" => def!([Color]),
            "background-image" => def!([Image], Multiplicity::Comma),
            "background-position" => def!([Position, Length], Multiplicity::Space(2)),
            "background" => def!([Color, Image, Position], Multiplicity::Comma),
            "opacity" => def!([Number]),
            "z-index" => def!([Number, Keyword(AUTO)]),
            "order" => def!([Number]),

            "display" => def!([Keyword(DISPLAY)]),
            "position" => def!([Keyword(POSITION)]),
            "top" => def!([Length, Keyword(AUTO)]),
            "right" => def!([Length, Keyword(AUTO)]),
            "bottom" => def!([Length, Keyword(AUTO)]),
            "left" => def!([Length, Keyword(AUTO)]),
            "visibility" => def!([Keyword(VISIBILITY)]),
            "overflow-x" => def!([Keyword(OVERFLOW)]),
            "overflow-y" => def!([Keyword(OVERFLOW)]),
            "box-sizing" => def!([Keyword(BOX_SIZING)]),
            "cursor" => def!([Keyword(CURSOR)]),
            "pointer-events" => def!([Keyword(POINTER_EVENTS)]),
            "user-select" => def!([Keyword(USER_SELECT)]),
            "appearance" => def!([Keyword(APPEARANCE)]),
            "content" => def!([Str, Keyword(&["none", "normal"])]),

            "width" | "height" | "min-width" | "min-height" | "max-width" | "max-height" => {
                PropertyDefinition {
                    shapes: &[Length, Keyword(SIZE_KEYWORDS)],
                    multiplicity: Multiplicity::Single,
                }
            }

            "margin-top" | "margin-right" | "margin-bottom" | "margin-left" => PropertyDefinition {
                shapes: &[Length, Keyword(AUTO)],
                multiplicity: Multiplicity::Single,
            },
            "padding-top" | "padding-right" | "padding-bottom" | "padding-left" => PropertyDefinition {
                shapes: &[Length],
                multiplicity: Multiplicity::Single,
            },

            "outline" => def!([Length, Keyword(BORDER_STYLE), Color], Multiplicity::Space(3)),
            "border-width" | "border-top-width" | "border-right-width" | "border-bottom-width"
            | "border-left-width" | "outline-width" => PropertyDefinition {
                shapes: &[Length],
                multiplicity: Multiplicity::Single,
            },
            "border-style" | "border-top-style" | "border-right-style" | "border-bottom-style"
            | "border-left-style" | "outline-style" => PropertyDefinition {
                shapes: &[Keyword(BORDER_STYLE)],
                multiplicity: Multiplicity::Single,
            },
            "border-color" | "border-top-color" | "border-right-color" | "border-bottom-color"
            | "border-left-color" | "outline-color" => PropertyDefinition {
                shapes: &[Color],
                multiplicity: Multiplicity::Single,
            },
            "border-radius" => def!([Length], Multiplicity::Space(4)),
            "outline-offset" => def!([Length]),
            "box-shadow" => def!([Shadow], Multiplicity::Comma),
            "text-shadow" => def!([Shadow], Multiplicity::Comma),

            "flex-grow" => def!([Number]),
            "flex-shrink" => def!([Number]),
            "flex-basis" => def!([Length, Keyword(&["auto", "content"])]),
            "flex-direction" => def!([Keyword(FLEX_DIRECTION)]),
            "flex-wrap" => def!([Keyword(FLEX_WRAP)]),
            "justify-content" => def!([Keyword(JUSTIFY)]),
            "align-content" => def!([Keyword(ALIGN)]),
            "align-items" => def!([Keyword(ALIGN)]),
            "align-self" => def!([Keyword(ALIGN)]),
            "row-gap" => def!([Length, Keyword(NORMAL)]),
            "column-gap" => def!([Length, Keyword(NORMAL)]),

            "font-family" => def!([Font]),
            "font-size" => def!([Length, Keyword(&["small", "medium", "large", "smaller", "larger"])]),
            "font-style" => def!([Keyword(FONT_STYLE)]),
            "font-weight" => def!([Number, Keyword(FONT_WEIGHT)]),
            "line-height" => def!([Number, Length, Keyword(NORMAL)]),
            "letter-spacing" => def!([Length, Keyword(NORMAL)]),
            "word-spacing" => def!([Length, Keyword(NORMAL)]),
            "text-align" => def!([Keyword(TEXT_ALIGN)]),
            "text-decoration" => def!([Keyword(TEXT_DECORATION), Color], Multiplicity::Space(3)),
            "text-transform" => def!([Keyword(TEXT_TRANSFORM)]),
            "text-indent" => def!([Length]),
            "white-space" => def!([Keyword(WHITE_SPACE)]),
            "list-style-type" => def!([Keyword(LIST_STYLE)]),
            "vertical-align" => def!([Length, Keyword(VERTICAL_ALIGN)]),

            "transform" => def!([Any], Multiplicity::Space(usize::MAX)),
            "transition-property" => def!([Ident, Keyword(ALL)], Multiplicity::Comma),
            "transition-duration" => def!([Time], Multiplicity::Comma),
            "transition-timing-function" => def!([Keyword(TIMING)], Multiplicity::Comma),
            "transition-delay" => def!([Time], Multiplicity::Comma),

            "animation" => def!(
                [Frames, Time, Keyword(TIMING), Keyword(ANIMATION_DIRECTION), Keyword(ANIMATION_FILL), Keyword(ITERATION), Number],
                Multiplicity::Comma
            ),
            "animation-name" => def!([Frames], Multiplicity::Comma),
            "animation-duration" => def!([Time], Multiplicity::Comma),
            "animation-timing-function" => def!([Keyword(TIMING)], Multiplicity::Comma),
            "animation-delay" => def!([Time], Multiplicity::Comma),
            "animation-iteration-count" => def!([Number, Keyword(ITERATION)], Multiplicity::Comma),
            "animation-direction" => def!([Keyword(ANIMATION_DIRECTION)], Multiplicity::Comma),
            "animation-fill-mode" => def!([Keyword(ANIMATION_FILL)], Multiplicity::Comma),
            _ => return None,
        };

        Some(definition)
    }

    /// Does this property accept `value`? Variable references are accepted
    /// here and checked again once they are resolved.
    pub fn accepts(&self, value: &Value) -> bool {
        match value {
            Value::Var(_) => true,
            Value::Keyword(k) if CSS_WIDE_KEYWORDS.contains(&k.as_str()) => true,
            Value::List(items, Separator::Space) => match self.multiplicity {
                Multiplicity::Space(max) => items.len() <= max && items.iter().all(|item| self.accepts_single(item)),
                Multiplicity::Comma => items.iter().all(|item| self.accepts_single(item)),
                Multiplicity::Single => false,
            },
            Value::List(items, Separator::Comma) => {
                self.multiplicity == Multiplicity::Comma && items.iter().all(|item| self.accepts(item))
            }
            single => self.accepts_single(single),
        }
    }

    fn accepts_single(&self, value: &Value) -> bool {
        matches!(value, Value::Var(_)) || self.shapes.iter().any(|shape| shape.accepts(value))
    }

    pub fn describe(&self) -> String {
        self.shapes.iter().map(|shape| shape.describe()).collect::<Vec<_>>().join(" | ")
    }
}
