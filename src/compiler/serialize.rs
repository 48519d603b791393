//! Stylesheet text emission in expanded or compact form

use crate::error::{CompilerError, Result};
use crate::property::PropertyDeclaration;
use crate::rule::Keyframes;
use crate::RenderMode;

const INDENT: &str = "  ";

pub(crate) struct Serializer {
    mode: RenderMode,
    output: String,
    blocks: usize,
}

impl Serializer {
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            output: String::new(),
            blocks: 0,
        }
    }

    pub fn keyframes(&mut self, keyframes: &Keyframes) -> Result<()> {
        self.begin_block();
        let header = format!("@keyframes {}", keyframes.name());
        self.open(&header, 0);
        for frame in keyframes.frames() {
            self.open(&frame.selector_text(), 1);
            self.declarations(frame.declarations(), 2);
            self.close(1);
        }
        self.close(0);
        Ok(())
    }

    pub fn rule<'a, I>(&mut self, selector: &str, declarations: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a PropertyDeclaration>,
    {
        if selector.is_empty() {
            return Err(CompilerError::serialization("Rule reached the serializer without a selector"));
        }

        self.begin_block();
        self.open(selector, 0);
        for declaration in declarations {
            self.declaration(declaration, 1);
        }
        self.close(0);
        Ok(())
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn begin_block(&mut self) {
        if self.mode == RenderMode::Expanded && self.blocks > 0 {
            self.output.push('\n');
        }
        self.blocks += 1;
    }

    fn open(&mut self, header: &str, depth: usize) {
        match self.mode {
            RenderMode::Compact => {
                self.output.push_str(header);
                self.output.push('{');
            }
            RenderMode::Expanded => {
                self.indent(depth);
                self.output.push_str(header);
                self.output.push_str(" {\n");
            }
        }
    }

    fn close(&mut self, depth: usize) {
        match self.mode {
            RenderMode::Compact => {
                // No semicolon after the last declaration of a block
                if self.output.ends_with(';') {
                    self.output.pop();
                }
                self.output.push('}');
            }
            RenderMode::Expanded => {
                self.indent(depth);
                self.output.push_str("}\n");
            }
        }
    }

    fn declarations(&mut self, declarations: &[PropertyDeclaration], depth: usize) {
        for declaration in declarations {
            self.declaration(declaration, depth);
        }
    }

    fn declaration(&mut self, declaration: &PropertyDeclaration, depth: usize) {
        let value = declaration.render_value();
        match self.mode {
            RenderMode::Compact => {
                self.output.push_str(declaration.name());
                self.output.push(':');
                self.output.push_str(&value);
                if declaration.is_important() {
                    self.output.push_str("!important");
                }
                self.output.push(';');
            }
            RenderMode::Expanded => {
                self.indent(depth);
                self.output.push_str(declaration.name());
                self.output.push_str(": ");
                self.output.push_str(&value);
                if declaration.is_important() {
                    self.output.push_str(" !important");
                }
                self.output.push_str(";\n");
            }
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.output.push_str(INDENT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{FrameOffset, Keyframe};
    use crate::value::{Color, Numeric};

    fn declarations() -> Vec<PropertyDeclaration> {
        vec![
            PropertyDeclaration::new("color", Color::rgb(255, 0, 0).unwrap()).unwrap(),
            PropertyDeclaration::new("font-size", Numeric::px(14.0).unwrap()).unwrap().important(),
        ]
    }

    fn fade() -> Keyframes {
        Keyframes::named(
            "fade",
            vec![
                Keyframe::new(
                    vec![FrameOffset::From],
                    vec![PropertyDeclaration::new("opacity", Numeric::number(0.0).unwrap()).unwrap()],
                )
                .unwrap(),
                Keyframe::new(
                    vec![FrameOffset::To],
                    vec![PropertyDeclaration::new("opacity", Numeric::number(1.0).unwrap()).unwrap()],
                )
                .unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_compact_rule() {
        let mut serializer = Serializer::new(RenderMode::Compact);
        serializer.rule(".button", &declarations()).unwrap();
        assert_eq!(serializer.finish(), ".button{color:#ff0000;font-size:14px!important}");
    }

    #[test]
    fn test_expanded_rule() {
        let mut serializer = Serializer::new(RenderMode::Expanded);
        serializer.rule(".button", &declarations()).unwrap();
        serializer.rule(".empty", &[]).unwrap();
        assert_eq!(
            serializer.finish(),
            ".button {\n  color: #ff0000;\n  font-size: 14px !important;\n}\n\n.empty {\n}\n"
        );
    }

    #[test]
    fn test_keyframes_blocks() {
        let mut compact = Serializer::new(RenderMode::Compact);
        compact.keyframes(&fade()).unwrap();
        assert_eq!(compact.finish(), "@keyframes fade{from{opacity:0}to{opacity:1}}");

        let mut expanded = Serializer::new(RenderMode::Expanded);
        expanded.keyframes(&fade()).unwrap();
        assert_eq!(
            expanded.finish(),
            "@keyframes fade {\n  from {\n    opacity: 0;\n  }\n  to {\n    opacity: 1;\n  }\n}\n"
        );
    }

    #[test]
    fn test_missing_selector_is_serialization_error() {
        let mut serializer = Serializer::new(RenderMode::Compact);
        assert!(matches!(
            serializer.rule("", &declarations()),
            Err(CompilerError::Serialization { .. })
        ));
    }
}
