use crate::ast::AstNode;
use crate::renderer::error::RenderResult;

enum Step<'a> {
    Node(&'a AstNode),
    Key(&'static str),
    Comma,
    EndObject,
}

/// Writes a tree as JSON in the externally tagged shape serde derives for
/// [`AstNode`]: `{"BinaryOp":{"op":"+","left":...,"right":...}}`.
///
/// Serde serializers recurse per level; this writer keeps its own stack so
/// any chain the parser accepts can be exported. String values still go
/// through `serde_json` for escaping.
pub struct JsonWriter {
    pretty: bool,
    indent_level: usize,
    output: String,
}

impl JsonWriter {
    /// Single line, same bytes as `serde_json::to_string`.
    pub fn compact() -> Self {
        Self {
            pretty: false,
            indent_level: 0,
            output: String::new(),
        }
    }

    /// Two-space indentation, same bytes as `serde_json::to_string_pretty`.
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::compact()
        }
    }

    pub fn write(mut self, root: &AstNode) -> RenderResult<String> {
        let mut pending = vec![Step::Node(root)];
        while let Some(step) = pending.pop() {
            match step {
                Step::Node(AstNode::Identifier(name)) => self.leaf("Identifier", name)?,
                Step::Node(AstNode::Number(value)) => self.leaf("Number", value)?,
                Step::Node(AstNode::BinaryOp { op, left, right }) => {
                    self.begin_object();
                    self.key("BinaryOp");
                    self.begin_object();
                    self.key("op");
                    self.output.push_str(&serde_json::to_string(op)?);
                    self.comma();
                    self.key("left");
                    pending.extend([
                        Step::EndObject,
                        Step::EndObject,
                        Step::Node(right.as_ref()),
                        Step::Key("right"),
                        Step::Comma,
                        Step::Node(left.as_ref()),
                    ]);
                }
                Step::Key(name) => self.key(name),
                Step::Comma => self.comma(),
                Step::EndObject => self.end_object(),
            }
        }
        Ok(self.output)
    }

    fn leaf(&mut self, tag: &'static str, text: &str) -> RenderResult<()> {
        self.begin_object();
        self.key(tag);
        self.output.push_str(&serde_json::to_string(text)?);
        self.end_object();
        Ok(())
    }

    fn begin_object(&mut self) {
        self.output.push('{');
        self.indent_level += 1;
        self.newline();
    }

    fn end_object(&mut self) {
        self.indent_level -= 1;
        self.newline();
        self.output.push('}');
    }

    // Keys are fixed ASCII names and need no escaping.
    fn key(&mut self, name: &'static str) {
        self.output.push('"');
        self.output.push_str(name);
        self.output.push_str(if self.pretty { "\": " } else { "\":" });
    }

    fn comma(&mut self) {
        self.output.push(',');
        self.newline();
    }

    fn newline(&mut self) {
        if self.pretty {
            self.output.push('\n');
            for _ in 0..self.indent_level {
                self.output.push_str("  ");
            }
        }
    }
}
