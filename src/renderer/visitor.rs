use std::fmt::Write;

use crate::ast::AstNode;
use crate::renderer::error::RenderResult;

// Pending output: a node still to print, or the `)` of an open `BinOp`.
enum Step<'a> {
    Open(&'a AstNode),
    Close,
}

/// Walks a tree and writes its canonical S-expression form.
///
/// Every node starts on its own line. A `BinOp` opens with its operator,
/// lists both children one level deeper and closes at its own level. The
/// walk keeps its own stack, so chain length is bounded by memory only.
pub struct RenderVisitor {
    indent_width: usize,
    indent_level: usize,
    output: String,
}

impl RenderVisitor {
    pub fn new(indent_width: usize) -> Self {
        Self {
            indent_width,
            indent_level: 0,
            output: String::new(),
        }
    }

    pub fn render(mut self, ast: &AstNode) -> RenderResult<String> {
        self.visit(ast)?;
        Ok(self.output)
    }

    /// Renders the tree inside an `(AST ...)` envelope.
    pub fn render_document(mut self, ast: &AstNode) -> RenderResult<String> {
        self.write("(AST")?;
        self.newline();
        self.indent();
        self.visit(ast)?;
        self.dedent();
        self.write(")")?;
        self.newline();
        Ok(self.output)
    }

    fn visit(&mut self, root: &AstNode) -> RenderResult<()> {
        let mut pending = vec![Step::Open(root)];
        while let Some(step) = pending.pop() {
            match step {
                Step::Open(AstNode::Identifier(name)) => {
                    self.write(&format!("(Identifier {})", name))?;
                    self.newline();
                }
                Step::Open(AstNode::Number(value)) => {
                    self.write(&format!("(Number {})", value))?;
                    self.newline();
                }
                Step::Open(AstNode::BinaryOp { op, left, right }) => {
                    self.write(&format!("(BinOp {}", op))?;
                    self.newline();
                    self.indent();
                    pending.push(Step::Close);
                    pending.push(Step::Open(right.as_ref()));
                    pending.push(Step::Open(left.as_ref()));
                }
                Step::Close => {
                    self.dedent();
                    self.write(")")?;
                    self.newline();
                }
            }
        }
        Ok(())
    }

    // Writes `text` at the current indentation.
    fn write(&mut self, text: &str) -> RenderResult<()> {
        let width = self.indent_level * self.indent_width;
        write!(self.output, "{:width$}{}", "", text, width = width)?;
        Ok(())
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn newline(&mut self) {
        self.output.push('\n');
    }
}
