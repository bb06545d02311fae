//! Python code generator
//!
//! Generates Python source from the Tenglish AST. Keywords are substituted
//! through the keyword table; literal text is copied exactly as written.

use log::debug;

use super::CodeGenerator;
use crate::keywords::{Keyword, KeywordTable};
use crate::parser::{
    BinaryOp, Block, Expr, ExprKind, FunctionDef, IfStmt, Literal, NOT_PRECEDENCE, Program, Stmt,
    StmtKind, UnaryOp,
};

/// Default number of spaces per indentation level
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Python code generator
pub struct PythonGenerator<'kw> {
    keywords: &'kw KeywordTable,
    /// Current indentation level
    indent: usize,
    /// Spaces per level
    indent_width: usize,
    /// Output buffer
    output: String,
}

impl<'kw> PythonGenerator<'kw> {
    pub fn new(keywords: &'kw KeywordTable) -> Self {
        Self {
            keywords,
            indent: 0,
            indent_width: DEFAULT_INDENT_WIDTH,
            output: String::new(),
        }
    }

    /// Set the number of spaces per indentation level
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent * self.indent_width {
            self.output.push(' ');
        }
    }

    fn indent(&mut self) {
        self.indent += 1;
    }

    fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    fn kw(&self, keyword: Keyword) -> &'static str {
        self.keywords.render(keyword)
    }

    fn generate_block(&mut self, block: &Block) {
        self.indent();
        for stmt in &block.stmts {
            self.generate_stmt(stmt);
        }
        self.dedent();
    }

    /// Header line `<keyword> <condition>:` followed by its block
    fn generate_guarded(&mut self, keyword: Keyword, condition: &Expr, body: &Block) {
        self.write_indent();
        self.write(self.kw(keyword));
        self.write(" ");
        self.generate_expr(condition);
        self.write(":\n");
        self.generate_block(body);
    }

    fn generate_function(&mut self, def: &FunctionDef) {
        let params: Vec<&str> = def.params.iter().map(|p| p.name.as_str()).collect();
        let header = format!(
            "{} {}({}):",
            self.kw(Keyword::Def),
            def.name.name,
            params.join(", ")
        );
        self.writeln(&header);
        self.generate_block(&def.body);
    }

    fn generate_if(&mut self, stmt: &IfStmt) {
        for (i, branch) in stmt.branches.iter().enumerate() {
            let keyword = if i == 0 { Keyword::If } else { Keyword::ElseIf };
            self.generate_guarded(keyword, &branch.condition, &branch.body);
        }

        if let Some(else_body) = &stmt.else_body {
            let header = format!("{}:", self.kw(Keyword::Else));
            self.writeln(&header);
            self.generate_block(else_body);
        }
    }

    fn generate_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::FunctionDef(def) => self.generate_function(def),
            StmtKind::If(if_stmt) => self.generate_if(if_stmt),
            StmtKind::While { condition, body } => {
                self.generate_guarded(Keyword::While, condition, body);
            }
            StmtKind::For {
                var,
                iterable,
                body,
            } => {
                self.write_indent();
                self.write(self.kw(Keyword::ForVar));
                self.write(" ");
                self.write(&var.name);
                self.write(" ");
                self.write(self.kw(Keyword::ForIn));
                self.write(" ");
                self.generate_expr(iterable);
                self.write(":\n");
                self.generate_block(body);
            }
            StmtKind::Return(value) => {
                self.write_indent();
                self.write(self.kw(Keyword::Return));
                self.write(" ");
                self.generate_expr(value);
                self.write("\n");
            }
            StmtKind::Print(args) => {
                self.write_indent();
                self.write(self.kw(Keyword::Print));
                self.write("(");
                self.generate_list(args);
                self.write(")\n");
            }
            StmtKind::Assign { target, value } => {
                self.write_indent();
                self.generate_expr(target);
                self.write(" = ");
                self.generate_expr(value);
                self.write("\n");
            }
            StmtKind::CompoundAssign { target, op, value } => {
                self.write_indent();
                self.generate_expr(target);
                self.write(" ");
                self.write(self.binary_op_text(*op));
                self.write("= ");
                self.generate_expr(value);
                self.write("\n");
            }
            StmtKind::Expr(expr) => {
                self.write_indent();
                self.generate_expr(expr);
                self.write("\n");
            }
            StmtKind::Break => self.writeln(self.kw(Keyword::Break)),
            StmtKind::Continue => self.writeln(self.kw(Keyword::Continue)),
        }
    }

    fn binary_op_text(&self, op: BinaryOp) -> &'static str {
        match op {
            BinaryOp::And => self.kw(Keyword::And),
            BinaryOp::Or => self.kw(Keyword::Or),
            other => other.symbol().unwrap_or_default(),
        }
    }

    /// Comma-separated expressions
    fn generate_list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.generate_expr(item);
        }
    }

    fn generate_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(literal) => match literal {
                Literal::Int(text) | Literal::Float(text) | Literal::Str(text) => {
                    self.write(text);
                }
                Literal::Bool(value) => {
                    let keyword = if *value { Keyword::True } else { Keyword::False };
                    self.write(self.kw(keyword));
                }
            },
            ExprKind::Ident(ident) => {
                self.write(&ident.name);
            }
            ExprKind::Binary { left, op, right } => {
                self.generate_operand(left, *op, false);
                self.write(" ");
                self.write(self.binary_op_text(*op));
                self.write(" ");
                self.generate_operand(right, *op, true);
            }
            ExprKind::Unary { op, operand } => {
                match op {
                    UnaryOp::Neg => self.write("-"),
                    UnaryOp::Pos => self.write("+"),
                    UnaryOp::Not => {
                        self.write(self.kw(Keyword::Not));
                        self.write(" ");
                    }
                }
                if matches!(operand.kind, ExprKind::Binary { .. }) {
                    self.write("(");
                    self.generate_expr(operand);
                    self.write(")");
                } else {
                    self.generate_expr(operand);
                }
            }
            ExprKind::Call { callee, args } => {
                self.generate_expr(callee);
                self.write("(");
                self.generate_list(args);
                self.write(")");
            }
            ExprKind::Index { object, index } => {
                self.generate_expr(object);
                self.write("[");
                self.generate_expr(index);
                self.write("]");
            }
            ExprKind::Attribute { object, name } => {
                self.generate_expr(object);
                self.write(".");
                self.write(&name.name);
            }
            ExprKind::List(items) => {
                self.write("[");
                self.generate_list(items);
                self.write("]");
            }
            ExprKind::Tuple(items) => {
                self.write("(");
                self.generate_list(items);
                if items.len() == 1 {
                    self.write(",");
                }
                self.write(")");
            }
            ExprKind::Paren(inner) => {
                self.write("(");
                self.generate_expr(inner);
                self.write(")");
            }
        }
    }

    /// Operand of a binary operator, parenthesized when the tree would
    /// otherwise read back differently
    fn generate_operand(&mut self, operand: &Expr, parent: BinaryOp, is_right: bool) {
        let wrap = match &operand.kind {
            ExprKind::Binary { op, .. } => {
                let (child, outer) = (op.precedence(), parent.precedence());
                // Membership under any other operator reads ambiguously
                (*op == BinaryOp::In && parent != BinaryOp::In)
                    || child < outer
                    || (child == outer && is_right)
            }
            ExprKind::Unary {
                op: UnaryOp::Not, ..
            } => NOT_PRECEDENCE < parent.precedence(),
            _ => false,
        };

        if wrap {
            self.write("(");
            self.generate_expr(operand);
            self.write(")");
        } else {
            self.generate_expr(operand);
        }
    }
}

impl CodeGenerator for PythonGenerator<'_> {
    fn generate(&mut self, program: &Program) -> String {
        self.output.clear();
        self.indent = 0;

        let count = program.body.len();
        for (i, stmt) in program.body.iter().enumerate() {
            self.generate_stmt(stmt);
            // Blank line after top-level compound statements, except the last
            if stmt.is_compound() && i + 1 < count {
                self.write("\n");
            }
        }

        debug!("generated {} bytes of Python", self.output.len());
        std::mem::take(&mut self.output)
    }

    fn file_extension(&self) -> &'static str {
        "py"
    }

    fn language_name(&self) -> &'static str {
        "Python"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceSpan;
    use crate::lexer::Lexer;
    use crate::parser::{Ident, Parser};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn generate(source: &str) -> String {
        let keywords = KeywordTable::global();
        let tokens = Lexer::new(source, keywords).tokenize().unwrap();
        let program = Parser::new(tokens, keywords).parse().unwrap();
        PythonGenerator::new(keywords).generate(&program)
    }

    fn ident(name: &str) -> Expr {
        Expr::new(
            ExprKind::Ident(Ident::new(name, SourceSpan::default())),
            SourceSpan::default(),
        )
    }

    fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
        Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            SourceSpan::default(),
        )
    }

    fn render(expr: Expr) -> String {
        let program = Program {
            body: vec![Stmt {
                kind: StmtKind::Expr(expr),
                span: SourceSpan::default(),
            }],
        };
        PythonGenerator::new(KeywordTable::global()).generate(&program)
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(generate(""), "");
    }

    #[test]
    fn test_operand_parenthesization() {
        let right_nested = binary(
            ident("a"),
            BinaryOp::Sub,
            binary(ident("b"), BinaryOp::Sub, ident("c")),
        );
        assert_eq!(render(right_nested), "a - (b - c)\n");

        let left_nested = binary(
            binary(ident("a"), BinaryOp::Sub, ident("b")),
            BinaryOp::Sub,
            ident("c"),
        );
        assert_eq!(render(left_nested), "a - b - c\n");

        let lower = binary(
            binary(ident("a"), BinaryOp::Add, ident("b")),
            BinaryOp::Mul,
            ident("c"),
        );
        assert_eq!(render(lower), "(a + b) * c\n");

        let membership = binary(
            binary(ident("user"), BinaryOp::In, ident("admins")),
            BinaryOp::And,
            ident("active"),
        );
        assert_eq!(render(membership), "(user in admins) and active\n");
    }

    #[test]
    fn test_chained_membership() {
        assert_eq!(generate("x = a in b in c"), "x = a in b in c\n");

        let right_nested = binary(
            ident("a"),
            BinaryOp::In,
            binary(ident("b"), BinaryOp::In, ident("c")),
        );
        assert_eq!(render(right_nested), "a in (b in c)\n");
    }

    #[test]
    fn test_unary_rendering() {
        assert_eq!(generate("x = -(a + b)"), "x = -(a + b)\n");
        assert_eq!(generate("x = -y"), "x = -y\n");
        assert_eq!(generate("x = +3"), "x = +3\n");
        assert_eq!(generate("x = avvakapote a > 5"), "x = not (a > 5)\n");
        assert_eq!(
            generate("x = avvakapote done mariyu ready"),
            "x = not done and ready\n"
        );
    }

    #[test]
    fn test_literals_copied_verbatim() {
        let source = indoc! {r#"
            values = [1_000, 3.14, 2e10, "tab\tsep", 'single', f"{x}", Nijam, Abaddam]
        "#};
        assert_eq!(
            generate(source),
            "values = [1_000, 3.14, 2e10, \"tab\\tsep\", 'single', f\"{x}\", True, False]\n"
        );
    }

    #[test]
    fn test_tuples() {
        assert_eq!(generate("t = (1,)"), "t = (1,)\n");
        assert_eq!(generate("t = ()"), "t = ()\n");
        assert_eq!(generate("t = (a, b)"), "t = (a, b)\n");
        assert_eq!(generate("(\"a\", \"b\")cheppu"), "print(\"a\", \"b\")\n");
    }

    #[test]
    fn test_postfix_access() {
        assert_eq!(
            generate("result = data.items[0].name.upper()"),
            "result = data.items[0].name.upper()\n"
        );
        assert_eq!(generate("total += prices[i] * 2"), "total += prices[i] * 2\n");
    }

    #[test]
    fn test_blank_lines_between_top_level_blocks() {
        let source = indoc! {"
            vidhanam a():
                1 ivvu
            vidhanam b():
                okavela x aite:
                    2 ivvu
                3 ivvu
            x = b()
        "};
        let expected = indoc! {"
            def a():
                return 1

            def b():
                if x:
                    return 2
                return 3

            x = b()
        "};
        assert_eq!(generate(source), expected);
    }

    #[test]
    fn test_custom_indent_width() {
        let keywords = KeywordTable::global();
        let source = "okavela x aite:\n    okavela y aite:\n        aagipo\n";
        let tokens = Lexer::new(source, keywords).tokenize().unwrap();
        let program = Parser::new(tokens, keywords).parse().unwrap();
        let output = PythonGenerator::new(keywords)
            .with_indent_width(2)
            .generate(&program);
        assert_eq!(output, "if x:\n  if y:\n    break\n");
    }

    #[test]
    fn test_generator_reuse() {
        let keywords = KeywordTable::global();
        let tokens = Lexer::new("(1)cheppu", keywords).tokenize().unwrap();
        let program = Parser::new(tokens, keywords).parse().unwrap();
        let mut generator = PythonGenerator::new(keywords);
        let first = generator.generate(&program);
        let second = generator.generate(&program);
        assert_eq!(first, second);
        assert_eq!(generator.file_extension(), "py");
        assert_eq!(generator.language_name(), "Python");
    }
}
