//! Recursive descent parser for Tenglish
//!
//! Parses a token stream into an AST. Statements whose deciding keyword comes
//! last (`ivvu`, `cheppu`, `lo ... ki`, `unnanta varaku`) are handled by
//! parsing an expression first and then looking at the next token.

use log::debug;

use super::ast::*;
use crate::errors::{ParseError, ParseResult, SourceSpan};
use crate::keywords::{Keyword, KeywordTable};
use crate::lexer::{Token, TokenKind};

/// Deepest expression nesting accepted before parsing gives up. A
/// parenthesized group costs two levels.
const MAX_NESTING_DEPTH: usize = 200;

/// The parser for Tenglish token streams
pub struct Parser<'kw> {
    /// Tokens from the lexer, always terminated by `Eof`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Used to name keywords the way the user wrote them
    keywords: &'kw KeywordTable,
    /// Current recursion depth, bounded by [`MAX_NESTING_DEPTH`]
    depth: usize,
}

impl<'kw> Parser<'kw> {
    /// Create a new parser over the tokens produced by [`crate::Lexer`]
    pub fn new(mut tokens: Vec<Token>, keywords: &'kw KeywordTable) -> Self {
        if !tokens.last().is_some_and(|t| t.kind.is_eof()) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column + t.text.chars().count()))
                .unwrap_or((1, 1));
            tokens.push(Token::new(
                TokenKind::Eof,
                "",
                SourceSpan::new(end, end),
                line,
                column,
            ));
        }
        Self {
            tokens,
            pos: 0,
            keywords,
            depth: 0,
        }
    }

    /// Parse the token stream into a program
    pub fn parse(mut self) -> ParseResult<Program> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_stmt()?);
        }

        debug!("parsed {} top-level statements", body.len());
        Ok(Program { body })
    }

    // ==================== Helpers ====================

    /// Check if we've reached EOF
    fn is_at_end(&self) -> bool {
        self.peek().kind.is_eof()
    }

    /// Peek at the current token
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Get the current token's span
    fn current_span(&self) -> SourceSpan {
        self.peek().span
    }

    /// Advance and return the consumed token
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    /// Get the previous token
    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Check if current token matches
    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    /// Keyword under the cursor, if any
    fn peek_keyword(&self) -> Option<Keyword> {
        match self.peek().kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Check if current token is a keyword
    fn check_keyword(&self, kw: Keyword) -> bool {
        self.peek_keyword() == Some(kw)
    }

    /// Consume token if it matches
    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// `'aite'`, `'unnanta varaku'`, ...
    fn quoted(&self, kw: Keyword) -> String {
        format!("'{}'", self.keywords.surface(kw))
    }

    /// Error at the current token: "<message>, found <token>"
    fn error_here(&self, message: impl AsRef<str>) -> ParseError {
        let token = self.peek();
        ParseError::new(
            format!("{}, found {}", message.as_ref(), token.describe()),
            token.line,
            token.column,
            token.span,
        )
    }

    /// Run `f` one nesting level deeper, failing instead of recursing past
    /// [`MAX_NESTING_DEPTH`]
    fn nested(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<Expr>) -> ParseResult<Expr> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error_here("expression nested too deeply"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Consume a token if it matches, otherwise error
    fn expect(&mut self, kind: &TokenKind, msg: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg).with_expected([kind.description()]))
        }
    }

    /// Consume a keyword if it matches, otherwise error
    fn expect_keyword(&mut self, kw: Keyword, msg: &str) -> ParseResult<SourceSpan> {
        if self.check_keyword(kw) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.error_here(msg).with_expected([self.quoted(kw)]))
        }
    }

    /// Parse an identifier
    fn parse_ident(&mut self, msg: &str) -> ParseResult<Ident> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let ident = Ident::new(name.clone(), self.current_span());
                self.advance();
                Ok(ident)
            }
            _ => Err(self.error_here(msg).with_expected(["identifier"])),
        }
    }

    /// Every simple statement ends at a newline
    fn expect_line_end(&mut self, msg: &str) -> ParseResult<()> {
        if self.match_token(&TokenKind::Newline) || self.is_at_end() {
            Ok(())
        } else {
            Err(self.error_here(msg).with_expected(["end of line"]))
        }
    }

    // ==================== Statements ====================

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span();

        match self.peek_keyword() {
            Some(Keyword::If) => return self.parse_if(),
            Some(Keyword::Def) => return self.parse_function(),
            Some(kw @ (Keyword::Break | Keyword::Continue)) => {
                self.advance();
                let msg = format!("expected end of line after {}", self.quoted(kw));
                self.expect_line_end(&msg)?;
                let kind = if kw == Keyword::Break {
                    StmtKind::Break
                } else {
                    StmtKind::Continue
                };
                return Ok(Stmt { kind, span: start });
            }
            Some(kw @ (Keyword::ElseIf | Keyword::Else)) => {
                let token = self.peek();
                return Err(ParseError::new(
                    format!(
                        "{} without a matching {}",
                        self.quoted(kw),
                        self.quoted(Keyword::If)
                    ),
                    token.line,
                    token.column,
                    token.span,
                ));
            }
            _ => {}
        }

        if self.check(&TokenKind::Indent) {
            let token = self.peek();
            return Err(ParseError::new(
                "unexpected indent",
                token.line,
                token.column,
                token.span,
            ));
        }

        let expr = self.parse_expr()?;
        self.parse_stmt_tail(expr, start)
    }

    /// Decide what kind of statement `expr` starts from the token after it
    fn parse_stmt_tail(&mut self, expr: Expr, start: SourceSpan) -> ParseResult<Stmt> {
        let kind = match self.peek_keyword() {
            Some(Keyword::Return) => {
                self.advance();
                self.expect_line_end("expected end of line after return value")?;
                StmtKind::Return(expr)
            }
            Some(Keyword::Print) => {
                let args = match expr.kind {
                    ExprKind::Paren(inner) => vec![*inner],
                    ExprKind::Tuple(items) => items,
                    _ => {
                        let token = self.peek();
                        return Err(ParseError::new(
                            format!(
                                "{} must follow a parenthesized argument list",
                                self.quoted(Keyword::Print)
                            ),
                            token.line,
                            token.column,
                            token.span,
                        ));
                    }
                };
                self.advance();
                self.expect_line_end("expected end of line after print")?;
                StmtKind::Print(args)
            }
            Some(Keyword::ForIn) => {
                let header = self.advance().clone();
                let msg = format!("expected loop variable after {}", self.quoted(Keyword::ForIn));
                let var = self.parse_ident(&msg)?;
                let msg = format!("expected {} after loop variable", self.quoted(Keyword::ForVar));
                self.expect_keyword(Keyword::ForVar, &msg)?;
                let body = self.parse_block(&header)?;
                StmtKind::For {
                    var,
                    iterable: expr,
                    body,
                }
            }
            Some(Keyword::While) => {
                let header = self.advance().clone();
                let body = self.parse_block(&header)?;
                StmtKind::While {
                    condition: expr,
                    body,
                }
            }
            _ => return self.parse_assignment_or_expr(expr, start),
        };

        let span = start.merge(self.previous().span);
        Ok(Stmt { kind, span })
    }

    fn parse_assignment_or_expr(&mut self, target: Expr, start: SourceSpan) -> ParseResult<Stmt> {
        let compound = match self.peek().kind {
            TokenKind::PlusEq => Some(BinaryOp::Add),
            TokenKind::MinusEq => Some(BinaryOp::Sub),
            TokenKind::StarEq => Some(BinaryOp::Mul),
            TokenKind::SlashEq => Some(BinaryOp::Div),
            TokenKind::PercentEq => Some(BinaryOp::Rem),
            _ => None,
        };
        let is_assign = self.check(&TokenKind::Eq);

        if !is_assign && compound.is_none() {
            let expected = [
                "end of line".to_string(),
                "'='".to_string(),
                self.quoted(Keyword::Return),
                self.quoted(Keyword::Print),
                self.quoted(Keyword::ForIn),
                self.quoted(Keyword::While),
            ];
            if !(self.match_token(&TokenKind::Newline) || self.is_at_end()) {
                return Err(self
                    .error_here("unexpected token after expression")
                    .with_expected(expected));
            }
            let span = start.merge(target.span);
            return Ok(Stmt {
                kind: StmtKind::Expr(target),
                span,
            });
        }

        if !target.is_assignable() {
            return Err(ParseError::new(
                "cannot assign to this expression",
                self.peek().line,
                self.peek().column,
                target.span,
            ));
        }

        self.advance();
        let value = self.parse_expr()?;
        self.expect_line_end("expected end of line after assigned value")?;

        let span = start.merge(value.span);
        let kind = match compound {
            Some(op) => StmtKind::CompoundAssign { target, op, value },
            None => StmtKind::Assign { target, value },
        };
        Ok(Stmt { kind, span })
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span();
        let header = self.advance().clone();
        let condition = self.parse_condition()?;
        let body = self.parse_block(&header)?;
        let mut branches = vec![Branch { condition, body }];

        while self.check_keyword(Keyword::ElseIf) {
            let header = self.advance().clone();
            let condition = self.parse_condition()?;
            let body = self.parse_block(&header)?;
            branches.push(Branch { condition, body });
        }

        let else_body = if self.check_keyword(Keyword::Else) {
            let header = self.advance().clone();
            Some(self.parse_block(&header)?)
        } else {
            None
        };

        let span = start.merge(self.previous().span);
        Ok(Stmt {
            kind: StmtKind::If(IfStmt {
                branches,
                else_body,
            }),
            span,
        })
    }

    /// Condition of an `okavela` header, closed by `aite` or `avvakapote`
    fn parse_condition(&mut self) -> ParseResult<Expr> {
        let condition = self.parse_expr()?;

        match self.peek_keyword() {
            Some(Keyword::Then) => {
                self.advance();
                Ok(condition)
            }
            Some(Keyword::Not) => {
                let span = condition.span.merge(self.current_span());
                self.advance();
                Ok(Expr::new(
                    ExprKind::Unary {
                        op: UnaryOp::Not,
                        operand: Box::new(condition),
                    },
                    span,
                ))
            }
            _ => {
                let expected = [self.quoted(Keyword::Then), self.quoted(Keyword::Not)];
                if self.check(&TokenKind::Eq) {
                    return Err(self
                        .error_here("'=' assigns; use '==' to compare in a condition")
                        .with_expected(expected));
                }
                let msg = format!("expected {} or {} after condition", expected[0], expected[1]);
                Err(self.error_here(msg).with_expected(expected))
            }
        }
    }

    fn parse_function(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span();
        let header = self.advance().clone();
        let msg = format!("expected function name after {}", self.quoted(Keyword::Def));
        let name = self.parse_ident(&msg)?;

        self.expect(&TokenKind::LParen, "expected '(' after function name")?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) {
            params.push(self.parse_ident("expected parameter name")?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen, "expected ')' after parameters")?;

        let body = self.parse_block(&header)?;
        let span = start.merge(self.previous().span);
        Ok(Stmt {
            kind: StmtKind::FunctionDef(FunctionDef { name, params, body }),
            span,
        })
    }

    /// `:` NEWLINE INDENT stmt+ DEDENT, following the header that owns it
    fn parse_block(&mut self, header: &Token) -> ParseResult<Block> {
        self.expect(&TokenKind::Colon, "expected ':' at end of block header")?;
        self.expect(&TokenKind::Newline, "expected end of line after ':'")?;

        if !self.check(&TokenKind::Indent) {
            return Err(ParseError::new(
                format!(
                    "expected an indented block after '{}' on line {}",
                    header.text, header.line
                ),
                header.line,
                header.column,
                header.span,
            )
            .with_expected([TokenKind::Indent.description()]));
        }
        let start = self.advance().span;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }
        let end = self.previous().span;
        self.match_token(&TokenKind::Dedent);

        Ok(Block {
            stmts,
            span: start.merge(end),
        })
    }

    // ==================== Expressions ====================

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_binary_expr(1)
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        let op = match self.peek().kind {
            TokenKind::Keyword(Keyword::Or) => BinaryOp::Or,
            TokenKind::Keyword(Keyword::And) => BinaryOp::And,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::BangEq => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::Ge,
            TokenKind::In => BinaryOp::In,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            _ => return None,
        };
        Some(op)
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expr> {
        self.nested(|p| p.parse_binary_chain(min_prec))
    }

    fn parse_binary_chain(&mut self, min_prec: u8) -> ParseResult<Expr> {
        // Prefix `not` sits between `and` and the comparisons
        let mut left = if min_prec <= NOT_PRECEDENCE && self.check_keyword(Keyword::Not) {
            let start = self.current_span();
            self.advance();
            let operand = self.parse_binary_expr(NOT_PRECEDENCE)?;
            let span = start.merge(operand.span);
            Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                span,
            )
        } else {
            self.parse_unary_expr()?
        };

        while let Some(op) = self.binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }

            self.advance();
            let right = self.parse_binary_expr(prec + 1)?;

            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expr> {
        self.nested(Self::parse_unary_operand)
    }

    fn parse_unary_operand(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();

        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            _ => return self.parse_postfix_expr(),
        };

        self.advance();
        let operand = self.parse_unary_expr()?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary_expr()?;

        loop {
            if self.match_token(&TokenKind::LBracket) {
                let index = self.parse_expr()?;
                self.expect(&TokenKind::RBracket, "expected ']' after index")?;
                let span = expr.span.merge(self.previous().span);
                expr = Expr::new(
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.match_token(&TokenKind::Dot) {
                let name = self.parse_ident("expected attribute name after '.'")?;
                let span = expr.span.merge(name.span);
                expr = Expr::new(
                    ExprKind::Attribute {
                        object: Box::new(expr),
                        name,
                    },
                    span,
                );
            } else if self.match_token(&TokenKind::LParen) {
                let args = self.parse_comma_list(&TokenKind::RParen)?;
                self.expect(&TokenKind::RParen, "expected ')' after arguments")?;
                let span = expr.span.merge(self.previous().span);
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Comma-separated expressions up to (not including) `close`; a trailing
    /// comma is allowed
    fn parse_comma_list(&mut self, close: &TokenKind) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();

        while !self.check(close) {
            items.push(self.parse_expr()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(items)
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();

        let literal = match &self.peek().kind {
            TokenKind::Int(text) => Some(Literal::Int(text.clone())),
            TokenKind::Float(text) => Some(Literal::Float(text.clone())),
            TokenKind::Str(text) => Some(Literal::Str(text.clone())),
            TokenKind::Keyword(Keyword::True) => Some(Literal::Bool(true)),
            TokenKind::Keyword(Keyword::False) => Some(Literal::Bool(false)),
            _ => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(Expr::new(ExprKind::Literal(literal), start));
        }

        if let TokenKind::Ident(name) = &self.peek().kind {
            let ident = Ident::new(name.clone(), start);
            self.advance();
            return Ok(Expr::new(ExprKind::Ident(ident), start));
        }

        // Grouping or tuple
        if self.match_token(&TokenKind::LParen) {
            if self.match_token(&TokenKind::RParen) {
                let span = start.merge(self.previous().span);
                return Ok(Expr::new(ExprKind::Tuple(Vec::new()), span));
            }

            let first = self.parse_expr()?;
            if self.match_token(&TokenKind::Comma) {
                let mut items = vec![first];
                items.extend(self.parse_comma_list(&TokenKind::RParen)?);
                self.expect(&TokenKind::RParen, "expected ')' after tuple elements")?;
                let span = start.merge(self.previous().span);
                return Ok(Expr::new(ExprKind::Tuple(items), span));
            }

            self.expect(&TokenKind::RParen, "expected ')' after expression")?;
            let span = start.merge(self.previous().span);
            return Ok(Expr::new(ExprKind::Paren(Box::new(first)), span));
        }

        if self.match_token(&TokenKind::LBracket) {
            let items = self.parse_comma_list(&TokenKind::RBracket)?;
            self.expect(&TokenKind::RBracket, "expected ']' after list elements")?;
            let span = start.merge(self.previous().span);
            return Ok(Expr::new(ExprKind::List(items), span));
        }

        Err(self.error_here("expected expression").with_expected([
            "identifier",
            "literal",
            "'('",
            "'['",
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use indoc::indoc;

    fn parse(source: &str) -> ParseResult<Program> {
        let keywords = KeywordTable::global();
        let tokens = Lexer::new(source, keywords)
            .tokenize()
            .expect("test source should lex");
        Parser::new(tokens, keywords).parse()
    }

    fn parse_one(source: &str) -> StmtKind {
        let mut program = parse(source).unwrap();
        assert_eq!(program.body.len(), 1);
        program.body.remove(0).kind
    }

    fn name_of(expr: &Expr) -> &str {
        match &expr.kind {
            ExprKind::Ident(ident) => &ident.name,
            other => panic!("expected identifier, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_print() {
        let StmtKind::Print(args) = parse_one(r#"("Hello", name)cheppu"#) else {
            panic!("expected print");
        };
        assert_eq!(args.len(), 2);
        assert!(matches!(&args[0].kind, ExprKind::Literal(Literal::Str(s)) if s == "\"Hello\""));

        let StmtKind::Print(args) = parse_one("()cheppu") else {
            panic!("expected print");
        };
        assert!(args.is_empty());
    }

    #[test]
    fn test_print_requires_parentheses() {
        let err = parse("x cheppu").unwrap_err();
        assert!(err.message.contains("parenthesized argument list"));
        assert_eq!((err.line, err.column), (1, 3));
    }

    #[test]
    fn test_parse_return() {
        let StmtKind::Return(expr) = parse_one("n * factorial(n - 1) ivvu") else {
            panic!("expected return");
        };
        let ExprKind::Binary { op, right, .. } = &expr.kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Mul);
        assert!(matches!(&right.kind, ExprKind::Call { args, .. } if args.len() == 1));

        let err = parse("vidhanam f():\n    ivvu\n").unwrap_err();
        assert_eq!(err.message, "expected expression, found 'ivvu'");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_parse_for_loop() {
        let source = indoc! {"
            range(5) lo i ki:
                (i)cheppu
        "};
        let StmtKind::For {
            var,
            iterable,
            body,
        } = parse_one(source)
        else {
            panic!("expected for");
        };
        assert_eq!(var.name, "i");
        assert!(matches!(iterable.kind, ExprKind::Call { .. }));
        assert_eq!(body.stmts.len(), 1);
    }

    #[test]
    fn test_parse_while_loop() {
        let source = indoc! {"
            count < 3 unnanta varaku:
                (count)cheppu
                count += 1
        "};
        let StmtKind::While { condition, body } = parse_one(source) else {
            panic!("expected while");
        };
        assert!(matches!(
            condition.kind,
            ExprKind::Binary {
                op: BinaryOp::Lt,
                ..
            }
        ));
        assert!(matches!(
            body.stmts[1].kind,
            StmtKind::CompoundAssign {
                op: BinaryOp::Add,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_function() {
        let source = indoc! {r#"
            vidhanam greet(name, greeting,):
                ("Hello", name)cheppu
                "Welcome" ivvu
        "#};
        let StmtKind::FunctionDef(def) = parse_one(source) else {
            panic!("expected function");
        };
        assert_eq!(def.name.name, "greet");
        let params: Vec<_> = def.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, ["name", "greeting"]);
        assert!(matches!(def.body.stmts[1].kind, StmtKind::Return(_)));
    }

    #[test]
    fn test_if_chain_is_flattened() {
        let source = indoc! {r#"
            okavela score >= 90 aite:
                grade = "A"
            lekapothe okavela score >= 80 aite:
                grade = "B"
            lekapothe okavela score >= 70 aite:
                grade = "C"
            lekapothe:
                grade = "F"
        "#};
        let StmtKind::If(stmt) = parse_one(source) else {
            panic!("expected if");
        };
        assert_eq!(stmt.branches.len(), 3);
        assert!(stmt.else_body.is_some());
        for branch in &stmt.branches {
            assert_eq!(branch.body.stmts.len(), 1);
            assert!(!matches!(branch.body.stmts[0].kind, StmtKind::If(_)));
        }
    }

    #[test]
    fn test_negated_condition() {
        let source = indoc! {"
            okavela done avvakapote:
                aagipo
        "};
        let StmtKind::If(stmt) = parse_one(source) else {
            panic!("expected if");
        };
        let ExprKind::Unary { op, operand } = &stmt.branches[0].condition.kind else {
            panic!("expected negated condition");
        };
        assert_eq!(*op, UnaryOp::Not);
        assert_eq!(name_of(operand), "done");
    }

    #[test]
    fn test_precedence() {
        let StmtKind::Assign { value, .. } = parse_one("x = a leda b mariyu c") else {
            panic!("expected assignment");
        };
        let ExprKind::Binary { op, right, .. } = &value.kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Or);
        assert!(matches!(
            right.kind,
            ExprKind::Binary {
                op: BinaryOp::And,
                ..
            }
        ));

        let StmtKind::Assign { value, .. } = parse_one("x = 1 + 2 * 3 - 4") else {
            panic!("expected assignment");
        };
        let ExprKind::Binary { op, left, .. } = &value.kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Sub);
        assert!(matches!(
            left.kind,
            ExprKind::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        let StmtKind::Assign { value, .. } = parse_one("x = avvakapote a > 5 mariyu b") else {
            panic!("expected assignment");
        };
        let ExprKind::Binary { op, left, .. } = &value.kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::And);
        let ExprKind::Unary { op, operand } = &left.kind else {
            panic!("expected not");
        };
        assert_eq!(*op, UnaryOp::Not);
        assert!(matches!(
            operand.kind,
            ExprKind::Binary {
                op: BinaryOp::Gt,
                ..
            }
        ));
    }

    #[test]
    fn test_membership_and_postfix() {
        let StmtKind::Expr(expr) = parse_one(r#"user.roles[0] in ["admin", "mod",]"#) else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { left, op, right } = &expr.kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::In);
        assert!(matches!(left.kind, ExprKind::Index { .. }));
        assert!(matches!(&right.kind, ExprKind::List(items) if items.len() == 2));
    }

    #[test]
    fn test_assignment_targets() {
        assert!(matches!(
            parse_one("obj.count = 1"),
            StmtKind::Assign { .. }
        ));
        assert!(matches!(
            parse_one("items[0] -= 2"),
            StmtKind::CompoundAssign {
                op: BinaryOp::Sub,
                ..
            }
        ));

        let err = parse("f() = 3").unwrap_err();
        assert_eq!(err.message, "cannot assign to this expression");
    }

    #[test]
    fn test_tuples_and_groups() {
        let StmtKind::Assign { value, .. } = parse_one("pair = (1, 2)") else {
            panic!("expected assignment");
        };
        assert!(matches!(&value.kind, ExprKind::Tuple(items) if items.len() == 2));

        let StmtKind::Assign { value, .. } = parse_one("single = (1,)") else {
            panic!("expected assignment");
        };
        assert!(matches!(&value.kind, ExprKind::Tuple(items) if items.len() == 1));

        let StmtKind::Assign { value, .. } = parse_one("y = (a + b) * c") else {
            panic!("expected assignment");
        };
        let ExprKind::Binary { left, .. } = &value.kind else {
            panic!("expected binary");
        };
        assert!(matches!(left.kind, ExprKind::Paren(_)));
    }

    #[test]
    fn test_missing_then() {
        let err = parse("okavela x > 5:\n    (x)cheppu\n").unwrap_err();
        assert_eq!(
            err.message,
            "expected 'aite' or 'avvakapote' after condition, found ':'"
        );
        assert_eq!(err.expected, ["'aite'", "'avvakapote'"]);
        assert_eq!((err.line, err.column), (1, 14));
    }

    #[test]
    fn test_bare_equals_in_condition() {
        let err = parse("okavela i = 5 aite:\n    aagipo\n").unwrap_err();
        assert!(err.message.contains("use '=='"));
        assert_eq!((err.line, err.column), (1, 11));
    }

    #[test]
    fn test_empty_block_reports_header_line() {
        let source = indoc! {"
            x = 1
            okavela x > 0 aite:
            y = 2
        "};
        let err = parse(source).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("expected an indented block after 'okavela'"));

        let err = parse("vidhanam f():\n").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_nesting_limit() {
        let parens = |n: usize| format!("x = {}1{}", "(".repeat(n), ")".repeat(n));
        assert!(parse(&parens(50)).is_ok());

        let err = parse(&parens(10_000)).unwrap_err();
        assert_eq!(err.message, "expression nested too deeply, found '('");
        assert_eq!(err.line, 1);

        let negations = format!("x = {}y", "- ".repeat(10_000));
        let err = parse(&negations).unwrap_err();
        assert!(err.message.starts_with("expression nested too deeply"));

        let nots = format!("x = {}y", "avvakapote ".repeat(10_000));
        assert!(parse(&nots).is_err());
    }

    #[test]
    fn test_stray_else() {
        let err = parse("lekapothe:\n    aagipo\n").unwrap_err();
        assert_eq!(err.message, "'lekapothe' without a matching 'okavela'");
    }

    #[test]
    fn test_unexpected_indent() {
        let err = parse("x = 1\n    y = 2\n").unwrap_err();
        assert_eq!(err.message, "unexpected indent");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse("x y").unwrap_err();
        assert_eq!(
            err.message,
            "unexpected token after expression, found identifier 'y'"
        );
        assert!(err.expected.contains(&"'cheppu'".to_string()));
        assert!(err.expected.contains(&"'unnanta varaku'".to_string()));
    }

    #[test]
    fn test_missing_loop_keyword() {
        let err = parse("items lo item:\n    (item)cheppu\n").unwrap_err();
        assert_eq!(err.message, "expected 'ki' after loop variable, found ':'");
    }

    #[test]
    fn test_break_continue() {
        let source = indoc! {"
            Nijam unnanta varaku:
                aagipo
                munduku vellu
        "};
        let StmtKind::While { condition, body } = parse_one(source) else {
            panic!("expected while");
        };
        assert!(matches!(
            condition.kind,
            ExprKind::Literal(Literal::Bool(true))
        ));
        assert!(matches!(body.stmts[0].kind, StmtKind::Break));
        assert!(matches!(body.stmts[1].kind, StmtKind::Continue));
    }

    #[test]
    fn test_tokens_without_eof() {
        let keywords = KeywordTable::global();
        let program = Parser::new(Vec::new(), keywords).parse().unwrap();
        assert!(program.body.is_empty());
    }
}
