use super::Parser;
use crate::ast::{CastType, Node, Number};
use crate::error::ParseError;
use crate::frontend::lexer::TokenKind;

type Level = fn(&mut Parser) -> Result<Node, ParseError>;

impl Parser {
    pub fn parse_expression(&mut self) -> Result<Node, ParseError> {
        self.parse_special()
    }

    fn parse_special(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_logical()?;
        while self.check(TokenKind::Special) {
            let op = self.advance().lexeme;
            let right = self.parse_logical()?;
            node = Node::SpecialOp { left: Box::new(node), op, right: Box::new(right) };
        }
        Ok(node)
    }

    fn parse_logical(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_comparison()?;
        while self.check(TokenKind::Logic) {
            let op = self.advance().lexeme;
            let right = self.parse_comparison()?;
            node = Node::LogicOp { left: Box::new(node), op, right: Box::new(right) };
        }
        Ok(node)
    }

    fn parse_comparison(&mut self) -> Result<Node, ParseError> {
        let node = self.parse_bitwise()?;
        if self.check(TokenKind::Comparison) {
            let op = self.advance().lexeme;
            let right = self.parse_bitwise()?;
            return Ok(Node::BinOp { left: Box::new(node), op, right: Box::new(right) });
        }
        Ok(node)
    }

    fn parse_bitwise(&mut self) -> Result<Node, ParseError> {
        self.parse_arith_level(&["&", "|", "^"], Parser::parse_shift)
    }

    fn parse_shift(&mut self) -> Result<Node, ParseError> {
        self.parse_arith_level(&["<<", ">>"], Parser::parse_additive)
    }

    fn parse_additive(&mut self) -> Result<Node, ParseError> {
        self.parse_arith_level(&["+", "-"], Parser::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<Node, ParseError> {
        self.parse_arith_level(&["*", "/", "//", "%"], Parser::parse_unary)
    }

    /// One left-associative level of arithmetic operators.
    fn parse_arith_level(&mut self, ops: &[&str], next: Level) -> Result<Node, ParseError> {
        let mut node = next(self)?;
        while self.check_op(TokenKind::Arith, ops) {
            let op = self.advance().lexeme;
            let right = next(self)?;
            node = Node::BinOp { left: Box::new(node), op, right: Box::new(right) };
        }
        Ok(node)
    }

    /// Every operand position starts here, so an operand may sit on the line
    /// after its operator.
    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        self.skip_newlines();
        if self.check_op(TokenKind::Arith, &["+", "-"]) || self.check(TokenKind::Step) {
            let op = self.advance().lexeme;
            let operand = self.parse_unary()?;
            return Ok(Node::UnaryOp { op, operand: Box::new(operand) });
        }
        if self.match_token(TokenKind::Not) {
            let operand = self.parse_unary()?;
            return Ok(Node::Not(Box::new(operand)));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Node, ParseError> {
        let base = self.parse_postfix()?;
        if self.check_op(TokenKind::Arith, &["**"]) {
            let op = self.advance().lexeme;
            let exponent = self.parse_unary()?;
            return Ok(Node::BinOp { left: Box::new(base), op, right: Box::new(exponent) });
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_primary()?;
        loop {
            match self.peek().kind {
                TokenKind::LBracket => {
                    self.advance();
                    self.skip_newlines();
                    let index = self.parse_expression()?;
                    self.skip_newlines();
                    self.expect(TokenKind::RBracket)?;
                    node = Node::Index { collection: Box::new(node), index: Box::new(index) };
                }
                TokenKind::LParenthesis => {
                    self.advance();
                    let args = self.parse_delimited(TokenKind::RParenthesis)?;
                    node = Node::Call { callee: Box::new(node), args };
                }
                TokenKind::Access => {
                    self.advance();
                    let name = self.expect_identifier()?;
                    node = Node::Attr { object: Box::new(node), name };
                }
                _ => break,
            }
        }
        Ok(node)
    }

    /// Comma-separated expressions up to `close`, after the opening token has
    /// been consumed. Newlines and a trailing comma are allowed.
    fn parse_delimited(&mut self, close: TokenKind) -> Result<Vec<Node>, ParseError> {
        let mut items = Vec::new();
        self.skip_newlines();
        while !self.check(close) {
            items.push(self.parse_expression()?);
            self.skip_newlines();
            if !self.match_token(TokenKind::Separator) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(close)?;
        Ok(items)
    }

    /// `(expr)` for the built-in call forms.
    fn parse_parenthesized_argument(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::LParenthesis)?;
        self.skip_newlines();
        let expr = self.parse_expression()?;
        self.skip_newlines();
        self.expect(TokenKind::RParenthesis)?;
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Integer => {
                self.advance();
                let value = token.lexeme.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
                    literal: token.lexeme.clone(),
                    line: token.line,
                    column: token.column,
                })?;
                Ok(Node::Number(Number::Int(value)))
            }
            TokenKind::Float => {
                self.advance();
                let value = token.lexeme.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                    literal: token.lexeme.clone(),
                    line: token.line,
                    column: token.column,
                })?;
                Ok(Node::Number(Number::Float(value)))
            }
            TokenKind::String => {
                let text = unquote(&token.lexeme).ok_or_else(|| self.expected("string literal"))?;
                self.advance();
                Ok(Node::Str(text.to_string()))
            }
            TokenKind::True => {
                self.advance();
                Ok(Node::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Node::Bool(false))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Node::Var(token.lexeme))
            }
            TokenKind::LParenthesis => self.parse_parenthesized_argument(),
            TokenKind::LBracket => {
                self.advance();
                Ok(Node::List(self.parse_delimited(TokenKind::RBracket)?))
            }
            TokenKind::Input => {
                self.advance();
                self.expect(TokenKind::LParenthesis)?;
                let prompt = if self.check(TokenKind::RParenthesis) {
                    None
                } else {
                    Some(Box::new(self.parse_expression()?))
                };
                self.expect(TokenKind::RParenthesis)?;
                Ok(Node::Input(prompt))
            }
            TokenKind::Len => {
                self.advance();
                Ok(Node::Len(Box::new(self.parse_parenthesized_argument()?)))
            }
            TokenKind::IntCast | TokenKind::StrCast | TokenKind::FloatCast => {
                self.advance();
                let cast_type = match token.kind {
                    TokenKind::IntCast => CastType::Int,
                    TokenKind::StrCast => CastType::Str,
                    _ => CastType::Float,
                };
                let value = Box::new(self.parse_parenthesized_argument()?);
                Ok(Node::Cast { cast_type, value })
            }
            TokenKind::Range => {
                self.advance();
                self.expect(TokenKind::LParenthesis)?;
                let first = self.parse_expression()?;
                let range = if self.match_token(TokenKind::Separator) {
                    let end = self.parse_expression()?;
                    Node::Range { start: Box::new(first), end: Box::new(end) }
                } else {
                    Node::Range {
                        start: Box::new(Node::Number(Number::Int(0))),
                        end: Box::new(first),
                    }
                };
                self.expect(TokenKind::RParenthesis)?;
                Ok(range)
            }
            _ => Err(self.expected("expression")),
        }
    }
}

/// Text between matching single or double quotes.
fn unquote(lexeme: &str) -> Option<&str> {
    let quote = lexeme.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    lexeme.strip_prefix(quote)?.strip_suffix(quote)
}
