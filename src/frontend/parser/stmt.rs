use super::Parser;
use crate::ast::{Block, Class, Elif, Func, Node};
use crate::error::ParseError;
use crate::frontend::lexer::TokenKind;

impl Parser {
    pub fn parse_statement(&mut self) -> Result<Node, ParseError> {
        match self.peek().kind {
            TokenKind::Let | TokenKind::Const => self.parse_let_statement(),
            TokenKind::Print => self.parse_print_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Def => Ok(Node::Func(self.parse_function_definition()?)),
            TokenKind::Class => self.parse_class_definition(),
            TokenKind::Import => self.parse_import_statement(),
            TokenKind::Break => {
                self.advance();
                Ok(Node::Break)
            }
            TokenKind::Continue => {
                self.advance();
                Ok(Node::Continue)
            }
            TokenKind::Return => {
                self.advance();
                Ok(Node::Return(self.parse_optional_value()?))
            }
            TokenKind::Yield => {
                self.advance();
                Ok(Node::Yield(self.parse_optional_value()?))
            }
            TokenKind::Elif | TokenKind::Else => Err(self.unexpected("outside if statement")),
            TokenKind::Identifier => self.parse_assignment_or_expression(),
            _ => self.parse_expression(),
        }
    }

    /// Parses a leading expression speculatively and decides from the next
    /// token whether it was an assignment target. If it was not, the cursor is
    /// rewound and the input is read again as a plain expression.
    fn parse_assignment_or_expression(&mut self) -> Result<Node, ParseError> {
        let checkpoint = self.checkpoint();
        let target = self.parse_expression()?;
        let op = self.peek().clone();

        match op.kind {
            TokenKind::Assign => {
                if !matches!(target, Node::Var(_) | Node::Index { .. } | Node::Attr { .. }) {
                    return Err(ParseError::InvalidTarget {
                        target: target.kind_name(),
                        op: op.lexeme,
                        line: op.line,
                        column: op.column,
                    });
                }
                self.advance();
                let value = Box::new(self.parse_expression()?);
                Ok(match target {
                    Node::Index { collection, index } => Node::IndexAssign { collection, index, value },
                    Node::Attr { object, name } => Node::AttrAssign { object, name, value },
                    Node::Var(name) => Node::Assign { name, value },
                    _ => unreachable!("assignment target checked above"),
                })
            }
            TokenKind::CompoundAssign => {
                let target_kind = target.kind_name();
                let Node::Var(name) = target else {
                    return Err(ParseError::InvalidTarget {
                        target: target_kind,
                        op: op.lexeme,
                        line: op.line,
                        column: op.column,
                    });
                };
                self.advance();
                let value = Box::new(self.parse_expression()?);
                Ok(Node::CompoundAssign { name, op: op.lexeme, value })
            }
            _ => {
                self.restore(checkpoint);
                self.parse_expression()
            }
        }
    }

    fn parse_let_statement(&mut self) -> Result<Node, ParseError> {
        self.advance();
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Assign)?;
        let value = Box::new(self.parse_expression()?);
        Ok(Node::Assign { name, value })
    }

    fn parse_print_statement(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Print)?;
        Ok(Node::Print(Box::new(self.parse_expression()?)))
    }

    fn parse_optional_value(&mut self) -> Result<Option<Box<Node>>, ParseError> {
        match self.peek().kind {
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => Ok(None),
            _ => Ok(Some(Box::new(self.parse_expression()?))),
        }
    }

    pub(super) fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.skip_newlines();
        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        loop {
            self.skip_separators();
            if self.check(TokenKind::RBrace) {
                break;
            }
            if self.at_end() {
                return Err(self.expected(format!("{:?}", TokenKind::RBrace)));
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block { statements })
    }

    fn parse_if_statement(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::If)?;
        let condition = Box::new(self.parse_expression()?);
        let then_body = self.parse_block()?;

        let mut elif_nodes = Vec::new();
        let mut else_body = None;
        loop {
            match self.peek_kind_past_newlines() {
                TokenKind::Elif => {
                    self.skip_newlines();
                    self.advance();
                    elif_nodes.push(self.parse_elif_clause()?);
                }
                TokenKind::Else => {
                    self.skip_newlines();
                    self.advance();
                    if self.match_token(TokenKind::If) {
                        elif_nodes.push(self.parse_elif_clause()?);
                    } else {
                        else_body = Some(self.parse_block()?);
                        break;
                    }
                }
                _ => break,
            }
        }

        Ok(Node::If { condition, then_body, elif_nodes, else_body })
    }

    fn parse_elif_clause(&mut self) -> Result<Elif, ParseError> {
        let condition = Box::new(self.parse_expression()?);
        let then_body = self.parse_block()?;
        Ok(Elif { condition, then_body, else_body: None })
    }

    fn parse_while_statement(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::While)?;
        let condition = Box::new(self.parse_expression()?);
        let body = self.parse_block()?;
        Ok(Node::While { condition, body })
    }

    fn parse_for_statement(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::For)?;
        let var_name = self.expect_identifier()?;
        self.expect(TokenKind::In)?;
        let iterable = Box::new(self.parse_expression()?);
        let body = self.parse_block()?;
        Ok(Node::For { var_name, iterable, body })
    }

    fn parse_function_definition(&mut self) -> Result<Func, ParseError> {
        self.expect(TokenKind::Def)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LParenthesis)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParenthesis) {
            loop {
                params.push(self.expect_identifier()?);
                if !self.match_token(TokenKind::Separator) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParenthesis)?;
        let body = self.parse_block()?;
        Ok(Func { name, params, body })
    }

    fn parse_class_definition(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Class)?;
        let mut class = Class::new(self.expect_identifier()?);
        self.skip_newlines();
        self.expect(TokenKind::LBrace)?;
        loop {
            self.skip_separators();
            match self.peek().kind {
                TokenKind::RBrace => break,
                TokenKind::Let => {
                    self.advance();
                    class.declare_field(self.expect_identifier()?);
                }
                TokenKind::Def => class.define_method(self.parse_function_definition()?),
                TokenKind::Eof => return Err(self.expected(format!("{:?}", TokenKind::RBrace))),
                _ => return Err(self.unexpected("in class body")),
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Node::Class(class))
    }

    fn parse_import_statement(&mut self) -> Result<Node, ParseError> {
        self.expect(TokenKind::Import)?;
        let mut path = self.expect_identifier()?;
        while self.match_token(TokenKind::Access) {
            path.push('.');
            path.push_str(&self.expect_identifier()?);
        }
        Ok(Node::Import(path))
    }
}
