mod expr;
mod stmt;

use super::lexer::{Token, TokenKind};
use crate::ast::Program;
use crate::error::ParseError;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Saved read position for the statement/expression disambiguation.
#[derive(Debug, Clone, Copy)]
struct Checkpoint(usize);

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let line = tokens.last().map_or(1, |t| t.line + 1);
            tokens.push(Token::new(TokenKind::Eof, "", line, 1));
        }
        Parser { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub fn check(&self, expected: TokenKind) -> bool {
        self.peek().kind == expected
    }

    pub fn check_op(&self, kind: TokenKind, ops: &[&str]) -> bool {
        let token = self.peek();
        token.kind == kind && ops.contains(&token.lexeme.as_str())
    }

    pub fn match_token(&mut self, expected: TokenKind) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(self.expected(format!("{:?}", expected)))
        }
    }

    pub fn expect_identifier(&mut self) -> Result<String, ParseError> {
        Ok(self.expect(TokenKind::Identifier)?.lexeme)
    }

    pub fn at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    fn skip_newlines(&mut self) {
        while self.match_token(TokenKind::Newline) {}
    }

    fn skip_separators(&mut self) {
        while self.match_token(TokenKind::Newline) || self.match_token(TokenKind::Semicolon) {}
    }

    /// Kind of the first token that is not a newline, without consuming anything.
    fn peek_kind_past_newlines(&self) -> TokenKind {
        self.tokens[self.pos..]
            .iter()
            .map(|t| t.kind)
            .find(|kind| *kind != TokenKind::Newline)
            .unwrap_or(TokenKind::Eof)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.0;
    }

    fn expected(&self, expected: impl Into<String>) -> ParseError {
        let token = self.peek();
        ParseError::Expected {
            expected: expected.into(),
            found: token.kind,
            lexeme: token.lexeme.clone(),
            line: token.line,
            column: token.column,
        }
    }

    fn unexpected(&self, context: &'static str) -> ParseError {
        let token = self.peek();
        ParseError::Unexpected {
            found: token.kind,
            lexeme: token.lexeme.clone(),
            context,
            line: token.line,
            column: token.column,
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        loop {
            self.skip_separators();
            if self.at_end() {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }
}

pub fn parse_tokens(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}
