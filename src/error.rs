use thiserror::Error;

use crate::frontend::lexer::TokenKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Illegal character '{character}' at {line}:{column}")]
    IllegalCharacter {
        character: char,
        line: usize,
        column: usize,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected {expected}, got {found:?} ({lexeme:?}) at {line}:{column}")]
    Expected {
        expected: String,
        found: TokenKind,
        lexeme: String,
        line: usize,
        column: usize,
    },
    #[error("Unexpected token {found:?} ({lexeme:?}) {context} at {line}:{column}")]
    Unexpected {
        found: TokenKind,
        lexeme: String,
        context: &'static str,
        line: usize,
        column: usize,
    },
    #[error("Cannot assign to {target} with '{op}' at {line}:{column}")]
    InvalidTarget {
        target: &'static str,
        op: String,
        line: usize,
        column: usize,
    },
    #[error("Invalid number literal '{literal}' at {line}:{column}")]
    InvalidNumber {
        literal: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub fn position(&self) -> (usize, usize) {
        match self {
            ParseError::Expected { line, column, .. }
            | ParseError::Unexpected { line, column, .. }
            | ParseError::InvalidTarget { line, column, .. }
            | ParseError::InvalidNumber { line, column, .. } => (*line, *column),
        }
    }
}

/// Raised when the generator meets a tree it has no lowering for. These point
/// at a parser/generator mismatch rather than at bad user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error("Unknown node type: {node}")]
    UnknownNode { node: String },
    #[error("Operator '{op}' has no Python equivalent")]
    UnsupportedOperator { op: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Unsupported operand types for '{op}': {left} and {right}")]
    TypeMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },
    #[error("Bad operand type for '{op}': {operand}")]
    BadOperand { op: String, operand: &'static str },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow in '{op}'")]
    Overflow { op: String },
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },
    #[error("'{type_name}' object has no attribute '{attribute}'")]
    UnknownAttribute {
        type_name: String,
        attribute: String,
    },
    #[error("{name}() takes {expected} arguments but {found} were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Cannot convert {value} to {target}")]
    InvalidCast { value: String, target: &'static str },
    #[error("Failed to read input: {message}")]
    Input { message: String },
    #[error("The evaluator does not support {node}")]
    Unsupported { node: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Codegen error: {0}")]
    Codegen(#[from] CodegenError),
    #[error("Runtime error: {0}")]
    Eval(#[from] EvalError),
}

impl CompilerError {
    /// Source position for errors raised before a tree exists.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            CompilerError::Lex(LexError::IllegalCharacter { line, column, .. }) => {
                Some((*line, *column))
            }
            CompilerError::Parse(err) => Some(err.position()),
            CompilerError::Codegen(_) | CompilerError::Eval(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_reports_expected_and_found() {
        let err = CompilerError::from(ParseError::Expected {
            expected: "RBrace".to_string(),
            found: TokenKind::Eof,
            lexeme: String::new(),
            line: 3,
            column: 1,
        });
        assert_eq!(
            err.to_string(),
            "Parse error: Expected RBrace, got Eof (\"\") at 3:1"
        );
        assert_eq!(err.position(), Some((3, 1)));
    }

    #[test]
    fn codegen_errors_have_no_position() {
        let err = CompilerError::from(CodegenError::UnknownNode {
            node: "While".to_string(),
        });
        assert_eq!(err.to_string(), "Codegen error: Unknown node type: While");
        assert_eq!(err.position(), None);
    }
}
