pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, tokenize_lines, Token, TokenKind};
pub use parser::Parser;
