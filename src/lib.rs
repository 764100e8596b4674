pub mod ast;
pub mod backend;
pub mod error;
pub mod frontend;

use ast::Program;
use backend::{Codegen, Evaluator};
use error::CompilerError;
use frontend::Parser;

/// Tokenizes and parses source text into a syntax tree.
pub fn parse(source: &str) -> Result<Program, CompilerError> {
    let tokens = frontend::tokenize(source)?;
    Ok(Parser::new(tokens).parse_program()?)
}

/// Compiles sprig source to Python source.
/// Returns the generated text without a trailing newline.
pub fn transpile(source: &str) -> Result<String, CompilerError> {
    let program = parse(source)?;
    Ok(Codegen::new().generate(&program)?)
}

/// Same as [`transpile`] for input already split into lines.
pub fn transpile_lines<I, S>(lines: I) -> Result<String, CompilerError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens = frontend::tokenize_lines(lines)?;
    let program = Parser::new(tokens).parse_program()?;
    Ok(Codegen::new().generate(&program)?)
}

/// Runs source with the built-in evaluator and returns the printed lines.
/// `input()` has nothing to read and fails.
pub fn evaluate(source: &str) -> Result<Vec<String>, CompilerError> {
    let program = parse(source)?;
    Ok(Evaluator::with_inputs(Vec::<String>::new()).run(&program)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn pipeline_end_to_end() {
        let source = indoc! {"
            let total = 0
            for i in range(1, 4) {
                total += i
            }
            print(total)
        "};
        let expected = indoc! {"
            total = 0
            for i in range(1, 4):
                total += i
            print(total)"};
        assert_eq!(transpile(source), Ok(expected.to_string()));
        assert_eq!(evaluate(source), Ok(vec!["6".to_string()]));
    }

    #[test]
    fn lines_and_text_agree() {
        let lines = ["let x = [1, 2]", "x[0] = 2", "print(x)"];
        assert_eq!(transpile_lines(lines), transpile(&lines.join("\n")));
    }

    #[test]
    fn errors_carry_their_stage() {
        assert!(matches!(transpile("let x = $"), Err(CompilerError::Lex(_))));
        assert!(matches!(transpile("if x { print(x)"), Err(CompilerError::Parse(_))));
        assert!(matches!(transpile("print(a => b)"), Err(CompilerError::Codegen(_))));
        assert!(matches!(evaluate("print(y)"), Err(CompilerError::Eval(_))));
    }

    #[test]
    fn one_statement_per_top_level_entry() {
        let program =
            parse("let a = 1; let b = 2\nprint(a + b)\n\nwhile false {}").expect("parse failed");
        assert_eq!(program.statements.len(), 4);
    }
}
