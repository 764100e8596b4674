use std::fmt;

use colored::Colorize;
use sprig::error::CompilerError;

/// A compiler error rendered against the source it came from.
pub struct Diagnostic<'a> {
    error: &'a CompilerError,
    file: &'a str,
    source: &'a str,
}

impl<'a> Diagnostic<'a> {
    pub fn new(error: &'a CompilerError, file: &'a str, source: &'a str) -> Self {
        Diagnostic { error, file, source }
    }

    fn kind(&self) -> &'static str {
        match self.error {
            CompilerError::Lex(_) => "lex error",
            CompilerError::Parse(_) => "parse error",
            CompilerError::Codegen(_) => "codegen error",
            CompilerError::Eval(_) => "runtime error",
        }
    }

    fn message(&self) -> String {
        match self.error {
            CompilerError::Lex(err) => err.to_string(),
            CompilerError::Parse(err) => err.to_string(),
            CompilerError::Codegen(err) => err.to_string(),
            CompilerError::Eval(err) => err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}: {}", self.kind().red().bold(), self.message().bold())?;

        let Some((line, column)) = self.error.position() else {
            return writeln!(f, "{}", format!("  --> {}", self.file).bright_blue());
        };
        writeln!(f, "{}", format!("  --> {}:{line}:{column}", self.file).bright_blue())?;

        // Eof sits one line past the end and has no text to show.
        let Some(text) = self.source.lines().nth(line.saturating_sub(1)) else {
            return Ok(());
        };
        writeln!(f, "   {}", "|".bright_blue())?;
        writeln!(f, "{} {} {}", format!("{line:3}").bright_blue(), "|".bright_blue(), text)?;
        writeln!(
            f,
            "   {} {}{}",
            "|".bright_blue(),
            " ".repeat(column.saturating_sub(1)),
            "^".red().bold()
        )
    }
}
