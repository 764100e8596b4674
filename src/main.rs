mod diagnostic;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use colored::Colorize;

use diagnostic::Diagnostic;
use sprig::backend::{Codegen, Evaluator};
use sprig::error::CompilerError;
use sprig::frontend::{tokenize, Parser};

#[derive(ClapParser)]
#[command(
    name = "sprig",
    about = "Transpile sprig scripts to Python",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    /// Path to the .sprig file; stdin is read when omitted
    file: Option<PathBuf>,

    /// Compile this code instead of a file
    #[arg(short, long, conflicts_with = "file")]
    eval: Option<String>,

    /// Write the output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Execute with the built-in evaluator instead of printing Python
    #[arg(long)]
    run: bool,

    /// Which pipeline stage to print
    #[arg(long, value_enum, default_value_t = Emit::Python)]
    emit: Emit,

    /// Report each pipeline stage on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Tokens,
    Ast,
    Python,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (name, source) = match load_source(&cli) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{}: {err:#}", "error".red().bold());
            return ExitCode::FAILURE;
        }
    };

    match compile(&cli, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CompilerError>() {
                Some(error) => eprint!("{}", Diagnostic::new(error, &name, &source)),
                None => eprintln!("{}: {err:#}", "error".red().bold()),
            }
            ExitCode::FAILURE
        }
    }
}

fn load_source(cli: &Cli) -> Result<(String, String)> {
    if let Some(code) = &cli.eval {
        return Ok(("<eval>".to_string(), code.clone()));
    }
    if let Some(path) = &cli.file {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Reading {}", path.display()))?;
        return Ok((path.display().to_string(), source));
    }
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("Reading stdin")?;
    Ok(("<stdin>".to_string(), source))
}

fn stage(cli: &Cli, message: String) {
    if cli.verbose {
        eprintln!("{} {message}", "info:".cyan().bold());
    }
}

fn compile(cli: &Cli, source: &str) -> Result<()> {
    let tokens = tokenize(source).map_err(CompilerError::from)?;
    stage(cli, format!("tokenized {} tokens", tokens.len()));

    if cli.emit == Emit::Tokens && !cli.run {
        let listing: Vec<String> = tokens
            .iter()
            .map(|token| format!("{}:{} {:?} {:?}", token.line, token.column, token.kind, token.lexeme))
            .collect();
        return write_output(cli, &listing.join("\n"));
    }

    let program = Parser::new(tokens).parse_program().map_err(CompilerError::from)?;
    stage(cli, format!("parsed {} statements", program.statements.len()));

    if cli.run {
        let lines = Evaluator::new().run(&program).map_err(CompilerError::from)?;
        stage(cli, format!("evaluated, {} lines printed", lines.len()));
        return Ok(());
    }

    if cli.emit == Emit::Ast {
        return write_output(cli, &format!("{program:#?}"));
    }

    let python = Codegen::new().generate(&program).map_err(CompilerError::from)?;
    stage(cli, format!("generated {} bytes of Python", python.len()));
    write_output(cli, &python)
}

fn write_output(cli: &Cli, text: &str) -> Result<()> {
    match &cli.output {
        Some(path) => {
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("Writing {}", path.display()))?;
            stage(cli, format!("wrote {}", path.display()));
        }
        None if !text.is_empty() => println!("{text}"),
        None => {}
    }
    Ok(())
}
