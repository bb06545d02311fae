//! Brahmic CLI - Tenglish to Python transpiler

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{debug, error};

use brahmic::errors::print_error;
use brahmic::{CodeGenerator, PythonGenerator, TranspileError, Transpiler};

#[derive(Parser)]
#[command(name = "brahmic")]
#[command(about = "Transpile Tenglish (Telugu-English) programs to Python", version)]
struct Cli {
    /// Tenglish source file (reads stdin when neither FILE nor --code is given)
    #[arg(conflicts_with = "code")]
    file: Option<PathBuf>,

    /// Tenglish code passed directly on the command line
    #[arg(short, long)]
    code: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to produce
    #[arg(long, value_enum, default_value_t = Emit::Python)]
    emit: Emit,

    /// Spaces per indentation level in the generated Python
    #[arg(long, default_value_t = brahmic::codegen::DEFAULT_INDENT_WIDTH)]
    indent: usize,

    /// Log pipeline progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Generated Python source
    Python,
    /// Token stream, one token per line
    Tokens,
    /// Parsed syntax tree
    Ast,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let (source, filename) = match read_source(&cli) {
        Ok(input) => input,
        Err(e) => {
            error!("failed to read input: {}", e);
            eprintln!("Error reading input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let transpiler = Transpiler::new().with_indent_width(cli.indent);
    let rendered = match render(&transpiler, &source, cli.emit) {
        Ok(text) => text,
        Err(e) => {
            print_error(&source, &filename, &e);
            return ExitCode::FAILURE;
        }
    };

    match &cli.output {
        Some(path) => match fs::write(path, &rendered) {
            Ok(()) => {
                debug!("wrote {} bytes to {}", rendered.len(), path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error writing '{}': {}", path.display(), e);
                ExitCode::FAILURE
            }
        },
        None => {
            print!("{}", rendered);
            ExitCode::SUCCESS
        }
    }
}

/// Source text plus the name used in diagnostics
fn read_source(cli: &Cli) -> io::Result<(String, String)> {
    if let Some(code) = &cli.code {
        return Ok((code.clone(), "<code>".to_string()));
    }

    match &cli.file {
        Some(path) => Ok((fs::read_to_string(path)?, path.display().to_string())),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok((source, "<stdin>".to_string()))
        }
    }
}

fn render(
    transpiler: &Transpiler<'_>,
    source: &str,
    emit: Emit,
) -> Result<String, TranspileError> {
    match emit {
        Emit::Python => transpiler.transpile(source),
        Emit::Tokens => {
            let tokens = transpiler.tokenize(source)?;
            let mut out = String::new();
            for (i, token) in tokens.iter().enumerate() {
                out.push_str(&format!(
                    "{:4} {:>4}:{:<4} {:<16} {:?}\n",
                    i,
                    token.line,
                    token.column,
                    token.kind.description(),
                    token.text
                ));
            }
            Ok(out)
        }
        Emit::Ast => {
            let program = transpiler.parse(source)?;
            let generator = PythonGenerator::new(transpiler.keywords());
            Ok(format!(
                "# {} statements, target {} (.{})\n{:#?}\n",
                program.body.len(),
                generator.language_name(),
                generator.file_extension(),
                program
            ))
        }
    }
}
