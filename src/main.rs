use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser as CliParser;
use miette::{IntoDiagnostic, WrapErr};

use larch::environment::Environment;
use larch::evaluator;
use larch::lexer::Lexer;
use larch::parser::Parser;
use larch::repl;

#[derive(CliParser, Debug)]
#[command(name = "larch", about = "Interpreter for the Larch expression language")]
struct Args {
    /// Script to run; starts a REPL when omitted.
    script: Option<PathBuf>,

    /// Print the parsed program in its canonical form instead of evaluating.
    #[arg(long, conflicts_with = "tokens")]
    ast: bool,

    /// Print the token stream instead of evaluating.
    #[arg(long)]
    tokens: bool,
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    let Some(path) = args.script else {
        println!("Welcome to the Larch REPL!");
        return repl::start(io::stdin().lock(), io::stdout()).into_diagnostic();
    };

    let source = fs::read_to_string(&path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading `{}` failed", path.display()))?;

    if args.tokens {
        for token in Lexer::new(&source) {
            println!("{} {:?}", token.kind, token.literal);
        }
        return Ok(());
    }

    let program = Parser::new(Lexer::new(&source)).parse_program()?;

    if args.ast {
        println!("{program}");
        return Ok(());
    }

    let mut env = Environment::new();
    println!("{}", evaluator::eval(&program, &mut env));

    Ok(())
}
