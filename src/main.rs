// cmini: tokenizer and parser front end for a small C-like teaching language

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::process;

use clap::Parser as _;
use cmini::parser::lexer::{LexError, Lexer};
use cmini::parser::parse::{ParseError, Parser};
use cmini::trace::{TreeBuilder, WriteSink};
use log::info;
use thiserror::Error;

/// Path meaning stdin for input and stdout for output.
const STD_STREAM: &str = "-";

#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Source program to analyze ("-" for stdin)
    #[arg(default_value = "testfile.txt")]
    input: String,

    /// Where to write the result ("-" for stdout)
    #[arg(short, long, default_value = "output.txt")]
    output: String,

    /// Write the token listing instead of the derivation trace
    #[arg(long, conflicts_with = "tree")]
    tokens: bool,

    /// Write the indented derivation tree instead of the flat trace
    #[arg(long)]
    tree: bool,

    /// Log parser decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("cannot write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let source = read_source(&args.input)?;
    info!("read {} bytes from {}", source.len(), args.input);

    let mut out = open_output(&args.output)?;
    let write_err = |source| CliError::Write {
        path: args.output.clone(),
        source,
    };

    if args.tokens {
        let tokens = Lexer::new(&source).tokenize()?;
        info!("{} tokens", tokens.len());
        for token in &tokens {
            writeln!(out, "{}", token.listing()).map_err(write_err)?;
        }
        out.flush().map_err(write_err)?;
    } else if args.tree {
        let mut parser = Parser::new(&source, TreeBuilder::new());
        parser.parse_program()?;
        if let Some(tree) = parser.into_sink().finish() {
            out.write_all(tree.render().as_bytes()).map_err(write_err)?;
        }
        out.flush().map_err(write_err)?;
    } else {
        let mut parser = Parser::new(&source, WriteSink::new(out));
        parser.parse_program()?;
        info!("{} trace records written to {}", parser.sink().lines(), args.output);
        parser.into_sink().into_inner().map_err(write_err)?;
    }

    Ok(())
}

fn read_source(path: &str) -> Result<String, CliError> {
    let read_err = |source| CliError::Read {
        path: path.to_string(),
        source,
    };
    if path == STD_STREAM {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source).map_err(read_err)?;
        Ok(source)
    } else {
        fs::read_to_string(path).map_err(read_err)
    }
}

fn open_output(path: &str) -> Result<Box<dyn Write>, CliError> {
    if path == STD_STREAM {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let file = fs::File::create(path).map_err(|source| CliError::Write {
        path: path.to_string(),
        source,
    })?;
    Ok(Box::new(BufWriter::new(file)))
}
