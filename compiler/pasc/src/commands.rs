//! Command handlers for the `pasc` CLI.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use pas_lexer::{Lexer, SourceConfig, SourceError, DEFAULT_CAPACITY};
use tracing::debug;

use crate::emit::TokenWriter;

/// Failure of a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Bad command line.
    #[error("{0}")]
    Usage(String),

    /// Opening or reading the input failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The output file could not be created.
    #[error("cannot create `{}`: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing token records failed.
    #[error("cannot write tokens: {0}")]
    Write(#[source] io::Error),
}

/// Options for `pasc lex`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexOptions {
    /// Source file to tokenize.
    pub input: PathBuf,
    /// Record destination; stdout when `None`.
    pub output: Option<PathBuf>,
    /// Chunk capacity in bytes.
    pub chunk: usize,
}

/// What a successful `pasc lex` produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LexSummary {
    /// Records written, EOF included.
    pub tokens: usize,
}

/// Parse the arguments after `lex`: `<input> [<output>] [--chunk=<bytes>]`.
pub fn parse_lex_options(args: &[String]) -> Result<LexOptions, CliError> {
    let mut positional = Vec::new();
    let mut chunk = DEFAULT_CAPACITY;

    for arg in args {
        if let Some(value) = arg.strip_prefix("--chunk=") {
            chunk = value
                .parse()
                .map_err(|_| CliError::Usage(format!("invalid chunk size '{value}'")))?;
        } else if arg.starts_with("--") {
            eprintln!("warning: unknown option '{arg}', ignoring");
        } else {
            positional.push(PathBuf::from(arg));
        }
    }

    let mut positional = positional.into_iter();
    let Some(input) = positional.next() else {
        return Err(CliError::Usage("missing input file".to_string()));
    };
    let output = positional.next();
    if let Some(extra) = positional.next() {
        return Err(CliError::Usage(format!(
            "unexpected argument '{}'",
            extra.display()
        )));
    }

    Ok(LexOptions {
        input,
        output,
        chunk,
    })
}

/// Tokenize `options.input` and write one record per token.
///
/// A read failure partway through still writes every token up to the
/// failure, EOF included, and is then returned as an error.
pub fn lex_file(options: &LexOptions) -> Result<LexSummary, CliError> {
    let config = SourceConfig::new(options.chunk)?;
    let mut lexer = Lexer::open(&options.input, config)?;
    debug!(input = %options.input.display(), chunk = options.chunk, "lexing");

    let tokens = match &options.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::Create {
                path: path.clone(),
                source,
            })?;
            write_records(&mut lexer, BufWriter::new(file))?
        }
        None => write_records(&mut lexer, io::stdout().lock())?,
    };

    lexer.finish()?;
    Ok(LexSummary { tokens })
}

fn write_records(lexer: &mut Lexer, out: impl Write) -> Result<usize, CliError> {
    let mut writer = TokenWriter::new(out);
    let count = writer.write_all(lexer).map_err(CliError::Write)?;
    writer.into_inner().map_err(CliError::Write)?;
    Ok(count)
}
