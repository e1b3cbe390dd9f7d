//! Reads a mapping (or, with `--clauses`, a query) document, validates it and
//! writes it back out in the configured format.
//!
//! Usage: `searchdoc [--clauses] [--from json|binary] [--config PATH] FILE`
//!
//! The input format defaults to binary for `.cbor` files and JSON otherwise.
//! Output format, pretty printing, the input size limit and the log filter
//! come from settings (`searchdoc.toml` and `SEARCHDOC_*`); `RUST_LOG`
//! overrides the log filter.
use std::io::Write;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use searchdoc::{Clause, Codec, Document, Envelope, Field, Format, Result, Settings};

struct Args {
    clauses: bool,
    from: Option<Format>,
    config: Option<String>,
    file: String,
}

fn parse_args() -> std::result::Result<Args, String> {
    let mut clauses = false;
    let mut from = None;
    let mut config = None;
    let mut file = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--clauses" => clauses = true,
            "--from" => {
                let value = args.next().ok_or("--from needs a format")?;
                from = Some(value.parse::<Format>().map_err(|e| e.to_string())?);
            }
            "--config" => config = Some(args.next().ok_or("--config needs a path")?),
            other if other.starts_with("--") => return Err(format!("unknown option {}", other)),
            other => file = Some(other.to_owned()),
        }
    }
    let file = file.ok_or("missing input file")?;
    Ok(Args { clauses, from, config, file })
}

fn transcode<E: Envelope>(input: &Codec, output: &Codec, bytes: &[u8]) -> Result<Vec<u8>> {
    let document: Document<E> = input.decode_document(bytes)?;
    info!(entries = document.len(), "document is valid");
    output.encode_document(&document)
}

fn run(args: Args, settings: Settings) -> Result<()> {
    let bytes = std::fs::read(&args.file).map_err(|e| searchdoc::SearchdocError::Decode {
        format: settings.format,
        message: format!("{}: {}", args.file, e),
    })?;
    let from = args.from.unwrap_or(if args.file.ends_with(".cbor") { Format::Binary } else { Format::Json });
    let output = Codec::from_settings(&settings);
    let mut input = Codec::new(from);
    if let Some(max) = settings.max_document_bytes {
        input = input.with_max_bytes(max);
    }
    let encoded = if args.clauses {
        transcode::<Clause>(&input, &output, &bytes)?
    } else {
        transcode::<Field>(&input, &output, &bytes)?
    };
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&encoded)
        .and_then(|_| stdout.flush())
        .map_err(|e| searchdoc::SearchdocError::Encode { format: output.format(), message: e.to_string() })?;
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("usage: searchdoc [--clauses] [--from json|binary] [--config PATH] FILE");
            return ExitCode::from(2);
        }
    };
    let settings = match args.config.as_deref().map_or_else(Settings::load, Settings::load_from) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run(args, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "transcoding failed");
            ExitCode::FAILURE
        }
    }
}
