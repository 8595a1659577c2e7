mod args;

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use sql_template::{Binder, RowValues, SqlTemplateError, parse_with};
use tracing::Level;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

use args::{Args, Command, Source};

fn main() -> ExitCode {
    let args = Args::parse();

    let writer = match make_writer(args.log.as_deref()) {
        Ok(writer) => writer,
        Err(err) => {
            eprintln!("error: cannot open log file: {err}");
            return ExitCode::FAILURE;
        }
    };
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    match run(args.command) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "sqltpl failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<String, SqlTemplateError> {
    match command {
        Command::Parse { source } => {
            let sql = read_source(&source)?;
            let parsed = parse_with(&sql, source.options())?;
            to_json(&parsed)
        }
        Command::Bind {
            source,
            named,
            positional,
        } => {
            let sql = read_source(&source)?;
            let mut binder = Binder::new(Arc::new(parse_with(&sql, source.options())?));
            for (name, raw) in named {
                binder.bind_named(name, RowValues::infer(&raw));
            }
            if !positional.is_empty() {
                binder.bind_positional(positional.iter().map(|raw| RowValues::infer(raw)))?;
            }
            let qp = binder.into_query_and_params()?;
            to_json(&qp)
        }
    }
}

fn read_source(source: &Source) -> Result<String, SqlTemplateError> {
    match source.file.as_deref() {
        Some(path) if path != Path::new("-") => {
            tracing::debug!(path = %path.display(), "reading sql template");
            Ok(std::fs::read_to_string(path)?)
        }
        _ => {
            let mut sql = String::new();
            std::io::stdin().read_to_string(&mut sql)?;
            Ok(sql)
        }
    }
}

/// Log lines go to stderr, and also to `log` when given.
fn make_writer(log: Option<&Path>) -> std::io::Result<BoxMakeWriter> {
    Ok(match log {
        Some(path) => BoxMakeWriter::new(std::io::stderr.and(Arc::new(File::create(path)?))),
        None => BoxMakeWriter::new(std::io::stderr),
    })
}

fn to_json(value: &impl serde::Serialize) -> Result<String, SqlTemplateError> {
    Ok(serde_json::to_string_pretty(value)?)
}
