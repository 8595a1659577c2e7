use clap::{Args as ClapArgs, Parser, Subcommand};
use sql_template::{ColonPolicy, ParseOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Normalize SQL templates and bind their parameters")]
pub(crate) struct Args {
    #[command(subcommand)]
    pub(crate) command: Command,
    /// Also write log output to this file.
    #[arg(long, global = true)]
    pub(crate) log: Option<PathBuf>,
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Print the normalized SQL and placeholder list as JSON.
    Parse {
        #[command(flatten)]
        source: Source,
    },
    /// Bind values and print the normalized SQL with its parameter list as JSON.
    Bind {
        #[command(flatten)]
        source: Source,
        /// Named value, as `name=value`. Repeatable.
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_named)]
        named: Vec<(String, String)>,
        /// Positional value. Repeatable; order matters.
        #[arg(long = "arg", value_name = "VALUE")]
        positional: Vec<String>,
    },
}

#[derive(ClapArgs, Debug)]
pub(crate) struct Source {
    /// SQL file to read; `-` or nothing reads stdin.
    pub(crate) file: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "lenient")]
    pub(crate) colon_policy: ColonPolicy,
    /// Treat `::` as ordinary colons instead of a cast operator.
    #[arg(long)]
    pub(crate) no_cast: bool,
}

impl Source {
    pub(crate) fn options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_colon_policy(self.colon_policy)
            .with_double_colon_cast(!self.no_cast)
    }
}

fn parse_named(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got `{raw}`")),
    }
}
