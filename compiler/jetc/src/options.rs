//! Command-line parsing.
//!
//! Flags may appear anywhere; the first positional argument is the filter
//! unless `-f` supplied one, and the rest name input files. Single-letter
//! switches can be bundled (`-nr`).

use std::path::PathBuf;

use jet_value::codec::{from_json, Layout};
use jet_value::Value;

pub const USAGE: &str = "\
Usage: jet [OPTIONS] FILTER [FILES...]
       jet [OPTIONS] -f FILE [FILES...]

Runs FILTER against each JSON value read from FILES, or from standard
input when no files are given, and prints every result.

Options:
  -n, --null-input        Use null as the single input instead of reading any
  -s, --slurp             Read every input into one array and run once
  -r, --raw-output        Print strings without quotes
  -c, --compact-output    Print each result on one line
      --tab               Indent with tabs
      --indent N          Indent with N spaces (0 means compact)
      --arg NAME VALUE    Bind $NAME to the string VALUE
      --argjson NAME JSON Bind $NAME to the parsed JSON value
  -f, --from-file FILE    Read the filter from FILE
  -e, --exit-status       Exit 1 when the last result is false or null, or
                          when there is no result
  -h, --help              Show this help
  -V, --version           Show the version

Exit status: 0 on success, 2 on usage or I/O errors, 3 when the filter does
not compile, 5 when a run fails. Set RUST_LOG to see evaluator traces.
";

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Run(Options),
    Help,
    Version,
}

/// Where the filter text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterSource {
    Text(String),
    File(PathBuf),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub filter: FilterSource,
    pub files: Vec<PathBuf>,
    pub null_input: bool,
    pub slurp: bool,
    pub raw_output: bool,
    pub exit_status: bool,
    pub layout: Layout,
    pub vars: Vec<(String, Value)>,
}

#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("{0} takes {1}")]
    MissingValue(String, &'static str),
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("no filter given")]
    MissingFilter,
    #[error("--indent takes a number from 0 to 7, not {0:?}")]
    BadIndent(String),
    #[error("--argjson {name}: invalid JSON text: {source}")]
    BadArgJson {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse the arguments that follow the program name.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Command, UsageError> {
    let mut filter_file = None;
    let mut positional = Vec::new();
    let mut null_input = false;
    let mut slurp = false;
    let mut raw_output = false;
    let mut exit_status = false;
    let mut compact = false;
    let mut tab = false;
    let mut indent = None;
    let mut vars = Vec::new();

    let mut args = args.iter().map(S::as_ref);
    let mut only_positional = false;
    while let Some(arg) = args.next() {
        if only_positional || arg == "-" || !arg.starts_with('-') {
            positional.push(arg.to_owned());
            continue;
        }
        for flag in expand(arg) {
            match flag.as_str() {
                "--" => only_positional = true,
                "-h" | "--help" => return Ok(Command::Help),
                "-V" | "--version" => return Ok(Command::Version),
                "-n" | "--null-input" => null_input = true,
                "-s" | "--slurp" => slurp = true,
                "-r" | "--raw-output" => raw_output = true,
                "-c" | "--compact-output" => compact = true,
                "-e" | "--exit-status" => exit_status = true,
                "--tab" => tab = true,
                "--indent" => {
                    let n = args
                        .next()
                        .ok_or(UsageError::MissingValue(flag.clone(), "a number"))?;
                    indent = Some(
                        n.parse::<usize>()
                            .ok()
                            .filter(|n| *n <= 7)
                            .ok_or_else(|| UsageError::BadIndent(n.to_owned()))?,
                    );
                }
                "-f" | "--from-file" => {
                    let path = args
                        .next()
                        .ok_or(UsageError::MissingValue(flag.clone(), "a file name"))?;
                    filter_file = Some(PathBuf::from(path));
                }
                "--arg" => {
                    let (name, value) = pair(&mut args, &flag, "a name and a value")?;
                    vars.push((name, Value::string(value)));
                }
                "--argjson" => {
                    let (name, text) = pair(&mut args, &flag, "a name and JSON text")?;
                    let value = from_json(&text)
                        .map_err(|source| UsageError::BadArgJson {
                            name: name.clone(),
                            source,
                        })?;
                    vars.push((name, value));
                }
                _ => return Err(UsageError::UnknownOption(flag)),
            }
        }
    }

    let mut positional = positional.into_iter();
    let filter = match filter_file {
        Some(path) => FilterSource::File(path),
        None => FilterSource::Text(positional.next().ok_or(UsageError::MissingFilter)?),
    };
    let layout = if compact {
        Layout::Compact
    } else if tab {
        Layout::Tabs
    } else {
        indent.map_or(Layout::default(), Layout::Spaces)
    };

    Ok(Command::Run(Options {
        filter,
        files: positional.map(PathBuf::from).collect(),
        null_input,
        slurp,
        raw_output,
        exit_status,
        layout,
        vars,
    }))
}

/// `-nr` → `-n`, `-r`. Long options and lone short ones pass through.
fn expand(arg: &str) -> Vec<String> {
    match arg.strip_prefix('-') {
        Some(letters) if !letters.starts_with('-') && letters.chars().count() > 1 => {
            letters.chars().map(|c| format!("-{c}")).collect()
        }
        _ => vec![arg.to_owned()],
    }
}

fn pair<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    flag: &str,
    what: &'static str,
) -> Result<(String, String), UsageError> {
    match (args.next(), args.next()) {
        (Some(name), Some(value)) => Ok((name.to_owned(), value.to_owned())),
        _ => Err(UsageError::MissingValue(flag.to_owned(), what)),
    }
}
