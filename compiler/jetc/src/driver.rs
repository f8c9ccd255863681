//! One invocation of the command: compile the filter, feed it every input,
//! print what comes out.
//!
//! The driver owns no process state. Standard streams are passed in so that
//! tests can run it against byte buffers.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use jet_eval::{CompileError, EvalConfig, Interpreter, Program, RunError};
use jet_value::codec::{from_json_stream, write_json};
use jet_value::Value;

use crate::options::{FilterSource, Options};

/// Process exit status.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Exit {
    Success,
    /// `--exit-status` and the last output was `false`, `null`, or missing.
    FalsyOutput,
    /// Bad arguments, unreadable files, malformed input JSON.
    Usage,
    Compile,
    Runtime,
}

impl Exit {
    pub fn code(self) -> u8 {
        match self {
            Exit::Success => 0,
            Exit::FalsyOutput => 1,
            Exit::Usage => 2,
            Exit::Compile => 3,
            Exit::Runtime => 5,
        }
    }
}

/// Ends a run early. Everything else is reported and skipped.
#[derive(Debug, thiserror::Error)]
enum Fatal {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("could not write output: {0}")]
    Write(#[from] io::Error),
    #[error("{source} (while parsing {input})")]
    Json {
        input: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Compile(CompileError),
    #[error("break escaped its label")]
    UnmatchedBreak,
}

impl Fatal {
    fn exit(&self) -> Exit {
        match self {
            Fatal::Read { .. } | Fatal::Write(_) | Fatal::Json { .. } => Exit::Usage,
            Fatal::Compile(_) => Exit::Compile,
            Fatal::UnmatchedBreak => Exit::Runtime,
        }
    }
}

/// Where an input value came from, for error messages.
#[derive(Clone, Copy)]
enum Origin<'a> {
    Stdin,
    File(&'a Path),
    Nothing,
}

impl fmt::Display for Origin<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Stdin => f.write_str("<stdin>"),
            Origin::File(path) => write!(f, "{}", path.display()),
            Origin::Nothing => f.write_str("<unknown>"),
        }
    }
}

/// Run the command described by `options`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn run(
    options: &Options,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Exit {
    let mut session = Session {
        options,
        out,
        last: None,
        failed: false,
    };
    let result = session.start(stdin, err);
    let failed = session.failed;
    let last = session.last.take();
    // Flushing is best effort once something else already went wrong.
    let flushed = session.out.flush();

    match result.and(flushed.map_err(Fatal::from)) {
        Err(fatal) => {
            report(err, &fatal);
            if let Fatal::Compile(compile) = &fatal {
                if let FilterSource::Text(text) = &options.filter {
                    underline(err, text, compile);
                }
            }
            fatal.exit()
        }
        Ok(()) if failed => Exit::Runtime,
        Ok(()) if options.exit_status => match last {
            Some(value) if value.is_truthy() => Exit::Success,
            _ => Exit::FalsyOutput,
        },
        Ok(()) => Exit::Success,
    }
}

struct Session<'a> {
    options: &'a Options,
    out: &'a mut dyn Write,
    /// The most recent output, for `--exit-status`.
    last: Option<Value>,
    /// Some input ended in an uncaught error.
    failed: bool,
}

impl Session<'_> {
    fn start(&mut self, stdin: &mut dyn Read, err: &mut dyn Write) -> Result<(), Fatal> {
        let options = self.options;
        let source = match &options.filter {
            FilterSource::Text(text) => text.clone(),
            FilterSource::File(path) => read_path(path)?,
        };

        let mut config = EvalConfig::new();
        for (name, value) in &options.vars {
            config = config.var(name.clone(), value.clone());
        }
        let interp = Interpreter::new(config).map_err(Fatal::Compile)?;
        let program = interp.compile(&source).map_err(Fatal::Compile)?;
        tracing::debug!(len = source.len(), "compiled filter");

        if options.null_input {
            return self.feed(&interp, &program, Value::Null, Origin::Nothing, err);
        }

        let mut texts = Vec::new();
        if options.files.is_empty() {
            let mut text = String::new();
            stdin.read_to_string(&mut text).map_err(|source| Fatal::Read {
                path: Origin::Stdin.to_string(),
                source,
            })?;
            texts.push((Origin::Stdin, text));
        } else {
            for path in &options.files {
                texts.push((Origin::File(path.as_path()), read_path(path)?));
            }
        }

        if options.slurp {
            let mut all = Vec::new();
            for (origin, text) in &texts {
                for value in from_json_stream(text) {
                    all.push(value.map_err(|source| json_error(*origin, source))?);
                }
            }
            tracing::debug!(inputs = all.len(), "slurped");
            let origin = texts.first().map_or(Origin::Nothing, |(origin, _)| *origin);
            return self.feed(&interp, &program, Value::array(all), origin, err);
        }

        for (origin, text) in &texts {
            for value in from_json_stream(text) {
                let value = value.map_err(|source| json_error(*origin, source))?;
                self.feed(&interp, &program, value, *origin, err)?;
            }
        }
        Ok(())
    }

    /// Run the program on one input and print its outputs. An uncaught
    /// error is reported and the next input still runs.
    fn feed(
        &mut self,
        interp: &Interpreter,
        program: &Program,
        input: Value,
        origin: Origin<'_>,
        err: &mut dyn Write,
    ) -> Result<(), Fatal> {
        for output in interp.run(program, input) {
            match output {
                Ok(value) => {
                    self.print(&value)?;
                    self.last = Some(value);
                }
                Err(RunError::Eval(error)) => {
                    tracing::debug!(kind = error.kind.name(), "uncaught error");
                    writeln!(err, "jet: error (at {origin}): {error}")?;
                    self.failed = true;
                    break;
                }
                Err(RunError::UnmatchedBreak) => return Err(Fatal::UnmatchedBreak),
            }
        }
        Ok(())
    }

    fn print(&mut self, value: &Value) -> Result<(), Fatal> {
        match value.as_str() {
            Some(s) if self.options.raw_output => writeln!(self.out, "{s}")?,
            _ => writeln!(self.out, "{}", write_json(value, self.options.layout))?,
        }
        Ok(())
    }
}

fn read_path(path: &Path) -> Result<String, Fatal> {
    fs::read_to_string(path).map_err(|source| Fatal::Read {
        path: path.display().to_string(),
        source,
    })
}

fn json_error(origin: Origin<'_>, source: serde_json::Error) -> Fatal {
    Fatal::Json {
        input: origin.to_string(),
        source,
    }
}

fn report(err: &mut dyn Write, fatal: &Fatal) {
    // Nowhere left to complain if stderr itself is gone.
    let _ = writeln!(err, "jet: error: {fatal}");
}

/// Print the filter line holding the error with a caret run beneath it.
fn underline(err: &mut dyn Write, text: &str, error: &CompileError) {
    let span = error.span();
    let start = (span.start as usize).min(text.len());
    let end = (span.end as usize).clamp(start, text.len());
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return;
    }
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[start..].find('\n').map_or(text.len(), |i| start + i);
    let line = &text[line_start..line_end];
    let pad = text[line_start..start].chars().count();
    let width = text[start..end.min(line_end)].chars().count().max(1);
    let _ = writeln!(err, "    {line}\n    {}{}", " ".repeat(pad), "^".repeat(width));
}
