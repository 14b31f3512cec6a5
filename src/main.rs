//! Purpose: `mvnprobe` CLI entry point.
//! Role: Binary crate root; parses args, runs one command, prints results on stdout.
//! Invariants: stdout carries only command output; logs and errors go to stderr.
//! Invariants: Errors are JSON on stderr unless stderr is a terminal.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]
use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use mvnprobe::api::{
    Coordinates, Error, ErrorKind, MAVEN_CENTRAL_ENDPOINT, SearchClient, to_exit_code,
    write_stub,
};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse_from(std::env::args_os().collect::<Vec<OsString>>()) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Run `mvnprobe --help` for usage."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    init_tracing();

    let color_mode = cli.color;
    command_dispatch::dispatch_command(cli.command)
        .map_err(add_network_hint)
        .map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "mvnprobe",
    version,
    about = "Look up Maven package coordinates and write the CheckSecp scratch stub",
    long_about = None,
    after_help = r#"EXAMPLES
  $ mvnprobe search nostr vitorpamplona
  $ mvnprobe search --format jsonl secp256k1
  $ mvnprobe stub --dir /tmp/scratch

Set RUST_LOG=debug to see request URLs and response statuses on stderr."#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Jsonl,
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Search the package index and print group:artifact:version per result",
        long_about = r#"Search the package index for each keyword, one request per keyword.

Only a 200 response prints results. Any other status prints nothing and is not
an error. At most 20 results are printed per keyword."#
    )]
    Search {
        #[arg(required = true, help = "Search keywords, queried in order")]
        keywords: Vec<String>,
        #[arg(
            long,
            env = "MVNPROBE_ENDPOINT",
            default_value = MAVEN_CENTRAL_ENDPOINT,
            value_hint = ValueHint::Url,
            help = "Solr select endpoint to query"
        )]
        endpoint: String,
        #[arg(long, default_value = "text", value_enum, help = "Output format: text|jsonl")]
        format: OutputFormat,
    },
    #[command(
        about = "Write the CheckSecp.kt scratch stub",
        long_about = r#"Write CheckSecp.kt, overwriting any existing file.

The stub lists Secp256k1 methods reflectively. It needs the secp256k1-kmp JVM
binding on its classpath and does not run without it."#
    )]
    Stub {
        #[arg(
            long,
            default_value = ".",
            value_hint = ValueHint::DirPath,
            help = "Directory to write CheckSecp.kt into"
        )]
        dir: PathBuf,
        #[arg(long, help = "Print the written path on stdout")]
        print_path: bool,
    },
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum EmitOutcome {
    Written(usize),
    Closed,
}

fn emit_coordinates(
    coordinates: Coordinates,
    format: OutputFormat,
) -> Result<EmitOutcome, Error> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_coordinates(&mut out, coordinates, format)
}

// A reader that stops early (e.g. `| head`) closes the pipe; that ends output, not the run.
fn write_coordinates<W: Write>(
    out: &mut W,
    coordinates: Coordinates,
    format: OutputFormat,
) -> Result<EmitOutcome, Error> {
    let mut count = 0;
    for coordinate in coordinates {
        let line = match format {
            OutputFormat::Text => coordinate.to_string(),
            OutputFormat::Jsonl => serde_json::to_string(&coordinate).map_err(|err| {
                Error::new(ErrorKind::Internal)
                    .with_message("failed to encode coordinate json")
                    .with_source(err)
            })?,
        };
        match writeln!(out, "{line}") {
            Ok(()) => count += 1,
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => return Ok(EmitOutcome::Closed),
            Err(err) => return Err(stdout_error(err)),
        }
    }
    match out.flush() {
        Ok(()) => Ok(EmitOutcome::Written(count)),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(EmitOutcome::Closed),
        Err(err) => Err(stdout_error(err)),
    }
}

fn stdout_error(err: io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message("failed to write to stdout")
        .with_source(err)
}

fn add_network_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Network || err.hint().is_some() {
        return err;
    }
    err.with_hint("Check network access to the search endpoint, or pass --endpoint.")
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Network => "network error".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
        ErrorKind::Permission => "permission denied".to_string(),
        ErrorKind::Corrupt => "malformed response".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(url) = err.url() {
        inner.insert("url".to_string(), json!(url));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }
    if let Some(url) = err.url() {
        lines.push(format!(
            "{} {url}",
            colorize_label("url:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error:").trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}
