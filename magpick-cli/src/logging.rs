//! Logger setup for the binary.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::{Level, LevelFilter};

use crate::CliError;

/// Writes to stderr and to a log file with ANSI escapes stripped.
struct Tee {
    file: strip_ansi_escapes::Writer<File>,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Level chosen by the global flags. `--quiet` wins over `--verbose`.
pub(crate) fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. `RUST_LOG` overrides the flag-derived level.
///
/// Log lines go to stderr; stdout is left for report output.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let mut builder = Builder::new();
    builder.filter_level(level_for(quiet, verbose));
    builder.parse_env(Env::default());

    builder.format(move |buf, record| {
        if verbose {
            writeln!(
                buf,
                "{} {:<5} {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        } else if record.level() <= Level::Warn {
            writeln!(buf, "{}: {}", record.level().as_str().to_lowercase(), record.args())
        } else {
            writeln!(buf, "{}", record.args())
        }
    });

    match logfile {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::other(format!("Failed to create log file {}: {}", path.display(), e))
            })?;
            builder.target(Target::Pipe(Box::new(Tee {
                file: strip_ansi_escapes::Writer::new(file),
            })));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::other(format!("Failed to initialise logging: {}", e)))
}
