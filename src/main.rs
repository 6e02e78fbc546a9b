//! `chunk-lines` streams the lines of a plain or compressed text file.

pub(crate) mod args;
pub(crate) mod output;
pub(crate) mod verbose;

use std::process;

use anyhow::Result;
use args::Args;
use chunk_lines::{ExitCode, Input, LineReader, TimedExt};
use clap::Parser;
use output::Output;
use verbose::Verbose;

fn main() -> process::ExitCode {
    match run() {
        Ok(()) => ExitCode::Success.into(),
        Err(err) => {
            match err.downcast_ref::<clap::Error>() {
                Some(clap_err) => {
                    if clap_err.print().is_err() {
                        eprintln!("{clap_err}");
                    }
                }
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::from(&err).into()
        }
    }
}

fn run() -> Result<()> {
    let args = Args::try_parse()?;
    init_logger(args.debug);

    let options = args.options()?;
    let mut reader = LineReader::open(Input::new(&args.input), &options)?;
    let mut output = Output::new(args.output.as_deref())?;

    let mut timed = reader.by_ref().timed();
    for line in &mut timed {
        let line = line?;
        if !args.count {
            output.write_line(&line)?;
            if output.is_broken() {
                break;
            }
        }
    }
    let timings = timed.timings();

    reader.close();
    let stats = reader.stats();

    if args.count {
        output.write_line(&stats.lines.to_string())?;
    }
    output.flush()?;

    if args.debug {
        log::debug!("iteration timings: {timings}");
    }

    if args.verbose {
        let timings = args.debug.then_some(timings);
        Verbose::new(args.format).write_verbose(&stats, &options, reader.chunk_size(), timings)?;
    } else if args.stats {
        Verbose::new(args.format).write_stats(&stats)?;
    }

    Ok(())
}

/// Logs to stderr at the `RUST_LOG` level, or `debug` when requested.
fn init_logger(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    if let Err(err) = builder.try_init() {
        eprintln!("Warning: logging disabled: {err}");
    }
}
