// Licensed under the Apache-2.0 license

//! Command-line driver: load elaborated register-space models, compile
//! per-address-map contexts, and render the template set of each requested
//! output format.
//!
//! Failures are counted, not cascaded: a model file that does not load, an
//! address map whose context cannot be built, or a template that blows the
//! recursion limit is reported and skipped, everything else still
//! generates, and the exit code reflects whether anything went wrong.

use anyhow::{bail, Context};
use clap::Parser;
use log::{error, info, LevelFilter};
use regspace_generator::{
    build_contexts, default_target_name, is_template, BuiltContext, Emitter, GeneratorConfig,
    WriteMode,
};
use regspace_model::from_json_file;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Copy, Clone, Debug, PartialEq, clap::ValueEnum)]
enum Format {
    /// Hardware description (decoder packages and entities)
    Hdl,
    /// Merged address map file across all address maps
    Map,
    /// Register documentation
    Adoc,
}

impl Format {
    fn template_dir(self) -> &'static str {
        match self {
            Format::Hdl => "hdl",
            Format::Map => "map",
            Format::Adoc => "adoc",
        }
    }

    fn write_mode(self) -> WriteMode {
        match self {
            // map files accumulate one section per address map
            Format::Map => WriteMode::Merge,
            Format::Hdl | Format::Adoc => WriteMode::Overwrite,
        }
    }

    /// HDL respects the per-map `generate_hdl` gate; other formats always
    /// cover every map.
    fn wants(self, context: &BuiltContext) -> bool {
        match self {
            Format::Hdl => context.generate_hdl,
            Format::Map | Format::Adoc => true,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "regspace",
    author,
    version,
    about = "Generate HDL, map files and documentation from an elaborated register-space model"
)]
struct Cli {
    /// Elaborated register-space model files (JSON)
    #[arg(short = 'i', long = "input", value_name = "FILE", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output formats to generate
    #[arg(short = 'f', long = "format", value_name = "FORMAT", required = true, num_args = 1..)]
    formats: Vec<Format>,

    /// Directory generated files are written to
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        default_value = "./"
    )]
    output_dir: PathBuf,

    /// Directory holding the per-format template sets
    #[arg(
        short = 't',
        long = "templates-dir",
        value_name = "DIR",
        default_value = "templates"
    )]
    templates_dir: PathBuf,

    /// Access channel assumed when no ancestor of a node specifies one;
    /// without this, an unresolvable channel fails the address map
    #[arg(long = "default-channel", value_name = "N")]
    default_channel: Option<i64>,

    /// More logging (-v debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn main() {
    let cli = Cli::parse();
    SimpleLogger::new()
        .with_level(log_level(cli.verbose))
        .env()
        .init()
        .ok();

    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = GeneratorConfig::with_defaults();
    if let Some(channel) = cli.default_channel {
        config = config.default_channel(channel);
    }

    let mut failures = 0usize;
    let mut contexts = Vec::new();
    for input in &cli.inputs {
        let space = match from_json_file(input) {
            Ok(space) => space,
            Err(err) => {
                error!("cannot load `{}`: {err}", input.display());
                failures += 1;
                continue;
            }
        };
        for result in build_contexts(&space, &config) {
            match result {
                Ok(context) => contexts.push(context),
                // already reported with its instance path
                Err(_) => failures += 1,
            }
        }
    }
    info!(
        "compiled {} address map context(s) from {} input file(s)",
        contexts.len(),
        cli.inputs.len()
    );

    for format in &cli.formats {
        failures += generate(*format, cli, &config, &contexts)
            .with_context(|| format!("generating {format:?} output"))?;
    }

    if failures > 0 {
        bail!("{failures} failure(s), see log");
    }
    Ok(())
}

/// Render every template of one format against every (wanted) context.
/// Returns how many renders failed; I/O trouble with the template
/// directory itself is a hard error.
fn generate(
    format: Format,
    cli: &Cli,
    config: &GeneratorConfig,
    contexts: &[BuiltContext],
) -> anyhow::Result<usize> {
    let template_dir = cli.templates_dir.join(format.template_dir());
    if !template_dir.is_dir() {
        bail!("no template directory `{}`", template_dir.display());
    }

    let mut emitter = Emitter::new(&cli.output_dir, format.write_mode())
        .with_recursion_limit(config.recursion_limit());
    let mut failures = 0usize;
    let walker = WalkDir::new(&template_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_template(path) {
            emitter.copy_through(path)?;
            continue;
        }
        let Some(stem) = default_target_name(path) else {
            continue;
        };
        let dest = match format.write_mode() {
            // one merged file, named after the template itself
            WriteMode::Merge => stem.to_string(),
            // one file per address map
            WriteMode::Overwrite => format!("{{name}}_{stem}"),
        };
        for context in contexts.iter().filter(|c| format.wants(c)) {
            if let Err(err) = emitter.process_template(path, &dest, &context.record) {
                error!(
                    "template `{}` failed for `{}`: {err}",
                    path.display(),
                    context.path
                );
                failures += 1;
            }
        }
    }
    info!(
        "{format:?}: wrote {} file(s) to `{}`",
        emitter.written().len(),
        cli.output_dir.display()
    );
    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_defaults_to_info() {
        assert_eq!(log_level(0), LevelFilter::Info);
        assert_eq!(log_level(1), LevelFilter::Debug);
        assert_eq!(log_level(3), LevelFilter::Debug);
    }
}
