use anyhow::Result;
use clap::Parser;
use log::info;

use plint_core::report::render;

mod args;
mod discover;

fn main() -> Result<()> {
    let args = args::Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let files = discover::discover(&args.project_dir)?;
    info!(
        "linting {} files from {}",
        files.len(),
        args.project_dir.display()
    );

    let outcome = plint_core::lint(&files);

    let output = match args.format {
        args::OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&outcome)?;
            json.push('\n');
            json
        }
        args::OutputFormat::Text => render::render_text(&outcome),
    };

    match args.out {
        Some(path) => std::fs::write(path, &output)?,
        None => print!("{output}"),
    }

    std::process::exit(if outcome.has_error { 1 } else { 0 });
}
