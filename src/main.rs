use anyhow::Context;
use chrono::Local;
use clap::Parser;

mod advice;
mod config;
mod error;
mod evaluation;
mod grading;
mod models;
mod report;
mod scanner;

use config::Config;
use evaluation::EvaluationSource;

/// Reads grading results from the environment and writes FEEDBACK.md.
#[derive(Parser, Debug)]
#[command(name = "feedback-report")]
#[command(about = "Generate a pedagogical feedback report for an HTML/CSS exercise", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all logging except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = Config::from_env();
    let workdir = std::env::current_dir().context("failed to resolve the working directory")?;
    log::info!(
        "generating feedback for {} (level {})",
        config.repository,
        config.niveau
    );

    let source = EvaluationSource::resolve(&config, &workdir);
    let content = report::build_report(&config, &source, Local::now().naive_local())
        .context("failed to render the feedback report")?;

    let out = workdir.join(report::REPORT_FILE);
    report::write_report(&out, &content).context("failed to save the feedback report")?;
    println!("✅ {} written to {}.", report::REPORT_FILE, out.display());

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
