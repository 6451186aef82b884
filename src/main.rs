//! tremor-templates - drawing-test template generator and remote image viewer.

mod adapters;
mod cassette;
mod cli;
mod config;
mod context;
mod error;
mod output;
mod ports;
mod render;
mod retry;
mod template;
mod viewer;

use std::process;

use clap::Parser;
use image::DynamicImage;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::adapters::live::display::{open_in_viewer, FileDisplay};
use crate::cli::{Cli, Command, TemplateCommand, ViewArgs};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::Error;
use crate::output::{resolve_output_path, save_png};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Template { kind } => run_template(kind),
        Command::View(args) => {
            let config_path = config::discover_config_path(cli.config.as_deref());
            let config = Config::load(&config_path)?;
            run_view(&config, args).await
        }
    }
}

fn run_template(kind: TemplateCommand) -> Result<(), Error> {
    let (spec, common) = kind.into_parts();
    let template = template::generate(spec);
    info!(kind = template.kind.name(), points = template.points.len(), "generated template");

    let image = render::render(&template, &common.style())?;
    let path = resolve_output_path(common.output.as_deref(), template.kind.name());
    save_png(&DynamicImage::ImageRgba8(image), &path)?;
    eprintln!("Saved: {}", path.display());

    if !common.no_open {
        open_in_viewer(&path)?;
    }
    Ok(())
}

async fn run_view(config: &Config, args: ViewArgs) -> Result<(), Error> {
    let (ctx, recording_session) = ServiceContext::from_env(config).await?;
    let display = FileDisplay::new(&args.out_dir, !args.no_open);
    let retry = config.retry_policy();

    let result = match args.object {
        Some(ref path) => {
            viewer::view_object(ctx.store.as_ref(), &display, &retry, &args.bucket, path).await
        }
        None => {
            viewer::view_prefix(ctx.store.as_ref(), &display, &retry, &args.bucket, &args.prefix)
                .await
                .and_then(summarize)
        }
    };

    // The store holds the recorder; release it before finishing.
    drop(ctx);
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    result
}

/// Print the batch outcome. A batch where every object failed is an error.
fn summarize(report: viewer::ViewReport) -> Result<(), Error> {
    for failure in &report.failures {
        eprintln!("Failed: {} ({})", failure.path, failure.error);
    }
    eprintln!(
        "Displayed {} image(s), {} failed",
        report.shown.len(),
        report.failures.len()
    );
    match report.failures.into_iter().next() {
        Some(first) if report.shown.is_empty() => Err(first.error),
        _ => Ok(()),
    }
}
