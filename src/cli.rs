//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::render::{Border, RenderStyle};
use crate::template::{SpiralParams, TemplateSpec, WaveParams};

/// Drawing-test template generator and remote image viewer.
#[derive(Parser, Debug)]
#[command(name = "tremor-templates", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a drawing template and save it as PNG.
    Template {
        /// Pattern to generate.
        #[command(subcommand)]
        kind: TemplateCommand,
    },
    /// Download images from a storage bucket and display them.
    View(ViewArgs),
}

/// Template kinds with their parameters.
#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// Archimedean spiral on a square canvas.
    Spiral {
        /// Outer radius of the spiral.
        #[arg(long, default_value_t = 200.0)]
        radius: f64,
        /// Margin between the spiral and the canvas edge.
        #[arg(long, default_value_t = 70.0)]
        padding: f64,
        /// Number of full turns.
        #[arg(long, default_value_t = 3.0)]
        turns: f64,
        /// Samples along the curve.
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
        /// Rendering and output options.
        #[command(flatten)]
        common: RenderArgs,
    },
    /// Sine wave centred on a width x height canvas.
    Wave {
        /// Canvas width.
        #[arg(long, default_value_t = 3140.0)]
        width: f64,
        /// Canvas height.
        #[arg(long, default_value_t = 940.0)]
        height: f64,
        /// Horizontal margin on both sides.
        #[arg(long, default_value_t = 70.0)]
        padding: f64,
        /// Peak deviation from the centre line.
        #[arg(long, default_value_t = 400.0)]
        amplitude: f64,
        /// Full periods across the drawable width.
        #[arg(long, default_value_t = 5.0)]
        cycles: f64,
        /// Samples along the curve.
        #[arg(long, default_value_t = 1000)]
        samples: usize,
        /// Rendering and output options.
        #[command(flatten)]
        common: RenderArgs,
    },
}

/// Options shared by every template kind.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Curve stroke width in pixels.
    #[arg(long, default_value_t = 2)]
    pub line_width: u32,

    /// Border stroke width in pixels.
    #[arg(long, default_value_t = 4)]
    pub border_width: u32,

    /// Do not draw the canvas border.
    #[arg(long)]
    pub no_border: bool,

    /// Save only; do not open the result in the system viewer.
    #[arg(long)]
    pub no_open: bool,
}

impl RenderArgs {
    /// Build the render style these flags describe.
    #[must_use]
    pub fn style(&self) -> RenderStyle {
        let defaults = RenderStyle::default();
        let border = if self.no_border {
            None
        } else {
            defaults.border.map(|b| Border { width: self.border_width, ..b })
        };
        RenderStyle { line_width: self.line_width, border, ..defaults }
    }
}

impl TemplateCommand {
    /// Split into generator parameters and rendering options.
    #[must_use]
    pub fn into_parts(self) -> (TemplateSpec, RenderArgs) {
        match self {
            Self::Spiral { radius, padding, turns, samples, common } => (
                TemplateSpec::Spiral(SpiralParams { radius, padding, turns, samples }),
                common,
            ),
            Self::Wave { width, height, padding, amplitude, cycles, samples, common } => (
                TemplateSpec::Wave(WaveParams {
                    width,
                    height,
                    padding,
                    amplitude,
                    cycles,
                    samples,
                }),
                common,
            ),
        }
    }
}

/// Arguments of the `view` subcommand.
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Bucket to read from.
    #[arg(default_value = "images")]
    pub bucket: String,

    /// Path prefix whose objects are shown in listing order.
    #[arg(short, long, default_value = "spiral", conflicts_with = "object")]
    pub prefix: String,

    /// Show a single object instead of a whole prefix.
    #[arg(long)]
    pub object: Option<String>,

    /// Directory downloaded images are written to before display.
    #[arg(long, default_value = "downloads")]
    pub out_dir: PathBuf,

    /// Save only; do not open images in the system viewer.
    #[arg(long)]
    pub no_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spiral_defaults() {
        let cli = Cli::parse_from(["tremor-templates", "template", "spiral"]);
        let Command::Template { kind } = cli.command else { panic!("expected template") };
        let (spec, common) = kind.into_parts();
        assert_eq!(spec, TemplateSpec::Spiral(SpiralParams::default()));
        assert!(common.output.is_none());
        assert_eq!(common.style(), RenderStyle::default());
    }

    #[test]
    fn wave_defaults_match_generator() {
        let cli = Cli::parse_from(["tremor-templates", "template", "wave"]);
        let Command::Template { kind } = cli.command else { panic!("expected template") };
        assert_eq!(kind.into_parts().0, TemplateSpec::Wave(WaveParams::default()));
    }

    #[test]
    fn wave_options() {
        let cli = Cli::parse_from([
            "tremor-templates",
            "-v",
            "template",
            "wave",
            "--width",
            "800",
            "--height",
            "200",
            "--no-border",
            "--no-open",
            "--line-width",
            "5",
            "-o",
            "w.png",
        ]);
        assert!(cli.verbose);
        let Command::Template { kind } = cli.command else { panic!("expected template") };
        let (spec, common) = kind.into_parts();
        let TemplateSpec::Wave(params) = spec else { panic!("expected wave") };
        assert_eq!((params.width, params.height), (800.0, 200.0));
        assert!(common.no_open);
        assert_eq!(common.output, Some(PathBuf::from("w.png")));
        let style = common.style();
        assert!(style.border.is_none());
        assert_eq!(style.line_width, 5);
    }

    #[test]
    fn border_width_is_applied() {
        let cli =
            Cli::parse_from(["tremor-templates", "template", "spiral", "--border-width", "9"]);
        let Command::Template { kind } = cli.command else { panic!("expected template") };
        assert_eq!(kind.into_parts().1.style().border.unwrap().width, 9);
    }

    #[test]
    fn view_defaults() {
        let cli = Cli::parse_from(["tremor-templates", "view"]);
        let Command::View(args) = cli.command else { panic!("expected view") };
        assert_eq!(args.bucket, "images");
        assert_eq!(args.prefix, "spiral");
        assert!(args.object.is_none());
        assert!(!args.no_open);
    }

    #[test]
    fn view_single_object() {
        let cli = Cli::parse_from([
            "tremor-templates",
            "view",
            "scans",
            "--object",
            "spiral/spiral_12.png",
            "--config",
            "/tmp/c.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        let Command::View(args) = cli.command else { panic!("expected view") };
        assert_eq!(args.bucket, "scans");
        assert_eq!(args.object.as_deref(), Some("spiral/spiral_12.png"));
    }

    #[test]
    fn prefix_and_object_conflict() {
        let result = Cli::try_parse_from([
            "tremor-templates",
            "view",
            "--prefix",
            "wave",
            "--object",
            "a.png",
        ]);
        assert!(result.is_err());
    }
}
