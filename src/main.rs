// Command-line entry point: CSV on stdin, image on stdout

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gramlayer::data::Table;
use gramlayer::{parser, runtime, OutputFormat, RenderOptions};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Png,
    Svg,
}

#[derive(Parser, Debug)]
#[command(name = "gramlayer")]
#[command(about = "Draw path and line layers from CSV data using a pipeline DSL", long_about = None)]
struct Args {
    /// Pipeline DSL string (e.g., 'aes(x: time, y: temp, color: site) | group_by(site) | lines()')
    dsl: String,

    /// Render options as JSON (e.g., '{"width": 640, "type": "svg"}')
    #[arg(long)]
    options: Option<String>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<Format>,
}

impl Args {
    /// JSON options first, then explicit flags on top
    fn render_options(&self) -> Result<RenderOptions> {
        let mut options = match &self.options {
            Some(json) => serde_json::from_str(json).context("Failed to parse --options")?,
            None => RenderOptions::default(),
        };
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(height) = self.height {
            options.height = height;
        }
        if let Some(format) = self.format {
            options.format = match format {
                Format::Png => OutputFormat::Png,
                Format::Svg => OutputFormat::Svg,
            };
        }
        Ok(options)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let options = args.render_options()?;

    // Read CSV from stdin
    let data = Table::from_csv(io::stdin().lock()).context("Failed to read CSV from stdin")?;

    // Parse the DSL string
    let plot_spec = match parser::parse_plot_spec(&args.dsl) {
        Ok((_, plot_spec)) => plot_spec,
        Err(e) => {
            eprintln!("Parse error: {:?}", e);
            std::process::exit(1);
        }
    };

    let bytes = runtime::render_plot(&plot_spec, data, &options).context("Failed to render plot")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&bytes)
        .context("Failed to write image to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
