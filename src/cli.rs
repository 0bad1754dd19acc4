//! Command-line argument parsing and interactive prompts.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, PipelineConfig};
use crate::themes::Theme;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "mandala-viz")]
#[command(about = "Audio-reactive particle visualizer", long_about = None)]
pub struct Args {
    /// Audio file to visualize (MP3, WAV, FLAC, AAC)
    #[arg(value_name = "AUDIO")]
    pub audio: PathBuf,

    /// Theme number: 1=Agni (Fire), 2=Vayu (Wind), 3=Indra (Thunder/Storm)
    #[arg(value_name = "THEME", value_parser = parse_theme)]
    pub theme: Theme,

    /// Render a quick preview first without asking
    #[arg(long, conflicts_with = "no_preview")]
    pub preview: bool,

    /// Skip the preview without asking
    #[arg(long)]
    pub no_preview: bool,

    /// Render the full version after the preview without asking
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Seed for particle spawning
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for the rendered videos
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write the intensity signal of each render as JSON
    #[arg(long, value_name = "FILE")]
    pub dump_intensity: Option<PathBuf>,
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    let number: i64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a theme number. Choose 1, 2, or 3.", value))?;
    Theme::from_number(number).map_err(|e| e.to_string())
}

impl Args {
    /// Preview decision given by flags, if any.
    pub fn preview_choice(&self) -> Option<bool> {
        if self.preview {
            Some(true)
        } else if self.no_preview {
            Some(false)
        } else {
            None
        }
    }

    /// Configuration file (or defaults) with command-line overrides applied.
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        Ok(config)
    }
}

/// Ask a `(y/n)` question. Only `y` (any case, surrounding whitespace
/// ignored) counts as yes; end of input counts as no.
pub fn ask_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> std::io::Result<bool> {
    write!(output, "{} (y/n): ", question)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
