use clap::Parser;
use std::path::PathBuf;

use crate::config::{parse_convert_config, ConvertConfig};
use crate::Result;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about,
    help_template(
        "{before-help}{name} {version}\n{author-with-newline}{about-with-newline}\n{usage-heading} {usage}\n\n{all-args}{after-help}"
    )
)]
pub struct Args {
    /// Testcase file, or dataset directory containing `level_<n>` folders.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output testcase file, or dataset directory to create.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write via and segment sections [default: from config, else true].
    #[arg(long)]
    pub write_segments: Option<bool>,

    /// Drop nets that have no pins.
    #[arg(long)]
    pub remove_empty_net: bool,

    /// Drop nets with a pin that has no access point on the bottom layer.
    #[arg(long)]
    pub remove_non_bottom_pins: bool,
}

impl Args {
    /// The configuration file, if any, overridden by command-line flags.
    pub fn resolve_config(&self) -> Result<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => parse_convert_config(path)?,
            None => ConvertConfig::default(),
        };
        config.remove_empty_net |= self.remove_empty_net;
        config.remove_non_bottom_pins |= self.remove_non_bottom_pins;
        if let Some(write_segments) = self.write_segments {
            config.write_segments = write_segments;
        }
        Ok(config)
    }
}
