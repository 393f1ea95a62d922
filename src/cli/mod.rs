use std::collections::HashSet;
use std::path::Path;

use anyhow::bail;
use clap::Parser;

use crate::cli::args::Args;
use crate::cli::dataset::{convert_dataset, ConvertDatasetParams, DATASET_STEPS};
use crate::cli::progress::{StepContext, StepKey};
use crate::config::ConvertConfig;
use crate::convert::{convert, ConvertReport};
use crate::format::{read_layout_file, write_layout_file};
use crate::Result;

pub mod args;
pub mod dataset;
pub mod progress;

pub const BANNER: &str = concat!("gridconv v", env!("CARGO_PKG_VERSION"));

pub const FILE_STEPS: [StepKey; 3] = [
    StepKey::ReadTestcase,
    StepKey::Convert,
    StepKey::WriteTestcase,
];

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    println!("{BANNER}\n");
    println!("Options:");
    println!("\tRemove empty nets: {}", config.remove_empty_net);
    println!("\tRemove nets with non-bottom pins: {}", config.remove_non_bottom_pins);
    println!("\tWrite segments: {}\n", config.write_segments);

    if args.input.is_dir() {
        let Some(output) = args.output.as_deref() else {
            bail!("converting a dataset directory requires an output directory");
        };
        let enabled = HashSet::from(DATASET_STEPS);
        let mut ctx = StepContext::new(&DATASET_STEPS, &enabled);
        let res = convert_dataset(ConvertDatasetParams {
            input: &args.input,
            output,
            config: &config,
            ctx: Some(&mut ctx),
        });
        let summary = ctx.check(res)?;
        println!(
            "Converted {} testcases, replaced {} without nets.",
            summary.converted,
            summary.replaced.len()
        );
        println!("Dataset saved to: {:?}\n", output);
    } else if args.input.is_file() {
        let mut enabled = HashSet::from([StepKey::ReadTestcase, StepKey::Convert]);
        if args.output.is_some() {
            enabled.insert(StepKey::WriteTestcase);
        }
        let mut ctx = StepContext::new(&FILE_STEPS, &enabled);
        let res = convert_file(&args.input, args.output.as_deref(), &config, Some(&mut ctx));
        let report = ctx.check(res)?;
        println!("{report}\n");
        if let Some(output) = &args.output {
            println!("Testcase saved to: {:?}\n", output);
        }
    } else {
        bail!("input {:?} is neither a file nor a directory", args.input);
    }

    Ok(())
}

/// Converts the testcase at `input`, writing it to `output` if given.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    config: &ConvertConfig,
    mut ctx: Option<&mut StepContext>,
) -> Result<ConvertReport> {
    let layout = read_layout_file(input)?;
    if let Some(ctx) = ctx.as_mut() {
        ctx.finish(StepKey::ReadTestcase);
    }

    let conv = convert(&layout, &config.options())?;
    if let Some(ctx) = ctx.as_mut() {
        ctx.finish(StepKey::Convert);
    }

    if let Some(output) = output {
        write_layout_file(output, &conv.layout, config.write_segments)?;
        if let Some(ctx) = ctx.as_mut() {
            ctx.finish(StepKey::WriteTestcase);
        }
    }

    Ok(conv.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_layout;

    #[test]
    fn test_convert_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("id_0.txt");
        let output = dir.path().join("grid.txt");
        write_layout_file(&input, &sample_layout(), true)?;

        let config = ConvertConfig {
            write_segments: false,
            ..Default::default()
        };
        let report = convert_file(&input, Some(&output), &config, None)?;
        assert_eq!(report.redundant_obstacles, 2);

        let converted = read_layout_file(&output)?;
        assert_eq!((converted.x.stop(), converted.y.stop()), (10, 10));
        assert!(converted.nets.iter().all(|net| net.h_segs.is_empty()));
        // Without segments the header statistics are still those of the grid.
        assert_eq!(converted.stats.wirelength, 7);
        Ok(())
    }

    #[test]
    fn test_convert_file_without_output() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("id_0.txt");
        write_layout_file(&input, &sample_layout(), true)?;
        let report = convert_file(&input, None, &ConvertConfig::default(), None)?;
        assert_eq!((report.width, report.height), (10, 10));
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }
}
