use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use indicatif::ProgressBar;
use log::warn;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::cli::progress::{StepContext, StepKey};
use crate::config::ConvertConfig;
use crate::convert::convert;
use crate::format::{read_layout_file, write_layout_file};
use crate::paths::{is_level_dir, previous_testcase, testcase_id};
use crate::Result;

pub const DATASET_STEPS: [StepKey; 3] = [
    StepKey::CopyDataset,
    StepKey::ConvertDataset,
    StepKey::ReplaceEmpty,
];

pub struct ConvertDatasetParams<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub config: &'a ConvertConfig,
    pub ctx: Option<&'a mut StepContext>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DatasetSummary {
    pub converted: usize,
    /// Testcases left without nets, overwritten by their predecessor.
    pub replaced: Vec<PathBuf>,
    /// Testcases left without nets that have no predecessor.
    pub unreplaced: Vec<PathBuf>,
}

macro_rules! try_finish_step {
    ( $ctx:expr, $step:expr ) => {
        if let Some(ctx) = $ctx.as_mut() {
            ctx.finish($step);
        }
    };
}

/// Copies the dataset at `input` to `output` and converts every testcase of
/// the copy in place.
pub fn convert_dataset(params: ConvertDatasetParams) -> Result<DatasetSummary> {
    let ConvertDatasetParams {
        input,
        output,
        config,
        mut ctx,
    } = params;

    if output.exists() {
        bail!("output directory {:?} already exists", output);
    }
    copy_tree(input, output)?;
    try_finish_step!(ctx, StepKey::CopyDataset);

    let testcases = find_testcases(output)?;
    let bar = match ctx.as_ref() {
        Some(ctx) => ctx.counter(testcases.len() as u64),
        None => ProgressBar::hidden(),
    };
    let opts = config.options();
    let net_counts = testcases
        .par_iter()
        .map(|path| -> Result<usize> {
            let layout = read_layout_file(path)
                .with_context(|| format!("failed to read testcase {:?}", path))?;
            let conv = convert(&layout, &opts)
                .with_context(|| format!("failed to convert testcase {:?}", path))?;
            write_layout_file(path, &conv.layout, config.write_segments)
                .with_context(|| format!("failed to write testcase {:?}", path))?;
            bar.inc(1);
            Ok(conv.layout.nets.len())
        })
        .collect::<Result<Vec<_>>>()?;
    bar.finish_and_clear();
    try_finish_step!(ctx, StepKey::ConvertDataset);

    let mut summary = DatasetSummary {
        converted: testcases.len(),
        ..Default::default()
    };
    // Ascending order, so a run of empty testcases all inherit the last
    // testcase before the run.
    for (path, _) in testcases
        .iter()
        .zip(net_counts)
        .filter(|(_, nets)| *nets == 0)
    {
        match previous_testcase(path).filter(|prev| prev.is_file()) {
            Some(prev) => {
                warn!("testcase without nets found: {:?}, replaced by {:?}", path, prev);
                fs::copy(&prev, path)?;
                summary.replaced.push(path.clone());
            }
            None => {
                warn!("testcase without nets found: {:?}, no predecessor to replace it", path);
                summary.unreplaced.push(path.clone());
            }
        }
    }
    try_finish_step!(ctx, StepKey::ReplaceEmpty);

    Ok(summary)
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    let entries = WalkDir::new(from)
        .sort_by_file_name()
        .into_iter()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    for entry in entries {
        let dest = to.join(entry.path().strip_prefix(from)?);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

/// Testcase files under `root` that sit in a `level_<n>` directory, sorted by
/// directory and id.
fn find_testcases(root: &Path) -> Result<Vec<PathBuf>> {
    let mut testcases = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let Some(id) = testcase_id(&path) else {
            continue;
        };
        if path.parent().map_or(false, is_level_dir) {
            testcases.push((path.parent().map(Path::to_path_buf), id, path));
        } else {
            warn!("skipping testcase outside a level directory: {:?}", path);
        }
    }
    testcases.sort();
    Ok(testcases.into_iter().map(|(_, _, path)| path).collect())
}
