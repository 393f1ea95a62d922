use std::collections::HashSet;
use std::fmt::Display;
use std::time::Duration;

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::Result;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StepKey {
    ReadTestcase,
    Convert,
    WriteTestcase,
    CopyDataset,
    ConvertDataset,
    ReplaceEmpty,
}

impl StepKey {
    pub fn desc(&self) -> &'static str {
        match self {
            StepKey::ReadTestcase => "Read testcase",
            StepKey::Convert => "Convert to grid",
            StepKey::WriteTestcase => "Write testcase",
            StepKey::CopyDataset => "Copy dataset",
            StepKey::ConvertDataset => "Convert testcases",
            StepKey::ReplaceEmpty => "Replace testcases without nets",
        }
    }
}

#[derive(PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Pending,
    InProgress,
    Disabled,
    Skipped,
    Failed,
}

pub struct StepContext {
    step_num: usize,
    steps: Vec<Step>,
    mp: MultiProgress,
}

pub struct Step {
    desc: String,
    key: StepKey,
    progress_bar: ProgressBar,
    disabled: bool,
}

impl StepContext {
    /// Lists `keys` in order; keys missing from `enabled` are shown as disabled.
    pub fn new(keys: &[StepKey], enabled: &HashSet<StepKey>) -> Self {
        println!("Steps:");

        let mut steps: Vec<_> = keys
            .iter()
            .map(|&key| Step {
                desc: key.desc().to_string(),
                key,
                progress_bar: ProgressBar::new_spinner(),
                disabled: !enabled.contains(&key),
            })
            .collect();

        let mp = MultiProgress::new();
        let num_steps = steps.iter().filter(|step| !step.disabled).count();
        let mut counter = 0;
        let width = format!("{}", num_steps).len();
        for (i, step) in steps.iter_mut().enumerate() {
            mp.insert(i, step.progress_bar.clone());
            if step.disabled {
                let msg = Some(format!("[-/-] {}", step.desc));
                step.set_status(StepStatus::Disabled, msg);
            } else {
                counter += 1;
                let msg = Some(format!(
                    "[{:width$}/{:width$}] {}",
                    counter, num_steps, step.desc
                ));
                step.set_status(StepStatus::Pending, msg);
            }
        }

        let mut ctx = StepContext {
            step_num: 0,
            steps,
            mp,
        };
        if ctx.steps.first().map_or(false, |step| step.disabled) {
            ctx.advance();
        }
        if let Some(current_step) = ctx.current_step() {
            current_step.set_status(StepStatus::InProgress, None);
        }
        ctx
    }

    pub fn advance(&mut self) {
        self.step_num += 1;
        while let Some(current_step) = self.current_step() {
            if !current_step.disabled {
                break;
            }
            self.step_num += 1;
        }
    }

    #[inline]
    pub fn current_step(&mut self) -> Option<&mut Step> {
        self.steps.get_mut(self.step_num)
    }

    /// A counter bar shown below the steps, for work split into `len` items.
    pub fn counter(&self, len: u64) -> ProgressBar {
        let bar = self.mp.add(ProgressBar::new(len));
        let style = ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }

    pub fn check<T>(&mut self, res: Result<T>) -> Result<T> {
        if res.is_err() {
            if let Some(current_step) = self.current_step() {
                current_step.set_status(StepStatus::Failed, None);
                self.advance();
                while let Some(current_step) = self.current_step() {
                    current_step.set_status(StepStatus::Skipped, None);
                    self.advance();
                }
            }
            println!("\n");
        }

        res
    }

    pub fn finish(&mut self, key: StepKey) {
        if let Some(current_step) = self.current_step() {
            debug_assert!(current_step.key == key, "a step was completed out of order");

            current_step.set_status(StepStatus::Done, None);

            self.advance();

            if let Some(current_step) = self.current_step() {
                current_step.set_status(StepStatus::InProgress, None);
            } else {
                self.done();
            }
        }
    }

    pub fn done(&mut self) {
        println!("\n\nCompleted all steps");
    }
}

fn format_template(spinner: bool, status: impl Display) -> String {
    if spinner {
        format!("{{spinner:.green}} {:16} {{msg}}", status)
    } else {
        format!("  {:16} {{msg}}", status)
    }
}

impl Step {
    fn set_status(&mut self, status: StepStatus, msg: Option<String>) {
        let status_template = match status {
            StepStatus::Disabled => {
                format_template(false, "Disabled".truecolor(120, 120, 120).bold())
            }
            StepStatus::Done => format_template(false, "Done".green().bold()),
            StepStatus::Failed => format_template(false, "Failed".bright_white().on_red().bold()),
            StepStatus::InProgress => format_template(true, "In Progress".bright_white().bold()),
            StepStatus::Pending => format_template(true, "Pending".blue().bold()),
            StepStatus::Skipped => format_template(false, "Skipped".yellow().bold()),
        };
        if let Ok(style) = ProgressStyle::with_template(&status_template) {
            self.progress_bar.set_style(style);
        }

        if let Some(msg) = msg {
            self.progress_bar.set_message(msg);
        }

        if status == StepStatus::InProgress {
            self.progress_bar
                .enable_steady_tick(Duration::from_millis(200));
        } else if status != StepStatus::Pending {
            self.progress_bar.finish();
        }
    }
}
