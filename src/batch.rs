//! Batch Driver
//!
//! Lists the input directory and feeds each spec through the processor in
//! order, one at a time. A missing input directory ends the run with a single
//! error line. What happens on a per-spec failure depends on
//! `BatchConfig::on_error`.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::discovery::discover_specs;
use crate::error::{Result, SpecError};
use crate::logger::SpecLogger;
use crate::options::{BatchConfig, FailurePolicy};
use crate::processor::{ProcessedSpec, SpecProcessor};
use crate::progress::Progress;

#[derive(Debug)]
pub struct SpecFailure {
    pub spec: PathBuf,
    pub error: SpecError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub total: usize,
    pub processed: Vec<ProcessedSpec>,
    pub failures: Vec<SpecFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub enum BatchOutcome {
    /// Input directory could not be listed; nothing was processed.
    MissingInput,
    Completed(BatchReport),
}

fn output_dir_label(config: &BatchConfig) -> String {
    if config.output_dir.is_relative() {
        format!("/{}", config.output_dir.display())
    } else {
        config.output_dir.display().to_string()
    }
}

pub fn run_batch(
    config: &BatchConfig,
    logger: &SpecLogger,
    progress: &mut dyn Progress,
) -> Result<BatchOutcome> {
    let specs = match discover_specs(config) {
        Ok(specs) => specs,
        Err(e) => {
            tracing::debug!("{}", e);
            logger.error("Could not find specs folder");
            return Ok(BatchOutcome::MissingInput);
        }
    };

    logger.info(&format!("Processing {} specs...", specs.len()));
    progress.start(specs.len());

    let processor = SpecProcessor::from_config(config);
    let mut report = BatchReport {
        total: specs.len(),
        ..BatchReport::default()
    };
    // output path -> spec that last wrote it
    let mut written: HashMap<PathBuf, PathBuf> = HashMap::new();

    for spec in &specs {
        match processor.process(&spec.path) {
            Ok(processed) => {
                if let Some(previous) =
                    written.insert(processed.output_path.clone(), spec.path.clone())
                {
                    tracing::warn!(
                        "{} overwrote output of {} at {}",
                        spec.path.display(),
                        previous.display(),
                        processed.output_path.display()
                    );
                }
                report.processed.push(processed);
            }
            Err(error) => match config.on_error {
                FailurePolicy::Abort => {
                    progress.finish();
                    return Err(error);
                }
                FailurePolicy::Continue => {
                    logger.error(&error.to_string());
                    report.failures.push(SpecFailure {
                        spec: spec.path.clone(),
                        error,
                    });
                }
            },
        }
        progress.tick(&spec.name);
    }
    progress.finish();

    if report.is_success() {
        logger.success(&format!(
            "Specs compiled successfully to {} folder!",
            output_dir_label(config)
        ));
    } else {
        logger.error(&format!(
            "Compiled {} of {} specs, {} failed",
            report.processed.len(),
            report.total,
            report.failures.len()
        ));
    }

    Ok(BatchOutcome::Completed(report))
}
